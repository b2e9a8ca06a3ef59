pub mod manager;
pub mod models;
pub mod seed;
pub mod tx;

pub use manager::{Database, DatabaseError};
pub use tx::UnitOfWork;
