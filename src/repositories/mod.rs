//! Hand-written SQL, one repository per resource.
//!
//! Every function takes the caller's connection, which is normally the
//! connection of an open [`UnitOfWork`](crate::database::UnitOfWork), so a
//! service can compose several calls inside one transaction.

pub mod lang_repository;
pub mod translation_repository;
pub mod user_repository;

pub use lang_repository::LangRepository;
pub use translation_repository::TranslationRepository;
pub use user_repository::UserRepository;
