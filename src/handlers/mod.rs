// HTTP handlers, one module per resource
//
// Public: system routes, login and refresh-token.
// Protected (bearer access token): everything else under /api/v1.
pub mod extract;
pub mod langs;
pub mod system;
pub mod translations;
pub mod users;
