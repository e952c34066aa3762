/// API route handlers, by resource
///
/// - `health`: Health check
/// - `auth`: Register, login, logout and the provider callback
/// - `tasks`: Task CRUD, board and status moves
/// - `dashboard`: Counts and recent tasks
/// - `settings`: Profile and password

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod settings;
pub mod tasks;
