/// Middleware for the API server
///
/// - `guard`: Session resolution and redirects for entry pages and protected areas
/// - `security`: Security response headers

pub mod guard;
pub mod security;
