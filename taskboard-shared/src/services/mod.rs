//! Owner-scoped services
//!
//! Services sit between the HTTP layer and the repositories. Each operation
//! takes the caller's [`Identity`](crate::auth::session::Identity) explicitly,
//! validates untrusted input, and converts storage failures into an opaque
//! error after logging the cause.

pub mod accounts;
pub mod tasks;

pub use accounts::{AccountError, AccountService, ProviderProfile};
pub use tasks::{Board, BoardColumn, TaskError, TaskService, TaskStats};

/// Message shown in place of any internal failure
pub const OPAQUE_FAILURE: &str = "Something went wrong";
