//! Domain logic
//!
//! - `users` - user accounts: creation, lookup, updates, deletion and listing

pub mod users;

pub use users::{NewUser, UserError, UserService, UserUpdate};
