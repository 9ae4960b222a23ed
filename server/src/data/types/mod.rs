//! Row and parameter types shared by the data layer and the API

mod user;

pub use user::{USER_COLUMNS, UserFilter, UserListParams, UserRow, UserTuple};
