//! Well-known role name constants.
//!
//! These must match the `user_role` check constraint in
//! `20250728000001_create_users.sql`.

pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_FACILITATOR: &str = "facilitator";
pub const ROLE_STUDENT: &str = "student";
