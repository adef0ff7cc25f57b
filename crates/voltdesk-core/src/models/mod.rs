//! Payloads exchanged with the monitoring backend.

pub mod user;

pub use user::{LoginResponse, User, UserId};
