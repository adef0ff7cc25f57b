//! Client-side authentication state.
//!
//! This module provides:
//! - `SessionStore`: the signed-in user and token, with the token mirrored
//!   into durable storage
//! - `SessionScope`: hands the store to the views that were given access to it
//!
//! Tokens are never validated or refreshed here; the backend owns that.

pub mod scope;
pub mod session;

pub use scope::{SessionError, SessionScope, SharedSession};
pub use session::{SessionState, SessionStore, TOKEN_KEY};
