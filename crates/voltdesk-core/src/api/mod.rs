//! REST client for the monitoring backend.
//!
//! This module provides the `Authenticator` seam used by the login view and
//! `ApiClient`, its HTTP implementation. The backend answers a successful
//! login with the user record and a JWT bearer token.

pub mod client;
pub mod error;

pub use client::{ApiClient, Authenticator};
pub use error::ApiError;
