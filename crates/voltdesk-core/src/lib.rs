//! Core library for voltdesk.
//!
//! - `auth`: the in-memory session store and the scope that hands it to views
//! - `storage`: durable key-value storage for the session token
//! - `api`: the authentication client for the monitoring backend
//! - `models`: user and login payloads
//! - `config`: on-disk application configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod storage;
