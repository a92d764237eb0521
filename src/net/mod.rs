//! Networking modules for the chat backend's REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` maps operations onto HTTP requests, `error` normalizes failure
//! bodies, and `types` defines the wire schema.

pub mod api;
pub mod error;
pub mod types;
