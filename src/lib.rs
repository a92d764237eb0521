//! Terminal client for the Sunmark school-assistant chat backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `net` talks HTTP, `controller` owns and reconciles client state, `pages`
//! renders that state to text, and `cli` parses what the user types.

pub mod cli;
pub mod config;
pub mod controller;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;
