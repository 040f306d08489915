//! Core library components.
//!
//! The launch pipeline and the pieces it is built from: decryption,
//! parsing, environment construction, and process replacement.

pub mod bundle;
pub mod config;
pub mod constants;
pub mod decrypt;
pub mod env;
pub mod launch;
pub mod pipeline;
pub mod validation;
