//! Fyay Core - Shared types library.
//!
//! This crate provides common types used across all Fyay components:
//! - `web` - The event booking and inventory web application
//! - `cli` - Command-line tools for schema setup and administrator bootstrap
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
