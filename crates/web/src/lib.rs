//! Fyay event booking and inventory web application.
//!
//! This crate provides the server as a library, allowing it to be driven by
//! the binary, the CLI, and end-to-end tests alike.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
