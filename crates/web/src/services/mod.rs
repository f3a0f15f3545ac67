//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Account registration and password login
//! - `ledger` - Inventory reservations, restocks, and stock orders
//! - `validation` - Form field parsing shared by handlers and services

pub mod auth;
pub mod ledger;
pub mod validation;
