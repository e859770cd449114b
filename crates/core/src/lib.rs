//! Cart Manager Core - Shared types library.
//!
//! This crate provides the types shared by the cart manager components:
//! - `admin` - Back-office cart manager (table state, gateway, HTTP API)
//! - `integration-tests` - End-to-end tests against an in-memory platform
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, carts, line items, money and addresses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
