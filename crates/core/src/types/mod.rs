//! Core types for the cart manager.
//!
//! This module provides type-safe wrappers for the commerce domain concepts
//! the back office works with.

pub mod address;
pub mod cart;
pub mod id;
pub mod money;

pub use address::{Address, format_address};
pub use cart::{Cart, CartRef, LineItem};
pub use id::*;
pub use money::Money;
