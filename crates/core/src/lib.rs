//! QuickBite Core - Shared types library.
//!
//! This crate provides common types used across all QuickBite components:
//! - `api` - The order-management backend service
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs plus the shared enums
//!   (order status, payment method, user roles)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
