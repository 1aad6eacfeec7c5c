//! Shopfront Core - Shared domain types.
//!
//! This crate provides the types used across all Shopfront components:
//! - `storefront` - Client library (API client, guest cart, catalog, renderer)
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage,
//! no HTTP clients. The guest cart and filter state live here so they can be
//! reasoned about (and tested) without any backend.
//!
//! # Modules
//!
//! - [`types`] - Entity IDs, prices and discounts, emails, guest cart, filter state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
