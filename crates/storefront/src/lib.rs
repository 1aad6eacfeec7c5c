//! Shopfront Storefront client library.
//!
//! Everything a storefront front end needs between the page and the REST
//! backend: the typed API client, catalog browsing with URL-driven filter
//! state, the guest cart with merge-on-sign-in, and HTML fragment rendering.
//!
//! # Modules
//!
//! - [`api`] - Backend client, wire normalization, canonical entities
//! - [`catalog`] - Filter state, query strings, listing page state
//! - [`cart`] - Guest cart persisted in client storage
//! - [`session`] - Sign-in state and add-to-cart routing
//! - [`render`] - Askama HTML fragments
//! - [`storage`] - Key-value persistence
//! - [`tasks`] - Ordered execution of per-item async tasks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod storage;
pub mod tasks;

pub use error::{Result, StorefrontError};
