//! # Meal Dashboard Core
//!
//! Data layer for the university meal-management admin dashboard.
//!
//! The crate talks to the meal-management REST backend, unwraps its uniform
//! `{success, data, message}` envelopes and turns heterogeneous payloads into
//! de-duplicated, sorted view models that presentation code can render without
//! knowing anything about the wire format.
//!
//! ## Features
//!
//! - **Envelope decoding**: one error taxonomy for transport and application failures
//! - **Schedule grouping**: collapse assignment rows into production units
//! - **Student aggregation**: one view model per student with breakfast/lunch/dinner slots
//! - **Analytics fallbacks**: meal distribution and stock overview when the backend omits them
//! - **Query cache**: explicit, injectable cache with checksum-keyed memoization
//!
//! ## Architecture
//!
//! - [`api`]: view models and wire types exposed to consumers
//! - [`models`]: envelope, wire records and meal types
//! - [`services`]: pure normalizers plus the page-level [`services::DashboardService`]
//! - [`client`]: transports (HTTP, in-memory), token store and typed admin endpoints
//! - [`cache`]: query cache and memoization
//! - [`config`]: environment and TOML configuration

pub mod api;
pub mod cache;
pub mod checksum;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::{DashboardError, DashboardResult, DataWarning, ErrorContext};
