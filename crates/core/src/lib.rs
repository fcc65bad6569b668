//! Core business logic for Invoxa.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing and email normalization
//! - `document` - Document kinds, statuses, totals and numbering
//! - `limits` - Free-tier usage limits
//! - `dashboard` - Dashboard aggregation and growth metrics
//! - `billing` - Subscription statuses and payment-gateway webhooks

pub mod auth;
pub mod billing;
pub mod dashboard;
pub mod document;
pub mod limits;
