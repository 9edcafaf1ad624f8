//! # IVC Rust Backend
//!
//! Reconciliation and synchronization engine for an influencer vetting
//! dashboard.
//!
//! This crate merges uploaded candidate lists against an authoritative
//! roster held in a remote row-oriented workbook, partitions candidates
//! into pending/rejected/unknown buckets, maintains a locally editable
//! working copy of the roster, and writes operator decisions back to the
//! workbook. The backend exposes a REST API via Axum for the dashboard
//! frontend.
//!
//! ## Features
//!
//! - **Upload Ingest**: Parse uploaded candidate tables, gated by content
//!   digest so identical bytes are processed once
//! - **Reconciliation**: Deterministic three-way partitioning against the
//!   roster by normalized identity
//! - **Working Copy**: Row-key-addressed edits with a monotonic
//!   edit-version and fingerprint-driven conflict reload
//! - **Sync**: Clear-then-write push of the full working copy, with a
//!   change signal that invalidates every cached view
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) for API responses
//! - [`models`]: Identity normalization, typed records, schema binding
//! - [`store`]: Worksheet store contract, retry policy, fingerprint
//! - [`cache`]: TTL-bounded roster cache with change-signal invalidation
//! - [`services`]: High-level business logic (reconcile, sync, export)
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - StoreError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod cache;
pub mod models;

pub mod store;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
