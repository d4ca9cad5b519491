//! Blogstats - analytics aggregation core for a blog backend
//!
//! This library implements the write-buffering analytics pipeline behind a
//! content backend: high-frequency impressions are absorbed in a fast counter
//! store (Redis or in-memory), views are deduplicated per visitor against a
//! durable ledger, clicks are counted synchronously, and a periodic
//! reconciliation job drains buffered impressions into durable per-entity
//! records while keeping the derived click-through rate consistent.
//!
//! # Architecture
//! - `counter`: fast ephemeral counter store (Redis / in-memory backends)
//! - `storage`: durable models and store traits (entities, analytics records,
//!   view ledger) plus an in-memory backend
//! - `analytics`: event ingestion, the per-entity analytics service and the
//!   reconciliation job
//! - `config`: configuration management
//! - `errors`: crate-wide error types
//! - `logging`: tracing subscriber setup

pub mod analytics;
pub mod config;
pub mod counter;
pub mod errors;
pub mod logging;
pub mod storage;
