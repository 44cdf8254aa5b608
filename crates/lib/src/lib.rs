//! # Movies ETL
//!
//! This crate provides the core of the movie-catalog synchronization pipeline:
//! it extracts denormalized film, genre, and person records from PostgreSQL,
//! transforms them into search-index documents, and bulk-loads them into
//! Elasticsearch. Connection acquisition is shielded by a generic
//! exponential-backoff controller so transient connectivity failures do not
//! abort a run.

pub mod backoff;
pub mod constants;
pub mod errors;
pub mod load;
pub mod pipeline;
pub mod source;
pub mod transform;
pub mod types;

pub use errors::EtlError;
pub use pipeline::{DeliveryMode, Pipeline, PipelineOptions, RunReport};
