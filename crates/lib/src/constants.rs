//! # Shared Constants
//!
//! Centralized defaults shared across the workspace, so index names and
//! endpoints are not scattered as magic strings.

/// Target index for film documents.
pub const MOVIES_INDEX: &str = "movies";

/// Target index for genre documents.
pub const GENRES_INDEX: &str = "genres";

/// Target index for person documents.
pub const PERSONS_INDEX: &str = "persons";

/// Rows per extraction page and documents per bulk request.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default Elasticsearch endpoint when `ELASTICSEARCH_URL` is not set.
pub const DEFAULT_ELASTICSEARCH_URL: &str = "http://127.0.0.1:9200";

/// Default PostgreSQL port when `DATABASE_PORT` is not set.
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;
