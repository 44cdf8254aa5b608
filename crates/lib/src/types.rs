//! # Rows and Documents
//!
//! The relational row shapes produced by extraction and the search-index
//! document shapes consumed by bulk delivery. Rows live for exactly one
//! batch; documents are serialized once into an NDJSON payload and dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three catalog entity kinds, each with its own query and target index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Film,
    Genre,
    Person,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Film => "film",
            EntityKind::Genre => "genre",
            EntityKind::Person => "person",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One person attached to a film, as aggregated by the join query's
/// `jsonb_build_object` payload.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PersonRef {
    #[serde(rename = "person_role")]
    pub role: String,
    #[serde(rename = "person_id")]
    pub id: String,
    #[serde(rename = "person_name")]
    pub name: String,
}

/// One denormalized film row: the film's own columns plus its deduplicated
/// person and genre aggregates.
#[derive(Debug, Clone)]
pub struct RawFilmRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<f64>,
    /// The relational `type` column (e.g. "movie", "tv_show").
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub persons: Vec<PersonRef>,
    pub genres: Vec<String>,
}

/// One genre row from the full-table read.
#[derive(Debug, Clone)]
pub struct GenreRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// One person row from the full-table read.
#[derive(Debug, Clone)]
pub struct PersonRow {
    pub id: Uuid,
    pub full_name: String,
}

/// A document that can be addressed by id inside a bulk payload.
///
/// The bulk directive's `_id` is always taken from this accessor, which keeps
/// the directive and the document body keyed identically and makes
/// re-delivery of the same document an idempotent overwrite.
pub trait IndexDocument {
    fn id(&self) -> &str;
}

/// An `{id, name}` pair inside a film document's `actors`/`writers` lists.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PersonSummary {
    pub id: String,
    pub name: String,
}

/// The search-index document for a film.
#[derive(Debug, Clone, Serialize)]
pub struct FilmDocument {
    pub id: String,
    pub imdb_rating: Option<f64>,
    pub genre: Vec<String>,
    pub title: String,
    pub description: Option<String>,
    pub director: Vec<String>,
    pub actors_names: Vec<String>,
    pub writers_names: Vec<String>,
    pub actors: Vec<PersonSummary>,
    pub writers: Vec<PersonSummary>,
}

impl IndexDocument for FilmDocument {
    fn id(&self) -> &str {
        &self.id
    }
}

/// The search-index document for a genre.
#[derive(Debug, Clone, Serialize)]
pub struct GenreDocument {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl IndexDocument for GenreDocument {
    fn id(&self) -> &str {
        &self.id
    }
}

/// The search-index document for a person.
#[derive(Debug, Clone, Serialize)]
pub struct PersonDocument {
    pub id: String,
    pub full_name: String,
}

impl IndexDocument for PersonDocument {
    fn id(&self) -> &str {
        &self.id
    }
}
