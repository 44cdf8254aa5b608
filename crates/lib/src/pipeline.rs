//! # Pipeline Orchestration
//!
//! One parameterized extract → transform → deliver pipeline, invoked for
//! genres, persons, and films in a fixed order. Each entity pipeline runs
//! inside its own failure boundary so a genre-load failure never blocks film
//! processing. Batches round-trip fully before the next page is requested,
//! bounding memory to one batch at a time.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::constants::{DEFAULT_BATCH_SIZE, GENRES_INDEX, MOVIES_INDEX, PERSONS_INDEX};
use crate::errors::EtlError;
use crate::load::BulkLoader;
use crate::source::CatalogSource;
use crate::transform;
use crate::types::{EntityKind, FilmDocument, GenreDocument, IndexDocument, PersonDocument};

/// Target index names, passed in at construction rather than read from
/// process-wide globals.
#[derive(Debug, Clone)]
pub struct IndexNames {
    pub movies: String,
    pub genres: String,
    pub persons: String,
}

impl Default for IndexNames {
    fn default() -> Self {
        Self {
            movies: MOVIES_INDEX.to_string(),
            genres: GENRES_INDEX.to_string(),
            persons: PERSONS_INDEX.to_string(),
        }
    }
}

/// What a failed bulk delivery does to the entity pipeline it occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Log the failed batch and continue with the next one.
    BestEffort,
    /// Abort the entity pipeline on the first failed batch.
    FailFast,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub batch_size: usize,
    pub delivery_mode: DeliveryMode,
    pub indexes: IndexNames,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            delivery_mode: DeliveryMode::BestEffort,
            indexes: IndexNames::default(),
        }
    }
}

/// Per-entity outcome: batch and document counts, including batches whose
/// delivery failed under best-effort mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EntityReport {
    pub batches: usize,
    pub documents: usize,
    pub failed_batches: usize,
}

/// Outcome of one full run, one slot per entity pipeline.
#[derive(Debug)]
pub struct RunReport {
    pub genres: Result<EntityReport, EtlError>,
    pub persons: Result<EntityReport, EtlError>,
    pub films: Result<EntityReport, EtlError>,
}

impl RunReport {
    /// True when no entity pipeline failed hard. Best-effort delivery
    /// failures do not count against success.
    pub fn is_success(&self) -> bool {
        self.genres.is_ok() && self.persons.is_ok() && self.films.is_ok()
    }

    /// Batches whose delivery failed across all completed entity pipelines.
    pub fn failed_batches(&self) -> usize {
        [&self.genres, &self.persons, &self.films]
            .into_iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|r| r.failed_batches)
            .sum()
    }
}

/// Sequences the three entity pipelines over one exclusively owned source.
pub struct Pipeline<S> {
    source: S,
    loader: BulkLoader,
    options: PipelineOptions,
}

impl<S: CatalogSource> Pipeline<S> {
    pub fn new(source: S, loader: BulkLoader, options: PipelineOptions) -> Self {
        Self {
            source,
            loader,
            options,
        }
    }

    /// Runs genres, then persons, then films. The order is a convention from
    /// the catalog model, not a hard dependency; film documents fully embed
    /// their genre and person names.
    pub async fn run(&mut self) -> RunReport {
        let genres = log_outcome(EntityKind::Genre, self.run_genres().await);
        let persons = log_outcome(EntityKind::Person, self.run_persons().await);
        let films = log_outcome(EntityKind::Film, self.run_films().await);
        RunReport {
            genres,
            persons,
            films,
        }
    }

    async fn run_genres(&mut self) -> Result<EntityReport, EtlError> {
        let rows = self.source.genres().await?;
        let documents: Vec<GenreDocument> =
            rows.into_iter().map(transform::genre_document).collect();
        let index = self.options.indexes.genres.clone();
        let mut report = EntityReport::default();
        self.deliver_batch(EntityKind::Genre, &index, 0, &documents, &mut report)
            .await?;
        Ok(report)
    }

    async fn run_persons(&mut self) -> Result<EntityReport, EtlError> {
        let rows = self.source.persons().await?;
        let documents: Vec<PersonDocument> =
            rows.into_iter().map(transform::person_document).collect();
        let index = self.options.indexes.persons.clone();
        let mut report = EntityReport::default();
        self.deliver_batch(EntityKind::Person, &index, 0, &documents, &mut report)
            .await?;
        Ok(report)
    }

    async fn run_films(&mut self) -> Result<EntityReport, EtlError> {
        let index = self.options.indexes.movies.clone();
        let mut report = EntityReport::default();
        let mut offset = 0usize;
        loop {
            let rows = self.source.next_film_batch(self.options.batch_size).await?;
            if rows.is_empty() {
                break;
            }
            let extracted = rows.len();
            let documents: Vec<FilmDocument> =
                rows.into_iter().map(transform::film_document).collect();
            self.deliver_batch(EntityKind::Film, &index, offset, &documents, &mut report)
                .await?;
            offset += extracted;
        }
        Ok(report)
    }

    /// Delivers one non-empty batch, applying the configured delivery mode.
    async fn deliver_batch<D>(
        &self,
        entity: EntityKind,
        index: &str,
        offset: usize,
        documents: &[D],
        report: &mut EntityReport,
    ) -> Result<(), EtlError>
    where
        D: IndexDocument + Serialize,
    {
        if documents.is_empty() {
            return Ok(());
        }
        report.batches += 1;
        match self.loader.deliver(documents, index).await {
            Ok(()) => {
                report.documents += documents.len();
                info!(
                    entity = %entity,
                    index,
                    offset,
                    documents = documents.len(),
                    "batch delivered"
                );
                Ok(())
            }
            Err(err) if self.options.delivery_mode == DeliveryMode::BestEffort => {
                report.failed_batches += 1;
                warn!(
                    entity = %entity,
                    index,
                    offset,
                    error = %err,
                    "batch delivery failed, continuing"
                );
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

fn log_outcome(
    entity: EntityKind,
    outcome: Result<EntityReport, EtlError>,
) -> Result<EntityReport, EtlError> {
    match &outcome {
        Ok(report) => info!(
            entity = %entity,
            batches = report.batches,
            documents = report.documents,
            failed_batches = report.failed_batches,
            "entity pipeline finished"
        ),
        Err(err) => error!(entity = %entity, error = %err, "entity pipeline failed"),
    }
    outcome
}
