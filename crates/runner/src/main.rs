//! # Movies ETL Runner
//!
//! Process bootstrap for the catalog sync: loads configuration, initializes
//! tracing, acquires the database session through the backoff controller,
//! runs the pipeline once, and maps the outcome to the process exit code.

mod config;

use std::process::ExitCode;

use clap::Parser;
use movies_etl::backoff::Backoff;
use movies_etl::constants::DEFAULT_BATCH_SIZE;
use movies_etl::load::BulkLoader;
use movies_etl::pipeline::{DeliveryMode, Pipeline, PipelineOptions};
use movies_etl::source::{connect_with_retry, PgSource};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "movies-etl",
    about = "Load the movie catalog from PostgreSQL into Elasticsearch"
)]
struct Args {
    /// Rows per extraction page and documents per bulk request.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Abort an entity pipeline on the first failed bulk delivery instead of
    /// continuing with the next batch.
    #[arg(long)]
    fail_fast: bool,

    /// Bulk-indexing endpoint; overrides the ELASTICSEARCH_URL variable.
    #[arg(long)]
    elasticsearch_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("configuration error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    let base_url = args
        .elasticsearch_url
        .unwrap_or_else(|| config.elasticsearch_url.clone());

    info!("starting catalog sync");
    let client = match connect_with_retry(&config.database, &Backoff::default()).await {
        Ok(client) => {
            info!(host = %config.database.host, dbname = %config.database.dbname, "connected to postgres");
            client
        }
        Err(err) => {
            error!("could not connect to postgres: {err}");
            return ExitCode::FAILURE;
        }
    };

    let options = PipelineOptions {
        batch_size: args.batch_size,
        delivery_mode: if args.fail_fast {
            DeliveryMode::FailFast
        } else {
            DeliveryMode::BestEffort
        },
        ..PipelineOptions::default()
    };
    let mut pipeline = Pipeline::new(PgSource::new(client), BulkLoader::new(&base_url), options);
    let report = pipeline.run().await;
    drop(pipeline);
    info!("postgres session released");

    if report.is_success() {
        info!(
            failed_batches = report.failed_batches(),
            "catalog sync finished"
        );
        ExitCode::SUCCESS
    } else {
        error!("catalog sync failed");
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_batch_size_and_fail_fast() {
        let args = Args::try_parse_from(["movies-etl", "--batch-size", "50", "--fail-fast"])
            .expect("flags should parse");
        assert_eq!(args.batch_size, 50);
        assert!(args.fail_fast);
        assert!(args.elasticsearch_url.is_none());
    }

    #[test]
    fn args_default_to_the_standard_batch_size() {
        let args = Args::try_parse_from(["movies-etl"]).expect("no flags should parse");
        assert_eq!(args.batch_size, DEFAULT_BATCH_SIZE);
        assert!(!args.fail_fast);
    }
}
