//! # Environment Configuration
//!
//! Loads the database and index-endpoint settings from environment variables
//! (after an optional `.env` file). This is the bootstrap boundary: the core
//! library only ever sees the assembled values.

use std::env;

use anyhow::Context;
use movies_etl::constants::{DEFAULT_ELASTICSEARCH_URL, DEFAULT_POSTGRES_PORT};
use movies_etl::source::PgConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: PgConfig,
    pub elasticsearch_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match env::var("DATABASE_PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_PORT is not a valid port number: {raw}"))?,
            Err(_) => DEFAULT_POSTGRES_PORT,
        };

        let database = PgConfig {
            host: require("DATABASE_HOST")?,
            port,
            user: require("DATABASE_USER")?,
            password: require("DATABASE_PASSWORD")?,
            dbname: require("DATABASE_NAME")?,
        };
        let elasticsearch_url = env::var("ELASTICSEARCH_URL")
            .unwrap_or_else(|_| DEFAULT_ELASTICSEARCH_URL.to_string());

        Ok(Self {
            database,
            elasticsearch_url,
        })
    }
}

fn require(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}
