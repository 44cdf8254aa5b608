use thiserror::Error;

/// Errors produced by the extraction, transformation, and load stages.
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("database operation failed: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("bulk request could not be sent: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bulk delivery to index `{index}` rejected with status {status}")]
    Delivery {
        index: String,
        status: reqwest::StatusCode,
    },

    #[error("document serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not establish a database connection after {attempts} attempts: {source}")]
    ConnectRetriesExhausted {
        attempts: u32,
        #[source]
        source: tokio_postgres::Error,
    },
}
