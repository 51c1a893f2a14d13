//! Catalog request/response protocol and the actor that serves it.
//!
//! The gateway talks to the catalog over an mpsc channel. Each request
//! carries a oneshot sender for its reply, so concurrent requests from
//! different callers never share state.

use std::sync::Arc;

use hive_ddl_core::schema::DatabaseInfo;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::BoxError;

/// Capacity of the channel returned by [`spawn_catalog_actor`].
pub const CATALOG_CHANNEL_CAPACITY: usize = 64;

/// A request to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    /// List every database, with its tables, visible to `user`.
    ListDatabases {
        /// User identity the listing is for.
        user: String,
    },
}

impl CatalogRequest {
    /// Returns the operation name used in logs.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::ListDatabases { .. } => "list_databases",
        }
    }
}

/// A reply from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogResponse {
    /// The database listing.
    Databases(Vec<DatabaseInfo>),
    /// The catalog could not produce a listing.
    Failure(String),
    /// A message the protocol does not know.
    Unrecognized(String),
}

/// A request paired with the channel its reply goes to.
#[derive(Debug)]
pub struct CatalogEnvelope {
    /// The request.
    pub request: CatalogRequest,
    /// Where to send the reply.
    pub reply: oneshot::Sender<CatalogResponse>,
}

/// Anything that can list databases for a user.
pub trait CatalogSource: Send + Sync + 'static {
    /// Lists databases (and their tables) visible to `user`.
    fn list_databases(&self, user: &str) -> Result<Vec<DatabaseInfo>, BoxError>;
}

/// Serves catalog requests from `source` on a tokio task.
///
/// Each request is answered on its own task, with the source call on the
/// blocking pool. The task ends once every sender is dropped.
pub fn spawn_catalog_actor<S: CatalogSource>(
    source: S,
) -> (mpsc::Sender<CatalogEnvelope>, JoinHandle<()>) {
    let (sender, mut receiver) = mpsc::channel::<CatalogEnvelope>(CATALOG_CHANNEL_CAPACITY);
    let source = Arc::new(source);

    let handle = tokio::spawn(async move {
        while let Some(CatalogEnvelope { request, reply }) = receiver.recv().await {
            debug!(operation = request.operation(), "Serving catalog request");
            let source = Arc::clone(&source);
            tokio::spawn(async move {
                let operation = request.operation();
                let response = serve(source, request).await;
                if reply.send(response).is_err() {
                    debug!(operation, "Requester went away before the reply");
                }
            });
        }
        debug!("Catalog actor stopped");
    });

    (sender, handle)
}

async fn serve<S: CatalogSource>(source: Arc<S>, request: CatalogRequest) -> CatalogResponse {
    match request {
        CatalogRequest::ListDatabases { user } => {
            let listing = {
                let user = user.clone();
                tokio::task::spawn_blocking(move || source.list_databases(&user)).await
            };
            match listing {
                Ok(Ok(databases)) => CatalogResponse::Databases(databases),
                Ok(Err(e)) => {
                    warn!(user = %user, error = %e, "Catalog source failed");
                    CatalogResponse::Failure(e.to_string())
                }
                Err(e) => {
                    warn!(user = %user, error = %e, "Catalog source panicked");
                    CatalogResponse::Failure(e.to_string())
                }
            }
        }
    }
}
