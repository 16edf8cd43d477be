//! Background task owning the MongoDB connection lifecycle.
//!
//! The HTTP server does not wait for the database: the supervisor connects
//! with exponential backoff, publishes the handle through the
//! [`ConnectionProvider`], then pings on an interval, clearing the handle
//! while the server is unreachable and restoring it once pings succeed again.

use crate::config::MongoConfig;
use crate::services::provider::ConnectionProvider;
use crate::services::store::{DocumentStore, MongoStore, QueryError};
use backoff::future::retry;
use backoff::ExponentialBackoff;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub fn spawn_connection_supervisor(
    provider: ConnectionProvider,
    config: MongoConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let store: Arc<dyn DocumentStore> = match connect_with_retry(&config).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(error = %e, "Giving up on MongoDB connection");
                return;
            }
        };

        provider.install(store.clone()).await;
        tracing::info!(database = %config.database, "MongoDB connection established");

        let mut ticker = tokio::time::interval(config.health_interval());
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; the connection was just verified.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            check_connection(&provider, &store).await;
        }
    })
}

async fn connect_with_retry(config: &MongoConfig) -> Result<MongoStore, QueryError> {
    // No overall deadline: the service keeps answering "not connected" until
    // the database shows up.
    let backoff = ExponentialBackoff {
        max_elapsed_time: None,
        ..Default::default()
    };

    retry(backoff, || async {
        tracing::info!(database = %config.database, "Connecting to MongoDB");
        let store = MongoStore::connect(&config.uri, &config.database)
            .await
            .map_err(|e| {
                if e.is_permanent() {
                    tracing::error!(error = %e, "MongoDB connection string rejected");
                    backoff::Error::permanent(e)
                } else {
                    tracing::warn!(error = %e, "MongoDB connection setup failed, retrying");
                    backoff::Error::transient(e)
                }
            })?;
        store.ping().await.map_err(|e| {
            tracing::warn!(error = %e, "MongoDB not reachable yet, retrying");
            backoff::Error::transient(e)
        })?;
        Ok::<_, backoff::Error<QueryError>>(store)
    })
    .await
}

/// One supervision step: ping `store` and reconcile the provider's slot.
pub async fn check_connection(provider: &ConnectionProvider, store: &Arc<dyn DocumentStore>) {
    match store.ping().await {
        Ok(()) => {
            if !provider.is_connected().await {
                provider.install(store.clone()).await;
                tracing::info!("MongoDB connection restored");
            }
        }
        Err(e) => {
            if provider.is_connected().await {
                provider.clear().await;
                tracing::error!(error = %e, "MongoDB connection lost");
            }
        }
    }
}
