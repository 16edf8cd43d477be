//! The database capability handed to request handlers.

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    error::ErrorKind,
    options::{ClientOptions, FindOptions},
    Client as MongoClient, Database,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use thiserror::Error;

const APP_NAME: &str = "products-service";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("MongoDB error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl QueryError {
    /// Whether retrying cannot help. Only a connection string or option the
    /// driver rejects qualifies; DNS, I/O and server selection failures
    /// (including SRV lookups for `mongodb+srv://`) are worth another attempt.
    pub fn is_permanent(&self) -> bool {
        match self {
            QueryError::Driver(e) => matches!(*e.kind, ErrorKind::InvalidArgument { .. }),
            QueryError::Other(_) => false,
        }
    }
}

/// A live session able to run read queries against named collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents matching `filter`, at most `limit` of them, in cursor order.
    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: usize,
    ) -> Result<Vec<Document>, QueryError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, QueryError>;

    async fn ping(&self) -> Result<(), QueryError>;
}

#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
}

impl MongoStore {
    /// Builds a client for `uri`. The driver connects lazily, so callers
    /// should `ping` before treating the store as live.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, QueryError> {
        let mut client_options = ClientOptions::parse(uri).await?;
        client_options.app_name = Some(APP_NAME.to_string());

        let client = MongoClient::with_options(client_options)?;
        let db = client.database(database);
        tracing::debug!(database = %database, "MongoDB client created");
        Ok(Self { client, db })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: usize,
    ) -> Result<Vec<Document>, QueryError> {
        let find_options = FindOptions::builder()
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter, find_options)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, QueryError> {
        Ok(self
            .db
            .collection::<Document>(collection)
            .find_one(filter, None)
            .await?)
    }

    async fn ping(&self) -> Result<(), QueryError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }
}

/// In-memory store for tests and local runs without MongoDB.
///
/// Filters support equality on dotted paths, descending into arrays the way
/// MongoDB does (`variants.sku` matches any element's `sku`).
pub struct MockStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    failing: AtomicBool,
    reachable: AtomicBool,
    queries: AtomicUsize,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            reachable: AtomicBool::new(true),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn with_documents(self, collection: &str, documents: Vec<Document>) -> Self {
        if let Ok(mut collections) = self.collections.lock() {
            collections
                .entry(collection.to_string())
                .or_default()
                .extend(documents);
        }
        self
    }

    /// Make every subsequent query fail as a driver error would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Controls whether `ping` succeeds.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Number of `find_many`/`find_one` calls issued so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn matching(&self, collection: &str, filter: &Document) -> Result<Vec<Document>, QueryError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("simulated query failure on '{}'", collection).into());
        }

        let collections = self
            .collections
            .lock()
            .map_err(|e| anyhow::anyhow!("Mock store mutex poisoned: {}", e))?;

        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches_filter(document, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: usize,
    ) -> Result<Vec<Document>, QueryError> {
        let mut documents = self.matching(collection, &filter)?;
        documents.truncate(limit);
        Ok(documents)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, QueryError> {
        Ok(self.matching(collection, &filter)?.into_iter().next())
    }

    async fn ping(&self) -> Result<(), QueryError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(anyhow::anyhow!("server selection timeout").into())
        }
    }
}

fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(path, expected)| {
        let segments: Vec<&str> = path.split('.').collect();
        match segments.split_first() {
            Some((head, rest)) => document
                .get(*head)
                .map_or(false, |value| value_matches(value, rest, expected)),
            None => false,
        }
    })
}

fn value_matches(value: &Bson, path: &[&str], expected: &Bson) -> bool {
    match (path.split_first(), value) {
        (None, Bson::Array(items)) => value == expected || items.iter().any(|item| item == expected),
        (None, value) => value == expected,
        (Some(_), Bson::Array(items)) => items
            .iter()
            .any(|item| value_matches(item, path, expected)),
        (Some((head, rest)), Bson::Document(inner)) => inner
            .get(*head)
            .map_or(false, |value| value_matches(value, rest, expected)),
        (Some(_), _) => false,
    }
}
