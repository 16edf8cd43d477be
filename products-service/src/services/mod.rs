pub mod metrics;
pub mod provider;
pub mod store;
pub mod supervisor;

pub use self::metrics::{get_metrics, init_metrics};
pub use provider::ConnectionProvider;
pub use store::{DocumentStore, MockStore, MongoStore, QueryError};
pub use supervisor::spawn_connection_supervisor;
