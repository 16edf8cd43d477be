pub mod config;
pub mod error;
pub mod handlers;
pub mod queries;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
