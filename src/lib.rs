pub mod boundary;
pub mod config;
pub mod lazy;
pub mod loader;
pub mod middleware;
pub mod navigation;
pub mod pages;
pub mod registry;
pub mod render;
pub mod res;
pub mod resolver;
pub mod routes;
pub mod shell;
pub mod signal;

use std::sync::Arc;

use axum::extract::FromRef;

pub use config::Config;
pub use loader::{RecordSource, StrideClient};
pub use navigation::Navigator;
pub use registry::Registry;
pub use resolver::Resolver;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub registry: &'static Registry,
    pub resolver: Arc<Resolver>,
    pub source: Arc<dyn RecordSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        let registry = Registry::builtin();
        AppState {
            registry,
            resolver: Arc::new(Resolver::from_registry(registry)),
            source,
        }
    }
}
