//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::dispatch::DispatchLifecycle;
use crate::repositories::DocumentStore;
use crate::utils::jwt::{JwtConfig, JwtService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, store: Arc<dyn DocumentStore>) -> Self {
        let jwt = JwtService::new(JwtConfig::from(&config));
        Self {
            config: Arc::new(config),
            store,
            jwt: Arc::new(jwt),
        }
    }

    pub fn lifecycle(&self) -> DispatchLifecycle {
        DispatchLifecycle::new(self.store.clone())
    }
}
