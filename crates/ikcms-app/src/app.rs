//! Application bootstrap
//!
//! An [`AppDefinition`] names the components to create, the handler and the
//! root schema. [`App::new`] builds them once; [`App::handle`] gives every
//! request its own copy of the component [`Environment`].

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::handler::Handler;
use crate::logging;
use ikcms_components::{CacheComponent, Component, Environment};
use ikcms_forms::{Field, SchemaResult};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Creates one component from the application configuration
pub type ComponentFactory = fn(&AppConfig) -> AppResult<Arc<dyn Component>>;

/// Factory for the in-process [`CacheComponent`]
pub fn cache_component(config: &AppConfig) -> AppResult<Arc<dyn Component>> {
    Ok(Arc::new(CacheComponent::create(&config.cache)))
}

/// What an application is made of
pub trait AppDefinition {
    /// Component factories, run in order
    fn components(&self) -> Vec<ComponentFactory> {
        Vec::new()
    }

    /// Request handler
    fn handler(&self) -> Box<dyn Handler>;

    /// Root schema requests are converted with
    ///
    /// # Errors
    /// Any [`ikcms_forms::SchemaError`] from building the schema.
    fn root(&self) -> SchemaResult<Field>;
}

/// Assembled application
pub struct App {
    config: AppConfig,
    components: Vec<Arc<dyn Component>>,
    env: Environment,
    handler: Box<dyn Handler>,
    root: Field,
}

impl App {
    /// Set up logging, create components and build the root schema
    ///
    /// # Errors
    /// - [`crate::AppError::Component`] when two components share a name
    /// - [`crate::AppError::Schema`] when the root schema is invalid
    /// - whatever a component factory returns
    pub fn new(config: AppConfig, definition: &dyn AppDefinition) -> AppResult<Self> {
        if !logging::init(&config.logging) {
            debug!("log subscriber already installed");
        }

        let mut components = Vec::new();
        for factory in definition.components() {
            let component = factory(&config)?;
            debug!(component = component.name(), "component created");
            components.push(component);
        }

        let mut env = Environment::new();
        for component in &components {
            env.register(Arc::clone(component))?;
        }

        let handler = definition.handler();
        let root = definition.root()?;

        info!(
            components = components.len(),
            root = root.label(),
            "application ready"
        );

        Ok(Self {
            config,
            components,
            env,
            handler,
            root,
        })
    }

    /// Configuration the app was built with
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Components in creation order
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[Arc<dyn Component>] {
        &self.components
    }

    /// Root schema
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Field {
        &self.root
    }

    /// Fresh per-request environment; components are shared
    #[inline]
    #[must_use]
    pub fn env(&self) -> Environment {
        self.env.clone()
    }

    /// Handle one decoded request
    ///
    /// # Errors
    /// Whatever the handler returns; validation failures carry the
    /// aggregated error (see [`crate::AppError::validation`]).
    pub fn handle(&self, request: &Value) -> AppResult<Value> {
        let env = self.env();
        let result = self.handler.handle(&env, &self.root, request);
        if let Err(e) = &result {
            debug!(error = %e, "request rejected");
        }
        result
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("components", &self.env.names().collect::<Vec<_>>())
            .field("root", &self.root.label())
            .finish_non_exhaustive()
    }
}
