//! Framework configuration is based on injecting an [ApplicationConfigProvider], which can later
//! be used to retrieve [ApplicationConfig]. [Application](crate::application::Application) uses
//! this config to configure itself, but it can also be injected into any other component.
//!
//! By default, the config is created with opinionated default values, which can then be overwritten
//! by environment variables prefixed with `BEANPOD_` or `beanpod.json` file.

use beanpod_di::container::ComponentContainer;
use beanpod_di::instance_provider::ErrorPtr;
use beanpod_di::{component_alias, injectable, Component, ContainerError};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::error::Error;
use std::sync::Arc;
use tracing::debug;

const CONFIG_ENV_PREFIX: &str = "BEANPOD";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "beanpod.json";

fn convert_error<E: Error + Send + Sync + 'static>(error: E) -> ErrorPtr {
    Arc::new(error) as ErrorPtr
}

/// Framework configuration which can be provided by an [ApplicationConfigProvider].
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct ApplicationConfig {
    /// Should a default tracing logger be installed in the scope of the application.
    pub install_tracing_logger: bool,
    /// Default filter directives for the installed logger, used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Should all components be created before running any runner.
    pub eager_initialization: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            install_tracing_logger: true,
            log_filter: "info".to_string(),
            eager_initialization: false,
        }
    }
}

impl From<OptionalApplicationConfig> for ApplicationConfig {
    fn from(value: OptionalApplicationConfig) -> Self {
        let default = Self::default();
        Self {
            install_tracing_logger: value
                .install_tracing_logger
                .unwrap_or(default.install_tracing_logger),
            log_filter: value.log_filter.unwrap_or(default.log_filter),
            eager_initialization: value
                .eager_initialization
                .unwrap_or(default.eager_initialization),
        }
    }
}

impl ApplicationConfig {
    fn init_from_environment() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX))
            .build()
            .and_then(|config| config.try_deserialize::<OptionalApplicationConfig>())
            .map(|config| config.into())
    }
}

/// Provider for [ApplicationConfig]. The single registered provider will be used to retrieve
/// application configuration.
#[injectable]
pub trait ApplicationConfigProvider {
    fn config(&self) -> Result<&ApplicationConfig, ErrorPtr>;
}

pub type ApplicationConfigProviderPtr = dyn ApplicationConfigProvider + Send + Sync;

#[derive(Component)]
#[component(
    constructor = "DefaultApplicationConfigProvider::new",
    aliases = ["dyn ApplicationConfigProvider + Send + Sync"]
)]
pub(crate) struct DefaultApplicationConfigProvider {
    // cached init result
    #[component(ignore)]
    config: Result<ApplicationConfig, ErrorPtr>,
}

impl DefaultApplicationConfigProvider {
    fn new() -> Result<Self, ErrorPtr> {
        Ok(Self {
            config: ApplicationConfig::init_from_environment().map_err(convert_error),
        })
    }
}

#[component_alias]
impl ApplicationConfigProvider for DefaultApplicationConfigProvider {
    fn config(&self) -> Result<&ApplicationConfig, ErrorPtr> {
        match &self.config {
            Ok(config) => Ok(config),
            Err(error) => Err(error.clone()),
        }
    }
}

/// Registers the environment-based provider, unless some other provider is already registered.
pub(crate) fn register_default_config_provider(
    container: &ComponentContainer,
) -> Result<(), ContainerError> {
    if container.is_registered::<ApplicationConfigProviderPtr>() {
        return Ok(());
    }

    debug!("Registering default application config provider.");
    container.register::<DefaultApplicationConfigProvider>()
}

#[derive(Deserialize)]
struct OptionalApplicationConfig {
    install_tracing_logger: Option<bool>,
    log_filter: Option<String>,
    eager_initialization: Option<bool>,
}
