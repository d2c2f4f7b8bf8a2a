//! Core application framework functionality.

use crate::config::{
    register_default_config_provider, ApplicationConfig, ApplicationConfigProviderPtr,
};
use crate::runner::ApplicationRunnerPtr;
use beanpod_di::container::ComponentContainer;
use beanpod_di::instance_provider::{ErrorPtr, TypedComponentInstanceProvider};
use beanpod_di::ContainerError;
use derive_more::Constructor;
use std::cmp::Reverse;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Error, Debug)]
pub enum ApplicationError {
    #[error("Error retrieving config provider: {0}")]
    ConfigInjectionError(ContainerError),
    #[error("Config error: {0}")]
    ConfigError(ErrorPtr),
    #[error("Error creating components: {0}")]
    InitializationError(ContainerError),
    #[error("Error retrieving runners: {0}")]
    RunnerInjectionError(ContainerError),
    #[error("Runner error: {0}")]
    RunnerError(ErrorPtr),
}

/// Main entrypoint for the application. Bootstraps the application and runs
/// [ApplicationRunners](crate::runner::ApplicationRunner) found in the container. The container is
/// closed when running finishes, regardless of the outcome.
#[derive(Constructor)]
pub struct Application {
    container: ComponentContainer,
}

impl Application {
    #[inline]
    pub fn container(&self) -> &ComponentContainer {
        &self.container
    }

    pub fn run(&mut self) -> Result<(), ApplicationError> {
        let result = self.config().and_then(|config| {
            if config.install_tracing_logger {
                let filter = EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
                let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

                tracing::subscriber::with_default(subscriber, || self.run_with_config(&config))
            } else {
                self.run_with_config(&config)
            }
        });

        self.container.close();
        result
    }

    fn config(&self) -> Result<ApplicationConfig, ApplicationError> {
        let provider = self
            .container
            .instance_typed::<ApplicationConfigProviderPtr>()
            .map_err(ApplicationError::ConfigInjectionError)?;

        provider
            .config()
            .cloned()
            .map_err(ApplicationError::ConfigError)
    }

    fn run_with_config(&self, config: &ApplicationConfig) -> Result<(), ApplicationError> {
        if config.eager_initialization {
            info!("Creating all components...");

            self.container
                .instantiate_all()
                .map_err(ApplicationError::InitializationError)?;
        }

        info!("Searching for application runners...");

        let mut runners = self
            .container
            .instances_typed::<ApplicationRunnerPtr>()
            .map_err(ApplicationError::RunnerInjectionError)?;

        runners.sort_by_key(|runner| Reverse(runner.priority()));

        info!("Running application runners...");

        for runner in &runners {
            runner.run().map_err(ApplicationError::RunnerError)?;
        }

        Ok(())
    }
}

/// Creates an [Application] for given container, registering the default
/// [ApplicationConfigProvider](crate::config::ApplicationConfigProvider) if no other is present.
pub fn create_default(container: ComponentContainer) -> Result<Application, ContainerError> {
    register_default_config_provider(&container)?;
    Ok(Application::new(container))
}

#[cfg(test)]
mod tests {
    use crate::application::{create_default, Application, ApplicationError};
    use crate::config::{
        ApplicationConfig, ApplicationConfigProvider, ApplicationConfigProviderPtr,
        DefaultApplicationConfigProvider,
    };
    use crate::runner::{ApplicationRunnerPtr, MockApplicationRunner};
    use beanpod_di::component::{Component, TypeDescriptor};
    use beanpod_di::component_registry::{ComponentAlias, ComponentDefinition};
    use beanpod_di::constructor::ConstructorDefinition;
    use beanpod_di::container::ComponentContainer;
    use beanpod_di::instance_provider::{
        CastFunction, ComponentInstanceAnyPtr, ComponentInstancePtr, ErrorPtr,
        TypedComponentInstanceProvider,
    };
    use beanpod_di::{component_alias, Component, ContainerError};
    use std::any::Any;
    use std::sync::{Arc, Mutex};

    type RunLog = Arc<Mutex<Vec<&'static str>>>;

    #[derive(Component)]
    #[component(aliases = ["dyn ApplicationConfigProvider + Send + Sync"])]
    struct TestConfigProvider {
        #[component(default)]
        config: ApplicationConfig,
    }

    #[component_alias]
    impl ApplicationConfigProvider for TestConfigProvider {
        fn config(&self) -> Result<&ApplicationConfig, ErrorPtr> {
            Ok(&self.config)
        }
    }

    fn mock_cast(
        instance: ComponentInstanceAnyPtr,
    ) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
        instance.downcast::<MockApplicationRunner>().map(|p| Box::new(p) as Box<dyn Any>)
    }

    fn mock_runner_cast(
        instance: ComponentInstanceAnyPtr,
    ) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
        instance
            .downcast::<MockApplicationRunner>()
            .map(|p| Box::new(p as ComponentInstancePtr<ApplicationRunnerPtr>) as Box<dyn Any>)
    }

    fn test_error() -> ErrorPtr {
        Arc::new(ContainerError::NoComponentOfType("test")) as ErrorPtr
    }

    fn register_config(container: &ComponentContainer, config: ApplicationConfig) {
        container
            .register_definition(
                ComponentDefinition::new(
                    "config".to_string(),
                    ComponentAlias::of::<TestConfigProvider, TestConfigProvider>(),
                    TestConfigProvider::aliases(),
                    vec![ConstructorDefinition::parameterless(move || {
                        Ok(TestConfigProvider {
                            config: config.clone(),
                        })
                    })],
                )
                .unwrap(),
            )
            .unwrap();
    }

    fn quiet_config() -> ApplicationConfig {
        ApplicationConfig {
            install_tracing_logger: false,
            ..Default::default()
        }
    }

    fn register_runner(
        container: &ComponentContainer,
        name: &'static str,
        priority: i8,
        result: Result<(), ErrorPtr>,
        log: &RunLog,
    ) {
        let log = log.clone();
        container
            .register_definition(
                ComponentDefinition::new(
                    name.to_string(),
                    ComponentAlias {
                        provided_type: TypeDescriptor::of::<MockApplicationRunner>(),
                        cast: mock_cast as CastFunction,
                    },
                    vec![ComponentAlias {
                        provided_type: TypeDescriptor::of::<ApplicationRunnerPtr>(),
                        cast: mock_runner_cast as CastFunction,
                    }],
                    vec![ConstructorDefinition::parameterless(move || {
                        let log = log.clone();
                        let result = result.clone();

                        let mut runner = MockApplicationRunner::new();
                        runner.expect_priority().return_const(priority);
                        runner.expect_run().returning(move || {
                            log.lock().unwrap().push(name);
                            result.clone()
                        });

                        Ok(runner)
                    })],
                )
                .unwrap(),
            )
            .unwrap();
    }

    #[test]
    fn should_run_runners_by_priority() {
        let log = RunLog::default();
        let container = ComponentContainer::new();
        register_config(&container, quiet_config());
        register_runner(&container, "first", 0, Ok(()), &log);
        register_runner(&container, "important", 5, Ok(()), &log);
        register_runner(&container, "second", 0, Ok(()), &log);
        register_runner(&container, "last", i8::MIN, Ok(()), &log);

        let mut application = Application::new(container);
        application.run().unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            ["important", "first", "second", "last"]
        );
        assert!(application.container().is_closed());
    }

    #[test]
    fn should_return_runner_error_and_close() {
        let log = RunLog::default();
        let container = ComponentContainer::new();
        register_config(&container, quiet_config());
        register_runner(&container, "failing", 1, Err(test_error()), &log);
        register_runner(&container, "skipped", 0, Ok(()), &log);

        let mut application = Application::new(container);
        assert!(matches!(
            application.run().unwrap_err(),
            ApplicationError::RunnerError(_)
        ));
        assert_eq!(*log.lock().unwrap(), ["failing"]);
        assert!(application.container().is_closed());
    }

    #[test]
    fn should_return_config_injection_error() {
        let mut application = Application::new(ComponentContainer::new());
        assert!(matches!(
            application.run().unwrap_err(),
            ApplicationError::ConfigInjectionError(ContainerError::NoComponentOfType(_))
        ));
        assert!(application.container().is_closed());
    }

    #[test]
    fn should_return_runner_injection_error() {
        let container = ComponentContainer::new();
        register_config(&container, quiet_config());
        container
            .register_definition(
                ComponentDefinition::new(
                    "broken".to_string(),
                    ComponentAlias {
                        provided_type: TypeDescriptor::of::<MockApplicationRunner>(),
                        cast: mock_cast as CastFunction,
                    },
                    vec![ComponentAlias {
                        provided_type: TypeDescriptor::of::<ApplicationRunnerPtr>(),
                        cast: mock_runner_cast as CastFunction,
                    }],
                    vec![ConstructorDefinition::parameterless(
                        || -> Result<MockApplicationRunner, ErrorPtr> { Err(test_error()) },
                    )],
                )
                .unwrap(),
            )
            .unwrap();

        let mut application = Application::new(container);
        assert!(matches!(
            application.run().unwrap_err(),
            ApplicationError::RunnerInjectionError(ContainerError::Construction { .. })
        ));
    }

    #[test]
    fn should_instantiate_eagerly() {
        let container = ComponentContainer::new();
        register_config(
            &container,
            ApplicationConfig {
                eager_initialization: true,
                ..quiet_config()
            },
        );
        container
            .register_definition(
                ComponentDefinition::new(
                    "broken".to_string(),
                    ComponentAlias::of::<TestConfigProvider, TestConfigProvider>(),
                    vec![],
                    vec![ConstructorDefinition::parameterless(
                        || -> Result<TestConfigProvider, ErrorPtr> { Err(test_error()) },
                    )],
                )
                .unwrap(),
            )
            .unwrap();

        let mut application = Application::new(container);
        assert!(matches!(
            application.run().unwrap_err(),
            ApplicationError::InitializationError(ContainerError::Construction { .. })
        ));
    }

    #[test]
    fn should_run_with_installed_logger() {
        let log = RunLog::default();
        let container = ComponentContainer::new();
        register_config(
            &container,
            ApplicationConfig {
                log_filter: "debug".to_string(),
                ..Default::default()
            },
        );
        register_runner(&container, "runner", 0, Ok(()), &log);

        let mut application = Application::new(container);
        application.run().unwrap();
        assert_eq!(*log.lock().unwrap(), ["runner"]);
    }

    #[test]
    fn should_keep_registered_config_provider() {
        let container = ComponentContainer::new();
        container.register::<TestConfigProvider>().unwrap();

        let application = create_default(container).unwrap();
        assert!(!application
            .container()
            .is_registered::<DefaultApplicationConfigProvider>());

        let provider = application
            .container()
            .instance_typed::<ApplicationConfigProviderPtr>()
            .unwrap();
        assert!(provider.config().unwrap().install_tracing_logger);
    }

    #[test]
    fn should_register_default_config_provider() {
        let application = create_default(ComponentContainer::new()).unwrap();
        assert!(application
            .container()
            .is_registered::<ApplicationConfigProviderPtr>());
    }
}
