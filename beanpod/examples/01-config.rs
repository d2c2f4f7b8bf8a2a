// note: this example assumes you've analyzed the previous one

use beanpod::application;
use beanpod::config::{ApplicationConfig, ApplicationConfigProvider};
use beanpod::runner::ApplicationRunner;
use beanpod_di::container::ComponentContainer;
use beanpod_di::instance_provider::{ComponentInstancePtr, ErrorPtr};
use beanpod_di::{component_alias, Component};

// application config is provided by an ApplicationConfigProvider, which by default, uses
// environment variables and a configuration file (see module documentation)
// to provide your own, register a component implementing this trait before creating the
// application, and it will be used instead of the default one
#[derive(Component)]
#[component(
    constructor = "MyApplicationConfigProvider::new",
    aliases = ["dyn ApplicationConfigProvider + Send + Sync"]
)]
struct MyApplicationConfigProvider {
    // this is the cached custom config
    #[component(ignore)]
    config: ApplicationConfig,
}

impl MyApplicationConfigProvider {
    // using a custom constructor allows for caching the config for later use
    fn new() -> Result<Self, ErrorPtr> {
        // start with a default config and override what's needed
        let mut config = ApplicationConfig::default();
        config.install_tracing_logger = false;

        Ok(Self { config })
    }
}

#[component_alias]
impl ApplicationConfigProvider for MyApplicationConfigProvider {
    fn config(&self) -> Result<&ApplicationConfig, ErrorPtr> {
        Ok(&self.config)
    }
}

// this simple component will simply print a part of application config to prove everything works
#[derive(Component)]
#[component(aliases = ["dyn ApplicationRunner + Send + Sync"])]
struct ConfigPrinterRunner {
    application_config_provider: ComponentInstancePtr<dyn ApplicationConfigProvider + Send + Sync>,
}

#[component_alias]
impl ApplicationRunner for ConfigPrinterRunner {
    fn run(&self) -> Result<(), ErrorPtr> {
        let config = self.application_config_provider.config()?;
        println!("Using built-in logger: {}", config.install_tracing_logger);
        Ok(())
    }
}

fn main() {
    let container = ComponentContainer::new();
    container
        .register::<MyApplicationConfigProvider>()
        .expect("unable to register config provider");
    container
        .register::<ConfigPrinterRunner>()
        .expect("unable to register runner");

    let mut application =
        application::create_default(container).expect("unable to create default application");

    // prints "Using built-in logger: false"
    application.run().expect("error running application");
}
