use beanpod::application;
use beanpod::runner::ApplicationRunner;
use beanpod_di::container::ComponentContainer;
use beanpod_di::instance_provider::ErrorPtr;
use beanpod_di::{component_alias, Component};

// this is an application runner, which will run when the application starts; the application
// finds it by asking the container for everything provided as dyn ApplicationRunner
#[derive(Component)]
#[component(aliases = ["dyn ApplicationRunner + Send + Sync"])]
struct HelloWorldRunner;

#[component_alias]
impl ApplicationRunner for HelloWorldRunner {
    fn run(&self) -> Result<(), ErrorPtr> {
        println!("Hello world!");
        Ok(())
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    let container = ComponentContainer::new();
    container
        .register::<HelloWorldRunner>()
        .expect("unable to register runner");

    // create our application, which will use the default config provider
    let mut application =
        application::create_default(container).expect("unable to create default application");

    // prints "Hello world!"
    application.run().expect("error running application");
}
