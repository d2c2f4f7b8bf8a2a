// note: this example assumes you've analyzed the previous one

use beanpod::application;
use beanpod::runner::ApplicationRunner;
use beanpod_di::container::ComponentContainer;
use beanpod_di::instance_provider::ErrorPtr;
use beanpod_di::{component_alias, Component};

#[derive(Component)]
#[component(aliases = ["dyn ApplicationRunner + Send + Sync"])]
struct PrintHelloRunner;

#[component_alias]
impl ApplicationRunner for PrintHelloRunner {
    fn run(&self) -> Result<(), ErrorPtr> {
        print!("Hello ");
        Ok(())
    }

    // for ordered execution of application runners, priorities can be used
    fn priority(&self) -> i8 {
        3
    }
}

#[derive(Component)]
#[component(aliases = ["dyn ApplicationRunner + Send + Sync"])]
struct PrintWorldRunner;

#[component_alias]
impl ApplicationRunner for PrintWorldRunner {
    fn run(&self) -> Result<(), ErrorPtr> {
        print!("world");
        Ok(())
    }

    fn priority(&self) -> i8 {
        2
    }
}

// runners with equal priorities run in registration order
#[derive(Component)]
#[component(aliases = ["dyn ApplicationRunner + Send + Sync"])]
struct PrintExclamationRunner;

#[component_alias]
impl ApplicationRunner for PrintExclamationRunner {
    fn run(&self) -> Result<(), ErrorPtr> {
        println!("!");
        Ok(())
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    let container = ComponentContainer::new();

    // registration order doesn't matter when priorities differ
    container
        .register::<PrintExclamationRunner>()
        .expect("unable to register runner");
    container
        .register::<PrintWorldRunner>()
        .expect("unable to register runner");
    container
        .register::<PrintHelloRunner>()
        .expect("unable to register runner");

    let mut application =
        application::create_default(container).expect("unable to create default application");

    // prints "Hello world!"
    application.run().expect("error running application");
}
