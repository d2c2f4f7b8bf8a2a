// note: this example assumes you've analyzed the previous one

use beanpod_di::container::ComponentContainer;
use beanpod_di::instance_provider::{ComponentInstancePtr, TypedComponentInstanceProvider};
use beanpod_di::{component_alias, injectable, Component};

#[injectable]
trait Greeter {
    fn greet(&self);
}

#[derive(Component)]
#[component(aliases = ["dyn Greeter + Send + Sync"])]
struct EnglishGreeter;

#[component_alias]
impl Greeter for EnglishGreeter {
    fn greet(&self) {
        println!("Hello world!");
    }
}

// components have names which can be used to request a specific one; if not specified, the
// fully-qualified type name is used
#[derive(Component)]
#[component(name = "polish", aliases = ["dyn Greeter + Send + Sync"])]
struct PolishGreeter;

#[component_alias]
impl Greeter for PolishGreeter {
    fn greet(&self) {
        println!("Witaj świecie!");
    }
}

// since there are several candidates implementing dyn Greeter, the container cannot decide which
// one to inject here, so creating this component fails
#[derive(Component)]
struct Reception {
    _greeter: ComponentInstancePtr<dyn Greeter + Send + Sync>,
}

fn main() {
    let container = ComponentContainer::new();
    container
        .register::<EnglishGreeter>()
        .expect("error registering EnglishGreeter");
    container
        .register::<PolishGreeter>()
        .expect("error registering PolishGreeter");
    container
        .register::<Reception>()
        .expect("error registering Reception");

    // a specific instance can always be requested by name
    let greeter = container
        .instance_by_name_typed::<dyn Greeter + Send + Sync>("polish")
        .expect("error creating PolishGreeter");

    // prints "Witaj świecie!"
    greeter.greet();

    // all candidates can be requested at once, in registration order
    let greeters = container
        .instances_typed::<dyn Greeter + Send + Sync>()
        .expect("error creating greeters");

    // prints "Hello world!" "Witaj świecie!"
    for greeter in &greeters {
        greeter.greet();
    }

    // prints the ambiguity error along with candidate names
    if let Err(error) = container.instance_typed::<Reception>() {
        println!("{error}");
    }
}
