use beanpod_di::container::ComponentContainer;
use beanpod_di::instance_provider::{ComponentInstancePtr, TypedComponentInstanceProvider};
use beanpod_di::{component_alias, injectable, Component};

// this is a trait we would like to use in our component
#[injectable]
trait Greeter {
    fn greet(&self);
}

// this is a dependency which implements the above trait and also is an injectable component; the
// alias tells the container it can be injected as dyn Greeter
#[derive(Component)]
#[component(aliases = ["dyn Greeter + Send + Sync"])]
struct EnglishGreeter;

// generates the cast from EnglishGreeter to dyn Greeter
#[component_alias]
impl Greeter for EnglishGreeter {
    fn greet(&self) {
        println!("Hello world!");
    }
}

// this is another component, but with a dependency
#[derive(Component)]
struct Reception {
    // the container will know how to inject dyn Greeter, when asked for Reception
    greeter: ComponentInstancePtr<dyn Greeter + Send + Sync>,
    // alternatively, you can inject the concrete type
    // greeter: ComponentInstancePtr<EnglishGreeter>,
}

impl Reception {
    fn welcome(&self) {
        self.greeter.greet();
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    // components need to be registered before they can be created; registration order doesn't
    // matter, since instances are only created when requested
    let container = ComponentContainer::new();
    container
        .register::<Reception>()
        .expect("error registering Reception");
    container
        .register::<EnglishGreeter>()
        .expect("error registering EnglishGreeter");

    let reception = container
        .instance_typed::<Reception>()
        .expect("error creating Reception");

    // prints "Hello world!"
    reception.welcome();

    // drops all instances; the container cannot be used afterwards
    container.close();
}
