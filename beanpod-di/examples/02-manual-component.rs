// note: this example assumes you've analyzed the previous ones

use beanpod_di::component::{Component, Injectable, TypeDescriptor};
use beanpod_di::constructor::ConstructorDefinition;
use beanpod_di::container::ComponentContainer;
use beanpod_di::instance_provider::{ComponentInstancePtr, TypedComponentInstanceProvider};
use beanpod_di::Component;

#[derive(Component)]
struct Clock;

impl Clock {
    fn now(&self) -> u64 {
        42
    }
}

struct Report {
    timestamp: u64,
}

impl Injectable for Report {}

// the derive macro is a convenience: implementing Component by hand gives full control over the
// available constructors
impl Component for Report {
    fn constructors() -> Vec<ConstructorDefinition> {
        vec![
            // when there are several constructors, the container uses the only one with
            // parameters; more than one such constructor makes the registration fail
            ConstructorDefinition::parameterless(|| Ok(Report { timestamp: 0 })),
            ConstructorDefinition::new(vec![TypeDescriptor::of::<Clock>()], |arguments| {
                let clock: ComponentInstancePtr<Clock> = arguments.take()?;
                Ok(Report {
                    timestamp: clock.now(),
                })
            }),
        ]
    }
}

fn main() {
    let container = ComponentContainer::new();
    container
        .register::<Clock>()
        .expect("error registering Clock");

    // the same type can be registered multiple times under different names
    container
        .register_named::<Report>("daily")
        .expect("error registering daily Report");
    container
        .register_named::<Report>("weekly")
        .expect("error registering weekly Report");

    let report = container
        .instance_by_name_typed::<Report>("daily")
        .expect("error creating Report");

    // prints "Report created at 42"
    println!("Report created at {}", report.timestamp);
}
