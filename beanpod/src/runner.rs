//! Runners executing actual application logic.

use beanpod_di::injectable;
pub use beanpod_di::instance_provider::ErrorPtr;
#[cfg(test)]
use mockall::automock;

pub type ApplicationRunnerPtr = dyn ApplicationRunner + Send + Sync;

/// A unit of application logic, registered in the container with an [ApplicationRunnerPtr] alias.
///
/// [Application::run](crate::application::Application::run) calls every runner one after another
/// on the calling thread, highest [priority](ApplicationRunner::priority) first. Runners sharing a
/// priority keep their registration order. The first runner error stops the run and the remaining
/// runners are skipped.
#[injectable]
#[cfg_attr(test, automock)]
pub trait ApplicationRunner {
    fn run(&self) -> Result<(), ErrorPtr>;

    /// Defaults to 0.
    fn priority(&self) -> i8 {
        0
    }
}
