//! Browser driver interface
//!
//! The step catalog drives the browser through this narrow surface; the
//! actual automation layer lives in the embedding project and is installed
//! once per process through [`register_driver`].

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use stepwright_engine::{ElementState, Error, Result};
use tracing::warn;

/// A located element or collection handle.
///
/// State probes come from [`ElementState`]; this adds the value readers the
/// step catalog needs.
#[async_trait]
pub trait Element: ElementState {
    /// Rendered text content.
    async fn inner_text(&self) -> Result<String>;

    /// Current value of an input element.
    async fn input_value(&self) -> Result<String>;

    /// Number of elements matched when the handle addresses a collection.
    async fn count(&self) -> Result<usize>;
}

/// The browser surface consumed by the step definitions.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Resolve a page-object alias to an element handle.
    async fn element(&self, alias: &str) -> Result<Arc<dyn Element>>;

    /// Current page title.
    async fn title(&self) -> Result<String>;

    /// Current page url.
    async fn url(&self) -> Result<String>;
}

type DriverFactory = Box<dyn Fn() -> Arc<dyn Driver> + Send + Sync>;

static DRIVER_FACTORY: OnceCell<DriverFactory> = OnceCell::new();

/// Install the factory that equips each scenario's world with a driver.
///
/// Call once before the cucumber run starts; later calls are ignored.
pub fn register_driver<F>(factory: F)
where
    F: Fn() -> Arc<dyn Driver> + Send + Sync + 'static,
{
    let _ = DRIVER_FACTORY.set(Box::new(factory));
}

pub(crate) fn new_driver() -> Arc<dyn Driver> {
    match DRIVER_FACTORY.get() {
        Some(factory) => factory(),
        None => {
            warn!("no driver factory registered; browser steps will fail");
            Arc::new(NullDriver)
        }
    }
}

/// Driver used when no factory is registered; every browser interaction
/// fails with a driver error, while memory-only steps keep working.
#[derive(Debug)]
pub struct NullDriver;

#[async_trait]
impl Driver for NullDriver {
    async fn element(&self, alias: &str) -> Result<Arc<dyn Element>> {
        Err(Error::Driver(format!(
            "no driver registered (resolving element '{alias}')"
        )))
    }

    async fn title(&self) -> Result<String> {
        Err(Error::Driver("no driver registered".to_string()))
    }

    async fn url(&self) -> Result<String> {
        Err(Error::Driver("no driver registered".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_driver_fails_with_the_alias() {
        let err = match NullDriver.element("Submit Button").await {
            Ok(_) => panic!("expected driver error"),
            Err(e) => e,
        };
        assert!(matches!(err, Error::Driver(msg) if msg.contains("Submit Button")));
    }
}
