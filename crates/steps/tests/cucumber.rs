//! Cucumber harness entry point
//!
//! Runs the feature files under `tests/features` against a scripted stub
//! driver standing in for the real automation layer. Run with:
//! `cargo test --package stepwright-steps --test cucumber`

use async_trait::async_trait;
use cucumber::World as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use stepwright_engine::{ElementState, Error, Result};
use stepwright_steps::{register_driver, BrowserWorld, Driver, Element};

/// One scripted element: fixed probe states plus text that settles after a
/// number of reads.
#[derive(Debug)]
struct StubElement {
    attached: bool,
    visible: bool,
    in_viewport: bool,
    enabled: bool,
    count: usize,
    initial_text: &'static str,
    settled_text: &'static str,
    settle_after: u64,
    reads: AtomicU64,
}

impl StubElement {
    fn visible(text: &'static str) -> Self {
        Self {
            attached: true,
            visible: true,
            in_viewport: true,
            enabled: true,
            count: 1,
            initial_text: text,
            settled_text: text,
            settle_after: 0,
            reads: AtomicU64::new(0),
        }
    }

    fn hidden() -> Self {
        Self {
            visible: false,
            in_viewport: false,
            ..Self::visible("")
        }
    }

    fn disabled(text: &'static str) -> Self {
        Self {
            enabled: false,
            ..Self::visible(text)
        }
    }

    fn detached() -> Self {
        Self {
            attached: false,
            ..Self::hidden()
        }
    }

    fn collection(count: usize) -> Self {
        Self {
            count,
            ..Self::visible("")
        }
    }

    /// Text reads `initial` until `settle_after` reads happened, then
    /// `settled` from there on.
    fn settling(initial: &'static str, settled: &'static str, settle_after: u64) -> Self {
        Self {
            initial_text: initial,
            settled_text: settled,
            settle_after,
            ..Self::visible(initial)
        }
    }
}

#[async_trait]
impl ElementState for StubElement {
    async fn is_attached(&self) -> Result<bool> {
        Ok(self.attached)
    }

    async fn is_visible(&self) -> Result<bool> {
        Ok(self.visible)
    }

    async fn is_in_viewport(&self) -> Result<bool> {
        Ok(self.in_viewport)
    }

    async fn is_enabled(&self) -> Result<bool> {
        Ok(self.enabled)
    }
}

#[async_trait]
impl Element for StubElement {
    async fn inner_text(&self) -> Result<String> {
        if !self.attached {
            return Err(Error::Driver("element is detached".to_string()));
        }
        let reads = self.reads.fetch_add(1, Ordering::SeqCst);
        let text = if reads < self.settle_after {
            self.initial_text
        } else {
            self.settled_text
        };
        Ok(text.to_string())
    }

    async fn input_value(&self) -> Result<String> {
        self.inner_text().await
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.count)
    }
}

/// Deterministic page: a handful of named elements plus a status line that
/// settles after two reads.
#[derive(Debug)]
struct StubDriver {
    order_status: Arc<StubElement>,
}

impl StubDriver {
    fn new() -> Self {
        Self {
            order_status: Arc::new(StubElement::settling("loading", "done", 2)),
        }
    }
}

#[async_trait]
impl Driver for StubDriver {
    async fn element(&self, alias: &str) -> Result<Arc<dyn Element>> {
        Ok(match alias {
            "Title" => Arc::new(StubElement::visible("Welcome to Stepwright")),
            "Username Input" => Arc::new(StubElement::visible("alice")),
            "Spinner" => Arc::new(StubElement::hidden()),
            "Submit Button" => Arc::new(StubElement::disabled("Submit")),
            "Search Results" => Arc::new(StubElement::collection(3)),
            "Order Status" => self.order_status.clone(),
            _ => Arc::new(StubElement::detached()),
        })
    }

    async fn title(&self) -> Result<String> {
        Ok("Stub Page".to_string())
    }

    async fn url(&self) -> Result<String> {
        Ok("https://example.test/dashboard".to_string())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    register_driver(|| Arc::new(StubDriver::new()));

    BrowserWorld::cucumber()
        .after(|_feature, _rule, _scenario, _finished, world| {
            Box::pin(async move {
                // soft failures recorded during the scenario surface here
                if let Some(world) = world {
                    if let Err(err) = world.soft.flush() {
                        panic!("{err}");
                    }
                }
            })
        })
        .run_and_exit("tests/features")
        .await;
}
