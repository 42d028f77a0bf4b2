//! Stepwright Step Definitions
//!
//! Binds Gherkin phrases to the validation engine and a narrow browser
//! driver interface. The catalog covers memory manipulation, value and
//! element validations, and polling waits; the browser itself is supplied
//! by the embedding project through [`register_driver`].
//!
//! Typical harness:
//!
//! ```no_run
//! use cucumber::World as _;
//! use std::sync::Arc;
//! use stepwright_steps::{register_driver, BrowserWorld, NullDriver};
//!
//! #[tokio::main]
//! async fn main() {
//!     register_driver(|| Arc::new(NullDriver));
//!     BrowserWorld::run("tests/features").await;
//! }
//! ```

pub mod driver;
pub mod memory;
pub mod param;
pub mod validations;
pub mod waits;
pub mod world;

pub use driver::{register_driver, Driver, Element, NullDriver};
pub use param::{State, Validation};
pub use world::BrowserWorld;
