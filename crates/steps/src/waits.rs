//! Wait steps

use crate::param::{State, Validation};
use crate::world::BrowserWorld;
use anyhow::Result;
use cucumber::when;
use serde_json::Value;
use std::time::Duration;
use stepwright_engine::{expect_condition, expect_value, PollOptions};

/// Explicit wait.
///
/// `When I wait 1000 ms`
#[when(expr = "I wait {int} ms")]
async fn wait_ms(_world: &mut BrowserWorld, ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Wait until an element reaches a state.
///
/// `When I wait until 'Spinner' to be invisible`
#[when(expr = "I wait until {string} {state}")]
async fn wait_until_state(world: &mut BrowserWorld, alias: String, state: State) -> Result<()> {
    let element = world.driver.element(&alias).await?;
    expect_condition(
        element.as_ref(),
        &state.0,
        Some(&PollOptions::default()),
        &world.soft,
    )
    .await?;
    Ok(())
}

/// Wait until the text of an element satisfies a validation.
///
/// `When I wait until text of 'Order Status' to equal 'Processing'`
#[when(expr = "I wait until text of {string} {validation} {string}")]
async fn wait_until_text(
    world: &mut BrowserWorld,
    alias: String,
    validation: Validation,
    expected: String,
) -> Result<()> {
    let expected = world.value(&expected).resolve().await?;
    let element = world.driver.element(&alias).await?;
    expect_value(
        || async { Ok(Value::String(element.inner_text().await?)) },
        &expected,
        &validation.0,
        Some(&PollOptions::default()),
        &world.soft,
    )
    .await?;
    Ok(())
}
