//! Validation steps
//!
//! Element-backed validations poll with the default budget; plain value
//! comparisons assert once. Phrases with a `softly` marker record failures
//! into the world's soft sink instead of failing the step.

use crate::param::{State, Validation};
use crate::world::BrowserWorld;
use anyhow::Result;
use cucumber::then;
use serde_json::Value;
use stepwright_engine::{expect_condition, expect_value, PollOptions};

/// Verify an element condition.
///
/// `Then I expect 'Header' to be visible`
#[then(expr = "I expect {string} {state}")]
async fn expect_element_state(world: &mut BrowserWorld, alias: String, state: State) -> Result<()> {
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

/// Verify that the text of an element satisfies a validation.
///
/// `Then I expect text of 'Search Result' to contain 'rust'`
#[then(expr = "I expect text of {string} {validation} {string}")]
async fn expect_text(
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

/// Verify that the value of an input element satisfies a validation.
#[then(expr = "I expect value of {string} {validation} {string}")]
async fn expect_input_value(
    world: &mut BrowserWorld,
    alias: String,
    validation: Validation,
    expected: String,
) -> Result<()> {
    let expected = world.value(&expected).resolve().await?;
    let element = world.driver.element(&alias).await?;
    expect_value(
        || async { Ok(Value::String(element.input_value().await?)) },
        &expected,
        &validation.0,
        Some(&PollOptions::default()),
        &world.soft,
    )
    .await?;
    Ok(())
}

/// Verify the size of a collection.
///
/// `Then I expect number of elements in 'Search Results' collection to be above '2'`
#[then(expr = "I expect number of elements in {string} collection {validation} {string}")]
async fn expect_collection_count(
    world: &mut BrowserWorld,
    alias: String,
    validation: Validation,
    expected: String,
) -> Result<()> {
    let expected = world.value(&expected).resolve().await?;
    let collection = world.driver.element(&alias).await?;
    expect_value(
        || async { Ok(Value::from(collection.count().await?)) },
        &expected,
        &validation.0,
        Some(&PollOptions::default()),
        &world.soft,
    )
    .await?;
    Ok(())
}

/// Verify the page title.
#[then(expr = "I expect page title {validation} {string}")]
async fn expect_title(
    world: &mut BrowserWorld,
    validation: Validation,
    expected: String,
) -> Result<()> {
    let expected = world.value(&expected).resolve().await?;
    let driver = world.driver.clone();
    expect_value(
        || async { Ok(Value::String(driver.title().await?)) },
        &expected,
        &validation.0,
        Some(&PollOptions::default()),
        &world.soft,
    )
    .await?;
    Ok(())
}

/// Verify the current url.
#[then(expr = "I expect current url {validation} {string}")]
async fn expect_url(
    world: &mut BrowserWorld,
    validation: Validation,
    expected: String,
) -> Result<()> {
    let expected = world.value(&expected).resolve().await?;
    let driver = world.driver.clone();
    expect_value(
        || async { Ok(Value::String(driver.url().await?)) },
        &expected,
        &validation.0,
        Some(&PollOptions::default()),
        &world.soft,
    )
    .await?;
    Ok(())
}

/// Compare two values, each a literal or a memory reference; no polling.
///
/// `Then I expect '$total' to be above '41'`
#[then(expr = "I expect {string} {validation} {string}")]
async fn expect_plain(
    world: &mut BrowserWorld,
    actual: String,
    validation: Validation,
    expected: String,
) -> Result<()> {
    let expected = world.value(&expected).resolve().await?;
    let actual = world.value(&actual);
    expect_value(|| actual.resolve(), &expected, &validation.0, None, &world.soft).await?;
    Ok(())
}
