//! Memory manipulation steps

use crate::world::BrowserWorld;
use anyhow::{anyhow, Result};
use cucumber::gherkin::Step;
use cucumber::when;
use serde_json::Value;

/// Save a value (or resolved alias) to memory.
///
/// `When I save 'value' to memory as 'key'`
#[when(expr = "I save {string} to memory as {string}")]
async fn save_to_memory(world: &mut BrowserWorld, token: String, key: String) -> Result<()> {
    let value = world.value(&token).resolve().await?;
    world.memory.set(&key, value);
    Ok(())
}

/// Save a value under a key, `I set 'key' = 'value'` form.
#[when(expr = "I set {string} = {string}")]
async fn set_value(world: &mut BrowserWorld, key: String, token: String) -> Result<()> {
    let value = world.value(&token).resolve().await?;
    world.value(&key).set(value);
    Ok(())
}

/// Save the text of an element to memory.
///
/// `When I save text of 'Search Result' as 'firstResult'`
#[when(expr = "I save text of {string} as {string}")]
async fn save_text(world: &mut BrowserWorld, alias: String, key: String) -> Result<()> {
    let element = world.driver.element(&alias).await?;
    let text = element.inner_text().await?;
    world.memory.set(&key, Value::String(text));
    Ok(())
}

/// Save the number of elements in a collection to memory.
#[when(expr = "I save number of elements in {string} collection as {string}")]
async fn save_count(world: &mut BrowserWorld, alias: String, key: String) -> Result<()> {
    let collection = world.driver.element(&alias).await?;
    let count = collection.count().await?;
    world.memory.set(&key, Value::from(count));
    Ok(())
}

/// Save the current page url to memory.
#[when(expr = "I save current url as {string}")]
async fn save_url(world: &mut BrowserWorld, key: String) -> Result<()> {
    let url = world.driver.url().await?;
    world.memory.set(&key, Value::String(url));
    Ok(())
}

/// Save the page title to memory.
#[when(expr = "I save page title as {string}")]
async fn save_title(world: &mut BrowserWorld, key: String) -> Result<()> {
    let title = world.driver.title().await?;
    world.memory.set(&key, Value::String(title));
    Ok(())
}

/// Parse the attached doc string as JSON and save it to memory.
///
/// ```gherkin
/// When I save json to memory as 'user'
///   """
///   { "name": "alice" }
///   """
/// ```
#[when(expr = "I save json to memory as {string}")]
async fn save_json(world: &mut BrowserWorld, key: String, step: &Step) -> Result<()> {
    let raw = step
        .docstring
        .as_ref()
        .ok_or_else(|| anyhow!("step has no doc string attached"))?;
    let resolved = world.value(raw.trim()).resolve().await?;
    let value: Value = match resolved {
        Value::String(text) => serde_json::from_str(&text)?,
        already_structured => already_structured,
    };
    world.memory.set(&key, value);
    Ok(())
}
