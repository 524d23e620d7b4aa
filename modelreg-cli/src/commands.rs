//! Catalog browsing and update commands
//!
//! Output goes to stdout; logs go to stderr. API keys are never printed.

use anyhow::{Context, Result};
use serde_json::json;
use std::sync::Arc;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use modelreg_core::catalog::{Features, Model, Provider};
use modelreg_core::{Registry, UpdateOutcome};

const DESCRIPTION_WIDTH: usize = 50;

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    provider_type: String,
    #[tabled(rename = "Auth")]
    auth: String,
    #[tabled(rename = "Models")]
    models: usize,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Format")]
    api_format: String,
    #[tabled(rename = "Max Input")]
    max_input: String,
    #[tabled(rename = "Max Output")]
    max_output: String,
    #[tabled(rename = "Max Tokens")]
    max_tokens: String,
    #[tabled(rename = "Features")]
    features: String,
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn feature_list(features: &Features) -> String {
    let enabled: Vec<&str> = [
        ("tools", features.tool_use),
        ("thinking", features.thinking),
        ("thinking-levels", features.thinking_levels),
        ("structured", features.structured_output),
        ("audio-in", features.audio_input),
        ("image-out", features.image_output),
    ]
    .into_iter()
    .filter_map(|(name, on)| on.then_some(name))
    .collect();

    if enabled.is_empty() {
        "-".to_string()
    } else {
        enabled.join(", ")
    }
}

fn render_table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

pub fn providers_table(providers: &[Arc<Provider>]) -> String {
    let rows: Vec<ProviderRow> = providers
        .iter()
        .map(|p| ProviderRow {
            name: p.name.clone(),
            provider_type: or_dash(p.provider_type),
            auth: or_dash(p.auth_type),
            models: p.models.len(),
            description: truncate(&p.description, DESCRIPTION_WIDTH),
        })
        .collect();

    render_table(&rows)
}

pub fn providers_json(providers: &[Arc<Provider>]) -> serde_json::Value {
    providers
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "type": p.provider_type,
                "auth_type": p.auth_type,
                "api_key_set": !p.api_key.is_empty(),
                "base_url": p.base_url,
                "description": p.description,
                "models": p.models.keys().collect::<Vec<_>>(),
            })
        })
        .collect()
}

pub fn models_table(provider: &Provider) -> String {
    let rows: Vec<ModelRow> = provider
        .models
        .values()
        .map(|m| match m.chat_completion() {
            Some(chat) => ModelRow {
                name: m.name.clone(),
                api_format: or_dash(chat.api_format),
                max_input: chat.context.max_input.to_string(),
                max_output: chat.context.max_output.to_string(),
                max_tokens: chat.parameters.max_tokens.to_string(),
                features: feature_list(&chat.features),
            },
            None => ModelRow {
                name: m.name.clone(),
                api_format: "-".to_string(),
                max_input: "-".to_string(),
                max_output: "-".to_string(),
                max_tokens: "-".to_string(),
                features: "-".to_string(),
            },
        })
        .collect();

    render_table(&rows)
}

pub fn models_json(provider: &Provider) -> Result<serde_json::Value> {
    let models: Vec<&Model> = provider.models.values().collect();
    serde_json::to_value(models).context("Failed to serialize models")
}

pub fn model_yaml(model: &Model) -> Result<String> {
    serde_yaml_ng::to_string(model).context("Failed to serialize model")
}

fn require_provider(registry: &Registry, name: &str) -> Result<Arc<Provider>> {
    registry.provider(name).with_context(|| {
        format!("Unknown provider '{name}'. Run 'modelreg providers' to list providers.")
    })
}

pub fn execute_providers(registry: &Registry, json_output: bool) -> Result<()> {
    let providers = registry.list_providers();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&providers_json(&providers))?);
    } else {
        println!("{}", providers_table(&providers));
    }

    Ok(())
}

pub fn execute_models(registry: &Registry, provider: &str, json_output: bool) -> Result<()> {
    let provider = require_provider(registry, provider)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&models_json(&provider)?)?);
    } else if provider.models.is_empty() {
        println!("Provider '{}' has no models.", provider.name);
    } else {
        println!("{}", models_table(&provider));
    }

    Ok(())
}

pub fn execute_show(registry: &Registry, provider: &str, model: &str) -> Result<()> {
    let provider = require_provider(registry, provider)?;
    let model = provider.model(model).with_context(|| {
        format!(
            "Unknown model '{}' for provider '{}'. Run 'modelreg models {}' to list models.",
            model, provider.name, provider.name
        )
    })?;

    print!("{}", model_yaml(model)?);
    Ok(())
}

pub async fn execute_update(registry: &Registry) -> Result<()> {
    match registry.force_update().await? {
        UpdateOutcome::AlreadyCurrent { version } => {
            println!("Catalog is up to date ({version}).");
        }
        UpdateOutcome::Updated { from, to } => {
            println!("Catalog updated: {from} -> {to}");
        }
    }

    println!("{} providers available.", registry.list_providers().len());
    Ok(())
}

pub async fn execute_watch(registry: &Registry) -> Result<()> {
    tracing::info!(
        "Watching for catalog updates in {}; press Ctrl-C to stop",
        registry.config_dir().display()
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    tracing::info!("Stopping");
    registry.close()?;
    Ok(())
}
