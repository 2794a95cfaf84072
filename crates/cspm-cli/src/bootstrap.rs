//! Turns global flags into configuration, an API client and a database handle.

use std::time::Duration;

use anyhow::Context;
use cspm_client::{CspmClient, PaginationOptions};
use cspm_collector::ComplianceCollector;
use cspm_config::CspmConfig;
use cspm_db::CspmDb;
use figment::Figment;
use figment::providers::Serialized;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PaginationArgs;

/// Load configuration with command-line flags layered on top.
pub fn load_config(
    flags: &GlobalFlags,
    pagination: Option<&PaginationArgs>,
) -> anyhow::Result<CspmConfig> {
    CspmConfig::load_with_overrides(flags.config.as_deref(), flag_overrides(flags, pagination))
        .context("failed to load configuration")
}

fn flag_overrides(flags: &GlobalFlags, pagination: Option<&PaginationArgs>) -> Figment {
    let mut figment = Figment::new();
    if let Some(token) = &flags.token {
        figment = figment.merge(Serialized::default("api.token", token));
    }
    if let Some(url) = &flags.url {
        figment = figment.merge(Serialized::default("api.url", url));
    }
    if let Some(db) = &flags.db {
        figment = figment.merge(Serialized::default("database.path", db));
    }
    if let Some(args) = pagination {
        if let Some(page_size) = args.page_size {
            figment = figment.merge(Serialized::default("collect.page_size", page_size));
        }
        if let Some(batch_size) = args.batch_size {
            figment = figment.merge(Serialized::default("collect.batch_size", batch_size));
        }
        if let Some(api_delay) = args.api_delay {
            figment = figment.merge(Serialized::default("collect.api_delay_secs", api_delay));
        }
    }
    figment
}

pub fn pagination(config: &CspmConfig) -> PaginationOptions {
    PaginationOptions::normalized(
        config.collect.page_size,
        config.collect.batch_size,
        config.collect.api_delay_secs,
    )
}

/// Build an API client. Fails when no token is configured.
pub fn client(config: &CspmConfig) -> anyhow::Result<CspmClient> {
    let token = config.api.require_token()?;
    CspmClient::new(
        &config.api.url,
        token,
        Duration::from_secs(config.api.timeout_secs),
    )
    .context("failed to build API client")
}

/// Open the configured database, creating its parent directory if needed.
pub async fn open_db(config: &CspmConfig) -> anyhow::Result<CspmDb> {
    let path = &config.database.path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let path_str = path
        .to_str()
        .with_context(|| format!("database path {} is not valid UTF-8", path.display()))?;
    CspmDb::open_local(path_str)
        .await
        .with_context(|| format!("failed to open database at {}", path.display()))
}

pub async fn collector(config: &CspmConfig) -> anyhow::Result<ComplianceCollector> {
    let client = client(config)?;
    let db = open_db(config).await?;
    Ok(ComplianceCollector::new(client, db, pagination(config)))
}
