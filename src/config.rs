// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.tallybook", "Tallybook", "tallybook"));

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_USER: &str = "default";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

pub fn default_data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().to_path_buf())
}

// Every key is optional; absent keys fall back to the defaults above.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    user: Option<String>,
    passphrase: Option<String>,
    currency_symbol: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub user: String,
    pub passphrase: Option<String>,
    pub currency_symbol: String,
}

impl Config {
    /// Resolves settings from `config.json` in the data dir, with explicit
    /// values taking precedence.
    pub fn load(data_dir: Option<PathBuf>, user: Option<String>) -> Result<Config> {
        let data_dir = match data_dir {
            Some(d) => d,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;
        let file = read_file_config(&data_dir.join(CONFIG_FILE))?;

        Ok(Config {
            user: user
                .or(file.user)
                .unwrap_or_else(|| DEFAULT_USER.to_string()),
            passphrase: file.passphrase.filter(|p| !p.is_empty()),
            currency_symbol: file
                .currency_symbol
                .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()),
            data_dir,
        })
    }

    pub fn from_matches(m: &clap::ArgMatches) -> Result<Config> {
        let data_dir = m.get_one::<String>("data_dir").map(PathBuf::from);
        let user = m
            .get_one::<String>("user")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Config::load(data_dir, user)
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Read config {}", path.display()))?;
    let cfg = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(cfg)
}
