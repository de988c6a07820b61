// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application configuration management.
//!
//! This module handles persistent configuration storage using TOML format:
//! the backend address, the disaster loaded on start-up and tile caching.

use std::path::PathBuf;

use disaster_client::DEFAULT_API_BASE_URL;
use serde::{Deserialize, Serialize};

/// Name used for the config file and the cache directory
pub const APP_NAME: &str = "disaster-heatmap";

/// Environment variable that overrides the configured backend address
pub const API_URL_ENV: &str = "DISASTER_API_URL";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Base URL of the backend serving `/api/disaster/{id}`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Disaster identifier loaded on start-up
    #[serde(default = "default_disaster")]
    pub default_disaster: String,

    /// Cache satellite tiles on disk
    #[serde(default = "default_true")]
    pub cache_tiles: bool,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_disaster() -> String {
    "fire".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            api_base_url: default_api_base_url(),
            default_disaster: default_disaster(),
            cache_tiles: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, creating it with defaults if missing
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, "config")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, "config", self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, "config")
    }

    /// Resolve the backend address: command line, then environment, then config
    pub fn resolve_api_base_url(&self, cli_url: Option<&str>) -> String {
        self.resolve_api_base_url_with(cli_url, std::env::var(API_URL_ENV).ok())
    }

    fn resolve_api_base_url_with(&self, cli_url: Option<&str>, env_url: Option<String>) -> String {
        cli_url
            .map(str::to_string)
            .filter(|s| !s.trim().is_empty())
            .or_else(|| env_url.filter(|s| !s.trim().is_empty()))
            .unwrap_or_else(|| self.api_base_url.clone())
    }

    /// Make `disaster` the start-up default. Returns `true` if it changed.
    pub fn remember_disaster(&mut self, disaster: &str) -> bool {
        let disaster = disaster.trim();
        if disaster.is_empty() || self.default_disaster == disaster {
            return false;
        }
        self.default_disaster = disaster.to_string();
        true
    }

    /// Directory for cached satellite tiles, if caching is enabled
    pub fn tile_cache_dir(&self) -> Option<PathBuf> {
        if !self.cache_tiles {
            return None;
        }
        let dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join(APP_NAME)
            .join("tiles");
        Some(dir)
    }
}
