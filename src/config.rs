use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Runtime settings. Vocabulary tables are static and live in `vocab`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Namespace every entity URI is minted under.
    pub base_uri: String,
    pub wiki_base_url: String,
    pub index_path: String,
    pub data_dir: PathBuf,
    pub user_agent: String,
    pub concurrency: usize,
    pub max_retries: u32,
    pub backoff_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_uri: "http://localhost:5173/esolangs/".to_string(),
            wiki_base_url: "https://esolangs.org".to_string(),
            index_path: "/wiki/Language_list".to_string(),
            data_dir: PathBuf::from("data"),
            user_agent: concat!("esolang-graph/", env!("CARGO_PKG_VERSION")).to_string(),
            concurrency: 8,
            max_retries: 3,
            backoff_ms: 1000,
        }
    }
}

impl Settings {
    /// Defaults, then `esolang.toml` if present, then `ESOLANG_*` env vars.
    pub fn load() -> Result<Self> {
        let d = Settings::default();
        let settings = Config::builder()
            .set_default("base_uri", d.base_uri)?
            .set_default("wiki_base_url", d.wiki_base_url)?
            .set_default("index_path", d.index_path)?
            .set_default("data_dir", d.data_dir.to_string_lossy().into_owned())?
            .set_default("user_agent", d.user_agent)?
            .set_default("concurrency", d.concurrency as u64)?
            .set_default("max_retries", d.max_retries as u64)?
            .set_default("backoff_ms", d.backoff_ms)?
            .add_source(File::with_name("esolang").required(false))
            .add_source(Environment::with_prefix("ESOLANG"))
            .build()
            .context("failed to assemble settings")?;
        settings
            .try_deserialize()
            .context("invalid settings")
    }

    pub fn index_url(&self) -> String {
        format!("{}{}", self.wiki_base_url.trim_end_matches('/'), self.index_path)
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("esolangs.sqlite")
    }

    pub fn raw_path(&self) -> PathBuf {
        self.data_dir.join("esolangs-data.json")
    }

    pub fn cleaned_path(&self) -> PathBuf {
        self.data_dir.join("esolangs-cleaned.json")
    }

    pub fn ontology_path(&self, extension: &str) -> PathBuf {
        self.data_dir.join(format!("esolangs-ontology.{}", extension))
    }
}
