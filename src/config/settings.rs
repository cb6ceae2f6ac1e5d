use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

//one configured symbol: either a bare ticker or a ticker with the
//reference asset it tracks (eg an etf and its underlying index fund)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymbolEntry {
    Plain(String),
    Linked {
        symbol: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        underlying: Option<String>,
    },
}

impl SymbolEntry {
    pub fn symbol(&self) -> &str {
        match self {
            SymbolEntry::Plain(symbol) => symbol,
            SymbolEntry::Linked { symbol, .. } => symbol,
        }
    }

    pub fn underlying(&self) -> Option<&str> {
        match self {
            SymbolEntry::Plain(_) => None,
            SymbolEntry::Linked { underlying, .. } => underlying.as_deref(),
        }
    }
}

//complete application configuration, loaded once and passed by reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub polygon_api_key: String,

    #[serde(default = "default_rate_limit")]
    pub rate_limit_requests_per_minute: u32,

    #[serde(default = "default_data_directory")]
    pub data_directory: PathBuf,

    //how far back the fetch command requests history
    #[serde(default = "default_fetch_lookback_months")]
    pub fetch_lookback_months: u32,

    pub symbols: Vec<SymbolEntry>,
}

fn default_rate_limit() -> u32 {
    5
}

fn default_data_directory() -> PathBuf {
    PathBuf::from("data")
}

fn default_fetch_lookback_months() -> u32 {
    24
}

impl AppConfig {
    //load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {:?}: {}", path, e))?;
        let config: AppConfig = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {:?}: {}", path, e))?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    //every ticker the fetch pass must cover: the configured symbols plus
    //their declared underlyings, deduplicated and sorted
    pub fn fetch_universe(&self) -> Vec<String> {
        let mut universe = BTreeSet::new();
        for entry in &self.symbols {
            universe.insert(entry.symbol().to_string());
            if let Some(underlying) = entry.underlying() {
                universe.insert(underlying.to_string());
            }
        }
        universe.into_iter().collect()
    }

    //symbol -> underlying mapping, in configuration order
    pub fn underlying_map(&self) -> IndexMap<String, String> {
        self.symbols
            .iter()
            .filter_map(|entry| {
                entry
                    .underlying()
                    .map(|u| (entry.symbol().to_string(), u.to_string()))
            })
            .collect()
    }
}
