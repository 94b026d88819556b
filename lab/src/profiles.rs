//! Named server-setting presets the bot is exercised against.

use crate::util::crc32;
use anyhow::{Context, Result};
use playerbot_core::BotConfig;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_PROFILE: &str = "stock";

pub fn profile_ids() -> Vec<&'static str> {
    vec!["stock", "classic", "megasplit", "tight-cap", "named-crowd"]
}

pub fn describe_profiles() -> Vec<(&'static str, &'static str)> {
    vec![
        ("stock", "Stock server settings: sqrt(2) split size, 780 split boost, 16 cells."),
        ("classic", "Classic ratios: 1.25 eat margin, halving splits, short split reach."),
        ("megasplit", "Experimental mode with 64 cells and a long split boost."),
        ("tight-cap", "Four-cell cap, so viruses and mother cells turn harmless early."),
        ("named-crowd", "Stock physics with populated bot name and skin pools."),
    ]
}

pub fn create_profile(id: &str) -> Option<BotConfig> {
    let stock = BotConfig::default();
    match id {
        "stock" => Some(stock),
        "classic" => Some(BotConfig {
            world_eat_mult: 1.25,
            world_eat_overlap_div: 3.0,
            player_split_size_div: 2.0,
            player_split_boost: 320.0,
            ..stock
        }),
        "megasplit" => Some(BotConfig {
            player_max_cells: 64,
            player_split_boost: 1_100.0,
            ..stock
        }),
        "tight-cap" => Some(BotConfig {
            player_max_cells: 4,
            ..stock
        }),
        "named-crowd" => Some(BotConfig {
            world_player_bot_names: ["Blob", "Nibbler", "Cellestial", "Mitosis", "Agarthan"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            world_player_bot_skins: ["earth", "moon", "doge", "wojak"]
                .iter()
                .map(|skin| skin.to_string())
                .collect(),
            ..stock
        }),
        _ => try_load_profile_file(id),
    }
}

/// Supports `file:<path>` to load server settings JSON from disk.
fn try_load_profile_file(id: &str) -> Option<BotConfig> {
    let path = id.strip_prefix("file:")?;
    match load_config_file(Path::new(path)) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!("failed loading profile {id}: {err:#}");
            None
        }
    }
}

pub fn load_config_file(path: &Path) -> Result<BotConfig> {
    let raw = fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
    let config: BotConfig = serde_json::from_slice(&raw)
        .with_context(|| format!("invalid server settings in {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("rejected server settings in {}", path.display()))?;
    Ok(config)
}

pub fn config_fingerprint(config: &BotConfig) -> String {
    let encoded = serde_json::to_vec(config).unwrap_or_default();
    format!("{:08x}", crc32(&encoded))
}

pub fn profile_fingerprint(id: &str) -> Option<String> {
    create_profile(id).map(|config| config_fingerprint(&config))
}

#[derive(Clone, Debug, Serialize)]
pub struct ProfileManifestEntry {
    pub id: String,
    pub description: String,
    pub config_hash: String,
    pub config: BotConfig,
}

pub fn profile_manifest_entries() -> Vec<ProfileManifestEntry> {
    describe_profiles()
        .into_iter()
        .filter_map(|(id, description)| {
            let config = create_profile(id)?;
            Some(ProfileManifestEntry {
                id: id.to_string(),
                description: description.to_string(),
                config_hash: config_fingerprint(&config),
                config,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_profile_is_valid() {
        for id in profile_ids() {
            let config = create_profile(id).unwrap_or_else(|| panic!("missing profile {id}"));
            assert_eq!(config.validate(), Ok(()), "profile {id}");
        }
        assert_eq!(profile_ids().len(), describe_profiles().len());
    }

    #[test]
    fn fingerprints_are_stable_and_distinct() {
        let a = profile_fingerprint("stock").expect("stock");
        assert_eq!(a, profile_fingerprint("stock").expect("stock"));
        assert_ne!(a, profile_fingerprint("classic").expect("classic"));
        assert!(profile_fingerprint("nope").is_none());
    }
}
