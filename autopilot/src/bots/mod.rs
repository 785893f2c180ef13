mod hunter;
mod wanderer;

pub use hunter::DiamondHunter;
pub use wanderer::{Wanderer, WandererConfig};

use anyhow::{anyhow, Context, Result};
use diamonds_core::checksum::crc32;
use diamonds_core::{AgentState, BoardSnapshot, Move};
use serde::Serialize;
use std::path::Path;

use crate::config::EngineConfig;

/// Prefix of roster ids that load a `diamond-hunter` from an engine config
/// file, e.g. `config:tuned.json`.
pub const CONFIG_PREFIX: &str = "config:";

pub trait GridBot {
    fn id(&self) -> &str;
    fn description(&self) -> &str;
    fn reset(&mut self, seed: u32);
    fn next_move(&mut self, board: &BoardSnapshot, me: &AgentState, rivals: &[AgentState])
        -> Move;
    fn telemetry(&self) -> BotTelemetry {
        BotTelemetry::default()
    }
}

/// Counters a bot keeps since its last reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BotTelemetry {
    pub tackles_attempted: u32,
    pub evasions: u32,
    pub fallback_moves: u32,
    pub deflections: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct BotManifestEntry {
    pub id: String,
    pub family: String,
    pub description: String,
    pub config_hash: String,
    pub config: serde_json::Value,
}

#[derive(Clone, Copy)]
struct HunterPreset {
    id: &'static str,
    description: &'static str,
    engine: EngineConfig,
}

fn hunter_presets() -> [HunterPreset; 2] {
    [
        HunterPreset {
            id: "diamond-hunter",
            description: "Greedy diamond collector with teleport routing, red-button pricing and tackles.",
            engine: EngineConfig::default(),
        },
        HunterPreset {
            id: "diamond-hunter-cautious",
            description: "Diamond collector that heads home earlier and rarely detours for the red button.",
            engine: EngineConfig {
                red_button_margin: 6,
                ms_per_step_budget: 1_600,
                ..EngineConfig::default()
            },
        },
    ]
}

pub fn bot_ids() -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = hunter_presets().iter().map(|preset| preset.id).collect();
    ids.push(wanderer::WANDERER_ID);
    ids
}

pub fn describe_bots() -> Vec<(&'static str, &'static str)> {
    let mut out: Vec<(&'static str, &'static str)> = hunter_presets()
        .iter()
        .map(|preset| (preset.id, preset.description))
        .collect();
    out.push((wanderer::WANDERER_ID, wanderer::WANDERER_DESCRIPTION));
    out
}

/// Roster bot by id, or a `diamond-hunter` built from the engine config file
/// behind a `config:` id.
pub fn load_bot(id: &str) -> Result<Box<dyn GridBot>> {
    if let Some(preset) = hunter_presets().into_iter().find(|preset| preset.id == id) {
        return Ok(Box::new(DiamondHunter::new(
            preset.id,
            preset.description,
            preset.engine,
        )));
    }
    if id == wanderer::WANDERER_ID {
        return Ok(Box::new(Wanderer::new(WandererConfig::default())));
    }
    if let Some(path) = id.strip_prefix(CONFIG_PREFIX) {
        let cfg = EngineConfig::from_file(Path::new(path))
            .with_context(|| format!("cannot load bot '{id}'"))?;
        return Ok(Box::new(DiamondHunter::new(
            id,
            "Diamond collector with an engine config loaded from disk.",
            cfg,
        )));
    }
    Err(anyhow!("unknown bot '{id}'"))
}

pub fn create_bot(id: &str) -> Option<Box<dyn GridBot>> {
    load_bot(id).ok()
}

fn hash_json(value: &serde_json::Value) -> Result<String> {
    let encoded = serde_json::to_vec(value).context("failed to serialize bot config")?;
    let digest = crc32(&encoded);
    Ok(format!("crc32:{digest:08x}:len:{}", encoded.len()))
}

pub fn bot_manifest_entries() -> Result<Vec<BotManifestEntry>> {
    let mut out = Vec::new();

    for preset in hunter_presets() {
        let config = serde_json::to_value(preset.engine)
            .with_context(|| format!("failed to serialize config of {}", preset.id))?;
        out.push(BotManifestEntry {
            id: preset.id.to_string(),
            family: "hunter".to_string(),
            description: preset.description.to_string(),
            config_hash: hash_json(&config)?,
            config,
        });
    }

    let config = serde_json::to_value(WandererConfig::default())
        .context("failed to serialize wanderer config")?;
    out.push(BotManifestEntry {
        id: wanderer::WANDERER_ID.to_string(),
        family: "baseline".to_string(),
        description: wanderer::WANDERER_DESCRIPTION.to_string(),
        config_hash: hash_json(&config)?,
        config,
    });

    Ok(out)
}

/// Config hash of a roster bot, or of the file behind a `config:` id.
pub fn bot_fingerprint(id: &str) -> Option<String> {
    if let Some(path) = id.strip_prefix(CONFIG_PREFIX) {
        let cfg = EngineConfig::from_file(Path::new(path)).ok()?;
        let config = serde_json::to_value(cfg).ok()?;
        return hash_json(&config).ok();
    }
    bot_manifest_entries()
        .ok()?
        .into_iter()
        .find(|entry| entry.id == id)
        .map(|entry| entry.config_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn every_listed_bot_can_be_created() {
        for id in bot_ids() {
            let bot = create_bot(id).expect("listed bot");
            assert_eq!(bot.id(), id);
        }
        assert!(create_bot("no-such-bot").is_none());
        assert_eq!(describe_bots().len(), bot_ids().len());
    }

    #[test]
    fn manifest_fingerprints_differ_per_config() {
        let entries = bot_manifest_entries().expect("manifest");
        assert_eq!(entries.len(), bot_ids().len());
        for entry in &entries {
            assert!(entry.config_hash.starts_with("crc32:"), "{}", entry.id);
            assert_eq!(bot_fingerprint(&entry.id).as_ref(), Some(&entry.config_hash));
        }
        assert_ne!(entries[0].config_hash, entries[1].config_hash);
        assert_eq!(entries[1].config["red_button_margin"], 6);
    }

    #[test]
    fn config_prefixed_ids_load_from_disk() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("tuned.json");
        fs::write(&path, r#"{ "step_penalty": 3 }"#).expect("write config");

        let id = format!("{CONFIG_PREFIX}{}", path.display());
        let bot = create_bot(&id).expect("config bot");
        assert_eq!(bot.id(), id);
        assert!(bot_fingerprint(&id).is_some());

        let missing = format!("{CONFIG_PREFIX}{}", tmp.path().join("absent.json").display());
        assert!(create_bot(&missing).is_none());
    }

    #[test]
    fn load_errors_name_the_cause() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("broken.json");
        fs::write(&path, r#"{ "ms_per_step_budget": 0 }"#).expect("write config");

        let id = format!("{CONFIG_PREFIX}{}", path.display());
        let err = load_bot(&id).err().expect("rejected config");
        let chain = format!("{err:#}");
        assert!(chain.contains("cannot load bot"), "{chain}");
        assert!(chain.contains("ms_per_step_budget must be > 0"), "{chain}");

        let err = load_bot("no-such-bot").err().expect("unknown id");
        assert_eq!(err.to_string(), "unknown bot 'no-such-bot'");
    }
}
