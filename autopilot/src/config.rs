use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const STEP_PENALTY: i32 = 2;
pub const RED_BUTTON_MARGIN: i32 = 4;
pub const MS_PER_STEP_BUDGET: u64 = 1_300;
pub const HIGH_VALUE_CUTOFF: u32 = 4;
pub const TACKLE_DISTANCE: i32 = 2;
pub const EVADE_DISTANCE: i32 = 3;

/// Tunables of the decision engine. Missing JSON fields take the defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Steps a diamond may lie farther away per extra point of value.
    pub step_penalty: i32,
    /// Steps the red button must save over the best diamond before it wins.
    pub red_button_margin: i32,
    /// Milliseconds per remaining step to base below which the agent heads home.
    pub ms_per_step_budget: u64,
    /// Held count from which 2-point diamonds are ignored.
    pub high_value_cutoff: u32,
    pub tackle_distance: i32,
    pub evade_distance: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_penalty: STEP_PENALTY,
            red_button_margin: RED_BUTTON_MARGIN,
            ms_per_step_budget: MS_PER_STEP_BUDGET,
            high_value_cutoff: HIGH_VALUE_CUTOFF,
            tackle_distance: TACKLE_DISTANCE,
            evade_distance: EVADE_DISTANCE,
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
        let cfg: EngineConfig = serde_json::from_slice(&data)
            .with_context(|| format!("invalid engine config {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("rejected engine config {}", path.display()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ms_per_step_budget == 0 {
            return Err(anyhow!("ms_per_step_budget must be > 0"));
        }
        if self.step_penalty < 0 {
            return Err(anyhow!("step_penalty must be >= 0, got {}", self.step_penalty));
        }
        if self.red_button_margin < 0 {
            return Err(anyhow!(
                "red_button_margin must be >= 0, got {}",
                self.red_button_margin
            ));
        }
        if self.tackle_distance < 1 {
            return Err(anyhow!(
                "tackle_distance must be >= 1, got {}",
                self.tackle_distance
            ));
        }
        if self.tackle_distance >= self.evade_distance {
            return Err(anyhow!(
                "tackle_distance ({}) must be below evade_distance ({})",
                self.tackle_distance,
                self.evade_distance
            ));
        }
        Ok(())
    }
}
