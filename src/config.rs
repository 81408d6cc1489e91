use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::clock::Millis;
use crate::error::{PlaygroundError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// How often the terminal loop polls the active game.
    pub tick_rate_ms: Millis,
    pub precision: PrecisionConfig,
    pub reaction: ReactionConfig,
    pub sequence: SequenceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            precision: PrecisionConfig::default(),
            reaction: ReactionConfig::default(),
            sequence: SequenceConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PrecisionConfig {
    pub round_secs: u32,
    pub tick_ms: Millis,
    pub first_spawn_delay_ms: Millis,
    pub respawn_delay_ms: Millis,
    pub target_lifetime_ms: Millis,
    pub miss_flash_ms: Millis,
    pub min_size_px: f64,
    pub max_size_px: f64,
    /// Target centers are drawn from `[position_min, position_max)` percent on each axis.
    pub position_min: f64,
    pub position_max: f64,
    pub perfect_ratio: f64,
    pub good_ratio: f64,
    pub perfect_multiplier: f64,
    pub good_multiplier: f64,
    pub hit_multiplier: f64,
    pub combo_step: u32,
    pub combo_bonus: u32,
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self {
            round_secs: 30,
            tick_ms: 1_000,
            first_spawn_delay_ms: 100,
            respawn_delay_ms: 200,
            target_lifetime_ms: 1_800,
            miss_flash_ms: 300,
            min_size_px: 40.0,
            max_size_px: 80.0,
            position_min: 5.0,
            position_max: 90.0,
            perfect_ratio: 0.25,
            good_ratio: 0.60,
            perfect_multiplier: 1.0,
            good_multiplier: 0.7,
            hit_multiplier: 0.4,
            combo_step: 3,
            combo_bonus: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReactionConfig {
    pub min_delay_ms: Millis,
    pub max_delay_ms: Millis,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1_500,
            max_delay_ms: 4_500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SequenceConfig {
    pub grid_cells: usize,
    pub lead_in_ms: Millis,
    pub highlight_ms: Millis,
    pub gap_ms: Millis,
    pub advance_delay_ms: Millis,
    pub mismatch_linger_ms: Millis,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            grid_cells: 9,
            lead_in_ms: 800,
            highlight_ms: 500,
            gap_ms: 300,
            advance_delay_ms: 1_200,
            mismatch_linger_ms: 800,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let p = &self.precision;
        if p.round_secs == 0 || p.tick_ms == 0 {
            return invalid("precision round must last at least one tick");
        }
        if !(p.min_size_px > 0.0 && p.min_size_px < p.max_size_px) {
            return invalid("precision size range must be positive and non-empty");
        }
        if !(0.0..100.0).contains(&p.position_min)
            || p.position_max > 100.0
            || p.position_min >= p.position_max
        {
            return invalid("precision position range must lie inside 0..100");
        }
        if !(p.perfect_ratio > 0.0 && p.perfect_ratio < p.good_ratio) {
            return invalid("precision zone ratios must be increasing");
        }
        if p.combo_step == 0 {
            return invalid("precision combo step must be non-zero");
        }
        if p.target_lifetime_ms == 0 {
            return invalid("precision targets must stay up for a non-zero time");
        }
        if self.reaction.min_delay_ms >= self.reaction.max_delay_ms {
            return invalid("reaction delay range must be non-empty");
        }
        if self.sequence.grid_cells == 0 {
            return invalid("sequence grid needs at least one cell");
        }
        if self.sequence.highlight_ms == 0 && self.sequence.gap_ms == 0 {
            return invalid("sequence playback steps must take non-zero time");
        }
        if self.tick_rate_ms == 0 {
            return invalid("tick rate must be non-zero");
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> Result<()> {
    Err(PlaygroundError::InvalidConfig(msg.to_string()))
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "playground") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("playground_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_load(&self) -> Result<Config> {
        let bytes = fs::read(&self.path)?;
        let cfg = serde_json::from_slice::<Config>(&bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if !self.path.exists() {
            return Config::default();
        }
        match self.try_load() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "falling back to default config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        cfg.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
