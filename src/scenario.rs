use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_plane_size() -> f32 {
    10.0
}

fn default_initial_chickens() -> u32 {
    1
}

fn default_frame_seconds() -> f64 {
    1.0 / 60.0
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Closed interval of seconds sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecondsRange {
    pub min: f64,
    pub max: f64,
}

impl SecondsRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default = "default_plane_size")]
    pub plane_size: f32,
    #[serde(default = "default_initial_chickens")]
    pub initial_chickens: u32,
    #[serde(default = "default_frame_seconds")]
    pub frame_seconds: f64,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub chicken: ChickenConfig,
    #[serde(default)]
    pub disease: DiseaseConfig,
    #[serde(default)]
    pub reproduction: ReproductionConfig,
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default)]
    pub actions: ActionPrices,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Hunger and wandering parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChickenConfig {
    /// Hunger points lost per second.
    pub hunger_decay: f32,
    pub move_speed: f32,
    /// Fraction of the remaining angle covered per tick when turning.
    pub turn_blend: f32,
    pub move_probability: f64,
    pub initial_cooldown: SecondsRange,
    pub wander_cooldown: SecondsRange,
    pub separation_distance: f32,
    pub separation_strength: f32,
}

impl Default for ChickenConfig {
    fn default() -> Self {
        Self {
            hunger_decay: 5.0,
            move_speed: 0.5,
            turn_blend: 0.05,
            move_probability: 0.7,
            initial_cooldown: SecondsRange::new(2.0, 4.0),
            wander_cooldown: SecondsRange::new(2.0, 5.0),
            separation_distance: 0.6,
            separation_strength: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiseaseConfig {
    pub contagion_radius: f32,
    pub contagion_probability: f64,
    pub critical_after: f32,
    pub fatal_after: f32,
    /// Remaining round seconds at which outbreaks begin.
    pub outbreak_threshold: f64,
    pub outbreak_interval: f64,
    pub outbreak_probability: f64,
}

impl Default for DiseaseConfig {
    fn default() -> Self {
        Self {
            contagion_radius: 1.0,
            contagion_probability: 0.0005,
            critical_after: 10.0,
            fatal_after: 15.0,
            outbreak_threshold: 50.0,
            outbreak_interval: 10.0,
            outbreak_probability: 0.10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReproductionConfig {
    pub egg_delay: SecondsRange,
    pub lay_chance_base: f64,
    pub lay_chance_per_hunger: f64,
    pub hatch_delay: SecondsRange,
    pub golden_probability: f64,
}

impl ReproductionConfig {
    pub fn lay_chance(&self, hunger: f32) -> f64 {
        (self.lay_chance_base + hunger as f64 * self.lay_chance_per_hunger).clamp(0.0, 1.0)
    }
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            egg_delay: SecondsRange::new(5.0, 10.0),
            lay_chance_base: 0.5,
            lay_chance_per_hunger: 1.0 / 200.0,
            hatch_delay: SecondsRange::new(5.0, 10.0),
            golden_probability: 0.10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_money: f64,
    pub income_per_second: f64,
    pub round_seconds: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_money: 0.0,
            income_per_second: 1.0,
            round_seconds: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionPrices {
    pub feed_cost: f64,
    pub feed_amount: f32,
    pub cure_cost: f64,
    pub harvest_cost: f64,
    pub egg_reward: f64,
    pub golden_egg_reward: f64,
}

impl Default for ActionPrices {
    fn default() -> Self {
        Self {
            feed_cost: 5.0,
            feed_amount: 30.0,
            cure_cost: 15.0,
            harvest_cost: 0.0,
            egg_reward: 5.0,
            golden_egg_reward: 15.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario validation error: {0}")]
    Validation(String),
}

impl Scenario {
    /// Scenario with every tunable at its default, useful for tests and hosts
    /// that do not ship a YAML file.
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            description: None,
            seed,
            plane_size: default_plane_size(),
            initial_chickens: default_initial_chickens(),
            frame_seconds: default_frame_seconds(),
            logging: LoggingConfig::default(),
            chicken: ChickenConfig::default(),
            disease: DiseaseConfig::default(),
            reproduction: ReproductionConfig::default(),
            economy: EconomyConfig::default(),
            actions: ActionPrices::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.trim().is_empty() {
            return invalid("scenario must define a name");
        }
        if !(self.plane_size.is_finite() && self.plane_size > 0.0) {
            return invalid("plane_size must be positive");
        }
        if !(self.frame_seconds.is_finite() && self.frame_seconds > 0.0) {
            return invalid("frame_seconds must be positive");
        }
        for (label, value) in [
            ("economy.starting_money", self.economy.starting_money),
            ("economy.income_per_second", self.economy.income_per_second),
            ("economy.round_seconds", self.economy.round_seconds),
            ("chicken.hunger_decay", self.chicken.hunger_decay as f64),
            ("chicken.move_speed", self.chicken.move_speed as f64),
            ("chicken.separation_distance", self.chicken.separation_distance as f64),
            ("chicken.separation_strength", self.chicken.separation_strength as f64),
            ("disease.contagion_radius", self.disease.contagion_radius as f64),
            ("disease.critical_after", self.disease.critical_after as f64),
            ("disease.fatal_after", self.disease.fatal_after as f64),
            ("disease.outbreak_threshold", self.disease.outbreak_threshold),
            ("disease.outbreak_interval", self.disease.outbreak_interval),
            ("reproduction.lay_chance_base", self.reproduction.lay_chance_base),
            (
                "reproduction.lay_chance_per_hunger",
                self.reproduction.lay_chance_per_hunger,
            ),
            ("actions.feed_cost", self.actions.feed_cost),
            ("actions.feed_amount", self.actions.feed_amount as f64),
            ("actions.cure_cost", self.actions.cure_cost),
            ("actions.harvest_cost", self.actions.harvest_cost),
            ("actions.egg_reward", self.actions.egg_reward),
            ("actions.golden_egg_reward", self.actions.golden_egg_reward),
        ] {
            if !value.is_finite() {
                return Err(ScenarioError::Validation(format!(
                    "{label} must be a finite number (got {value})"
                )));
            }
        }
        if self.economy.round_seconds <= 0.0 {
            return invalid("economy.round_seconds must be positive");
        }

        for (label, range) in [
            ("chicken.initial_cooldown", &self.chicken.initial_cooldown),
            ("chicken.wander_cooldown", &self.chicken.wander_cooldown),
            ("reproduction.egg_delay", &self.reproduction.egg_delay),
            ("reproduction.hatch_delay", &self.reproduction.hatch_delay),
        ] {
            if !range.min.is_finite()
                || !range.max.is_finite()
                || range.min < 0.0
                || range.min > range.max
            {
                return Err(ScenarioError::Validation(format!(
                    "{label} must be finite with 0 <= min <= max (got {}..{})",
                    range.min, range.max
                )));
            }
        }

        for (label, p) in [
            ("chicken.move_probability", self.chicken.move_probability),
            (
                "disease.contagion_probability",
                self.disease.contagion_probability,
            ),
            (
                "disease.outbreak_probability",
                self.disease.outbreak_probability,
            ),
            (
                "reproduction.golden_probability",
                self.reproduction.golden_probability,
            ),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ScenarioError::Validation(format!(
                    "{label} must lie in [0, 1] (got {p})"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.chicken.turn_blend) {
            return invalid("chicken.turn_blend must lie in [0, 1]");
        }
        if self.chicken.hunger_decay < 0.0 {
            return invalid("chicken.hunger_decay must not be negative");
        }
        if self.disease.critical_after < 0.0
            || self.disease.fatal_after <= self.disease.critical_after
        {
            return invalid("disease.fatal_after must exceed disease.critical_after");
        }
        if self.disease.outbreak_interval <= 0.0 {
            return invalid("disease.outbreak_interval must be positive");
        }
        if self.actions.feed_cost < 0.0
            || self.actions.cure_cost < 0.0
            || self.actions.harvest_cost < 0.0
        {
            return invalid("action costs must not be negative");
        }
        Ok(())
    }

    /// Frames needed to play a full round at the configured frame length.
    pub fn frames(&self, override_seconds: Option<f64>) -> u64 {
        let seconds = override_seconds.unwrap_or(self.economy.round_seconds);
        (seconds / self.frame_seconds).ceil().max(0.0) as u64
    }
}

fn invalid(msg: &str) -> Result<(), ScenarioError> {
    Err(ScenarioError::Validation(msg.to_string()))
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let scenario = Scenario::with_seed("defaults", 1);
        scenario.validate().expect("defaults are valid");
        assert_eq!(scenario.reproduction.lay_chance(100.0), 1.0);
        assert_eq!(scenario.reproduction.lay_chance(0.0), 0.5);
    }

    #[test]
    fn minimal_yaml_uses_defaults() {
        let scenario: Scenario = serde_yaml::from_str("name: tiny\nseed: 3\n").unwrap();
        assert_eq!(scenario.plane_size, 10.0);
        assert_eq!(scenario.disease.fatal_after, 15.0);
        assert_eq!(scenario.actions.cure_cost, 15.0);
        assert_eq!(scenario.logging.level, "info");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let yaml = "name: tiny\nseed: 3\nreproduction:\n  golden_probability: 0.5\n";
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.reproduction.golden_probability, 0.5);
        assert_eq!(scenario.reproduction.egg_delay, SecondsRange::new(5.0, 10.0));
    }

    #[test]
    fn rejects_inverted_range() {
        let mut scenario = Scenario::with_seed("bad", 1);
        scenario.reproduction.hatch_delay = SecondsRange::new(10.0, 5.0);
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_range() {
        let mut scenario = Scenario::with_seed("bad", 1);
        scenario.reproduction.egg_delay = SecondsRange::new(5.0, f64::INFINITY);
        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("egg_delay"));

        let mut scenario = Scenario::with_seed("bad", 1);
        scenario.chicken.wander_cooldown.min = f64::NAN;
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_tunables() {
        let mut scenario = Scenario::with_seed("bad", 1);
        scenario.economy.round_seconds = f64::INFINITY;
        assert!(scenario.validate().is_err());

        let mut scenario = Scenario::with_seed("bad", 1);
        scenario.chicken.move_speed = f32::NAN;
        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("move_speed"));

        let mut scenario = Scenario::with_seed("bad", 1);
        scenario.disease.fatal_after = f32::NAN;
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn rejects_fatal_before_critical() {
        let mut scenario = Scenario::with_seed("bad", 1);
        scenario.disease.fatal_after = 5.0;
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn rejects_probability_out_of_range() {
        let mut scenario = Scenario::with_seed("bad", 1);
        scenario.disease.outbreak_probability = 1.5;
        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("outbreak_probability"));
    }

    #[test]
    fn frames_cover_the_round() {
        let mut scenario = Scenario::with_seed("frames", 1);
        scenario.frame_seconds = 0.5;
        assert_eq!(scenario.frames(None), 200);
        assert_eq!(scenario.frames(Some(3.0)), 6);
    }
}
