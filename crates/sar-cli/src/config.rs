//! Scenario configuration loaded from YAML, with a built-in default that
//! reproduces the reference cape scenario.

use sar_core::model::region::{GlobalPoint, REGION_COUNT, Region, RegionId, RegionSet};
use sar_core::search::EffectivenessRange;
use sar_core::session::{PlacementModel, SessionConfig};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root scenario configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioConfig {
    pub name: String,
    pub regions: Vec<RegionSpec>,
    pub priors: [f64; REGION_COUNT],
    #[serde(default)]
    pub effectiveness: EffectivenessBounds,
    #[serde(default = "default_placement", with = "serde_yaml::with::singleton_map")]
    pub placement: PlacementModel,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// One search region as written in the scenario file.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct RegionSpec {
    pub id: RegionId,
    pub width: u32,
    pub height: u32,
    pub origin: GlobalPoint,
}

/// Bounds for the per-round effectiveness draw.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct EffectivenessBounds {
    #[serde(default = "default_effectiveness_low")]
    pub low: f64,
    #[serde(default = "default_effectiveness_high")]
    pub high: f64,
}

impl Default for EffectivenessBounds {
    fn default() -> Self {
        Self {
            low: EffectivenessRange::DEFAULT_LOW,
            high: EffectivenessRange::DEFAULT_HIGH,
        }
    }
}

fn default_effectiveness_low() -> f64 {
    EffectivenessRange::DEFAULT_LOW
}

fn default_effectiveness_high() -> f64 {
    EffectivenessRange::DEFAULT_HIGH
}

fn default_placement() -> PlacementModel {
    PlacementModel::Triangular
}

impl ScenarioConfig {
    /// Load a scenario from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let cfg: ScenarioConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The reference scenario: three 50x50 areas off the cape with priors
    /// 0.2 / 0.5 / 0.3 and a middle-biased placement draw.
    pub fn reference() -> Self {
        Self {
            name: "cape-rescue".to_string(),
            regions: vec![
                RegionSpec {
                    id: RegionId::Alpha,
                    width: 50,
                    height: 50,
                    origin: GlobalPoint::new(130, 265),
                },
                RegionSpec {
                    id: RegionId::Bravo,
                    width: 50,
                    height: 50,
                    origin: GlobalPoint::new(80, 255),
                },
                RegionSpec {
                    id: RegionId::Charlie,
                    width: 50,
                    height: 50,
                    origin: GlobalPoint::new(105, 205),
                },
            ],
            priors: [0.2, 0.5, 0.3],
            effectiveness: EffectivenessBounds::default(),
            placement: PlacementModel::Triangular,
            seed: None,
        }
    }

    /// Validate the scenario without performing I/O.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "scenario name must not be empty".to_string(),
            });
        }
        self.to_session_config().map(drop)
    }

    /// Build the engine-side configuration, surfacing any geometry, prior,
    /// or bounds problem as a config error.
    pub fn to_session_config(&self) -> Result<SessionConfig, ConfigError> {
        if self.regions.len() != REGION_COUNT {
            return Err(ConfigError::Invalid {
                message: format!(
                    "expected {REGION_COUNT} regions, found {}",
                    self.regions.len()
                ),
            });
        }

        let mut built = Vec::with_capacity(REGION_COUNT);
        for spec in &self.regions {
            let region = Region::new(spec.id, spec.width, spec.height, spec.origin)
                .map_err(invalid)?;
            built.push(region);
        }
        let regions = [built[0], built[1], built[2]];
        let regions = RegionSet::new(regions).map_err(invalid)?;

        let effectiveness = EffectivenessRange::new(self.effectiveness.low, self.effectiveness.high)
            .map_err(invalid)?;

        let sum: f64 = self.priors.iter().sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ConfigError::Invalid {
                message: format!("priors must sum to 1, got {sum}"),
            });
        }

        Ok(SessionConfig {
            regions,
            priors: self.priors,
            effectiveness,
            placement: self.placement,
        })
    }
}

fn invalid(error: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        message: error.to_string(),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid scenario: {message}")]
    Invalid { message: String },
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ScenarioConfig};
    use sar_core::model::region::RegionId;
    use sar_core::session::PlacementModel;

    const SCENARIO_YAML: &str = r#"
name: "narrow-strait"
regions:
  - id: alpha
    width: 40
    height: 30
    origin: { x: 10, y: 20 }
  - id: bravo
    width: 25
    height: 25
    origin: { x: 60, y: 20 }
  - id: charlie
    width: 50
    height: 10
    origin: { x: 10, y: 60 }
priors: [0.25, 0.25, 0.5]
effectiveness:
  low: 0.3
  high: 0.8
placement:
  weighted: [0.1, 0.1, 0.8]
seed: 99
"#;

    #[test]
    fn parses_a_full_scenario() {
        let cfg: ScenarioConfig = serde_yaml::from_str(SCENARIO_YAML).expect("valid yaml");
        cfg.validate().expect("scenario validates");
        assert_eq!(cfg.name, "narrow-strait");
        assert_eq!(cfg.regions[2].id, RegionId::Charlie);
        assert_eq!(cfg.placement, PlacementModel::Weighted([0.1, 0.1, 0.8]));
        assert_eq!(cfg.seed, Some(99));

        let session = cfg.to_session_config().expect("session config builds");
        assert_eq!(session.regions.get(RegionId::Bravo).width(), 25);
        assert_eq!(session.effectiveness.low(), 0.3);
    }

    #[test]
    fn defaults_fill_in_effectiveness_and_placement() {
        let yaml = r#"
name: "defaults"
regions:
  - { id: alpha, width: 10, height: 10, origin: { x: 0, y: 0 } }
  - { id: bravo, width: 10, height: 10, origin: { x: 10, y: 0 } }
  - { id: charlie, width: 10, height: 10, origin: { x: 20, y: 0 } }
priors: [0.2, 0.5, 0.3]
"#;
        let cfg: ScenarioConfig = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(cfg.effectiveness.low, 0.2);
        assert_eq!(cfg.effectiveness.high, 0.9);
        assert_eq!(cfg.placement, PlacementModel::Triangular);
        cfg.validate().expect("scenario validates");
    }

    #[test]
    fn reference_scenario_validates() {
        ScenarioConfig::reference().validate().expect("reference is valid");
    }

    #[test]
    fn wrong_region_count_is_invalid() {
        let mut cfg = ScenarioConfig::reference();
        cfg.regions.pop();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn priors_off_by_more_than_tolerance_are_invalid() {
        let mut cfg = ScenarioConfig::reference();
        cfg.priors = [0.2, 0.5, 0.4];
        let error = cfg.validate().unwrap_err();
        assert!(error.to_string().contains("priors must sum to 1"));
    }

    #[test]
    fn inverted_effectiveness_bounds_are_invalid() {
        let mut cfg = ScenarioConfig::reference();
        cfg.effectiveness.low = 0.9;
        cfg.effectiveness.high = 0.2;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { .. })));
    }
}
