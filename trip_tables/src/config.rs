//! The run configuration, read from one JSON file.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::modes::{ModeGroup, ModePartition};
use crate::sink::MatrixFormat;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// The share of the synthetic population that was simulated, in (0, 1]. Every trip weight is
    /// expanded by its inverse.
    pub sample_rate: f32,
    /// Value-of-time thresholds splitting auto travelers into low/medium/high classes.
    pub vot_threshold_low: f32,
    pub vot_threshold_med: f32,
    /// Average occupancy of three-plus-occupant auto trips, by tour purpose.
    pub occupancy: BTreeMap<String, f32>,
    /// The detailed mode-code space. The default is the standard 26-code partition.
    #[serde(default)]
    pub modes: ModePartition,

    pub individual_trips: String,
    pub joint_trips: String,
    pub locations: String,
    pub access_points: String,
    pub output_dir: String,

    #[serde(default = "default_auto_matrix")]
    pub auto_matrix: String,
    #[serde(default = "default_nmot_matrix")]
    pub nmot_matrix: String,
    #[serde(default = "default_transit_matrix")]
    pub transit_matrix: String,
    #[serde(default = "default_other_matrix")]
    pub other_matrix: String,

    #[serde(default = "default_location_report")]
    pub location_report: String,
    #[serde(default = "default_access_point_report")]
    pub access_point_report: String,

    #[serde(default)]
    pub matrix_format: MatrixFormat,
}

fn default_auto_matrix() -> String {
    "auto_trips".to_string()
}
fn default_nmot_matrix() -> String {
    "nmot_trips".to_string()
}
fn default_transit_matrix() -> String {
    "transit_trips".to_string()
}
fn default_other_matrix() -> String {
    "other_trips".to_string()
}
fn default_location_report() -> String {
    "parked_vehicles.csv".to_string()
}
fn default_access_point_report() -> String {
    "parked_vehicles_at_access_points.csv".to_string()
}

impl Config {
    pub fn load(path: &str) -> Result<Config> {
        let file = fs_err::File::open(path)?;
        let config: Config = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse config {}", path))?;
        Ok(config)
    }

    /// Checks every statically checkable constraint. Anything caught here would otherwise
    /// surface mid-run, after matrices have already been written.
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate > 0.0 && self.sample_rate <= 1.0) {
            bail!("sample_rate {} must be in (0, 1]", self.sample_rate);
        }
        if self.vot_threshold_low < 0.0 || self.vot_threshold_low > self.vot_threshold_med {
            bail!(
                "value-of-time thresholds must satisfy 0 <= low <= med, got ({}, {})",
                self.vot_threshold_low,
                self.vot_threshold_med
            );
        }
        for (purpose, &occ) in &self.occupancy {
            if occ <= 1.0 {
                bail!("occupancy {} for purpose {} must exceed 1", occ, purpose);
            }
        }
        Ok(())
    }

    /// The base file name for a group's matrices; the period and bin labels get appended.
    pub fn matrix_base_name(&self, group: ModeGroup) -> &str {
        match group {
            ModeGroup::Auto => &self.auto_matrix,
            ModeGroup::NonMotorized => &self.nmot_matrix,
            ModeGroup::Transit => &self.transit_matrix,
            ModeGroup::Other => &self.other_matrix,
        }
    }
}

impl Default for Config {
    /// A blank config with valid weights and thresholds; tests fill in what they need.
    fn default() -> Config {
        Config {
            sample_rate: 1.0,
            vot_threshold_low: 10.0,
            vot_threshold_med: 25.0,
            occupancy: BTreeMap::new(),
            modes: ModePartition::default(),
            individual_trips: String::new(),
            joint_trips: String::new(),
            locations: String::new(),
            access_points: String::new(),
            output_dir: String::new(),
            auto_matrix: default_auto_matrix(),
            nmot_matrix: default_nmot_matrix(),
            transit_matrix: default_transit_matrix(),
            other_matrix: default_other_matrix(),
            location_report: default_location_report(),
            access_point_report: default_access_point_report(),
            matrix_format: MatrixFormat::Float32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation() {
        let mut config = Config::default();
        config.validate().unwrap();

        config.sample_rate = 0.0;
        assert!(config.validate().is_err());
        config.sample_rate = 1.5;
        assert!(config.validate().is_err());
        config.sample_rate = 0.25;
        config.validate().unwrap();

        config.vot_threshold_low = 30.0;
        assert!(config.validate().is_err());
        config.vot_threshold_low = 10.0;

        config.occupancy.insert("Work".to_string(), 1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn minimal_json() {
        let config: Config = serde_json::from_str(
            r#"{
                "sample_rate": 0.5,
                "vot_threshold_low": 8.0,
                "vot_threshold_med": 16.0,
                "occupancy": {"Work": 3.33},
                "individual_trips": "trips_ind.csv",
                "joint_trips": "trips_joint.csv",
                "locations": "locations.csv",
                "access_points": "access_points.csv",
                "output_dir": "out"
            }"#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.modes.names.len(), 26);
        assert_eq!(config.matrix_base_name(crate::ModeGroup::Transit), "transit_trips");
        assert_eq!(config.matrix_format, MatrixFormat::Float32);
    }
}
