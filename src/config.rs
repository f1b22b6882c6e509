use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{FormError, Result};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub squat: SquatConfig,
    #[serde(default)]
    pub pushup: PushupConfig,
    #[serde(default)]
    pub bicep_curl: BicepCurlConfig,
    #[serde(default)]
    pub shoulder_press: ShoulderPressConfig,
    #[serde(default)]
    pub plank: PlankConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Keypoints at or below this confidence count as not visible
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// Minimum dwell time before a phase change is accepted (ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_confidence_threshold() -> f32 { 0.3 }
fn default_debounce_ms() -> u64 { 500 }

impl EngineConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Squat thresholds. Angles in degrees, distances in image pixels.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SquatConfig {
    /// Average knee angle below this is the bottom of the squat
    pub down_angle: f32,
    /// Average knee angle at or above this is standing
    pub up_angle: f32,
    pub great_depth_angle: f32,
    pub shallow_deduction: i32,
    /// Knees narrower than ankle width times this ratio are caving in
    pub knee_cave_ratio: f32,
    pub knee_cave_deduction: i32,
    pub head_forward_error_px: f32,
    pub head_forward_error_deduction: i32,
    pub head_forward_warning_px: f32,
    pub head_forward_warning_deduction: i32,
    pub knee_forward_px: f32,
    pub knee_forward_deduction: i32,
}

impl Default for SquatConfig {
    fn default() -> Self {
        Self {
            down_angle: 100.0,
            up_angle: 140.0,
            great_depth_angle: 90.0,
            shallow_deduction: 25,
            knee_cave_ratio: 0.8,
            knee_cave_deduction: 20,
            head_forward_error_px: 60.0,
            head_forward_error_deduction: 20,
            head_forward_warning_px: 40.0,
            head_forward_warning_deduction: 10,
            knee_forward_px: 70.0,
            knee_forward_deduction: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PushupConfig {
    pub down_angle: f32,
    pub up_angle: f32,
    pub shallow_deduction: i32,
    /// Hip to shoulder vertical offset tolerated in either direction
    pub hip_offset_px: f32,
    pub hip_sag_deduction: i32,
    pub hip_high_deduction: i32,
    /// Elbow width above shoulder width times this ratio is flaring
    pub elbow_flare_ratio: f32,
    pub elbow_flare_deduction: i32,
}

impl Default for PushupConfig {
    fn default() -> Self {
        Self {
            down_angle: 100.0,
            up_angle: 140.0,
            shallow_deduction: 20,
            hip_offset_px: 50.0,
            hip_sag_deduction: 25,
            hip_high_deduction: 20,
            elbow_flare_ratio: 1.4,
            elbow_flare_deduction: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BicepCurlConfig {
    /// Average elbow angle below this is a full contraction
    pub top_angle: f32,
    pub partial_angle: f32,
    /// Average elbow angle above this is the extended start position
    pub extended_angle: f32,
    pub partial_curl_deduction: i32,
    /// Elbow height as a fraction of the shoulder-hip span must stay inside this band
    pub elbow_band_min: f32,
    pub elbow_band_max: f32,
    pub elbow_drift_deduction: i32,
    pub swing_deduction: i32,
}

impl Default for BicepCurlConfig {
    fn default() -> Self {
        Self {
            top_angle: 50.0,
            partial_angle: 90.0,
            extended_angle: 160.0,
            partial_curl_deduction: 15,
            elbow_band_min: 0.3,
            elbow_band_max: 0.7,
            elbow_drift_deduction: 25,
            swing_deduction: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShoulderPressConfig {
    /// Wrists this far above the shoulders (with locked elbows) is lockout
    pub lockout_height_px: f32,
    pub lockout_angle: f32,
    pub partial_height_px: f32,
    pub partial_press_deduction: i32,
    pub wrist_width_tolerance_px: f32,
    pub wrist_width_deduction: i32,
}

impl Default for ShoulderPressConfig {
    fn default() -> Self {
        Self {
            lockout_height_px: 100.0,
            lockout_angle: 160.0,
            partial_height_px: 50.0,
            partial_press_deduction: 20,
            wrist_width_tolerance_px: 40.0,
            wrist_width_deduction: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlankConfig {
    pub hip_offset_px: f32,
    pub hip_sag_deduction: i32,
    pub hip_high_deduction: i32,
    /// Hip offset under this reads as a perfectly straight line
    pub straight_line_px: f32,
    pub elbow_alignment_px: f32,
    pub elbow_alignment_deduction: i32,
}

impl Default for PlankConfig {
    fn default() -> Self {
        Self {
            hip_offset_px: 60.0,
            hip_sag_deduction: 30,
            hip_high_deduction: 25,
            straight_line_px: 20.0,
            elbow_alignment_px: 30.0,
            elbow_alignment_deduction: 15,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| FormError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file if it exists and parses, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "using default config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.engine.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(FormError::InvalidConfig(format!(
                "engine.confidence_threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        if self.engine.debounce_ms == 0 {
            return Err(FormError::InvalidConfig(
                "engine.debounce_ms must be greater than zero".to_string(),
            ));
        }
        if self.squat.down_angle > self.squat.up_angle {
            return Err(FormError::InvalidConfig(
                "squat.down_angle must not exceed squat.up_angle".to_string(),
            ));
        }
        if self.pushup.down_angle > self.pushup.up_angle {
            return Err(FormError::InvalidConfig(
                "pushup.down_angle must not exceed pushup.up_angle".to_string(),
            ));
        }
        if self.bicep_curl.elbow_band_min > self.bicep_curl.elbow_band_max {
            return Err(FormError::InvalidConfig(
                "bicep_curl.elbow_band_min must not exceed elbow_band_max".to_string(),
            ));
        }
        Ok(())
    }
}
