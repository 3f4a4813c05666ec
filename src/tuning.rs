//! Data-driven game balance
//!
//! Every number the simulation uses that isn't a playfield constant lives
//! here, so a greeting can be re-themed from a JSON blob.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::Settings;
use crate::sim::SpawnPolicy;

/// Phrase spelled out when no tuning is supplied
pub const DEFAULT_PHRASE: &str = "HAPPY NEW YEAR";

/// Problems found while loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("phrase must contain at least one letter")]
    EmptyPhrase,

    #[error("{field} range is inverted ({min} > {max})")]
    InvalidRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Phrase to spell; whitespace is not collected
    pub phrase: String,
    pub spawn_policy: SpawnPolicy,
    /// Minimum gap between spawns
    pub spawn_interval_ms: u32,
    /// Token fall speed range (units per tick)
    pub fall_speed_min: f32,
    pub fall_speed_max: f32,
    /// Horizontal sway per tick at the sine peak
    pub sway_amplitude: f32,
    /// Sway angular speed range (radians/second)
    pub sway_speed_min: f32,
    pub sway_speed_max: f32,
    /// Projectile rise per tick
    pub projectile_speed: f32,
    /// Half-size of the square hit box, on each axis
    pub hit_radius: f32,
    /// At most one projectile in flight
    pub single_projectile: bool,
    /// Pause between completing the phrase and showing the greeting
    pub overlay_delay_ms: u32,
    /// Pause before play starts
    pub entrance_delay_ms: u32,
    /// Distance one tap of left/right moves the character
    pub step_distance: f32,
    /// Travel per tick while a direction is held
    pub held_speed: f32,
    /// Fraction of the remaining distance covered each tick
    pub smoothing: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            phrase: DEFAULT_PHRASE.to_string(),
            spawn_policy: SpawnPolicy::Interval,
            spawn_interval_ms: 2000,
            fall_speed_min: 0.3,
            fall_speed_max: 0.5,
            sway_amplitude: 0.15,
            sway_speed_min: 1.5,
            sway_speed_max: 3.0,
            projectile_speed: 3.0,
            hit_radius: 8.0,
            single_projectile: true,
            overlay_delay_ms: 1500,
            entrance_delay_ms: 600,
            step_distance: 5.0,
            held_speed: 1.5,
            smoothing: 0.35,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validated()
    }

    /// Reject what can't be repaired, clamp what can
    pub fn validated(mut self) -> Result<Self, TuningError> {
        if self.phrase.chars().all(char::is_whitespace) {
            return Err(TuningError::EmptyPhrase);
        }

        let defaults = Tuning::default();
        sanitize("fall_speed_min", &mut self.fall_speed_min, defaults.fall_speed_min);
        sanitize("fall_speed_max", &mut self.fall_speed_max, defaults.fall_speed_max);
        sanitize("projectile_speed", &mut self.projectile_speed, defaults.projectile_speed);
        sanitize("hit_radius", &mut self.hit_radius, defaults.hit_radius);
        if !self.sway_speed_min.is_finite() || !self.sway_speed_max.is_finite() {
            log::warn!("sway speed range is not finite, using defaults");
            self.sway_speed_min = defaults.sway_speed_min;
            self.sway_speed_max = defaults.sway_speed_max;
        }

        check_range("fall_speed", self.fall_speed_min, self.fall_speed_max)?;
        check_range("sway_speed", self.sway_speed_min, self.sway_speed_max)?;

        if !self.sway_amplitude.is_finite() || self.sway_amplitude < 0.0 {
            log::warn!("sway_amplitude {} out of range, disabling sway", self.sway_amplitude);
            self.sway_amplitude = 0.0;
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            let clamped = if self.smoothing > 1.0 { 1.0 } else { defaults.smoothing };
            log::warn!("smoothing {} out of range, using {}", self.smoothing, clamped);
            self.smoothing = clamped;
        }

        Ok(self)
    }

    /// Apply player preferences that change the simulation
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        if settings.reduced_motion {
            self.sway_amplitude = 0.0;
        }
        self
    }
}

fn check_range(field: &'static str, min: f32, max: f32) -> Result<(), TuningError> {
    if min > max {
        return Err(TuningError::InvalidRange { field, min, max });
    }
    Ok(())
}

/// Speeds and radii must be finite and positive
fn sanitize(field: &str, value: &mut f32, fallback: f32) {
    if !value.is_finite() || *value <= 0.0 {
        log::warn!("{} = {} is not positive, using {}", field, value, fallback);
        *value = fallback;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let tuning = Tuning::from_json("{}").unwrap();
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let tuning = Tuning::from_json(r#"{"phrase": "AB", "spawn_policy": "Serialized"}"#).unwrap();
        assert_eq!(tuning.phrase, "AB");
        assert_eq!(tuning.spawn_policy, SpawnPolicy::Serialized);
        assert_eq!(tuning.hit_radius, 8.0);
    }

    #[test]
    fn test_blank_phrase_rejected() {
        let err = Tuning::from_json(r#"{"phrase": "   "}"#).unwrap_err();
        assert!(matches!(err, TuningError::EmptyPhrase));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = Tuning::from_json(r#"{"fall_speed_min": 2.0, "fall_speed_max": 1.0}"#).unwrap_err();
        assert!(matches!(err, TuningError::InvalidRange { field: "fall_speed", .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Tuning::from_json("{phrase").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_nonpositive_values_repaired() {
        let tuning = Tuning::from_json(r#"{"hit_radius": -1.0, "smoothing": 4.0}"#).unwrap();
        assert_eq!(tuning.hit_radius, 8.0);
        assert_eq!(tuning.smoothing, 1.0);
    }

    #[test]
    fn test_reduced_motion_disables_sway() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let tuning = Tuning::default().with_settings(&settings);
        assert_eq!(tuning.sway_amplitude, 0.0);
    }
}
