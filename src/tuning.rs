//! Data-driven game balance
//!
//! Every balance number lives here. Defaults reproduce the shipped game; a
//! partial JSON override can be stored under [`Tuning::STORAGE_KEY`].

use serde::{Deserialize, Serialize};

use crate::platform::storage::KeyValueStore;

/// Invalid tuning override
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game balance constants (all times in 60 Hz ticks, speeds in px/tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub gravity: f32,
    /// Gravity multiplier above the soft ceiling
    pub floaty_gravity_scale: f32,
    /// Vertical velocity after a bounce (negative is up)
    pub bounce_strength: f32,
    pub move_speed: f32,
    /// Per-tick horizontal velocity retention with no input
    pub friction: f32,
    /// Drag distance to horizontal velocity
    pub drag_factor: f32,

    // === Flower spawning ===
    pub base_spawn_interval: f32,
    pub spawn_interval_step: f32,
    pub spawn_interval_score_step: u64,
    pub min_spawn_interval: f32,
    pub base_rise_speed: f32,
    pub rise_speed_step: f32,
    pub rise_speed_score_step: u64,
    pub max_rise_speed: f32,

    // === Finch ===
    pub finch_chance: f32,
    pub finch_points: u64,

    // === Eaters ===
    pub eater_descent_speed: f32,
    pub eater_leave_speed: f32,
    pub eater_chomp_ticks: f32,
    pub game_over_chomp_ticks: f32,

    // === Timers ===
    pub countdown_start: u32,
    pub ticks_per_count: f32,
    pub scolding_ticks: f32,
    pub bonus_text_ticks: f32,

    // === Effects ===
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.2,
            floaty_gravity_scale: 0.5,
            bounce_strength: -8.0,
            move_speed: 7.0,
            friction: 0.85,
            drag_factor: 0.2,

            base_spawn_interval: 60.0,
            spawn_interval_step: 5.0,
            spawn_interval_score_step: 30,
            min_spawn_interval: 35.0,
            base_rise_speed: 2.0,
            rise_speed_step: 0.3,
            rise_speed_score_step: 20,
            max_rise_speed: 4.0,

            finch_chance: 0.02,
            finch_points: 10,

            eater_descent_speed: 3.0,
            eater_leave_speed: 5.0,
            eater_chomp_ticks: 10.0,
            game_over_chomp_ticks: 6.0,

            countdown_start: 3,
            ticks_per_count: 60.0,
            scolding_ticks: 90.0,
            bonus_text_ticks: 60.0,

            max_particles: 256,
        }
    }
}

impl Tuning {
    /// Storage key for a JSON override
    pub const STORAGE_KEY: &'static str = "bouquet_rescue_tuning";

    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load the stored override, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(json) = store.get_item(Self::STORAGE_KEY) else {
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning override");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning override: {}", e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        };

        if self.bounce_strength >= 0.0 {
            return invalid("bounce_strength", "must be negative (upward)");
        }
        if self.gravity <= 0.0 {
            return invalid("gravity", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return invalid("friction", "must be within 0..=1");
        }
        if !(0.0..=1.0).contains(&self.finch_chance) {
            return invalid("finch_chance", "must be within 0..=1");
        }
        if self.min_spawn_interval <= 0.0 {
            return invalid("min_spawn_interval", "must be positive");
        }
        if self.min_spawn_interval > self.base_spawn_interval {
            return invalid("min_spawn_interval", "must not exceed base_spawn_interval");
        }
        if self.base_rise_speed > self.max_rise_speed {
            return invalid("base_rise_speed", "must not exceed max_rise_speed");
        }
        if self.spawn_interval_score_step == 0 || self.rise_speed_score_step == 0 {
            return invalid("score_step", "must be non-zero");
        }
        if self.countdown_start == 0 {
            return invalid("countdown_start", "must be at least 1");
        }
        if self.ticks_per_count <= 0.0 {
            return invalid("ticks_per_count", "must be positive");
        }
        if self.eater_chomp_ticks <= 0.0 || self.game_over_chomp_ticks <= 0.0 {
            return invalid("chomp_ticks", "must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "move_speed": 9.0, "finch_points": 25 }"#).unwrap();
        assert_eq!(tuning.move_speed, 9.0);
        assert_eq!(tuning.finch_points, 25);
        assert_eq!(tuning.bounce_strength, -8.0);
        assert_eq!(tuning.min_spawn_interval, 35.0);
    }

    #[test]
    fn test_rejects_downward_bounce() {
        let err = Tuning::from_json(r#"{ "bounce_strength": 3.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "bounce_strength",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_countdown() {
        let err = Tuning::from_json(r#"{ "countdown_start": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "countdown_start",
                ..
            }
        ));

        let mut store = MemoryStore::default();
        store
            .set_item(Tuning::STORAGE_KEY, r#"{ "countdown_start": 0 }"#)
            .unwrap();
        assert_eq!(Tuning::load(&store).countdown_start, 3);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_load_falls_back_on_bad_override() {
        let mut store = MemoryStore::default();
        store
            .set_item(Tuning::STORAGE_KEY, r#"{ "friction": 4.0 }"#)
            .unwrap();
        assert_eq!(Tuning::load(&store), Tuning::default());

        store
            .set_item(Tuning::STORAGE_KEY, r#"{ "scolding_ticks": 30.0 }"#)
            .unwrap();
        assert_eq!(Tuning::load(&store).scolding_ticks, 30.0);
    }
}
