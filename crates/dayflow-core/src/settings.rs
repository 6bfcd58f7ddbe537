//! Per-user day planner settings.
//!
//! One record, consumed globally. Synthesized with defaults on first read
//! and persisted; mutated only through [`SettingsPatch`] updates.

use serde::{Deserialize, Serialize};

use crate::task::StrategicCategory;
use crate::time::Minutes;

/// Meal anchor times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealTimes {
    #[serde(default = "default_breakfast")]
    pub breakfast: Minutes,
    #[serde(default = "default_lunch")]
    pub lunch: Minutes,
    #[serde(default = "default_dinner")]
    pub dinner: Minutes,
}

/// Gym routine: duration plus the preferred placement window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GymRoutine {
    #[serde(default = "default_gym_duration")]
    pub duration_minutes: u32,
    #[serde(default = "default_gym_window_start")]
    pub window_start: Minutes,
    #[serde(default = "default_gym_window_end")]
    pub window_end: Minutes,
}

/// Recovery walk routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkRoutine {
    #[serde(default = "default_walk_duration")]
    pub duration_minutes: u32,
    #[serde(default = "default_true")]
    pub auto_inject: bool,
}

/// Meal prep routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPrepRoutine {
    #[serde(default = "default_meal_prep_duration")]
    pub duration_minutes: u32,
    #[serde(default = "default_true")]
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RoutineDefaults {
    #[serde(default)]
    pub gym: GymRoutine,
    #[serde(default)]
    pub walk: WalkRoutine,
    #[serde(default)]
    pub meal_prep: MealPrepRoutine,
}

/// Constraints on what may be scheduled after a work shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EveningConstraints {
    #[serde(default = "default_evening_categories")]
    pub allowed_categories: Vec<StrategicCategory>,
    /// Total task minutes allowed in the evening slot (transit excluded).
    #[serde(default = "default_evening_budget")]
    pub max_duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlannerSettings {
    #[serde(default = "default_wake_work")]
    pub wake_time_work: Minutes,
    #[serde(default = "default_wake_off")]
    pub wake_time_off: Minutes,
    #[serde(default = "default_bed_work")]
    pub bed_time_work: Minutes,
    #[serde(default = "default_bed_off")]
    pub bed_time_off: Minutes,
    #[serde(default)]
    pub meal_times: MealTimes,
    #[serde(default)]
    pub routines: RoutineDefaults,
    #[serde(default)]
    pub evening: EveningConstraints,
    #[serde(default)]
    pub chill_mode_active: bool,
}

// Default values mirror the seeded settings record.
fn default_wake_work() -> Minutes {
    Minutes::from_hm(3, 30)
}
fn default_wake_off() -> Minutes {
    Minutes::from_hm(9, 0)
}
fn default_bed_work() -> Minutes {
    Minutes::from_hm(21, 30)
}
fn default_bed_off() -> Minutes {
    Minutes::from_hm(23, 30)
}
fn default_breakfast() -> Minutes {
    Minutes::from_hm(9, 30)
}
fn default_lunch() -> Minutes {
    Minutes::from_hm(13, 0)
}
fn default_dinner() -> Minutes {
    Minutes::from_hm(19, 0)
}
fn default_gym_duration() -> u32 {
    90
}
fn default_gym_window_start() -> Minutes {
    Minutes::from_hm(8, 0)
}
fn default_gym_window_end() -> Minutes {
    Minutes::from_hm(12, 0)
}
fn default_walk_duration() -> u32 {
    30
}
fn default_meal_prep_duration() -> u32 {
    45
}
fn default_true() -> bool {
    true
}
fn default_evening_categories() -> Vec<StrategicCategory> {
    vec![StrategicCategory::Personal, StrategicCategory::Health]
}
fn default_evening_budget() -> u32 {
    120
}

impl Default for MealTimes {
    fn default() -> Self {
        MealTimes {
            breakfast: default_breakfast(),
            lunch: default_lunch(),
            dinner: default_dinner(),
        }
    }
}

impl Default for GymRoutine {
    fn default() -> Self {
        GymRoutine {
            duration_minutes: default_gym_duration(),
            window_start: default_gym_window_start(),
            window_end: default_gym_window_end(),
        }
    }
}

impl Default for WalkRoutine {
    fn default() -> Self {
        WalkRoutine {
            duration_minutes: default_walk_duration(),
            auto_inject: true,
        }
    }
}

impl Default for MealPrepRoutine {
    fn default() -> Self {
        MealPrepRoutine {
            duration_minutes: default_meal_prep_duration(),
            required: true,
        }
    }
}

impl Default for EveningConstraints {
    fn default() -> Self {
        EveningConstraints {
            allowed_categories: default_evening_categories(),
            max_duration_minutes: default_evening_budget(),
        }
    }
}

impl Default for DayPlannerSettings {
    fn default() -> Self {
        DayPlannerSettings {
            wake_time_work: default_wake_work(),
            wake_time_off: default_wake_off(),
            bed_time_work: default_bed_work(),
            bed_time_off: default_bed_off(),
            meal_times: MealTimes::default(),
            routines: RoutineDefaults::default(),
            evening: EveningConstraints::default(),
            chill_mode_active: false,
        }
    }
}

/// Partial settings update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub wake_time_work: Option<Minutes>,
    pub wake_time_off: Option<Minutes>,
    pub bed_time_work: Option<Minutes>,
    pub bed_time_off: Option<Minutes>,
    pub meal_times: Option<MealTimes>,
    pub routines: Option<RoutineDefaults>,
    pub evening: Option<EveningConstraints>,
    pub chill_mode_active: Option<bool>,
}

impl SettingsPatch {
    pub fn apply(self, settings: &mut DayPlannerSettings) {
        if let Some(v) = self.wake_time_work {
            settings.wake_time_work = v;
        }
        if let Some(v) = self.wake_time_off {
            settings.wake_time_off = v;
        }
        if let Some(v) = self.bed_time_work {
            settings.bed_time_work = v;
        }
        if let Some(v) = self.bed_time_off {
            settings.bed_time_off = v;
        }
        if let Some(v) = self.meal_times {
            settings.meal_times = v;
        }
        if let Some(v) = self.routines {
            settings.routines = v;
        }
        if let Some(v) = self.evening {
            settings.evening = v;
        }
        if let Some(v) = self.chill_mode_active {
            settings.chill_mode_active = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_seed_record() {
        let s = DayPlannerSettings::default();
        assert_eq!(s.wake_time_work, Minutes::from_hm(3, 30));
        assert_eq!(s.bed_time_off, Minutes::from_hm(23, 30));
        assert_eq!(s.routines.gym.duration_minutes, 90);
        assert!(s.routines.meal_prep.required);
        assert_eq!(s.evening.max_duration_minutes, 120);
        assert!(!s.chill_mode_active);
    }

    #[test]
    fn partial_json_fills_missing_fields_with_defaults() {
        let s: DayPlannerSettings =
            serde_json::from_str(r#"{"bed_time_work": "22:00"}"#).unwrap();
        assert_eq!(s.bed_time_work, Minutes::from_hm(22, 0));
        assert_eq!(s.wake_time_work, Minutes::from_hm(3, 30));
        assert_eq!(
            s.evening.allowed_categories,
            vec![StrategicCategory::Personal, StrategicCategory::Health]
        );
    }

    #[test]
    fn patch_applies_only_set_fields() {
        let mut s = DayPlannerSettings::default();
        SettingsPatch {
            chill_mode_active: Some(true),
            bed_time_off: Some(Minutes::from_hm(0, 30)),
            ..Default::default()
        }
        .apply(&mut s);
        assert!(s.chill_mode_active);
        assert_eq!(s.bed_time_off, Minutes::from_hm(0, 30));
        assert_eq!(s.wake_time_off, Minutes::from_hm(9, 0));
    }
}
