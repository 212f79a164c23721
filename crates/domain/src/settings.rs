use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Apparatus, Frontend, LookupError, format_weight};

/// User-editable configuration of an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Settings {
    VariableWeight(VariableWeightSetting),
    DerivedWeight(DerivedWeightSetting),
    FixedWeight(FixedWeightSetting),
    VariableReps(VariableRepsSetting),
    Intensity(IntensitySetting),
    Hiit(HiitSetting),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SettingsKind {
    #[strum(to_string = "variable weight")]
    VariableWeight,
    #[strum(to_string = "derived weight")]
    DerivedWeight,
    #[strum(to_string = "fixed weight")]
    FixedWeight,
    #[strum(to_string = "variable reps")]
    VariableReps,
    #[strum(to_string = "intensity")]
    Intensity,
    #[strum(to_string = "HIIT")]
    Hiit,
}

/// A weight that is progressed by a plan.
///
/// Every change of the weight stamps `updated`. Changes made by the user also stamp
/// `user_updated`, which deloads treat as the point from which a gap is measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableWeightSetting {
    pub apparatus: Apparatus,
    weight: f64,
    #[serde(default)]
    updated: Option<NaiveDateTime>,
    #[serde(default)]
    user_updated: Option<NaiveDateTime>,
    pub rest_secs: u32,
    #[serde(default)]
    stalls: u32,
    #[serde(default)]
    pub reps: Option<u32>,
}

impl VariableWeightSetting {
    #[must_use]
    pub fn new(apparatus: Apparatus, weight: f64, rest_secs: u32) -> Self {
        Self {
            apparatus,
            weight,
            updated: None,
            user_updated: None,
            rest_secs,
            stalls: 0,
            reps: None,
        }
    }

    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[must_use]
    pub fn updated(&self) -> Option<NaiveDateTime> {
        self.updated
    }

    #[must_use]
    pub fn user_updated(&self) -> Option<NaiveDateTime> {
        self.user_updated
    }

    #[must_use]
    pub fn stalls(&self) -> u32 {
        self.stalls
    }

    pub fn set_weight(&mut self, weight: f64, now: NaiveDateTime) {
        self.weight = weight;
        self.updated = Some(now);
    }

    pub fn set_weight_by_user(&mut self, weight: f64, now: NaiveDateTime) {
        self.set_weight(weight, now);
        self.user_updated = Some(now);
    }

    /// Returns the number of consecutive stalls including this one.
    pub fn record_stall(&mut self) -> u32 {
        self.stalls += 1;
        self.stalls
    }

    pub fn clear_stalls(&mut self) {
        self.stalls = 0;
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        let mut problems = vec![];
        if self.weight < 0.0 {
            problems.push(format!(
                "Weight cannot be negative ({})",
                format_weight(self.weight)
            ));
        }
        if self.reps == Some(0) {
            problems.push("Reps must be at least 1".to_string());
        }
        problems.extend(self.apparatus.errors());
        problems
    }
}

/// A weight taken from another exercise of the same program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedWeightSetting {
    pub other_exercise: String,
    pub rest_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedWeightSetting {
    pub weight: f64,
    pub rest_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRepsSetting {
    pub requested_reps: u32,
    pub weight: f64,
    pub rest_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensitySetting {
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiitSetting {
    pub warmup_secs: u32,
    pub high_secs: u32,
    pub low_secs: u32,
    pub cooldown_secs: u32,
    pub num_cycles: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl HiitSetting {
    #[must_use]
    pub fn total_secs(&self) -> u32 {
        self.num_cycles
            .saturating_mul(self.high_secs.saturating_add(self.low_secs))
            .saturating_add(self.warmup_secs)
            .saturating_add(self.cooldown_secs)
    }
}

impl Settings {
    #[must_use]
    pub fn kind(&self) -> SettingsKind {
        match self {
            Settings::VariableWeight(_) => SettingsKind::VariableWeight,
            Settings::DerivedWeight(_) => SettingsKind::DerivedWeight,
            Settings::FixedWeight(_) => SettingsKind::FixedWeight,
            Settings::VariableReps(_) => SettingsKind::VariableReps,
            Settings::Intensity(_) => SettingsKind::Intensity,
            Settings::Hiit(_) => SettingsKind::Hiit,
        }
    }

    pub fn variable_weight(&self, exercise: &str) -> Result<&VariableWeightSetting, LookupError> {
        match self {
            Settings::VariableWeight(setting) => Ok(setting),
            _ => Err(self.wrong_kind(exercise, SettingsKind::VariableWeight)),
        }
    }

    pub fn variable_weight_mut(
        &mut self,
        exercise: &str,
    ) -> Result<&mut VariableWeightSetting, LookupError> {
        match self {
            Settings::VariableWeight(setting) => Ok(setting),
            _ => Err(self.wrong_kind(exercise, SettingsKind::VariableWeight)),
        }
    }

    pub fn derived_weight(&self, exercise: &str) -> Result<&DerivedWeightSetting, LookupError> {
        match self {
            Settings::DerivedWeight(setting) => Ok(setting),
            _ => Err(self.wrong_kind(exercise, SettingsKind::DerivedWeight)),
        }
    }

    pub fn hiit(&self, exercise: &str) -> Result<&HiitSetting, LookupError> {
        match self {
            Settings::Hiit(setting) => Ok(setting),
            _ => Err(self.wrong_kind(exercise, SettingsKind::Hiit)),
        }
    }

    fn wrong_kind(&self, exercise: &str, expected: SettingsKind) -> LookupError {
        LookupError::WrongSettings {
            exercise: exercise.to_string(),
            expected,
            found: self.kind(),
        }
    }

    #[must_use]
    pub fn apparatus(&self) -> Option<&Apparatus> {
        match self {
            Settings::VariableWeight(setting) => Some(&setting.apparatus),
            _ => None,
        }
    }

    #[must_use]
    pub fn rest_secs(&self) -> Option<u32> {
        match self {
            Settings::VariableWeight(VariableWeightSetting { rest_secs, .. })
            | Settings::DerivedWeight(DerivedWeightSetting { rest_secs, .. })
            | Settings::FixedWeight(FixedWeightSetting { rest_secs, .. })
            | Settings::VariableReps(VariableRepsSetting { rest_secs, .. }) => Some(*rest_secs),
            Settings::Intensity(_) | Settings::Hiit(_) => None,
        }
    }

    /// The weight used by `exercise`.
    ///
    /// A derived weight is looked up in the referenced exercise, which must carry a weight itself.
    pub fn weight(&self, exercise: &str, frontend: &dyn Frontend) -> Result<f64, LookupError> {
        match self {
            Settings::VariableWeight(setting) => Ok(setting.weight),
            Settings::FixedWeight(FixedWeightSetting { weight, .. })
            | Settings::VariableReps(VariableRepsSetting { weight, .. }) => Ok(*weight),
            Settings::DerivedWeight(DerivedWeightSetting { other_exercise, .. }) => {
                let other = frontend
                    .find_exercise(other_exercise)
                    .ok_or_else(|| LookupError::ExerciseNotFound(other_exercise.clone()))?;
                match other.settings {
                    Settings::DerivedWeight(_) => {
                        Err(LookupError::NoWeight(other_exercise.clone()))
                    }
                    _ => other.settings.weight(other_exercise, frontend),
                }
            }
            Settings::Intensity(_) | Settings::Hiit(_) => {
                Err(LookupError::NoWeight(exercise.to_string()))
            }
        }
    }

    #[must_use]
    pub fn errors(&self, exercise: &str, frontend: &dyn Frontend) -> Vec<String> {
        let mut problems = vec![];

        match self {
            Settings::VariableWeight(setting) => problems.extend(setting.errors()),
            Settings::DerivedWeight(DerivedWeightSetting { other_exercise, .. }) => {
                if other_exercise == exercise {
                    problems.push(format!(
                        "Exercise '{exercise}' cannot derive its weight from itself"
                    ));
                } else if frontend.find_exercise(other_exercise).is_none() {
                    problems.push(LookupError::ExerciseNotFound(other_exercise.clone()).to_string());
                }
            }
            Settings::FixedWeight(FixedWeightSetting { weight, .. }) => {
                check_weight(&mut problems, *weight);
            }
            Settings::VariableReps(VariableRepsSetting {
                requested_reps,
                weight,
                ..
            }) => {
                check_weight(&mut problems, *weight);
                if *requested_reps == 0 {
                    problems.push("Requested reps must be at least 1".to_string());
                }
            }
            Settings::Intensity(IntensitySetting { tag }) => {
                if tag.trim().is_empty() {
                    problems.push("Intensity tag cannot be empty".to_string());
                }
            }
            Settings::Hiit(setting) => {
                if setting.num_cycles == 0 {
                    problems.push("HIIT needs at least one cycle".to_string());
                }
                if setting.high_secs == 0 {
                    problems.push("HIIT high intensity interval cannot be empty".to_string());
                }
            }
        }

        problems
    }
}

fn check_weight(problems: &mut Vec<String>, weight: f64) {
    if weight < 0.0 {
        problems.push(format!("Weight cannot be negative ({})", format_weight(weight)));
    }
}
