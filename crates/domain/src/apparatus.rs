use serde::{Deserialize, Serialize};

use crate::format_weight;

/// The equipment an exercise is performed with.
///
/// Determines which discrete loads are producible. All weights are in the canonical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Apparatus {
    /// `collar` is the combined weight of both collars.
    Barbell {
        bar: f64,
        collar: f64,
        plates: Vec<f64>,
        #[serde(default)]
        bumpers: Vec<f64>,
        #[serde(default)]
        magnets: Vec<f64>,
    },
    /// Plates loaded in pairs onto a machine without a bar.
    PairedPlates { plates: Vec<f64> },
    /// Plates loaded one at a time, e.g. onto a dip belt.
    SinglePlates { plates: Vec<f64> },
    DumbbellSingle {
        weights: Vec<f64>,
        #[serde(default)]
        magnets: Vec<f64>,
    },
    DumbbellPaired {
        weights: Vec<f64>,
        #[serde(default)]
        magnets: Vec<f64>,
    },
    Machine {
        range1: MachineRange,
        #[serde(default)]
        range2: Option<MachineRange>,
        extra: Vec<f64>,
    },
}

impl Apparatus {
    #[must_use]
    pub fn barbell(bar: f64, plates: &[f64]) -> Self {
        Apparatus::Barbell {
            bar,
            collar: 0.0,
            plates: plates.to_vec(),
            bumpers: vec![],
            magnets: vec![],
        }
    }

    #[must_use]
    pub fn machine(range: MachineRange, extra: &[f64]) -> Self {
        Apparatus::Machine {
            range1: range,
            range2: None,
            extra: extra.to_vec(),
        }
    }

    /// Dumbbells are picked directly from a short list and cannot be searched for a nearby load.
    #[must_use]
    pub fn supports_search(&self) -> bool {
        !matches!(
            self,
            Apparatus::DumbbellSingle { .. } | Apparatus::DumbbellPaired { .. }
        )
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        let mut problems = vec![];

        match self {
            Apparatus::Barbell {
                bar,
                collar,
                plates,
                bumpers,
                magnets,
            } => {
                if *bar < 0.0 {
                    problems.push(format!("Bar weight cannot be negative ({})", format_weight(*bar)));
                }
                if *collar < 0.0 {
                    problems.push(format!(
                        "Collar weight cannot be negative ({})",
                        format_weight(*collar)
                    ));
                }
                if plates.is_empty() && bumpers.is_empty() {
                    problems.push("Plates and bumpers cannot both be empty".to_string());
                }
                check_weights(&mut problems, "Plates", plates);
                check_weights(&mut problems, "Bumpers", bumpers);
                check_weights(&mut problems, "Magnets", magnets);
            }
            Apparatus::PairedPlates { plates } | Apparatus::SinglePlates { plates } => {
                if plates.is_empty() {
                    problems.push("Plates cannot be empty".to_string());
                }
                check_weights(&mut problems, "Plates", plates);
            }
            Apparatus::DumbbellSingle { weights, magnets }
            | Apparatus::DumbbellPaired { weights, magnets } => {
                if weights.is_empty() {
                    problems.push("Dumbbells cannot be empty".to_string());
                }
                check_weights(&mut problems, "Dumbbells", weights);
                check_weights(&mut problems, "Magnets", magnets);
            }
            Apparatus::Machine {
                range1,
                range2,
                extra,
            } => {
                problems.extend(range1.errors());
                if let Some(range2) = range2 {
                    problems.extend(range2.errors());
                }
                if !extra.iter().any(|e| e.abs() < f64::EPSILON) {
                    problems.push("Extra weights must include 0".to_string());
                }
                check_weights(&mut problems, "Extra weights", extra);
            }
        }

        problems
    }
}

fn check_weights(problems: &mut Vec<String>, what: &str, weights: &[f64]) {
    if let Some(w) = weights.iter().find(|w| **w < 0.0) {
        problems.push(format!("{what} cannot be negative ({})", format_weight(*w)));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl MachineRange {
    #[must_use]
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// All weights from `min` to `max` in increments of `step`.
    ///
    /// An invalid range yields only `min`.
    #[must_use]
    pub fn weights(&self) -> Vec<f64> {
        if self.step <= 0.0 || self.max < self.min {
            return vec![self.min];
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = ((self.max - self.min) / self.step + 1e-6).floor() as usize;

        #[allow(clippy::cast_precision_loss)]
        (0..=count)
            .map(|i| ((self.min + i as f64 * self.step) * 1000.0).round() / 1000.0)
            .collect()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        let mut problems = vec![];

        if self.min < 1.0 {
            problems.push(format!(
                "Machine minimum must be at least 1 ({})",
                format_weight(self.min)
            ));
        }
        if self.min > self.max {
            problems.push(format!(
                "Machine minimum cannot be larger than maximum ({} > {})",
                format_weight(self.min),
                format_weight(self.max)
            ));
        }
        if self.step < 0.1 {
            problems.push(format!(
                "Machine step must be at least 0.1 ({})",
                format_weight(self.step)
            ));
        }

        problems
    }
}
