use serde::{Deserialize, Serialize};

use crate::{Apparatus, Weight, WeightInfo};

/// Reps used for bar-only sets when no warmup reps are scheduled.
const DEFAULT_BAR_REPS: u32 = 5;

/// A ramp of lighter sets preceding the work sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warmups {
    /// Number of sets with the empty apparatus.
    pub with_bar: u32,
    pub first_percent: f64,
    pub last_percent: f64,
    pub reps: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupSet {
    pub reps: u32,
    pub set_number: u32,
    pub percent: f64,
    pub weight: WeightInfo,
}

impl Warmups {
    #[must_use]
    pub fn new(with_bar: u32, first_percent: f64, last_percent: f64, reps: &[u32]) -> Self {
        Self {
            with_bar,
            first_percent,
            last_percent,
            reps: reps.to_vec(),
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self::new(0, 0.0, 0.0, &[])
    }

    /// Warmup sets for the work weight `target`.
    ///
    /// Each warmup is snapped below the target unless `allow_exceed` is set, in which case the
    /// nearest load is used.
    ///
    /// # Panics
    ///
    /// Panics if the apparatus doesn't support weight search.
    #[must_use]
    pub fn compute(&self, apparatus: &Apparatus, target: f64, allow_exceed: bool) -> Vec<WarmupSet> {
        let resolve = |percent: f64| {
            let weight = Weight::new(target * percent, apparatus);
            if allow_exceed {
                weight.closest()
            } else {
                weight.closest_below(target)
            }
        };
        let bar_reps = self.reps.first().copied().unwrap_or(DEFAULT_BAR_REPS);

        let mut sets = (1..=self.with_bar)
            .map(|set_number| WarmupSet {
                reps: bar_reps,
                set_number,
                percent: 0.0,
                weight: resolve(0.0),
            })
            .collect::<Vec<_>>();

        let count = self.reps.len();
        for (i, reps) in self.reps.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let percent = if count == 1 {
                self.first_percent
            } else if i == count - 1 {
                self.last_percent
            } else {
                self.first_percent
                    + (self.last_percent - self.first_percent) * i as f64 / (count - 1) as f64
            };
            #[allow(clippy::cast_possible_truncation)]
            sets.push(WarmupSet {
                reps: *reps,
                set_number: self.with_bar + i as u32 + 1,
                percent,
                weight: resolve(percent),
            });
        }

        sets
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        let mut problems = vec![];

        if !(0.0..=1.0).contains(&self.first_percent) || !(0.0..=1.0).contains(&self.last_percent)
        {
            problems.push("Warmup percentages must be between 0 and 100%".to_string());
        }
        if self.first_percent > self.last_percent {
            problems.push("First warmup percentage cannot exceed the last one".to_string());
        }
        if self.reps.contains(&0) {
            problems.push("Warmup reps must be at least 1".to_string());
        }

        problems
    }
}
