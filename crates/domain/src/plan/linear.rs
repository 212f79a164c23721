use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::{
    Activity, Completions, Context, Deload, Exercise, Lifecycle, NRepMaxPlan, Outcome, Plan,
    Progression, RestTime, Settings, SettingsKind, Sets, Warmups, Weight, deload_by_date,
    format_weight,
};

/// Deload factors by whole weeks since the exercise was last performed.
const DELOAD_TABLE: [f64; 6] = [1.0, 1.0, 0.95, 0.9, 0.85, 0.8];
const MAX_STALLS: u32 = 3;
const STALL_DELOAD_FACTOR: f64 = 0.9;

/// Fixed sets and reps, adding the smallest possible increment after every successful cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPlan {
    label: String,
    pub work_sets: u32,
    pub work_reps: u32,
    #[serde(default = "Warmups::none")]
    pub warmups: Warmups,
    #[serde(default)]
    lifecycle: Lifecycle,
    #[serde(default)]
    sets: Sets,
}

impl LinearPlan {
    #[must_use]
    pub fn new(label: &str, work_sets: u32, work_reps: u32) -> Self {
        Self {
            label: label.to_string(),
            work_sets,
            work_reps,
            warmups: Warmups::none(),
            lifecycle: Lifecycle::default(),
            sets: Sets::default(),
        }
    }

    #[must_use]
    pub fn with_warmups(mut self, warmups: Warmups) -> Self {
        self.warmups = warmups;
        self
    }

    #[must_use]
    pub fn sets(&self) -> &Sets {
        &self.sets
    }

    fn progress(&self, ctx: &mut Context<'_>, succeeded: bool) {
        let exercise = self.lifecycle.exercise_or_default();
        let Some(work) = self.sets.work_weight().map(|w| w.weight) else {
            return;
        };
        let setting = match ctx.settings.variable_weight_mut(exercise) {
            Ok(setting) => setting,
            Err(err) => {
                error!("failed to progress {exercise}: {err}");
                return;
            }
        };

        if succeeded {
            let next = Weight::new(work, &setting.apparatus).next_weight();
            setting.set_weight(next, ctx.now);
            setting.clear_stalls();
            info!("{exercise} advanced to {}", format_weight(next));
        } else {
            let stalls = setting.record_stall();
            if stalls >= MAX_STALLS {
                let deloaded = Weight::new(
                    setting.weight() * STALL_DELOAD_FACTOR,
                    &setting.apparatus,
                )
                .closest()
                .weight;
                setting.set_weight(deloaded, ctx.now);
                setting.clear_stalls();
                info!(
                    "{exercise} stalled {stalls} times, deloaded to {}",
                    format_weight(deloaded)
                );
            } else {
                info!("{exercise} stalled ({stalls} of {MAX_STALLS})");
            }
        }
    }
}

impl Plan for LinearPlan {
    fn label(&self) -> &str {
        &self.label
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn settings_kind(&self) -> SettingsKind {
        SettingsKind::VariableWeight
    }

    fn start(
        &mut self,
        ctx: &mut Context<'_>,
        _workout: &str,
        exercise: &str,
    ) -> Option<Progression> {
        let setting = match ctx.settings.variable_weight(exercise) {
            Ok(setting) => setting,
            Err(err) => {
                self.lifecycle.fail(err.to_string());
                return None;
            }
        };
        if !setting.apparatus.supports_search() {
            self.lifecycle.fail(format!(
                "{} needs an apparatus with selectable weights for {exercise}",
                self.label
            ));
            return None;
        }
        if setting.weight() <= 0.0 {
            info!("{exercise} has no weight yet");
            self.lifecycle.block();
            return Some(Progression::NRepMax(NRepMaxPlan::new(
                exercise,
                self.work_reps,
            )));
        }

        let deload = match ctx.completed.max(setting.user_updated()) {
            Some(last_performed) => {
                deload_by_date(setting.weight(), last_performed, &DELOAD_TABLE, ctx.now)
            }
            None => Deload {
                weight: setting.weight(),
                percent: None,
                weeks: 0,
            },
        };
        let apparatus = &setting.apparatus;
        let work = Weight::new(deload.weight, apparatus).closest();
        let note = match deload.percent {
            Some(percent) => {
                info!(
                    "{exercise} deloaded by {percent}% after {} weeks",
                    deload.weeks
                );
                format!("Deloaded by {percent}% after {} weeks", deload.weeks)
            }
            None => String::new(),
        };

        self.sets = Sets::new(
            self.warmups.compute(apparatus, work.weight, false),
            self.work_sets,
            self.work_reps,
            &work,
        )
        .with_note(note);
        self.lifecycle.begin(ctx.now);
        debug!("started {exercise} at {}", work.text);

        None
    }

    fn current(&self) -> Activity {
        self.sets.activity()
    }

    fn rest_secs(&self, settings: &Settings) -> RestTime {
        self.sets.rest(settings.rest_secs().unwrap_or_default())
    }

    fn completions(&self) -> Completions {
        self.sets.completions()
    }

    fn complete(&mut self, ctx: &mut Context<'_>, outcome: Outcome) {
        let Outcome::Choice(choice) = outcome else {
            return;
        };
        let last = self.sets.is_last();
        self.sets.advance();
        if !last {
            self.lifecycle.advance();
            return;
        }

        self.progress(ctx, choice == 0);
        self.lifecycle.finish();
        ctx.frontend
            .save_exercise(self.lifecycle.exercise_or_default());
    }

    fn reset(&mut self) {
        self.lifecycle.reset();
        self.sets = Sets::default();
    }

    fn should_sync(&self, saved: &Progression) -> bool {
        matches!(
            saved,
            Progression::Linear(plan)
                if plan.work_sets == self.work_sets
                    && plan.work_reps == self.work_reps
                    && plan.warmups == self.warmups
        )
    }

    fn current_weight(&self, settings: &Settings) -> Option<f64> {
        settings
            .variable_weight(self.lifecycle.exercise_or_default())
            .ok()
            .map(crate::VariableWeightSetting::weight)
            .filter(|weight| *weight > 0.0)
    }

    fn precursor(&self, exercise: &Exercise) -> Option<Progression> {
        Some(Progression::NRepMax(NRepMaxPlan::new(
            &exercise.name,
            self.work_reps,
        )))
    }

    fn errors(&self) -> Vec<String> {
        let mut problems = vec![];
        if self.work_sets == 0 {
            problems.push("Work sets must be at least 1".to_string());
        }
        if self.work_reps == 0 {
            problems.push("Work reps must be at least 1".to_string());
        }
        problems.extend(self.warmups.errors());
        problems
    }
}
