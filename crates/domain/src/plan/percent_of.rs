use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    Activity, Completions, Context, Exercise, Lifecycle, LookupError, Outcome, Plan, PlanState,
    Progression, RestTime, Settings, SettingsKind, Sets, Weight,
};

/// Fixed sets and reps at a percentage of the weight of another exercise.
///
/// The plan only starts once the base exercise is finished for the current cycle. The weight is
/// derived anew on every start, so progress of the base exercise carries over immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentOfPlan {
    label: String,
    pub percent: f64,
    pub work_sets: u32,
    pub work_reps: u32,
    #[serde(default)]
    lifecycle: Lifecycle,
    #[serde(default)]
    sets: Sets,
    #[serde(default)]
    weight: Option<f64>,
}

impl PercentOfPlan {
    #[must_use]
    pub fn new(label: &str, percent: f64, work_sets: u32, work_reps: u32) -> Self {
        Self {
            label: label.to_string(),
            percent,
            work_sets,
            work_reps,
            lifecycle: Lifecycle::default(),
            sets: Sets::default(),
            weight: None,
        }
    }

    #[must_use]
    pub fn sets(&self) -> &Sets {
        &self.sets
    }

    fn wait_for(&mut self, base: &Exercise) -> Option<Progression> {
        match base.plan.precursor(base) {
            Some(precursor) => {
                info!("waiting for {} to establish a weight", base.name);
                self.lifecycle.block();
                Some(precursor)
            }
            None => {
                self.lifecycle
                    .fail(LookupError::NoWeight(base.name.clone()).to_string());
                None
            }
        }
    }
}

impl Plan for PercentOfPlan {
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
        SettingsKind::DerivedWeight
    }

    fn start(
        &mut self,
        ctx: &mut Context<'_>,
        _workout: &str,
        exercise: &str,
    ) -> Option<Progression> {
        let base_name = match ctx.settings.derived_weight(exercise) {
            Ok(setting) => &setting.other_exercise,
            Err(err) => {
                self.lifecycle.fail(err.to_string());
                return None;
            }
        };
        let Some(base) = ctx.frontend.find_exercise(base_name) else {
            self.lifecycle
                .fail(LookupError::ExerciseNotFound(base_name.clone()).to_string());
            return None;
        };

        if let PlanState::Error(reason) = base.plan.state() {
            self.lifecycle.fail(format!("{base_name}: {reason}"));
            return None;
        }
        let Some(base_weight) = base.current_weight() else {
            return self.wait_for(base);
        };
        if !base.plan.finished() {
            info!("waiting for {base_name} to be finished");
            self.lifecycle.block();
            return Some(base.plan.clone());
        }
        let Some(apparatus) = base.settings.apparatus() else {
            self.lifecycle
                .fail(LookupError::NoWeight(base_name.clone()).to_string());
            return None;
        };

        let work = Weight::new(base_weight * self.percent, apparatus).closest();
        self.weight = Some(work.weight);
        self.sets = Sets::new(vec![], self.work_sets, self.work_reps, &work).with_note(format!(
            "{:.0}% of {base_name}",
            self.percent * 100.0
        ));
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

    fn complete(&mut self, ctx: &mut Context<'_>, _outcome: Outcome) {
        if self.sets.advance() {
            self.lifecycle.advance();
        } else {
            self.lifecycle.finish();
            ctx.frontend
                .save_exercise(self.lifecycle.exercise_or_default());
        }
    }

    fn reset(&mut self) {
        self.lifecycle.reset();
        self.sets = Sets::default();
    }

    fn should_sync(&self, saved: &Progression) -> bool {
        matches!(
            saved,
            Progression::PercentOf(plan)
                if (plan.percent - self.percent).abs() < f64::EPSILON
                    && plan.work_sets == self.work_sets
                    && plan.work_reps == self.work_reps
        )
    }

    fn current_weight(&self, _settings: &Settings) -> Option<f64> {
        self.weight
    }

    fn errors(&self) -> Vec<String> {
        let mut problems = vec![];
        if self.percent <= 0.0 {
            problems.push("Percentage must be positive".to_string());
        }
        if self.work_sets == 0 {
            problems.push("Work sets must be at least 1".to_string());
        }
        if self.work_reps == 0 {
            problems.push("Work reps must be at least 1".to_string());
        }
        problems
    }
}
