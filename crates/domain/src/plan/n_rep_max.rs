use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::{
    Activity, Completion, Completions, Context, Lifecycle, LookupError, Outcome, Plan,
    Progression, RestTime, Settings, SettingsKind, Weight, WeightInfo, format_weight,
};

/// Ratio by which the weight is increased after each successful set.
const STEP: f64 = 1.1;

/// Works up from the lightest load until a set fails and records the heaviest successful load as
/// the weight of another exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NRepMaxPlan {
    label: String,
    target: String,
    reps: u32,
    #[serde(default)]
    lifecycle: Lifecycle,
    #[serde(default)]
    weight: Option<WeightInfo>,
    #[serde(default)]
    best: Option<f64>,
    #[serde(default)]
    set: u32,
}

impl NRepMaxPlan {
    #[must_use]
    pub fn new(target: &str, reps: u32) -> Self {
        Self {
            label: format!("{reps}RM"),
            target: target.to_string(),
            reps,
            lifecycle: Lifecycle::default(),
            weight: None,
            best: None,
            set: 0,
        }
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn best(&self) -> Option<f64> {
        self.best
    }

    fn record(&self, ctx: &mut Context<'_>, weight: f64) -> Result<(), LookupError> {
        let target = ctx
            .frontend
            .find_exercise_mut(&self.target)
            .ok_or_else(|| LookupError::ExerciseNotFound(self.target.clone()))?;
        let setting = target.settings.variable_weight_mut(&self.target)?;
        setting.set_weight(weight, ctx.now);
        setting.clear_stalls();
        ctx.frontend.save_exercise(&self.target);
        Ok(())
    }
}

impl Plan for NRepMaxPlan {
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
        let apparatus = match ctx.settings.variable_weight(exercise) {
            Ok(setting) => &setting.apparatus,
            Err(err) => {
                self.lifecycle.fail(err.to_string());
                return None;
            }
        };
        if !apparatus.supports_search() {
            self.lifecycle.fail(format!(
                "{} needs an apparatus with selectable weights for {exercise}",
                self.label
            ));
            return None;
        }

        self.weight = Some(Weight::new(0.0, apparatus).closest());
        self.best = None;
        self.set = 1;
        self.lifecycle.begin(ctx.now);

        None
    }

    fn current(&self) -> Activity {
        let Some(weight) = &self.weight else {
            return Activity::default();
        };
        Activity {
            title: format!("Set {}", self.set),
            subtitle: format!("Finding {} rep max of {}", self.reps, self.target),
            amount: format!("{} × {}", self.reps, weight.text),
            details: weight.plates.clone(),
            button_name: "Next".to_string(),
            show_start_button: true,
            color: None,
        }
    }

    fn rest_secs(&self, settings: &Settings) -> RestTime {
        RestTime {
            auto_start: true,
            secs: settings.rest_secs().unwrap_or_default(),
        }
    }

    fn completions(&self) -> Completions {
        Completions::Normal(vec![
            Completion::new("Done", &format!("Lifted all {} reps", self.reps), true),
            Completion::new("Failed", "Couldn't lift all reps", false),
        ])
    }

    fn complete(&mut self, ctx: &mut Context<'_>, outcome: Outcome) {
        let Outcome::Choice(choice) = outcome else {
            return;
        };
        let Some(lifted) = self.weight.as_ref().map(|w| w.weight) else {
            return;
        };
        let exercise = self.lifecycle.exercise_or_default().to_string();

        if choice == 0 {
            let Some(apparatus) = ctx.settings.apparatus() else {
                self.lifecycle.fail(format!("{exercise} has no apparatus"));
                return;
            };
            self.best = Some(lifted);
            self.weight = Some(Weight::new(lifted * STEP, apparatus).closest_above(lifted));
            self.set += 1;
            self.lifecycle.advance();
            return;
        }

        let max = self.best.unwrap_or(lifted);
        match self.record(ctx, max) {
            Ok(()) => {
                info!(
                    "{} rep max of {} is {}",
                    self.reps,
                    self.target,
                    format_weight(max)
                );
                self.lifecycle.finish();
            }
            Err(err) => {
                error!("failed to record {} rep max: {err}", self.reps);
                self.lifecycle.fail(err.to_string());
            }
        }
        ctx.frontend.save_exercise(&exercise);
    }

    fn should_sync(&self, saved: &Progression) -> bool {
        matches!(
            saved,
            Progression::NRepMax(plan) if plan.target == self.target && plan.reps == self.reps
        )
    }

    fn current_weight(&self, _settings: &Settings) -> Option<f64> {
        None
    }

    fn subject(&self) -> Option<&str> {
        Some(&self.target)
    }

    fn errors(&self) -> Vec<String> {
        if self.reps == 0 {
            vec!["Reps must be at least 1".to_string()]
        } else {
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        Apparatus, Exercise, Frontend, LinearPlan, PlanState, VariableWeightSetting,
        plan::tests::{TestFrontend, now},
    };

    fn settings(weight: f64) -> Settings {
        Settings::VariableWeight(VariableWeightSetting::new(
            Apparatus::barbell(45.0, &[45.0, 25.0, 10.0, 5.0, 2.5]),
            weight,
            120,
        ))
    }

    fn frontend() -> TestFrontend {
        TestFrontend {
            exercises: vec![Exercise::new(
                "Squat",
                Progression::Linear(LinearPlan::new("3x5", 3, 5)),
                settings(0.0),
            )],
            ..TestFrontend::default()
        }
    }

    fn context<'a>(settings: &'a mut Settings, frontend: &'a mut TestFrontend) -> Context<'a> {
        Context {
            settings,
            completed: None,
            frontend,
            now: now(),
        }
    }

    #[test]
    fn test_n_rep_max() {
        let mut plan = Progression::NRepMax(NRepMaxPlan::new("Squat", 5));
        let mut settings = settings(0.0);
        let mut frontend = frontend();

        assert_eq!(plan.label(), "5RM");
        assert_eq!(plan.subject(), Some("Squat"));
        assert_eq!(
            plan.start(&mut context(&mut settings, &mut frontend), "A", "Squat (5RM)"),
            None
        );
        assert_eq!(*plan.state(), PlanState::Started);

        let mut weights = vec![];
        for _ in 0..4 {
            let activity = plan.current();
            weights.push(activity.amount);
            plan.complete(
                &mut context(&mut settings, &mut frontend),
                Outcome::Choice(0),
            );
        }
        assert_eq!(
            weights,
            vec!["5 × 45 lbs", "5 × 50 lbs", "5 × 55 lbs", "5 × 60 lbs"]
        );
        assert_eq!(*plan.state(), PlanState::Underway);

        plan.complete(
            &mut context(&mut settings, &mut frontend),
            Outcome::Choice(1),
        );

        assert!(plan.finished());
        let squat = frontend.find_exercise("Squat").unwrap();
        assert_approx_eq!(squat.settings.variable_weight("Squat").unwrap().weight(), 60.0);
        assert!(frontend.saved.contains("Squat"));
        assert!(frontend.saved.contains("Squat (5RM)"));
    }

    #[test]
    fn test_n_rep_max_failing_first_set() {
        let mut plan = Progression::NRepMax(NRepMaxPlan::new("Squat", 3));
        let mut settings = settings(0.0);
        let mut frontend = frontend();

        plan.start(&mut context(&mut settings, &mut frontend), "A", "Squat (3RM)");
        plan.complete(
            &mut context(&mut settings, &mut frontend),
            Outcome::Choice(1),
        );

        assert!(plan.finished());
        let squat = frontend.find_exercise("Squat").unwrap();
        assert_approx_eq!(squat.settings.variable_weight("Squat").unwrap().weight(), 45.0);
    }

    #[test]
    fn test_n_rep_max_missing_target() {
        let mut plan = Progression::NRepMax(NRepMaxPlan::new("Bench Press", 5));
        let mut settings = settings(0.0);
        let mut frontend = frontend();

        plan.start(&mut context(&mut settings, &mut frontend), "A", "Bench Press (5RM)");
        plan.complete(
            &mut context(&mut settings, &mut frontend),
            Outcome::Choice(1),
        );

        assert_eq!(
            *plan.state(),
            PlanState::Error("Couldn't find exercise 'Bench Press'".to_string())
        );
    }

    #[test]
    fn test_should_sync() {
        let plan = NRepMaxPlan::new("Squat", 5);
        assert!(plan.should_sync(&Progression::NRepMax(NRepMaxPlan::new("Squat", 5))));
        assert!(!plan.should_sync(&Progression::NRepMax(NRepMaxPlan::new("Squat", 3))));
        assert!(!plan.should_sync(&Progression::NRepMax(NRepMaxPlan::new("Bench", 5))));
    }
}
