use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    Activity, Completions, Context, HiitSetting, Lifecycle, Outcome, Plan, Progression, RestTime,
    Settings, SettingsKind,
};

/// A single block of high intensity interval training reported as a duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiitPlan {
    label: String,
    #[serde(default)]
    lifecycle: Lifecycle,
    #[serde(default)]
    session: Option<HiitSetting>,
    #[serde(default)]
    minutes: Option<u32>,
}

impl HiitPlan {
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            lifecycle: Lifecycle::default(),
            session: None,
            minutes: None,
        }
    }

    /// Minutes reported for the last finished session.
    #[must_use]
    pub fn minutes(&self) -> Option<u32> {
        self.minutes
    }
}

impl Plan for HiitPlan {
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
        SettingsKind::Hiit
    }

    fn start(
        &mut self,
        ctx: &mut Context<'_>,
        _workout: &str,
        exercise: &str,
    ) -> Option<Progression> {
        match ctx.settings.hiit(exercise) {
            Ok(setting) => {
                self.session = Some(setting.clone());
                self.lifecycle.begin(ctx.now);
            }
            Err(err) => self.lifecycle.fail(err.to_string()),
        }
        None
    }

    fn current(&self) -> Activity {
        let Some(session) = &self.session else {
            return Activity::default();
        };
        Activity {
            title: self.label.clone(),
            subtitle: format!(
                "{} cycles of {}s high and {}s low",
                session.num_cycles, session.high_secs, session.low_secs
            ),
            amount: format!("{} min", session.total_secs().div_ceil(60)),
            details: format!(
                "{}s warmup, {}s cooldown",
                session.warmup_secs, session.cooldown_secs
            ),
            button_name: "Done".to_string(),
            show_start_button: true,
            color: None,
        }
    }

    fn rest_secs(&self, _settings: &Settings) -> RestTime {
        RestTime::none()
    }

    fn completions(&self) -> Completions {
        Completions::Cardio
    }

    fn complete(&mut self, ctx: &mut Context<'_>, outcome: Outcome) {
        let Outcome::Cardio { minutes } = outcome else {
            return;
        };
        let exercise = self.lifecycle.exercise_or_default();
        info!("{exercise} finished after {minutes} min");
        self.minutes = Some(minutes);
        self.lifecycle.finish();
        ctx.frontend
            .save_exercise(self.lifecycle.exercise_or_default());
    }

    fn should_sync(&self, saved: &Progression) -> bool {
        matches!(saved, Progression::Hiit(_))
    }

    fn current_weight(&self, _settings: &Settings) -> Option<f64> {
        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        IntensitySetting, PlanState,
        plan::tests::{TestFrontend, now},
    };

    fn settings() -> Settings {
        Settings::Hiit(HiitSetting {
            warmup_secs: 300,
            high_secs: 30,
            low_secs: 90,
            cooldown_secs: 300,
            num_cycles: 8,
            tags: vec!["bike".into()],
        })
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
    fn test_hiit() {
        let mut plan = Progression::Hiit(HiitPlan::new("Intervals"));
        let mut settings = settings();
        let mut frontend = TestFrontend::default();

        assert_eq!(
            plan.start(&mut context(&mut settings, &mut frontend), "A", "Bike"),
            None
        );
        assert_eq!(
            plan.current(),
            Activity {
                title: "Intervals".into(),
                subtitle: "8 cycles of 30s high and 90s low".into(),
                amount: "26 min".into(),
                details: "300s warmup, 300s cooldown".into(),
                button_name: "Done".into(),
                show_start_button: true,
                color: None,
            }
        );
        assert_eq!(plan.completions(), Completions::Cardio);
        assert_eq!(plan.rest_secs(&settings), RestTime::none());

        plan.complete(
            &mut context(&mut settings, &mut frontend),
            Outcome::Cardio { minutes: 25 },
        );

        assert!(plan.finished());
        assert!(frontend.saved.contains("Bike"));
        let Progression::Hiit(hiit) = &plan else {
            unreachable!()
        };
        assert_eq!(hiit.minutes(), Some(25));
    }

    #[test]
    fn test_hiit_wrong_settings() {
        let mut plan = Progression::Hiit(HiitPlan::new("Intervals"));
        let mut settings = Settings::Intensity(IntensitySetting { tag: "hard".into() });
        let mut frontend = TestFrontend::default();

        plan.start(&mut context(&mut settings, &mut frontend), "A", "Bike");

        assert_eq!(
            *plan.state(),
            PlanState::Error(
                "Exercise 'Bike' uses intensity settings instead of HIIT settings".into()
            )
        );
    }

    #[test]
    #[should_panic(expected = "choice reported to cardio plan 'Intervals'")]
    fn test_hiit_choice_outcome() {
        let mut plan = Progression::Hiit(HiitPlan::new("Intervals"));
        let mut settings = settings();
        let mut frontend = TestFrontend::default();

        plan.start(&mut context(&mut settings, &mut frontend), "A", "Bike");
        plan.complete(
            &mut context(&mut settings, &mut frontend),
            Outcome::Choice(0),
        );
    }
}
