use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    Activity, Completions, Context, Frontend, LookupError, Outcome, Plan, Progression, RestTime,
    Settings,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    #[serde(default)]
    pub formal_name: String,
    pub plan: Progression,
    pub settings: Settings,
    #[serde(default)]
    pub completed: Option<NaiveDateTime>,
    /// Auxiliary exercises are not part of any workout.
    #[serde(default)]
    pub hidden: bool,
}

impl Exercise {
    #[must_use]
    pub fn new(name: &str, plan: Progression, settings: Settings) -> Self {
        Self {
            name: name.to_string(),
            formal_name: name.to_string(),
            plan,
            settings,
            completed: None,
            hidden: false,
        }
    }

    #[must_use]
    pub fn with_formal_name(mut self, formal_name: &str) -> Self {
        self.formal_name = formal_name.to_string();
        self
    }

    pub fn start(
        &mut self,
        frontend: &mut dyn Frontend,
        workout: &str,
        now: NaiveDateTime,
    ) -> Option<Progression> {
        let mut ctx = Context {
            settings: &mut self.settings,
            completed: self.completed,
            frontend,
            now,
        };
        self.plan.start(&mut ctx, workout, &self.name)
    }

    /// # Panics
    ///
    /// Panics if the plan isn't in progress or the outcome doesn't match its completions.
    pub fn complete(&mut self, frontend: &mut dyn Frontend, outcome: Outcome, now: NaiveDateTime) {
        let mut ctx = Context {
            settings: &mut self.settings,
            completed: self.completed,
            frontend,
            now,
        };
        self.plan.complete(&mut ctx, outcome);
    }

    /// # Panics
    ///
    /// Panics if the plan is finished.
    #[must_use]
    pub fn current(&self) -> Activity {
        self.plan.current()
    }

    #[must_use]
    pub fn rest_secs(&self) -> RestTime {
        self.plan.rest_secs(&self.settings)
    }

    #[must_use]
    pub fn completions(&self) -> Completions {
        self.plan.completions()
    }

    #[must_use]
    pub fn current_weight(&self) -> Option<f64> {
        self.plan.current_weight(&self.settings)
    }

    /// Replace plan, settings and completion date by the saved ones if the plan accepts them.
    pub fn sync(&mut self, saved: &Exercise) -> bool {
        if !self.plan.should_sync(&saved.plan) {
            return false;
        }
        self.plan = saved.plan.clone();
        self.settings = saved.settings.clone();
        self.completed = saved.completed;
        true
    }

    #[must_use]
    pub fn errors(&self, frontend: &dyn Frontend) -> Vec<String> {
        let mut problems = vec![];
        let expected = self.plan.settings_kind();
        if self.settings.kind() != expected {
            problems.push(
                LookupError::WrongSettings {
                    exercise: self.name.clone(),
                    expected,
                    found: self.settings.kind(),
                }
                .to_string(),
            );
        }
        problems.extend(self.settings.errors(&self.name, frontend));
        problems.extend(self.plan.errors());
        problems
    }
}
