//! The life cycle shared by all progression schemes.
//!
//! A plan starts in [`PlanState::Waiting`]. Starting it for a workout either moves it to
//! [`PlanState::Started`], to [`PlanState::Blocked`] if another plan has to run first, or to
//! [`PlanState::Error`] if its configuration cannot be resolved. Completing the first activity
//! makes it [`PlanState::Underway`] and completing the last one [`PlanState::Finished`]. Starting
//! a finished plan begins a new cycle.

mod hiit;
mod linear;
mod n_rep_max;
mod percent_of;
mod sets;

use chrono::{Duration, NaiveDateTime};
use derive_more::Display;
use log::debug;
use serde::{Deserialize, Serialize};

pub use hiit::HiitPlan;
pub use linear::LinearPlan;
pub use n_rep_max::NRepMaxPlan;
pub use percent_of::PercentOfPlan;
pub use sets::{PlannedSet, SetKind, Sets};

use crate::{Exercise, Frontend, Settings, SettingsKind};

#[derive(Debug, Display, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanState {
    #[default]
    Waiting,
    Started,
    Underway,
    Finished,
    Blocked,
    #[display("Error: {_0}")]
    Error(String),
}

/// Life-cycle fields owned by every plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lifecycle {
    state: PlanState,
    #[serde(default)]
    workout: Option<String>,
    #[serde(default)]
    exercise: Option<String>,
    #[serde(default)]
    started: Option<NaiveDateTime>,
}

impl Lifecycle {
    #[must_use]
    pub fn state(&self) -> &PlanState {
        &self.state
    }

    #[must_use]
    pub fn workout(&self) -> Option<&str> {
        self.workout.as_deref()
    }

    #[must_use]
    pub fn exercise(&self) -> Option<&str> {
        self.exercise.as_deref()
    }

    #[must_use]
    pub fn started(&self) -> Option<NaiveDateTime> {
        self.started
    }

    #[must_use]
    pub fn on(&self, workout: &str) -> bool {
        self.workout.as_deref() == Some(workout)
    }

    #[must_use]
    pub fn in_progress(&self) -> bool {
        matches!(self.state, PlanState::Started | PlanState::Underway)
    }

    pub(crate) fn enter(&mut self, workout: &str, exercise: &str) {
        self.workout = Some(workout.to_string());
        self.exercise = Some(exercise.to_string());
    }

    pub(crate) fn begin(&mut self, now: NaiveDateTime) {
        self.state = PlanState::Started;
        self.started = Some(now);
    }

    pub(crate) fn block(&mut self) {
        self.state = PlanState::Blocked;
    }

    pub(crate) fn fail(&mut self, reason: impl Into<String>) {
        self.state = PlanState::Error(reason.into());
    }

    pub(crate) fn advance(&mut self) {
        if self.state == PlanState::Started {
            self.state = PlanState::Underway;
        }
    }

    pub(crate) fn finish(&mut self) {
        self.state = PlanState::Finished;
    }

    pub(crate) fn reset(&mut self) {
        self.state = PlanState::Waiting;
    }

    /// Returns to waiting if the plan was last started more than a day before `now`.
    pub(crate) fn refresh(&mut self, now: NaiveDateTime) -> bool {
        let active = matches!(
            self.state,
            PlanState::Started | PlanState::Underway | PlanState::Finished
        );
        let stale = self
            .started
            .is_some_and(|started| now - started > Duration::days(1));
        if active && stale {
            self.state = PlanState::Waiting;
        }
        active && stale
    }

    pub(crate) fn exercise_or_default(&self) -> &str {
        self.exercise.as_deref().unwrap_or_default()
    }
}

/// The next unit of work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activity {
    pub title: String,
    pub subtitle: String,
    pub amount: String,
    pub details: String,
    pub button_name: String,
    pub show_start_button: bool,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestTime {
    pub auto_start: bool,
    pub secs: u32,
}

impl RestTime {
    #[must_use]
    pub fn none() -> Self {
        Self {
            auto_start: false,
            secs: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub title: String,
    pub info: String,
    pub is_default: bool,
}

impl Completion {
    #[must_use]
    pub fn new(title: &str, info: &str, is_default: bool) -> Self {
        Self {
            title: title.to_string(),
            info: info.to_string(),
            is_default,
        }
    }
}

/// The outcomes that can be reported for the current activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completions {
    Normal(Vec<Completion>),
    /// A duration is reported instead of a choice.
    Cardio,
}

/// What the user reported for the current activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Index into [`Completions::Normal`].
    Choice(usize),
    Cardio { minutes: u32 },
}

/// Everything a plan may touch besides its own fields.
pub struct Context<'a> {
    pub settings: &'a mut Settings,
    pub completed: Option<NaiveDateTime>,
    pub frontend: &'a mut dyn Frontend,
    pub now: NaiveDateTime,
}

/// A progression scheme.
///
/// [`Progression`] wraps every scheme and takes care of the parts of the contract common to all
/// of them: starting an in-progress plan again is a no-op, the current activity of a finished plan
/// cannot be requested and completions always have exactly one default.
pub trait Plan {
    fn label(&self) -> &str;
    fn lifecycle(&self) -> &Lifecycle;
    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// The kind of settings the exercise of this plan has to use.
    fn settings_kind(&self) -> SettingsKind;

    fn state(&self) -> &PlanState {
        self.lifecycle().state()
    }

    fn on(&self, workout: &str) -> bool {
        self.lifecycle().on(workout)
    }

    /// Prepare the activities of a new cycle.
    ///
    /// Returns the plan that has to be finished first if this plan became blocked.
    fn start(&mut self, ctx: &mut Context<'_>, workout: &str, exercise: &str)
    -> Option<Progression>;

    fn current(&self) -> Activity;
    fn rest_secs(&self, settings: &Settings) -> RestTime;
    fn completions(&self) -> Completions;
    fn complete(&mut self, ctx: &mut Context<'_>, outcome: Outcome);

    fn finished(&self) -> bool {
        *self.state() == PlanState::Finished
    }

    /// Discard the progress of the current cycle.
    fn reset(&mut self) {
        self.lifecycle_mut().reset();
    }

    /// Whether a persisted version of this plan may replace it.
    fn should_sync(&self, saved: &Progression) -> bool;

    /// The weight the next cycle is based on.
    fn current_weight(&self, settings: &Settings) -> Option<f64>;

    /// A plan establishing what `exercise` needs before this plan can run.
    fn precursor(&self, _exercise: &Exercise) -> Option<Progression> {
        None
    }

    /// The exercise this plan works for, if it differs from its own.
    fn subject(&self) -> Option<&str> {
        None
    }

    fn refresh(&mut self, now: NaiveDateTime) -> bool {
        self.lifecycle_mut().refresh(now)
    }

    fn errors(&self) -> Vec<String> {
        vec![]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Progression {
    Linear(LinearPlan),
    PercentOf(PercentOfPlan),
    NRepMax(NRepMaxPlan),
    Hiit(HiitPlan),
}

macro_rules! dispatch {
    ($self: expr, $plan: ident => $body: expr) => {
        match $self {
            Progression::Linear($plan) => $body,
            Progression::PercentOf($plan) => $body,
            Progression::NRepMax($plan) => $body,
            Progression::Hiit($plan) => $body,
        }
    };
}

impl Plan for Progression {
    fn label(&self) -> &str {
        dispatch!(self, plan => plan.label())
    }

    fn lifecycle(&self) -> &Lifecycle {
        dispatch!(self, plan => plan.lifecycle())
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        dispatch!(self, plan => plan.lifecycle_mut())
    }

    fn settings_kind(&self) -> SettingsKind {
        dispatch!(self, plan => plan.settings_kind())
    }

    fn start(
        &mut self,
        ctx: &mut Context<'_>,
        workout: &str,
        exercise: &str,
    ) -> Option<Progression> {
        if self.lifecycle().in_progress() && self.on(workout) {
            debug!("{exercise} is already in progress on {workout}");
            return None;
        }
        self.lifecycle_mut().enter(workout, exercise);
        dispatch!(self, plan => plan.start(ctx, workout, exercise))
    }

    /// # Panics
    ///
    /// Panics if the plan is finished.
    fn current(&self) -> Activity {
        assert!(
            !self.finished(),
            "current activity of finished plan '{}' requested",
            self.label()
        );
        dispatch!(self, plan => plan.current())
    }

    fn rest_secs(&self, settings: &Settings) -> RestTime {
        dispatch!(self, plan => plan.rest_secs(settings))
    }

    /// # Panics
    ///
    /// Panics if the plan offers several completions without exactly one default.
    fn completions(&self) -> Completions {
        let completions = dispatch!(self, plan => plan.completions());
        check_completions(&completions);
        completions
    }

    /// # Panics
    ///
    /// Panics if the plan isn't in progress or the outcome doesn't match its completions.
    fn complete(&mut self, ctx: &mut Context<'_>, outcome: Outcome) {
        assert!(
            self.lifecycle().in_progress(),
            "completion reported to plan '{}' which is {}",
            self.label(),
            self.state()
        );
        match (self.completions(), outcome) {
            (Completions::Normal(completions), Outcome::Choice(choice)) => assert!(
                choice < completions.len(),
                "completion {choice} reported to plan '{}' which offers {}",
                self.label(),
                completions.len()
            ),
            (Completions::Cardio, Outcome::Cardio { .. }) => {}
            (Completions::Normal(_), Outcome::Cardio { .. }) => {
                panic!("cardio outcome reported to set-based plan '{}'", self.label())
            }
            (Completions::Cardio, Outcome::Choice(_)) => {
                panic!("choice reported to cardio plan '{}'", self.label())
            }
        }
        dispatch!(self, plan => plan.complete(ctx, outcome));
    }

    fn finished(&self) -> bool {
        dispatch!(self, plan => plan.finished())
    }

    fn reset(&mut self) {
        dispatch!(self, plan => plan.reset());
    }

    fn should_sync(&self, saved: &Progression) -> bool {
        dispatch!(self, plan => plan.should_sync(saved))
    }

    fn current_weight(&self, settings: &Settings) -> Option<f64> {
        dispatch!(self, plan => plan.current_weight(settings))
    }

    fn precursor(&self, exercise: &Exercise) -> Option<Progression> {
        dispatch!(self, plan => plan.precursor(exercise))
    }

    fn subject(&self) -> Option<&str> {
        dispatch!(self, plan => plan.subject())
    }

    fn refresh(&mut self, now: NaiveDateTime) -> bool {
        dispatch!(self, plan => plan.refresh(now))
    }

    fn errors(&self) -> Vec<String> {
        dispatch!(self, plan => plan.errors())
    }
}

/// # Panics
///
/// Panics if there are no completions or several without exactly one default.
pub(crate) fn check_completions(completions: &Completions) {
    if let Completions::Normal(completions) = completions {
        assert!(!completions.is_empty(), "no completions offered");
        let defaults = completions.iter().filter(|c| c.is_default).count();
        assert!(
            completions.len() == 1 || defaults == 1,
            "{} completions offered with {defaults} defaults",
            completions.len()
        );
    }
}
