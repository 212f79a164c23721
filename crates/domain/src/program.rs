use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{Exercise, Frontend, LookupError, Outcome, Plan, Progression, Settings, Workout};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Beginner,
    Intermediate,
    Advanced,
    Strength,
    Hypertrophy,
    Conditioning,
    Barbell,
    Dumbbells,
    Machine,
}

/// Workouts and the exercises they consist of.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub workouts: Vec<Workout>,
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
    #[serde(default)]
    pub description: String,
    /// Exercises changed since the last call of [`Program::take_unsaved`].
    #[serde(skip)]
    unsaved: BTreeSet<String>,
}

impl Program {
    #[must_use]
    pub fn new(name: &str, workouts: Vec<Workout>, exercises: Vec<Exercise>) -> Self {
        Self {
            name: name.to_string(),
            workouts,
            exercises,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tags(mut self, tags: &[Tag]) -> Self {
        self.tags = tags.iter().copied().collect();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// The first exercise with the given name.
    pub fn find_exercise(&self, name: &str) -> Result<&Exercise, LookupError> {
        self.exercises
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| LookupError::ExerciseNotFound(name.to_string()))
    }

    pub fn find_workout(&self, name: &str) -> Result<&Workout, LookupError> {
        self.workouts
            .iter()
            .find(|w| w.name == name)
            .ok_or_else(|| LookupError::WorkoutNotFound(name.to_string()))
    }

    /// Start the plan of `exercise` for `workout`.
    ///
    /// If the plan is blocked, the name of the exercise that has to be finished first is
    /// returned. That is either the base exercise of a derived weight or an auxiliary exercise
    /// the plan it waits for is assigned to.
    pub fn start(
        &mut self,
        workout: &str,
        exercise: &str,
        now: NaiveDateTime,
    ) -> Result<Option<String>, LookupError> {
        self.find_workout(workout)?;
        let replacement =
            self.with_exercise(exercise, |e, others| e.start(others, workout, now))?;
        match replacement {
            Some(plan) => match self.pending_base(exercise, &plan) {
                Some(base) => Ok(Some(base)),
                None => self.with_plan(exercise, plan).map(Some),
            },
            None => Ok(None),
        }
    }

    /// The exercise `exercise` derives its weight from, if `plan` is the plan of that exercise.
    fn pending_base(&self, exercise: &str, plan: &Progression) -> Option<String> {
        let Ok(Exercise {
            settings: Settings::DerivedWeight(setting),
            ..
        }) = self.find_exercise(exercise)
        else {
            return None;
        };
        let base = self.find_exercise(&setting.other_exercise).ok()?;
        (base.plan.label() == plan.label() && base.plan.should_sync(plan))
            .then(|| base.name.clone())
    }

    /// # Panics
    ///
    /// Panics if the plan of `exercise` isn't in progress or the outcome doesn't match its
    /// completions.
    pub fn complete(
        &mut self,
        exercise: &str,
        outcome: Outcome,
        now: NaiveDateTime,
    ) -> Result<(), LookupError> {
        self.with_exercise(exercise, |e, others| e.complete(others, outcome, now))
    }

    /// Assign `replacement` to an auxiliary exercise named after its subject and label.
    ///
    /// An existing auxiliary exercise is reused. Its plan is only replaced if it isn't in
    /// progress.
    pub fn with_plan(
        &mut self,
        exercise: &str,
        replacement: Progression,
    ) -> Result<String, LookupError> {
        let subject = replacement.subject().unwrap_or(exercise).to_string();
        let name = format!("{subject} ({})", replacement.label());
        let settings = self.find_exercise(&subject)?.settings.clone();

        if let Some(existing) = self.exercises.iter_mut().find(|e| e.name == name) {
            if !existing.plan.lifecycle().in_progress() {
                existing.plan = replacement;
                existing.settings = settings;
            }
        } else {
            info!("adding {name} for {exercise}");
            let mut auxiliary = Exercise::new(&name, replacement, settings);
            auxiliary.hidden = true;
            self.exercises.push(auxiliary);
        }

        self.unsaved.insert(name.clone());
        Ok(name)
    }

    /// Stamp the completion date of all finished exercises of `workout`.
    pub fn finish_workout(&mut self, workout: &str, now: NaiveDateTime) -> Result<(), LookupError> {
        let names = self.find_workout(workout)?.exercises.clone();
        for exercise in &mut self.exercises {
            if names.contains(&exercise.name) && exercise.plan.finished() {
                exercise.completed = Some(now);
                self.unsaved.insert(exercise.name.clone());
            }
        }
        Ok(())
    }

    /// Return stale plans to waiting so their weights are evaluated anew.
    pub fn refresh(&mut self, now: NaiveDateTime) {
        for exercise in &mut self.exercises {
            if exercise.plan.refresh(now) {
                debug!("{} is waiting again", exercise.name);
            }
        }
    }

    /// Adopt the state of a previously saved version of this program.
    ///
    /// Exercises the program doesn't know anymore are dropped unless they are auxiliary.
    pub fn sync(&mut self, saved: &Program) {
        for saved_exercise in &saved.exercises {
            if let Some(exercise) = self
                .exercises
                .iter_mut()
                .find(|e| e.name == saved_exercise.name)
            {
                if !exercise.sync(saved_exercise) {
                    debug!("ignoring saved state of {} as its plan changed", exercise.name);
                }
            } else if saved_exercise.hidden {
                self.exercises.push(saved_exercise.clone());
            } else {
                warn!(
                    "discarding saved exercise {} which isn't part of {}",
                    saved_exercise.name, self.name
                );
            }
        }
    }

    /// Names of the exercises changed since the last call.
    pub fn take_unsaved(&mut self) -> Vec<String> {
        std::mem::take(&mut self.unsaved).into_iter().collect()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        let mut problems = vec![];

        let mut exercises = BTreeSet::new();
        for exercise in &self.exercises {
            if !exercises.insert(exercise.name.as_str()) {
                problems.push(format!("Exercise '{}' is defined more than once", exercise.name));
            }
        }

        let mut workouts = BTreeSet::new();
        for workout in &self.workouts {
            if !workouts.insert(workout.name.as_str()) {
                problems.push(format!("Workout '{}' is defined more than once", workout.name));
            }
            problems.extend(workout.errors());
            for exercise in &workout.exercises {
                if !exercises.contains(exercise.as_str()) {
                    problems.push(format!(
                        "Workout '{}' references unknown exercise '{exercise}'",
                        workout.name
                    ));
                }
            }
        }

        for exercise in &self.exercises {
            problems.extend(exercise.errors(self));
            if self.derives_from_cycle(&exercise.name) {
                problems.push(format!(
                    "Exercise '{}' derives its weight from a cycle",
                    exercise.name
                ));
            }
        }

        problems
    }

    /// Whether following the derived weights starting at `name` leads back to it.
    ///
    /// Direct self references are reported by the settings.
    fn derives_from_cycle(&self, name: &str) -> bool {
        let mut visited = BTreeSet::new();
        let mut current = name;
        loop {
            let Ok(Exercise {
                settings: Settings::DerivedWeight(setting),
                ..
            }) = self.find_exercise(current)
            else {
                return false;
            };
            let next = setting.other_exercise.as_str();
            if next == name {
                return current != name;
            }
            if !visited.insert(next) {
                return false;
            }
            current = next;
        }
    }

    fn with_exercise<T>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Exercise, &mut dyn Frontend) -> T,
    ) -> Result<T, LookupError> {
        let not_found = || LookupError::ExerciseNotFound(name.to_string());
        let index = self
            .exercises
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(not_found)?;
        let (before, rest) = self.exercises.split_at_mut(index);
        let (exercise, after) = rest.split_first_mut().ok_or_else(not_found)?;
        let mut others = Others {
            before,
            after,
            workouts: &self.workouts,
            unsaved: &mut self.unsaved,
        };
        Ok(f(exercise, &mut others))
    }
}

impl Frontend for Program {
    fn find_exercise(&self, name: &str) -> Option<&Exercise> {
        Program::find_exercise(self, name).ok()
    }

    fn find_exercise_mut(&mut self, name: &str) -> Option<&mut Exercise> {
        self.exercises.iter_mut().find(|e| e.name == name)
    }

    fn find_workout(&self, name: &str) -> Option<&Workout> {
        Program::find_workout(self, name).ok()
    }

    fn save_exercise(&mut self, name: &str) {
        self.unsaved.insert(name.to_string());
    }
}

/// The program as seen by the plan of one of its exercises.
struct Others<'a> {
    before: &'a mut [Exercise],
    after: &'a mut [Exercise],
    workouts: &'a [Workout],
    unsaved: &'a mut BTreeSet<String>,
}

impl Frontend for Others<'_> {
    fn find_exercise(&self, name: &str) -> Option<&Exercise> {
        self.before
            .iter()
            .chain(self.after.iter())
            .find(|e| e.name == name)
    }

    fn find_exercise_mut(&mut self, name: &str) -> Option<&mut Exercise> {
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .find(|e| e.name == name)
    }

    fn find_workout(&self, name: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.name == name)
    }

    fn save_exercise(&mut self, name: &str) {
        self.unsaved.insert(name.to_string());
    }
}
