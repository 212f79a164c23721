use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A named selection of exercises performed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    pub name: String,
    pub exercises: Vec<String>,
    /// Exercises the user may skip. Always a subset of `exercises`.
    #[serde(default)]
    pub optional: Vec<String>,
    #[serde(default = "scheduled")]
    pub scheduled: bool,
}

fn scheduled() -> bool {
    true
}

impl Workout {
    #[must_use]
    pub fn new(name: &str, exercises: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            exercises: exercises.iter().map(ToString::to_string).collect(),
            optional: vec![],
            scheduled: true,
        }
    }

    #[must_use]
    pub fn with_optional(mut self, optional: &[&str]) -> Self {
        self.optional = optional.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn is_optional(&self, exercise: &str) -> bool {
        self.optional.iter().any(|e| e == exercise)
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        let mut problems = vec![];

        if self.exercises.is_empty() {
            problems.push(format!("Workout '{}' has no exercises", self.name));
        }
        let mut seen = BTreeSet::new();
        for exercise in &self.exercises {
            if !seen.insert(exercise) {
                problems.push(format!(
                    "Workout '{}' contains '{exercise}' more than once",
                    self.name
                ));
            }
        }
        for exercise in &self.optional {
            if !self.exercises.contains(exercise) {
                problems.push(format!(
                    "Optional exercise '{exercise}' isn't part of workout '{}'",
                    self.name
                ));
            }
        }

        problems
    }
}
