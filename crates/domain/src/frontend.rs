use crate::{Exercise, Workout};

/// Access to the rest of a program while a plan is driven.
///
/// Plans never hold references to other exercises. Dependencies are resolved by name through
/// this trait at the time they are needed.
pub trait Frontend {
    /// The first exercise with the given name.
    fn find_exercise(&self, name: &str) -> Option<&Exercise>;
    fn find_exercise_mut(&mut self, name: &str) -> Option<&mut Exercise>;
    fn find_workout(&self, name: &str) -> Option<&Workout>;
    /// Signals that the exercise was changed and has to be persisted.
    fn save_exercise(&mut self, name: &str);
}
