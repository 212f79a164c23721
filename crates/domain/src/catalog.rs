use crate::{
    Apparatus, DerivedWeightSetting, Exercise, HiitPlan, HiitSetting, LinearPlan, PercentOfPlan,
    Program, Progression, Settings, Tag, VariableWeightSetting, Warmups, Workout,
};

const BAR: f64 = 45.0;
const PLATES: [f64; 6] = [45.0, 35.0, 25.0, 10.0, 5.0, 2.5];

/// The programs shipped with the app.
#[must_use]
pub fn programs() -> Vec<Program> {
    vec![beginner_barbell()]
}

fn beginner_barbell() -> Program {
    Program::new(
        "Beginner Barbell",
        vec![
            Workout::new("A", &["Squat", "Bench Press", "Deadlift", "Intervals"])
                .with_optional(&["Intervals"]),
            Workout::new("B", &["Squat", "Front Squat", "Bench Press", "Intervals"])
                .with_optional(&["Intervals"]),
        ],
        vec![
            barbell_lift("Squat", "Low-bar Squat", 3, 5, 180),
            barbell_lift("Bench Press", "Bench Press", 3, 5, 180),
            barbell_lift("Deadlift", "Conventional Deadlift", 1, 5, 240),
            Exercise::new(
                "Front Squat",
                Progression::PercentOf(PercentOfPlan::new("3x3 @ 80%", 0.8, 3, 3)),
                Settings::DerivedWeight(DerivedWeightSetting {
                    other_exercise: "Squat".to_string(),
                    rest_secs: 150,
                }),
            ),
            Exercise::new(
                "Intervals",
                Progression::Hiit(HiitPlan::new("HIIT")),
                Settings::Hiit(HiitSetting {
                    warmup_secs: 300,
                    high_secs: 30,
                    low_secs: 60,
                    cooldown_secs: 300,
                    num_cycles: 8,
                    tags: vec!["bike".to_string()],
                }),
            )
            .with_formal_name("Stationary Bike Intervals"),
        ],
    )
    .with_tags(&[Tag::Beginner, Tag::Strength, Tag::Barbell, Tag::Conditioning])
    .with_description(
        "Three compound lifts progressed linearly each session, a lighter front squat derived \
         from the squat and an optional interval finisher.",
    )
}

fn barbell_lift(name: &str, formal_name: &str, sets: u32, reps: u32, rest_secs: u32) -> Exercise {
    Exercise::new(
        name,
        Progression::Linear(
            LinearPlan::new(&format!("{sets}x{reps}"), sets, reps)
                .with_warmups(Warmups::new(2, 0.4, 0.8, &[5, 5, 3, 2])),
        ),
        Settings::VariableWeight(VariableWeightSetting::new(
            Apparatus::barbell(BAR, &PLATES),
            0.0,
            rest_secs,
        )),
    )
    .with_formal_name(formal_name)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Plan;

    #[test]
    fn test_programs_are_valid() {
        for program in programs() {
            assert_eq!(program.errors(), Vec::<String>::new(), "{}", program.name);
        }
    }

    #[test]
    fn test_program_names_are_unique() {
        let mut names = programs().into_iter().map(|p| p.name).collect::<Vec<_>>();
        let count = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), count);
    }

    #[test]
    fn test_lifts_start_without_weight() {
        for program in programs() {
            for exercise in &program.exercises {
                if let Progression::Linear(_) = exercise.plan {
                    assert_eq!(exercise.current_weight(), None, "{}", exercise.name);
                    assert!(exercise.plan.precursor(exercise).is_some());
                }
            }
        }
    }
}
