use serde::{Deserialize, Serialize};

use crate::{Activity, Completion, Completions, RestTime, WarmupSet, WeightInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SetKind {
    Warmup,
    Work,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSet {
    pub kind: SetKind,
    pub reps: u32,
    /// Share of the work weight, only meaningful for warmups.
    pub percent: f64,
    pub weight: WeightInfo,
}

impl From<WarmupSet> for PlannedSet {
    fn from(value: WarmupSet) -> Self {
        Self {
            kind: SetKind::Warmup,
            reps: value.reps,
            percent: value.percent,
            weight: value.weight,
        }
    }
}

/// The sets of one cycle of a set-based plan and the position within them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sets {
    sets: Vec<PlannedSet>,
    index: usize,
    /// Shown below the title of every work set.
    note: String,
}

impl Sets {
    #[must_use]
    pub fn new(warmups: Vec<WarmupSet>, work_sets: u32, reps: u32, work: &WeightInfo) -> Self {
        let mut sets = warmups
            .into_iter()
            .map(PlannedSet::from)
            .collect::<Vec<_>>();
        sets.extend((0..work_sets).map(|_| PlannedSet {
            kind: SetKind::Work,
            reps,
            percent: 1.0,
            weight: work.clone(),
        }));
        Self {
            sets,
            index: 0,
            note: String::new(),
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: String) -> Self {
        self.note = note;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current(&self) -> Option<&PlannedSet> {
        self.sets.get(self.index)
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.sets.len()
    }

    /// The weight of the work sets.
    #[must_use]
    pub fn work_weight(&self) -> Option<&WeightInfo> {
        self.sets
            .iter()
            .find(|s| s.kind == SetKind::Work)
            .map(|s| &s.weight)
    }

    /// Move to the next set. Returns false if there are none left.
    pub fn advance(&mut self) -> bool {
        self.index += 1;
        self.index < self.sets.len()
    }

    #[must_use]
    pub fn activity(&self) -> Activity {
        let Some(set) = self.current() else {
            return Activity::default();
        };
        let (number, count) = self.position(set.kind);
        let (title, subtitle, color) = match set.kind {
            SetKind::Warmup => (
                format!("Warmup {number} of {count}"),
                self.work_weight().map_or_else(String::new, |work| {
                    format!("{:.0}% of {}", set.percent * 100.0, work.text)
                }),
                Some("gray".to_string()),
            ),
            SetKind::Work => (
                format!("Workset {number} of {count}"),
                self.note.clone(),
                None,
            ),
        };
        Activity {
            title,
            subtitle,
            amount: format!("{} × {}", set.reps, set.weight.text),
            details: set.weight.plates.clone(),
            button_name: if self.is_last() { "Done" } else { "Next" }.to_string(),
            show_start_button: true,
            color,
        }
    }

    /// Rest after the current set. Warmups and the last set need none.
    #[must_use]
    pub fn rest(&self, rest_secs: u32) -> RestTime {
        match self.current() {
            Some(set) if set.kind == SetKind::Work && !self.is_last() => RestTime {
                auto_start: true,
                secs: rest_secs,
            },
            _ => RestTime::none(),
        }
    }

    /// The last set decides whether the cycle succeeded.
    #[must_use]
    pub fn completions(&self) -> Completions {
        if self.is_last() {
            Completions::Normal(vec![
                Completion::new("Finished", "All reps were completed", true),
                Completion::new("Missed", "Some reps were missed", false),
            ])
        } else {
            Completions::Normal(vec![Completion::new("Done", "", true)])
        }
    }

    fn position(&self, kind: SetKind) -> (usize, usize) {
        let count = self.sets.iter().filter(|s| s.kind == kind).count();
        let before = self.sets[..self.index]
            .iter()
            .filter(|s| s.kind == kind)
            .count();
        (before + 1, count)
    }
}
