use serde::{Deserialize, Serialize};

use crate::{Apparatus, MachineRange};

const EPSILON: f64 = 1e-6;

/// Number of search steps on each side of the centre for the first attempt.
const INITIAL_SPAN: i32 = 8;
const MAX_SPAN: i32 = 1024;

/// A load the apparatus can actually produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightInfo {
    pub weight: f64,
    pub text: String,
    pub plates: String,
}

impl WeightInfo {
    fn new(weight: f64, plates: String) -> Self {
        Self {
            weight,
            text: format!("{} lbs", format_weight(weight)),
            plates,
        }
    }
}

#[must_use]
pub fn format_weight(weight: f64) -> String {
    let rounded = (weight * 100.0).round() / 100.0 + 0.0;
    if (rounded - rounded.round()).abs() < EPSILON {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.2}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Resolves a target weight to the loads producible by an apparatus.
///
/// # Panics
///
/// All queries panic for dumbbell apparatus, which only offer a fixed list of weights to pick
/// from.
pub struct Weight<'a> {
    target: f64,
    apparatus: &'a Apparatus,
}

impl<'a> Weight<'a> {
    #[must_use]
    pub fn new(target: f64, apparatus: &'a Apparatus) -> Self {
        Self { target, apparatus }
    }

    /// The achievable load nearest to the target. Ties go to the lighter load.
    #[must_use]
    pub fn closest(&self) -> WeightInfo {
        let target = self.target;
        let candidates = self.search(target, |candidates, floor| {
            brackets(candidates, target, floor)
        });
        nearest(candidates.iter(), target)
            .unwrap_or_else(|| candidates[0].clone())
            .into()
    }

    /// The load nearest to the target that is strictly lighter than what `limit` resolves to.
    ///
    /// Returns the lightest load if nothing is lighter than the limit.
    #[must_use]
    pub fn closest_below(&self, limit: f64) -> WeightInfo {
        let resolved = Weight::new(limit, self.apparatus).closest().weight;
        let center = self.target.min(resolved);
        let candidates = self.search(center, |candidates, floor| {
            brackets(candidates, center, floor)
                && candidates
                    .first()
                    .is_some_and(|c| c.weight < resolved - EPSILON || c.weight <= floor + EPSILON)
        });
        nearest(
            candidates.iter().filter(|c| c.weight < resolved - EPSILON),
            self.target,
        )
        .unwrap_or_else(|| candidates[0].clone())
        .into()
    }

    /// The load nearest to the target that is strictly heavier than what `limit` resolves to.
    ///
    /// Returns the heaviest load if nothing is heavier than the limit.
    #[must_use]
    pub fn closest_above(&self, limit: f64) -> WeightInfo {
        let resolved = Weight::new(limit, self.apparatus).closest().weight;
        let center = self.target.max(resolved);
        let candidates = self.search(center, |candidates, floor| {
            brackets(candidates, center, floor)
                && candidates
                    .last()
                    .is_some_and(|c| c.weight > resolved + EPSILON)
        });
        nearest(
            candidates.iter().filter(|c| c.weight > resolved + EPSILON),
            self.target,
        )
        .unwrap_or_else(|| candidates[candidates.len() - 1].clone())
        .into()
    }

    /// The lightest load strictly heavier than the target.
    #[must_use]
    pub fn next_weight(&self) -> f64 {
        let target = self.target;
        let candidates = self.search(target, |candidates, _| {
            candidates.last().is_some_and(|c| c.weight > target + EPSILON)
        });
        candidates
            .iter()
            .find(|c| c.weight > target + EPSILON)
            .unwrap_or(&candidates[candidates.len() - 1])
            .weight
    }

    /// Candidates around `center`, widening the window until `done` accepts them.
    ///
    /// `done` also receives the lightest achievable load.
    fn search(&self, center: f64, done: impl Fn(&[Candidate], f64) -> bool) -> Vec<Candidate> {
        match self.apparatus {
            Apparatus::Barbell {
                bar,
                collar,
                plates,
                bumpers,
                magnets,
            } => Plates::new(*bar, *collar, 2.0, plates, bumpers, magnets).search(center, done),
            Apparatus::PairedPlates { plates } => {
                Plates::new(0.0, 0.0, 2.0, plates, &[], &[]).search(center, done)
            }
            Apparatus::SinglePlates { plates } => {
                Plates::new(0.0, 0.0, 1.0, plates, &[], &[]).search(center, done)
            }
            Apparatus::Machine {
                range1,
                range2,
                extra,
            } => machine_candidates(range1, range2.as_ref(), extra),
            Apparatus::DumbbellSingle { .. } | Apparatus::DumbbellPaired { .. } => {
                panic!("nearest weight search isn't supported for dumbbells")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    weight: f64,
    plates: String,
}

impl From<Candidate> for WeightInfo {
    fn from(value: Candidate) -> Self {
        WeightInfo::new(value.weight, value.plates)
    }
}

/// Whether the candidates reach `center` from both sides. The lower side also counts as
/// reached once the lightest load is included.
fn brackets(candidates: &[Candidate], center: f64, floor: f64) -> bool {
    candidates
        .last()
        .is_some_and(|c| c.weight >= center - EPSILON)
        && candidates
            .first()
            .is_some_and(|c| c.weight <= center + EPSILON || c.weight <= floor + EPSILON)
}

fn nearest<'a>(candidates: impl Iterator<Item = &'a Candidate>, target: f64) -> Option<Candidate> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        let closer = best.is_none_or(|b| {
            (candidate.weight - target).abs() < (b.weight - target).abs() - EPSILON
        });
        if closer {
            best = Some(candidate);
        }
    }
    best.cloned()
}

fn sort_and_dedup(candidates: &mut Vec<Candidate>) {
    candidates.sort_by(|a, b| a.weight.total_cmp(&b.weight));
    candidates.dedup_by(|b, a| (a.weight - b.weight).abs() < EPSILON);
}

fn round(weight: f64) -> f64 {
    (weight * 1e6).round() / 1e6
}

fn machine_candidates(
    range1: &MachineRange,
    range2: Option<&MachineRange>,
    extra: &[f64],
) -> Vec<Candidate> {
    let mut primary = range1.weights();
    if let Some(range2) = range2 {
        primary.extend(range2.weights());
    }
    primary.sort_by(f64::total_cmp);
    primary.dedup_by(|b, a| (*a - *b).abs() < EPSILON);

    let mut extra = if extra.is_empty() {
        vec![0.0]
    } else {
        extra.to_vec()
    };
    extra.sort_by(f64::total_cmp);
    extra.dedup_by(|b, a| (*a - *b).abs() < EPSILON);

    let mut candidates = primary
        .iter()
        .flat_map(|p| {
            extra.iter().map(move |e| Candidate {
                weight: round(p + e),
                plates: if *e > EPSILON {
                    format!("+{}", format_weight(*e))
                } else {
                    String::new()
                },
            })
        })
        .collect::<Vec<_>>();
    sort_and_dedup(&mut candidates);
    candidates
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PieceKind {
    Plate,
    Bumper,
    Magnet,
}

impl PieceKind {
    fn name(self) -> &'static str {
        match self {
            PieceKind::Plate => "plate",
            PieceKind::Bumper => "bumper",
            PieceKind::Magnet => "magnet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Piece {
    value: f64,
    kind: PieceKind,
}

/// Plate inventory of a bar or plate-loaded apparatus.
struct Plates {
    base: f64,
    collar: f64,
    sides: f64,
    /// Heaviest first.
    denominations: Vec<Piece>,
    smallest_bumper: Option<Piece>,
}

impl Plates {
    fn new(
        base: f64,
        collar: f64,
        sides: f64,
        plates: &[f64],
        bumpers: &[f64],
        magnets: &[f64],
    ) -> Self {
        let pieces = |values: &[f64], kind| {
            values
                .iter()
                .filter(|v| **v > EPSILON)
                .map(|v| Piece { value: *v, kind })
                .collect::<Vec<_>>()
        };

        let mut denominations = [
            pieces(plates, PieceKind::Plate),
            pieces(bumpers, PieceKind::Bumper),
            pieces(magnets, PieceKind::Magnet),
        ]
        .concat();
        denominations.sort_by(|a, b| b.value.total_cmp(&a.value));
        denominations.dedup();

        let smallest_bumper = denominations
            .iter()
            .rev()
            .find(|p| p.kind == PieceKind::Bumper)
            .copied();

        Self {
            base,
            collar,
            sides,
            denominations,
            smallest_bumper,
        }
    }

    fn step(&self) -> f64 {
        self.denominations
            .last()
            .map_or(1.0, |smallest| self.sides * smallest.value)
    }

    fn search(&self, center: f64, done: impl Fn(&[Candidate], f64) -> bool) -> Vec<Candidate> {
        let floor = self.load(f64::MIN).weight;
        let mut span = INITIAL_SPAN;
        loop {
            let candidates = self.candidates(center, span);
            if span >= MAX_SPAN || done(&candidates, floor) {
                return candidates;
            }
            span *= 2;
        }
    }

    fn candidates(&self, center: f64, span: i32) -> Vec<Candidate> {
        let step = self.step();
        let mut candidates = (-span..=span)
            .map(|k| self.load(center + f64::from(k) * step))
            .collect::<Vec<_>>();
        sort_and_dedup(&mut candidates);
        candidates
    }

    fn load(&self, target: f64) -> Candidate {
        let per_side = (target - self.base - self.collar) / self.sides;
        let mut pieces = vec![];
        self.fill(per_side, &mut pieces);

        if let Some(bumper) = self.smallest_bumper {
            if !pieces.iter().any(|p| p.kind == PieceKind::Bumper) {
                pieces = vec![bumper];
                self.fill(per_side - bumper.value, &mut pieces);
            }
        }

        let weight = if pieces.is_empty() {
            self.base
        } else {
            self.base + self.collar + self.sides * pieces.iter().map(|p| p.value).sum::<f64>()
        };

        Candidate {
            weight: round(weight),
            plates: describe(&pieces),
        }
    }

    /// Loads the heaviest denomination as often as it fits and every other denomination at
    /// most twice. A magnet is loaded at most once and never as the only piece.
    fn fill(&self, mut remaining: f64, pieces: &mut Vec<Piece>) {
        for (i, piece) in self.denominations.iter().enumerate() {
            let limit = match piece.kind {
                PieceKind::Magnet => 1,
                _ if i == 0 => usize::MAX,
                _ => 2,
            };
            let mut count = 0;
            while count < limit && piece.value <= remaining + EPSILON {
                if piece.kind == PieceKind::Magnet && pieces.is_empty() {
                    break;
                }
                pieces.push(*piece);
                remaining -= piece.value;
                count += 1;
            }
        }
    }
}

fn describe(pieces: &[Piece]) -> String {
    match pieces {
        [] => "no plates".to_string(),
        [piece] => format!("{} {}", format_weight(piece.value), piece.kind.name()),
        _ => {
            let mut groups: Vec<(Piece, usize)> = vec![];
            for piece in pieces {
                match groups.iter_mut().find(|(p, _)| p == piece) {
                    Some((_, count)) => *count += 1,
                    None => groups.push((*piece, 1)),
                }
            }
            groups
                .iter()
                .map(|(piece, count)| {
                    if *count > 1 {
                        format!("{count} {}s", format_weight(piece.value))
                    } else {
                        format_weight(piece.value)
                    }
                })
                .collect::<Vec<_>>()
                .join(" + ")
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn barbell() -> Apparatus {
        Apparatus::barbell(45.0, &[45.0, 25.0, 10.0, 5.0, 2.5])
    }

    fn apparatus() -> Vec<Apparatus> {
        vec![
            barbell(),
            Apparatus::barbell(45.0, &[45.0, 35.0, 25.0, 10.0, 5.0, 2.5]),
            Apparatus::Barbell {
                bar: 20.0,
                collar: 5.0,
                plates: vec![25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 1.25],
                bumpers: vec![],
                magnets: vec![],
            },
            Apparatus::PairedPlates {
                plates: vec![45.0, 25.0, 10.0, 5.0],
            },
            Apparatus::SinglePlates {
                plates: vec![25.0, 10.0, 5.0, 2.5],
            },
            Apparatus::machine(MachineRange::new(10.0, 200.0, 10.0), &[0.0, 2.5, 5.0]),
            Apparatus::Machine {
                range1: MachineRange::new(5.0, 50.0, 5.0),
                range2: Some(MachineRange::new(60.0, 150.0, 15.0)),
                extra: vec![0.0, 2.0],
            },
        ]
    }

    fn targets() -> impl Iterator<Item = f64> {
        (0..200).map(|i| 60.0 + f64::from(i) * 1.7)
    }

    /// Parses a plate description back into (count, value) pairs.
    fn parse(description: &str) -> Vec<(usize, f64)> {
        description
            .split(" + ")
            .map(|group| match group.split_once(' ') {
                Some((count, value)) if value.ends_with('s') => (
                    count.parse().unwrap(),
                    value.trim_end_matches('s').parse().unwrap(),
                ),
                Some((value, _kind)) => (1, value.parse().unwrap()),
                None => (1, group.parse().unwrap()),
            })
            .collect()
    }

    #[rstest]
    #[case(225.0, "225")]
    #[case(2.5, "2.5")]
    #[case(1.25, "1.25")]
    #[case(10.10000001, "10.1")]
    #[case(0.0, "0")]
    #[case(-0.0000001, "0")]
    fn test_format_weight(#[case] weight: f64, #[case] expected: &str) {
        assert_eq!(format_weight(weight), expected);
    }

    #[test]
    fn test_closest_barbell() {
        assert_eq!(
            Weight::new(225.0, &barbell()).closest(),
            WeightInfo {
                weight: 225.0,
                text: "225 lbs".to_string(),
                plates: "2 45s".to_string(),
            }
        );
    }

    #[rstest]
    #[case(45.0, 45.0, "no plates")]
    #[case(0.0, 45.0, "no plates")]
    #[case(135.0, 135.0, "45 plate")]
    #[case(137.0, 135.0, "45 plate")]
    #[case(139.0, 140.0, "45 + 2.5")]
    #[case(185.0, 185.0, "45 + 25")]
    #[case(320.0, 320.0, "3 45s + 2.5")]
    #[case(295.0, 295.0, "2 45s + 25 + 10")]
    #[case(500.0, 500.0, "5 45s + 2.5")]
    fn test_closest(#[case] target: f64, #[case] weight: f64, #[case] plates: &str) {
        let info = Weight::new(target, &barbell()).closest();
        assert_approx_eq!(info.weight, weight);
        assert_eq!(info.plates, plates);
    }

    #[test]
    fn test_closest_tie_prefers_lighter() {
        let apparatus = Apparatus::barbell(45.0, &[45.0, 25.0, 10.0, 5.0]);
        assert_approx_eq!(Weight::new(230.0, &apparatus).closest().weight, 225.0);
    }

    #[test]
    fn test_closest_below() {
        let apparatus = Apparatus::barbell(45.0, &[45.0, 25.0, 10.0, 5.0]);
        let info = Weight::new(230.0, &apparatus).closest_below(235.0);
        assert_approx_eq!(info.weight, 225.0);
        assert_eq!(info.plates, "2 45s");
    }

    #[test]
    fn test_closest_below_uses_resolved_limit() {
        // 236 snaps to 235, so 235 itself is excluded.
        let apparatus = Apparatus::barbell(45.0, &[45.0, 25.0, 10.0, 5.0]);
        assert_approx_eq!(
            Weight::new(240.0, &apparatus).closest_below(236.0).weight,
            225.0
        );
    }

    #[test]
    fn test_closest_below_floor() {
        assert_approx_eq!(
            Weight::new(0.0, &barbell()).closest_below(45.0).weight,
            45.0
        );
    }

    #[test]
    fn test_closest_above() {
        let info = Weight::new(220.0, &barbell()).closest_above(225.0);
        assert_approx_eq!(info.weight, 230.0);
        assert_eq!(info.plates, "2 45s + 2.5");
    }

    #[test]
    fn test_closest_above_machine_ceiling() {
        let apparatus = Apparatus::machine(MachineRange::new(50.0, 70.0, 10.0), &[0.0, 5.0]);
        assert_approx_eq!(
            Weight::new(100.0, &apparatus).closest_above(100.0).weight,
            75.0
        );
    }

    #[rstest]
    #[case(225.0, 230.0)]
    #[case(227.0, 230.0)]
    #[case(232.0, 235.0)]
    #[case(0.0, 45.0)]
    #[case(44.0, 45.0)]
    fn test_next_weight(#[case] target: f64, #[case] expected: f64) {
        assert_approx_eq!(Weight::new(target, &barbell()).next_weight(), expected);
    }

    #[test]
    fn test_machine() {
        let apparatus = Apparatus::machine(MachineRange::new(50.0, 70.0, 10.0), &[0.0, 5.0]);
        let info = Weight::new(63.0, &apparatus).closest();
        assert_approx_eq!(info.weight, 65.0);
        assert_eq!(info.plates, "+5");
        assert_eq!(Weight::new(60.0, &apparatus).closest().plates, "");
        assert_approx_eq!(Weight::new(63.0, &apparatus).closest_below(63.0).weight, 60.0);
        assert_approx_eq!(Weight::new(63.0, &apparatus).closest_above(63.0).weight, 70.0);
        assert_approx_eq!(Weight::new(0.0, &apparatus).closest().weight, 50.0);
    }

    #[test]
    fn test_bumpers_are_always_loaded() {
        let apparatus = Apparatus::Barbell {
            bar: 20.0,
            collar: 0.0,
            plates: vec![5.0, 2.5],
            bumpers: vec![25.0, 15.0, 10.0],
            magnets: vec![],
        };

        let info = Weight::new(20.0, &apparatus).closest();
        assert_approx_eq!(info.weight, 40.0);
        assert_eq!(info.plates, "10 bumper");

        let info = Weight::new(50.0, &apparatus).closest();
        assert_approx_eq!(info.weight, 50.0);
        assert_eq!(info.plates, "15 bumper");

        let info = Weight::new(55.0, &apparatus).closest();
        assert_approx_eq!(info.weight, 55.0);
        assert_eq!(info.plates, "15 + 2.5");
    }

    #[test]
    fn test_collar_only_with_plates() {
        let apparatus = Apparatus::Barbell {
            bar: 20.0,
            collar: 5.0,
            plates: vec![10.0],
            bumpers: vec![],
            magnets: vec![],
        };
        assert_approx_eq!(Weight::new(20.0, &apparatus).closest().weight, 20.0);
        assert_approx_eq!(Weight::new(45.0, &apparatus).closest().weight, 45.0);
        assert_approx_eq!(Weight::new(20.0, &apparatus).next_weight(), 45.0);
    }

    #[test]
    fn test_magnet_is_never_loaded_alone() {
        let apparatus = Apparatus::Barbell {
            bar: 45.0,
            collar: 0.0,
            plates: vec![45.0, 25.0, 10.0, 5.0, 2.5],
            bumpers: vec![],
            magnets: vec![0.5],
        };
        assert_approx_eq!(Weight::new(46.0, &apparatus).closest().weight, 45.0);

        let info = Weight::new(51.0, &apparatus).closest();
        assert_approx_eq!(info.weight, 51.0);
        assert_eq!(info.plates, "2.5 + 0.5");
    }

    #[test]
    fn test_paired_and_single_plates() {
        let paired = Apparatus::PairedPlates {
            plates: vec![45.0, 25.0, 10.0, 5.0],
        };
        let info = Weight::new(100.0, &paired).closest();
        assert_approx_eq!(info.weight, 100.0);
        assert_eq!(info.plates, "45 + 5");
        assert_eq!(Weight::new(0.0, &paired).closest().plates, "no plates");

        let single = Apparatus::SinglePlates {
            plates: vec![25.0, 10.0, 5.0, 2.5],
        };
        let info = Weight::new(37.5, &single).closest();
        assert_approx_eq!(info.weight, 37.5);
        assert_eq!(info.plates, "25 + 10 + 2.5");
    }

    #[test]
    #[should_panic(expected = "nearest weight search isn't supported for dumbbells")]
    fn test_dumbbells_are_rejected() {
        let apparatus = Apparatus::DumbbellPaired {
            weights: vec![10.0, 15.0, 20.0],
            magnets: vec![],
        };
        let _ = Weight::new(12.0, &apparatus).closest();
    }

    #[test]
    fn test_plate_description_round_trip() {
        for apparatus in [barbell(), apparatus()[1].clone(), apparatus()[2].clone()] {
            for target in targets() {
                let info = Weight::new(target, &apparatus).closest();
                if info.plates == "no plates" {
                    continue;
                }
                let (bar, collar) = match apparatus {
                    Apparatus::Barbell { bar, collar, .. } => (bar, collar),
                    _ => unreachable!(),
                };
                let per_side: f64 = parse(&info.plates)
                    .iter()
                    .map(|(count, value)| {
                        #[allow(clippy::cast_precision_loss)]
                        let count = *count as f64;
                        count * value
                    })
                    .sum();
                assert_approx_eq!(bar + collar + 2.0 * per_side, info.weight);
            }
        }
    }

    #[test]
    fn test_parse_plate_description() {
        assert_eq!(parse("2 10s"), vec![(2, 10.0)]);
        assert_eq!(parse("45 plate"), vec![(1, 45.0)]);
        assert_eq!(parse("2 45s + 25 + 2.5"), vec![(2, 45.0), (1, 25.0), (1, 2.5)]);
    }

    #[test]
    fn test_closest_is_nearest() {
        for apparatus in apparatus() {
            for target in targets() {
                let closest = Weight::new(target, &apparatus).closest().weight;
                let below = Weight::new(target, &apparatus).closest_below(closest);
                let above = Weight::new(target, &apparatus).closest_above(closest);
                if below.weight < closest {
                    assert!(
                        (target - below.weight).abs() >= (target - closest).abs() - EPSILON,
                        "{apparatus:?} {target}"
                    );
                }
                if above.weight > closest {
                    assert!(
                        (above.weight - target).abs() > (target - closest).abs() - EPSILON,
                        "{apparatus:?} {target}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_closest_below_has_no_gap() {
        for apparatus in apparatus() {
            for limit in targets() {
                let resolved = Weight::new(limit, &apparatus).closest().weight;
                let below = Weight::new(limit + 20.0, &apparatus).closest_below(limit);
                if below.weight >= resolved {
                    // The limit is the lightest load.
                    assert_approx_eq!(
                        below.weight,
                        Weight::new(0.0, &apparatus).closest().weight
                    );
                    continue;
                }
                assert!(
                    Weight::new(below.weight, &apparatus).next_weight() >= resolved - EPSILON,
                    "{apparatus:?} {limit}"
                );
            }
        }
    }

    #[test]
    fn test_closest_above_has_no_gap() {
        for apparatus in apparatus() {
            for limit in targets() {
                let resolved = Weight::new(limit, &apparatus).closest().weight;
                let above = Weight::new(limit - 20.0, &apparatus).closest_above(limit);
                if above.weight <= resolved {
                    // The limit is the heaviest load.
                    assert!(matches!(apparatus, Apparatus::Machine { .. }));
                    continue;
                }
                assert_approx_eq!(Weight::new(resolved, &apparatus).next_weight(), above.weight);
            }
        }
    }

    #[test]
    fn test_limited_queries_with_wide_gap() {
        let apparatus = Apparatus::barbell(45.0, &[45.0, 1.25]);
        let closest = Weight::new(95.0, &apparatus).closest();

        assert_approx_eq!(closest.weight, 135.0);
        assert_eq!(Weight::new(95.0, &apparatus).closest_below(200.0), closest);
        assert_eq!(Weight::new(95.0, &apparatus).closest_above(40.0), closest);
    }

    #[test]
    fn test_distant_limits_do_not_change_closest() {
        let apparatus = Apparatus::barbell(45.0, &[45.0, 1.25]);
        for target in (45..=240).step_by(5).map(f64::from) {
            let weight = Weight::new(target, &apparatus);
            let closest = weight.closest();
            assert_eq!(weight.closest_below(1000.0), closest, "{target}");
            if closest.weight > 45.0 {
                assert_eq!(weight.closest_above(0.0), closest, "{target}");
            }
        }
    }

    #[test]
    fn test_next_weight_is_fixed_point() {
        for apparatus in apparatus() {
            for target in targets() {
                let next = Weight::new(target, &apparatus).next_weight();
                if next <= target {
                    assert!(matches!(apparatus, Apparatus::Machine { .. }));
                    continue;
                }
                assert_approx_eq!(Weight::new(next, &apparatus).closest().weight, next);
                assert!(
                    Weight::new(target, &apparatus).closest_below(next).weight <= target + EPSILON,
                    "{apparatus:?} {target}"
                );
            }
        }
    }
}
