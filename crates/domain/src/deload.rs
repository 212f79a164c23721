use chrono::NaiveDateTime;

/// A weight reduced according to the time since an exercise was last performed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deload {
    pub weight: f64,
    /// Reduction in percent, only present if the weight was actually reduced.
    pub percent: Option<u32>,
    pub weeks: i64,
}

/// Reduce `weight` by the factor `table` assigns to the number of whole weeks since
/// `last_performed`.
///
/// The table is ordered from no elapsed time to the longest gap. Gaps longer than the table use
/// its last entry. An empty table never reduces the weight.
#[must_use]
pub fn deload_by_date(
    weight: f64,
    last_performed: NaiveDateTime,
    table: &[f64],
    now: NaiveDateTime,
) -> Deload {
    let weeks = (now - last_performed).num_weeks().max(0);
    let factor = usize::try_from(weeks)
        .ok()
        .and_then(|index| table.get(index.min(table.len().saturating_sub(1))))
        .copied()
        .unwrap_or(1.0);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = ((1.0 - factor) * 100.0).round().max(0.0) as u32;

    Deload {
        weight: weight * factor,
        percent: (percent > 0).then_some(percent),
        weeks,
    }
}
