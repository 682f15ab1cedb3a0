//! The journey summarizer: reconstructs per-person, per-day work journeys
//! from validated punch records.
//!
//! Malformed punches (missing tax ID or timestamp, or a timestamp that does
//! not parse) are silently excluded rather than reported: their validity was
//! already adjudicated by the interpreter, and robustness against noisy
//! upstream data is preferred here. This is a deliberate policy.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use tracing::debug;

use crate::models::{JourneyOptions, JourneyPair, JourneyRow, PunchRecord, SortOrder};
use crate::parsing::is_iso_datetime;

/// The format every punch timestamp must match: ISO date/time with zero
/// seconds and a literal UTC offset.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:00%z";

/// One journey's worth of timestamps, paired consecutively.
///
/// Element 0 pairs with element 1 as (entry, exit), element 2 with element 3,
/// and so on; an odd count leaves the final entry without an exit. A pair
/// contributes `exit - entry` to the total only when `exit > entry`; reversed
/// or incomplete pairs contribute nothing.
fn pair_punches(
    times: &[DateTime<FixedOffset>],
) -> (Duration, Vec<(DateTime<FixedOffset>, Option<DateTime<FixedOffset>>)>) {
    let mut pairs = Vec::with_capacity(times.len().div_ceil(2));
    let mut total = Duration::zero();
    let mut i = 0;
    while i < times.len() {
        let entry = times[i];
        let exit = times.get(i + 1).copied();
        if let Some(exit) = exit
            && exit > entry
        {
            total += exit - entry;
        }
        pairs.push((entry, exit));
        i += 2;
    }
    (total, pairs)
}

/// Formats a duration as `HH:MM` by integer floor-division of whole seconds,
/// clamping negatives to zero first.
fn format_hhmm(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!("{:02}:{:02}", total / 3600, (total % 3600) / 60)
}

/// Renders a local timestamp as `YYYY-MM-DD HH:MM`.
fn format_local(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// Reconstructs one journey row per (tax ID, local calendar date).
///
/// Timestamps are grouped by the date they fall on in their own embedded UTC
/// offset, sorted ascending, and paired consecutively into entry/exit
/// intervals. Each row renders up to `options.pair_count` pairs (unused
/// slots render empty; pairs beyond the count still contribute to the total)
/// plus the total worked duration and two independent overtime figures,
/// `max(0, total - 10h)` and `max(0, total - 6h)`.
///
/// Rows are ordered by (date, tax ID) or (tax ID, date) per
/// `options.sort_order`.
///
/// # Example
///
/// ```
/// use afd_engine::journey::summarize_journeys;
/// use afd_engine::models::{JourneyOptions, PunchRecord, RecordFormat};
///
/// let punch = |nsr, timestamp: &str| PunchRecord {
///     nsr,
///     record_type: '3',
///     timestamp: timestamp.to_string(),
///     cpf: "12345678901".to_string(),
///     crc16: None,
///     crc_ok: None,
///     format: RecordFormat::Compact,
/// };
/// let punches = vec![
///     punch(1, "2025-07-16T08:00:00-0300"),
///     punch(2, "2025-07-16T12:00:00-0300"),
/// ];
///
/// let rows = summarize_journeys(&punches, &JourneyOptions::default());
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].worked, "04:00");
/// ```
pub fn summarize_journeys(punches: &[PunchRecord], options: &JourneyOptions) -> Vec<JourneyRow> {
    // The configuration contract requires at least one rendered pair.
    let pair_count = options.pair_count.max(1);

    let mut groups: BTreeMap<(String, NaiveDate), Vec<DateTime<FixedOffset>>> = BTreeMap::new();
    for punch in punches {
        let cpf = punch.cpf.trim();
        let timestamp = punch.timestamp.trim();
        if cpf.is_empty() || timestamp.is_empty() || !is_iso_datetime(timestamp) {
            continue;
        }
        let Ok(dt) = DateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT) else {
            continue;
        };
        // Local date in the timestamp's own offset.
        groups
            .entry((cpf.to_string(), dt.date_naive()))
            .or_default()
            .push(dt);
    }

    let mut rows: Vec<JourneyRow> = Vec::with_capacity(groups.len());
    for ((cpf, date), mut times) in groups {
        times.sort();
        let (total, pairs) = pair_punches(&times);

        let rendered: Vec<JourneyPair> = (0..pair_count)
            .map(|slot| match pairs.get(slot) {
                Some((entry, exit)) => JourneyPair {
                    entry: format_local(entry),
                    exit: exit.as_ref().map(format_local).unwrap_or_default(),
                },
                None => JourneyPair::default(),
            })
            .collect();

        let over_10h = (total - Duration::hours(10)).max(Duration::zero());
        let over_6h = (total - Duration::hours(6)).max(Duration::zero());

        rows.push(JourneyRow {
            cpf,
            date,
            pairs: rendered,
            worked: format_hhmm(total),
            overtime_over_10h: format_hhmm(over_10h),
            overtime_over_6h: format_hhmm(over_6h),
        });
    }

    match options.sort_order {
        SortOrder::DateCpf => rows.sort_by(|a, b| (a.date, &a.cpf).cmp(&(b.date, &b.cpf))),
        SortOrder::CpfDate => rows.sort_by(|a, b| (&a.cpf, a.date).cmp(&(&b.cpf, b.date))),
    }

    debug!(punches = punches.len(), rows = rows.len(), "summarized journeys");
    rows
}
