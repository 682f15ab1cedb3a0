//! The document interpreter: one pass over the line stream with
//! accumulation state, per-line soft failures and document-level validations.
//!
//! Per-line issues never abort the pass; they are collected into a capped
//! diagnostics list. The only hard failures are undecodable input and a file
//! in which nothing at all could be interpreted.

use encoding::all::ISO_8859_1;
use encoding::{DecoderTrap, Encoding};
use tracing::{debug, warn};

use crate::error::{AfdError, AfdResult};
use crate::models::{
    ChecksumSummary, InterpretedDocument, RecordBuckets, TrailerRecord, Validations,
};
use crate::parsing::{
    is_digits, parse_adjustment, parse_employee_master, parse_employer_change, parse_event,
    parse_header, parse_online_mark, parse_punch, parse_trailer, slice,
};

/// Maximum number of line-scoped diagnostics kept per document, so a
/// pathological file cannot produce unbounded output.
pub const MAX_ERRORS: usize = 200;

/// Per-type checksum verdicts accumulated during the pass.
#[derive(Default)]
struct CrcTally {
    header: Vec<bool>,
    employer_changes: Vec<bool>,
    punches: Vec<bool>,
    adjustments: Vec<bool>,
    employees: Vec<bool>,
}

impl CrcTally {
    fn summarize(values: &[bool]) -> Option<bool> {
        if values.is_empty() {
            None
        } else {
            Some(values.iter().all(|&ok| ok))
        }
    }

    fn into_summary(self) -> ChecksumSummary {
        ChecksumSummary {
            header: Self::summarize(&self.header),
            employer_changes: Self::summarize(&self.employer_changes),
            punches: Self::summarize(&self.punches),
            adjustments: Self::summarize(&self.adjustments),
            employees: Self::summarize(&self.employees),
        }
    }
}

/// Bounded diagnostics list.
struct Diagnostics {
    errors: Vec<String>,
    capped: bool,
}

impl Diagnostics {
    fn new() -> Self {
        Self {
            errors: Vec::new(),
            capped: false,
        }
    }

    fn push(&mut self, message: String) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(message);
        } else if !self.capped {
            self.capped = true;
            warn!(cap = MAX_ERRORS, "diagnostics cap reached, dropping further line errors");
        }
    }

    fn sample(&self, n: usize) -> String {
        self.errors
            .iter()
            .take(n)
            .cloned()
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Returns true iff the trailer's six counts match the bucket lengths and
/// its own type discriminator equals 9.
pub fn reconcile_counts(trailer: &TrailerRecord, buckets: &RecordBuckets) -> bool {
    trailer.count_type2 as usize == buckets.employer_changes.len()
        && trailer.count_type3 as usize == buckets.punches.len()
        && trailer.count_type4 as usize == buckets.adjustments.len()
        && trailer.count_type5 as usize == buckets.employees.len()
        && trailer.count_type6 as usize == buckets.events.len()
        && trailer.count_type7 as usize == buckets.online_marks.len()
        && trailer.record_type == 9
}

/// Interprets a raw AFD byte stream.
///
/// The file is decoded as ISO-8859-1 (one byte per character, so column
/// positions stay meaningful) with replacement of invalid sequences, then
/// handed to [`interpret_text`].
pub fn interpret_bytes(bytes: &[u8]) -> AfdResult<InterpretedDocument> {
    let text = ISO_8859_1
        .decode(bytes, DecoderTrap::Replace)
        .map_err(|e| AfdError::Unreadable {
            message: e.into_owned(),
        })?;
    interpret_text(&text)
}

/// Interprets an already-decoded AFD text.
///
/// Splits the input into non-empty lines (CRLF normalized first), classifies
/// each line by its leading NSR and type digit, dispatches to the matching
/// parser with fallback-on-failure for types 1 and 3, and computes the
/// document-level validations.
///
/// # Errors
///
/// Returns [`AfdError::NonInterpretable`] when, after the full pass, there is
/// no header, no trailer and every bucket is empty. Every other per-line
/// failure is soft: recorded in `validacoes.erros` and skipped.
pub fn interpret_text(text: &str) -> AfdResult<InterpretedDocument> {
    let normalized = text.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return Err(AfdError::NonInterpretable {
            sample: "empty file".to_string(),
        });
    }

    let mut diagnostics = Diagnostics::new();

    // Structural gate: a classifiable line has at least 10 characters and a
    // 9-digit NSR prefix. Everything else is skipped up front and excluded
    // from NSR-order checking and from all buckets.
    let mut classifiable: Vec<(u64, &str)> = Vec::new();
    for line in &lines {
        let prefix = slice(line, 1, 9);
        if line.chars().count() < 10 || !is_digits(prefix) {
            diagnostics.push(
                AfdError::Structural {
                    line: (*line).to_string(),
                }
                .to_string(),
            );
            continue;
        }
        // The prefix is all digits and fits in a u64.
        match prefix.parse::<u64>() {
            Ok(nsr) => classifiable.push((nsr, line)),
            Err(_) => diagnostics.push(
                AfdError::Structural {
                    line: (*line).to_string(),
                }
                .to_string(),
            ),
        }
    }

    // Whether the read order is already non-decreasing, independent of any
    // per-type semantics.
    let nsr_order_ok = classifiable.windows(2).all(|pair| pair[0].0 <= pair[1].0);

    let mut header = None;
    let mut trailer: Option<TrailerRecord> = None;
    let mut buckets = RecordBuckets::default();
    let mut tally = CrcTally::default();

    for &(_, line) in &classifiable {
        let type_digit = line.chars().nth(9).unwrap_or_default();
        let outcome: AfdResult<()> = match type_digit {
            '1' => parse_header(line).map(|record| {
                if let Some(ok) = record.crc_ok {
                    tally.header.push(ok);
                }
                // Last one parsed wins.
                header = Some(record);
            }),
            '2' => parse_employer_change(line).map(|record| {
                tally.employer_changes.push(record.crc_ok);
                buckets.employer_changes.push(record);
            }),
            '3' => parse_punch(line).map(|record| {
                // Only the official layout carries a checksum; compact
                // punches leave validity unknown and are not tallied.
                if let Some(ok) = record.crc_ok {
                    tally.punches.push(ok);
                }
                buckets.punches.push(record);
            }),
            '4' => parse_adjustment(line).map(|record| {
                tally.adjustments.push(record.crc_ok);
                buckets.adjustments.push(record);
            }),
            '5' => parse_employee_master(line).map(|record| {
                tally.employees.push(record.crc_ok);
                buckets.employees.push(record);
            }),
            '6' => parse_event(line).map(|record| {
                buckets.events.push(record);
            }),
            '7' => parse_online_mark(line).map(|record| {
                buckets.online_marks.push(record);
            }),
            '9' => parse_trailer(line).map(|record| {
                trailer = Some(record);
            }),
            other => Err(AfdError::UnknownType { type_digit: other }),
        };

        if let Err(error) = outcome {
            match error {
                AfdError::UnknownType { .. } => diagnostics.push(error.to_string()),
                _ => diagnostics.push(format!(
                    "failed to parse NSR {} (type {}): {}",
                    slice(line, 1, 9),
                    type_digit,
                    error
                )),
            }
        }
    }

    // A missing trailer contradicts nothing, so the reconciliation is
    // vacuously true.
    let counts_ok = trailer
        .as_ref()
        .map(|t| reconcile_counts(t, &buckets))
        .unwrap_or(true);

    if header.is_none() && trailer.is_none() && buckets.is_empty() {
        return Err(AfdError::NonInterpretable {
            sample: diagnostics.sample(3),
        });
    }

    debug!(
        lines = lines.len(),
        punches = buckets.punches.len(),
        errors = diagnostics.errors.len(),
        nsr_order_ok,
        counts_ok,
        "interpreted AFD document"
    );

    Ok(InterpretedDocument {
        header,
        records_by_type: buckets,
        trailer,
        validations: Validations {
            nsr_order_ok,
            counts_ok,
            crc_ok_by_type: tally.into_summary(),
            errors: diagnostics.errors,
        },
    })
}
