//! Journey summary models and summarizer configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default number of entry/exit pairs rendered per journey row.
pub const DEFAULT_PAIR_COUNT: usize = 4;

/// Row ordering for the journey summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Date-major: (date, tax ID). The default.
    #[default]
    #[serde(rename = "data_cpf")]
    DateCpf,
    /// Person-major: (tax ID, date).
    #[serde(rename = "cpf_data")]
    CpfDate,
}

/// Configuration consumed by the journey summarizer.
///
/// Passed explicitly into the summarizer call; the engine holds no
/// process-wide state.
///
/// # Example
///
/// ```
/// use afd_engine::models::{JourneyOptions, SortOrder};
///
/// let options = JourneyOptions::default();
/// assert_eq!(options.pair_count, 4);
/// assert_eq!(options.sort_order, SortOrder::DateCpf);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyOptions {
    /// How many entry/exit pairs to render per row. Must be at least 1.
    /// Pairs beyond this count still contribute to the day's total but are
    /// not individually rendered.
    pub pair_count: usize,
    /// Row ordering mode.
    pub sort_order: SortOrder,
}

impl Default for JourneyOptions {
    fn default() -> Self {
        Self {
            pair_count: DEFAULT_PAIR_COUNT,
            sort_order: SortOrder::default(),
        }
    }
}

/// One rendered entry/exit pair, `YYYY-MM-DD HH:MM` local time.
///
/// Empty strings stand for missing halves: an odd punch count leaves the
/// final exit empty, and unused pair slots leave both halves empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyPair {
    /// Rendered entry timestamp, or empty.
    #[serde(rename = "entrada")]
    pub entry: String,
    /// Rendered exit timestamp, or empty.
    #[serde(rename = "saida")]
    pub exit: String,
}

/// One reconstructed work journey: one person, one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyRow {
    /// The person's tax ID.
    pub cpf: String,
    /// The local calendar date of the journey.
    #[serde(rename = "data")]
    pub date: NaiveDate,
    /// Rendered entry/exit pairs; always exactly `pair_count` entries.
    #[serde(rename = "pares")]
    pub pairs: Vec<JourneyPair>,
    /// Total worked duration, `HH:MM`.
    #[serde(rename = "horas_trabalhadas")]
    pub worked: String,
    /// Worked time beyond 10 hours, `HH:MM`, clamped at zero.
    #[serde(rename = "horas_extras_maior_10h")]
    pub overtime_over_10h: String,
    /// Worked time beyond 6 hours, `HH:MM`, clamped at zero. Independent of
    /// the 10-hour figure, not cumulative with it.
    #[serde(rename = "horas_extras_maior_6h")]
    pub overtime_over_6h: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = JourneyOptions::default();
        assert_eq!(options.pair_count, DEFAULT_PAIR_COUNT);
        assert_eq!(options.sort_order, SortOrder::DateCpf);
    }

    #[test]
    fn test_sort_order_wire_names() {
        assert_eq!(
            serde_json::to_string(&SortOrder::DateCpf).unwrap(),
            "\"data_cpf\""
        );
        assert_eq!(
            serde_json::to_string(&SortOrder::CpfDate).unwrap(),
            "\"cpf_data\""
        );
    }

    #[test]
    fn test_sort_order_deserializes_from_wire_name() {
        let order: SortOrder = serde_json::from_str("\"cpf_data\"").unwrap();
        assert_eq!(order, SortOrder::CpfDate);
    }
}
