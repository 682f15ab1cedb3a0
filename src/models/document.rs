//! The interpreted document aggregate and its validation block.

use serde::{Deserialize, Serialize};

use super::record::{
    AdjustmentRecord, EmployeeMasterRecord, EmployerChangeRecord, EventRecord, HeaderRecord,
    OnlineMarkRecord, PunchRecord, TrailerRecord,
};

/// Per-type record collections, in file appearance order.
///
/// The type-code set is closed (2-7), so the buckets are a fixed struct
/// rather than an open map; each field serializes under its type digit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBuckets {
    /// Type-2 records.
    #[serde(rename = "2")]
    pub employer_changes: Vec<EmployerChangeRecord>,
    /// Type-3 records.
    #[serde(rename = "3")]
    pub punches: Vec<PunchRecord>,
    /// Type-4 records.
    #[serde(rename = "4")]
    pub adjustments: Vec<AdjustmentRecord>,
    /// Type-5 records.
    #[serde(rename = "5")]
    pub employees: Vec<EmployeeMasterRecord>,
    /// Type-6 records.
    #[serde(rename = "6")]
    pub events: Vec<EventRecord>,
    /// Type-7 records.
    #[serde(rename = "7")]
    pub online_marks: Vec<OnlineMarkRecord>,
}

impl RecordBuckets {
    /// Returns true iff every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.employer_changes.is_empty()
            && self.punches.is_empty()
            && self.adjustments.is_empty()
            && self.employees.is_empty()
            && self.events.is_empty()
            && self.online_marks.is_empty()
    }
}

/// Aggregate checksum validity per checksum-bearing type (1-5).
///
/// Each field is `Some(true)` when every checked record of that type passed,
/// `Some(false)` when any failed, and `None` when the type produced no
/// checksum-bearing records at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumSummary {
    /// Type-1 (header) aggregate validity.
    #[serde(rename = "1")]
    pub header: Option<bool>,
    /// Type-2 aggregate validity.
    #[serde(rename = "2")]
    pub employer_changes: Option<bool>,
    /// Type-3 aggregate validity (official-layout punches only).
    #[serde(rename = "3")]
    pub punches: Option<bool>,
    /// Type-4 aggregate validity.
    #[serde(rename = "4")]
    pub adjustments: Option<bool>,
    /// Type-5 aggregate validity.
    #[serde(rename = "5")]
    pub employees: Option<bool>,
}

/// Document-level validation results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validations {
    /// True iff the NSRs of all classifiable lines are non-decreasing in
    /// file order.
    #[serde(rename = "ordem_nsr_ok")]
    pub nsr_order_ok: bool,
    /// True iff the trailer's six counts match the bucket lengths and its
    /// own type field equals 9. Vacuously true when there is no trailer.
    #[serde(rename = "contagens_ok")]
    pub counts_ok: bool,
    /// Aggregate checksum validity per type.
    #[serde(rename = "crc_ok_por_tipo")]
    pub crc_ok_by_type: ChecksumSummary,
    /// Line-scoped parse/validation failures, in encounter order, capped so
    /// a pathological file cannot produce unbounded diagnostics.
    #[serde(rename = "erros")]
    pub errors: Vec<String>,
}

/// The fully interpreted AFD document.
///
/// Constructed exclusively by the interpreter; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretedDocument {
    /// The file header, when one parsed (last one wins).
    pub header: Option<HeaderRecord>,
    /// Per-type record collections.
    #[serde(rename = "registros_por_tipo")]
    pub records_by_type: RecordBuckets,
    /// The trailer, when one parsed.
    pub trailer: Option<TrailerRecord>,
    /// Document-level validations and diagnostics.
    #[serde(rename = "validacoes")]
    pub validations: Validations,
}
