//! Core data models for the AFD interpretation engine.
//!
//! This module contains the record types, the interpreted-document aggregate
//! and the journey summary models used throughout the engine.

mod document;
mod journey;
mod record;

pub use document::{ChecksumSummary, InterpretedDocument, RecordBuckets, Validations};
pub use journey::{DEFAULT_PAIR_COUNT, JourneyOptions, JourneyPair, JourneyRow, SortOrder};
pub use record::{
    AdjustmentRecord, EmployeeMasterRecord, EmployerChangeRecord, EventRecord, HeaderRecord,
    OnlineMarkRecord, PunchRecord, RecordFormat, TrailerRecord,
};
