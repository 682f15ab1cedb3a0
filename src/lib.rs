//! Interpretation engine for Brazilian REP time-and-attendance (AFD) files.
//!
//! This crate parses the fixed-column-width AFD record file produced by REP
//! clock devices, validates embedded CRC-16 checksums and structural
//! invariants (NSR ordering, trailer count reconciliation), and reconstructs
//! per-person, per-day work journeys with worked time and overtime figures.
//!
//! The typical pipeline:
//!
//! ```
//! use afd_engine::export;
//! use afd_engine::interpreter::interpret_bytes;
//! use afd_engine::journey::summarize_journeys;
//! use afd_engine::models::JourneyOptions;
//!
//! # fn main() -> Result<(), afd_engine::error::AfdError> {
//! let bytes = b"0000000053160720250800123456789012\n";
//! let document = interpret_bytes(bytes)?;
//! let rows = summarize_journeys(&document.records_by_type.punches, &JourneyOptions::default());
//!
//! let json = export::document_to_json(&document)?;
//! let mut punches_csv = Vec::new();
//! export::write_punches_csv(&document.records_by_type.punches, &mut punches_csv)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod export;
pub mod interpreter;
pub mod journey;
pub mod models;
pub mod parsing;
