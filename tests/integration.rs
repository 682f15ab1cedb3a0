//! End-to-end tests for the AFD interpretation engine.
//!
//! This suite covers the whole pipeline on synthetic AFD files:
//! - record classification and dual-layout parsing
//! - checksum verification and its sensitivity to corruption
//! - NSR ordering and trailer count reconciliation
//! - journey reconstruction and overtime figures
//! - artifact rendering (JSON document, punches CSV, journeys CSV)

use proptest::prelude::*;

use afd_engine::error::AfdError;
use afd_engine::export::{
    document_to_json, read_punches_csv, write_journeys_csv, write_punches_csv,
};
use afd_engine::interpreter::{interpret_bytes, interpret_text};
use afd_engine::journey::summarize_journeys;
use afd_engine::models::{JourneyOptions, RecordFormat, SortOrder};
use afd_engine::parsing::crc16_arc;

// =============================================================================
// Test Helpers
// =============================================================================

fn with_crc(body: &str) -> String {
    format!("{body}{:04X}", crc16_arc(body.as_bytes()))
}

fn header_line(nsr: u64) -> String {
    let body = format!(
        "{nsr:09}1{}{:<14}{:<14}{:<150}{:<17}{}{}{}{}{}{:<14}{:<30}",
        "1",
        "12345678000195",
        "",
        "ACME LTDA",
        "00009999",
        "2025-07-01",
        "2025-07-31",
        "2025-08-01T10:00:00-0300",
        "003",
        "1",
        "98765432000121",
        "REP-C MODELO X",
    );
    with_crc(&body)
}

fn punch_line(nsr: u64, timestamp: &str, cpf: &str) -> String {
    with_crc(&format!("{nsr:09}3{timestamp}{cpf:<12}"))
}

fn compact_punch_line(nsr: u64, date: &str, time: &str, cpf: &str) -> String {
    format!("{nsr:09}3{date}{time}{cpf:<12}")
}

fn employer_change_line(nsr: u64) -> String {
    let body = format!(
        "{nsr:09}2{}{:<14}{}{:<14}{:<14}{:<150}{:<100}",
        "2025-07-10T09:00:00-0300",
        "11122233344",
        "1",
        "12345678000195",
        "",
        "ACME LTDA",
        "Matriz - Sao Paulo/SP",
    );
    with_crc(&body)
}

fn event_line(nsr: u64) -> String {
    format!("{nsr:09}6{}{}", "2025-07-10T03:00:00-0300", "01")
}

fn sample_file() -> String {
    [
        header_line(1),
        employer_change_line(2),
        punch_line(3, "2025-07-16T08:00:00-0300", "11111111111"),
        punch_line(4, "2025-07-16T12:00:00-0300", "11111111111"),
        compact_punch_line(5, "16072025", "1300", "11111111111"),
        compact_punch_line(6, "16072025", "1700", "11111111111"),
        punch_line(7, "2025-07-16T09:00:00-0300", "22222222222"),
        punch_line(8, "2025-07-16T19:30:00-0300", "22222222222"),
        event_line(9),
    ]
    .join("\n")
}

// =============================================================================
// Document interpretation
// =============================================================================

#[test]
fn test_full_document_interpretation() {
    let doc = interpret_text(&sample_file()).unwrap();

    let header = doc.header.as_ref().expect("header should parse");
    assert_eq!(header.company_name.as_deref(), Some("ACME LTDA"));
    assert_eq!(header.format, RecordFormat::Official);

    assert_eq!(doc.records_by_type.employer_changes.len(), 1);
    assert_eq!(doc.records_by_type.punches.len(), 6);
    assert_eq!(doc.records_by_type.events.len(), 1);
    assert!(doc.trailer.is_none());

    assert!(doc.validations.nsr_order_ok);
    assert!(doc.validations.counts_ok);
    assert!(doc.validations.errors.is_empty());
    assert_eq!(doc.validations.crc_ok_by_type.header, Some(true));
    assert_eq!(doc.validations.crc_ok_by_type.employer_changes, Some(true));
    assert_eq!(doc.validations.crc_ok_by_type.punches, Some(true));
}

#[test]
fn test_interpretation_from_latin1_bytes_with_crlf() {
    let text = sample_file().replace('\n', "\r\n");
    let doc = interpret_bytes(text.as_bytes()).unwrap();
    assert_eq!(doc.records_by_type.punches.len(), 6);
}

#[test]
fn test_corrupting_one_byte_flips_checksum_and_restoring_it_recovers() {
    let line = punch_line(3, "2025-07-16T08:00:00-0300", "11111111111");

    let doc = interpret_text(&line).unwrap();
    assert_eq!(doc.records_by_type.punches[0].crc_ok, Some(true));

    // One mutated byte outside the checksum field flips validity...
    let corrupted = line.replacen("11111111111", "11111111112", 1);
    let doc = interpret_text(&corrupted).unwrap();
    assert_eq!(doc.records_by_type.punches[0].crc_ok, Some(false));
    assert_eq!(doc.validations.crc_ok_by_type.punches, Some(false));

    // ...and restoring it recovers.
    let restored = corrupted.replacen("11111111112", "11111111111", 1);
    let doc = interpret_text(&restored).unwrap();
    assert_eq!(doc.records_by_type.punches[0].crc_ok, Some(true));
}

#[test]
fn test_mutating_only_the_checksum_field_flips_validity() {
    let line = punch_line(3, "2025-07-16T08:00:00-0300", "11111111111");
    let stored = &line[46..];
    let other = if stored == "0000" { "0001" } else { "0000" };
    let mutated = format!("{}{}", &line[..46], other);

    let doc = interpret_text(&mutated).unwrap();
    assert_eq!(doc.records_by_type.punches[0].crc_ok, Some(false));
}

#[test]
fn test_short_type3_line_falls_back_to_compact() {
    // Too short for the official layout (< 50) but digit-valid in its
    // date/time window and at least 34 characters.
    let line = compact_punch_line(10, "16072025", "0815", "33333333333");
    assert!(line.chars().count() < 50);

    let doc = interpret_text(&line).unwrap();
    let punch = &doc.records_by_type.punches[0];
    assert_eq!(punch.format, RecordFormat::Compact);
    assert_eq!(punch.crc_ok, None);
    assert_eq!(punch.timestamp, "2025-07-16T08:15:00-0300");
}

#[test]
fn test_nsr_order_laws() {
    let make = |nsrs: &[u64]| {
        nsrs.iter()
            .map(|&n| punch_line(n, "2025-07-16T08:00:00-0300", "11111111111"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let doc = interpret_text(&make(&[1, 2, 2, 3])).unwrap();
    assert!(doc.validations.nsr_order_ok);

    let doc = interpret_text(&make(&[2, 1, 3])).unwrap();
    assert!(!doc.validations.nsr_order_ok);
}

#[test]
fn test_nothing_interpretable_raises() {
    let err = interpret_text("completely foreign format\nsecond line\n").unwrap_err();
    assert!(matches!(err, AfdError::NonInterpretable { .. }));
}

// =============================================================================
// Journey summarization through the full pipeline
// =============================================================================

#[test]
fn test_journeys_from_interpreted_document() {
    let doc = interpret_text(&sample_file()).unwrap();
    let rows = summarize_journeys(&doc.records_by_type.punches, &JourneyOptions::default());

    assert_eq!(rows.len(), 2);

    // Date-major default ordering, then by tax ID.
    let first = &rows[0];
    assert_eq!(first.cpf, "11111111111");
    assert_eq!(first.date.to_string(), "2025-07-16");
    assert_eq!(first.pairs[0].entry, "2025-07-16 08:00");
    assert_eq!(first.pairs[0].exit, "2025-07-16 12:00");
    assert_eq!(first.pairs[1].entry, "2025-07-16 13:00");
    assert_eq!(first.pairs[1].exit, "2025-07-16 17:00");
    assert_eq!(first.worked, "08:00");
    assert_eq!(first.overtime_over_10h, "00:00");
    assert_eq!(first.overtime_over_6h, "02:00");

    let second = &rows[1];
    assert_eq!(second.cpf, "22222222222");
    assert_eq!(second.worked, "10:30");
    assert_eq!(second.overtime_over_10h, "00:30");
    assert_eq!(second.overtime_over_6h, "04:30");
}

#[test]
fn test_journeys_from_exported_projection() {
    // The summarizer accepts the reloaded CSV projection as input too.
    let doc = interpret_text(&sample_file()).unwrap();

    let mut buffer = Vec::new();
    write_punches_csv(&doc.records_by_type.punches, &mut buffer).unwrap();
    let reloaded = read_punches_csv(buffer.as_slice()).unwrap();

    let direct = summarize_journeys(&doc.records_by_type.punches, &JourneyOptions::default());
    let via_csv = summarize_journeys(&reloaded, &JourneyOptions::default());
    assert_eq!(direct, via_csv);
}

#[test]
fn test_journeys_cpf_major_ordering() {
    let text = [
        punch_line(1, "2025-07-17T08:00:00-0300", "22222222222"),
        punch_line(2, "2025-07-16T08:00:00-0300", "11111111111"),
        punch_line(3, "2025-07-18T08:00:00-0300", "11111111111"),
    ]
    .join("\n");
    let doc = interpret_text(&text).unwrap();
    let options = JourneyOptions {
        sort_order: SortOrder::CpfDate,
        ..JourneyOptions::default()
    };
    let rows = summarize_journeys(&doc.records_by_type.punches, &options);
    let keys: Vec<(&str, String)> = rows
        .iter()
        .map(|r| (r.cpf.as_str(), r.date.to_string()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("11111111111", "2025-07-16".to_string()),
            ("11111111111", "2025-07-18".to_string()),
            ("22222222222", "2025-07-17".to_string()),
        ]
    );
}

// =============================================================================
// Artifacts
// =============================================================================

#[test]
fn test_json_artifact_is_inspectable() {
    let doc = interpret_text(&sample_file()).unwrap();
    let json = document_to_json(&doc).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["header"]["razao_social"], "ACME LTDA");
    assert_eq!(value["registros_por_tipo"]["3"].as_array().unwrap().len(), 6);
    assert_eq!(value["validacoes"]["ordem_nsr_ok"], true);
    assert_eq!(value["validacoes"]["crc_ok_por_tipo"]["3"], true);
    assert_eq!(value["validacoes"]["crc_ok_por_tipo"]["4"], serde_json::Value::Null);
}

#[test]
fn test_punches_csv_artifact() {
    let doc = interpret_text(&sample_file()).unwrap();
    let mut buffer = Vec::new();
    write_punches_csv(&doc.records_by_type.punches, &mut buffer).unwrap();

    assert!(buffer.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.trim_end().lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[0].ends_with("nsr;dh_marcacao;cpf;crc16;crc_ok;formato"));
    assert!(lines[1].ends_with(";oficial"));
    assert!(lines[3].ends_with(";;;compacto"));
}

#[test]
fn test_journeys_csv_artifact() {
    let doc = interpret_text(&sample_file()).unwrap();
    let options = JourneyOptions::default();
    let rows = summarize_journeys(&doc.records_by_type.punches, &options);

    let mut buffer = Vec::new();
    write_journeys_csv(&rows, options.pair_count, &mut buffer).unwrap();

    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.trim_end().lines().collect();
    assert!(lines[0].ends_with(
        "cpf;data;entrada1;saida1;entrada2;saida2;entrada3;saida3;entrada4;saida4;\
         horas_trabalhadas;horas_extras_maior_10h;horas_extras_maior_6h"
    ));
    assert_eq!(
        lines[1],
        "11111111111;2025-07-16;2025-07-16 08:00;2025-07-16 12:00;\
         2025-07-16 13:00;2025-07-16 17:00;;;;;08:00;00:00;02:00"
    );
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Any single-byte change to the checksummed span changes the CRC: a
    /// single-byte error is a burst of at most 8 bits, which CRC-16 detects.
    #[test]
    fn prop_single_byte_mutation_changes_crc(
        data in proptest::collection::vec(any::<u8>(), 1..128),
        index in any::<prop::sample::Index>(),
        delta in 1u8..=255,
    ) {
        let index = index.index(data.len());
        let mut mutated = data.clone();
        mutated[index] = mutated[index].wrapping_add(delta);
        prop_assert_ne!(crc16_arc(&data), crc16_arc(&mutated));
    }

    /// A freshly generated official punch line always verifies.
    #[test]
    fn prop_generated_punch_round_trips(
        nsr in 0u64..=999_999_999,
        hour in 0u32..24,
        minute in 0u32..60,
        cpf in "[0-9]{11}",
    ) {
        let timestamp = format!("2025-07-16T{hour:02}:{minute:02}:00-0300");
        let line = punch_line(nsr, &timestamp, &cpf);
        let doc = interpret_text(&line).unwrap();
        prop_assert_eq!(doc.records_by_type.punches[0].crc_ok, Some(true));
    }

    /// `ordem_nsr_ok` is exactly the non-decreasing predicate on the NSR
    /// sequence in file order.
    #[test]
    fn prop_nsr_order_matches_sortedness(
        nsrs in proptest::collection::vec(0u64..=999_999_999, 1..20),
    ) {
        let text = nsrs
            .iter()
            .map(|&n| punch_line(n, "2025-07-16T08:00:00-0300", "11111111111"))
            .collect::<Vec<_>>()
            .join("\n");
        let doc = interpret_text(&text).unwrap();
        let sorted = nsrs.windows(2).all(|w| w[0] <= w[1]);
        prop_assert_eq!(doc.validations.nsr_order_ok, sorted);
    }
}
