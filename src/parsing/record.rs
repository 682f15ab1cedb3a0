//! Per-type record parsers.
//!
//! One pure function per record type, each with a minimum-length contract
//! and a fixed column map (1-based inclusive positions). Types 1 and 3 also
//! support a shorter compact fallback layout emitted by some devices; their
//! entry points try the official layout first and fall back on any failure.

use crate::error::{AfdError, AfdResult};
use crate::models::{
    AdjustmentRecord, EmployeeMasterRecord, EmployerChangeRecord, EventRecord, HeaderRecord,
    OnlineMarkRecord, PunchRecord, RecordFormat, TrailerRecord,
};
use crate::parsing::checksum::line_checksum;
use crate::parsing::fields::{ddmmyyyy_to_iso, hhmm_to_iso, is_digits, is_iso_datetime, parse_number, slice};

/// Gates a line on a layout's minimum length, in characters.
fn require_len(line: &str, record_type: &str, min: usize) -> AfdResult<usize> {
    let len = line.chars().count();
    if len < min {
        return Err(AfdError::LengthMismatch {
            record_type: record_type.to_string(),
            expected: min,
            actual: len,
        });
    }
    Ok(len)
}

/// Reads the stored checksum text at `field` and verifies it against the
/// value computed over the line with the field excised.
fn verify_checksum(line: &str, field: (usize, usize)) -> AfdResult<(String, bool)> {
    let stored = slice(line, field.0, field.1).to_uppercase();
    let computed = line_checksum(line, field)?;
    let ok = stored == computed;
    Ok((stored, ok))
}

/// The type digit at column 10.
fn type_digit(line: &str) -> char {
    line.chars().nth(9).unwrap_or_default()
}

/// Parses a type-1 header in the official 302-column layout.
///
/// Checksum occupies columns 299-302.
pub fn parse_header_official(line: &str) -> AfdResult<HeaderRecord> {
    require_len(line, "1 (oficial)", 302)?;
    let nsr = parse_number(slice(line, 1, 9), "nsr")?;
    let record_type = parse_number(slice(line, 10, 10), "tipo")? as u8;
    let (crc16, crc_ok) = verify_checksum(line, (299, 302))?;
    Ok(HeaderRecord {
        nsr,
        record_type,
        employer_id_kind: Some(slice(line, 11, 11).to_string()),
        employer_id: Some(slice(line, 12, 25).trim().to_string()),
        cno_caepf: Some(slice(line, 26, 39).trim().to_string()),
        company_name: Some(slice(line, 40, 189).trim_end().to_string()),
        device_serial: Some(slice(line, 190, 206).trim().to_string()),
        start_date: Some(slice(line, 207, 216).to_string()),
        end_date: Some(slice(line, 217, 226).to_string()),
        generated_at: Some(slice(line, 227, 250).to_string()),
        layout_version: Some(slice(line, 251, 253).to_string()),
        manufacturer_id_kind: Some(slice(line, 254, 254).to_string()),
        manufacturer_id: Some(slice(line, 255, 268).trim().to_string()),
        device_model: Some(slice(line, 269, 298).trim_end().to_string()),
        crc16: Some(crc16),
        crc_ok: Some(crc_ok),
        format: RecordFormat::Official,
    })
}

/// Parses a type-1 header in the compact fallback layout.
///
/// Only the NSR, the type digit and a trailing 28-digit block (three
/// `DDMMYYYY` dates plus one `HHMM` time) are present; the generation
/// timestamp is synthesized with a literal `-0300` offset. Minimum length 38.
pub fn parse_header_compact(line: &str) -> AfdResult<HeaderRecord> {
    let len = require_len(line, "1 (compacto)", 9 + 1 + 28)?;
    let nsr = parse_number(slice(line, 1, 9), "nsr")?;
    let record_type = parse_number(slice(line, 10, 10), "tipo")? as u8;
    let trail = slice(line, len - 27, len);
    if !is_digits(trail) {
        return Err(AfdError::FormatMismatch {
            field: "bloco_final".to_string(),
            value: trail.to_string(),
        });
    }
    let start_date = ddmmyyyy_to_iso(&trail[0..8]);
    let end_date = ddmmyyyy_to_iso(&trail[8..16]);
    let generated_date = ddmmyyyy_to_iso(&trail[16..24]);
    let generated_time = hhmm_to_iso(&trail[24..28]);
    let generated_at = match (generated_date, generated_time) {
        (Some(date), Some(time)) => Some(format!("{date}T{time}:00-0300")),
        _ => None,
    };
    Ok(HeaderRecord {
        nsr,
        record_type,
        employer_id_kind: None,
        employer_id: None,
        cno_caepf: None,
        company_name: None,
        device_serial: None,
        start_date,
        end_date,
        generated_at,
        layout_version: None,
        manufacturer_id_kind: None,
        manufacturer_id: None,
        device_model: None,
        crc16: None,
        crc_ok: None,
        format: RecordFormat::Compact,
    })
}

/// Parses a type-1 header, trying the official layout first and falling back
/// to the compact layout. When both fail, the composite error embeds both
/// underlying messages.
pub fn parse_header(line: &str) -> AfdResult<HeaderRecord> {
    match parse_header_official(line) {
        Ok(record) => Ok(record),
        Err(official) => match parse_header_compact(line) {
            Ok(record) => Ok(record),
            Err(compact) => Err(AfdError::LayoutFallbackFailed {
                record_type: "1".to_string(),
                official: official.to_string(),
                compact: compact.to_string(),
            }),
        },
    }
}

/// Parses a type-2 employer change record. Minimum length 331, checksum at
/// columns 328-331.
pub fn parse_employer_change(line: &str) -> AfdResult<EmployerChangeRecord> {
    require_len(line, "2", 331)?;
    let nsr = parse_number(slice(line, 1, 9), "nsr")?;
    let record_type = parse_number(slice(line, 10, 10), "tipo")? as u8;
    let (crc16, crc_ok) = verify_checksum(line, (328, 331))?;
    Ok(EmployerChangeRecord {
        nsr,
        record_type,
        recorded_at: slice(line, 11, 34).to_string(),
        responsible_cpf: slice(line, 35, 48).trim().to_string(),
        employer_id_kind: slice(line, 49, 49).to_string(),
        employer_id: slice(line, 50, 63).trim().to_string(),
        cno_caepf: slice(line, 64, 77).trim().to_string(),
        company_name: slice(line, 78, 227).trim_end().to_string(),
        workplace: slice(line, 228, 327).trim_end().to_string(),
        crc16,
        crc_ok,
    })
}

/// Parses a type-3 punch in the official 50-column layout.
///
/// The timestamp at columns 11-34 is re-validated against the
/// `YYYY-MM-DDTHH:MM:00±HHHH` shape; a non-matching timestamp is a parse
/// failure, not silently accepted. Checksum at columns 47-50.
pub fn parse_punch_official(line: &str) -> AfdResult<PunchRecord> {
    require_len(line, "3 (oficial)", 50)?;
    let nsr = parse_number(slice(line, 1, 9), "nsr")?;
    let timestamp = slice(line, 11, 34);
    if !is_iso_datetime(timestamp) {
        return Err(AfdError::FormatMismatch {
            field: "dh_marcacao".to_string(),
            value: timestamp.to_string(),
        });
    }
    let (crc16, crc_ok) = verify_checksum(line, (47, 50))?;
    Ok(PunchRecord {
        nsr,
        record_type: type_digit(line),
        timestamp: timestamp.to_string(),
        cpf: slice(line, 35, 46).trim().to_string(),
        crc16: Some(crc16),
        crc_ok: Some(crc_ok),
        format: RecordFormat::Official,
    })
}

/// Parses a type-3 punch in the compact fallback layout:
/// `NSR(9) + tipo(1) + DDMMYYYY(8) + HHMM(4) + CPF/PIS(12)`, minimum 34.
///
/// The timestamp is synthesized as local date/time with a literal `-0300`
/// offset. The layout carries no checksum field, so validity is unknown
/// (`None`), not false.
pub fn parse_punch_compact(line: &str) -> AfdResult<PunchRecord> {
    require_len(line, "3 (compacto)", 34)?;
    let nsr = parse_number(slice(line, 1, 9), "nsr")?;
    let date = slice(line, 11, 18);
    let time = slice(line, 19, 22);
    let (Some(date_iso), Some(time_iso)) = (ddmmyyyy_to_iso(date), hhmm_to_iso(time)) else {
        return Err(AfdError::FormatMismatch {
            field: "data/hora".to_string(),
            value: format!("{date} {time}"),
        });
    };
    Ok(PunchRecord {
        nsr,
        record_type: type_digit(line),
        timestamp: format!("{date_iso}T{time_iso}:00-0300"),
        cpf: slice(line, 23, 34).trim().to_string(),
        crc16: None,
        crc_ok: None,
        format: RecordFormat::Compact,
    })
}

/// Parses a type-3 punch, trying the official layout first and falling back
/// to the compact layout. When both fail, the composite error embeds both
/// underlying messages.
pub fn parse_punch(line: &str) -> AfdResult<PunchRecord> {
    match parse_punch_official(line) {
        Ok(record) => Ok(record),
        Err(official) => match parse_punch_compact(line) {
            Ok(record) => Ok(record),
            Err(compact) => Err(AfdError::LayoutFallbackFailed {
                record_type: "3".to_string(),
                official: official.to_string(),
                compact: compact.to_string(),
            }),
        },
    }
}

/// Parses a type-4 adjustment record. Minimum length 73, checksum at
/// columns 70-73.
pub fn parse_adjustment(line: &str) -> AfdResult<AdjustmentRecord> {
    require_len(line, "4", 73)?;
    let nsr = parse_number(slice(line, 1, 9), "nsr")?;
    let record_type = parse_number(slice(line, 10, 10), "tipo")? as u8;
    let (crc16, crc_ok) = verify_checksum(line, (70, 73))?;
    Ok(AdjustmentRecord {
        nsr,
        record_type,
        before: slice(line, 11, 34).to_string(),
        adjusted: slice(line, 35, 58).to_string(),
        responsible_cpf: slice(line, 59, 69).trim().to_string(),
        crc16,
        crc_ok,
    })
}

/// Parses a type-5 employee master record. Minimum length 118, checksum at
/// columns 115-118.
pub fn parse_employee_master(line: &str) -> AfdResult<EmployeeMasterRecord> {
    require_len(line, "5", 118)?;
    let nsr = parse_number(slice(line, 1, 9), "nsr")?;
    let record_type = parse_number(slice(line, 10, 10), "tipo")? as u8;
    let (crc16, crc_ok) = verify_checksum(line, (115, 118))?;
    Ok(EmployeeMasterRecord {
        nsr,
        record_type,
        recorded_at: slice(line, 11, 34).to_string(),
        operation: slice(line, 35, 35).to_string(),
        cpf: slice(line, 36, 47).trim().to_string(),
        name: slice(line, 48, 99).trim_end().to_string(),
        extra_data: slice(line, 100, 103).trim_end().to_string(),
        responsible_cpf: slice(line, 104, 114).trim().to_string(),
        crc16,
        crc_ok,
    })
}

/// Parses a type-6 event record. Minimum length 36; no checksum.
pub fn parse_event(line: &str) -> AfdResult<EventRecord> {
    require_len(line, "6", 36)?;
    Ok(EventRecord {
        nsr: parse_number(slice(line, 1, 9), "nsr")?,
        record_type: parse_number(slice(line, 10, 10), "tipo")? as u8,
        recorded_at: slice(line, 11, 34).to_string(),
        event_kind: slice(line, 35, 36).to_string(),
    })
}

/// Parses a type-7 online mark record. Minimum length 137; no checksum
/// verification is performed for this type.
pub fn parse_online_mark(line: &str) -> AfdResult<OnlineMarkRecord> {
    require_len(line, "7", 137)?;
    Ok(OnlineMarkRecord {
        nsr: parse_number(slice(line, 1, 9), "nsr")?,
        record_type: type_digit(line),
        timestamp: slice(line, 11, 34).to_string(),
        cpf: slice(line, 35, 46).trim().to_string(),
        generated_at: slice(line, 47, 70).to_string(),
        collector_id: slice(line, 71, 72).to_string(),
        online_flag: slice(line, 73, 73).to_string(),
        hash: slice(line, 74, 137).trim().to_string(),
    })
}

/// Parses the type-9 trailer: six 9-digit per-type counts at columns 10-63
/// and the literal type discriminator at column 64. Minimum length 64.
pub fn parse_trailer(line: &str) -> AfdResult<TrailerRecord> {
    require_len(line, "9", 64)?;
    Ok(TrailerRecord {
        nsr: parse_number(slice(line, 1, 9), "nsr")?,
        count_type2: parse_number(slice(line, 10, 18), "qtd_tipo2")?,
        count_type3: parse_number(slice(line, 19, 27), "qtd_tipo3")?,
        count_type4: parse_number(slice(line, 28, 36), "qtd_tipo4")?,
        count_type5: parse_number(slice(line, 37, 45), "qtd_tipo5")?,
        count_type6: parse_number(slice(line, 46, 54), "qtd_tipo6")?,
        count_type7: parse_number(slice(line, 55, 63), "qtd_tipo7")?,
        record_type: parse_number(slice(line, 64, 64), "tipo")? as u8,
    })
}
