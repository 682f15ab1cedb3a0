//! Artifact rendering: the JSON document, the punches table and the journey
//! summary table.
//!
//! Both tables are semicolon-delimited and prefixed with a UTF-8 byte-order
//! mark so spreadsheet applications pick the right encoding.

use std::io::{Read, Write};

use crate::error::{AfdError, AfdResult};
use crate::models::{InterpretedDocument, JourneyRow, PunchRecord, RecordFormat};

/// The UTF-8 byte-order mark written ahead of every CSV artifact.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column order of the punches table.
const PUNCH_COLUMNS: [&str; 6] = ["nsr", "dh_marcacao", "cpf", "crc16", "crc_ok", "formato"];

/// Renders the interpreted document as pretty-printed JSON.
pub fn document_to_json(document: &InterpretedDocument) -> AfdResult<String> {
    serde_json::to_string_pretty(document).map_err(|e| AfdError::Export {
        message: e.to_string(),
    })
}

fn render_crc_ok(crc_ok: Option<bool>) -> &'static str {
    match crc_ok {
        Some(true) => "true",
        Some(false) => "false",
        None => "",
    }
}

/// Writes the type-3 punches table:
/// `nsr;dh_marcacao;cpf;crc16;crc_ok;formato`.
///
/// Unknown checksum validity (compact punches) renders as an empty field,
/// never as `false`.
pub fn write_punches_csv<W: Write>(punches: &[PunchRecord], mut writer: W) -> AfdResult<()> {
    writer.write_all(UTF8_BOM)?;
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(writer);
    csv_writer.write_record(PUNCH_COLUMNS)?;
    for punch in punches {
        let nsr = punch.nsr.to_string();
        csv_writer.write_record([
            nsr.as_str(),
            punch.timestamp.as_str(),
            punch.cpf.as_str(),
            punch.crc16.as_deref().unwrap_or(""),
            render_crc_ok(punch.crc_ok),
            punch.format.as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads a punches table previously written by [`write_punches_csv`] back
/// into punch records, so the journey summarizer can consume the exported
/// projection instead of the in-memory document.
///
/// The type digit is not part of the table; reloaded records carry '3'.
pub fn read_punches_csv<R: Read>(reader: R) -> AfdResult<Vec<PunchRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let index_of = |name: &str| -> AfdResult<usize> {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| AfdError::Export {
                message: format!("punches table is missing the '{name}' column"),
            })
    };
    let nsr_at = index_of("nsr")?;
    let timestamp_at = index_of("dh_marcacao")?;
    let cpf_at = index_of("cpf")?;
    let crc16_at = index_of("crc16")?;
    let crc_ok_at = index_of("crc_ok")?;
    let format_at = index_of("formato")?;

    let mut punches = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let field = |at: usize| record.get(at).unwrap_or("").to_string();
        let crc16 = field(crc16_at);
        punches.push(PunchRecord {
            nsr: field(nsr_at).parse().unwrap_or(0),
            record_type: '3',
            timestamp: field(timestamp_at),
            cpf: field(cpf_at),
            crc16: if crc16.is_empty() { None } else { Some(crc16) },
            crc_ok: match field(crc_ok_at).as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            format: if field(format_at) == "compacto" {
                RecordFormat::Compact
            } else {
                RecordFormat::Official
            },
        });
    }
    Ok(punches)
}

/// Writes the journey summary table:
/// `cpf;data;entrada1;saida1;…;entradaN;saidaN;horas_trabalhadas;horas_extras_maior_10h;horas_extras_maior_6h`.
///
/// `pair_count` fixes N; rows with fewer rendered pairs pad with empty
/// fields so every row has the same width.
pub fn write_journeys_csv<W: Write>(
    rows: &[JourneyRow],
    pair_count: usize,
    mut writer: W,
) -> AfdResult<()> {
    writer.write_all(UTF8_BOM)?;
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(writer);

    let mut columns = vec!["cpf".to_string(), "data".to_string()];
    for i in 1..=pair_count {
        columns.push(format!("entrada{i}"));
        columns.push(format!("saida{i}"));
    }
    columns.push("horas_trabalhadas".to_string());
    columns.push("horas_extras_maior_10h".to_string());
    columns.push("horas_extras_maior_6h".to_string());
    csv_writer.write_record(&columns)?;

    for row in rows {
        let mut fields = vec![row.cpf.clone(), row.date.to_string()];
        for i in 0..pair_count {
            match row.pairs.get(i) {
                Some(pair) => {
                    fields.push(pair.entry.clone());
                    fields.push(pair.exit.clone());
                }
                None => {
                    fields.push(String::new());
                    fields.push(String::new());
                }
            }
        }
        fields.push(row.worked.clone());
        fields.push(row.overtime_over_10h.clone());
        fields.push(row.overtime_over_6h.clone());
        csv_writer.write_record(&fields)?;
    }
    csv_writer.flush()?;
    Ok(())
}
