//! Strongly-typed AFD records.
//!
//! One struct per record type (1-7 and 9). Field keys serialize under the
//! Portaria field names used by the wire artifacts (`nsr`, `dh_marcacao`,
//! `razao_social`, ...). Records are immutable once parsed: the interpreter
//! constructs them and nothing mutates them afterwards.

use serde::{Deserialize, Serialize};

/// Which column layout a dual-layout record (type 1 or 3) was parsed with.
///
/// Some devices emit a shorter "compact" layout instead of the official
/// fixed-length one; the tag lets downstream consumers branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordFormat {
    /// The official fixed-length layout, checksum included.
    #[serde(rename = "oficial")]
    Official,
    /// The shorter fallback layout; carries no checksum field.
    #[serde(rename = "compacto")]
    Compact,
}

impl RecordFormat {
    /// The wire name of the format (`oficial` or `compacto`).
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordFormat::Official => "oficial",
            RecordFormat::Compact => "compacto",
        }
    }
}

/// Type 1: file header with employer and device identification.
///
/// The compact variant carries only the NSR, the type digit, the validity
/// period and the generation timestamp; every other field is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRecord {
    /// Sequence number (columns 1-9).
    pub nsr: u64,
    /// The literal type digit (always 1).
    #[serde(rename = "tipo")]
    pub record_type: u8,
    /// Employer identifier kind (1 = CNPJ, 2 = CPF).
    #[serde(rename = "id_empregador_tipo")]
    pub employer_id_kind: Option<String>,
    /// Employer identifier.
    #[serde(rename = "id_empregador")]
    pub employer_id: Option<String>,
    /// CNO/CAEPF workplace registry number.
    pub cno_caepf: Option<String>,
    /// Employer's legal name, trailing spaces trimmed.
    #[serde(rename = "razao_social")]
    pub company_name: Option<String>,
    /// Device serial, process number or INPI registry.
    #[serde(rename = "numero_fabricacao_processo_ou_inpi")]
    pub device_serial: Option<String>,
    /// Start of the period covered by the file (`YYYY-MM-DD`).
    #[serde(rename = "data_inicio")]
    pub start_date: Option<String>,
    /// End of the period covered by the file (`YYYY-MM-DD`).
    #[serde(rename = "data_fim")]
    pub end_date: Option<String>,
    /// Generation timestamp, ISO shape with UTC offset.
    #[serde(rename = "data_hora_geracao")]
    pub generated_at: Option<String>,
    /// AFD layout version.
    #[serde(rename = "versao_layout")]
    pub layout_version: Option<String>,
    /// Manufacturer identifier kind.
    #[serde(rename = "id_fabricante_tipo")]
    pub manufacturer_id_kind: Option<String>,
    /// Manufacturer identifier.
    #[serde(rename = "id_fabricante")]
    pub manufacturer_id: Option<String>,
    /// REP-C device model, trailing spaces trimmed.
    #[serde(rename = "modelo_rep_c")]
    pub device_model: Option<String>,
    /// Embedded checksum text (official layout only).
    pub crc16: Option<String>,
    /// Checksum verification result; `None` when the layout carries none.
    pub crc_ok: Option<bool>,
    /// Which layout the record was parsed with.
    #[serde(rename = "formato")]
    pub format: RecordFormat,
}

/// Type 2: employer identification change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerChangeRecord {
    /// Sequence number.
    pub nsr: u64,
    /// The literal type digit (always 2).
    #[serde(rename = "tipo")]
    pub record_type: u8,
    /// When the change was recorded.
    #[serde(rename = "dh_gravacao")]
    pub recorded_at: String,
    /// Tax ID of the person responsible for the change.
    #[serde(rename = "cpf_responsavel")]
    pub responsible_cpf: String,
    /// Employer identifier kind.
    #[serde(rename = "id_empregador_tipo")]
    pub employer_id_kind: String,
    /// Employer identifier.
    #[serde(rename = "id_empregador")]
    pub employer_id: String,
    /// CNO/CAEPF workplace registry number.
    pub cno_caepf: String,
    /// Employer's legal name.
    #[serde(rename = "razao_social")]
    pub company_name: String,
    /// Free-text description of the work location.
    #[serde(rename = "local_prestacao")]
    pub workplace: String,
    /// Embedded checksum text.
    pub crc16: String,
    /// Checksum verification result.
    pub crc_ok: bool,
}

/// Type 3: one clock-in/out punch for one person.
///
/// This is the record class consumed by the journey summarizer. The type
/// digit is kept literal (`char`) because type 7 reuses the same semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchRecord {
    /// Sequence number.
    pub nsr: u64,
    /// The literal type digit ('3', or '7' for online marks).
    #[serde(rename = "tipo")]
    pub record_type: char,
    /// Punch timestamp, `YYYY-MM-DDTHH:MM:00±HHHH`.
    #[serde(rename = "dh_marcacao")]
    pub timestamp: String,
    /// The person's tax ID (CPF or PIS).
    pub cpf: String,
    /// Embedded checksum text (official layout only).
    pub crc16: Option<String>,
    /// Checksum verification result; `None` for the compact layout, which
    /// carries no checksum (unknown, not false).
    pub crc_ok: Option<bool>,
    /// Which layout the record was parsed with.
    #[serde(rename = "formato")]
    pub format: RecordFormat,
}

/// Type 4: clock adjustment (timestamps before and after).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRecord {
    /// Sequence number.
    pub nsr: u64,
    /// The literal type digit (always 4).
    #[serde(rename = "tipo")]
    pub record_type: u8,
    /// Clock value before the adjustment.
    #[serde(rename = "dh_antes")]
    pub before: String,
    /// Clock value after the adjustment.
    #[serde(rename = "dh_ajustada")]
    pub adjusted: String,
    /// Tax ID of the person responsible for the adjustment.
    #[serde(rename = "cpf_responsavel")]
    pub responsible_cpf: String,
    /// Embedded checksum text.
    pub crc16: String,
    /// Checksum verification result.
    pub crc_ok: bool,
}

/// Type 5: employee master data operation (insert/update/remove).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeMasterRecord {
    /// Sequence number.
    pub nsr: u64,
    /// The literal type digit (always 5).
    #[serde(rename = "tipo")]
    pub record_type: u8,
    /// When the operation was recorded.
    #[serde(rename = "dh_gravacao")]
    pub recorded_at: String,
    /// Operation code (I = insert, A = update, E = remove).
    #[serde(rename = "operacao")]
    pub operation: String,
    /// The employee's tax ID.
    pub cpf: String,
    /// The employee's name, trailing spaces trimmed.
    #[serde(rename = "nome")]
    pub name: String,
    /// Auxiliary device-specific data.
    #[serde(rename = "demais_dados")]
    pub extra_data: String,
    /// Tax ID of the person responsible for the operation.
    #[serde(rename = "cpf_responsavel")]
    pub responsible_cpf: String,
    /// Embedded checksum text.
    pub crc16: String,
    /// Checksum verification result.
    pub crc_ok: bool,
}

/// Type 6: device event (power loss, tamper, ...). No checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Sequence number.
    pub nsr: u64,
    /// The literal type digit (always 6).
    #[serde(rename = "tipo")]
    pub record_type: u8,
    /// When the event was recorded.
    #[serde(rename = "dh_gravacao")]
    pub recorded_at: String,
    /// Two-character event-type code.
    #[serde(rename = "tipo_evento")]
    pub event_kind: String,
}

/// Type 7: punch recorded through the employer's online collector.
///
/// No checksum verification is performed for this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineMarkRecord {
    /// Sequence number.
    pub nsr: u64,
    /// The literal type digit ('7').
    #[serde(rename = "tipo")]
    pub record_type: char,
    /// Punch timestamp.
    #[serde(rename = "dh_marcacao")]
    pub timestamp: String,
    /// The person's tax ID.
    pub cpf: String,
    /// When the mark was generated by the collector.
    #[serde(rename = "dh_gravacao")]
    pub generated_at: String,
    /// Collector identifier.
    #[serde(rename = "coletor_id")]
    pub collector_id: String,
    /// Online/offline flag.
    #[serde(rename = "online_offline")]
    pub online_flag: String,
    /// Integrity hash string, trailing spaces trimmed.
    #[serde(rename = "hash256")]
    pub hash: String,
}

/// Type 9: trailer with expected per-type record counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailerRecord {
    /// Sequence number field (conventionally 999999999).
    pub nsr: u64,
    /// Expected number of type-2 records.
    #[serde(rename = "qtd_tipo2")]
    pub count_type2: u64,
    /// Expected number of type-3 records.
    #[serde(rename = "qtd_tipo3")]
    pub count_type3: u64,
    /// Expected number of type-4 records.
    #[serde(rename = "qtd_tipo4")]
    pub count_type4: u64,
    /// Expected number of type-5 records.
    #[serde(rename = "qtd_tipo5")]
    pub count_type5: u64,
    /// Expected number of type-6 records.
    #[serde(rename = "qtd_tipo6")]
    pub count_type6: u64,
    /// Expected number of type-7 records.
    #[serde(rename = "qtd_tipo7")]
    pub count_type7: u64,
    /// The literal type discriminator at column 64; must equal 9 for the
    /// trailer to reconcile.
    #[serde(rename = "tipo")]
    pub record_type: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_format_wire_names() {
        assert_eq!(RecordFormat::Official.as_str(), "oficial");
        assert_eq!(RecordFormat::Compact.as_str(), "compacto");
    }

    #[test]
    fn test_record_format_serializes_to_wire_name() {
        assert_eq!(
            serde_json::to_string(&RecordFormat::Compact).unwrap(),
            "\"compacto\""
        );
    }

    #[test]
    fn test_punch_record_serialization_round_trip() {
        let punch = PunchRecord {
            nsr: 42,
            record_type: '3',
            timestamp: "2025-07-16T08:00:00-0300".to_string(),
            cpf: "12345678901".to_string(),
            crc16: Some("ABCD".to_string()),
            crc_ok: Some(true),
            format: RecordFormat::Official,
        };

        let json = serde_json::to_string(&punch).unwrap();
        assert!(json.contains("\"dh_marcacao\":\"2025-07-16T08:00:00-0300\""));
        assert!(json.contains("\"tipo\":\"3\""));
        assert!(json.contains("\"formato\":\"oficial\""));

        let back: PunchRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, punch);
    }

    #[test]
    fn test_compact_punch_has_unknown_checksum() {
        let punch = PunchRecord {
            nsr: 7,
            record_type: '3',
            timestamp: "2025-07-16T08:00:00-0300".to_string(),
            cpf: "12345678901".to_string(),
            crc16: None,
            crc_ok: None,
            format: RecordFormat::Compact,
        };

        let json = serde_json::to_string(&punch).unwrap();
        // Unknown validity serializes as null, never as false.
        assert!(json.contains("\"crc_ok\":null"));
    }
}
