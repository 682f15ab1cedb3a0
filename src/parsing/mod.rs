//! The AFD codec: fixed-width field extraction, the CRC-16/ARC checksum
//! engine and one parser per record type.

mod checksum;
mod fields;
mod record;

pub use checksum::{crc16_arc, line_checksum};
pub use record::{
    parse_adjustment, parse_employee_master, parse_employer_change, parse_event, parse_header,
    parse_header_compact, parse_header_official, parse_online_mark, parse_punch,
    parse_punch_compact, parse_punch_official, parse_trailer,
};

pub(crate) use fields::{is_digits, is_iso_datetime, slice};
