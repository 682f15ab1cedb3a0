//! CRC-16/ARC checksum engine.
//!
//! Checksum-bearing AFD records carry a 4-hex-digit CRC-16 computed over the
//! whole line with the checksum field's own columns excised. The variant is
//! CRC-16/ARC (a.k.a. CRC-16/IBM): initial register 0x0000, reflected
//! polynomial 0xA001, no final XOR.

use encoding::all::ISO_8859_1;
use encoding::{EncoderTrap, Encoding};

use crate::error::{AfdError, AfdResult};
use crate::parsing::fields::slice;

/// Computes the CRC-16/ARC value of a byte span.
///
/// # Example
///
/// ```
/// use afd_engine::parsing::crc16_arc;
///
/// // Standard CRC-16/ARC check value.
/// assert_eq!(crc16_arc(b"123456789"), 0xBB3D);
/// ```
pub fn crc16_arc(data: &[u8]) -> u16 {
    let mut crc: u16 = 0x0000;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xA001;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// Computes the expected checksum of a line whose checksum field occupies the
/// given 1-based inclusive column span.
///
/// The field's own columns are excised (text before the field concatenated
/// with text after it), the remainder is encoded as ISO-8859-1 so that column
/// positions remain byte offsets, and the CRC is rendered as 4 uppercase hex
/// digits ready for comparison against the field's literal text.
pub fn line_checksum(line: &str, field: (usize, usize)) -> AfdResult<String> {
    let (start, end) = field;
    let left = slice(line, 1, start - 1);
    let right = slice(line, end + 1, line.chars().count());
    let mut data = String::with_capacity(left.len() + right.len());
    data.push_str(left);
    data.push_str(right);
    let bytes = ISO_8859_1
        .encode(&data, EncoderTrap::Replace)
        .map_err(|e| AfdError::Unreadable {
            message: e.into_owned(),
        })?;
    Ok(format!("{:04X}", crc16_arc(&bytes)))
}
