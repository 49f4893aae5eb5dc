//! Script number encoding: sign-magnitude, little-endian, minimally encoded.
//!
//! A script number is an integer represented as a byte string: magnitude in
//! little-endian order, with the high bit of the last byte carrying the
//! sign. Bitcoin Script requires *minimal* encoding when decoding operands
//! for arithmetic opcodes — no unnecessary trailing zero byte, and no
//! encoding of zero other than the empty vector.

use crate::error::ScriptError;

/// Default operand width limit for arithmetic opcodes (4 bytes, i.e.
/// the signed range `-(2^31-1)..=2^31-1`).
pub const DEFAULT_MAXIMUM_SCRIPT_NUMBER_LENGTH: usize = 4;

/// Wider limit used by OP_CHECKLOCKTIMEVERIFY/OP_CHECKSEQUENCEVERIFY, which
/// compare against values that can exceed the 4-byte range (locktimes are
/// unsigned 32-bit but represented here as signed 5-byte operands).
pub const LOCKTIME_MAXIMUM_SCRIPT_NUMBER_LENGTH: usize = 5;

/// Decodes a script number, enforcing a maximum byte length and, if
/// `require_minimal` is set, minimal encoding.
///
/// Returns `ScriptError::InvalidNaturalNumber` if the value does not fit a
/// `i64`, which cannot happen for `max_length <= 5` but is checked anyway in
/// case an unusually large limit is passed in.
/// Returns `ScriptError::NonMinimallyEncodedScriptNumber` if `require_minimal`
/// is set and the operand uses a non-minimal encoding.
pub fn decode_script_number(bytes: &[u8], max_length: usize, require_minimal: bool) -> Result<i64, ScriptError> {
    if bytes.is_empty() {
        return Ok(0);
    }
    if bytes.len() > max_length {
        return Err(ScriptError::InvalidNaturalNumber);
    }
    if require_minimal && !is_minimally_encoded(bytes) {
        return Err(ScriptError::NonMinimallyEncodedScriptNumber);
    }

    let mut result: i64 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        result |= (byte as i64) << (8 * i);
    }

    let last = bytes[bytes.len() - 1];
    if last & 0x80 != 0 {
        // Clear the sign bit from the magnitude and negate.
        result &= !(0x80i64 << (8 * (bytes.len() - 1)));
        result = -result;
    }
    Ok(result)
}

/// Returns `true` if `bytes` is the minimal script-number encoding of its
/// value: no encoding of zero other than the empty vector, and no
/// redundant high zero-byte (unless required to disambiguate the sign bit).
pub fn is_minimally_encoded(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return true;
    }
    let last = bytes[bytes.len() - 1];
    // The last byte, stripped of its sign bit, must be nonzero — unless
    // there's a following byte whose top bit would otherwise be
    // misread as the sign.
    if last & 0x7f == 0 && (bytes.len() == 1 || bytes[bytes.len() - 2] & 0x80 == 0) {
        return false;
    }
    true
}

/// Encodes an integer as a minimally-encoded script number.
///
/// `0` encodes as the empty vector. Otherwise, the magnitude is written
/// little-endian with the fewest bytes possible, appending an extra `0x00`
/// byte when the top bit of the last magnitude byte would otherwise be
/// misread as the sign bit.
pub fn encode_script_number(value: i64) -> Vec<u8> {
    if value == 0 {
        return Vec::new();
    }

    let negative = value < 0;
    let mut magnitude = value.unsigned_abs();
    let mut bytes = Vec::new();
    while magnitude > 0 {
        bytes.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }

    if bytes.last().copied().unwrap_or(0) & 0x80 != 0 {
        bytes.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        *bytes.last_mut().unwrap() |= 0x80;
    }

    bytes
}
