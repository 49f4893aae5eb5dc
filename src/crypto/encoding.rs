//! Structural (non-cryptographic) validation of public key and signature
//! encodings, as required by the STRICTENC/LOW_S/NULLFAIL-style consensus
//! rules before a signature check is even attempted.

/// Checks that `data` is a structurally valid public key encoding: a
/// 33-byte compressed key (`0x02`/`0x03` prefix) or a 65-byte uncompressed
/// key (`0x04` prefix). Does not check that the encoded point is actually
/// on the curve — that is deferred to the signature-checking step, which
/// will simply fail verification on a bad point.
pub fn is_valid_public_key_encoding(data: &[u8]) -> bool {
    match data.len() {
        33 => data[0] == 0x02 || data[0] == 0x03,
        65 => data[0] == 0x04,
        _ => false,
    }
}

/// Checks that `data` is either the empty (null) signature, a 64-byte
/// Schnorr signature, or a strict-DER-encoded ECDSA signature with a
/// trailing sighash type byte.
///
/// This mirrors the consensus "strict DER" rule: a `30 len 02 rlen R 02
/// slen S` structure with no excess padding, positive (non-negative)
/// integers, and a single trailing sighash-type byte.
pub fn is_valid_signature_encoding(data: &[u8]) -> bool {
    if data.is_empty() {
        return true;
    }
    if data.len() == 65 {
        // Schnorr signature + sighash type byte.
        return true;
    }
    is_strict_der_with_hashtype(data)
}

fn is_strict_der_with_hashtype(sig: &[u8]) -> bool {
    // sig[..sig.len()-1] must be strict DER; the final byte is the sighash type.
    if sig.len() < 9 {
        return false;
    }
    let der = &sig[..sig.len() - 1];
    is_strict_der(der)
}

/// Strict DER structural check on an ECDSA signature with no trailing
/// sighash-type byte. Grounded on parity-bitcoin's `is_valid_signature_encoding`.
pub fn is_strict_der(sig: &[u8]) -> bool {
    // Minimum: 0x30 len 0x02 rlen{1} r{1} 0x02 slen{1} s{1} = 8 bytes.
    if sig.len() < 8 || sig.len() > 72 {
        return false;
    }
    if sig[0] != 0x30 {
        return false;
    }
    if sig[1] as usize != sig.len() - 2 {
        return false;
    }

    let r_len = sig[3] as usize;
    if 5 + r_len >= sig.len() {
        return false;
    }
    if sig[2] != 0x02 {
        return false;
    }
    if r_len == 0 {
        return false;
    }
    // R must not be negative (high bit set) unless preceded by a 0x00 pad,
    // and must not have an unnecessary leading 0x00 pad.
    if sig[4] & 0x80 != 0 {
        return false;
    }
    if r_len > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
        return false;
    }

    let s_off = 4 + r_len;
    if sig[s_off] != 0x02 {
        return false;
    }
    let s_len = sig[s_off + 1] as usize;
    if s_off + 2 + s_len != sig.len() {
        return false;
    }
    if s_len == 0 {
        return false;
    }
    let s_start = s_off + 2;
    if sig[s_start] & 0x80 != 0 {
        return false;
    }
    if s_len > 1 && sig[s_start] == 0x00 && sig[s_start + 1] & 0x80 == 0 {
        return false;
    }

    true
}

/// Checks the `S` component of a strict-DER ECDSA signature (without
/// trailing sighash byte) is at most half the curve order — the low-S
/// malleability rule.
pub fn is_low_s(der: &[u8]) -> bool {
    if !is_strict_der(der) {
        return false;
    }
    let r_len = der[3] as usize;
    let s_off = 4 + r_len;
    let s_len = der[s_off + 1] as usize;
    let s = &der[s_off + 2..s_off + 2 + s_len];

    // secp256k1 order / 2, big-endian, 32 bytes.
    const HALF_ORDER: [u8; 32] = [
        0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20,
        0xa0,
    ];
    let mut padded = [0u8; 32];
    padded[32 - s.len()..].copy_from_slice(s);
    padded <= HALF_ORDER
}

/// The recognized BCH sighash base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SighashBase {
    All = 0x01,
    None = 0x02,
    Single = 0x03,
}

/// Checks that the trailing sighash-type byte of a non-null signature
/// names a defined base type, optionally combined with ANYONECANPAY
/// (`0x80`) and always requiring the BCH forkid bit (`0x40`).
pub fn is_defined_hashtype(hashtype: u8) -> bool {
    let base = hashtype & !0xc0;
    let fork_id = hashtype & 0x40 != 0;
    fork_id && matches!(base, 0x01 | 0x02 | 0x03)
}
