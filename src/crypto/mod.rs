//! Cryptographic primitives consumed by the crypto opcodes (C1): public key
//! and signature encoding validation, ECDSA, and the BCH variant of Schnorr
//! signatures.

pub mod ecdsa;
pub mod encoding;
pub mod schnorr;

pub use encoding::{is_valid_public_key_encoding, is_valid_signature_encoding};
