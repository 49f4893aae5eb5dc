//! ECDSA signing and verification over secp256k1, low-S normalized per
//! consensus rules.

use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};

use crate::error::ScriptError;

/// Parses a 32-byte private key scalar.
pub fn parse_private_key(bytes: &[u8]) -> Result<SecretKey, ScriptError> {
    SecretKey::from_slice(bytes).map_err(|_| ScriptError::InvalidPublicKeyEncoding)
}

/// Derives the compressed public key for a private key.
pub fn derive_public_key_compressed(secret_key: &SecretKey) -> [u8; 33] {
    PublicKey::from_secret_key(SECP256K1, secret_key).serialize()
}

/// Parses a public key from its compressed or uncompressed encoding.
///
/// Returns `ScriptError::InvalidPublicKeyEncoding` if the bytes are not a
/// valid point on the curve (structural encoding is checked earlier by
/// [`crate::crypto::encoding::is_valid_public_key_encoding`]).
pub fn parse_public_key(bytes: &[u8]) -> Result<PublicKey, ScriptError> {
    PublicKey::from_slice(bytes).map_err(|_| ScriptError::InvalidPublicKeyEncoding)
}

/// Signs a 32-byte message digest, returning a DER-encoded, low-S
/// normalized signature (without a trailing sighash-type byte).
pub fn sign_der(secret_key: &SecretKey, digest: &[u8; 32]) -> Vec<u8> {
    let message = Message::from_digest(*digest);
    let mut sig = SECP256K1.sign_ecdsa(&message, secret_key);
    sig.normalize_s();
    sig.serialize_der().to_vec()
}

/// Verifies a DER-encoded ECDSA signature (without the trailing
/// sighash-type byte) against a 32-byte message digest and public key.
///
/// Returns `Ok(false)` for cryptographic verification failure, and
/// `Err(ScriptError::InvalidSignatureEncoding)` only if `der` itself cannot
/// be parsed as a DER signature (callers should have already run it through
/// [`crate::crypto::encoding::is_strict_der`] so this should not trigger on
/// consensus-valid input).
pub fn verify_der(public_key: &PublicKey, digest: &[u8; 32], der: &[u8]) -> Result<bool, ScriptError> {
    let sig = Signature::from_der(der).map_err(|_| ScriptError::InvalidSignatureEncoding)?;
    let message = Message::from_digest(*digest);
    Ok(SECP256K1.verify_ecdsa(&message, &sig, public_key).is_ok())
}
