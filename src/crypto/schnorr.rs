//! BCH-variant Schnorr signatures.
//!
//! This is *not* BIP340 Taproot Schnorr: the nonce point's canonical form
//! is chosen by a Jacobi-symbol (quadratic residue) test on its
//! y-coordinate rather than evenness, the challenge hash is untagged
//! SHA-256 rather than a tagged hash, and the public key is the ordinary
//! 33-byte compressed point used everywhere else in this crate rather than
//! a 32-byte x-only key. Signatures are a fixed 64 bytes: `r (32) || s (32)`.
//!
//! Scalar arithmetic (`k*G`, `s*G - e*P`) is built from the public
//! `secp256k1` crate's key-tweak operations (`mul_tweak`, `combine`)
//! rather than a second elliptic-curve implementation, keeping the crate's
//! dependency on a single curve library.

use num_bigint::BigUint;
use secp256k1::{PublicKey, Scalar, SecretKey, SECP256K1};

use crate::crypto::ecdsa;
use crate::error::ScriptError;
use crate::hash::sha256;

const CURVE_ORDER_BYTES: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

const FIELD_PRIME_BYTES: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

fn curve_order() -> BigUint {
    BigUint::from_bytes_be(&CURVE_ORDER_BYTES)
}

fn field_prime() -> BigUint {
    BigUint::from_bytes_be(&FIELD_PRIME_BYTES)
}

fn to_32_bytes_be(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Jacobi symbol of `y` over the secp256k1 field prime, via Euler's
/// criterion: `y` is a quadratic residue iff `y^((p-1)/2) mod p == 1`.
fn is_quadratic_residue(y: &BigUint) -> bool {
    let p = field_prime();
    let exponent = (&p - BigUint::from(1u8)) / BigUint::from(2u8);
    y.modpow(&exponent, &p) == BigUint::from(1u8)
}

fn challenge_scalar(r_x: &[u8; 32], public_key_compressed: &[u8; 33], message_hash: &[u8; 32]) -> BigUint {
    let mut preimage = Vec::with_capacity(32 + 33 + 32);
    preimage.extend_from_slice(r_x);
    preimage.extend_from_slice(public_key_compressed);
    preimage.extend_from_slice(message_hash);
    BigUint::from_bytes_be(&sha256(&preimage)) % curve_order()
}

fn deterministic_nonce(secret_key: &SecretKey, message_hash: &[u8; 32]) -> BigUint {
    let mut preimage = Vec::with_capacity(64);
    preimage.extend_from_slice(&secret_key.secret_bytes());
    preimage.extend_from_slice(message_hash);
    BigUint::from_bytes_be(&sha256(&preimage)) % curve_order()
}

/// Signs a 32-byte message hash, producing a 64-byte BCH Schnorr signature.
pub fn sign(secret_key: &SecretKey, message_hash: &[u8; 32]) -> Result<[u8; 64], ScriptError> {
    let order = curve_order();
    let mut k = deterministic_nonce(secret_key, message_hash);
    if k == BigUint::from(0u8) {
        return Err(ScriptError::InvalidSignatureEncoding);
    }

    let (_, r_y) = nonce_point(&k)?;
    if !is_quadratic_residue(&BigUint::from_bytes_be(&r_y)) {
        k = &order - &k;
    }
    let (r_x, _) = nonce_point(&k)?;

    let public_key_compressed = ecdsa::derive_public_key_compressed(secret_key);
    let e = challenge_scalar(&r_x, &public_key_compressed, message_hash);

    let d = BigUint::from_bytes_be(&secret_key.secret_bytes());
    let s = (&k + &e * &d) % &order;

    let mut signature = [0u8; 64];
    signature[..32].copy_from_slice(&r_x);
    signature[32..].copy_from_slice(&to_32_bytes_be(&s));
    Ok(signature)
}

/// Computes `k*G` and returns its x- and y-coordinates as 32-byte
/// big-endian arrays, via the secret-key-to-public-key derivation (treating
/// `k` as a scalar in `[1, n-1]`).
fn nonce_point(k: &BigUint) -> Result<([u8; 32], [u8; 32]), ScriptError> {
    let k_bytes = to_32_bytes_be(k);
    let k_sk = SecretKey::from_slice(&k_bytes).map_err(|_| ScriptError::InvalidSignatureEncoding)?;
    let point = PublicKey::from_secret_key(SECP256K1, &k_sk).serialize_uncompressed();
    let mut x = [0u8; 32];
    let mut y = [0u8; 32];
    x.copy_from_slice(&point[1..33]);
    y.copy_from_slice(&point[33..65]);
    Ok((x, y))
}

/// Verifies a 64-byte BCH Schnorr signature against a message hash and a
/// public key (compressed or uncompressed encoding, per
/// [`crate::crypto::encoding::is_valid_public_key_encoding`]).
pub fn verify(public_key: &PublicKey, message_hash: &[u8; 32], signature: &[u8]) -> Result<bool, ScriptError> {
    if signature.len() != 64 {
        return Err(ScriptError::InvalidSignatureEncoding);
    }
    let order = curve_order();
    let field = field_prime();

    let r = BigUint::from_bytes_be(&signature[..32]);
    let s = BigUint::from_bytes_be(&signature[32..]);
    if r >= field || s >= order || s == BigUint::from(0u8) {
        return Ok(false);
    }

    let mut r_x = [0u8; 32];
    r_x.copy_from_slice(&signature[..32]);
    let public_key_compressed = public_key.serialize();
    let e = challenge_scalar(&r_x, &public_key_compressed, message_hash);

    let s_bytes = to_32_bytes_be(&s);
    let s_sk = match SecretKey::from_slice(&s_bytes) {
        Ok(sk) => sk,
        Err(_) => return Ok(false),
    };
    let s_g = PublicKey::from_secret_key(SECP256K1, &s_sk);

    let neg_e = (&order - &e) % &order;
    let neg_e_scalar = match Scalar::from_be_bytes(to_32_bytes_be(&neg_e)) {
        Ok(scalar) => scalar,
        Err(_) => return Ok(false),
    };
    let neg_e_p = match public_key.mul_tweak(SECP256K1, &neg_e_scalar) {
        Ok(point) => point,
        Err(_) => return Ok(false),
    };

    let r_point = match s_g.combine(&neg_e_p) {
        Ok(point) => point,
        Err(_) => return Ok(false),
    };

    let uncompressed = r_point.serialize_uncompressed();
    let recovered_x = &uncompressed[1..33];
    let recovered_y = BigUint::from_bytes_be(&uncompressed[33..65]);

    Ok(recovered_x == signature[..32] && is_quadratic_residue(&recovered_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_secret_key() -> SecretKey {
        SecretKey::from_slice(&[0x23; 32]).unwrap()
    }

    #[test]
    fn sign_then_verify_roundtrips() {
        let sk = fixed_secret_key();
        let pk = PublicKey::from_secret_key(SECP256K1, &sk);
        let message_hash = [0x77u8; 32];
        let signature = sign(&sk, &message_hash).unwrap();
        assert!(verify(&pk, &message_hash, &signature).unwrap());
    }

    #[test]
    fn verify_rejects_tampered_signature() {
        let sk = fixed_secret_key();
        let pk = PublicKey::from_secret_key(SECP256K1, &sk);
        let message_hash = [0x77u8; 32];
        let mut signature = sign(&sk, &message_hash).unwrap();
        signature[0] ^= 0xff;
        assert!(!verify(&pk, &message_hash, &signature).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_message() {
        let sk = fixed_secret_key();
        let pk = PublicKey::from_secret_key(SECP256K1, &sk);
        let signature = sign(&sk, &[0x77u8; 32]).unwrap();
        assert!(!verify(&pk, &[0x78u8; 32], &signature).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_length() {
        let sk = fixed_secret_key();
        let pk = PublicKey::from_secret_key(SECP256K1, &sk);
        let err = verify(&pk, &[0x77u8; 32], &[0u8; 63]).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidSignatureEncoding));
    }

    #[test]
    fn chosen_nonce_point_is_always_a_quadratic_residue() {
        let sk = fixed_secret_key();
        let signature = sign(&sk, &[0x01u8; 32]).unwrap();
        let mut r_x = [0u8; 32];
        r_x.copy_from_slice(&signature[..32]);
        // Re-derive R from the signature's r and check consistency by
        // re-running verify, which independently recomputes R from s and e.
        let pk = PublicKey::from_secret_key(SECP256K1, &sk);
        assert!(verify(&pk, &[0x01u8; 32], &signature).unwrap());
    }
}
