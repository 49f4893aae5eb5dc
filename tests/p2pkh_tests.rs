use bch_script_vm::context::{Outpoint, Transaction, TransactionInput, TransactionOutput, VerificationContext};
use bch_script_vm::crypto::ecdsa;
use bch_script_vm::error::ScriptError;
use bch_script_vm::hash::hash160;
use bch_script_vm::script::{p2pkh_locking_bytecode, verify_p2pkh};
use bch_script_vm::sighash::generate_signing_serialization;
use bch_script_vm::vm::bch::VerificationFlags;
use secp256k1::SecretKey;

fn sample_transaction(locking_bytecode: Vec<u8>) -> Transaction {
    Transaction {
        version: 2,
        inputs: vec![TransactionInput {
            previous_output: Outpoint { transaction_id: [0x22; 32], index: 0 },
            sequence_number: 0xffffffff,
        }],
        outputs: vec![TransactionOutput { value: 50_000, locking_bytecode }],
        locktime: 0,
    }
}

fn signed_unlocking_script(secret: &SecretKey, ctx: &VerificationContext) -> Vec<u8> {
    let pubkey = ecdsa::derive_public_key_compressed(secret);
    let digest = generate_signing_serialization(ctx, 0x41).unwrap();
    let mut signature = ecdsa::sign_der(secret, &digest);
    signature.push(0x41);

    let mut script = vec![signature.len() as u8];
    script.extend_from_slice(&signature);
    script.push(pubkey.len() as u8);
    script.extend_from_slice(&pubkey);
    script
}

#[test]
fn p2pkh_with_valid_signature_succeeds() {
    let secret = SecretKey::from_slice(&[0x01; 32]).unwrap();
    let pubkey = ecdsa::derive_public_key_compressed(&secret);
    let pubkey_hash = hash160(&pubkey);
    let locking = p2pkh_locking_bytecode(&pubkey_hash);

    let tx = sample_transaction(locking.clone());
    let ctx = VerificationContext::new(&tx, 0, 50_000, &locking);
    let unlocking = signed_unlocking_script(&secret, &ctx);

    let result = verify_p2pkh(&unlocking, &locking, &ctx, VerificationFlags::default()).unwrap();
    assert!(result.success);
    assert_eq!(result.error, None);
}

#[test]
fn p2pkh_wrong_pubkey_hash_fails_verify() {
    let secret = SecretKey::from_slice(&[0x02; 32]).unwrap();
    let wrong_hash = [0xff; 20];
    let locking = p2pkh_locking_bytecode(&wrong_hash);

    let tx = sample_transaction(locking.clone());
    let ctx = VerificationContext::new(&tx, 0, 50_000, &locking);
    let unlocking = signed_unlocking_script(&secret, &ctx);

    let result = verify_p2pkh(&unlocking, &locking, &ctx, VerificationFlags::default()).unwrap();
    assert!(!result.success);
    assert_eq!(result.error, Some(ScriptError::FailedVerify));
}

#[test]
fn p2pkh_empty_unlocking_script_errors() {
    let pubkey_hash = [0x00; 20];
    let locking = p2pkh_locking_bytecode(&pubkey_hash);
    let tx = sample_transaction(locking.clone());
    let ctx = VerificationContext::new(&tx, 0, 50_000, &locking);

    let result = verify_p2pkh(&[], &locking, &ctx, VerificationFlags::default()).unwrap();
    assert!(!result.success);
    assert_eq!(result.error, Some(ScriptError::EmptyStack));
}

#[test]
fn p2pkh_malformed_locking_script_is_a_parse_error() {
    let secret = SecretKey::from_slice(&[0x03; 32]).unwrap();
    // OP_PUSHDATA1 with no length byte: malformed.
    let locking = vec![0x4c];
    let tx = sample_transaction(locking.clone());
    let ctx = VerificationContext::new(&tx, 0, 50_000, &locking);
    let unlocking = signed_unlocking_script(&secret, &ctx);

    let err = verify_p2pkh(&unlocking, &locking, &ctx, VerificationFlags::default()).unwrap_err();
    assert_eq!(err, ScriptError::MalformedPush);
}

#[test]
fn p2pkh_wrong_signature_fails_without_error() {
    let secret = SecretKey::from_slice(&[0x04; 32]).unwrap();
    let other_secret = SecretKey::from_slice(&[0x05; 32]).unwrap();
    let pubkey = ecdsa::derive_public_key_compressed(&secret);
    let pubkey_hash = hash160(&pubkey);
    let locking = p2pkh_locking_bytecode(&pubkey_hash);

    let tx = sample_transaction(locking.clone());
    let ctx = VerificationContext::new(&tx, 0, 50_000, &locking);
    // Sign with the wrong key but still push the correct public key.
    let mut unlocking = signed_unlocking_script(&other_secret, &ctx);
    // Replace the trailing pushed pubkey with the one matching pubkey_hash.
    let sig_len = unlocking[0] as usize;
    unlocking.truncate(1 + sig_len);
    unlocking.push(pubkey.len() as u8);
    unlocking.extend_from_slice(&pubkey);

    let result = verify_p2pkh(&unlocking, &locking, &ctx, VerificationFlags::default()).unwrap();
    assert!(!result.success);
    assert_eq!(result.error, None);
}
