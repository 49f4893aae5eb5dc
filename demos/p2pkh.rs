//! Demonstrates the complete Pay-to-Public-Key-Hash (P2PKH) validation
//! flow: deriving a key, building the locking script, signing the BCH
//! sighash preimage, and running the combined program through the VM.
//!
//! Run with: `cargo run --example p2pkh`

use bch_script_vm::context::{Outpoint, Transaction, TransactionInput, TransactionOutput, VerificationContext};
use bch_script_vm::crypto::ecdsa;
use bch_script_vm::hash::hash160;
use bch_script_vm::script::{p2pkh_locking_bytecode, verify_p2pkh};
use bch_script_vm::sighash::generate_signing_serialization;
use bch_script_vm::tokenizer::parse_script;
use bch_script_vm::vm::bch::VerificationFlags;
use secp256k1::SecretKey;

fn main() {
    // 1. Derive a keypair. In a real wallet this would come from secure
    //    key storage, not a fixed scalar.
    let secret = SecretKey::from_slice(&[0x42; 32]).unwrap();
    let pubkey = ecdsa::derive_public_key_compressed(&secret);

    // 2. Build the locking script: OP_DUP OP_HASH160 <h160> OP_EQUALVERIFY OP_CHECKSIG
    let pubkey_hash = hash160(&pubkey);
    let locking_bytecode = p2pkh_locking_bytecode(&pubkey_hash);

    // 3. Assemble the spending transaction and the context for input 0.
    let tx = Transaction {
        version: 2,
        inputs: vec![TransactionInput {
            previous_output: Outpoint { transaction_id: [0x11; 32], index: 0 },
            sequence_number: 0xffffffff,
        }],
        outputs: vec![TransactionOutput { value: 50_000, locking_bytecode: locking_bytecode.clone() }],
        locktime: 0,
    };
    let ctx = VerificationContext::new(&tx, 0, 50_000, &locking_bytecode);

    // 4. Sign the BCH sighash preimage (SIGHASH_ALL | FORKID).
    let digest = generate_signing_serialization(&ctx, 0x41).unwrap();
    let mut signature = ecdsa::sign_der(&secret, &digest);
    signature.push(0x41);

    // 5. Build the unlocking script: <sig> <pubkey>
    let mut unlocking_bytecode = vec![signature.len() as u8];
    unlocking_bytecode.extend_from_slice(&signature);
    unlocking_bytecode.push(pubkey.len() as u8);
    unlocking_bytecode.extend_from_slice(&pubkey);

    // 6. Display the locking script's tokens for inspection.
    let tokens = parse_script(&locking_bytecode).expect("valid locking script");
    print!("locking script:");
    for token in &tokens {
        print!(" {token}");
    }
    println!();
    println!();

    // 7. Verify the spend.
    let result = verify_p2pkh(&unlocking_bytecode, &locking_bytecode, &ctx, VerificationFlags::default())
        .expect("scripts parsed");
    println!("P2PKH verification result: {}", result.success);
}
