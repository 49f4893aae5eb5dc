//! A Bitcoin Cash script authentication virtual machine: the consensus
//! cryptography (ECDSA/Schnorr over secp256k1, SHA-1/256, RIPEMD-160), the
//! BIP143-style signing serialization with the BCH forkid bit, and a
//! generic VM core driving the full BCH common instruction set.
//!
//! # What this crate implements
//!
//! - **Tokenizer**: parses raw script bytes into a sequence of
//!   [`token::Token`]s, handling all four push-data encodings (direct,
//!   PUSHDATA1/2/4), and losslessly re-serializes them.
//! - **Script numbers**: Bitcoin's sign-magnitude, minimally-encoded
//!   integer representation ([`script_num`]).
//! - **Crypto** ([`crypto`]): ECDSA sign/verify with low-S enforcement,
//!   the BCH variant of Schnorr signatures, and public key/signature
//!   encoding validation.
//! - **Sighash** ([`sighash`]): the BIP143-extended, forkid-tagged signing
//!   preimage and digest.
//! - **VM core** ([`vm::core`]): a generic step/evaluate abstraction, used
//!   both by the BCH instruction set and by a toy instruction set in its
//!   own tests.
//! - **BCH common opcodes** ([`vm::bch`]): the full opcode dispatch table —
//!   flow control, stack manipulation, arithmetic, bitwise, splice,
//!   locktime, and signature-checking operations.
//! - **Top-level verification** ([`script`]): assembles an unlocking and
//!   locking script pair into one program and runs it to completion.
//!
//! # Consensus warning
//!
//! This crate evaluates one input script against one previous output
//! script within a caller-supplied transaction context (see
//! [`context::VerificationContext`]). It does not parse the Bitcoin
//! transaction wire format, validate blocks, manage a UTXO set, or
//! implement peer-to-peer networking — those are treated as external
//! collaborators. Era-dependent consensus rules (OP_MUL, the shift
//! opcodes, low-S enforcement, the CHECKMULTISIG dummy-element rule) are
//! exposed as explicit flags on [`vm::bch::VerificationFlags`] rather than
//! hardcoded, since which era's rules apply is a caller decision.
//!
//! # Quick example
//!
//! ```rust
//! use bch_script_vm::context::{Outpoint, Transaction, TransactionInput, TransactionOutput, VerificationContext};
//! use bch_script_vm::crypto::ecdsa;
//! use bch_script_vm::hash::hash160;
//! use bch_script_vm::script::{p2pkh_locking_bytecode, verify_p2pkh};
//! use bch_script_vm::sighash::generate_signing_serialization;
//! use bch_script_vm::vm::bch::VerificationFlags;
//! use secp256k1::SecretKey;
//!
//! let secret = SecretKey::from_slice(&[0x42; 32]).unwrap();
//! let pubkey = ecdsa::derive_public_key_compressed(&secret);
//! let locking = p2pkh_locking_bytecode(&hash160(&pubkey));
//!
//! let tx = Transaction {
//!     version: 2,
//!     inputs: vec![TransactionInput {
//!         previous_output: Outpoint { transaction_id: [0x11; 32], index: 0 },
//!         sequence_number: 0xffffffff,
//!     }],
//!     outputs: vec![TransactionOutput { value: 50_000, locking_bytecode: locking.clone() }],
//!     locktime: 0,
//! };
//! let ctx = VerificationContext::new(&tx, 0, 50_000, &locking);
//! let digest = generate_signing_serialization(&ctx, 0x41).unwrap();
//! let mut sig = ecdsa::sign_der(&secret, &digest);
//! sig.push(0x41);
//!
//! let mut unlocking = vec![sig.len() as u8];
//! unlocking.extend_from_slice(&sig);
//! unlocking.push(pubkey.len() as u8);
//! unlocking.extend_from_slice(&pubkey);
//!
//! let result = verify_p2pkh(&unlocking, &locking, &ctx, VerificationFlags::default()).unwrap();
//! assert!(result.success);
//! ```

pub(crate) mod combinators;
pub mod context;
pub mod crypto;
pub mod error;
pub mod hash;
pub mod hex;
pub mod opcode;
pub mod script;
pub mod script_num;
pub mod sighash;
pub(crate) mod stack;
pub mod token;
pub mod tokenizer;
pub mod vm;
