//! Top-level entry point: assembles an unlocking/locking script pair into a
//! single program and drives it through the BCH common instruction set.

use crate::context::VerificationContext;
use crate::error::ScriptError;
use crate::tokenizer::parse_script;
use crate::vm::bch::{BchMachine, Program, VerificationFlags};
use crate::vm::core::{run, Evaluator, Stepper};

/// The outcome of verifying one input's unlocking script against the
/// locking script of the output it spends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether the combined program terminated with a truthy top stack
    /// element, an empty execution stack, and no error.
    pub success: bool,
    /// The error recorded during execution, if any. A script can fail
    /// (`success: false`) with no error — e.g. a signature that simply
    /// doesn't verify pushes an empty (false) element rather than erroring.
    pub error: Option<ScriptError>,
}

/// Verifies `unlocking_bytecode` followed by `locking_bytecode` as a single
/// program against `context`, under `flags`.
///
/// The two scripts are concatenated into one instruction sequence and run
/// on a shared stack, rather than executed as two isolated passes — this
/// is what makes OP_CODESEPARATOR's "script code since the last separator"
/// and a scriptSig that only pushes data (never branches or manipulates
/// control flow) meaningful.
pub fn verify_script(
    unlocking_bytecode: &[u8],
    locking_bytecode: &[u8],
    context: &VerificationContext,
    flags: VerificationFlags,
) -> Result<VerificationResult, ScriptError> {
    let unlocking_tokens = parse_script(unlocking_bytecode)?;
    let locking_start = unlocking_tokens.len();
    let mut tokens = unlocking_tokens;
    tokens.extend(parse_script(locking_bytecode)?);

    let machine = BchMachine::new(context, flags);
    let state = run(&machine, &Program { tokens, locking_start });

    Ok(VerificationResult {
        success: machine.verify(&state),
        error: state.error,
    })
}

/// Builds the canonical Pay-to-Public-Key-Hash locking script:
/// `OP_DUP OP_HASH160 <20-byte hash> OP_EQUALVERIFY OP_CHECKSIG`.
pub fn p2pkh_locking_bytecode(pubkey_hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.push(0x76); // OP_DUP
    script.push(0xa9); // OP_HASH160
    script.push(0x14); // push 20 bytes
    script.extend_from_slice(pubkey_hash);
    script.push(0x88); // OP_EQUALVERIFY
    script.push(0xac); // OP_CHECKSIG
    script
}

/// Verifies a Pay-to-Public-Key-Hash spend: `unlocking_bytecode` must push
/// `<signature> <pubkey>`, and `locking_bytecode` must be the canonical
/// P2PKH template built by [`p2pkh_locking_bytecode`] (or an equivalent
/// script — this function does not itself require the template shape).
pub fn verify_p2pkh(
    unlocking_bytecode: &[u8],
    locking_bytecode: &[u8],
    context: &VerificationContext,
    flags: VerificationFlags,
) -> Result<VerificationResult, ScriptError> {
    verify_script(unlocking_bytecode, locking_bytecode, context, flags)
}
