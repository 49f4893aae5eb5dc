//! The BCH common instruction set: consensus knobs ([`VerificationFlags`]),
//! the per-script execution state ([`BchState`]), and the opcode dispatch
//! table implementing [`crate::vm::core::Stepper`]/[`crate::vm::core::Evaluator`].

use crate::combinators::{pop_one, pop_script_number, pop_three, pop_two, push_bool_checked, push_script_number, push_to_stack};
use crate::context::VerificationContext;
use crate::crypto::ecdsa;
use crate::crypto::encoding::{is_defined_hashtype, is_strict_der, is_valid_public_key_encoding, is_valid_signature_encoding, is_low_s};
use crate::crypto::schnorr;
use crate::error::ScriptError;
use crate::hash::{hash160, hash256, ripemd160, sha1, sha256};
use crate::opcode::Opcode;
use crate::script_num::{self, DEFAULT_MAXIMUM_SCRIPT_NUMBER_LENGTH, LOCKTIME_MAXIMUM_SCRIPT_NUMBER_LENGTH};
use crate::sighash::generate_signing_serialization;
use crate::stack::{is_true, Stack};
use crate::token::Token;
use crate::vm::core::{Evaluator, Stepper};

/// Maximum number of non-push operations a script may execute.
pub const MAXIMUM_OPERATION_COUNT: usize = 201;

/// Maximum number of public keys OP_CHECKMULTISIG may be given.
pub const MAXIMUM_MULTISIG_PUBLIC_KEYS: usize = 20;

/// Consensus knobs controlling which era's rules are in effect.
#[derive(Debug, Clone, Copy)]
pub struct VerificationFlags {
    /// A non-null signature that fails verification is always a script
    /// failure; additionally require the *null* (empty) signature to be
    /// the only value that can fail without raising
    /// `ScriptError::NonNullSignatureFailure`.
    pub require_null_signature_failure: bool,
    /// Require minimal script-number encoding on arithmetic operands.
    pub require_minimal_number_encoding: bool,
    /// Require ECDSA signatures' S value to be at most half the curve order.
    pub require_low_s: bool,
    /// Require OP_CHECKMULTISIG's protocol-bug dummy element to be empty.
    pub require_bug_value_zero: bool,
    /// Enable OP_MUL (re-enabled era). Disabled by default, matching
    /// current BCH mainnet rules.
    pub enable_mul: bool,
    /// Enable OP_LSHIFT/OP_RSHIFT (re-enabled era, the 2022-05 upgrade).
    pub enable_shift_opcodes: bool,
    /// Enable OP_INVERT. Left permanently disabled in every deployed era.
    pub enable_invert: bool,
}

impl Default for VerificationFlags {
    fn default() -> Self {
        Self {
            require_null_signature_failure: true,
            require_minimal_number_encoding: true,
            require_low_s: true,
            require_bug_value_zero: true,
            enable_mul: false,
            enable_shift_opcodes: true,
            enable_invert: false,
        }
    }
}

/// The execution state of one script evaluation: program counter, the main
/// and alternate stacks, the conditional-execution stack, and the running
/// operation count. Once `error` is set or `pc` runs past the end of
/// `tokens`, [`Stepper::should_continue`] returns `false` and further steps
/// are a no-op.
#[derive(Clone)]
pub struct BchState<'ctx> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pc: usize,
    pub(crate) stack: Stack,
    pub(crate) alt_stack: Stack,
    pub(crate) exec_stack: Vec<bool>,
    pub(crate) op_count: usize,
    pub(crate) error: Option<ScriptError>,
    pub(crate) code_separator_pc: usize,
    /// Index into `tokens` where the locking script's tokens begin. The
    /// active script code for a signature check never reaches back into the
    /// unlocking script, matching scriptCode always being derived from the
    /// currently-executing scriptPubKey in real Bitcoin.
    pub(crate) locking_start: usize,
    pub(crate) context: &'ctx VerificationContext<'ctx>,
    pub(crate) flags: VerificationFlags,
}

impl<'ctx> BchState<'ctx> {
    fn is_executing(&self) -> bool {
        self.exec_stack.iter().all(|&b| b)
    }

    fn fail(&mut self, error: ScriptError) {
        if self.error.is_none() {
            tracing::debug!(pc = self.pc, ?error, "script evaluation failed");
            self.error = Some(error);
        }
    }

    fn require_minimal(&self) -> bool {
        self.flags.require_minimal_number_encoding
    }

    fn active_script_code(&self) -> Vec<u8> {
        let start = self.code_separator_pc.max(self.locking_start);
        crate::tokenizer::serialize(&self.tokens[start..])
    }

    fn check_locktime(&mut self, is_sequence: bool) {
        let max_len = if is_sequence { DEFAULT_MAXIMUM_SCRIPT_NUMBER_LENGTH } else { LOCKTIME_MAXIMUM_SCRIPT_NUMBER_LENGTH };
        let top = match self.stack.peek() {
            Ok(top) => top.to_vec(),
            Err(e) => return self.fail(e),
        };
        let required = match script_num::decode_script_number(&top, max_len, true) {
            Ok(v) if v >= 0 => v as u64,
            _ => return self.fail(ScriptError::InvalidNaturalNumber),
        };

        if is_sequence {
            let sequence = self.context.current_input().sequence_number;
            if sequence & 0x8000_0000 != 0 {
                // Disabled: sequence relative locktime is off for this input.
                return;
            }
            let sequence_masked = (sequence & 0x00ff_ffff) as u64;
            let required_masked = required & 0x00ff_ffff;
            let same_type = (sequence as u64 & 0x0040_0000) == (required & 0x0040_0000);
            if !same_type || sequence_masked < required_masked {
                self.fail(ScriptError::UnsatisfiedSequenceNumber);
            }
        } else {
            let locktime_is_timestamp = required >= 500_000_000;
            let tx_locktime = self.context.transaction.locktime as u64;
            let tx_is_timestamp = tx_locktime >= 500_000_000;
            if locktime_is_timestamp != tx_is_timestamp || tx_locktime < required {
                self.fail(ScriptError::UnsatisfiedLocktime);
            }
        }
    }
}

/// Drives a [`BchState`] to completion against one transaction context.
///
/// Holds no mutable state itself — `context` and `flags` are shared across
/// every step, matching the teacher's `ExecuteOpts` pattern of passing
/// read-only configuration alongside the stack being mutated.
pub struct BchMachine<'ctx> {
    pub context: &'ctx VerificationContext<'ctx>,
    pub flags: VerificationFlags,
}

impl<'ctx> BchMachine<'ctx> {
    pub fn new(context: &'ctx VerificationContext<'ctx>, flags: VerificationFlags) -> Self {
        Self { context, flags }
    }
}

impl<'ctx> Stepper for BchMachine<'ctx> {
    type State = BchState<'ctx>;

    fn should_continue(&self, state: &Self::State) -> bool {
        state.error.is_none() && state.pc < state.tokens.len()
    }

    fn step_mut(&self, state: &mut Self::State) {
        execute_one(state);
    }

    fn verify(&self, state: &Self::State) -> bool {
        state.error.is_none() && state.exec_stack.is_empty() && state.stack.peek().map(is_true).unwrap_or(false)
    }
}

/// A combined unlocking+locking instruction stream together with the index
/// where the locking script's tokens begin, so the VM can tell the two
/// apart even though they run on one shared stack.
#[derive(Debug, Clone)]
pub struct Program {
    pub tokens: Vec<Token>,
    pub locking_start: usize,
}

impl<'ctx> Evaluator for BchMachine<'ctx> {
    type Program = Program;

    fn initialize(&self, program: &Self::Program) -> Self::State {
        BchState {
            tokens: program.tokens.clone(),
            pc: 0,
            stack: Stack::new(),
            alt_stack: Stack::new(),
            exec_stack: Vec::new(),
            op_count: 0,
            error: None,
            code_separator_pc: program.locking_start,
            locking_start: program.locking_start,
            context: self.context,
            flags: self.flags,
        }
    }
}

fn binary_numeric_op(state: &mut BchState, f: impl FnOnce(i64, i64) -> i64) {
    let require_minimal = state.require_minimal();
    let b = match pop_script_number(&mut state.stack, require_minimal) {
        Ok(v) => v,
        Err(e) => return state.fail(e),
    };
    let a = match pop_script_number(&mut state.stack, require_minimal) {
        Ok(v) => v,
        Err(e) => return state.fail(e),
    };
    if let Err(e) = push_script_number(&mut state.stack, state.alt_stack.len(), f(a, b)) {
        state.fail(e);
    }
}

fn binary_bool_op(state: &mut BchState, f: impl FnOnce(i64, i64) -> bool) {
    let require_minimal = state.require_minimal();
    let b = match pop_script_number(&mut state.stack, require_minimal) {
        Ok(v) => v,
        Err(e) => return state.fail(e),
    };
    let a = match pop_script_number(&mut state.stack, require_minimal) {
        Ok(v) => v,
        Err(e) => return state.fail(e),
    };
    if let Err(e) = push_bool_checked(&mut state.stack, state.alt_stack.len(), f(a, b)) {
        state.fail(e);
    }
}

fn unary_numeric_op(state: &mut BchState, f: impl FnOnce(i64) -> i64) {
    let require_minimal = state.require_minimal();
    let a = match pop_script_number(&mut state.stack, require_minimal) {
        Ok(v) => v,
        Err(e) => return state.fail(e),
    };
    if let Err(e) = push_script_number(&mut state.stack, state.alt_stack.len(), f(a)) {
        state.fail(e);
    }
}

fn binary_bitwise_op(state: &mut BchState, f: impl Fn(u8, u8) -> u8) {
    let (a, b) = match pop_two(&mut state.stack) {
        Ok(pair) => pair,
        Err(e) => return state.fail(e),
    };
    if a.len() != b.len() {
        return state.fail(ScriptError::InvalidStackIndex);
    }
    let result: Vec<u8> = a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect();
    if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), result) {
        state.fail(e);
    }
}

fn check_ecdsa_or_schnorr_signature(
    state: &BchState,
    signature: &[u8],
    pubkey_bytes: &[u8],
    script_code: &[u8],
) -> Result<bool, ScriptError> {
    if signature.is_empty() {
        return Ok(false);
    }
    if !is_valid_signature_encoding(signature) {
        return Err(ScriptError::InvalidSignatureEncoding);
    }
    if !is_valid_public_key_encoding(pubkey_bytes) {
        return Err(ScriptError::InvalidPublicKeyEncoding);
    }

    let hashtype = *signature.last().unwrap();
    if !is_defined_hashtype(hashtype) {
        return Err(ScriptError::InvalidSignatureEncoding);
    }

    let ctx = crate::context::VerificationContext::new(
        state.context.transaction,
        state.context.input_index,
        state.context.source_output_value,
        script_code,
    );
    let digest = match generate_signing_serialization(&ctx, hashtype) {
        Some(d) => d,
        None => return Ok(false),
    };
    let pubkey = ecdsa::parse_public_key(pubkey_bytes)?;

    let body = &signature[..signature.len() - 1];
    if body.len() == 64 {
        return schnorr::verify(&pubkey, &digest, body);
    }
    if state.flags.require_low_s && !is_low_s(body) {
        return Ok(false);
    }
    if !is_strict_der(body) {
        return Err(ScriptError::InvalidSignatureEncoding);
    }
    ecdsa::verify_der(&pubkey, &digest, body)
}

fn op_checksig(state: &mut BchState) {
    let (signature, pubkey) = match pop_two(&mut state.stack) {
        Ok(pair) => pair,
        Err(e) => return state.fail(e),
    };
    let script_code = state.active_script_code();
    match check_ecdsa_or_schnorr_signature(state, &signature, &pubkey, &script_code) {
        Ok(valid) => {
            if !valid && state.flags.require_null_signature_failure && !signature.is_empty() {
                return state.fail(ScriptError::NonNullSignatureFailure);
            }
            if let Err(e) = push_bool_checked(&mut state.stack, state.alt_stack.len(), valid) {
                state.fail(e);
            }
        }
        Err(e) => state.fail(e),
    }
}

fn op_checkdatasig(state: &mut BchState) {
    let (signature, message, pubkey) = match pop_three(&mut state.stack) {
        Ok(triple) => triple,
        Err(e) => return state.fail(e),
    };
    if signature.is_empty() {
        if let Err(e) = push_bool_checked(&mut state.stack, state.alt_stack.len(), false) {
            state.fail(e);
        }
        return;
    }
    if !is_valid_signature_encoding(&signature) || !is_valid_public_key_encoding(&pubkey) {
        return state.fail(ScriptError::InvalidSignatureEncoding);
    }
    let digest = sha256(&message);
    let pk = match ecdsa::parse_public_key(&pubkey) {
        Ok(pk) => pk,
        Err(e) => return state.fail(e),
    };
    let result = if signature.len() == 64 {
        schnorr::verify(&pk, &digest, &signature)
    } else {
        if state.flags.require_low_s && !is_low_s(&signature) {
            Ok(false)
        } else if !is_strict_der(&signature) {
            Err(ScriptError::InvalidSignatureEncoding)
        } else {
            ecdsa::verify_der(&pk, &digest, &signature)
        }
    };
    match result {
        Ok(valid) => {
            if !valid && state.flags.require_null_signature_failure {
                return state.fail(ScriptError::NonNullSignatureFailure);
            }
            if let Err(e) = push_bool_checked(&mut state.stack, state.alt_stack.len(), valid) {
                state.fail(e);
            }
        }
        Err(e) => state.fail(e),
    }
}

fn op_checkmultisig(state: &mut BchState) {
    let pubkey_count = match pop_script_number(&mut state.stack, state.require_minimal()) {
        Ok(v) if (0..=MAXIMUM_MULTISIG_PUBLIC_KEYS as i64).contains(&v) => v as usize,
        Ok(_) => return state.fail(ScriptError::ExceedsMaximumMultisigPublicKeyCount),
        Err(e) => return state.fail(e),
    };
    let mut pubkeys = Vec::with_capacity(pubkey_count);
    for _ in 0..pubkey_count {
        match pop_one(&mut state.stack) {
            Ok(pk) => pubkeys.push(pk),
            Err(e) => return state.fail(e),
        }
    }
    pubkeys.reverse();

    let signature_count = match pop_script_number(&mut state.stack, state.require_minimal()) {
        Ok(v) if v >= 0 && v as usize <= pubkey_count => v as usize,
        Ok(_) => return state.fail(ScriptError::InsufficientPublicKeys),
        Err(e) => return state.fail(e),
    };
    let mut signatures = Vec::with_capacity(signature_count);
    for _ in 0..signature_count {
        match pop_one(&mut state.stack) {
            Ok(sig) => signatures.push(sig),
            Err(e) => return state.fail(e),
        }
    }
    signatures.reverse();

    // The historic off-by-one bug: one extra element must be popped.
    let bug_value = match pop_one(&mut state.stack) {
        Ok(v) => v,
        Err(e) => return state.fail(e),
    };
    if state.flags.require_bug_value_zero && !bug_value.is_empty() {
        return state.fail(ScriptError::InvalidProtocolBugValue);
    }

    for sig in &signatures {
        if sig.len() == 65 && *sig.last().unwrap() != 0 {
            // 64-byte Schnorr body + hashtype byte is rejected in CHECKMULTISIG.
            if sig.len() - 1 == 64 {
                return state.fail(ScriptError::SchnorrSizedSignatureInCheckMultiSig);
            }
        }
    }

    let script_code = state.active_script_code();
    let mut pubkey_idx = 0usize;
    let mut matched = 0usize;
    for sig in &signatures {
        let mut found = false;
        while pubkey_idx < pubkeys.len() {
            let pk = &pubkeys[pubkey_idx];
            pubkey_idx += 1;
            match check_ecdsa_or_schnorr_signature(state, sig, pk, &script_code) {
                Ok(true) => {
                    found = true;
                    matched += 1;
                    break;
                }
                Ok(false) => continue,
                Err(e) => return state.fail(e),
            }
        }
        if !found {
            if state.flags.require_null_signature_failure && !sig.is_empty() {
                return state.fail(ScriptError::NonNullSignatureFailure);
            }
            break;
        }
    }

    let all_matched = matched == signatures.len();
    if let Err(e) = push_bool_checked(&mut state.stack, state.alt_stack.len(), all_matched) {
        state.fail(e);
    }
}

fn execute_one(state: &mut BchState) {
    let token = state.tokens[state.pc].clone();
    tracing::trace!(pc = state.pc, %token, "step");
    state.pc += 1;

    let opcode = match &token {
        Token::Op(op) => Some(*op),
        Token::PushData(_, _) => None,
    };

    if let Some(op) = opcode {
        if op.is_always_disabled()
            || (op == Opcode::OpMul && !state.flags.enable_mul)
            || ((op == Opcode::OpLShift || op == Opcode::OpRShift) && !state.flags.enable_shift_opcodes)
            || (op == Opcode::OpInvert && !state.flags.enable_invert)
        {
            if matches!(op, Opcode::OpMul | Opcode::OpLShift | Opcode::OpRShift | Opcode::OpInvert) {
                return state.fail(ScriptError::DisabledOpcode(op.to_byte()));
            }
        }
        // Flow control is evaluated regardless of the exec_stack, since it
        // is what maintains exec_stack.
        match op {
            Opcode::OpIf | Opcode::OpNotIf => {
                if !state.is_executing() {
                    state.exec_stack.push(false);
                    return;
                }
                let top = match pop_one(&mut state.stack) {
                    Ok(v) => v,
                    Err(e) => return state.fail(e),
                };
                let cond = is_true(&top) == (op == Opcode::OpIf);
                state.exec_stack.push(cond);
                return;
            }
            Opcode::OpElse => {
                match state.exec_stack.last_mut() {
                    Some(top) => *top = !*top,
                    None => return state.fail(ScriptError::UnbalancedConditional),
                }
                return;
            }
            Opcode::OpEndIf => {
                if state.exec_stack.pop().is_none() {
                    return state.fail(ScriptError::UnbalancedConditional);
                }
                return;
            }
            _ => {}
        }
    }

    if !state.is_executing() {
        return;
    }

    let opcode = match opcode {
        Some(op) => op,
        None => {
            let Token::PushData(data, _) = &token else { unreachable!() };
            if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), data.clone()) {
                state.fail(e);
            }
            return;
        }
    };

    if !matches!(opcode, Opcode::OpPushBytes(_) | Opcode::OpPushData1 | Opcode::OpPushData2 | Opcode::OpPushData4) {
        state.op_count += 1;
        if state.op_count > MAXIMUM_OPERATION_COUNT {
            return state.fail(ScriptError::ExceededMaximumOperationCount);
        }
    }

    if let Opcode::OpUnassigned(byte) = opcode {
        return state.fail(ScriptError::UnknownOpcode(byte));
    }

    match opcode {
        Opcode::Op0 => {
            if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), Vec::new()) {
                state.fail(e);
            }
        }
        _ if opcode.small_integer().is_some() => {
            let v = opcode.small_integer().unwrap();
            if let Err(e) = push_script_number(&mut state.stack, state.alt_stack.len(), v) {
                state.fail(e);
            }
        }
        Opcode::OpNop
        | Opcode::OpNop1
        | Opcode::OpNop4
        | Opcode::OpNop5
        | Opcode::OpNop6
        | Opcode::OpNop7
        | Opcode::OpNop8
        | Opcode::OpNop9
        | Opcode::OpNop10 => {}

        Opcode::OpVerify => {
            let top = match pop_one(&mut state.stack) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            if !is_true(&top) {
                state.fail(ScriptError::FailedVerify);
            }
        }
        Opcode::OpReturn => state.fail(ScriptError::CalledReturn),

        Opcode::OpToAltStack => match pop_one(&mut state.stack) {
            Ok(v) => {
                if let Err(e) = push_to_stack(&mut state.alt_stack, state.stack.len(), v) {
                    state.fail(e);
                }
            }
            Err(e) => state.fail(e),
        },
        Opcode::OpFromAltStack => match pop_one(&mut state.alt_stack) {
            Ok(v) => {
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), v) {
                    state.fail(e);
                }
            }
            Err(e) => state.fail(e),
        },
        Opcode::Op2Drop => {
            if let Err(e) = pop_two(&mut state.stack) {
                state.fail(e);
            }
        }
        Opcode::Op2Dup => {
            let (a, b) = match pop_two(&mut state.stack) {
                Ok(pair) => pair,
                Err(e) => return state.fail(e),
            };
            for item in [a.clone(), b.clone(), a, b] {
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), item) {
                    return state.fail(e);
                }
            }
        }
        Opcode::Op3Dup => {
            let (a, b, c) = match pop_three(&mut state.stack) {
                Ok(triple) => triple,
                Err(e) => return state.fail(e),
            };
            for item in [a.clone(), b.clone(), c.clone(), a, b, c] {
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), item) {
                    return state.fail(e);
                }
            }
        }
        Opcode::OpIfDup => match state.stack.peek() {
            Ok(top) => {
                if is_true(top) {
                    let dup = top.to_vec();
                    if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), dup) {
                        state.fail(e);
                    }
                }
            }
            Err(e) => state.fail(e),
        },
        Opcode::OpDepth => {
            let len = state.stack.len() as i64;
            if let Err(e) = push_script_number(&mut state.stack, state.alt_stack.len(), len) {
                state.fail(e);
            }
        }
        Opcode::OpDrop => {
            if let Err(e) = pop_one(&mut state.stack) {
                state.fail(e);
            }
        }
        Opcode::OpDup => match state.stack.peek() {
            Ok(top) => {
                let dup = top.to_vec();
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), dup) {
                    state.fail(e);
                }
            }
            Err(e) => state.fail(e),
        },
        Opcode::OpNip => {
            let len = state.stack.len();
            if len < 2 {
                return state.fail(ScriptError::EmptyStack);
            }
            if let Err(e) = state.stack.remove(len - 2) {
                state.fail(e);
            }
        }
        Opcode::OpOver => match state.stack.peek_at_depth(1) {
            Ok(item) => {
                let dup = item.to_vec();
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), dup) {
                    state.fail(e);
                }
            }
            Err(e) => state.fail(e),
        },
        Opcode::Op2Over => {
            let len = state.stack.len();
            if len < 4 {
                return state.fail(ScriptError::EmptyStack);
            }
            let a = state.stack.peek_at_depth(3).unwrap().to_vec();
            let b = state.stack.peek_at_depth(2).unwrap().to_vec();
            for item in [a, b] {
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), item) {
                    return state.fail(e);
                }
            }
        }
        Opcode::Op2Swap => {
            let len = state.stack.len();
            if len < 4 {
                return state.fail(ScriptError::EmptyStack);
            }
            let a = match state.stack.remove_at_depth(3) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            let b = match state.stack.remove_at_depth(2) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), a) {
                return state.fail(e);
            }
            if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), b) {
                state.fail(e);
            }
        }
        Opcode::Op2Rot => {
            let len = state.stack.len();
            if len < 6 {
                return state.fail(ScriptError::EmptyStack);
            }
            let a = match state.stack.remove_at_depth(5) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            let b = match state.stack.remove_at_depth(4) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), a) {
                return state.fail(e);
            }
            if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), b) {
                state.fail(e);
            }
        }
        Opcode::OpPick => {
            let require_minimal = state.require_minimal();
            let n = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) if v >= 0 => v as usize,
                Ok(_) => return state.fail(ScriptError::InvalidStackIndex),
                Err(e) => return state.fail(e),
            };
            match state.stack.peek_at_depth(n) {
                Ok(item) => {
                    let dup = item.to_vec();
                    if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), dup) {
                        state.fail(e);
                    }
                }
                Err(e) => state.fail(e),
            }
        }
        Opcode::OpRoll => {
            let require_minimal = state.require_minimal();
            let n = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) if v >= 0 => v as usize,
                Ok(_) => return state.fail(ScriptError::InvalidStackIndex),
                Err(e) => return state.fail(e),
            };
            match state.stack.remove_at_depth(n) {
                Ok(item) => {
                    if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), item) {
                        state.fail(e);
                    }
                }
                Err(e) => state.fail(e),
            }
        }
        Opcode::OpRot => match state.stack.remove_at_depth(2) {
            Ok(item) => {
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), item) {
                    state.fail(e);
                }
            }
            Err(e) => state.fail(e),
        },
        Opcode::OpSwap => match state.stack.remove_at_depth(1) {
            Ok(item) => {
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), item) {
                    state.fail(e);
                }
            }
            Err(e) => state.fail(e),
        },
        Opcode::OpTuck => {
            let (second, top) = match pop_two(&mut state.stack) {
                Ok(pair) => pair,
                Err(e) => return state.fail(e),
            };
            for item in [top.clone(), second, top] {
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), item) {
                    return state.fail(e);
                }
            }
        }

        Opcode::OpCat => {
            let (a, b) = match pop_two(&mut state.stack) {
                Ok(pair) => pair,
                Err(e) => return state.fail(e),
            };
            let mut combined = a;
            combined.extend_from_slice(&b);
            if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), combined) {
                state.fail(e);
            }
        }
        Opcode::OpSplit => {
            let require_minimal = state.require_minimal();
            let n = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            let data = match pop_one(&mut state.stack) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            if n < 0 || n as usize > data.len() {
                return state.fail(ScriptError::InvalidStackIndex);
            }
            let (left, right) = data.split_at(n as usize);
            if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), left.to_vec()) {
                return state.fail(e);
            }
            if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), right.to_vec()) {
                state.fail(e);
            }
        }
        Opcode::OpNum2Bin => {
            let require_minimal = state.require_minimal();
            let size = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) if v >= 0 => v as usize,
                Ok(_) => return state.fail(ScriptError::InvalidNaturalNumber),
                Err(e) => return state.fail(e),
            };
            let data = match pop_one(&mut state.stack) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            if size > crate::stack::MAXIMUM_SCRIPT_ELEMENT_SIZE {
                return state.fail(ScriptError::ExceededMaximumElementSize);
            }
            if data.len() > 8 {
                return state.fail(ScriptError::InvalidNaturalNumber);
            }
            let value = match script_num::decode_script_number(&data, data.len().max(1), false) {
                Ok(v) => v,
                Err(_) => return state.fail(ScriptError::InvalidNaturalNumber),
            };
            let minimal = script_num::encode_script_number(value);
            if minimal.len() > size {
                return state.fail(ScriptError::InvalidNaturalNumber);
            }
            let mut out = vec![0u8; size];
            let negative = minimal.last().copied().unwrap_or(0) & 0x80 != 0;
            for (i, &b) in minimal.iter().enumerate() {
                out[i] = b;
            }
            if !minimal.is_empty() {
                out[minimal.len() - 1] &= 0x7f;
            }
            if negative && size > 0 {
                out[size - 1] |= 0x80;
            }
            if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), out) {
                state.fail(e);
            }
        }
        Opcode::OpBin2Num => {
            let data = match pop_one(&mut state.stack) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            let minimal = trim_to_minimal(&data);
            let value = match script_num::decode_script_number(&minimal, DEFAULT_MAXIMUM_SCRIPT_NUMBER_LENGTH, true) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            if let Err(e) = push_script_number(&mut state.stack, state.alt_stack.len(), value) {
                state.fail(e);
            }
        }
        Opcode::OpSize => match state.stack.peek() {
            Ok(top) => {
                let len = top.len() as i64;
                if let Err(e) = push_script_number(&mut state.stack, state.alt_stack.len(), len) {
                    state.fail(e);
                }
            }
            Err(e) => state.fail(e),
        },

        Opcode::OpAnd => binary_bitwise_op(state, |a, b| a & b),
        Opcode::OpOr => binary_bitwise_op(state, |a, b| a | b),
        Opcode::OpXor => binary_bitwise_op(state, |a, b| a ^ b),
        Opcode::OpLShift => {
            let require_minimal = state.require_minimal();
            let shift = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) if v >= 0 => v as u32,
                _ => return state.fail(ScriptError::InvalidNaturalNumber),
            };
            let data = match pop_one(&mut state.stack) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            let result = shift_bits(&data, shift as i64);
            if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), result) {
                state.fail(e);
            }
        }
        Opcode::OpRShift => {
            let require_minimal = state.require_minimal();
            let shift = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) if v >= 0 => v as u32,
                _ => return state.fail(ScriptError::InvalidNaturalNumber),
            };
            let data = match pop_one(&mut state.stack) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            let result = shift_bits(&data, -(shift as i64));
            if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), result) {
                state.fail(e);
            }
        }

        Opcode::OpEqual => {
            let (a, b) = match pop_two(&mut state.stack) {
                Ok(pair) => pair,
                Err(e) => return state.fail(e),
            };
            if let Err(e) = push_bool_checked(&mut state.stack, state.alt_stack.len(), a == b) {
                state.fail(e);
            }
        }
        Opcode::OpEqualVerify => {
            let (a, b) = match pop_two(&mut state.stack) {
                Ok(pair) => pair,
                Err(e) => return state.fail(e),
            };
            if a != b {
                state.fail(ScriptError::FailedVerify);
            }
        }

        Opcode::Op1Add => unary_numeric_op(state, |a| a + 1),
        Opcode::Op1Sub => unary_numeric_op(state, |a| a - 1),
        Opcode::OpNegate => unary_numeric_op(state, |a| -a),
        Opcode::OpAbs => unary_numeric_op(state, i64::abs),
        Opcode::OpNot => unary_numeric_op(state, |a| if a == 0 { 1 } else { 0 }),
        Opcode::Op0NotEqual => unary_numeric_op(state, |a| if a != 0 { 1 } else { 0 }),
        Opcode::Op2Mul => unary_numeric_op(state, |a| a * 2),
        Opcode::Op2Div => unary_numeric_op(state, |a| a / 2),

        Opcode::OpAdd => binary_numeric_op(state, |a, b| a + b),
        Opcode::OpSub => binary_numeric_op(state, |a, b| a - b),
        Opcode::OpMul => binary_numeric_op(state, |a, b| a * b),
        Opcode::OpDiv => {
            let require_minimal = state.require_minimal();
            let b = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            let a = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            if b == 0 {
                return state.fail(ScriptError::InvalidNaturalNumber);
            }
            if let Err(e) = push_script_number(&mut state.stack, state.alt_stack.len(), a / b) {
                state.fail(e);
            }
        }
        Opcode::OpMod => {
            let require_minimal = state.require_minimal();
            let b = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            let a = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            if b == 0 {
                return state.fail(ScriptError::InvalidNaturalNumber);
            }
            if let Err(e) = push_script_number(&mut state.stack, state.alt_stack.len(), a % b) {
                state.fail(e);
            }
        }
        Opcode::OpBoolAnd => binary_bool_op(state, |a, b| a != 0 && b != 0),
        Opcode::OpBoolOr => binary_bool_op(state, |a, b| a != 0 || b != 0),
        Opcode::OpNumEqual => binary_bool_op(state, |a, b| a == b),
        Opcode::OpNumEqualVerify => {
            let require_minimal = state.require_minimal();
            let b = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            let a = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            if a != b {
                state.fail(ScriptError::FailedVerify);
            }
        }
        Opcode::OpNumNotEqual => binary_bool_op(state, |a, b| a != b),
        Opcode::OpLessThan => binary_bool_op(state, |a, b| a < b),
        Opcode::OpGreaterThan => binary_bool_op(state, |a, b| a > b),
        Opcode::OpLessThanOrEqual => binary_bool_op(state, |a, b| a <= b),
        Opcode::OpGreaterThanOrEqual => binary_bool_op(state, |a, b| a >= b),
        Opcode::OpMin => binary_numeric_op(state, i64::min),
        Opcode::OpMax => binary_numeric_op(state, i64::max),
        Opcode::OpWithin => {
            let require_minimal = state.require_minimal();
            let max = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            let min = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            let x = match pop_script_number(&mut state.stack, require_minimal) {
                Ok(v) => v,
                Err(e) => return state.fail(e),
            };
            if let Err(e) = push_bool_checked(&mut state.stack, state.alt_stack.len(), x >= min && x < max) {
                state.fail(e);
            }
        }

        Opcode::OpRipemd160 => match pop_one(&mut state.stack) {
            Ok(v) => {
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), ripemd160(&v).to_vec()) {
                    state.fail(e);
                }
            }
            Err(e) => state.fail(e),
        },
        Opcode::OpSha1 => match pop_one(&mut state.stack) {
            Ok(v) => {
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), sha1(&v).to_vec()) {
                    state.fail(e);
                }
            }
            Err(e) => state.fail(e),
        },
        Opcode::OpSha256 => match pop_one(&mut state.stack) {
            Ok(v) => {
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), sha256(&v).to_vec()) {
                    state.fail(e);
                }
            }
            Err(e) => state.fail(e),
        },
        Opcode::OpHash160 => match pop_one(&mut state.stack) {
            Ok(v) => {
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), hash160(&v).to_vec()) {
                    state.fail(e);
                }
            }
            Err(e) => state.fail(e),
        },
        Opcode::OpHash256 => match pop_one(&mut state.stack) {
            Ok(v) => {
                if let Err(e) = push_to_stack(&mut state.stack, state.alt_stack.len(), hash256(&v).to_vec()) {
                    state.fail(e);
                }
            }
            Err(e) => state.fail(e),
        },
        Opcode::OpCodeSeparator => {
            state.code_separator_pc = state.pc.max(state.locking_start);
        }
        Opcode::OpCheckSig => op_checksig(state),
        Opcode::OpCheckSigVerify => {
            op_checksig(state);
            if state.error.is_none() {
                match pop_one(&mut state.stack) {
                    Ok(v) => {
                        if !is_true(&v) {
                            state.fail(ScriptError::FailedVerify);
                        }
                    }
                    Err(e) => state.fail(e),
                }
            }
        }
        Opcode::OpCheckMultiSig => op_checkmultisig(state),
        Opcode::OpCheckMultiSigVerify => {
            op_checkmultisig(state);
            if state.error.is_none() {
                match pop_one(&mut state.stack) {
                    Ok(v) => {
                        if !is_true(&v) {
                            state.fail(ScriptError::FailedVerify);
                        }
                    }
                    Err(e) => state.fail(e),
                }
            }
        }
        Opcode::OpCheckDataSig => op_checkdatasig(state),
        Opcode::OpCheckDataSigVerify => {
            op_checkdatasig(state);
            if state.error.is_none() {
                match pop_one(&mut state.stack) {
                    Ok(v) => {
                        if !is_true(&v) {
                            state.fail(ScriptError::FailedVerify);
                        }
                    }
                    Err(e) => state.fail(e),
                }
            }
        }

        Opcode::OpCheckLockTimeVerify => state.check_locktime(false),
        Opcode::OpCheckSequenceVerify => state.check_locktime(true),

        Opcode::OpInvert => state.fail(ScriptError::DisabledOpcode(Opcode::OpInvert.to_byte())),

        Opcode::OpVer | Opcode::OpVerIf | Opcode::OpVerNotIf | Opcode::OpReserved | Opcode::OpReserved1 | Opcode::OpReserved2 => {
            state.fail(ScriptError::DisabledOpcode(opcode.to_byte()));
        }

        Opcode::OpPushBytes(_) | Opcode::OpPushData1 | Opcode::OpPushData2 | Opcode::OpPushData4 => unreachable!(
            "push-data opcodes are represented as Token::PushData, not Token::Op"
        ),
        Opcode::Op1Negate
        | Opcode::Op1
        | Opcode::Op2
        | Opcode::Op3
        | Opcode::Op4
        | Opcode::Op5
        | Opcode::Op6
        | Opcode::Op7
        | Opcode::Op8
        | Opcode::Op9
        | Opcode::Op10
        | Opcode::Op11
        | Opcode::Op12
        | Opcode::Op13
        | Opcode::Op14
        | Opcode::Op15
        | Opcode::Op16 => unreachable!("handled by the small_integer() arm above"),
        Opcode::OpIf | Opcode::OpNotIf | Opcode::OpElse | Opcode::OpEndIf => {
            unreachable!("handled by the flow-control arm above")
        }
        Opcode::OpUnassigned(_) => unreachable!("handled before op_count increment"),
    }
}

fn trim_to_minimal(data: &[u8]) -> Vec<u8> {
    let mut v = data.to_vec();
    while let Some(&last) = v.last() {
        if last != 0 {
            break;
        }
        if v.len() >= 2 && v[v.len() - 2] & 0x80 != 0 {
            break;
        }
        v.pop();
    }
    v
}

/// Shifts `data`, interpreted as a big-endian bit string spanning its full
/// byte length, by `amount` bits (positive = left, negative = right),
/// keeping the same output length and filling with zero bits. Operates
/// bit-by-bit so it is correct for elements up to the full 520-byte limit,
/// unlike a fixed-width integer shift.
fn shift_bits(data: &[u8], amount: i64) -> Vec<u8> {
    let total_bits = data.len() * 8;
    if total_bits == 0 {
        return Vec::new();
    }
    let bit = |i: usize| (data[i / 8] >> (7 - (i % 8))) & 1;
    let mut out = vec![0u8; data.len()];
    for i in 0..total_bits {
        let source = i as i64 + amount;
        if source < 0 || source as usize >= total_bits {
            continue;
        }
        if bit(source as usize) != 0 {
            out[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Outpoint, Transaction, TransactionInput, TransactionOutput};
    use crate::tokenizer::parse_script;
    use crate::vm::core::run;
    use secp256k1::SecretKey;

    fn sample_transaction(locking: &[u8]) -> Transaction {
        Transaction {
            version: 2,
            inputs: vec![TransactionInput {
                previous_output: Outpoint { transaction_id: [0x11; 32], index: 0 },
                sequence_number: 0xffffffff,
            }],
            outputs: vec![TransactionOutput { value: 50_000, locking_bytecode: locking.to_vec() }],
            locktime: 0,
        }
    }

    fn run_combined(unlocking: &[u8], locking: &[u8], ctx: &VerificationContext, flags: VerificationFlags) -> BchState<'_> {
        let unlocking_tokens = parse_script(unlocking).unwrap();
        let locking_start = unlocking_tokens.len();
        let mut tokens = unlocking_tokens;
        tokens.extend(parse_script(locking).unwrap());
        let machine = BchMachine::new(ctx, flags);
        run(&machine, &Program { tokens, locking_start })
    }

    #[test]
    fn simple_equal_script_verifies() {
        let tx = sample_transaction(&[]);
        let ctx = VerificationContext::new(&tx, 0, 50_000, &[]);
        let unlocking = vec![0x51]; // OP_1
        let locking = vec![0x51, 0x87]; // OP_1 OP_EQUAL
        let state = run_combined(&unlocking, &locking, &ctx, VerificationFlags::default());
        let machine = BchMachine::new(&ctx, VerificationFlags::default());
        assert!(machine.verify(&state));
    }

    #[test]
    fn p2pkh_with_real_ecdsa_signature_succeeds() {
        let secret = SecretKey::from_slice(&[0x01; 32]).unwrap();
        let pubkey = ecdsa::derive_public_key_compressed(&secret);
        let pubkey_hash = hash160(&pubkey);

        let mut locking = Vec::new();
        locking.push(0x76); // OP_DUP
        locking.push(0xa9); // OP_HASH160
        locking.push(0x14);
        locking.extend_from_slice(&pubkey_hash);
        locking.push(0x88); // OP_EQUALVERIFY
        locking.push(0xac); // OP_CHECKSIG

        let tx = sample_transaction(&locking);
        let ctx = VerificationContext::new(&tx, 0, 50_000, &locking);
        let digest = generate_signing_serialization(&ctx, 0x41).unwrap();
        let der = ecdsa::sign_der(&secret, &digest);
        let mut sig = der;
        sig.push(0x41);

        let mut unlocking = Vec::new();
        unlocking.push(sig.len() as u8);
        unlocking.extend_from_slice(&sig);
        unlocking.push(pubkey.len() as u8);
        unlocking.extend_from_slice(&pubkey);

        let state = run_combined(&unlocking, &locking, &ctx, VerificationFlags::default());
        let machine = BchMachine::new(&ctx, VerificationFlags::default());
        assert!(state.error.is_none(), "unexpected error: {:?}", state.error);
        assert!(machine.verify(&state));
    }

    #[test]
    fn p2pkh_with_real_schnorr_signature_succeeds() {
        let secret = SecretKey::from_slice(&[0x02; 32]).unwrap();
        let pubkey = ecdsa::derive_public_key_compressed(&secret);
        let pubkey_hash = hash160(&pubkey);

        let mut locking = Vec::new();
        locking.push(0x76);
        locking.push(0xa9);
        locking.push(0x14);
        locking.extend_from_slice(&pubkey_hash);
        locking.push(0x88);
        locking.push(0xac);

        let tx = sample_transaction(&locking);
        let ctx = VerificationContext::new(&tx, 0, 50_000, &locking);
        let digest = generate_signing_serialization(&ctx, 0x41).unwrap();
        let parsed_secret = ecdsa::parse_private_key(&secret.secret_bytes()).unwrap();
        let mut sig = schnorr::sign(&parsed_secret, &digest).unwrap().to_vec();
        sig.push(0x41);

        let mut unlocking = Vec::new();
        unlocking.push(sig.len() as u8);
        unlocking.extend_from_slice(&sig);
        unlocking.push(pubkey.len() as u8);
        unlocking.extend_from_slice(&pubkey);

        let state = run_combined(&unlocking, &locking, &ctx, VerificationFlags::default());
        let machine = BchMachine::new(&ctx, VerificationFlags::default());
        assert!(state.error.is_none(), "unexpected error: {:?}", state.error);
        assert!(machine.verify(&state));
    }

    #[test]
    fn p2pkh_wrong_signature_fails_without_error() {
        let secret = SecretKey::from_slice(&[0x03; 32]).unwrap();
        let other = SecretKey::from_slice(&[0x04; 32]).unwrap();
        let pubkey = ecdsa::derive_public_key_compressed(&secret);
        let pubkey_hash = hash160(&pubkey);

        let mut locking = Vec::new();
        locking.push(0x76);
        locking.push(0xa9);
        locking.push(0x14);
        locking.extend_from_slice(&pubkey_hash);
        locking.push(0x88);
        locking.push(0xac);

        let tx = sample_transaction(&locking);
        let ctx = VerificationContext::new(&tx, 0, 50_000, &locking);
        let digest = generate_signing_serialization(&ctx, 0x41).unwrap();
        let der = ecdsa::sign_der(&other, &digest); // wrong key
        let mut sig = der;
        sig.push(0x41);

        let mut unlocking = Vec::new();
        unlocking.push(sig.len() as u8);
        unlocking.extend_from_slice(&sig);
        unlocking.push(pubkey.len() as u8);
        unlocking.extend_from_slice(&pubkey);

        let state = run_combined(&unlocking, &locking, &ctx, VerificationFlags::default());
        let machine = BchMachine::new(&ctx, VerificationFlags::default());
        assert!(!machine.verify(&state));
    }

    #[test]
    fn arithmetic_add() {
        let tx = sample_transaction(&[]);
        let ctx = VerificationContext::new(&tx, 0, 50_000, &[]);
        // OP_2 OP_3 OP_ADD OP_5 OP_NUMEQUAL
        let script = vec![0x52, 0x53, 0x93, 0x55, 0x9c];
        let state = run_combined(&[], &script, &ctx, VerificationFlags::default());
        let machine = BchMachine::new(&ctx, VerificationFlags::default());
        assert!(machine.verify(&state));
    }

    #[test]
    fn conditional_else_branch_taken() {
        let tx = sample_transaction(&[]);
        let ctx = VerificationContext::new(&tx, 0, 50_000, &[]);
        // OP_0 OP_IF OP_0 OP_ELSE OP_1 OP_ENDIF
        let script = vec![0x00, 0x63, 0x00, 0x67, 0x51, 0x68];
        let state = run_combined(&[], &script, &ctx, VerificationFlags::default());
        let machine = BchMachine::new(&ctx, VerificationFlags::default());
        assert!(machine.verify(&state));
    }

    #[test]
    fn op_return_fails_script() {
        let tx = sample_transaction(&[]);
        let ctx = VerificationContext::new(&tx, 0, 50_000, &[]);
        let script = vec![0x51, 0x6a]; // OP_1 OP_RETURN
        let state = run_combined(&[], &script, &ctx, VerificationFlags::default());
        assert!(matches!(state.error, Some(ScriptError::CalledReturn)));
    }

    #[test]
    fn unbalanced_conditional_errors() {
        let tx = sample_transaction(&[]);
        let ctx = VerificationContext::new(&tx, 0, 50_000, &[]);
        let script = vec![0x51, 0x63]; // OP_1 OP_IF, no ENDIF
        let state = run_combined(&[], &script, &ctx, VerificationFlags::default());
        assert!(matches!(state.error, Some(ScriptError::UnbalancedConditional)));
    }

    #[test]
    fn pick_and_roll() {
        let tx = sample_transaction(&[]);
        let ctx = VerificationContext::new(&tx, 0, 50_000, &[]);
        // OP_1 OP_2 OP_3 OP_2 OP_PICK -> duplicates the element 2 deep (OP_1)
        let script = vec![0x51, 0x52, 0x53, 0x52, 0x79];
        let state = run_combined(&[], &script, &ctx, VerificationFlags::default());
        assert_eq!(state.stack.peek().unwrap(), &[0x01]);
    }

    #[test]
    fn split_and_cat_roundtrip() {
        let tx = sample_transaction(&[]);
        let ctx = VerificationContext::new(&tx, 0, 50_000, &[]);
        // push "ab", split at 1, cat back together, compare to original
        let mut script = Vec::new();
        script.extend_from_slice(&[0x02, b'a', b'b']);
        script.extend_from_slice(&[0x51, 0x7f]); // OP_1 OP_SPLIT
        script.push(0x7e); // OP_CAT
        script.extend_from_slice(&[0x02, b'a', b'b']);
        script.push(0x87); // OP_EQUAL
        let state = run_combined(&[], &script, &ctx, VerificationFlags::default());
        let machine = BchMachine::new(&ctx, VerificationFlags::default());
        assert!(machine.verify(&state));
    }

    #[test]
    fn shift_left_doubles_value() {
        let tx = sample_transaction(&[]);
        let ctx = VerificationContext::new(&tx, 0, 50_000, &[]);
        // push 1-byte [0x01], shift left 1 -> [0x02]
        let mut script = Vec::new();
        script.extend_from_slice(&[0x01, 0x01]);
        script.extend_from_slice(&[0x51, 0x98]); // OP_1 OP_LSHIFT
        script.extend_from_slice(&[0x01, 0x02]);
        script.push(0x87); // OP_EQUAL
        let state = run_combined(&[], &script, &ctx, VerificationFlags::default());
        let machine = BchMachine::new(&ctx, VerificationFlags::default());
        assert!(machine.verify(&state));
    }

    #[test]
    fn checklocktimeverify_satisfied() {
        let mut tx = sample_transaction(&[]);
        tx.locktime = 600_000;
        let ctx = VerificationContext::new(&tx, 0, 50_000, &[]);
        // push 500000 as locktime requirement, OP_CHECKLOCKTIMEVERIFY, OP_DROP, OP_1
        let mut script = Vec::new();
        script.extend_from_slice(&script_num::encode_script_number(500_000));
        script.insert(0, script.len() as u8);
        script.push(0xb1); // OP_CHECKLOCKTIMEVERIFY
        script.push(0x75); // OP_DROP
        script.push(0x51); // OP_1
        let state = run_combined(&[], &script, &ctx, VerificationFlags::default());
        let machine = BchMachine::new(&ctx, VerificationFlags::default());
        assert!(machine.verify(&state));
    }

    #[test]
    fn checklocktimeverify_unsatisfied() {
        let mut tx = sample_transaction(&[]);
        tx.locktime = 100;
        let ctx = VerificationContext::new(&tx, 0, 50_000, &[]);
        let mut script = Vec::new();
        script.extend_from_slice(&script_num::encode_script_number(500_000));
        script.insert(0, script.len() as u8);
        script.push(0xb1);
        let state = run_combined(&[], &script, &ctx, VerificationFlags::default());
        assert!(matches!(state.error, Some(ScriptError::UnsatisfiedLocktime)));
    }

    #[test]
    fn disabled_opcode_rejected() {
        let tx = sample_transaction(&[]);
        let ctx = VerificationContext::new(&tx, 0, 50_000, &[]);
        let script = vec![0x50]; // OP_RESERVED
        let state = run_combined(&[], &script, &ctx, VerificationFlags::default());
        assert!(matches!(state.error, Some(ScriptError::DisabledOpcode(_))));
    }
}
