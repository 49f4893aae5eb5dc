//! The closed set of error conditions the VM and its supporting codecs can
//! produce. Once a [`ScriptError`] is recorded in a VM state, every later
//! step is an identity transition — see [`crate::vm`].

/// All error conditions that can arise while parsing, serializing, or
/// executing a script, or while validating the cryptographic material a
/// script consumes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    /// A push-data instruction's length field runs past the end of the script.
    #[error("malformed push: length field exceeds remaining script bytes")]
    MalformedPush,

    /// OP_IF/OP_NOTIF/OP_ELSE/OP_ENDIF are not properly nested.
    #[error("unbalanced conditional: mismatched IF/ELSE/ENDIF")]
    UnbalancedConditional,

    /// An operation needed one or more stack elements that were not there.
    #[error("empty stack: operation needed an element that was not present")]
    EmptyStack,

    /// OP_PICK/OP_ROLL referenced a stack depth outside the current stack.
    #[error("invalid stack index")]
    InvalidStackIndex,

    /// `stack.len() + alternate_stack.len()` exceeded 1000.
    #[error("exceeded maximum combined stack depth of 1000")]
    ExceededMaximumStackDepth,

    /// A single stack element exceeded 520 bytes.
    #[error("exceeded maximum element size of 520 bytes")]
    ExceededMaximumElementSize,

    /// More than 201 non-push opcodes were executed.
    #[error("exceeded maximum operation count of 201")]
    ExceededMaximumOperationCount,

    /// The script contained more opcodes than the consensus count limit.
    #[error("exceeded maximum opcode count")]
    ExceededMaximumOpcode,

    /// A recognized but consensus-disabled opcode was encountered (e.g.
    /// OP_INVERT, or OP_MUL outside the era that enables it).
    #[error("disabled opcode: 0x{0:02x}")]
    DisabledOpcode(u8),

    /// The opcode byte does not map to any known instruction.
    #[error("unknown opcode: 0x{0:02x}")]
    UnknownOpcode(u8),

    /// A script number was expected but the operand was not a natural number
    /// in the accepted range.
    #[error("invalid natural number operand")]
    InvalidNaturalNumber,

    /// A script number operand used a non-minimal encoding under flags that
    /// require minimal encoding.
    #[error("non-minimally encoded script number")]
    NonMinimallyEncodedScriptNumber,

    /// OP_CHECKMULTISIG's public key count exceeded 20.
    #[error("exceeds maximum multisig public key count of 20")]
    ExceedsMaximumMultisigPublicKeyCount,

    /// OP_CHECKMULTISIG required more signatures than public keys supplied.
    #[error("insufficient public keys for required signature count")]
    InsufficientPublicKeys,

    /// The OP_CHECKMULTISIG protocol-bug value was non-empty under a flag
    /// that requires it to be empty.
    #[error("invalid protocol bug value: must be empty")]
    InvalidProtocolBugValue,

    /// A public key was not a valid compressed or uncompressed encoding.
    #[error("invalid public key encoding")]
    InvalidPublicKeyEncoding,

    /// A signature was not a valid (possibly null) DER-or-Schnorr encoding.
    #[error("invalid signature encoding")]
    InvalidSignatureEncoding,

    /// A 64-byte (Schnorr-sized) signature was supplied to OP_CHECKMULTISIG,
    /// which only accepts ECDSA signatures.
    #[error("schnorr-sized signature in OP_CHECKMULTISIG")]
    SchnorrSizedSignatureInCheckMultiSig,

    /// A non-null signature failed verification under a flag that requires
    /// only the null (empty) signature to fail verification.
    #[error("non-null signature failed verification")]
    NonNullSignatureFailure,

    /// OP_CHECKLOCKTIMEVERIFY's condition was not satisfied.
    #[error("unsatisfied locktime")]
    UnsatisfiedLocktime,

    /// OP_CHECKSEQUENCEVERIFY's condition was not satisfied.
    #[error("unsatisfied sequence number")]
    UnsatisfiedSequenceNumber,

    /// OP_VERIFY, OP_EQUALVERIFY, OP_CHECKSIGVERIFY, OP_NUMEQUALVERIFY, or
    /// OP_CHECKMULTISIGVERIFY popped a false value.
    #[error("verify failed: top stack element was false")]
    FailedVerify,

    /// OP_RETURN was executed.
    #[error("OP_RETURN encountered: script is provably unspendable")]
    CalledReturn,

    /// A hex string could not be decoded (odd length or invalid character).
    #[error("invalid hex string")]
    InvalidHex,
}
