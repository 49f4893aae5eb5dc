//! The BCH common opcode set: byte values and their canonical names.
//!
//! This is a fieldless enum that maps 1:1 to protocol-defined byte values,
//! covering push-data markers, flow control, stack manipulation,
//! arithmetic, bitwise logic, splice/string operations, crypto operations,
//! and locktime checks. Reserved and disabled opcodes are still recognized
//! (so the VM can reject them with [`crate::error::ScriptError::DisabledOpcode`]
//! rather than the generic `UnknownOpcode`), since a future network upgrade
//! can re-enable a disabled opcode without changing its recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Constants
    Op0,
    OpPushBytes(u8), // 0x01..=0x4b, carries the literal push length
    OpPushData1,
    OpPushData2,
    OpPushData4,
    Op1Negate,
    OpReserved,
    Op1,
    Op2,
    Op3,
    Op4,
    Op5,
    Op6,
    Op7,
    Op8,
    Op9,
    Op10,
    Op11,
    Op12,
    Op13,
    Op14,
    Op15,
    Op16,

    // Flow control
    OpNop,
    OpVer,
    OpIf,
    OpNotIf,
    OpVerIf,
    OpVerNotIf,
    OpElse,
    OpEndIf,
    OpVerify,
    OpReturn,

    // Stack manipulation
    OpToAltStack,
    OpFromAltStack,
    Op2Drop,
    Op2Dup,
    Op3Dup,
    Op2Over,
    Op2Rot,
    Op2Swap,
    OpIfDup,
    OpDepth,
    OpDrop,
    OpDup,
    OpNip,
    OpOver,
    OpPick,
    OpRoll,
    OpRot,
    OpSwap,
    OpTuck,

    // Splice / string
    OpCat,
    OpSplit,
    OpNum2Bin,
    OpBin2Num,
    OpSize,

    // Bitwise logic
    OpInvert,
    OpAnd,
    OpOr,
    OpXor,
    OpEqual,
    OpEqualVerify,
    OpReserved1,
    OpReserved2,

    // Arithmetic
    Op1Add,
    Op1Sub,
    Op2Mul,
    Op2Div,
    OpNegate,
    OpAbs,
    OpNot,
    Op0NotEqual,
    OpAdd,
    OpSub,
    OpMul,
    OpDiv,
    OpMod,
    OpLShift,
    OpRShift,
    OpBoolAnd,
    OpBoolOr,
    OpNumEqual,
    OpNumEqualVerify,
    OpNumNotEqual,
    OpLessThan,
    OpGreaterThan,
    OpLessThanOrEqual,
    OpGreaterThanOrEqual,
    OpMin,
    OpMax,
    OpWithin,

    // Crypto
    OpRipemd160,
    OpSha1,
    OpSha256,
    OpHash160,
    OpHash256,
    OpCodeSeparator,
    OpCheckSig,
    OpCheckSigVerify,
    OpCheckMultiSig,
    OpCheckMultiSigVerify,
    OpCheckDataSig,
    OpCheckDataSigVerify,

    // Locktime
    OpNop1,
    OpCheckLockTimeVerify,
    OpCheckSequenceVerify,
    OpNop4,
    OpNop5,
    OpNop6,
    OpNop7,
    OpNop8,
    OpNop9,
    OpNop10,

    /// Any byte in `0xbc..=0xff`, outside the assignments above. Recognized
    /// (not a parser error) but rejected by the VM with `UnknownOpcode`.
    OpUnassigned(u8),
}

impl Opcode {
    /// Convert a non-push-data byte to an `Opcode`.
    ///
    /// Push-data bytes (`0x01..=0x4b`) map to `OpPushBytes`; the explicit
    /// `OpPushData1/2/4` markers are returned as-is, their length fields are
    /// consumed by the tokenizer.
    pub fn from_byte(byte: u8) -> Opcode {
        match byte {
            0x00 => Opcode::Op0,
            0x01..=0x4b => Opcode::OpPushBytes(byte),
            0x4c => Opcode::OpPushData1,
            0x4d => Opcode::OpPushData2,
            0x4e => Opcode::OpPushData4,
            0x4f => Opcode::Op1Negate,
            0x50 => Opcode::OpReserved,
            0x51 => Opcode::Op1,
            0x52 => Opcode::Op2,
            0x53 => Opcode::Op3,
            0x54 => Opcode::Op4,
            0x55 => Opcode::Op5,
            0x56 => Opcode::Op6,
            0x57 => Opcode::Op7,
            0x58 => Opcode::Op8,
            0x59 => Opcode::Op9,
            0x5a => Opcode::Op10,
            0x5b => Opcode::Op11,
            0x5c => Opcode::Op12,
            0x5d => Opcode::Op13,
            0x5e => Opcode::Op14,
            0x5f => Opcode::Op15,
            0x60 => Opcode::Op16,
            0x61 => Opcode::OpNop,
            0x62 => Opcode::OpVer,
            0x63 => Opcode::OpIf,
            0x64 => Opcode::OpNotIf,
            0x65 => Opcode::OpVerIf,
            0x66 => Opcode::OpVerNotIf,
            0x67 => Opcode::OpElse,
            0x68 => Opcode::OpEndIf,
            0x69 => Opcode::OpVerify,
            0x6a => Opcode::OpReturn,
            0x6b => Opcode::OpToAltStack,
            0x6c => Opcode::OpFromAltStack,
            0x6d => Opcode::Op2Drop,
            0x6e => Opcode::Op2Dup,
            0x6f => Opcode::Op3Dup,
            0x70 => Opcode::Op2Over,
            0x71 => Opcode::Op2Rot,
            0x72 => Opcode::Op2Swap,
            0x73 => Opcode::OpIfDup,
            0x74 => Opcode::OpDepth,
            0x75 => Opcode::OpDrop,
            0x76 => Opcode::OpDup,
            0x77 => Opcode::OpNip,
            0x78 => Opcode::OpOver,
            0x79 => Opcode::OpPick,
            0x7a => Opcode::OpRoll,
            0x7b => Opcode::OpRot,
            0x7c => Opcode::OpSwap,
            0x7d => Opcode::OpTuck,
            0x7e => Opcode::OpCat,
            0x7f => Opcode::OpSplit,
            0x80 => Opcode::Op2Mul,
            0x81 => Opcode::Op2Div,
            0x82 => Opcode::OpSize,
            0x83 => Opcode::OpInvert,
            0x84 => Opcode::OpAnd,
            0x85 => Opcode::OpOr,
            0x86 => Opcode::OpXor,
            0x87 => Opcode::OpEqual,
            0x88 => Opcode::OpEqualVerify,
            0x89 => Opcode::OpReserved1,
            0x8a => Opcode::OpReserved2,
            0x8b => Opcode::Op1Add,
            0x8c => Opcode::Op1Sub,
            0x8f => Opcode::OpNegate,
            0x90 => Opcode::OpAbs,
            0x91 => Opcode::OpNot,
            0x92 => Opcode::Op0NotEqual,
            0x93 => Opcode::OpAdd,
            0x94 => Opcode::OpSub,
            0x95 => Opcode::OpMul,
            0x96 => Opcode::OpDiv,
            0x97 => Opcode::OpMod,
            0x98 => Opcode::OpLShift,
            0x99 => Opcode::OpRShift,
            0x9a => Opcode::OpBoolAnd,
            0x9b => Opcode::OpBoolOr,
            0x9c => Opcode::OpNumEqual,
            0x9d => Opcode::OpNumEqualVerify,
            0x9e => Opcode::OpNumNotEqual,
            0x9f => Opcode::OpLessThan,
            0xa0 => Opcode::OpGreaterThan,
            0xa1 => Opcode::OpLessThanOrEqual,
            0xa2 => Opcode::OpGreaterThanOrEqual,
            0xa3 => Opcode::OpMin,
            0xa4 => Opcode::OpMax,
            0xa5 => Opcode::OpWithin,
            0xa6 => Opcode::OpRipemd160,
            0xa7 => Opcode::OpSha1,
            0xa8 => Opcode::OpSha256,
            0xa9 => Opcode::OpHash160,
            0xaa => Opcode::OpHash256,
            0xab => Opcode::OpCodeSeparator,
            0xac => Opcode::OpCheckSig,
            0xad => Opcode::OpCheckSigVerify,
            0xae => Opcode::OpCheckMultiSig,
            0xaf => Opcode::OpCheckMultiSigVerify,
            0xb0 => Opcode::OpNop1,
            0xb1 => Opcode::OpCheckLockTimeVerify,
            0xb2 => Opcode::OpCheckSequenceVerify,
            0xb3 => Opcode::OpNop4,
            0xb4 => Opcode::OpNop5,
            0xb5 => Opcode::OpNop6,
            0xb6 => Opcode::OpNop7,
            0xb7 => Opcode::OpNop8,
            0xb8 => Opcode::OpNop9,
            0xb9 => Opcode::OpNop10,
            0xba => Opcode::OpCheckDataSig,
            0xbb => Opcode::OpCheckDataSigVerify,
            other => Opcode::OpUnassigned(other),
        }
    }

    /// Convert an `Opcode` back to its canonical byte value.
    pub fn to_byte(self) -> u8 {
        match self {
            Opcode::Op0 => 0x00,
            Opcode::OpPushBytes(n) => n,
            Opcode::OpPushData1 => 0x4c,
            Opcode::OpPushData2 => 0x4d,
            Opcode::OpPushData4 => 0x4e,
            Opcode::Op1Negate => 0x4f,
            Opcode::OpReserved => 0x50,
            Opcode::Op1 => 0x51,
            Opcode::Op2 => 0x52,
            Opcode::Op3 => 0x53,
            Opcode::Op4 => 0x54,
            Opcode::Op5 => 0x55,
            Opcode::Op6 => 0x56,
            Opcode::Op7 => 0x57,
            Opcode::Op8 => 0x58,
            Opcode::Op9 => 0x59,
            Opcode::Op10 => 0x5a,
            Opcode::Op11 => 0x5b,
            Opcode::Op12 => 0x5c,
            Opcode::Op13 => 0x5d,
            Opcode::Op14 => 0x5e,
            Opcode::Op15 => 0x5f,
            Opcode::Op16 => 0x60,
            Opcode::OpNop => 0x61,
            Opcode::OpVer => 0x62,
            Opcode::OpIf => 0x63,
            Opcode::OpNotIf => 0x64,
            Opcode::OpVerIf => 0x65,
            Opcode::OpVerNotIf => 0x66,
            Opcode::OpElse => 0x67,
            Opcode::OpEndIf => 0x68,
            Opcode::OpVerify => 0x69,
            Opcode::OpReturn => 0x6a,
            Opcode::OpToAltStack => 0x6b,
            Opcode::OpFromAltStack => 0x6c,
            Opcode::Op2Drop => 0x6d,
            Opcode::Op2Dup => 0x6e,
            Opcode::Op3Dup => 0x6f,
            Opcode::Op2Over => 0x70,
            Opcode::Op2Rot => 0x71,
            Opcode::Op2Swap => 0x72,
            Opcode::OpIfDup => 0x73,
            Opcode::OpDepth => 0x74,
            Opcode::OpDrop => 0x75,
            Opcode::OpDup => 0x76,
            Opcode::OpNip => 0x77,
            Opcode::OpOver => 0x78,
            Opcode::OpPick => 0x79,
            Opcode::OpRoll => 0x7a,
            Opcode::OpRot => 0x7b,
            Opcode::OpSwap => 0x7c,
            Opcode::OpTuck => 0x7d,
            Opcode::OpCat => 0x7e,
            Opcode::OpSplit => 0x7f,
            Opcode::Op2Mul => 0x80,
            Opcode::Op2Div => 0x81,
            Opcode::OpSize => 0x82,
            Opcode::OpInvert => 0x83,
            Opcode::OpAnd => 0x84,
            Opcode::OpOr => 0x85,
            Opcode::OpXor => 0x86,
            Opcode::OpEqual => 0x87,
            Opcode::OpEqualVerify => 0x88,
            Opcode::OpReserved1 => 0x89,
            Opcode::OpReserved2 => 0x8a,
            Opcode::Op1Add => 0x8b,
            Opcode::Op1Sub => 0x8c,
            Opcode::OpNegate => 0x8f,
            Opcode::OpAbs => 0x90,
            Opcode::OpNot => 0x91,
            Opcode::Op0NotEqual => 0x92,
            Opcode::OpAdd => 0x93,
            Opcode::OpSub => 0x94,
            Opcode::OpMul => 0x95,
            Opcode::OpDiv => 0x96,
            Opcode::OpMod => 0x97,
            Opcode::OpLShift => 0x98,
            Opcode::OpRShift => 0x99,
            Opcode::OpBoolAnd => 0x9a,
            Opcode::OpBoolOr => 0x9b,
            Opcode::OpNumEqual => 0x9c,
            Opcode::OpNumEqualVerify => 0x9d,
            Opcode::OpNumNotEqual => 0x9e,
            Opcode::OpLessThan => 0x9f,
            Opcode::OpGreaterThan => 0xa0,
            Opcode::OpLessThanOrEqual => 0xa1,
            Opcode::OpGreaterThanOrEqual => 0xa2,
            Opcode::OpMin => 0xa3,
            Opcode::OpMax => 0xa4,
            Opcode::OpWithin => 0xa5,
            Opcode::OpRipemd160 => 0xa6,
            Opcode::OpSha1 => 0xa7,
            Opcode::OpSha256 => 0xa8,
            Opcode::OpHash160 => 0xa9,
            Opcode::OpHash256 => 0xaa,
            Opcode::OpCodeSeparator => 0xab,
            Opcode::OpCheckSig => 0xac,
            Opcode::OpCheckSigVerify => 0xad,
            Opcode::OpCheckMultiSig => 0xae,
            Opcode::OpCheckMultiSigVerify => 0xaf,
            Opcode::OpNop1 => 0xb0,
            Opcode::OpCheckLockTimeVerify => 0xb1,
            Opcode::OpCheckSequenceVerify => 0xb2,
            Opcode::OpNop4 => 0xb3,
            Opcode::OpNop5 => 0xb4,
            Opcode::OpNop6 => 0xb5,
            Opcode::OpNop7 => 0xb6,
            Opcode::OpNop8 => 0xb7,
            Opcode::OpNop9 => 0xb8,
            Opcode::OpNop10 => 0xb9,
            Opcode::OpCheckDataSig => 0xba,
            Opcode::OpCheckDataSigVerify => 0xbb,
            Opcode::OpUnassigned(n) => n,
        }
    }

    /// The value pushed by OP_1NEGATE and OP_1..OP_16, the "small number"
    /// push opcodes.
    pub fn small_integer(self) -> Option<i64> {
        match self {
            Opcode::Op1Negate => Some(-1),
            Opcode::Op1 => Some(1),
            Opcode::Op2 => Some(2),
            Opcode::Op3 => Some(3),
            Opcode::Op4 => Some(4),
            Opcode::Op5 => Some(5),
            Opcode::Op6 => Some(6),
            Opcode::Op7 => Some(7),
            Opcode::Op8 => Some(8),
            Opcode::Op9 => Some(9),
            Opcode::Op10 => Some(10),
            Opcode::Op11 => Some(11),
            Opcode::Op12 => Some(12),
            Opcode::Op13 => Some(13),
            Opcode::Op14 => Some(14),
            Opcode::Op15 => Some(15),
            Opcode::Op16 => Some(16),
            _ => None,
        }
    }

    /// Opcodes disabled at consensus level regardless of era. OP_MUL,
    /// OP_LSHIFT, OP_RSHIFT and OP_INVERT are era-gated instead, checked
    /// against verification flags by the opcode handler.
    pub fn is_always_disabled(self) -> bool {
        matches!(
            self,
            Opcode::OpVer
                | Opcode::OpVerIf
                | Opcode::OpVerNotIf
                | Opcode::OpReserved
                | Opcode::OpReserved1
                | Opcode::OpReserved2
        )
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &str = match self {
            Opcode::Op0 => "OP_0",
            Opcode::OpPushBytes(n) => return write!(f, "OP_PUSHBYTES_{n}"),
            Opcode::OpPushData1 => "OP_PUSHDATA1",
            Opcode::OpPushData2 => "OP_PUSHDATA2",
            Opcode::OpPushData4 => "OP_PUSHDATA4",
            Opcode::Op1Negate => "OP_1NEGATE",
            Opcode::OpReserved => "OP_RESERVED",
            Opcode::Op1 => "OP_1",
            Opcode::Op2 => "OP_2",
            Opcode::Op3 => "OP_3",
            Opcode::Op4 => "OP_4",
            Opcode::Op5 => "OP_5",
            Opcode::Op6 => "OP_6",
            Opcode::Op7 => "OP_7",
            Opcode::Op8 => "OP_8",
            Opcode::Op9 => "OP_9",
            Opcode::Op10 => "OP_10",
            Opcode::Op11 => "OP_11",
            Opcode::Op12 => "OP_12",
            Opcode::Op13 => "OP_13",
            Opcode::Op14 => "OP_14",
            Opcode::Op15 => "OP_15",
            Opcode::Op16 => "OP_16",
            Opcode::OpNop => "OP_NOP",
            Opcode::OpVer => "OP_VER",
            Opcode::OpIf => "OP_IF",
            Opcode::OpNotIf => "OP_NOTIF",
            Opcode::OpVerIf => "OP_VERIF",
            Opcode::OpVerNotIf => "OP_VERNOTIF",
            Opcode::OpElse => "OP_ELSE",
            Opcode::OpEndIf => "OP_ENDIF",
            Opcode::OpVerify => "OP_VERIFY",
            Opcode::OpReturn => "OP_RETURN",
            Opcode::OpToAltStack => "OP_TOALTSTACK",
            Opcode::OpFromAltStack => "OP_FROMALTSTACK",
            Opcode::Op2Drop => "OP_2DROP",
            Opcode::Op2Dup => "OP_2DUP",
            Opcode::Op3Dup => "OP_3DUP",
            Opcode::Op2Over => "OP_2OVER",
            Opcode::Op2Rot => "OP_2ROT",
            Opcode::Op2Swap => "OP_2SWAP",
            Opcode::OpIfDup => "OP_IFDUP",
            Opcode::OpDepth => "OP_DEPTH",
            Opcode::OpDrop => "OP_DROP",
            Opcode::OpDup => "OP_DUP",
            Opcode::OpNip => "OP_NIP",
            Opcode::OpOver => "OP_OVER",
            Opcode::OpPick => "OP_PICK",
            Opcode::OpRoll => "OP_ROLL",
            Opcode::OpRot => "OP_ROT",
            Opcode::OpSwap => "OP_SWAP",
            Opcode::OpTuck => "OP_TUCK",
            Opcode::OpCat => "OP_CAT",
            Opcode::OpSplit => "OP_SPLIT",
            Opcode::OpNum2Bin => "OP_NUM2BIN",
            Opcode::OpBin2Num => "OP_BIN2NUM",
            Opcode::Op2Mul => "OP_2MUL",
            Opcode::Op2Div => "OP_2DIV",
            Opcode::OpSize => "OP_SIZE",
            Opcode::OpInvert => "OP_INVERT",
            Opcode::OpAnd => "OP_AND",
            Opcode::OpOr => "OP_OR",
            Opcode::OpXor => "OP_XOR",
            Opcode::OpEqual => "OP_EQUAL",
            Opcode::OpEqualVerify => "OP_EQUALVERIFY",
            Opcode::OpReserved1 => "OP_RESERVED1",
            Opcode::OpReserved2 => "OP_RESERVED2",
            Opcode::Op1Add => "OP_1ADD",
            Opcode::Op1Sub => "OP_1SUB",
            Opcode::OpNegate => "OP_NEGATE",
            Opcode::OpAbs => "OP_ABS",
            Opcode::OpNot => "OP_NOT",
            Opcode::Op0NotEqual => "OP_0NOTEQUAL",
            Opcode::OpAdd => "OP_ADD",
            Opcode::OpSub => "OP_SUB",
            Opcode::OpMul => "OP_MUL",
            Opcode::OpDiv => "OP_DIV",
            Opcode::OpMod => "OP_MOD",
            Opcode::OpLShift => "OP_LSHIFT",
            Opcode::OpRShift => "OP_RSHIFT",
            Opcode::OpBoolAnd => "OP_BOOLAND",
            Opcode::OpBoolOr => "OP_BOOLOR",
            Opcode::OpNumEqual => "OP_NUMEQUAL",
            Opcode::OpNumEqualVerify => "OP_NUMEQUALVERIFY",
            Opcode::OpNumNotEqual => "OP_NUMNOTEQUAL",
            Opcode::OpLessThan => "OP_LESSTHAN",
            Opcode::OpGreaterThan => "OP_GREATERTHAN",
            Opcode::OpLessThanOrEqual => "OP_LESSTHANOREQUAL",
            Opcode::OpGreaterThanOrEqual => "OP_GREATERTHANOREQUAL",
            Opcode::OpMin => "OP_MIN",
            Opcode::OpMax => "OP_MAX",
            Opcode::OpWithin => "OP_WITHIN",
            Opcode::OpRipemd160 => "OP_RIPEMD160",
            Opcode::OpSha1 => "OP_SHA1",
            Opcode::OpSha256 => "OP_SHA256",
            Opcode::OpHash160 => "OP_HASH160",
            Opcode::OpHash256 => "OP_HASH256",
            Opcode::OpCodeSeparator => "OP_CODESEPARATOR",
            Opcode::OpCheckSig => "OP_CHECKSIG",
            Opcode::OpCheckSigVerify => "OP_CHECKSIGVERIFY",
            Opcode::OpCheckMultiSig => "OP_CHECKMULTISIG",
            Opcode::OpCheckMultiSigVerify => "OP_CHECKMULTISIGVERIFY",
            Opcode::OpCheckDataSig => "OP_CHECKDATASIG",
            Opcode::OpCheckDataSigVerify => "OP_CHECKDATASIGVERIFY",
            Opcode::OpNop1 => "OP_NOP1",
            Opcode::OpCheckLockTimeVerify => "OP_CHECKLOCKTIMEVERIFY",
            Opcode::OpCheckSequenceVerify => "OP_CHECKSEQUENCEVERIFY",
            Opcode::OpNop4 => "OP_NOP4",
            Opcode::OpNop5 => "OP_NOP5",
            Opcode::OpNop6 => "OP_NOP6",
            Opcode::OpNop7 => "OP_NOP7",
            Opcode::OpNop8 => "OP_NOP8",
            Opcode::OpNop9 => "OP_NOP9",
            Opcode::OpNop10 => "OP_NOP10",
            Opcode::OpUnassigned(n) => return write!(f, "OP_UNASSIGNED(0x{n:02x})"),
        };
        write!(f, "{name}")
    }
}
