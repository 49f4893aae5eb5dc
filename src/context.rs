//! The minimal transaction data a script needs to authenticate a spend:
//! enough of the spending transaction and the output being spent to build
//! a BCH signing serialization, without pulling in a full transaction
//! wire-format parser (explicitly out of scope).

/// A reference to a previous transaction output being spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outpoint {
    pub transaction_id: [u8; 32],
    pub index: u32,
}

/// One input of the spending transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInput {
    pub previous_output: Outpoint,
    pub sequence_number: u32,
}

/// One output of the spending transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutput {
    pub value: u64,
    pub locking_bytecode: Vec<u8>,
}

/// The spending transaction, independent of any one input being verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub locktime: u32,
}

/// Everything a single input's script evaluation needs: the transaction it
/// belongs to, which input it is, the value of the output it spends, and
/// the active subscript (the unlocking/locking bytecode with any
/// OP_CODESEPARATOR prefix already trimmed).
#[derive(Debug, Clone)]
pub struct VerificationContext<'a> {
    pub transaction: &'a Transaction,
    pub input_index: usize,
    pub source_output_value: u64,
    pub script_code: &'a [u8],
}

impl<'a> VerificationContext<'a> {
    pub fn new(
        transaction: &'a Transaction,
        input_index: usize,
        source_output_value: u64,
        script_code: &'a [u8],
    ) -> Self {
        Self {
            transaction,
            input_index,
            source_output_value,
            script_code,
        }
    }

    pub fn current_input(&self) -> &TransactionInput {
        &self.transaction.inputs[self.input_index]
    }
}
