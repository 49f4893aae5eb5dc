use crate::opcode::Opcode;

/// Which of the four push-data instructions encoded a [`Token::PushData`].
///
/// Several widths can encode the same length (e.g. a 2-byte push fits a
/// direct push, `OP_PUSHDATA1`, `OP_PUSHDATA2`, or `OP_PUSHDATA4`), so this
/// must be recorded on the token rather than re-derived from the data's
/// length — otherwise a non-minimally-encoded push can't round-trip back to
/// its original bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushEncoding {
    /// Direct push: the opcode byte itself (0x01-0x4b) is the length.
    Direct,
    /// `OP_PUSHDATA1`: a 1-byte length prefix.
    PushData1,
    /// `OP_PUSHDATA2`: a 2-byte little-endian length prefix.
    PushData2,
    /// `OP_PUSHDATA4`: a 4-byte little-endian length prefix.
    PushData4,
}

impl PushEncoding {
    /// The shortest encoding capable of carrying a push of `len` bytes.
    pub fn minimal_for(len: usize) -> Self {
        if len <= 0x4b {
            PushEncoding::Direct
        } else if len <= 0xff {
            PushEncoding::PushData1
        } else if len <= 0xffff {
            PushEncoding::PushData2
        } else {
            PushEncoding::PushData4
        }
    }
}

/// A parsed script element — either an opcode instruction or pushed data.
///
/// This is the output of the tokenizer and the input to the execution engine.
/// `PushData` carries the raw bytes from any of the four push-data encodings,
/// plus which encoding carried them, so serialization round-trips byte for
/// byte even when the source script's encoding wasn't the shortest possible.
/// `Op` wraps a fieldless [`Opcode`] variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Data pushed onto the stack by a push-data instruction.
    PushData(Vec<u8>, PushEncoding),

    /// An opcode instruction (any non-push operation).
    Op(Opcode),
}

impl Token {
    /// Builds a push token using the shortest encoding for `data`'s length.
    /// Use this when constructing tokens outside the parser, where there is
    /// no source encoding to preserve.
    pub fn push_data(data: Vec<u8>) -> Self {
        let encoding = PushEncoding::minimal_for(data.len());
        Token::PushData(data, encoding)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::PushData(data, _) => {
                write!(f, "<")?;
                for byte in data {
                    write!(f, "{byte:02x}")?;
                }
                write!(f, ">")
            }
            Token::Op(opcode) => write!(f, "{opcode}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_push_data() {
        let token = Token::push_data(vec![0x89, 0xab, 0xcd, 0xef]);
        assert_eq!(format!("{token}"), "<89abcdef>");
    }

    #[test]
    fn display_empty_push_data() {
        let token = Token::push_data(vec![]);
        assert_eq!(format!("{token}"), "<>");
    }

    #[test]
    fn display_opcode() {
        let token = Token::Op(Opcode::OpDup);
        assert_eq!(format!("{token}"), "OP_DUP");
    }

    #[test]
    fn minimal_encoding_picks_narrowest_width() {
        assert_eq!(PushEncoding::minimal_for(0x4b), PushEncoding::Direct);
        assert_eq!(PushEncoding::minimal_for(0x4c), PushEncoding::PushData1);
        assert_eq!(PushEncoding::minimal_for(0x100), PushEncoding::PushData2);
        assert_eq!(PushEncoding::minimal_for(0x1_0000), PushEncoding::PushData4);
    }
}
