use num_traits::{FromPrimitive, ToPrimitive};
use num_derive::{FromPrimitive, ToPrimitive};
use util::{EnumFromStr, MnemonicName, ParseEnumError};
use util_derive::{EnumFromStr, MnemonicName};

/// The stack machine's instruction set.
///
/// Every variant is a fixed-width code word; any other 16-bit value
/// appearing in the instruction stream is a data value or immediate, not
/// an opcode. Mnemonic text is matched case-insensitively; the canonical
/// form returned by [`OpCode::decode`] is always lowercase.
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, ToPrimitive, FromPrimitive, MnemonicName, EnumFromStr,
)]
pub enum OpCode {
    /// No-op.
    Nop,
    /// Pop `a`, pop `b`, push `b + a`.
    Add,
    /// Pop `a`, pop `b`, push `b - a` (top-minus-next is the documented oddity).
    Sub,
    /// Pop `a`, pop `b`, push `b & a`.
    And,
    /// Pop `a`, pop `b`, push `b | a`.
    Or,
    /// Pop `a`, pop `b`, push `b ^ a`.
    Xor,
    /// Pop `a`, push its bitwise complement.
    Not,
    /// Read one byte from standard input, push it zero-extended.
    In,
    /// Pop `a`, write its low byte to standard output.
    Out,
    /// Pop `a`, push `memory[a]`.
    Load,
    /// Pop `a`, pop `b`, `memory[a] := b`.
    Stor,
    /// Pop `a`, `ip := a + CODE_BASE`.
    Jmp,
    /// Pop `a`, pop `b`; if `a == 0` then `ip := b + CODE_BASE`.
    Jz,
    /// Push `memory[ip]`; `ip++` (the next code word is an immediate).
    Push,
    /// Duplicate the top of stack.
    Dup,
    /// Swap the top two stack entries.
    Swap,
    /// Rotate the top three entries: `(a, b, c) -> (b, c, a)` with `c` on top.
    Rol3,
    /// Pop `a`, write its decimal representation followed by a newline.
    Outnum,
    /// Pop `a`, pop `b`; if `a != 0` then `ip := b + CODE_BASE`.
    Jnz,
    /// Pop and discard the top of stack.
    Drop,
    /// Pop `a`, push its two's-complement negation.
    Compl,
    /// `cnt += 1`.
    Cinc,
    /// `cnt -= 1`.
    Cdec,
    /// Push `cnt`.
    Cts,
    /// Pop `a`, `cnt := a`.
    Stc,
    /// Halt: `running := false`.
    Term,
    /// Present in later revisions only. Pop `a`, pop `b`, push `b * a` (mod 2^16).
    Mul,
}

/// Error produced by the [`OpCode`] name/code conversions of §4.1.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum OpcodeError {
    /// `encode` was given text that is not a known mnemonic.
    UnknownMnemonic(String),
    /// `decode` was given a 16-bit value with no corresponding opcode.
    UnknownCode(u16),
}

impl std::fmt::Display for OpcodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OpcodeError::UnknownMnemonic(name) => {
                write!(f, "could not decode instruction '{}'", name)
            }
            OpcodeError::UnknownCode(code) => {
                write!(f, "could not decode instruction {:#06x}", code)
            }
        }
    }
}

impl std::error::Error for OpcodeError {}

impl From<ParseEnumError> for OpcodeError {
    fn from(err: ParseEnumError) -> Self {
        OpcodeError::UnknownMnemonic(err.value)
    }
}

impl OpCode {
    /// Looks up the opcode for a mnemonic, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use vcpu::opcode::OpCode;
    /// assert_eq!(OpCode::encode("ADD").unwrap(), 1);
    /// assert_eq!(OpCode::encode("add").unwrap(), 1);
    /// ```
    pub fn encode(name: &str) -> Result<u16, OpcodeError> {
        let op = <OpCode as EnumFromStr>::from_str(name)?;
        Ok(op.to_u16().expect("OpCode always fits in u16"))
    }

    /// Looks up the canonical, lowercase mnemonic for a code, used for
    /// tracing only (§4.1).
    ///
    /// # Examples
    ///
    /// ```
    /// use vcpu::opcode::OpCode;
    /// assert_eq!(OpCode::decode(1).unwrap(), "add");
    /// ```
    pub fn decode(code: u16) -> Result<&'static str, OpcodeError> {
        OpCode::from_u16(code)
            .map(|op| op.mnemonic())
            .ok_or(OpcodeError::UnknownCode(code))
    }

    /// True if `name` (case-insensitively) names a known mnemonic.
    pub fn is_mnemonic(name: &str) -> bool {
        <OpCode as EnumFromStr>::from_str(name).is_ok()
    }

    /// True if `code` is a known opcode value.
    pub fn is_opcode(code: u16) -> bool {
        OpCode::from_u16(code).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_known_ordering() {
        assert_eq!(OpCode::encode("nop").unwrap(), 0);
        assert_eq!(OpCode::encode("add").unwrap(), 1);
        assert_eq!(OpCode::encode("in").unwrap(), 7);
        assert_eq!(OpCode::encode("jmp").unwrap(), 11);
        assert_eq!(OpCode::encode("load").unwrap(), 9);
        assert_eq!(OpCode::encode("term").unwrap(), 25);
        assert_eq!(OpCode::encode("mul").unwrap(), 26);
    }

    #[test]
    fn encode_is_case_insensitive() {
        assert_eq!(OpCode::encode("ADD").unwrap(), OpCode::encode("add").unwrap());
        assert_eq!(OpCode::encode("Jmp").unwrap(), OpCode::encode("JMP").unwrap());
    }

    #[test]
    fn decode_round_trips_canonical_lowercase() {
        for name in ["nop", "add", "sub", "outnum", "term", "mul"] {
            let code = OpCode::encode(name).unwrap();
            assert_eq!(OpCode::decode(code).unwrap(), name);
        }
    }

    #[test]
    fn unknown_mnemonic_is_an_error() {
        assert!(OpCode::encode("frobnicate").is_err());
        assert!(!OpCode::is_mnemonic("frobnicate"));
    }

    #[test]
    fn unknown_code_is_an_error() {
        assert!(OpCode::decode(9999).is_err());
        assert!(!OpCode::is_opcode(9999));
        assert!(OpCode::is_opcode(26));
        assert!(!OpCode::is_opcode(27));
    }
}
