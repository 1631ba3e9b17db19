use std::{error::Error, fmt};

pub type Endian = byteorder::LittleEndian;

/// Returns the canonical, lowercase mnemonic text for an opcode variant.
pub trait MnemonicName {
    fn mnemonic(&self) -> &'static str;
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseEnumError {
    pub value: String,
    pub enum_name: &'static str,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Failed to parse \"{}\" as {}.",
            &self.value, &self.enum_name
        )
    }
}

impl Error for ParseEnumError {
    fn description(&self) -> &str {
        "Failed to parse enum."
    }
}

pub trait EnumFromStr: Sized {
    fn from_str(s: &str) -> Result<Self, ParseEnumError>;
}
