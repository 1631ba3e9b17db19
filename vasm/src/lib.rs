//! Assembler for the [vcpu](../vcpu/index.html) virtual processor.
//!
//! The source language is line-oriented but whitespace-insensitive:
//! mnemonics, integer literals, label definitions, and label references
//! can be freely interspersed, separated by any run of spaces, tabs, or
//! newlines. There are no sections and no directives — every lexeme
//! compiles to exactly one 16-bit code word, in source order, with one
//! exception: a label definition is resolved away entirely and replaced
//! by a `NOP` placeholder.
//!
//! # Lexemes
//!
//! Lexeme   | Syntax                  | Example
//! ---------|-------------------------|--------
//! Mnemonic | bare word, case-insensitive | `add`, `ADD`, `Jmp`
//! Integer  | decimal, `0x` hex, or `0b` binary | `42`, `0x2A`, `0b101010`
//! Label def | identifier followed by `:` | `loop:`
//! Label ref | `&` followed by an identifier | `&loop`
//! Comment  | `//` to end of line, or `/* ... */` | `// note`
//!
//! A mnemonic that is `push` is followed by exactly one integer lexeme,
//! which becomes the immediate word fetched when the instruction runs.
//! Label references may appear before the label they name is defined;
//! unresolved references are patched in once the whole program has
//! been scanned. Referencing a label that is never defined, or defining
//! the same label twice, is a fatal assemble error.
//!
//! # Examples
//!
//! ```
//! let code = vasm::assemble("add in jmp nop").unwrap();
//! assert_eq!(code, vec![1, 7, 11, 0]);
//! ```

mod assembler;
mod error;
mod lexer;
mod rune;
mod source_map;

pub use assembler::{assemble, assemble_traced};
pub use error::Error;
pub use lexer::{Lexeme, LexemeKind, Lexer};
pub use rune::RuneStream;
pub use source_map::{SourceMap, SourceMapItem};

pub type Result<T> = std::result::Result<T, Error>;
