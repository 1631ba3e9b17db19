//! Assembler (§4.4): consumes the lexeme stream produced by the
//! [`Lexer`], maintains a label table and a queue of pending label
//! references, and back-patches forward references once the whole
//! program has been compiled.

use std::collections::HashMap;

use vcpu::OpCode;

use crate::error::Error;
use crate::lexer::{Lexeme, LexemeKind, Lexer};
use crate::source_map::{SourceMap, SourceMapItem};

struct PendingRef {
    index: usize,
    name: String,
}

/// Assembles `source` into a flat code-word image.
pub fn assemble(source: &str) -> Result<Vec<u16>, Error> {
    Ok(assemble_traced(source)?.0)
}

/// Same as [`assemble`], additionally returning a [`SourceMap`] that
/// aligns each emitted code word with the source line it came from.
pub fn assemble_traced(source: &str) -> Result<(Vec<u16>, SourceMap), Error> {
    let mut lexer = Lexer::new(source)?;
    let mut labels: HashMap<String, u16> = HashMap::new();
    let mut pending: Vec<PendingRef> = Vec::new();
    let mut code: Vec<u16> = Vec::new();
    let mut source_map: SourceMap = Vec::new();

    while lexer.has_next() {
        let lexeme = lexer.next()?;

        let word = match lexeme.kind {
            LexemeKind::Instruction => {
                log::debug!("{{INSTRUCTION {}}}", lexeme.text);
                compile_instruction(&lexeme)?
            }
            LexemeKind::Integer => {
                log::debug!("{{INTEGER {}}}", lexeme.text);
                compile_integer(&lexeme)?
            }
            LexemeKind::Label => {
                log::debug!("{{LABEL {}}}", lexeme.text);
                compile_label(&lexeme, &mut labels, code.len())?
            }
            LexemeKind::LabelRef => {
                log::debug!("{{LABELREF {}}}", lexeme.text);
                compile_label_ref(&lexeme, &labels, &mut pending, code.len())
            }
            LexemeKind::Comment => {
                log::debug!("{{COMMENT {}}}", lexeme.text);
                continue;
            }
        };

        source_map.push(SourceMapItem {
            start_line: lexeme.line,
            line_count: 1,
        });
        code.push(word);
    }

    backpatch(&mut code, &labels, &pending)?;
    Ok((code, source_map))
}

fn backpatch(
    code: &mut [u16],
    labels: &HashMap<String, u16>,
    pending: &[PendingRef],
) -> Result<(), Error> {
    for reference in pending {
        let resolved = labels
            .get(&reference.name)
            .copied()
            .ok_or_else(|| Error::UnresolvedLabel {
                name: reference.name.clone(),
            })?;
        code[reference.index] = resolved;
    }
    Ok(())
}

fn compile_instruction(lexeme: &Lexeme) -> Result<u16, Error> {
    OpCode::encode(&lexeme.text).map_err(|_| Error::UnknownMnemonic {
        text: lexeme.text.clone(),
        line: lexeme.line,
    })
}

/// Parses a radix-prefixed integer literal: `0x` hex, `0b` binary,
/// otherwise decimal. Decimal literals may carry a leading `-`; the parsed
/// value is truncated to its low 16 bits rather than rejected, the same as
/// `strconv.ParseInt(value, 10, 16)` in the original compiler.
fn compile_integer(lexeme: &Lexeme) -> Result<u16, Error> {
    let text = lexeme.text.as_str();
    let parsed = if let Some(digits) = text.strip_prefix("0x") {
        u16::from_str_radix(digits, 16)
    } else if let Some(digits) = text.strip_prefix("0b") {
        u16::from_str_radix(digits, 2)
    } else {
        return text
            .parse::<i32>()
            .map(|value| value as u16)
            .map_err(|_| Error::MalformedInteger {
                text: text.to_string(),
                line: lexeme.line,
            });
    };
    parsed.map_err(|_| Error::MalformedInteger {
        text: text.to_string(),
        line: lexeme.line,
    })
}

fn compile_label(
    lexeme: &Lexeme,
    labels: &mut HashMap<String, u16>,
    index: usize,
) -> Result<u16, Error> {
    let name = lexeme.text.trim_end_matches(':');
    if labels.contains_key(name) {
        return Err(Error::DuplicateLabel {
            name: name.to_string(),
            line: lexeme.line,
        });
    }
    labels.insert(name.to_string(), index as u16);
    Ok(OpCode::encode("nop").expect("nop is always a valid mnemonic"))
}

fn compile_label_ref(
    lexeme: &Lexeme,
    labels: &HashMap<String, u16>,
    pending: &mut Vec<PendingRef>,
    index: usize,
) -> u16 {
    let name = lexeme.text.trim_start_matches('&');
    match labels.get(name) {
        Some(&resolved) => resolved,
        None => {
            pending.push(PendingRef {
                index,
                name: name.to_string(),
            });
            0
        }
    }
}
