//! Binary image I/O (§6): a vex image is nothing more than a flat
//! sequence of little-endian 16-bit code words, written back-to-back
//! with no header, no length prefix, and no symbol table.

use byteorder::{ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use util::Endian;

/// Reads every remaining `u16` from `reader` as a flat code-word image.
pub fn read<R: Read>(reader: &mut R) -> std::io::Result<Vec<u16>> {
    let mut words = Vec::new();
    loop {
        match reader.read_u16::<Endian>() {
            Ok(word) => words.push(word),
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(err),
        }
    }
    Ok(words)
}

/// Writes `words` to `writer` as a flat little-endian code-word image.
pub fn write<W: Write>(writer: &mut W, words: &[u16]) -> std::io::Result<()> {
    for &word in words {
        writer.write_u16::<Endian>(word)?;
    }
    Ok(())
}

pub trait ReadVexExt: Read + Sized {
    fn read_vex(&mut self) -> std::io::Result<Vec<u16>> {
        read(self)
    }
}

impl<R: Read + Sized> ReadVexExt for R {}

pub trait WriteVexExt: Write + Sized {
    fn write_vex(&mut self, words: &[u16]) -> std::io::Result<()> {
        write(self, words)
    }
}

impl<W: Write + Sized> WriteVexExt for W {}

pub fn read_file<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<u16>> {
    BufReader::new(File::open(path)?).read_vex()
}

pub fn write_file<P: AsRef<Path>>(path: P, words: &[u16]) -> std::io::Result<()> {
    BufWriter::new(File::create(path)?).write_vex(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_a_flat_image() {
        let words = vec![1u16, 0x1234, 0xFFFF, 0];
        let mut buf = Vec::new();
        write(&mut buf, &words).unwrap();
        assert_eq!(buf.len(), words.len() * 2);

        let mut cursor = Cursor::new(buf);
        let read_back = read(&mut cursor).unwrap();
        assert_eq!(read_back, words);
    }

    #[test]
    fn image_has_no_header() {
        let mut buf = Vec::new();
        write(&mut buf, &[0x0102]).unwrap();
        // little-endian: low byte first, no length prefix ahead of it.
        assert_eq!(buf, vec![0x02, 0x01]);
    }

    #[test]
    fn empty_image_round_trips() {
        let mut buf = Vec::new();
        write(&mut buf, &[]).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(read(&mut cursor).unwrap(), Vec::<u16>::new());
    }
}
