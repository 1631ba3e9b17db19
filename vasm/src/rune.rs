//! Rune Stream (§4.2): a single-character lookahead iterator over a
//! character source. Finite, not restartable, consumed by exactly one
//! lexer.

use std::str::Chars;

/// Primes its lookahead on construction; `next()` returns the primed
/// character and advances.
pub struct RuneStream<'a> {
    chars: Chars<'a>,
    lookahead: Option<char>,
}

impl<'a> RuneStream<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.chars();
        let lookahead = chars.next();
        RuneStream { chars, lookahead }
    }

    /// True while more characters are available.
    pub fn has_next(&self) -> bool {
        self.lookahead.is_some()
    }

    /// Returns the current character and advances the lookahead.
    ///
    /// # Panics
    ///
    /// Panics if called when [`RuneStream::has_next`] is `false`.
    pub fn next(&mut self) -> char {
        let current = self.lookahead.expect("next() called on exhausted RuneStream");
        self.lookahead = self.chars.next();
        current
    }
}
