//! Tokenizes Turing machine execution traces with the `trace-lexer` finite automaton.
//!
//! A raw trace such as `- ⊢ + ⊢ > - ab1 + 0 <` is split into lexemes, each paired with the
//! automaton state it ended in. Runs of ASCII letters and digits form a single `SYMBOL`
//! lexeme; every other character is a lexeme of its own.

use crate::fa::FiniteAutomaton;
use crate::programs::{MachineCatalog, TRACE_LEXER};
use crate::types::AutomatonError;
use std::fmt;

/// Lexeme class of a single space; dropped from the tokenized form.
pub const SPACE_CLASS: &str = "SPACE";

/// The input-symbol class of a trace character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Digit,
    Letter,
    Other(char),
}

impl CharClass {
    pub fn of(ch: char) -> Self {
        if ch.is_ascii_digit() {
            CharClass::Digit
        } else if ch.is_ascii_alphabetic() {
            CharClass::Letter
        } else {
            CharClass::Other(ch)
        }
    }

    /// The automaton input symbol for this class.
    pub fn symbol(&self) -> String {
        match self {
            CharClass::Digit => "digit".to_string(),
            CharClass::Letter => "character".to_string(),
            CharClass::Other(ch) => ch.to_string(),
        }
    }
}

/// A piece of trace text and the lexer state it was recognized in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub text: String,
    pub class: String,
}

impl Lexeme {
    pub fn new(text: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: class.into(),
        }
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {})", self.text, self.class)
    }
}

pub struct TraceLexer {
    automaton: FiniteAutomaton,
}

impl TraceLexer {
    /// Creates a lexer driven by the built-in `trace-lexer` automaton.
    pub fn new() -> Result<Self, AutomatonError> {
        Ok(Self::with_automaton(MachineCatalog::fa(TRACE_LEXER)?))
    }

    pub fn with_automaton(automaton: FiniteAutomaton) -> Self {
        Self { automaton }
    }

    /// Splits `trace` into lexemes.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Lexeme>)` in trace order, spaces included.
    /// * `Err(AutomatonError::UnexpectedCharacter)` for a character the automaton has no
    ///   transition for; the offset counts characters, not bytes.
    pub fn lex(&mut self, trace: &str) -> Result<Vec<Lexeme>, AutomatonError> {
        self.automaton.reset();

        let mut lexemes = Vec::new();
        let mut word = String::new();

        for (offset, ch) in trace.chars().enumerate() {
            let class = CharClass::of(ch);

            if let CharClass::Other(_) = class {
                if !word.is_empty() {
                    lexemes.push(Lexeme::new(std::mem::take(&mut word), self.automaton.state()));
                    self.automaton.reset();
                }
            }

            if !self.automaton.transition(&class.symbol()) {
                return Err(AutomatonError::UnexpectedCharacter(ch, offset));
            }

            match class {
                CharClass::Other(_) => {
                    lexemes.push(Lexeme::new(ch.to_string(), self.automaton.state()));
                    self.automaton.reset();
                }
                _ => word.push(ch),
            }
        }

        if !word.is_empty() {
            lexemes.push(Lexeme::new(word, self.automaton.state()));
            self.automaton.reset();
        }

        Ok(lexemes)
    }

    /// Lexes `trace` and keeps only the lexeme classes, without spaces.
    pub fn tokens(&mut self, trace: &str) -> Result<Vec<String>, AutomatonError> {
        Ok(self
            .lex(trace)?
            .into_iter()
            .filter(|lexeme| lexeme.class != SPACE_CLASS)
            .map(|lexeme| lexeme.class)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    #[test]
    fn test_char_class() {
        assert_eq!(CharClass::of('7'), CharClass::Digit);
        assert_eq!(CharClass::of('x'), CharClass::Letter);
        assert_eq!(CharClass::of('⊢'), CharClass::Other('⊢'));
        assert_eq!(CharClass::of('é'), CharClass::Other('é'));
        assert_eq!(CharClass::Letter.symbol(), "character");
        assert_eq!(CharClass::Other('<').symbol(), "<");
    }

    #[test]
    fn test_lex_single_step() {
        let mut lexer = TraceLexer::new().unwrap();

        let lexemes = lexer.lex("- ⊢ + ⊢ >").unwrap();

        assert_eq!(
            lexemes,
            vec![
                Lexeme::new("-", "READ"),
                Lexeme::new(" ", "SPACE"),
                Lexeme::new("⊢", "LEM"),
                Lexeme::new(" ", "SPACE"),
                Lexeme::new("+", "WRITE"),
                Lexeme::new(" ", "SPACE"),
                Lexeme::new("⊢", "LEM"),
                Lexeme::new(" ", "SPACE"),
                Lexeme::new(">", "MRIGHT"),
            ]
        );
    }

    #[test]
    fn test_symbols_are_grouped() {
        let mut lexer = TraceLexer::new().unwrap();

        let lexemes = lexer.lex("-ab1+⊔").unwrap();

        assert_eq!(
            lexemes,
            vec![
                Lexeme::new("-", "READ"),
                Lexeme::new("ab1", "SYMBOL"),
                Lexeme::new("+", "WRITE"),
                Lexeme::new("⊔", "BLANK"),
            ]
        );
    }

    #[test]
    fn test_trailing_symbol_is_flushed() {
        let mut lexer = TraceLexer::new().unwrap();

        let lexemes = lexer.lex("< 42").unwrap();

        assert_eq!(lexemes.last(), Some(&Lexeme::new("42", "SYMBOL")));
    }

    #[test]
    fn test_tokens_drop_spaces() {
        let mut lexer = TraceLexer::new().unwrap();

        let tokens = lexer.tokens("- ⊢ + ⊢ > - a + b <").unwrap();

        assert_eq!(
            tokens,
            vec!["READ", "LEM", "WRITE", "LEM", "MRIGHT", "READ", "SYMBOL", "WRITE", "SYMBOL", "MLEFT"]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = TraceLexer::new().unwrap();

        let err = lexer.lex("- a * b").unwrap_err();

        assert_eq!(err, AutomatonError::UnexpectedCharacter('*', 4));
        assert_eq!(err.kinds(), vec![ErrorKind::Input]);
    }

    #[test]
    fn test_lexer_is_reusable_after_error() {
        let mut lexer = TraceLexer::new().unwrap();

        assert!(lexer.lex("ab?").is_err());
        assert_eq!(lexer.lex("ab").unwrap(), vec![Lexeme::new("ab", "SYMBOL")]);
    }

    #[test]
    fn test_empty_trace() {
        let mut lexer = TraceLexer::new().unwrap();

        assert!(lexer.lex("").unwrap().is_empty());
    }
}
