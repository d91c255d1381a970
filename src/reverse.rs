//! Recovers the input and output of a Turing machine run from its lexed execution trace.

use crate::lexer::{Lexeme, SPACE_CLASS};
use crate::types::{BLANK_SYMBOL, LEFT_ENDMARKER};

const READ: &str = "READ";
const WRITE: &str = "WRITE";
const MOVE_LEFT: &str = "MLEFT";
const MOVE_RIGHT: &str = "MRIGHT";

/// Walks the trace, calling `on_operand` with the head position for every symbol that follows
/// a lexeme of class `operation`.
fn replay<F>(lexemes: &[Lexeme], operation: &str, mut on_operand: F)
where
    F: FnMut(isize, &str),
{
    let mut position: isize = 0;
    let mut pending = false;

    for lexeme in lexemes.iter().filter(|l| l.class != SPACE_CLASS) {
        if pending {
            on_operand(position, &lexeme.text);
            pending = false;
        }

        match lexeme.class.as_str() {
            MOVE_LEFT => position -= 1,
            MOVE_RIGHT => position += 1,
            class => pending = class == operation,
        }
    }
}

/// The input symbols: the first symbol read in each newly visited cell after the left
/// endmarker, up to the first blank.
pub fn input_symbols(lexemes: &[Lexeme]) -> Vec<String> {
    let mut visited: Vec<String> = Vec::new();

    replay(lexemes, READ, |position, symbol| {
        if position >= 0 && position as usize >= visited.len() {
            visited.push(symbol.to_string());
        }
    });

    visited
        .into_iter()
        .skip(1)
        .take_while(|symbol| symbol != BLANK_SYMBOL)
        .collect()
}

/// Returns the input the machine ran on, as one string without separators.
pub fn extract_input(lexemes: &[Lexeme]) -> String {
    input_symbols(lexemes).concat()
}

/// Returns the tape after the left endmarker at the end of the run, trailing blanks trimmed.
pub fn extract_output(lexemes: &[Lexeme]) -> String {
    let mut tape = vec![LEFT_ENDMARKER.to_string()];
    tape.extend(input_symbols(lexemes));

    replay(lexemes, WRITE, |position, symbol| {
        if position < 0 {
            return;
        }
        let index = position as usize;
        if index >= tape.len() {
            tape.resize(index + 1, BLANK_SYMBOL.to_string());
        }
        tape[index] = symbol.to_string();
    });

    let end = tape
        .iter()
        .rposition(|symbol| symbol != BLANK_SYMBOL)
        .map_or(0, |index| index + 1)
        .max(1);

    tape[1..end].concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TraceLexer;
    use crate::programs::{MachineCatalog, BINARY_COMPLEMENT};

    fn lex(trace: &str) -> Vec<Lexeme> {
        TraceLexer::new().unwrap().lex(trace).unwrap()
    }

    #[test]
    fn test_extract_from_handwritten_trace() {
        let lexemes = lex("- ⊢ + ⊢ > - a + b > - c + c < - b + a <");

        assert_eq!(extract_input(&lexemes), "ac");
        assert_eq!(extract_output(&lexemes), "ac");
    }

    #[test]
    fn test_revisited_cells_are_not_input() {
        let lexemes = lex("- ⊢ + ⊢ > - 1 + 0 < - ⊢ + ⊢ > - 0 + 0 > - ⊔ + ⊔ <");

        assert_eq!(input_symbols(&lexemes), vec!["1"]);
        assert_eq!(extract_output(&lexemes), "0");
    }

    #[test]
    fn test_writes_past_the_input_extend_the_output() {
        let lexemes = lex("- ⊢ + ⊢ > - ⊔ + 1 > - ⊔ + 1 <");

        assert_eq!(extract_input(&lexemes), "");
        assert_eq!(extract_output(&lexemes), "11");
    }

    #[test]
    fn test_trailing_blanks_are_trimmed() {
        let lexemes = lex("- ⊢ + ⊢ > - 1 + ⊔ > - 1 + ⊔ <");

        assert_eq!(extract_input(&lexemes), "11");
        assert_eq!(extract_output(&lexemes), "");
    }

    #[test]
    fn test_extract_from_machine_run() {
        let mut machine = MachineCatalog::tm(BINARY_COMPLEMENT).unwrap();
        machine.set_input("0110").unwrap();
        assert_eq!(machine.transition_all(), Ok(true));

        let lexemes = lex(&machine.execution_trace());

        assert_eq!(extract_input(&lexemes), "0110");
        assert_eq!(extract_output(&lexemes), "1001");
    }

    #[test]
    fn test_empty_trace() {
        assert_eq!(extract_input(&[]), "");
        assert_eq!(extract_output(&[]), "");
    }
}
