use std::fmt;

use serde::Serialize;

/// Errors raised while loading a grammar or building a parser from it.
///
/// Everything here is fatal to constructing the generator; a rejected input
/// string is not an error but a [`super::ParseOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GrammarError {
    Syntax {
        line: usize,
        message: String,
    },
    MissingStartSymbol,
    InvalidEliminationOrder {
        detail: String,
    },
    TableConflict {
        non_terminal: String,
        terminal: String,
        first: Vec<String>,
        second: Vec<String>,
    },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::Syntax { line, message } => write!(f, "Line {}: {}", line, message),
            GrammarError::MissingStartSymbol => write!(f, "grammar has no start symbol"),
            GrammarError::InvalidEliminationOrder { detail } => {
                write!(f, "invalid elimination order: {}", detail)
            }
            GrammarError::TableConflict {
                non_terminal,
                terminal,
                first,
                second,
            } => write!(
                f,
                "parse table conflict at ({}, {}): {} -> {} vs {} -> {}",
                non_terminal,
                terminal,
                non_terminal,
                first.join(" "),
                non_terminal,
                second.join(" ")
            ),
        }
    }
}

impl std::error::Error for GrammarError {}
