use serde::Serialize;

use super::{grammar::Symbol, Grammar, GrammarError, PredictiveTable, END_MARK, EPSILON};

/// Terminal state of one recognizer run. A reject carries the pair that had
/// no valid transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ParseOutcome {
    Accept,
    NoTableEntry {
        non_terminal: String,
        lookahead: String,
    },
    TerminalMismatch {
        expected: String,
        found: String,
    },
}

impl ParseOutcome {
    pub fn is_accept(&self) -> bool {
        matches!(self, ParseOutcome::Accept)
    }
}

/// One trace row: the machine state at the start of the step and the
/// production applied by it (empty unless the step was an expansion).
/// The stack reads bottom to top, the input front first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseStep {
    pub step: usize,
    pub stack: Vec<String>,
    pub input: Vec<String>,
    pub production: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseTrace {
    pub steps: Vec<ParseStep>,
    pub outcome: ParseOutcome,
}

impl Grammar {
    /// Splits an input string into candidate terminal symbols: by whitespace
    /// when the input contains any, one symbol per character otherwise. Each
    /// token is paired with its terminal index, or `None` for a token that
    /// names no terminal of the grammar; the recognizer rejects such a token
    /// when it becomes the lookahead.
    pub fn tokenize_input(&self, input: &str) -> Vec<(String, Option<usize>)> {
        let raw: Vec<String> = if input.chars().any(char::is_whitespace) {
            input.split_whitespace().map(str::to_string).collect()
        } else {
            input.chars().map(|c| c.to_string()).collect()
        };

        raw.into_iter()
            .map(|token| {
                let idx = self
                    .get_symbol_index(&token)
                    .filter(|&i| self.symbols[i].is_terminal());
                (token, idx)
            })
            .collect()
    }

    /// Runs the table-driven recognizer over `input` and returns the step
    /// trace with its Accept/Reject outcome. `table` must have been built
    /// from this grammar. Each decision is final; there is no backtracking.
    pub fn predictive_parse(
        &self,
        table: &PredictiveTable,
        input: &str,
    ) -> Result<ParseTrace, GrammarError> {
        let start_idx = self.start_symbol.ok_or(GrammarError::MissingStartSymbol)?;
        let end_idx = self.symbol_table[END_MARK];
        let epsilon_idx = self.symbol_table[EPSILON];

        let mut stack: Vec<usize> = vec![end_idx, start_idx];
        // consumed from the back
        let mut remaining: Vec<(String, Option<usize>)> = self.tokenize_input(input);
        remaining.push((END_MARK.to_string(), Some(end_idx)));
        remaining.reverse();

        let mut steps: Vec<ParseStep> = Vec::new();
        let outcome = loop {
            // the end marker sits at the bottom of the stack and at the end of
            // the input until the loop breaks, so neither is ever empty here
            let top = *stack.last().unwrap();
            let (look_name, look_idx) = remaining.last().unwrap().clone();

            let stack_snapshot: Vec<String> = stack
                .iter()
                .map(|&s| self.get_symbol_name(s).to_string())
                .collect();
            let input_snapshot: Vec<String> =
                remaining.iter().rev().map(|(name, _)| name.clone()).collect();
            let step = steps.len();

            match &self.symbols[top] {
                Symbol::Terminal(_) => {
                    if look_idx == Some(top) {
                        steps.push(ParseStep {
                            step,
                            stack: stack_snapshot,
                            input: input_snapshot,
                            production: String::new(),
                        });
                        if top == end_idx {
                            break ParseOutcome::Accept;
                        }
                        stack.pop();
                        remaining.pop();
                    } else {
                        steps.push(ParseStep {
                            step,
                            stack: stack_snapshot,
                            input: input_snapshot,
                            production: String::new(),
                        });
                        break ParseOutcome::TerminalMismatch {
                            expected: self.get_symbol_name(top).to_string(),
                            found: look_name,
                        };
                    }
                }
                Symbol::NonTerminal(_) => {
                    match look_idx.and_then(|look| table.production(top, look)) {
                        Some(production) => {
                            steps.push(ParseStep {
                                step,
                                stack: stack_snapshot,
                                input: input_snapshot,
                                production: format!(
                                    "{} -> {}",
                                    self.get_symbol_name(top),
                                    self.production_to_vec_str(production).join(" ")
                                ),
                            });
                            stack.pop();
                            for &sym in production.iter().rev() {
                                if sym != epsilon_idx {
                                    stack.push(sym);
                                }
                            }
                        }
                        None => {
                            steps.push(ParseStep {
                                step,
                                stack: stack_snapshot,
                                input: input_snapshot,
                                production: String::new(),
                            });
                            break ParseOutcome::NoTableEntry {
                                non_terminal: self.get_symbol_name(top).to_string(),
                                lookahead: look_name,
                            };
                        }
                    }
                }
            }
        };

        Ok(ParseTrace { steps, outcome })
    }
}
