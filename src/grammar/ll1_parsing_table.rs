use std::collections::HashMap;

use super::{Grammar, GrammarError};

/// Predictive parse table: at most one production per
/// (nonterminal, terminal) cell. Rows and columns hold symbol indices of the
/// grammar the table was built from, in declaration order; the end marker is
/// a regular column.
#[derive(Debug, Clone)]
pub struct PredictiveTable {
    terminals: Vec<usize>,
    non_terminals: Vec<usize>,
    cells: Vec<Vec<Option<Vec<usize>>>>,
    row_of: HashMap<usize, usize>,
    col_of: HashMap<usize, usize>,
}

impl PredictiveTable {
    pub fn terminals(&self) -> &[usize] {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &[usize] {
        &self.non_terminals
    }

    /// The production to expand for (nonterminal, lookahead terminal), if
    /// that cell is filled. Unknown symbols and empty cells are both `None`.
    pub fn production(&self, non_terminal: usize, terminal: usize) -> Option<&[usize]> {
        let row = *self.row_of.get(&non_terminal)?;
        let col = *self.col_of.get(&terminal)?;
        self.cells[row][col].as_deref()
    }

    pub(crate) fn cell(&self, row: usize, col: usize) -> Option<&[usize]> {
        self.cells[row][col].as_deref()
    }
}

impl Grammar {
    /// Builds the predictive parse table from FIRST and FOLLOW, computing
    /// them first if needed. Every terminal in FIRST(p) claims the cell
    /// (A, t) for a production `A -> p`; when p derives the empty string,
    /// every terminal in FOLLOW(A) claims it too. A cell claimed by two
    /// different productions makes the grammar non-LL(1) and is reported as
    /// [`GrammarError::TableConflict`] instead of being overwritten.
    pub fn generate_predictive_table(&mut self) -> Result<PredictiveTable, GrammarError> {
        if self.start_symbol.is_none() {
            return Err(GrammarError::MissingStartSymbol);
        }
        if !self.is_nullable_first_follow_valid() {
            self.calculate_nullable_first_follow();
        }

        let terminals: Vec<usize> = self.terminal_indices().collect();
        let non_terminals: Vec<usize> = self.non_terminal_iter().map(|nt| nt.index).collect();
        let row_of: HashMap<usize, usize> = non_terminals
            .iter()
            .enumerate()
            .map(|(row, &idx)| (idx, row))
            .collect();
        let col_of: HashMap<usize, usize> = terminals
            .iter()
            .enumerate()
            .map(|(col, &idx)| (idx, col))
            .collect();

        let mut cells: Vec<Vec<Option<Vec<usize>>>> =
            vec![vec![None; terminals.len()]; non_terminals.len()];

        for (row, &nt_idx) in non_terminals.iter().enumerate() {
            let productions = self.symbols[nt_idx]
                .non_terminal()
                .unwrap()
                .productions
                .clone();
            for production in &productions {
                let first = self.calculate_first_for_production(production);

                // walk terminals in column order so the first conflict found
                // is reproducible across runs
                let mut lookaheads: Vec<usize> = terminals
                    .iter()
                    .copied()
                    .filter(|t| first.contains(t))
                    .collect();
                if self.production_is_nullable(production) {
                    let follow = &self.symbols[nt_idx].non_terminal().unwrap().follow;
                    lookaheads.extend(
                        terminals
                            .iter()
                            .copied()
                            .filter(|t| follow.contains(t) && !first.contains(t)),
                    );
                }

                for t_idx in lookaheads {
                    let cell = &mut cells[row][col_of[&t_idx]];
                    match cell {
                        Some(existing) if *existing != *production => {
                            return Err(GrammarError::TableConflict {
                                non_terminal: self.get_symbol_name(nt_idx).to_string(),
                                terminal: self.get_symbol_name(t_idx).to_string(),
                                first: existing
                                    .iter()
                                    .map(|&s| self.get_symbol_name(s).to_string())
                                    .collect(),
                                second: production
                                    .iter()
                                    .map(|&s| self.get_symbol_name(s).to_string())
                                    .collect(),
                            });
                        }
                        Some(_) => {}
                        None => *cell = Some(production.clone()),
                    }
                }
            }
        }

        Ok(PredictiveTable {
            terminals,
            non_terminals,
            cells,
            row_of,
            col_of,
        })
    }
}
