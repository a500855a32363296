use std::collections::HashSet;

use super::{grammar::Symbol, Grammar, END_MARK};

impl Grammar {
    /// Runs the nullable, FIRST and FOLLOW fixed-point passes, seeding
    /// FOLLOW(start) with the end marker. Without a start symbol there is
    /// nothing to seed from and the grammar is left untouched.
    pub fn calculate_nullable_first_follow(&mut self) {
        if let Some(start_idx) = self.start_symbol {
            let end_idx = self.symbol_table[END_MARK];
            self.symbols[start_idx]
                .mut_non_terminal()
                .unwrap()
                .follow
                .insert(end_idx);
            self.calculate_nullable();
            self.calculate_first();
            self.calculate_follow();
        }
    }

    /// The seeding invariant doubles as a computed-marker: FOLLOW(start)
    /// contains the end marker exactly when the passes have run.
    pub fn is_nullable_first_follow_valid(&self) -> bool {
        match self.start_symbol {
            Some(start_idx) => self.symbols[start_idx]
                .non_terminal()
                .map(|nt| nt.follow.contains(&self.symbol_table[END_MARK]))
                .unwrap_or(false),
            None => false,
        }
    }

    pub fn reset_nullable_first_follow(&mut self) {
        for nt in self.non_terminal_iter_mut() {
            nt.nullable = false;
            nt.first = HashSet::new();
            nt.follow = HashSet::new();
        }
    }

    fn calculate_nullable(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..self.symbols.len() {
                let nullable: bool = match &self.symbols[i] {
                    Symbol::Terminal(_) => continue,
                    Symbol::NonTerminal(nt) => {
                        if nt.nullable {
                            continue;
                        }
                        nt.productions.iter().any(|production| {
                            production.iter().all(|s| match &self.symbols[*s] {
                                Symbol::Terminal(_) => false,
                                Symbol::NonTerminal(e) => e.nullable,
                            })
                        })
                    }
                };

                if nullable {
                    self.symbols[i].mut_non_terminal().unwrap().nullable = true;
                    changed = true;
                }
            }
        }
    }

    /// FIRST of a symbol sequence by the head/cascade rule. Valid once the
    /// fixed-point passes have run. The result holds terminal indices only;
    /// whether the sequence derives the empty string is
    /// [`Grammar::production_is_nullable`].
    pub fn calculate_first_for_production(&self, production: &[usize]) -> HashSet<usize> {
        let mut first: HashSet<usize> = HashSet::new();
        for (idx, symbol) in production.iter().map(|i| (*i, &self.symbols[*i])) {
            match symbol {
                Symbol::Terminal(_) => {
                    first.insert(idx);
                    break;
                }
                Symbol::NonTerminal(nt) => {
                    first.extend(nt.first.iter().cloned());
                    if !nt.nullable {
                        break;
                    }
                }
            }
        }
        first
    }

    /// True when every symbol of the sequence can derive the empty string.
    pub fn production_is_nullable(&self, production: &[usize]) -> bool {
        production.iter().all(|s| match &self.symbols[*s] {
            Symbol::Terminal(_) => false,
            Symbol::NonTerminal(nt) => nt.nullable,
        })
    }

    fn calculate_first(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..self.symbols.len() {
                let first: HashSet<usize> = match &self.symbols[i] {
                    Symbol::Terminal(_) => continue,
                    Symbol::NonTerminal(nt) => {
                        nt.productions
                            .iter()
                            .fold(HashSet::new(), |mut first, production| {
                                first.extend(self.calculate_first_for_production(production));
                                first
                            })
                    }
                };

                let nt = self.symbols[i].mut_non_terminal().unwrap();
                // sets only grow, so a cardinality check is an equality check
                if nt.first.len() != first.len() {
                    changed = true;
                    nt.first = first;
                }
            }
        }
    }

    fn calculate_follow(&mut self) {
        let rules: Vec<(usize, Vec<usize>)> = self
            .non_terminal_iter()
            .flat_map(|nt| nt.productions.iter().map(move |p| (nt.index, p.clone())))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for (left_idx, production) in &rules {
                // scan right-to-left carrying FIRST of the suffix seen so far
                let mut suffix_first: HashSet<usize> = HashSet::new();
                let mut suffix_nullable = true;
                for &sym_idx in production.iter().rev() {
                    let (nullable, first) = match &self.symbols[sym_idx] {
                        Symbol::Terminal(_) => {
                            suffix_first.clear();
                            suffix_first.insert(sym_idx);
                            suffix_nullable = false;
                            continue;
                        }
                        Symbol::NonTerminal(nt) => (nt.nullable, nt.first.clone()),
                    };

                    let mut addition = suffix_first.clone();
                    if suffix_nullable {
                        addition.extend(
                            self.symbols[*left_idx]
                                .non_terminal()
                                .unwrap()
                                .follow
                                .iter()
                                .cloned(),
                        );
                    }

                    let target = self.symbols[sym_idx].mut_non_terminal().unwrap();
                    let before = target.follow.len();
                    target.follow.extend(addition);
                    changed |= target.follow.len() != before;

                    if nullable {
                        suffix_first.extend(first);
                    } else {
                        suffix_first = first;
                        suffix_nullable = false;
                    }
                }
            }
        }
    }
}
