use std::collections::HashMap;

use super::{Grammar, GrammarError, EPSILON};

impl Grammar {
    /// Rewrites the grammar so that no nonterminal is immediately or (through
    /// earlier-declared nonterminals) transitively left-recursive, using the
    /// declaration order as the elimination order. The receiver is left
    /// untouched; the rewritten grammar is returned with its
    /// nullable/first/follow caches cleared.
    pub fn eliminate_left_recursion(&self) -> Grammar {
        let order: Vec<usize> = self.non_terminal_iter().map(|nt| nt.index).collect();
        self.eliminate_in_order(&order)
    }

    /// Same rewrite with a caller-supplied elimination order.
    ///
    /// The order must list every nonterminal of the grammar exactly once.
    /// Substitution only expands nonterminals that appear *earlier* in
    /// `order`, so the order must be consistent with the grammar's
    /// substitution dependencies; an incompatible order yields a grammar that
    /// is still left-recursive, which this routine does not detect.
    pub fn eliminate_left_recursion_ordered(
        &self,
        order: &[usize],
    ) -> Result<Grammar, GrammarError> {
        let mut expected: Vec<usize> = self.non_terminal_iter().map(|nt| nt.index).collect();
        let mut given: Vec<usize> = order.to_vec();
        expected.sort_unstable();
        given.sort_unstable();
        if expected != given {
            return Err(GrammarError::InvalidEliminationOrder {
                detail: format!(
                    "order must list every nonterminal of the grammar exactly once \
                     ({} expected, {} given)",
                    expected.len(),
                    given.len()
                ),
            });
        }
        Ok(self.eliminate_in_order(order))
    }

    fn eliminate_in_order(&self, order: &[usize]) -> Grammar {
        let mut g = self.clone();
        g.reset_nullable_first_follow();

        let epsilon_idx = g.get_symbol_index(EPSILON).unwrap();
        let position: HashMap<usize, usize> = order
            .iter()
            .enumerate()
            .map(|(i, &idx)| (idx, i))
            .collect();

        for (i, &nt_idx) in order.iter().enumerate() {
            let old_productions =
                std::mem::take(&mut g.symbols[nt_idx].mut_non_terminal().unwrap().productions);

            let mut kept: Vec<Vec<usize>> = Vec::new();
            let mut recursive_tails: Vec<Vec<usize>> = Vec::new();

            for production in old_productions {
                let head_position = production
                    .first()
                    .and_then(|head| position.get(head))
                    .copied();
                match head_position {
                    // leading nonterminal already processed: splice each of
                    // its current alternatives in place of the head
                    Some(j) if j < i => {
                        let head = production[0];
                        let prefixes = g.symbols[head].non_terminal().unwrap().productions.clone();
                        for prefix in prefixes {
                            let spliced: Vec<usize> = prefix
                                .iter()
                                .chain(production.iter().skip(1))
                                .cloned()
                                .collect();
                            if spliced.first() == Some(&nt_idx) {
                                recursive_tails.push(spliced[1..].to_vec());
                            } else {
                                kept.push(spliced);
                            }
                        }
                    }
                    // direct left recursion
                    Some(j) if j == i => {
                        recursive_tails.push(production[1..].to_vec());
                    }
                    _ => kept.push(production),
                }
            }

            if !recursive_tails.is_empty() {
                let prime_name = g.get_symbol_prime_name(g.get_symbol_name(nt_idx).to_string());
                let prime_idx = g.add_non_terminal(&prime_name);
                for production in kept.iter_mut().chain(recursive_tails.iter_mut()) {
                    production.push(prime_idx);
                }
                recursive_tails.push(vec![epsilon_idx]);
                g.symbols[prime_idx].mut_non_terminal().unwrap().productions = recursive_tails;
            }
            g.symbols[nt_idx].mut_non_terminal().unwrap().productions = kept;
        }

        g
    }
}
