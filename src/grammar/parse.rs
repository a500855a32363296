use super::{Grammar, GrammarError, EPSILON};

impl Grammar {
    /// Builds a grammar from its textual form: one rule per line,
    /// `N -> alt1 | alt2`, symbols separated by whitespace. A line starting
    /// with `|` continues the previous rule. A name is a nonterminal exactly
    /// when it appears on a left side; the first left side is the start
    /// symbol. An empty alternative is stored as the single-symbol sequence
    /// EPSILON.
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        let mut g = Self::new();

        let mut raw_productions: Vec<(usize, &str)> = Vec::new();

        let mut previous_left: Option<usize> = None;
        for (i, line) in grammar.lines().enumerate() {
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let parts: Vec<&str> = line.split("->").collect();
            if parts.len() > 2 {
                return Err(GrammarError::Syntax {
                    line: i + 1,
                    message: "too many \"->\"".to_string(),
                });
            }
            let (left, rights): (usize, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.is_empty() {
                    return Err(GrammarError::Syntax {
                        line: i + 1,
                        message: "empty left side".to_string(),
                    });
                } else if left_str.split_whitespace().count() != 1 {
                    return Err(GrammarError::Syntax {
                        line: i + 1,
                        message: "left side contains whitespace".to_string(),
                    });
                }
                (
                    if let Some(idx) = g.get_symbol_index(left_str) {
                        idx
                    } else {
                        g.add_non_terminal(left_str)
                    },
                    parts[1].trim(),
                )
            } else {
                match (previous_left, parts[0].trim().strip_prefix('|')) {
                    (Some(idx), Some(rest)) => (idx, rest.trim()),
                    (None, _) => {
                        return Err(GrammarError::Syntax {
                            line: i + 1,
                            message: "cannot find left side".to_string(),
                        });
                    }
                    (_, None) => {
                        return Err(GrammarError::Syntax {
                            line: i + 1,
                            message: "expected \"->\" or \"|\"".to_string(),
                        });
                    }
                }
            };

            previous_left = Some(left);

            raw_productions.push((left, rights));
        }

        let epsilon_idx = g.get_symbol_index(EPSILON).unwrap();
        for (left, rights) in raw_productions {
            for right in rights.split('|') {
                let mut symbols: Vec<usize> = right
                    .split_whitespace()
                    .map(|s| {
                        if let Some(idx) = g.get_symbol_index(s) {
                            idx
                        } else {
                            g.add_terminal(s.to_string())
                        }
                    })
                    .collect();
                if symbols.is_empty() {
                    symbols.push(epsilon_idx);
                }
                g.add_production(left, symbols);
            }
        }

        let start_symbol: Option<usize> = if let Some(nt) = g.non_terminal_iter().next() {
            Some(g.symbol_table[&nt.name])
        } else {
            None
        };
        g.start_symbol = start_symbol;

        Ok(g)
    }
}
