use std::collections::HashSet;

use crowbook_text_processing::escape;
use serde::Serialize;

use super::{Grammar, ParseOutcome, ParseTrace, PredictiveTable, EPSILON};

/// Right-aligns every column to its widest entry, ` | ` separated.
fn align_columns(rows: &[Vec<String>]) -> String {
    let width: Vec<usize> = (0..rows[0].len())
        .map(|j| rows.iter().map(|row| row[j].len()).max().unwrap())
        .collect();
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else if multiline {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self, and_sign: bool) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow &", escape::tex(self.left))
        } else {
            format!("{} \\rightarrow ", escape::tex(self.left))
        };
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| escape::tex(*s))
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        let output = left + &right;
        output.replace(EPSILON, "\\epsilon")
    }

    /// LaTeX for a table cell: terminals wrapped in `\text{}`.
    fn to_latex_cell(&self, terminal_set: &HashSet<&str>) -> String {
        self.rights
            .iter()
            .map(|right| {
                let body = right
                    .iter()
                    .map(|s| {
                        if terminal_set.contains(s) {
                            format!("\\text{{{}}}", escape::tex(*s))
                        } else {
                            escape::tex(*s).to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" \\ ")
                    .replace(EPSILON, "\\epsilon");
                format!("{} \\rightarrow {}", escape::tex(self.left), body)
            })
            .collect::<Vec<_>>()
            .join(" \\mid ")
    }
}

#[derive(Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.len())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len, true))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|s| s.to_latex(true)))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let mut productions = Vec::new();
        for symbol in self.symbols.iter().skip(1) {
            // skip(1): skip epsilon
            if let Some(non_terminal) = symbol.non_terminal() {
                let mut rights = Vec::new();
                for production in &non_terminal.productions {
                    rights.push(self.production_to_vec_str(production));
                }
                productions.push(ProductionOutput {
                    left: non_terminal.name.as_str(),
                    rights,
                });
            }
        }
        ProductionOutputVec { productions }
    }
}

#[derive(Serialize)]
struct NonTerminalOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl NonTerminalOutput<'_> {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[&str]) -> String {
            a.iter()
                .map(|s| escape::tex(*s))
                .collect::<Vec<_>>()
                .join(r"\ ")
                .replace(EPSILON, r"$\epsilon$")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Serialize)]
pub struct NonTerminalOutputVec<'a> {
    data: Vec<NonTerminalOutput<'a>>,
}

impl NonTerminalOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    pub fn to_non_terminal_output_vec(&self) -> NonTerminalOutputVec {
        let mut data = Vec::new();
        for symbol in self.symbols.iter().skip(1) {
            // skip(1): skip epsilon
            if let Some(non_terminal) = symbol.non_terminal() {
                let mut t = NonTerminalOutput {
                    name: non_terminal.name.as_str(),
                    nullable: non_terminal.nullable,
                    first: non_terminal
                        .first
                        .iter()
                        .map(|idx| self.get_symbol_name(*idx))
                        .collect(),
                    follow: non_terminal
                        .follow
                        .iter()
                        .map(|idx| self.get_symbol_name(*idx))
                        .collect(),
                };
                t.first.sort();
                t.follow.sort();

                if non_terminal.nullable {
                    t.first.push(EPSILON);
                }
                data.push(t);
            }
        }
        NonTerminalOutputVec { data }
    }
}

/// Display form of a [`PredictiveTable`]: symbol names instead of indices,
/// one row per nonterminal, one column per terminal.
#[derive(Serialize)]
pub struct ParsingTableOutput<'a> {
    terminals: Vec<&'a str>,
    rows: Vec<(&'a str, Vec<ProductionOutput<'a>>)>,
}

impl ParsingTableOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|&t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(
                row.iter()
                    .map(|production| production.to_plaintext(left.len(), false)),
            );
            output.push(line);
        }

        align_columns(&output)
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|&t| format!("\\text{{{}}}", escape::tex(t))),
        );
        let header = header.join(" & ");

        let terminal_set: HashSet<&str> = self.terminals.iter().cloned().collect();
        let mut output: Vec<String> = Vec::new();
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![escape::tex(*left).to_string()];
            line.extend(row.iter().map(|production| {
                if production.rights.is_empty() {
                    String::new()
                } else {
                    production.to_latex_cell(&terminal_set)
                }
            }));
            output.push(line.join(" & "));
        }

        let output = output.join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }
}

impl Grammar {
    pub fn predictive_table_output(&self, table: &PredictiveTable) -> ParsingTableOutput {
        let terminals: Vec<&str> = table
            .terminals()
            .iter()
            .map(|&t| self.get_symbol_name(t))
            .collect();

        let mut rows: Vec<(&str, Vec<ProductionOutput>)> = Vec::new();
        for (row, &nt_idx) in table.non_terminals().iter().enumerate() {
            let left = self.get_symbol_name(nt_idx);
            let cells: Vec<ProductionOutput> = (0..table.terminals().len())
                .map(|col| ProductionOutput {
                    left,
                    rights: match table.cell(row, col) {
                        Some(production) => vec![self.production_to_vec_str(production)],
                        None => Vec::new(),
                    },
                })
                .collect();
            rows.push((left, cells));
        }

        ParsingTableOutput { terminals, rows }
    }
}

impl ParseOutcome {
    pub fn to_plaintext(&self) -> String {
        match self {
            ParseOutcome::Accept => "accept".to_string(),
            ParseOutcome::NoTableEntry {
                non_terminal,
                lookahead,
            } => format!("reject: no production for ({}, {})", non_terminal, lookahead),
            ParseOutcome::TerminalMismatch { expected, found } => {
                format!("reject: expected {}, found {}", expected, found)
            }
        }
    }
}

impl ParseTrace {
    pub fn to_plaintext(&self) -> String {
        let mut output: Vec<Vec<String>> = vec![vec![
            "step".to_string(),
            "stack".to_string(),
            "input".to_string(),
            "production".to_string(),
        ]];
        for step in &self.steps {
            output.push(vec![
                step.step.to_string(),
                step.stack.join(" "),
                step.input.join(" "),
                step.production.clone(),
            ]);
        }

        format!("{}\n{}", align_columns(&output), self.outcome.to_plaintext())
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .steps
            .iter()
            .map(|step| {
                format!(
                    "{} & {} & {} & {}",
                    step.step,
                    escape::tex(step.stack.join(" ")),
                    escape::tex(step.input.join(" ")),
                    escape::tex(step.production.clone()).replace(EPSILON, "$\\epsilon$"),
                )
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        "\\begin{tabular}{c|l|l|l}\n".to_string()
            + "Step & Stack & Input & Production\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}\n% "
            + &self.outcome.to_plaintext()
    }
}
