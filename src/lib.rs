extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

mod grammar;
pub use grammar::{Grammar, GrammarError, ParseOutcome, ParseStep, ParseTrace, PredictiveTable};

fn build_predictive_table(grammar: &str) -> Result<(Grammar, PredictiveTable), GrammarError> {
    let g = Grammar::parse(grammar)?;
    let mut g = g.eliminate_left_recursion();
    let table = g.generate_predictive_table()?;
    Ok((g, table))
}

#[wasm_bindgen]
pub fn nullable_first_follow_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(mut g) => {
            g.calculate_nullable_first_follow();
            g.to_non_terminal_output_vec().to_json()
        }
        Err(e) => format!("{{\"error\":\"{}\"}}", e),
    }
}

#[wasm_bindgen]
pub fn predictive_table_to_json(grammar: &str) -> String {
    match build_predictive_table(grammar) {
        Ok((g, table)) => serde_json::to_string(&g.predictive_table_output(&table)).unwrap(),
        Err(e) => format!("{{\"error\":\"{}\"}}", e),
    }
}

#[wasm_bindgen]
pub fn predictive_parse_to_json(grammar: &str, input: &str) -> String {
    let trace = build_predictive_table(grammar).and_then(|(g, table)| g.predictive_parse(&table, input));
    match trace {
        Ok(trace) => serde_json::to_string(&trace).unwrap(),
        Err(e) => format!("{{\"error\":\"{}\"}}", e),
    }
}

#[cfg(test)]
mod parse_tests {
    use crate::grammar::EPSILON;

    #[test]
    fn simple_parse() {
        let g = crate::Grammar::parse("S -> a").unwrap();

        let s = g.symbol_table.get("S").unwrap().clone();
        let a = g.symbol_table.get("a").unwrap().clone();
        let epsilon = g.symbol_table.get(EPSILON).unwrap().clone();

        assert_eq!(g.get_symbol_name(s), "S");
        assert_eq!(g.get_symbol_name(a), "a");

        assert_eq!(g.symbols[epsilon].non_terminal().unwrap().nullable, true);

        assert_eq!(g.symbols[s].non_terminal().unwrap().productions[0], vec![a]);
    }

    #[test]
    fn simple_parse_with_space() {
        let g = crate::Grammar::parse("  S -> a ").unwrap();

        let s = g.symbol_table.get("S").unwrap().clone();
        let a = g.symbol_table.get("a").unwrap().clone();

        assert_eq!(g.get_symbol_name(s), "S");
        assert_eq!(g.get_symbol_name(a), "a");

        assert_eq!(g.symbols[s].non_terminal().unwrap().productions[0], vec![a]);
    }

    #[test]
    fn simple_parse_with_space_and_newline() {
        let g = crate::Grammar::parse("  S -> a \n | b c").unwrap();

        let s = g.symbol_table.get("S").unwrap().clone();
        let a = g.symbol_table.get("a").unwrap().clone();
        let b = g.symbol_table.get("b").unwrap().clone();
        let c = g.symbol_table.get("c").unwrap().clone();

        assert_eq!(g.get_symbol_name(s), "S");
        assert_eq!(g.get_symbol_name(a), "a");
        assert_eq!(g.get_symbol_name(b), "b");
        assert_eq!(g.get_symbol_name(c), "c");
        assert_eq!(g.symbols[s].non_terminal().unwrap().productions[0], vec![a]);
        assert_eq!(
            g.symbols[s].non_terminal().unwrap().productions[1],
            vec![b, c]
        );
    }

    #[test]
    fn empty_alternative_becomes_epsilon() {
        let g = crate::Grammar::parse("S -> a |").unwrap();

        let s = g.symbol_table.get("S").unwrap().clone();
        let epsilon = g.symbol_table.get(EPSILON).unwrap().clone();

        assert_eq!(
            g.symbols[s].non_terminal().unwrap().productions[1],
            vec![epsilon]
        );
    }

    #[test]
    fn epsilon_alias_parse() {
        let g = crate::Grammar::parse("S -> ε").unwrap();

        let s = g.symbol_table.get("S").unwrap().clone();
        let epsilon = g.symbol_table.get(EPSILON).unwrap().clone();

        assert_eq!(
            g.symbols[s].non_terminal().unwrap().productions[0],
            vec![epsilon]
        );
    }

    #[test]
    fn empty_parse() {
        let g = crate::Grammar::parse("  \n  ").unwrap();
        assert!(g.start_symbol.is_none());
    }

    #[test]
    #[should_panic]
    fn two_rightarrows_parse() {
        let _g = crate::Grammar::parse("S -> a -> b").unwrap();
    }

    #[test]
    #[should_panic]
    fn no_left_parse() {
        let _g = crate::Grammar::parse("-> a -> b").unwrap();
    }

    #[test]
    #[should_panic]
    fn no_previous_left_parse() {
        let _g = crate::Grammar::parse("| a b\n S -> a").unwrap();
    }

    #[test]
    #[should_panic]
    fn left_contain_space() {
        let _g = crate::Grammar::parse("S a S -> x").unwrap();
    }
}

#[cfg(test)]
mod eliminate_left_recursion_tests {
    use crate::{Grammar, GrammarError};

    fn productions_of(g: &Grammar, name: &str) -> Vec<String> {
        let idx = g.get_symbol_index(name).unwrap();
        g.symbols[idx]
            .non_terminal()
            .unwrap()
            .productions
            .iter()
            .map(|p| g.production_to_vec_str(p).join(" "))
            .collect()
    }

    const EXPR: &str = "E -> E + T | T\nT -> T * F | F\nF -> ( E ) | i";

    #[test]
    fn direct_recursion() {
        let g = Grammar::parse(EXPR).unwrap();
        let g = g.eliminate_left_recursion();

        assert_eq!(productions_of(&g, "E"), vec!["T E'"]);
        assert_eq!(productions_of(&g, "E'"), vec!["+ T E'", "ϵ"]);
        assert_eq!(productions_of(&g, "T"), vec!["F T'"]);
        assert_eq!(productions_of(&g, "T'"), vec!["* F T'", "ϵ"]);
        assert_eq!(productions_of(&g, "F"), vec!["( E )", "i"]);
    }

    #[test]
    fn indirect_recursion_through_earlier_nonterminal() {
        let g = Grammar::parse("S -> A a\nA -> S b | c").unwrap();
        let g = g.eliminate_left_recursion();

        assert_eq!(productions_of(&g, "S"), vec!["A a"]);
        assert_eq!(productions_of(&g, "A"), vec!["c A'"]);
        assert_eq!(productions_of(&g, "A'"), vec!["a b A'", "ϵ"]);
    }

    #[test]
    fn input_grammar_is_not_mutated() {
        let g = Grammar::parse(EXPR).unwrap();
        let _rewritten = g.eliminate_left_recursion();

        assert_eq!(productions_of(&g, "E"), vec!["E + T", "T"]);
        assert!(g.get_symbol_index("E'").is_none());
    }

    #[test]
    fn non_recursive_grammar_unchanged() {
        let g = Grammar::parse("S -> a S b | c").unwrap();
        let g2 = g.eliminate_left_recursion();

        assert_eq!(productions_of(&g2, "S"), vec!["a S b", "c"]);
        assert_eq!(g.symbols.len(), g2.symbols.len());
    }

    #[test]
    fn explicit_order_matches_declaration_order() {
        let g = Grammar::parse(EXPR).unwrap();
        let order: Vec<usize> = g.non_terminal_iter().map(|nt| nt.index).collect();

        let by_default = g.eliminate_left_recursion();
        let by_order = g.eliminate_left_recursion_ordered(&order).unwrap();

        assert_eq!(
            by_default.to_production_output_vec().to_plaintext(),
            by_order.to_production_output_vec().to_plaintext()
        );
    }

    #[test]
    fn incomplete_order_is_rejected() {
        let g = Grammar::parse(EXPR).unwrap();

        match g.eliminate_left_recursion_ordered(&[]) {
            Err(GrammarError::InvalidEliminationOrder { .. }) => {}
            other => panic!("expected InvalidEliminationOrder, got {:?}", other),
        }
    }

    #[test]
    fn duplicated_order_is_rejected() {
        let g = Grammar::parse("S -> a").unwrap();
        let s = g.get_symbol_index("S").unwrap();

        assert!(g.eliminate_left_recursion_ordered(&[s, s]).is_err());
    }

    #[test]
    fn prime_names_stay_unique() {
        let g = Grammar::parse("E' -> x\nE -> E y | z").unwrap();
        let g = g.eliminate_left_recursion();

        assert_eq!(productions_of(&g, "E"), vec!["z E''"]);
        assert_eq!(productions_of(&g, "E''"), vec!["y E''", "ϵ"]);
    }
}



#[cfg(test)]
mod predictive_parse_tests {
    use crate::{Grammar, ParseOutcome, ParseTrace, PredictiveTable};

    fn expression_parser() -> (Grammar, PredictiveTable) {
        let mut g = Grammar::parse("E -> E + T | T\nT -> T * F | F\nF -> ( E ) | i")
            .unwrap()
            .eliminate_left_recursion();
        let table = g.generate_predictive_table().unwrap();
        (g, table)
    }

    fn run(input: &str) -> ParseTrace {
        let (g, table) = expression_parser();
        g.predictive_parse(&table, input).unwrap()
    }

    #[test]
    fn accepts_expression() {
        let trace = run("i*i+i");

        assert!(trace.outcome.is_accept());
        assert_eq!(trace.steps[0].stack, vec!["$", "E"]);
        assert_eq!(trace.steps[0].input, vec!["i", "*", "i", "+", "i", "$"]);
        assert_eq!(trace.steps[0].production, "E -> T E'");

        // the accepting step has both sides reduced to the end marker
        let last = trace.steps.last().unwrap();
        assert_eq!(last.stack, vec!["$"]);
        assert_eq!(last.input, vec!["$"]);
    }

    #[test]
    fn rejects_truncated_input_with_no_table_entry() {
        let trace = run("i+");

        assert_eq!(
            trace.outcome,
            ParseOutcome::NoTableEntry {
                non_terminal: "T".to_string(),
                lookahead: "$".to_string(),
            }
        );
    }

    #[test]
    fn rejects_unbalanced_close_with_terminal_mismatch() {
        let trace = run("i*i+i)");

        assert_eq!(
            trace.outcome,
            ParseOutcome::TerminalMismatch {
                expected: "$".to_string(),
                found: ")".to_string(),
            }
        );
    }

    #[test]
    fn epsilon_grammar_accepts_and_rejects() {
        let mut g = Grammar::parse("S -> a S | ϵ").unwrap();
        let table = g.generate_predictive_table().unwrap();

        let accepted = g.predictive_parse(&table, "aaa").unwrap();
        assert!(accepted.outcome.is_accept());

        let rejected = g.predictive_parse(&table, "aab").unwrap();
        assert_eq!(
            rejected.outcome,
            ParseOutcome::NoTableEntry {
                non_terminal: "S".to_string(),
                lookahead: "b".to_string(),
            }
        );
    }

    #[test]
    fn empty_input_of_nullable_grammar_accepts() {
        let mut g = Grammar::parse("S -> a S | ϵ").unwrap();
        let table = g.generate_predictive_table().unwrap();

        let trace = g.predictive_parse(&table, "").unwrap();
        assert!(trace.outcome.is_accept());
    }

    #[test]
    fn whitespace_tokenization_handles_multichar_terminals() {
        let mut g = Grammar::parse("S -> id + id").unwrap();
        let table = g.generate_predictive_table().unwrap();

        let trace = g.predictive_parse(&table, "id + id").unwrap();
        assert!(trace.outcome.is_accept());
    }

    #[test]
    fn trace_is_deterministic() {
        assert_eq!(run("i*i+i"), run("i*i+i"));
        assert_eq!(run("i+"), run("i+"));
    }

    #[test]
    fn expansion_steps_skip_epsilon_on_the_stack() {
        let trace = run("i");

        for step in &trace.steps {
            assert!(!step.stack.contains(&"ϵ".to_string()));
        }
        assert!(trace.outcome.is_accept());
    }
}

#[cfg(test)]
mod json_output_tests {
    #[test]
    fn parse_trace_json_round() {
        let json = crate::predictive_parse_to_json("E -> E + T | T\nT -> T * F | F\nF -> ( E ) | i", "i*i+i");
        assert!(json.contains("\"Accept\""));
    }

    #[test]
    fn conflict_is_reported_as_error_json() {
        let json = crate::predictive_table_to_json("S -> a | a b");
        assert!(json.starts_with("{\"error\":"));
    }
}
