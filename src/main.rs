pub mod grammar;

use std::{fs, io::BufRead};

pub use grammar::Grammar;

fn print_help() {
    println!("Usage: predictive-parser-helper [actions] outputs [options] [grammar file]");
    println!("actions:");
    println!("  elf: Eliminate left recursion");
    println!("outputs:");
    println!("  prod: Productions");
    println!("  nff: Nullable first and follow");
    println!("  ll1: LL(1) predictive parsing table");
    println!("  parse: Predictive parse of the -i input (run elf first for a");
    println!("         left-recursive grammar)");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!("  -i <symbols>: Input symbol string for parse");
}

fn main() {
    let mut actions: Vec<&str> = Vec::new();
    let mut outputs: Vec<&str> = Vec::new();
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut i: usize = 0;
    while i < args.len() && args[i] == "elf" {
        actions.push(args[i].as_str());
        i += 1;
    }
    while i < args.len() && ["prod", "nff", "ll1", "parse"].contains(&args[i].as_str()) {
        outputs.push(args[i].as_str());
        i += 1;
    }

    enum OutputFormat {
        Plain,
        LaTeX,
        Json,
    }
    let mut output_format = OutputFormat::Plain;
    let mut parse_input: Option<String> = None;

    while i < args.len() && ["-h", "--help", "-l", "-j", "-i"].contains(&args[i].as_str()) {
        if args[i] == "-h" || args[i] == "--help" {
            print_help();
            return;
        } else if args[i] == "-l" {
            output_format = OutputFormat::LaTeX;
        } else if args[i] == "-j" {
            output_format = OutputFormat::Json;
        } else if args[i] == "-i" {
            i += 1;
            if i == args.len() {
                print_help();
                return;
            }
            parse_input = Some(args[i].clone());
        }
        i += 1;
    }

    if i + 1 < args.len() || outputs.is_empty() {
        print_help();
        return;
    }

    let input: String = if i == args.len() {
        std::io::stdin()
            .lock()
            .lines()
            .map(|l| l.unwrap())
            .collect::<Vec<String>>()
            .join("\n")
    } else {
        fs::read_to_string(args[i].as_str()).expect("Failed to read file")
    };

    let mut g = match Grammar::parse(&input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    for action in actions {
        if action == "elf" {
            g = g.eliminate_left_recursion();
        }
    }

    for output in outputs {
        if output == "prod" {
            let t = g.to_production_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => serde_json::to_string(&t).unwrap(),
                }
            );
        }
        if output == "nff" {
            if !g.is_nullable_first_follow_valid() {
                g.calculate_nullable_first_follow();
            }
            let t = g.to_non_terminal_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => serde_json::to_string(&t).unwrap(),
                }
            );
        }
        if output == "ll1" || output == "parse" {
            let table = match g.generate_predictive_table() {
                Ok(table) => table,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            };
            if output == "ll1" {
                let t = g.predictive_table_output(&table);
                println!(
                    "{}",
                    match output_format {
                        OutputFormat::Plain => t.to_plaintext(),
                        OutputFormat::LaTeX => t.to_latex(),
                        OutputFormat::Json => serde_json::to_string(&t).unwrap(),
                    }
                );
            } else {
                let symbols = match &parse_input {
                    Some(symbols) => symbols.as_str(),
                    None => {
                        print_help();
                        return;
                    }
                };
                let t = match g.predictive_parse(&table, symbols) {
                    Ok(trace) => trace,
                    Err(e) => {
                        eprintln!("{}", e);
                        std::process::exit(1);
                    }
                };
                println!(
                    "{}",
                    match output_format {
                        OutputFormat::Plain => t.to_plaintext(),
                        OutputFormat::LaTeX => t.to_latex(),
                        OutputFormat::Json => serde_json::to_string(&t).unwrap(),
                    }
                );
            }
        }
    }
}
