//! schist-parse - parse a schist source file and print its syntax tree
//!
//! Usage: `schist-parse [--quiet] <file.sch>`
//!
//! Every declaration-level error in the file is reported, not just the first.
//! `SCHIST_MAX_DEPTH` overrides the nesting limit; `RUST_LOG` controls parser
//! logging (default `warn`).

use std::env;
use std::fs;
use std::io::IsTerminal;
use std::process::ExitCode;

use schist::{render_lex_error, render_parse_error, ErrorConfig, Lexer, Parser, ParserConfig};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: schist-parse [--quiet] <file.sch>";

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut quiet = false;
    let mut path = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--quiet" | "-q" => quiet = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                return ExitCode::SUCCESS;
            }
            _ if path.is_none() => path = Some(arg),
            _ => {
                eprintln!("{}", USAGE);
                return ExitCode::from(2);
            }
        }
    }
    let Some(path) = path else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    run_file(&path, quiet)
}

fn parser_config() -> ParserConfig {
    let config = ParserConfig::default();
    match env::var("SCHIST_MAX_DEPTH") {
        Ok(value) => match value.parse::<usize>() {
            Ok(depth) if depth > 0 => config.with_max_depth(depth),
            _ => {
                warn!(value = %value, "ignoring invalid SCHIST_MAX_DEPTH");
                config
            }
        },
        Err(_) => config,
    }
}

fn run_file(path: &str, quiet: bool) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            return ExitCode::from(2);
        }
    };
    let error_config = ErrorConfig::new(std::io::stderr().is_terminal());

    let tokens = match Lexer::new(&source, path).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{}", render_lex_error(&e, &source, &error_config));
            return ExitCode::FAILURE;
        }
    };
    debug!(path, tokens = tokens.len(), "lexed");

    let mut parser = Parser::with_config(tokens, parser_config());
    let (module, errors) = parser.parse_module_recovering();

    if errors.is_empty() {
        if !quiet {
            println!("{:#?}", module);
        }
        return ExitCode::SUCCESS;
    }

    for err in &errors {
        eprintln!("{}\n", render_parse_error(err, &source, &error_config));
    }
    eprintln!(
        "{} error{} in {}",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" },
        path
    );
    ExitCode::FAILURE
}
