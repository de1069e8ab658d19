use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};
use english_lang::interpreter::prelude::{
    ExecutionResult, Interpreter, InterpreterConfig, RuntimeError,
};
use english_lang::parser::prelude::{split_instructions, ParseError, SourceLine};
use english_lang::traits::prelude::CoreOperations;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "english")]
#[command(about = "Runs programs written as plain English sentences")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Iterations a single loop may run before it is cancelled
    #[arg(long, global = true, env = "ENGLISH_MAX_ITERATIONS")]
    max_iterations: Option<u64>,

    /// Wall-clock budget for each instruction, in milliseconds
    #[arg(long, global = true, env = "ENGLISH_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Print one JSON object per instruction
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every instruction in a file
    Run {
        /// Path to the script
        file: String,

        /// Stop at the first failed instruction
        #[arg(long)]
        fail_fast: bool,
    },
    /// Start an interactive session
    Repl,
}

impl Cli {
    fn config(&self) -> InterpreterConfig {
        let mut config = InterpreterConfig::default();
        if let Some(max) = self.max_iterations {
            config = config.with_max_loop_iterations(max);
        }
        if let Some(ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        config
    }
}

fn main() -> ExitCode {
    english_lang::init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Run { file, fail_fast }) => match run_file(&cli, file, *fail_fast) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        Some(Commands::Repl) => {
            run_repl(&cli);
            ExitCode::SUCCESS
        }
        None => {
            println!("Usage:");
            println!("  english run <file>  - run a script");
            println!("  english repl        - interactive session");
            println!("  english --help      - show all options");
            ExitCode::SUCCESS
        }
    }
}

/// Returns `Ok(false)` when `--fail-fast` was given and an instruction failed.
fn run_file(cli: &Cli, filename: &str, fail_fast: bool) -> Result<bool, String> {
    let source = fs::read_to_string(filename)
        .map_err(|e| format!("could not read '{}': {}", filename, e))?;
    let mut interpreter = Interpreter::new(cli.config());

    for line in split_instructions(&source) {
        let outcome = interpreter.execute(line.text);
        if let (Err(RuntimeError::Parse(error)), false) = (&outcome, cli.json) {
            report_parse_error(filename, &source, &line, error);
        }

        let result = ExecutionResult::from(outcome);
        print_result(&result, cli.json);
        if fail_fast && !result.is_success() {
            return Ok(false);
        }
    }
    Ok(true)
}

fn run_repl(cli: &Cli) {
    println!("English interpreter. Type 'exit' to quit.");
    let mut interpreter = Interpreter::new(cli.config());
    let stdin = io::stdin();

    loop {
        print!("english> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {
                let input = input.trim();
                if input == "exit" || input == "quit" {
                    break;
                }
                for result in interpreter.run_batch(input) {
                    print_result(&result, cli.json);
                }
            }
            Err(e) => {
                eprintln!("input error: {}", e);
                break;
            }
        }
    }
}

fn print_result(result: &ExecutionResult, json: bool) {
    if json {
        println!("{}", result.to_json());
    } else if result.is_success() {
        println!("{}", result.message);
    } else {
        eprintln!("{}", result);
    }
}

fn report_parse_error(filename: &str, source: &str, line: &SourceLine, error: &ParseError) {
    let location = error.data().location;
    let start = (line.offset + location.start).min(source.len());
    let end = (line.offset + location.end).clamp(start, source.len());
    let span = (filename, start..end);

    let report = Report::build(ReportKind::Error, span.clone())
        .with_config(Config::default().with_index_type(IndexType::Byte))
        .with_message(format!("cannot understand \"{}\"", line.text))
        .with_label(
            Label::new(span)
                .with_message(&error.data().message)
                .with_color(Color::Red),
        )
        .finish();
    if let Err(e) = report.eprint((filename, Source::from(source))) {
        eprintln!("{}", e);
    }
}
