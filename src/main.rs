use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rlox::ast_printer::AstPrinter;
use rlox::diagnostics::Diagnostics;
use rlox::interpreter::Interpreter;
use rlox::parser::Parser;
use rlox::resolver::Resolver;
use rlox::scanner;

/// Exit code for compile-time (scan/parse/resolve) failures.
const EXIT_STATIC_ERROR: i32 = 65;
/// Exit code for runtime failures.
const EXIT_RUNTIME_ERROR: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Tree-walking Lox interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Emit the token stream as JSON instead of the display format
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a single expression and prints its AST
    Parse { filename: PathBuf },

    /// Runs a script file, or starts the interactive prompt if none is given
    Run { filename: Option<PathBuf> },
}

/// Reads the contents of a file into a Vec<u8>
fn read_file(filename: &PathBuf) -> Result<Vec<u8>> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rlox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.command {
        Commands::Tokenize { filename, json } => tokenize(&filename, json),

        Commands::Parse { filename } => parse_expression(&filename),

        Commands::Run { filename } => match filename {
            Some(filename) => run_file(&filename),
            None => run_prompt(),
        },
    }
}

fn tokenize(filename: &PathBuf, json: bool) -> Result<()> {
    let buf = read_file(filename)?;

    let mut diagnostics = Diagnostics::new();
    let tokens = scanner::scan(&buf, &mut diagnostics);

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    if diagnostics.had_errors() {
        report_all(&diagnostics);
        std::process::exit(EXIT_STATIC_ERROR);
    }

    Ok(())
}

fn parse_expression(filename: &PathBuf) -> Result<()> {
    let buf = read_file(filename)?;

    let mut diagnostics = Diagnostics::new();
    let tokens = scanner::scan(&buf, &mut diagnostics);
    let expression = Parser::new(&tokens, &mut diagnostics).parse_expression();

    match expression {
        Some(expr) if !diagnostics.had_errors() => {
            println!("{}", AstPrinter.print(&expr));
            Ok(())
        }

        _ => {
            report_all(&diagnostics);
            std::process::exit(EXIT_STATIC_ERROR);
        }
    }
}

fn run_file(filename: &PathBuf) -> Result<()> {
    let buf = read_file(filename)?;
    let mut interpreter = Interpreter::new();

    let mut diagnostics = Diagnostics::new();
    let tokens = scanner::scan(&buf, &mut diagnostics);
    let statements = Parser::new(&tokens, &mut diagnostics).parse();

    // Resolution runs only over a clean parse; its diagnostics are just as
    // blocking as parse diagnostics.
    if !diagnostics.had_errors() {
        Resolver::new(&mut interpreter, &mut diagnostics).resolve(&statements);
    }

    if diagnostics.had_errors() {
        report_all(&diagnostics);
        std::process::exit(EXIT_STATIC_ERROR);
    }

    if let Err(error) = interpreter.interpret(&statements) {
        debug!("Runtime fault: {}", error);
        eprintln!("{}", error);
        std::process::exit(EXIT_RUNTIME_ERROR);
    }

    Ok(())
}

fn run_prompt() -> Result<()> {
    let mut interpreter = Interpreter::new();

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(()); // EOF
        }

        if line.trim().is_empty() {
            continue;
        }

        run_line(&mut interpreter, line.as_bytes());
    }
}

/// Execute one interactive line against the persistent interpreter.
///
/// A line that fails to parse as a statement list gets a second chance as a
/// bare expression: the same tokens are re-parsed with a fresh parser and a
/// throwaway diagnostics collector, and on success the expression's value is
/// printed. This convenience exists only here, never in batch mode.
fn run_line(interpreter: &mut Interpreter, source: &[u8]) {
    let mut diagnostics = Diagnostics::new();
    let tokens = scanner::scan(source, &mut diagnostics);
    let statements = Parser::new(&tokens, &mut diagnostics).parse();

    if !diagnostics.had_errors() {
        Resolver::new(interpreter, &mut diagnostics).resolve(&statements);

        if diagnostics.had_errors() {
            report_all(&diagnostics);
            return;
        }

        if let Err(error) = interpreter.interpret(&statements) {
            eprintln!("{}", error);
        }

        return;
    }

    // Expression fallback.
    let mut expr_diagnostics = Diagnostics::new();
    match Parser::new(&tokens, &mut expr_diagnostics).parse_expression() {
        Some(expression) => match interpreter.evaluate(&expression) {
            Ok(value) => println!("{}", value),
            Err(error) => eprintln!("{}", error),
        },

        // Not an expression either; report the statement diagnostics.
        None => report_all(&diagnostics),
    }
}

fn report_all(diagnostics: &Diagnostics) {
    for error in diagnostics.iter() {
        eprintln!("{}", error);
    }
}
