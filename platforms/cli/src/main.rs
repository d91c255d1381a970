use automata::lexer::TraceLexer;
use automata::loader::Loader;
use automata::programs::{Definition, MachineCatalog, FILE_IO};
use automata::reverse::{extract_input, extract_output};
use automata::verifier::{verify_file_io, TraceVerifier};
use automata::{AutomatonError, FiniteAutomaton, PushdownAutomaton, TuringMachine};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Log every transition the engines make
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check system call traces (one per line) for proper single-file handling
    FileIo {
        /// Trace file; read from stdin when omitted
        file: Option<PathBuf>,
    },
    /// Split raw Turing machine traces into lexemes
    Lex {
        /// Trace file; read from stdin when omitted
        file: Option<PathBuf>,

        /// Print only the token classes, without spaces
        #[clap(short, long)]
        tokens: bool,
    },
    /// Print the tokenized traces that pass every verification stage
    Verify {
        /// Tokenized trace file; read from stdin when omitted
        file: Option<PathBuf>,
    },
    /// Recover the input and output of the runs behind raw traces
    Extract {
        /// Trace file; read from stdin when omitted
        file: Option<PathBuf>,
    },
    /// Run a machine on one input
    Run {
        /// A built-in machine name or the path of a JSON definition
        #[clap(short, long)]
        machine: String,

        /// The input: characters for a Turing machine, whitespace separated symbols otherwise
        #[clap(short, long, default_value = "")]
        input: String,

        /// Print the execution trace of a Turing machine
        #[clap(short, long)]
        trace: bool,
    },
    /// List the built-in machines, optionally filtered by name
    List {
        query: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "automata=debug"
    } else {
        "automata=warn"
    };
    let directive = match default_level.parse::<Directive>() {
        Ok(directive) => directive,
        Err(e) => {
            eprintln!("Invalid log directive: {}", e);
            std::process::exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AutomatonError> {
    match &cli.command {
        Commands::FileIo { file } => {
            let mut automaton = MachineCatalog::fa(FILE_IO)?;
            automaton.set_verbose(cli.verbose);

            for trace in tokenized_traces(file.as_deref())? {
                let verdict = if verify_file_io(&mut automaton, &trace) {
                    "proper"
                } else {
                    "improper"
                };
                println!("{}: {}", trace.join(" "), verdict);
            }
        }
        Commands::Lex { file, tokens } => {
            let mut lexer = TraceLexer::new()?;

            for trace in raw_traces(file.as_deref())? {
                if *tokens {
                    println!("{}", lexer.tokens(&trace)?.join(" "));
                } else {
                    let lexemes = lexer.lex(&trace)?;
                    let rendered: Vec<String> = lexemes.iter().map(ToString::to_string).collect();
                    println!("Trace: {:?}", trace);
                    println!("[{}]", rendered.join(", "));
                }
            }
        }
        Commands::Verify { file } => {
            let traces = tokenized_traces(file.as_deref())?;
            let mut verifier = TraceVerifier::new()?;

            for index in verifier.valid_traces(&traces) {
                println!("{}", traces[index].join(" "));
            }
        }
        Commands::Extract { file } => {
            let mut lexer = TraceLexer::new()?;

            for trace in raw_traces(file.as_deref())? {
                let lexemes = lexer.lex(&trace)?;
                println!(
                    "input: {:?}, output: {:?}",
                    extract_input(&lexemes),
                    extract_output(&lexemes)
                );
            }
        }
        Commands::Run {
            machine,
            input,
            trace,
        } => run_machine(machine, input, *trace, cli.verbose)?,
        Commands::List { query } => {
            let indices = match query {
                Some(query) => MachineCatalog::search(query),
                None => (0..MachineCatalog::count()).collect(),
            };

            for index in indices {
                let info = MachineCatalog::get_info(index)?;
                println!(
                    "{:<18} {:<4} {} states, {} transitions",
                    info.name, info.kind, info.state_count, info.transition_count
                );
            }
        }
    }

    Ok(())
}

fn run_machine(
    machine: &str,
    input: &str,
    trace: bool,
    verbose: bool,
) -> Result<(), AutomatonError> {
    let path = Path::new(machine);
    let definition = if path.is_file() {
        Loader::load_definition(path)?
    } else {
        MachineCatalog::get_by_name(machine)?.clone()
    };
    let symbols: Vec<&str> = input.split_whitespace().collect();

    match definition {
        Definition::Fa(spec) => {
            let mut automaton = FiniteAutomaton::new(spec)?;
            automaton.set_verbose(verbose);

            let complete = symbols.iter().all(|symbol| automaton.transition(symbol));
            let accepted = complete && automaton.is_final();
            println!("state: {}", automaton.state());
            println!("{}", if accepted { "accepted" } else { "rejected" });
        }
        Definition::Pda(spec) => {
            let mut automaton = PushdownAutomaton::new(spec)?;
            automaton.set_verbose(verbose);

            let accepted = automaton.transition_all(&symbols);
            println!("state: {}", automaton.state());
            println!("stack: {}", automaton.stack());
            println!("{}", if accepted { "accepted" } else { "rejected" });
        }
        Definition::Tm(spec) => {
            let mut machine = TuringMachine::new(spec)?;
            machine.set_verbose(verbose);
            machine.set_input(input)?;

            let accepted = machine.transition_all()?;
            if trace {
                println!("{}", machine.execution_trace());
            }
            println!("steps: {}", machine.step_count());
            println!("tape: {}", machine.tape_contents().join(" "));
            println!("{}", if accepted { "accepted" } else { "rejected" });
        }
    }

    Ok(())
}

/// Raw traces from `file`, or from stdin when no file is given.
fn raw_traces(file: Option<&Path>) -> Result<Vec<String>, AutomatonError> {
    match file {
        Some(path) => Loader::load_traces(path),
        None => Ok(read_stdin()?.lines().map(str::to_string).collect()),
    }
}

/// Tokenized traces from `file`, or from stdin when no file is given.
fn tokenized_traces(file: Option<&Path>) -> Result<Vec<Vec<String>>, AutomatonError> {
    match file {
        Some(path) => Loader::load_tokenized_traces(path),
        None => Ok(Loader::parse_tokenized(&read_stdin()?)),
    }
}

/// Reads all of stdin, unless it is a terminal.
fn read_stdin() -> Result<String, AutomatonError> {
    if atty::is(atty::Stream::Stdin) {
        return Err(AutomatonError::FileError(
            "No trace file given and nothing piped on stdin".to_string(),
        ));
    }

    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .map_err(|e| AutomatonError::FileError(format!("Failed to read stdin: {}", e)))?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_traces_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("traces.txt");

        let mut file = File::create(&file_path).unwrap();
        file.write_all("- ⊢ + ⊢ >\nREAD LEM  WRITE\n".as_bytes())
            .unwrap();

        assert_eq!(
            raw_traces(Some(&file_path)).unwrap(),
            vec!["- ⊢ + ⊢ >", "READ LEM  WRITE"]
        );
        assert_eq!(
            tokenized_traces(Some(&file_path)).unwrap()[1],
            vec!["READ", "LEM", "WRITE"]
        );
    }

    #[test]
    fn test_missing_trace_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("missing.txt");

        assert!(matches!(
            raw_traces(Some(&file_path)),
            Err(AutomatonError::FileError(_))
        ));
        assert!(matches!(
            tokenized_traces(Some(&file_path)),
            Err(AutomatonError::FileError(_))
        ));
    }
}
