use clap::{Args, Parser, Subcommand};
use log::{LevelFilter, debug};
use miette::{IntoDiagnostic, MietteHandlerOpts, Result};
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;
use thunkcalc_interpreter::{Session, SessionConfig};
use thunkcalc_parser::{
    ChainedSource, Diagnostics, ParseStatus, ReaderSource, SexprReductions, TokenStream, parse,
};

mod repl;

use repl::{CliError, EditorSource, ReplConfig};

#[derive(Parser)]
#[command(
    name = "thunkcalc",
    version,
    about = "A line oriented calculator language",
    long_about = "thunkcalc evaluates integer and floating point expressions, assignments and for loops, \
                  either typed at a terminal or read from files.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Raise log verbosity (-v warnings, -vv info, -vvv debug, -vvvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate programs (the default command)
    Run(RunArgs),

    /// Parse programs and print each statement as an S-expression (debug only)
    Parse {
        /// Source files to parse (use '-' or nothing to read from stdin)
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct RunArgs {
    /// Source files, read in order as one input (use '-' or nothing to read from stdin)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Treat the input as typed by a person, even when it is not a terminal
    #[arg(long, conflicts_with = "batch")]
    interactive: bool,

    /// Treat the input as one script, even when it is a terminal
    #[arg(long)]
    batch: bool,

    /// Prompt shown when reading from a terminal
    #[arg(long, value_name = "TEXT")]
    prompt: Option<String>,

    /// Do not load or save line history
    #[arg(long)]
    no_history: bool,
}

fn main() -> Result<()> {
    setup_miette_handler();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Run(args)) => handle_run_command(args),
        Some(Commands::Parse { files }) => handle_parse_command(files),
        None => handle_run_command(cli.run),
    }
}

/// Configure miette for error reporting
fn setup_miette_handler() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .tab_width(4)
                .with_cause_chain()
                .build(),
        )
    }))
    .ok();
}

/// Logging is off unless asked for; `RUST_LOG` takes precedence over `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Off,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn handle_run_command(args: RunArgs) -> Result<()> {
    let reads_stdin = args.files.iter().all(|path| is_stdin(path));
    let terminal = reads_stdin && io::stdin().is_terminal();
    let interactive = if args.interactive {
        true
    } else if args.batch {
        false
    } else {
        terminal
    };
    debug!("starting session (interactive: {interactive}, terminal: {terminal})");

    let mut session = Session::new(
        SessionConfig { interactive },
        io::stdout(),
        Diagnostics::stderr(),
    );

    let stats = if terminal && interactive {
        let mut config = ReplConfig {
            persist_history: !args.no_history,
            ..ReplConfig::default()
        };
        if let Some(prompt) = args.prompt {
            config.prompt = prompt;
        }
        session.run_with(move || EditorSource::new(config).map_err(io::Error::other))
    } else {
        session.run(open_sources(&args.files)?)
    }
    .into_diagnostic()?;

    debug!("session stats: {stats:?}");
    Ok(())
}

/// All inputs chained into one line source; stdin when there are none
fn open_sources(files: &[PathBuf]) -> std::result::Result<ChainedSource, CliError> {
    let mut source = ChainedSource::new();
    if files.is_empty() {
        source.push(ReaderSource::new(BufReader::new(io::stdin())));
    }
    for path in files {
        if is_stdin(path) {
            source.push(ReaderSource::new(BufReader::new(io::stdin())));
        } else {
            let file = File::open(path).map_err(|source| CliError::Open {
                path: path.display().to_string(),
                source,
            })?;
            source.push(ReaderSource::new(BufReader::new(file)));
        }
    }
    Ok(source)
}

fn handle_parse_command(files: Vec<PathBuf>) -> Result<()> {
    let files = if files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        files
    };
    let multiple_files = files.len() > 1;
    let mut success = true;

    for path in files {
        if multiple_files {
            println!(";; {}", path.display());
        }
        let source = open_sources(std::slice::from_ref(&path))?;
        if !print_statements(source)? {
            success = false;
        }
    }

    if !success {
        process::exit(1);
    }
    Ok(())
}

/// Print every parsed statement of one input; false if any cycle failed to parse
fn print_statements(source: ChainedSource) -> Result<bool> {
    let mut stream = TokenStream::spawn(source, false, Diagnostics::stderr()).into_diagnostic()?;
    let mut success = true;

    loop {
        let mut reductions = SexprReductions::new();
        let status = match parse(&mut stream, &mut reductions) {
            Ok(statements) => {
                if !reductions.saw_end_of_session() {
                    for statement in statements {
                        println!("{statement}");
                    }
                }
                ParseStatus::Success
            }
            Err(_) => {
                success = false;
                ParseStatus::Failure
            }
        };
        let open = stream.finish_cycle(status);
        if reductions.saw_end_of_session() || !open {
            break;
        }
    }

    stream.join();
    Ok(success)
}
