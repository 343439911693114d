use clap::{Parser, Subcommand};
use range_lang::{
    analysis::{AnalysisOptions, Analyzer, Range, Type},
    diagnostics::{emit_syntax_errors, report_analysis_error, report_io_error, report_runtime_error},
    runtime::{value::Value, Interpreter, Runtime},
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

const SOURCE_EXTENSION: &str = "rl";

#[derive(Parser, Debug)]
#[command(name = "range-lang", version, about = "Range analysis for a tiny functional language")]
struct Cli {
    /// Nested calls allowed before analysis or evaluation gives up
    /// (falls back to RANGE_LANG_MAX_DEPTH, then 256).
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Infer the result type of FUNCTION for arguments in a range
    Infer {
        file: PathBuf,
        function: String,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        arg: Range,
    },
    /// Narrow the argument range so FUNCTION can produce the target range
    Restrict {
        file: PathBuf,
        function: String,
        #[arg(long, allow_hyphen_values = true)]
        arg: Range,
        #[arg(long, allow_hyphen_values = true)]
        target: Range,
    },
    /// Evaluate FUNCTION on a concrete integer
    Run {
        file: PathBuf,
        function: String,
        #[arg(default_value_t = 0, allow_hyphen_values = true)]
        value: i64,
    },
    /// Print every function body after clause folding
    Dump { file: PathBuf },
}

impl Command {
    fn file(&self) -> &Path {
        match self {
            Command::Infer { file, .. }
            | Command::Restrict { file, .. }
            | Command::Run { file, .. }
            | Command::Dump { file } => file,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let options = AnalysisOptions::from_flag_or_env(cli.max_depth);

    let path = cli.command.file();
    if path.extension().and_then(|ext| ext.to_str()) != Some(SOURCE_EXTENSION) {
        eprintln!("Invalid file extension. Only .{SOURCE_EXTENSION} files are allowed.");
        process::exit(1);
    }

    let Some(runtime) = load_runtime(path) else {
        process::exit(1);
    };

    if !execute(&cli.command, &runtime, options) {
        process::exit(1);
    }
}

fn load_runtime(path: &Path) -> Option<Runtime> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            report_io_error(path, &err);
            return None;
        }
    };
    match Runtime::load(&source) {
        Ok(runtime) => Some(runtime),
        Err(errors) => {
            emit_syntax_errors(path, &source, &errors);
            None
        }
    }
}

fn execute(command: &Command, runtime: &Runtime, options: AnalysisOptions) -> bool {
    match command {
        Command::Infer { function, arg, .. } => {
            let analyzer = Analyzer::with_options(runtime, options);
            match analyzer.infer_function(function, Type::scalar(*arg)) {
                Ok(result) => {
                    println!("{function} :: {arg} -> {result}");
                    true
                }
                Err(err) => {
                    report_analysis_error(function, err);
                    false
                }
            }
        }
        Command::Restrict {
            function,
            arg,
            target,
            ..
        } => {
            let analyzer = Analyzer::with_options(runtime, options);
            let target = Type::scalar(*target);
            match analyzer.restrict_function(function, Type::scalar(*arg), &target) {
                Ok(narrowed) => {
                    println!("{function} :: {} -> {target}", narrowed.range());
                    true
                }
                Err(err) => {
                    report_analysis_error(function, err);
                    false
                }
            }
        }
        Command::Run {
            function, value, ..
        } => {
            let interpreter = Interpreter::with_options(runtime, options);
            match interpreter.call(function, Value::Int(*value)) {
                Ok(result) => {
                    println!("{function} {value} = {result}");
                    true
                }
                Err(err) => {
                    report_runtime_error(&err);
                    false
                }
            }
        }
        Command::Dump { .. } => {
            for (name, body) in runtime.functions() {
                println!("{name} = {body}");
            }
            true
        }
    }
}
