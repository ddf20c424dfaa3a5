//! Command-line host for the w65c02 execution core.
//!
//! Loads a memory image, attaches the console device to stdin/stdout and
//! runs until the program executes `STP`.

use std::env;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
#[cfg(test)]
use tempfile as _;
use tracing_subscriber::EnvFilter;
use w65c02_core::{
    boot_image, run, ConsoleDevice, CoreConfig, EntryPoint, NullTrace, RunOutcome, TraceSink,
    WriterTrace,
};

const USAGE_TEXT: &str = "\
Usage: w65c02-run <image> [options]

Options:
  --load <addr>        Load address for the image (default: 0x0000)
  --entry <addr>       Start here instead of the reset vector
  --trace <file|->     Write the bus trace to a file, or stderr with '-'
  --config <file>      Read a JSON machine configuration
  -v, --verbose        Enable debug logging
  -h, --help           Show this help message

Addresses accept 0x/$ hex or decimal. RUST_LOG overrides the log filter.

Examples:
  w65c02-run program.bin
  w65c02-run program.bin --load 0x0200 --entry 0x0200 --trace bus.log
";

#[derive(Debug, Clone, PartialEq, Eq)]
enum TraceTarget {
    Stderr,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunArgs {
    image: PathBuf,
    load: Option<u16>,
    entry: Option<u16>,
    trace: Option<TraceTarget>,
    config: Option<PathBuf>,
    verbose: bool,
}

#[derive(Debug)]
enum ParseResult {
    Run(RunArgs),
    Help,
}

fn parse_address(text: &str) -> Result<u16, String> {
    let parsed = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix('$'))
    {
        u16::from_str_radix(hex, 16)
    } else {
        text.parse::<u16>()
    };
    parsed.map_err(|_| format!("invalid address: {text}"))
}

fn option_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String, String> {
    args.next()
        .map(|value| value.to_string_lossy().into_owned())
        .ok_or_else(|| format!("missing value for {flag}"))
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut image: Option<PathBuf> = None;
    let mut load = None;
    let mut entry = None;
    let mut trace = None;
    let mut config = None;
    let mut verbose = false;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--verbose" || arg == "-v" {
            verbose = true;
            continue;
        }

        if arg == "--load" {
            load = Some(parse_address(&option_value(&mut args, "--load")?)?);
            continue;
        }

        if arg == "--entry" {
            entry = Some(parse_address(&option_value(&mut args, "--entry")?)?);
            continue;
        }

        if arg == "--trace" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --trace".to_string())?;
            trace = Some(if value == "-" {
                TraceTarget::Stderr
            } else {
                TraceTarget::File(PathBuf::from(value))
            });
            continue;
        }

        if arg == "--config" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --config".to_string())?;
            config = Some(PathBuf::from(value));
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if image.is_some() {
            return Err("multiple image paths provided".to_string());
        }
        image = Some(PathBuf::from(arg));
    }

    let image = image.ok_or_else(|| "missing image path".to_string())?;
    Ok(ParseResult::Run(RunArgs {
        image,
        load,
        entry,
        trace,
        config,
        verbose,
    }))
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "w65c02=debug" } else { "w65c02=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_config(path: &Path) -> Result<CoreConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn resolve_config(args: &RunArgs) -> Result<CoreConfig> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => CoreConfig::default(),
    };
    if let Some(load) = args.load {
        config.load_address = load;
    }
    if let Some(entry) = args.entry {
        config.entry = EntryPoint::Address(entry);
    }
    Ok(config)
}

fn open_trace(target: Option<&TraceTarget>) -> Result<Option<WriterTrace<Box<dyn Write>>>> {
    let out: Box<dyn Write> = match target {
        None => return Ok(None),
        Some(TraceTarget::Stderr) => Box::new(BufWriter::new(io::stderr().lock())),
        Some(TraceTarget::File(path)) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create trace file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
    };
    Ok(Some(WriterTrace::new(out)))
}

fn run_image(args: &RunArgs) -> Result<RunOutcome> {
    let config = resolve_config(args)?;
    let image = fs::read(&args.image)
        .with_context(|| format!("failed to read image {}", args.image.display()))?;
    let mut state = boot_image(&image, &config)
        .with_context(|| format!("failed to load image {}", args.image.display()))?;
    tracing::info!(
        image = %args.image.display(),
        len = image.len(),
        load_address = config.load_address,
        pc = state.regs.pc(),
        "booting"
    );

    let mut trace = open_trace(args.trace.as_ref())?;
    let mut console = ConsoleDevice::new(config.console, io::stdin().lock(), io::stdout().lock());
    let mut null_trace = NullTrace;
    let sink: &mut dyn TraceSink = match trace.as_mut() {
        Some(writer) => writer,
        None => &mut null_trace,
    };

    let outcome = run(&mut state, &mut console, sink);
    tracing::info!(
        instructions = outcome.instructions,
        pc = state.regs.pc(),
        "stopped"
    );

    if let Some(writer) = trace {
        writer.finish().context("failed to write bus trace")?;
    }
    if let Some(err) = console.take_error() {
        return Err(err).context("console I/O failed");
    }
    Ok(outcome)
}

fn main() -> ExitCode {
    let args = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            return ExitCode::SUCCESS;
        }
        Ok(ParseResult::Run(args)) => args,
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(args.verbose);
    match run_image(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
