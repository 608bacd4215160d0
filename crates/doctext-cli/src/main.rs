use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use doctext_core::ExtractionConfig;
use doctext_ingest::{ErrorKind, ExtractionError, Extractor, detect_format};
use tracing_subscriber::EnvFilter;

mod output;

use output::{ColorMode, ExtractionReport};

/// doctext - Extract plain text from uploaded PDF and DOCX documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log extraction details to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the text of a PDF or DOCX file
    Extract {
        /// Path to the .pdf or .docx file
        file_path: PathBuf,

        /// Write the text to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit a JSON object with file, format, character count and text
        #[arg(long)]
        json: bool,
    },

    /// Show size, extension and name of a file
    Info {
        /// Path to inspect
        file_path: PathBuf,

        /// Report I/O errors instead of printing an empty record
        #[arg(long)]
        strict: bool,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List which document formats have an extraction backend
    Backends,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let no_color = cli.no_color;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = exit_code(&e);
            if let Some(extraction) = e.downcast_ref::<ExtractionError>() {
                let color = ColorMode(!no_color && std::io::stderr().is_terminal());
                let _ = output::print_extraction_error(&mut std::io::stderr(), extraction, color);
            } else {
                eprintln!("Error: {e:#}");
            }
            code
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ExtractionConfig::load();
    tracing::debug!(?config, "resolved configuration");

    match cli.command {
        Command::Extract {
            file_path,
            output,
            json,
        } => extract(&config, &file_path, output, json, cli.no_color),
        Command::Info {
            file_path,
            strict,
            json,
        } => info(&file_path, strict, json, cli.no_color),
        Command::Backends => {
            let extractor = Extractor::from_config(&config);
            let color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());
            output::print_backends(&mut std::io::stdout(), &extractor, color)?;
            Ok(())
        }
    }
}

fn extract(
    config: &ExtractionConfig,
    file_path: &Path,
    output: Option<PathBuf>,
    json: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    let extractor = Extractor::from_config(config);
    let text = extractor.extract_text(file_path)?;
    // Extraction succeeded, so the extension was recognised.
    let format = detect_format(file_path)?;
    let chars = text.chars().count();

    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string());

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    if json {
        let report = ExtractionReport {
            file: &file_name,
            format,
            chars,
            text: &text,
        };
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
    } else {
        writeln!(writer, "{}", text)?;
    }
    writer.flush()?;

    let color = ColorMode(!no_color && std::io::stderr().is_terminal());
    output::print_extraction_summary(&mut std::io::stderr(), &file_name, format, chars, color)?;
    Ok(())
}

fn info(file_path: &Path, strict: bool, json: bool, no_color: bool) -> anyhow::Result<()> {
    let info = if strict {
        doctext_ingest::try_get_file_info(file_path)
            .map_err(|e| anyhow::anyhow!("cannot inspect {}: {}", file_path.display(), e))?
    } else {
        doctext_ingest::get_file_info(file_path)
    };

    let mut stdout = std::io::stdout();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &info)?;
        writeln!(stdout)?;
    } else {
        let color = ColorMode(!no_color && stdout.is_terminal());
        output::print_file_info(&mut stdout, &info, color)?;
    }
    Ok(())
}

/// Process exit code for an error: one code per extraction error kind,
/// 1 for anything else.
fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ExtractionError>().map(|e| e.kind()) {
        Some(ErrorKind::NotFound) => ExitCode::from(2),
        Some(ErrorKind::UnsupportedFormat) => ExitCode::from(3),
        Some(ErrorKind::BackendUnavailable) => ExitCode::from(4),
        Some(ErrorKind::ReadFailure) => ExitCode::from(5),
        Some(ErrorKind::Empty) => ExitCode::from(6),
        None => ExitCode::FAILURE,
    }
}
