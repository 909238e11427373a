//! Notes Control - CLI client for the notes formatter
//!
//! Submits raw notes to notesd and shows the formatted result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notes_common::{render, FormatResponse, NormalizedResult, RenderedView, ViewKind, DEFAULT_SERVER_URL};
use notesctl::actions::{self, CopyTarget};
use notesctl::client::NotesClient;
use notesctl::errors::{SubmitError, EXIT_GENERAL_ERROR};
use notesctl::progress::{ProgressRotor, TerminalSink};
use notesctl::submit::{validate_notes, Submitter};
use owo_colors::OwoColorize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

#[derive(Parser)]
#[command(name = "notesctl")]
#[command(about = "Notes Formatter - turn raw meeting notes into a structured summary", long_about = None)]
#[command(version)]
struct Cli {
    /// notesd base URL
    #[arg(long, global = true, default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format notes from a file or stdin
    Format {
        /// Notes file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Give up waiting after this many seconds
        #[arg(long, default_value_t = 300)]
        timeout: u64,

        /// Also write the rendered view as an HTML page
        #[arg(long)]
        html: Option<PathBuf>,

        /// Save the structured JSON into this directory
        #[arg(long)]
        download: Option<PathBuf>,

        /// Copy the result to the clipboard
        #[arg(long, value_enum)]
        copy: Option<CopyTarget>,

        /// Print the server response as-is
        #[arg(long)]
        raw: bool,
    },

    /// Render a saved /api/format response
    Render {
        /// Response JSON file (reads stdin when omitted)
        file: Option<PathBuf>,

        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Show daemon health
    Health,

    /// Transcribe an audio file
    Transcribe {
        file: PathBuf,

        /// Audio content type
        #[arg(long, default_value = "audio/webm")]
        content_type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let client = NotesClient::new(&cli.server);

    match cli.command {
        Commands::Format {
            file,
            timeout,
            html,
            download,
            copy,
            raw,
        } => {
            let notes = read_input(file.as_deref())?;
            let result = match submit(&client, &notes, Duration::from_secs(timeout)).await {
                Ok(result) => result,
                Err(e) => {
                    eprintln!("{}  {}", "[notes]".bright_red(), e);
                    std::process::exit(e.exit_code());
                }
            };

            if raw {
                println!("{}", result.text);
                return Ok(());
            }

            let view = render(&result);
            print_view(&view);
            apply_actions(&view, html.as_deref(), download.as_deref(), copy)
        }
        Commands::Render { file, html } => {
            let input = read_input(file.as_deref())?;
            let response: FormatResponse =
                serde_json::from_str(&input).context("Input is not a /api/format response")?;
            let view = render(&NormalizedResult::from(response));
            print_view(&view);
            apply_actions(&view, html.as_deref(), None, None)
        }
        Commands::Health => {
            let health = client.health().await?;
            println!(
                "{}  {} v{}  up {}s",
                "[notes]".bright_cyan(),
                health.status.bright_green(),
                health.version,
                health.uptime_seconds
            );
            println!("        workflow:      {}", configured(health.workflow_configured));
            println!(
                "        transcription: {}",
                configured(health.transcription_configured)
            );
            Ok(())
        }
        Commands::Transcribe { file, content_type } => {
            let audio = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let reply = client.transcribe(audio, &content_type).await?;
            println!("{}", reply);
            Ok(())
        }
    }
}

/// Validate first so empty input never starts the rotor or a request
async fn submit(
    client: &NotesClient,
    notes: &str,
    timeout: Duration,
) -> Result<NormalizedResult, SubmitError> {
    let notes = validate_notes(notes)?;
    let submitter = Submitter::new(timeout);
    let rotor = ProgressRotor::default();
    let mut sink = TerminalSink::new();

    rotor
        .run_until(&mut sink, submitter.submit(client, notes))
        .await
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn print_view(view: &RenderedView) {
    let label = match view.kind() {
        ViewKind::Structured => "meeting synthesis",
        ViewKind::Plain => "formatted notes",
    };
    println!("{}  {}\n", "[notes]".bright_cyan(), label.dimmed());
    println!("{}", view.copy_text());
}

fn apply_actions(
    view: &RenderedView,
    html: Option<&Path>,
    download: Option<&Path>,
    copy: Option<CopyTarget>,
) -> Result<()> {
    if let Some(path) = html {
        actions::save_html(view, path)?;
        eprintln!("{}  wrote {}", "[notes]".bright_cyan(), path.display());
    }

    if let Some(dir) = download {
        match actions::save_download(view, dir)? {
            Some(path) => eprintln!("{}  saved {}", "[notes]".bright_cyan(), path.display()),
            None => eprintln!(
                "{}  plain result, no JSON to download",
                "[notes]".bright_yellow()
            ),
        }
    }

    if let Some(target) = copy {
        match actions::copy_payload(view, target) {
            Some(text) => {
                if let Err(e) = actions::copy_to_clipboard(&text) {
                    eprintln!("{}  {:#}", "[notes]".bright_red(), e);
                    std::process::exit(EXIT_GENERAL_ERROR);
                }
                eprintln!("{}  copied to clipboard", "[notes]".bright_cyan());
            }
            None => eprintln!(
                "{}  plain result, no JSON to copy",
                "[notes]".bright_yellow()
            ),
        }
    }

    Ok(())
}

fn configured(flag: bool) -> String {
    if flag {
        "configured".bright_green().to_string()
    } else {
        "not configured".bright_yellow().to_string()
    }
}
