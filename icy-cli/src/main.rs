mod config;
mod diff;

use anyhow::Context;
use clap::Parser;
use config::load_config;
use diff::render_diff;
use icy::render_diagnostics;
use icy::render_report;
use icy::transpile;
use icy::Diagnostics;
use icy::TranspileError;
use icy::TranspileOptions;
use serde::Serialize;
use std::fs;
use std::io::stderr;
use std::io::stdin;
use std::io::stdout;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(
  name = "icy",
  version,
  about = "Turns indentation-structured C++ into braced, semicolon-terminated C++"
)]
struct Cli {
  /// File to transpile; omit for stdin.
  input: Option<PathBuf>,

  /// Output destination; omit for stdout.
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Put each synthesized closing brace on its own line instead of appending it.
  #[arg(long)]
  new_line_closers: bool,

  /// Columns counted for a tab in indentation.
  #[arg(long, value_name = "N")]
  tab_width: Option<usize>,

  /// Do not report block comments still open at end of input.
  #[arg(long)]
  allow_unterminated_block_comment: bool,

  /// Close blocks still open at end of input instead of reporting them.
  #[arg(long)]
  close_at_eof: bool,

  /// JSON file with transpile options; flags take precedence over it.
  #[arg(long, value_name = "PATH")]
  config: Option<PathBuf>,

  /// Write diagnostics, a blank line, then the output if there were no diagnostics.
  #[arg(long, conflicts_with_all = ["diff", "json"])]
  report: bool,

  /// Print changed lines instead of the output.
  #[arg(long, conflicts_with = "json")]
  diff: bool,

  /// Emit output lines and diagnostics as JSON.
  #[arg(long)]
  json: bool,

  /// Emit tracing events on stderr.
  #[arg(long)]
  trace: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
  schema_version: u32,
  output: &'a [String],
  diagnostics: &'a Diagnostics,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.trace);
  match run(&cli) {
    Ok(code) => code,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(enabled: bool) {
  if !enabled {
    return;
  }
  let _ = tracing_subscriber::fmt()
    .with_span_events(FmtSpan::CLOSE)
    .with_max_level(Level::DEBUG)
    .json()
    .with_ansi(false)
    .with_writer(stderr)
    .try_init();
}

/// Defaults, then the config file, then flags.
fn resolve_options(cli: &Cli) -> anyhow::Result<TranspileOptions> {
  let mut options = TranspileOptions::default();
  if let Some(path) = &cli.config {
    options = load_config(path)?.apply(options);
  }
  if cli.new_line_closers {
    options = options.with_preserve_line_numbers(false);
  }
  if let Some(tab_width) = cli.tab_width {
    options = options.with_tab_width(tab_width);
  }
  if cli.allow_unterminated_block_comment {
    options = options.with_unterminated_block_comment_is_error(false);
  }
  if cli.close_at_eof {
    options = options.with_close_at_end_of_input(true);
  }
  Ok(options)
}

fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
  match path {
    Some(p) => fs::read(p).with_context(|| format!("failed to read {}", p.display())),
    None => {
      let mut input = Vec::new();
      stdin()
        .read_to_end(&mut input)
        .context("failed to read stdin")?;
      Ok(input)
    }
  }
}

fn write_output(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
  match path {
    Some(p) => fs::write(p, text).with_context(|| format!("failed to write {}", p.display())),
    None => stdout()
      .write_all(text.as_bytes())
      .context("failed to write output"),
  }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
  let options = resolve_options(cli)?;
  let input_name = cli
    .input
    .as_ref()
    .map(|p| p.display().to_string())
    .unwrap_or_else(|| "<stdin>".to_string());
  let input = read_input(cli.input.as_deref())?;
  let source = std::str::from_utf8(&input)
    .map_err(TranspileError::from)
    .with_context(|| format!("failed to transpile {input_name}"))?;
  let lines: Vec<&str> = source.lines().collect();
  let transpiled = transpile(&lines, &options);
  let output = cli.output.as_deref();

  if cli.json {
    let json = serde_json::to_string_pretty(&JsonOutput {
      schema_version: 1,
      output: &transpiled.lines,
      diagnostics: &transpiled.diagnostics,
    })
    .context("failed to serialize output")?;
    write_output(output, &format!("{json}\n"))?;
  } else if cli.report {
    write_output(output, &render_report(&transpiled))?;
  } else {
    if !transpiled.is_ok() {
      eprint!("{}", render_diagnostics(&transpiled.diagnostics));
    }
    if cli.diff {
      write_output(output, &render_diff(&lines, &transpiled.lines))?;
    } else if transpiled.is_ok() {
      write_output(output, &transpiled.output())?;
    }
  }

  Ok(if transpiled.is_ok() {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  })
}
