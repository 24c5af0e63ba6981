//! Quickfire entrypoint: replays typed text through the trigger engine and prints the result.
use anyhow::{Context, Result};
use clap::Parser;
use core_config::load_from;
use core_events::{API_CHANGES, USER_CHANGES};
use core_text::Document;
use core_triggers::{Engine, Fired, Session, TriggerOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE_NAME: &str = "quickfire.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "quickfire", version, about = "Type-ahead trigger replay")]
struct Args {
    /// Text to type. Multiple arguments are joined with spaces; stdin is read when omitted.
    pub text: Vec<String>,
    /// Optional configuration file path (overrides discovery of `quickfire.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Locale tag used for case-insensitive matching (overrides the file's `locale`).
    #[arg(long = "locale")]
    pub locale: Option<String>,
    /// Directory receiving `quickfire.log`.
    #[arg(long = "log-dir", default_value = ".")]
    pub log_dir: PathBuf,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self, log_dir: &Path) -> Result<()> {
        let log_path = log_dir.join(LOG_FILE_NAME);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_ansi(false)
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn build_engine(args: &Args) -> Result<Engine> {
    let mut config = load_from(args.config.clone())?;
    config.override_locale(args.locale.clone());
    let engine = Engine::new(TriggerOptions::from_config(&config));
    info!(
        target: "runtime.startup",
        config_override = args.config.is_some(),
        rules = engine.rules().len(),
        longest_match_len = engine.rules().longest_match_len(),
        "engine_ready"
    );
    Ok(engine)
}

/// Type `chunks` into a fresh focused document, one grapheme per keystroke.
fn replay<I, S>(engine: &Engine, chunks: I) -> Result<(String, Vec<Fired>)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut document = Document::new("");
    document.focus(0);
    let mut session = Session::new(engine, document);
    let mut fired = Vec::new();
    for chunk in chunks {
        let chunk = chunk.as_ref();
        let mut hits = session
            .type_str(chunk)
            .context("trigger failed while typing")?;
        for hit in &hits {
            info!(target: "runtime", rule = hit.rule, cursor = hit.cursor, "trigger_applied");
        }
        fired.append(&mut hits);
    }
    let contents = session.into_document().contents();
    info!(target: "runtime", fired = fired.len(), chars = contents.chars().count(), "replay_complete");
    Ok((contents, fired))
}

fn read_stdin_lines() -> Result<Vec<String>> {
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let mut line = line.context("reading stdin")?;
        line.push('\n');
        lines.push(line);
    }
    Ok(lines)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging(&args.log_dir)?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let engine = build_engine(&args)?;
    let (output, fired) = if args.text.is_empty() {
        replay(&engine, read_stdin_lines()?)?
    } else {
        replay(&engine, [args.text.join(" ")])?
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;

    info!(
        target: "runtime",
        fired = fired.len(),
        user_changes = USER_CHANGES.load(Ordering::Relaxed),
        api_changes = API_CHANGES.load(Ordering::Relaxed),
        "shutdown"
    );
    Ok(())
}
