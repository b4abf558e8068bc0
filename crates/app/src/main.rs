use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{Clock, SurveyService};
use storage::Storage;
use survey_core::model::SurveySchema;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_IMAGE_DIR: &str = "./images";
const DEFAULT_LOG_PATH: &str = "evaluations.csv";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    EmptyPath { flag: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::EmptyPath { flag } => write!(f, "{flag} must not be empty"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_path(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<PathBuf, ArgsError> {
    let value = require_value(args, flag)?;
    if value.trim().is_empty() {
        return Err(ArgsError::EmptyPath { flag });
    }
    Ok(PathBuf::from(value))
}

struct DesktopApp {
    survey_service: Arc<SurveyService>,
    image_dir: PathBuf,
}

impl UiApp for DesktopApp {
    fn survey_service(&self) -> Arc<SurveyService> {
        Arc::clone(&self.survey_service)
    }

    fn default_image_dir(&self) -> PathBuf {
        self.image_dir.clone()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui     [--images <dir>] [--log <csv> | --db <sqlite_url>] [--verbose]");
    eprintln!("  cargo run -p app -- export [--log <csv> | --db <sqlite_url>] [--out <csv>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --images {DEFAULT_IMAGE_DIR}");
    eprintln!("  --log {DEFAULT_LOG_PATH}");
    eprintln!("  export writes to stdout unless --out is given");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SURVEY_IMAGE_DIR, SURVEY_LOG_PATH, SURVEY_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Export,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "export" => Some(Self::Export),
            _ => None,
        }
    }
}

/// Where evaluations are appended.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogTarget {
    Csv(PathBuf),
    Sqlite(String),
}

#[derive(Debug)]
struct Args {
    image_dir: PathBuf,
    log: LogTarget,
    out: Option<PathBuf>,
    verbose: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut image_dir = std::env::var("SURVEY_IMAGE_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR), PathBuf::from);
        let mut log = match std::env::var("SURVEY_DB_URL").ok() {
            Some(url) if !url.trim().is_empty() => LogTarget::Sqlite(normalize_sqlite_url(url)),
            _ => LogTarget::Csv(
                std::env::var("SURVEY_LOG_PATH")
                    .ok()
                    .filter(|value| !value.trim().is_empty())
                    .map_or_else(|| PathBuf::from(DEFAULT_LOG_PATH), PathBuf::from),
            ),
        };
        let mut out = None;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--images" => image_dir = require_path(args, "--images")?,
                "--log" => log = LogTarget::Csv(require_path(args, "--log")?),
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    log = LogTarget::Sqlite(normalize_sqlite_url(value));
                }
                "--out" => out = Some(require_path(args, "--out")?),
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            image_dir,
            log,
            out,
            verbose,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Logs go to stderr so `export` output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn open_storage(target: &LogTarget) -> Result<Storage, Box<dyn std::error::Error>> {
    match target {
        LogTarget::Csv(path) => Ok(Storage::csv(path.clone())),
        LogTarget::Sqlite(url) => {
            prepare_sqlite_file(url)?;
            Ok(Storage::sqlite(url).await?)
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with('-') => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with('-') {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing(parsed.verbose);

    let storage = open_storage(&parsed.log).await?;
    let service = Arc::new(SurveyService::new(
        Clock::default_clock(),
        SurveySchema::panoramic(),
        Arc::clone(&storage.evaluations),
    ));

    match cmd {
        Command::Ui => {
            info!(
                images = %parsed.image_dir.display(),
                log = %service.log_location(),
                "starting survey ui"
            );
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                survey_service: service,
                image_dir: parsed.image_dir,
            });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            // Explicitly disable it so the app doesn't behave like a modal window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Panoramic Image Evaluation")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Export => {
            let csv = service.export_csv().await?;
            match parsed.out {
                Some(path) => {
                    tokio::fs::write(&path, csv.as_bytes()).await?;
                    info!(out = %path.display(), "exported evaluations");
                }
                None => print!("{csv}"),
            }
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
