use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use alchm_config::Config;
use alchm_rs::{
    Clock, FetchOutcome, LunarPhase, ManualClock, PositionMap, Recommender, ScoringItem,
    SystemClock, Timestamp, ZodiacSign,
};
use alchm_time::{CalendarParts, parse_timestamp};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "alchm", about = "Alchemical alignment and compatibility scoring")]
struct Cli {
    /// JSON config file (ALCHM_* environment variables override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Evaluate at this UTC instant (YYYY-MM-DDThh:mm:ssZ) instead of now
    #[arg(long, global = true)]
    at: Option<String>,
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full alignment snapshot
    Alignment,
    /// Body positions from the source chain
    Positions,
    /// ESMS energy, elements and thermodynamics of the current positions
    Transform,
    /// Sun sign for a calendar day
    Zodiac {
        /// Month, 1-12
        month: u32,
        /// Day of month
        day: u32,
    },
    /// Lunar phase and illumination
    LunarPhase,
    /// Score items from a JSON array file, best first
    Score {
        /// Path to a JSON array of items
        items: PathBuf,
        /// Only print the best N
        #[arg(long)]
        top: Option<usize>,
        /// Treat the items as one ingredient set and report combined Kalchm
        #[arg(long)]
        set: bool,
    },
    /// Cache and source diagnostics after computing one alignment
    Diagnostics,
}

/// Output tagged with the position source that answered.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourcedReport<T: Serialize> {
    source: String,
    fell_back: bool,
    failures: Vec<String>,
    #[serde(flatten)]
    body: T,
}

impl<T: Serialize> SourcedReport<T> {
    fn new(outcome: &FetchOutcome, body: T) -> Self {
        Self {
            source: outcome.source.clone(),
            fell_back: outcome.fell_back,
            failures: outcome
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.source, f.error))
                .collect(),
            body,
        }
    }
}

#[derive(Serialize)]
struct PositionsBody<'a> {
    positions: &'a PositionMap,
}

#[derive(Serialize)]
struct ZodiacReport {
    sign: ZodiacSign,
    element: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LunarReport {
    timestamp: Timestamp,
    phase: LunarPhase,
    illumination: f64,
    cycle_fraction: f64,
}

fn fail(msg: impl Display) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

fn emit<T: Serialize>(value: &T, pretty: bool) {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match out {
        Ok(s) => println!("{s}"),
        Err(e) => fail(format!("Failed to serialize output: {e}")),
    }
}

fn init_tracing(configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new(alchm_config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_at(raw: Option<&str>) -> Option<Timestamp> {
    raw.map(|s| {
        parse_timestamp(s).unwrap_or_else(|e| fail(format!("Invalid --at value: {e}")))
    })
}

fn load_items(path: &Path) -> Vec<ScoringItem> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("Failed to read {}: {e}", path.display())));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| fail(format!("Failed to parse {}: {e}", path.display())))
}

fn main() {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())
        .unwrap_or_else(|e| fail(format!("Failed to load config: {e}")));
    init_tracing(&config.log_filter);

    // A fixed --at pins the clock so every cache and source sees one instant.
    let clock: Arc<dyn Clock> = match parse_at(cli.at.as_deref()) {
        Some(at) => Arc::new(ManualClock::new(at)),
        None => Arc::new(SystemClock),
    };
    let now = clock.now();
    let recommender = Recommender::with_clock(&config, clock)
        .unwrap_or_else(|e| fail(format!("Failed to build pipeline: {e}")));
    let calculator = recommender.calculator();

    match cli.command {
        Commands::Alignment => emit(&*recommender.current_alignment(), cli.pretty),

        Commands::Positions => {
            let outcome = recommender.chain().fetch(now, config.location().as_ref());
            let body = PositionsBody {
                positions: &outcome.positions,
            };
            emit(&SourcedReport::new(&outcome, body), cli.pretty);
        }

        Commands::Transform => {
            let outcome = recommender.chain().fetch(now, config.location().as_ref());
            let output = calculator.transform().transform(&outcome.positions);
            emit(&SourcedReport::new(&outcome, output), cli.pretty);
        }

        Commands::Zodiac { month, day } => {
            if !(1..=12).contains(&month) {
                fail(format!("Invalid month: {month} (1-12)"));
            }
            let month0 = month - 1;
            if let Err(e) = CalendarParts::validate_month_day(month0, day) {
                fail(e);
            }
            let sign = calculator.calculate_zodiac_sign(month0, day);
            emit(
                &ZodiacReport {
                    sign,
                    element: sign.element().to_string(),
                },
                cli.pretty,
            );
        }

        Commands::LunarPhase => {
            let model = calculator.lunar_model();
            emit(
                &LunarReport {
                    timestamp: now,
                    phase: calculator.calculate_lunar_phase(now),
                    illumination: model.illumination(now),
                    cycle_fraction: model.phase_fraction(now),
                },
                cli.pretty,
            );
        }

        Commands::Score { items, top, set } => {
            let items = load_items(&items);
            if set {
                emit(&recommender.score_ingredient_set(&items), cli.pretty);
            } else {
                let mut ranked = recommender.rank(&items);
                if let Some(n) = top {
                    ranked.truncate(n);
                }
                emit(&ranked, cli.pretty);
            }
        }

        Commands::Diagnostics => {
            let alignment = recommender.current_alignment();
            tracing::debug!(fingerprint = %alignment.fingerprint, "alignment ready");
            emit(&recommender.diagnostics(), cli.pretty);
        }
    }
}
