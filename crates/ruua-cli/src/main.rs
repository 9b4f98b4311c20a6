use clap::Parser;
use ruua_cli::{load_source, write_atomic, InputSpec};
use ruua_core::record::write_records;
use ruua_core::{ClassifierConfig, TierWeights};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "ruua-classify")]
#[command(about = "Merge harvested RU/UA entity records and classify their attribution")]
#[command(version)]
struct Args {
    /// Input source as [TAG=]PATH; repeat in priority order
    #[arg(long = "in", value_name = "[TAG=]PATH", required = true)]
    inputs: Vec<InputSpec>,

    /// Classified JSONL output
    #[arg(long, value_name = "PATH")]
    out: PathBuf,

    /// Corpus report (JSON)
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Supplementary located-in relations in the record schema
    #[arg(long, value_name = "PATH")]
    places: Option<PathBuf>,

    /// Maximum located-in hops for indirect evidence
    #[arg(long, env = "RUUA_MAX_DEPTH", default_value = "3")]
    max_depth: usize,

    #[arg(long, env = "RUUA_WEIGHT_STRUCTURED", default_value = "3", allow_negative_numbers = true)]
    weight_structured: i64,

    #[arg(long, env = "RUUA_WEIGHT_INDIRECT", default_value = "2", allow_negative_numbers = true)]
    weight_indirect: i64,

    #[arg(long, env = "RUUA_WEIGHT_TEXT", default_value = "1", allow_negative_numbers = true)]
    weight_text: i64,

    /// Minimum grounded third-country score for the `other` label
    #[arg(long, env = "RUUA_OTHER_MIN_SCORE", default_value = "3", allow_negative_numbers = true)]
    other_min_score: i64,

    /// Additional third-country key; repeatable
    #[arg(long = "other-country", value_name = "QID")]
    other_countries: Vec<String>,

    /// Log level (debug, info, warn, error)
    #[arg(long, env = "RUUA_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn config(&self) -> ClassifierConfig {
        let mut config = ClassifierConfig::default()
            .with_max_depth(self.max_depth)
            .with_weights(TierWeights::new(
                self.weight_structured,
                self.weight_indirect,
                self.weight_text,
            ))
            .with_other_min_score(self.other_min_score);
        for qid in &self.other_countries {
            config = config.with_other_country(qid.trim());
        }
        config
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: ruua-classify panicked");
        eprintln!(
            "  Location: {}",
            panic_info
                .location()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
        eprintln!(
            "  Message: {}",
            panic_info
                .payload()
                .downcast_ref::<&str>()
                .unwrap_or(&"<no message>")
        );
    }));

    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    info!("ruua-classify {}", env!("CARGO_PKG_VERSION"));

    // Configuration errors are fatal before any input is opened
    let config = args.config();
    config.validate()?;

    let batches = args
        .inputs
        .iter()
        .map(load_source)
        .collect::<Result<Vec<_>, _>>()?;

    let places = match &args.places {
        Some(path) => Some(load_source(&InputSpec {
            tag: "places".to_string(),
            path: path.clone(),
        })?),
        None => None,
    };

    let output = ruua_core::run(batches, places, &config)?;

    let malformed = output.report.pre_classify.malformed_dropped;
    if malformed > 0 {
        warn!("{} malformed rows skipped", malformed);
    }

    write_atomic(&args.out, |w| {
        write_records(w, &output.classified)?;
        Ok(())
    })?;
    info!("Wrote {} rows to {}", output.classified.len(), args.out.display());

    if let Some(path) = &args.report {
        write_atomic(path, |w| {
            serde_json::to_writer_pretty(&mut *w, &output.report)?;
            Ok(())
        })?;
        info!("Wrote report to {}", path.display());
    }

    for (label, count) in &output.report.after_classify.attribution_counts {
        info!("  {}: {}", label, count);
    }

    Ok(())
}
