use std::path::PathBuf;

use anyhow::Context;
use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};

use riskeval::config::AppConfig;
use riskeval::dataset;
use riskeval::evaluation::{evaluate, CorrectnessPolicy, EvalOptions, Report};
use riskeval::models::{AddressRecord, RiskCategory};
use riskeval::provider::{ScoreClient, ScoreProvider};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Score provider base URL (overrides SCORE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Per-call timeout in seconds (overrides SCORE_TIMEOUT_SECS)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
    /// Provider calls in flight at once (overrides EVAL_CONCURRENCY)
    #[arg(long, global = true, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    concurrency: Option<usize>,
    /// Minimum spacing between provider call starts in milliseconds (overrides REQUEST_DELAY_MS)
    #[arg(long, global = true)]
    delay_ms: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Write the full report as JSON
    #[arg(long)]
    json_out: Option<PathBuf>,
    /// Write a Prometheus text snapshot of the run counters
    #[arg(long)]
    metrics_out: Option<PathBuf>,
    /// Safe-classified-as-unsafe results tolerated for ACCEPTABLE (overrides STATUS_TOLERANCE)
    #[arg(long)]
    tolerance: Option<u32>,
    /// Score the dataset a second time and report that pass's average response time
    #[arg(long)]
    repeat: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate labeled wallets with the strict policy
    Labeled {
        /// Export of known-bad wallets (mixers, sanctioned contracts); repeatable
        #[arg(long = "bad-csv", value_name = "FILE")]
        bad_csv: Vec<PathBuf>,
        /// Export of ordinary user wallets expected to be New; repeatable
        #[arg(long = "new-csv", value_name = "FILE")]
        new_csv: Vec<PathBuf>,
        /// Leave out the built-in reference wallets
        #[arg(long)]
        no_reference: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Evaluate untagged wallets from account exports with the lenient policy
    Unlabeled {
        /// Account export files, read in order
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
        /// Maximum wallets drawn across all files (overrides UNLABELED_LIMIT)
        #[arg(long)]
        limit: Option<usize>,
        /// Category recorded as expected for every wallet
        #[arg(long, default_value = "New")]
        expected: RiskCategory,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Fetch and classify a single address
    Score { address: String },
    /// Check that the score provider is up
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;

    if let Some(url) = cli.api_url {
        config.score_api_url = url;
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs;
    }
    if let Some(n) = cli.concurrency {
        config.concurrency = n;
    }
    if let Some(ms) = cli.delay_ms {
        config.request_delay_ms = ms;
    }

    let client = ScoreClient::with_timeout(config.score_api_url.clone(), config.call_timeout())
        .context("building score provider client")?;

    tracing::info!(
        api = %client.base_url(),
        timeout_secs = config.timeout_secs,
        concurrency = config.concurrency,
        "Score provider configured"
    );

    match cli.command {
        Commands::Labeled {
            bad_csv,
            new_csv,
            no_reference,
            output,
        } => {
            let mut wallets = Vec::new();
            if !no_reference {
                wallets.extend(dataset::reference_wallets());
            }
            wallets.extend(dataset::load_labeled_many(&bad_csv, RiskCategory::Bad));
            wallets.extend(dataset::load_labeled_many(&new_csv, RiskCategory::New));

            run(wallets, CorrectnessPolicy::Strict, &config, &client, &output).await?;
        }
        Commands::Unlabeled {
            files,
            limit,
            expected,
            output,
        } => {
            let limit = limit.unwrap_or(config.unlabeled_limit);
            let wallets = dataset::load_unlabeled(&files, expected, limit);

            run(wallets, CorrectnessPolicy::Lenient, &config, &client, &output).await?;
        }
        Commands::Score { address } => {
            let record = client
                .fetch_score(&address)
                .await
                .with_context(|| format!("scoring {address}"))?;
            let category = config.classifier.classify(&record);

            let body = serde_json::json!({
                "address": address,
                "category": category,
                "record": record,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Commands::Health => {
            let health = client.health().await.context("provider health check")?;
            println!(
                "{} {}",
                health.status,
                health.timestamp.as_deref().unwrap_or_default()
            );
        }
    }

    Ok(())
}

async fn run(
    wallets: Vec<AddressRecord>,
    policy: CorrectnessPolicy,
    config: &AppConfig,
    client: &ScoreClient,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    if wallets.is_empty() {
        tracing::warn!("Dataset is empty; the report will contain no results");
    }

    let metrics_handle = match &output.metrics_out {
        Some(_) => Some(riskeval::metrics::init_metrics()?),
        None => None,
    };

    let options = EvalOptions {
        policy,
        rules: config.classifier.clone(),
        call_timeout: config.call_timeout(),
        request_delay: config.request_delay(),
        concurrency: config.concurrency,
    };

    let repeat_wallets = output.repeat.then(|| wallets.clone());
    let outcome = evaluate(wallets, client, &options).await;

    // Snapshot before any repeat pass so counters cover one pass only.
    if let (Some(handle), Some(path)) = (&metrics_handle, &output.metrics_out) {
        riskeval::metrics::write_snapshot(handle, path)?;
        tracing::info!(path = %path.display(), "Metrics snapshot written");
    }

    let tolerance = output.tolerance.unwrap_or(config.status_tolerance);
    let mut report = Report::from_outcome(&outcome, tolerance);

    if let Some(wallets) = repeat_wallets {
        tracing::info!("Starting repeat pass");
        let repeat = evaluate(wallets, client, &options).await;
        report = report.with_repeat_pass(&repeat);
    }

    println!("{report}");

    if let Some(path) = &output.json_out {
        report.write_json(path)?;
        tracing::info!(path = %path.display(), "JSON report written");
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // Logs go to stderr so the report on stdout stays clean.
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
