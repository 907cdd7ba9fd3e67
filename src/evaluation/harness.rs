use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use super::tally::Metrics;
use crate::dataset;
use crate::intelligence::ClassifierRules;
use crate::models::{AddressRecord, EvaluationResult, RiskCategory};
use crate::provider::{ProviderError, ScoreProvider};

// ---------------------------------------------------------------------------
// Correctness policy
// ---------------------------------------------------------------------------

/// How a classification is judged against its expected label. Chosen once
/// per run; results of different policies are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectnessPolicy {
    /// Classified category must equal the expected one.
    Strict,
    /// For unlabeled datasets: anything except `Bad` is acceptable.
    Lenient,
}

impl CorrectnessPolicy {
    /// Judge a successful classification. Provider failures are never correct
    /// and do not go through here.
    pub fn is_correct(&self, expected: RiskCategory, classified: RiskCategory) -> bool {
        match self {
            CorrectnessPolicy::Strict => classified == expected,
            CorrectnessPolicy::Lenient => {
                !classified.is_bad() && classified != RiskCategory::Error
            }
        }
    }
}

impl fmt::Display for CorrectnessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectnessPolicy::Strict => write!(f, "strict"),
            CorrectnessPolicy::Lenient => write!(f, "lenient"),
        }
    }
}

// ---------------------------------------------------------------------------
// Options / outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EvalOptions {
    pub policy: CorrectnessPolicy,
    pub rules: ClassifierRules,
    /// Budget for a single provider call; exceeding it is a provider failure.
    pub call_timeout: Duration,
    /// Minimum spacing between the starts of consecutive provider calls,
    /// shared across all in-flight calls.
    pub request_delay: Duration,
    /// Provider calls in flight at once. 1 means strictly sequential.
    pub concurrency: usize,
}

impl EvalOptions {
    pub fn new(policy: CorrectnessPolicy) -> Self {
        Self {
            policy,
            rules: ClassifierRules::default(),
            call_timeout: Duration::from_secs(30),
            request_delay: Duration::ZERO,
            concurrency: 1,
        }
    }
}

/// Everything one `evaluate` call produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub policy: CorrectnessPolicy,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// In dataset order.
    pub results: Vec<EvaluationResult>,
    pub metrics: Metrics,
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Score, classify and judge every well-formed entry of `dataset`.
///
/// Entries with an empty address are dropped up front. Provider failures
/// and timeouts become `Error` results and never stop the run. With
/// `concurrency > 1` calls overlap, but results are still accumulated one
/// at a time in dataset order, so totals and progress lines match a
/// sequential run. Call starts are at least `request_delay` apart whatever
/// the concurrency.
pub async fn evaluate<P>(
    dataset: Vec<AddressRecord>,
    provider: &P,
    options: &EvalOptions,
) -> RunOutcome
where
    P: ScoreProvider + ?Sized,
{
    let started_at = Utc::now();
    let run_id = Uuid::new_v4();
    let entries = dataset::well_formed(dataset);
    let total = entries.len();

    tracing::info!(
        run_id = %run_id,
        entries = total,
        policy = %options.policy,
        concurrency = options.concurrency,
        "Evaluation run started"
    );

    let mut metrics = Metrics::default();
    let mut results = Vec::with_capacity(total);

    // Fair lock: waiters tick in dataset order.
    let pacer = (!options.request_delay.is_zero()).then(|| {
        let mut interval = tokio::time::interval(options.request_delay);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Mutex::new(interval)
    });
    let pacer = pacer.as_ref();

    let mut pending = stream::iter(entries.iter().map(|entry| async move {
        if let Some(pacer) = pacer {
            pacer.lock().await.tick().await;
        }
        evaluate_entry(entry, provider, options).await
    }))
    .buffered(options.concurrency.max(1));

    while let Some(result) = pending.next().await {
        log_progress(results.len() + 1, total, &result);
        crate::metrics::record_result(&result);
        metrics.record(&result);
        results.push(result);
    }

    let finished_at = Utc::now();
    tracing::info!(
        run_id = %run_id,
        total = metrics.total,
        correct = metrics.correct,
        errors = metrics.errors,
        accuracy = metrics.accuracy(),
        "Evaluation run finished"
    );

    RunOutcome {
        run_id,
        policy: options.policy,
        started_at,
        finished_at,
        results,
        metrics,
    }
}

/// Fetch, classify and judge a single entry. Never fails.
pub async fn evaluate_entry<P>(
    entry: &AddressRecord,
    provider: &P,
    options: &EvalOptions,
) -> EvaluationResult
where
    P: ScoreProvider + ?Sized,
{
    let start = Instant::now();
    let outcome = tokio::time::timeout(options.call_timeout, provider.fetch_score(&entry.address))
        .await
        .unwrap_or(Err(ProviderError::Timeout(options.call_timeout)));
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    match outcome {
        Ok(record) => {
            let classified = options.rules.classify(&record);
            let correct = options.policy.is_correct(entry.expected_category, classified);
            EvaluationResult::classified(entry, record, classified, correct, latency_ms)
        }
        Err(e) => {
            tracing::warn!(
                address = %entry.address,
                error = %e,
                "Score provider call failed"
            );
            EvaluationResult::failed(entry, e.to_string(), latency_ms)
        }
    }
}

fn log_progress(index: usize, total: usize, result: &EvaluationResult) {
    match &result.score {
        Some(score) => tracing::info!(
            progress = %format!("{index}/{total}"),
            wallet = %result.label(),
            address = %result.address,
            source = %result.source,
            expected = %result.expected_category,
            classified = %result.classified_category,
            score = score.score,
            status = %score.status,
            risk_level = %score.risk_level,
            flags = score.risk_flags.len(),
            correct = result.correct,
            latency_ms = result.latency_ms,
            "Wallet classified"
        ),
        None => tracing::info!(
            progress = %format!("{index}/{total}"),
            wallet = %result.label(),
            address = %result.address,
            expected = %result.expected_category,
            error = result.error.as_deref().unwrap_or("unknown"),
            "Wallet could not be scored"
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
