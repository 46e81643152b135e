// Dashboard snapshot service.
// Runs every fetcher once against a single reference time, merges the
// results, and writes the snapshot the front-end reads.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};

use crate::activity::synthesize_activities;
use crate::agents::{agent_status, LiveStatusProbe, StatusProbe};
use crate::airtable::client::{AirtableClient, RecordsApi};
use crate::airtable::deals::fetch_deal_revenue;
use crate::board::load_tasks;
use crate::credentials::{Credentials, AIRTABLE_TOKEN, GOOGLE_TOKEN};
use crate::error::RunError;
use crate::finance::fetch_financial_data;
use crate::google_api::sheets::{SheetsApi, SheetsClient};
use crate::google_api::{GoogleToken, HelperTokenProvider, TokenProvider};
use crate::outreach::{fetch_email_stats, fetch_sms_stats};
use crate::types::{Config, DashboardSnapshot, DataSource, Metrics, SourceStatus};
use crate::util::{atomic_write_str, expand_home, format_amount, http_client};

/// External collaborators for one run.
pub struct Sources<'a> {
    /// `None` when no records credential is available.
    pub records: Option<&'a dyn RecordsApi>,
    pub sheets: &'a dyn SheetsApi,
    pub tokens: &'a dyn TokenProvider,
    pub status: &'a dyn StatusProbe,
}

/// Run the whole pipeline with live clients and write the snapshot.
pub fn run(config: &Config, now: DateTime<Local>) -> Result<DashboardSnapshot, RunError> {
    let credentials = Credentials::load(&config.credentials);
    let http = http_client(Duration::from_secs(config.http_timeout_secs));

    let airtable = credentials
        .secret(AIRTABLE_TOKEN)
        .map(|token| AirtableClient::new(http.clone(), &config.airtable.api_base, token));
    let records = airtable.as_ref().map(|c| c as &dyn RecordsApi);

    let sheets = SheetsClient::new(http, &config.sheets.api_base);
    let tokens = HelperTokenProvider::new(
        config.sheets.token_helper.as_deref().map(expand_home),
        credentials
            .token(GOOGLE_TOKEN)
            .and_then(GoogleToken::from_credential),
        now.with_timezone(&Utc),
    );
    let status = LiveStatusProbe::new(records, &config.airtable);

    let sources = Sources {
        records,
        sheets: &sheets,
        tokens: &tokens,
        status: &status,
    };
    generate_snapshot(config, &sources, now)
}

/// Build the snapshot and write it to the configured output path.
pub fn generate_snapshot(
    config: &Config,
    sources: &Sources,
    now: DateTime<Local>,
) -> Result<DashboardSnapshot, RunError> {
    let snapshot = build_snapshot(config, sources, now);
    write_snapshot(&snapshot, &expand_home(&config.output_path))?;
    Ok(snapshot)
}

pub fn build_snapshot(config: &Config, sources: &Sources, now: DateTime<Local>) -> DashboardSnapshot {
    let mut provenance: BTreeMap<String, SourceStatus> = BTreeMap::new();
    let mut record = |section: &str, status: SourceStatus| {
        provenance.insert(section.to_string(), status);
    };

    let (deal_revenue, status) = fetch_deal_revenue(
        sources.records,
        &config.airtable,
        &config.fallbacks.deal_revenue,
        now,
    )
    .into_parts();
    let mut metric_fallbacks: Vec<&str> = Vec::new();
    if status.source == DataSource::Fallback {
        metric_fallbacks.push("deal revenue");
    }
    record("deal_revenue", status);

    let (sms_stats, status) = fetch_sms_stats(&config.fallbacks).into_parts();
    if status.source == DataSource::Fallback {
        metric_fallbacks.push("sms");
    }
    record("sms_stats", status);

    let (email_stats, status) = fetch_email_stats(&config.fallbacks).into_parts();
    if status.source == DataSource::Fallback {
        metric_fallbacks.push("email");
    }
    record("email_stats", status);

    let (financial, status) = fetch_financial_data(
        sources.tokens,
        sources.sheets,
        &config.sheets,
        &config.fallbacks,
        now,
    )
    .into_parts();
    record("financial", status);

    let (tasks, status) =
        load_tasks(&expand_home(&config.board_path), &config.pinned_tasks).into_parts();
    record("tasks", status);

    // Per-agent `signal` marks the simulated ones
    let (agents, status) = agent_status(sources.status, now).into_parts();
    record("agents", status);

    // Canned entries carry origin "canned"; the section is live only when
    // every metric it is derived from is live
    let activities = synthesize_activities(&deal_revenue, &sms_stats, &email_stats, now);
    let activities_status = if metric_fallbacks.is_empty() {
        SourceStatus {
            source: DataSource::Live,
            reason: None,
        }
    } else {
        SourceStatus {
            source: DataSource::Fallback,
            reason: Some(format!(
                "derived from fallback metrics: {}",
                metric_fallbacks.join(", ")
            )),
        }
    };
    record("activities", activities_status);

    DashboardSnapshot {
        tasks,
        financial,
        agents,
        activities,
        metrics: Metrics {
            deal_revenue,
            sms_stats,
            email_stats,
        },
        sources: provenance,
        last_updated: now.to_rfc3339(),
    }
}

/// Serialize pretty JSON and atomically replace `path`.
pub fn write_snapshot(snapshot: &DashboardSnapshot, path: &Path) -> Result<(), RunError> {
    let content = serde_json::to_string_pretty(snapshot)?;
    atomic_write_str(path, &content).map_err(|source| RunError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Snapshot written to {}", path.display());
    Ok(())
}

/// Short human-readable run summary for stdout.
pub fn summary_lines(snapshot: &DashboardSnapshot, now: DateTime<Local>) -> Vec<String> {
    let deals = &snapshot.metrics.deal_revenue;
    let fallbacks: Vec<&str> = snapshot
        .sources
        .iter()
        .filter(|(_, s)| s.source == DataSource::Fallback)
        .map(|(name, _)| name.as_str())
        .collect();

    let mut lines = vec![
        format!("Dashboard data updated at {}", now.format("%Y-%m-%d %H:%M:%S")),
        format!(
            "Deal Revenue: ${} from {} deals",
            format_amount(deals.total_revenue),
            deals.deal_count
        ),
        format!(
            "SMS Today: {}, Emails Today: {}",
            snapshot.metrics.sms_stats.today, snapshot.metrics.email_stats.today
        ),
        format!(
            "Generated data for {} tasks, {} activities",
            snapshot.tasks.len(),
            snapshot.activities.len()
        ),
    ];
    if !fallbacks.is_empty() {
        lines.push(format!("Fallback data used for: {}", fallbacks.join(", ")));
    }
    lines
}
