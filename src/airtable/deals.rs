//! Deal revenue tracker.
//!
//! Sums `Revenue` over every contracted deal and separately over deals whose
//! `In Contract` date lies within the last 24 hours.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone};

use super::client::{AirtableRecord, RecordQuery, RecordsApi};
use crate::credentials::AIRTABLE_TOKEN;
use crate::error::FetchError;
use crate::types::{AirtableConfig, DealRevenue, FetchOutcome};

const REVENUE_FIELD: &str = "Revenue";
const STATUS_FIELD: &str = "Select";
const CONTRACT_DATE_FIELD: &str = "In Contract";

/// Fetch deal revenue, substituting `fallback` on any failure.
///
/// `api` is `None` when no Airtable token is configured.
pub fn fetch_deal_revenue(
    api: Option<&dyn RecordsApi>,
    config: &AirtableConfig,
    fallback: &DealRevenue,
    now: DateTime<Local>,
) -> FetchOutcome<DealRevenue> {
    let result = match api {
        Some(api) => query_contracted_deals(api, config).map(|records| summarize_deals(&records, now)),
        None => Err(FetchError::MissingCredential(AIRTABLE_TOKEN)),
    };

    match result {
        Ok(revenue) => {
            log::info!(
                "Deal revenue: {} deals, total {}, last 24h {}",
                revenue.deal_count,
                revenue.total_revenue,
                revenue.last_24h
            );
            FetchOutcome::Live(revenue)
        }
        Err(e) => {
            if e.is_unconfigured() {
                log::info!("Deal revenue: {}, using fallback", e);
            } else {
                log::warn!("Deal revenue: {}, using fallback", e);
            }
            FetchOutcome::fallback(fallback.clone(), e.to_string())
        }
    }
}

fn query_contracted_deals(
    api: &dyn RecordsApi,
    config: &AirtableConfig,
) -> Result<Vec<AirtableRecord>, FetchError> {
    let query = RecordQuery {
        filter_by_formula: Some(format!(
            "{{{}}} = \"{}\"",
            STATUS_FIELD, config.deal_status
        )),
        fields: vec![
            REVENUE_FIELD.to_string(),
            STATUS_FIELD.to_string(),
            CONTRACT_DATE_FIELD.to_string(),
        ],
        max_records: None,
    };
    api.list_records(&config.deals_base_id, &config.deals_table, &query)
}

/// Aggregate deal records. `deal_count` counts every record, with or without revenue.
pub fn summarize_deals(records: &[AirtableRecord], now: DateTime<Local>) -> DealRevenue {
    let cutoff = now - Duration::hours(24);
    let mut total_revenue = 0.0;
    let mut last_24h = 0.0;

    for record in records {
        let revenue = record
            .fields
            .get(REVENUE_FIELD)
            .and_then(revenue_value)
            .unwrap_or(0.0);
        total_revenue += revenue;

        let contracted_at = record
            .fields
            .get(CONTRACT_DATE_FIELD)
            .and_then(|v| v.as_str())
            .and_then(parse_contract_date);
        if let Some(at) = contracted_at {
            if at > cutoff && at <= now {
                last_24h += revenue;
            }
        }
    }

    DealRevenue {
        total_revenue,
        deal_count: records.len(),
        last_24h,
    }
}

fn revenue_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace([',', '$'], "").parse().ok(),
        _ => None,
    }
}

/// Parse an Airtable date or date-time field.
///
/// Accepts RFC 3339 ("2026-02-08T12:00:00.000Z"), a naive date-time taken
/// as local time, or a bare date taken as local midnight.
pub fn parse_contract_date(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Local.from_local_datetime(&naive).earliest()
}
