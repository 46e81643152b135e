//! Financial transactions from the Tiller ledger sheet.
//!
//! Row layout (columns A..F at minimum):
//! date (%m/%d/%Y) | description | amount | account | category | ...
//!
//! When the sheet can't be read, a placeholder set of sample charges and
//! revenue is returned instead, stamped relative to the run time.

use chrono::{DateTime, Duration, Local, NaiveDate};

use crate::error::FetchError;
use crate::google_api::sheets::SheetsApi;
use crate::google_api::TokenProvider;
use crate::types::{FallbackConfig, FetchOutcome, Financial, SampleEntry, SheetsConfig, Transaction};

const LEDGER_DATE_FORMAT: &str = "%m/%d/%Y";
const MIN_ROW_CELLS: usize = 6;

/// Hours between consecutive placeholder charges / revenue entries.
const CHARGE_SPACING_HOURS: i64 = 2;
const REVENUE_SPACING_HOURS: i64 = 3;

pub fn fetch_financial_data(
    tokens: &dyn TokenProvider,
    sheets: &dyn SheetsApi,
    config: &SheetsConfig,
    fallbacks: &FallbackConfig,
    now: DateTime<Local>,
) -> FetchOutcome<Financial> {
    match read_recent_transactions(tokens, sheets, config, now) {
        Ok(transactions) => {
            log::info!("Financial: {} transactions in window", transactions.len());
            FetchOutcome::Live(Financial {
                transactions,
                charges: None,
                revenue: None,
            })
        }
        Err(e) => {
            if e.is_unconfigured() {
                log::info!("Financial: {}, using sample data", e);
            } else {
                log::warn!("Financial: {}, using sample data", e);
            }
            FetchOutcome::fallback(fallback_financial_data(fallbacks, now), e.to_string())
        }
    }
}

fn read_recent_transactions(
    tokens: &dyn TokenProvider,
    sheets: &dyn SheetsApi,
    config: &SheetsConfig,
    now: DateTime<Local>,
) -> Result<Vec<Transaction>, FetchError> {
    let token = tokens.access_token()?;
    let rows = sheets.read_range(&token, &config.sheet_id, &config.range)?;
    Ok(recent_transactions(
        &rows,
        now,
        config.window_days,
        config.max_transactions,
    ))
}

/// Parse one ledger row. Rows that are short or don't parse yield `None`.
pub fn parse_transaction_row(row: &[String]) -> Option<(NaiveDate, Transaction)> {
    if row.len() < MIN_ROW_CELLS {
        return None;
    }

    let date_str = row[0].trim();
    let date = NaiveDate::parse_from_str(date_str, LEDGER_DATE_FORMAT).ok()?;
    let amount = parse_amount(&row[2])?;
    let midnight = date.and_hms_opt(0, 0, 0)?;

    Some((
        date,
        Transaction {
            date: date_str.to_string(),
            amount,
            description: row[1].clone(),
            account: row[3].clone(),
            category: Some(row[4].clone()),
            timestamp: midnight.format("%Y-%m-%dT%H:%M:%S").to_string(),
        },
    ))
}

/// Empty cells count as zero; "$" and thousands separators are tolerated.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Some(0.0);
    }
    cleaned.parse().ok()
}

/// Rows dated within `(now - window_days, now]`, newest first, at most `limit`.
pub fn recent_transactions(
    rows: &[Vec<String>],
    now: DateTime<Local>,
    window_days: i64,
    limit: usize,
) -> Vec<Transaction> {
    let cutoff = (now - Duration::days(window_days)).naive_local();
    let today = now.date_naive();

    let mut dated: Vec<(NaiveDate, Transaction)> = rows
        .iter()
        .filter_map(|row| parse_transaction_row(row))
        .filter(|(date, _)| {
            *date <= today && date.and_hms_opt(0, 0, 0).is_some_and(|d| d > cutoff)
        })
        .collect();

    // Stable: same-day rows keep ledger order
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.truncate(limit);
    dated.into_iter().map(|(_, t)| t).collect()
}

/// Sample charges and revenue presented when the ledger is unreachable.
pub fn fallback_financial_data(fallbacks: &FallbackConfig, now: DateTime<Local>) -> Financial {
    let charges = stamp_samples(&fallbacks.sample_charges, now, CHARGE_SPACING_HOURS);
    let revenue = stamp_samples(&fallbacks.sample_revenue, now, REVENUE_SPACING_HOURS);
    let transactions = charges.iter().chain(revenue.iter()).cloned().collect();

    Financial {
        transactions,
        charges: Some(charges),
        revenue: Some(revenue),
    }
}

fn stamp_samples(samples: &[SampleEntry], now: DateTime<Local>, spacing_hours: i64) -> Vec<Transaction> {
    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let at = now - Duration::hours(i as i64 * spacing_hours);
            Transaction {
                date: at.format(LEDGER_DATE_FORMAT).to_string(),
                amount: sample.amount,
                description: sample.description.clone(),
                account: sample.account.clone(),
                category: sample.category.clone(),
                timestamp: at.to_rfc3339(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct StaticToken(Result<&'static str, ()>);

    impl TokenProvider for StaticToken {
        fn access_token(&self) -> Result<String, FetchError> {
            match self.0 {
                Ok(t) => Ok(t.to_string()),
                Err(()) => Err(FetchError::TokenHelper("printed no token".to_string())),
            }
        }
    }

    struct FakeSheets {
        rows: Vec<Vec<String>>,
        status: Option<u16>,
    }

    impl SheetsApi for FakeSheets {
        fn read_range(
            &self,
            access_token: &str,
            _sheet_id: &str,
            _range: &str,
        ) -> Result<Vec<Vec<String>>, FetchError> {
            assert_eq!(access_token, "ya29.test");
            match self.status {
                Some(status) => Err(FetchError::Api {
                    status,
                    message: String::new(),
                }),
                None => Ok(self.rows.clone()),
            }
        }
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 2, 8, 12, 0, 0).unwrap()
    }

    fn row(date: &str, description: &str, amount: &str) -> Vec<String> {
        vec![
            date.to_string(),
            description.to_string(),
            amount.to_string(),
            "Chase Sapphire".to_string(),
            "Food".to_string(),
            "extra".to_string(),
        ]
    }

    #[test]
    fn test_parse_row() {
        let (date, tx) = parse_transaction_row(&row("02/07/2026", "Coffee", "-$4.50")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 2, 7).unwrap());
        assert_eq!(tx.amount, -4.5);
        assert_eq!(tx.account, "Chase Sapphire");
        assert_eq!(tx.category.as_deref(), Some("Food"));
        assert_eq!(tx.timestamp, "2026-02-07T00:00:00");
    }

    #[test]
    fn test_parse_row_rejects_short_and_bad() {
        let short: Vec<String> = vec!["02/07/2026".into(), "x".into(), "1".into()];
        assert!(parse_transaction_row(&short).is_none());
        assert!(parse_transaction_row(&row("2026-02-07", "x", "1")).is_none());
        assert!(parse_transaction_row(&row("02/07/2026", "x", "abc")).is_none());
    }

    #[test]
    fn test_parse_row_empty_amount_is_zero() {
        let (_, tx) = parse_transaction_row(&row("02/07/2026", "Pending", "")).unwrap();
        assert_eq!(tx.amount, 0.0);
    }

    #[test]
    fn test_recent_window_and_order() {
        let rows = vec![
            row("02/01/2026", "too old", "-1"),
            row("02/02/2026", "day six", "-2"),
            row("02/08/2026", "today", "-3"),
            row("02/09/2026", "tomorrow", "-4"),
            row("02/05/2026", "mid week", "-5"),
            row("bad", "junk", "-6"),
        ];
        let txs = recent_transactions(&rows, now(), 7, 50);
        let names: Vec<&str> = txs.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, vec!["today", "mid week", "day six"]);
    }

    #[test]
    fn test_recent_limit_and_sorted_descending() {
        let rows: Vec<Vec<String>> = (0..80)
            .map(|i| row(&format!("02/0{}/2026", 2 + (i % 7)), &format!("tx{}", i), "-1"))
            .collect();
        let txs = recent_transactions(&rows, now(), 7, 50);
        assert_eq!(txs.len(), 50);

        let dates: Vec<NaiveDate> = txs
            .iter()
            .map(|t| NaiveDate::parse_from_str(&t.date, LEDGER_DATE_FORMAT).unwrap())
            .collect();
        assert!(dates.windows(2).all(|w| w[0] >= w[1]));
        let oldest_allowed = now().date_naive() - Duration::days(7);
        assert!(dates.iter().all(|d| *d > oldest_allowed));
    }

    #[test]
    fn test_fetch_live() {
        let sheets = FakeSheets {
            rows: vec![row("02/07/2026", "Coffee", "-4.50")],
            status: None,
        };
        let outcome = fetch_financial_data(
            &StaticToken(Ok("ya29.test")),
            &sheets,
            &SheetsConfig::default(),
            &FallbackConfig::default(),
            now(),
        );
        assert!(outcome.is_live());
        assert_eq!(outcome.value().transactions.len(), 1);
        assert!(outcome.value().charges.is_none());
    }

    #[test]
    fn test_fetch_api_error_uses_samples() {
        let sheets = FakeSheets {
            rows: Vec::new(),
            status: Some(403),
        };
        let outcome = fetch_financial_data(
            &StaticToken(Ok("ya29.test")),
            &sheets,
            &SheetsConfig::default(),
            &FallbackConfig::default(),
            now(),
        );
        assert!(!outcome.is_live());
        let financial = outcome.value();
        assert_eq!(financial.charges.as_ref().unwrap().len(), 6);
        assert_eq!(financial.revenue.as_ref().unwrap().len(), 4);
        assert_eq!(financial.transactions.len(), 10);
    }

    #[test]
    fn test_fetch_token_failure_uses_samples() {
        let sheets = FakeSheets {
            rows: Vec::new(),
            status: None,
        };
        let outcome = fetch_financial_data(
            &StaticToken(Err(())),
            &sheets,
            &SheetsConfig::default(),
            &FallbackConfig::default(),
            now(),
        );
        match outcome {
            FetchOutcome::Fallback { reason, .. } => assert!(reason.contains("token")),
            FetchOutcome::Live(_) => panic!("expected fallback"),
        }
    }

    #[test]
    fn test_fallback_timestamps_spaced() {
        let financial = fallback_financial_data(&FallbackConfig::default(), now());
        let charges = financial.charges.unwrap();
        let revenue = financial.revenue.unwrap();

        assert_eq!(charges[0].timestamp, now().to_rfc3339());
        assert_eq!(charges[1].timestamp, (now() - Duration::hours(2)).to_rfc3339());
        assert_eq!(revenue[1].timestamp, (now() - Duration::hours(3)).to_rfc3339());
        assert_eq!(charges[0].date, "02/08/2026");
        assert!(charges.iter().all(|c| c.amount < 0.0));
        assert!(revenue.iter().all(|r| r.amount > 0.0));
    }

    #[test]
    fn test_fallback_revenue_has_no_category() {
        let financial = fallback_financial_data(&FallbackConfig::default(), now());
        let charges = financial.charges.unwrap();
        let revenue = financial.revenue.unwrap();

        assert_eq!(charges[0].category.as_deref(), Some("Transportation"));
        assert_eq!(revenue[0].account, "Business Account");
        assert!(revenue.iter().all(|r| r.category.is_none()));

        let json = serde_json::to_value(&revenue[0]).unwrap();
        assert!(json.get("category").is_none());
    }
}
