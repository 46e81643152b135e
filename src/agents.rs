//! Agent status heuristics.
//!
//! Four fixed agents start from a default state; three independent probes
//! then override individual agents. None of these reflect a real process
//! table: business hours is a clock check, recent activity is a records
//! query, and the content schedule is a coin flip. Each agent's `signal`
//! says which one decided its state. When the records query cannot run,
//! the admin agent is reported inactive and the whole section is tagged
//! fallback.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, Timelike};

use crate::airtable::client::{RecordQuery, RecordsApi};
use crate::credentials::AIRTABLE_TOKEN;
use crate::error::FetchError;
use crate::types::{Agent, AgentSignal, AirtableConfig, FetchOutcome};

/// Inclusive local-hour range for the listing monitor.
const BUSINESS_HOURS: std::ops::RangeInclusive<u32> = 6..=18;
/// Probability that the content schedule reports active.
const CONTENT_ACTIVE_RATE: f64 = 0.3;

/// Signals that drive agent status.
pub trait StatusProbe {
    fn business_hours(&self, now: DateTime<Local>) -> bool;
    fn recent_activity(&self, now: DateTime<Local>) -> Result<bool, FetchError>;
    fn content_scheduled(&self, now: DateTime<Local>) -> bool;
}

/// Production probe: clock, Airtable, and a random draw.
pub struct LiveStatusProbe<'a> {
    records: Option<&'a dyn RecordsApi>,
    config: &'a AirtableConfig,
}

impl<'a> LiveStatusProbe<'a> {
    pub fn new(records: Option<&'a dyn RecordsApi>, config: &'a AirtableConfig) -> Self {
        Self { records, config }
    }
}

impl StatusProbe for LiveStatusProbe<'_> {
    fn business_hours(&self, now: DateTime<Local>) -> bool {
        is_business_hours(now)
    }

    fn recent_activity(&self, _now: DateTime<Local>) -> Result<bool, FetchError> {
        let records = self
            .records
            .ok_or(FetchError::MissingCredential(AIRTABLE_TOKEN))?;
        has_recent_activity(records, self.config)
    }

    fn content_scheduled(&self, _now: DateTime<Local>) -> bool {
        rand::random::<f64>() < CONTENT_ACTIVE_RATE
    }
}

pub fn is_business_hours(now: DateTime<Local>) -> bool {
    BUSINESS_HOURS.contains(&now.hour())
}

/// True when at least one agent response was created inside the activity window.
pub fn has_recent_activity(
    records: &dyn RecordsApi,
    config: &AirtableConfig,
) -> Result<bool, FetchError> {
    let query = RecordQuery {
        filter_by_formula: Some(format!(
            "DATETIME_DIFF(NOW(), {{Created}}, 'hours') <= {}",
            config.activity_window_hours
        )),
        fields: Vec::new(),
        max_records: Some(1),
    };
    let found = records.list_records(&config.activity_base_id, &config.activity_table, &query)?;
    Ok(!found.is_empty())
}

fn agent(name: &str, active: bool, task: &str) -> Agent {
    Agent {
        name: name.to_string(),
        active,
        task: task.to_string(),
        signal: AgentSignal::Default,
    }
}

/// Apply one probe result to an agent, swapping in the busy task when active.
fn apply(agent: &mut Agent, active: bool, busy_task: &str, signal: AgentSignal) {
    agent.active = active;
    agent.signal = signal;
    if active {
        agent.task = busy_task.to_string();
    }
}

/// Compute every agent's status for this run, keyed by agent id.
///
/// A failed recent-activity check leaves the admin agent inactive and
/// tags the result as fallback.
pub fn agent_status(
    probe: &dyn StatusProbe,
    now: DateTime<Local>,
) -> FetchOutcome<BTreeMap<String, Agent>> {
    // Arthur coordinates and has no probe
    let arthur = agent("Arthur", true, "Coordinating Operations");
    let mut zillow = agent("Zillow Bot", false, "Monitoring New Listings");
    let mut ghost = agent("Ghost", false, "Preparing Content Queue");
    let mut admin = agent("Admin", true, "Managing Asana Pipeline");

    apply(
        &mut zillow,
        probe.business_hours(now),
        "Scanning Detroit Properties",
        AgentSignal::BusinessHours,
    );
    let degraded = match probe.recent_activity(now) {
        Ok(active) => {
            apply(&mut admin, active, "Processing New Responses", AgentSignal::RecentActivity);
            None
        }
        Err(e) => {
            if e.is_unconfigured() {
                log::info!("Agent status: recent activity unavailable: {}", e);
            } else {
                log::warn!("Agent status: recent activity check failed: {}", e);
            }
            admin.active = false;
            admin.signal = AgentSignal::RecentActivity;
            Some(format!("recent activity check failed: {}", e))
        }
    };
    apply(
        &mut ghost,
        probe.content_scheduled(now),
        "Writing Social Content",
        AgentSignal::Simulated,
    );

    let active = [&arthur, &zillow, &ghost, &admin]
        .iter()
        .filter(|a| a.active)
        .count();
    log::info!("Agents: {} of 4 active", active);

    let agents = BTreeMap::from([
        ("arthur".to_string(), arthur),
        ("zillow-bot".to_string(), zillow),
        ("ghost".to_string(), ghost),
        ("admin".to_string(), admin),
    ]);
    match degraded {
        None => FetchOutcome::Live(agents),
        Some(reason) => FetchOutcome::fallback(agents, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airtable::client::AirtableRecord;
    use crate::types::DataSource;
    use chrono::TimeZone;

    struct FixedProbe {
        business: bool,
        /// `Err` carries the HTTP status of a failed check.
        recent: Result<bool, u16>,
        content: bool,
    }

    impl StatusProbe for FixedProbe {
        fn business_hours(&self, _now: DateTime<Local>) -> bool {
            self.business
        }
        fn recent_activity(&self, _now: DateTime<Local>) -> Result<bool, FetchError> {
            self.recent.map_err(|status| FetchError::Api {
                status,
                message: "unavailable".to_string(),
            })
        }
        fn content_scheduled(&self, _now: DateTime<Local>) -> bool {
            self.content
        }
    }

    struct FakeRecords(Result<usize, u16>);

    impl RecordsApi for FakeRecords {
        fn list_records(
            &self,
            _base_id: &str,
            table: &str,
            query: &RecordQuery,
        ) -> Result<Vec<AirtableRecord>, FetchError> {
            assert_eq!(table, "Agent Responses");
            assert_eq!(query.max_records, Some(1));
            match self.0 {
                Ok(n) => Ok(vec![AirtableRecord::default(); n]),
                Err(status) => Err(FetchError::Api {
                    status,
                    message: String::new(),
                }),
            }
        }
    }

    fn at_hour(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 2, 8, hour, 30, 0).unwrap()
    }

    #[test]
    fn test_business_hours_bounds() {
        assert!(!is_business_hours(at_hour(5)));
        assert!(is_business_hours(at_hour(6)));
        assert!(is_business_hours(at_hour(18)));
        assert!(!is_business_hours(at_hour(19)));
    }

    #[test]
    fn test_all_probes_inactive() {
        let probe = FixedProbe {
            business: false,
            recent: Ok(false),
            content: false,
        };
        let outcome = agent_status(&probe, at_hour(22));
        assert!(outcome.is_live());
        let agents = outcome.value();

        assert_eq!(agents.len(), 4);
        assert!(agents["arthur"].active);
        assert_eq!(agents["arthur"].task, "Coordinating Operations");
        assert!(!agents["zillow-bot"].active);
        assert_eq!(agents["zillow-bot"].task, "Monitoring New Listings");
        // Admin's default-active state is overridden by the activity check
        assert!(!agents["admin"].active);
        assert_eq!(agents["admin"].task, "Managing Asana Pipeline");
        assert!(!agents["ghost"].active);
    }

    #[test]
    fn test_all_probes_active() {
        let probe = FixedProbe {
            business: true,
            recent: Ok(true),
            content: true,
        };
        let (agents, status) = agent_status(&probe, at_hour(10)).into_parts();
        assert_eq!(status.reason, None);

        assert_eq!(agents["zillow-bot"].task, "Scanning Detroit Properties");
        assert_eq!(agents["admin"].task, "Processing New Responses");
        assert_eq!(agents["ghost"].task, "Writing Social Content");
        assert_eq!(agents["ghost"].signal, AgentSignal::Simulated);
        assert_eq!(agents["zillow-bot"].signal, AgentSignal::BusinessHours);
        assert_eq!(agents["admin"].signal, AgentSignal::RecentActivity);
        assert_eq!(agents["arthur"].signal, AgentSignal::Default);
    }

    #[test]
    fn test_has_recent_activity() {
        let config = AirtableConfig::default();
        assert!(has_recent_activity(&FakeRecords(Ok(1)), &config).unwrap());
        assert!(!has_recent_activity(&FakeRecords(Ok(0)), &config).unwrap());
        assert!(has_recent_activity(&FakeRecords(Err(500)), &config).is_err());
    }

    #[test]
    fn test_live_probe_reports_failures() {
        let config = AirtableConfig::default();
        let failing = FakeRecords(Err(401));
        let probe = LiveStatusProbe::new(Some(&failing), &config);
        assert!(matches!(
            probe.recent_activity(at_hour(10)),
            Err(FetchError::Api { status: 401, .. })
        ));

        let unconfigured = LiveStatusProbe::new(None, &config);
        assert!(matches!(
            unconfigured.recent_activity(at_hour(10)),
            Err(FetchError::MissingCredential(AIRTABLE_TOKEN))
        ));
        assert!(unconfigured.business_hours(at_hour(10)));
    }

    #[test]
    fn test_failed_activity_check_is_fallback() {
        let probe = FixedProbe {
            business: true,
            recent: Err(503),
            content: false,
        };
        let (agents, status) = agent_status(&probe, at_hour(10)).into_parts();

        assert_eq!(status.source, DataSource::Fallback);
        assert_eq!(
            status.reason.as_deref(),
            Some("recent activity check failed: API error 503: unavailable")
        );
        assert!(!agents["admin"].active);
        assert_eq!(agents["admin"].task, "Managing Asana Pipeline");
        // Probes that did run still apply
        assert!(agents["zillow-bot"].active);
        assert_eq!(agents.len(), 4);
    }

    #[test]
    fn test_missing_token_is_fallback() {
        let config = AirtableConfig::default();
        let probe = LiveStatusProbe::new(None, &config);
        let (agents, status) = agent_status(&probe, at_hour(10)).into_parts();

        assert_eq!(status.source, DataSource::Fallback);
        assert!(status.reason.unwrap().contains(AIRTABLE_TOKEN));
        assert!(!agents["admin"].active);
    }
}
