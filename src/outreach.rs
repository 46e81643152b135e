//! SMS and email outreach counts.
//!
//! Neither channel has a live integration yet, so both report the configured
//! estimates and are always tagged as fallback.

use crate::types::{FallbackConfig, FetchOutcome, OutreachStats};

const NO_LIVE_SOURCE: &str = "no live source configured";

pub fn fetch_sms_stats(fallbacks: &FallbackConfig) -> FetchOutcome<OutreachStats> {
    FetchOutcome::fallback(fallbacks.sms_stats.clone(), NO_LIVE_SOURCE)
}

pub fn fetch_email_stats(fallbacks: &FallbackConfig) -> FetchOutcome<OutreachStats> {
    FetchOutcome::fallback(fallbacks.email_stats.clone(), NO_LIVE_SOURCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimates_are_flagged() {
        let fallbacks = FallbackConfig::default();
        let sms = fetch_sms_stats(&fallbacks);
        let email = fetch_email_stats(&fallbacks);

        assert!(!sms.is_live());
        assert!(!email.is_live());
        assert_eq!(sms.value().today, 50);
        assert_eq!(email.value().this_month, 180);
    }
}
