//! Recent-activity timeline.
//!
//! The first entries are derived from this run's metrics; the rest are a
//! fixed set of canned examples, one per kind of work. Offsets only grow
//! down the list, so the output is newest-first without sorting.

use chrono::{DateTime, Duration, Local};

use crate::types::{ActivityEntry, ActivityKind, ActivityOrigin, DealRevenue, OutreachStats};
use crate::util::{clock_label, format_amount};

/// (kind, description, minutes before now)
const CANNED_ACTIVITIES: &[(ActivityKind, &str, i64)] = &[
    (ActivityKind::System, "Dashboard v2 updated with live Airtable integration", 9),
    (ActivityKind::Coord, "Arthur coordinating 4 active agents", 10),
    (ActivityKind::Scrape, "Zillow Bot found 2 new Section 8 listings", 12),
    (ActivityKind::Admin, "Admin updated 3 Asana tasks to pre-approval", 18),
    (ActivityKind::Financial, "Processed $8,500 LL Ventures revenue", 60),
    (ActivityKind::Content, "Ghost generated Twitter thread draft", 120),
    (ActivityKind::Outreach, "14% response rate on Detroit agent outreach", 180),
    (ActivityKind::Netlify, "Off-Market Deals website deployed successfully", 240),
];

fn entry(
    kind: ActivityKind,
    description: String,
    at: DateTime<Local>,
    origin: ActivityOrigin,
) -> ActivityEntry {
    ActivityEntry {
        kind,
        description,
        timestamp: at.to_rfc3339(),
        time: clock_label(&at),
        origin,
    }
}

pub fn synthesize_activities(
    deals: &DealRevenue,
    sms: &OutreachStats,
    email: &OutreachStats,
    now: DateTime<Local>,
) -> Vec<ActivityEntry> {
    let derived = [
        (
            ActivityKind::Revenue,
            format!(
                "Deal Revenue Tracker: ${} from {} deals",
                format_amount(deals.total_revenue),
                deals.deal_count
            ),
            0,
        ),
        (
            ActivityKind::Sms,
            format!("SMS Operations: {} messages sent today", sms.today),
            3,
        ),
        (
            ActivityKind::Email,
            format!("Arthur Email: {} emails processed today", email.today),
            7,
        ),
    ];

    let mut activities: Vec<ActivityEntry> = derived
        .into_iter()
        .map(|(kind, description, minutes)| {
            entry(kind, description, now - Duration::minutes(minutes), ActivityOrigin::Derived)
        })
        .collect();

    activities.extend(CANNED_ACTIVITIES.iter().map(|(kind, description, minutes)| {
        entry(
            *kind,
            description.to_string(),
            now - Duration::minutes(*minutes),
            ActivityOrigin::Canned,
        )
    }));

    activities
}
