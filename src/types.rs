use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration stored in ~/.command-center/config.json
///
/// Every field has a default, so an absent or partial file is valid.
/// Paths may start with `~/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_board_path")]
    pub board_path: String,
    #[serde(default)]
    pub credentials: CredentialPaths,
    #[serde(default)]
    pub airtable: AirtableConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    /// Applied to every HTTP request.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub fallbacks: FallbackConfig,
    /// Tasks shown regardless of the board contents.
    #[serde(default)]
    pub pinned_tasks: Vec<Task>,
}

fn default_output_path() -> String {
    "~/.openclaw/workspace/dashboard-data.json".to_string()
}

fn default_board_path() -> String {
    "~/.openclaw/workspace/board/board-data.json".to_string()
}

fn default_http_timeout_secs() -> u64 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            board_path: default_board_path(),
            credentials: CredentialPaths::default(),
            airtable: AirtableConfig::default(),
            sheets: SheetsConfig::default(),
            http_timeout_secs: default_http_timeout_secs(),
            fallbacks: FallbackConfig::default(),
            pinned_tasks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPaths {
    /// key=value file holding AIRTABLE_API_KEY
    #[serde(default = "default_secrets_path")]
    pub secrets_path: String,
    /// Google OAuth token.json
    #[serde(default = "default_token_path")]
    pub token_path: String,
}

fn default_secrets_path() -> String {
    "~/.config/airtable/secrets.env".to_string()
}

fn default_token_path() -> String {
    "~/.config/google/token.json".to_string()
}

impl Default for CredentialPaths {
    fn default() -> Self {
        Self {
            secrets_path: default_secrets_path(),
            token_path: default_token_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirtableConfig {
    #[serde(default = "default_airtable_api_base")]
    pub api_base: String,
    #[serde(default = "default_deals_base_id")]
    pub deals_base_id: String,
    #[serde(default = "default_deals_table")]
    pub deals_table: String,
    /// Value of the `Select` field that marks a deal as contracted.
    #[serde(default = "default_deal_status")]
    pub deal_status: String,
    #[serde(default = "default_activity_base_id")]
    pub activity_base_id: String,
    #[serde(default = "default_activity_table")]
    pub activity_table: String,
    #[serde(default = "default_activity_window_hours")]
    pub activity_window_hours: u32,
}

fn default_airtable_api_base() -> String {
    "https://api.airtable.com/v0".to_string()
}

fn default_deals_base_id() -> String {
    "appEmn0HdyfUfZ429".to_string()
}

fn default_deals_table() -> String {
    "Offers".to_string()
}

fn default_deal_status() -> String {
    "In Contract".to_string()
}

fn default_activity_base_id() -> String {
    "appzBa1lPvu6zBZxv".to_string()
}

fn default_activity_table() -> String {
    "Agent Responses".to_string()
}

fn default_activity_window_hours() -> u32 {
    2
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            api_base: default_airtable_api_base(),
            deals_base_id: default_deals_base_id(),
            deals_table: default_deals_table(),
            deal_status: default_deal_status(),
            activity_base_id: default_activity_base_id(),
            activity_table: default_activity_table(),
            activity_window_hours: default_activity_window_hours(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetsConfig {
    #[serde(default = "default_sheets_api_base")]
    pub api_base: String,
    #[serde(default = "default_sheet_id")]
    pub sheet_id: String,
    #[serde(default = "default_range")]
    pub range: String,
    /// Script whose stdout is a fresh access token. Run with bash.
    #[serde(default = "default_token_helper")]
    pub token_helper: Option<String>,
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    #[serde(default = "default_max_transactions")]
    pub max_transactions: usize,
}

fn default_sheets_api_base() -> String {
    "https://sheets.googleapis.com/v4/spreadsheets".to_string()
}

fn default_sheet_id() -> String {
    "1pd1dt64gBni4vAWze9QzhVwsmFMcdBuufW6m_0n-OPw".to_string()
}

fn default_range() -> String {
    "Transactions!A2:Z1000".to_string()
}

fn default_token_helper() -> Option<String> {
    Some("~/.openclaw/workspace/scripts/google-token.sh".to_string())
}

fn default_window_days() -> i64 {
    7
}

fn default_max_transactions() -> usize {
    50
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_base: default_sheets_api_base(),
            sheet_id: default_sheet_id(),
            range: default_range(),
            token_helper: default_token_helper(),
            window_days: default_window_days(),
            max_transactions: default_max_transactions(),
        }
    }
}

/// Placeholder values used when a live source is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackConfig {
    #[serde(default = "default_deal_revenue")]
    pub deal_revenue: DealRevenue,
    #[serde(default = "default_sms_stats")]
    pub sms_stats: OutreachStats,
    #[serde(default = "default_email_stats")]
    pub email_stats: OutreachStats,
    #[serde(default = "default_sample_charges")]
    pub sample_charges: Vec<SampleEntry>,
    #[serde(default = "default_sample_revenue")]
    pub sample_revenue: Vec<SampleEntry>,
}

fn default_deal_revenue() -> DealRevenue {
    DealRevenue {
        total_revenue: 162_000.0,
        deal_count: 18,
        last_24h: 0.0,
    }
}

fn default_sms_stats() -> OutreachStats {
    OutreachStats {
        today: 50,
        this_week: 350,
        this_month: 1500,
    }
}

fn default_email_stats() -> OutreachStats {
    OutreachStats {
        today: 8,
        this_week: 45,
        this_month: 180,
    }
}

fn sample(amount: f64, description: &str, account: &str, category: Option<&str>) -> SampleEntry {
    SampleEntry {
        amount,
        description: description.to_string(),
        account: account.to_string(),
        category: category.map(str::to_string),
    }
}

fn default_sample_charges() -> Vec<SampleEntry> {
    vec![
        sample(-87.50, "Uber to Carlsbad Office", "Chase Sapphire", Some("Transportation")),
        sample(-2745.00, "Office Rent - LL Ventures", "Business Platinum", Some("Business")),
        sample(-125.99, "Adobe Creative Suite", "Chase Sapphire", Some("Software")),
        sample(-1450.00, "Legal Fees - Andy Antiles Case", "Business Platinum", Some("Legal")),
        sample(-67.99, "Tesla Supercharging", "Chase Sapphire", Some("Transportation")),
        sample(-3200.00, "Marketing Campaign - Facebook Ads", "Business Platinum", Some("Marketing")),
    ]
}

fn default_sample_revenue() -> Vec<SampleEntry> {
    vec![
        sample(8500.00, "LL Ventures Deal - Detroit Property", "Business Account", None),
        sample(1200.00, "Consulting Payment - BlackBox Alchemist", "Chase Business", None),
        sample(850.00, "Investment Dividend - Schwab Portfolio", "Schwab Account", None),
        sample(2100.00, "Course Revenue - Graystone Settlement", "Business Account", None),
    ]
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            deal_revenue: default_deal_revenue(),
            sms_stats: default_sms_stats(),
            email_stats: default_email_stats(),
            sample_charges: default_sample_charges(),
            sample_revenue: default_sample_revenue(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleEntry {
    pub amount: f64,
    pub description: String,
    /// Card for charges, receiving account for revenue.
    pub account: String,
    /// Charges carry a spending category; revenue samples have none.
    #[serde(default)]
    pub category: Option<String>,
}

// ============================================================================
// Fetch outcomes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Fallback,
}

/// Provenance of one snapshot section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStatus {
    pub source: DataSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Result of a fetcher: live data, or a placeholder plus why it was used.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Live(T),
    Fallback { value: T, reason: String },
}

impl<T> FetchOutcome<T> {
    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        FetchOutcome::Fallback {
            value,
            reason: reason.into(),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, FetchOutcome::Live(_))
    }

    pub fn value(&self) -> &T {
        match self {
            FetchOutcome::Live(value) | FetchOutcome::Fallback { value, .. } => value,
        }
    }

    pub fn status(&self) -> SourceStatus {
        match self {
            FetchOutcome::Live(_) => SourceStatus {
                source: DataSource::Live,
                reason: None,
            },
            FetchOutcome::Fallback { reason, .. } => SourceStatus {
                source: DataSource::Fallback,
                reason: Some(reason.clone()),
            },
        }
    }

    pub fn into_parts(self) -> (T, SourceStatus) {
        let status = self.status();
        match self {
            FetchOutcome::Live(value) | FetchOutcome::Fallback { value, .. } => (value, status),
        }
    }
}

// ============================================================================
// Snapshot data
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRevenue {
    pub total_revenue: f64,
    pub deal_count: usize,
    pub last_24h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachStats {
    pub today: u32,
    pub this_week: u32,
    pub this_month: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// As written in the ledger (`%m/%d/%Y`).
    pub date: String,
    pub amount: f64,
    pub description: String,
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Financial {
    pub transactions: Vec<Transaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges: Option<Vec<Transaction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Vec<Transaction>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskColumn {
    Backlog,
    InProgress,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub column: TaskColumn,
    pub priority: String,
    pub assignee: String,
    pub created: String,
    pub last_update: String,
}

/// Which heuristic decided an agent's `active` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentSignal {
    Default,
    BusinessHours,
    RecentActivity,
    /// Random placeholder, not backed by any real system state.
    Simulated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub active: bool,
    /// Current task.
    pub task: String,
    pub signal: AgentSignal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityKind {
    Revenue,
    Sms,
    Email,
    System,
    Coord,
    Scrape,
    Admin,
    Financial,
    Content,
    Outreach,
    Netlify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityOrigin {
    Derived,
    Canned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub timestamp: String,
    /// 12-hour clock, e.g. "03:45 PM".
    pub time: String,
    pub origin: ActivityOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub deal_revenue: DealRevenue,
    pub sms_stats: OutreachStats,
    pub email_stats: OutreachStats,
}

/// Root document written for the dashboard front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub tasks: Vec<Task>,
    pub financial: Financial,
    pub agents: BTreeMap<String, Agent>,
    pub activities: Vec<ActivityEntry>,
    pub metrics: Metrics,
    /// Section name to live/fallback provenance.
    pub sources: BTreeMap<String, SourceStatus>,
    pub last_updated: String,
}
