//! Keyword routing of board tasks to agents.
//!
//! Categories are checked in order and the first hit wins, so a task that
//! mentions both a property and a post belongs to the real-estate agent.

pub const REAL_ESTATE_AGENT: &str = "Zillow Bot";
pub const CONTENT_AGENT: &str = "Ghost";
pub const ADMIN_AGENT: &str = "Admin";
pub const DEFAULT_AGENT: &str = "Arthur";

const REAL_ESTATE_KEYWORDS: &[&str] = &["zillow", "real estate", "property", "section 8"];
const CONTENT_KEYWORDS: &[&str] = &["content", "write", "post", "social", "twitter", "instagram"];
const ADMIN_KEYWORDS: &[&str] = &["asana", "admin", "manage", "organize", "pipeline"];

const ROUTES: &[(&[&str], &str)] = &[
    (REAL_ESTATE_KEYWORDS, REAL_ESTATE_AGENT),
    (CONTENT_KEYWORDS, CONTENT_AGENT),
    (ADMIN_KEYWORDS, ADMIN_AGENT),
];

/// Pick the owning agent for a task from its title and description.
pub fn assign_agent(title: &str, description: &str) -> &'static str {
    let title = title.to_lowercase();
    let description = description.to_lowercase();

    ROUTES
        .iter()
        .find(|(keywords, _)| {
            keywords
                .iter()
                .any(|kw| title.contains(kw) || description.contains(kw))
        })
        .map(|(_, agent)| *agent)
        .unwrap_or(DEFAULT_AGENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_estate_wins_over_content() {
        assert_eq!(assign_agent("Write Section 8 listing post", ""), "Zillow Bot");
    }

    #[test]
    fn test_content_wins_over_admin() {
        assert_eq!(assign_agent("Organize social calendar", ""), "Ghost");
    }

    #[test]
    fn test_admin_match_in_description() {
        assert_eq!(assign_agent("Weekly review", "Clean up the Asana board"), "Admin");
    }

    #[test]
    fn test_case_folded() {
        assert_eq!(assign_agent("ZILLOW scrape", ""), "Zillow Bot");
    }

    #[test]
    fn test_default_owner() {
        assert_eq!(assign_agent("Call the bank", "about the loan"), "Arthur");
        assert_eq!(assign_agent("", ""), "Arthur");
    }
}
