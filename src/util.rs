use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeZone};

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().unwrap_or_default().join(rest),
        None if path == "~" => dirs::home_dir().unwrap_or_default(),
        None => PathBuf::from(path),
    }
}

/// Replace `path` with `content` via a temp file in the same directory and a rename.
///
/// Readers see either the old file or the new one, never a partial write.
pub fn atomic_write_str(path: &Path, content: &str) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Build the shared blocking HTTP client.
pub fn http_client(timeout: Duration) -> reqwest::blocking::Client {
    match reqwest::blocking::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            log::warn!("HTTP client builder failed ({}), using defaults", e);
            reqwest::blocking::Client::new()
        }
    }
}

/// Cut `text` to `max` characters, appending "..." when anything was dropped.
///
/// Example: ("abcdef", 3) → "abc..."
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Group an integer with thousands separators.
///
/// Example: 162000 → "162,000"
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Currency amount with thousands separators, keeping up to two decimals.
///
/// Whole amounts print without a fraction: 162000.0 → "162,000",
/// 14500.5 → "14,500.5".
pub fn format_amount(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as i64;
    let whole = format_thousands(cents / 100);
    let body = match cents % 100 {
        0 => whole,
        frac => format!("{}.{}", whole, format!("{:02}", frac).trim_end_matches('0')),
    };
    if value < 0.0 && cents != 0 {
        format!("-{}", body)
    } else {
        body
    }
}

/// 12-hour clock label, e.g. "03:45 PM".
pub fn clock_label<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%I:%M %p").to_string()
}
