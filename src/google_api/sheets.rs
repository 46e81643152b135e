//! Google Sheets API v4: read a cell range as rows of strings.

use serde::Deserialize;

use crate::error::FetchError;

/// Read access to spreadsheet values.
pub trait SheetsApi {
    fn read_range(
        &self,
        access_token: &str,
        sheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

pub struct SheetsClient {
    client: reqwest::blocking::Client,
    api_base: String,
}

impl SheetsClient {
    pub fn new(client: reqwest::blocking::Client, api_base: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn values_url(&self, sheet_id: &str, range: &str) -> Result<reqwest::Url, FetchError> {
        let mut url = reqwest::Url::parse(&self.api_base)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", self.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.api_base.clone()))?
            .pop_if_empty()
            .push(sheet_id)
            .push("values")
            .push(range);
        Ok(url)
    }
}

impl SheetsApi for SheetsClient {
    fn read_range(
        &self,
        access_token: &str,
        sheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, FetchError> {
        let url = self.values_url(sheet_id, range)?;
        let resp = self.client.get(url).bearer_auth(access_token).send()?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ValueRange = resp.json()?;
        Ok(rows_as_strings(body.values))
    }
}

/// Sheets returns formatted strings by default, but numbers and booleans
/// show up under other render options.
fn rows_as_strings(values: Vec<Vec<serde_json::Value>>) -> Vec<Vec<String>> {
    values
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_url() {
        let client = SheetsClient::new(
            reqwest::blocking::Client::new(),
            "https://sheets.googleapis.com/v4/spreadsheets",
        );
        let url = client
            .values_url("sheet123", "Transactions!A2:Z1000")
            .unwrap();
        assert!(url
            .as_str()
            .starts_with("https://sheets.googleapis.com/v4/spreadsheets/sheet123/values/Transactions"));
        assert!(url.as_str().ends_with("A2:Z1000"));
    }

    #[test]
    fn test_value_range_mixed_cells() {
        let json = r#"{
            "range": "Transactions!A2:Z1000",
            "majorDimension": "ROWS",
            "values": [["02/07/2026", "Coffee", -4.5, null, true]]
        }"#;
        let body: ValueRange = serde_json::from_str(json).unwrap();
        let rows = rows_as_strings(body.values);
        assert_eq!(rows[0], vec!["02/07/2026", "Coffee", "-4.5", "", "true"]);
    }

    #[test]
    fn test_value_range_empty_sheet() {
        let body: ValueRange = serde_json::from_str(r#"{"range": "A1:B2"}"#).unwrap();
        assert!(body.values.is_empty());
    }
}
