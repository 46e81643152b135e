//! REST client for the Airtable records API.
//!
//! Uses blocking reqwest with Bearer token auth. Listing follows the
//! `offset` cursor until Airtable stops returning one. A listing that
//! still has a cursor after the page cap is an error, never a partial result.

use serde::Deserialize;

use crate::error::FetchError;

/// Default upper bound on pages followed for one listing.
pub const MAX_PAGES: usize = 50;

/// One Airtable row. Field values are kept as raw JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirtableRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Query options for a list-records call.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub filter_by_formula: Option<String>,
    pub fields: Vec<String>,
    pub max_records: Option<u32>,
}

/// Read access to an Airtable-shaped records store.
pub trait RecordsApi {
    fn list_records(
        &self,
        base_id: &str,
        table: &str,
        query: &RecordQuery,
    ) -> Result<Vec<AirtableRecord>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<AirtableRecord>,
    offset: Option<String>,
}

pub struct AirtableClient {
    client: reqwest::blocking::Client,
    api_base: String,
    token: String,
    max_pages: usize,
}

impl AirtableClient {
    pub fn new(client: reqwest::blocking::Client, api_base: &str, token: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
            max_pages: MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    fn table_url(&self, base_id: &str, table: &str) -> Result<reqwest::Url, FetchError> {
        let mut url = reqwest::Url::parse(&self.api_base)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", self.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.api_base.clone()))?
            .pop_if_empty()
            .push(base_id)
            .push(table);
        Ok(url)
    }
}

impl RecordsApi for AirtableClient {
    fn list_records(
        &self,
        base_id: &str,
        table: &str,
        query: &RecordQuery,
    ) -> Result<Vec<AirtableRecord>, FetchError> {
        let url = self.table_url(base_id, table)?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0;

        loop {
            // Only reached again while a cursor is pending
            if pages == self.max_pages {
                log::warn!(
                    "Airtable: {}/{} still paging after {} pages, discarding {} records",
                    base_id,
                    table,
                    pages,
                    records.len()
                );
                return Err(FetchError::PageLimit { pages });
            }
            pages += 1;

            let mut params: Vec<(&str, String)> = Vec::new();
            if let Some(formula) = &query.filter_by_formula {
                params.push(("filterByFormula", formula.clone()));
            }
            for field in &query.fields {
                params.push(("fields[]", field.clone()));
            }
            if let Some(max) = query.max_records {
                params.push(("maxRecords", max.to_string()));
            }
            if let Some(ref cursor) = offset {
                params.push(("offset", cursor.clone()));
            }

            let resp = self
                .client
                .get(url.clone())
                .bearer_auth(&self.token)
                .query(&params)
                .send()?;

            let status = resp.status();
            if !status.is_success() {
                let message = resp.text().unwrap_or_default();
                return Err(FetchError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let page: ListResponse = resp.json()?;
            records.extend(page.records);

            if let Some(max) = query.max_records {
                if records.len() >= max as usize {
                    records.truncate(max as usize);
                    break;
                }
            }

            offset = page.offset;
            if offset.is_none() {
                break;
            }
        }

        log::debug!(
            "Airtable: {} records from {}/{}",
            records.len(),
            base_id,
            table
        );
        Ok(records)
    }
}
