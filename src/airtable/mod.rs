//! Airtable records integration.
//!
//! Two reads go through the same REST client: contracted deals for the
//! revenue tracker, and recent agent responses for the admin agent's
//! activity signal.

pub mod client;
pub mod deals;

pub use client::{AirtableClient, AirtableRecord, RecordQuery, RecordsApi};
