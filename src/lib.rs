pub mod activity;
pub mod agents;
pub mod airtable;
pub mod assignment;
pub mod board;
pub mod credentials;
pub mod error;
pub mod finance;
pub mod google_api;
pub mod outreach;
pub mod services;
pub mod state;
pub mod types;
pub mod util;
