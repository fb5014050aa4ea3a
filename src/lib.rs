//! VirusTotal reputation lookups for IP addresses and domains.
//!
//! Reads a newline-delimited list of entries, validates each one as an IP
//! address or a domain, queries the VirusTotal v3 API for every valid entry
//! and prints a short reputation summary, pausing between requests to stay
//! within the configured rate limit.
//!
//! # Features
//!
//! - **Input Validation** - IPv4/IPv6 parsing and a simple domain pattern
//! - **Rate Limiting** - Fixed delay between requests, wait-and-retry on HTTP 429
//! - **Summaries** - Detection ratio, community score, country or registration date
//!
//! # Example Configuration
//!
//! ```json
//! {
//!   "rate_limit_per_minute": 4,
//!   "api_key": "${VT_API_KEY}"
//! }
//! ```

pub mod config;
pub mod entry;
pub mod lookup;
pub mod pacing;
pub mod providers;
pub mod report;

pub use config::Config;
pub use entry::EntryKind;
pub use lookup::{Lookup, RunStats};
