//! # Rift Agent
//!
//! A League of Legends esports analytics pipeline over the GRID data feeds.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (game records, draft events, aggregates)
//! - **fetch**: HTTP transport and content-type driven payload decoding
//! - **cache**: In-memory TTL result cache shared by the fetchers
//! - **grid**: Provider client (GraphQL catalog/live feeds, REST file and
//!   statistics endpoints)
//! - **games**: Per-game fetching and the concurrent per-series fan-out
//! - **calculate**: Game metrics, draft aggregation, team aggregation
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod cache;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod games;
pub mod grid;
pub mod models;

pub use models::*;

/// Parse an ISO-8601 duration (e.g., "PT1H5M30S") into whole seconds.
///
/// Fractional seconds are truncated. Returns `None` for strings that do
/// not carry the `PT` prefix or any time component.
pub fn iso8601_duration_secs(s: &str) -> Option<u64> {
    let rest = s.trim().strip_prefix("PT")?;
    if rest.is_empty() {
        return None;
    }

    let mut total = 0u64;
    let mut digits = String::new();
    let mut matched = false;

    for c in rest.chars() {
        match c {
            '0'..='9' | '.' => digits.push(c),
            'H' => {
                total += digits.parse::<u64>().ok()? * 3600;
                digits.clear();
                matched = true;
            }
            'M' => {
                total += digits.parse::<u64>().ok()? * 60;
                digits.clear();
                matched = true;
            }
            'S' => {
                total += digits.parse::<f64>().ok()? as u64;
                digits.clear();
                matched = true;
            }
            _ => return None,
        }
    }

    if matched && digits.is_empty() {
        Some(total)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_full() {
        assert_eq!(iso8601_duration_secs("PT1H5M30S"), Some(3930));
    }

    #[test]
    fn test_duration_minutes_seconds() {
        assert_eq!(iso8601_duration_secs("PT32M18S"), Some(1938));
    }

    #[test]
    fn test_duration_seconds_only() {
        assert_eq!(iso8601_duration_secs("PT45S"), Some(45));
    }

    #[test]
    fn test_duration_fractional_seconds_truncate() {
        assert_eq!(iso8601_duration_secs("PT30.5S"), Some(30));
    }

    #[test]
    fn test_duration_hours_only() {
        assert_eq!(iso8601_duration_secs("PT2H"), Some(7200));
    }

    #[test]
    fn test_duration_invalid() {
        assert_eq!(iso8601_duration_secs("32M"), None);
        assert_eq!(iso8601_duration_secs("PT"), None);
        assert_eq!(iso8601_duration_secs("PT5X"), None);
        assert_eq!(iso8601_duration_secs(""), None);
    }

    #[test]
    fn test_duration_trailing_digits_rejected() {
        assert_eq!(iso8601_duration_secs("PT5M3"), None);
    }
}
