//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (load_engine, parse_as_of, print_json) and validate
//! - `dashboard` - Dashboard statistics and runway
//! - `reports` - Analytics report commands

pub mod core;
pub mod dashboard;
pub mod reports;

// Re-export command functions for main.rs
pub use self::core::*;
pub use dashboard::*;
pub use reports::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
