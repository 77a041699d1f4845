//! Table rendering for terminal output

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::helpers::format_number;

/// A labelled value, one table row
#[derive(Debug, Clone, Tabled)]
pub struct StatRow {
    #[tabled(rename = "STATISTIC")]
    pub name: String,
    #[tabled(rename = "VALUE")]
    pub value: String,
}

impl StatRow {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Row holding a formatted number
    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, format_number(value))
    }
}

/// Render rows with the standard rounded style
pub fn render<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}
