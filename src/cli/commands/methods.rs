//! `valuekit methods` command - list built-in valuation methods

use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::output::{effective_format, print_serialized};
use crate::cli::table::render;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::valuation::ValuationMethod;

#[derive(Debug, Serialize, Tabled)]
struct MethodRow {
    #[tabled(rename = "METHOD")]
    method: &'static str,
    #[tabled(rename = "PARAMETERS")]
    parameters: String,
    #[tabled(rename = "FORMULA")]
    description: &'static str,
}

pub fn run(global: &GlobalOpts) -> Result<()> {
    let rows: Vec<MethodRow> = ValuationMethod::ALL
        .iter()
        .map(|m| MethodRow {
            method: m.name(),
            parameters: m.parameters().join(", "),
            description: m.description(),
        })
        .collect();

    match effective_format(global.format, false) {
        OutputFormat::Table => println!("{}", render(rows)),
        OutputFormat::Tsv => {
            for row in rows {
                println!("{}\t{}", row.method, row.parameters);
            }
        }
        format => print_serialized(&rows, format)?,
    }
    Ok(())
}
