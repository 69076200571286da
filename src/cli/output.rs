//! Output formatting for the CLI.

use crate::core::catalogue::{NamedQuery, Section};
use crate::core::error::Result;
use crate::core::writes::WriteOutcome;
use rusqlite::types::Value;

/// Format a single column value.
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Integer(i) => i.to_string(),
        // Debug keeps the trailing ".0" on whole numbers
        Value::Real(f) => format!("{f:?}"),
        Value::Text(s) => format!("'{}'", s.replace('\'', "\\'")),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Format a row as a parenthesised tuple.
pub fn format_row(values: &[Value]) -> String {
    let parts: Vec<String> = values.iter().map(format_value).collect();
    if parts.len() == 1 {
        format!("({},)", parts[0])
    } else {
        format!("({})", parts.join(", "))
    }
}

/// Print a titled section, one line per row.
pub fn print_section(section: &Section, json: bool) -> Result<()> {
    println!();
    println!("=== {} ===", section.title);
    for row in &section.rows {
        if json {
            println!("{}", serde_json::to_string(&row.json)?);
        } else {
            println!("{}", format_row(&row.values));
        }
    }
    Ok(())
}

/// Print the confirmations of a committed write group.
pub fn print_write_outcomes(outcomes: &[WriteOutcome], json: bool) -> Result<()> {
    println!();
    for outcome in outcomes {
        if json {
            println!("{}", serde_json::to_string(outcome)?);
        } else {
            println!("=== {} ===", outcome.op.confirmation());
        }
    }
    Ok(())
}

/// Print the query names with their titles.
pub fn format_query_list(queries: &[NamedQuery]) {
    let width = queries.iter().map(|q| q.name.len()).max().unwrap_or(0);
    for query in queries {
        println!("{:<width$}  {}", query.name, query.title);
    }
}
