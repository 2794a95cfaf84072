use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// A table column: header text and the JSON key it reads.
pub type Column = (&'static str, &'static str);

/// Render a serializable response to a string in the requested format.
///
/// In table form an object becomes a two-column key/value listing.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Table => {
            let rows = match serde_json::to_value(value)? {
                Value::Object(map) => map
                    .iter()
                    .map(|(key, value)| vec![key.clone(), value_to_cell(value)])
                    .collect(),
                scalar => vec![vec![String::from("value"), value_to_cell(&scalar)]],
            };
            Ok(table::render_table(&["key", "value"], &rows, table_options()))
        }
    }
}

/// Render a list. JSON formats keep every field; the table shows `columns`.
pub fn render_list<T: Serialize>(
    items: &[T],
    columns: &[Column],
    format: OutputFormat,
) -> anyhow::Result<String> {
    if format != OutputFormat::Table {
        return render(&items, format);
    }
    if items.is_empty() {
        return Ok(String::from("(no rows)"));
    }

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let value = serde_json::to_value(item)?;
        rows.push(
            columns
                .iter()
                .map(|(_, key)| value.get(key).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>(),
        );
    }
    let headers = columns.iter().map(|(header, _)| *header).collect::<Vec<_>>();
    Ok(table::render_table(&headers, &rows, table_options()))
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Print a list in the requested format.
pub fn output_list<T: Serialize>(
    items: &[T],
    columns: &[Column],
    format: OutputFormat,
) -> anyhow::Result<()> {
    println!("{}", render_list(items, columns, format)?);
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) if v.is_empty() => String::from("-"),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}
