use serde::Serialize;
use serde_json::{Map, Value};
use stts_core::format::format_date_time;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

use table::TableOptions;

/// Columns that lead a list table, in this order, when present.
const LEADING_COLUMNS: [&str; 4] = ["id", "status", "lot_number", "name"];

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => {
            let prefs = ui::prefs();
            let options = TableOptions {
                max_width: prefs.term_width,
                color: prefs.table_color,
            };
            Ok(render_table(&serde_json::to_value(value)?, options))
        }
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_table(value: &Value, options: TableOptions) -> String {
    match value {
        Value::Array(items) => render_list(items, options),
        Value::Object(map) => render_record(map, options),
        scalar => cell(scalar),
    }
}

fn render_list(items: &[Value], options: TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }
    if !items.iter().all(Value::is_object) {
        let rows: Vec<Vec<String>> = items.iter().map(|item| vec![cell(item)]).collect();
        return table::render_entity_table(&["value"], &rows, options);
    }

    let headers = list_columns(items.iter().filter_map(Value::as_object));
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| "-".to_string(), |v| column_cell(header, v)))
                .collect()
        })
        .collect();
    table::render_entity_table(&header_refs, &rows, options)
}

/// One record as key/value rows. Child collections and nested records
/// (stages, permit items, a trace's lab record) follow as their own
/// sections.
fn render_record(map: &Map<String, Value>, options: TableOptions) -> String {
    let mut rows = Vec::new();
    let mut sections = Vec::new();
    for key in ordered_keys(map.keys()) {
        let value = &map[key.as_str()];
        match value {
            Value::Object(inner) if is_record(inner) => sections.push((key, value)),
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                sections.push((key, value));
            }
            _ => rows.push(vec![key.clone(), column_cell(&key, value)]),
        }
    }

    let mut out = table::render_entity_table(&["key", "value"], &rows, options);
    for (key, value) in sections {
        out.push_str(&format!("\n\n{key}:\n"));
        out.push_str(&render_table(value, options));
    }
    out
}

/// Nested objects that carry an id are records worth their own section;
/// free-form JSON (reports, test results) stays inline.
fn is_record(map: &Map<String, Value>) -> bool {
    map.contains_key("id") || map.contains_key("lot_number")
}

fn list_columns<'a>(rows: impl Iterator<Item = &'a Map<String, Value>>) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for map in rows {
        for key in map.keys() {
            if !seen.contains(key) {
                seen.push(key.clone());
            }
        }
    }
    ordered_keys(seen.iter())
}

fn ordered_keys<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut keys: Vec<String> = keys.cloned().collect();
    keys.sort_by_key(|key| {
        let rank = LEADING_COLUMNS
            .iter()
            .position(|lead| lead == key)
            .unwrap_or(LEADING_COLUMNS.len());
        (rank, key.clone())
    });
    keys
}

/// Timestamps read better as `5 Mar, 2024, 2:30 PM` in a table.
fn column_cell(key: &str, value: &Value) -> String {
    match value {
        Value::String(text) if is_time_column(key) => format_date_time(text),
        Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
            format!("{} {key}", items.len())
        }
        other => cell(other),
    }
}

fn is_time_column(key: &str) -> bool {
    key.ends_with("_at") || matches!(key, "date_planted" | "valid_until")
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn plain() -> TableOptions {
        TableOptions {
            max_width: None,
            color: false,
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&json!({"id": "prm-1", "quantity": 7}), OutputFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["id"], "prm-1");
        assert_eq!(parsed["quantity"], 7);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&json!({"id": "prm-1", "quantity": 7}), OutputFormat::Raw).unwrap();
        assert!(!out.contains('\n'));
        assert!(out.contains("\"prm-1\""));
    }

    #[test]
    fn list_columns_lead_with_id_and_status() {
        let value = json!([
            {"country": "Kenya", "status": "pending", "id": "prm-1", "created_at": "2024-03-05T14:30:00Z"}
        ]);
        let out = render_table(&value, plain());
        let header: Vec<&str> = out.lines().next().unwrap().split_whitespace().collect();
        assert_eq!(header, vec!["id", "status", "country", "created_at"]);
        assert!(out.contains("5 Mar, 2024, 2:30 PM"));
        assert!(!out.contains("2024-03-05T14:30:00Z"));
    }

    #[test]
    fn record_children_become_sections() {
        let value = json!({
            "id": "plr-1",
            "status": "assigned_inspector",
            "stages": [
                {"id": "stg-1", "position": 1, "name": "Flowering", "status": "pending"}
            ],
            "report": {"off_types": 0}
        });
        let out = render_table(&value, plain());
        assert!(out.contains("\n\nstages:\n"));
        assert!(out.contains("Flowering"));
        assert!(out.contains("{\"off_types\":0}"));
    }

    #[test]
    fn trace_sections_render_nested_records() {
        let value = json!({
            "lot_number": "LOT-1",
            "lab_record": {"id": "lab-1", "lot_number": "LOT-1", "status": "marketable"},
            "mother_lot": null
        });
        let out = render_table(&value, plain());
        assert!(out.contains("lab_record:"));
        assert!(out.contains("marketable"));
        assert!(out.lines().any(|line| line.starts_with("mother_lot") && line.contains('-')));
    }

    #[test]
    fn string_lists_join_in_one_cell() {
        let value = json!([{"id": "rol-1", "permissions": ["can_apply", "can_trade"]}]);
        let out = render_table(&value, plain());
        assert!(out.contains("can_apply, can_trade"));
    }

    #[test]
    fn plain_names_list_renders_one_column() {
        let out = render_table(&json!(["Permit", "Order"]), plain());
        assert!(out.starts_with("value"));
        assert!(out.contains("Permit"));
    }

    #[test]
    fn table_of_empty_list_says_so() {
        assert_eq!(render_table(&json!([]), plain()), "(no rows)");
    }
}
