// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for the CLI

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde_json::{Map, Value as Json};
use wmilite::{Object, Variant};

use super::commands::OutputFormat;

/// Materialized query output: chosen columns and one row of values per record
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Variant>>,
}

impl ResultSet {
    /// Collect records into rows
    ///
    /// With no explicit columns, every property name seen is used, in
    /// first-seen order. Missing properties read as `Variant::Empty`.
    pub fn from_objects<I>(objects: I, columns: &[String]) -> Self
    where
        I: IntoIterator<Item = Object>,
    {
        let objects: Vec<Object> = objects.into_iter().collect();

        let columns: Vec<String> = if columns.is_empty() {
            let mut seen: Vec<String> = Vec::new();
            for object in &objects {
                for name in object.property_names() {
                    if !seen.iter().any(|c| c.eq_ignore_ascii_case(&name)) {
                        seen.push(name);
                    }
                }
            }
            seen
        } else {
            columns.to_vec()
        };

        let rows = objects
            .iter()
            .map(|object| {
                columns
                    .iter()
                    .map(|column| object.get(column).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct ResultFormatter;

impl ResultFormatter {
    pub fn format(result: &ResultSet, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_table(result),
            OutputFormat::Json => Self::format_json(result),
            OutputFormat::Csv => Self::format_csv(result),
        }
    }

    fn format_table(result: &ResultSet) -> String {
        if result.is_empty() {
            return "(0 rows)".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(result.columns.clone());

        for row in &result.rows {
            table.add_row(row.iter().map(Variant::to_string).collect::<Vec<_>>());
        }

        let noun = if result.len() == 1 { "row" } else { "rows" };
        format!("{}\n({} {})", table, result.len(), noun)
    }

    fn format_json(result: &ResultSet) -> String {
        let rows: Vec<Json> = result
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Json> = result
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(column, value)| {
                        (
                            column.clone(),
                            serde_json::to_value(value).unwrap_or(Json::Null),
                        )
                    })
                    .collect();
                Json::Object(object)
            })
            .collect();

        serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_csv(result: &ResultSet) -> String {
        let mut output = String::new();
        output.push_str(&csv_record(result.columns.iter().map(String::as_str)));
        for row in &result.rows {
            let fields: Vec<String> = row.iter().map(Variant::to_string).collect();
            output.push_str(&csv_record(fields.iter().map(String::as_str)));
        }
        output
    }
}

fn csv_record<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    let mut line = fields.map(csv_field).collect::<Vec<_>>().join(",");
    line.push('\n');
    line
}

/// Quote a field when it contains a delimiter, a quote or a line break
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        ResultSet {
            columns: vec!["DeviceID".to_string(), "VolumeName".to_string()],
            rows: vec![
                vec![Variant::from("C:"), Variant::from("Windows, main")],
                vec![Variant::from("D:"), Variant::Null],
            ],
        }
    }

    #[test]
    fn test_csv_quotes_delimiters() {
        let csv = ResultFormatter::format(&sample(), OutputFormat::Csv);
        assert_eq!(csv, "DeviceID,VolumeName\nC:,\"Windows, main\"\nD:,\n");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_json_keeps_nulls() {
        let json = ResultFormatter::format(&sample(), OutputFormat::Json);
        let parsed: Json = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["DeviceID"], "C:");
        assert!(parsed[1]["VolumeName"].is_null());
    }

    #[test]
    fn test_table_row_count() {
        let table = ResultFormatter::format(&sample(), OutputFormat::Table);
        assert!(table.contains("DeviceID"));
        assert!(table.ends_with("(2 rows)"));
        assert_eq!(
            ResultFormatter::format(&ResultSet::default(), OutputFormat::Table),
            "(0 rows)"
        );
    }
}
