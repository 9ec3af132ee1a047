/// CSV ingestion for datasets.
///
/// Supported format:
/// - UTF-8, comma-separated
/// - Optional header row (auto-detected: the first row is a header if it
///   contains any non-numeric, non-empty cell)
/// - Double-quoted fields with embedded commas are handled correctly
///
/// Label modes:
/// - `Binary`     — the last column is 0 or 1; one output unit.
/// - `ClassIndex` — the last column is an integer class index (0-based),
///   one-hot encoded into `n_classes` outputs.
/// - `Vector`     — the last `n_label_cols` columns are the 0/1 label vector.
use std::path::Path;

use crate::data::example::Example;
use crate::data::features::text_example;
use crate::error::{NnError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    Binary,
    ClassIndex { n_classes: usize },
    Vector { n_label_cols: usize },
}

impl LabelMode {
    pub fn num_label_cols(&self) -> usize {
        match *self {
            LabelMode::Binary | LabelMode::ClassIndex { .. } => 1,
            LabelMode::Vector { n_label_cols } => n_label_cols,
        }
    }
}

/// Parses `binary`, `class:N` or `vector:N`.
impl std::str::FromStr for LabelMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (kind, n) = match s.split_once(':') {
            Some((kind, n)) => {
                let n = n.parse::<usize>().map_err(|_| format!("'{n}' is not a count"))?;
                (kind, Some(n))
            }
            None => (s, None),
        };
        match (kind, n) {
            ("binary", None) => Ok(LabelMode::Binary),
            ("class", Some(n)) if n >= 2 => Ok(LabelMode::ClassIndex { n_classes: n }),
            ("vector", Some(n)) if n >= 1 => Ok(LabelMode::Vector { n_label_cols: n }),
            _ => Err(format!("unknown label mode '{s}' (expected binary, class:N or vector:N)")),
        }
    }
}

/// Parses CSV text into examples.
pub fn parse_csv(text: &str, label_mode: LabelMode) -> Result<Vec<Example>> {
    let mut examples = Vec::new();

    for (row, cells) in data_rows(text, |cells| cells.iter().any(|c| !is_number(c))) {
        let n_label = label_mode.num_label_cols();
        if cells.len() < n_label + 1 {
            return Err(NnError::DataFormat {
                row,
                message: format!("expected at least {} columns, got {}", n_label + 1, cells.len()),
            });
        }
        let split = cells.len() - n_label;
        let features = parse_floats(&cells[..split], row)?;
        let label = parse_label(&cells[split..], label_mode, row)?;
        examples.push(Example::new(features, label).map_err(|e| at_row(e, row))?);
    }

    finish(examples)
}

/// Parses `text,label` rows, turning the text into letter frequencies.
/// Every column but the last is joined back into the text.
pub fn parse_text_csv(text: &str, label_mode: LabelMode) -> Result<Vec<Example>> {
    let mut examples = Vec::new();
    let n_label = label_mode.num_label_cols();

    let header = |cells: &[String]| {
        cells.len() <= n_label || cells[cells.len() - n_label..].iter().any(|c| !is_number(c))
    };
    for (row, cells) in data_rows(text, header) {
        if cells.len() < n_label + 1 {
            return Err(NnError::DataFormat {
                row,
                message: format!("expected text followed by {n_label} label column(s)"),
            });
        }
        let split = cells.len() - n_label;
        let label = parse_label(&cells[split..], label_mode, row)?;
        let body = cells[..split].join(",");
        examples.push(text_example(&body, label).map_err(|e| at_row(e, row))?);
    }

    finish(examples)
}

pub fn load_csv<P: AsRef<Path>>(path: P, label_mode: LabelMode) -> Result<Vec<Example>> {
    parse_csv(&read(path.as_ref())?, label_mode)
}

pub fn load_text_csv<P: AsRef<Path>>(path: P, label_mode: LabelMode) -> Result<Vec<Example>> {
    parse_text_csv(&read(path.as_ref())?, label_mode)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| NnError::Io { path: path.to_path_buf(), source })
}

/// Non-empty rows with their 1-based line numbers. The first row is dropped
/// when `is_header` says so.
fn data_rows<F>(text: &str, is_header: F) -> Vec<(usize, Vec<String>)>
where
    F: Fn(&[String]) -> bool,
{
    let mut rows: Vec<(usize, Vec<String>)> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, parse_csv_row(line.trim())))
        .collect();
    if rows.first().is_some_and(|(_, cells)| is_header(cells)) {
        rows.remove(0);
    }
    rows
}

fn finish(examples: Vec<Example>) -> Result<Vec<Example>> {
    if examples.is_empty() {
        return Err(NnError::DataFormat { row: 0, message: "CSV contains no data rows".into() });
    }
    crate::data::example::dimensions(&examples)?;
    Ok(examples)
}

fn at_row(err: NnError, row: usize) -> NnError {
    match err {
        NnError::DataFormat { message, .. } => NnError::DataFormat { row, message },
        other => other,
    }
}

fn is_number(cell: &str) -> bool {
    let t = cell.trim();
    t.is_empty() || t.parse::<f64>().is_ok()
}

fn parse_label(cells: &[String], label_mode: LabelMode, row: usize) -> Result<Vec<u8>> {
    match label_mode {
        LabelMode::Binary => Ok(vec![parse_bit(&cells[0], row)?]),
        LabelMode::ClassIndex { n_classes } => {
            let class: usize = cells[0].trim().parse().map_err(|_| NnError::DataFormat {
                row,
                message: format!("class index '{}' is not a non-negative integer", cells[0]),
            })?;
            if class >= n_classes {
                return Err(NnError::DataFormat {
                    row,
                    message: format!("class index {class} >= n_classes {n_classes}"),
                });
            }
            let mut one_hot = vec![0u8; n_classes];
            one_hot[class] = 1;
            Ok(one_hot)
        }
        LabelMode::Vector { .. } => cells.iter().map(|c| parse_bit(c, row)).collect(),
    }
}

fn parse_bit(cell: &str, row: usize) -> Result<u8> {
    match cell.trim() {
        "0" => Ok(0),
        "1" => Ok(1),
        other => Err(NnError::DataFormat {
            row,
            message: format!("label '{other}' is not 0 or 1"),
        }),
    }
}

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Escaped quote inside quoted field.
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Parses feature cells as finite `f64`s.
fn parse_floats(cells: &[String], row: usize) -> Result<Vec<f64>> {
    cells
        .iter()
        .map(|c| match c.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(NnError::DataFormat { row, message: format!("'{c}' is not a valid number") }),
        })
        .collect()
}
