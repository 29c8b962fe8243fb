use crate::domain::model::{RawRow, RawTable};
use crate::utils::error::Result;
use serde_json::Value;

/// Parses a published sheet: first row is the header, blank lines are
/// skipped and each cell gets the narrowest type it reads as.
pub fn parse_csv(bytes: &[u8]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let data = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), infer_cell(cell)))
            .collect();
        rows.push(RawRow { data });
    }

    tracing::debug!("Parsed {} columns and {} rows", headers.len(), rows.len());
    Ok(RawTable { headers, rows })
}

fn infer_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match trimmed {
        "true" | "TRUE" => return Value::Bool(true),
        "false" | "FALSE" => return Value::Bool(false),
        _ => {}
    }
    if !is_plain_number(trimmed) {
        return Value::String(cell.to_string());
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    // only floats that print back the same; "1.50" stays text
    if let Some(number) = trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && f.to_string() == trimmed)
        .and_then(serde_json::Number::from_f64)
    {
        return Value::Number(number);
    }
    Value::String(cell.to_string())
}

/// Optional minus, digits without a leading zero, optional fraction. Phone
/// numbers (`+7...`) and zero-padded codes (`007`) do not qualify.
fn is_plain_number(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (int_part, fraction) = match unsigned.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (unsigned, None),
    };

    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let int_ok = digits(int_part) && (int_part == "0" || !int_part.starts_with('0'));
    int_ok && fraction.map_or(true, digits)
}
