use crate::domain::model::{GraduateRecord, RawRow, RawTable, SchemaMode, SchemaVariant};
use crate::utils::error::{AppError, Result};
use serde_json::Value;

/// Column labels for one sheet layout.
#[derive(Debug)]
pub struct SchemaColumns {
    /// Combined name column; when absent the name is assembled from `name_parts`.
    pub full_name: Option<&'static str>,
    /// Surname, given name, patronymic, in that order.
    pub name_parts: &'static [&'static str],
    pub previous_surname: &'static str,
    pub graduation_year: &'static str,
    pub city: &'static str,
    pub country: &'static str,
    pub latitude: &'static str,
    pub longitude: &'static str,
    pub profession: &'static str,
    /// First non-empty wins.
    pub contact: &'static [&'static str],
    pub photo_url: &'static str,
    pub comment: &'static str,
    pub timestamp: &'static str,
}

pub static ENGLISH_COLUMNS: SchemaColumns = SchemaColumns {
    full_name: Some("full_name"),
    name_parts: &[],
    previous_surname: "previous_surname",
    graduation_year: "graduation_year",
    city: "city",
    country: "country",
    latitude: "latitude",
    longitude: "longitude",
    profession: "profession",
    contact: &["telegram", "email"],
    photo_url: "photo_url",
    comment: "comment",
    timestamp: "timestamp",
};

pub static LOCALIZED_COLUMNS: SchemaColumns = SchemaColumns {
    full_name: None,
    name_parts: &["Фамилия", "Имя", "Отчество"],
    previous_surname: "Прежняя фамилия",
    graduation_year: "Год выпуска",
    city: "Город",
    country: "Страна",
    latitude: "Широта",
    longitude: "Долгота",
    profession: "Профессия",
    contact: &["Telegram", "Email"],
    photo_url: "Фото",
    comment: "Комментарий",
    timestamp: "Отметка времени",
};

impl SchemaVariant {
    pub fn columns(&self) -> &'static SchemaColumns {
        match self {
            SchemaVariant::English => &ENGLISH_COLUMNS,
            SchemaVariant::Localized => &LOCALIZED_COLUMNS,
        }
    }
}

/// Picks a layout from the header row. A combined `full_name` column wins
/// over localized name parts when a sheet carries both.
pub fn detect_schema(headers: &[String]) -> Option<SchemaVariant> {
    let has = |label: &str| headers.iter().any(|h| h == label);

    if ENGLISH_COLUMNS.full_name.is_some_and(has) {
        Some(SchemaVariant::English)
    } else if LOCALIZED_COLUMNS.name_parts[..2].iter().any(|label| has(*label)) {
        Some(SchemaVariant::Localized)
    } else {
        None
    }
}

pub fn resolve_schema(headers: &[String], mode: SchemaMode) -> Result<SchemaVariant> {
    match mode {
        SchemaMode::English => Ok(SchemaVariant::English),
        SchemaMode::Localized => Ok(SchemaVariant::Localized),
        SchemaMode::Auto => detect_schema(headers).ok_or_else(|| AppError::SchemaError {
            message: format!(
                "no name column among headers [{}]",
                headers.join(", ")
            ),
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeReport {
    pub schema: SchemaVariant,
    pub records: Vec<GraduateRecord>,
    pub dropped: usize,
}

/// Resolves the layout for a fetched sheet and normalizes its rows.
pub fn normalize_table(table: &RawTable, mode: SchemaMode) -> Result<NormalizeReport> {
    let schema = resolve_schema(&table.headers, mode)?;
    let records = normalize(&table.rows, schema);
    let dropped = table.rows.len() - records.len();

    tracing::debug!(
        "Normalized {} of {} rows as {} layout ({} dropped)",
        records.len(),
        table.rows.len(),
        schema,
        dropped
    );

    Ok(NormalizeReport {
        schema,
        records,
        dropped,
    })
}

/// Rows without a name or without usable coordinates are left out silently.
pub fn normalize(rows: &[RawRow], schema: SchemaVariant) -> Vec<GraduateRecord> {
    rows.iter()
        .filter_map(|row| normalize_row(row, schema))
        .collect()
}

pub fn normalize_row(row: &RawRow, schema: SchemaVariant) -> Option<GraduateRecord> {
    let columns = schema.columns();

    let full_name = assemble_name(row, columns);
    let latitude = parse_coordinate(row.get(columns.latitude))?;
    let longitude = parse_coordinate(row.get(columns.longitude))?;

    let contact = columns
        .contact
        .iter()
        .find_map(|label| cell_text(row.get(label)));

    let record = GraduateRecord::new(full_name, latitude, longitude)?
        .with_previous_surname(cell_text(row.get(columns.previous_surname)).unwrap_or_default())
        .with_graduation_year(parse_year(row.get(columns.graduation_year)))
        .with_city(cell_text(row.get(columns.city)))
        .with_country(cell_text(row.get(columns.country)))
        .with_profession(cell_text(row.get(columns.profession)))
        .with_contact(contact)
        .with_photo_url(cell_text(row.get(columns.photo_url)))
        .with_comment(cell_text(row.get(columns.comment)))
        .with_timestamp(cell_text(row.get(columns.timestamp)));

    Some(record)
}

fn assemble_name(row: &RawRow, columns: &SchemaColumns) -> String {
    match columns.full_name {
        Some(label) => cell_text(row.get(label))
            .map(|name| collapse_whitespace(&name))
            .unwrap_or_default(),
        None => {
            let parts: Vec<String> = columns
                .name_parts
                .iter()
                .filter_map(|label| cell_text(row.get(label)))
                .collect();
            collapse_whitespace(&parts.join(" "))
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trimmed, non-empty cell text. Numbers and booleans are rendered back to text.
pub fn cell_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// `None` for missing, non-numeric, non-finite or zero values. A decimal
/// comma is accepted since localized sheets write coordinates that way.
pub fn parse_coordinate(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }?;

    if parsed.is_finite() && parsed != 0.0 {
        Some(parsed)
    } else {
        None
    }
}

fn parse_year(value: Option<&Value>) -> Option<i32> {
    let year = match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;

    i32::try_from(year).ok().filter(|y| *y > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn english_row(name: Value, lat: Value, lon: Value) -> RawRow {
        [
            ("full_name", name),
            ("graduation_year", json!(2005)),
            ("city", json!("Berlin")),
            ("country", json!("Germany")),
            ("latitude", lat),
            ("longitude", lon),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_english_row_is_normalized() {
        let row = english_row(json!("  Ivan   Petrov "), json!(52.52), json!("13.40"));
        let record = normalize_row(&row, SchemaVariant::English).unwrap();

        assert_eq!(record.full_name(), "Ivan Petrov");
        assert_eq!(record.graduation_year(), Some(2005));
        assert_eq!(record.city(), Some("Berlin"));
        assert_eq!(record.latitude(), 52.52);
        assert_eq!(record.longitude(), 13.40);
        assert_eq!(record.previous_surname(), "");
        assert_eq!(record.profession(), None);
    }

    #[test]
    fn test_rows_with_missing_or_bad_coordinates_are_dropped() {
        let rows = vec![
            english_row(json!("A"), Value::Null, json!(13.4)),
            english_row(json!("B"), json!(52.5), json!("east")),
            english_row(json!("C"), json!("n/a"), json!(13.4)),
            english_row(json!("D"), json!(0), json!(0)),
            english_row(json!("E"), json!(52.5), json!(13.4)),
        ];
        let mut without_longitude = english_row(json!("F"), json!(52.5), json!(13.4));
        without_longitude.data.remove("longitude");

        let mut all = rows;
        all.push(without_longitude);

        let records = normalize(&all, SchemaVariant::English);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name(), "E");
    }

    #[test]
    fn test_zero_coordinates_are_treated_as_missing() {
        let row = english_row(json!("Null Island"), json!(0.0), json!(0.0));
        assert!(normalize_row(&row, SchemaVariant::English).is_none());

        let half_zero = english_row(json!("Equator"), json!(0), json!(30.5));
        assert!(normalize_row(&half_zero, SchemaVariant::English).is_none());
    }

    #[test]
    fn test_blank_names_are_dropped() {
        let rows = vec![
            english_row(json!("   "), json!(52.5), json!(13.4)),
            english_row(Value::Null, json!(52.5), json!(13.4)),
            english_row(json!(""), json!(52.5), json!(13.4)),
        ];
        assert!(normalize(&rows, SchemaVariant::English).is_empty());
    }

    #[test]
    fn test_localized_name_is_assembled_from_parts() {
        let row: RawRow = [
            ("Фамилия", json!(" Иванова ")),
            ("Имя", json!("Анна")),
            ("Отчество", json!("")),
            ("Прежняя фамилия", json!("Петрова")),
            ("Год выпуска", json!("1998")),
            ("Страна", json!("Россия")),
            ("Широта", json!("55,7558")),
            ("Долгота", json!("37,6173")),
            ("Telegram", json!("")),
            ("Email", json!("anna@example.com")),
        ]
        .into_iter()
        .collect();

        let record = normalize_row(&row, SchemaVariant::Localized).unwrap();
        assert_eq!(record.full_name(), "Иванова Анна");
        assert_eq!(record.previous_surname(), "Петрова");
        assert_eq!(record.graduation_year(), Some(1998));
        assert_eq!(record.latitude(), 55.7558);
        assert_eq!(record.contact(), Some("anna@example.com"));
        assert_eq!(record.city(), None);
    }

    #[test]
    fn test_sheet_contact_and_profession_keep_their_text() {
        let table = crate::adapters::csv_table::parse_csv(
            "full_name,latitude,longitude,telegram,email,profession\n\
             Ivan Petrov,55.7558,37.6173,+79991234567,,0071234\n\
             Anna Lee,52.52,13.405,,0071234,Engineer\n"
                .as_bytes(),
        )
        .unwrap();

        let records = normalize(&table.rows, SchemaVariant::English);
        assert_eq!(records[0].contact(), Some("+79991234567"));
        assert_eq!(records[0].profession(), Some("0071234"));
        assert_eq!(records[1].contact(), Some("0071234"));
    }

    #[test]
    fn test_year_zero_or_text_is_absent() {
        let mut row = english_row(json!("Ivan"), json!(52.5), json!(13.4));
        row.data.insert("graduation_year".to_string(), json!(0));
        assert_eq!(normalize_row(&row, SchemaVariant::English).unwrap().graduation_year(), None);

        row.data.insert("graduation_year".to_string(), json!("soon"));
        assert_eq!(normalize_row(&row, SchemaVariant::English).unwrap().graduation_year(), None);
    }

    #[test]
    fn test_detect_schema() {
        let english = vec!["timestamp".to_string(), "full_name".to_string()];
        let localized = vec!["Фамилия".to_string(), "Имя".to_string()];
        let both = vec!["Фамилия".to_string(), "full_name".to_string()];
        let unknown = vec!["name".to_string(), "lat".to_string()];

        assert_eq!(detect_schema(&english), Some(SchemaVariant::English));
        assert_eq!(detect_schema(&localized), Some(SchemaVariant::Localized));
        assert_eq!(detect_schema(&both), Some(SchemaVariant::English));
        assert_eq!(detect_schema(&unknown), None);
    }

    #[test]
    fn test_normalize_table_reports_dropped_rows() {
        let table = RawTable {
            headers: vec!["full_name".to_string(), "latitude".to_string(), "longitude".to_string()],
            rows: vec![
                english_row(json!("Kept"), json!(52.5), json!(13.4)),
                english_row(json!("Dropped"), json!(0), json!(13.4)),
            ],
        };

        let report = normalize_table(&table, SchemaMode::Auto).unwrap();
        assert_eq!(report.schema, SchemaVariant::English);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_unknown_layout_is_an_error_unless_forced() {
        let table = RawTable {
            headers: vec!["name".to_string()],
            rows: vec![],
        };
        assert!(matches!(
            normalize_table(&table, SchemaMode::Auto),
            Err(AppError::SchemaError { .. })
        ));
        assert!(normalize_table(&table, SchemaMode::English).is_ok());
    }
}
