use crate::utils::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One data row of the sheet: column label to loosely typed cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub data: HashMap<String, serde_json::Value>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> Option<&serde_json::Value> {
        self.data.get(column)
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<serde_json::Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A parsed sheet: header labels in column order plus the data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// A validated alumni entry. Only constructible with a non-empty name and
/// usable coordinates; never changed once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraduateRecord {
    full_name: String,
    previous_surname: String,
    graduation_year: Option<i32>,
    city: Option<String>,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
    profession: Option<String>,
    contact: Option<String>,
    photo_url: Option<String>,
    comment: Option<String>,
    timestamp: Option<String>,
}

impl GraduateRecord {
    /// Returns `None` when the name is blank or a coordinate is not finite
    /// or exactly zero (the sheet uses 0 for "not filled in").
    pub fn new(full_name: impl Into<String>, latitude: f64, longitude: f64) -> Option<Self> {
        let full_name = full_name.into();
        if full_name.trim().is_empty() || !is_usable_coordinate(latitude) || !is_usable_coordinate(longitude) {
            return None;
        }

        Some(Self {
            full_name,
            previous_surname: String::new(),
            graduation_year: None,
            city: None,
            country: None,
            latitude,
            longitude,
            profession: None,
            contact: None,
            photo_url: None,
            comment: None,
            timestamp: None,
        })
    }

    pub fn with_previous_surname(mut self, previous_surname: impl Into<String>) -> Self {
        self.previous_surname = previous_surname.into();
        self
    }

    pub fn with_graduation_year(mut self, year: Option<i32>) -> Self {
        self.graduation_year = year;
        self
    }

    pub fn with_city(mut self, city: Option<String>) -> Self {
        self.city = city;
        self
    }

    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }

    pub fn with_profession(mut self, profession: Option<String>) -> Self {
        self.profession = profession;
        self
    }

    pub fn with_contact(mut self, contact: Option<String>) -> Self {
        self.contact = contact;
        self
    }

    pub fn with_photo_url(mut self, photo_url: Option<String>) -> Self {
        self.photo_url = photo_url;
        self
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_timestamp(mut self, timestamp: Option<String>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn previous_surname(&self) -> &str {
        &self.previous_surname
    }

    pub fn graduation_year(&self) -> Option<i32> {
        self.graduation_year
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    pub fn profession(&self) -> Option<&str> {
        self.profession.as_deref()
    }

    pub fn contact(&self) -> Option<&str> {
        self.contact.as_deref()
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }
}

fn is_usable_coordinate(value: f64) -> bool {
    value.is_finite() && value != 0.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(point: LatLng) -> Self {
        [point.lat, point.lng]
    }
}

/// Axis-aligned box given by its south-west and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[LatLng; 2]", into = "[LatLng; 2]")]
pub struct GeoBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl GeoBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Smallest box containing every point, `None` for no points.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        points.into_iter().fold(None, |bounds, p| {
            Some(match bounds {
                None => GeoBounds::new(p, p),
                Some(b) => GeoBounds::new(
                    LatLng::new(b.south_west.lat.min(p.lat), b.south_west.lng.min(p.lng)),
                    LatLng::new(b.north_east.lat.max(p.lat), b.north_east.lng.max(p.lng)),
                ),
            })
        })
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }
}

impl From<[LatLng; 2]> for GeoBounds {
    fn from([south_west, north_east]: [LatLng; 2]) -> Self {
        Self::new(south_west, north_east)
    }
}

impl From<GeoBounds> for [LatLng; 2] {
    fn from(bounds: GeoBounds) -> Self {
        [bounds.south_west, bounds.north_east]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl FromStr for YearFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(YearFilter::All);
        }
        s.parse::<i32>()
            .map(YearFilter::Year)
            .map_err(|_| AppError::QueryError {
                message: format!("'{}' is not a year", s),
            })
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => f.write_str("all"),
            YearFilter::Year(year) => write!(f, "{}", year),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CountryFilter {
    #[default]
    All,
    Country(String),
}

impl FromStr for CountryFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(CountryFilter::All)
        } else {
            Ok(CountryFilter::Country(s.to_string()))
        }
    }
}

impl fmt::Display for CountryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountryFilter::All => f.write_str("all"),
            CountryFilter::Country(country) => f.write_str(country),
        }
    }
}

/// Current search box and dropdown state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub year: YearFilter,
    pub country: CountryFilter,
}

impl Query {
    pub fn new(text: impl Into<String>, year: YearFilter, country: CountryFilter) -> Self {
        Self {
            text: text.into(),
            year,
            country,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub distinct_countries: usize,
    pub year_range: Option<YearRange>,
}

impl Summary {
    pub const YEAR_RANGE_PLACEHOLDER: &'static str = "-";

    pub fn year_range_label(&self) -> String {
        self.year_range
            .map(|range| range.to_string())
            .unwrap_or_else(|| Self::YEAR_RANGE_PLACEHOLDER.to_string())
    }
}

/// Choices for the year and country dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub countries: Vec<String>,
}

/// Column layouts the sheet has been published with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Pre-normalised English labels with a combined `full_name` column.
    English,
    /// Form-generated Russian labels with separate name parts.
    Localized,
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVariant::English => f.write_str("english"),
            SchemaVariant::Localized => f.write_str("localized"),
        }
    }
}

/// How to pick the layout for a fetched sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    #[default]
    Auto,
    English,
    Localized,
}

impl FromStr for SchemaMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SchemaMode::Auto),
            "english" => Ok(SchemaMode::English),
            "localized" => Ok(SchemaMode::Localized),
            other => Err(AppError::InvalidConfigValueError {
                field: "source.schema".to_string(),
                value: other.to_string(),
                reason: "Expected one of: auto, english, localized".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_requires_name_and_coordinates() {
        assert!(GraduateRecord::new("Ivan Petrov", 55.75, 37.61).is_some());
        assert!(GraduateRecord::new("   ", 55.75, 37.61).is_none());
        assert!(GraduateRecord::new("Ivan Petrov", 0.0, 37.61).is_none());
        assert!(GraduateRecord::new("Ivan Petrov", 55.75, f64::NAN).is_none());
        assert!(GraduateRecord::new("Ivan Petrov", f64::INFINITY, 37.61).is_none());
    }

    #[test]
    fn test_year_filter_parsing() {
        assert_eq!("all".parse::<YearFilter>().unwrap(), YearFilter::All);
        assert_eq!("".parse::<YearFilter>().unwrap(), YearFilter::All);
        assert_eq!(" 1995 ".parse::<YearFilter>().unwrap(), YearFilter::Year(1995));
        assert!("nineties".parse::<YearFilter>().is_err());
    }

    #[test]
    fn test_country_filter_parsing() {
        assert_eq!("ALL".parse::<CountryFilter>().unwrap(), CountryFilter::All);
        assert_eq!(
            "Germany".parse::<CountryFilter>().unwrap(),
            CountryFilter::Country("Germany".to_string())
        );
    }

    #[test]
    fn test_year_range_display() {
        assert_eq!(YearRange { min: 1998, max: 2005 }.to_string(), "1998-2005");
        assert_eq!(YearRange { min: 2005, max: 2005 }.to_string(), "2005");
        assert_eq!(Summary::default().year_range_label(), "-");
    }

    #[test]
    fn test_bounds_enclose_points() {
        let bounds = GeoBounds::enclosing(vec![
            LatLng::new(55.75, 37.61),
            LatLng::new(52.52, 13.40),
            LatLng::new(59.93, 30.33),
        ])
        .unwrap();
        assert_eq!(bounds.south_west, LatLng::new(52.52, 13.40));
        assert_eq!(bounds.north_east, LatLng::new(59.93, 37.61));
        assert!(GeoBounds::enclosing(Vec::new()).is_none());
    }

    #[test]
    fn test_bounds_deserialize_from_pairs() {
        let bounds: GeoBounds = serde_json::from_str("[[-85.0, -180.0], [85.0, 180.0]]").unwrap();
        assert!(bounds.contains(LatLng::new(55.75, 37.61)));
        assert!(!bounds.contains(LatLng::new(89.0, 0.0)));
    }
}
