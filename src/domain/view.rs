use crate::domain::model::{CountryFilter, GeoBounds, LatLng, YearFilter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page elements the presenter knows how to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    StatsText,
    LastUpdate,
    TotalCount,
    CountryCount,
    YearRange,
    GraduatesList,
    SearchInput,
    YearFilter,
    CountryFilter,
}

impl ElementId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::StatsText => "statsText",
            ElementId::LastUpdate => "lastUpdate",
            ElementId::TotalCount => "totalCount",
            ElementId::CountryCount => "countryCount",
            ElementId::YearRange => "yearRange",
            ElementId::GraduatesList => "graduatesList",
            ElementId::SearchInput => "searchInput",
            ElementId::YearFilter => "yearFilter",
            ElementId::CountryFilter => "countryFilter",
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Graduation-year bucket driving the marker colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YearBand {
    Before2000,
    Noughties,
    Tens,
    Recent,
    Unknown,
}

impl YearBand {
    pub fn for_year(year: Option<i32>) -> Self {
        match year {
            None => YearBand::Unknown,
            Some(y) if y < 2000 => YearBand::Before2000,
            Some(y) if y < 2010 => YearBand::Noughties,
            Some(y) if y < 2020 => YearBand::Tens,
            Some(_) => YearBand::Recent,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            YearBand::Before2000 => "#e74c3c",
            YearBand::Noughties => "#f39c12",
            YearBand::Tens => "#3498db",
            YearBand::Recent => "#2ecc71",
            YearBand::Unknown => "#95a5a6",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerIcon {
    pub band: YearBand,
    pub color: &'static str,
    pub label: String,
}

/// Position of a marker in the current layer; equals the record's index in
/// the filtered set it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MarkerId(pub usize);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub name: String,
    pub position: LatLng,
    pub icon: MarkerIcon,
    pub popup: Popup,
}

/// Detail bubble shown when a marker is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub year_line: String,
    pub location_line: String,
    pub profession: Option<String>,
    pub contact: Option<String>,
    pub photo_url: Option<String>,
    pub comment: Option<String>,
    pub added: String,
}

/// One row of the side list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Position in the filtered set; the entry's marker has the same id.
    pub index: usize,
    pub name: String,
    pub previous_surname: Option<String>,
    pub year_line: String,
    pub location_line: String,
    pub profession: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitOptions {
    pub padding: u32,
    pub max_zoom: u8,
}

/// Initial viewport and navigation limits for the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub center: LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub focus_zoom: u8,
    pub fit_padding: u32,
    pub fit_max_zoom: u8,
    pub max_bounds: GeoBounds,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: LatLng::new(55.7558, 37.6173),
            zoom: 3,
            min_zoom: 2,
            max_zoom: 18,
            focus_zoom: 12,
            fit_padding: 50,
            fit_max_zoom: 10,
            max_bounds: GeoBounds::new(LatLng::new(-85.0, -180.0), LatLng::new(85.0, 180.0)),
        }
    }
}

impl MapSettings {
    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            padding: self.fit_padding,
            max_zoom: self.fit_max_zoom,
        }
    }
}

/// Everything the user can do to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Search(String),
    YearSelected(YearFilter),
    CountrySelected(CountryFilter),
    Reset,
    MarkerClicked(MarkerId),
    EntryClicked(usize),
}
