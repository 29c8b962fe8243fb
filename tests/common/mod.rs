#![allow(dead_code)]

use alumni_map::adapters::csv_table::parse_csv;
use alumni_map::domain::model::{GeoBounds, LatLng, RawTable};
use alumni_map::domain::ports::{MapView, RowSource};
use alumni_map::domain::view::{FitOptions, Marker, MarkerId};
use alumni_map::utils::error::{AppError, Result};
use async_trait::async_trait;
use std::time::Duration;

pub const ENGLISH_SHEET: &str = "\
timestamp,full_name,graduation_year,city,country,latitude,longitude,profession
15.03.2024 10:22:01,Ivan Petrov,1995,Moscow,Russia,55.7558,37.6173,Engineer
16.03.2024 11:00:00,Anna Lee,2015,Berlin,Germany,52.52,13.405,
17.03.2024 09:10:00,Maria Gomez,2005,Madrid,Spain,40.4168,-3.7038,Doctor
18.03.2024 09:10:00,No Coordinates,2001,Paris,France,,,
19.03.2024 09:10:00,Null Island,2001,,,0,0,
";

pub const LOCALIZED_SHEET: &str = "\
Отметка времени,Фамилия,Имя,Отчество,Прежняя фамилия,Год выпуска,Город,Страна,Широта,Долгота
15.03.2024 10:22:01,Иванова,Анна,Сергеевна,Петрова,1998,Москва,Россия,\"55,7558\",\"37,6173\"
15.03.2024 10:25:00,Смирнов,Олег,,,2021,Новосибирск,Россия,55.0084,82.9357
15.03.2024 10:30:00,,,,,2000,Казань,Россия,55.79,49.12
";

pub fn english_table() -> RawTable {
    parse_csv(ENGLISH_SHEET.as_bytes()).unwrap()
}

pub fn localized_table() -> RawTable {
    parse_csv(LOCALIZED_SHEET.as_bytes()).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    SetView(LatLng, u8),
    ZoomRange(u8, u8),
    LockBounds(GeoBounds),
    Clear,
    Add(MarkerId, String),
    Fit(GeoBounds, FitOptions),
    OpenPopup(MarkerId),
    Commit,
}

/// Records every call the coordinator makes on the map.
#[derive(Debug, Default)]
pub struct RecordingMap {
    pub calls: Vec<MapCall>,
    pub markers: Vec<Marker>,
}

impl RecordingMap {
    /// Calls since the most recent `clear_markers`, inclusive.
    pub fn last_pass(&self) -> &[MapCall] {
        let start = self
            .calls
            .iter()
            .rposition(|call| *call == MapCall::Clear)
            .unwrap_or(0);
        &self.calls[start..]
    }

    pub fn marker_names(&self) -> Vec<&str> {
        self.markers.iter().map(|m| m.name.as_str()).collect()
    }
}

impl MapView for RecordingMap {
    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.calls.push(MapCall::SetView(center, zoom));
    }

    fn set_zoom_range(&mut self, min_zoom: u8, max_zoom: u8) {
        self.calls.push(MapCall::ZoomRange(min_zoom, max_zoom));
    }

    fn lock_bounds(&mut self, bounds: &GeoBounds) {
        self.calls.push(MapCall::LockBounds(*bounds));
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
        self.calls.push(MapCall::Clear);
    }

    fn add_marker(&mut self, marker: Marker) {
        self.calls.push(MapCall::Add(marker.id, marker.name.clone()));
        self.markers.push(marker);
    }

    fn fit_bounds(&mut self, bounds: &GeoBounds, options: FitOptions) {
        self.calls.push(MapCall::Fit(*bounds, options));
    }

    fn open_popup(&mut self, marker: MarkerId) {
        self.calls.push(MapCall::OpenPopup(marker));
    }

    fn commit(&mut self) {
        self.calls.push(MapCall::Commit);
    }
}

/// Returns a fixed sheet, or a failure when built with `failing`.
pub struct StaticSource {
    table: Option<RawTable>,
}

impl StaticSource {
    pub fn new(table: RawTable) -> Self {
        Self { table: Some(table) }
    }

    pub fn failing() -> Self {
        Self { table: None }
    }
}

#[async_trait]
impl RowSource for StaticSource {
    fn describe(&self) -> String {
        "static sheet".to_string()
    }

    async fn fetch(&self) -> Result<RawTable> {
        self.table.clone().ok_or_else(|| AppError::FetchError {
            url: "static".to_string(),
            status: 503,
        })
    }
}

/// Answers with a fixed sheet after a delay.
pub struct SlowSource {
    table: RawTable,
    delay: Duration,
}

impl SlowSource {
    pub fn new(table: RawTable, delay: Duration) -> Self {
        Self { table, delay }
    }
}

#[async_trait]
impl RowSource for SlowSource {
    fn describe(&self) -> String {
        format!("slow sheet ({:?})", self.delay)
    }

    async fn fetch(&self) -> Result<RawTable> {
        tokio::time::sleep(self.delay).await;
        Ok(self.table.clone())
    }
}
