use crate::adapters::geojson::write_feature_collection;
use crate::domain::model::{CountryFilter, GeoBounds, LatLng, YearFilter};
use crate::domain::ports::{MapView, Presenter};
use crate::domain::view::{ElementId, FitOptions, ListEntry, Marker, MarkerId, UiEvent};
use crate::utils::error::{AppError, Result};
use std::io::Write;
use std::path::PathBuf;

/// Terminal stand-in for the map widget. Holds the marker layer, reports
/// viewport changes and can export the layer as GeoJSON after each pass.
#[derive(Debug, Default)]
pub struct ConsoleMap {
    markers: Vec<Marker>,
    view: Option<(LatLng, u8)>,
    zoom_range: Option<(u8, u8)>,
    max_bounds: Option<GeoBounds>,
    fitted: Option<GeoBounds>,
    export_path: Option<PathBuf>,
}

impl ConsoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_export(path: impl Into<PathBuf>) -> Self {
        Self {
            export_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn view(&self) -> Option<(LatLng, u8)> {
        self.view
    }

    pub fn fitted_bounds(&self) -> Option<GeoBounds> {
        self.fitted
    }

    fn clamp_zoom(&self, zoom: u8) -> u8 {
        match self.zoom_range {
            Some((min, max)) => zoom.clamp(min, max),
            None => zoom,
        }
    }

    fn clamp_to_bounds(&self, point: LatLng) -> LatLng {
        match self.max_bounds {
            Some(b) => LatLng::new(
                point.lat.clamp(b.south_west.lat, b.north_east.lat),
                point.lng.clamp(b.south_west.lng, b.north_east.lng),
            ),
            None => point,
        }
    }
}

impl MapView for ConsoleMap {
    fn set_view(&mut self, center: LatLng, zoom: u8) {
        let center = self.clamp_to_bounds(center);
        let zoom = self.clamp_zoom(zoom);
        tracing::debug!("🗺️ View centred on {:.4}, {:.4} at zoom {}", center.lat, center.lng, zoom);
        self.view = Some((center, zoom));
    }

    fn set_zoom_range(&mut self, min_zoom: u8, max_zoom: u8) {
        self.zoom_range = Some((min_zoom, max_zoom));
    }

    fn lock_bounds(&mut self, bounds: &GeoBounds) {
        self.max_bounds = Some(*bounds);
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
        self.fitted = None;
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn fit_bounds(&mut self, bounds: &GeoBounds, options: FitOptions) {
        tracing::debug!(
            "🗺️ Fitting [{:.4}, {:.4}]..[{:.4}, {:.4}] (padding {}, max zoom {})",
            bounds.south_west.lat,
            bounds.south_west.lng,
            bounds.north_east.lat,
            bounds.north_east.lng,
            options.padding,
            options.max_zoom
        );
        self.fitted = Some(*bounds);
    }

    fn open_popup(&mut self, marker: MarkerId) {
        match self.markers.get(marker.0) {
            Some(m) => println!("📍 {}\n{}", marker, m.popup),
            None => tracing::warn!("No marker {} on the map", marker),
        }
    }

    fn commit(&mut self) {
        tracing::info!("🗺️ {} markers on the map", self.markers.len());
        if let Some(path) = &self.export_path {
            match write_feature_collection(path, &self.markers) {
                Ok(()) => tracing::debug!("📁 Markers exported to {}", path.display()),
                Err(e) => tracing::warn!("Could not export markers to {}: {}", path.display(), e),
            }
        }
    }
}

/// Writes element updates as plain lines.
pub struct ConsolePresenter<W: Write> {
    out: W,
}

impl ConsolePresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            tracing::warn!("Console write failed: {}", e);
        }
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn set_text(&mut self, element: ElementId, text: &str) {
        self.emit(format_args!("[{}] {}", element, text));
    }

    fn set_list(&mut self, element: ElementId, entries: &[ListEntry]) {
        self.emit(format_args!("[{}]", element));
        for entry in entries {
            self.emit(format_args!("  {:>2}. {}", entry.index, entry));
        }
    }

    fn set_notice(&mut self, element: ElementId, message: &str) {
        self.emit(format_args!("[{}] ({})", element, message));
    }

    fn set_options(&mut self, element: ElementId, options: &[String]) {
        self.emit(format_args!("[{}] all, {}", element, options.join(", ")));
    }

    fn set_value(&mut self, element: ElementId, value: &str) {
        self.emit(format_args!("[{}] = {:?}", element, value));
    }

    fn highlight(&mut self, name: &str) {
        self.emit(format_args!("→ {}", name));
    }

    fn commit(&mut self) {
        if let Err(e) = self.out.flush() {
            tracing::warn!("Console flush failed: {}", e);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Ui(UiEvent),
    Help,
    Quit,
}

pub const CONSOLE_HELP: &str = "\
commands:
  search <text>       filter by name, city or country (empty clears)
  year <yyyy|all>     filter by graduation year
  country <name|all>  filter by country
  reset               clear all filters
  marker <n>          click marker n
  select <n>          click list entry n
  help                show this text
  quit                exit";

/// `Ok(None)` for blank input.
pub fn parse_console_command(line: &str) -> Result<Option<ConsoleCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let command = match verb.to_ascii_lowercase().as_str() {
        "search" | "s" => ConsoleCommand::Ui(UiEvent::Search(rest.to_string())),
        "year" | "y" => ConsoleCommand::Ui(UiEvent::YearSelected(rest.parse::<YearFilter>()?)),
        "country" | "c" => {
            ConsoleCommand::Ui(UiEvent::CountrySelected(rest.parse::<CountryFilter>()?))
        }
        "reset" => ConsoleCommand::Ui(UiEvent::Reset),
        "marker" | "m" => {
            ConsoleCommand::Ui(UiEvent::MarkerClicked(MarkerId(parse_index(rest, "marker")?)))
        }
        "select" => ConsoleCommand::Ui(UiEvent::EntryClicked(parse_index(rest, "list entry")?)),
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" | "q" => ConsoleCommand::Quit,
        other => {
            return Err(AppError::QueryError {
                message: format!("unknown command '{}'", other),
            })
        }
    };
    Ok(Some(command))
}

fn parse_index(text: &str, what: &str) -> Result<usize> {
    text.parse::<usize>().map_err(|_| AppError::QueryError {
        message: format!("'{}' is not a {} number", text, what),
    })
}
