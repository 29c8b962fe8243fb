use crate::core::aggregator::{distinct_options, summarize};
use crate::core::filter::filter_records;
use crate::core::normalizer::normalize_table;
use crate::core::render::{list_entry_for, marker_for, EMPTY_LIST_NOTICE, LOAD_FAILED_NOTICE};
use crate::domain::model::{
    GeoBounds, GraduateRecord, Query, RawTable, SchemaMode, SchemaVariant, Summary,
};
use crate::domain::ports::{ConfigProvider, MapView, Presenter};
use crate::domain::view::{ElementId, ListEntry, MapSettings, MarkerId, UiEvent};
use crate::utils::error::Result;
use chrono::{DateTime, Local};

pub const LOADING_STATUS: &str = "Loading data...";
pub const LOAD_FAILED_STATUS: &str = "Data load error";

pub fn status_line(shown: usize, total: usize) -> String {
    if shown == total {
        format!("Showing: {} graduates", shown)
    } else {
        format!("Showing: {} of {}", shown, total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub map: MapSettings,
    pub list_limit: usize,
    pub schema: SchemaMode,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            map: MapSettings::default(),
            list_limit: 15,
            schema: SchemaMode::Auto,
        }
    }
}

impl ViewSettings {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            map: config.map_settings(),
            list_limit: config.list_limit(),
            schema: config.schema_mode(),
        }
    }
}

/// `Loading` until the first sheet is applied; never entered again after that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Loading,
    Ready,
}

/// Handed out when a fetch starts; only the most recently issued one is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied {
        schema: SchemaVariant,
        records: usize,
        dropped: usize,
    },
    Failed {
        message: String,
    },
    Stale {
        sequence: u64,
        latest: u64,
    },
}

#[derive(Debug, Default)]
pub struct AppState {
    phase: LoadPhase,
    full: Vec<GraduateRecord>,
    filtered: Vec<GraduateRecord>,
    query: Query,
    issued: u64,
    last_updated: Option<DateTime<Local>>,
}

/// Owns the record sets and the query, and re-derives markers, list and
/// statistics from the filtered set after every change.
pub struct ViewCoordinator<M: MapView, P: Presenter> {
    map: M,
    presenter: P,
    settings: ViewSettings,
    state: AppState,
}

impl<M: MapView, P: Presenter> ViewCoordinator<M, P> {
    pub fn new(map: M, presenter: P, settings: ViewSettings) -> Self {
        let mut coordinator = Self {
            map,
            presenter,
            settings,
            state: AppState::default(),
        };

        let map_settings = coordinator.settings.map;
        coordinator
            .map
            .set_zoom_range(map_settings.min_zoom, map_settings.max_zoom);
        coordinator.map.lock_bounds(&map_settings.max_bounds);
        coordinator.map.set_view(map_settings.center, map_settings.zoom);
        coordinator.presenter.set_text(ElementId::StatsText, LOADING_STATUS);
        coordinator.commit();

        coordinator
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.state.issued += 1;
        RefreshTicket(self.state.issued)
    }

    /// Applies a finished fetch. Responses for anything but the latest ticket
    /// are discarded; a failed fetch keeps whatever is already on screen.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<RawTable>,
    ) -> RefreshOutcome {
        if ticket.0 != self.state.issued {
            tracing::debug!(
                "Discarding response for refresh #{} (latest is #{})",
                ticket.0,
                self.state.issued
            );
            return RefreshOutcome::Stale {
                sequence: ticket.0,
                latest: self.state.issued,
            };
        }

        match result.and_then(|table| normalize_table(&table, self.settings.schema)) {
            Ok(report) => {
                let records = report.records.len();
                tracing::info!(
                    "Loaded {} graduates ({} rows skipped, {} layout)",
                    records,
                    report.dropped,
                    report.schema
                );
                self.replace_records(report.records);
                RefreshOutcome::Applied {
                    schema: report.schema,
                    records,
                    dropped: report.dropped,
                }
            }
            Err(e) => {
                tracing::warn!("Refresh #{} failed: {}", ticket.0, e);
                self.show_load_failure();
                RefreshOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::Search(text) => {
                self.state.query.text = text;
                self.query_changed();
            }
            UiEvent::YearSelected(year) => {
                self.state.query.year = year;
                self.query_changed();
            }
            UiEvent::CountrySelected(country) => {
                self.state.query.country = country;
                self.query_changed();
            }
            UiEvent::Reset => {
                self.state.query = Query::default();
                self.presenter.set_value(ElementId::SearchInput, "");
                self.presenter.set_value(ElementId::YearFilter, "all");
                self.presenter.set_value(ElementId::CountryFilter, "all");
                self.query_changed();
            }
            UiEvent::MarkerClicked(id) => {
                self.select_marker(id);
            }
            UiEvent::EntryClicked(index) => {
                self.select_entry(index);
            }
        }
    }

    /// Replaces the whole query at once, e.g. from command-line defaults.
    pub fn set_query(&mut self, query: Query) {
        self.state.query = query;
        self.presenter
            .set_value(ElementId::SearchInput, &self.state.query.text);
        self.presenter
            .set_value(ElementId::YearFilter, &self.state.query.year.to_string());
        self.presenter
            .set_value(ElementId::CountryFilter, &self.state.query.country.to_string());
        self.query_changed();
    }

    /// Highlights the list entry behind a marker. Returns false for an id
    /// outside the current layer.
    pub fn select_marker(&mut self, id: MarkerId) -> bool {
        let Some(record) = self.state.filtered.get(id.0) else {
            return false;
        };
        self.presenter.highlight(record.full_name());
        self.presenter.commit();
        true
    }

    /// Centres the map on the graduate behind a list entry, highlights the
    /// entry and opens its marker's popup. Entries share their index with
    /// markers, so namesakes resolve to their own marker.
    pub fn select_entry(&mut self, index: usize) -> bool {
        let Some(record) = self.state.filtered.get(index) else {
            return false;
        };

        self.map
            .set_view(record.position(), self.settings.map.focus_zoom);
        self.presenter.highlight(record.full_name());
        self.map.open_popup(MarkerId(index));

        self.commit();
        true
    }

    pub fn phase(&self) -> LoadPhase {
        self.state.phase
    }

    pub fn query(&self) -> &Query {
        &self.state.query
    }

    pub fn full_set(&self) -> &[GraduateRecord] {
        &self.state.full
    }

    pub fn filtered_set(&self) -> &[GraduateRecord] {
        &self.state.filtered
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.state.filtered)
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.state.last_updated
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn replace_records(&mut self, records: Vec<GraduateRecord>) {
        self.state.full = records;
        self.state.phase = LoadPhase::Ready;

        let now = Local::now();
        self.state.last_updated = Some(now);
        self.presenter.set_text(
            ElementId::LastUpdate,
            &now.format("%d.%m.%Y %H:%M").to_string(),
        );

        let options = distinct_options(&self.state.full);
        let years: Vec<String> = options.years.iter().map(i32::to_string).collect();
        self.presenter.set_options(ElementId::YearFilter, &years);
        self.presenter
            .set_options(ElementId::CountryFilter, &options.countries);

        self.refilter();
    }

    fn query_changed(&mut self) {
        match self.state.phase {
            LoadPhase::Ready => self.refilter(),
            LoadPhase::Loading => {
                tracing::debug!("Query stored until the first sheet arrives");
                self.presenter.commit();
            }
        }
    }

    fn refilter(&mut self) {
        self.state.filtered = filter_records(&self.state.full, &self.state.query);
        tracing::debug!(
            "Filter {:?} matched {} of {} graduates",
            self.state.query,
            self.state.filtered.len(),
            self.state.full.len()
        );
        self.render();
    }

    fn render(&mut self) {
        let filtered = &self.state.filtered;

        self.map.clear_markers();
        for (index, record) in filtered.iter().enumerate() {
            self.map.add_marker(marker_for(MarkerId(index), record));
        }
        if let Some(bounds) = GeoBounds::enclosing(filtered.iter().map(GraduateRecord::position)) {
            self.map.fit_bounds(&bounds, self.settings.map.fit_options());
        }

        if filtered.is_empty() {
            self.presenter
                .set_notice(ElementId::GraduatesList, EMPTY_LIST_NOTICE);
        } else {
            let entries: Vec<ListEntry> = filtered
                .iter()
                .take(self.settings.list_limit)
                .enumerate()
                .map(|(index, record)| list_entry_for(index, record))
                .collect();
            self.presenter.set_list(ElementId::GraduatesList, &entries);
        }

        let summary = summarize(filtered);
        self.presenter
            .set_text(ElementId::TotalCount, &summary.count.to_string());
        self.presenter.set_text(
            ElementId::CountryCount,
            &summary.distinct_countries.to_string(),
        );
        self.presenter
            .set_text(ElementId::YearRange, &summary.year_range_label());
        self.presenter.set_text(
            ElementId::StatsText,
            &status_line(filtered.len(), self.state.full.len()),
        );

        self.commit();
    }

    fn show_load_failure(&mut self) {
        self.presenter
            .set_text(ElementId::StatsText, LOAD_FAILED_STATUS);
        if self.state.phase == LoadPhase::Loading {
            self.presenter
                .set_notice(ElementId::GraduatesList, LOAD_FAILED_NOTICE);
        }
        self.presenter.commit();
    }

    fn commit(&mut self) {
        self.map.commit();
        self.presenter.commit();
    }
}
