use crate::domain::model::{GeoBounds, LatLng, RawTable, SchemaMode};
use crate::domain::view::{ElementId, FitOptions, ListEntry, MapSettings, Marker, MarkerId};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Where the sheet comes from (published URL, local export, test double).
#[async_trait]
pub trait RowSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch(&self) -> Result<RawTable>;
}

pub trait ConfigProvider: Send + Sync {
    fn source(&self) -> &str;
    fn refresh_interval(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn schema_mode(&self) -> SchemaMode;
    fn map_settings(&self) -> MapSettings;
    fn list_limit(&self) -> usize;
}

/// Marker layer and viewport of the map widget.
///
/// Clicks on a marker are reported back as `UiEvent::MarkerClicked` carrying
/// the marker's id.
pub trait MapView {
    fn set_view(&mut self, center: LatLng, zoom: u8);
    fn set_zoom_range(&mut self, min_zoom: u8, max_zoom: u8);
    fn lock_bounds(&mut self, bounds: &GeoBounds);
    fn clear_markers(&mut self);
    fn add_marker(&mut self, marker: Marker);
    fn fit_bounds(&mut self, bounds: &GeoBounds, options: FitOptions);
    fn open_popup(&mut self, marker: MarkerId);
    /// End of one render pass.
    fn commit(&mut self) {}
}

/// Text fields, list panel and dropdowns around the map.
///
/// Clicks on a list entry are reported back as `UiEvent::EntryClicked`
/// carrying the entry's index.
pub trait Presenter {
    fn set_text(&mut self, element: ElementId, text: &str);
    fn set_list(&mut self, element: ElementId, entries: &[ListEntry]);
    /// Replaces a list element's content with a plain notice.
    fn set_notice(&mut self, element: ElementId, message: &str);
    fn set_options(&mut self, element: ElementId, options: &[String]);
    fn set_value(&mut self, element: ElementId, value: &str);
    fn highlight(&mut self, name: &str);
    /// End of one render pass.
    fn commit(&mut self) {}
}

/// Both presenters receive every update.
impl<A: Presenter, B: Presenter> Presenter for (A, B) {
    fn set_text(&mut self, element: ElementId, text: &str) {
        self.0.set_text(element, text);
        self.1.set_text(element, text);
    }

    fn set_list(&mut self, element: ElementId, entries: &[ListEntry]) {
        self.0.set_list(element, entries);
        self.1.set_list(element, entries);
    }

    fn set_notice(&mut self, element: ElementId, message: &str) {
        self.0.set_notice(element, message);
        self.1.set_notice(element, message);
    }

    fn set_options(&mut self, element: ElementId, options: &[String]) {
        self.0.set_options(element, options);
        self.1.set_options(element, options);
    }

    fn set_value(&mut self, element: ElementId, value: &str) {
        self.0.set_value(element, value);
        self.1.set_value(element, value);
    }

    fn highlight(&mut self, name: &str) {
        self.0.highlight(name);
        self.1.highlight(name);
    }

    fn commit(&mut self) {
        self.0.commit();
        self.1.commit();
    }
}
