use crate::core::render::{escape_html, list_html};
use crate::domain::ports::Presenter;
use crate::domain::view::{ElementId, ListEntry};
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Keeps each element's markup the way a page would hold it, and can write
/// the side panel to a static HTML file after every render pass.
#[derive(Debug, Default)]
pub struct HtmlPresenter {
    fragments: BTreeMap<ElementId, String>,
    values: BTreeMap<ElementId, String>,
    highlighted: Option<String>,
    snapshot_path: Option<PathBuf>,
}

impl HtmlPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Inner markup of an element.
    pub fn fragment(&self, element: ElementId) -> Option<&str> {
        self.fragments.get(&element).map(String::as_str)
    }

    /// Current value of an input or dropdown.
    pub fn value(&self, element: ElementId) -> Option<&str> {
        self.values.get(&element).map(String::as_str)
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn render_page(&self) -> String {
        let mut page = String::from(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Alumni map</title></head>\n<body>\n",
        );
        for (element, markup) in &self.fragments {
            page.push_str(&format!("<div id=\"{}\">{}</div>\n", element, markup));
        }
        if let Some(name) = &self.highlighted {
            page.push_str(&format!(
                "<!-- highlighted: {} -->\n",
                escape_html(name)
            ));
        }
        page.push_str("</body>\n</html>\n");
        page
    }

    pub fn write_snapshot(&self) -> Result<()> {
        if let Some(path) = &self.snapshot_path {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, self.render_page())?;
        }
        Ok(())
    }
}

impl Presenter for HtmlPresenter {
    fn set_text(&mut self, element: ElementId, text: &str) {
        self.fragments.insert(element, escape_html(text));
    }

    fn set_list(&mut self, element: ElementId, entries: &[ListEntry]) {
        self.fragments.insert(element, list_html(entries));
    }

    fn set_notice(&mut self, element: ElementId, message: &str) {
        self.fragments
            .insert(element, format!("<p class=\"notice\">{}</p>", escape_html(message)));
    }

    fn set_options(&mut self, element: ElementId, options: &[String]) {
        let mut markup = String::from("<option value=\"all\">All</option>");
        for option in options {
            let escaped = escape_html(option);
            markup.push_str(&format!("<option value=\"{}\">{}</option>", escaped, escaped));
        }
        self.fragments.insert(element, markup);
    }

    fn set_value(&mut self, element: ElementId, value: &str) {
        self.values.insert(element, value.to_string());
    }

    fn highlight(&mut self, name: &str) {
        self.highlighted = Some(name.to_string());
    }

    fn commit(&mut self) {
        if let Err(e) = self.write_snapshot() {
            tracing::warn!("Could not write HTML snapshot: {}", e);
        }
    }
}
