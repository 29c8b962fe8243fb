use crate::domain::model::GraduateRecord;
use crate::domain::view::{ListEntry, Marker, MarkerIcon, MarkerId, Popup, YearBand};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;

pub const EMPTY_LIST_NOTICE: &str = "No data to display";
pub const LOAD_FAILED_NOTICE: &str = "Could not load data.";

/// Timestamp formats seen in form-backed sheets, most specific first.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%d.%m.%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%Y-%m-%d", "%m/%d/%Y"];

/// Two upper-case letters: initials of the first two words, or the first two
/// letters of a single-word name.
pub fn initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let letters: String = match words.as_slice() {
        [] => String::new(),
        [only] => only.chars().take(2).collect(),
        [first, second, ..] => first.chars().take(1).chain(second.chars().take(1)).collect(),
    };
    letters.to_uppercase()
}

pub fn year_line(year: Option<i32>) -> String {
    match year {
        Some(year) => format!("Class of {}", year),
        None => "Class year unknown".to_string(),
    }
}

pub fn location_line(record: &GraduateRecord) -> String {
    let parts: Vec<&str> = [record.city(), record.country()].into_iter().flatten().collect();
    if parts.is_empty() {
        "Location unknown".to_string()
    } else {
        parts.join(", ")
    }
}

/// `dd.mm.yyyy` when the timestamp parses, the raw text otherwise.
pub fn added_label(timestamp: Option<&str>) -> String {
    let Some(raw) = timestamp.map(str::trim).filter(|t| !t.is_empty()) else {
        return "recently".to_string();
    };

    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| {
            TIMESTAMP_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        });

    match date {
        Some(date) => date.format("%d.%m.%Y").to_string(),
        None => raw.to_string(),
    }
}

pub fn marker_for(id: MarkerId, record: &GraduateRecord) -> Marker {
    let band = YearBand::for_year(record.graduation_year());
    Marker {
        id,
        name: record.full_name().to_string(),
        position: record.position(),
        icon: MarkerIcon {
            band,
            color: band.color(),
            label: initials(record.full_name()),
        },
        popup: popup_for(record),
    }
}

pub fn popup_for(record: &GraduateRecord) -> Popup {
    Popup {
        title: record.full_name().to_string(),
        year_line: year_line(record.graduation_year()),
        location_line: location_line(record),
        profession: record.profession().map(str::to_string),
        contact: record.contact().map(str::to_string),
        photo_url: record.photo_url().map(str::to_string),
        comment: record.comment().map(str::to_string),
        added: added_label(record.timestamp()),
    }
}

pub fn list_entry_for(index: usize, record: &GraduateRecord) -> ListEntry {
    let previous = record.previous_surname().trim();
    ListEntry {
        index,
        name: record.full_name().to_string(),
        previous_surname: (!previous.is_empty()).then(|| previous.to_string()),
        year_line: year_line(record.graduation_year()),
        location_line: location_line(record),
        profession: record.profession().map(str::to_string),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl Popup {
    pub fn to_html(&self) -> String {
        let mut body = format!(
            "<p class=\"popup-location\">{}</p>",
            escape_html(&self.location_line)
        );
        if let Some(profession) = &self.profession {
            body.push_str(&format!("<p class=\"popup-profession\">{}</p>", escape_html(profession)));
        }
        if let Some(contact) = &self.contact {
            body.push_str(&format!("<p class=\"popup-contact\">{}</p>", escape_html(contact)));
        }
        if let Some(photo) = &self.photo_url {
            body.push_str(&format!(
                "<img class=\"popup-photo\" src=\"{}\" alt=\"{}\">",
                escape_html(photo),
                escape_html(&self.title)
            ));
        }
        if let Some(comment) = &self.comment {
            body.push_str(&format!("<p class=\"popup-comment\">\"{}\"</p>", escape_html(comment)));
        }

        format!(
            "<div class=\"popup\"><div class=\"popup-header\"><h4>{}</h4><p>{}</p></div>\
             <div class=\"popup-body\">{}</div>\
             <div class=\"popup-footer\">Added: {}</div></div>",
            escape_html(&self.title),
            escape_html(&self.year_line),
            body,
            escape_html(&self.added)
        )
    }
}

impl fmt::Display for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.title, self.year_line)?;
        writeln!(f, "  {}", self.location_line)?;
        if let Some(profession) = &self.profession {
            writeln!(f, "  {}", profession)?;
        }
        if let Some(contact) = &self.contact {
            writeln!(f, "  {}", contact)?;
        }
        if let Some(photo) = &self.photo_url {
            writeln!(f, "  photo: {}", photo)?;
        }
        if let Some(comment) = &self.comment {
            writeln!(f, "  \"{}\"", comment)?;
        }
        write!(f, "  Added: {}", self.added)
    }
}

impl ListEntry {
    pub fn to_html(&self) -> String {
        let name = match &self.previous_surname {
            Some(previous) => format!("{} ({})", escape_html(&self.name), escape_html(previous)),
            None => escape_html(&self.name),
        };
        let profession = self
            .profession
            .as_deref()
            .map(|p| format!("<p>{}</p>", escape_html(p)))
            .unwrap_or_default();

        format!(
            "<div class=\"graduate-item\" data-index=\"{}\" data-name=\"{}\"><h4>{}</h4><p>{}</p><p>{}</p>{}</div>",
            self.index,
            escape_html(&self.name),
            name,
            escape_html(&self.year_line),
            escape_html(&self.location_line),
            profession
        )
    }
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(previous) = &self.previous_surname {
            write!(f, " ({})", previous)?;
        }
        write!(f, " | {} | {}", self.year_line, self.location_line)?;
        if let Some(profession) = &self.profession {
            write!(f, " | {}", profession)?;
        }
        Ok(())
    }
}

/// The whole list panel as markup, or the empty-state notice.
pub fn list_html(entries: &[ListEntry]) -> String {
    if entries.is_empty() {
        return format!("<p class=\"empty\">{}</p>", EMPTY_LIST_NOTICE);
    }
    entries.iter().map(ListEntry::to_html).collect()
}
