use crate::domain::model::{CountryFilter, GraduateRecord, Query, YearFilter};

/// Compiled form of a query; the search text is lower-cased once.
pub struct Matcher<'q> {
    needle: String,
    year: YearFilter,
    country: &'q CountryFilter,
}

impl<'q> Matcher<'q> {
    pub fn new(query: &'q Query) -> Self {
        Self {
            needle: query.text.trim().to_lowercase(),
            year: query.year,
            country: &query.country,
        }
    }

    pub fn matches(&self, record: &GraduateRecord) -> bool {
        self.matches_text(record) && self.matches_year(record) && self.matches_country(record)
    }

    fn matches_text(&self, record: &GraduateRecord) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        let contains = |field: &str| field.to_lowercase().contains(&self.needle);

        contains(record.full_name())
            || record.city().is_some_and(contains)
            || record.country().is_some_and(contains)
    }

    fn matches_year(&self, record: &GraduateRecord) -> bool {
        match self.year {
            YearFilter::All => true,
            YearFilter::Year(year) => record.graduation_year() == Some(year),
        }
    }

    fn matches_country(&self, record: &GraduateRecord) -> bool {
        match self.country {
            CountryFilter::All => true,
            CountryFilter::Country(country) => record.country() == Some(country.as_str()),
        }
    }
}

/// Records matching every active part of the query, in input order.
pub fn filter_records(records: &[GraduateRecord], query: &Query) -> Vec<GraduateRecord> {
    let matcher = Matcher::new(query);
    records
        .iter()
        .filter(|record| matcher.matches(record))
        .cloned()
        .collect()
}
