use crate::domain::model::{FilterOptions, GraduateRecord, Summary, YearRange};
use std::cmp::Reverse;
use std::collections::BTreeSet;

pub fn summarize(records: &[GraduateRecord]) -> Summary {
    let distinct_countries = records
        .iter()
        .filter_map(GraduateRecord::country)
        .filter(|country| !country.is_empty())
        .collect::<BTreeSet<_>>()
        .len();

    let year_range = records
        .iter()
        .filter_map(GraduateRecord::graduation_year)
        .fold(None, |range: Option<YearRange>, year| {
            Some(match range {
                None => YearRange { min: year, max: year },
                Some(r) => YearRange {
                    min: r.min.min(year),
                    max: r.max.max(year),
                },
            })
        });

    Summary {
        count: records.len(),
        distinct_countries,
        year_range,
    }
}

/// Years newest first, countries alphabetically.
pub fn distinct_options(records: &[GraduateRecord]) -> FilterOptions {
    let years = records
        .iter()
        .filter_map(GraduateRecord::graduation_year)
        .map(Reverse)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|Reverse(year)| year)
        .collect();

    let countries = records
        .iter()
        .filter_map(GraduateRecord::country)
        .filter(|country| !country.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    FilterOptions { years, countries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: Option<i32>, country: Option<&str>) -> GraduateRecord {
        GraduateRecord::new("Someone", 48.85, 2.35)
            .unwrap()
            .with_graduation_year(year)
            .with_country(country.map(str::to_string))
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.distinct_countries, 0);
        assert_eq!(summary.year_range, None);
        assert_eq!(summary.year_range_label(), "-");
    }

    #[test]
    fn test_summarize_year_range() {
        let records = vec![
            record(Some(2005), Some("France")),
            record(Some(1998), Some("France")),
            record(Some(2005), None),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.distinct_countries, 1);
        assert_eq!(summary.year_range_label(), "1998-2005");
    }

    #[test]
    fn test_single_year_renders_without_range() {
        let records = vec![record(Some(2010), Some("Italy")), record(None, Some("Spain"))];
        let summary = summarize(&records);
        assert_eq!(summary.year_range_label(), "2010");
        assert_eq!(summary.distinct_countries, 2);
    }

    #[test]
    fn test_distinct_options_sorting() {
        let records = vec![
            record(Some(1998), Some("Spain")),
            record(Some(2015), Some("Austria")),
            record(None, None),
            record(Some(2005), Some("Germany")),
            record(Some(2015), Some("Spain")),
        ];
        let options = distinct_options(&records);
        assert_eq!(options.years, vec![2015, 2005, 1998]);
        assert_eq!(options.countries, vec!["Austria", "Germany", "Spain"]);
    }
}
