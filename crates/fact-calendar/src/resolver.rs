//! Free-text date resolver
//!
//! Competition dates are written by hand ("Late October", "Nov 14th",
//! "March 3-5"). The resolver decides, for one displayed month, whether an
//! event belongs to that month and tries to pull a day-of-month out of the
//! text. Anything it cannot pin to a day is reported as flexible.
//!
//! Membership is deliberately over-inclusive: a month name anywhere in the
//! text is enough, and the extracted day only has to sit next to *a* month
//! token, not necessarily the one that established membership.

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::warn;

use crate::models::MonthView;

/// Something that can be placed on the calendar
pub trait Schedulable {
    /// Free-text date description, e.g. "AMC takes place on November 8th"
    fn date_text(&self) -> &str;

    /// Normalized month name used as a coarse grouping key
    fn month_text(&self) -> &str;
}

/// Outcome of resolving one event against one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "day", rename_all = "snake_case")]
pub enum Classification {
    /// Not in the displayed month
    Excluded,
    /// In the displayed month on a specific day
    Day(u32),
    /// In the displayed month without a resolvable day
    Flexible,
}

/// A resolved calendar entry: an event paired with its day, if any
#[derive(Debug, PartialEq, Serialize)]
pub struct Placement<'a, T> {
    pub day: Option<u32>,
    pub item: &'a T,
}

impl<T> Clone for Placement<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Placement<'_, T> {}

/// Classify a single date string against a month.
///
/// `month_name` is the full month name ("October") and `month_abbr` its
/// three-letter form ("Oct"). Never fails: malformed input is flexible.
pub fn classify(date: &str, month_str: &str, month_name: &str, month_abbr: &str) -> Classification {
    DateResolver::new(month_name, month_abbr).classify(date, month_str)
}

/// Date resolver compiled for one month
#[derive(Debug, Clone)]
pub struct DateResolver {
    month_name: String,
    month_abbr: String,
    month_then_day: Option<Regex>,
    day_then_month: Option<Regex>,
}

impl DateResolver {
    pub fn new(month_name: &str, month_abbr: &str) -> Self {
        let tokens = format!(
            "(?:{}|{})",
            regex::escape(month_name),
            regex::escape(month_abbr)
        );

        // The day token must be a whole 1-2 digit number, so a year such as
        // "November 2025" is never read as day 20.
        let month_then_day = compile(&format!(
            r"{}[a-z]*\.?\s+([0-9]{{1,2}})(?:st|nd|rd|th)?(?:[^0-9]|$)",
            tokens
        ));
        let day_then_month = compile(&format!(
            r"(?:^|[^0-9])([0-9]{{1,2}})(?:st|nd|rd|th)?\s+{}[a-z]*",
            tokens
        ));

        Self {
            month_name: month_name.to_lowercase(),
            month_abbr: month_abbr.to_lowercase(),
            month_then_day,
            day_then_month,
        }
    }

    /// Resolver for a displayed month
    pub fn for_month(view: &MonthView) -> Self {
        Self::new(view.name(), view.abbreviation())
    }

    /// Whether the event belongs to this month at all
    pub fn is_in_month(&self, date: &str, month_str: &str) -> bool {
        let date = date.to_lowercase();
        month_str.to_lowercase() == self.month_name
            || date.contains(&self.month_name)
            || (!self.month_abbr.is_empty() && date.contains(&self.month_abbr))
    }

    /// Extract a day adjacent to a month token.
    ///
    /// Month-then-day is tried first; the first pattern that matches decides.
    /// A number outside 1-31 makes the whole extraction fail.
    pub fn extract_day(&self, date: &str) -> Option<u32> {
        let captured = [&self.month_then_day, &self.day_then_month]
            .into_iter()
            .flatten()
            .find_map(|re| re.captures(date))
            .and_then(|caps| caps.get(1))?;

        captured
            .as_str()
            .parse::<u32>()
            .ok()
            .filter(|day| (1..=31).contains(day))
    }

    pub fn classify(&self, date: &str, month_str: &str) -> Classification {
        if !self.is_in_month(date, month_str) {
            return Classification::Excluded;
        }

        match self.extract_day(date) {
            Some(day) => Classification::Day(day),
            None => Classification::Flexible,
        }
    }

    /// Place an item, or `None` when it is not in this month
    pub fn place<'a, T: Schedulable>(&self, item: &'a T) -> Option<Placement<'a, T>> {
        match self.classify(item.date_text(), item.month_text()) {
            Classification::Excluded => None,
            Classification::Day(day) => Some(Placement {
                day: Some(day),
                item,
            }),
            Classification::Flexible => Some(Placement { day: None, item }),
        }
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            // Without a pattern every in-month event is simply flexible.
            warn!("Failed to compile day pattern {}: {}", pattern, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nov(date: &str, month_str: &str) -> Classification {
        classify(date, month_str, "November", "Nov")
    }

    #[test]
    fn test_month_str_membership_ignores_date() {
        assert_eq!(nov("TBA", "November"), Classification::Flexible);
        assert_eq!(nov("TBA", "november"), Classification::Flexible);
        assert_eq!(nov("TBA", "October"), Classification::Excluded);
        // month_str must equal the month name exactly, apart from case
        assert_eq!(nov("TBA", " November"), Classification::Excluded);
        assert_eq!(nov("TBA", "Nov"), Classification::Excluded);
    }

    #[test]
    fn test_membership_by_date_text() {
        assert_eq!(nov("Early November", "December"), Classification::Flexible);
        assert_eq!(nov("late nov.", ""), Classification::Flexible);
        assert_eq!(nov("Late October", "October"), Classification::Excluded);
    }

    #[test]
    fn test_month_then_day() {
        assert_eq!(nov("November 8", ""), Classification::Day(8));
        assert_eq!(nov("November 8th", ""), Classification::Day(8));
        assert_eq!(nov("Nov 14th", ""), Classification::Day(14));
        assert_eq!(nov("Nov. 21st", ""), Classification::Day(21));
        assert_eq!(nov("NOVEMBER 2ND", ""), Classification::Day(2));
        assert_eq!(nov("nov 3rd", ""), Classification::Day(3));
    }

    #[test]
    fn test_day_then_month() {
        assert_eq!(nov("8 November", ""), Classification::Day(8));
        assert_eq!(nov("22nd Nov", ""), Classification::Day(22));
        assert_eq!(nov("on the 1st november", ""), Classification::Day(1));
    }

    #[test]
    fn test_every_valid_day_is_extracted() {
        for day in 1..=31 {
            for text in [
                format!("November {}", day),
                format!("nov {}th", day),
                format!("{} NOVEMBER", day),
                format!("{}th Nov", day),
            ] {
                assert_eq!(nov(&text, ""), Classification::Day(day), "{}", text);
            }
        }
    }

    #[test]
    fn test_out_of_range_day_is_flexible() {
        assert_eq!(nov("November 0", ""), Classification::Flexible);
        assert_eq!(nov("November 32", ""), Classification::Flexible);
        assert_eq!(nov("November 45th", ""), Classification::Flexible);
        assert_eq!(nov("99 November", ""), Classification::Flexible);
    }

    #[test]
    fn test_long_numbers_are_not_days() {
        assert_eq!(nov("November 2025", ""), Classification::Flexible);
        assert_eq!(nov("November 123", ""), Classification::Flexible);
        assert_eq!(nov("2025 November", ""), Classification::Flexible);
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        // month-then-day is tried first even when day-then-month also matches
        assert_eq!(nov("3 Nov 5", ""), Classification::Day(5));
        // an invalid first match does not fall back to the second pattern
        assert_eq!(nov("12 Nov 40", ""), Classification::Flexible);
    }

    #[test]
    fn test_unrelated_number_next_to_month_is_accepted() {
        // Heuristic: any number adjacent to a month token counts
        assert_eq!(
            nov("Results in Nov 30 days after the October round", "October"),
            Classification::Day(30)
        );
    }

    #[test]
    fn test_scenarios() {
        let amc = "AMC takes place on November 8th";
        assert_eq!(nov(amc, "November"), Classification::Day(8));
        assert_eq!(
            classify(amc, "November", "October", "Oct"),
            Classification::Excluded
        );

        let rolling = "Rolling admissions throughout March";
        assert_eq!(
            classify(rolling, "March", "March", "Mar"),
            Classification::Flexible
        );
    }

    #[test]
    fn test_ranges_take_first_day() {
        assert_eq!(
            classify("March 3-5", "March", "March", "Mar"),
            Classification::Day(3)
        );
    }

    #[test]
    fn test_garbage_input_degrades() {
        assert_eq!(nov("", "November"), Classification::Flexible);
        assert_eq!(nov("???", "November"), Classification::Flexible);
        assert_eq!(nov("Nov \u{1F4C5} 9", "November"), Classification::Flexible);
    }

    #[test]
    fn test_resolver_is_deterministic() {
        let resolver = DateResolver::new("November", "Nov");
        let first = resolver.classify("Nov 14th", "November");
        let second = resolver.classify("Nov 14th", "November");
        assert_eq!(first, second);
    }

    #[test]
    fn test_for_month() {
        let view = MonthView::new(2025, 5).unwrap();
        let resolver = DateResolver::for_month(&view);
        assert_eq!(resolver.classify("May 10", ""), Classification::Day(10));
    }

    #[test]
    fn test_classification_serialization() {
        let json = serde_json::to_string(&Classification::Day(8)).unwrap();
        assert_eq!(json, r#"{"kind":"day","day":8}"#);
        let json = serde_json::to_string(&Classification::Flexible).unwrap();
        assert_eq!(json, r#"{"kind":"flexible"}"#);
    }
}
