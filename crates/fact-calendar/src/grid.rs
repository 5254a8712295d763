//! Month grid builder
//!
//! Buckets a list of events into day cells and a flexible list for one
//! displayed month. The grid is cheap to build and is recomputed every time
//! the displayed month changes.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::models::MonthView;
use crate::resolver::{DateResolver, Placement, Schedulable};

/// Day cells and flexible events for one month
#[derive(Debug, Clone, Serialize)]
pub struct CalendarGrid<'a, T> {
    pub view: MonthView,
    /// Events pinned to a day, keyed by day-of-month (1..=days_in_month)
    pub days: BTreeMap<u32, Vec<&'a T>>,
    /// Events known to be in this month without a usable day
    pub flexible: Vec<&'a T>,
}

impl<'a, T: Schedulable> CalendarGrid<'a, T> {
    /// Resolve every item against `view`.
    ///
    /// Catalog order is preserved within each day and in the flexible list.
    /// A day past the end of the month (e.g. "February 30") cannot be shown
    /// on the grid, so such events are listed as flexible.
    pub fn build<I>(items: I, view: MonthView) -> Self
    where
        I: IntoIterator<Item = &'a T>,
    {
        let resolver = DateResolver::for_month(&view);
        let last_day = view.days_in_month();

        let mut days: BTreeMap<u32, Vec<&'a T>> = BTreeMap::new();
        let mut flexible = Vec::new();

        for Placement { day, item } in items.into_iter().filter_map(|item| resolver.place(item)) {
            match day {
                Some(day) if day <= last_day => days.entry(day).or_default().push(item),
                _ => flexible.push(item),
            }
        }

        debug!(
            "Built calendar for {}: {} scheduled, {} flexible",
            view,
            days.values().map(Vec::len).sum::<usize>(),
            flexible.len()
        );

        Self {
            view,
            days,
            flexible,
        }
    }
}

impl<'a, T> CalendarGrid<'a, T> {
    /// Events on `day`, in catalog order
    pub fn events_on(&self, day: u32) -> &[&'a T] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of events placed on a specific day
    pub fn scheduled_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    /// Grid cells in Sunday-first order: `None` for the blanks before day 1
    pub fn cells(&self) -> Vec<Option<u32>> {
        let blanks = self.view.leading_blanks() as usize;
        std::iter::repeat_n(None, blanks)
            .chain((1..=self.view.days_in_month()).map(Some))
            .collect()
    }

    /// Cells split into rows of seven
    pub fn weeks(&self) -> Vec<Vec<Option<u32>>> {
        self.cells().chunks(7).map(<[Option<u32>]>::to_vec).collect()
    }

    /// The day to highlight as "today", if `today` falls in this month
    pub fn today_marker(&self, today: NaiveDate) -> Option<u32> {
        self.view.contains(today).then(|| today.day())
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty() && self.flexible.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Event {
        name: &'static str,
        date: &'static str,
        month: &'static str,
    }

    impl Schedulable for Event {
        fn date_text(&self) -> &str {
            self.date
        }

        fn month_text(&self) -> &str {
            self.month
        }
    }

    fn event(name: &'static str, date: &'static str, month: &'static str) -> Event {
        Event { name, date, month }
    }

    fn catalog() -> Vec<Event> {
        vec![
            event("AMC 10/12 A", "AMC takes place on November 8th", "November"),
            event("Physics Bowl", "Late March", "March"),
            event("AMC 10/12 B", "Nov 14th", "November"),
            event("Linguistics", "Rolling admissions throughout November", "November"),
            event("Euclid", "April 2nd", "April"),
            event("Same Day", "8 November", "November"),
        ]
    }

    fn names<'a>(events: &[&'a Event]) -> Vec<&'a str> {
        events.iter().map(|e| e.name).collect()
    }

    #[test]
    fn test_build_buckets() {
        let items = catalog();
        let grid = CalendarGrid::build(&items, MonthView::new(2025, 11).unwrap());

        assert_eq!(names(grid.events_on(8)), vec!["AMC 10/12 A", "Same Day"]);
        assert_eq!(names(grid.events_on(14)), vec!["AMC 10/12 B"]);
        assert!(grid.events_on(1).is_empty());
        assert_eq!(names(&grid.flexible), vec!["Linguistics"]);
        assert_eq!(grid.scheduled_count(), 3);
    }

    #[test]
    fn test_other_months_are_excluded() {
        let items = catalog();
        let grid = CalendarGrid::build(&items, MonthView::new(2025, 10).unwrap());
        assert!(grid.is_empty());

        let grid = CalendarGrid::build(&items, MonthView::new(2026, 3).unwrap());
        assert_eq!(names(&grid.flexible), vec!["Physics Bowl"]);
        assert_eq!(grid.scheduled_count(), 0);
    }

    #[test]
    fn test_day_past_month_end_is_flexible() {
        let items = vec![event("Leap", "February 30th", "February")];
        let grid = CalendarGrid::build(&items, MonthView::new(2025, 2).unwrap());
        assert!(grid.days.is_empty());
        assert_eq!(names(&grid.flexible), vec!["Leap"]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let items = catalog();
        let view = MonthView::new(2025, 11).unwrap();
        let first = CalendarGrid::build(&items, view);
        let second = CalendarGrid::build(&items, view);
        assert_eq!(first.days, second.days);
        assert_eq!(first.flexible, second.flexible);
    }

    #[test]
    fn test_cells_layout() {
        let items: Vec<Event> = Vec::new();
        // October 2025 starts on a Wednesday
        let grid = CalendarGrid::build(&items, MonthView::new(2025, 10).unwrap());
        let cells = grid.cells();
        assert_eq!(cells.len(), 3 + 31);
        assert_eq!(&cells[..4], &[None, None, None, Some(1)]);
        assert_eq!(cells.last(), Some(&Some(31)));

        let weeks = grid.weeks();
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0].len(), 7);
        assert_eq!(weeks[4], vec![Some(26), Some(27), Some(28), Some(29), Some(30), Some(31)]);
    }

    #[test]
    fn test_today_marker() {
        let items: Vec<Event> = Vec::new();
        let grid = CalendarGrid::build(&items, MonthView::new(2025, 10).unwrap());
        assert_eq!(
            grid.today_marker(NaiveDate::from_ymd_opt(2025, 10, 16).unwrap()),
            Some(16)
        );
        assert_eq!(
            grid.today_marker(NaiveDate::from_ymd_opt(2025, 11, 16).unwrap()),
            None
        );
    }
}
