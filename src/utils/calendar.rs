//! Month grid for the agenda page.
//!
//! The grid is always 6 weeks of 7 days, Sunday first. Cells before the
//! first day and after the last day of the month are empty.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;

pub const GRID_CELLS: usize = 42;

pub const WEEKDAY_LABELS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

const MONTH_NAMES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

/// Displayed month, zero-indexed like the month selector (0 = January)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    pub month0: u32,
    pub year: i32,
}

impl MonthCursor {
    pub fn new(month0: u32, year: i32) -> Self {
        Self {
            month0: month0 % 12,
            year,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.month0(), date.year())
    }

    pub fn previous(self) -> Self {
        if self.month0 == 0 {
            Self::new(11, self.year - 1)
        } else {
            Self::new(self.month0 - 1, self.year)
        }
    }

    pub fn next(self) -> Self {
        if self.month0 == 11 {
            Self::new(0, self.year + 1)
        } else {
            Self::new(self.month0 + 1, self.year)
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day() - Duration::days(1)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Weekday of the 1st, Sunday = 0
    pub fn first_weekday(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.month0 as usize], self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalendarCell {
    pub date: Option<NaiveDate>,
    pub is_today: bool,
    pub is_active: bool,
    pub appointments: usize,
}

impl CalendarCell {
    pub fn day(&self) -> Option<u32> {
        self.date.map(|d| d.day())
    }

    pub fn has_events(&self) -> bool {
        self.appointments > 0
    }
}

/// Build the 42 cells for `cursor`.
///
/// The today marker is set only when `today` falls inside the displayed
/// month. The active cell is today in that case, otherwise the 1st.
pub fn build_month_grid(cursor: MonthCursor, today: NaiveDate) -> Vec<CalendarCell> {
    let offset = cursor.first_weekday() as usize;
    let days = cursor.days_in_month() as usize;
    let showing_current = cursor.contains(today);
    let active_day = if showing_current { today.day() } else { 1 };

    let mut cells = vec![CalendarCell::default(); GRID_CELLS];
    for day in 1..=days {
        let date = cursor.first_day() + Duration::days(day as i64 - 1);
        let cell = &mut cells[offset + day - 1];
        cell.date = Some(date);
        cell.is_today = showing_current && date == today;
        cell.is_active = day as u32 == active_day;
    }
    cells
}

/// Move the active marker to `date`; no-op when the date is not on the grid
pub fn select_date(cells: &mut [CalendarCell], date: NaiveDate) {
    if !cells.iter().any(|c| c.date == Some(date)) {
        return;
    }
    for cell in cells.iter_mut() {
        cell.is_active = cell.date == Some(date);
    }
}

/// Count appointments per day from ISO start timestamps (`2024-05-03T14:30:00`)
pub fn count_by_day<'a>(starts: impl IntoIterator<Item = &'a str>) -> HashMap<NaiveDate, usize> {
    let mut counts = HashMap::new();
    for start in starts {
        let day = start.split('T').next().unwrap_or_default();
        if let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            *counts.entry(date).or_insert(0) += 1;
        }
    }
    counts
}

pub fn mark_appointment_counts(cells: &mut [CalendarCell], counts: &HashMap<NaiveDate, usize>) {
    for cell in cells.iter_mut() {
        cell.appointments = cell
            .date
            .and_then(|date| counts.get(&date).copied())
            .unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_every_month_has_42_cells_and_correct_day_count() {
        let today = date(2024, 6, 15);
        for year in 1999..=2030 {
            for month0 in 0..12 {
                let cursor = MonthCursor::new(month0, year);
                let cells = build_month_grid(cursor, today);
                assert_eq!(cells.len(), GRID_CELLS);
                let filled = cells.iter().filter(|c| c.date.is_some()).count();
                assert_eq!(filled as u32, cursor.days_in_month(), "{}/{}", month0, year);
            }
        }
    }

    #[test]
    fn test_leading_cells_match_first_weekday() {
        // 1 Sept 2024 is a Sunday, 1 Feb 2025 a Saturday
        let sept = build_month_grid(MonthCursor::new(8, 2024), date(2024, 1, 1));
        assert_eq!(sept[0].day(), Some(1));

        let feb = build_month_grid(MonthCursor::new(1, 2025), date(2024, 1, 1));
        assert!(feb[..6].iter().all(|c| c.date.is_none()));
        assert_eq!(feb[6].day(), Some(1));
        assert_eq!(feb[6 + 27].day(), Some(28));
        assert!(feb[34..].iter().all(|c| c.date.is_none()));
    }

    #[test]
    fn test_leap_february() {
        assert_eq!(MonthCursor::new(1, 2024).days_in_month(), 29);
        assert_eq!(MonthCursor::new(1, 2023).days_in_month(), 28);
        assert_eq!(MonthCursor::new(1, 2000).days_in_month(), 29);
        assert_eq!(MonthCursor::new(1, 1900).days_in_month(), 28);
    }

    #[test]
    fn test_today_marked_only_in_current_month() {
        let today = date(2024, 3, 20);
        let current = build_month_grid(MonthCursor::from_date(today), today);
        let marked: Vec<_> = current.iter().filter(|c| c.is_today).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].date, Some(today));

        let other = build_month_grid(MonthCursor::new(3, 2024), today);
        assert!(other.iter().all(|c| !c.is_today));

        // same month number, different year
        let last_year = build_month_grid(MonthCursor::new(2, 2023), today);
        assert!(last_year.iter().all(|c| !c.is_today));
    }

    #[test]
    fn test_active_cell_is_today_or_first() {
        let today = date(2024, 3, 20);
        let current = build_month_grid(MonthCursor::from_date(today), today);
        let active: Vec<_> = current.iter().filter(|c| c.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].date, Some(today));

        let next = build_month_grid(MonthCursor::new(3, 2024), today);
        let active: Vec<_> = next.iter().filter(|c| c.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].day(), Some(1));
    }

    #[test]
    fn test_navigation_rolls_over_year() {
        let jan = MonthCursor::new(0, 2024);
        assert_eq!(jan.previous(), MonthCursor::new(11, 2023));
        let dec = MonthCursor::new(11, 2024);
        assert_eq!(dec.next(), MonthCursor::new(0, 2025));
        assert_eq!(MonthCursor::new(5, 2024).next().previous(), MonthCursor::new(5, 2024));
        assert_eq!(dec.label(), "Dezembro 2024");
    }

    #[test]
    fn test_appointment_counts_and_selection() {
        let cursor = MonthCursor::new(4, 2024);
        let mut cells = build_month_grid(cursor, date(2024, 5, 2));
        let counts = count_by_day([
            "2024-05-03T09:00:00",
            "2024-05-03T14:30:00",
            "2024-05-10T10:00:00",
            "garbage",
        ]);
        mark_appointment_counts(&mut cells, &counts);

        let third = cells.iter().find(|c| c.day() == Some(3)).unwrap();
        assert_eq!(third.appointments, 2);
        assert_eq!(cells.iter().filter(|c| c.has_events()).count(), 2);

        select_date(&mut cells, date(2024, 5, 10));
        let active: Vec<_> = cells.iter().filter(|c| c.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].day(), Some(10));

        // outside the grid leaves the selection alone
        select_date(&mut cells, date(2024, 7, 1));
        assert_eq!(cells.iter().filter(|c| c.is_active).count(), 1);
    }
}
