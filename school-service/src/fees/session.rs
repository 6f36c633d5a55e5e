use chrono::{Datelike, Month, NaiveDate};
use serde::Serialize;

/// Months of an academic session in order, April first.
pub const SESSION_MONTHS: [Month; 12] = [
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
    Month::January,
    Month::February,
    Month::March,
];

/// Invoices for a period fall due on this day of the month.
pub const DUE_DAY: u32 = 10;

/// Position of `month` within the session (April = 0, March = 11).
pub fn month_index(month: Month) -> usize {
    (month.number_from_month() as usize + 8) % 12
}

/// Three-letter English abbreviation ("Apr").
pub fn month_abbrev(month: Month) -> &'static str {
    &month.name()[..3]
}

/// Academic year running 1 April to 31 March.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicSession {
    pub start_year: i32,
    pub end_year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AcademicSession {
    pub fn starting(start_year: i32) -> Self {
        Self {
            start_year,
            end_year: start_year + 1,
            start: calendar_date(start_year, 4, 1),
            end: calendar_date(start_year + 1, 3, 31),
        }
    }

    /// Session containing `date`. January to March belong to the session
    /// that started the previous April.
    pub fn for_date(date: NaiveDate) -> Self {
        let start_year = if date.month() < 4 {
            date.year() - 1
        } else {
            date.year()
        };
        Self::starting(start_year)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// "2024-2025"
    pub fn label(&self) -> String {
        format!("{}-{}", self.start_year, self.end_year)
    }

    /// Calendar year in which `month` of this session falls.
    pub fn year_of(&self, month: Month) -> i32 {
        if month.number_from_month() >= 4 {
            self.start_year
        } else {
            self.end_year
        }
    }

    pub fn due_date(&self, month: Month) -> NaiveDate {
        calendar_date(self.year_of(month), month.number_from_month(), DUE_DAY)
    }
}

fn calendar_date(year: i32, month: u32, day: u32) -> NaiveDate {
    // Only called with fixed days that exist in every month used.
    NaiveDate::from_ymd_opt(year, month, day).expect("fixed session date is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_session_before_april_starts_previous_year() {
        let s = AcademicSession::for_date(date(2024, 2, 15));
        assert_eq!(s.start, date(2023, 4, 1));
        assert_eq!(s.end, date(2024, 3, 31));
        assert_eq!(s.label(), "2023-2024");
    }

    #[test]
    fn test_session_from_april() {
        let s = AcademicSession::for_date(date(2024, 6, 1));
        assert_eq!(s.start, date(2024, 4, 1));
        assert_eq!(s.end, date(2025, 3, 31));

        let boundary = AcademicSession::for_date(date(2024, 4, 1));
        assert_eq!(boundary.start_year, 2024);
        let last_day = AcademicSession::for_date(date(2025, 3, 31));
        assert_eq!(last_day.start_year, 2024);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let s = AcademicSession::starting(2024);
        assert!(s.contains(date(2024, 4, 1)));
        assert!(s.contains(date(2025, 3, 31)));
        assert!(!s.contains(date(2024, 3, 31)));
        assert!(!s.contains(date(2025, 4, 1)));
    }

    #[test]
    fn test_due_dates_cross_new_year() {
        let s = AcademicSession::starting(2024);
        assert_eq!(s.due_date(Month::April), date(2024, 4, 10));
        assert_eq!(s.due_date(Month::December), date(2024, 12, 10));
        assert_eq!(s.due_date(Month::January), date(2025, 1, 10));
        assert_eq!(s.due_date(Month::March), date(2025, 3, 10));
    }

    #[test]
    fn test_month_index_and_abbrev() {
        for (i, m) in SESSION_MONTHS.iter().enumerate() {
            assert_eq!(month_index(*m), i);
        }
        assert_eq!(month_abbrev(Month::September), "Sep");
        assert_eq!(month_abbrev(Month::May), "May");
    }
}
