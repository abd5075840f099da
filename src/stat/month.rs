use super::error::{EstateError, Result};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month rent is billed for, written `YYYY-MM`.
///
/// Held as the month's first day, so every value is a month chrono can
/// represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingMonth {
    first: NaiveDate,
}

impl BillingMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or_else(|| EstateError::BadMonth(format!("{year}-{month}")))
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    pub fn month(self) -> u32 {
        self.first.month()
    }

    pub fn succ(self) -> Self {
        self.add_months(1)
    }

    /// Saturates at the first and last months chrono can represent.
    pub fn add_months(self, delta: i32) -> Self {
        let step = Months::new(delta.unsigned_abs());
        let moved = if delta >= 0 {
            self.first.checked_add_months(step)
        } else {
            self.first.checked_sub_months(step)
        };
        match moved {
            Some(first) => Self { first },
            None if delta >= 0 => Self::of(NaiveDate::MAX),
            None => Self::of(NaiveDate::MIN),
        }
    }

    pub fn first_day(self) -> NaiveDate {
        self.first
    }

    pub fn last_day(self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    fn index(self) -> i64 {
        i64::from(self.first.year()) * 12 + i64::from(self.first.month0())
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Accepts `YYYY-MM`, or a full `YYYY-MM-DD` date whose month is taken.
impl FromStr for BillingMonth {
    type Err = EstateError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let bad = || EstateError::BadMonth(s.to_string());
        let parts: Vec<&str> = s.split('-').collect();
        match parts.as_slice() {
            [y, m] => {
                let year = y.parse::<i32>().map_err(|_| bad())?;
                let month = m.parse::<u32>().map_err(|_| bad())?;
                Self::new(year, month).map_err(|_| bad())
            }
            [_, _, _] => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Self::of)
                .map_err(|_| bad()),
            _ => Err(bad()),
        }
    }
}

impl TryFrom<String> for BillingMonth {
    type Error = EstateError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<BillingMonth> for String {
    fn from(value: BillingMonth) -> Self {
        value.to_string()
    }
}

/// Every month from `start` to `end`, both included. Empty when `start > end`.
pub fn expand_month_range(start: BillingMonth, end: BillingMonth) -> Vec<BillingMonth> {
    let mut result = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        result.push(cursor);
        if cursor == end {
            break;
        }
        cursor = cursor.succ();
    }
    result
}

pub fn months_between_inclusive(from: BillingMonth, to: BillingMonth) -> u32 {
    if from > to {
        return 0;
    }
    (to.index() - from.index() + 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(y: i32, m: u32) -> BillingMonth {
        BillingMonth::new(y, m).unwrap()
    }

    #[test]
    fn parses_month_and_full_date() {
        assert_eq!("2023-10".parse::<BillingMonth>().unwrap(), ym(2023, 10));
        assert_eq!("2023-02-28".parse::<BillingMonth>().unwrap(), ym(2023, 2));
        assert!("2023-13".parse::<BillingMonth>().is_err());
        assert!("2023".parse::<BillingMonth>().is_err());
        assert!("2023-02-30".parse::<BillingMonth>().is_err());
    }

    #[test]
    fn display_pads_month() {
        assert_eq!(ym(2024, 3).to_string(), "2024-03");
    }

    #[test]
    fn month_arithmetic_crosses_years() {
        assert_eq!(ym(2023, 12).succ(), ym(2024, 1));
        assert_eq!(ym(2024, 1).add_months(-1), ym(2023, 12));
        assert_eq!(ym(2024, 5).add_months(-17), ym(2022, 12));
        assert_eq!(ym(2024, 2).last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn range_is_inclusive_and_ordered() {
        let months = expand_month_range(ym(2023, 11), ym(2024, 2));
        assert_eq!(months, vec![ym(2023, 11), ym(2023, 12), ym(2024, 1), ym(2024, 2)]);
        assert!(expand_month_range(ym(2024, 2), ym(2024, 1)).is_empty());
        assert_eq!(months_between_inclusive(ym(2023, 1), ym(2023, 10)), 10);
        assert_eq!(months_between_inclusive(ym(2023, 10), ym(2023, 1)), 0);
    }

    #[test]
    fn years_outside_the_calendar_are_rejected() {
        assert!(matches!(
            "200000000-01".parse::<BillingMonth>(),
            Err(EstateError::BadMonth(_))
        ));
        assert!(matches!(BillingMonth::new(i32::MAX, 1), Err(EstateError::BadMonth(_))));
        assert!(matches!(BillingMonth::new(2023, 0), Err(EstateError::BadMonth(_))));
    }

    #[test]
    fn arithmetic_saturates_at_calendar_edges() {
        let last = BillingMonth::of(NaiveDate::MAX);
        assert_eq!(last.succ(), last);
        assert_eq!(last.last_day(), NaiveDate::MAX);
        assert_eq!(last.add_months(i32::MAX), last);
        let first = BillingMonth::of(NaiveDate::MIN);
        assert_eq!(first.add_months(i32::MIN), first);
        assert_eq!(first.first_day(), NaiveDate::MIN);

        let tail = expand_month_range(last.add_months(-2), last);
        assert_eq!(tail.len(), 3);
        assert_eq!(
            months_between_inclusive(first, last),
            months_between_inclusive(first, last.add_months(-3)) + 3
        );
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&ym(2023, 9)).unwrap();
        assert_eq!(json, "\"2023-09\"");
        let back: BillingMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ym(2023, 9));
    }
}
