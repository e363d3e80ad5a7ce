use chrono::{NaiveDate, NaiveDateTime, Utc};

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Whole days from `today` until `date`; negative once the date has passed.
pub fn days_left(today: NaiveDate, date: NaiveDate) -> i64 {
    (date - today).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_left() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(days_left(today, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()), 5);
        assert_eq!(days_left(today, today), 0);
        assert_eq!(days_left(today, NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()), -2);
    }
}
