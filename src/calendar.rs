use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

pub trait DateBoundaries {
    fn start_of_month(&self) -> Option<Self>
    where
        Self: Sized;

    fn end_of_month(&self) -> Option<Self>
    where
        Self: Sized;

    fn start_of_week(&self) -> Option<Self>
    where
        Self: Sized;

    /// Friday of the same Monday based week.
    fn end_of_work_week(&self) -> Option<Self>
    where
        Self: Sized;

    fn is_weekday(&self) -> bool;
}

impl DateBoundaries for NaiveDate {
    fn start_of_month(&self) -> Option<Self> {
        self.with_day(1)
    }

    fn end_of_month(&self) -> Option<Self> {
        self.checked_add_months(Months::new(1))
            .and_then(|d| d.with_day(1))
            .and_then(|d| d.checked_sub_days(Days::new(1)))
    }

    fn start_of_week(&self) -> Option<Self> {
        let days = Days::new(self.weekday().num_days_from_monday().into());
        self.checked_sub_days(days)
    }

    fn end_of_work_week(&self) -> Option<Self> {
        let friday = Weekday::Fri.num_days_from_monday();
        self.start_of_week()
            .and_then(|d| d.checked_add_days(Days::new(friday.into())))
    }

    fn is_weekday(&self) -> bool {
        self.weekday().num_days_from_monday() < 5
    }
}
