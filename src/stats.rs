use crate::series::DailySeries;
use chrono::{Datelike, Days, NaiveDate};

#[derive(Debug, Clone, PartialEq)]
pub struct CashSummary {
    pub as_of: NaiveDate,
    pub today: Option<f64>,
    pub month_to_date: f64,
    pub year_to_date: f64,
    pub today_share_of_ytd: Option<f64>,
    pub month_share_of_ytd: Option<f64>,
}

impl CashSummary {
    pub fn compute(series: &DailySeries, as_of: NaiveDate) -> Self {
        let today = series.get(as_of);
        let month_start = as_of - Days::new(u64::from(as_of.day0()));
        let year_start = as_of - Days::new(u64::from(as_of.ordinal0()));
        let month_to_date = series.sum_between(month_start, as_of);
        let year_to_date = series.sum_between(year_start, as_of);

        let has_ytd = year_to_date > 0.0;
        let today_share_of_ytd = today
            .filter(|_| has_ytd)
            .map(|value| value / year_to_date * 100.0);
        let month_share_of_ytd = has_ytd.then(|| month_to_date / year_to_date * 100.0);

        Self {
            as_of,
            today,
            month_to_date,
            year_to_date,
            today_share_of_ytd,
            month_share_of_ytd,
        }
    }
}
