use crate::fetch::RawRecord;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rustc_hash::FxHashMap;

const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentChange {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct DailySeries {
    totals: Vec<DailyTotal>,
}

impl DailySeries {
    pub fn from_records(records: &[RawRecord]) -> Result<Self> {
        let mut by_date: FxHashMap<NaiveDate, f64> = FxHashMap::default();

        for record in records {
            let date = parse_record_date(&record.record_date)?;
            let amount = record
                .transaction_today_amt
                .as_deref()
                .map_or(0.0, parse_amount);
            *by_date.entry(date).or_insert(0.0) += amount;
        }

        let mut totals: Vec<DailyTotal> = by_date
            .into_iter()
            .map(|(date, amount)| DailyTotal { date, amount })
            .collect();
        totals.sort_by_key(|total| total.date);

        Ok(Self { totals })
    }

    pub fn totals(&self) -> &[DailyTotal] {
        &self.totals
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.totals
            .binary_search_by_key(&date, |total| total.date)
            .ok()
            .map(|idx| self.totals[idx].amount)
    }

    pub fn sum_between(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        self.totals
            .iter()
            .filter(|total| total.date >= start && total.date <= end)
            .map(|total| total.amount)
            .sum()
    }

    // A zero predecessor yields a non-finite value.
    pub fn percent_change(&self) -> Vec<PercentChange> {
        let mut changes = Vec::with_capacity(self.totals.len());
        let mut previous: Option<f64> = None;

        for total in &self.totals {
            let value = previous.map(|prev| (total.amount - prev) / prev * 100.0);
            changes.push(PercentChange {
                date: total.date,
                value,
            });
            previous = Some(total.amount);
        }

        changes
    }
}

pub fn parse_record_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), RECORD_DATE_FORMAT)
        .with_context(|| format!("invalid record_date {value:?}"))
}

pub fn parse_amount(value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount,
        _ => 0.0,
    }
}
