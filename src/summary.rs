use crate::formatting::{format_dollars, format_percent};
use crate::stats::CashSummary;
use chrono::NaiveDate;
use colored::Colorize;

const SUMMARY_HEADER: &str = "Operating Cash Deposits & Withdrawals (total, all categories):";
const LABEL_WIDTH: usize = 19;
const TODAY_MISSING: &str = "Data not available.";
const SHARE_MISSING: &str = "N/A";

pub fn print_summary(summary: &CashSummary) {
    for line in render_summary(summary) {
        println!("{line}");
    }
}

pub fn print_missing_today_warning(as_of: NaiveDate) {
    println!("{}", render_missing_today_warning(as_of));
}

fn render_missing_today_warning(as_of: NaiveDate) -> String {
    format!("Warning: No data found for today {}.", format_date(as_of))
        .yellow()
        .to_string()
}

fn render_summary(summary: &CashSummary) -> Vec<String> {
    let mut lines = Vec::with_capacity(7);
    lines.push(SUMMARY_HEADER.bold().bright_cyan().to_string());
    lines.push(format!(
        "{} {}",
        "Data up to:".bright_yellow().bold(),
        format_date(summary.as_of).bright_white()
    ));
    lines.push(optional_line(
        "Today's value:",
        summary.today.map(format_dollars),
        TODAY_MISSING,
    ));
    lines.push(value_line(
        "Month-to-date:",
        &format_dollars(summary.month_to_date),
    ));
    lines.push(value_line(
        "Year-to-date:",
        &format_dollars(summary.year_to_date),
    ));
    lines.push(optional_line(
        "% Today / YTD:",
        summary.today_share_of_ytd.map(format_percent),
        SHARE_MISSING,
    ));
    lines.push(optional_line(
        "% Month / YTD:",
        summary.month_share_of_ytd.map(format_percent),
        SHARE_MISSING,
    ));
    lines
}

fn value_line(label: &str, value: &str) -> String {
    format!("{}{}", padded_label(label), value.bright_white())
}

fn optional_line(label: &str, value: Option<String>, missing: &str) -> String {
    match value {
        Some(value) => value_line(label, &value),
        None => format!("{}{}", padded_label(label), missing.bright_black()),
    }
}

fn padded_label(label: &str) -> colored::ColoredString {
    format!("{label:<width$}", width = LABEL_WIDTH)
        .bright_yellow()
        .bold()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    fn summary() -> CashSummary {
        CashSummary {
            as_of: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            today: Some(1_234_567.4),
            month_to_date: 23_456_789.0,
            year_to_date: 345_678_901.0,
            today_share_of_ytd: Some(0.35714),
            month_share_of_ytd: Some(6.78571),
        }
    }

    #[test]
    fn renders_fixed_format_lines() {
        plain();

        let lines = render_summary(&summary());

        assert_eq!(
            lines,
            vec![
                "Operating Cash Deposits & Withdrawals (total, all categories):",
                "Data up to: 2024-03-15",
                "Today's value:     $1,234,567",
                "Month-to-date:     $23,456,789",
                "Year-to-date:      $345,678,901",
                "% Today / YTD:     0.357%",
                "% Month / YTD:     6.786%",
            ]
        );
    }

    #[test]
    fn missing_values_use_explicit_markers() {
        plain();
        let summary = CashSummary {
            today: None,
            year_to_date: 0.0,
            today_share_of_ytd: None,
            month_share_of_ytd: None,
            ..summary()
        };

        let lines = render_summary(&summary);

        assert_eq!(lines[2], "Today's value:     Data not available.");
        assert_eq!(lines[4], "Year-to-date:      $0");
        assert_eq!(lines[5], "% Today / YTD:     N/A");
        assert_eq!(lines[6], "% Month / YTD:     N/A");
    }

    #[test]
    fn warning_names_the_missing_date() {
        plain();

        let warning =
            render_missing_today_warning(NaiveDate::from_ymd_opt(2024, 7, 4).unwrap());

        assert_eq!(warning, "Warning: No data found for today 2024-07-04.");
    }
}
