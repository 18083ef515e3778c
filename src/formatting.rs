/// Whole-dollar amount with thousands separators: `$1,234`, `$-500`.
pub fn format_dollars(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    // `-0.2` prints as `$-0`; an empty `f64` sum is `-0.0` and prints as `$0`.
    let sign = if value < 0.0 { "-" } else { "" };

    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (idx, digit) in rounded.chars().enumerate() {
        if idx > 0 && (rounded.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("${sign}{grouped}")
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.3}%")
}
