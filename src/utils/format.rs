use chrono::NaiveDate;

/// en-US 千分位格式，最多三位小數並去除尾端的 0 (例如 24000 -> "24,000")
pub fn format_grouped(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    if value < 0.0 && grouped != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_currency(symbol: &str, value: f64) -> String {
    format!("{}{}", symbol, format_grouped(value))
}

pub fn format_fixed2(value: f64) -> String {
    format!("{:.2}", value)
}

/// M/D/YYYY
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}
