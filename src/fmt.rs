use colored::{ColoredString, Colorize};

/// Format a signed amount with thousands separators: -1,234.56
pub fn amount(val: f64) -> String {
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if val < 0.0 && cents != "0.00" {
        format!("-{grouped}.{dec_part}")
    } else {
        format!("{grouped}.{dec_part}")
    }
}

/// Debits in red, credits in green.
pub fn colored_amount(val: f64) -> ColoredString {
    if val < 0.0 {
        amount(val).red()
    } else {
        amount(val).green()
    }
}
