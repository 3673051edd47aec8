/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use sales_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a tiny epsilon at the target precision so exact binary
    // midpoints like 1.005 round away from zero.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` is "0.xx", or "1.00" when the fraction rounds up.
        let decimal_digits = &frac_str[frac_str.len() - decimals as usize - 1..];
        format!("{}{}", grouped, decimal_digits)
    };

    if negative && result.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a sales figure (millions of units) with two decimals.
///
/// ```
/// use sales_core::formatting::format_sales;
///
/// assert_eq!(format_sales(15.0), "15.00");
/// assert_eq!(format_sales(1234.567), "1,234.57");
/// ```
pub fn format_sales(millions: f64) -> String {
    format_number(millions, 2)
}

/// Format a record count with thousands separators.
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Format an optional value, rendering `None` as `"-"`.
///
/// ```
/// use sales_core::formatting::format_optional;
///
/// assert_eq!(format_optional(Some(8.5), 1), "8.5");
/// assert_eq!(format_optional(None, 1), "-");
/// ```
pub fn format_optional(value: Option<f64>, decimals: u32) -> String {
    match value {
        Some(v) => format_number(v, decimals),
        None => "-".to_string(),
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// ```
/// use sales_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// Format `part` as a share of `whole`, e.g. `"25.0%"`.
pub fn format_share(part: f64, whole: f64) -> String {
    format!("{:.1}%", percentage(part, whole, 1))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
