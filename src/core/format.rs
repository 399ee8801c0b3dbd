/// Formats a number with `,` thousands grouping and at most three trimmed
/// fraction digits (`1234567.5` -> `1,234,567.5`).
#[must_use]
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return "nan".to_owned();
    }

    let text = format!("{:.3}", value.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + 1);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    if value < 0.0 && grouped.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::format_grouped;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1_000.0), "1,000");
        assert_eq!(format_grouped(50_000.0), "50,000");
        assert_eq!(format_grouped(1_234_567.0), "1,234,567");
    }

    #[test]
    fn trims_fraction_digits() {
        assert_eq!(format_grouped(1_234.5), "1,234.5");
        assert_eq!(format_grouped(12.3456), "12.346");
        assert_eq!(format_grouped(7.0004), "7");
    }

    #[test]
    fn keeps_sign_of_non_zero_values() {
        assert_eq!(format_grouped(-1_500.0), "-1,500");
        assert_eq!(format_grouped(-0.0001), "0");
    }
}
