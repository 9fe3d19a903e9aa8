pub mod charts;
pub mod panels;
pub mod table;

/// Height of each chart in the 2×2 grid.
pub const CHART_HEIGHT: f32 = 320.0;

/// `$1,234,567` style, rounded to whole dollars.
pub fn format_usd(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(rounded.abs() as u64))
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "$0")]
    #[case(999.4, "$999")]
    #[case(1000.0, "$1,000")]
    #[case(116666.67, "$116,667")]
    #[case(1234567.0, "$1,234,567")]
    #[case(-2500.0, "-$2,500")]
    fn test_format_usd(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_usd(value), expected);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(12), "12");
        assert_eq!(group_thousands(123456), "123,456");
    }
}
