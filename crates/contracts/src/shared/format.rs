/// Money with two decimals and thousands separated by commas
pub fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let negative = value < 0.0 && cents > 0;
    let int_part = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!(
        "{}${}.{:02}",
        if negative { "-" } else { "" },
        grouped,
        cents % 100
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_groups_thousands() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(4500.0), "$4,500.00");
        assert_eq!(format_money(1234567.891), "$1,234,567.89");
        assert_eq!(format_money(-50.5), "-$50.50");
        assert_eq!(format_money(-0.001), "$0.00");
    }
}
