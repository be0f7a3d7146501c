pub mod api_utils;
pub mod components;
pub mod icons;
pub mod modal;
pub mod paged_list;

/// Parse a numeric form field, treating blank or invalid input as zero
pub fn parse_number<T: std::str::FromStr + Default>(value: &str) -> T {
    value.trim().replace(',', ".").parse().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::parse_number;

    #[test]
    fn test_parse_number_accepts_decimal_comma() {
        assert_eq!(parse_number::<f64>("12,5"), 12.5);
        assert_eq!(parse_number::<f64>(" 4500 "), 4500.0);
        assert_eq!(parse_number::<i32>(""), 0);
        assert_eq!(parse_number::<i32>("abc"), 0);
    }
}
