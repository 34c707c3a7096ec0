//! Field Formatting
//!
//! Display formatting for the plain card-number and expiry inputs. The real
//! sensitive fields live inside the vault iframes and never pass through here.

/// Group a card number into runs of four separated by single spaces.
///
/// Whitespace is stripped first, so reapplying to formatted output is a no-op.
pub fn format_card_number(raw: &str) -> String {
    let compact: Vec<char> = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let mut out = String::with_capacity(compact.len() + compact.len() / 4);
    let mut run = 0;
    for c in compact {
        if run == 4 {
            out.push(' ');
            run = 0;
        }
        out.push(c);
        run = if c.is_ascii_digit() { run + 1 } else { 0 };
    }
    out
}

/// Keep digits only and put a `/` after the first two.
pub fn format_expiry_date(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_number_grouping() {
        assert_eq!(format_card_number("4242424242424242"), "4242 4242 4242 4242");
        assert_eq!(format_card_number("55555"), "5555 5");
        assert_eq!(format_card_number("1234"), "1234");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_card_number_strips_whitespace() {
        assert_eq!(format_card_number(" 42 4242\t42 "), "4242 4242");
    }

    #[test]
    fn test_card_number_digits_survive_for_all_lengths() {
        let source = "4000056655665556123";
        for len in 0..=source.len() {
            let digits = &source[..len];
            let formatted = format_card_number(digits);

            assert_eq!(formatted.replace(' ', ""), digits);
            for group in formatted.split(' ').filter(|g| !g.is_empty()) {
                assert!(group.len() <= 4);
            }
            let groups: Vec<&str> = formatted.split(' ').collect();
            for group in &groups[..groups.len().saturating_sub(1)] {
                assert_eq!(group.len(), 4, "inner group in {formatted:?}");
            }
            assert!(!formatted.contains("  "));
            assert_eq!(format_card_number(&formatted), formatted);
        }
    }

    #[test]
    fn test_expiry_inserts_separator() {
        assert_eq!(format_expiry_date("1234"), "12/34");
        assert_eq!(format_expiry_date("12/34"), "12/34");
        assert_eq!(format_expiry_date("123"), "12/3");
    }

    #[test]
    fn test_expiry_short_input_unchanged() {
        assert_eq!(format_expiry_date(""), "");
        assert_eq!(format_expiry_date("1"), "1");
        assert_eq!(format_expiry_date("12"), "12");
        assert_eq!(format_expiry_date("1a"), "1");
    }

    #[test]
    fn test_expiry_idempotent() {
        for raw in ["", "0", "09", "092", "0927", "09/27", "ab0927cd", "123456"] {
            let once = format_expiry_date(raw);
            assert_eq!(format_expiry_date(&once), once);
        }
    }
}
