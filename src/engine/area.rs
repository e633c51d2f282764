/// Countries whose prefix is a single letter.
const ONE_CHARACTER_COUNTRIES: [u8; 6] = *b"IKNWRU";

/// Digit, or a placeholder standing for one in a main prefix.
fn is_area_class(c: u8) -> bool {
    c.is_ascii_digit() || c == b'#' || c == b'['
}

/// Result of rewriting a main prefix with a new call-area digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaPrefix {
    /// Search this portable prefix instead, e.g. `W4/`.
    Replaced(String),
    /// The country has no area digit; search the bare call.
    Dropped,
}

/// Puts `digit` into the call-area position of `main_prefix`.
///
/// Returns `None` when the main prefix gives no usable position.
pub fn replace_call_area(main_prefix: &str, digit: &str) -> Option<AreaPrefix> {
    let m = main_prefix.as_bytes();
    let one_char = m.first().is_some_and(|c| ONE_CHARACTER_COUNTRIES.contains(c));
    let position = match m.len() {
        0 => return None,
        1 if one_char => 2,
        1 if m[0].is_ascii_alphabetic() => return Some(AreaPrefix::Dropped),
        1 => return None,
        2 => {
            if one_char && is_area_class(m[1]) {
                2
            } else {
                3
            }
        }
        _ => {
            if one_char && is_area_class(m[1]) {
                2
            } else if is_area_class(m[2]) {
                3
            } else {
                4
            }
        }
    };
    let keep = (position - 1).min(m.len());
    let head = main_prefix.get(..keep)?;
    Some(AreaPrefix::Replaced(format!("{head}{digit}/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replaced(main_prefix: &str, digit: &str) -> Option<String> {
        match replace_call_area(main_prefix, digit)? {
            AreaPrefix::Replaced(prefix) => Some(prefix),
            AreaPrefix::Dropped => Some(String::new()),
        }
    }

    #[test]
    fn one_letter_countries_replace_second_position() {
        assert_eq!(replaced("W6", "4").as_deref(), Some("W4/"));
        assert_eq!(replaced("K", "7").as_deref(), Some("K7/"));
        assert_eq!(replaced("I", "1").as_deref(), Some("I1/"));
        assert_eq!(replaced("W#", "2").as_deref(), Some("W2/"));
    }

    #[test]
    fn two_and_three_character_prefixes() {
        assert_eq!(replaced("KL", "4").as_deref(), Some("KL4/"));
        assert_eq!(replaced("JA3", "6").as_deref(), Some("JA6/"));
        assert_eq!(replaced("VE6", "3").as_deref(), Some("VE3/"));
        assert_eq!(replaced("3DA", "1").as_deref(), Some("3DA1/"));
        assert_eq!(replaced("KH6", "7").as_deref(), Some("KH7/"));
    }

    #[test]
    fn other_single_letters_drop_the_prefix() {
        assert_eq!(replace_call_area("F", "5"), Some(AreaPrefix::Dropped));
        assert_eq!(replace_call_area("9", "5"), None);
        assert_eq!(replace_call_area("", "5"), None);
    }

    #[test]
    fn non_ascii_prefix_gives_no_position() {
        assert_eq!(replace_call_area("ÄÄ", "4"), None);
        assert_eq!(replaced("Ä1", "4").as_deref(), Some("Ä4/"));
    }
}
