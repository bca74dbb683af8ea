//! Input masks for formatted fields such as postal codes and phone numbers
//!
//! A mask is a template where `9` marks a digit slot and every other
//! character is a literal, e.g. `99999-999` or `(99) 99999-9999`.

const DIGIT_SLOT: char = '9';

/// Formats the digits found in `input` according to `mask`.
///
/// Non-digit characters in the input are ignored, extra digits are
/// dropped, and output stops after the last supplied digit so that a
/// partially typed value carries no trailing literals.
pub fn apply_mask(input: &str, mask: &str) -> String {
    let mut digits = input.chars().filter(|c| c.is_ascii_digit()).peekable();
    let mut out = String::with_capacity(mask.len());

    for slot in mask.chars() {
        if digits.peek().is_none() {
            break;
        }
        if slot == DIGIT_SLOT {
            if let Some(d) = digits.next() {
                out.push(d);
            }
        } else {
            out.push(slot);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("01001000", "99999-999", "01001-000")]
    #[case("01001-000", "99999-999", "01001-000")]
    #[case("0100", "99999-999", "0100")]
    #[case("01001", "99999-999", "01001")]
    #[case("010010001234", "99999-999", "01001-000")]
    #[case("", "99999-999", "")]
    #[case("11912345678", "(99) 99999-9999", "(11) 91234-5678")]
    #[case("11", "(99) 99999-9999", "(11")]
    #[case("ab12", "(99) 99999-9999", "(12")]
    fn test_apply_mask(#[case] input: &str, #[case] mask: &str, #[case] expected: &str) {
        assert_eq!(apply_mask(input, mask), expected);
    }
}
