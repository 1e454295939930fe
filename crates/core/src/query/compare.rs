//! Operand parsing and comparison shared by every evaluator.

use once_cell::sync::Lazy;
use regex::Regex;

/// Comparison written between a criterion key and its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>=`
    GreaterOrEqual,
    /// `>`
    Greater,
}

impl CompareOp {
    /// Whether `value op target` holds.
    pub fn apply<T: Ord>(self, value: T, target: T) -> bool {
        match self {
            CompareOp::Equal => value == target,
            CompareOp::NotEqual => value != target,
            CompareOp::Less => value < target,
            CompareOp::LessOrEqual => value <= target,
            CompareOp::GreaterOrEqual => value >= target,
            CompareOp::Greater => value > target,
        }
    }

    /// Operator as typed on the command line.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "<>",
            CompareOp::Less => "<",
            CompareOp::LessOrEqual => "<=",
            CompareOp::GreaterOrEqual => ">=",
            CompareOp::Greater => ">",
        }
    }
}

static INTEGER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?)(?:0[xX]([0-9a-fA-F]+)|([0-9]+))$")
        .expect("failed to compile integer operand regex")
});

fn parse_number(text: &str) -> Option<i64> {
    let captures = INTEGER_RE.captures(text)?;
    let magnitude = match (captures.get(2), captures.get(3)) {
        (Some(hex), _) => i64::from_str_radix(hex.as_str(), 16).ok()?,
        (None, Some(decimal)) => decimal.as_str().parse::<i64>().ok()?,
        (None, None) => return None,
    };
    if &captures[1] == "-" {
        Some(-magnitude)
    } else {
        Some(magnitude)
    }
}

/// Parse a whole token as an integer: decimal, `0x` hex, `on`/`true` or `off`/`false`.
pub fn parse_integer(text: &str) -> Option<i64> {
    match text.to_ascii_lowercase().as_str() {
        "on" | "true" => Some(1),
        "off" | "false" => Some(0),
        _ => parse_number(text),
    }
}

/// Parse a whole token as a monetary amount in base currency units.
pub fn parse_money(text: &str) -> Option<i64> {
    parse_number(text)
}

/// Compare against an integer operand; a malformed operand never matches.
pub fn compare_integer(value: i64, op: CompareOp, operand: &str) -> bool {
    parse_integer(operand).is_some_and(|target| op.apply(value, target))
}

/// Compare against a monetary operand; a malformed operand never matches.
pub fn compare_money(value: i64, op: CompareOp, operand: &str) -> bool {
    parse_money(operand).is_some_and(|target| op.apply(value, target))
}

/// Case-insensitive lexicographic comparison.
pub fn compare_text(value: &str, op: CompareOp, operand: &str) -> bool {
    op.apply(value.to_lowercase(), operand.to_lowercase())
}

/// Equality ignoring case.
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_grammar() {
        assert_eq!(parse_integer("120"), Some(120));
        assert_eq!(parse_integer("-7"), Some(-7));
        assert_eq!(parse_integer("+7"), Some(7));
        assert_eq!(parse_integer("0x1F"), Some(31));
        assert_eq!(parse_integer("010"), Some(10));
        assert_eq!(parse_integer("On"), Some(1));
        assert_eq!(parse_integer("false"), Some(0));
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer("12abc"), None);
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer(" 5"), None);
    }

    #[test]
    fn money_does_not_accept_switch_words() {
        assert_eq!(parse_money("25000"), Some(25_000));
        assert_eq!(parse_money("-300"), Some(-300));
        assert_eq!(parse_money("on"), None);
    }

    #[test]
    fn malformed_operand_fails_closed() {
        for op in [
            CompareOp::Equal,
            CompareOp::NotEqual,
            CompareOp::Less,
            CompareOp::GreaterOrEqual,
        ] {
            assert!(!compare_integer(500, op, "abc"));
            assert!(!compare_money(500, op, "5k"));
        }
    }

    #[test]
    fn operators_compare_value_against_target() {
        assert!(compare_integer(120, CompareOp::GreaterOrEqual, "120"));
        assert!(!compare_integer(119, CompareOp::GreaterOrEqual, "120"));
        assert!(compare_integer(3, CompareOp::Less, "5"));
        assert!(compare_integer(3, CompareOp::NotEqual, "5"));
        assert!(compare_money(-10, CompareOp::Less, "0"));
    }

    #[test]
    fn text_comparison_ignores_case() {
        assert!(compare_text("Coal Trains", CompareOp::Equal, "coal trains"));
        assert!(compare_text("Alpha", CompareOp::Less, "beta"));
        assert!(!compare_text("Alpha", CompareOp::Greater, "BETA"));
        assert!(eq_ignore_case("Ängelholm", "ÄNGELHOLM"));
    }
}
