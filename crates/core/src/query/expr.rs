//! Single criterion tokens such as `speed>=120` or `stopped`.

use std::borrow::Cow;

use super::{
    compare::{eq_ignore_case, CompareOp},
    descriptor::{MatchField, BOOLEAN_MATCHES, NUMERIC_MATCHES},
    error::QueryError,
    requirement::Requirement,
    resolve::resolve,
};

const OPERATOR_CHARS: &[char] = &['<', '>', '='];

/// One filter test of a conjunction chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate<'a> {
    /// Field the criterion tests.
    pub field: MatchField,
    /// `None` for flags and bare identifiers.
    pub op: Option<CompareOp>,
    /// Borrowed from the invocation's tokens unless rewritten.
    pub operand: Cow<'a, str>,
}

impl<'a> Predicate<'a> {
    /// Criterion on `field`, compared with `op` against `operand` when present.
    pub fn new(field: MatchField, op: Option<CompareOp>, operand: impl Into<Cow<'a, str>>) -> Self {
        Self {
            field,
            op,
            operand: operand.into(),
        }
    }
}

/// Split `key<op>operand`. Without an operator the whole token is the operand.
fn split_operator(token: &str) -> (&str, Option<CompareOp>, &str) {
    let Some(at) = token.find(OPERATOR_CHARS) else {
        return (token, None, token);
    };
    let (key, rest) = token.split_at(at);
    let (op, len) = if rest.starts_with("<=") {
        (CompareOp::LessOrEqual, 2)
    } else if rest.starts_with("<>") {
        (CompareOp::NotEqual, 2)
    } else if rest.starts_with(">=") {
        (CompareOp::GreaterOrEqual, 2)
    } else if rest.starts_with('<') {
        (CompareOp::Less, 1)
    } else if rest.starts_with('>') {
        (CompareOp::Greater, 1)
    } else {
        (CompareOp::Equal, 1)
    };
    (key, Some(op), &rest[len..])
}

/// Parse one criterion token for a target with applicability `mask`.
///
/// A key that does not resolve against the numeric matches leaves the
/// criterion generic with the text after the operator as operand.
pub fn parse_criterion(token: &str, mask: Requirement) -> Result<Predicate<'_>, QueryError> {
    let (key, op, operand) = split_operator(token);
    let mut field = MatchField::Generic;

    if op.is_some() {
        if operand.is_empty() {
            return Err(QueryError::MissingOperand(token.to_string()));
        }
        if let Some(resolved) = resolve(key, NUMERIC_MATCHES) {
            if !resolved.descriptor.req.intersects(mask) {
                return Err(QueryError::InapplicableMatch(key.to_string()));
            }
            field = resolved.id;
        }
    }

    let flag = BOOLEAN_MATCHES.iter().find_map(|entry| {
        entry
            .id
            .filter(|_| entry.req.intersects(mask) && eq_ignore_case(entry.name, token))
    });
    if let Some(flag) = flag {
        field = flag;
    }

    Ok(Predicate::new(field, op, operand))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(token: &str, mask: Requirement) -> Predicate<'_> {
        parse_criterion(token, mask).unwrap()
    }

    #[test]
    fn splits_key_operator_and_operand() {
        let speed = parse("speed>=120", Requirement::TRAIN);
        assert_eq!(speed.field, MatchField::Speed);
        assert_eq!(speed.op, Some(CompareOp::GreaterOrEqual));
        assert_eq!(speed.operand, "120");

        let age = parse("age=5", Requirement::VEHICLE);
        assert_eq!(age.field, MatchField::Age);
        assert_eq!(age.op, Some(CompareOp::Equal));
        assert_eq!(age.operand, "5");

        assert_eq!(parse("orders<>3", Requirement::SHIP).op, Some(CompareOp::NotEqual));
        assert_eq!(parse("orders<3", Requirement::SHIP).op, Some(CompareOp::Less));
        assert_eq!(parse("orders<=3", Requirement::SHIP).op, Some(CompareOp::LessOrEqual));
        assert_eq!(parse("orders>3", Requirement::SHIP).op, Some(CompareOp::Greater));
    }

    #[test]
    fn key_may_be_a_unique_prefix() {
        assert_eq!(parse("pop>100", Requirement::TOWN).field, MatchField::Population);
        assert_eq!(parse("POPULATION>100", Requirement::TOWN).field, MatchField::Population);
    }

    #[test]
    fn flags_match_whole_token() {
        let all = parse("all", Requirement::TOWN);
        assert_eq!(all.field, MatchField::All);
        assert_eq!(all.op, None);
        assert_eq!(parse("*", Requirement::INDUSTRY).field, MatchField::All);
        assert_eq!(parse("Crashed", Requirement::ROAD).field, MatchField::Crashed);
        assert_eq!(parse("depot", Requirement::TRAIN).field, MatchField::InDepot);
        assert_eq!(parse("no_statue", Requirement::TOWN).field, MatchField::NoStatue);
    }

    #[test]
    fn flags_only_apply_to_their_targets() {
        let depot = parse("depot", Requirement::TOWN);
        assert_eq!(depot.field, MatchField::Generic);
        assert_eq!(depot.operand, "depot");
        assert_eq!(parse("statue", Requirement::TRAIN).field, MatchField::Generic);
    }

    #[test]
    fn bare_identifier_is_generic() {
        let id = parse("42", Requirement::VEHICLE);
        assert_eq!(id.field, MatchField::Generic);
        assert_eq!(id.op, None);
        assert_eq!(id.operand, "42");
    }

    #[test]
    fn unresolved_key_falls_back_to_generic() {
        let unknown = parse("unit=42", Requirement::VEHICLE);
        assert_eq!(unknown.field, MatchField::Generic);
        assert_eq!(unknown.op, Some(CompareOp::Equal));
        assert_eq!(unknown.operand, "42");

        // `profit` prefixes three keys.
        assert_eq!(parse("prof>0", Requirement::TRAIN).field, MatchField::Generic);
    }

    #[test]
    fn inapplicable_key_is_rejected() {
        assert_eq!(
            parse_criterion("age>5", Requirement::TOWN),
            Err(QueryError::InapplicableMatch("age".to_string()))
        );
        assert_eq!(
            parse_criterion("wagons>5", Requirement::ROAD),
            Err(QueryError::InapplicableMatch("wagons".to_string()))
        );
        assert!(parse_criterion("wagons>5", Requirement::VEHICLE).is_ok());
    }

    #[test]
    fn operator_without_operand_is_rejected() {
        assert_eq!(
            parse_criterion("speed>", Requirement::TRAIN),
            Err(QueryError::MissingOperand("speed>".to_string()))
        );
    }
}
