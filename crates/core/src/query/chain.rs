//! Conjunction of criteria joined by `and` or `&`.

use super::{
    error::QueryError,
    expr::{parse_criterion, Predicate},
    requirement::Requirement,
};

/// Criteria combined by logical AND, in the order they were typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain<'a> {
    predicates: Vec<Predicate<'a>>,
}

impl<'a> Chain<'a> {
    /// Criteria in typed order.
    pub fn predicates(&self) -> &[Predicate<'a>] {
        &self.predicates
    }

    /// Criteria, for rewriting before evaluation.
    pub fn predicates_mut(&mut self) -> &mut [Predicate<'a>] {
        &mut self.predicates
    }

    /// Append a criterion.
    pub fn push(&mut self, predicate: Predicate<'a>) {
        self.predicates.push(predicate);
    }

    /// Number of criteria.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// True when no criterion was given.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// True when `eval` holds for every predicate.
    pub fn matches(&self, mut eval: impl FnMut(&Predicate<'a>) -> bool) -> bool {
        self.predicates.iter().all(|predicate| eval(predicate))
    }
}

fn is_conjunction(token: &str) -> bool {
    token == "&" || token.eq_ignore_ascii_case("and")
}

/// Consume criteria separated by `and`/`&` from the front of `args`.
///
/// Returns the chain and the tokens after it, starting at the command name.
pub fn build_chain<'s, 'a>(
    args: &'s [&'a str],
    mask: Requirement,
) -> Result<(Chain<'a>, &'s [&'a str]), QueryError> {
    let mut chain = Chain::default();
    let mut rest = args;

    while let Some((&token, tail)) = rest.split_first() {
        chain.push(parse_criterion(token, mask)?);
        rest = tail;
        match rest.split_first() {
            Some((&next, tail)) if is_conjunction(next) => rest = tail,
            _ => break,
        }
    }

    if chain.is_empty() {
        return Err(QueryError::NotEnoughArguments);
    }
    Ok((chain, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::descriptor::MatchField;

    fn fields(chain: &Chain<'_>) -> Vec<MatchField> {
        chain.predicates().iter().map(|p| p.field).collect()
    }

    #[test]
    fn single_criterion_stops_at_command() {
        let args = ["speed>=120", "info"];
        let (chain, rest) = build_chain(&args, Requirement::TRAIN).unwrap();
        assert_eq!(fields(&chain), vec![MatchField::Speed]);
        assert_eq!(rest, &["info"]);
    }

    #[test]
    fn conjunction_words_join_criteria() {
        let args = ["all", "AND", "speed>5", "&", "age<3", "skip", "2"];
        let (chain, rest) = build_chain(&args, Requirement::VEHICLE).unwrap();
        assert_eq!(
            fields(&chain),
            vec![MatchField::All, MatchField::Speed, MatchField::Age]
        );
        assert_eq!(rest, &["skip", "2"]);
    }

    #[test]
    fn trailing_conjunction_leaves_no_command() {
        let args = ["all", "and"];
        let (chain, rest) = build_chain(&args, Requirement::TOWN).unwrap();
        assert_eq!(chain.len(), 1);
        assert!(rest.is_empty());
    }

    #[test]
    fn one_bad_criterion_drops_the_chain() {
        let args = ["all", "and", "age>1", "count"];
        assert_eq!(
            build_chain(&args, Requirement::INDUSTRY),
            Err(QueryError::InapplicableMatch("age".to_string()))
        );
    }

    #[test]
    fn empty_input_is_not_a_chain() {
        assert_eq!(
            build_chain(&[], Requirement::TOWN),
            Err(QueryError::NotEnoughArguments)
        );
    }
}
