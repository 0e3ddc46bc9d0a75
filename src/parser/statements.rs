//! nom combinators for the textual statement format
//!
//! ```text
//! % blocks world
//! fact: (isa cube block)
//! rule: ((parent ?x ?y) (parent ?y ?z)) -> (grandparent ?x ?z)
//! ```
//!
//! Variables carry a `?` prefix; arguments may be nested statements. The
//! grammar is parsed into a name-based raw form first and interned into
//! terms in a second pass.

use super::ParseError;
use crate::kb::{Fact, Knowledge, Rule};
use crate::logic::{Constant, Interner, PredicateSymbol, Term, Variable};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    combinator::map,
    multi::{many0, many1},
    sequence::{delimited, preceded},
    IResult,
};

/// A term before symbol interning
#[derive(Debug, Clone, PartialEq, Eq)]
enum RawTerm {
    Variable(String),
    Constant(String),
    Statement(String, Vec<RawTerm>),
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-')(input)
}

fn variable(input: &str) -> IResult<&str, RawTerm> {
    map(preceded(char('?'), identifier), |name: &str| {
        RawTerm::Variable(name.to_string())
    })(input)
}

fn constant(input: &str) -> IResult<&str, RawTerm> {
    map(identifier, |name: &str| RawTerm::Constant(name.to_string()))(input)
}

fn statement(input: &str) -> IResult<&str, RawTerm> {
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, predicate) = identifier(input)?;
    let (input, args) = many0(preceded(multispace0, term))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;
    // Arity is stored as u8; longer argument lists would wrap around
    if args.len() > u8::MAX as usize {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::TooLarge,
        )));
    }
    Ok((input, RawTerm::Statement(predicate.to_string(), args)))
}

fn term(input: &str) -> IResult<&str, RawTerm> {
    alt((variable, statement, constant))(input)
}

fn fact_line(input: &str) -> IResult<&str, RawTerm> {
    preceded(
        delimited(multispace0, tag("fact:"), multispace0),
        statement,
    )(input)
}

fn rule_line(input: &str) -> IResult<&str, (Vec<RawTerm>, RawTerm)> {
    let (input, _) = delimited(multispace0, tag("rule:"), multispace0)(input)?;
    let (input, _) = char('(')(input)?;
    let (input, lhs) = many1(preceded(multispace0, statement))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;
    let (input, _) = delimited(multispace0, tag("->"), multispace0)(input)?;
    let (input, rhs) = statement(input)?;
    Ok((input, (lhs, rhs)))
}

/// Intern a raw term into a `Term`
fn intern_term(raw: &RawTerm, interner: &mut Interner) -> Term {
    match raw {
        RawTerm::Variable(name) => {
            Term::Variable(Variable::new(interner.intern_variable(name)))
        }
        RawTerm::Constant(name) => {
            Term::Constant(Constant::new(interner.intern_constant(name)))
        }
        RawTerm::Statement(predicate, args) => {
            let id = interner.intern_predicate(predicate);
            let args: Vec<Term> = args.iter().map(|a| intern_term(a, interner)).collect();
            Term::Predicate(PredicateSymbol::new(id, args.len() as u8), args)
        }
    }
}

fn complete<T>(line_no: usize, parsed: IResult<&str, T>) -> Result<T, ParseError> {
    match parsed {
        Ok((rest, value)) => {
            if rest.trim().is_empty() {
                Ok(value)
            } else {
                Err(ParseError::new(
                    line_no,
                    format!("trailing input: {:?}", rest.trim()),
                ))
            }
        }
        Err(e) => Err(ParseError::new(line_no, e.to_string())),
    }
}

/// Parse a single `fact:` line
pub fn parse_fact(input: &str, interner: &mut Interner) -> Result<Fact, ParseError> {
    let raw = complete(1, fact_line(input))?;
    Ok(Fact::new(intern_term(&raw, interner)))
}

/// Parse a single `rule:` line
pub fn parse_rule(input: &str, interner: &mut Interner) -> Result<Rule, ParseError> {
    let (lhs, rhs) = complete(1, rule_line(input))?;
    let lhs: Vec<Term> = lhs.iter().map(|t| intern_term(t, interner)).collect();
    Ok(Rule::new(lhs, intern_term(&rhs, interner)))
}

/// Parse a whole program: one fact or rule per line
///
/// Blank lines and `%` comments are skipped. Statement order is preserved,
/// since assertion order is observable through handles and events even
/// though the derived closure is order-independent.
pub fn parse_program(input: &str, interner: &mut Interner) -> Result<Vec<Knowledge>, ParseError> {
    let mut items = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        if trimmed.starts_with("fact:") {
            let raw = complete(line_no, fact_line(trimmed))?;
            items.push(Knowledge::Fact(Fact::new(intern_term(&raw, interner))));
        } else if trimmed.starts_with("rule:") {
            let (lhs, rhs) = complete(line_no, rule_line(trimmed))?;
            let lhs: Vec<Term> = lhs.iter().map(|t| intern_term(t, interner)).collect();
            items.push(Knowledge::Rule(Rule::new(lhs, intern_term(&rhs, interner))));
        } else {
            return Err(ParseError::new(
                line_no,
                format!("expected `fact:` or `rule:`, got {:?}", trimmed),
            ));
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fact() {
        let mut interner = Interner::new();
        let fact = parse_fact("fact: (isa cube block)", &mut interner).unwrap();

        assert!(fact.asserted);
        assert!(fact.supported_by.is_empty());
        assert_eq!(
            fact.statement.display(&interner).to_string(),
            "(isa cube block)"
        );
        assert!(fact.statement.is_ground());
    }

    #[test]
    fn test_parse_fact_with_nested_statement() {
        let mut interner = Interner::new();
        let fact = parse_fact("fact: (on (stack a b) table)", &mut interner).unwrap();
        assert_eq!(
            fact.statement.display(&interner).to_string(),
            "(on (stack a b) table)"
        );
    }

    #[test]
    fn test_parse_rule() {
        let mut interner = Interner::new();
        let rule = parse_rule(
            "rule: ((parent ?x ?y) (parent ?y ?z)) -> (grandparent ?x ?z)",
            &mut interner,
        )
        .unwrap();

        assert_eq!(rule.lhs.len(), 2);
        assert!(rule.asserted);
        assert_eq!(
            rule.display(&interner).to_string(),
            "rule: ((parent ?x ?y) (parent ?y ?z)) -> (grandparent ?x ?z)"
        );
    }

    #[test]
    fn test_same_variable_interns_once() {
        let mut interner = Interner::new();
        parse_rule("rule: ((p ?x)) -> (q ?x)", &mut interner).unwrap();
        assert_eq!(interner.variable_count(), 1);
    }

    #[test]
    fn test_parse_program_skips_comments_and_blanks() {
        let mut interner = Interner::new();
        let program = "\
% a tiny knowledge base

fact: (hero arthur)
rule: ((hero ?x)) -> (person ?x)
";
        let items = parse_program(program, &mut interner).unwrap();
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Knowledge::Fact(_)));
        assert!(matches!(items[1], Knowledge::Rule(_)));
    }

    #[test]
    fn test_parse_error_carries_line() {
        let mut interner = Interner::new();
        let program = "fact: (p a)\nnonsense line\n";
        let err = parse_program(program, &mut interner).unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_trailing_input_rejected() {
        let mut interner = Interner::new();
        assert!(parse_fact("fact: (p a) extra", &mut interner).is_err());
    }

    #[test]
    fn test_argument_list_exceeding_arity_range_rejected() {
        let mut interner = Interner::new();

        let ok = format!("fact: (p {})", vec!["a"; 255].join(" "));
        assert!(parse_fact(&ok, &mut interner).is_ok());

        let too_long = format!("fact: (p {})", vec!["a"; 256].join(" "));
        assert!(parse_fact(&too_long, &mut interner).is_err());
    }
}
