//! Infix selection predicates.
//!
//! A condition is a whitespace-separated sequence of operand tokens
//! (attribute names, numeric literals, `'quoted strings'`) and the
//! operators `== != < <= > >= & |`, without parentheses. Parsing converts
//! the infix form to postfix once ([`Predicate::parse`]); evaluation walks
//! the postfix form against a schema and a tuple, pushing raw tokens and
//! Booleans on one heterogeneous stack ([`Predicate::eval`]).
//!
//! A comparison resolves whichever side names a schema attribute and
//! parses the other side in that attribute's domain, so `1985 < year` and
//! `year > 1985` mean the same thing. The empty condition is the
//! always-true predicate.
//!
//! [`Predicate::parse`]: struct.Predicate.html#method.parse
//! [`Predicate::eval`]: struct.Predicate.html#method.eval

use crate::{
    schema::{Schema, Value},
    Error, Result,
};

/// The eight condition operators, in descending precedence:
/// `==`, `!=`, `<`, `<=`, `>`, `>=`, `&`, `|`. All are left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl Op {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Op::Eq),
            "!=" => Some(Op::Ne),
            "<" => Some(Op::Lt),
            "<=" => Some(Op::Le),
            ">" => Some(Op::Gt),
            ">=" => Some(Op::Ge),
            "&" => Some(Op::And),
            "|" => Some(Op::Or),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::And => "&",
            Op::Or => "|",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Op::Eq => 8,
            Op::Ne => 7,
            Op::Lt => 6,
            Op::Le => 5,
            Op::Gt => 4,
            Op::Ge => 3,
            Op::And => 2,
            Op::Or => 1,
        }
    }

    fn is_boolean(self) -> bool {
        matches!(self, Op::And | Op::Or)
    }

    /// Whether an ordering between the compared values satisfies this
    /// comparison operator.
    fn admits(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Op::Eq => ordering == Equal,
            Op::Ne => ordering != Equal,
            Op::Lt => ordering == Less,
            Op::Le => ordering != Greater,
            Op::Gt => ordering == Greater,
            Op::Ge => ordering != Less,
            Op::And | Op::Or => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Operand(String),
    Operator(Op),
}

/// One entry of the evaluation stack: either a raw operand token or the
/// Boolean result of a completed subexpression.
#[derive(Debug)]
enum Operand {
    Token(String),
    Bool(bool),
}

/// A parsed selection condition, stored in postfix form and reusable across
/// tuples.
#[derive(Debug, Clone)]
pub struct Predicate {
    postfix: Vec<Token>,
}

impl Predicate {
    /// Tokenizes an infix condition and converts it to postfix.
    ///
    /// Tokenizing splits on spaces and strips the quotes of
    /// `'string literals'`; any token that is not an operator is an
    /// operand, so conversion itself cannot fail — malformed input
    /// surfaces later, from [`eval`](#method.eval).
    pub fn parse(condition: &str) -> Self {
        let tokens = tokenize(condition);
        Self {
            postfix: to_postfix(tokens),
        }
    }

    /// Returns the postfix form as plain token strings.
    pub fn postfix(&self) -> Vec<String> {
        self.postfix
            .iter()
            .map(|token| match token {
                Token::Operand(s) => s.clone(),
                Token::Operator(op) => op.as_str().to_owned(),
            })
            .collect()
    }

    /// Evaluates the predicate against one tuple of `schema`.
    ///
    /// The empty condition is always true. Any structural defect — an
    /// operator with missing or mistyped operands, a comparison in which
    /// neither side names an attribute, an unparsable literal, or a
    /// leftover that is not exactly one Boolean — fails with
    /// [`Error::IllFormedPredicate`].
    ///
    /// [`Error::IllFormedPredicate`]: enum.Error.html#variant.IllFormedPredicate
    pub fn eval(&self, schema: &Schema, tuple: &[Value]) -> Result<bool> {
        if self.postfix.is_empty() {
            return Ok(true);
        }
        let mut stack: Vec<Operand> = Vec::new();
        for token in &self.postfix {
            match token {
                Token::Operand(s) => stack.push(Operand::Token(s.clone())),
                Token::Operator(op) if op.is_boolean() => {
                    let rhs = pop_bool(&mut stack, *op)?;
                    let lhs = pop_bool(&mut stack, *op)?;
                    let result = match op {
                        Op::And => lhs && rhs,
                        _ => lhs || rhs,
                    };
                    stack.push(Operand::Bool(result));
                }
                Token::Operator(op) => {
                    let rhs = pop_token(&mut stack, *op)?;
                    let lhs = pop_token(&mut stack, *op)?;
                    let result = compare(schema, tuple, *op, &lhs, &rhs)?;
                    stack.push(Operand::Bool(result));
                }
            }
        }
        match (stack.pop(), stack.is_empty()) {
            (Some(Operand::Bool(result)), true) => Ok(result),
            _ => Err(Error::IllFormedPredicate(
                "the condition does not reduce to a single Boolean".to_owned(),
            )),
        }
    }
}

fn tokenize(condition: &str) -> Vec<Token> {
    condition
        .split_whitespace()
        .map(|token| match Op::parse(token) {
            Some(op) => Token::Operator(op),
            None => Token::Operand(strip_quotes(token).to_owned()),
        })
        .collect()
}

fn strip_quotes(token: &str) -> &str {
    if token.len() >= 2 && token.starts_with('\'') && token.ends_with('\'') {
        &token[1..token.len() - 1]
    } else {
        token
    }
}

/// Shunting-yard for left-associative operators without parentheses: pop
/// while the stacked operator binds at least as tightly, then push.
fn to_postfix(tokens: Vec<Token>) -> Vec<Token> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Op> = Vec::new();
    for token in tokens {
        match token {
            Token::Operand(_) => output.push(token),
            Token::Operator(op) => {
                while let Some(&top) = operators.last() {
                    if top.precedence() >= op.precedence() {
                        output.push(Token::Operator(top));
                        operators.pop();
                    } else {
                        break;
                    }
                }
                operators.push(op);
            }
        }
    }
    while let Some(op) = operators.pop() {
        output.push(Token::Operator(op));
    }
    output
}

fn pop_bool(stack: &mut Vec<Operand>, op: Op) -> Result<bool> {
    match stack.pop() {
        Some(Operand::Bool(b)) => Ok(b),
        Some(Operand::Token(s)) => Err(Error::IllFormedPredicate(format!(
            "operator `{}` expects Boolean operands, found `{}`",
            op.as_str(),
            s
        ))),
        None => Err(Error::IllFormedPredicate(format!(
            "operator `{}` lacks operands",
            op.as_str()
        ))),
    }
}

fn pop_token(stack: &mut Vec<Operand>, op: Op) -> Result<String> {
    match stack.pop() {
        Some(Operand::Token(s)) => Ok(s),
        Some(Operand::Bool(_)) => Err(Error::IllFormedPredicate(format!(
            "operator `{}` expects value operands, found a Boolean",
            op.as_str()
        ))),
        None => Err(Error::IllFormedPredicate(format!(
            "operator `{}` lacks operands",
            op.as_str()
        ))),
    }
}

/// Resolves a comparison: the side naming a schema attribute supplies the
/// domain and the tuple slot, the other side is parsed as a literal of that
/// domain.
fn compare(schema: &Schema, tuple: &[Value], op: Op, lhs: &str, rhs: &str) -> Result<bool> {
    let (position, literal, attribute_on_left) = if let Some(position) = schema.position(lhs) {
        (position, rhs, true)
    } else if let Some(position) = schema.position(rhs) {
        (position, lhs, false)
    } else {
        return Err(Error::IllFormedPredicate(format!(
            "neither `{}` nor `{}` is an attribute",
            lhs, rhs
        )));
    };
    let domain = schema.attributes()[position].domain;
    let parsed = domain.parse(literal).ok_or_else(|| {
        Error::IllFormedPredicate(format!(
            "`{}` is not a literal of domain {:?}",
            literal, domain
        ))
    })?;
    let stored = &tuple[position];
    let ordering = if attribute_on_left {
        stored.compare(&parsed)
    } else {
        parsed.compare(stored)
    }
    .ok_or_else(|| {
        Error::IllFormedPredicate(format!(
            "cannot compare {:?} with {:?}",
            stored.domain(),
            parsed.domain()
        ))
    })?;
    Ok(op.admits(ordering))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Domain;
    use assert_matches::assert_matches;

    fn movie_schema() -> Schema {
        Schema::new(
            &[("title", Domain::Str), ("year", Domain::I16)],
            &["title"],
        )
        .unwrap()
    }

    fn movie(title: &str, year: i16) -> Vec<Value> {
        vec![Value::Str(title.to_owned()), Value::I16(year)]
    }

    #[test]
    fn postfix_respects_precedence() {
        let predicate = Predicate::parse("1979 < year & year < 1990");
        assert_eq!(
            predicate.postfix(),
            ["1979", "year", "<", "year", "1990", "<", "&"]
        );
    }

    #[test]
    fn comparison_chain_binds_tighter_than_or() {
        let predicate = Predicate::parse("year == 1977 | year == 1980");
        assert_eq!(
            predicate.postfix(),
            ["year", "1977", "==", "year", "1980", "==", "|"]
        );
    }

    #[test]
    fn range_condition_over_year() {
        let schema = movie_schema();
        let predicate = Predicate::parse("1979 < year & year < 1990");
        assert!(predicate.eval(&schema, &movie("Empire", 1985)).unwrap());
        assert!(!predicate.eval(&schema, &movie("Empire", 1990)).unwrap());
        assert!(!predicate.eval(&schema, &movie("Empire", 1978)).unwrap());
    }

    #[test]
    fn quotes_are_stripped_from_string_literals() {
        let schema = movie_schema();
        let predicate = Predicate::parse("title == 'Star_Wars'");
        assert!(predicate.eval(&schema, &movie("Star_Wars", 1977)).unwrap());
        assert!(!predicate.eval(&schema, &movie("Rogue_One", 2016)).unwrap());
    }

    #[test]
    fn empty_condition_is_always_true() {
        let schema = movie_schema();
        assert!(Predicate::parse("").eval(&schema, &movie("x", 1)).unwrap());
        assert!(Predicate::parse("   ")
            .eval(&schema, &movie("x", 1))
            .unwrap());
    }

    #[test]
    fn attribute_may_sit_on_either_side() {
        let schema = movie_schema();
        let tuple = movie("Empire", 1980);
        assert!(Predicate::parse("year > 1979")
            .eval(&schema, &tuple)
            .unwrap());
        assert!(Predicate::parse("1979 < year")
            .eval(&schema, &tuple)
            .unwrap());
        assert!(Predicate::parse("1981 > year")
            .eval(&schema, &tuple)
            .unwrap());
    }

    #[test]
    fn ill_formed_conditions_are_rejected() {
        let schema = movie_schema();
        let tuple = movie("Empire", 1980);
        assert_matches!(
            Predicate::parse("budget == 3").eval(&schema, &tuple),
            Err(Error::IllFormedPredicate(_))
        );
        assert_matches!(
            Predicate::parse("year <").eval(&schema, &tuple),
            Err(Error::IllFormedPredicate(_))
        );
        assert_matches!(
            Predicate::parse("year").eval(&schema, &tuple),
            Err(Error::IllFormedPredicate(_))
        );
        assert_matches!(
            Predicate::parse("year == abc").eval(&schema, &tuple),
            Err(Error::IllFormedPredicate(_))
        );
        assert_matches!(
            Predicate::parse("year == 1980 & title").eval(&schema, &tuple),
            Err(Error::IllFormedPredicate(_))
        );
    }
}
