//! Filter expressions over quads and bindings.
//!
//! An [Expression] is a tree of operators over terms. Operators are named by strings, so an
//! expression can name operators that no evaluator implements. [Expression::compile] rejects
//! those up front and produces a [Filter] that can be evaluated against [Bindings].

use crate::{Bindings, QueryError, TypedValue};
use rdf_interop_model::{Literal, Term, Variable};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A light-weight result for expression evaluation.
pub type ThinResult<T> = Result<T, ThinError>;

/// An *expected* failure during expression evaluation, for example comparing an IRI with a
/// number.
///
/// All of these failures are treated the same by the evaluation, so no reason is stored.
#[derive(Clone, Copy, Debug, Default, thiserror::Error, PartialEq, Eq)]
#[error("An expected error occurred.")]
pub struct ThinError;

impl ThinError {
    /// Creates a result with a [ThinError].
    pub fn expected<T>() -> ThinResult<T> {
        Err(ThinError)
    }
}

/// The operators that a [Filter] can evaluate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    SameTerm,
    And,
    Or,
    Not,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    IsIri,
    IsUri,
    IsBlank,
    IsLiteral,
    Bound,
    Str,
    Lang,
    Datatype,
}

impl Operator {
    pub const ALL: [Operator; 18] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::SameTerm,
        Operator::And,
        Operator::Or,
        Operator::Not,
        Operator::LessThan,
        Operator::LessOrEqual,
        Operator::GreaterThan,
        Operator::GreaterOrEqual,
        Operator::IsIri,
        Operator::IsUri,
        Operator::IsBlank,
        Operator::IsLiteral,
        Operator::Bound,
        Operator::Str,
        Operator::Lang,
        Operator::Datatype,
    ];

    /// The name of the operator in an [Expression].
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::SameTerm => "sameterm",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Not => "!",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::IsIri => "isiri",
            Operator::IsUri => "isuri",
            Operator::IsBlank => "isblank",
            Operator::IsLiteral => "isliteral",
            Operator::Bound => "bound",
            Operator::Str => "str",
            Operator::Lang => "lang",
            Operator::Datatype => "datatype",
        }
    }

    /// The number of arguments the operator takes.
    pub fn arity(self) -> usize {
        match self {
            Operator::Not
            | Operator::IsIri
            | Operator::IsUri
            | Operator::IsBlank
            | Operator::IsLiteral
            | Operator::Bound
            | Operator::Str
            | Operator::Lang
            | Operator::Datatype => 1,
            _ => 2,
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    /// Parses an operator name. Names are case-insensitive.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let lowercase = name.to_ascii_lowercase();
        Operator::ALL
            .into_iter()
            .find(|operator| operator.as_str() == lowercase)
            .ok_or_else(|| QueryError::UnsupportedOperator(name.to_owned()))
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpressionType {
    Operator,
    Term,
}

impl ExpressionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpressionType::Operator => "operator",
            ExpressionType::Term => "term",
        }
    }
}

/// An expression over the terms of a quad or a solution.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expression {
    /// Applies `operator` to the values of `args`.
    Operator {
        operator: String,
        args: Vec<Expression>,
    },
    /// A constant term, or a variable that stands for the term bound to it.
    Term(Term),
}

impl Expression {
    pub fn expression_type(&self) -> ExpressionType {
        match self {
            Expression::Operator { .. } => ExpressionType::Operator,
            Expression::Term(_) => ExpressionType::Term,
        }
    }

    /// Returns the distinct variables in the expression.
    pub fn variables(&self) -> Vec<&Variable> {
        let mut result = Vec::new();
        let mut pending = vec![self];
        while let Some(expression) = pending.pop() {
            match expression {
                Expression::Operator { args, .. } => pending.extend(args.iter().rev()),
                Expression::Term(Term::Variable(variable)) => {
                    if !result.contains(&variable) {
                        result.push(variable);
                    }
                }
                Expression::Term(_) => {}
            }
        }
        result
    }

    /// Validates the expression and prepares it for evaluation.
    ///
    /// Fails with [QueryError::UnsupportedOperator] for unknown operators and with
    /// [QueryError::InvalidQuery] for wrong numbers of arguments.
    ///
    /// ```
    /// use rdf_interop_model::*;
    /// use rdf_interop_query::{Bindings, DefaultExpressionFactory, ExpressionFactory};
    ///
    /// let factory = DefaultExpressionFactory;
    /// let x = Variable::new("x")?;
    /// let expression = factory.operator_expression(
    ///     ">",
    ///     vec![
    ///         factory.term_expression(x.clone().into()),
    ///         factory.term_expression(Literal::from(10_i64).into()),
    ///     ],
    /// );
    /// let filter = expression.compile()?;
    /// assert!(filter.test(&Bindings::new().set(x.clone(), Literal::from(42_i64).into())));
    /// assert!(!filter.test(&Bindings::new().set(x, Literal::from(7_i64).into())));
    ///
    /// let unknown = factory.operator_expression("regex", Vec::new());
    /// assert!(unknown.compile().is_err());
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn compile(&self) -> Result<Filter, QueryError> {
        Ok(Filter {
            root: Node::compile(self)?,
        })
    }
}

/// Creates [Expression]s.
pub trait ExpressionFactory {
    fn operator_expression(&self, operator: &str, args: Vec<Expression>) -> Expression {
        Expression::Operator {
            operator: operator.to_owned(),
            args,
        }
    }

    fn term_expression(&self, term: Term) -> Expression {
        Expression::Term(term)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultExpressionFactory;

impl ExpressionFactory for DefaultExpressionFactory {}

/// A validated [Expression] that can be evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    root: Node,
}

impl Filter {
    /// Evaluates the expression with the variables bound by `bindings`.
    ///
    /// Fails for unbound variables and for arguments outside the domain of an operator.
    pub fn evaluate(&self, bindings: &Bindings) -> ThinResult<Term> {
        self.root.evaluate(bindings)
    }

    /// Returns whether the effective boolean value of the expression is true. Evaluation errors
    /// count as false.
    pub fn test(&self, bindings: &Bindings) -> bool {
        self.evaluate(bindings)
            .and_then(|term| effective_boolean_value(&term))
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Node {
    Operator(Operator, Vec<Node>),
    Term(Term),
}

impl Node {
    fn compile(expression: &Expression) -> Result<Self, QueryError> {
        let (operator, args) = match expression {
            Expression::Term(term) => return Ok(Node::Term(term.clone())),
            Expression::Operator { operator, args } => (operator.parse::<Operator>()?, args),
        };
        if args.len() != operator.arity() {
            return Err(QueryError::invalid(format!(
                "The operator '{operator}' takes {} argument(s) but got {}",
                operator.arity(),
                args.len()
            )));
        }
        if operator == Operator::Bound
            && !matches!(args.as_slice(), [Expression::Term(Term::Variable(_))])
        {
            return Err(QueryError::invalid(
                "The operator 'bound' takes a variable as argument",
            ));
        }
        let args = args
            .iter()
            .map(Node::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::Operator(operator, args))
    }

    fn evaluate(&self, bindings: &Bindings) -> ThinResult<Term> {
        let (operator, args) = match self {
            Node::Term(Term::Variable(variable)) => {
                return bindings.get(variable).cloned().ok_or(ThinError)
            }
            Node::Term(term) => return Ok(term.clone()),
            Node::Operator(operator, args) => (*operator, args.as_slice()),
        };

        // Operators that do not evaluate all of their arguments.
        match (operator, args) {
            (Operator::Bound, [Node::Term(Term::Variable(variable))]) => {
                return Ok(boolean(bindings.has(variable)));
            }
            (Operator::And, [left, right]) => {
                let left = left.evaluate_boolean(bindings);
                let right = right.evaluate_boolean(bindings);
                return match (left, right) {
                    (Ok(false), _) | (_, Ok(false)) => Ok(boolean(false)),
                    (Ok(true), Ok(true)) => Ok(boolean(true)),
                    _ => ThinError::expected(),
                };
            }
            (Operator::Or, [left, right]) => {
                let left = left.evaluate_boolean(bindings);
                let right = right.evaluate_boolean(bindings);
                return match (left, right) {
                    (Ok(true), _) | (_, Ok(true)) => Ok(boolean(true)),
                    (Ok(false), Ok(false)) => Ok(boolean(false)),
                    _ => ThinError::expected(),
                };
            }
            _ => {}
        }

        let values = args
            .iter()
            .map(|arg| arg.evaluate(bindings))
            .collect::<ThinResult<Vec<_>>>()?;
        match (operator, values.as_slice()) {
            (Operator::Not, [value]) => Ok(boolean(!effective_boolean_value(value)?)),
            (Operator::Equal, [left, right]) => Ok(boolean(equal(left, right)?)),
            (Operator::NotEqual, [left, right]) => Ok(boolean(!equal(left, right)?)),
            (Operator::SameTerm, [left, right]) => Ok(boolean(left == right)),
            (Operator::LessThan, [left, right]) => {
                Ok(boolean(compare(left, right)? == Ordering::Less))
            }
            (Operator::LessOrEqual, [left, right]) => {
                Ok(boolean(compare(left, right)? != Ordering::Greater))
            }
            (Operator::GreaterThan, [left, right]) => {
                Ok(boolean(compare(left, right)? == Ordering::Greater))
            }
            (Operator::GreaterOrEqual, [left, right]) => {
                Ok(boolean(compare(left, right)? != Ordering::Less))
            }
            (Operator::IsIri | Operator::IsUri, [value]) => {
                Ok(boolean(matches!(value, Term::NamedNode(_))))
            }
            (Operator::IsBlank, [value]) => Ok(boolean(matches!(value, Term::BlankNode(_)))),
            (Operator::IsLiteral, [value]) => Ok(boolean(matches!(value, Term::Literal(_)))),
            (Operator::Str, [Term::NamedNode(node)]) => {
                Ok(Literal::new_simple_literal(node.as_str()).into())
            }
            (Operator::Str, [Term::Literal(literal)]) => {
                Ok(Literal::new_simple_literal(literal.value()).into())
            }
            (Operator::Lang, [Term::Literal(literal)]) => {
                Ok(Literal::new_simple_literal(literal.language()).into())
            }
            (Operator::Datatype, [Term::Literal(literal)]) => {
                Ok(literal.datatype().clone().into())
            }
            _ => ThinError::expected(),
        }
    }

    fn evaluate_boolean(&self, bindings: &Bindings) -> ThinResult<bool> {
        effective_boolean_value(&self.evaluate(bindings)?)
    }
}

fn boolean(value: bool) -> Term {
    Literal::from(value).into()
}

/// Computes the [effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv) of `term`.
///
/// Booleans and numbers with an invalid lexical form are false.
fn effective_boolean_value(term: &Term) -> ThinResult<bool> {
    let Term::Literal(literal) = term else {
        return ThinError::expected();
    };
    match TypedValue::try_from(literal) {
        Ok(TypedValue::BooleanLiteral(value)) => Ok(value),
        Ok(TypedValue::NumericLiteral(value)) => Ok(!value.is_zero() && !value.is_nan()),
        Ok(
            TypedValue::SimpleLiteral(value) | TypedValue::LanguageStringLiteral { value, .. },
        ) => Ok(!value.is_empty()),
        Ok(TypedValue::OtherLiteral(_)) => ThinError::expected(),
        Err(_) => Ok(false),
    }
}

/// Compares two terms with `=` semantics: literals of known datatypes by value, everything
/// else by identity.
fn equal(left: &Term, right: &Term) -> ThinResult<bool> {
    let (Term::Literal(left_literal), Term::Literal(right_literal)) = (left, right) else {
        return Ok(left == right);
    };
    let (Ok(left_value), Ok(right_value)) = (
        TypedValue::try_from(left_literal),
        TypedValue::try_from(right_literal),
    ) else {
        return identical_literals(left_literal, right_literal);
    };
    match (left_value, right_value) {
        (TypedValue::OtherLiteral(_), _) | (_, TypedValue::OtherLiteral(_)) => {
            identical_literals(left_literal, right_literal)
        }
        (
            TypedValue::LanguageStringLiteral { .. },
            TypedValue::LanguageStringLiteral { .. },
        ) => Ok(left_value == right_value),
        _ => Ok(left_value.compare(&right_value) == Some(Ordering::Equal)),
    }
}

/// Literals whose value is unknown are only known to be equal to themselves.
fn identical_literals(left: &Literal, right: &Literal) -> ThinResult<bool> {
    if left == right {
        Ok(true)
    } else {
        ThinError::expected()
    }
}

/// Orders two literals that share a comparable value space: numbers, strings, or booleans.
fn compare(left: &Term, right: &Term) -> ThinResult<Ordering> {
    let (Term::Literal(left), Term::Literal(right)) = (left, right) else {
        return ThinError::expected();
    };
    TypedValue::try_from(left)?
        .compare(&TypedValue::try_from(right)?)
        .ok_or(ThinError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_interop_model::vocab::xsd;
    use rdf_interop_model::{BlankNode, NamedNode};

    fn typed(value: &str, datatype: &str) -> Expression {
        term(Literal::new_typed_literal(
            value,
            NamedNode::new_unchecked(datatype),
        ))
    }

    fn var(name: &str) -> Expression {
        Expression::Term(Variable::new_unchecked(name).into())
    }

    fn term(term: impl Into<Term>) -> Expression {
        Expression::Term(term.into())
    }

    fn op(operator: &str, args: Vec<Expression>) -> Expression {
        DefaultExpressionFactory.operator_expression(operator, args)
    }

    fn evaluate(expression: &Expression, bindings: &Bindings) -> ThinResult<Term> {
        expression
            .compile()
            .map_err(|_| ThinError)?
            .evaluate(bindings)
    }

    #[test]
    fn operator_names_round_trip() -> Result<(), QueryError> {
        for operator in Operator::ALL {
            assert_eq!(operator.as_str().parse::<Operator>()?, operator);
        }
        assert_eq!("isIRI".parse::<Operator>()?, Operator::IsIri);
        assert!(matches!(
            "regex".parse::<Operator>(),
            Err(QueryError::UnsupportedOperator(name)) if name == "regex"
        ));
        Ok(())
    }

    #[test]
    fn compile_checks_arity() {
        assert!(matches!(
            op("!", vec![term(Literal::from(true)), term(Literal::from(true))]).compile(),
            Err(QueryError::InvalidQuery(_))
        ));
        assert!(matches!(
            op("bound", vec![term(Literal::from(true))]).compile(),
            Err(QueryError::InvalidQuery(_))
        ));
    }

    #[test]
    fn numeric_comparison_across_datatypes() {
        let integer = term(Literal::from(2_i64));
        let double = term(Literal::new_typed_literal(
            "2.0",
            NamedNode::new_unchecked(xsd::DOUBLE),
        ));
        let bindings = Bindings::new();
        assert_eq!(
            evaluate(&op("=", vec![integer.clone(), double.clone()]), &bindings),
            Ok(boolean(true))
        );
        assert_eq!(
            evaluate(&op("sameterm", vec![integer.clone(), double]), &bindings),
            Ok(boolean(false))
        );
        assert_eq!(
            evaluate(&op("<", vec![integer, term(Literal::from(3_i64))]), &bindings),
            Ok(boolean(true))
        );
    }

    #[test]
    fn large_integers_are_compared_exactly() {
        let small = typed("9007199254740992", xsd::INTEGER);
        let large = typed("9007199254740993", xsd::INTEGER);
        let bindings = Bindings::new();
        assert_eq!(
            evaluate(&op("=", vec![large.clone(), small.clone()]), &bindings),
            Ok(boolean(false))
        );
        assert_eq!(
            evaluate(&op("<", vec![small.clone(), large.clone()]), &bindings),
            Ok(boolean(true))
        );
        assert_eq!(
            evaluate(&op(">=", vec![small, large]), &bindings),
            Ok(boolean(false))
        );
    }

    #[test]
    fn decimals_and_doubles_are_promoted() {
        let bindings = Bindings::new();
        assert_eq!(
            evaluate(
                &op(
                    "=",
                    vec![typed("0.5", xsd::DECIMAL), typed("5E-1", xsd::DOUBLE)]
                ),
                &bindings
            ),
            Ok(boolean(true))
        );
        assert_eq!(
            evaluate(
                &op(
                    "<",
                    vec![typed("1", xsd::INTEGER), typed("1.25", xsd::DECIMAL)]
                ),
                &bindings
            ),
            Ok(boolean(true))
        );
        let nan = typed("NaN", xsd::DOUBLE);
        assert_eq!(
            evaluate(&op("=", vec![nan.clone(), nan]), &bindings),
            Ok(boolean(false))
        );
    }

    #[test]
    fn invalid_lexical_forms() {
        let bindings = Bindings::new();
        let fraction = typed("1.5", xsd::INTEGER);
        let infinity = typed("inf", xsd::INTEGER);
        assert_eq!(
            evaluate(&op("!", vec![fraction.clone()]), &bindings),
            Ok(boolean(true))
        );
        assert_eq!(
            evaluate(&op("!", vec![typed("maybe", xsd::BOOLEAN)]), &bindings),
            Ok(boolean(true))
        );
        assert_eq!(
            evaluate(
                &op("<", vec![fraction.clone(), term(Literal::from(2_i64))]),
                &bindings
            ),
            Err(ThinError)
        );
        assert_eq!(
            evaluate(
                &op("=", vec![infinity.clone(), term(Literal::from(1_i64))]),
                &bindings
            ),
            Err(ThinError)
        );
        assert_eq!(
            evaluate(&op("=", vec![fraction.clone(), fraction]), &bindings),
            Ok(boolean(true))
        );
        assert_eq!(
            evaluate(&op("=", vec![infinity, typed("1.5", xsd::INTEGER)]), &bindings),
            Err(ThinError)
        );
    }

    #[test]
    fn comparing_an_iri_with_a_number_is_an_error() {
        let expression = op(
            "<",
            vec![
                term(NamedNode::new_unchecked("http://example.com/a")),
                term(Literal::from(1_i64)),
            ],
        );
        assert_eq!(evaluate(&expression, &Bindings::new()), Err(ThinError));
    }

    #[test]
    fn logical_operators_tolerate_errors_where_the_result_is_determined() {
        let error = var("unbound");
        let bindings = Bindings::new();
        let yes = term(Literal::from(true));
        let no = term(Literal::from(false));
        assert_eq!(
            evaluate(&op("||", vec![error.clone(), yes.clone()]), &bindings),
            Ok(boolean(true))
        );
        assert_eq!(
            evaluate(&op("&&", vec![error.clone(), no]), &bindings),
            Ok(boolean(false))
        );
        assert_eq!(
            evaluate(&op("&&", vec![error, yes]), &bindings),
            Err(ThinError)
        );
    }

    #[test]
    fn term_inspection() {
        let x = Variable::new_unchecked("x");
        let literal = Literal::new_language_tagged_literal_unchecked("chat", "fr");
        let bindings = Bindings::new()
            .set(x.clone(), literal.into())
            .set(Variable::new_unchecked("b"), BlankNode::new_unchecked("b").into());

        assert_eq!(
            evaluate(&op("lang", vec![var("x")]), &bindings),
            Ok(Literal::new_simple_literal("fr").into())
        );
        assert_eq!(
            evaluate(&op("str", vec![var("x")]), &bindings),
            Ok(Literal::new_simple_literal("chat").into())
        );
        assert_eq!(
            evaluate(&op("isliteral", vec![var("x")]), &bindings),
            Ok(boolean(true))
        );
        assert_eq!(
            evaluate(&op("isblank", vec![var("b")]), &bindings),
            Ok(boolean(true))
        );
        assert_eq!(evaluate(&op("lang", vec![var("b")]), &bindings), Err(ThinError));
        assert_eq!(
            evaluate(&op("bound", vec![var("y")]), &bindings),
            Ok(boolean(false))
        );
        assert_eq!(
            expression_variables(&op("=", vec![var("x"), var("b"), var("x")])),
            ["x", "b"]
        );
    }

    fn expression_variables(expression: &Expression) -> Vec<&str> {
        expression
            .variables()
            .into_iter()
            .map(Variable::as_str)
            .collect()
    }

    #[test]
    fn effective_boolean_values() {
        let ebv = |literal: Literal| effective_boolean_value(&literal.into());
        assert_eq!(ebv(Literal::from("")), Ok(false));
        assert_eq!(ebv(Literal::from("a")), Ok(true));
        assert_eq!(ebv(Literal::from(0_i64)), Ok(false));
        assert_eq!(ebv(Literal::from(1.5_f64)), Ok(true));
        let typed = |value: &str, datatype: &str| {
            Literal::new_typed_literal(value, NamedNode::new_unchecked(datatype))
        };
        assert_eq!(ebv(typed("0.0", xsd::DECIMAL)), Ok(false));
        assert_eq!(ebv(typed("NaN", xsd::DOUBLE)), Ok(false));
        assert_eq!(ebv(typed("1", xsd::BOOLEAN)), Ok(true));
        assert_eq!(ebv(typed("1.5", xsd::INTEGER)), Ok(false));
        assert_eq!(ebv(typed("inf", xsd::INTEGER)), Ok(false));
        assert_eq!(ebv(typed("2024-01-01", xsd::DATE_TIME)), Err(ThinError));
        assert_eq!(
            effective_boolean_value(&NamedNode::new_unchecked("http://example.com").into()),
            Err(ThinError)
        );
    }
}
