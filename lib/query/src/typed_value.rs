use crate::{ThinError, ThinResult};
use oxsdatatypes::{Boolean, Decimal, Double, Float, Integer};
use rdf_interop_model::vocab::xsd;
use rdf_interop_model::Literal;
use std::cmp::Ordering;

/// The value of a literal in the value spaces that filters compare by value.
///
/// Literals of other datatypes are kept as [TypedValue::OtherLiteral] and are only equal to
/// themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TypedValue<'value> {
    BooleanLiteral(bool),
    NumericLiteral(Numeric),
    SimpleLiteral(&'value str),
    LanguageStringLiteral {
        value: &'value str,
        language: &'value str,
    },
    OtherLiteral(&'value Literal),
}

impl<'value> TryFrom<&'value Literal> for TypedValue<'value> {
    type Error = ThinError;

    /// Parses the lexical form of `literal` according to its datatype.
    ///
    /// Fails if the lexical form is not valid for a boolean or numeric datatype.
    fn try_from(literal: &'value Literal) -> ThinResult<Self> {
        let datatype = literal.datatype().as_str();
        if literal.is_simple() {
            Ok(TypedValue::SimpleLiteral(literal.value()))
        } else if literal.is_language_tagged() {
            Ok(TypedValue::LanguageStringLiteral {
                value: literal.value(),
                language: literal.language(),
            })
        } else if datatype == xsd::BOOLEAN {
            let value = literal.value().parse::<Boolean>().map_err(|_| ThinError)?;
            Ok(TypedValue::BooleanLiteral(value.into()))
        } else if xsd::is_numeric(datatype) {
            Ok(TypedValue::NumericLiteral(Numeric::parse(
                literal.value(),
                datatype,
            )?))
        } else {
            Ok(TypedValue::OtherLiteral(literal))
        }
    }
}

impl TypedValue<'_> {
    /// Orders values of the same value space. Numbers are promoted to a common type first.
    ///
    /// Language-tagged strings and other literals have no order.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (TypedValue::BooleanLiteral(lhs), TypedValue::BooleanLiteral(rhs)) => {
                Some(lhs.cmp(rhs))
            }
            (TypedValue::NumericLiteral(lhs), TypedValue::NumericLiteral(rhs)) => {
                lhs.partial_cmp(rhs)
            }
            (TypedValue::SimpleLiteral(lhs), TypedValue::SimpleLiteral(rhs)) => {
                Some(lhs.cmp(rhs))
            }
            _ => None,
        }
    }
}

/// A value of one of the XSD numeric datatypes.
///
/// `xsd:integer` and the datatypes derived from it are all represented as [Numeric::Integer].
#[derive(Clone, Copy, Debug)]
pub enum Numeric {
    Integer(Integer),
    Decimal(Decimal),
    Float(Float),
    Double(Double),
}

impl Numeric {
    /// Parses `value` as a lexical form of the numeric `datatype`.
    ///
    /// Values outside the range of a derived integer type, such as `"300"^^xsd:byte`, are
    /// rejected.
    pub fn parse(value: &str, datatype: &str) -> ThinResult<Self> {
        let numeric = match datatype {
            xsd::DOUBLE => Numeric::Double(value.parse().map_err(|_| ThinError)?),
            xsd::FLOAT => Numeric::Float(value.parse().map_err(|_| ThinError)?),
            xsd::DECIMAL => Numeric::Decimal(value.parse().map_err(|_| ThinError)?),
            _ => {
                let integer = value.parse::<Integer>().map_err(|_| ThinError)?;
                if !integer_in_range(i64::from(integer), datatype) {
                    return ThinError::expected();
                }
                Numeric::Integer(integer)
            }
        };
        Ok(numeric)
    }

    pub fn is_zero(self) -> bool {
        match self {
            Numeric::Integer(value) => i64::from(value) == 0,
            Numeric::Decimal(value) => value == Decimal::from(0_i64),
            Numeric::Float(value) => f32::from(value) == 0.0,
            Numeric::Double(value) => f64::from(value) == 0.0,
        }
    }

    pub fn is_nan(self) -> bool {
        match self {
            Numeric::Integer(_) | Numeric::Decimal(_) => false,
            Numeric::Float(value) => value.is_nan(),
            Numeric::Double(value) => value.is_nan(),
        }
    }
}

fn integer_in_range(value: i64, datatype: &str) -> bool {
    match datatype {
        xsd::INT => i32::try_from(value).is_ok(),
        xsd::SHORT => i16::try_from(value).is_ok(),
        xsd::BYTE => i8::try_from(value).is_ok(),
        xsd::NON_NEGATIVE_INTEGER => value >= 0,
        xsd::POSITIVE_INTEGER => value > 0,
        xsd::NON_POSITIVE_INTEGER => value <= 0,
        xsd::NEGATIVE_INTEGER => value < 0,
        _ => true,
    }
}

impl PartialEq for Numeric {
    /// Compares by value after promotion, so `1 = 1.0` holds and `NaN` equals nothing.
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match NumericPair::with_casts_from(*self, *other) {
            NumericPair::Integer(lhs, rhs) => Some(lhs.cmp(&rhs)),
            NumericPair::Decimal(lhs, rhs) => Some(lhs.cmp(&rhs)),
            NumericPair::Float(lhs, rhs) => lhs.partial_cmp(&rhs),
            NumericPair::Double(lhs, rhs) => lhs.partial_cmp(&rhs),
        }
    }
}

/// Two numbers promoted to their common type, following the
/// [SPARQL operand type promotion](https://www.w3.org/TR/xpath20/#promotion).
pub enum NumericPair {
    Integer(Integer, Integer),
    Decimal(Decimal, Decimal),
    Float(Float, Float),
    Double(Double, Double),
}

impl NumericPair {
    pub fn with_casts_from(lhs: Numeric, rhs: Numeric) -> NumericPair {
        match (lhs, rhs) {
            (Numeric::Integer(lhs), Numeric::Integer(rhs)) => NumericPair::Integer(lhs, rhs),
            (Numeric::Integer(lhs), Numeric::Decimal(rhs)) => NumericPair::Decimal(lhs.into(), rhs),
            (Numeric::Integer(lhs), Numeric::Float(rhs)) => NumericPair::Float(lhs.into(), rhs),
            (Numeric::Integer(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs.into(), rhs),

            (Numeric::Decimal(lhs), Numeric::Integer(rhs)) => NumericPair::Decimal(lhs, rhs.into()),
            (Numeric::Decimal(lhs), Numeric::Decimal(rhs)) => NumericPair::Decimal(lhs, rhs),
            (Numeric::Decimal(lhs), Numeric::Float(rhs)) => NumericPair::Float(lhs.into(), rhs),
            (Numeric::Decimal(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs.into(), rhs),

            (Numeric::Float(lhs), Numeric::Integer(rhs)) => NumericPair::Float(lhs, rhs.into()),
            (Numeric::Float(lhs), Numeric::Decimal(rhs)) => NumericPair::Float(lhs, rhs.into()),
            (Numeric::Float(lhs), Numeric::Float(rhs)) => NumericPair::Float(lhs, rhs),
            (Numeric::Float(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs.into(), rhs),

            (Numeric::Double(lhs), Numeric::Integer(rhs)) => NumericPair::Double(lhs, rhs.into()),
            (Numeric::Double(lhs), Numeric::Decimal(rhs)) => NumericPair::Double(lhs, rhs.into()),
            (Numeric::Double(lhs), Numeric::Float(rhs)) => NumericPair::Double(lhs, rhs.into()),
            (Numeric::Double(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs, rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_interop_model::NamedNode;

    fn typed(value: &str, datatype: &str) -> Literal {
        Literal::new_typed_literal(value, NamedNode::new_unchecked(datatype))
    }

    #[test]
    fn large_integers_keep_their_precision() -> Result<(), ThinError> {
        let small = Numeric::parse("9007199254740992", xsd::INTEGER)?;
        let large = Numeric::parse("9007199254740993", xsd::INTEGER)?;
        assert_ne!(small, large);
        assert_eq!(small.partial_cmp(&large), Some(Ordering::Less));
        Ok(())
    }

    #[test]
    fn mixed_numbers_are_promoted() -> Result<(), ThinError> {
        let decimal = Numeric::parse("0.1", xsd::DECIMAL)?;
        let double = Numeric::parse("0.1", xsd::DOUBLE)?;
        let integer = Numeric::parse("1", xsd::INT)?;
        assert_eq!(decimal, double);
        assert_eq!(integer, Numeric::parse("1.0", xsd::DECIMAL)?);
        assert_eq!(integer, Numeric::parse("1E0", xsd::FLOAT)?);
        assert_eq!(
            integer.partial_cmp(&Numeric::parse("1.5", xsd::DECIMAL)?),
            Some(Ordering::Less)
        );
        Ok(())
    }

    #[test]
    fn nan_is_unordered() -> Result<(), ThinError> {
        let nan = Numeric::parse("NaN", xsd::DOUBLE)?;
        assert!(nan.is_nan(), "NaN is not a number");
        assert_ne!(nan, Numeric::parse("NaN", xsd::FLOAT)?);
        assert_eq!(nan.partial_cmp(&Numeric::parse("1", xsd::INTEGER)?), None);
        Ok(())
    }

    #[test]
    fn invalid_lexical_forms_are_rejected() {
        assert_eq!(
            TypedValue::try_from(&typed("1.5", xsd::INTEGER)),
            Err(ThinError)
        );
        assert_eq!(
            TypedValue::try_from(&typed("inf", xsd::INTEGER)),
            Err(ThinError)
        );
        assert_eq!(TypedValue::try_from(&typed("yes", xsd::BOOLEAN)), Err(ThinError));
        assert_eq!(TypedValue::try_from(&typed("300", xsd::BYTE)), Err(ThinError));
        assert_eq!(
            TypedValue::try_from(&typed("0", xsd::POSITIVE_INTEGER)),
            Err(ThinError)
        );
        assert_eq!(
            TypedValue::try_from(&typed("1", xsd::BOOLEAN)),
            Ok(TypedValue::BooleanLiteral(true))
        );
    }

    #[test]
    fn unrelated_value_spaces_are_unordered() {
        let date = typed("2024-01-01T00:00:00Z", xsd::DATE_TIME);
        let values = [
            TypedValue::SimpleLiteral("1"),
            TypedValue::BooleanLiteral(true),
            TypedValue::OtherLiteral(&date),
        ];
        for value in values {
            assert_eq!(
                value.compare(&TypedValue::NumericLiteral(Numeric::Integer(1_i64.into()))),
                None
            );
        }
    }
}
