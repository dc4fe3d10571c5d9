//! MDX scalar types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{TypeError, TypeResult};

/// Widest decimal a join can produce before it widens to Numeric
pub const MAX_DECIMAL_PRECISION: u32 = 38;

/// Fixed-point decimal with a precision and scale
///
/// Invariant: `precision >= 1` and `precision >= scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDecimal")]
pub struct DecimalType {
    precision: u32,
    scale: u32,
}

#[derive(Deserialize)]
struct RawDecimal {
    precision: u32,
    scale: u32,
}

impl TryFrom<RawDecimal> for DecimalType {
    type Error = TypeError;

    fn try_from(raw: RawDecimal) -> TypeResult<Self> {
        Self::new(raw.precision, raw.scale)
    }
}

impl DecimalType {
    /// Create a decimal type, validating precision and scale
    pub fn new(precision: u32, scale: u32) -> TypeResult<Self> {
        if precision == 0 || scale > precision {
            return Err(TypeError::InvalidDecimal { precision, scale });
        }
        Ok(Self { precision, scale })
    }

    /// Create an integer-valued decimal (scale 0)
    pub fn integer(precision: u32) -> TypeResult<Self> {
        Self::new(precision, 0)
    }

    /// Total number of digits
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Digits after the decimal point
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Digits before the decimal point
    pub const fn integer_digits(&self) -> u32 {
        self.precision - self.scale
    }

    /// Smallest decimal that holds every value of both operands
    ///
    /// Returns `None` when that decimal would exceed
    /// [`MAX_DECIMAL_PRECISION`], including when its digit count does not
    /// fit in a `u32`.
    pub fn widen(&self, other: &DecimalType) -> Option<DecimalType> {
        let scale = self.scale.max(other.scale);
        let precision = self
            .integer_digits()
            .max(other.integer_digits())
            .checked_add(scale)?;
        (precision <= MAX_DECIMAL_PRECISION).then_some(DecimalType { precision, scale })
    }
}

/// MDX scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScalarType {
    /// Character string
    String,
    /// Numeric value of unspecified representation
    Numeric,
    /// Fixed-point decimal
    Decimal(DecimalType),
    /// Date and time
    DateTime,
    /// Logical value
    Boolean,
    /// Flag-like symbol (e.g. `SELF_AND_AFTER`)
    Symbol,
    /// Any scalar value
    Generic,
}

impl ScalarType {
    /// Create a decimal scalar type
    pub fn decimal(precision: u32, scale: u32) -> TypeResult<Self> {
        DecimalType::new(precision, scale).map(Self::Decimal)
    }

    /// Check if this is Numeric or a Decimal
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric | Self::Decimal(_))
    }

    /// Check if this is the generic scalar type
    pub const fn is_generic(&self) -> bool {
        matches!(self, Self::Generic)
    }

    /// Get the decimal parameters, if this is a decimal
    pub const fn as_decimal(&self) -> Option<&DecimalType> {
        match self {
            Self::Decimal(decimal) => Some(decimal),
            _ => None,
        }
    }

    /// Get the type name as used in diagnostics
    pub const fn name(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Numeric => "NUMERIC",
            Self::Decimal(_) => "DECIMAL",
            Self::DateTime => "DATETIME",
            Self::Boolean => "BOOLEAN",
            Self::Symbol => "SYMBOL",
            Self::Generic => "SCALAR",
        }
    }

    /// Join two scalar types
    pub(crate) fn join(&self, other: &ScalarType, conversions: &mut u32) -> Option<ScalarType> {
        if self == other {
            return Some(*self);
        }

        let joined = match (self, other) {
            (Self::Decimal(a), Self::Decimal(b)) => a.widen(b).map_or(Self::Numeric, Self::Decimal),
            (Self::Decimal(_), Self::Numeric) | (Self::Numeric, Self::Decimal(_)) => Self::Numeric,
            (Self::Generic, _) | (_, Self::Generic) => Self::Generic,
            _ => return None,
        };
        *conversions += u32::from(*self != joined) + u32::from(*other != joined);
        Some(joined)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal(decimal) => write!(f, "DECIMAL({}, {})", decimal.precision, decimal.scale),
            _ => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decimal(precision: u32, scale: u32) -> ScalarType {
        ScalarType::decimal(precision, scale).unwrap()
    }

    #[test]
    fn test_decimal_validation() {
        assert!(DecimalType::new(10, 2).is_ok());
        assert!(DecimalType::new(3, 3).is_ok());
        assert_eq!(
            DecimalType::new(2, 3),
            Err(TypeError::InvalidDecimal {
                precision: 2,
                scale: 3
            })
        );
        assert!(DecimalType::new(0, 0).is_err());
    }

    #[test]
    fn test_decimal_widening() {
        let mut conversions = 0;
        let joined = decimal(10, 2).join(&decimal(7, 0), &mut conversions);

        // 8 integer digits from the first, scale 2 from the first
        assert_eq!(joined, Some(decimal(10, 2)));
        assert_eq!(conversions, 1);

        let mut conversions = 0;
        let joined = decimal(5, 4).join(&decimal(7, 0), &mut conversions);
        assert_eq!(joined, Some(decimal(11, 4)));
        assert_eq!(conversions, 2);
    }

    #[test]
    fn test_decimal_overflow_widens_to_numeric() {
        let mut conversions = 0;
        let joined = decimal(38, 30).join(&decimal(38, 0), &mut conversions);
        assert_eq!(joined, Some(ScalarType::Numeric));
        assert_eq!(conversions, 2);
    }

    #[test]
    fn test_widening_past_u32_digits_is_numeric() {
        let wide = DecimalType::new(u32::MAX, 0).unwrap();
        let fractional = DecimalType::new(u32::MAX, u32::MAX).unwrap();
        assert_eq!(wide.widen(&fractional), None);

        let mut conversions = 0;
        let joined = ScalarType::Decimal(wide).join(&ScalarType::Decimal(fractional), &mut conversions);
        assert_eq!(joined, Some(ScalarType::Numeric));
        assert_eq!(conversions, 2);
    }

    #[test]
    fn test_generic_absorbs_scalars() {
        let mut conversions = 0;
        assert_eq!(
            ScalarType::String.join(&ScalarType::Generic, &mut conversions),
            Some(ScalarType::Generic)
        );
        assert_eq!(conversions, 1);
    }

    #[test]
    fn test_unrelated_scalars_do_not_join() {
        let mut conversions = 0;
        assert_eq!(ScalarType::String.join(&ScalarType::Numeric, &mut conversions), None);
        assert_eq!(ScalarType::Boolean.join(&ScalarType::DateTime, &mut conversions), None);
        assert_eq!(conversions, 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(decimal(10, 2).to_string(), "DECIMAL(10, 2)");
        assert_eq!(ScalarType::Generic.to_string(), "SCALAR");
    }

    #[test]
    fn test_decimal_deserialization_validates() {
        let ok: ScalarType =
            serde_json::from_str(r#"{"type":"Decimal","precision":10,"scale":2}"#).unwrap();
        assert_eq!(ok, decimal(10, 2));

        let bad = serde_json::from_str::<ScalarType>(r#"{"type":"Decimal","precision":1,"scale":2}"#);
        assert!(bad.is_err());
    }
}
