//! Shopping-list item quantity type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum QuantityError {
    /// The value is zero or negative.
    #[error("quantity must be a positive integer, got {0}")]
    NotPositive(i32),
}

/// A shopping-list item quantity.
///
/// Quantities are always positive integers. Zero and negative values are
/// rejected at construction, so downstream consumers (price aggregation in
/// particular) never have to re-check.
///
/// ## Examples
///
/// ```
/// use basketwatch_core::Quantity;
///
/// assert!(Quantity::new(1).is_ok());
/// assert!(Quantity::new(12).is_ok());
///
/// assert!(Quantity::new(0).is_err());
/// assert!(Quantity::new(-3).is_err());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Quantity(i32);

impl Quantity {
    /// One unit, the default for new shopping-list items.
    pub const ONE: Self = Self(1);

    /// Construct a `Quantity` from an i32 value.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotPositive`] if the value is less than 1.
    pub const fn new(value: i32) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::NotPositive(value));
        }
        Ok(Self(value))
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Quantity {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Quantity {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let n = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are guarded by a CHECK constraint
        Ok(Self(n))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Quantity {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_positive() {
        assert_eq!(Quantity::new(1).unwrap().as_i32(), 1);
        assert_eq!(Quantity::new(250).unwrap().as_i32(), 250);
    }

    #[test]
    fn test_new_zero_rejected() {
        assert!(matches!(
            Quantity::new(0),
            Err(QuantityError::NotPositive(0))
        ));
    }

    #[test]
    fn test_new_negative_rejected() {
        assert!(matches!(
            Quantity::new(-3),
            Err(QuantityError::NotPositive(-3))
        ));
    }

    #[test]
    fn test_default_is_one() {
        assert_eq!(Quantity::default(), Quantity::ONE);
    }

    #[test]
    fn test_display() {
        let quantity = Quantity::new(7).unwrap();
        assert_eq!(format!("{quantity}"), "7");
    }

    #[test]
    fn test_try_from() {
        let quantity: Quantity = 4_i32.try_into().unwrap();
        assert_eq!(quantity.as_i32(), 4);
        assert!(Quantity::try_from(-1).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let quantity = Quantity::new(3).unwrap();
        let json = serde_json::to_string(&quantity).unwrap();
        assert_eq!(json, "3");

        let parsed: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, quantity);
    }
}
