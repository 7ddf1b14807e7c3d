//! Element and primitive contracts.
//!
//! A data source stores logical *elements*; each element type declares the
//! canonical primitive representation it encodes to and how many primitive
//! components one encoded slot occupies. Stores and views only ever move
//! whole slots.
//!
//! The trait split mirrors what each layer actually needs:
//!
//! ```text
//! Value                 - zero construction + zero test (views, GenericStore)
//! ├── Primitive         - a canonical primitive representation
//! │   └── FixedPrimitive - fixed byte width (FileStore, RelationalStore)
//! └── Element           - slot codec over one Primitive (encoding stores)
//! ```

use std::fmt::Debug;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Zero;

/// The canonical primitive representations an element may encode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    F64,
    F32,
    I64,
    I32,
    I16,
    I8,
    Bool,
    BigInt,
    BigDecimal,
}

impl PrimitiveKind {
    /// SQL column type for this kind, if it has a fixed-width mapping.
    ///
    /// Arbitrary-precision kinds have no relational column mapping.
    pub fn sql_type(self) -> Option<&'static str> {
        match self {
            PrimitiveKind::F64 => Some("DOUBLE"),
            PrimitiveKind::F32 => Some("REAL"),
            PrimitiveKind::I64 => Some("BIGINT"),
            PrimitiveKind::I32 => Some("INTEGER"),
            PrimitiveKind::I16 => Some("SMALLINT"),
            PrimitiveKind::I8 => Some("TINYINT"),
            PrimitiveKind::Bool => Some("BIT"),
            PrimitiveKind::BigInt | PrimitiveKind::BigDecimal => None,
        }
    }
}

/// Minimal contract for anything a data source can hold.
///
/// `zero` is the additive identity; it is what sparse storage elides, what
/// padded views return outside their extent, and what fresh storage reads as.
pub trait Value: Clone + Debug + PartialEq + Send + 'static {
    /// Additive-identity instance.
    fn zero() -> Self;

    /// Zero-equality test.
    fn is_zero(&self) -> bool;
}

/// A canonical primitive representation.
pub trait Primitive: Value {
    const KIND: PrimitiveKind;
}

/// A primitive with a fixed byte width and a little-endian byte encoding.
///
/// Required by the out-of-core and relational backings, which lay slots out
/// as fixed-width records. `BigInt` and `BigDecimal` are deliberately not
/// fixed-width; element types over those primitives use the in-memory
/// backings instead.
pub trait FixedPrimitive: Primitive {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// SQL column type for this primitive.
    const SQL_TYPE: &'static str;

    /// Write the little-endian encoding into `out` (`out.len() == WIDTH`).
    fn write_le(&self, out: &mut [u8]);

    /// Read a value from its little-endian encoding (`buf.len() == WIDTH`).
    fn read_le(buf: &[u8]) -> Self;

    #[cfg(feature = "relational")]
    fn to_sql_value(&self) -> rusqlite::types::Value;

    #[cfg(feature = "relational")]
    fn from_sql_value(
        value: rusqlite::types::ValueRef<'_>,
    ) -> Result<Self, rusqlite::types::FromSqlError>;
}

/// The element codec: a fixed-size encoding of one logical value as
/// `COMPONENTS` values of one canonical primitive representation.
///
/// `decode` writes into an existing value so callers own the scratch; no
/// thread-local temporaries are involved.
pub trait Element: Value {
    /// Canonical primitive this element encodes to.
    type Primitive: Primitive;

    /// Number of primitive components per encoded slot.
    const COMPONENTS: usize;

    /// Encode into `slot` (`slot.len() == COMPONENTS`).
    fn encode(&self, slot: &mut [Self::Primitive]);

    /// Decode from `slot` (`slot.len() == COMPONENTS`) into `self`.
    fn decode(&mut self, slot: &[Self::Primitive]);
}

macro_rules! numeric_value {
    ($($ty:ty => $zero:expr),* $(,)?) => {$(
        impl Value for $ty {
            #[inline]
            fn zero() -> Self {
                $zero
            }

            #[inline]
            fn is_zero(&self) -> bool {
                *self == $zero
            }
        }
    )*};
}

numeric_value! {
    f64 => 0.0,
    f32 => 0.0,
    i64 => 0,
    i32 => 0,
    i16 => 0,
    i8 => 0,
}

impl Value for bool {
    #[inline]
    fn zero() -> Self {
        false
    }

    #[inline]
    fn is_zero(&self) -> bool {
        !*self
    }
}

impl Value for BigInt {
    fn zero() -> Self {
        Zero::zero()
    }

    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }
}

impl Value for BigDecimal {
    fn zero() -> Self {
        Zero::zero()
    }

    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }
}

macro_rules! primitive_kind {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Primitive for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;
        }
    )*};
}

primitive_kind! {
    f64 => F64,
    f32 => F32,
    i64 => I64,
    i32 => I32,
    i16 => I16,
    i8 => I8,
    bool => Bool,
    BigInt => BigInt,
    BigDecimal => BigDecimal,
}

macro_rules! fixed_numeric_primitive {
    ($($ty:ty => ($width:expr, $sql:expr, $sqlval:ident, $from:expr)),* $(,)?) => {$(
        impl FixedPrimitive for $ty {
            const WIDTH: usize = $width;
            const SQL_TYPE: &'static str = $sql;

            #[inline]
            fn write_le(&self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_le_bytes());
            }

            #[inline]
            fn read_le(buf: &[u8]) -> Self {
                let mut bytes = [0u8; $width];
                bytes.copy_from_slice(buf);
                <$ty>::from_le_bytes(bytes)
            }

            #[cfg(feature = "relational")]
            fn to_sql_value(&self) -> rusqlite::types::Value {
                rusqlite::types::Value::$sqlval((*self).into())
            }

            #[cfg(feature = "relational")]
            fn from_sql_value(
                value: rusqlite::types::ValueRef<'_>,
            ) -> Result<Self, rusqlite::types::FromSqlError> {
                $from(value)
            }
        }
    )*};
}

#[cfg(feature = "relational")]
fn narrow_i64<T: TryFrom<i64>>(
    value: rusqlite::types::ValueRef<'_>,
) -> Result<T, rusqlite::types::FromSqlError> {
    let raw = value.as_i64()?;
    T::try_from(raw).map_err(|_| rusqlite::types::FromSqlError::OutOfRange(raw))
}

#[cfg(feature = "relational")]
fn read_f64(
    value: rusqlite::types::ValueRef<'_>,
) -> Result<f64, rusqlite::types::FromSqlError> {
    value.as_f64()
}

#[cfg(feature = "relational")]
fn read_f32(
    value: rusqlite::types::ValueRef<'_>,
) -> Result<f32, rusqlite::types::FromSqlError> {
    Ok(value.as_f64()? as f32)
}

fixed_numeric_primitive! {
    f64 => (8, "DOUBLE", Real, read_f64),
    f32 => (4, "REAL", Real, read_f32),
    i64 => (8, "BIGINT", Integer, narrow_i64::<i64>),
    i32 => (4, "INTEGER", Integer, narrow_i64::<i32>),
    i16 => (2, "SMALLINT", Integer, narrow_i64::<i16>),
    i8 => (1, "TINYINT", Integer, narrow_i64::<i8>),
}

impl FixedPrimitive for bool {
    const WIDTH: usize = 1;
    const SQL_TYPE: &'static str = "BIT";

    #[inline]
    fn write_le(&self, out: &mut [u8]) {
        out[0] = *self as u8;
    }

    #[inline]
    fn read_le(buf: &[u8]) -> Self {
        buf[0] != 0
    }

    #[cfg(feature = "relational")]
    fn to_sql_value(&self) -> rusqlite::types::Value {
        rusqlite::types::Value::Integer(*self as i64)
    }

    #[cfg(feature = "relational")]
    fn from_sql_value(
        value: rusqlite::types::ValueRef<'_>,
    ) -> Result<Self, rusqlite::types::FromSqlError> {
        Ok(value.as_i64()? != 0)
    }
}

macro_rules! identity_element {
    ($($ty:ty),* $(,)?) => {$(
        impl Element for $ty {
            type Primitive = $ty;
            const COMPONENTS: usize = 1;

            #[inline]
            fn encode(&self, slot: &mut [Self::Primitive]) {
                slot[0].clone_from(self);
            }

            #[inline]
            fn decode(&mut self, slot: &[Self::Primitive]) {
                self.clone_from(&slot[0]);
            }
        }
    )*};
}

identity_element!(f64, f32, i64, i32, i16, i8, bool, BigInt, BigDecimal);
