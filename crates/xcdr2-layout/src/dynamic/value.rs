// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value types.

use std::collections::HashMap;

/// A type-erased value; its meaning comes from the descriptor it is paired with.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    // Primitives
    Bool(bool),
    /// `octet` and `uint8` alike
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    /// 8-bit character
    Char(u8),
    String(String),

    // Composites
    Struct(HashMap<String, DynamicValue>),
    Sequence(Vec<DynamicValue>),
    /// Elements outer to inner; either flat or nested per dimension.
    Array(Vec<DynamicValue>),
    Enum(i32),
    /// Discriminator plus the selected member's value, if any.
    Union {
        discriminator: i64,
        value: Option<Box<DynamicValue>>,
    },

    /// Absent optional member.
    Null,
}

macro_rules! accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        #[doc = concat!("Try to get as `", stringify!($ty), "`.")]
        pub fn $name(&self) -> Option<$ty> {
            match self {
                Self::$variant(v) => Some(*v),
                _ => None,
            }
        }
    };
}

impl DynamicValue {
    /// Struct value from `(member name, value)` pairs.
    pub fn from_fields<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, DynamicValue)>,
    {
        Self::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Union value with a selected member.
    pub fn union(discriminator: i64, value: DynamicValue) -> Self {
        Self::Union {
            discriminator,
            value: Some(Box::new(value)),
        }
    }

    /// Union value whose discriminator selects no member.
    pub fn union_empty(discriminator: i64) -> Self {
        Self::Union {
            discriminator,
            value: None,
        }
    }

    /// Array value from its elements.
    pub fn array<T: Into<DynamicValue>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    accessor!(as_bool, Bool, bool);
    accessor!(as_u8, U8, u8);
    accessor!(as_u32, U32, u32);
    accessor!(as_i32, I32, i32);
    accessor!(as_i64, I64, i64);
    accessor!(as_f64, F64, f64);

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Elements of a sequence or array.
    pub fn as_sequence(&self) -> Option<&[DynamicValue]> {
        match self {
            Self::Sequence(v) | Self::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&DynamicValue> {
        match self {
            Self::Struct(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Set a struct field; returns `false` for non-struct values.
    pub fn set_field(&mut self, name: impl Into<String>, value: DynamicValue) -> bool {
        match self {
            Self::Struct(fields) => {
                fields.insert(name.into(), value);
                true
            }
            _ => false,
        }
    }

    pub fn enum_value(&self) -> Option<i32> {
        match self {
            Self::Enum(v) => Some(*v),
            _ => None,
        }
    }

    pub fn union_discriminator(&self) -> Option<i64> {
        match self {
            Self::Union { discriminator, .. } => Some(*discriminator),
            _ => None,
        }
    }

    pub fn union_value(&self) -> Option<&DynamicValue> {
        match self {
            Self::Union { value, .. } => value.as_deref(),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::Struct(_) => "struct",
            Self::Sequence(_) => "sequence",
            Self::Array(_) => "array",
            Self::Enum(_) => "enum",
            Self::Union { .. } => "union",
            Self::Null => "null",
        }
    }
}

macro_rules! from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for DynamicValue {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

from_primitive! {
    bool => Bool,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => String,
}

impl From<&str> for DynamicValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<DynamicValue>> From<Vec<T>> for DynamicValue {
    fn from(v: Vec<T>) -> Self {
        Self::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<DynamicValue>> From<Option<T>> for DynamicValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
