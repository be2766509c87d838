// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value Writer Protocol.
//!
//! The capability set every traversal adapter drives, in an order exactly
//! matching the type schema's member order:
//!
//! ```text
//! struct   : begin_struct  { begin_struct_member  <value> end_struct_member }*  end_struct
//! union    : begin_union   write_discriminator [ begin_union_member <value> end_union_member ] end_union
//! sequence : begin_sequence write_length <value>*                               end_sequence
//! array    : begin_array   <value>* (product of dims, flattened outer to inner) end_array
//! leaf     : write_primitive | write_string | write_absent_value
//! ```
//!
//! The static-schema adapter ([`ValueWrite`]) and the reflective adapter
//! ([`write_dynamic`](crate::dynamic::write_dynamic)) emit identical call
//! sequences for logically equal data, which is what makes the computed
//! layout independent of the value's representation.

mod external;
mod value_write;

pub use external::External;
pub use value_write::ValueWrite;

use crate::error::{LayoutError, Result};
use crate::xtypes::{enum_width, Extensibility, TypeKind};

/// Member announced to a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberParam {
    pub id: u32,
    /// Resolved kind of the member's type (never `Alias`).
    pub kind: TypeKind,
    /// `@key` members set the EMHEADER must-understand flag.
    pub must_understand: bool,
    pub optional: bool,
    /// Always `true` for non-optional members.
    pub present: bool,
}

impl MemberParam {
    pub const fn new(id: u32, kind: TypeKind) -> Self {
        Self {
            id,
            kind,
            must_understand: false,
            optional: false,
            present: true,
        }
    }

    #[must_use]
    pub const fn key(mut self) -> Self {
        self.must_understand = true;
        self
    }

    #[must_use]
    pub const fn optional(mut self, present: bool) -> Self {
        self.optional = true;
        self.present = present;
        self
    }
}

/// Fixed-size leaf value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveValue {
    Bool(bool),
    Byte(u8),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Char8(u8),
    Enum { value: i32, bit_bound: u16 },
}

impl PrimitiveValue {
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Bool(_) => TypeKind::Boolean,
            Self::Byte(_) => TypeKind::Byte,
            Self::Int8(_) => TypeKind::Int8,
            Self::UInt8(_) => TypeKind::UInt8,
            Self::Int16(_) => TypeKind::Int16,
            Self::UInt16(_) => TypeKind::UInt16,
            Self::Int32(_) => TypeKind::Int32,
            Self::UInt32(_) => TypeKind::UInt32,
            Self::Int64(_) => TypeKind::Int64,
            Self::UInt64(_) => TypeKind::UInt64,
            Self::Float32(_) => TypeKind::Float32,
            Self::Float64(_) => TypeKind::Float64,
            Self::Char8(_) => TypeKind::Char8,
            Self::Enum { bit_bound, .. } => TypeKind::Enum {
                bit_bound: *bit_bound,
            },
        }
    }

    /// Encoded width in bytes.
    pub const fn size(&self) -> usize {
        match self {
            Self::Bool(_) | Self::Byte(_) | Self::Int8(_) | Self::UInt8(_) | Self::Char8(_) => 1,
            Self::Int16(_) | Self::UInt16(_) => 2,
            Self::Int32(_) | Self::UInt32(_) | Self::Float32(_) => 4,
            Self::Int64(_) | Self::UInt64(_) | Self::Float64(_) => 8,
            Self::Enum { bit_bound, .. } => enum_width(*bit_bound),
        }
    }

    /// Build a discriminator value of the given kind from its integer label.
    pub fn from_discriminator(kind: TypeKind, value: i64) -> Result<Self> {
        let out_of_range =
            || LayoutError::integrity("discriminator", format!("{value} out of range for {kind:?}"));
        Ok(match kind {
            TypeKind::Boolean => Self::Bool(value != 0),
            TypeKind::Byte => Self::Byte(u8::try_from(value).map_err(|_| out_of_range())?),
            TypeKind::Char8 => Self::Char8(u8::try_from(value).map_err(|_| out_of_range())?),
            TypeKind::Int8 => Self::Int8(i8::try_from(value).map_err(|_| out_of_range())?),
            TypeKind::UInt8 => Self::UInt8(u8::try_from(value).map_err(|_| out_of_range())?),
            TypeKind::Int16 => Self::Int16(i16::try_from(value).map_err(|_| out_of_range())?),
            TypeKind::UInt16 => Self::UInt16(u16::try_from(value).map_err(|_| out_of_range())?),
            TypeKind::Int32 => Self::Int32(i32::try_from(value).map_err(|_| out_of_range())?),
            TypeKind::UInt32 => Self::UInt32(u32::try_from(value).map_err(|_| out_of_range())?),
            TypeKind::Int64 => Self::Int64(value),
            TypeKind::UInt64 => Self::UInt64(u64::try_from(value).map_err(|_| out_of_range())?),
            TypeKind::Enum { bit_bound } => Self::Enum {
                value: i32::try_from(value).map_err(|_| out_of_range())?,
                bit_bound,
            },
            other => {
                return Err(LayoutError::integrity(
                    "discriminator",
                    format!("{other:?} cannot discriminate a union"),
                ))
            }
        })
    }
}

/// Abstract capability set driven by traversal adapters.
///
/// Implementations accumulate state; none perform I/O. Calling operations
/// out of schema order is a programming defect; implementations document
/// whether they detect it.
pub trait ValueWriter {
    fn begin_struct(&mut self, extensibility: Extensibility) -> Result<()>;
    fn end_struct(&mut self) -> Result<()>;

    /// Announce the next member of the innermost struct.
    fn begin_struct_member(&mut self, member: MemberParam) -> Result<()>;
    fn end_struct_member(&mut self) -> Result<()>;

    fn begin_union(&mut self, extensibility: Extensibility) -> Result<()>;
    fn end_union(&mut self) -> Result<()>;

    /// Write the discriminator of the innermost union (exactly once, first).
    fn write_discriminator(&mut self, value: PrimitiveValue) -> Result<()>;

    /// Announce the member selected by the discriminator.
    fn begin_union_member(&mut self, member: MemberParam) -> Result<()>;
    fn end_union_member(&mut self) -> Result<()>;

    /// Open a sequence; `element` is the resolved element kind.
    fn begin_sequence(&mut self, element: TypeKind) -> Result<()>;
    /// Element count of the innermost sequence, written before any element.
    fn write_length(&mut self, length: u32) -> Result<()>;
    fn end_sequence(&mut self) -> Result<()>;

    /// Open an array; `dims` are outer to inner and elements follow flattened.
    fn begin_array(&mut self, element: TypeKind, dims: &[u32]) -> Result<()>;
    fn end_array(&mut self) -> Result<()>;

    /// Value of an optional member that is not present.
    fn write_absent_value(&mut self) -> Result<()>;
    fn write_primitive(&mut self, value: PrimitiveValue) -> Result<()>;
    fn write_string(&mut self, value: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_param_flags() {
        let p = MemberParam::new(4, TypeKind::String8).key().optional(false);
        assert!(p.must_understand);
        assert!(p.optional);
        assert!(!p.present);
        assert!(MemberParam::new(0, TypeKind::Int16).present);
    }

    #[test]
    fn test_primitive_value_size_and_kind() {
        assert_eq!(PrimitiveValue::Bool(true).size(), 1);
        assert_eq!(PrimitiveValue::Int16(10).size(), 2);
        assert_eq!(PrimitiveValue::Float32(1.0).size(), 4);
        assert_eq!(PrimitiveValue::UInt64(30).size(), 8);
        let e = PrimitiveValue::Enum {
            value: 1,
            bit_bound: 16,
        };
        assert_eq!(e.size(), 2);
        assert_eq!(e.kind(), TypeKind::Enum { bit_bound: 16 });
    }

    #[test]
    fn test_discriminator_conversion() {
        assert_eq!(
            PrimitiveValue::from_discriminator(TypeKind::Int32, 3).ok(),
            Some(PrimitiveValue::Int32(3))
        );
        assert_eq!(
            PrimitiveValue::from_discriminator(TypeKind::ENUM32, 1).ok(),
            Some(PrimitiveValue::Enum {
                value: 1,
                bit_bound: 32
            })
        );
        assert!(PrimitiveValue::from_discriminator(TypeKind::Byte, 300).is_err());
        assert!(PrimitiveValue::from_discriminator(TypeKind::String8, 0).is_err());
    }
}
