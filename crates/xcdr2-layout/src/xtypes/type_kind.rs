// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TypeKind and extensibility kinds per OMG DDS-XTypes v1.3
//!
//! Section 7.2.2: TypeKind enumeration
//! Section 7.2.2.4.4.4.6: Extensibility of aggregated types

/// Kind of a type as seen by the layout engine.
///
/// Adapters resolve aliases before a kind reaches the
/// [`ValueWriter`](crate::ValueWriter), so `Alias` only appears in schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    // --- Primitive types ---
    /// Boolean (1 byte)
    Boolean,
    /// Octet (1 byte)
    Byte,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    /// 8-bit character
    Char8,

    // --- String types ---
    /// UTF-8 string with 4-byte length prefix and NUL terminator
    String8,

    // --- Constructed types ---
    /// Enumeration; encoded width derives from the bit bound
    Enum { bit_bound: u16 },
    Struct,
    Union,
    Sequence,
    Array,
    Alias,
}

impl TypeKind {
    /// Default bit bound for enumerations without `@bit_bound`.
    pub const DEFAULT_ENUM_BIT_BOUND: u16 = 32;

    /// Enumeration with the default 32-bit bound.
    pub const ENUM32: Self = Self::Enum {
        bit_bound: Self::DEFAULT_ENUM_BIT_BOUND,
    };

    /// Primitive kinds in the XTypes sense.
    ///
    /// Collections of primitive elements carry no DHEADER; enums and strings
    /// are not primitive.
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            Self::Boolean
                | Self::Byte
                | Self::Int8
                | Self::UInt8
                | Self::Int16
                | Self::UInt16
                | Self::Int32
                | Self::UInt32
                | Self::Int64
                | Self::UInt64
                | Self::Float32
                | Self::Float64
                | Self::Char8
        )
    }

    /// Struct, union, sequence or array.
    pub const fn is_aggregate(self) -> bool {
        matches!(
            self,
            Self::Struct | Self::Union | Self::Sequence | Self::Array
        )
    }

    /// Encoded width of fixed-size kinds (primitives and enums).
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Boolean | Self::Byte | Self::Int8 | Self::UInt8 | Self::Char8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
            Self::Enum { bit_bound } => Some(enum_width(bit_bound)),
            Self::String8
            | Self::Struct
            | Self::Union
            | Self::Sequence
            | Self::Array
            | Self::Alias => None,
        }
    }

    /// Natural alignment (before the XCDR2 cap is applied).
    pub const fn natural_alignment(self) -> usize {
        match self.fixed_size() {
            Some(size) => size,
            None => 4,
        }
    }
}

/// Encoded width of an enumeration with the given bit bound.
pub const fn enum_width(bit_bound: u16) -> usize {
    match bit_bound {
        0..=8 => 1,
        9..=16 => 2,
        _ => 4,
    }
}

/// Declared evolution contract of a struct or union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Extensibility {
    /// Fixed shape, no structural header.
    Final,
    /// Content prefixed by a DHEADER; may grow at the end.
    #[default]
    Appendable,
    /// DHEADER plus per-member EMHEADER framing.
    Mutable,
}

impl Extensibility {
    /// Appendable and Mutable aggregates carry a DHEADER.
    pub const fn is_delimited(self) -> bool {
        matches!(self, Self::Appendable | Self::Mutable)
    }
}
