// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Static-schema adapter: values whose schema is known at compile time.
//!
//! User types implement [`ValueWrite`] through `#[derive(ValueWrite)]`; this
//! module covers the leaf and collection types those impls delegate to.

use super::{PrimitiveValue, ValueWriter};
use crate::error::{LayoutError, Result};
use crate::xtypes::TypeKind;

/// Drives a [`ValueWriter`] from a statically typed value.
pub trait ValueWrite {
    /// Kind of this type when it appears as a member or element.
    const KIND: TypeKind;

    /// Innermost element kind; arrays of arrays flatten onto one array.
    const ELEMENT_KIND: TypeKind = Self::KIND;

    /// Write this value.
    fn write_value<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> Result<()>;

    /// `false` for an absent optional value.
    fn is_present(&self) -> bool {
        true
    }

    /// Append array dimensions (outer to inner); no-op for non-array types.
    fn collect_dims(_dims: &mut Vec<u32>) {}

    /// Write the flattened elements of an array, or the value itself.
    fn write_elements<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        self.write_value(writer)
    }
}

macro_rules! impl_value_write_primitive {
    ($ty:ty, $kind:ident, $variant:ident) => {
        impl ValueWrite for $ty {
            const KIND: TypeKind = TypeKind::$kind;

            fn write_value<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
                writer.write_primitive(PrimitiveValue::$variant(*self))
            }
        }
    };
}

impl_value_write_primitive!(bool, Boolean, Bool);
impl_value_write_primitive!(u8, Byte, Byte);
impl_value_write_primitive!(i8, Int8, Int8);
impl_value_write_primitive!(i16, Int16, Int16);
impl_value_write_primitive!(u16, UInt16, UInt16);
impl_value_write_primitive!(i32, Int32, Int32);
impl_value_write_primitive!(u32, UInt32, UInt32);
impl_value_write_primitive!(i64, Int64, Int64);
impl_value_write_primitive!(u64, UInt64, UInt64);
impl_value_write_primitive!(f32, Float32, Float32);
impl_value_write_primitive!(f64, Float64, Float64);

impl ValueWrite for str {
    const KIND: TypeKind = TypeKind::String8;

    fn write_value<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_string(self)
    }
}

impl ValueWrite for String {
    const KIND: TypeKind = TypeKind::String8;

    fn write_value<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_string(self)
    }
}

impl<T: ValueWrite> ValueWrite for Vec<T> {
    const KIND: TypeKind = TypeKind::Sequence;

    fn write_value<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let length = u32::try_from(self.len()).map_err(|_| {
            LayoutError::integrity("sequence", format!("{} elements exceed u32", self.len()))
        })?;
        writer.begin_sequence(T::KIND)?;
        writer.write_length(length)?;
        for element in self {
            element.write_value(writer)?;
        }
        writer.end_sequence()
    }
}

impl<T: ValueWrite, const N: usize> ValueWrite for [T; N] {
    const KIND: TypeKind = TypeKind::Array;
    const ELEMENT_KIND: TypeKind = T::ELEMENT_KIND;

    fn write_value<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let mut dims = Vec::new();
        Self::collect_dims(&mut dims);
        writer.begin_array(Self::ELEMENT_KIND, &dims)?;
        self.write_elements(writer)?;
        writer.end_array()
    }

    fn collect_dims(dims: &mut Vec<u32>) {
        dims.push(u32::try_from(N).unwrap_or(u32::MAX));
        T::collect_dims(dims);
    }

    fn write_elements<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        for element in self {
            element.write_elements(writer)?;
        }
        Ok(())
    }
}

/// Optional member value: `None` writes an absent value.
impl<T: ValueWrite> ValueWrite for Option<T> {
    const KIND: TypeKind = T::KIND;
    const ELEMENT_KIND: TypeKind = T::ELEMENT_KIND;

    fn write_value<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        match self {
            Some(value) => value.write_value(writer),
            None => writer.write_absent_value(),
        }
    }

    fn is_present(&self) -> bool {
        self.is_some()
    }
}

impl<T: ValueWrite + ?Sized> ValueWrite for Box<T> {
    const KIND: TypeKind = T::KIND;
    const ELEMENT_KIND: TypeKind = T::ELEMENT_KIND;

    fn write_value<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        (**self).write_value(writer)
    }

    fn is_present(&self) -> bool {
        (**self).is_present()
    }

    fn collect_dims(dims: &mut Vec<u32>) {
        T::collect_dims(dims);
    }

    fn write_elements<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        (**self).write_elements(writer)
    }
}
