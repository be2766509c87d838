// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reflective adapter: drives a [`ValueWriter`] from [`DynamicData`].
//!
//! Emits exactly the call sequence the static adapter emits for the
//! equivalent Rust value: aliases are resolved before kinds reach the
//! writer, nested array descriptors are flattened into one multi-dimensional
//! array, and optional members are announced with their presence.

use super::{DynamicData, DynamicValue, DynamicView};
use crate::error::{LayoutError, Result};
use crate::writer::{MemberParam, PrimitiveValue, ValueWriter};
use crate::xtypes::{
    resolve_alias, ArrayDescriptor, StructDescriptor, TypeDescriptor, TypeKind, TypeRef,
    TypeRegistry, TypeShape, UnionDescriptor,
};
use std::sync::Arc;

/// Drive `writer` over `data`, resolving named types through `registry`.
pub fn write_dynamic<W: ValueWriter + ?Sized>(
    data: &DynamicData,
    registry: &dyn TypeRegistry,
    writer: &mut W,
) -> Result<()> {
    let traversal = Traversal { registry };
    let descriptor = traversal.resolve_descriptor(data.descriptor())?;
    traversal.write(&descriptor, data.value(), writer)
}

struct Traversal<'r> {
    registry: &'r dyn TypeRegistry,
}

fn mismatch(descriptor: &TypeDescriptor, expected: &str, value: &DynamicValue) -> LayoutError {
    LayoutError::integrity(
        descriptor.display_name(),
        format!("expected {expected} value, found {}", value.variant_name()),
    )
}

impl Traversal<'_> {
    fn resolve(&self, type_ref: &TypeRef) -> Result<Arc<TypeDescriptor>> {
        resolve_alias(self.registry, type_ref)
    }

    fn resolve_descriptor(&self, descriptor: &Arc<TypeDescriptor>) -> Result<Arc<TypeDescriptor>> {
        match &descriptor.shape {
            TypeShape::Alias(target) => self.resolve(target),
            _ => Ok(Arc::clone(descriptor)),
        }
    }

    /// Write one value of a resolved (non-alias) descriptor.
    fn write<W: ValueWriter + ?Sized>(
        &self,
        descriptor: &TypeDescriptor,
        value: &DynamicValue,
        writer: &mut W,
    ) -> Result<()> {
        match &descriptor.shape {
            TypeShape::Primitive(kind) => {
                writer.write_primitive(primitive_value(descriptor, *kind, value)?)
            }
            TypeShape::String { bound } => {
                let s = value
                    .as_str()
                    .ok_or_else(|| mismatch(descriptor, "string", value))?;
                if let Some(bound) = bound {
                    if s.len() > *bound as usize {
                        return Err(LayoutError::integrity(
                            descriptor.display_name(),
                            format!("string of {} bytes exceeds bound {bound}", s.len()),
                        ));
                    }
                }
                writer.write_string(s)
            }
            TypeShape::Enum(e) => {
                let v = value
                    .enum_value()
                    .ok_or_else(|| mismatch(descriptor, "enum", value))?;
                if e.variant_by_value(v).is_none() {
                    return Err(LayoutError::integrity(
                        descriptor.display_name(),
                        format!("{v} is not an enumerator"),
                    ));
                }
                writer.write_primitive(PrimitiveValue::Enum {
                    value: v,
                    bit_bound: e.bit_bound,
                })
            }
            TypeShape::Struct(s) => self.write_struct(descriptor, s, value, writer),
            TypeShape::Union(u) => self.write_union(descriptor, u, value, writer),
            TypeShape::Sequence(seq) => {
                let DynamicValue::Sequence(items) = value else {
                    return Err(mismatch(descriptor, "sequence", value));
                };
                if let Some(bound) = seq.bound {
                    if items.len() > bound as usize {
                        return Err(LayoutError::integrity(
                            descriptor.display_name(),
                            format!("{} elements exceed bound {bound}", items.len()),
                        ));
                    }
                }
                let length = u32::try_from(items.len()).map_err(|_| {
                    LayoutError::integrity(descriptor.display_name(), "length exceeds u32")
                })?;
                let element = self.resolve(&seq.element)?;
                writer.begin_sequence(element.kind())?;
                writer.write_length(length)?;
                for item in items {
                    self.write(&element, item, writer)?;
                }
                writer.end_sequence()
            }
            TypeShape::Array(arr) => self.write_array(descriptor, arr, value, writer),
            TypeShape::Alias(target) => {
                let target = self.resolve(target)?;
                self.write(&target, value, writer)
            }
        }
    }

    fn write_struct<W: ValueWriter + ?Sized>(
        &self,
        descriptor: &TypeDescriptor,
        s: &StructDescriptor,
        value: &DynamicValue,
        writer: &mut W,
    ) -> Result<()> {
        let DynamicValue::Struct(fields) = value else {
            return Err(mismatch(descriptor, "struct", value));
        };
        if let Some(unknown) = fields.keys().find(|name| s.member(name).is_none()) {
            return Err(LayoutError::integrity(
                descriptor.display_name(),
                format!("value has no member named {unknown}"),
            ));
        }

        let view = DynamicView::new(descriptor, value);
        writer.begin_struct(s.extensibility)?;
        for index in 0..view.member_count() {
            let Some(member) = view.member_at(index) else {
                break;
            };
            let member_type = self.resolve(member.type_ref)?;
            let present = member.is_present();
            if !present && !member.optional {
                return Err(LayoutError::integrity(
                    descriptor.display_name(),
                    format!("missing value for member {}", member.name),
                ));
            }

            let mut param = MemberParam::new(member.id, member_type.kind());
            if member.key {
                param = param.key();
            }
            if member.optional {
                param = param.optional(present);
            }
            writer.begin_struct_member(param)?;
            match member.value {
                Some(v) if present => self.write(&member_type, v, writer)?,
                _ => writer.write_absent_value()?,
            }
            writer.end_struct_member()?;
        }
        writer.end_struct()
    }

    fn write_union<W: ValueWriter + ?Sized>(
        &self,
        descriptor: &TypeDescriptor,
        u: &UnionDescriptor,
        value: &DynamicValue,
        writer: &mut W,
    ) -> Result<()> {
        let DynamicValue::Union {
            discriminator,
            value: member_value,
        } = value
        else {
            return Err(mismatch(descriptor, "union", value));
        };

        let disc_type = self.resolve(&u.discriminator)?;
        let disc = match &disc_type.shape {
            TypeShape::Enum(e) => {
                let v = i32::try_from(*discriminator)
                    .ok()
                    .filter(|v| e.variant_by_value(*v).is_some())
                    .ok_or_else(|| {
                        LayoutError::integrity(
                            descriptor.display_name(),
                            format!("discriminator {discriminator} is not an enumerator"),
                        )
                    })?;
                PrimitiveValue::Enum {
                    value: v,
                    bit_bound: e.bit_bound,
                }
            }
            _ => PrimitiveValue::from_discriminator(disc_type.kind(), *discriminator)?,
        };

        let view = DynamicView::new(descriptor, value);
        writer.begin_union(u.extensibility)?;
        writer.write_discriminator(disc)?;
        match (view.member_at(0), member_value) {
            (Some(member), Some(v)) => {
                let member_type = self.resolve(member.type_ref)?;
                writer.begin_union_member(MemberParam::new(member.id, member_type.kind()))?;
                self.write(&member_type, v, writer)?;
                writer.end_union_member()?;
            }
            (Some(member), None) => {
                return Err(LayoutError::integrity(
                    descriptor.display_name(),
                    format!("discriminator {discriminator} selects {} but no value", member.name),
                ))
            }
            (None, Some(_)) => {
                return Err(LayoutError::integrity(
                    descriptor.display_name(),
                    format!("discriminator {discriminator} selects no member"),
                ))
            }
            (None, None) => {}
        }
        writer.end_union()
    }

    fn write_array<W: ValueWriter + ?Sized>(
        &self,
        descriptor: &TypeDescriptor,
        arr: &ArrayDescriptor,
        value: &DynamicValue,
        writer: &mut W,
    ) -> Result<()> {
        if !matches!(value, DynamicValue::Array(_)) {
            return Err(mismatch(descriptor, "array", value));
        }

        // Arrays of arrays are one multi-dimensional array.
        let mut dims = arr.dims.clone();
        let mut element = self.resolve(&arr.element)?;
        while let TypeShape::Array(inner) = &element.shape {
            dims.extend_from_slice(&inner.dims);
            let next = self.resolve(&inner.element)?;
            element = next;
        }

        let mut items = Vec::new();
        flatten(value, &mut items);
        let expected = dims
            .iter()
            .try_fold(1u64, |acc, d| acc.checked_mul(u64::from(*d)))
            .unwrap_or(u64::MAX);
        if items.len() as u64 != expected {
            return Err(LayoutError::integrity(
                descriptor.display_name(),
                format!("{} elements for dimensions {dims:?}", items.len()),
            ));
        }

        writer.begin_array(element.kind(), &dims)?;
        for item in items {
            self.write(&element, item, writer)?;
        }
        writer.end_array()
    }
}

/// Collect array leaves outer to inner, accepting flat or nested layouts.
fn flatten<'v>(value: &'v DynamicValue, out: &mut Vec<&'v DynamicValue>) {
    match value {
        DynamicValue::Array(items) => {
            for item in items {
                flatten(item, out);
            }
        }
        other => out.push(other),
    }
}

fn primitive_value(
    descriptor: &TypeDescriptor,
    kind: TypeKind,
    value: &DynamicValue,
) -> Result<PrimitiveValue> {
    use DynamicValue as V;
    Ok(match (kind, value) {
        (TypeKind::Boolean, V::Bool(v)) => PrimitiveValue::Bool(*v),
        (TypeKind::Byte, V::U8(v)) => PrimitiveValue::Byte(*v),
        (TypeKind::UInt8, V::U8(v)) => PrimitiveValue::UInt8(*v),
        (TypeKind::Int8, V::I8(v)) => PrimitiveValue::Int8(*v),
        (TypeKind::Int16, V::I16(v)) => PrimitiveValue::Int16(*v),
        (TypeKind::UInt16, V::U16(v)) => PrimitiveValue::UInt16(*v),
        (TypeKind::Int32, V::I32(v)) => PrimitiveValue::Int32(*v),
        (TypeKind::UInt32, V::U32(v)) => PrimitiveValue::UInt32(*v),
        (TypeKind::Int64, V::I64(v)) => PrimitiveValue::Int64(*v),
        (TypeKind::UInt64, V::U64(v)) => PrimitiveValue::UInt64(*v),
        (TypeKind::Float32, V::F32(v)) => PrimitiveValue::Float32(*v),
        (TypeKind::Float64, V::F64(v)) => PrimitiveValue::Float64(*v),
        (TypeKind::Char8, V::Char(v)) => PrimitiveValue::Char8(*v),
        (kind, value) if kind.is_primitive() => {
            return Err(mismatch(descriptor, &format!("{kind:?}"), value))
        }
        (kind, _) => {
            return Err(LayoutError::integrity(
                descriptor.display_name(),
                format!("{kind:?} is not a primitive kind"),
            ))
        }
    })
}
