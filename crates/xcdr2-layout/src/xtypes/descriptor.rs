// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the read-only schema consumed by traversal adapters.

use super::{Extensibility, TypeKind};
use std::sync::Arc;

/// Reference from one descriptor to another.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// Descriptor owned in place.
    Inline(Arc<TypeDescriptor>),
    /// By-identity reference resolved through a [`TypeRegistry`](super::TypeRegistry)
    /// at traversal time. Required for recursive types.
    Named(String),
}

impl TypeRef {
    /// Anonymous primitive.
    ///
    /// `kind` should be a primitive kind; other kinds are rejected when the
    /// descriptor is traversed.
    pub fn primitive(kind: TypeKind) -> Self {
        Self::Inline(Arc::new(TypeDescriptor::primitive("", kind)))
    }

    /// Anonymous unbounded string.
    pub fn string() -> Self {
        Self::Inline(Arc::new(TypeDescriptor::new(
            "",
            TypeShape::String { bound: None },
        )))
    }

    /// Anonymous bounded string.
    pub fn bounded_string(bound: u32) -> Self {
        Self::Inline(Arc::new(TypeDescriptor::new(
            "",
            TypeShape::String { bound: Some(bound) },
        )))
    }

    /// Anonymous unbounded sequence.
    pub fn sequence(element: TypeRef) -> Self {
        Self::Inline(Arc::new(TypeDescriptor::new(
            "",
            TypeShape::Sequence(SequenceDescriptor {
                element,
                bound: None,
            }),
        )))
    }

    /// Anonymous array; `dims` lists dimensions outer to inner.
    pub fn array(element: TypeRef, dims: impl Into<Vec<u32>>) -> Self {
        Self::Inline(Arc::new(TypeDescriptor::new(
            "",
            TypeShape::Array(ArrayDescriptor {
                element,
                dims: dims.into(),
            }),
        )))
    }

    /// Reference to a registered type by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wrap an existing descriptor.
    pub fn inline(descriptor: TypeDescriptor) -> Self {
        Self::Inline(Arc::new(descriptor))
    }
}

impl From<Arc<TypeDescriptor>> for TypeRef {
    fn from(descriptor: Arc<TypeDescriptor>) -> Self {
        Self::Inline(descriptor)
    }
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name (empty for anonymous types).
    pub name: String,
    pub shape: TypeShape,
}

/// Shape of a type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    Primitive(TypeKind),
    String { bound: Option<u32> },
    Enum(EnumDescriptor),
    Struct(StructDescriptor),
    Union(UnionDescriptor),
    Sequence(SequenceDescriptor),
    Array(ArrayDescriptor),
    Alias(TypeRef),
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    pub fn primitive(name: impl Into<String>, kind: TypeKind) -> Self {
        Self::new(name, TypeShape::Primitive(kind))
    }

    pub fn alias(name: impl Into<String>, target: TypeRef) -> Self {
        Self::new(name, TypeShape::Alias(target))
    }

    pub fn enumeration(name: impl Into<String>, descriptor: EnumDescriptor) -> Self {
        Self::new(name, TypeShape::Enum(descriptor))
    }

    /// Kind of this descriptor; aliases report `Alias`.
    pub fn kind(&self) -> TypeKind {
        match &self.shape {
            TypeShape::Primitive(kind) => *kind,
            TypeShape::String { .. } => TypeKind::String8,
            TypeShape::Enum(e) => TypeKind::Enum {
                bit_bound: e.bit_bound,
            },
            TypeShape::Struct(_) => TypeKind::Struct,
            TypeShape::Union(_) => TypeKind::Union,
            TypeShape::Sequence(_) => TypeKind::Sequence,
            TypeShape::Array(_) => TypeKind::Array,
            TypeShape::Alias(_) => TypeKind::Alias,
        }
    }

    /// Name used in diagnostics.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "<anonymous>"
        } else {
            &self.name
        }
    }

    pub fn as_struct(&self) -> Option<&StructDescriptor> {
        match &self.shape {
            TypeShape::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionDescriptor> {
        match &self.shape {
            TypeShape::Union(u) => Some(u),
            _ => None,
        }
    }
}

/// Struct type: extensibility plus ordered members.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDescriptor {
    pub extensibility: Extensibility,
    pub members: Vec<MemberDescriptor>,
}

impl StructDescriptor {
    /// Member by name.
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Struct member.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDescriptor {
    pub id: u32,
    pub name: String,
    pub type_ref: TypeRef,
    /// `@optional`
    pub optional: bool,
    /// `@key` (sets the must-understand flag)
    pub key: bool,
}

impl MemberDescriptor {
    pub fn new(id: u32, name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            id,
            name: name.into(),
            type_ref,
            optional: false,
            key: false,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }
}

/// Union type: discriminator plus cases.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionDescriptor {
    pub extensibility: Extensibility,
    /// Must resolve to a primitive integer, boolean, char or enum.
    pub discriminator: TypeRef,
    pub cases: Vec<UnionCase>,
}

impl UnionDescriptor {
    /// Case selected by a discriminator value, falling back to the default case.
    pub fn case_by_discriminator(&self, value: i64) -> Option<&UnionCase> {
        self.cases
            .iter()
            .find(|c| c.labels.contains(&value))
            .or_else(|| self.cases.iter().find(|c| c.is_default))
    }
}

/// Union case.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionCase {
    pub id: u32,
    pub name: String,
    pub labels: Vec<i64>,
    pub is_default: bool,
    pub type_ref: TypeRef,
}

impl UnionCase {
    pub fn new(id: u32, name: impl Into<String>, labels: Vec<i64>, type_ref: TypeRef) -> Self {
        Self {
            id,
            name: name.into(),
            labels,
            is_default: false,
            type_ref,
        }
    }

    /// Mark as the `default:` case.
    #[must_use]
    pub fn default_case(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// Sequence type.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDescriptor {
    pub element: TypeRef,
    /// Maximum length (None = unbounded).
    pub bound: Option<u32>,
}

/// Array type.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    pub element: TypeRef,
    /// Dimensions, outer to inner.
    pub dims: Vec<u32>,
}

impl ArrayDescriptor {
    /// Total number of elements across all dimensions.
    pub fn element_count(&self) -> u64 {
        self.dims.iter().map(|d| u64::from(*d)).product()
    }
}

/// Enumeration type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    pub bit_bound: u16,
    pub variants: Vec<EnumVariant>,
}

impl EnumDescriptor {
    /// 32-bit enumeration.
    pub fn new(variants: Vec<EnumVariant>) -> Self {
        Self {
            bit_bound: TypeKind::DEFAULT_ENUM_BIT_BOUND,
            variants,
        }
    }

    #[must_use]
    pub fn with_bit_bound(mut self, bit_bound: u16) -> Self {
        self.bit_bound = bit_bound;
        self
    }

    /// Variant by value.
    pub fn variant_by_value(&self, value: i32) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.value == value)
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: String,
    pub value: i32,
}

impl EnumVariant {
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_kind() {
        let seq = TypeDescriptor::new(
            "Shorts",
            TypeShape::Sequence(SequenceDescriptor {
                element: TypeRef::primitive(TypeKind::Int16),
                bound: None,
            }),
        );
        assert_eq!(seq.kind(), TypeKind::Sequence);

        let e = TypeDescriptor::enumeration(
            "Small",
            EnumDescriptor::new(vec![EnumVariant::new("A", 0)]).with_bit_bound(8),
        );
        assert_eq!(e.kind(), TypeKind::Enum { bit_bound: 8 });
        assert_eq!(TypeDescriptor::alias("X", TypeRef::named("Y")).kind(), TypeKind::Alias);
    }

    #[test]
    fn test_union_case_selection() {
        let union = UnionDescriptor {
            extensibility: Extensibility::Final,
            discriminator: TypeRef::primitive(TypeKind::Int32),
            cases: vec![
                UnionCase::new(1, "a", vec![0, 1], TypeRef::primitive(TypeKind::Int16)),
                UnionCase::new(2, "b", vec![2], TypeRef::string()),
                UnionCase::new(3, "other", vec![], TypeRef::primitive(TypeKind::Byte))
                    .default_case(),
            ],
        };
        assert_eq!(union.case_by_discriminator(1).map(|c| c.id), Some(1));
        assert_eq!(union.case_by_discriminator(2).map(|c| c.id), Some(2));
        assert_eq!(union.case_by_discriminator(42).map(|c| c.id), Some(3));
    }

    #[test]
    fn test_array_element_count() {
        let arr = ArrayDescriptor {
            element: TypeRef::primitive(TypeKind::Int16),
            dims: vec![2, 3, 4],
        };
        assert_eq!(arr.element_count(), 24);
    }
}
