// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XTypes v1.3 type schema as consumed by the layout engine.
//!
//! # Architecture
//!
//! - **TypeKind / Extensibility**: the per-node facts the engine reacts to
//! - **TypeDescriptor**: immutable, shareable schema (struct, union, sequence,
//!   array, enum, alias, primitive, string)
//! - **TypeRegistry**: read-only lookup by type identity, used to resolve
//!   `TypeRef::Named` references (recursive and shared types)
//! - **Builders**: fluent construction with IDL default member ids
//!
//! # References
//! - DDS-XTYPES formal/2020-06-01, Section 7.2 (Type System)

mod builder;
mod descriptor;
mod registry;
mod type_kind;

pub use builder::{StructBuilder, UnionBuilder};
pub use descriptor::{
    ArrayDescriptor, EnumDescriptor, EnumVariant, MemberDescriptor, SequenceDescriptor,
    StructDescriptor, TypeDescriptor, TypeRef, TypeShape, UnionCase, UnionDescriptor,
};
pub use registry::{resolve, resolve_alias, HashMapTypeRegistry, TypeRegistry};
pub use type_kind::{enum_width, Extensibility, TypeKind};
