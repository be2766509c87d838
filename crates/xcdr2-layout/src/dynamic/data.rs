// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DynamicData: a value paired with its type descriptor.
//!
//! Exposes the generic member-iteration capability the reflective adapter
//! drives: `member_count`, `member_at` and `active_union_member`.

use super::DynamicValue;
use crate::error::Result;
use crate::xtypes::{
    resolve_alias, TypeDescriptor, TypeKind, TypeRef, TypeRegistry, TypeShape, UnionCase,
};
use std::sync::Arc;

/// Owned value plus descriptor.
#[derive(Debug, Clone)]
pub struct DynamicData {
    descriptor: Arc<TypeDescriptor>,
    value: DynamicValue,
}

impl DynamicData {
    pub fn new(descriptor: Arc<TypeDescriptor>, value: DynamicValue) -> Self {
        Self { descriptor, value }
    }

    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn value(&self) -> &DynamicValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut DynamicValue {
        &mut self.value
    }

    pub fn into_value(self) -> DynamicValue {
        self.value
    }

    /// Borrowed view of the root.
    pub fn view(&self) -> DynamicView<'_> {
        DynamicView::new(&self.descriptor, &self.value)
    }

    pub fn member_count(&self) -> usize {
        self.view().member_count()
    }

    pub fn member_at(&self, index: usize) -> Option<MemberView<'_>> {
        self.view().member_at(index)
    }

    pub fn active_union_member(&self) -> Option<u32> {
        self.view().active_union_member()
    }
}

/// Borrowed descriptor/value pair, used for nested aggregates.
#[derive(Debug, Clone, Copy)]
pub struct DynamicView<'a> {
    descriptor: &'a TypeDescriptor,
    value: &'a DynamicValue,
}

impl<'a> DynamicView<'a> {
    pub fn new(descriptor: &'a TypeDescriptor, value: &'a DynamicValue) -> Self {
        Self { descriptor, value }
    }

    pub fn descriptor(&self) -> &'a TypeDescriptor {
        self.descriptor
    }

    pub fn value(&self) -> &'a DynamicValue {
        self.value
    }

    /// Declared members of a struct, or 1/0 for a union with/without an
    /// active member; 0 for every other shape.
    pub fn member_count(&self) -> usize {
        match &self.descriptor.shape {
            TypeShape::Struct(s) => s.members.len(),
            TypeShape::Union(_) => usize::from(self.active_case().is_some()),
            _ => 0,
        }
    }

    /// Member at `index` in declaration order (the active member for unions).
    pub fn member_at(&self, index: usize) -> Option<MemberView<'a>> {
        match &self.descriptor.shape {
            TypeShape::Struct(s) => {
                let member = s.members.get(index)?;
                Some(MemberView {
                    id: member.id,
                    name: &member.name,
                    type_ref: &member.type_ref,
                    optional: member.optional,
                    key: member.key,
                    value: self.value.get_field(&member.name),
                })
            }
            TypeShape::Union(_) if index == 0 => {
                let case = self.active_case()?;
                Some(MemberView {
                    id: case.id,
                    name: &case.name,
                    type_ref: &case.type_ref,
                    optional: false,
                    key: false,
                    value: self.value.union_value(),
                })
            }
            _ => None,
        }
    }

    /// Id of the union member selected by the discriminator.
    pub fn active_union_member(&self) -> Option<u32> {
        self.active_case().map(|case| case.id)
    }

    pub(crate) fn active_case(&self) -> Option<&'a UnionCase> {
        let union = self.descriptor.as_union()?;
        let discriminator = self.value.union_discriminator()?;
        union.case_by_discriminator(discriminator)
    }
}

/// One member as seen through a [`DynamicView`].
#[derive(Debug, Clone, Copy)]
pub struct MemberView<'a> {
    pub id: u32,
    pub name: &'a str,
    pub type_ref: &'a TypeRef,
    pub optional: bool,
    pub key: bool,
    /// `None` when the value carries no entry for this member.
    pub value: Option<&'a DynamicValue>,
}

impl MemberView<'_> {
    /// Present unless missing or [`DynamicValue::Null`].
    pub fn is_present(&self) -> bool {
        self.value.is_some_and(|v| !v.is_null())
    }

    /// Resolved kind of the member's type (aliases followed).
    pub fn kind(&self, registry: &dyn TypeRegistry) -> Result<TypeKind> {
        Ok(resolve_alias(registry, self.type_ref)?.kind())
    }
}
