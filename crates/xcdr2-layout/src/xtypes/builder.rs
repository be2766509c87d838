// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builders for struct and union descriptors.
//!
//! Member ids follow the IDL default: sequential from 0 in declaration
//! order, and an explicit id restarts the sequence after itself. Union case
//! ids start at 1; id 0 belongs to the discriminator.

use super::{
    Extensibility, MemberDescriptor, StructDescriptor, TypeDescriptor, TypeRef, TypeShape,
    UnionCase, UnionDescriptor,
};

/// Builder for struct descriptors.
#[derive(Debug)]
pub struct StructBuilder {
    name: String,
    extensibility: Extensibility,
    members: Vec<MemberDescriptor>,
    next_id: u32,
}

impl StructBuilder {
    pub fn new(name: impl Into<String>, extensibility: Extensibility) -> Self {
        Self {
            name: name.into(),
            extensibility,
            members: Vec::new(),
            next_id: 0,
        }
    }

    /// Add a member with the next sequential id.
    #[must_use]
    pub fn member(self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        let id = self.next_id;
        self.push(MemberDescriptor::new(id, name, type_ref))
    }

    /// Add a member with an explicit id (`@id`).
    #[must_use]
    pub fn member_with_id(self, name: impl Into<String>, type_ref: TypeRef, id: u32) -> Self {
        self.push(MemberDescriptor::new(id, name, type_ref))
    }

    /// Add an `@optional` member.
    #[must_use]
    pub fn optional_member(self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        let id = self.next_id;
        self.push(MemberDescriptor::new(id, name, type_ref).optional())
    }

    /// Add a `@key` member.
    #[must_use]
    pub fn key_member(self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        let id = self.next_id;
        self.push(MemberDescriptor::new(id, name, type_ref).key())
    }

    fn push(mut self, member: MemberDescriptor) -> Self {
        self.next_id = member.id.wrapping_add(1);
        self.members.push(member);
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::new(
            self.name,
            TypeShape::Struct(StructDescriptor {
                extensibility: self.extensibility,
                members: self.members,
            }),
        )
    }
}

/// Builder for union descriptors.
#[derive(Debug)]
pub struct UnionBuilder {
    name: String,
    extensibility: Extensibility,
    discriminator: TypeRef,
    cases: Vec<UnionCase>,
    next_id: u32,
}

impl UnionBuilder {
    pub fn new(
        name: impl Into<String>,
        extensibility: Extensibility,
        discriminator: TypeRef,
    ) -> Self {
        Self {
            name: name.into(),
            extensibility,
            discriminator,
            cases: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a case selected by `labels`.
    #[must_use]
    pub fn case(mut self, name: impl Into<String>, labels: &[i64], type_ref: TypeRef) -> Self {
        let id = self.next_id;
        self.next_id = id.wrapping_add(1);
        self.cases
            .push(UnionCase::new(id, name, labels.to_vec(), type_ref));
        self
    }

    /// Add the `default:` case.
    #[must_use]
    pub fn default_case(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        let id = self.next_id;
        self.next_id = id.wrapping_add(1);
        self.cases
            .push(UnionCase::new(id, name, Vec::new(), type_ref).default_case());
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::new(
            self.name,
            TypeShape::Union(UnionDescriptor {
                extensibility: self.extensibility,
                discriminator: self.discriminator,
                cases: self.cases,
            }),
        )
    }
}
