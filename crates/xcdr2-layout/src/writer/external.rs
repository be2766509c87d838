// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `@external` member wrapper (XTypes v1.3 Sec.7.5.1.2.3.2, simplified).
//!
//! Differences from the IDL mapping:
//! - unique ownership instead of shared ownership
//! - a default constructed `External<T>` holds `T::default()`, never empty
//! - constructible and assignable from a `T`, which is moved in
//!
//! Useful for tree-like (recursive) structures.

use super::{ValueWrite, ValueWriter};
use crate::error::Result;
use crate::xtypes::TypeKind;
use std::ops::{Deref, DerefMut};

/// Exclusively owned, deep-copied nested value.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct External<T>(Box<T>);

impl<T> External<T> {
    pub fn new(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Replace the pointee.
    pub fn set(&mut self, value: T) {
        *self.0 = value;
    }

    pub fn get(&self) -> &T {
        &self.0
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.0
    }

    pub fn into_inner(self) -> T {
        *self.0
    }
}

impl<T> From<T> for External<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> Deref for External<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for External<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: ValueWrite> ValueWrite for External<T> {
    const KIND: TypeKind = T::KIND;
    const ELEMENT_KIND: TypeKind = T::ELEMENT_KIND;

    fn write_value<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        self.0.write_value(writer)
    }

    fn is_present(&self) -> bool {
        self.0.is_present()
    }

    fn collect_dims(dims: &mut Vec<u32>) {
        T::collect_dims(dims);
    }

    fn write_elements<W: ValueWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        self.0.write_elements(writer)
    }
}
