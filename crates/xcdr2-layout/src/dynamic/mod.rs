// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reflective values and the reflective traversal adapter.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use xcdr2_layout::dynamic::{write_dynamic, DynamicData, DynamicValue};
//! use xcdr2_layout::{Extensibility, HashMapTypeRegistry, SerializedSizeWriter, StructBuilder, TypeKind, TypeRef};
//!
//! let point = StructBuilder::new("Point", Extensibility::Appendable)
//!     .member("x", TypeRef::primitive(TypeKind::Int32))
//!     .member("y", TypeRef::primitive(TypeKind::Int32))
//!     .build();
//! let data = DynamicData::new(
//!     Arc::new(point),
//!     DynamicValue::from_fields([("x", 1i32.into()), ("y", 2i32.into())]),
//! );
//!
//! let mut writer = SerializedSizeWriter::default();
//! write_dynamic(&data, &HashMapTypeRegistry::new(), &mut writer)?;
//! assert_eq!(writer.serialized_size()?, 12);
//! # Ok::<(), xcdr2_layout::LayoutError>(())
//! ```

mod data;
mod traverse;
mod value;

pub use data::{DynamicData, DynamicView, MemberView};
pub use traverse::write_dynamic;
pub use value::DynamicValue;
