// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # xcdr2-layout - XCDR2 serialized size engine
//!
//! Computes the exact number of bytes a value occupies when encoded with
//! Extended CDR version 2 (OMG DDS-XTypes v1.3 Sec.7.4.3), including every
//! DHEADER, EMHEADER, NEXTINT, length prefix and padding byte, without
//! producing the bytes themselves.
//!
//! ## Quick Start
//!
//! ```rust
//! use xcdr2_layout::{serialized_size, EncodingConfig, ValueWrite};
//!
//! #[derive(ValueWrite)]
//! #[xcdr(appendable)]
//! struct Sample {
//!     flag: bool,
//!     value: f32,
//!     tag: u8,
//! }
//!
//! let report = serialized_size(&EncodingConfig::default(), &Sample { flag: true, value: 1.0, tag: 1 })?;
//! assert_eq!(report.total, 13);
//! assert_eq!(report.checkpoints, vec![13]);
//! # Ok::<(), xcdr2_layout::LayoutError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------+     +-----------------------------+
//! | static adapter          |     | reflective adapter          |
//! | #[derive(ValueWrite)]   |     | DynamicData + TypeRegistry  |
//! +------------+------------+     +--------------+--------------+
//!              |        Value Writer Protocol    |
//!              +---------------+-----------------+
//!                              v
//!               +-----------------------------+
//!               | SerializedSizeWriter        |
//!               | frames, checkpoint trace    |
//!               +--------------+--------------+
//!                              v
//!               +-----------------------------+
//!               | cdr2: alignment, headers    |
//!               +-----------------------------+
//! ```
//!
//! Both adapters emit identical protocol calls for logically equal data, so
//! a value yields the same total and checkpoint trace whichever way it is
//! represented.
//!
//! ## Modules Overview
//!
//! - [`xtypes`] - type kinds, descriptors, registry, builders
//! - [`cdr2`] - alignment arithmetic and header words
//! - [`writer`] - the Value Writer Protocol and the static adapter
//! - [`size`] - the sizing writer
//! - [`dynamic`] - reflective values and adapter
//! - [`config`] - encoding configuration

// Generated code refers to `::xcdr2_layout`, including inside this crate's tests.
extern crate self as xcdr2_layout;

pub mod cdr2;
pub mod config;
pub mod dynamic;
pub mod error;
pub mod size;
pub mod writer;
pub mod xtypes;

pub use config::{ByteOrder, EncodingConfig, EncodingVersion};
pub use dynamic::{write_dynamic, DynamicData, DynamicValue};
pub use error::{LayoutError, Result};
pub use size::{SerializedSizeWriter, SizeReport};
pub use writer::{External, MemberParam, PrimitiveValue, ValueWrite, ValueWriter};
pub use xtypes::{
    Extensibility, HashMapTypeRegistry, StructBuilder, TypeDescriptor, TypeKind, TypeRef,
    TypeRegistry, UnionBuilder,
};

/// `#[derive(ValueWrite)]` for structs, unions (enums with data) and enumerations.
pub use xcdr2_layout_codegen::ValueWrite;

/// Size a statically typed value.
pub fn serialized_size<T: ValueWrite + ?Sized>(
    config: &EncodingConfig,
    value: &T,
) -> Result<SizeReport> {
    let mut writer = SerializedSizeWriter::new(*config)?;
    value.write_value(&mut writer)?;
    writer.finish()
}

/// Size a reflective value, resolving named types through `registry`.
pub fn serialized_size_dynamic(
    config: &EncodingConfig,
    registry: &dyn TypeRegistry,
    data: &DynamicData,
) -> Result<SizeReport> {
    let mut writer = SerializedSizeWriter::new(*config)?;
    write_dynamic(data, registry, &mut writer)?;
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_size_of_leaves() {
        let config = EncodingConfig::default();
        assert_eq!(serialized_size(&config, &7u64).expect("u64").total, 8);
        assert_eq!(serialized_size(&config, "hello").expect("str").total, 10);
        let report = serialized_size(&config, &vec![String::from("a"), String::new()])
            .expect("strings");
        // DHEADER 4, length 4, "a" 6, pad 2, "" 5
        assert_eq!(report.total, 21);
        assert_eq!(report.checkpoints, vec![21]);
    }

    #[test]
    fn test_serialized_size_rejects_xcdr1() {
        let config = EncodingConfig {
            encoding_version: EncodingVersion::Xcdr1,
            ..EncodingConfig::default()
        };
        assert!(serialized_size(&config, &1u8).is_err());
    }
}
