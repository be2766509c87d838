// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encoding configuration recognized by the layout engine.
//!
//! # Example YAML
//!
//! ```yaml
//! # encoding.yaml
//! byte_order: big
//! encoding_version: xcdr2
//! ```
//!
//! Byte order never changes a computed size; it only selects how header
//! words ([`Dheader`](crate::cdr2::Dheader), [`EmHeader`](crate::cdr2::EmHeader))
//! are rendered.

use crate::error::{LayoutError, Result};
use std::fmt;

/// Byte order of the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "config-loaders",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ByteOrder {
    Big,
    #[default]
    Little,
}

/// Extended CDR encoding version.
///
/// Only XCDR2 is supported; `Xcdr1` exists so configuration documents naming
/// it can be parsed and rejected with a precise error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "config-loaders",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum EncodingVersion {
    Xcdr1,
    #[default]
    Xcdr2,
}

impl fmt::Display for EncodingVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xcdr1 => write!(f, "xcdr1"),
            Self::Xcdr2 => write!(f, "xcdr2"),
        }
    }
}

/// Encoding parameters for one layout computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "config-loaders",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct EncodingConfig {
    pub byte_order: ByteOrder,
    pub encoding_version: EncodingVersion,
}

impl EncodingConfig {
    /// XCDR2 with the given byte order.
    #[must_use]
    pub const fn xcdr2(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            encoding_version: EncodingVersion::Xcdr2,
        }
    }

    /// XCDR2, big endian.
    #[must_use]
    pub const fn xcdr2_be() -> Self {
        Self::xcdr2(ByteOrder::Big)
    }

    /// XCDR2, little endian.
    #[must_use]
    pub const fn xcdr2_le() -> Self {
        Self::xcdr2(ByteOrder::Little)
    }

    /// Reject encodings the engine does not implement.
    pub fn validate(&self) -> Result<()> {
        match self.encoding_version {
            EncodingVersion::Xcdr2 => Ok(()),
            other => Err(LayoutError::UnsupportedEncoding {
                version: other.to_string(),
            }),
        }
    }

    /// Parse and validate a YAML configuration document.
    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| LayoutError::Config {
            reason: e.to_string(),
        })?;
        if let Err(e) = config.validate() {
            log::warn!(
                "[xcdr2::config] rejected encoding_version={}",
                config.encoding_version
            );
            return Err(e);
        }
        Ok(config)
    }

    /// Load and validate a YAML configuration file.
    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        log::debug!(
            "[xcdr2::config] loading encoding config from {}",
            path.as_ref().display()
        );
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_xcdr2_little_endian() {
        let config = EncodingConfig::default();
        assert_eq!(config, EncodingConfig::xcdr2_le());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_xcdr1_rejected() {
        let config = EncodingConfig {
            byte_order: ByteOrder::Big,
            encoding_version: EncodingVersion::Xcdr1,
        };
        match config.validate() {
            Err(LayoutError::UnsupportedEncoding { version }) => assert_eq!(version, "xcdr1"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn test_yaml_parsing() {
        let config = EncodingConfig::from_yaml_str("byte_order: big\nencoding_version: xcdr2\n")
            .expect("valid config");
        assert_eq!(config, EncodingConfig::xcdr2_be());

        let config = EncodingConfig::from_yaml_str("byte_order: little\n").expect("defaults");
        assert_eq!(config.encoding_version, EncodingVersion::Xcdr2);
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn test_yaml_rejects_unknown_fields_and_values() {
        assert!(matches!(
            EncodingConfig::from_yaml_str("byte_order: middle\n"),
            Err(LayoutError::Config { .. })
        ));
        assert!(matches!(
            EncodingConfig::from_yaml_str("alignment: 8\n"),
            Err(LayoutError::Config { .. })
        ));
        assert!(matches!(
            EncodingConfig::from_yaml_str("encoding_version: xcdr1\n"),
            Err(LayoutError::UnsupportedEncoding { .. })
        ));
    }
}
