// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XCDR2 encoding arithmetic: alignment, primitive sizes and header words.
//!
//! # References
//! - OMG DDS-XTypes v1.3, Section 7.4.3 (Extended CDR Representation, version 2)

mod align;
mod headers;

pub use align::{
    align_offset, pad, primitive_size, string_size, xcdr2_alignment, HEADER_SIZE,
    XCDR2_MAX_ALIGN,
};
pub use headers::{Dheader, EmHeader, LengthCode, MAX_MEMBER_ID};
