// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Alignment and primitive size arithmetic for XCDR2.

use crate::xtypes::TypeKind;

/// XCDR2 caps alignment at 4 bytes (64-bit values align to 4).
pub const XCDR2_MAX_ALIGN: usize = 4;

/// Size of a DHEADER, EMHEADER, NEXTINT or length prefix.
pub const HEADER_SIZE: usize = 4;

/// Padding needed to bring `offset` to a multiple of `alignment`.
///
/// `pad(offset, a) = (a - offset mod a) mod a`; alignments of 0 and 1 never pad.
#[inline]
pub const fn pad(offset: usize, alignment: usize) -> usize {
    if alignment <= 1 {
        0
    } else {
        (alignment - offset % alignment) % alignment
    }
}

/// Align an absolute offset up to the given boundary.
#[inline]
pub const fn align_offset(offset: usize, alignment: usize) -> usize {
    offset + pad(offset, alignment)
}

/// Effective XCDR2 alignment of a value with the given natural alignment.
#[inline]
pub const fn xcdr2_alignment(natural: usize) -> usize {
    if natural > XCDR2_MAX_ALIGN {
        XCDR2_MAX_ALIGN
    } else {
        natural
    }
}

/// Encoded width of a fixed-size kind; `None` for strings and aggregates.
#[inline]
pub const fn primitive_size(kind: TypeKind) -> Option<usize> {
    kind.fixed_size()
}

/// Encoded size of a string: length prefix, bytes, NUL terminator.
///
/// The caller aligns the length prefix to 4 first.
#[inline]
pub const fn string_size(s: &str) -> usize {
    HEADER_SIZE + s.len() + 1
}
