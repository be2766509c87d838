// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XCDR2 structural headers (XTypes v1.3 Sec.7.4.3.4).
//!
//! Wire layout:
//! - DHEADER: `u32` byte length of the aggregate content after the header
//! - EMHEADER1: `M_FLAG(1) | LC(3) | MemberId(28)`
//! - NEXTINT: `u32` explicit member length, present for LC 4

use super::align::HEADER_SIZE;
use crate::config::ByteOrder;
use crate::error::{LayoutError, Result};
use crate::xtypes::TypeKind;

/// Largest member id representable in an EMHEADER.
pub const MAX_MEMBER_ID: u32 = 0x0fff_ffff;

const M_FLAG: u32 = 0x8000_0000;

/// Length code of an EMHEADER.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LengthCode {
    Lc1 = 0,
    Lc2 = 1,
    Lc4 = 2,
    Lc8 = 3,
    /// Length given by the NEXTINT that follows the EMHEADER.
    NextInt = 4,
    /// NEXTINT reused as the member's own length prefix (4 * NEXTINT .. ).
    NextIntLength = 5,
    NextIntLength4 = 6,
    NextIntLength8 = 7,
}

impl LengthCode {
    /// Length code chosen for a member of the given kind.
    ///
    /// Fixed-width members of 1/2/4/8 bytes encode their size in the code;
    /// everything else is followed by a NEXTINT.
    pub const fn for_kind(kind: TypeKind) -> Self {
        match kind.fixed_size() {
            Some(1) => Self::Lc1,
            Some(2) => Self::Lc2,
            Some(4) => Self::Lc4,
            Some(8) => Self::Lc8,
            _ => Self::NextInt,
        }
    }

    /// Whether an explicit NEXTINT word follows the EMHEADER.
    pub const fn has_next_int(self) -> bool {
        !matches!(self, Self::Lc1 | Self::Lc2 | Self::Lc4 | Self::Lc8)
    }

    /// Bytes this code adds in front of the member content.
    pub const fn framing_size(self) -> usize {
        if self.has_next_int() {
            2 * HEADER_SIZE
        } else {
            HEADER_SIZE
        }
    }

    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0x7 {
            0 => Self::Lc1,
            1 => Self::Lc2,
            2 => Self::Lc4,
            3 => Self::Lc8,
            4 => Self::NextInt,
            5 => Self::NextIntLength,
            6 => Self::NextIntLength4,
            _ => Self::NextIntLength8,
        }
    }
}

/// Extended member header of a mutable aggregate member.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EmHeader {
    pub must_understand: bool,
    pub length_code: LengthCode,
    pub member_id: u32,
}

impl EmHeader {
    pub fn new(member_id: u32, length_code: LengthCode, must_understand: bool) -> Result<Self> {
        if member_id > MAX_MEMBER_ID {
            return Err(LayoutError::integrity(
                format!("member {member_id:#x}"),
                "member id exceeds 28 bits",
            ));
        }
        Ok(Self {
            must_understand,
            length_code,
            member_id,
        })
    }

    pub const fn to_u32(self) -> u32 {
        let m = if self.must_understand { M_FLAG } else { 0 };
        m | (self.length_code.as_u32() << 28) | (self.member_id & MAX_MEMBER_ID)
    }

    pub const fn from_u32(word: u32) -> Self {
        Self {
            must_understand: word & M_FLAG != 0,
            length_code: LengthCode::from_bits(word >> 28),
            member_id: word & MAX_MEMBER_ID,
        }
    }

    pub fn to_bytes(self, byte_order: ByteOrder) -> [u8; 4] {
        word_bytes(self.to_u32(), byte_order)
    }
}

/// Delimiter header: byte length of the content that follows it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dheader(pub u32);

impl Dheader {
    /// DHEADER for a node whose reported size (header included) is `reported`.
    pub fn for_reported_size(reported: usize) -> Result<Self> {
        let content = reported.checked_sub(HEADER_SIZE).ok_or_else(|| {
            LayoutError::integrity("DHEADER", "reported size smaller than the header")
        })?;
        u32::try_from(content)
            .map(Self)
            .map_err(|_| LayoutError::integrity("DHEADER", "content exceeds u32::MAX"))
    }

    pub fn to_bytes(self, byte_order: ByteOrder) -> [u8; 4] {
        word_bytes(self.0, byte_order)
    }
}

fn word_bytes(word: u32, byte_order: ByteOrder) -> [u8; 4] {
    match byte_order {
        ByteOrder::Big => word.to_be_bytes(),
        ByteOrder::Little => word.to_le_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_code_selection() {
        assert_eq!(LengthCode::for_kind(TypeKind::Boolean), LengthCode::Lc1);
        assert_eq!(LengthCode::for_kind(TypeKind::Int16), LengthCode::Lc2);
        assert_eq!(LengthCode::for_kind(TypeKind::Float32), LengthCode::Lc4);
        assert_eq!(LengthCode::for_kind(TypeKind::UInt64), LengthCode::Lc8);
        assert_eq!(LengthCode::for_kind(TypeKind::ENUM32), LengthCode::Lc4);
        assert_eq!(
            LengthCode::for_kind(TypeKind::Enum { bit_bound: 8 }),
            LengthCode::Lc1
        );
        assert_eq!(LengthCode::for_kind(TypeKind::String8), LengthCode::NextInt);
        assert_eq!(LengthCode::for_kind(TypeKind::Struct), LengthCode::NextInt);
        assert_eq!(LengthCode::for_kind(TypeKind::Sequence), LengthCode::NextInt);
    }

    #[test]
    fn test_framing_size() {
        assert_eq!(LengthCode::Lc2.framing_size(), 4);
        assert_eq!(LengthCode::NextInt.framing_size(), 8);
        assert!(LengthCode::from_bits(6).has_next_int());
    }

    #[test]
    fn test_emheader_word_layout() {
        let em = EmHeader::new(0x0e81_ab0a, LengthCode::NextIntLength, false).expect("valid id");
        assert_eq!(em.to_u32(), 0x5e81_ab0a);

        let em = EmHeader::new(3, LengthCode::Lc4, true).expect("valid id");
        assert_eq!(em.to_u32(), 0xa000_0003);
        assert_eq!(EmHeader::from_u32(0xa000_0003), em);
        assert_eq!(em.to_bytes(ByteOrder::Big), [0xa0, 0x00, 0x00, 0x03]);
        assert_eq!(em.to_bytes(ByteOrder::Little), [0x03, 0x00, 0x00, 0xa0]);
    }

    #[test]
    fn test_emheader_rejects_wide_member_id() {
        assert!(EmHeader::new(0x1000_0000, LengthCode::Lc1, false).is_err());
        assert!(EmHeader::new(MAX_MEMBER_ID, LengthCode::Lc1, false).is_ok());
    }

    #[test]
    fn test_dheader_excludes_itself() {
        // Appendable {bool, float, octet} reports 13 bytes, DHEADER carries 9.
        let dh = Dheader::for_reported_size(13).expect("valid");
        assert_eq!(dh, Dheader(9));
        assert_eq!(dh.to_bytes(ByteOrder::Big), [0, 0, 0, 9]);
        assert!(Dheader::for_reported_size(3).is_err());
    }
}
