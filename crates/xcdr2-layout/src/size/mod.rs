// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Layout engine: a [`ValueWriter`] that computes XCDR2 sizes without
//! producing bytes.
//!
//! # Layout model
//!
//! ```text
//! pos (absolute, from root start)
//!  |
//!  v   Appendable struct           Mutable member              delimited seq
//!  [DHEADER][m0][pad][m1]...   [pad][EMHEADER][NEXTINT?][v]   [DHEADER][len][e0][pad][e1]
//!  ^--------- reported ------^                  ^-- rep. --^  ^--------- reported -------^
//! ```
//!
//! Alignment is `min(natural, 4)` against the absolute position. Every
//! reported size includes the node's own DHEADER; the value carried in a
//! DHEADER is the reported size minus 4.
//!
//! # Checkpoints
//!
//! One slot per root value, per present member (and discriminator) of a
//! Mutable aggregate, and per delimited node that is not itself the value
//! of a Mutable member. Slots are listed in pre-order.
//!
//! # Misuse
//!
//! Calls out of schema order fail with [`LayoutError::ProtocolMisuse`]. After
//! any failure the writer must be [`reset`](SerializedSizeWriter::reset).

mod checkpoint;

use self::checkpoint::CheckpointTrace;
use crate::cdr2::{
    align_offset, string_size, xcdr2_alignment, EmHeader, LengthCode, HEADER_SIZE,
};
use crate::config::EncodingConfig;
use crate::error::{LayoutError, Result};
use crate::writer::{MemberParam, PrimitiveValue, ValueWriter};
use crate::xtypes::{Extensibility, TypeKind};
use std::fmt;

/// Result of a completed traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeReport {
    /// Total serialized size of the root value, in bytes.
    pub total: usize,
    /// Reported sizes in pre-order; `checkpoints[0] == total`.
    pub checkpoints: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Struct,
    Union,
    Sequence,
    Array,
    StructMember,
    UnionMember,
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Sequence => "sequence",
            Self::Array => "array",
            Self::StructMember => "struct member",
            Self::UnionMember => "union member",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
struct Frame {
    kind: FrameKind,
    extensibility: Extensibility,
    /// Position after leading alignment; reported sizes are measured from here.
    start: usize,
    slot: Option<usize>,
    /// Kind every value written directly into this frame must have.
    value_kind: Option<TypeKind>,
    values: u64,
    /// Element count for sequences (once the length is known) and arrays.
    expected: Option<u64>,
    discriminator_written: bool,
    member_begun: bool,
    /// Optional member announced as not present.
    absent: bool,
}

impl Frame {
    fn new(kind: FrameKind, start: usize, slot: Option<usize>) -> Self {
        Self {
            kind,
            extensibility: Extensibility::Final,
            start,
            slot,
            value_kind: None,
            values: 0,
            expected: None,
            discriminator_written: false,
            member_begun: false,
            absent: false,
        }
    }

    fn is_member(&self) -> bool {
        matches!(self.kind, FrameKind::StructMember | FrameKind::UnionMember)
    }
}

/// Sizing [`ValueWriter`].
///
/// One instance computes one root value; call [`reset`](Self::reset)
/// before reusing it.
#[derive(Debug, Default)]
pub struct SerializedSizeWriter {
    config: EncodingConfig,
    pos: usize,
    stack: Vec<Frame>,
    trace: CheckpointTrace,
    root_done: bool,
}

impl SerializedSizeWriter {
    /// Create a writer for the given encoding.
    ///
    /// Fails with [`LayoutError::UnsupportedEncoding`] for anything but XCDR2.
    pub fn new(config: EncodingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &EncodingConfig {
        &self.config
    }

    /// Current absolute position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Discard all state so the writer can size another value.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.stack.clear();
        self.trace.clear();
        self.root_done = false;
    }

    /// Total size of the completed root value.
    pub fn serialized_size(&self) -> Result<usize> {
        self.ensure_complete("serialized_size")?;
        Ok(self.pos)
    }

    /// Reported sizes of every checkpointed node, in pre-order.
    pub fn serialized_sizes(&self) -> Result<Vec<usize>> {
        self.ensure_complete("serialized_sizes")?;
        self.trace.sizes()
    }

    pub fn report(&self) -> Result<SizeReport> {
        Ok(SizeReport {
            total: self.serialized_size()?,
            checkpoints: self.serialized_sizes()?,
        })
    }

    /// Take the report and leave the writer reset.
    pub fn finish(&mut self) -> Result<SizeReport> {
        let report = self.report()?;
        self.reset();
        Ok(report)
    }

    fn ensure_complete(&self, operation: &'static str) -> Result<()> {
        if self.root_done {
            return Ok(());
        }
        match self.stack.last() {
            Some(frame) => Err(LayoutError::misuse(
                operation,
                format!("while a {} is open", frame.kind),
            )),
            None => Err(LayoutError::misuse(operation, "before any value was written")),
        }
    }

    fn align(&mut self, alignment: usize) {
        self.pos = align_offset(self.pos, alignment);
    }

    /// Consume the value position of the innermost frame.
    ///
    /// Returns `true` when the value is the direct value of a Mutable member,
    /// whose checkpoint slot it then shares.
    fn claim_value(&mut self, operation: &'static str, kind: TypeKind) -> Result<bool> {
        let Some(frame) = self.stack.last_mut() else {
            if self.root_done {
                return Err(LayoutError::misuse(
                    operation,
                    "after the root value completed; reset the writer first",
                ));
            }
            return Ok(false);
        };

        match frame.kind {
            FrameKind::Struct => {
                return Err(LayoutError::misuse(operation, "outside a struct member"))
            }
            FrameKind::Union => {
                return Err(LayoutError::misuse(operation, "outside the union member"))
            }
            FrameKind::StructMember | FrameKind::UnionMember => {
                if frame.absent {
                    return Err(LayoutError::misuse(operation, "for an absent member"));
                }
                if frame.values > 0 {
                    return Err(LayoutError::misuse(operation, "after the member value"));
                }
            }
            FrameKind::Sequence => match frame.expected {
                None => return Err(LayoutError::misuse(operation, "before write_length")),
                Some(expected) if frame.values >= expected => {
                    return Err(LayoutError::misuse(
                        operation,
                        format!("beyond the sequence length {expected}"),
                    ))
                }
                Some(_) => {}
            },
            FrameKind::Array => {
                let expected = frame.expected.unwrap_or(0);
                if frame.values >= expected {
                    return Err(LayoutError::misuse(
                        operation,
                        format!("beyond the array element count {expected}"),
                    ));
                }
            }
        }

        if let Some(expected_kind) = frame.value_kind {
            if expected_kind != kind {
                return Err(LayoutError::misuse(
                    operation,
                    format!("with a {kind:?} value where {expected_kind:?} is declared"),
                ));
            }
        }
        frame.values += 1;
        Ok(frame.is_member() && frame.slot.is_some())
    }

    /// Open an aggregate frame.
    fn open(
        &mut self,
        operation: &'static str,
        kind: FrameKind,
        value_kind: TypeKind,
        delimited: bool,
    ) -> Result<&mut Frame> {
        let is_root = self.stack.is_empty();
        let shares_member_slot = self.claim_value(operation, value_kind)?;
        if delimited {
            self.align(HEADER_SIZE);
        }
        let slot = (is_root || (delimited && !shares_member_slot)).then(|| self.trace.reserve());
        log::trace!(
            "[xcdr2::size] {operation} at {} delimited={delimited} slot={slot:?}",
            self.pos
        );
        let frame = Frame::new(kind, self.pos, slot);
        if delimited {
            self.pos += HEADER_SIZE;
        }
        self.stack.push(frame);
        let depth = self.stack.len() - 1;
        Ok(&mut self.stack[depth])
    }

    fn top(&mut self, operation: &'static str, kind: FrameKind) -> Result<&mut Frame> {
        match self.stack.last_mut() {
            Some(frame) if frame.kind == kind => Ok(frame),
            Some(frame) => Err(LayoutError::misuse(
                operation,
                format!("while a {} is open", frame.kind),
            )),
            None => Err(LayoutError::misuse(operation, "with no open frame")),
        }
    }

    /// Close the innermost frame, filling its checkpoint.
    fn close(&mut self, operation: &'static str) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| LayoutError::misuse(operation, "with no open frame"))?;
        let reported = self.pos - frame.start;
        if let Some(slot) = frame.slot {
            self.trace.fill(slot, reported)?;
        }
        log::trace!(
            "[xcdr2::size] {operation} at {} reported={reported} slot={:?}",
            self.pos,
            frame.slot
        );
        if self.stack.is_empty() {
            self.complete_root();
        }
        Ok(())
    }

    fn complete_root(&mut self) {
        self.root_done = true;
        log::debug!(
            "[xcdr2::size] root complete: {} bytes, {} checkpoints",
            self.pos,
            self.trace.len()
        );
    }

    /// Write a leaf value of the given alignment and width.
    fn leaf(
        &mut self,
        operation: &'static str,
        kind: TypeKind,
        alignment: usize,
        size: usize,
    ) -> Result<()> {
        let is_root = self.stack.is_empty();
        self.claim_value(operation, kind)?;
        let root_slot = is_root.then(|| self.trace.reserve());
        self.align(alignment);
        let start = self.pos;
        self.pos += size;
        if let Some(slot) = root_slot {
            self.trace.fill(slot, self.pos - start)?;
            self.complete_root();
        }
        Ok(())
    }

    /// Open a member frame inside the innermost struct or union.
    fn open_member(&mut self, kind: FrameKind, member: MemberParam, mutable: bool) -> Result<()> {
        if member.kind == TypeKind::Alias {
            return Err(LayoutError::integrity(
                format!("member {}", member.id),
                "member kind must be resolved through its alias",
            ));
        }
        let absent = member.optional && !member.present;
        let mut slot = None;
        if mutable {
            if !absent {
                let length_code = LengthCode::for_kind(member.kind);
                EmHeader::new(member.id, length_code, member.must_understand)?;
                self.align(HEADER_SIZE);
                self.pos += length_code.framing_size();
                slot = Some(self.trace.reserve());
            }
        } else if member.optional {
            // presence flag
            self.pos += 1;
        }
        log::trace!(
            "[xcdr2::size] begin {kind} id={} at {} absent={absent} slot={slot:?}",
            member.id,
            self.pos
        );
        let mut frame = Frame::new(kind, self.pos, slot);
        frame.value_kind = Some(member.kind);
        frame.absent = absent;
        self.stack.push(frame);
        Ok(())
    }

    fn close_member(&mut self, operation: &'static str, kind: FrameKind) -> Result<()> {
        let frame = self.top(operation, kind)?;
        if frame.values == 0 {
            return Err(LayoutError::misuse(operation, "before the member value"));
        }
        self.close(operation)
    }
}

impl ValueWriter for SerializedSizeWriter {
    fn begin_struct(&mut self, extensibility: Extensibility) -> Result<()> {
        let frame = self.open(
            "begin_struct",
            FrameKind::Struct,
            TypeKind::Struct,
            extensibility.is_delimited(),
        )?;
        frame.extensibility = extensibility;
        Ok(())
    }

    fn end_struct(&mut self) -> Result<()> {
        self.top("end_struct", FrameKind::Struct)?;
        self.close("end_struct")
    }

    fn begin_struct_member(&mut self, member: MemberParam) -> Result<()> {
        let frame = self.top("begin_struct_member", FrameKind::Struct)?;
        let mutable = frame.extensibility == Extensibility::Mutable;
        self.open_member(FrameKind::StructMember, member, mutable)
    }

    fn end_struct_member(&mut self) -> Result<()> {
        self.close_member("end_struct_member", FrameKind::StructMember)
    }

    fn begin_union(&mut self, extensibility: Extensibility) -> Result<()> {
        let frame = self.open(
            "begin_union",
            FrameKind::Union,
            TypeKind::Union,
            extensibility.is_delimited(),
        )?;
        frame.extensibility = extensibility;
        Ok(())
    }

    fn end_union(&mut self) -> Result<()> {
        let frame = self.top("end_union", FrameKind::Union)?;
        if !frame.discriminator_written {
            return Err(LayoutError::misuse("end_union", "before the discriminator"));
        }
        self.close("end_union")
    }

    fn write_discriminator(&mut self, value: PrimitiveValue) -> Result<()> {
        let frame = self.top("write_discriminator", FrameKind::Union)?;
        if frame.discriminator_written {
            return Err(LayoutError::misuse(
                "write_discriminator",
                "twice in one union",
            ));
        }
        if matches!(value.kind(), TypeKind::Float32 | TypeKind::Float64) {
            return Err(LayoutError::integrity(
                "discriminator",
                format!("{:?} cannot discriminate a union", value.kind()),
            ));
        }
        frame.discriminator_written = true;
        let mutable = frame.extensibility == Extensibility::Mutable;

        let size = value.size();
        if mutable {
            let length_code = LengthCode::for_kind(value.kind());
            self.align(HEADER_SIZE);
            self.pos += length_code.framing_size();
            let slot = self.trace.reserve();
            self.align(xcdr2_alignment(size));
            let start = self.pos;
            self.pos += size;
            self.trace.fill(slot, self.pos - start)?;
        } else {
            self.align(xcdr2_alignment(size));
            self.pos += size;
        }
        Ok(())
    }

    fn begin_union_member(&mut self, member: MemberParam) -> Result<()> {
        let frame = self.top("begin_union_member", FrameKind::Union)?;
        if !frame.discriminator_written {
            return Err(LayoutError::misuse(
                "begin_union_member",
                "before the discriminator",
            ));
        }
        if frame.member_begun {
            return Err(LayoutError::misuse(
                "begin_union_member",
                "after the active member",
            ));
        }
        frame.member_begun = true;
        let mutable = frame.extensibility == Extensibility::Mutable;
        self.open_member(FrameKind::UnionMember, member, mutable)
    }

    fn end_union_member(&mut self) -> Result<()> {
        self.close_member("end_union_member", FrameKind::UnionMember)
    }

    fn begin_sequence(&mut self, element: TypeKind) -> Result<()> {
        let frame = self.open(
            "begin_sequence",
            FrameKind::Sequence,
            TypeKind::Sequence,
            !element.is_primitive(),
        )?;
        frame.value_kind = Some(element);
        Ok(())
    }

    fn write_length(&mut self, length: u32) -> Result<()> {
        let frame = self.top("write_length", FrameKind::Sequence)?;
        if frame.expected.is_some() {
            return Err(LayoutError::misuse("write_length", "twice in one sequence"));
        }
        frame.expected = Some(u64::from(length));
        self.align(HEADER_SIZE);
        self.pos += HEADER_SIZE;
        Ok(())
    }

    fn end_sequence(&mut self) -> Result<()> {
        let frame = self.top("end_sequence", FrameKind::Sequence)?;
        match frame.expected {
            None => return Err(LayoutError::misuse("end_sequence", "before write_length")),
            Some(expected) if frame.values != expected => {
                return Err(LayoutError::misuse(
                    "end_sequence",
                    format!("after {} of {expected} elements", frame.values),
                ))
            }
            Some(_) => {}
        }
        self.close("end_sequence")
    }

    fn begin_array(&mut self, element: TypeKind, dims: &[u32]) -> Result<()> {
        if dims.is_empty() {
            return Err(LayoutError::integrity("array", "no dimensions"));
        }
        let count = dims
            .iter()
            .try_fold(1u64, |acc, dim| acc.checked_mul(u64::from(*dim)))
            .ok_or_else(|| LayoutError::integrity("array", "element count overflows u64"))?;
        let frame = self.open(
            "begin_array",
            FrameKind::Array,
            TypeKind::Array,
            !element.is_primitive(),
        )?;
        frame.value_kind = Some(element);
        frame.expected = Some(count);
        Ok(())
    }

    fn end_array(&mut self) -> Result<()> {
        let frame = self.top("end_array", FrameKind::Array)?;
        let expected = frame.expected.unwrap_or(0);
        if frame.values != expected {
            return Err(LayoutError::misuse(
                "end_array",
                format!("after {} of {expected} elements", frame.values),
            ));
        }
        self.close("end_array")
    }

    fn write_absent_value(&mut self) -> Result<()> {
        match self.stack.last_mut() {
            Some(frame) if frame.is_member() && frame.absent && frame.values == 0 => {
                frame.values = 1;
                Ok(())
            }
            Some(frame) if frame.is_member() => Err(LayoutError::misuse(
                "write_absent_value",
                "for a present member",
            )),
            _ => Err(LayoutError::misuse(
                "write_absent_value",
                "outside an optional member",
            )),
        }
    }

    fn write_primitive(&mut self, value: PrimitiveValue) -> Result<()> {
        let size = value.size();
        self.leaf("write_primitive", value.kind(), xcdr2_alignment(size), size)
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.leaf(
            "write_string",
            TypeKind::String8,
            HEADER_SIZE,
            string_size(value),
        )
    }
}
