// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Shared fixtures: every test type exists twice, once as a Rust type with
// #[derive(ValueWrite)] and once as a registry descriptor plus DynamicValue,
// so each layout can be checked through both adapters.

#![allow(dead_code)]
#![allow(clippy::missing_panics_doc)]

use std::sync::{Arc, OnceLock};
use xcdr2_layout::dynamic::write_dynamic;
use xcdr2_layout::xtypes::{EnumDescriptor, EnumVariant};
use xcdr2_layout::{
    serialized_size, serialized_size_dynamic, DynamicData, DynamicValue, EncodingConfig,
    Extensibility, HashMapTypeRegistry, MemberParam, PrimitiveValue, Result, SizeReport,
    StructBuilder, TypeDescriptor, TypeKind, TypeRef, TypeRegistry, UnionBuilder, ValueWrite,
    ValueWriter,
};

// ---------------------------------------------------------------------------
// Static types
// ---------------------------------------------------------------------------

macro_rules! base_struct {
    ($name:ident, $ext:tt) => {
        #[derive(Debug, Clone, PartialEq, ValueWrite)]
        #[xcdr($ext)]
        pub struct $name {
            pub b_field: bool,
            pub f_field: f32,
            pub o_field: u8,
        }

        impl $name {
            pub fn sample() -> Self {
                Self {
                    b_field: true,
                    f_field: 1.0,
                    o_field: 1,
                }
            }
        }
    };
}

macro_rules! outer_struct {
    ($name:ident, $ext:tt, $nested:ident) => {
        #[derive(Debug, Clone, PartialEq, ValueWrite)]
        #[xcdr($ext)]
        pub struct $name {
            pub s_field: i16,
            pub l_field: i32,
            pub nested_field: $nested,
            pub str_field: String,
            pub ull_field: u64,
        }

        impl $name {
            pub fn sample() -> Self {
                Self {
                    s_field: 10,
                    l_field: 20,
                    nested_field: $nested::sample(),
                    str_field: "hello".to_string(),
                    ull_field: 30,
                }
            }
        }
    };
}

base_struct!(FinalStruct, final);
base_struct!(AppendableStruct, appendable);
base_struct!(MutableStruct, mutable);

outer_struct!(FinalFinalStruct, final, FinalStruct);
outer_struct!(FinalAppendableStruct, final, AppendableStruct);
outer_struct!(FinalMutableStruct, final, MutableStruct);
outer_struct!(AppendableFinalStruct, appendable, FinalStruct);
outer_struct!(AppendableAppendableStruct, appendable, AppendableStruct);
outer_struct!(AppendableMutableStruct, appendable, MutableStruct);
outer_struct!(MutableFinalStruct, mutable, FinalStruct);
outer_struct!(MutableAppendableStruct, mutable, AppendableStruct);
outer_struct!(MutableMutableStruct, mutable, MutableStruct);

#[derive(Debug, Clone, PartialEq, ValueWrite)]
#[xcdr(final)]
pub enum FinalUnion {
    NestedField(AppendableMutableStruct),
    Empty,
}

#[derive(Debug, Clone, PartialEq, ValueWrite)]
#[xcdr(appendable)]
pub enum AppendableUnion {
    NestedField(MutableFinalStruct),
    Empty,
}

#[derive(Debug, Clone, PartialEq, ValueWrite)]
#[xcdr(mutable)]
pub enum MutableUnion {
    NestedField(FinalAppendableStruct),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueWrite)]
pub enum Number {
    One,
    Two,
}

#[derive(Debug, Clone, PartialEq, ValueWrite)]
#[xcdr(final)]
pub struct FinalComplexStruct {
    pub c_field: u8,
    pub nested_union: FinalUnion,
    pub ll_field: i64,
    pub nested_struct: AppendableStruct,
    pub nnested_struct: FinalAppendableStruct,
    pub str_field: String,
    pub seq_field: Vec<i16>,
    pub arr_field: [i32; 2],
    pub md_arr_field: [[i16; 2]; 2],
    pub nested_seq: Vec<AppendableStruct>,
    pub nested_arr: [MutableStruct; 2],
    pub f_field: f32,
}

impl FinalComplexStruct {
    pub fn sample() -> Self {
        Self {
            c_field: b'd',
            nested_union: FinalUnion::NestedField(AppendableMutableStruct::sample()),
            ll_field: 123,
            nested_struct: AppendableStruct::sample(),
            nnested_struct: FinalAppendableStruct::sample(),
            str_field: "my string".to_string(),
            seq_field: vec![0, 1],
            arr_field: [10, 20],
            md_arr_field: [[0, 1], [10, 11]],
            nested_seq: vec![AppendableStruct::sample(), AppendableStruct::sample()],
            nested_arr: [MutableStruct::sample(), MutableStruct::sample()],
            f_field: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, ValueWrite)]
#[xcdr(appendable)]
pub struct AppendableComplexStruct {
    pub s_field: i16,
    pub nested_union: AppendableUnion,
    pub f_field: f32,
    pub nested_struct: MutableStruct,
    pub nnested_struct: AppendableMutableStruct,
    pub str_field: String,
    pub seq_field: Vec<i32>,
    pub arr_field: [Number; 2],
    pub md_arr_field: [[i32; 2]; 2],
    pub nested_seq: Vec<MutableStruct>,
    pub nested_arr: [FinalStruct; 2],
    pub d_field: f64,
}

impl AppendableComplexStruct {
    pub fn sample() -> Self {
        Self {
            s_field: 1,
            nested_union: AppendableUnion::NestedField(MutableFinalStruct::sample()),
            f_field: 1.0,
            nested_struct: MutableStruct::sample(),
            nnested_struct: AppendableMutableStruct::sample(),
            str_field: "my string".to_string(),
            seq_field: vec![0, 1],
            arr_field: [Number::One, Number::Two],
            md_arr_field: [[0, 1], [10, 11]],
            nested_seq: vec![MutableStruct::sample(), MutableStruct::sample()],
            nested_arr: [FinalStruct::sample(), FinalStruct::sample()],
            d_field: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry descriptors
// ---------------------------------------------------------------------------

fn prim(kind: TypeKind) -> TypeRef {
    TypeRef::primitive(kind)
}

fn base_descriptor(name: &str, ext: Extensibility) -> TypeDescriptor {
    StructBuilder::new(name, ext)
        .member("b_field", prim(TypeKind::Boolean))
        .member("f_field", prim(TypeKind::Float32))
        .member("o_field", prim(TypeKind::Byte))
        .build()
}

fn outer_descriptor(name: &str, ext: Extensibility, nested: &str) -> TypeDescriptor {
    StructBuilder::new(name, ext)
        .member("s_field", prim(TypeKind::Int16))
        .member("l_field", prim(TypeKind::Int32))
        .member("nested_field", TypeRef::named(nested))
        .member("str_field", TypeRef::string())
        .member("ull_field", prim(TypeKind::UInt64))
        .build()
}

fn union_descriptor(name: &str, ext: Extensibility, nested: &str) -> TypeDescriptor {
    UnionBuilder::new(name, ext, prim(TypeKind::Int32))
        .case("nested_field", &[0], TypeRef::named(nested))
        .build()
}

fn build_registry() -> HashMapTypeRegistry {
    use Extensibility::{Appendable, Final, Mutable};

    let mut registry = HashMapTypeRegistry::new();
    registry.register(base_descriptor("FinalStruct", Final));
    registry.register(base_descriptor("AppendableStruct", Appendable));
    registry.register(base_descriptor("MutableStruct", Mutable));

    for (outer_name, outer_ext) in [("Final", Final), ("Appendable", Appendable), ("Mutable", Mutable)] {
        for nested_name in ["Final", "Appendable", "Mutable"] {
            registry.register(outer_descriptor(
                &format!("{outer_name}{nested_name}Struct"),
                outer_ext,
                &format!("{nested_name}Struct"),
            ));
        }
    }

    registry.register(union_descriptor("FinalUnion", Final, "AppendableMutableStruct"));
    registry.register(union_descriptor("AppendableUnion", Appendable, "MutableFinalStruct"));
    registry.register(union_descriptor("MutableUnion", Mutable, "FinalAppendableStruct"));

    registry.register(TypeDescriptor::enumeration(
        "Number",
        EnumDescriptor::new(vec![EnumVariant::new("ONE", 0), EnumVariant::new("TWO", 1)]),
    ));

    registry.register(
        StructBuilder::new("FinalComplexStruct", Final)
            .member("c_field", prim(TypeKind::Byte))
            .member("nested_union", TypeRef::named("FinalUnion"))
            .member("ll_field", prim(TypeKind::Int64))
            .member("nested_struct", TypeRef::named("AppendableStruct"))
            .member("nnested_struct", TypeRef::named("FinalAppendableStruct"))
            .member("str_field", TypeRef::string())
            .member("seq_field", TypeRef::sequence(prim(TypeKind::Int16)))
            .member("arr_field", TypeRef::array(prim(TypeKind::Int32), vec![2]))
            .member("md_arr_field", TypeRef::array(prim(TypeKind::Int16), vec![2, 2]))
            .member("nested_seq", TypeRef::sequence(TypeRef::named("AppendableStruct")))
            .member("nested_arr", TypeRef::array(TypeRef::named("MutableStruct"), vec![2]))
            .member("f_field", prim(TypeKind::Float32))
            .build(),
    );

    // md_arr_field is declared as an array of arrays here; it flattens to [2, 2].
    registry.register(
        StructBuilder::new("AppendableComplexStruct", Appendable)
            .member("s_field", prim(TypeKind::Int16))
            .member("nested_union", TypeRef::named("AppendableUnion"))
            .member("f_field", prim(TypeKind::Float32))
            .member("nested_struct", TypeRef::named("MutableStruct"))
            .member("nnested_struct", TypeRef::named("AppendableMutableStruct"))
            .member("str_field", TypeRef::string())
            .member("seq_field", TypeRef::sequence(prim(TypeKind::Int32)))
            .member("arr_field", TypeRef::array(TypeRef::named("Number"), vec![2]))
            .member(
                "md_arr_field",
                TypeRef::array(TypeRef::array(prim(TypeKind::Int32), vec![2]), vec![2]),
            )
            .member("nested_seq", TypeRef::sequence(TypeRef::named("MutableStruct")))
            .member("nested_arr", TypeRef::array(TypeRef::named("FinalStruct"), vec![2]))
            .member("d_field", prim(TypeKind::Float64))
            .build(),
    );

    registry
}

/// Registry holding every fixture type, populated once.
pub fn registry() -> &'static HashMapTypeRegistry {
    static REGISTRY: OnceLock<HashMapTypeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

pub fn data(type_name: &str, value: DynamicValue) -> DynamicData {
    let descriptor = registry().lookup(type_name).unwrap();
    DynamicData::new(descriptor, value)
}

pub fn descriptor(type_name: &str) -> Arc<TypeDescriptor> {
    registry().lookup(type_name).unwrap()
}

// ---------------------------------------------------------------------------
// Dynamic values
// ---------------------------------------------------------------------------

pub fn base_value() -> DynamicValue {
    DynamicValue::from_fields([
        ("b_field", true.into()),
        ("f_field", 1.0f32.into()),
        ("o_field", 1u8.into()),
    ])
}

pub fn outer_value() -> DynamicValue {
    DynamicValue::from_fields([
        ("s_field", 10i16.into()),
        ("l_field", 20i32.into()),
        ("nested_field", base_value()),
        ("str_field", "hello".into()),
        ("ull_field", 30u64.into()),
    ])
}

pub fn union_value() -> DynamicValue {
    DynamicValue::union(0, outer_value())
}

pub fn final_complex_value() -> DynamicValue {
    DynamicValue::from_fields([
        ("c_field", DynamicValue::U8(b'd')),
        ("nested_union", union_value()),
        ("ll_field", 123i64.into()),
        ("nested_struct", base_value()),
        ("nnested_struct", outer_value()),
        ("str_field", "my string".into()),
        ("seq_field", vec![0i16, 1].into()),
        ("arr_field", DynamicValue::array([10i32, 20])),
        ("md_arr_field", DynamicValue::array([0i16, 1, 10, 11])),
        ("nested_seq", DynamicValue::Sequence(vec![base_value(), base_value()])),
        ("nested_arr", DynamicValue::Array(vec![base_value(), base_value()])),
        ("f_field", 2.0f32.into()),
    ])
}

pub fn appendable_complex_value() -> DynamicValue {
    DynamicValue::from_fields([
        ("s_field", 1i16.into()),
        ("nested_union", union_value()),
        ("f_field", 1.0f32.into()),
        ("nested_struct", base_value()),
        ("nnested_struct", outer_value()),
        ("str_field", "my string".into()),
        ("seq_field", vec![0i32, 1].into()),
        (
            "arr_field",
            DynamicValue::Array(vec![DynamicValue::Enum(0), DynamicValue::Enum(1)]),
        ),
        (
            "md_arr_field",
            DynamicValue::Array(vec![
                DynamicValue::array([0i32, 1]),
                DynamicValue::array([10i32, 11]),
            ]),
        ),
        ("nested_seq", DynamicValue::Sequence(vec![base_value(), base_value()])),
        ("nested_arr", DynamicValue::Array(vec![base_value(), base_value()])),
        ("d_field", 1.0f64.into()),
    ])
}

// ---------------------------------------------------------------------------
// Recording writer
// ---------------------------------------------------------------------------

/// One Value Writer Protocol call.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    BeginStruct(Extensibility),
    EndStruct,
    BeginStructMember(MemberParam),
    EndStructMember,
    BeginUnion(Extensibility),
    EndUnion,
    Discriminator(PrimitiveValue),
    BeginUnionMember(MemberParam),
    EndUnionMember,
    BeginSequence(TypeKind),
    Length(u32),
    EndSequence,
    BeginArray(TypeKind, Vec<u32>),
    EndArray,
    Absent,
    Primitive(PrimitiveValue),
    Str(String),
}

/// ValueWriter that records every call.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    fn push(&mut self, event: Event) -> Result<()> {
        self.events.push(event);
        Ok(())
    }
}

impl ValueWriter for Recorder {
    fn begin_struct(&mut self, extensibility: Extensibility) -> Result<()> {
        self.push(Event::BeginStruct(extensibility))
    }
    fn end_struct(&mut self) -> Result<()> {
        self.push(Event::EndStruct)
    }
    fn begin_struct_member(&mut self, member: MemberParam) -> Result<()> {
        self.push(Event::BeginStructMember(member))
    }
    fn end_struct_member(&mut self) -> Result<()> {
        self.push(Event::EndStructMember)
    }
    fn begin_union(&mut self, extensibility: Extensibility) -> Result<()> {
        self.push(Event::BeginUnion(extensibility))
    }
    fn end_union(&mut self) -> Result<()> {
        self.push(Event::EndUnion)
    }
    fn write_discriminator(&mut self, value: PrimitiveValue) -> Result<()> {
        self.push(Event::Discriminator(value))
    }
    fn begin_union_member(&mut self, member: MemberParam) -> Result<()> {
        self.push(Event::BeginUnionMember(member))
    }
    fn end_union_member(&mut self) -> Result<()> {
        self.push(Event::EndUnionMember)
    }
    fn begin_sequence(&mut self, element: TypeKind) -> Result<()> {
        self.push(Event::BeginSequence(element))
    }
    fn write_length(&mut self, length: u32) -> Result<()> {
        self.push(Event::Length(length))
    }
    fn end_sequence(&mut self) -> Result<()> {
        self.push(Event::EndSequence)
    }
    fn begin_array(&mut self, element: TypeKind, dims: &[u32]) -> Result<()> {
        self.push(Event::BeginArray(element, dims.to_vec()))
    }
    fn end_array(&mut self) -> Result<()> {
        self.push(Event::EndArray)
    }
    fn write_absent_value(&mut self) -> Result<()> {
        self.push(Event::Absent)
    }
    fn write_primitive(&mut self, value: PrimitiveValue) -> Result<()> {
        self.push(Event::Primitive(value))
    }
    fn write_string(&mut self, value: &str) -> Result<()> {
        self.push(Event::Str(value.to_string()))
    }
}

pub fn record_static<T: ValueWrite + ?Sized>(value: &T) -> Vec<Event> {
    let mut recorder = Recorder::default();
    value.write_value(&mut recorder).unwrap();
    recorder.events
}

pub fn record_dynamic(data: &DynamicData) -> Vec<Event> {
    let mut recorder = Recorder::default();
    write_dynamic(data, registry(), &mut recorder).unwrap();
    recorder.events
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

pub fn static_report<T: ValueWrite + ?Sized>(value: &T) -> SizeReport {
    serialized_size(&EncodingConfig::default(), value).unwrap()
}

pub fn dynamic_report(data: &DynamicData) -> SizeReport {
    serialized_size_dynamic(&EncodingConfig::default(), registry(), data).unwrap()
}

/// Check total and checkpoint trace through both adapters.
pub fn assert_layout<T: ValueWrite>(value: &T, data: &DynamicData, total: usize, trace: &[usize]) {
    let from_static = static_report(value);
    assert_eq!(from_static.total, total, "static total");
    assert_eq!(from_static.checkpoints, trace, "static trace");

    let from_dynamic = dynamic_report(data);
    assert_eq!(from_dynamic, from_static, "dynamic report");
    assert_eq!(record_dynamic(data), record_static(value), "protocol calls");
}
