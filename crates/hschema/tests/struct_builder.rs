// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declaration-to-descriptor integration tests.
//!
//! Exercises the public API the way an embedding host would: compile
//! declarations through a registry, inherit and override fields, and resolve
//! mutually recursive records.

use hschema::{
    FieldDef, Kinds, SchemaBuilder, SchemaError, SchemaRegistry, StructConfig, StructDecl,
    TagMode, TypeExpr, Value,
};

#[test]
fn inheritance_chain_merges_base_then_derived() {
    let registry = SchemaRegistry::new();
    let builder = SchemaBuilder::new(&registry);

    let entity = builder
        .build_struct(StructDecl::new(
            "Entity",
            vec![FieldDef::new("id", TypeExpr::Int)],
        ))
        .expect("Entity");
    let named = builder
        .build_struct(
            StructDecl::new(
                "Named",
                vec![FieldDef::new("name", TypeExpr::Str).with_default(Value::Str("".into()))],
            )
            .bases(vec![entity.clone()]),
        )
        .expect("Named");
    let device = builder
        .build_struct(
            StructDecl::new(
                "Device",
                vec![
                    // Override keeps `name` at its original slot.
                    FieldDef::new("name", TypeExpr::Str).with_default(Value::Str("dev".into())),
                    FieldDef::new("port", TypeExpr::Int).with_default(Value::Int(0)),
                ],
            )
            .bases(vec![named.clone()]),
        )
        .expect("Device");

    assert_eq!(device.fields(), &["id", "name", "port"]);
    assert_eq!(device.bases().len(), 1);

    let instance = device.construct(&[Value::Int(9)], &[]).expect("construct");
    assert_eq!(instance.get("name").unwrap(), &Value::Str("dev".into()));

    // The derived type satisfies inclusive checks against every ancestor.
    assert!(device.is_subtype_of(&named));
    assert!(device.is_subtype_of(&entity));
    assert!(!entity.is_subtype_of(&device));
}

#[test]
fn mutually_recursive_records_resolve() {
    let registry = SchemaRegistry::new();
    let builder = SchemaBuilder::new(&registry);

    // Employee references Department before Department is declared.
    let employee = builder
        .build_struct(StructDecl::new(
            "Employee",
            vec![
                FieldDef::new("name", TypeExpr::Str),
                FieldDef::new(
                    "department",
                    TypeExpr::optional(TypeExpr::Record("Department".into())),
                )
                .with_default(Value::Null),
            ],
        ))
        .expect("Employee");

    // Until Department resolves, dereferencing the placeholder fails fast.
    let employee_info = employee
        .descriptor()
        .expect("descriptor attached")
        .as_struct()
        .expect("struct variant");
    let department_ref = employee_info.types()[1].record().expect("record detail");
    assert_eq!(
        department_ref.get().unwrap_err(),
        SchemaError::UnresolvedType("Department".to_string())
    );

    builder
        .build_struct(StructDecl::new(
            "Department",
            vec![
                FieldDef::new("label", TypeExpr::Str),
                FieldDef::new(
                    "members",
                    TypeExpr::list_of(TypeExpr::Record("Employee".into())),
                ),
            ],
        ))
        .expect("Department");

    // Both directions now resolve to published descriptors.
    let department = department_ref.get().expect("resolved");
    assert_eq!(department.name(), "Department");
    let members_node = department.as_struct().expect("struct").types()[1]
        .list_element()
        .expect("list element");
    assert!(members_node.kinds().contains(Kinds::RECORD));
    assert_eq!(
        members_node.record().unwrap().get().unwrap().name(),
        "Employee"
    );
}

#[test]
fn array_like_and_omit_defaults_reach_the_encoder_surface() {
    let registry = SchemaRegistry::new();
    let builder = SchemaBuilder::new(&registry);
    let ty = builder
        .build_struct(
            StructDecl::new(
                "Wire",
                vec![
                    FieldDef::new("seq", TypeExpr::Int),
                    FieldDef::new("payload", TypeExpr::Bytes).with_default(Value::Bytes(vec![])),
                ],
            )
            .config(
                StructConfig::new()
                    .array_like(true)
                    .omit_defaults(true)
                    .forbid_unknown_fields(true),
            ),
        )
        .expect("Wire");

    // The encoder consumes these without revisiting the declaration.
    assert!(ty.config().array_like);
    assert!(ty.config().omit_defaults);
    assert!(ty.config().forbid_unknown_fields);
    assert_eq!(ty.descriptor().unwrap().required_count(), 1);
    assert_eq!(ty.encode_fields(), &["seq", "payload"]);
}

#[test]
fn tagged_declaration_exposes_tag_metadata() {
    let registry = SchemaRegistry::new();
    let builder = SchemaBuilder::new(&registry);
    let ty = builder
        .build_struct(
            StructDecl::new("Alert", vec![FieldDef::new("level", TypeExpr::Int)]).config(
                StructConfig::new()
                    .tag(TagMode::Default)
                    .tag_field("kind"),
            ),
        )
        .expect("Alert");
    assert_eq!(ty.tag_field(), Some("kind"));
    assert_eq!(
        ty.tag_value().unwrap(),
        &hschema::TagValue::Str("Alert".into())
    );
}

#[test]
fn duplicate_type_name_is_rejected() {
    let registry = SchemaRegistry::new();
    let builder = SchemaBuilder::new(&registry);
    builder
        .build_struct(StructDecl::new(
            "Once",
            vec![FieldDef::new("a", TypeExpr::Int)],
        ))
        .expect("first");
    let err = builder
        .build_struct(StructDecl::new(
            "Once",
            vec![FieldDef::new("a", TypeExpr::Int)],
        ))
        .unwrap_err();
    assert!(matches!(err, SchemaError::ConfigConflict(_)));
}
