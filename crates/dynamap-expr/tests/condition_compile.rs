use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{TimeZone, Utc};
use dynamap_core::schema::{schema_of, FieldDef, Model, ModelDef};
use dynamap_core::{Error, InvalidOperationError, Value};
use dynamap_expr::{
    and, attribute, compile_condition, compile_condition_into, compile_update_into, not, or,
    update, ConditionOperator, ExprAttrs,
};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

struct Info;

impl Model for Info {
    fn definition() -> ModelDef {
        ModelDef::new("infos", "Info").field(FieldDef::string("details"))
    }
}

struct Person;

impl Model for Person {
    fn definition() -> ModelDef {
        ModelDef::new("persons", "Person")
            .field(FieldDef::string("id").partition_key())
            .field(FieldDef::string("name"))
            .field(FieldDef::number("age"))
            .field(FieldDef::boolean("active").wire_name("isActive"))
            .field(FieldDef::string_set("topics"))
            .field(FieldDef::date("createdAt"))
            .field(FieldDef::nested::<Info>("info"))
    }
}

fn names(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Comparators
// ---------------------------------------------------------------------------

#[test]
fn eq() {
    let schema = schema_of::<Person>().unwrap();
    let compiled = compile_condition(&schema, &attribute("age").eq(5)).unwrap();

    assert_eq!(compiled.statement, "#age = :age");
    assert_eq!(compiled.names, names(&[("#age", "age")]));
    assert_eq!(
        compiled.values,
        IndexMap::from([(":age".to_string(), AttributeValue::N("5".to_string()))])
    );
}

#[test]
fn ordering_operators() {
    let schema = schema_of::<Person>().unwrap();

    for (condition, expected) in [
        (attribute("age").ne(5), "#age <> :age"),
        (attribute("age").lt(5), "#age < :age"),
        (attribute("age").lte(5), "#age <= :age"),
        (attribute("age").gt(5), "#age > :age"),
        (attribute("age").gte(5), "#age >= :age"),
    ] {
        let compiled = compile_condition(&schema, &condition).unwrap();
        assert_eq!(compiled.statement, expected);
    }
}

#[test]
fn name_alias_derives_from_wire_name() {
    let schema = schema_of::<Person>().unwrap();
    let compiled = compile_condition(&schema, &attribute("active").eq(true)).unwrap();

    assert_eq!(compiled.statement, "#isActive = :isActive");
    assert_eq!(compiled.names, names(&[("#isActive", "isActive")]));
    assert_eq!(
        compiled.values,
        IndexMap::from([(":isActive".to_string(), AttributeValue::Bool(true))])
    );
}

#[test]
fn condition_literals_encode_through_field_types() {
    let schema = schema_of::<Person>().unwrap();
    let at = Utc.with_ymd_and_hms(2020, 1, 1, 10, 0, 0).unwrap();
    let compiled = compile_condition(&schema, &attribute("createdAt").gt(at)).unwrap();

    assert_eq!(compiled.statement, "#createdAt > :createdAt");
    assert_eq!(
        compiled.values,
        IndexMap::from([(
            ":createdAt".to_string(),
            AttributeValue::S("2020-01-01T10:00:00Z".to_string())
        )])
    );
}

// ---------------------------------------------------------------------------
// Function operators
// ---------------------------------------------------------------------------

#[test]
fn attribute_exists() {
    let schema = schema_of::<Person>().unwrap();
    let compiled = compile_condition(&schema, &attribute("topics").attribute_exists()).unwrap();

    assert_eq!(compiled.statement, "attribute_exists (#topics)");
    assert!(compiled.values.is_empty());
}

#[test]
fn null_aliases_attribute_not_exists() {
    let schema = schema_of::<Person>().unwrap();
    let compiled = compile_condition(&schema, &attribute("name").null()).unwrap();

    assert_eq!(compiled.statement, "attribute_not_exists (#name)");
}

#[test]
fn not_contains() {
    let schema = schema_of::<Person>().unwrap();
    let compiled =
        compile_condition(&schema, &not(attribute("topics").contains("x"))).unwrap();

    assert_eq!(compiled.statement, "NOT (contains (#topics, :topics))");
    assert_eq!(compiled.names, names(&[("#topics", "topics")]));
    // the operand of contains on a set field encodes as the element kind
    assert_eq!(
        compiled.values,
        IndexMap::from([(":topics".to_string(), AttributeValue::S("x".to_string()))])
    );
}

#[test]
fn begins_with() {
    let schema = schema_of::<Person>().unwrap();
    let compiled = compile_condition(&schema, &attribute("name").begins_with("Bo")).unwrap();

    assert_eq!(compiled.statement, "begins_with (#name, :name)");
    assert_eq!(
        compiled.values,
        IndexMap::from([(":name".to_string(), AttributeValue::S("Bo".to_string()))])
    );
}

#[test]
fn attribute_type_takes_a_tag_operand() {
    let schema = schema_of::<Person>().unwrap();
    let compiled =
        compile_condition(&schema, &attribute("topics").attribute_type("SS")).unwrap();

    assert_eq!(compiled.statement, "attribute_type (#topics, :topics)");
    assert_eq!(
        compiled.values,
        IndexMap::from([(":topics".to_string(), AttributeValue::S("SS".to_string()))])
    );
}

// ---------------------------------------------------------------------------
// IN / BETWEEN
// ---------------------------------------------------------------------------

#[test]
fn in_list_numbers_placeholders() {
    let schema = schema_of::<Person>().unwrap();
    let compiled = compile_condition(&schema, &attribute("name").is_in(["a", "b"])).unwrap();

    assert_eq!(compiled.statement, "#name IN (:name_0, :name_1)");
    assert_eq!(
        compiled.values,
        IndexMap::from([
            (":name_0".to_string(), AttributeValue::S("a".to_string())),
            (":name_1".to_string(), AttributeValue::S("b".to_string())),
        ])
    );
}

#[test]
fn between_uses_two_placeholders() {
    let schema = schema_of::<Person>().unwrap();
    let compiled = compile_condition(&schema, &attribute("age").between(18, 30)).unwrap();

    assert_eq!(compiled.statement, "#age BETWEEN :age AND :age_2");
    assert_eq!(
        compiled.values,
        IndexMap::from([
            (":age".to_string(), AttributeValue::N("18".to_string())),
            (":age_2".to_string(), AttributeValue::N("30".to_string())),
        ])
    );
}

// ---------------------------------------------------------------------------
// Logical combination
// ---------------------------------------------------------------------------

#[test]
fn and_wraps_in_parentheses() {
    let schema = schema_of::<Person>().unwrap();
    let compiled = compile_condition(
        &schema,
        &and([
            attribute("topics").attribute_exists(),
            attribute("name").attribute_exists(),
        ]),
    )
    .unwrap();

    assert_eq!(
        compiled.statement,
        "(attribute_exists (#topics) AND attribute_exists (#name))"
    );
}

#[test]
fn or_and_not_compose() {
    let schema = schema_of::<Person>().unwrap();
    let compiled = compile_condition(
        &schema,
        &or([
            attribute("age").gte(18),
            not(attribute("active").eq(true)),
        ]),
    )
    .unwrap();

    assert_eq!(
        compiled.statement,
        "(#age >= :age OR NOT (#isActive = :isActive))"
    );
}

#[test]
fn colliding_value_tokens_uniquify() {
    let schema = schema_of::<Person>().unwrap();
    let compiled = compile_condition(
        &schema,
        &and([attribute("age").gt(18), attribute("age").lt(65)]),
    )
    .unwrap();

    assert_eq!(compiled.statement, "(#age > :age AND #age < :age_2)");
    assert_eq!(
        compiled.values,
        IndexMap::from([
            (":age".to_string(), AttributeValue::N("18".to_string())),
            (":age_2".to_string(), AttributeValue::N("65".to_string())),
        ])
    );
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

#[test]
fn nested_path_aliases_each_segment() {
    let schema = schema_of::<Person>().unwrap();
    let compiled =
        compile_condition(&schema, &attribute("info.details").eq("x")).unwrap();

    assert_eq!(compiled.statement, "#info.#details = :info_details");
    assert_eq!(
        compiled.names,
        names(&[("#info", "info"), ("#details", "details")])
    );
}

#[test]
fn unknown_field_fails() {
    let schema = schema_of::<Person>().unwrap();
    match compile_condition(&schema, &attribute("nope").eq(1)) {
        Err(Error::InvalidOperation(InvalidOperationError::UnknownField { name, .. })) => {
            assert_eq!(name, "nope");
        }
        other => panic!("expected UnknownField, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

#[test]
fn dynamic_alias_builds_the_same_condition() {
    let schema = schema_of::<Person>().unwrap();
    let condition = attribute("age")
        .op("gte", vec![Value::I64(18)])
        .unwrap();
    let compiled = compile_condition(&schema, &condition).unwrap();
    assert_eq!(compiled.statement, "#age >= :age");
}

#[test]
fn unknown_alias_is_rejected_at_build_time() {
    assert_eq!(
        attribute("age").op("almost", vec![Value::I64(1)]).unwrap_err(),
        InvalidOperationError::UnknownAlias {
            alias: "almost".to_string()
        }
    );
}

#[test]
fn wrong_operand_count_is_rejected_at_build_time() {
    assert!(matches!(
        attribute("age").op("between", vec![Value::I64(1)]),
        Err(InvalidOperationError::OperandCount { .. })
    ));
}

#[test]
fn every_canonical_alias_resolves() {
    for (alias, op) in [
        ("eq", ConditionOperator::Eq),
        ("ne", ConditionOperator::Ne),
        ("lte", ConditionOperator::Le),
        ("lt", ConditionOperator::Lt),
        ("gte", ConditionOperator::Ge),
        ("gt", ConditionOperator::Gt),
        ("null", ConditionOperator::AttributeNotExists),
        ("notNull", ConditionOperator::AttributeExists),
        ("type", ConditionOperator::AttributeType),
        ("contains", ConditionOperator::Contains),
        ("in", ConditionOperator::In),
        ("beginsWith", ConditionOperator::BeginsWith),
        ("between", ConditionOperator::Between),
    ] {
        assert_eq!(ConditionOperator::from_alias(alias).unwrap(), op);
    }
}

// ---------------------------------------------------------------------------
// Accumulation across compilations
// ---------------------------------------------------------------------------

#[test]
fn shared_attrs_accumulate_and_uniquify() {
    let schema = schema_of::<Person>().unwrap();
    let mut attrs = ExprAttrs::default();

    let update_stmt =
        compile_update_into(&schema, &[update("name").set("newName")], &mut attrs).unwrap();
    let condition_stmt =
        compile_condition_into(&schema, &attribute("name").ne("oldName"), &mut attrs).unwrap();

    assert_eq!(update_stmt, "SET #name = :name");
    assert_eq!(condition_stmt, "#name <> :name_2");

    // one merged alias map across both statements
    assert_eq!(attrs.names, names(&[("#name", "name")]));
    assert_eq!(
        attrs.values,
        IndexMap::from([
            (
                ":name".to_string(),
                AttributeValue::S("newName".to_string())
            ),
            (
                ":name_2".to_string(),
                AttributeValue::S("oldName".to_string())
            ),
        ])
    );
}
