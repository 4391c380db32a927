use crate::path::{resolve_path, ResolvedPath, ResolvedSegment};
use crate::{ActionKeyword, Condition, ConditionOperator, ListPosition, UpdateAction, UpdateOp};
use aws_sdk_dynamodb::types::AttributeValue;
use dynamap_core::schema::{EnumBase, FieldTy, ModelSchema, Primitive};
use dynamap_core::{mapper, Error, InvalidOperationError, MappingError, Result, Value};
use indexmap::IndexMap;
use std::fmt::Write;

/// Accumulates the alias maps for one request: `#token → wireName` and
/// `:token → AttributeValue`.
///
/// Name aliases derive from wire names, so re-registering the same attribute
/// is idempotent. Value placeholders uniquify against already-present tokens
/// by suffixing `_2`, `_3`, …
#[derive(Debug, Default, Clone)]
pub struct ExprAttrs {
    pub names: IndexMap<String, String>,
    pub values: IndexMap<String, AttributeValue>,
}

impl ExprAttrs {
    /// Registers a name alias for `wire_name` and returns the `#token`.
    pub fn name(&mut self, wire_name: &str) -> String {
        let token = format!("#{}", sanitize(wire_name));
        self.names.insert(token.clone(), wire_name.to_string());
        token
    }

    /// Stores a literal under a fresh `:token` derived from `base`.
    pub fn value(&mut self, base: &str, attr: AttributeValue) -> String {
        let mut token = format!(":{base}");
        if self.values.contains_key(&token) {
            let mut n = 2;
            loop {
                let candidate = format!(":{base}_{n}");
                if !self.values.contains_key(&candidate) {
                    token = candidate;
                    break;
                }
                n += 1;
            }
        }
        self.values.insert(token.clone(), attr);
        token
    }
}

/// A compiled statement plus the alias maps it references: the boundary
/// triple handed to the request-assembly layer.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub statement: String,
    pub names: IndexMap<String, String>,
    pub values: IndexMap<String, AttributeValue>,
}

/// Compiles a condition into a standalone [`Compiled`] triple.
pub fn compile_condition(schema: &ModelSchema, condition: &Condition) -> Result<Compiled> {
    let mut attrs = ExprAttrs::default();
    let statement = compile_condition_into(schema, condition, &mut attrs)?;
    Ok(Compiled {
        statement,
        names: attrs.names,
        values: attrs.values,
    })
}

/// Compiles a condition, accumulating aliases into an existing [`ExprAttrs`].
pub fn compile_condition_into(
    schema: &ModelSchema,
    condition: &Condition,
    attrs: &mut ExprAttrs,
) -> Result<String> {
    let statement = render_condition(schema, condition, attrs)?;
    tracing::debug!(statement = %statement, "compiled condition expression");
    Ok(statement)
}

/// Compiles update operations into a standalone [`Compiled`] triple.
pub fn compile_update(schema: &ModelSchema, ops: &[UpdateOp]) -> Result<Compiled> {
    let mut attrs = ExprAttrs::default();
    let statement = compile_update_into(schema, ops, &mut attrs)?;
    Ok(Compiled {
        statement,
        names: attrs.names,
        values: attrs.values,
    })
}

/// Compiles update operations, accumulating aliases into an existing
/// [`ExprAttrs`].
///
/// Operations group by action keyword; clauses are emitted in the order each
/// keyword first appeared in the input sequence, not in a canonical order.
pub fn compile_update_into(
    schema: &ModelSchema,
    ops: &[UpdateOp],
    attrs: &mut ExprAttrs,
) -> Result<String> {
    if ops.is_empty() {
        return Err(InvalidOperationError::EmptyUpdate.into());
    }

    let mut clauses: IndexMap<ActionKeyword, Vec<String>> = IndexMap::new();
    for op in ops {
        let fragments = render_update_op(schema, op, attrs)?;
        clauses.entry(op.action.keyword()).or_default().extend(fragments);
    }

    let mut statement = String::new();
    for (keyword, fragments) in &clauses {
        if !statement.is_empty() {
            statement.push(' ');
        }
        let _ = write!(statement, "{} {}", keyword.as_str(), fragments.join(", "));
    }

    tracing::debug!(statement = %statement, operations = ops.len(), "compiled update expression");
    Ok(statement)
}

/// Compiles a projection: resolved paths joined with `", "`, names only.
pub fn compile_projection(
    schema: &ModelSchema,
    paths: impl IntoIterator<Item = impl AsRef<str>>,
) -> Result<Compiled> {
    let mut attrs = ExprAttrs::default();
    let statement = compile_projection_into(schema, paths, &mut attrs)?;
    Ok(Compiled {
        statement,
        names: attrs.names,
        values: attrs.values,
    })
}

/// Compiles a projection, accumulating aliases into an existing [`ExprAttrs`].
pub fn compile_projection_into(
    schema: &ModelSchema,
    paths: impl IntoIterator<Item = impl AsRef<str>>,
    attrs: &mut ExprAttrs,
) -> Result<String> {
    let mut parts = vec![];
    for path in paths {
        let resolved = resolve_path(schema, path.as_ref())?;
        parts.push(name_expression(&resolved, attrs));
    }
    let statement = parts.join(", ");
    tracing::debug!(statement = %statement, "compiled projection expression");
    Ok(statement)
}

fn render_condition(
    schema: &ModelSchema,
    condition: &Condition,
    attrs: &mut ExprAttrs,
) -> Result<String> {
    match condition {
        Condition::And(operands) => render_logical(schema, operands, " AND ", attrs),
        Condition::Or(operands) => render_logical(schema, operands, " OR ", attrs),
        Condition::Not(inner) => Ok(format!(
            "NOT ({})",
            render_condition(schema, inner, attrs)?
        )),
        Condition::Comparison { path, op, operands } => {
            render_comparison(schema, path, *op, operands, attrs)
        }
    }
}

fn render_logical(
    schema: &ModelSchema,
    operands: &[Condition],
    joiner: &str,
    attrs: &mut ExprAttrs,
) -> Result<String> {
    let mut parts = Vec::with_capacity(operands.len());
    for condition in operands {
        parts.push(render_condition(schema, condition, attrs)?);
    }
    Ok(format!("({})", parts.join(joiner)))
}

fn render_comparison(
    schema: &ModelSchema,
    raw_path: &str,
    op: ConditionOperator,
    operands: &[Value],
    attrs: &mut ExprAttrs,
) -> Result<String> {
    // Descriptors are normally arity-checked by the builders; re-check here
    // for hand-assembled ones.
    match op.operand_count() {
        Some(expected) if operands.len() != expected => {
            return Err(InvalidOperationError::OperandCount {
                operator: op.symbol(),
                expected: match expected {
                    0 => "0",
                    1 => "1",
                    _ => "2",
                },
                got: operands.len(),
            }
            .into())
        }
        None if operands.is_empty() => {
            return Err(InvalidOperationError::OperandCount {
                operator: op.symbol(),
                expected: "at least 1",
                got: 0,
            }
            .into())
        }
        _ => {}
    }

    let resolved = resolve_path(schema, raw_path)?;
    let name = name_expression(&resolved, attrs);
    let base = resolved.token_base();

    if op.is_function() {
        return Ok(if operands.is_empty() {
            format!("{} ({name})", op.symbol())
        } else {
            let attr = encode_operand(&resolved, op, &operands[0])?;
            let token = attrs.value(&base, attr);
            format!("{} ({name}, {token})", op.symbol())
        });
    }

    match op {
        ConditionOperator::In => {
            let mut tokens = Vec::with_capacity(operands.len());
            for (i, operand) in operands.iter().enumerate() {
                let attr = encode_operand(&resolved, op, operand)?;
                tokens.push(attrs.value(&format!("{base}_{i}"), attr));
            }
            Ok(format!("{name} IN ({})", tokens.join(", ")))
        }
        ConditionOperator::Between => {
            let lower = attrs.value(&base, encode_operand(&resolved, op, &operands[0])?);
            let upper = attrs.value(&base, encode_operand(&resolved, op, &operands[1])?);
            Ok(format!("{name} BETWEEN {lower} AND {upper}"))
        }
        _ => {
            let token = attrs.value(&base, encode_operand(&resolved, op, &operands[0])?);
            Ok(format!("{name} {} {token}", op.symbol()))
        }
    }
}

fn render_update_op(
    schema: &ModelSchema,
    op: &UpdateOp,
    attrs: &mut ExprAttrs,
) -> Result<Vec<String>> {
    let resolved = resolve_path(schema, &op.path)?;
    let name = name_expression(&resolved, attrs);
    let base = resolved.token_base();

    match &op.action {
        UpdateAction::Set(value) => {
            let token = attrs.value(&base, encode_literal(&resolved, value)?);
            Ok(vec![format!("{name} = {token}")])
        }
        UpdateAction::IncrementBy(value) => {
            let token = attrs.value(&base, encode_numeric(&resolved, "increment", value)?);
            Ok(vec![format!("{name} = {name} + {token}")])
        }
        UpdateAction::DecrementBy(value) => {
            let token = attrs.value(&base, encode_numeric(&resolved, "decrement", value)?);
            Ok(vec![format!("{name} = {name} - {token}")])
        }
        UpdateAction::Append { value, position } => {
            // The appended operand encodes by its own shape; wrapping
            // scalars into a list is left to the caller.
            let path = resolved.display();
            let attr = mapper::encode_value(&path, value, &FieldTy::of(value))?;
            let token = attrs.value(&base, attr);
            Ok(vec![match position {
                ListPosition::End => format!("{name} = list_append({name}, {token})"),
                ListPosition::Start => format!("{name} = list_append({token}, {name})"),
            }])
        }
        UpdateAction::Remove => Ok(vec![name]),
        UpdateAction::RemoveFromListAt(indices) => Ok(indices
            .iter()
            .map(|index| format!("{name}[{index}]"))
            .collect()),
        UpdateAction::Add(value) => {
            let token = attrs.value(&base, encode_add_operand(&resolved, "ADD", value, true)?);
            Ok(vec![format!("{name} {token}")])
        }
        UpdateAction::DeleteFromSet(value) => {
            let token = attrs.value(&base, encode_add_operand(&resolved, "DELETE", value, false)?);
            Ok(vec![format!("{name} {token}")])
        }
    }
}

/// Renders `#token` aliases for every identifier segment and literal `[n]`
/// for index segments.
fn name_expression(resolved: &ResolvedPath, attrs: &mut ExprAttrs) -> String {
    let mut out = String::new();
    for segment in &resolved.segments {
        match segment {
            ResolvedSegment::Attr(wire) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(&attrs.name(wire));
            }
            ResolvedSegment::Index(index) => {
                let _ = write!(out, "[{index}]");
            }
        }
    }
    out
}

/// Encodes a literal through the resolved field's descriptor, falling back
/// to inference on free-form paths.
fn encode_literal(resolved: &ResolvedPath, value: &Value) -> Result<AttributeValue> {
    let path = resolved.display();
    match &resolved.field {
        Some(field) => mapper::encode_field(field, Some(value))?
            .ok_or_else(|| Error::from(MappingError::AbsentValue { path })),
        None => mapper::encode_value(&path, value, &FieldTy::of(value)).map_err(Into::into),
    }
}

/// Operand encoding for conditions. `attribute_type`'s tag operand is a plain
/// string; `contains` on a set field compares against the element kind.
fn encode_operand(
    resolved: &ResolvedPath,
    op: ConditionOperator,
    value: &Value,
) -> Result<AttributeValue> {
    let path = resolved.display();

    if op == ConditionOperator::AttributeType {
        return mapper::encode_value(&path, value, &FieldTy::of(value)).map_err(Into::into);
    }

    if op == ConditionOperator::Contains {
        if let Some(field) = &resolved.field {
            if let FieldTy::Set { element, .. } = &field.ty {
                return mapper::encode_value(&path, value, &FieldTy::Primitive(*element))
                    .map_err(Into::into);
            }
        }
    }

    encode_literal(resolved, value)
}

fn encode_numeric(
    resolved: &ResolvedPath,
    action: &'static str,
    value: &Value,
) -> Result<AttributeValue> {
    let path = resolved.display();
    if let Some(field) = &resolved.field {
        if !matches!(
            field.ty,
            FieldTy::Primitive(Primitive::Number | Primitive::Enum(EnumBase::Number))
        ) {
            return Err(InvalidOperationError::UnsupportedAction {
                action,
                path,
                reason: "field is not number-typed".to_string(),
            }
            .into());
        }
    }
    mapper::encode_value(&path, value, &FieldTy::Primitive(Primitive::Number)).map_err(Into::into)
}

/// `ADD`/`DELETE` operand: a number on number fields (`ADD` only), otherwise
/// one wire set value. Scalars and lists normalize into a native set first.
fn encode_add_operand(
    resolved: &ResolvedPath,
    action: &'static str,
    value: &Value,
    allow_number: bool,
) -> Result<AttributeValue> {
    let path = resolved.display();

    match resolved.field.as_ref().map(|field| &field.ty) {
        Some(FieldTy::Primitive(Primitive::Number | Primitive::Enum(EnumBase::Number))) => {
            if !allow_number {
                return Err(InvalidOperationError::UnsupportedAction {
                    action,
                    path,
                    reason: "field is not set-typed".to_string(),
                }
                .into());
            }
            mapper::encode_value(&path, value, &FieldTy::Primitive(Primitive::Number))
                .map_err(Into::into)
        }
        Some(FieldTy::Set { element, sorted }) => {
            let normalized = normalize_set(value);
            mapper::encode_value(
                &path,
                &normalized,
                &FieldTy::Set {
                    element: *element,
                    sorted: *sorted,
                },
            )
            .map_err(Into::into)
        }
        Some(_) => Err(InvalidOperationError::UnsupportedAction {
            action,
            path,
            reason: "field is neither number- nor set-typed".to_string(),
        }
        .into()),
        None => {
            let normalized = normalize_set(value);
            mapper::encode_value(&path, &normalized, &FieldTy::of(&normalized))
                .map_err(Into::into)
        }
    }
}

fn normalize_set(value: &Value) -> Value {
    match value {
        Value::Set(_) => value.clone(),
        Value::List(items) => Value::Set(items.clone()),
        scalar => Value::Set(vec![scalar.clone()]),
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}
