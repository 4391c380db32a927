use dynamap_core::schema::{Field, ModelSchema};
use dynamap_core::{Error, InvalidOperationError, Result};
use std::fmt::Write;

/// One segment of a parsed attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A plain identifier, resolved against the schema where one applies.
    Attr(String),

    /// A literal list index, emitted as `[n]` and never aliased.
    Index(u32),
}

/// A parsed attribute path such as `info.details` or `addresses[1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePath {
    pub segments: Vec<PathSegment>,
}

impl AttributePath {
    pub fn parse(raw: &str) -> Result<Self, InvalidOperationError> {
        let invalid = |reason: &str| InvalidOperationError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = vec![];
        for part in raw.split('.') {
            let (name, mut rest) = match part.find('[') {
                Some(at) => part.split_at(at),
                None => (part, ""),
            };
            if name.is_empty() {
                return Err(invalid("empty path segment"));
            }
            segments.push(PathSegment::Attr(name.to_string()));

            while !rest.is_empty() {
                let close = rest
                    .find(']')
                    .ok_or_else(|| invalid("unterminated index bracket"))?;
                let index = rest[1..close]
                    .parse::<u32>()
                    .map_err(|_| invalid("index is not a number"))?;
                segments.push(PathSegment::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(invalid("trailing characters after index"));
                }
            }
        }
        Ok(Self { segments })
    }
}

/// An attribute path resolved against a schema: identifier segments carry
/// their wire names, and the final identifier's descriptor is retained for
/// literal encoding.
#[derive(Debug)]
pub(crate) struct ResolvedPath {
    pub(crate) segments: Vec<ResolvedSegment>,

    /// Descriptor of the path's final identifier, when the schema knows it.
    /// Paths ending in an index or crossing a free-form map resolve to
    /// `None` and encode literals by inference.
    pub(crate) field: Option<Field>,
}

#[derive(Debug)]
pub(crate) enum ResolvedSegment {
    /// Wire name of a resolved (or passed-through) identifier.
    Attr(String),
    Index(u32),
}

/// Resolves `raw` against `schema`, walking nested schemas segment by
/// segment. Unknown identifiers under a schema-bearing context are an error;
/// identifiers under free-form maps or list elements pass through unchanged.
pub(crate) fn resolve_path(schema: &ModelSchema, raw: &str) -> Result<ResolvedPath> {
    let path = AttributePath::parse(raw)?;

    let mut segments = vec![];
    let mut field: Option<Field> = None;
    // The schema governing the next identifier segment. Starts at the root;
    // nested fields swap in their own schema, everything else clears it.
    let mut context: Option<std::sync::Arc<ModelSchema>> = None;
    let mut at_root = true;

    for segment in path.segments {
        match segment {
            PathSegment::Attr(name) => {
                let scope = context.take();
                let lookup: Option<&ModelSchema> =
                    if at_root { Some(schema) } else { scope.as_deref() };
                match lookup {
                    Some(lookup) => {
                        let resolved = lookup.field(&name).ok_or_else(|| {
                            Error::from(InvalidOperationError::UnknownField {
                                path: raw.to_string(),
                                name: name.clone(),
                            })
                        })?;
                        segments.push(ResolvedSegment::Attr(resolved.wire_name.clone()));
                        let nested = resolved.ty.as_nested();
                        field = Some(resolved.clone());
                        context = match nested {
                            Some(thunk) => Some(thunk()?),
                            None => None,
                        };
                    }
                    None => {
                        segments.push(ResolvedSegment::Attr(name));
                        field = None;
                    }
                }
                at_root = false;
            }
            PathSegment::Index(index) => {
                segments.push(ResolvedSegment::Index(index));
                field = None;
            }
        }
    }

    Ok(ResolvedPath { segments, field })
}

impl ResolvedPath {
    /// The dotted/indexed path text used in error messages.
    pub(crate) fn display(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                ResolvedSegment::Attr(wire) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(wire);
                }
                ResolvedSegment::Index(index) => {
                    let _ = write!(out, "[{index}]");
                }
            }
        }
        out
    }

    /// The base for `:token` placeholders: wire names joined with `_`,
    /// indexes rendered as `_at_<n>`, so dotted and indexed paths stay
    /// syntactically valid placeholder tokens.
    pub(crate) fn token_base(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                ResolvedSegment::Attr(wire) => {
                    if !out.is_empty() {
                        out.push('_');
                    }
                    for ch in wire.chars() {
                        out.push(if ch.is_ascii_alphanumeric() { ch } else { '_' });
                    }
                }
                ResolvedSegment::Index(index) => {
                    let _ = write!(out, "_at_{index}");
                }
            }
        }
        out
    }
}
