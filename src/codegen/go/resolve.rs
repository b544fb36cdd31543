use indexmap::IndexMap;

use crate::{
    codegen::go::naming,
    model::GoType,
    parse::types::{Ref, RefOrSchema, Schema, Ty},
};

/// Resolution only recurses through array item schemas, so any chain longer
/// than this is a reference cycle.
const MAX_DEPTH: usize = 64;

/// Maps schema nodes to Go types.
///
/// Resolution depends only on a node's declared type, its format, and the
/// named component schemas it references.
pub struct Resolver<'a> {
    schemas: &'a IndexMap<String, Schema>,
}

impl<'a> Resolver<'a> {
    pub fn new(schemas: &'a IndexMap<String, Schema>) -> Self {
        Self { schemas }
    }

    pub fn resolve(&self, node: &RefOrSchema) -> Result<GoType, ResolveError> {
        self.resolve_at(node, 0)
    }

    fn resolve_at(&self, node: &RefOrSchema, depth: usize) -> Result<GoType, ResolveError> {
        if depth > MAX_DEPTH {
            return Err(ResolveError::DeeplyNested);
        }
        match node {
            RefOrSchema::Ref(r) => {
                let name = schema_name(r)?;
                let target = self
                    .schemas
                    .get(name)
                    .ok_or_else(|| ResolveError::UnresolvedReference {
                        reference: r.target.to_string(),
                    })?;
                self.resolve_schema(Some(name), target, depth)
            }
            RefOrSchema::Other(schema) => self.resolve_schema(None, schema, depth),
        }
    }

    /// Resolves a reference to the exported name of the record generated
    /// for its target schema. Unlike [`resolve`](Self::resolve), the
    /// target's own shape doesn't matter; every named schema gets a record.
    pub fn record(&self, r: &Ref) -> Result<String, ResolveError> {
        let name = schema_name(r)?;
        if !self.schemas.contains_key(name) {
            return Err(ResolveError::UnresolvedReference {
                reference: r.target.to_string(),
            });
        }
        Ok(naming::exported(name))
    }

    fn resolve_schema(
        &self,
        name: Option<&str>,
        schema: &Schema,
        depth: usize,
    ) -> Result<GoType, ResolveError> {
        Ok(match &schema.ty {
            None => GoType::Any,
            Some(Ty::String) => string_format(schema.format())?,
            Some(Ty::Number | Ty::Integer) => number_format(schema.format())?,
            Some(Ty::Boolean) => GoType::Bool,
            Some(Ty::Object) => match name {
                Some(name) => GoType::Record(naming::exported(name)),
                None => return Err(ResolveError::AnonymousObject),
            },
            Some(Ty::Array) => match &schema.items {
                Some(items) => GoType::sequence(self.resolve_at(items, depth + 1)?),
                // An array with no item schema holds anything.
                None => GoType::sequence(GoType::Any),
            },
            // A present-but-empty type token resolves like a missing one.
            Some(Ty::Unknown(token)) if token.is_empty() => GoType::Any,
            Some(Ty::Unknown(token)) => {
                return Err(ResolveError::UnsupportedType {
                    ty: token.clone(),
                });
            }
        })
    }
}

/// Checks that a reference points into `#/components/schemas` and returns
/// the referenced schema's name.
pub fn schema_name(r: &Ref) -> Result<&str, ResolveError> {
    if r.target.is_schema() {
        Ok(r.target.name())
    } else {
        Err(ResolveError::NotASchema {
            reference: r.target.to_string(),
        })
    }
}

fn string_format(format: &str) -> Result<GoType, ResolveError> {
    Ok(match format {
        "" | "phone" | "email" => GoType::String,
        // Some dialects mark integer fields as strings with an `integer`
        // format.
        "integer" => GoType::Int64,
        "uuid" => GoType::Uuid,
        "ulid" => GoType::Ulid,
        "date" | "date-time" => GoType::Timestamp,
        "binary" | "byte" => GoType::Bytes,
        "uri" | "url" => GoType::Uri,
        "ipv4" | "ipv6" | "hostname" => GoType::IpAddr,
        _ => {
            return Err(ResolveError::UnsupportedStringFormat {
                format: format.to_owned(),
            });
        }
    })
}

fn number_format(format: &str) -> Result<GoType, ResolveError> {
    Ok(match format {
        "" => GoType::Float64,
        "float" => GoType::Float32,
        "double" => GoType::Float64,
        "int32" => GoType::Int32,
        "int64" => GoType::Int64,
        _ => {
            return Err(ResolveError::UnsupportedNumberFormat {
                format: format.to_owned(),
            });
        }
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("unsupported `string` format {format}")]
    UnsupportedStringFormat { format: String },
    #[error("unsupported `number` format {format}")]
    UnsupportedNumberFormat { format: String },
    #[error("unsupported type {ty}")]
    UnsupportedType { ty: String },
    #[error("`{reference}` doesn't resolve to a schema in this document")]
    UnresolvedReference { reference: String },
    #[error("`{reference}` doesn't reference a component schema")]
    NotASchema { reference: String },
    #[error("inline object schemas aren't supported; extract the object into a named component schema")]
    AnonymousObject,
    #[error("schema references nest too deeply; self-referential arrays aren't supported")]
    DeeplyNested,
}
