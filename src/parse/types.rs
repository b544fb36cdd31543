use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::error::SerdeError;

/// An OpenAPI document.
#[derive(Debug, Deserialize)]
pub struct Document {
    pub openapi: String,
    pub info: Info,
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub components: Components,
}

impl Document {
    /// Parse an OpenAPI document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SerdeError> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml);
        let result = serde_path_to_error::deserialize(deserializer)?;
        Ok(result)
    }

    /// Parse an OpenAPI document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SerdeError> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        let result = serde_path_to_error::deserialize(&mut deserializer)?;
        Ok(result)
    }

    /// Returns the document's named component schemas.
    pub fn schemas(&self) -> &IndexMap<String, Schema> {
        &self.components.schemas
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Info {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
}

/// A server the API is available at.
#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Operation definitions for a single path.
#[derive(Debug, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub get: Option<Operation>,
    #[serde(default)]
    pub post: Option<Operation>,
    #[serde(default)]
    pub put: Option<Operation>,
    #[serde(default)]
    pub patch: Option<Operation>,
    #[serde(default)]
    pub delete: Option<Operation>,
    #[serde(default)]
    pub head: Option<Operation>,
    #[serde(default)]
    pub options: Option<Operation>,
    #[serde(default)]
    pub trace: Option<Operation>,
}

/// An HTTP request method.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl Method {
    /// The uppercase method name, as it appears in a request line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
        }
    }

    /// Whether this method conventionally carries a request body.
    pub fn takes_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PathItem {
    /// Returns an iterator over the operations for each HTTP method, in the
    /// fixed order GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS, TRACE.
    pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation)> {
        [
            (Method::Get, self.get.as_ref()),
            (Method::Post, self.post.as_ref()),
            (Method::Put, self.put.as_ref()),
            (Method::Patch, self.patch.as_ref()),
            (Method::Delete, self.delete.as_ref()),
            (Method::Head, self.head.as_ref()),
            (Method::Options, self.options.as_ref()),
            (Method::Trace, self.trace.as_ref()),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.map(|op| (method, op)))
    }
}

/// An HTTP operation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<RefOrParameter>,
    #[serde(default)]
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub responses: Option<IndexMap<StatusCode, Response>>,
}

/// A path, query, header, or cookie parameter.
#[derive(Clone, Debug, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: Option<RefOrSchema>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// Request body definition.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// Response definition.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// Media type content.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<RefOrSchema>,
}

/// A response map key: a numeric HTTP status code, a code range like `2XX`,
/// or the literal `default`.
///
/// YAML allows unquoted numeric keys, so the deserializer accepts both
/// strings and integers.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct StatusCode(String);

impl StatusCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == "default"
    }
}

impl From<&str> for StatusCode {
    fn from(code: &str) -> Self {
        Self(code.to_owned())
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StatusCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;
        impl serde::de::Visitor<'_> for Visitor {
            type Value = StatusCode;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a status code or `default`")
            }
            fn visit_str<E: serde::de::Error>(self, s: &str) -> Result<Self::Value, E> {
                Ok(StatusCode(s.to_owned()))
            }
            fn visit_u64<E: serde::de::Error>(self, code: u64) -> Result<Self::Value, E> {
                Ok(StatusCode(code.to_string()))
            }
            fn visit_i64<E: serde::de::Error>(self, code: i64) -> Result<Self::Value, E> {
                Ok(StatusCode(code.to_string()))
            }
        }
        deserializer.deserialize_any(Visitor)
    }
}

/// Components section containing reusable schemas.
#[derive(Debug, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
}

/// Either a reference to a component or an inline component definition.
///
/// The OpenAPI specification treats these locations as untagged unions: an
/// object with a `$ref` key is a reference, anything else is an inline
/// definition.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// A reference to a component definition via `$ref`.
    Ref(Ref),
    /// An inline component definition.
    Other(T),
}

/// Either a reference or a schema definition.
pub type RefOrSchema = RefOr<Box<Schema>>;

/// Either a reference or a parameter definition.
pub type RefOrParameter = RefOr<Parameter>;

/// A reference to another component.
#[derive(Debug, Clone, Deserialize)]
pub struct Ref {
    #[serde(rename = "$ref")]
    pub target: ComponentRef,
}

/// A schema's declared `type`.
///
/// The recognized tokens form a closed set; anything else is preserved
/// verbatim in [`Ty::Unknown`] so error messages can name it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Ty {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Unknown(String),
}

impl<'de> Deserialize<'de> for Ty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;
        impl serde::de::Visitor<'_> for Visitor {
            type Value = Ty;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a schema type")
            }
            fn visit_str<E: serde::de::Error>(self, s: &str) -> Result<Self::Value, E> {
                Ok(match s {
                    "string" => Ty::String,
                    "number" => Ty::Number,
                    "integer" => Ty::Integer,
                    "boolean" => Ty::Boolean,
                    "object" => Ty::Object,
                    "array" => Ty::Array,
                    other => Ty::Unknown(other.to_owned()),
                })
            }
        }
        deserializer.deserialize_str(Visitor)
    }
}

/// An OpenAPI schema definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type", default)]
    pub ty: Option<Ty>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub description: Option<String>,

    // Object properties.
    #[serde(default)]
    pub properties: IndexMap<String, RefOrSchema>,
    #[serde(default)]
    pub required: Vec<String>,

    // Array items.
    #[serde(default)]
    pub items: Option<RefOrSchema>,
}

impl Schema {
    /// The declared format, or the empty string when absent.
    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or("")
    }
}

/// A JSON Pointer reference to a component in the current document.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ComponentRef {
    segments: Vec<String>,
}

impl ComponentRef {
    /// Returns the unescaped pointer segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Extracts the component name (final segment, unescaped).
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// Whether this reference points into `#/components/schemas`.
    pub fn is_schema(&self) -> bool {
        matches!(
            self.segments.as_slice(),
            [head, kind, _] if head == "components" && kind == "schemas"
        )
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        for segment in &self.segments {
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

impl FromStr for ComponentRef {
    type Err = BadComponentRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(s) = s
            .trim_matches(|c| c <= ' ')
            .strip_prefix('#')
            .map(|rest| &rest[..rest.find(['\t', '\n', '\r']).unwrap_or(rest.len())])
        else {
            return Err(BadComponentRef::NotSameDocument);
        };
        if s.is_empty() {
            return Ok(Self {
                segments: Vec::new(),
            });
        }
        let Some(s) = s.strip_prefix('/') else {
            return Err(BadComponentRef::Syntax);
        };
        let segments = s
            .split('/')
            .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
            .collect();
        Ok(Self { segments })
    }
}

impl<'de> Deserialize<'de> for ComponentRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;
        impl serde::de::Visitor<'_> for Visitor {
            type Value = ComponentRef;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a component reference")
            }
            fn visit_str<E: serde::de::Error>(self, s: &str) -> Result<Self::Value, E> {
                s.parse().map_err(E::custom)
            }
        }
        deserializer.deserialize_str(Visitor)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BadComponentRef {
    #[error("references must start with `#`; external references aren't supported")]
    NotSameDocument,
    #[error("references must use an absolute JSON Pointer starting with `/`")]
    Syntax,
}
