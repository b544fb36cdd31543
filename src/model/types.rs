/// A Go import path, like `github.com/google/uuid`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Import(String);

/// Standard-library packages that generated code can import. The printer
/// groups these ahead of third-party and module-local imports.
const STD_PACKAGES: &[&str] = &["context", "fmt", "net", "net/url", "time"];

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &str {
        &self.0
    }

    /// The package name Go infers from the path: its last segment.
    pub fn package(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn is_std(&self) -> bool {
        STD_PACKAGES.contains(&self.0.as_str())
    }
}

/// The resolved Go type for a schema node.
///
/// This is the closed set of shapes that OpenAPI schemas map onto. Every
/// consumer matches exhaustively, so adding a variant surfaces each place
/// that needs to learn about it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GoType {
    String,
    Int32,
    Int64,
    Float32,
    Float64,
    Bool,
    /// `[]byte`, for binary payloads.
    Bytes,
    /// `time.Time`, for `date` and `date-time` strings.
    Timestamp,
    /// `url.URL`, for `uri`, `url`, and `hostname` strings.
    Uri,
    /// `net.IP`, for `ipv4` and `ipv6` strings.
    IpAddr,
    Uuid,
    Ulid,
    /// `any`, for schemas that don't constrain their values.
    Any,
    /// A named struct in the generated `dtos` package.
    Record(String),
    Sequence(Box<GoType>),
}

impl GoType {
    pub fn sequence(item: GoType) -> Self {
        Self::Sequence(Box::new(item))
    }

    /// Spells this type as Go syntax. `dtos` qualifies record references;
    /// pass `None` when the spelling is for the dtos package itself.
    pub fn type_expr(&self, dtos: Option<&Import>) -> TypeExpr {
        match self {
            Self::String => TypeExpr::named("string"),
            Self::Int32 => TypeExpr::named("int32"),
            Self::Int64 => TypeExpr::named("int64"),
            Self::Float32 => TypeExpr::named("float32"),
            Self::Float64 => TypeExpr::named("float64"),
            Self::Bool => TypeExpr::named("bool"),
            Self::Bytes => TypeExpr::named("byte").slice(),
            Self::Timestamp => TypeExpr::qual(&Import::new("time"), "Time"),
            Self::Uri => TypeExpr::qual(&Import::new("net/url"), "URL"),
            Self::IpAddr => TypeExpr::qual(&Import::new("net"), "IP"),
            Self::Uuid => TypeExpr::qual(&Import::new("github.com/google/uuid"), "UUID"),
            Self::Ulid => TypeExpr::qual(&Import::new("github.com/oklog/ulid"), "ULID"),
            Self::Any => TypeExpr::named("any"),
            Self::Record(name) => match dtos {
                Some(dtos) => TypeExpr::qual(dtos, name),
                None => TypeExpr::named(name),
            },
            Self::Sequence(item) => item.type_expr(dtos).slice(),
        }
    }

    /// Whether values of this type name a generated record, directly or
    /// through a sequence.
    pub fn is_record(&self) -> bool {
        match self {
            Self::Record(_) => true,
            Self::Sequence(item) => item.is_record(),
            _ => false,
        }
    }
}

/// A type as it's spelled at a use site.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeExpr {
    /// A bare name: a builtin like `string`, or a type in the same package.
    Named(String),
    /// A type from another package, like `time.Time`.
    Qual(Import, String),
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    /// An instantiated generic type, like `opt.Option[sdk.Config]`.
    Generic(Box<TypeExpr>, Vec<TypeExpr>),
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn qual(import: &Import, name: impl Into<String>) -> Self {
        Self::Qual(import.clone(), name.into())
    }

    pub fn pointer(self) -> Self {
        Self::Pointer(Box::new(self))
    }

    pub fn slice(self) -> Self {
        Self::Slice(Box::new(self))
    }

    pub fn generic(self, args: Vec<TypeExpr>) -> Self {
        Self::Generic(Box::new(self), args)
    }

    /// Collects every import this type mentions into `imports`.
    pub fn imports_into(&self, imports: &mut Vec<Import>) {
        match self {
            Self::Named(_) => {}
            Self::Qual(import, _) => imports.push(import.clone()),
            Self::Pointer(inner) | Self::Slice(inner) => inner.imports_into(imports),
            Self::Generic(base, args) => {
                base.imports_into(imports);
                for arg in args {
                    arg.imports_into(imports);
                }
            }
        }
    }
}
