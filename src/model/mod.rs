//! A small code model for the subset of Go that generated clients use.
//!
//! Compilers build these values instead of concatenating source text; the
//! printer in `codegen::go` renders them, so the transformation logic stays
//! independent of Go's concrete syntax.

mod expr;
mod types;

pub use expr::{Call, Expr, Stmt};
pub use types::{GoType, Import, TypeExpr};

/// A single generated Go source file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GoFile {
    pub package: String,
    pub decls: Vec<Decl>,
}

/// A top-level declaration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Decl {
    Struct(StructDecl),
    Func(FuncDecl),
}

/// A `type Name struct { ... }` declaration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StructDecl {
    pub doc: Vec<String>,
    pub name: String,
    /// Embedded types, listed before the named fields.
    pub embeds: Vec<TypeExpr>,
    pub fields: Vec<FieldDecl>,
}

/// A named struct field with an optional backtick tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    /// Tag contents without the surrounding backticks,
    /// like `json:"id,omitempty"`.
    pub tag: Option<String>,
}

/// A function or method declaration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FuncDecl {
    pub doc: Vec<String>,
    pub receiver: Option<Param>,
    pub name: String,
    pub params: Vec<Param>,
    pub results: Vec<TypeExpr>,
    pub body: Vec<Stmt>,
}

/// A function parameter or receiver.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: TypeExpr,
    pub variadic: bool,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            variadic: false,
        }
    }

    pub fn variadic(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            variadic: true,
        }
    }
}
