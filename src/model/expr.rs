use crate::model::{Import, TypeExpr};

/// An expression in a generated function body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expr {
    Ident(String),
    /// A double-quoted string literal. The printer escapes the contents.
    Str(String),
    /// A name from another package, like `sdk.Body`.
    Qual(Import, String),
    /// A field or method selection, like `c.Client`.
    Field(Box<Expr>, String),
    Call(Call),
    /// A prefix operator applied to an operand, like `&c` or `*c.Client`.
    Unary(&'static str, Box<Expr>),
    Binary(Box<Expr>, &'static str, Box<Expr>),
    StructLit {
        ty: TypeExpr,
        fields: Vec<(String, Expr)>,
    },
    Nil,
}

/// A call expression, optionally instantiated and optionally spreading its
/// final argument with `...`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Call {
    pub func: Box<Expr>,
    /// Type arguments for generic functions, like `sdk.Execute[dtos.Pet]`.
    pub type_args: Vec<TypeExpr>,
    pub args: Vec<Expr>,
    pub variadic: bool,
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    pub fn qual(import: &Import, name: impl Into<String>) -> Self {
        Self::Qual(import.clone(), name.into())
    }

    pub fn field(self, name: impl Into<String>) -> Self {
        Self::Field(Box::new(self), name.into())
    }

    pub fn call(self, args: Vec<Expr>) -> Self {
        Self::Call(Call {
            func: Box::new(self),
            type_args: Vec::new(),
            args,
            variadic: false,
        })
    }

    /// Calls with the final argument spread, like `c.Request(method, path,
    /// opts...)`.
    pub fn call_variadic(self, args: Vec<Expr>) -> Self {
        Self::Call(Call {
            func: Box::new(self),
            type_args: Vec::new(),
            args,
            variadic: true,
        })
    }

    pub fn call_generic(self, type_args: Vec<TypeExpr>, args: Vec<Expr>) -> Self {
        Self::Call(Call {
            func: Box::new(self),
            type_args,
            args,
            variadic: false,
        })
    }

    pub fn addr(self) -> Self {
        Self::Unary("&", Box::new(self))
    }

    pub fn deref(self) -> Self {
        Self::Unary("*", Box::new(self))
    }

    pub fn binary(self, op: &'static str, rhs: Expr) -> Self {
        Self::Binary(Box::new(self), op, Box::new(rhs))
    }

    pub fn struct_lit(ty: TypeExpr, fields: Vec<(String, Expr)>) -> Self {
        Self::StructLit { ty, fields }
    }

    pub fn imports_into(&self, imports: &mut Vec<Import>) {
        match self {
            Self::Ident(_) | Self::Str(_) | Self::Nil => {}
            Self::Qual(import, _) => imports.push(import.clone()),
            Self::Field(base, _) => base.imports_into(imports),
            Self::Call(call) => {
                call.func.imports_into(imports);
                for arg in &call.type_args {
                    arg.imports_into(imports);
                }
                for arg in &call.args {
                    arg.imports_into(imports);
                }
            }
            Self::Unary(_, operand) => operand.imports_into(imports),
            Self::Binary(lhs, _, rhs) => {
                lhs.imports_into(imports);
                rhs.imports_into(imports);
            }
            Self::StructLit { ty, fields } => {
                ty.imports_into(imports);
                for (_, value) in fields {
                    value.imports_into(imports);
                }
            }
        }
    }
}

/// A statement in a generated function body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Stmt {
    /// A short variable declaration, like `path := "/pets"`.
    Define { names: Vec<String>, value: Expr },
    /// An assignment to an existing variable.
    Assign { target: Expr, value: Expr },
    If { cond: Expr, body: Vec<Stmt> },
    Return(Vec<Expr>),
}

impl Stmt {
    pub fn define(names: &[&str], value: Expr) -> Self {
        Self::Define {
            names: names.iter().map(|name| name.to_string()).collect(),
            value,
        }
    }

    pub fn imports_into(&self, imports: &mut Vec<Import>) {
        match self {
            Self::Define { value, .. } => value.imports_into(imports),
            Self::Assign { target, value } => {
                target.imports_into(imports);
                value.imports_into(imports);
            }
            Self::If { cond, body } => {
                cond.imports_into(imports);
                for stmt in body {
                    stmt.imports_into(imports);
                }
            }
            Self::Return(values) => {
                for value in values {
                    value.imports_into(imports);
                }
            }
        }
    }
}
