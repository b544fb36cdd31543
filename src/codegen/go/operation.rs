use indexmap::IndexMap;

use crate::{
    codegen::go::{
        Packages, doc_lines, naming,
        resolve::{ResolveError, Resolver},
        template::{PathTemplate, TemplateError},
    },
    model::{Expr, GoType, Import, Param, Stmt, TypeExpr},
    parse::types::{Method, Operation, RefOr, RefOrSchema, Response, StatusCode},
};

/// Success status codes, tried in priority order before the default
/// response.
const SUCCESS_CODES: &[&str] = &["200", "201", "202"];

/// The compiled form of one client method.
///
/// Built once per operation and never mutated afterwards; the assembler
/// only reads it.
#[derive(Clone, Debug)]
pub struct MethodDescriptor {
    pub name: String,
    pub doc: Vec<String>,
    /// Context handle first, then path arguments in slot order, then the
    /// request body if the operation declares one, then the variadic
    /// options.
    pub arguments: Vec<Param>,
    pub ret: GoType,
    pub body: Vec<Stmt>,
}

impl MethodDescriptor {
    /// The method's declared result type. Record results are returned by
    /// pointer so a failed call can return `nil` alongside its error.
    pub fn result_type(&self, dtos: &Import) -> TypeExpr {
        match &self.ret {
            GoType::Record(name) => TypeExpr::qual(dtos, name).pointer(),
            ty => ty.type_expr(Some(dtos)),
        }
    }
}

/// What compiling one operation produced.
#[derive(Clone, Debug)]
pub enum Compiled {
    Method(MethodDescriptor),
    /// The operation can't be represented as a client method; the run
    /// continues without it.
    Skipped(Skip),
}

/// Why an operation produced no client method.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Skip {
    /// The declared request body has no `application/json` media type.
    NoJsonRequestBody,
    /// No success or default response offers an `application/json` schema.
    NoJsonResponse,
}

impl Skip {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoJsonRequestBody => {
                "no request body found for operation with content type application/json"
            }
            Self::NoJsonResponse => {
                "no default response found for operation with content type application/json"
            }
        }
    }
}

/// Compiles one (verb, path, operation) triple into a method descriptor.
pub fn compile_operation(
    method: Method,
    path: &str,
    operation: &Operation,
    resolver: &Resolver<'_>,
    packages: &Packages,
) -> Result<Compiled, OperationError> {
    let Some(name) = naming::method_name(operation, method) else {
        return Err(OperationError::Unnamed);
    };

    // A request body only matters if it can be sent as JSON. Verbs that
    // don't conventionally carry a body keep their body-less signature.
    let mut body_record = None;
    if let Some(request_body) = &operation.request_body {
        match request_body.content.get("application/json") {
            Some(media) => match media.schema.as_ref() {
                Some(RefOr::Ref(r)) => {
                    body_record = Some(
                        resolver
                            .record(r)
                            .map_err(|source| OperationError::RequestBody { source })?,
                    );
                }
                _ => return Err(OperationError::UnnamedRequestBody),
            },
            None if method.takes_body() => {
                return Ok(Compiled::Skipped(Skip::NoJsonRequestBody));
            }
            None => {}
        }
    }

    let ret = match success_response(operation, &name)? {
        ResponseSchema::Resolved(node) => resolver
            .resolve(node)
            .map_err(|source| OperationError::ResponseType { source })?,
        ResponseSchema::Missing => return Ok(Compiled::Skipped(Skip::NoJsonResponse)),
    };

    let template = PathTemplate::compile(path, &operation.parameters)?;

    let mut arguments = vec![Param::new(
        "ctx",
        TypeExpr::qual(&Import::new("context"), "Context"),
    )];
    arguments.extend(
        template
            .arguments()
            .iter()
            .map(|name| Param::new(name.clone(), TypeExpr::named("string"))),
    );
    if let Some(record) = &body_record {
        arguments.push(Param::new(
            "req",
            TypeExpr::qual(&packages.dtos, record).pointer(),
        ));
    }
    arguments.push(Param::variadic(
        "opts",
        TypeExpr::qual(&packages.opt, "Option")
            .generic(vec![TypeExpr::qual(&packages.sdk, "Request")]),
    ));

    let mut doc = vec![format!("{name} performs the {method} {path} operation.")];
    if let Some(description) = operation.description.as_deref() {
        doc.extend(doc_lines(description));
    }

    let body = method_body(method, path, &template, body_record.is_some(), &ret, packages);

    Ok(Compiled::Method(MethodDescriptor {
        name,
        doc,
        arguments,
        ret,
        body,
    }))
}

/// The body steps every method shares: format the path, build the request,
/// execute it, check the error, return.
fn method_body(
    method: Method,
    path: &str,
    template: &PathTemplate,
    has_body: bool,
    ret: &GoType,
    packages: &Packages,
) -> Vec<Stmt> {
    let mut body = Vec::new();

    if template.has_slots() {
        let mut args = vec![Expr::str(template.format())];
        args.extend(template.arguments().iter().map(Expr::ident));
        body.push(Stmt::define(
            &["path"],
            Expr::qual(&Import::new("fmt"), "Sprintf").call(args),
        ));
    } else {
        body.push(Stmt::define(&["path"], Expr::str(path)));
    }

    let options = if has_body {
        Expr::ident("append").call(vec![
            Expr::ident("opts"),
            Expr::qual(&packages.sdk, "Body").call(vec![Expr::ident("req")]),
        ])
    } else {
        Expr::ident("opts")
    };
    body.push(Stmt::define(
        &["request"],
        Expr::ident("c").field("Request").call_variadic(vec![
            Expr::str(method.as_str()),
            Expr::ident("path"),
            options,
        ]),
    ));

    let execute_ty = match ret {
        GoType::Record(name) => TypeExpr::qual(&packages.dtos, name),
        ty => ty.type_expr(Some(&packages.dtos)),
    };
    body.push(Stmt::define(
        &["response", "err"],
        Expr::qual(&packages.sdk, "Execute").call_generic(
            vec![execute_ty],
            vec![
                Expr::ident("ctx"),
                Expr::ident("c").field("Client").deref(),
                Expr::ident("request"),
            ],
        ),
    ));

    // The wrap message goes through Wrapf's format parser, so literal
    // percent signs in the path are doubled.
    let context = format!(
        "failed to execute {} {} operation",
        method,
        path.replace('%', "%%")
    );
    body.push(Stmt::If {
        cond: Expr::ident("err").binary("!=", Expr::Nil),
        body: vec![Stmt::Return(vec![
            Expr::ident("response"),
            Expr::qual(&packages.errors, "Wrapf")
                .call(vec![Expr::ident("err"), Expr::str(context)]),
        ])],
    });
    body.push(Stmt::Return(vec![Expr::ident("response"), Expr::Nil]));

    body
}

enum ResponseSchema<'a> {
    Resolved(&'a RefOrSchema),
    Missing,
}

/// Picks the response whose schema determines the return type: 200, then
/// 201, then 202, then the declared default.
fn success_response<'a>(
    operation: &'a Operation,
    name: &str,
) -> Result<ResponseSchema<'a>, OperationError> {
    let responses = match &operation.responses {
        Some(responses) if !responses.is_empty() => responses,
        _ => {
            return Err(OperationError::NoResponses {
                name: name.to_owned(),
            });
        }
    };
    let response = SUCCESS_CODES
        .iter()
        .find_map(|code| responses.get(&StatusCode::from(*code)))
        .or_else(|| default_response(responses));
    let Some(response) = response else {
        return Ok(ResponseSchema::Missing);
    };
    match response
        .content
        .get("application/json")
        .and_then(|media| media.schema.as_ref())
    {
        Some(node) => Ok(ResponseSchema::Resolved(node)),
        None => Ok(ResponseSchema::Missing),
    }
}

fn default_response(responses: &IndexMap<StatusCode, Response>) -> Option<&Response> {
    responses
        .iter()
        .find(|(code, _)| code.is_default())
        .map(|(_, response)| response)
}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum OperationError {
    #[error("operation has no operationId or tags to derive a method name")]
    Unnamed,
    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),
    #[error("request bodies must reference a named component schema")]
    UnnamedRequestBody,
    #[error("invalid request body schema")]
    RequestBody {
        #[source]
        source: ResolveError,
    },
    #[error("no response codes found for operation {name}")]
    NoResponses { name: String },
    #[error("invalid response type")]
    ResponseType {
        #[source]
        source: ResolveError,
    },
}
