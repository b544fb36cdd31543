//! The Go back end: compiles a parsed OpenAPI document into a `dtos`
//! package of record types and a `client` package with one method per
//! operation, both linked against the gosling client runtime.

use crate::{
    codegen::{Generation, Requirement},
    model::Import,
    parse::types::Document,
};

mod client;
pub mod gomod;
mod naming;
mod operation;
mod printer;
mod resolve;
mod schema;
mod template;

pub use client::ClientError;
pub use operation::OperationError;
pub use resolve::ResolveError;
pub use schema::SchemaError;
pub use template::TemplateError;

/// Packages from the client runtime that generated code links against.
const SDK_PACKAGE: &str = "github.com/gosling-sdk/gosling/web/sdk";
const OPT_PACKAGE: &str = "github.com/gosling-sdk/gosling/system/opt";
const ERR_PACKAGE: &str = "github.com/gosling-sdk/gosling/errors";

/// The module that provides all of the runtime packages.
const RUNTIME_MODULE: &str = "github.com/gosling-sdk/gosling";

/// Import paths the compilers qualify generated names with.
pub(crate) struct Packages {
    pub sdk: Import,
    pub opt: Import,
    pub errors: Import,
    pub dtos: Import,
}

impl Packages {
    pub fn new(module: &str) -> Self {
        Self {
            sdk: Import::new(SDK_PACKAGE),
            opt: Import::new(OPT_PACKAGE),
            errors: Import::new(ERR_PACKAGE),
            dtos: Import::new(format!("{module}/dtos")),
        }
    }
}

/// Splits free-form description text into doc-comment lines, wrapped so the
/// rendered comment stays near 80 columns.
pub(crate) fn doc_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for line in text.trim().lines() {
        let line = line.trim_end();
        if line.is_empty() {
            lines.push(String::new());
        } else {
            lines.extend(
                textwrap::wrap(line, 76)
                    .into_iter()
                    .map(|line| line.into_owned()),
            );
        }
    }
    lines
}

/// Runs the whole generation pass over a parsed document and returns every
/// output it produced.
pub fn generate(document: &Document) -> Result<Generation, GenerateError> {
    let module = naming::module_name(&document.info.title);
    let packages = Packages::new(&module);

    let dtos = schema::compile_schemas(document.schemas())?;
    let mut definition = client::assemble(document, &packages)?;
    let warnings = std::mem::take(&mut definition.warnings);
    let client = definition.into_file(&packages);

    Ok(Generation {
        files: vec![
            ("dtos/dtos.go".into(), printer::render(&dtos)),
            ("client.go".into(), printer::render(&client)),
        ],
        module,
        requires: vec![Requirement::new(RUNTIME_MODULE, "latest")],
        warnings,
    })
}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Client(#[from] ClientError),
}
