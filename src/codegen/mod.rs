use std::path::Path;

use miette::{Context, IntoDiagnostic};

pub mod go;

/// Everything one generation run produces. Compilers return these instead of
/// writing output as they go, so callers decide what to do with the results
/// and a failed run leaves nothing half-written.
#[derive(Clone, Debug)]
pub struct Generation {
    /// Generated files as relative path and contents pairs.
    pub files: Vec<(String, String)>,
    /// The Go module name derived from the document's title.
    pub module: String,
    /// Modules the generated code depends on.
    pub requires: Vec<Requirement>,
    /// Operations that were skipped, with the reason for each.
    pub warnings: Vec<String>,
}

/// A required module in the generated `go.mod`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Requirement {
    pub module: String,
    pub version: String,
}

impl Requirement {
    pub fn new(module: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            version: version.into(),
        }
    }
}

pub fn write_to_disk(output: &Path, code: impl IntoCode) -> miette::Result<()> {
    let code = code.into_code();
    let path = output.join(code.path());
    let string = code.into_string()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .into_diagnostic()
            .with_context(|| format!("Failed to create directory `{}`", parent.display()))?;
    }
    std::fs::write(&path, string)
        .into_diagnostic()
        .with_context(|| format!("Failed to write `{}`", path.display()))?;
    Ok(())
}

pub trait Code {
    fn path(&self) -> &str;
    fn into_string(self) -> miette::Result<String>;
}

impl<T: AsRef<str>> Code for (T, String) {
    fn path(&self) -> &str {
        self.0.as_ref()
    }

    fn into_string(self) -> miette::Result<String> {
        Ok(self.1)
    }
}

pub trait IntoCode {
    type Code: Code;

    fn into_code(self) -> Self::Code;
}

impl<T: Code> IntoCode for T {
    type Code = T;

    fn into_code(self) -> Self::Code {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_and_contents_pairs_are_code() {
        let file = ("dtos/dtos.go".to_string(), "package dtos\n".to_string());
        let code = file.into_code();
        assert_eq!(code.path(), "dtos/dtos.go");
        assert_eq!(code.into_string().unwrap(), "package dtos\n");
    }
}
