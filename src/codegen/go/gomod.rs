use std::fmt::Write;

use crate::codegen::Requirement;

/// The Go toolchain version stamped into generated modules.
const GO_VERSION: &str = "1.23.0";

/// Renders the generated module's `go.mod`. Versions are written as given;
/// the driver runs `go mod tidy` afterwards to pin them.
pub fn render(module: &str, requires: &[Requirement]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "module {module}");
    let _ = writeln!(out);
    let _ = writeln!(out, "go {GO_VERSION}");
    if !requires.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "require (");
        for require in requires {
            let _ = writeln!(out, "\t{} {}", require.module, require.version);
        }
        let _ = writeln!(out, ")");
    }
    out
}
