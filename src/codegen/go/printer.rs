use std::collections::BTreeSet;
use std::fmt::Write;

use itertools::Itertools;

use crate::model::{
    Decl, Expr, FieldDecl, FuncDecl, GoFile, Import, Param, Stmt, StructDecl, TypeExpr,
};

/// Renders a source file from the code model.
///
/// The output follows gofmt's layout for the subset of Go the generator
/// emits: tab indentation, grouped imports, space-aligned struct fields.
/// Rendering is a pure function of the model, so an unchanged model always
/// reproduces identical bytes.
pub fn render(file: &GoFile) -> String {
    Printer::default().file(file)
}

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn file(mut self, file: &GoFile) -> String {
        self.out.push_str("// Code generated by gosling.\n");
        self.out.push_str("// DO NOT EDIT.\n\n");
        let _ = writeln!(self.out, "package {}", file.package);

        let imports = collect_imports(file);
        if !imports.is_empty() {
            self.out.push('\n');
            self.imports(&imports);
        }

        for decl in &file.decls {
            self.out.push('\n');
            match decl {
                Decl::Struct(decl) => self.struct_decl(decl),
                Decl::Func(decl) => self.func_decl(decl),
            }
        }
        self.out
    }

    /// Writes the import block: standard-library paths first, then
    /// everything else, each group sorted.
    fn imports(&mut self, imports: &BTreeSet<Import>) {
        self.out.push_str("import (\n");
        let (std, other): (Vec<&Import>, Vec<&Import>) =
            imports.iter().partition(|import| import.is_std());
        for import in &std {
            let _ = writeln!(self.out, "\t\"{}\"", import.path());
        }
        if !std.is_empty() && !other.is_empty() {
            self.out.push('\n');
        }
        for import in &other {
            let _ = writeln!(self.out, "\t\"{}\"", import.path());
        }
        self.out.push_str(")\n");
    }

    fn doc(&mut self, lines: &[String]) {
        for line in lines {
            if line.is_empty() {
                self.line("//");
            } else {
                self.line(&format!("// {line}"));
            }
        }
    }

    fn struct_decl(&mut self, decl: &StructDecl) {
        self.doc(&decl.doc);
        if decl.embeds.is_empty() && decl.fields.is_empty() {
            self.line(&format!("type {} struct{{}}", decl.name));
            return;
        }
        self.line(&format!("type {} struct {{", decl.name));
        self.indent += 1;
        for embed in &decl.embeds {
            self.line(&type_string(embed));
        }
        self.fields(&decl.fields);
        self.indent -= 1;
        self.line("}");
    }

    /// Writes named fields with their types and tags space-aligned into
    /// columns, the way gofmt lays them out.
    fn fields(&mut self, fields: &[FieldDecl]) {
        let name_width = fields.iter().map(|field| field.name.len()).max().unwrap_or(0);
        let types: Vec<String> = fields.iter().map(|field| type_string(&field.ty)).collect();
        let type_width = types.iter().map(String::len).max().unwrap_or(0);
        for (field, ty) in fields.iter().zip(&types) {
            match &field.tag {
                Some(tag) => self.line(&format!(
                    "{:<name_width$} {:<type_width$} `{tag}`",
                    field.name, ty
                )),
                None => self.line(&format!("{:<name_width$} {ty}", field.name)),
            }
        }
    }

    fn func_decl(&mut self, decl: &FuncDecl) {
        self.doc(&decl.doc);
        let mut signature = String::from("func ");
        if let Some(receiver) = &decl.receiver {
            let _ = write!(signature, "({}) ", param_string(receiver));
        }
        let params = decl.params.iter().map(param_string).join(", ");
        let _ = write!(signature, "{}({params})", decl.name);
        match decl.results.as_slice() {
            [] => {}
            [result] => {
                let _ = write!(signature, " {}", type_string(result));
            }
            results => {
                let results = results.iter().map(type_string).join(", ");
                let _ = write!(signature, " ({results})");
            }
        }
        signature.push_str(" {");
        self.line(&signature);
        self.indent += 1;
        for stmt in &decl.body {
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.line("}");
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Define { names, value } => {
                let value = self.expr(value);
                self.line(&format!("{} := {value}", names.join(", ")));
            }
            Stmt::Assign { target, value } => {
                let target = self.expr(target);
                let value = self.expr(value);
                self.line(&format!("{target} = {value}"));
            }
            Stmt::If { cond, body } => {
                let cond = self.expr(cond);
                self.line(&format!("if {cond} {{"));
                self.indent += 1;
                for stmt in body {
                    self.stmt(stmt);
                }
                self.indent -= 1;
                self.line("}");
            }
            Stmt::Return(values) => {
                if values.is_empty() {
                    self.line("return");
                } else {
                    let values = values.iter().map(|value| self.expr(value)).join(", ");
                    self.line(&format!("return {values}"));
                }
            }
        }
    }

    fn expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Ident(name) => name.clone(),
            Expr::Str(value) => quote(value),
            Expr::Qual(import, name) => format!("{}.{name}", import.package()),
            Expr::Field(base, name) => format!("{}.{name}", self.expr(base)),
            Expr::Call(call) => {
                let mut out = self.expr(&call.func);
                if !call.type_args.is_empty() {
                    let args = call.type_args.iter().map(type_string).join(", ");
                    let _ = write!(out, "[{args}]");
                }
                let mut args = call.args.iter().map(|arg| self.expr(arg)).collect_vec();
                if call.variadic
                    && let Some(last) = args.last_mut()
                {
                    last.push_str("...");
                }
                let _ = write!(out, "({})", args.join(", "));
                out
            }
            Expr::Unary(op, operand) => format!("{op}{}", self.expr(operand)),
            Expr::Binary(lhs, op, rhs) => {
                format!("{} {op} {}", self.expr(lhs), self.expr(rhs))
            }
            Expr::StructLit { ty, fields } => {
                let mut out = format!("{}{{\n", type_string(ty));
                for (name, value) in fields {
                    let value = self.expr(value);
                    let _ = writeln!(out, "{}{name}: {value},", "\t".repeat(self.indent + 1));
                }
                let _ = write!(out, "{}}}", "\t".repeat(self.indent));
                out
            }
            Expr::Nil => "nil".into(),
        }
    }

    fn line(&mut self, line: &str) {
        if line.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.out.push('\t');
        }
        self.out.push_str(line);
        self.out.push('\n');
    }
}

fn collect_imports(file: &GoFile) -> BTreeSet<Import> {
    let mut imports = Vec::new();
    for decl in &file.decls {
        match decl {
            Decl::Struct(decl) => {
                for embed in &decl.embeds {
                    embed.imports_into(&mut imports);
                }
                for field in &decl.fields {
                    field.ty.imports_into(&mut imports);
                }
            }
            Decl::Func(decl) => {
                if let Some(receiver) = &decl.receiver {
                    receiver.ty.imports_into(&mut imports);
                }
                for param in &decl.params {
                    param.ty.imports_into(&mut imports);
                }
                for result in &decl.results {
                    result.imports_into(&mut imports);
                }
                for stmt in &decl.body {
                    stmt.imports_into(&mut imports);
                }
            }
        }
    }
    imports.into_iter().collect()
}

fn type_string(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Named(name) => name.clone(),
        TypeExpr::Qual(import, name) => format!("{}.{name}", import.package()),
        TypeExpr::Pointer(inner) => format!("*{}", type_string(inner)),
        TypeExpr::Slice(inner) => format!("[]{}", type_string(inner)),
        TypeExpr::Generic(base, args) => {
            let args = args.iter().map(type_string).join(", ");
            format!("{}[{args}]", type_string(base))
        }
    }
}

fn param_string(param: &Param) -> String {
    if param.variadic {
        format!("{} ...{}", param.name, type_string(&param.ty))
    } else {
        format!("{} {}", param.name, type_string(&param.ty))
    }
}

/// Renders a double-quoted Go string literal.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
