use std::borrow::Cow;

use heck::{AsKebabCase, AsLowerCamelCase, AsUpperCamelCase};

use crate::parse::types::{Method, Operation};

/// Go reserved words that can't be used as identifiers.
const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Names that generated method bodies declare themselves. Arguments that
/// would collide with one get renamed.
const LOCALS: &[&str] = &[
    "c", "ctx", "endpoint", "err", "opts", "path", "req", "request", "response",
];

/// Returns an exported UpperCamelCase Go name.
///
/// Go exports by case, so a name that can't start with an uppercase letter
/// gets an `X` prefix.
pub fn exported(name: &str) -> String {
    let name = format!("{}", AsUpperCamelCase(name));
    if name.starts_with(unicode_ident::is_xid_start) {
        name
    } else {
        format!("X{name}")
    }
}

/// Returns a lowerCamelCase Go name for a method argument.
pub fn argument(name: &str) -> String {
    let name = format!("{}", AsLowerCamelCase(name));
    if !name.starts_with(unicode_ident::is_xid_start) {
        format!("p{name}")
    } else if KEYWORDS.contains(&name.as_str()) || LOCALS.contains(&name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}

/// Derives the client method name for an operation.
///
/// The operation's own identifier wins; an operation without one is named
/// after its verb and first tag. Either way the name is split on `-`, `_`,
/// and `.`, and each fragment is UpperCamelCased and concatenated, so
/// `get-user_profile.v2` becomes `GetUserProfileV2`. Returns `None` when
/// nothing usable is left to name the method with.
pub fn method_name(operation: &Operation, method: Method) -> Option<String> {
    let id = match operation.operation_id.as_deref() {
        Some(id) if !id.is_empty() => Cow::Borrowed(id),
        _ => {
            let tag = operation.tags.first()?;
            Cow::Owned(format!(
                "{}{}",
                AsUpperCamelCase(method.as_str()),
                AsUpperCamelCase(tag)
            ))
        }
    };
    let name = id
        .split(['-', '_', '.'])
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| format!("{}", AsUpperCamelCase(fragment)))
        .collect::<String>();
    (!name.is_empty()).then_some(name)
}

/// Derives the generated Go module name from the document's title.
pub fn module_name(title: &str) -> String {
    format!("{}", AsKebabCase(title))
}
