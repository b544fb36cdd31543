use crate::{
    codegen::go::naming,
    parse::path::{self, BadPath, PathFragment},
    parse::types::{Parameter, ParameterLocation, RefOr, RefOrParameter},
};

/// A compiled path template: the path rebuilt as a format string, plus the
/// arguments to format it with, in the order their slots appear.
///
/// Slot order in the path is canonical. The operation may declare its
/// parameters in any order; the generated method takes them left to right
/// as they appear in the URL.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathTemplate {
    format: String,
    arguments: Vec<String>,
}

impl PathTemplate {
    /// Compiles a raw path against the operation's declared parameters.
    ///
    /// Every `{name}` slot must correspond to an `in: path` parameter whose
    /// camel-cased name matches the camel-cased slot name. Parameters given
    /// by reference can't be matched, so a slot declared only through one
    /// fails the same way an undeclared slot does.
    pub fn compile(raw: &str, parameters: &[RefOrParameter]) -> Result<Self, TemplateError> {
        let segments = path::parse(raw)?;
        let declared = parameters
            .iter()
            .filter_map(|parameter| match parameter {
                RefOr::Other(parameter) if parameter.location == ParameterLocation::Path => {
                    Some(parameter)
                }
                _ => None,
            })
            .collect::<Vec<&Parameter>>();

        let mut format = String::new();
        let mut arguments = Vec::new();
        for segment in &segments {
            format.push('/');
            for fragment in segment.fragments() {
                match fragment {
                    // Literal percent signs are doubled so the rebuilt
                    // string is safe to hand to Sprintf.
                    PathFragment::Literal(text) => format.push_str(&text.replace('%', "%%")),
                    PathFragment::Slot(name) => {
                        let argument = naming::argument(name);
                        if !declared
                            .iter()
                            .any(|parameter| naming::argument(&parameter.name) == argument)
                        {
                            return Err(TemplateError::UnmatchedSlot {
                                slot: (*name).to_owned(),
                            });
                        }
                        format.push_str("%s");
                        arguments.push(argument);
                    }
                }
            }
        }
        Ok(Self { format, arguments })
    }

    /// The rebuilt path as a Sprintf format string, with each slot replaced
    /// by `%s`.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Argument names for the format string, camel-cased, in slot order.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn has_slots(&self) -> bool {
        !self.arguments.is_empty()
    }
}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum TemplateError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    BadPath(#[from] BadPath),
    #[error("path parameter `{{{slot}}}` has no matching `in: path` declaration")]
    UnmatchedSlot { slot: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn parameters(yaml: &str) -> Vec<RefOrParameter> {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn slots_become_placeholders_in_path_order() {
        // Declaration order is reversed on purpose; the path wins.
        let parameters = parameters(
            "[{name: orderId, in: path, required: true}, {name: userId, in: path, required: true}]",
        );
        let template = PathTemplate::compile("/users/{userId}/orders/{orderId}", &parameters).unwrap();

        assert_eq!(template.format(), "/users/%s/orders/%s");
        assert_eq!(template.arguments(), ["userId", "orderId"]);
        assert!(template.has_slots());
    }

    #[test]
    fn slot_names_match_after_camel_casing() {
        let parameters = parameters("[{name: user_id, in: path, required: true}]");
        let template = PathTemplate::compile("/users/{user_id}", &parameters).unwrap();

        assert_eq!(template.format(), "/users/%s");
        assert_eq!(template.arguments(), ["userId"]);
    }

    #[test]
    fn literal_paths_have_no_arguments() {
        let template = PathTemplate::compile("/pets", &[]).unwrap();

        assert_eq!(template.format(), "/pets");
        assert!(!template.has_slots());
    }

    #[test]
    fn literal_percent_signs_are_doubled() {
        let parameters = parameters("[{name: id, in: path, required: true}]");
        let template = PathTemplate::compile("/files/a%20b/{id}", &parameters).unwrap();

        assert_eq!(template.format(), "/files/a%%20b/%s");
    }

    #[test]
    fn undeclared_slots_fail() {
        let err = PathTemplate::compile("/users/{userId}", &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "path parameter `{userId}` has no matching `in: path` declaration"
        );
    }

    #[test]
    fn query_parameters_do_not_satisfy_slots() {
        let parameters = parameters("[{name: userId, in: query}]");
        let err = PathTemplate::compile("/users/{userId}", &parameters).unwrap_err();
        assert!(matches!(err, TemplateError::UnmatchedSlot { .. }));
    }

    #[test]
    fn referenced_parameters_do_not_satisfy_slots() {
        let parameters = parameters("[{$ref: '#/components/parameters/UserId'}]");
        let err = PathTemplate::compile("/users/{userId}", &parameters).unwrap_err();
        assert!(matches!(err, TemplateError::UnmatchedSlot { .. }));
    }

    #[test]
    fn malformed_paths_fail() {
        assert!(matches!(
            PathTemplate::compile("users", &[]),
            Err(TemplateError::BadPath(_))
        ));
        assert!(matches!(
            PathTemplate::compile("/users/{", &[]),
            Err(TemplateError::BadPath(_))
        ));
    }
}
