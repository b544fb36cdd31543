use miette::SourceSpan;
use winnow::{
    Parser,
    combinator::eof,
    error::{ContextError, ParseError},
};

/// Parses a templated URL path, like `/v1/pets/{petId}/toys`.
///
/// The grammar follows the OpenAPI path-templating rules: slash-delimited
/// segments, where each segment mixes literal text with `{name}` parameter
/// slots. Literal text keeps its original spelling (percent escapes are
/// validated but not decoded) so the template can be rebuilt byte for byte.
pub fn parse(input: &str) -> Result<Vec<PathSegment<'_>>, BadPath> {
    (self::parser::template, eof)
        .map(|(segments, _)| segments)
        .parse(input)
        .map_err(BadPath::from_parse_error)
}

/// A slash-delimited path segment containing zero or more fragments.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PathSegment<'input>(Vec<PathFragment<'input>>);

impl<'input> PathSegment<'input> {
    pub fn fragments(&self) -> &[PathFragment<'input>] {
        &self.0
    }
}

/// A fragment within a path segment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathFragment<'input> {
    /// Literal text, as written in the document.
    Literal(&'input str),
    /// A `{name}` parameter slot.
    Slot(&'input str),
}

mod parser {
    use super::*;

    use winnow::{
        Parser,
        combinator::{alt, delimited, repeat},
        token::take_while,
    };

    pub fn template<'a>(input: &mut &'a str) -> winnow::Result<Vec<PathSegment<'a>>> {
        alt((
            ('/', segment, template)
                .map(|(_, head, tail)| std::iter::once(head).chain(tail).collect()),
            ('/', segment).map(|(_, segment)| vec![segment]),
            '/'.map(|_| vec![PathSegment::default()]),
        ))
        .parse_next(input)
    }

    fn segment<'a>(input: &mut &'a str) -> winnow::Result<PathSegment<'a>> {
        repeat(1.., fragment).map(PathSegment).parse_next(input)
    }

    fn fragment<'a>(input: &mut &'a str) -> winnow::Result<PathFragment<'a>> {
        alt((slot, literal)).parse_next(input)
    }

    fn slot<'a>(input: &mut &'a str) -> winnow::Result<PathFragment<'a>> {
        delimited('{', take_while(1.., |c| c != '{' && c != '}'), '}')
            .map(PathFragment::Slot)
            .parse_next(input)
    }

    fn literal<'a>(input: &mut &'a str) -> winnow::Result<PathFragment<'a>> {
        take_while(1.., |c| {
            matches!(c,
                'A'..='Z' | 'a'..='z' | '0'..='9' |
                '-' | '.' | '_' | '~' | ':' | '@' |
                '!' | '$' | '&' | '\'' | '(' | ')' |
                '*' | '+' | ',' | ';' | '=' | '%'
            )
        })
        .verify(|text: &str| {
            percent_encoding::percent_decode_str(text)
                .decode_utf8()
                .is_ok()
        })
        .map(PathFragment::Literal)
        .parse_next(input)
    }
}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
#[error("invalid URL path template")]
pub struct BadPath {
    #[source_code]
    code: String,
    #[label]
    span: SourceSpan,
}

impl BadPath {
    fn from_parse_error(error: ParseError<&str, ContextError>) -> Self {
        let input = *error.input();
        Self {
            code: input.to_owned(),
            span: error.char_span().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path() {
        let result = parse("/").unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].fragments(), &[]);
    }

    #[test]
    fn simple_literal() {
        let result = parse("/users").unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].fragments(), &[PathFragment::Literal("users")]);
    }

    #[test]
    fn trailing_slash() {
        let result = parse("/users/").unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].fragments(), &[PathFragment::Literal("users")]);
        assert_eq!(result[1].fragments(), &[]);
    }

    #[test]
    fn simple_slot() {
        let result = parse("/users/{userId}").unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].fragments(), &[PathFragment::Literal("users")]);
        assert_eq!(result[1].fragments(), &[PathFragment::Slot("userId")]);
    }

    #[test]
    fn multiple_slots() {
        let result = parse("/users/{userId}/orders/{orderId}").unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(result[0].fragments(), &[PathFragment::Literal("users")]);
        assert_eq!(result[1].fragments(), &[PathFragment::Slot("userId")]);
        assert_eq!(result[2].fragments(), &[PathFragment::Literal("orders")]);
        assert_eq!(result[3].fragments(), &[PathFragment::Slot("orderId")]);
    }

    #[test]
    fn mixed_literal_and_slot() {
        let result = parse("/documents/report-{documentId}.pdf").unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].fragments(), &[PathFragment::Literal("documents")]);
        assert_eq!(
            result[1].fragments(),
            &[
                PathFragment::Literal("report-"),
                PathFragment::Slot("documentId"),
                PathFragment::Literal(".pdf"),
            ]
        );
    }

    #[test]
    fn percent_escapes_stay_encoded() {
        let result = parse("/files/a%20b").unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[1].fragments(), &[PathFragment::Literal("a%20b")]);
    }

    #[test]
    fn missing_leading_slash() {
        assert!(parse("users/{userId}").is_err());
    }

    #[test]
    fn double_slash() {
        // Empty path segments aren't allowed.
        assert!(parse("/users//a").is_err());
    }

    #[test]
    fn nested_braces() {
        assert!(parse("/users/{user/{id}}").is_err());
    }

    #[test]
    fn unclosed_slot() {
        assert!(parse("/users/{userId").is_err());
    }
}
