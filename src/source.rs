//! Loads OpenAPI document text from a local file or a remote URL.

use std::path::{Path, PathBuf};

/// Where an OpenAPI document comes from. The document text is fetched once,
/// up front; the compilers downstream only ever see parsed structure.
#[derive(Clone, Debug)]
pub enum Source {
    File(PathBuf),
    Url(reqwest::Url),
}

impl Source {
    /// Reads the document text from this source.
    pub fn fetch(&self) -> Result<String, SourceError> {
        match self {
            Self::File(path) => read(path),
            Self::Url(url) => match url.scheme() {
                "http" | "https" => reqwest::blocking::get(url.clone())
                    .and_then(|response| response.error_for_status())
                    .and_then(|response| response.text())
                    .map_err(|source| SourceError::Download {
                        url: url.to_string(),
                        source,
                    }),
                "file" => read(Path::new(url.path())),
                scheme => Err(SourceError::UnsupportedScheme {
                    scheme: scheme.to_owned(),
                }),
            },
        }
    }

    /// `true` if the fetched text should be parsed as JSON rather than YAML.
    /// Goes by the source's file extension, falling back to sniffing the
    /// leading character for extensionless sources.
    pub fn is_json(&self, contents: &str) -> bool {
        self.has_json_extension() || contents.trim_start().starts_with('{')
    }

    fn has_json_extension(&self) -> bool {
        let path = match self {
            Self::File(path) => path.as_path(),
            Self::Url(url) => Path::new(url.path()),
        };
        path.extension().is_some_and(|extension| extension == "json")
    }
}

fn read(path: &Path) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_owned(),
        source,
    })
}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to download spec from `{url}`")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unsupported scheme `{scheme}`")]
    UnsupportedScheme { scheme: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_extensions_pick_the_json_parser() {
        let file = Source::File(PathBuf::from("api/spec.json"));
        assert!(file.is_json("openapi: 3.0.3"));

        let url = Source::Url("https://example.com/v2/spec.json".parse().unwrap());
        assert!(url.is_json("openapi: 3.0.3"));
    }

    #[test]
    fn yaml_extensions_pick_the_yaml_parser() {
        let file = Source::File(PathBuf::from("api/spec.yaml"));
        assert!(!file.is_json("openapi: 3.0.3"));
    }

    #[test]
    fn extensionless_sources_sniff_the_body() {
        let url = Source::Url("https://example.com/openapi".parse().unwrap());
        assert!(url.is_json("  {\"openapi\": \"3.0.3\"}"));
        assert!(!url.is_json("openapi: 3.0.3"));
    }

    #[test]
    fn file_urls_read_from_the_local_path() {
        let url = Source::Url("file:///nonexistent/gosling/spec.yaml".parse().unwrap());
        let err = url.fetch().unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
    }

    #[test]
    fn unknown_schemes_are_rejected() {
        let url = Source::Url("ftp://example.com/spec.yaml".parse().unwrap());
        let err = url.fetch().unwrap_err();
        assert_eq!(err.to_string(), "unsupported scheme `ftp`");
    }

    #[test]
    fn missing_files_report_the_path() {
        let file = Source::File(PathBuf::from("/nonexistent/gosling/spec.yaml"));
        let err = file.fetch().unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to read `/nonexistent/gosling/spec.yaml`"
        );
    }
}
