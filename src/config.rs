use std::path::PathBuf;

use clap::{
    ArgAction, ArgGroup, CommandFactory, FromArgMatches,
    error::{ErrorKind as ClapErrorKind, Result as ClapResult},
};
use gosling::source::Source;

#[derive(Debug)]
pub struct Config {
    pub source: Source,
    pub output: PathBuf,
    pub module: bool,
}

impl Config {
    pub fn parse() -> ClapResult<Config> {
        let mut cmd = Args::command();
        let mut matches = cmd
            .try_get_matches_from_mut(std::env::args_os())
            .map_err(|err| err.format(&mut cmd))?;
        let args = Args::from_arg_matches_mut(&mut matches).map_err(|err| err.format(&mut cmd))?;

        let source = match (args.filename, args.url) {
            (Some(path), _) => Source::File(path),
            (_, Some(url)) => Source::Url(url),
            (None, None) => {
                return Err(cmd.error(
                    ClapErrorKind::MissingRequiredArgument,
                    "either filename or url must be provided",
                ));
            }
        };

        Ok(Config {
            source,
            output: args.output,
            module: args.module,
        })
    }
}

#[derive(Debug, clap::Parser)]
#[command(version, about, long_about = None)]
#[command(group = ArgGroup::new("source").required(true))]
struct Args {
    /// The path to the OpenAPI document (`.yaml` or `.json`).
    #[arg(short, long, group = "source", value_name = "PATH")]
    filename: Option<PathBuf>,

    /// The URL to download the OpenAPI document from (`.yaml` or `.json`).
    #[arg(short, long, group = "source", value_name = "URL")]
    url: Option<reqwest::Url>,

    /// The output directory for the generated files.
    #[arg(short, long, value_name = "DIR")]
    output: PathBuf,

    /// Generate a `go.mod` for the client and run `go mod tidy`. Pass
    /// `--module false` to emit a plain package without a module.
    #[arg(
        short,
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
    )]
    module: bool,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn filename_and_url_are_mutually_exclusive() {
        let err = Args::try_parse_from([
            "gosling",
            "-f",
            "spec.yaml",
            "-u",
            "https://example.com/spec.yaml",
            "-o",
            "out",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ClapErrorKind::ArgumentConflict);
    }

    #[test]
    fn one_source_is_required() {
        let err = Args::try_parse_from(["gosling", "-o", "out"]).unwrap_err();
        assert_eq!(err.kind(), ClapErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn module_generation_defaults_on() {
        let args = Args::try_parse_from(["gosling", "-f", "spec.yaml", "-o", "out"]).unwrap();
        assert!(args.module);

        let args =
            Args::try_parse_from(["gosling", "-f", "spec.yaml", "-o", "out", "-m", "false"])
                .unwrap();
        assert!(!args.module);

        let args = Args::try_parse_from(["gosling", "-f", "spec.yaml", "-o", "out", "-m"]).unwrap();
        assert!(args.module);
    }

    #[test]
    fn urls_are_validated_at_the_command_line() {
        let err = Args::try_parse_from(["gosling", "-u", "not a url", "-o", "out"]).unwrap_err();
        assert_eq!(err.kind(), ClapErrorKind::ValueValidation);
    }
}
