use miette::{Context, IntoDiagnostic, Result};

use gosling::{
    codegen::{Generation, go, write_to_disk},
    parse::types::Document,
};

mod config;

use self::config::Config;

fn main() -> Result<()> {
    let Ok(config) = Config::parse().map_err(|err| err.exit());

    let contents = config.source.fetch()?;
    let document = if config.source.is_json(&contents) {
        Document::from_json(&contents)
    } else {
        Document::from_yaml(&contents)
    }
    .into_diagnostic()
    .context("Failed to parse OpenAPI document")?;

    println!(
        "OpenAPI: {} (version {})",
        document.info.title, document.info.version
    );
    println!(
        "Found {} paths and {} schemas",
        document.paths.len(),
        document.schemas().len()
    );

    let Generation {
        files,
        module,
        requires,
        warnings,
    } = go::generate(&document)?;

    for warning in &warnings {
        eprintln!("warning: skipping {warning}");
    }

    println!("Writing generated code to `{}`...", config.output.display());
    for (path, contents) in files {
        println!("Generating `{path}`...");
        write_to_disk(&config.output, (path, contents))?;
    }

    if config.module {
        println!("Generating `go.mod`...");
        write_to_disk(
            &config.output,
            ("go.mod", go::gomod::render(&module, &requires)),
        )?;

        println!("Running `go mod tidy`...");
        let output = std::process::Command::new("go")
            .arg("mod")
            .arg("tidy")
            .current_dir(&config.output)
            .output()
            .into_diagnostic()
            .context("Failed to run `go mod tidy`")?;

        if !output.status.success() {
            miette::bail!(
                "`go mod tidy` exited with status {}:\n{}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim_end(),
            );
        }
    }

    println!("Generation complete");

    Ok(())
}
