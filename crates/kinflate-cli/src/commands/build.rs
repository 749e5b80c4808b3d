//! Build command - run the pipeline and print the resulting resources

use console::style;
use kinflate_engine::Application;
use std::fs;
use std::path::Path;

use crate::error::{CliError, Result};

pub fn run(path: &Path, output: Option<&Path>, debug: bool) -> Result<()> {
    let app = Application::load(path)?;

    if debug {
        eprintln!(
            "{} Loaded manifest from {}",
            style("DEBUG").dim(),
            app.root().display()
        );
    }

    let resources = app.resources()?;
    let yaml = resources.encode()?;

    match output {
        Some(file) => {
            if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| CliError::io(e, parent))?;
            }
            fs::write(file, &yaml).map_err(|e| CliError::io(e, file))?;
            eprintln!(
                "{} Wrote {} resource(s) to {}",
                style("✓").green().bold(),
                resources.len(),
                file.display()
            );
        }
        None => print!("{yaml}"),
    }

    Ok(())
}
