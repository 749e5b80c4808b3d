//! Show command - display manifest information

use console::style;
use kinflate_engine::Application;
use std::path::Path;

use crate::error::Result;

pub fn run(path: &Path, show_all: bool) -> Result<()> {
    let app = Application::load(path)?;
    let manifest = app.manifest();

    let title = manifest
        .metadata
        .as_ref()
        .map(|m| m.name.clone())
        .unwrap_or_else(|| app.root().display().to_string());

    println!("{}", style(&title).cyan().bold());
    println!("{}", style("=".repeat(title.chars().count())).dim());
    println!();

    if !manifest.name_prefix.is_empty() {
        println!("{}: {}", style("Name Prefix").bold(), manifest.name_prefix);
    }

    print_map("Labels", &manifest.object_labels);
    print_map("Annotations", &manifest.object_annotations);
    print_list("Resources", &manifest.resources);
    print_list("Bases", &manifest.bases);
    print_list("Patches", &manifest.patches);

    let generators: Vec<String> = manifest
        .config_map_generator
        .iter()
        .map(|g| format!("ConfigMap {}", g.name))
        .chain(
            manifest
                .secret_generator
                .iter()
                .map(|g| format!("Secret {}", g.name)),
        )
        .collect();
    print_list("Generators", &generators);

    if show_all {
        let resources = app.resources()?;
        println!();
        println!("{}:", style("Output").bold());
        for (id, resource) in &resources {
            let name = resource.name().unwrap_or_default();
            if name == id.name {
                println!("  - {} {}", id.gvk.kind, name);
            } else {
                println!(
                    "  - {} {} {} {}",
                    id.gvk.kind,
                    id.name,
                    style("->").dim(),
                    style(name).green()
                );
            }
        }
    }

    Ok(())
}

fn print_map(title: &str, map: &std::collections::BTreeMap<String, String>) {
    if map.is_empty() {
        return;
    }
    println!();
    println!("{}:", style(title).bold());
    for (key, value) in map {
        println!("  {}: {}", key, value);
    }
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}:", style(title).bold());
    for item in items {
        println!("  - {}", item);
    }
}
