//! `docmap resolve` command implementation.
//!
//! Resolves entry points and module names without writing anything.

use super::{fail, report_warnings, warnings_json};
use docmap_core::paths::to_slash;
use docmap_core::{resolve_inputs, DocOptions, Resolution};
use miette::Result;
use std::path::Path;

/// Run the resolve command over every options object.
pub fn run(cwd: &Path, configs: &[DocOptions], json: bool) -> Result<()> {
    let mut results = Vec::with_capacity(configs.len());

    for options in configs {
        if let Err(err) = options.validate(cwd) {
            return fail(err, json);
        }
        let resolution = match resolve_inputs(&options.inputs(), cwd, &options.resolve_options()) {
            Ok(resolution) => resolution,
            Err(err) => return fail(err, json),
        };
        report_warnings(&resolution.warnings);
        results.push((options.condition().to_string(), resolution));
    }

    if json {
        let results: Vec<_> = results
            .iter()
            .map(|(condition, resolution)| resolution_json(condition, resolution))
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "schema_version": docmap_core::version::SCHEMA_VERSION,
                "results": results,
            })
        );
    } else {
        for (i, (condition, resolution)) in results.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_human(condition, resolution);
        }
    }

    Ok(())
}

fn resolution_json(condition: &str, resolution: &Resolution) -> serde_json::Value {
    let packages: Vec<_> = resolution
        .packages
        .iter()
        .map(|pkg| {
            let entries: Vec<_> = pkg
                .entries()
                .map(|entry| {
                    serde_json::json!({
                        "filepath": entry.filepath_slash(),
                        "exportPath": entry.export_path,
                        "globEntryPath": entry.glob_entry_path,
                    })
                })
                .collect();
            serde_json::json!({
                "name": pkg.name,
                "dir": to_slash(&pkg.dirpath),
                "entries": entries,
            })
        })
        .collect();

    let bare: Vec<_> = resolution
        .bare_entries
        .iter()
        .map(|p| to_slash(p))
        .collect();

    serde_json::json!({
        "condition": condition,
        "basePath": resolution.names.base_path.as_deref().map(to_slash),
        "packages": packages,
        "bareEntries": bare,
        "moduleNameTable": resolution.names.module_names,
        "readmeTable": resolution.names.readmes,
        "warnings": warnings_json(&resolution.warnings),
    })
}

fn print_human(condition: &str, resolution: &Resolution) {
    println!("Condition: {condition}");
    if let Some(base) = &resolution.names.base_path {
        println!("Base path: {}", base.display());
    }

    for pkg in &resolution.packages {
        println!();
        println!("{} ({})", pkg.name, pkg.dirpath.display());
        for entry in pkg.entries() {
            match &entry.glob_entry_path {
                Some(pattern) => println!(
                    "  {} -> {} [{pattern}]",
                    entry.export_path,
                    entry.filepath.display()
                ),
                None => println!("  {} -> {}", entry.export_path, entry.filepath.display()),
            }
        }
    }

    if !resolution.bare_entries.is_empty() {
        println!();
        println!("Entry files:");
        for path in &resolution.bare_entries {
            println!("  {}", path.display());
        }
    }

    println!();
    println!("Modules ({}):", resolution.names.module_names.len());
    for (key, name) in &resolution.names.module_names {
        println!("  {key} = {name}");
    }

    if !resolution.names.readmes.is_empty() {
        println!();
        println!("READMEs:");
        for (name, readme) in &resolution.names.readmes {
            println!("  {name}: {readme}");
        }
    }

    if !resolution.warnings.is_empty() {
        println!();
        println!("{} warning(s), see log output", resolution.warnings.len());
    }
}
