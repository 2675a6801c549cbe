//! `docmap generate` command implementation.
//!
//! Writes one options document per configuration and optionally hands each
//! to the documentation generator.

use super::{fail, report_warnings, warnings_json, EXIT_ERROR};
use docmap_core::paths::to_slash;
use docmap_core::{generate, DocOptions, Generated};
use docmap_util::fs::atomic_write;
use miette::{miette, IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Options document written when no `--out-file` is given.
pub const DEFAULT_OUT_FILE: &str = "docmap.options.json";

/// Exit code when the generator binary cannot be found.
const EXIT_NOT_FOUND: i32 = 127;

/// Run the generate command.
pub fn run(
    cwd: &Path,
    configs: &[DocOptions],
    out_file: Option<&Path>,
    exec: Option<&str>,
    json: bool,
) -> Result<()> {
    // Look the generator up first so a missing binary writes nothing.
    let generator = match exec {
        Some(bin) => match find_generator(cwd, bin) {
            Some(path) => Some(path),
            None => not_found(bin, json),
        },
        None => None,
    };

    // Every configuration resolves before any file is written.
    let mut generated_all = Vec::with_capacity(configs.len());
    for options in configs {
        let generated = match generate(options, cwd) {
            Ok(generated) => generated,
            Err(err) => return fail(err, json),
        };
        report_warnings(generated.warnings());
        generated_all.push(generated);
    }

    let mut written = Vec::with_capacity(generated_all.len());
    for (index, generated) in generated_all.into_iter().enumerate() {
        let path = output_path(cwd, out_file, index, configs.len());
        let content = serde_json::to_string_pretty(&generated.config).into_diagnostic()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).into_diagnostic()?;
        }
        atomic_write(&path, format!("{content}\n").as_bytes()).into_diagnostic()?;
        tracing::debug!(path = %path.display(), "wrote options");

        written.push((path, generated));
    }

    if let Some(generator) = &generator {
        for (path, _) in &written {
            run_generator(generator, path, cwd, json)?;
        }
    }

    if json {
        let outputs: Vec<_> = written
            .iter()
            .map(|(path, generated)| output_json(path, generated))
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "schema_version": docmap_core::version::SCHEMA_VERSION,
                "outputs": outputs,
            })
        );
    } else {
        for (path, generated) in &written {
            println!(
                "Wrote {} ({} entry points, {} modules, {} READMEs)",
                path.display(),
                generated.config.entry_points.len(),
                generated.config.module_name_table.len(),
                generated.config.readme_table.len(),
            );
        }
    }

    Ok(())
}

/// Output file for configuration `index` of `total`.
///
/// A single configuration writes to the file as named; a list inserts the
/// index before the extension (`docmap.options.1.json`).
fn output_path(cwd: &Path, out_file: Option<&Path>, index: usize, total: usize) -> PathBuf {
    let path = cwd.join(out_file.unwrap_or(Path::new(DEFAULT_OUT_FILE)));
    if total <= 1 {
        return path;
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}.{index}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{index}"),
    };
    path.with_file_name(name)
}

fn output_json(path: &Path, generated: &Generated) -> serde_json::Value {
    serde_json::json!({
        "file": to_slash(path),
        "entryPoints": generated.config.entry_points.len(),
        "modules": generated.config.module_name_table.len(),
        "readmes": generated.config.readme_table.len(),
        "warnings": warnings_json(generated.warnings()),
    })
}

/// Find the generator binary.
///
/// Resolution order:
/// 1. `node_modules/.bin/<bin>` in `cwd` and each parent
/// 2. System PATH
fn find_generator(cwd: &Path, bin: &str) -> Option<PathBuf> {
    let candidate = Path::new(bin);
    if candidate.components().count() > 1 {
        let path = cwd.join(candidate);
        return path.is_file().then_some(path);
    }

    for dir in cwd.ancestors() {
        let path = dir.join("node_modules").join(".bin").join(bin);
        if path.is_file() {
            return Some(path);
        }
    }

    which::which(bin).ok()
}

fn not_found<T>(bin: &str, json: bool) -> T {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": false,
                "error": {
                    "code": "BINARY_NOT_FOUND",
                    "message": format!("Binary '{bin}' not found in node_modules/.bin or PATH"),
                }
            })
        );
    } else {
        eprintln!("error: binary '{bin}' not found in node_modules/.bin or PATH");
    }
    std::process::exit(EXIT_NOT_FOUND);
}

/// Run `<generator> --options <file>` and wait for it.
fn run_generator(generator: &Path, options_file: &Path, cwd: &Path, json: bool) -> Result<()> {
    let mut cmd = Command::new(generator);
    cmd.arg("--options")
        .arg(options_file)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit());

    // Keep stdout for our own JSON document.
    if json {
        cmd.stdout(Stdio::from(std::io::stderr()));
    } else {
        cmd.stdout(Stdio::inherit());
    }

    tracing::info!(
        generator = %generator.display(),
        options = %options_file.display(),
        "running generator"
    );

    let status = cmd
        .status()
        .map_err(|e| miette!("failed to execute '{}': {e}", generator.display()))?;

    if status.success() {
        Ok(())
    } else {
        let code = status.code().unwrap_or(EXIT_ERROR);
        Err(miette!(
            "generator '{}' exited with code {code}",
            generator.display()
        ))
    }
}
