#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod error;
pub mod exports;
pub mod generate;
pub mod naming;
pub mod package;
pub mod paths;
pub mod version;
pub mod workspaces;

pub use config::{
    effective_log_level, find_config, load_config, Config, DocOptions, EntryPointSpec, LogLevel,
};
pub use error::Error;
pub use exports::{ExportEntry, ExportMap, ExportsShape, ResolveWarning};
pub use generate::{generate, GenerateConfig, Generated};
pub use naming::{map_module_names, ModuleNames};
pub use package::{resolve_inputs, PackageDescriptor, PackageInput, Resolution, ResolveOptions};
pub use version::{VersionInfo, VERSION};
