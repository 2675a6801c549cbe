use docmap_core::version::{version_string, VersionInfo};
use miette::{IntoDiagnostic, Result};

pub fn run(json: bool) -> Result<()> {
    if json {
        let info = serde_json::to_string(&VersionInfo::current()).into_diagnostic()?;
        println!("{info}");
    } else {
        let info = VersionInfo::current();
        println!("{}", version_string());
        println!("default condition: {}", info.default_condition);
        println!("config file:       {}", info.config_file);
    }
    Ok(())
}
