use std::path::Path;

use crate::cli::commands::ConfigArgs;
use crate::io::config_io;
use crate::model::config::ClientConfig;

/// Print the effective configuration, or with `--init` write it out as a
/// starting point.
pub fn cmd_config(
    args: ConfigArgs,
    config: &ClientConfig,
    explicit: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(config_io::default_config_path);

    if args.init {
        config_io::write_config(&path, config, args.force)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("# {}", path.display());
        print!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}
