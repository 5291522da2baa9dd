//! `stylebake init`: write a config file holding every default.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

use crate::config::BakeConfig;
use crate::log;

/// Default config rendered as TOML, with a header comment.
pub fn generate_config_template() -> Result<String> {
    let body = toml::to_string_pretty(&BakeConfig::default())
        .context("Failed to render default config")?;

    let mut out = format!(
        "# stylebake configuration file (v{})\n",
        env!("CARGO_PKG_VERSION")
    );
    out.push_str("# Paths are relative to this file. CLI flags override these values.\n\n");
    out.push_str(&body);
    Ok(out)
}

/// Write the default config to `dir/config_name`, or print it when `dry`.
pub fn init_config(dir: &Path, config_name: &Path, dry: bool, force: bool) -> Result<()> {
    let content = generate_config_template()?;

    if dry {
        print!("{content}");
        return Ok(());
    }

    let path = dir.join(config_name);
    if path.exists() && !force {
        bail!(
            "'{}' already exists, pass --force to overwrite",
            path.display()
        );
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory '{}'", dir.display()))?;
    fs::write(&path, content)
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;

    log!("init"; "wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_template_parses_back_to_defaults() {
        let content = generate_config_template().unwrap();
        assert!(content.contains("[corpus]"));
        assert!(content.contains("[stylesheet.compiler]"));
        assert!(content.contains("delivery = \"inline\""));

        let config = test_parse_config(&content);
        assert_eq!(config.corpus.extensions, vec!["html", "htm"]);
        assert_eq!(config.preconnect.window, 12_000);
        assert!(config.stylesheet.href.is_none());
    }

    #[test]
    fn test_init_writes_once() {
        let temp = TempDir::new().unwrap();
        let name = Path::new("stylebake.toml");

        init_config(temp.path(), name, false, false).unwrap();
        assert!(temp.path().join(name).is_file());

        assert!(init_config(temp.path(), name, false, false).is_err());
        init_config(temp.path(), name, false, true).unwrap();
    }

    #[test]
    fn test_init_dry_writes_nothing() {
        let temp = TempDir::new().unwrap();
        init_config(temp.path(), Path::new("stylebake.toml"), true, false).unwrap();
        assert!(!temp.path().join("stylebake.toml").exists());
    }
}
