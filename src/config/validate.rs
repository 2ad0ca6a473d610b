// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DagError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.node))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_nodes(cfg)?;
    validate_commands(cfg)?;
    Ok(())
}

fn ensure_has_nodes(cfg: &RawConfigFile) -> Result<()> {
    if cfg.node.is_empty() {
        return Err(DagError::Config(
            "config must contain at least one [node.<id>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_commands(cfg: &RawConfigFile) -> Result<()> {
    for (id, node) in cfg.node.iter() {
        if node.cmd.trim().is_empty() {
            return Err(DagError::Config(format!(
                "node '{id}' has an empty `cmd`"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> RawConfigFile {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn accepts_minimal_config() {
        let cfg = ConfigFile::try_from(parse(
            r#"
[node.A]
cmd = "true"
"#,
        ))
        .unwrap();

        assert_eq!(cfg.config.workers, 1);
        assert!(cfg.node["A"].after.is_empty());
        assert!(!cfg.node["A"].ignore_failure);
    }

    #[test]
    fn rejects_config_without_nodes() {
        let err = ConfigFile::try_from(parse("[config]\nworkers = 2\n")).unwrap_err();
        assert!(matches!(err, DagError::Config(msg) if msg.contains("at least one")));
    }

    #[test]
    fn rejects_blank_command() {
        let err = ConfigFile::try_from(parse(
            r#"
[node.A]
cmd = "   "
"#,
        ))
        .unwrap_err();
        assert!(matches!(err, DagError::Config(msg) if msg.contains("'A'")));
    }
}
