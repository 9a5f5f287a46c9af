use crate::{error::SettingsError, options::Options};
use std::{fs, path::Path};
use tracing::{info, warn};

/// Reads the options file. A missing file is not an error: defaults are used.
pub fn load(path: &Path) -> Result<Options, SettingsError> {
    if !path.exists() {
        warn!(
            path = %path.display(),
            "Options file does not exist, loading default values"
        );
        return Ok(Options::default());
    }

    info!(path = %path.display(), "Using options file");
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(serde_json::from_str(&content)?)
}

/// Writes an options file holding every default. An existing file is left
/// alone unless `overwrite` is set; returns whether the file was written.
pub fn write_default(path: &Path, overwrite: bool) -> Result<bool, SettingsError> {
    if path.exists() {
        if !overwrite {
            info!(
                path = %path.display(),
                "Options file exists and overwrite was not requested, leaving it untouched"
            );
            return Ok(false);
        }
        info!(path = %path.display(), "Overwriting options file");
    }

    let text = serde_json::to_string_pretty(&Options::default())?;
    fs::write(path, text).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "Wrote default options");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let options = load(&dir.path().join("options.json")).unwrap();
        assert_eq!(options, Options::default());
        assert!(logs_contain("loading default values"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("options.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load(&path), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn write_default_respects_overwrite_flag() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("options.json");

        assert!(write_default(&path, false).unwrap());
        assert_eq!(load(&path).unwrap(), Options::default());

        fs::write(&path, r#"{ "sequence_field": "Custom" }"#).unwrap();
        assert!(!write_default(&path, false).unwrap());
        assert_eq!(load(&path).unwrap().sequence_field, "Custom");

        assert!(write_default(&path, true).unwrap());
        assert_eq!(load(&path).unwrap().sequence_field, "Id");
    }
}
