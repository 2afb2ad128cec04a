//! Filesystem conventions for downloaded models and runtime manifests.
//!
//! Models live under a per-repository subdirectory of the models root
//! (`~/.prowl/models` by default), manifests under a sibling `modelfiles`
//! directory. Repository ids and filenames come from a remote catalog and
//! are sanitized before ever being joined into a path.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default relative location of the models root under the home directory.
pub const DEFAULT_MODELS_DIR_RELATIVE: &str = ".prowl/models";

/// Name of the manifests directory, a sibling of the models root.
const MODELFILES_DIR_NAME: &str = "modelfiles";

/// Errors resolving pipeline paths.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the user's home directory.
    #[error("could not determine the home directory")]
    NoHomeDir,
}

/// Return the platform default models root (`~/.prowl/models`).
pub fn default_models_root() -> Result<PathBuf, PathError> {
    let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
    Ok(home.join(DEFAULT_MODELS_DIR_RELATIVE))
}

/// Resolve the models root from an explicit override, env var, or default.
///
/// Resolution order:
/// 1. Explicit path provided by caller
/// 2. `PROWL_MODELS_DIR` environment variable
/// 3. Default (`~/.prowl/models`)
pub fn resolve_models_root(explicit: Option<&str>) -> Result<PathBuf, PathError> {
    if let Some(path) = explicit {
        return Ok(PathBuf::from(path));
    }

    if let Ok(env_path) = env::var("PROWL_MODELS_DIR") {
        if !env_path.trim().is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }

    default_models_root()
}

/// Directory where runtime manifests are written, a sibling of the
/// models root (`~/.prowl/modelfiles` for the default layout).
#[must_use]
pub fn modelfiles_dir(models_root: &Path) -> PathBuf {
    models_root
        .parent()
        .map_or_else(|| models_root.join(MODELFILES_DIR_NAME), |parent| parent.join(MODELFILES_DIR_NAME))
}

/// Normalize a catalog-supplied path component.
///
/// Anything outside `[A-Za-z0-9._-]` collapses to a single hyphen, and
/// leading dots are stripped so a hostile `rfilename` can never traverse
/// out of the models root.
#[must_use]
pub fn sanitize_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_dash = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
            out.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            out.push('-');
            last_was_dash = true;
        }
    }
    let trimmed = out.trim_matches(|c| c == '-' || c == '.');
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Per-repository directory under the models root.
///
/// The `owner/name` separator becomes an underscore so one repo maps to
/// exactly one flat directory.
#[must_use]
pub fn model_dir(models_root: &Path, repo_id: &str) -> PathBuf {
    models_root.join(sanitize_component(&repo_id.replace('/', "_")))
}

/// Full destination path for a catalog file.
#[must_use]
pub fn model_file_path(models_root: &Path, repo_id: &str, filename: &str) -> PathBuf {
    model_dir(models_root, repo_id).join(sanitize_component(filename))
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    #[test]
    fn test_default_models_root_contains_relative() {
        let root = default_models_root().unwrap();
        assert!(root.to_string_lossy().contains(DEFAULT_MODELS_DIR_RELATIVE));
    }

    #[test]
    fn test_resolve_prefers_explicit() {
        let prev = env::var("PROWL_MODELS_DIR").ok();
        unsafe {
            env::set_var("PROWL_MODELS_DIR", "/tmp/env-models");
        }
        let resolved = resolve_models_root(Some("/tmp/explicit-models")).unwrap();
        assert!(resolved.ends_with("explicit-models"));
        restore_env("PROWL_MODELS_DIR", prev);
    }

    #[test]
    fn test_resolve_env_value() {
        let prev = env::var("PROWL_MODELS_DIR").ok();
        unsafe {
            env::set_var("PROWL_MODELS_DIR", "/tmp/env-models");
        }
        let resolved = resolve_models_root(None).unwrap();
        assert!(resolved.ends_with("env-models"));
        restore_env("PROWL_MODELS_DIR", prev);
    }

    #[test]
    fn test_modelfiles_dir_is_sibling() {
        let dir = modelfiles_dir(Path::new("/home/u/.prowl/models"));
        assert_eq!(dir, Path::new("/home/u/.prowl/modelfiles"));
    }

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("llama-2-7b.Q4_K_M.gguf"), "llama-2-7b.Q4_K_M.gguf");
        assert_eq!(sanitize_component("../../etc/passwd"), "etc-passwd");
        assert_eq!(sanitize_component("a b//c"), "a-b-c");
        assert_eq!(sanitize_component("...."), "unnamed");
    }

    #[test]
    fn test_model_file_path_stays_under_root() {
        let root = Path::new("/models");
        let path = model_file_path(root, "TheBloke/Llama-2-7B-GGUF", "../evil.gguf");
        assert!(path.starts_with(root));
        assert_eq!(
            path,
            Path::new("/models/TheBloke_Llama-2-7B-GGUF/evil.gguf")
        );
    }

    fn restore_env(key: &str, previous: Option<String>) {
        if let Some(value) = previous {
            unsafe {
                env::set_var(key, value);
            }
        } else {
            unsafe {
                env::remove_var(key);
            }
        }
    }
}
