//! Capabilities the embedding host provides to the provider.

use std::{fmt, path::PathBuf};

use crate::{
    CodexError,
    client::CommandType,
    options::{RawOptions, builtin_defaults},
};

/// Token file read when neither the environment nor `token_file_path` yield a key
pub const DEFAULT_TOKEN_FILE: &str = "~/.config/openai.token";

/// Host capabilities consumed by [`OpenAICodex`](crate::OpenAICodex).
///
/// Every method has a default so a host only overrides what it actually
/// owns. [`DefaultHost`] uses all of them.
pub trait ProviderHost: Send + Sync {
    /// Return the raw credential string, `key[,organization]`.
    ///
    /// The default reads `env_var`, then the token file. `token_load_fn`
    /// names a host-side loader and is ignored here.
    fn load_api_key(
        &self,
        env_var: &str,
        token_file_path: &str,
        _token_load_fn: &str,
    ) -> Result<String, CodexError> {
        if let Ok(key) = std::env::var(env_var) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        let path = if token_file_path.is_empty() {
            DEFAULT_TOKEN_FILE
        } else {
            token_file_path
        };

        std::fs::read_to_string(expand_home(path)).map_err(|e| {
            CodexError::MissingApiKey(format!("set {env_var} or provide {path}: {e}"))
        })
    }

    /// Debug sink. Receives the formatted message, never the raw parts.
    fn print_debug(&self, args: fmt::Arguments<'_>) {
        log::debug!(target: "codex_ox", "{args}");
    }

    /// Options the raw options of `command` are merged over
    fn default_options(&self, _command: CommandType) -> RawOptions {
        builtin_defaults()
    }
}

/// Host that relies on every default capability
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHost;

impl ProviderHost for DefaultHost {}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_expand_home() {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        if let Some(home) = home {
            assert_eq!(expand_home("~/.config/x"), home.join(".config/x"));
        }
        assert_eq!(expand_home("/tmp/x"), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn test_key_from_token_file() {
        let path = std::env::temp_dir().join(format!("codex-ox-token-{}", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "sk-from-file,org-9").unwrap();

        let raw = DefaultHost
            .load_api_key("CODEX_OX_TEST_UNSET_VAR", path.to_str().unwrap(), "")
            .unwrap();
        assert_eq!(raw.trim(), "sk-from-file,org-9");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_key() {
        let err = DefaultHost
            .load_api_key("CODEX_OX_TEST_UNSET_VAR", "/nonexistent/codex-ox/token", "")
            .unwrap_err();
        assert!(matches!(err, CodexError::MissingApiKey(_)));
    }
}
