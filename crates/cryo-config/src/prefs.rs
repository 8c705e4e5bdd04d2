// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Preferences shared by Cryo command-line tools.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigService, ConfigStore};

/// Saved preferences for shader fetching.
///
/// Missing fields take their defaults, so older files keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPrefs {
    /// Base URL logo shaders are fetched from.
    pub shader_base_url: String,
    /// Directory to read shaders from instead of fetching over HTTP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_shader_dir: Option<PathBuf>,
    /// HTTP request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl ToolPrefs {
    /// Config key the preferences are stored under.
    pub const KEY: &'static str = "prefs";
    /// Default jsDelivr mirror of the logo shaders.
    pub const DEFAULT_SHADER_BASE_URL: &'static str =
        "https://cdn.jsdelivr.net/gh/chevp/cryo-web-assets@main/shaders/cryo-logo";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
}

impl Default for ToolPrefs {
    fn default() -> Self {
        Self {
            shader_base_url: Self::DEFAULT_SHADER_BASE_URL.to_owned(),
            local_shader_dir: None,
            request_timeout_ms: Self::DEFAULT_TIMEOUT_MS,
        }
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Stored [`ToolPrefs`], or defaults when none were saved yet.
    pub fn load_prefs(&self) -> Result<ToolPrefs, ConfigError> {
        self.load_or_default(ToolPrefs::KEY)
    }

    /// Persist `prefs` under [`ToolPrefs::KEY`].
    pub fn save_prefs(&self, prefs: &ToolPrefs) -> Result<(), ConfigError> {
        self.save(ToolPrefs::KEY, prefs)
    }

    /// Load prefs, apply `edit`, and save the result when `edit` reports a
    /// change. Returns the prefs as they now stand.
    pub fn update_prefs<F>(&self, edit: F) -> Result<ToolPrefs, ConfigError>
    where
        F: FnOnce(&mut ToolPrefs) -> bool,
    {
        let mut prefs = self.load_prefs()?;
        if edit(&mut prefs) {
            self.save_prefs(&prefs)?;
        }
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let prefs: ToolPrefs = serde_json::from_str(r#"{"request_timeout_ms":500}"#).unwrap();
        assert_eq!(prefs.request_timeout_ms, 500);
        assert_eq!(prefs.shader_base_url, ToolPrefs::DEFAULT_SHADER_BASE_URL);
        assert_eq!(prefs.local_shader_dir, None);
    }
}
