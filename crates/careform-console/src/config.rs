use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

pub const BASE_URL_ENV: &str = "CAREFORM_BASE_URL";
pub const TOKEN_ENV: &str = "CAREFORM_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareformConfig {
    /// Schema version. Missing or 0 = the unversioned layout.
    #[serde(default)]
    pub config_version: u32,
    pub base_url: String,
    pub token: TokenSource,
    pub created_at: jiff::Timestamp,
}

/// Where the API bearer token comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenSource {
    Inline { token: String },
    Env { var: String },
    None,
}

/// Redacted config info, safe to print.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigInfo {
    pub base_url: String,
    pub created_at: String,
    pub token_type: String,
    pub token_hint: Option<String>,
    pub token_env: Option<String>,
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("org.careform.console"))
}

pub fn load_config() -> eyre::Result<CareformConfig> {
    load_config_from(&config_dir()?.join("config.json"))
}

pub fn load_config_from(path: &Path) -> eyre::Result<CareformConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    parse_config(&contents)
}

/// Parse a config file body, migrating older versions first.
pub fn parse_config(contents: &str) -> eyre::Result<CareformConfig> {
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = match json.get("config_version").and_then(|v| v.as_u64()) {
        Some(version) => u32::try_from(version)
            .map_err(|_| eyre::eyre!("config_version {version} is out of range"))?,
        None => 0,
    };

    let migrated = migrate(json, on_disk_version)?;
    let config: CareformConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update careform."
        ));
    }

    // v0 (unversioned: only base_url) → v1: add created_at, default the token source
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("created_at")
            .or_insert(serde_json::Value::String(jiff::Timestamp::now().to_string()));
        obj.entry("token")
            .or_insert(serde_json::json!({ "type": "none" }));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added created_at)");
    }

    Ok(json)
}

pub fn save_config(config: &CareformConfig) -> eyre::Result<PathBuf> {
    save_config_to(&config_dir()?, config)
}

pub fn save_config_to(dir: &Path, config: &CareformConfig) -> eyre::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join("config.json");
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // The file may hold a bearer token.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(path)
}

/// Base URL and token after applying environment overrides.
pub fn resolve(config: Option<&CareformConfig>) -> eyre::Result<(String, Option<String>)> {
    let base_url = match std::env::var(BASE_URL_ENV) {
        Ok(url) => url,
        Err(_) => config
            .map(|c| c.base_url.clone())
            .ok_or_else(|| eyre::eyre!("no base URL: run `careform configure` or set {BASE_URL_ENV}"))?,
    };

    let token = match std::env::var(TOKEN_ENV) {
        Ok(token) => Some(token),
        Err(_) => match config.map(|c| &c.token) {
            Some(TokenSource::Inline { token }) => Some(token.clone()),
            Some(TokenSource::Env { var }) => Some(
                std::env::var(var)
                    .map_err(|_| eyre::eyre!("token env var {var} is not set"))?,
            ),
            Some(TokenSource::None) | None => None,
        },
    };

    Ok((base_url, token))
}

pub fn config_info(config: &CareformConfig) -> ConfigInfo {
    let (token_type, token_hint, token_env) = match &config.token {
        TokenSource::Inline { token } => ("inline".to_string(), Some(redact_token(token)), None),
        TokenSource::Env { var } => ("env".to_string(), None, Some(var.clone())),
        TokenSource::None => ("none".to_string(), None, None),
    };

    ConfigInfo {
        base_url: config.base_url.clone(),
        created_at: config.created_at.to_string(),
        token_type,
        token_hint,
        token_env,
    }
}

pub fn redact_token(token: &str) -> String {
    if token.len() <= 8 || !token.is_ascii() {
        return "****".to_string();
    }
    let prefix = &token[..4];
    let suffix = &token[token.len() - 4..];
    format!("{prefix}...{suffix}")
}
