use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 2;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";
pub const DEFAULT_PREVIEW_DPI: u32 = 150;
pub const DEFAULT_LOCATOR_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// AWS region for Bedrock, and for S3 when that backend is used.
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub profile: Option<String>,
    pub backend: Backend,
    pub model_id: String,
    pub preview_dpi: u32,
    pub locator_ttl_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Backend {
    S3 { bucket: String },
    Local { root: PathBuf },
}

impl CliConfig {
    /// A local-filesystem setup rooted at `root`.
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            region: DEFAULT_REGION.to_string(),
            profile: None,
            backend: Backend::Local { root: root.into() },
            model_id: DEFAULT_MODEL_ID.to_string(),
            preview_dpi: DEFAULT_PREVIEW_DPI,
            locator_ttl_secs: DEFAULT_LOCATOR_TTL_SECS,
        }
    }

    /// Apply `CVWIZARD_BUCKET`, `CVWIZARD_MODEL_ID` and `AWS_REGION`.
    /// A bucket override switches the backend to S3.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(bucket) = var("CVWIZARD_BUCKET").filter(|b| !b.is_empty()) {
            self.backend = Backend::S3 { bucket };
        }
        if let Some(model_id) = var("CVWIZARD_MODEL_ID").filter(|m| !m.is_empty()) {
            self.model_id = model_id;
        }
        if let Some(region) = var("AWS_REGION").filter(|r| !r.is_empty()) {
            self.region = region;
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.cvwizard.cli"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Where the local backend keeps its data unless configured otherwise.
pub fn default_data_dir() -> eyre::Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| eyre::eyre!("no data directory found"))?;
    Ok(base.join("com.cvwizard.cli"))
}

/// Load the config at `path`, or the local default when there is none.
pub fn load_or_default(path: &Path) -> eyre::Result<CliConfig> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(CliConfig::local(default_data_dir()?))
    }
}

pub fn load_config(path: &Path) -> eyre::Result<CliConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: CliConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update cvwizard."
        ));
    }

    let obj = json
        .as_object_mut()
        .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;

    // v0 → v1: a bare top-level `bucket` becomes the S3 backend.
    if from_version < 1 {
        if !obj.contains_key("backend") {
            let bucket = obj
                .remove("bucket")
                .and_then(|b| b.as_str().map(str::to_string))
                .ok_or_else(|| eyre::eyre!("pre-versioned config has no bucket"))?;
            obj.insert(
                "backend".to_string(),
                serde_json::json!({ "type": "s3", "bucket": bucket }),
            );
        }
        obj.insert("config_version".to_string(), 1.into());
        tracing::info!("migrated config v0 → v1 (bucket moved into backend)");
    }

    // v1 → v2: add preview_dpi and locator_ttl_secs.
    if from_version < 2 {
        obj.entry("preview_dpi")
            .or_insert_with(|| DEFAULT_PREVIEW_DPI.into());
        obj.entry("locator_ttl_secs")
            .or_insert_with(|| DEFAULT_LOCATOR_TTL_SECS.into());
        obj.insert("config_version".to_string(), 2.into());
        tracing::info!("migrated config v1 → v2 (added preview settings)");
    }

    Ok(json)
}

pub fn save_config(path: &Path, config: &CliConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
