// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations. Each returns the text printed to stdout.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use cryo_config::{ConfigService, FsConfigStore, ToolPrefs};
use cryo_protocol::{codec, Scene, SceneDelta, ShaderProgram, Validate};
use cryo_scene_delta::{apply_delta, patch_uniform, UniformPatch};
use cryo_shaders::{
    create_cryo_logo_shader, FsSourceLoader, HttpSourceLoader, LogoVariant, DEFAULT_BASE_PATH,
};
use serde_json::json;
use tracing::info;

use crate::{Cli, Command};

pub(crate) async fn run(cli: Cli) -> Result<String> {
    let config_dir = cli.config_dir;
    match cli.command {
        Command::Validate { scene } => validate(&scene),
        Command::Apply { scene, delta, at } => apply(&scene, &delta, at),
        Command::PatchUniform {
            shader,
            name,
            patch,
        } => patch_program(&shader, &name, &patch),
        Command::Preset { variant } => Ok(codec::to_json_pretty(&variant.preset())?),
        Command::Fetch {
            variant,
            base,
            local,
        } => fetch(config_dir.as_deref(), variant, base, local).await,
        Command::Prefs {
            shader_base_url,
            local_shader_dir,
            timeout_ms,
        } => {
            let service = config_service(config_dir.as_deref())?;
            let prefs = service
                .update_prefs(|prefs| {
                    let changed = shader_base_url.is_some()
                        || local_shader_dir.is_some()
                        || timeout_ms.is_some();
                    if let Some(url) = shader_base_url {
                        prefs.shader_base_url = url;
                    }
                    if let Some(dir) = local_shader_dir {
                        prefs.local_shader_dir = Some(dir);
                    }
                    if let Some(ms) = timeout_ms {
                        prefs.request_timeout_ms = ms;
                    }
                    changed
                })
                .with_context(|| prefs_context(&service))?;
            info!(path = %service.store().path_for(ToolPrefs::KEY).display(), "prefs");
            Ok(codec::to_json_pretty(&prefs)?)
        }
    }
}

/// Decode a record from `.cbor` or JSON (any other extension).
fn read_record<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let is_cbor = path.extension().is_some_and(|ext| ext == "cbor");
    let record = if is_cbor {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        codec::from_cbor(&bytes)
    } else {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        codec::from_json(&text)
    };
    record.with_context(|| format!("failed to decode {}", path.display()))
}

fn validate(path: &Path) -> Result<String> {
    let scene: Scene = read_record(path)?;
    scene
        .validate()
        .with_context(|| format!("scene `{}` is invalid", scene.id))?;
    let summary = json!({
        "id": scene.id,
        "timestamp": scene.timestamp,
        "entities": scene.entities.len(),
        "lights": scene.lights.as_ref().map_or(0, Vec::len),
        "shaders": scene.shaders.as_ref().map_or(0, Vec::len),
        "valid": true,
    });
    Ok(serde_json::to_string_pretty(&summary)?)
}

fn apply(scene: &Path, delta: &Path, at: Option<u64>) -> Result<String> {
    let base: Scene = read_record(scene)?;
    base.validate()
        .with_context(|| format!("base scene `{}` is invalid", base.id))?;
    let delta: SceneDelta = read_record(delta)?;
    let applied_at = at.unwrap_or_else(now_millis);
    let next = apply_delta(&base, &delta, applied_at).context("delta rejected")?;
    info!(
        scene = %next.id,
        entities = next.entities.len(),
        timestamp = next.timestamp,
        "delta applied"
    );
    Ok(codec::to_json_pretty(&next)?)
}

fn patch_program(shader: &Path, name: &str, patch: &str) -> Result<String> {
    let program: ShaderProgram = read_record(shader)?;
    let patch: UniformPatch = codec::from_json(patch).context("invalid uniform patch")?;
    let next = patch_uniform(&program, name, &patch)?;
    Ok(codec::to_json_pretty(&next)?)
}

async fn fetch(
    config_dir: Option<&Path>,
    variant: LogoVariant,
    base: Option<String>,
    local: Option<PathBuf>,
) -> Result<String> {
    let prefs = load_prefs(config_dir)?;
    let program = match local.or(prefs.local_shader_dir) {
        Some(root) => {
            let base = base.unwrap_or_else(|| DEFAULT_BASE_PATH.to_owned());
            info!(root = %root.display(), %base, %variant, "loading logo shader from disk");
            create_cryo_logo_shader(&FsSourceLoader::new(root), variant, &base).await?
        }
        None => {
            let base = base.unwrap_or(prefs.shader_base_url);
            info!(%base, %variant, "fetching logo shader");
            let loader =
                HttpSourceLoader::with_timeout(Duration::from_millis(prefs.request_timeout_ms))?;
            create_cryo_logo_shader(&loader, variant, &base).await?
        }
    };
    Ok(codec::to_json_pretty(&program)?)
}

fn config_service(config_dir: Option<&Path>) -> Result<ConfigService<FsConfigStore>> {
    let store = match config_dir {
        Some(dir) => FsConfigStore::with_base(dir)?,
        None => FsConfigStore::new()?,
    };
    Ok(ConfigService::new(store))
}

/// Saved prefs, or defaults when none are stored. A store that cannot be
/// read or a corrupt prefs file is an error.
fn load_prefs(config_dir: Option<&Path>) -> Result<ToolPrefs> {
    let service = config_service(config_dir)?;
    let prefs = service
        .load_prefs()
        .with_context(|| prefs_context(&service))?;
    Ok(prefs)
}

fn prefs_context(service: &ConfigService<FsConfigStore>) -> String {
    format!(
        "failed to load prefs from {}",
        service.store().path_for(ToolPrefs::KEY).display()
    )
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
