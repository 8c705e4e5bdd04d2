// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem store behaviour against a temp directory.

use cryo_config::{ConfigError, ConfigService, ConfigStore, FsConfigStore, ToolPrefs};

#[test]
fn missing_key_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::with_base(dir.path()).unwrap();
    assert!(matches!(store.load_raw("absent"), Err(ConfigError::NotFound)));
}

#[test]
fn prefs_round_trip_through_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::with_base(dir.path().join("nested/cryo")).unwrap();
    let service = ConfigService::new(store);

    assert_eq!(
        service.load_or_default::<ToolPrefs>(ToolPrefs::KEY).unwrap(),
        ToolPrefs::default()
    );

    let prefs = ToolPrefs {
        shader_base_url: "http://localhost:8080/shaders".into(),
        local_shader_dir: Some(dir.path().join("assets")),
        request_timeout_ms: 1_500,
    };
    service.save(ToolPrefs::KEY, &prefs).unwrap();

    let path = service.store().path_for(ToolPrefs::KEY);
    assert!(path.ends_with("prefs.json"));
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"request_timeout_ms\": 1500"));

    let reloaded = ConfigService::new(service.into_inner());
    assert_eq!(reloaded.load::<ToolPrefs>(ToolPrefs::KEY).unwrap(), Some(prefs));
}

#[test]
fn update_prefs_saves_only_on_change() {
    let dir = tempfile::tempdir().unwrap();
    let service = ConfigService::new(FsConfigStore::with_base(dir.path()).unwrap());
    let path = service.store().path_for(ToolPrefs::KEY);

    let untouched = service.update_prefs(|_| false).unwrap();
    assert_eq!(untouched, ToolPrefs::default());
    assert!(!path.exists());

    let updated = service
        .update_prefs(|prefs| {
            prefs.request_timeout_ms = 42;
            true
        })
        .unwrap();
    assert_eq!(updated.request_timeout_ms, 42);
    assert_eq!(service.load_prefs().unwrap(), updated);
}

#[test]
fn corrupt_prefs_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let service = ConfigService::new(FsConfigStore::with_base(dir.path()).unwrap());
    std::fs::write(service.store().path_for(ToolPrefs::KEY), "{oops").unwrap();
    assert!(matches!(service.load_prefs(), Err(ConfigError::Serde(_))));
}
