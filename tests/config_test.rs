// ==========================================
// SettingsManager 集成测试
// ==========================================
// 测试目标: 设置项持久化与默认值
// ==========================================


use coffee_ratio::api::StaticEntitlement;
use coffee_ratio::app::AppState;
use coffee_ratio::config::{config_keys, Settings, SettingsManager};
use coffee_ratio::repository::SqliteBlobStore;
use coffee_ratio::UnitSystem;
use std::sync::Arc;
use test_helpers::create_test_db;

fn manager(db_path: &str) -> SettingsManager {
    let store = SqliteBlobStore::new(db_path).expect("Failed to open store");
    SettingsManager::new(Arc::new(store))
}

#[test]
fn test_settings_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let settings = manager(&db_path).load().expect("Failed to load settings");
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_settings_survive_reopen() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let settings = Settings {
        selected_language: "English".to_string(),
        unit_system: UnitSystem::Imperial,
        dark_mode_enabled: true,
        notifications_enabled: false,
    };
    manager(&db_path).save(&settings).unwrap();

    assert_eq!(manager(&db_path).load().unwrap(), settings);
}

#[test]
fn test_raw_values_are_plain_text() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let manager = manager(&db_path);
    manager.set_unit_system(UnitSystem::Imperial).unwrap();

    assert_eq!(
        manager.get_value(config_keys::SELECTED_UNIT).unwrap().as_deref(),
        Some("Imperial")
    );

    manager
        .set_value(config_keys::NOTIFICATIONS_ENABLED, "false")
        .unwrap();
    assert!(!manager.load().unwrap().notifications_enabled);
}

#[test]
fn test_app_state_loads_persisted_unit_system() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    {
        let state = AppState::new(&db_path, Arc::new(StaticEntitlement::new(false))).unwrap();
        state.set_unit_system(UnitSystem::Imperial).unwrap();
    }

    let state = AppState::new(&db_path, Arc::new(StaticEntitlement::new(false))).unwrap();
    assert_eq!(state.unit_system().unwrap(), UnitSystem::Imperial);
    assert_eq!(state.db_path.as_deref(), Some(db_path.as_str()));
}
