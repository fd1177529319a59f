// ==========================================
// 咖啡配比 - 设置管理器
// ==========================================
// 职责: 设置项加载、保存
// 存储: BlobStore，每个设置项一个键，值为 UTF-8 文本
// 缺失或无法解析的值取默认值（记录 warn，不报错）
// ==========================================

use crate::config::settings::{config_keys, Settings};
use crate::domain::types::UnitSystem;
use crate::repository::blob_store::BlobStore;
use crate::repository::error::RepositoryResult;
use std::sync::Arc;
use tracing::{info, warn};

// ==========================================
// SettingsManager - 设置管理器
// ==========================================
pub struct SettingsManager {
    store: Arc<dyn BlobStore>,
}

impl SettingsManager {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// 读取单个设置项原始值
    pub fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let Some(bytes) = self.store.load(key)? else {
            return Ok(None);
        };
        match String::from_utf8(bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "设置项不是合法 UTF-8，忽略");
                Ok(None)
            }
        }
    }

    /// 写入单个设置项原始值
    pub fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        self.store.save(key, value.as_bytes())
    }

    fn get_bool(&self, key: &str, default: bool) -> RepositoryResult<bool> {
        Ok(match self.get_value(key)? {
            None => default,
            Some(raw) => match raw.trim().parse::<bool>() {
                Ok(v) => v,
                Err(_) => {
                    warn!(key, value = %raw, "设置项不是布尔值，使用默认值");
                    default
                }
            },
        })
    }

    /// 加载设置快照
    pub fn load(&self) -> RepositoryResult<Settings> {
        let defaults = Settings::default();

        let selected_language = self
            .get_value(config_keys::SELECTED_LANGUAGE)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.selected_language);

        let unit_system = self
            .get_value(config_keys::SELECTED_UNIT)?
            .map(|v| UnitSystem::from_str(&v))
            .unwrap_or(defaults.unit_system);

        let dark_mode_enabled =
            self.get_bool(config_keys::DARK_MODE_ENABLED, defaults.dark_mode_enabled)?;
        let notifications_enabled = self.get_bool(
            config_keys::NOTIFICATIONS_ENABLED,
            defaults.notifications_enabled,
        )?;

        Ok(Settings {
            selected_language,
            unit_system,
            dark_mode_enabled,
            notifications_enabled,
        })
    }

    /// 保存完整快照
    pub fn save(&self, settings: &Settings) -> RepositoryResult<()> {
        self.set_value(config_keys::SELECTED_LANGUAGE, &settings.selected_language)?;
        self.set_value(config_keys::SELECTED_UNIT, settings.unit_system.as_str())?;
        self.set_value(
            config_keys::DARK_MODE_ENABLED,
            &settings.dark_mode_enabled.to_string(),
        )?;
        self.set_value(
            config_keys::NOTIFICATIONS_ENABLED,
            &settings.notifications_enabled.to_string(),
        )?;
        info!(unit = %settings.unit_system, "设置已保存");
        Ok(())
    }

    pub fn set_unit_system(&self, unit_system: UnitSystem) -> RepositoryResult<()> {
        self.set_value(config_keys::SELECTED_UNIT, unit_system.as_str())?;
        info!(unit = %unit_system, "单位制已切换");
        Ok(())
    }

    /// 恢复默认（删除全部设置项）
    pub fn reset(&self) -> RepositoryResult<()> {
        for key in config_keys::ALL {
            self.store.remove(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::blob_store::MemoryBlobStore;

    #[test]
    fn test_defaults_when_empty() {
        let manager = SettingsManager::new(Arc::new(MemoryBlobStore::new()));
        let settings = manager.load().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.selected_language, "Türkçe");
        assert!(settings.notifications_enabled);
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let store = MemoryBlobStore::new()
            .with_entry(config_keys::SELECTED_UNIT, "Furlongs")
            .with_entry(config_keys::DARK_MODE_ENABLED, "yes");
        let manager = SettingsManager::new(Arc::new(store));

        let settings = manager.load().unwrap();
        assert_eq!(settings.unit_system, UnitSystem::Metric);
        assert!(!settings.dark_mode_enabled);
    }

    #[test]
    fn test_save_and_reset() {
        let manager = SettingsManager::new(Arc::new(MemoryBlobStore::new()));
        let settings = Settings {
            selected_language: "English".to_string(),
            unit_system: UnitSystem::Imperial,
            dark_mode_enabled: true,
            notifications_enabled: false,
        };
        manager.save(&settings).unwrap();
        assert_eq!(manager.load().unwrap(), settings);

        manager.reset().unwrap();
        assert_eq!(manager.load().unwrap(), Settings::default());
    }
}
