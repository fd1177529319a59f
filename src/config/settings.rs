// ==========================================
// 咖啡配比 - 用户设置
// ==========================================
// 设置快照由 app 层读取后显式传给各 api，不做全局单例
// ==========================================

use crate::domain::types::UnitSystem;
use serde::{Deserialize, Serialize};

/// 默认界面语言
pub const DEFAULT_LANGUAGE: &str = "Türkçe";

/// 设置项键名（与持久化存储一致）
pub mod config_keys {
    pub const SELECTED_LANGUAGE: &str = "selectedLanguage";
    pub const SELECTED_UNIT: &str = "selectedUnit";
    pub const DARK_MODE_ENABLED: &str = "darkModeEnabled";
    pub const NOTIFICATIONS_ENABLED: &str = "notificationsEnabled";

    pub const ALL: [&str; 4] = [
        SELECTED_LANGUAGE,
        SELECTED_UNIT,
        DARK_MODE_ENABLED,
        NOTIFICATIONS_ENABLED,
    ];
}

/// 设置快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// 只保存，不影响核心逻辑（本地化不在核心内）
    pub selected_language: String,
    pub unit_system: UnitSystem,
    pub dark_mode_enabled: bool,
    pub notifications_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selected_language: DEFAULT_LANGUAGE.to_string(),
            unit_system: UnitSystem::Metric,
            dark_mode_enabled: false,
            notifications_enabled: true,
        }
    }
}
