// ==========================================
// 咖啡配比 - 配置层
// ==========================================
// 职责: 用户设置（语言、单位制、外观、通知）
// 存储: 与食谱共用键值存储
// ==========================================

pub mod settings;
pub mod settings_manager;

// 重导出核心配置管理器
pub use settings::{config_keys, Settings, DEFAULT_LANGUAGE};
pub use settings_manager::SettingsManager;
