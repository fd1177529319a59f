// ==========================================
// 咖啡配比 - 核心库
// ==========================================
// 冲煮参数计算、单位换算、冲煮倒计时、自定义食谱存储
// 技术栈: Rust + SQLite + tokio
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 冲煮规则与计时
pub mod engine;

// 配置层 - 用户设置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 资源组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BrewMethod, SessionAction, SessionState, UnitSystem};

// 领域实体
pub use domain::{BrewParameters, CustomRecipe, ImportOutcome, StaticRecipe};

// 引擎
pub use engine::{BrewSession, BrewSetup, ParameterEngine, SessionTicker};

// API
pub use api::{BrewApi, RecipeApi};

// 应用
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 名称
pub const APP_NAME: &str = "Coffee Ratio";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
