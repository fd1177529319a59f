// ==========================================
// 咖啡配比 - 领域模型层
// ==========================================
// 职责: 定义领域实体、值对象、类型
// 不含存储逻辑，不含引擎规则
// ==========================================

pub mod catalog;
pub mod parameters;
pub mod recipe;
pub mod types;

// 重导出核心类型
pub use catalog::{StaticRecipe, STATIC_RECIPES};
pub use parameters::BrewParameters;
pub use recipe::{CustomRecipe, ImportOutcome};
pub use types::{BrewMethod, SessionAction, SessionState, UnitSystem};
