// ==========================================
// 咖啡配比 - API 层
// ==========================================
// 职责: 面向宿主界面的业务接口
// 约束: 只组合引擎与仓储，不直接访问存储
// ==========================================

pub mod brew_api;
pub mod display;
pub mod entitlement;
pub mod error;
pub mod recipe_api;
pub mod validator;

// 重导出核心 API
pub use brew_api::BrewApi;
pub use display::{BrewSummary, CustomRecipeView};
pub use entitlement::{require_premium, EntitlementProvider, StaticEntitlement};
pub use error::{ApiError, ApiResult, FieldViolation};
pub use recipe_api::{RecipeApi, RecipeDetailSession};
pub use validator::{RecipeDraft, RecipeDraftValidator};
