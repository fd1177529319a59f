// ==========================================
// 咖啡配比 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享资源（存储、设置、食谱仓储、权限），
//       按需创建各界面的 API 实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use crate::api::{ApiError, ApiResult, BrewApi, EntitlementProvider, RecipeApi};
use crate::config::{Settings, SettingsManager};
use crate::domain::catalog::{resolve_deep_link, StaticRecipe};
use crate::domain::types::{BrewMethod, UnitSystem};
use crate::repository::{BlobStore, CustomRecipeRepository, SqliteBlobStore};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "COFFEE_RATIO_DB_PATH";

const DB_FILE_NAME: &str = "coffee_ratio.db";

/// 应用状态
pub struct AppState {
    /// 数据库路径（内存模式为 None）
    pub db_path: Option<String>,

    /// 设置管理器
    pub settings_manager: Arc<SettingsManager>,

    /// 自定义食谱仓储（所有界面共享）
    pub recipes: Arc<Mutex<CustomRecipeRepository>>,

    /// 高级版权限
    pub entitlement: Arc<dyn EntitlementProvider>,

    /// 自定义食谱API
    pub recipe_api: Arc<RecipeApi>,

    settings: RwLock<Settings>,
}

impl AppState {
    /// 打开数据库文件并加载设置与食谱
    pub fn new(db_path: &str, entitlement: Arc<dyn EntitlementProvider>) -> ApiResult<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);
        let store = SqliteBlobStore::new(db_path)?;
        Self::from_store(Arc::new(store), entitlement, Some(db_path.to_string()))
    }

    /// 内存数据库（测试与一次性运行）
    pub fn in_memory(entitlement: Arc<dyn EntitlementProvider>) -> ApiResult<Self> {
        let store = SqliteBlobStore::in_memory()?;
        Self::from_store(Arc::new(store), entitlement, None)
    }

    /// 基于任意 BlobStore 组装
    pub fn from_store(
        store: Arc<dyn BlobStore>,
        entitlement: Arc<dyn EntitlementProvider>,
        db_path: Option<String>,
    ) -> ApiResult<Self> {
        let settings_manager = Arc::new(SettingsManager::new(Arc::clone(&store)));
        let settings = settings_manager.load()?;

        let recipes = CustomRecipeRepository::open(store)?;
        let recipes = Arc::new(Mutex::new(recipes));

        let recipe_api = Arc::new(RecipeApi::new(
            Arc::clone(&recipes),
            Arc::clone(&entitlement),
        ));

        tracing::info!(unit = %settings.unit_system, "AppState初始化完成");

        Ok(Self {
            db_path,
            settings_manager,
            recipes,
            entitlement,
            recipe_api,
            settings: RwLock::new(settings),
        })
    }

    /// 当前设置快照
    pub fn settings(&self) -> ApiResult<Settings> {
        self.settings
            .read()
            .map(|s| s.clone())
            .map_err(|e| ApiError::InternalError(format!("设置锁获取失败: {}", e)))
    }

    pub fn unit_system(&self) -> ApiResult<UnitSystem> {
        Ok(self.settings()?.unit_system)
    }

    /// 切换单位制并持久化
    pub fn set_unit_system(&self, unit_system: UnitSystem) -> ApiResult<()> {
        self.settings_manager.set_unit_system(unit_system)?;
        let mut settings = self
            .settings
            .write()
            .map_err(|e| ApiError::InternalError(format!("设置锁获取失败: {}", e)))?;
        settings.unit_system = unit_system;
        Ok(())
    }

    /// 保存完整设置
    pub fn save_settings(&self, settings: Settings) -> ApiResult<()> {
        self.settings_manager.save(&settings)?;
        let mut current = self
            .settings
            .write()
            .map_err(|e| ApiError::InternalError(format!("设置锁获取失败: {}", e)))?;
        *current = settings;
        Ok(())
    }

    /// 打开一个冲煮界面
    pub fn brew_api(&self, method: BrewMethod) -> ApiResult<BrewApi> {
        BrewApi::new(
            method,
            self.unit_system()?,
            Arc::clone(&self.recipes),
            Arc::clone(&self.entitlement),
        )
    }

    /// 深链接: 名称 → 内置食谱；未知名称返回 None
    pub fn open_deep_link(&self, name: &str) -> Option<&'static StaticRecipe> {
        let hit = resolve_deep_link(name);
        if hit.is_none() {
            tracing::debug!(name, "深链接未匹配任何食谱");
        }
        hit
    }
}

/// 获取默认数据库路径
///
/// 优先使用环境变量 COFFEE_RATIO_DB_PATH，否则放在用户数据目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("coffee-ratio");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}
