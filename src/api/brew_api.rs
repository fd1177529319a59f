// ==========================================
// 咖啡配比 - 冲煮界面 API
// ==========================================
// 职责: 组合 BrewSetup（参数）与 SessionTicker（倒计时），
//       提供一个冲煮界面需要的全部操作
// 参数变化导致时长变化时，倒计时目标随之重置
// 保存当前参数为食谱需要高级版
// ==========================================

use crate::api::display::BrewSummary;
use crate::api::entitlement::{require_premium, EntitlementProvider};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::recipe::CustomRecipe;
use crate::domain::types::{BrewMethod, SessionAction, UnitSystem};
use crate::engine::brew_setup::BrewSetup;
use crate::engine::session::BrewSession;
use crate::engine::ticker::SessionTicker;
use crate::repository::recipe_repo::CustomRecipeRepository;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{info, instrument};

/// 冲煮界面 API（每个界面一个实例）
pub struct BrewApi {
    setup: BrewSetup,
    ticker: SessionTicker,
    unit_system: UnitSystem,
    recipes: Arc<Mutex<CustomRecipeRepository>>,
    entitlement: Arc<dyn EntitlementProvider>,
}

impl BrewApi {
    /// 以冲煮方式默认参数打开界面
    pub fn new(
        method: BrewMethod,
        unit_system: UnitSystem,
        recipes: Arc<Mutex<CustomRecipeRepository>>,
        entitlement: Arc<dyn EntitlementProvider>,
    ) -> ApiResult<Self> {
        let setup = BrewSetup::new(method)?;
        let ticker = SessionTicker::new(BrewSession::new(setup.parameters().brew_seconds));
        Ok(Self {
            setup,
            ticker,
            unit_system,
            recipes,
            entitlement,
        })
    }

    pub fn setup(&self) -> &BrewSetup {
        &self.setup
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    pub fn set_unit_system(&mut self, unit_system: UnitSystem) {
        self.unit_system = unit_system;
    }

    /// 当前摘要（按用户单位制）
    pub fn summary(&self) -> BrewSummary {
        BrewSummary::from_setup(&self.setup, self.unit_system)
    }

    // ==========================================
    // 参数调整
    // ==========================================

    pub fn set_cup_count(&mut self, cup_count: u32) -> ApiResult<BrewSummary> {
        self.setup.set_cup_count(cup_count)?;
        self.retarget();
        Ok(self.summary())
    }

    pub fn set_ratio(&mut self, ratio: u32) -> ApiResult<BrewSummary> {
        self.setup.set_ratio(ratio)?;
        Ok(self.summary())
    }

    pub fn set_water_temperature(&mut self, celsius: i32) -> BrewSummary {
        self.setup.set_water_temperature(celsius);
        self.summary()
    }

    pub fn set_brew_seconds(&mut self, seconds: u32) -> BrewSummary {
        self.setup.set_brew_seconds(seconds);
        self.retarget();
        self.summary()
    }

    pub fn set_grinder_setting(&mut self, grinder_setting: &str) -> BrewSummary {
        self.setup.set_grinder_setting(grinder_setting);
        self.summary()
    }

    /// 时长有变化才重置倒计时
    fn retarget(&mut self) {
        let seconds = self.setup.parameters().brew_seconds;
        if self.ticker.snapshot().target_seconds() != seconds {
            self.ticker.set_target(seconds);
        }
    }

    // ==========================================
    // 倒计时
    // ==========================================

    pub fn session(&self) -> BrewSession {
        self.ticker.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<BrewSession> {
        self.ticker.subscribe()
    }

    /// 主按钮: 运行中 → 暂停，否则 → 开始/继续
    pub fn toggle(&mut self) -> ApiResult<SessionAction> {
        let action = self.ticker.snapshot().primary_action();
        match action {
            SessionAction::Stop => self.ticker.pause(),
            SessionAction::Start | SessionAction::Resume => self.ticker.start()?,
        }
        Ok(action)
    }

    pub fn start(&mut self) -> ApiResult<()> {
        self.ticker.start()?;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.ticker.pause();
    }

    pub fn reset(&mut self) {
        self.ticker.reset();
    }

    /// 等待倒计时结束（CLI 使用）
    pub async fn wait_finished(&mut self) -> BrewSession {
        self.ticker.wait_finished().await
    }

    // ==========================================
    // 保存为自定义食谱
    // ==========================================

    /// 当前参数另存为食谱（需要高级版，名称不能为空）
    #[instrument(skip(self), fields(method = %self.setup.method()))]
    pub async fn save_as_recipe(&self, name: &str) -> ApiResult<CustomRecipe> {
        require_premium(self.entitlement.as_ref(), "保存食谱").await?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("食谱名称不能为空".to_string()));
        }

        let recipe = self.setup.to_custom_recipe(name);
        self.lock_recipes()?.add(recipe.clone())?;
        info!(id = %recipe.id, "当前参数已保存为食谱");
        Ok(recipe)
    }

    fn lock_recipes(&self) -> ApiResult<MutexGuard<'_, CustomRecipeRepository>> {
        self.recipes
            .lock()
            .map_err(|e| ApiError::DatabaseError(format!("数据库锁获取失败: {}", e)))
    }
}
