// ==========================================
// 咖啡配比 - 自定义食谱 API
// ==========================================
// 职责: 食谱列表增删改查、排序、文件导入/导出、详情页倒计时
// 门控: 添加食谱、导出（分享）需要高级版；编辑/删除/导入不受限
// ==========================================

use crate::api::display::{brew_seconds_or_default, CustomRecipeView};
use crate::api::entitlement::{require_premium, EntitlementProvider};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{RecipeDraft, RecipeDraftValidator};
use crate::domain::recipe::{CustomRecipe, ImportOutcome};
use crate::domain::types::{SessionAction, UnitSystem};
use crate::engine::session::BrewSession;
use crate::engine::ticker::SessionTicker;
use crate::repository::recipe_file::{decode_recipe_document, read_recipe_file, write_recipe_file};
use crate::repository::recipe_repo::CustomRecipeRepository;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, instrument};
use uuid::Uuid;

fn lock_repo(
    repo: &Mutex<CustomRecipeRepository>,
) -> ApiResult<MutexGuard<'_, CustomRecipeRepository>> {
    repo.lock()
        .map_err(|e| ApiError::DatabaseError(format!("数据库锁获取失败: {}", e)))
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("CustomRecipe(id={})不存在", id))
}

// ==========================================
// RecipeApi - 自定义食谱 API
// ==========================================
pub struct RecipeApi {
    repo: Arc<Mutex<CustomRecipeRepository>>,
    entitlement: Arc<dyn EntitlementProvider>,
    validator: RecipeDraftValidator,
}

impl RecipeApi {
    pub fn new(
        repo: Arc<Mutex<CustomRecipeRepository>>,
        entitlement: Arc<dyn EntitlementProvider>,
    ) -> Self {
        Self {
            repo,
            entitlement,
            validator: RecipeDraftValidator::new(),
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn list(&self) -> ApiResult<Vec<CustomRecipe>> {
        Ok(lock_repo(&self.repo)?.list().to_vec())
    }

    pub fn get(&self, id: Uuid) -> ApiResult<CustomRecipe> {
        lock_repo(&self.repo)?
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// 详情页显示
    pub fn view(&self, id: Uuid, unit: UnitSystem) -> ApiResult<CustomRecipeView> {
        Ok(CustomRecipeView::new(&self.get(id)?, unit))
    }

    /// 加载时产生的提示（如数据无法解析），取出后清空
    pub fn take_notice(&self) -> ApiResult<Option<String>> {
        Ok(lock_repo(&self.repo)?.take_notice())
    }

    // ==========================================
    // 变更
    // ==========================================

    /// 手动添加（需要高级版）
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add(&self, draft: &RecipeDraft) -> ApiResult<CustomRecipe> {
        require_premium(self.entitlement.as_ref(), "添加食谱").await?;

        let recipe = self.validator.build(draft, Uuid::new_v4())?;
        lock_repo(&self.repo)?.add(recipe.clone())?;
        Ok(recipe)
    }

    /// 编辑（id 不变）
    #[instrument(skip(self, draft))]
    pub fn update(&self, id: Uuid, draft: &RecipeDraft) -> ApiResult<CustomRecipe> {
        let recipe = self.validator.build(draft, id)?;
        lock_repo(&self.repo)?.update(id, recipe.clone())?;
        Ok(recipe)
    }

    /// 删除；id 不存在返回 false
    pub fn delete(&self, id: Uuid) -> ApiResult<bool> {
        Ok(lock_repo(&self.repo)?.delete(id)?)
    }

    pub fn clear(&self) -> ApiResult<()> {
        Ok(lock_repo(&self.repo)?.clear()?)
    }

    pub fn move_recipe(&self, from: usize, to: usize) -> ApiResult<()> {
        Ok(lock_repo(&self.repo)?.move_recipe(from, to)?)
    }

    // ==========================================
    // 导入 / 导出
    // ==========================================

    /// 导出到目录（分享，需要高级版）
    #[instrument(skip(self, dir))]
    pub async fn export(&self, id: Uuid, dir: &Path) -> ApiResult<PathBuf> {
        require_premium(self.entitlement.as_ref(), "分享食谱").await?;
        let recipe = self.get(id)?;
        Ok(write_recipe_file(&recipe, dir)?)
    }

    /// 从文件导入
    #[instrument(skip(self))]
    pub fn import_file(&self, path: &Path) -> ApiResult<ImportOutcome> {
        let recipe = read_recipe_file(path)?;
        self.import_recipe(recipe)
    }

    /// 从内存中的文档导入（宿主应用打开文件后传入内容）
    pub fn import_bytes(&self, source_name: &str, bytes: &[u8]) -> ApiResult<ImportOutcome> {
        let recipe = decode_recipe_document(source_name, bytes)?;
        self.import_recipe(recipe)
    }

    fn import_recipe(&self, recipe: CustomRecipe) -> ApiResult<ImportOutcome> {
        let outcome = lock_repo(&self.repo)?.import_recipe(recipe)?;
        match &outcome {
            ImportOutcome::Added { id } => info!(%id, "食谱已导入"),
            ImportOutcome::DuplicateImport { id } => info!(%id, "食谱已存在"),
        }
        Ok(outcome)
    }

    // ==========================================
    // 详情页倒计时
    // ==========================================

    pub fn open_detail(&self, id: Uuid) -> ApiResult<RecipeDetailSession> {
        let recipe = self.get(id)?;
        let target = brew_seconds_or_default(&recipe.brew_time);
        Ok(RecipeDetailSession {
            id,
            repo: Arc::clone(&self.repo),
            ticker: SessionTicker::new(BrewSession::new(target)),
        })
    }
}

// ==========================================
// RecipeDetailSession - 自定义食谱详情页倒计时
// ==========================================
/// 开始/继续前重新读取食谱时长（详情页打开期间食谱可能被编辑）
pub struct RecipeDetailSession {
    id: Uuid,
    repo: Arc<Mutex<CustomRecipeRepository>>,
    ticker: SessionTicker,
}

impl RecipeDetailSession {
    pub fn recipe_id(&self) -> Uuid {
        self.id
    }

    pub fn session(&self) -> BrewSession {
        self.ticker.snapshot()
    }

    fn current_target(&self) -> ApiResult<u32> {
        let repo = lock_repo(&self.repo)?;
        let recipe = repo.get(self.id).ok_or_else(|| not_found(self.id))?;
        Ok(brew_seconds_or_default(&recipe.brew_time))
    }

    /// 开始/继续；剩余时间不小于最新时长时收敛到最新时长
    pub fn start(&mut self) -> ApiResult<()> {
        let target = self.current_target()?;
        self.ticker.start_with_target(target)?;
        Ok(())
    }

    /// 主按钮
    pub fn toggle(&mut self) -> ApiResult<SessionAction> {
        let action = self.ticker.snapshot().primary_action();
        match action {
            SessionAction::Stop => self.ticker.pause(),
            SessionAction::Start | SessionAction::Resume => self.start()?,
        }
        Ok(action)
    }

    pub fn pause(&mut self) {
        self.ticker.pause();
    }

    /// 重置到最新时长
    pub fn reset(&mut self) -> ApiResult<()> {
        let target = self.current_target()?;
        self.ticker.set_target(target);
        self.ticker.reset();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::entitlement::StaticEntitlement;
    use crate::repository::blob_store::MemoryBlobStore;

    fn api(premium: bool) -> RecipeApi {
        let repo = CustomRecipeRepository::open(Arc::new(MemoryBlobStore::new())).unwrap();
        RecipeApi::new(
            Arc::new(Mutex::new(repo)),
            Arc::new(StaticEntitlement::new(premium)),
        )
    }

    fn draft(name: &str) -> RecipeDraft {
        RecipeDraft {
            name: name.to_string(),
            coffee_amount: "18".to_string(),
            water_amount: "300".to_string(),
            ..RecipeDraft::default()
        }
    }

    #[tokio::test]
    async fn test_add_is_gated() {
        let api = api(false);
        let err = api.add(&draft("A")).await.unwrap_err();
        assert!(matches!(err, ApiError::PremiumRequired(_)));
        assert!(api.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_update_delete() {
        let api = api(true);
        let recipe = api.add(&draft("A")).await.unwrap();
        assert_eq!(recipe.brew_time, "04:00");

        let updated = api
            .update(recipe.id, &RecipeDraft { brew_seconds: 180, ..draft("A2") })
            .unwrap();
        assert_eq!(updated.id, recipe.id);
        assert_eq!(api.get(recipe.id).unwrap().brew_time, "03:00");

        assert!(api.delete(recipe.id).unwrap());
        assert!(matches!(api.get(recipe.id), Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_import_bytes_duplicate() {
        let api = api(false);
        let recipe = CustomRecipe::new("Paylaşılan", "15", "250", "03:00", "");
        let bytes = serde_json::to_vec_pretty(&recipe).unwrap();

        let first = api.import_bytes("shared.json", &bytes).unwrap();
        assert_eq!(first, ImportOutcome::Added { id: recipe.id });
        let second = api.import_bytes("shared.json", &bytes).unwrap();
        assert_eq!(second, ImportOutcome::DuplicateImport { id: recipe.id });
        assert_eq!(api.list().unwrap().len(), 1);

        let err = api.import_bytes("broken.json", b"{}").unwrap_err();
        assert!(matches!(err, ApiError::DecodeError(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_session_follows_edited_time() {
        let api = api(true);
        let recipe = api
            .add(&RecipeDraft { brew_seconds: 120, ..draft("Detay") })
            .await
            .unwrap();

        let mut detail = api.open_detail(recipe.id).unwrap();
        assert_eq!(detail.session().remaining_seconds(), 120);

        detail.start().unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2_500)).await;
        detail.pause();
        assert_eq!(detail.session().remaining_seconds(), 118);

        // 时长被改短，继续时收敛到新时长
        api.update(recipe.id, &RecipeDraft { brew_seconds: 60, ..draft("Detay") })
            .unwrap();
        assert_eq!(detail.toggle().unwrap(), SessionAction::Resume);
        assert_eq!(detail.session().remaining_seconds(), 60);

        detail.pause();
        detail.reset().unwrap();
        assert_eq!(detail.session().remaining_seconds(), 60);
    }
}
