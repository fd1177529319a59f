// ==========================================
// 咖啡配比 - 自定义食谱仓储
// ==========================================
// 职责: 自定义食谱列表的唯一持有者，每次变更同步持久化
// 存储: BlobStore 键 "CustomCoffeeRecipes"，值为 JSON 数组
// 提交顺序: 编码 → 写入 → 替换内存列表
//   写入失败时内存列表保持不变
// 解码失败: 保留上一次成功加载的列表，并记录一条提示
// ==========================================

use crate::domain::recipe::{CustomRecipe, ImportOutcome};
use crate::repository::blob_store::BlobStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 食谱列表在 BlobStore 中的键
pub const CUSTOM_RECIPES_KEY: &str = "CustomCoffeeRecipes";

/// 编码食谱列表
pub fn encode_recipes(recipes: &[CustomRecipe]) -> RepositoryResult<Vec<u8>> {
    serde_json::to_vec(recipes).map_err(|e| RepositoryError::EncodeError(e.to_string()))
}

/// 解码食谱列表（缺少 grinderSetting / waterTemperature 的旧记录取默认值）
pub fn decode_recipes(bytes: &[u8]) -> RepositoryResult<Vec<CustomRecipe>> {
    serde_json::from_slice(bytes).map_err(|e| RepositoryError::decode(CUSTOM_RECIPES_KEY, e))
}

pub struct CustomRecipeRepository {
    store: Arc<dyn BlobStore>,
    recipes: Vec<CustomRecipe>,
    notice: Option<String>,
}

impl std::fmt::Debug for CustomRecipeRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRecipeRepository")
            .field("recipes", &self.recipes.len())
            .field("notice", &self.notice)
            .finish()
    }
}

impl CustomRecipeRepository {
    /// 从存储加载
    ///
    /// 数据无法解析时以空列表启动并记录提示，不返回错误；
    /// 存储本身读取失败才返回错误
    pub fn open(store: Arc<dyn BlobStore>) -> RepositoryResult<Self> {
        let mut repo = Self {
            store,
            recipes: Vec::new(),
            notice: None,
        };
        match repo.reload() {
            Ok(()) | Err(RepositoryError::DecodeError { .. }) => Ok(repo),
            Err(e) => Err(e),
        }
    }

    /// 重新从存储加载
    ///
    /// 解码失败时保留当前列表，记录提示并返回 DecodeError
    pub fn reload(&mut self) -> RepositoryResult<()> {
        let Some(bytes) = self.store.load(CUSTOM_RECIPES_KEY)? else {
            self.recipes.clear();
            return Ok(());
        };

        match decode_recipes(&bytes) {
            Ok(recipes) => {
                info!(count = recipes.len(), "自定义食谱已加载");
                self.recipes = recipes;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, kept = self.recipes.len(), "自定义食谱解析失败，保留当前列表");
                self.notice = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// 取出待展示的提示（取出后清空）
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn list(&self) -> &[CustomRecipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&CustomRecipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    fn position(&self, id: Uuid) -> RepositoryResult<usize> {
        self.recipes
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "CustomRecipe".to_string(),
                id: id.to_string(),
            })
    }

    /// 编码 → 写入 → 替换
    fn commit(&mut self, next: Vec<CustomRecipe>) -> RepositoryResult<()> {
        let bytes = encode_recipes(&next)?;
        self.store.save(CUSTOM_RECIPES_KEY, &bytes)?;
        self.recipes = next;
        Ok(())
    }

    /// 追加到列表末尾
    #[instrument(skip(self, recipe), fields(id = %recipe.id))]
    pub fn add(&mut self, recipe: CustomRecipe) -> RepositoryResult<()> {
        if self.contains(recipe.id) {
            return Err(RepositoryError::DuplicateId(recipe.id.to_string()));
        }
        let mut next = self.recipes.clone();
        next.push(recipe);
        self.commit(next)?;
        info!(count = self.recipes.len(), "自定义食谱已添加");
        Ok(())
    }

    /// 原位替换（id 保持不变）
    #[instrument(skip(self, recipe))]
    pub fn update(&mut self, id: Uuid, recipe: CustomRecipe) -> RepositoryResult<()> {
        let index = self.position(id)?;
        let mut next = self.recipes.clone();
        next[index] = CustomRecipe { id, ..recipe };
        self.commit(next)?;
        info!("自定义食谱已更新");
        Ok(())
    }

    /// 删除；id 不存在返回 Ok(false)
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: Uuid) -> RepositoryResult<bool> {
        let Ok(index) = self.position(id) else {
            return Ok(false);
        };
        let mut next = self.recipes.clone();
        next.remove(index);
        self.commit(next)?;
        info!(count = self.recipes.len(), "自定义食谱已删除");
        Ok(true)
    }

    /// 清空全部
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> RepositoryResult<()> {
        self.commit(Vec::new())?;
        info!("自定义食谱已清空");
        Ok(())
    }

    /// 调整顺序：先移除 from 处的元素，再插入到 to
    #[instrument(skip(self))]
    pub fn move_recipe(&mut self, from: usize, to: usize) -> RepositoryResult<()> {
        let len = self.recipes.len();
        if from >= len {
            return Err(RepositoryError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(RepositoryError::IndexOutOfRange { index: to, len });
        }
        if from == to {
            return Ok(());
        }

        let mut next = self.recipes.clone();
        let recipe = next.remove(from);
        next.insert(to, recipe);
        self.commit(next)
    }

    /// 导入；同 id 已存在时不修改列表，返回 DuplicateImport
    #[instrument(skip(self, recipe), fields(id = %recipe.id))]
    pub fn import_recipe(&mut self, recipe: CustomRecipe) -> RepositoryResult<ImportOutcome> {
        let id = recipe.id;
        if self.contains(id) {
            info!("食谱已存在，跳过导入");
            return Ok(ImportOutcome::DuplicateImport { id });
        }
        self.add(recipe)?;
        Ok(ImportOutcome::Added { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::blob_store::MemoryBlobStore;

    fn recipe(name: &str) -> CustomRecipe {
        CustomRecipe::new(name, "15", "225", "04:00", "")
    }

    fn open_memory() -> (Arc<MemoryBlobStore>, CustomRecipeRepository) {
        let store = Arc::new(MemoryBlobStore::new());
        let repo = CustomRecipeRepository::open(store.clone()).unwrap();
        (store, repo)
    }

    fn names(repo: &CustomRecipeRepository) -> Vec<&str> {
        repo.list().iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_empty_store_opens_empty() {
        let (_, repo) = open_memory();
        assert!(repo.is_empty());
    }

    #[test]
    fn test_add_persists_immediately() {
        let (store, mut repo) = open_memory();
        repo.add(recipe("A")).unwrap();

        let bytes = store.load(CUSTOM_RECIPES_KEY).unwrap().unwrap();
        let stored = decode_recipes(&bytes).unwrap();
        assert_eq!(stored, repo.list());
    }

    #[test]
    fn test_add_duplicate_id_is_rejected() {
        let (_, mut repo) = open_memory();
        let a = recipe("A");
        repo.add(a.clone()).unwrap();
        assert!(matches!(repo.add(a), Err(RepositoryError::DuplicateId(_))));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_update_keeps_id() {
        let (_, mut repo) = open_memory();
        let a = recipe("A");
        let id = a.id;
        repo.add(a).unwrap();

        repo.update(id, recipe("A2").with_water_temperature(92)).unwrap();
        let updated = repo.get(id).unwrap();
        assert_eq!(updated.name, "A2");
        assert_eq!(updated.water_temperature, 92);

        let missing = repo.update(Uuid::new_v4(), recipe("X"));
        assert!(matches!(missing, Err(RepositoryError::NotFound { .. })));
    }

    #[test]
    fn test_delete_and_clear() {
        let (_, mut repo) = open_memory();
        let a = recipe("A");
        let id = a.id;
        repo.add(a).unwrap();
        repo.add(recipe("B")).unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert_eq!(names(&repo), vec!["B"]);

        repo.clear().unwrap();
        assert!(repo.is_empty());
    }

    #[test]
    fn test_move_recipe() {
        let (_, mut repo) = open_memory();
        for name in ["A", "B", "C", "D"] {
            repo.add(recipe(name)).unwrap();
        }

        repo.move_recipe(0, 2).unwrap();
        assert_eq!(names(&repo), vec!["B", "C", "A", "D"]);

        repo.move_recipe(3, 0).unwrap();
        assert_eq!(names(&repo), vec!["D", "B", "C", "A"]);

        assert!(matches!(
            repo.move_recipe(4, 0),
            Err(RepositoryError::IndexOutOfRange { index: 4, len: 4 })
        ));
    }

    #[test]
    fn test_failed_save_leaves_list_unchanged() {
        let (store, mut repo) = open_memory();
        repo.add(recipe("A")).unwrap();

        store.set_fail_saves(true);
        assert!(repo.add(recipe("B")).is_err());
        assert!(repo.clear().is_err());
        assert_eq!(names(&repo), vec!["A"]);
    }

    #[test]
    fn test_import_duplicate_reports_outcome() {
        let (_, mut repo) = open_memory();
        let a = recipe("A");
        let id = a.id;

        assert_eq!(repo.import_recipe(a.clone()).unwrap(), ImportOutcome::Added { id });
        assert_eq!(
            repo.import_recipe(a).unwrap(),
            ImportOutcome::DuplicateImport { id }
        );
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_corrupt_data_keeps_last_good_state() {
        let store = Arc::new(MemoryBlobStore::new().with_entry(CUSTOM_RECIPES_KEY, "not json"));
        let mut repo = CustomRecipeRepository::open(store.clone()).unwrap();
        assert!(repo.is_empty());
        assert!(repo.take_notice().is_some());
        assert!(repo.take_notice().is_none());

        repo.add(recipe("A")).unwrap();
        store.save(CUSTOM_RECIPES_KEY, b"[{\"id\": 1}]").unwrap();

        let err = repo.reload().unwrap_err();
        assert!(matches!(err, RepositoryError::DecodeError { .. }));
        assert_eq!(names(&repo), vec!["A"]);
        assert!(repo.take_notice().is_some());
    }
}
