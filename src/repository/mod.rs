// ==========================================
// 咖啡配比 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口，屏蔽存储细节
// 约束: 仓储不含冲煮规则；权限检查在 api 层
// ==========================================

pub mod blob_store;
pub mod error;
pub mod recipe_file;
pub mod recipe_repo;

// 重导出核心仓储
pub use blob_store::{BlobStore, MemoryBlobStore, SqliteBlobStore};
pub use error::{RepositoryError, RepositoryResult};
pub use recipe_file::{export_file_name, read_recipe_file, write_recipe_file};
pub use recipe_repo::{CustomRecipeRepository, CUSTOM_RECIPES_KEY};
