// ==========================================
// 咖啡配比 - 应用层
// ==========================================
// 职责: 组装共享资源，供 CLI / 宿主应用使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
