// ==========================================
// 咖啡配比 - 单个食谱文件导入/导出
// ==========================================
// 文件格式: 一个食谱对象，格式化 JSON，扩展名 .json
// 文件名: 由食谱名称生成（去掉路径分隔符等非法字符）
// ==========================================

use crate::domain::recipe::CustomRecipe;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 导出文件扩展名
pub const RECIPE_FILE_EXTENSION: &str = "json";

const FALLBACK_FILE_STEM: &str = "recipe";

/// 编码为导出文档
pub fn encode_recipe_document(recipe: &CustomRecipe) -> RepositoryResult<Vec<u8>> {
    serde_json::to_vec_pretty(recipe).map_err(|e| RepositoryError::EncodeError(e.to_string()))
}

/// 解析导出文档（缺少必填字段 → DecodeError）
pub fn decode_recipe_document(source_name: &str, bytes: &[u8]) -> RepositoryResult<CustomRecipe> {
    serde_json::from_slice(bytes).map_err(|e| RepositoryError::decode(source_name, e))
}

/// 由食谱名称生成导出文件名
pub fn export_file_name(recipe_name: &str) -> String {
    let stem: String = recipe_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim_matches('.');

    if stem.is_empty() {
        format!("{}.{}", FALLBACK_FILE_STEM, RECIPE_FILE_EXTENSION)
    } else {
        format!("{}.{}", stem, RECIPE_FILE_EXTENSION)
    }
}

/// 导出到目录，返回文件路径（同名文件被覆盖）
pub fn write_recipe_file(recipe: &CustomRecipe, dir: &Path) -> RepositoryResult<PathBuf> {
    let bytes = encode_recipe_document(recipe)?;
    let path = dir.join(export_file_name(&recipe.name));
    fs::write(&path, bytes)?;
    info!(path = %path.display(), id = %recipe.id, "食谱已导出");
    Ok(path)
}

/// 读取导出文件
pub fn read_recipe_file(path: &Path) -> RepositoryResult<CustomRecipe> {
    let bytes = fs::read(path)?;
    decode_recipe_document(&path.display().to_string(), &bytes)
}
