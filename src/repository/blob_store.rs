// ==========================================
// 咖啡配比 - 键值 Blob 存储
// ==========================================
// 职责: 按键读写整段字节（食谱列表 JSON、设置项）
// 约束: save 成功才算提交；失败时调用方保留内存状态不变
// ==========================================

use crate::db::{ensure_kv_schema, open_in_memory, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// 键值 Blob 存储接口
pub trait BlobStore: Send + Sync {
    /// 读取；键不存在返回 None
    fn load(&self, key: &str) -> RepositoryResult<Option<Vec<u8>>>;

    /// 覆盖写入
    fn save(&self, key: &str, value: &[u8]) -> RepositoryResult<()>;

    /// 删除；键不存在不报错
    fn remove(&self, key: &str) -> RepositoryResult<()>;
}

// ==========================================
// SqliteBlobStore - SQLite 实现
// ==========================================
pub struct SqliteBlobStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBlobStore {
    /// 打开数据库文件并确保表存在
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 内存数据库（进程内临时使用）
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn =
            open_in_memory().map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 复用已有连接
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let store = Self { conn };
        {
            let conn = store.get_conn()?;
            ensure_kv_schema(&conn)?;
        }
        Ok(store)
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl BlobStore for SqliteBlobStore {
    fn load(&self, key: &str) -> RepositoryResult<Option<Vec<u8>>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_blob WHERE key = ?1",
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &str, value: &[u8]) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO kv_blob (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
              value = excluded.value,
              updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        debug!(key, bytes = value.len(), "kv_blob 已写入");
        Ok(())
    }

    fn remove(&self, key: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM kv_blob WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// ==========================================
// MemoryBlobStore - 内存实现（测试用）
// ==========================================
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fail_saves: Mutex<bool>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一个键（模拟已有的持久化数据）
    pub fn with_entry(self, key: &str, value: impl Into<Vec<u8>>) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.into());
        }
        self
    }

    /// 之后的 save 全部失败（模拟磁盘写入失败）
    pub fn set_fail_saves(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_saves.lock() {
            *flag = fail;
        }
    }

    fn entries(&self) -> RepositoryResult<MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> RepositoryResult<Option<Vec<u8>>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &[u8]) -> RepositoryResult<()> {
        let fail = self
            .fail_saves
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        if *fail {
            return Err(RepositoryError::IoError(format!("写入 {} 失败", key)));
        }
        self.entries()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> RepositoryResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn BlobStore) {
        assert_eq!(store.load("k").unwrap(), None);

        store.save("k", b"one").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some(&b"one"[..]));

        store.save("k", b"two").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some(&b"two"[..]));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.load("k").unwrap(), None);
    }

    #[test]
    fn test_sqlite_blob_store() {
        exercise(&SqliteBlobStore::in_memory().unwrap());
    }

    #[test]
    fn test_memory_blob_store() {
        exercise(&MemoryBlobStore::new());
    }

    #[test]
    fn test_memory_blob_store_failing_saves() {
        let store = MemoryBlobStore::new().with_entry("k", "kept");
        store.set_fail_saves(true);
        assert!(matches!(
            store.save("k", b"new"),
            Err(RepositoryError::IoError(_))
        ));
        assert_eq!(store.load("k").unwrap().as_deref(), Some(&b"kept"[..]));
    }
}
