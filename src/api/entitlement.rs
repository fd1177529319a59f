// ==========================================
// 咖啡配比 - 高级版权限检查接口
// ==========================================
// 应用内购买不在核心内，这里只定义"是否已解锁"的查询接口
// 门控范围: 保存当前参数为食谱、添加食谱、导出/分享
// 参数计算与计时不受限制
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

// ==========================================
// EntitlementProvider Trait
// ==========================================
// 实现者: StaticEntitlement（固定值 / 测试），宿主应用的购买模块
#[async_trait]
pub trait EntitlementProvider: Send + Sync {
    /// 高级版是否已解锁
    async fn is_premium_unlocked(&self) -> ApiResult<bool>;
}

/// 门控检查：未解锁返回 PremiumRequired
pub async fn require_premium(
    provider: &dyn EntitlementProvider,
    feature: &str,
) -> ApiResult<()> {
    if provider.is_premium_unlocked().await? {
        Ok(())
    } else {
        Err(ApiError::PremiumRequired(feature.to_string()))
    }
}

/// 固定权限（可在运行时切换）
#[derive(Debug, Default)]
pub struct StaticEntitlement {
    unlocked: AtomicBool,
}

impl StaticEntitlement {
    pub fn new(unlocked: bool) -> Self {
        Self {
            unlocked: AtomicBool::new(unlocked),
        }
    }

    pub fn set_unlocked(&self, unlocked: bool) {
        self.unlocked.store(unlocked, Ordering::SeqCst);
    }
}

#[async_trait]
impl EntitlementProvider for StaticEntitlement {
    async fn is_premium_unlocked(&self) -> ApiResult<bool> {
        Ok(self.unlocked.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_require_premium() {
        let provider = StaticEntitlement::new(false);
        let err = require_premium(&provider, "保存食谱").await.unwrap_err();
        assert!(matches!(err, ApiError::PremiumRequired(_)));

        provider.set_unlocked(true);
        assert!(require_premium(&provider, "保存食谱").await.is_ok());
    }
}
