// ==========================================
// 咖啡配比 - 冲煮参数值对象
// ==========================================
// 规范量（克 / 毫升 / 秒 / 摄氏度）是唯一事实来源，
// 英制数值只在显示层换算，从不存储
// ==========================================

use serde::{Deserialize, Serialize};

/// 冲煮时长下限（秒）
pub const BREW_SECONDS_MIN: u32 = 60;

/// 冲煮时长上限（秒）
pub const BREW_SECONDS_MAX: u32 = 600;

/// 冲煮时长调节步长（秒）
pub const BREW_SECONDS_STEP: u32 = 15;

/// 水温下限（°C）
pub const WATER_TEMPERATURE_MIN_C: i32 = 92;

/// 水温上限（°C）
pub const WATER_TEMPERATURE_MAX_C: i32 = 95;

/// 自定义食谱默认水温（°C）
pub const DEFAULT_WATER_TEMPERATURE_C: i32 = 94;

/// 冲煮参数（计算后不可变）
///
/// 不变量:
/// - coffee_grams > 0, water_ml > 0
/// - brew_seconds ∈ [60, 600]
/// - water_temperature_c ∈ [92, 95]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrewParameters {
    /// 咖啡粉量（克）
    pub coffee_grams: u32,

    /// 水量（毫升）
    pub water_ml: u32,

    /// 冲煮时长（秒）
    pub brew_seconds: u32,

    /// 水温（°C）
    pub water_temperature_c: i32,
}
