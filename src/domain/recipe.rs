// ==========================================
// 咖啡配比 - 自定义食谱实体
// ==========================================
// 持久化格式（JSON 对象，字段名固定）:
//   id, name, coffeeAmount, waterAmount, brewTime, notes,
//   grinderSetting?, waterTemperature?
// 旧版本记录可能缺少后两个字段，解码时取默认值
// ==========================================

use crate::domain::parameters::DEFAULT_WATER_TEMPERATURE_C;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

fn default_water_temperature() -> i32 {
    DEFAULT_WATER_TEMPERATURE_C
}

// 显式 null 与缺失字段同样处理
fn null_as_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_water_temperature<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or_else(default_water_temperature))
}

/// 用户自定义食谱
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRecipe {
    pub id: Uuid,
    pub name: String,

    /// 咖啡量（自由文本，显示时再附单位）
    pub coffee_amount: String,

    /// 水量（自由文本）
    pub water_amount: String,

    /// 冲煮时长，"MM:SS"
    pub brew_time: String,

    pub notes: String,

    /// 磨豆机刻度（旧记录缺省为空串）
    #[serde(default, deserialize_with = "null_as_default")]
    pub grinder_setting: String,

    /// 水温 °C（旧记录缺省为 94）
    #[serde(
        default = "default_water_temperature",
        deserialize_with = "null_as_default_water_temperature"
    )]
    pub water_temperature: i32,
}

impl CustomRecipe {
    /// 创建新食谱（随机 id，磨豆刻度为空，水温 94°C）
    pub fn new(
        name: impl Into<String>,
        coffee_amount: impl Into<String>,
        water_amount: impl Into<String>,
        brew_time: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            coffee_amount: coffee_amount.into(),
            water_amount: water_amount.into(),
            brew_time: brew_time.into(),
            notes: notes.into(),
            grinder_setting: String::new(),
            water_temperature: DEFAULT_WATER_TEMPERATURE_C,
        }
    }

    pub fn with_grinder_setting(mut self, grinder_setting: impl Into<String>) -> Self {
        self.grinder_setting = grinder_setting.into();
        self
    }

    pub fn with_water_temperature(mut self, celsius: i32) -> Self {
        self.water_temperature = celsius;
        self
    }
}

/// 导入结果
///
/// 重复导入不是错误，而是一个独立的、需要告知用户的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// 已加入食谱列表
    Added { id: Uuid },

    /// 同 id 食谱已存在，列表未改变
    DuplicateImport { id: Uuid },
}
