// ==========================================
// 咖啡配比 - 自定义食谱表单校验
// ==========================================
// 职责: 手动新建/编辑食谱时的字段校验
// - 名称、粉量、水量不能为空
// - 备注去除首尾空白
// - 时长 0~900 秒，步长 15 秒
// - 水温 92~95°C
// 所有违规一次性返回，便于界面逐项提示
// ==========================================

use crate::api::error::{ApiError, ApiResult, FieldViolation};
use crate::domain::parameters::{
    DEFAULT_WATER_TEMPERATURE_C, WATER_TEMPERATURE_MAX_C, WATER_TEMPERATURE_MIN_C,
};
use crate::domain::recipe::CustomRecipe;
use crate::engine::brew_setup::format_clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 表单时长上限（秒）
pub const DRAFT_BREW_SECONDS_MAX: u32 = 15 * 60;

/// 表单时长步长（秒）
pub const DRAFT_BREW_SECONDS_STEP: u32 = 15;

/// 表单默认时长（秒）
pub const DRAFT_DEFAULT_BREW_SECONDS: u32 = 240;

/// 食谱表单
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub name: String,
    pub coffee_amount: String,
    pub water_amount: String,
    pub brew_seconds: u32,
    pub notes: String,
    pub grinder_setting: String,
    pub water_temperature: i32,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            coffee_amount: String::new(),
            water_amount: String::new(),
            brew_seconds: DRAFT_DEFAULT_BREW_SECONDS,
            notes: String::new(),
            grinder_setting: String::new(),
            water_temperature: DEFAULT_WATER_TEMPERATURE_C,
        }
    }
}

impl RecipeDraft {
    /// 由已有食谱生成编辑表单（时长无法解析时回退默认值）
    pub fn from_recipe(recipe: &CustomRecipe) -> Self {
        Self {
            name: recipe.name.clone(),
            coffee_amount: recipe.coffee_amount.clone(),
            water_amount: recipe.water_amount.clone(),
            brew_seconds: crate::api::display::brew_seconds_or_default(&recipe.brew_time),
            notes: recipe.notes.clone(),
            grinder_setting: recipe.grinder_setting.clone(),
            water_temperature: recipe.water_temperature,
        }
    }
}

// ==========================================
// RecipeDraftValidator - 表单校验器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct RecipeDraftValidator;

impl RecipeDraftValidator {
    pub fn new() -> Self {
        Self
    }

    /// 收集全部违规
    pub fn violations(&self, draft: &RecipeDraft) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if draft.name.is_empty() {
            violations.push(FieldViolation::new("name", "名称不能为空"));
        }
        if draft.coffee_amount.is_empty() {
            violations.push(FieldViolation::new("coffeeAmount", "咖啡量不能为空"));
        }
        if draft.water_amount.is_empty() {
            violations.push(FieldViolation::new("waterAmount", "水量不能为空"));
        }
        if draft.brew_seconds > DRAFT_BREW_SECONDS_MAX {
            violations.push(FieldViolation::new(
                "brewSeconds",
                format!("时长不能超过 {} 秒", DRAFT_BREW_SECONDS_MAX),
            ));
        } else if draft.brew_seconds % DRAFT_BREW_SECONDS_STEP != 0 {
            violations.push(FieldViolation::new(
                "brewSeconds",
                format!("时长必须是 {} 秒的整数倍", DRAFT_BREW_SECONDS_STEP),
            ));
        }
        if !(WATER_TEMPERATURE_MIN_C..=WATER_TEMPERATURE_MAX_C).contains(&draft.water_temperature)
        {
            violations.push(FieldViolation::new(
                "waterTemperature",
                format!(
                    "水温必须在 {}~{}°C 之间",
                    WATER_TEMPERATURE_MIN_C, WATER_TEMPERATURE_MAX_C
                ),
            ));
        }

        violations
    }

    /// 校验通过后生成食谱（使用给定 id）
    pub fn build(&self, draft: &RecipeDraft, id: Uuid) -> ApiResult<CustomRecipe> {
        let violations = self.violations(draft);
        if !violations.is_empty() {
            let reason = violations
                .iter()
                .map(|v| format!("{}: {}", v.field, v.reason))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::ValidationError { reason, violations });
        }

        Ok(CustomRecipe {
            id,
            name: draft.name.clone(),
            coffee_amount: draft.coffee_amount.clone(),
            water_amount: draft.water_amount.clone(),
            brew_time: format_clock(draft.brew_seconds),
            notes: draft.notes.trim().to_string(),
            grinder_setting: draft.grinder_setting.clone(),
            water_temperature: draft.water_temperature,
        })
    }
}
