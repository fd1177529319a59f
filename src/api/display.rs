// ==========================================
// 咖啡配比 - 显示格式化
// ==========================================
// 职责: 把公制数值按用户单位制格式化为显示文本
// - 盎司 / 液量盎司: 两位小数
// - 克 / 毫升 / 温度: 整数
// 存储值始终是公制，这里只做显示
// ==========================================

use crate::domain::parameters::BrewParameters;
use crate::domain::recipe::CustomRecipe;
use crate::domain::types::{BrewMethod, UnitSystem};
use crate::engine::brew_setup::{format_clock, parse_clock, BrewSetup};
use crate::engine::units::{
    celsius_to_fahrenheit, grams_to_ounces, milliliters_to_fluid_ounces,
    LEGACY_FLUID_OUNCES_PER_MILLILITER, LEGACY_OUNCES_PER_GRAM,
};
use serde::Serialize;
use tracing::debug;

/// 自定义食谱时长无法解析时使用的秒数
pub const FALLBACK_BREW_SECONDS: u32 = 240;

/// 磨豆刻度为空时的占位
pub const EMPTY_GRINDER_PLACEHOLDER: &str = "-";

/// 自定义食谱时长 → 秒（无法解析时回退 240）
pub fn brew_seconds_or_default(brew_time: &str) -> u32 {
    parse_clock(brew_time).unwrap_or_else(|| {
        debug!(brew_time, "时长无法解析，使用默认值");
        FALLBACK_BREW_SECONDS
    })
}

/// 从自由文本中提取数值（只保留数字和小数点）
///
/// "18gr" → 18.0，"1.5 kupa" → 1.5，"bir tutam" → None
pub fn numeric_value(text: &str) -> Option<f64> {
    let filtered: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    filtered.parse().ok()
}

pub fn mass_unit_label(unit: UnitSystem) -> &'static str {
    match unit {
        UnitSystem::Metric => "g",
        UnitSystem::Imperial => "oz",
    }
}

pub fn volume_unit_label(unit: UnitSystem) -> &'static str {
    match unit {
        UnitSystem::Metric => "ml",
        UnitSystem::Imperial => "fl oz",
    }
}

/// 粉量数值文本（不带单位）
pub fn format_mass_value(grams: u32, unit: UnitSystem) -> String {
    match unit {
        UnitSystem::Metric => grams.to_string(),
        UnitSystem::Imperial => format!("{:.2}", grams_to_ounces(f64::from(grams))),
    }
}

/// 水量数值文本（不带单位）
pub fn format_volume_value(milliliters: u32, unit: UnitSystem) -> String {
    match unit {
        UnitSystem::Metric => milliliters.to_string(),
        UnitSystem::Imperial => format!("{:.2}", milliliters_to_fluid_ounces(f64::from(milliliters))),
    }
}

/// "15 g" / "0.53 oz"
pub fn format_mass(grams: u32, unit: UnitSystem) -> String {
    format!("{} {}", format_mass_value(grams, unit), mass_unit_label(unit))
}

/// "300 ml" / "10.14 fl oz"
pub fn format_volume(milliliters: u32, unit: UnitSystem) -> String {
    format!("{} {}", format_volume_value(milliliters, unit), volume_unit_label(unit))
}

/// "94°C" / "201°F"
pub fn format_temperature(celsius: i32, unit: UnitSystem) -> String {
    match unit {
        UnitSystem::Metric => format!("{}°C", celsius),
        UnitSystem::Imperial => format!("{}°F", celsius_to_fahrenheit(celsius)),
    }
}

/// 自定义食谱粉量显示：能提取数值则换算，否则原样显示
pub fn format_recipe_coffee_amount(text: &str, unit: UnitSystem) -> String {
    match (numeric_value(text), unit) {
        (None, _) => text.to_string(),
        (Some(v), UnitSystem::Metric) => format!("{} gr", v.trunc() as i64),
        (Some(v), UnitSystem::Imperial) => format!("{:.2} oz", v * LEGACY_OUNCES_PER_GRAM),
    }
}

/// 自定义食谱水量显示：能提取数值则换算，否则原样显示
pub fn format_recipe_water_amount(text: &str, unit: UnitSystem) -> String {
    match (numeric_value(text), unit) {
        (None, _) => text.to_string(),
        (Some(v), UnitSystem::Metric) => format!("{} ml", v.trunc() as i64),
        (Some(v), UnitSystem::Imperial) => {
            format!("{:.2} fl oz", v * LEGACY_FLUID_OUNCES_PER_MILLILITER)
        }
    }
}

// ==========================================
// BrewSummary - 冲煮界面摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrewSummary {
    pub method: BrewMethod,
    pub method_name: String,
    pub cup_count: u32,
    pub coffee: String,
    pub water: String,
    /// "1/15"
    pub ratio: String,
    pub temperature: String,
    pub grinder: String,
    /// "MM:SS"
    pub brew_time: String,
}

impl BrewSummary {
    pub fn from_setup(setup: &BrewSetup, unit: UnitSystem) -> Self {
        let BrewParameters {
            coffee_grams,
            water_ml,
            brew_seconds,
            water_temperature_c,
        } = *setup.parameters();

        let grinder = if setup.grinder_setting().trim().is_empty() {
            EMPTY_GRINDER_PLACEHOLDER.to_string()
        } else {
            setup.grinder_setting().to_string()
        };

        Self {
            method: setup.method(),
            method_name: setup.method().display_name().to_string(),
            cup_count: setup.cup_count(),
            coffee: format_mass(coffee_grams, unit),
            water: format_volume(water_ml, unit),
            ratio: format!("1/{}", setup.ratio()),
            temperature: format_temperature(water_temperature_c, unit),
            grinder,
            brew_time: format_clock(brew_seconds),
        }
    }

    /// 多行文本（CLI 输出）
    pub fn to_lines(&self) -> Vec<String> {
        vec![
            self.method_name.clone(),
            format!("Cups: {}", self.cup_count),
            format!("Coffee: {}", self.coffee),
            format!("Water: {}, Ratio: {}", self.water, self.ratio),
            format!("Water temperature: {}", self.temperature),
            format!("Grinder: {}", self.grinder),
            format!("Time: {}", self.brew_time),
        ]
    }
}

// ==========================================
// CustomRecipeView - 自定义食谱详情显示
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRecipeView {
    pub name: String,
    pub coffee: String,
    pub water: String,
    pub temperature: String,
    pub grinder: String,
    pub brew_seconds: u32,
    pub brew_time: String,
    pub notes: String,
}

impl CustomRecipeView {
    pub fn new(recipe: &CustomRecipe, unit: UnitSystem) -> Self {
        let brew_seconds = brew_seconds_or_default(&recipe.brew_time);
        let grinder = if recipe.grinder_setting.trim().is_empty() {
            EMPTY_GRINDER_PLACEHOLDER.to_string()
        } else {
            recipe.grinder_setting.clone()
        };

        Self {
            name: recipe.name.clone(),
            coffee: format_recipe_coffee_amount(&recipe.coffee_amount, unit),
            water: format_recipe_water_amount(&recipe.water_amount, unit),
            temperature: format_temperature(recipe.water_temperature, unit),
            grinder,
            brew_seconds,
            brew_time: format_clock(brew_seconds),
            notes: recipe.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_value() {
        assert_eq!(numeric_value("18gr"), Some(18.0));
        assert_eq!(numeric_value("1.5 kupa"), Some(1.5));
        assert_eq!(numeric_value("bir tutam"), None);
        assert_eq!(numeric_value(""), None);
        assert_eq!(numeric_value("1.2.3"), None);
    }

    #[test]
    fn test_format_parameters() {
        assert_eq!(format_mass(15, UnitSystem::Metric), "15 g");
        assert_eq!(format_mass(15, UnitSystem::Imperial), "0.53 oz");
        assert_eq!(format_volume(225, UnitSystem::Metric), "225 ml");
        assert_eq!(format_volume(300, UnitSystem::Imperial), "10.14 fl oz");
        assert_eq!(format_temperature(94, UnitSystem::Metric), "94°C");
        assert_eq!(format_temperature(94, UnitSystem::Imperial), "201°F");
    }

    #[test]
    fn test_format_free_form_amounts() {
        assert_eq!(format_recipe_coffee_amount("18.7gr", UnitSystem::Metric), "18 gr");
        assert_eq!(format_recipe_coffee_amount("100", UnitSystem::Imperial), "3.53 oz");
        assert_eq!(format_recipe_water_amount("250ml", UnitSystem::Imperial), "8.45 fl oz");
        assert_eq!(
            format_recipe_water_amount("bir fincan", UnitSystem::Imperial),
            "bir fincan"
        );
    }

    #[test]
    fn test_brew_seconds_fallback() {
        assert_eq!(brew_seconds_or_default("03:30"), 210);
        assert_eq!(brew_seconds_or_default("uzun"), FALLBACK_BREW_SECONDS);
    }

    #[test]
    fn test_brew_summary() {
        let mut setup = BrewSetup::new(BrewMethod::FrenchPress).unwrap();
        let summary = BrewSummary::from_setup(&setup, UnitSystem::Metric);
        assert_eq!(summary.coffee, "15 g");
        assert_eq!(summary.water, "225 ml");
        assert_eq!(summary.ratio, "1/15");
        assert_eq!(summary.temperature, "94°C");
        assert_eq!(summary.grinder, "-");
        assert_eq!(summary.brew_time, "04:00");

        setup.set_grinder_setting("Timemore 18");
        let summary = BrewSummary::from_setup(&setup, UnitSystem::Imperial);
        assert_eq!(summary.grinder, "Timemore 18");
        assert_eq!(summary.temperature, "201°F");
        assert_eq!(summary.to_lines().len(), 7);
    }

    #[test]
    fn test_custom_recipe_view() {
        let recipe = CustomRecipe::new("Sabah", "18gr", "bir kupa", "xx", "not");
        let view = CustomRecipeView::new(&recipe, UnitSystem::Metric);
        assert_eq!(view.coffee, "18 gr");
        assert_eq!(view.water, "bir kupa");
        assert_eq!(view.brew_seconds, 240);
        assert_eq!(view.brew_time, "04:00");
        assert_eq!(view.grinder, "-");
    }
}
