// ==========================================
// 咖啡配比 - 冲煮界面参数状态
// ==========================================
// 六个冲煮界面共用的参数状态，界面只提供冲煮方式
// 字段联动规则:
// - 改杯数: 粉量 / 水量 / 时长全部按表重算，水温不变
// - 改比例: 只重算水量
// - 水温: 独立字段，限制在 [92, 95]
// - 时长: 手动调节，限制在 [60, 600]，步长 15 秒
// 输入非法时返回错误且不改变任何字段
// ==========================================

use crate::domain::parameters::BrewParameters;
use crate::domain::recipe::CustomRecipe;
use crate::domain::types::BrewMethod;
use crate::engine::error::EngineResult;
use crate::engine::parameters::{
    clamp_water_temperature, normalize_brew_seconds, profile, ParameterEngine,
};
use serde::Serialize;

/// 冲煮界面参数状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrewSetup {
    method: BrewMethod,
    cup_count: u32,
    ratio: u32,
    parameters: BrewParameters,
    grinder_setting: String,
}

impl BrewSetup {
    /// 以冲煮方式默认值创建（1 杯，默认比例，默认水温）
    pub fn new(method: BrewMethod) -> EngineResult<Self> {
        let ratio = profile(method).default_ratio;
        let parameters = ParameterEngine::new().derive(method, 1, ratio)?;
        Ok(Self {
            method,
            cup_count: 1,
            ratio,
            parameters,
            grinder_setting: String::new(),
        })
    }

    pub fn method(&self) -> BrewMethod {
        self.method
    }

    pub fn cup_count(&self) -> u32 {
        self.cup_count
    }

    pub fn ratio(&self) -> u32 {
        self.ratio
    }

    pub fn parameters(&self) -> &BrewParameters {
        &self.parameters
    }

    pub fn grinder_setting(&self) -> &str {
        &self.grinder_setting
    }

    /// 改杯数
    pub fn set_cup_count(&mut self, cup_count: u32) -> EngineResult<&BrewParameters> {
        let derived = ParameterEngine::new().derive(self.method, cup_count, self.ratio)?;
        self.cup_count = cup_count;
        self.parameters = BrewParameters {
            water_temperature_c: self.parameters.water_temperature_c,
            ..derived
        };
        Ok(&self.parameters)
    }

    /// 改比例
    pub fn set_ratio(&mut self, ratio: u32) -> EngineResult<&BrewParameters> {
        self.parameters =
            ParameterEngine::new().apply_ratio(self.method, &self.parameters, self.cup_count, ratio)?;
        self.ratio = ratio;
        Ok(&self.parameters)
    }

    /// 改水温，返回实际生效值
    pub fn set_water_temperature(&mut self, celsius: i32) -> i32 {
        self.parameters.water_temperature_c = clamp_water_temperature(celsius);
        self.parameters.water_temperature_c
    }

    /// 手动调节时长，返回实际生效值
    pub fn set_brew_seconds(&mut self, seconds: u32) -> u32 {
        self.parameters.brew_seconds = normalize_brew_seconds(seconds);
        self.parameters.brew_seconds
    }

    pub fn set_grinder_setting(&mut self, grinder_setting: impl Into<String>) {
        self.grinder_setting = grinder_setting.into();
    }

    /// 当前参数另存为自定义食谱
    ///
    /// 粉量/水量保存为公制整数字符串，时长保存为 "MM:SS"，备注为空
    pub fn to_custom_recipe(&self, name: &str) -> CustomRecipe {
        CustomRecipe::new(
            name,
            self.parameters.coffee_grams.to_string(),
            self.parameters.water_ml.to_string(),
            format_clock(self.parameters.brew_seconds),
            "",
        )
        .with_grinder_setting(self.grinder_setting.clone())
        .with_water_temperature(self.parameters.water_temperature_c)
    }
}

/// 秒 → "MM:SS"
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// "MM:SS" → 秒；格式不符或溢出返回 None
///
/// 文本可能来自导入文件，不能假定数值合理
pub fn parse_clock(text: &str) -> Option<u32> {
    let (minutes, seconds) = text.trim().split_once(':')?;
    if seconds.contains(':') {
        return None;
    }
    let minutes: u32 = minutes.trim().parse().ok()?;
    let seconds: u32 = seconds.trim().parse().ok()?;
    minutes.checked_mul(60)?.checked_add(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::EngineError;

    #[test]
    fn test_new_uses_method_defaults() {
        let setup = BrewSetup::new(BrewMethod::MokaPot).unwrap();
        assert_eq!(setup.cup_count(), 1);
        assert_eq!(setup.ratio(), 11);
        assert_eq!(
            *setup.parameters(),
            BrewParameters {
                coffee_grams: 14,
                water_ml: 150,
                brew_seconds: 240,
                water_temperature_c: 95,
            }
        );
    }

    #[test]
    fn test_cup_change_keeps_user_temperature() {
        let mut setup = BrewSetup::new(BrewMethod::FrenchPress).unwrap();
        setup.set_water_temperature(92);
        let params = *setup.set_cup_count(3).unwrap();
        assert_eq!(params.coffee_grams, 35);
        assert_eq!(params.water_ml, 3 * 15 * 15);
        assert_eq!(params.brew_seconds, 360);
        assert_eq!(params.water_temperature_c, 92);
    }

    #[test]
    fn test_ratio_change_only_touches_water() {
        let mut setup = BrewSetup::new(BrewMethod::PourOver).unwrap();
        setup.set_cup_count(4).unwrap();
        setup.set_brew_seconds(420);
        let before = *setup.parameters();

        let after = *setup.set_ratio(13).unwrap();
        assert_eq!(after.coffee_grams, before.coffee_grams);
        assert_eq!(after.brew_seconds, 420);
        assert_eq!(after.water_ml, 4 * 15 * 13);
        assert_eq!(setup.ratio(), 13);
    }

    #[test]
    fn test_invalid_input_leaves_state_untouched() {
        let mut setup = BrewSetup::new(BrewMethod::AeroPress).unwrap();
        let before = setup.clone();

        let err = setup.set_cup_count(5).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
        assert!(setup.set_ratio(20).is_err());
        assert_eq!(setup, before);
    }

    #[test]
    fn test_to_custom_recipe() {
        let mut setup = BrewSetup::new(BrewMethod::Chemex).unwrap();
        setup.set_grinder_setting("Comandante 28");
        let recipe = setup.to_custom_recipe("Pazar Chemex");

        assert_eq!(recipe.name, "Pazar Chemex");
        assert_eq!(recipe.coffee_amount, "15");
        assert_eq!(recipe.water_amount, "225");
        assert_eq!(recipe.brew_time, "03:00");
        assert_eq!(recipe.notes, "");
        assert_eq!(recipe.grinder_setting, "Comandante 28");
        assert_eq!(recipe.water_temperature, 94);
    }

    #[test]
    fn test_clock_format_and_parse() {
        assert_eq!(format_clock(240), "04:00");
        assert_eq!(format_clock(375), "06:15");
        assert_eq!(format_clock(0), "00:00");

        assert_eq!(parse_clock("03:30"), Some(210));
        assert_eq!(parse_clock(" 10:05 "), Some(605));
        assert_eq!(parse_clock("4 dakika"), None);
        assert_eq!(parse_clock("1:2:3"), None);
        assert_eq!(parse_clock(""), None);
    }

    #[test]
    fn test_parse_clock_overflow_is_none() {
        assert_eq!(parse_clock("99999999:00"), None);
        assert_eq!(parse_clock("71582788:59"), None);
        assert_eq!(parse_clock("00:4294967295"), Some(u32::MAX));
        assert_eq!(parse_clock("1:4294967295"), None);
    }
}
