// ==========================================
// 咖啡配比 - 冲煮参数引擎
// ==========================================
// 职责: (冲煮方式, 杯数, 粉水比) → (粉量, 水量, 时长, 默认水温)
// 两种水量策略按冲煮方式选择，不做全局统一:
// - 比例: 水量 = 杯数 × 每杯粉量 × 比例 (法压壶)
// - 查表: 水量取自按杯数索引的固定表 (手冲 / 凯梅克斯 / 爱乐压 / 摩卡壶 / 虹吸壶)
// 粉量与时长始终查表；调整比例时所有方式都按比例重算水量 (apply_ratio)
// ==========================================

use crate::domain::parameters::{
    BrewParameters, BREW_SECONDS_MAX, BREW_SECONDS_MIN, BREW_SECONDS_STEP,
    WATER_TEMPERATURE_MAX_C, WATER_TEMPERATURE_MIN_C,
};
use crate::domain::types::BrewMethod;
use crate::engine::error::{EngineError, EngineResult};
use std::ops::RangeInclusive;
use tracing::debug;

// ==========================================
// 每种冲煮方式的参数表
// ==========================================

/// 粉量规则
#[derive(Debug, Clone, Copy)]
pub enum CoffeeRule {
    /// 按杯数查表（克）
    Table(&'static [u32]),

    /// 杯数 × 每杯粉量 − 偏移（克），偏移为经验常数
    PerCupMinusOffset(&'static [u32]),
}

/// 水量规则
#[derive(Debug, Clone, Copy)]
pub enum WaterRule {
    /// 杯数 × 每杯粉量 × 比例
    Ratio,

    /// 按杯数查表（毫升）
    Table(&'static [u32]),
}

/// 冲煮方式参数档案
#[derive(Debug, Clone, Copy)]
pub struct MethodProfile {
    pub method: BrewMethod,

    /// 每杯粉量（克），用于比例换算水量
    pub coffee_per_cup_g: u32,

    pub ratio_range: RangeInclusiveU32,
    pub default_ratio: u32,
    pub default_water_temperature_c: i32,

    pub coffee: CoffeeRule,
    pub water: WaterRule,

    /// 按杯数索引的冲煮时长（秒）；长度即最大杯数
    pub brew_seconds: &'static [u32],
}

/// const 上下文可用的闭区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeInclusiveU32 {
    pub min: u32,
    pub max: u32,
}

impl RangeInclusiveU32 {
    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// 法压壶 2~5 杯的粉量偏移（克）
pub const FRENCH_PRESS_COFFEE_OFFSETS_G: [u32; 5] = [0, 5, 10, 15, 15];

/// 手冲与凯梅克斯共用的粉量表
const FILTER_COFFEE_G: [u32; 5] = [15, 25, 40, 50, 65];

/// 手冲与凯梅克斯共用的水量表（毫升）
const FILTER_WATER_ML: [u32; 5] = [225, 450, 675, 900, 1125];

/// 手冲与凯梅克斯共用的时长表
const FILTER_BREW_SECONDS: [u32; 5] = [180, 210, 300, 375, 480];

const STANDARD_RATIOS: RangeInclusiveU32 = RangeInclusiveU32 { min: 13, max: 16 };

static PROFILES: [MethodProfile; 6] = [
    MethodProfile {
        method: BrewMethod::FrenchPress,
        coffee_per_cup_g: 15,
        ratio_range: STANDARD_RATIOS,
        default_ratio: 15,
        default_water_temperature_c: 94,
        coffee: CoffeeRule::PerCupMinusOffset(&FRENCH_PRESS_COFFEE_OFFSETS_G),
        water: WaterRule::Ratio,
        brew_seconds: &[240, 300, 360, 420, 480],
    },
    MethodProfile {
        method: BrewMethod::PourOver,
        coffee_per_cup_g: 15,
        ratio_range: STANDARD_RATIOS,
        default_ratio: 15,
        default_water_temperature_c: 92,
        coffee: CoffeeRule::Table(&FILTER_COFFEE_G),
        water: WaterRule::Table(&FILTER_WATER_ML),
        brew_seconds: &FILTER_BREW_SECONDS,
    },
    MethodProfile {
        method: BrewMethod::AeroPress,
        coffee_per_cup_g: 15,
        ratio_range: STANDARD_RATIOS,
        default_ratio: 14,
        default_water_temperature_c: 92,
        coffee: CoffeeRule::Table(&[15, 20, 30]),
        water: WaterRule::Table(&[210, 225, 225]),
        brew_seconds: &[120, 180, 210],
    },
    MethodProfile {
        method: BrewMethod::MokaPot,
        coffee_per_cup_g: 14,
        ratio_range: RangeInclusiveU32 { min: 10, max: 13 },
        default_ratio: 11,
        default_water_temperature_c: 95,
        coffee: CoffeeRule::Table(&[14, 30, 40]),
        water: WaterRule::Table(&[150, 310, 450]),
        brew_seconds: &[240, 300, 360],
    },
    MethodProfile {
        method: BrewMethod::Syphon,
        coffee_per_cup_g: 20,
        ratio_range: STANDARD_RATIOS,
        default_ratio: 15,
        default_water_temperature_c: 95,
        coffee: CoffeeRule::Table(&[15, 30, 40, 50]),
        water: WaterRule::Table(&[225, 450, 675, 900]),
        brew_seconds: &[180, 240, 300, 360],
    },
    MethodProfile {
        method: BrewMethod::Chemex,
        coffee_per_cup_g: 22,
        ratio_range: STANDARD_RATIOS,
        default_ratio: 14,
        default_water_temperature_c: 94,
        coffee: CoffeeRule::Table(&FILTER_COFFEE_G),
        water: WaterRule::Table(&FILTER_WATER_ML),
        brew_seconds: &FILTER_BREW_SECONDS,
    },
];

/// 获取冲煮方式的参数档案
pub fn profile(method: BrewMethod) -> &'static MethodProfile {
    match method {
        BrewMethod::FrenchPress => &PROFILES[0],
        BrewMethod::PourOver => &PROFILES[1],
        BrewMethod::AeroPress => &PROFILES[2],
        BrewMethod::MokaPot => &PROFILES[3],
        BrewMethod::Syphon => &PROFILES[4],
        BrewMethod::Chemex => &PROFILES[5],
    }
}

impl MethodProfile {
    /// 支持的杯数范围（从 1 开始）
    pub fn cup_range(&self) -> RangeInclusive<u32> {
        1..=self.max_cups()
    }

    pub fn max_cups(&self) -> u32 {
        self.brew_seconds.len() as u32
    }

    /// 杯数 → 表索引；越界返回 InvalidInput
    fn cup_index(&self, cup_count: u32) -> EngineResult<usize> {
        if !self.cup_range().contains(&cup_count) {
            return Err(EngineError::invalid_input(
                "cup_count",
                format!(
                    "{} 不支持 {} 杯（允许 1~{}）",
                    self.method.display_name(),
                    cup_count,
                    self.max_cups()
                ),
            ));
        }
        Ok((cup_count - 1) as usize)
    }

    fn check_ratio(&self, ratio: u32) -> EngineResult<()> {
        if !self.ratio_range.contains(ratio) {
            return Err(EngineError::invalid_input(
                "ratio",
                format!(
                    "{} 不支持 1/{}（允许 1/{}~1/{}）",
                    self.method.display_name(),
                    ratio,
                    self.ratio_range.min,
                    self.ratio_range.max
                ),
            ));
        }
        Ok(())
    }

    fn table_value(&self, table: &[u32], index: usize, field: &str) -> EngineResult<u32> {
        table.get(index).copied().ok_or_else(|| {
            EngineError::invalid_input(
                field,
                format!("{} 参数表缺少第 {} 杯", self.method.display_name(), index + 1),
            )
        })
    }

    /// 比例水量: 杯数 × 每杯粉量 × 比例
    pub fn ratio_water_ml(&self, cup_count: u32, ratio: u32) -> u32 {
        cup_count * self.coffee_per_cup_g * ratio
    }
}

// ==========================================
// ParameterEngine - 冲煮参数引擎
// ==========================================
/// 无状态；所有冲煮界面共用
#[derive(Debug, Default, Clone, Copy)]
pub struct ParameterEngine;

impl ParameterEngine {
    pub fn new() -> Self {
        Self
    }

    /// 按杯数与比例计算完整参数（杯数变化时调用）
    ///
    /// # 错误
    /// - 杯数不在冲煮方式支持的范围内 → InvalidInput
    /// - 比例不在冲煮方式支持的范围内 → InvalidInput
    ///
    /// 水温取冲煮方式默认值
    pub fn derive(
        &self,
        method: BrewMethod,
        cup_count: u32,
        ratio: u32,
    ) -> EngineResult<BrewParameters> {
        let profile = profile(method);
        let index = profile.cup_index(cup_count)?;
        profile.check_ratio(ratio)?;

        let coffee_grams = match profile.coffee {
            CoffeeRule::Table(table) => profile.table_value(table, index, "coffee_grams")?,
            CoffeeRule::PerCupMinusOffset(offsets) => {
                let offset = profile.table_value(offsets, index, "coffee_grams")?;
                cup_count * profile.coffee_per_cup_g - offset
            }
        };

        let water_ml = match profile.water {
            WaterRule::Ratio => profile.ratio_water_ml(cup_count, ratio),
            WaterRule::Table(table) => profile.table_value(table, index, "water_ml")?,
        };

        let brew_seconds = profile.table_value(profile.brew_seconds, index, "brew_seconds")?;

        let params = BrewParameters {
            coffee_grams,
            water_ml,
            brew_seconds,
            water_temperature_c: profile.default_water_temperature_c,
        };

        debug!(
            method = %method,
            cup_count,
            ratio,
            coffee_grams,
            water_ml,
            brew_seconds,
            "冲煮参数已计算"
        );

        Ok(params)
    }

    /// 仅改变比例: 只重算水量，粉量/时长/水温保持不变
    pub fn apply_ratio(
        &self,
        method: BrewMethod,
        current: &BrewParameters,
        cup_count: u32,
        ratio: u32,
    ) -> EngineResult<BrewParameters> {
        let profile = profile(method);
        profile.cup_index(cup_count)?;
        profile.check_ratio(ratio)?;

        Ok(BrewParameters {
            water_ml: profile.ratio_water_ml(cup_count, ratio),
            ..*current
        })
    }

    /// 冲煮方式的初始参数（1 杯，默认比例）
    pub fn defaults(&self, method: BrewMethod) -> EngineResult<BrewParameters> {
        self.derive(method, 1, profile(method).default_ratio)
    }
}

/// 水温限制在 [92, 95]
pub fn clamp_water_temperature(celsius: i32) -> i32 {
    celsius.clamp(WATER_TEMPERATURE_MIN_C, WATER_TEMPERATURE_MAX_C)
}

/// 冲煮时长限制在 [60, 600]，并对齐到 15 秒步长
pub fn normalize_brew_seconds(seconds: u32) -> u32 {
    let clamped = seconds.clamp(BREW_SECONDS_MIN, BREW_SECONDS_MAX);
    let snapped = (clamped + BREW_SECONDS_STEP / 2) / BREW_SECONDS_STEP * BREW_SECONDS_STEP;
    snapped.clamp(BREW_SECONDS_MIN, BREW_SECONDS_MAX)
}
