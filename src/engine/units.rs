// ==========================================
// 咖啡配比 - 单位换算
// ==========================================
// 纯函数；只用于显示，不改变存储的公制数值
// 格式化（小数位）在 api::display 中处理
// ==========================================

/// 克 → 盎司
pub const OUNCES_PER_GRAM: f64 = 0.0353;

/// 毫升 → 液量盎司
pub const FLUID_OUNCES_PER_MILLILITER: f64 = 0.0338;

/// 自定义食谱自由文本数量使用的换算系数（克 → 盎司）
pub const LEGACY_OUNCES_PER_GRAM: f64 = 0.035274;

/// 自定义食谱自由文本数量使用的换算系数（毫升 → 液量盎司）
pub const LEGACY_FLUID_OUNCES_PER_MILLILITER: f64 = 0.033814;

pub fn grams_to_ounces(grams: f64) -> f64 {
    grams * OUNCES_PER_GRAM
}

pub fn ounces_to_grams(ounces: f64) -> f64 {
    ounces / OUNCES_PER_GRAM
}

pub fn milliliters_to_fluid_ounces(milliliters: f64) -> f64 {
    milliliters * FLUID_OUNCES_PER_MILLILITER
}

pub fn fluid_ounces_to_milliliters(fluid_ounces: f64) -> f64 {
    fluid_ounces / FLUID_OUNCES_PER_MILLILITER
}

/// 摄氏 → 华氏，结果向零截断（94°C 显示为 201°F）
pub fn celsius_to_fahrenheit(celsius: i32) -> i32 {
    (f64::from(celsius) * 9.0 / 5.0 + 32.0).trunc() as i32
}
