// ==========================================
// 咖啡配比 - 领域类型定义
// ==========================================
// 冲煮方式 / 单位制 / 计时状态
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 冲煮方式 (Brew Method)
// ==========================================
// 每种方式对应一张按杯数索引的参数表（见 engine::parameters）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrewMethod {
    FrenchPress, // 法压壶
    PourOver,    // 手冲 (V60)
    AeroPress,   // 爱乐压
    MokaPot,     // 摩卡壶
    Syphon,      // 虹吸壶
    Chemex,      // 凯梅克斯
}

impl BrewMethod {
    /// 全部冲煮方式（界面列表顺序）
    pub const ALL: [BrewMethod; 6] = [
        BrewMethod::FrenchPress,
        BrewMethod::PourOver,
        BrewMethod::AeroPress,
        BrewMethod::MokaPot,
        BrewMethod::Syphon,
        BrewMethod::Chemex,
    ];

    /// 静态食谱中使用的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            BrewMethod::FrenchPress => "French Press",
            BrewMethod::PourOver => "Pour Over (V60)",
            BrewMethod::AeroPress => "AeroPress",
            BrewMethod::MokaPot => "Moka Pot",
            BrewMethod::Syphon => "Syphon",
            BrewMethod::Chemex => "Chemex",
        }
    }

    /// 从名称解析冲煮方式
    ///
    /// 接受显示名称（"Moka Pot"）、序列化名称（"MOKA_POT"）
    /// 以及去掉空格/下划线后的紧凑写法（"mokapot"），大小写不敏感
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = compact(name);
        if wanted.is_empty() {
            return None;
        }

        BrewMethod::ALL
            .into_iter()
            .find(|method| {
                compact(method.display_name()) == wanted
                    || compact(&method.to_string()) == wanted
            })
            .or_else(|| match wanted.as_str() {
                "v60" | "pourover" => Some(BrewMethod::PourOver),
                "siphon" => Some(BrewMethod::Syphon),
                _ => None,
            })
    }
}

fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for BrewMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrewMethod::FrenchPress => write!(f, "FRENCH_PRESS"),
            BrewMethod::PourOver => write!(f, "POUR_OVER"),
            BrewMethod::AeroPress => write!(f, "AERO_PRESS"),
            BrewMethod::MokaPot => write!(f, "MOKA_POT"),
            BrewMethod::Syphon => write!(f, "SYPHON"),
            BrewMethod::Chemex => write!(f, "CHEMEX"),
        }
    }
}

// ==========================================
// 单位制 (Unit System)
// ==========================================
// 仅影响显示；存储值始终为公制
// 序列化格式: "Metric" / "Imperial"（与设置存储一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// 从设置字符串解析，未知值回退为公制
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "imperial" => UnitSystem::Imperial,
            _ => UnitSystem::Metric,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "Metric",
            UnitSystem::Imperial => "Imperial",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 计时状态 (Session State)
// ==========================================
// 由 (running, remaining, target) 推导，不单独存储
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Idle,     // remaining == target, 未运行
    Running,  // 运行中
    Paused,   // 0 < remaining < target, 未运行
    Finished, // remaining == 0
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "IDLE"),
            SessionState::Running => write!(f, "RUNNING"),
            SessionState::Paused => write!(f, "PAUSED"),
            SessionState::Finished => write!(f, "FINISHED"),
        }
    }
}

// ==========================================
// 计时主按钮意图 (Session Action)
// ==========================================
// Running → Stop; 未运行且 remaining < target → Resume; 否则 → Start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionAction {
    Start,
    Resume,
    Stop,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionAction::Start => write!(f, "START"),
            SessionAction::Resume => write!(f, "RESUME"),
            SessionAction::Stop => write!(f, "STOP"),
        }
    }
}
