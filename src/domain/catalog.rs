// ==========================================
// 咖啡配比 - 内置静态食谱
// ==========================================
// 只读数据；深链接按名称解析到这里的条目
// ==========================================

use crate::domain::types::BrewMethod;
use serde::Serialize;

/// 内置食谱
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticRecipe {
    pub name: &'static str,
    pub coffee_amount: &'static str,
    pub water_amount: &'static str,

    /// 冲煮时长描述（本地化文本不在核心内，缺失时为 None）
    pub brew_time: Option<&'static str>,

    /// 有专属冲煮界面的食谱
    pub method: Option<BrewMethod>,
}

/// 内置食谱列表
pub const STATIC_RECIPES: &[StaticRecipe] = &[
    StaticRecipe {
        name: "Espresso",
        coffee_amount: "18gr",
        water_amount: "36ml",
        brew_time: None,
        method: None,
    },
    StaticRecipe {
        name: "French Press",
        coffee_amount: "15gr",
        water_amount: "225ml",
        brew_time: Some("4 min"),
        method: Some(BrewMethod::FrenchPress),
    },
    StaticRecipe {
        name: "Pour Over (V60)",
        coffee_amount: "15gr",
        water_amount: "230ml",
        brew_time: Some("3 min"),
        method: Some(BrewMethod::PourOver),
    },
    StaticRecipe {
        name: "AeroPress",
        coffee_amount: "15gr",
        water_amount: "210ml",
        brew_time: Some("1-2 min"),
        method: Some(BrewMethod::AeroPress),
    },
    StaticRecipe {
        name: "Moka Pot",
        coffee_amount: "14gr",
        water_amount: "160ml",
        brew_time: Some("4-6 min"),
        method: Some(BrewMethod::MokaPot),
    },
    StaticRecipe {
        name: "Turkish Coffee",
        coffee_amount: "7gr",
        water_amount: "70ml",
        brew_time: None,
        method: None,
    },
    StaticRecipe {
        name: "Syphon",
        coffee_amount: "20gr",
        water_amount: "300ml",
        brew_time: Some("3-4 min"),
        method: Some(BrewMethod::Syphon),
    },
    StaticRecipe {
        name: "Chemex",
        coffee_amount: "22gr",
        water_amount: "300ml",
        brew_time: Some("3-4 min"),
        method: Some(BrewMethod::Chemex),
    },
    StaticRecipe {
        name: "Filter Coffee",
        coffee_amount: "15gr",
        water_amount: "225ml",
        brew_time: None,
        method: None,
    },
];

/// 冲煮方式列表（有专属界面的内置食谱）
pub fn brewing_methods() -> impl Iterator<Item = &'static StaticRecipe> {
    STATIC_RECIPES.iter().filter(|r| r.method.is_some())
}

/// 查找某冲煮方式对应的内置食谱
pub fn recipe_for_method(method: BrewMethod) -> Option<&'static StaticRecipe> {
    STATIC_RECIPES.iter().find(|r| r.method == Some(method))
}

/// 深链接解析：名称 → 内置食谱
///
/// 去除首尾空白、大小写不敏感；未知名称返回 None（调用方不做任何事）
pub fn resolve_deep_link(name: &str) -> Option<&'static StaticRecipe> {
    let wanted = name.trim();
    if wanted.is_empty() {
        return None;
    }

    STATIC_RECIPES
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(wanted))
        .or_else(|| BrewMethod::from_name(wanted).and_then(recipe_for_method))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brewing_methods_cover_all_methods() {
        let methods: Vec<BrewMethod> = brewing_methods().filter_map(|r| r.method).collect();
        assert_eq!(methods.len(), BrewMethod::ALL.len());
        for method in BrewMethod::ALL {
            assert!(methods.contains(&method), "missing {:?}", method);
        }
    }

    #[test]
    fn test_resolve_deep_link() {
        let hit = resolve_deep_link("  chemex ").unwrap();
        assert_eq!(hit.name, "Chemex");

        let espresso = resolve_deep_link("Espresso").unwrap();
        assert_eq!(espresso.method, None);

        // 冲煮方式别名
        let v60 = resolve_deep_link("v60").unwrap();
        assert_eq!(v60.method, Some(BrewMethod::PourOver));

        assert!(resolve_deep_link("Unknown Brew").is_none());
        assert!(resolve_deep_link("   ").is_none());
    }
}
