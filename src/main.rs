// ==========================================
// 咖啡配比 - 命令行入口
// ==========================================
// 用法:
//   coffee-ratio <method> [cups] [ratio]   显示参数并运行倒计时
//   coffee-ratio methods                   列出冲煮方式
//   coffee-ratio list                      列出自定义食谱
//   coffee-ratio import <file>             导入食谱文件
// Ctrl-C 暂停倒计时并退出
// ==========================================

use anyhow::{bail, Context, Result};
use coffee_ratio::api::{BrewApi, StaticEntitlement};
use coffee_ratio::app::{get_default_db_path, AppState};
use coffee_ratio::domain::catalog::brewing_methods;
use coffee_ratio::domain::recipe::ImportOutcome;
use coffee_ratio::domain::types::{BrewMethod, SessionState};
use coffee_ratio::engine::format_clock;
use coffee_ratio::logging;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

const USAGE: &str = "usage: coffee-ratio <method> [cups] [ratio] | methods | list | import <file>";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    match command.as_str() {
        "methods" => {
            for recipe in brewing_methods() {
                println!(
                    "{:<18} {:>6} {:>7}  {}",
                    recipe.name,
                    recipe.coffee_amount,
                    recipe.water_amount,
                    recipe.brew_time.unwrap_or("-")
                );
            }
            Ok(())
        }
        "list" => list_recipes(&open_state()?),
        "import" => {
            let path = args.get(1).context(USAGE)?;
            import_recipe(&open_state()?, Path::new(path))
        }
        name => {
            let Some(method) = BrewMethod::from_name(name) else {
                bail!("未知的冲煮方式: {}\n{}", name, USAGE);
            };
            let cups = parse_arg(args.get(1), "cups")?;
            let ratio = parse_arg(args.get(2), "ratio")?;
            brew(&open_state()?, method, cups, ratio).await
        }
    }
}

fn open_state() -> Result<AppState> {
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);
    AppState::new(&db_path, Arc::new(StaticEntitlement::new(false)))
        .with_context(|| format!("无法初始化AppState: {}", db_path))
}

fn parse_arg(arg: Option<&String>, name: &str) -> Result<Option<u32>> {
    arg.map(|v| {
        v.parse::<u32>()
            .with_context(|| format!("{} 必须是正整数: {}", name, v))
    })
    .transpose()
}

fn list_recipes(state: &AppState) -> Result<()> {
    if let Some(notice) = state.recipe_api.take_notice()? {
        eprintln!("警告: {}", notice);
    }

    let unit = state.unit_system()?;
    let recipes = state.recipe_api.list()?;
    if recipes.is_empty() {
        println!("(no custom recipes)");
    }
    for recipe in recipes {
        let view = state.recipe_api.view(recipe.id, unit)?;
        println!(
            "{}  {:<24} {:>10} {:>12} {:>6} {}",
            recipe.id, view.name, view.coffee, view.water, view.brew_time, view.temperature
        );
    }
    Ok(())
}

fn import_recipe(state: &AppState, path: &Path) -> Result<()> {
    match state.recipe_api.import_file(path)? {
        ImportOutcome::Added { id } => println!("imported {}", id),
        ImportOutcome::DuplicateImport { id } => println!("already imported {}", id),
    }
    Ok(())
}

async fn brew(
    state: &AppState,
    method: BrewMethod,
    cups: Option<u32>,
    ratio: Option<u32>,
) -> Result<()> {
    let mut api: BrewApi = state.brew_api(method)?;
    if let Some(cups) = cups {
        api.set_cup_count(cups)?;
    }
    if let Some(ratio) = ratio {
        api.set_ratio(ratio)?;
    }

    for line in api.summary().to_lines() {
        println!("{}", line);
    }

    // 订阅者只负责打印
    let mut updates = api.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let remaining = updates.borrow_and_update().remaining_seconds();
            print!("\r{} ", format_clock(remaining));
            let _ = std::io::stdout().flush();
        }
    });

    api.start()?;
    let interrupted = tokio::select! {
        _ = api.wait_finished() => false,
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        api.pause();
    }
    printer.abort();
    println!();

    let session = api.session();
    match session.state() {
        SessionState::Finished => println!("done"),
        _ => println!(
            "stopped at {} ({})",
            format_clock(session.remaining_seconds()),
            session.state()
        ),
    }
    Ok(())
}
