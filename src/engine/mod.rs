// ==========================================
// 咖啡配比 - 引擎层
// ==========================================
// 职责: 冲煮参数计算、单位换算、倒计时状态机
// 约束: 引擎不访问存储，不依赖 api 层
// ==========================================

pub mod brew_setup;
pub mod error;
pub mod parameters;
pub mod session;
pub mod ticker;
pub mod units;

// 重导出核心引擎
pub use brew_setup::{format_clock, parse_clock, BrewSetup};
pub use error::{EngineError, EngineResult};
pub use parameters::{profile, MethodProfile, ParameterEngine};
pub use session::{BrewSession, TickOutcome};
pub use ticker::{SessionTicker, TICK_PERIOD};
