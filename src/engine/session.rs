// ==========================================
// 咖啡配比 - 冲煮倒计时状态机
// ==========================================
// 状态: Idle / Running / Paused / Finished
// 由外部每秒驱动 tick()；不做墙钟校正，延迟的 tick 也只减 1
// 本模块不持有任何定时器资源（见 engine::ticker）
// ==========================================

use crate::domain::types::{SessionAction, SessionState};
use crate::engine::error::{EngineError, EngineResult};
use serde::Serialize;
use tracing::{debug, warn};

/// 单次 tick 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 未运行，忽略
    Ignored,

    /// 已减 1，仍在运行
    Counted { remaining_seconds: u32 },

    /// 倒计时归零，已停止
    Finished,
}

/// 冲煮会话（每个冲煮界面一个，不持久化）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrewSession {
    target_seconds: u32,
    remaining_seconds: u32,
    running: bool,
}

impl BrewSession {
    /// 以目标时长创建空闲会话
    pub fn new(target_seconds: u32) -> Self {
        Self {
            target_seconds,
            remaining_seconds: target_seconds,
            running: false,
        }
    }

    pub fn target_seconds(&self) -> u32 {
        self.target_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 是否已经走过（remaining < target）
    pub fn has_progress(&self) -> bool {
        self.remaining_seconds < self.target_seconds
    }

    pub fn state(&self) -> SessionState {
        if self.running {
            SessionState::Running
        } else if self.remaining_seconds == 0 {
            SessionState::Finished
        } else if self.remaining_seconds == self.target_seconds {
            SessionState::Idle
        } else {
            SessionState::Paused
        }
    }

    /// 主按钮意图
    pub fn primary_action(&self) -> SessionAction {
        if self.running {
            SessionAction::Stop
        } else if self.has_progress() {
            SessionAction::Resume
        } else {
            SessionAction::Start
        }
    }

    /// Idle/Paused → Running
    ///
    /// - 已在运行 → InvalidTransition
    /// - Finished → 不做任何事（需先 reset）
    pub fn start(&mut self) -> EngineResult<()> {
        match self.state() {
            SessionState::Running => Err(EngineError::InvalidTransition {
                from: SessionState::Running,
                to: SessionState::Running,
            }),
            SessionState::Finished => {
                debug!("倒计时已结束，忽略 start");
                Ok(())
            }
            SessionState::Idle | SessionState::Paused => {
                self.running = true;
                debug!(remaining = self.remaining_seconds, "倒计时开始");
                Ok(())
            }
        }
    }

    /// 恢复运行前把剩余时间收敛到新的目标时长（自定义食谱详情页使用，
    /// 期间食谱时长可能已被编辑）
    pub fn start_with_target(&mut self, target_seconds: u32) -> EngineResult<()> {
        if self.running {
            return self.start();
        }
        self.target_seconds = target_seconds;
        if self.remaining_seconds >= target_seconds {
            self.remaining_seconds = target_seconds;
        }
        self.start()
    }

    /// 每秒调用一次
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.running = false;
            debug!("倒计时结束");
            return TickOutcome::Finished;
        }

        TickOutcome::Counted {
            remaining_seconds: self.remaining_seconds,
        }
    }

    /// Running → Paused（从未走过则回到 Idle）；未运行时不做任何事
    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            debug!(remaining = self.remaining_seconds, state = %self.state(), "倒计时暂停");
        }
    }

    /// 任意状态 → Idle
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_seconds = self.target_seconds;
    }

    /// 修改目标时长，立即重置剩余时间
    ///
    /// 运行中也会立即重置（倒计时会跳变），与原有行为保持一致
    pub fn set_target(&mut self, target_seconds: u32) {
        if self.running && target_seconds != self.target_seconds {
            warn!(
                from = self.target_seconds,
                to = target_seconds,
                remaining = self.remaining_seconds,
                "运行中修改冲煮时长，剩余时间被重置"
            );
        }

        self.target_seconds = target_seconds;
        self.remaining_seconds = target_seconds;
        if target_seconds == 0 {
            self.running = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = BrewSession::new(240);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.remaining_seconds(), 240);
        assert_eq!(session.primary_action(), SessionAction::Start);
        assert!(!session.has_progress());
    }

    #[test]
    fn test_start_tick_pause_reset() {
        let mut session = BrewSession::new(240);
        session.start().unwrap();
        for _ in 0..5 {
            session.tick();
        }
        assert_eq!(session.remaining_seconds(), 235);
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.primary_action(), SessionAction::Stop);

        session.pause();
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(session.remaining_seconds(), 235);
        assert_eq!(session.primary_action(), SessionAction::Resume);

        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.remaining_seconds(), 240);
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let mut session = BrewSession::new(60);
        session.start().unwrap();
        let err = session.start().unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));
        assert!(session.is_running());
    }

    #[test]
    fn test_pause_without_tick_returns_to_idle() {
        let mut session = BrewSession::new(60);
        session.start().unwrap();
        session.pause();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_run_to_finish_then_ticks_are_ignored() {
        let mut session = BrewSession::new(3);
        session.start().unwrap();
        assert_eq!(session.tick(), TickOutcome::Counted { remaining_seconds: 2 });
        assert_eq!(session.tick(), TickOutcome::Counted { remaining_seconds: 1 });
        assert_eq!(session.tick(), TickOutcome::Finished);
        assert_eq!(session.state(), SessionState::Finished);

        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.remaining_seconds(), 0);

        // Finished 后 start 不生效
        session.start().unwrap();
        assert_eq!(session.state(), SessionState::Finished);

        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.remaining_seconds(), 3);
    }

    #[test]
    fn test_tick_while_paused_is_ignored() {
        let mut session = BrewSession::new(10);
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.remaining_seconds(), 10);
    }

    #[test]
    fn test_set_target_reseeds_even_while_running() {
        let mut session = BrewSession::new(240);
        session.start().unwrap();
        session.tick();
        session.set_target(300);
        assert_eq!(session.remaining_seconds(), 300);
        assert!(session.is_running());

        session.pause();
        session.set_target(180);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.remaining_seconds(), 180);
    }

    #[test]
    fn test_start_with_target_clamps_remaining() {
        let mut session = BrewSession::new(240);
        session.start().unwrap();
        session.tick();
        session.pause();

        // 时长缩短到 120 秒：剩余 239 ≥ 120 → 收敛到 120
        session.start_with_target(120).unwrap();
        assert_eq!(session.remaining_seconds(), 120);
        assert!(session.is_running());
        session.pause();

        // 时长延长：剩余时间保持不变
        session.start_with_target(600).unwrap();
        assert_eq!(session.remaining_seconds(), 120);
        assert_eq!(session.target_seconds(), 600);
    }
}
