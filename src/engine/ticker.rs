// ==========================================
// 咖啡配比 - 倒计时驱动器
// ==========================================
// 职责: 用 tokio interval 每秒驱动一次 BrewSession::tick
// 资源约束: pause / reset / 倒计时结束 / drop 时必须停止后台任务
// 漏掉的 tick 不补（MissedTickBehavior::Delay）
// ==========================================

use crate::engine::error::EngineResult;
use crate::engine::session::{BrewSession, TickOutcome};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// 默认 tick 周期
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

fn lock_session(session: &Mutex<BrewSession>) -> MutexGuard<'_, BrewSession> {
    // 会话只含普通数值，中毒后数据仍然可用
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

// ==========================================
// SessionTicker - 倒计时驱动器
// ==========================================
/// 持有会话和后台 tick 任务
///
/// 必须在 tokio 运行时内调用 start()
#[derive(Debug)]
pub struct SessionTicker {
    session: Arc<Mutex<BrewSession>>,
    updates: Arc<watch::Sender<BrewSession>>,
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl SessionTicker {
    pub fn new(session: BrewSession) -> Self {
        Self::with_period(session, TICK_PERIOD)
    }

    /// 自定义周期（测试用）
    pub fn with_period(session: BrewSession, period: Duration) -> Self {
        let (updates, _) = watch::channel(session.clone());
        Self {
            session: Arc::new(Mutex::new(session)),
            updates: Arc::new(updates),
            period,
            handle: None,
        }
    }

    /// 当前会话快照
    pub fn snapshot(&self) -> BrewSession {
        lock_session(&self.session).clone()
    }

    /// 订阅会话变化（每次 tick / 状态变化后推送快照）
    pub fn subscribe(&self) -> watch::Receiver<BrewSession> {
        self.updates.subscribe()
    }

    /// 后台任务是否仍在运行
    pub fn is_ticking(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// 开始 / 继续倒计时
    pub fn start(&mut self) -> EngineResult<()> {
        let running = {
            let mut session = lock_session(&self.session);
            session.start()?;
            session.is_running()
        };
        self.publish();

        if running {
            self.spawn_tick_task();
        }
        Ok(())
    }

    /// 暂停（界面上的“停止”）
    pub fn pause(&mut self) {
        self.stop_task();
        lock_session(&self.session).pause();
        self.publish();
    }

    /// 停止并回到目标时长
    pub fn reset(&mut self) {
        self.stop_task();
        lock_session(&self.session).reset();
        self.publish();
    }

    /// 修改目标时长（剩余时间立即重置，运行中继续走）
    pub fn set_target(&mut self, target_seconds: u32) {
        let running = {
            let mut session = lock_session(&self.session);
            session.set_target(target_seconds);
            session.is_running()
        };
        if !running {
            self.stop_task();
        }
        self.publish();
    }

    /// 恢复前把剩余时间收敛到新的目标时长
    pub fn start_with_target(&mut self, target_seconds: u32) -> EngineResult<()> {
        let running = {
            let mut session = lock_session(&self.session);
            session.start_with_target(target_seconds)?;
            session.is_running()
        };
        self.publish();

        if running && !self.is_ticking() {
            self.spawn_tick_task();
        }
        Ok(())
    }

    /// 等待后台任务自然结束（倒计时归零或被停止）
    ///
    /// 等待期间被取消时任务保留，之后仍可 pause / reset
    pub async fn wait_finished(&mut self) -> BrewSession {
        if let Some(handle) = self.handle.as_mut() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "倒计时任务异常退出");
                }
            }
            self.handle = None;
        }
        self.snapshot()
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }

    fn spawn_tick_task(&mut self) {
        self.stop_task();

        let session = Arc::clone(&self.session);
        let updates = Arc::clone(&self.updates);
        let period = self.period;

        self.handle = Some(tokio::spawn(async move {
            // 第一次 tick 在一个周期之后，而不是立即
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let (outcome, snapshot) = {
                    let mut guard = lock_session(&session);
                    let outcome = guard.tick();
                    (outcome, guard.clone())
                };
                updates.send_replace(snapshot);

                match outcome {
                    TickOutcome::Counted { remaining_seconds } => {
                        debug!(remaining_seconds, "tick");
                    }
                    TickOutcome::Finished => {
                        info!("冲煮倒计时结束");
                        break;
                    }
                    TickOutcome::Ignored => break,
                }
            }
        }));
    }

    fn stop_task(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for SessionTicker {
    fn drop(&mut self) {
        self.stop_task();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::SessionState;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let mut ticker = SessionTicker::new(BrewSession::new(240));
        ticker.start().unwrap();

        tokio::time::sleep(Duration::from_millis(5_500)).await;

        let snapshot = ticker.snapshot();
        assert_eq!(snapshot.remaining_seconds(), 235);
        assert_eq!(snapshot.state(), SessionState::Running);
        assert!(ticker.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_background_task() {
        let mut ticker = SessionTicker::new(BrewSession::new(60));
        ticker.start().unwrap();
        tokio::time::sleep(Duration::from_millis(2_500)).await;

        ticker.pause();
        assert!(!ticker.is_ticking());
        let paused_at = ticker.snapshot().remaining_seconds();
        assert_eq!(paused_at, 58);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ticker.snapshot().remaining_seconds(), paused_at);
        assert_eq!(ticker.snapshot().state(), SessionState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_to_finish_and_task_exits() {
        let mut ticker = SessionTicker::new(BrewSession::new(3));
        ticker.start().unwrap();

        let finished = ticker.wait_finished().await;
        assert_eq!(finished.state(), SessionState::Finished);
        assert_eq!(finished.remaining_seconds(), 0);
        assert!(!ticker.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_updates() {
        let mut ticker = SessionTicker::new(BrewSession::new(10));
        let mut rx = ticker.subscribe();
        ticker.start().unwrap();

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().remaining_seconds(), 9);

        ticker.reset();
        assert_eq!(rx.borrow_and_update().remaining_seconds(), 10);
    }
}
