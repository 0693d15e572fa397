//! 回调到阻塞的会合原语
//!
//! 每次阻塞调用的流程：`arm()` 清除完成信号与错误闩并领取凭据，
//! 把 `on_success`/`on_failure` 两个回调交给异步请求，然后
//! `wait()` 在凭据上带超时阻塞。回调在会话管理的线程上到达，
//! 所以信号必须跨线程可见——这里用互斥量加条件变量，而不是
//! 裸标志位。
//!
//! 没有取消原语：等待方超时后请求仍在途，迟到的回调必须被丢弃
//! 而不是污染下一次调用。凭据携带代号计数器，`arm()` 与超时都会
//! 推进代号，过期代号的通知一律忽略；结果格至多写入一次，重复
//! 通知同样被忽略。

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use ned2_api::{CommandResult, DoneCallback};

/// 一次阻塞调用的判定
#[derive(Debug)]
pub enum WaitOutcome {
    /// 成功回调在超时前到达
    Success(CommandResult),
    /// 失败回调在超时前到达（错误闩路径）；会话仍可用
    Failure(CommandResult),
    /// 两个回调都没有在超时内到达
    TimedOut,
}

enum Outcome {
    Success(CommandResult),
    Failure(CommandResult),
}

struct GateState {
    /// 当前凭据代号；不匹配的完成通知被丢弃
    seq: u64,
    /// 结果格，每个凭据至多写入一次
    outcome: Option<Outcome>,
}

struct GateInner {
    state: Mutex<GateState>,
    completed: Condvar,
}

/// 一次在途请求的等待凭据
///
/// `wait` 按值消费，同一请求不可能等待两次。
#[derive(Debug)]
pub struct Ticket {
    seq: u64,
}

/// 会合门
///
/// 门面为 setup 与 motion 各持一个实例；多个门面互不干扰。
pub struct CallGate {
    inner: Arc<GateInner>,
}

impl CallGate {
    pub fn new() -> Self {
        CallGate {
            inner: Arc::new(GateInner {
                state: Mutex::new(GateState {
                    seq: 0,
                    outcome: None,
                }),
                completed: Condvar::new(),
            }),
        }
    }

    /// 开始一次新调用：清除信号与错误闩，作废所有旧回调
    pub fn arm(&self) -> Ticket {
        let mut state = self.inner.state.lock();
        state.seq = state.seq.wrapping_add(1);
        state.outcome = None;
        Ticket { seq: state.seq }
    }

    /// 成功回调：记录结果并唤醒等待方
    pub fn on_success(&self, ticket: &Ticket) -> DoneCallback {
        let inner = self.inner.clone();
        let seq = ticket.seq;
        Box::new(move |result| complete(&inner, seq, Outcome::Success(result)))
    }

    /// 失败回调：置错误闩、记录结果并唤醒等待方
    pub fn on_failure(&self, ticket: &Ticket) -> DoneCallback {
        let inner = self.inner.clone();
        let seq = ticket.seq;
        Box::new(move |result| complete(&inner, seq, Outcome::Failure(result)))
    }

    /// 带超时阻塞，直到本次调用的回调到达
    ///
    /// 超时即作废凭据：之后到达的回调被丢弃，下一次 `arm()`
    /// 看不到任何陈旧状态。
    pub fn wait(&self, ticket: Ticket, timeout: Duration) -> WaitOutcome {
        let deadline = Instant::now() + timeout;
        let mut state = self.inner.state.lock();
        loop {
            if state.seq == ticket.seq {
                if let Some(outcome) = state.outcome.take() {
                    return outcome.into();
                }
            } else {
                // arm() 被并发调用属于使用错误；当作超时退出
                return WaitOutcome::TimedOut;
            }

            if self.inner.completed.wait_until(&mut state, deadline).timed_out() {
                // 截止瞬间到达的结果仍然算数
                if let Some(outcome) = state.outcome.take() {
                    return outcome.into();
                }
                state.seq = state.seq.wrapping_add(1);
                return WaitOutcome::TimedOut;
            }
        }
    }
}

impl Default for CallGate {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Outcome> for WaitOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success(result) => WaitOutcome::Success(result),
            Outcome::Failure(result) => WaitOutcome::Failure(result),
        }
    }
}

fn complete(inner: &GateInner, seq: u64, outcome: Outcome) {
    let mut state = inner.state.lock();
    if state.seq != seq {
        trace!(seq, current = state.seq, "late completion discarded");
        return;
    }
    if state.outcome.is_some() {
        trace!(seq, "duplicate completion discarded");
        return;
    }
    state.outcome = Some(outcome);
    inner.completed.notify_all();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn success(msg: &str) -> CommandResult {
        CommandResult::success(msg)
    }

    #[test]
    fn success_before_timeout() {
        let gate = CallGate::new();
        let ticket = gate.arm();
        let on_success = gate.on_success(&ticket);

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            on_success(success("done"));
        });

        match gate.wait(ticket, Duration::from_secs(5)) {
            WaitOutcome::Success(result) => assert_eq!(result.message, "done"),
            other => panic!("expected success, got {other:?}"),
        }
        handle.join().unwrap();
    }

    #[test]
    fn failure_latch_before_timeout() {
        let gate = CallGate::new();
        let ticket = gate.arm();
        let on_failure = gate.on_failure(&ticket);

        let handle = thread::spawn(move || {
            on_failure(CommandResult::failure(-10, "refused"));
        });

        match gate.wait(ticket, Duration::from_secs(5)) {
            WaitOutcome::Failure(result) => {
                assert!(!result.is_success());
                assert_eq!(result.message, "refused");
            },
            other => panic!("expected failure, got {other:?}"),
        }
        handle.join().unwrap();
    }

    #[test]
    fn timeout_when_no_callback_fires() {
        let gate = CallGate::new();
        let ticket = gate.arm();
        // 回调被持有但从不调用
        let _on_success = gate.on_success(&ticket);

        let start = Instant::now();
        let outcome = gate.wait(ticket, Duration::from_millis(50));
        assert!(matches!(outcome, WaitOutcome::TimedOut));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn late_callback_after_timeout_is_discarded() {
        let gate = CallGate::new();
        let ticket = gate.arm();
        let on_success = gate.on_success(&ticket);

        let outcome = gate.wait(ticket, Duration::from_millis(10));
        assert!(matches!(outcome, WaitOutcome::TimedOut));

        // 请求方早已放弃；迟到的通知不得影响下一次调用
        on_success(success("too late"));

        let ticket = gate.arm();
        let outcome = gate.wait(ticket, Duration::from_millis(10));
        assert!(matches!(outcome, WaitOutcome::TimedOut));
    }

    #[test]
    fn duplicate_completion_is_discarded() {
        let gate = CallGate::new();
        let ticket = gate.arm();
        let first = gate.on_success(&ticket);
        let second = gate.on_failure(&ticket);

        first(success("first"));
        second(CommandResult::failure(-1, "second"));

        match gate.wait(ticket, Duration::from_secs(1)) {
            WaitOutcome::Success(result) => assert_eq!(result.message, "first"),
            other => panic!("expected the first completion, got {other:?}"),
        }
    }

    #[test]
    fn rearming_invalidates_previous_callbacks() {
        let gate = CallGate::new();
        let old_ticket = gate.arm();
        let stale = gate.on_success(&old_ticket);
        drop(old_ticket);

        let ticket = gate.arm();
        stale(success("stale"));

        let outcome = gate.wait(ticket, Duration::from_millis(10));
        assert!(matches!(outcome, WaitOutcome::TimedOut));
    }

    #[test]
    fn gates_are_independent_instances() {
        let setup = CallGate::new();
        let motion = CallGate::new();

        let setup_ticket = setup.arm();
        let motion_ticket = motion.arm();
        let on_setup = setup.on_success(&setup_ticket);
        on_setup(success("setup done"));

        // setup 门的完成不影响 motion 门
        let outcome = motion.wait(motion_ticket, Duration::from_millis(10));
        assert!(matches!(outcome, WaitOutcome::TimedOut));
        let outcome = setup.wait(setup_ticket, Duration::from_millis(10));
        assert!(matches!(outcome, WaitOutcome::Success(_)));
    }
}
