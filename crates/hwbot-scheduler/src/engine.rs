//! Poll engine — drives fetch → validate → describe → notify on a fixed
//! interval and de-duplicates what reaches the chat.

use hwbot_channels::Notifier;
use hwbot_core::config::BotConfig;
use hwbot_core::error::{ErrorKind, HomeworkBotError, Result};
use hwbot_core::traits::HomeworkSource;
use hwbot_practicum::{describe, validate};
use std::time::Duration;

use crate::state::PollState;

pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// What a single cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The API reported no homework updates.
    NoHomeworks,
    /// The latest status text was already delivered.
    Unchanged,
    /// A status text was sent; `delivered` tells whether the channel took it.
    Notified { delivered: bool },
    /// Fetch, validation or description failed. `reported` is true when a
    /// failure text was delivered to the chat this cycle.
    Failed { kind: ErrorKind, reported: bool },
}

/// Status text to send, plus the `from_date` to use once it is handled.
struct Polled {
    description: Option<String>,
    next_from_date: Option<i64>,
}

pub struct PollEngine {
    source: Box<dyn HomeworkSource>,
    notifier: Notifier,
    retry_period: Duration,
    advance_from_date: bool,
    state: PollState,
}

impl PollEngine {
    pub fn new(
        source: Box<dyn HomeworkSource>,
        notifier: Notifier,
        config: &BotConfig,
        from_date: i64,
    ) -> Self {
        Self {
            source,
            notifier,
            retry_period: config.retry_period(),
            advance_from_date: config.advance_from_date,
            state: PollState::starting_at(from_date),
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn retry_period(&self) -> Duration {
        self.retry_period
    }

    /// Poll forever, sleeping `retry_period` after every cycle whatever its
    /// outcome.
    pub async fn run(&mut self) {
        tracing::info!(
            "Polling {} every {}s (from_date={})",
            self.source.name(),
            self.retry_period.as_secs(),
            self.state.from_date
        );
        loop {
            let outcome = self.run_cycle().await;
            tracing::debug!("Cycle finished: {outcome:?}");
            tokio::time::sleep(self.retry_period).await;
        }
    }

    /// Execute one cycle without sleeping.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let polled = match self.poll().await {
            Ok(polled) => polled,
            Err(e) => return self.report_failure(e).await,
        };

        let outcome = match polled.description {
            None => {
                tracing::debug!("No homework updates since {}", self.state.from_date);
                CycleOutcome::NoHomeworks
            }
            Some(text) if self.state.last_delivered_message.as_deref() == Some(text.as_str()) => {
                tracing::debug!("No new homework statuses");
                CycleOutcome::Unchanged
            }
            Some(text) => {
                let delivery = self.notifier.notify(&text).await;
                if !delivery.delivered {
                    // Keep from_date so the same record comes back next cycle.
                    return CycleOutcome::Notified { delivered: false };
                }
                self.state.last_delivered_message = Some(delivery.message);
                CycleOutcome::Notified { delivered: true }
            }
        };

        if let Some(next) = polled.next_from_date {
            self.state.from_date = next;
        }
        outcome
    }

    async fn poll(&self) -> Result<Polled> {
        let body = self.source.fetch(self.state.from_date).await?;
        let report = validate(body)?;

        let description = match report.homeworks.first() {
            Some(latest) => {
                tracing::debug!("Latest homework record: {}", latest.as_value());
                Some(describe(latest)?)
            }
            None => None,
        };
        let next_from_date = report.current_date.filter(|_| self.advance_from_date);

        Ok(Polled { description, next_from_date })
    }

    /// The single error boundary: every failure kind is logged, then sent to
    /// the chat unless the same text was the last one delivered.
    async fn report_failure(&mut self, error: HomeworkBotError) -> CycleOutcome {
        let kind = error.kind();
        let message = format!("{FAILURE_PREFIX}: {error}");
        tracing::error!(%kind, "{message}");

        if self.state.last_reported_error.as_deref() == Some(message.as_str()) {
            return CycleOutcome::Failed { kind, reported: false };
        }

        let delivery = self.notifier.notify(&message).await;
        if delivery.delivered {
            self.state.last_reported_error = Some(delivery.message);
        }
        CycleOutcome::Failed { kind, reported: delivery.delivered }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hwbot_core::traits::Channel;
    use hwbot_core::types::OutgoingMessage;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    const APPROVED_PROJ1: &str =
        "Изменился статус проверки работы \"proj1\". Работа проверена: ревьюеру всё понравилось. Ура!";

    #[derive(Clone)]
    enum Reply {
        Body(Value),
        Status(u16),
        Unreachable,
    }

    /// Replays scripted replies; the last one repeats forever.
    struct ScriptedSource {
        replies: Mutex<VecDeque<Reply>>,
        requested: Arc<Mutex<Vec<i64>>>,
    }

    #[async_trait]
    impl HomeworkSource for ScriptedSource {
        fn name(&self) -> &str { "scripted" }

        async fn fetch(&self, from_date: i64) -> Result<Value> {
            self.requested.lock().unwrap().push(from_date);
            let mut replies = self.replies.lock().unwrap();
            let reply = if replies.len() > 1 {
                replies.pop_front().unwrap()
            } else {
                replies.front().cloned().unwrap()
            };
            match reply {
                Reply::Body(body) => Ok(body),
                Reply::Status(code) => Err(HomeworkBotError::UnexpectedStatus(code)),
                Reply::Unreachable => Err(HomeworkBotError::transport("connection reset")),
            }
        }
    }

    struct RecordingChannel {
        sent: Arc<Mutex<Vec<String>>>,
        failing: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Channel for RecordingChannel {
        fn name(&self) -> &str { "recording" }

        async fn send(&self, message: OutgoingMessage) -> Result<()> {
            self.sent.lock().unwrap().push(message.content);
            if self.failing.load(Ordering::SeqCst) {
                return Err(HomeworkBotError::channel("Bad Gateway"));
            }
            Ok(())
        }
    }

    struct Harness {
        engine: PollEngine,
        sent: Arc<Mutex<Vec<String>>>,
        requested: Arc<Mutex<Vec<i64>>>,
        failing: Arc<AtomicBool>,
    }

    impl Harness {
        fn new(replies: Vec<Reply>, config: BotConfig) -> Self {
            let sent = Arc::new(Mutex::new(vec![]));
            let requested = Arc::new(Mutex::new(vec![]));
            let failing = Arc::new(AtomicBool::new(false));
            let source = ScriptedSource {
                replies: Mutex::new(replies.into()),
                requested: requested.clone(),
            };
            let channel = RecordingChannel { sent: sent.clone(), failing: failing.clone() };
            let engine = PollEngine::new(
                Box::new(source),
                Notifier::new(Box::new(channel), "42"),
                &config,
                500,
            );
            Self { engine, sent, requested, failing }
        }

        fn with_replies(replies: Vec<Reply>) -> Self {
            Self::new(replies, BotConfig::default())
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }

        fn requested(&self) -> Vec<i64> {
            self.requested.lock().unwrap().clone()
        }
    }

    fn statuses(homeworks: Value, current_date: i64) -> Reply {
        Reply::Body(json!({ "homeworks": homeworks, "current_date": current_date }))
    }

    #[tokio::test]
    async fn test_new_status_is_notified() {
        let mut h = Harness::with_replies(vec![statuses(
            json!([{ "homework_name": "proj1", "status": "approved" }]),
            1000,
        )]);

        let outcome = h.engine.run_cycle().await;
        assert_eq!(outcome, CycleOutcome::Notified { delivered: true });
        assert_eq!(h.sent(), vec![APPROVED_PROJ1]);
        assert_eq!(h.engine.state().last_delivered_message.as_deref(), Some(APPROVED_PROJ1));
    }

    #[tokio::test]
    async fn test_identical_status_is_sent_once() {
        let mut h = Harness::with_replies(vec![statuses(
            json!([{ "homework_name": "proj1", "status": "approved" }]),
            1000,
        )]);

        h.engine.run_cycle().await;
        assert_eq!(h.engine.run_cycle().await, CycleOutcome::Unchanged);
        assert_eq!(h.engine.run_cycle().await, CycleOutcome::Unchanged);
        assert_eq!(h.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_status_change_is_notified_again() {
        let mut h = Harness::with_replies(vec![
            statuses(json!([{ "homework_name": "proj1", "status": "reviewing" }]), 1000),
            statuses(json!([{ "homework_name": "proj1", "status": "approved" }]), 2000),
        ]);

        h.engine.run_cycle().await;
        h.engine.run_cycle().await;
        assert_eq!(
            h.sent(),
            vec![
                "Изменился статус проверки работы \"proj1\". Работа взята на проверку ревьюером.".to_string(),
                APPROVED_PROJ1.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_only_first_record_is_described() {
        let mut h = Harness::with_replies(vec![statuses(
            json!([
                { "homework_name": "proj1", "status": "approved" },
                { "homework_name": "old", "status": "lost_in_review" },
            ]),
            1000,
        )]);

        assert_eq!(h.engine.run_cycle().await, CycleOutcome::Notified { delivered: true });
        assert_eq!(h.sent(), vec![APPROVED_PROJ1]);
    }

    #[tokio::test]
    async fn test_malformed_older_record_does_not_block_latest() {
        let mut h = Harness::with_replies(vec![statuses(
            json!([{ "homework_name": "proj1", "status": "approved" }, "junk"]),
            1000,
        )]);

        assert_eq!(h.engine.run_cycle().await, CycleOutcome::Notified { delivered: true });
        assert_eq!(h.sent(), vec![APPROVED_PROJ1]);
        assert_eq!(h.engine.state().last_reported_error, None);
    }

    #[tokio::test]
    async fn test_non_string_status_is_content_failure() {
        let mut h = Harness::with_replies(vec![statuses(
            json!([{ "homework_name": "proj1", "status": 3 }]),
            1000,
        )]);

        let outcome = h.engine.run_cycle().await;
        assert_eq!(outcome, CycleOutcome::Failed { kind: ErrorKind::Content, reported: true });
        assert_eq!(h.sent(), vec!["Сбой в работе программы: Unknown homework status: 3"]);
    }

    #[tokio::test]
    async fn test_empty_homeworks_is_quiet() {
        let mut h = Harness::with_replies(vec![statuses(json!([]), 1000)]);

        assert_eq!(h.engine.run_cycle().await, CycleOutcome::NoHomeworks);
        assert!(h.sent().is_empty());
        assert_eq!(h.engine.state().last_reported_error, None);
    }

    #[tokio::test]
    async fn test_schema_error_reported_once() {
        let mut h = Harness::with_replies(vec![Reply::Body(json!({ "status": "ok" }))]);

        let first = h.engine.run_cycle().await;
        assert_eq!(first, CycleOutcome::Failed { kind: ErrorKind::Protocol, reported: true });
        let second = h.engine.run_cycle().await;
        assert_eq!(second, CycleOutcome::Failed { kind: ErrorKind::Protocol, reported: false });

        let sent = h.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Сбой в работе программы: "));
        assert!(sent[0].contains("homeworks"));
    }

    #[tokio::test]
    async fn test_unknown_status_is_content_failure() {
        let mut h = Harness::with_replies(vec![statuses(
            json!([{ "homework_name": "proj1", "status": "on_hold" }]),
            1000,
        )]);

        let outcome = h.engine.run_cycle().await;
        assert_eq!(outcome, CycleOutcome::Failed { kind: ErrorKind::Content, reported: true });
        assert!(h.sent()[0].contains("on_hold"));
        assert_eq!(h.engine.state().last_delivered_message, None);
    }

    #[tokio::test]
    async fn test_different_errors_are_each_reported() {
        let mut h = Harness::with_replies(vec![
            Reply::Unreachable,
            Reply::Status(500),
            Reply::Unreachable,
        ]);

        h.engine.run_cycle().await;
        h.engine.run_cycle().await;
        h.engine.run_cycle().await;
        assert_eq!(h.sent().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_delivery_is_retried_next_cycle() {
        let mut h = Harness::with_replies(vec![statuses(
            json!([{ "homework_name": "proj1", "status": "approved" }]),
            1000,
        )]);
        h.failing.store(true, Ordering::SeqCst);

        assert_eq!(h.engine.run_cycle().await, CycleOutcome::Notified { delivered: false });
        assert_eq!(h.engine.state().last_delivered_message, None);
        assert_eq!(h.engine.state().from_date, 500);

        h.failing.store(false, Ordering::SeqCst);
        assert_eq!(h.engine.run_cycle().await, CycleOutcome::Notified { delivered: true });
        assert_eq!(h.sent(), vec![APPROVED_PROJ1, APPROVED_PROJ1]);
        assert_eq!(h.engine.state().from_date, 1000);
    }

    #[tokio::test]
    async fn test_failed_error_report_is_retried() {
        let mut h = Harness::with_replies(vec![Reply::Status(503)]);
        h.failing.store(true, Ordering::SeqCst);

        let outcome = h.engine.run_cycle().await;
        assert_eq!(outcome, CycleOutcome::Failed { kind: ErrorKind::Protocol, reported: false });
        assert_eq!(h.engine.state().last_reported_error, None);

        h.failing.store(false, Ordering::SeqCst);
        let outcome = h.engine.run_cycle().await;
        assert_eq!(outcome, CycleOutcome::Failed { kind: ErrorKind::Protocol, reported: true });
        assert_eq!(h.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_from_date_advances_to_current_date() {
        let mut h = Harness::with_replies(vec![
            statuses(json!([]), 1000),
            statuses(json!([]), 1600),
            Reply::Status(502),
        ]);

        h.engine.run_cycle().await;
        h.engine.run_cycle().await;
        h.engine.run_cycle().await;
        h.engine.run_cycle().await;
        assert_eq!(h.requested(), vec![500, 1000, 1600, 1600]);
    }

    #[tokio::test]
    async fn test_from_date_fixed_when_advancing_disabled() {
        let config = BotConfig { advance_from_date: false, ..BotConfig::default() };
        let mut h = Harness::new(vec![statuses(json!([]), 1000)], config);

        h.engine.run_cycle().await;
        h.engine.run_cycle().await;
        assert_eq!(h.requested(), vec![500, 500]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sleeps_between_failing_cycles() {
        let mut h = Harness::with_replies(vec![Reply::Status(503)]);
        assert_eq!(h.engine.retry_period(), Duration::from_secs(600));

        let result = tokio::time::timeout(Duration::from_secs(1250), h.engine.run()).await;
        assert!(result.is_err(), "run never returns");

        // Cycles at t=0, 600 and 1200.
        assert_eq!(h.requested().len(), 3);
        let sent = h.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("503"));
    }
}
