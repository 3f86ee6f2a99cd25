use std::time::Duration;

use tokio::io::AsyncWrite;
use tracing::{error, info};

use super::backoff::{ReconnectConfig, ReconnectPolicy};
use super::error::{ErrorPolicy, SkipErrors};
use super::session::{SessionReport, StreamSession};
use crate::domain::BoundingBox;
use crate::io::{Parameters, Upstream};
use crate::storage::{EventSink, RecordSink};

/// Event log entry written whenever a session fails outright
pub const CONNECTION_ERROR: &str = "Connection error";

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub filter: BoundingBox,
    pub idle_timeout: Duration,
    pub reconnect: ReconnectConfig,
}

impl SupervisorConfig {
    pub fn from_parameters(params: &Parameters) -> Self {
        Self {
            filter: params.bounding_box,
            idle_timeout: params.timeout,
            reconnect: ReconnectConfig::with_initial_delay(params.retry_delay),
        }
    }
}

/// Keeps a stream session alive forever, reconnecting after every end
pub struct Supervisor<U, S, L, P = SkipErrors>
where
    U: Upstream,
    S: RecordSink,
    L: EventSink,
    P: ErrorPolicy,
{
    upstream: U,
    store: S,
    logger: L,
    policy: P,
    config: SupervisorConfig,
    reconnect: ReconnectPolicy,
    sessions: u64,
}

impl<U, S, L> Supervisor<U, S, L, SkipErrors>
where
    U: Upstream,
    S: RecordSink,
    L: EventSink,
{
    pub fn new(upstream: U, store: S, logger: L, config: SupervisorConfig) -> Self {
        Self::with_policy(upstream, store, logger, SkipErrors, config)
    }
}

impl<U, S, L, P> Supervisor<U, S, L, P>
where
    U: Upstream,
    S: RecordSink,
    L: EventSink,
    P: ErrorPolicy,
{
    pub fn with_policy(upstream: U, store: S, logger: L, policy: P, config: SupervisorConfig) -> Self {
        let reconnect = ReconnectPolicy::new(config.reconnect.clone());
        Self {
            upstream,
            store,
            logger,
            policy,
            config,
            reconnect,
            sessions: 0,
        }
    }

    /// Number of sessions started so far
    pub fn sessions(&self) -> u64 {
        self.sessions
    }

    /// Run one session, then wait out the reconnect delay.
    ///
    /// Returns the session report, or `None` when the session failed.
    pub async fn run_once<W>(&mut self, echo: &mut W) -> Option<SessionReport>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.sessions += 1;
        info!(session = self.sessions, "Connecting to upstream");

        let mut session = StreamSession::new(
            &self.store,
            &self.logger,
            &self.policy,
            self.config.idle_timeout,
        );
        let outcome = session.run(&self.upstream, &self.config.filter, echo).await;

        let report = match outcome {
            Ok(report) => {
                info!(
                    session = self.sessions,
                    state = ?report.state,
                    messages = report.stats.messages,
                    stored = report.stats.stored,
                    skipped = report.stats.skipped,
                    rejected = report.stats.rejected,
                    "Session ended"
                );
                if report.received_data() {
                    self.reconnect.reset();
                }
                Some(report)
            }
            Err(e) => {
                error!(session = self.sessions, error = %e, "Session failed");
                self.logger.log(CONNECTION_ERROR).await;
                if session.stats().messages > 0 {
                    self.reconnect.reset();
                }
                None
            }
        };

        let rate_limited = report.is_some_and(|r| r.is_rate_limited());
        let delay = self.reconnect.next_delay(rate_limited);
        info!(
            attempt = self.reconnect.attempt(),
            delay_ms = delay.as_millis() as u64,
            "Reconnecting after delay"
        );
        tokio::time::sleep(delay).await;

        report
    }

    /// Collect until the process is stopped from outside; never returns
    pub async fn run<W>(mut self, mut echo: W)
    where
        W: AsyncWrite + Unpin + Send,
    {
        loop {
            self.run_once(&mut echo).await;
        }
    }
}
