use std::ops::ControlFlow;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, trace, warn};

use super::error::{ErrorPolicy, PayloadError, SessionError};
use crate::domain::{BoundingBox, CanonicalRecord};
use crate::engine::normalize;
use crate::io::{StreamMessage, Upstream, UpstreamError};
use crate::storage::{EventSink, RecordSink};

/// Lifecycle of one upstream connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Streaming,
    /// The upstream answered with an error status
    Errored { status: u16 },
    /// Nothing arrived within the idle timeout
    TimedOut,
    /// The connection ended or the session gave up on it
    Closed,
}

/// Per-session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub messages: u64,
    pub stored: u64,
    pub skipped: u64,
    pub rejected: u64,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub state: SessionState,
    pub stats: SessionStats,
}

impl SessionReport {
    pub fn received_data(&self) -> bool {
        self.stats.messages > 0
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self.state, SessionState::Errored { status: 420 | 429 })
    }
}

/// One connection's worth of streaming: connect, then normalize and store
/// every payload until the upstream errors, idles out or closes.
///
/// Payload-level defects are logged and handed to the [`ErrorPolicy`];
/// connection and storage failures end the session with a [`SessionError`].
pub struct StreamSession<'a, S, L, P>
where
    S: RecordSink,
    L: EventSink,
    P: ErrorPolicy,
{
    store: &'a S,
    logger: &'a L,
    policy: &'a P,
    idle_timeout: Duration,
    state: SessionState,
    stats: SessionStats,
}

impl<'a, S, L, P> StreamSession<'a, S, L, P>
where
    S: RecordSink,
    L: EventSink,
    P: ErrorPolicy,
{
    pub fn new(store: &'a S, logger: &'a L, policy: &'a P, idle_timeout: Duration) -> Self {
        Self {
            store,
            logger,
            policy,
            idle_timeout,
            state: SessionState::Connecting,
            stats: SessionStats::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Run the session to completion.
    ///
    /// Each stored record is also written to `echo` as its dataset line.
    pub async fn run<U, W>(
        &mut self,
        upstream: &U,
        filter: &BoundingBox,
        echo: &mut W,
    ) -> Result<SessionReport, SessionError>
    where
        U: Upstream + ?Sized,
        W: AsyncWrite + Unpin + Send,
    {
        self.state = SessionState::Connecting;
        let mut messages = match upstream.connect(filter).await {
            Ok(messages) => messages,
            Err(UpstreamError::Status { code }) => {
                warn!(status = code, "Upstream rejected the connection");
                self.logger
                    .log(&format!("Error: status code ({code})"))
                    .await;
                return Ok(self.finish(SessionState::Errored { status: code }));
            }
            Err(e) => return Err(e.into()),
        };

        self.state = SessionState::Streaming;
        loop {
            let next = match tokio::time::timeout(self.idle_timeout, messages.next()).await {
                Ok(next) => next,
                Err(_) => {
                    warn!(
                        timeout_ms = self.idle_timeout.as_millis() as u64,
                        "No data within idle timeout"
                    );
                    self.logger.log("Timeout...").await;
                    return Ok(self.finish(SessionState::TimedOut));
                }
            };

            match next {
                // Keep-alive: resets the idle timer, not counted as a message
                Some(Ok(line)) if line.is_empty() => trace!("Keep-alive"),
                Some(Ok(line)) => {
                    self.stats.messages += 1;
                    if self.handle_line(&line, filter, echo).await?.is_break() {
                        return Ok(self.finish(SessionState::Closed));
                    }
                }
                Some(Err(e)) => return Err(e.into()),
                None => {
                    info!("Upstream closed the stream");
                    return Ok(self.finish(SessionState::Closed));
                }
            }
        }
    }

    fn finish(&mut self, state: SessionState) -> SessionReport {
        self.state = state;
        SessionReport {
            state,
            stats: self.stats,
        }
    }

    async fn handle_line<W>(
        &mut self,
        line: &str,
        filter: &BoundingBox,
        echo: &mut W,
    ) -> Result<ControlFlow<()>, SessionError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let message = match StreamMessage::parse(line) {
            Ok(message) => message,
            Err(e) => return Ok(self.reject(e.into()).await),
        };

        match message {
            StreamMessage::Post(post) => match normalize(&post) {
                Ok(Some(record)) => {
                    // Matched on place rather than on the exact point; kept as delivered
                    if !filter.contains(&record.coordinates) {
                        debug!(
                            post_id = record.post_id,
                            coordinates = %record.coordinates,
                            "Point outside filter box"
                        );
                    }
                    self.store_record(record.sanitized(), echo).await?
                }
                Ok(None) => self.stats.skipped += 1,
                Err(e) => return Ok(self.reject(e.into()).await),
            },
            StreamMessage::Unlocated { id } => {
                trace!(post_id = ?id, "Skipping post without precise coordinates");
                self.stats.skipped += 1;
            }
            StreamMessage::Delete | StreamMessage::Other => self.stats.skipped += 1,
            StreamMessage::Limit { undelivered } => {
                warn!(undelivered, "Upstream withheld matching posts");
            }
            StreamMessage::Warning { code, message } => {
                warn!(%code, %message, "Upstream warning");
                self.logger
                    .log(&format!("Warning ({code}): {message}"))
                    .await;
            }
            StreamMessage::Disconnect { code, reason } => {
                warn!(code, %reason, "Upstream disconnect notice");
                self.logger
                    .log(&format!("Disconnect ({code}): {reason}"))
                    .await;
                return Ok(ControlFlow::Break(()));
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    async fn store_record<W>(
        &mut self,
        record: CanonicalRecord,
        echo: &mut W,
    ) -> Result<(), SessionError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.store.ensure_header().await?;
        self.store.append(&record).await?;
        self.stats.stored += 1;
        debug!(post_id = record.post_id, "Stored record");

        // Operator echo is best-effort
        let line = record.to_line();
        if let Err(e) = echo.write_all(line.as_bytes()).await {
            debug!(error = %e, "Failed to echo record");
        } else if let Err(e) = echo.flush().await {
            debug!(error = %e, "Failed to flush echo");
        }
        Ok(())
    }

    async fn reject(&mut self, error: PayloadError) -> ControlFlow<()> {
        self.stats.rejected += 1;
        warn!(error = %error, "Rejected payload");
        self.logger
            .log(&format!("Rejected payload: {error}"))
            .await;

        if self.policy.handle_payload_error(&error) {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    }
}
