//! Circuit breaker for the customer lookup.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: testing if the dependency recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures >= failure_threshold
//! Open → Half-Open: after open_duration
//! Half-Open → Closed: probe call succeeds
//! Half-Open → Open: probe call fails
//! ```
//!
//! # Design Decisions
//! - Fail fast in Open state (no waiting for timeout)
//! - Single probe in Half-Open (prevents hammering a recovering service)
//! - Lock-free: all state lives in atomics

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::CircuitBreakerConfig;
use crate::observability::metrics;

/// Breaker state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed = 0,
    Open = 1,
    HalfOpen = 2,
}

impl From<u8> for CircuitState {
    fn from(val: u8) -> Self {
        match val {
            1 => CircuitState::Open,
            2 => CircuitState::HalfOpen,
            _ => CircuitState::Closed,
        }
    }
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        }
    }
}

/// Why a guarded call did not produce a value.
#[derive(Debug, Error)]
pub enum CallFailure<E> {
    /// The circuit was open; the primary call was never made.
    #[error("circuit '{0}' is open")]
    Rejected(String),

    /// The primary call ran and failed.
    #[error("{0}")]
    Failed(E),
}

/// Call-or-fallback guard around a remote dependency.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    enabled: bool,
    failure_threshold: u32,
    open_duration: Duration,
    epoch: Instant,

    state: AtomicU8,
    consecutive_failures: AtomicU32,
    /// Milliseconds since `epoch` at which the circuit last opened.
    opened_at_ms: AtomicU64,
    probe_in_flight: AtomicBool,
}

impl CircuitBreaker {
    pub fn new(config: &CircuitBreakerConfig) -> Self {
        metrics::record_breaker_state(&config.name, CircuitState::Closed as u8);
        Self {
            name: config.name.clone(),
            enabled: config.enabled,
            failure_threshold: config.failure_threshold.max(1),
            open_duration: Duration::from_millis(config.open_duration_ms),
            epoch: Instant::now(),
            state: AtomicU8::new(CircuitState::Closed as u8),
            consecutive_failures: AtomicU32::new(0),
            opened_at_ms: AtomicU64::new(0),
            probe_in_flight: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> CircuitState {
        CircuitState::from(self.state.load(Ordering::Acquire))
    }

    /// Run `primary` unless the circuit rejects it, recording the outcome.
    pub async fn call<T, E, F, Fut>(&self, primary: F) -> Result<T, CallFailure<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(permit) = self.try_acquire() else {
            tracing::debug!(breaker = %self.name, "Call rejected, circuit open");
            return Err(CallFailure::Rejected(self.name.clone()));
        };

        match primary().await {
            Ok(value) => {
                permit.succeed();
                Ok(value)
            }
            Err(e) => {
                permit.fail();
                Err(CallFailure::Failed(e))
            }
        }
    }

    /// Run `primary`; on any failure, including rejection, return what
    /// `fallback` produces from the failure instead.
    pub async fn call_or_fallback<T, E, X, P, PFut, F, FFut>(
        &self,
        primary: P,
        fallback: F,
    ) -> Result<T, X>
    where
        P: FnOnce() -> PFut,
        PFut: Future<Output = Result<T, E>>,
        F: FnOnce(CallFailure<E>) -> FFut,
        FFut: Future<Output = Result<T, X>>,
    {
        match self.call(primary).await {
            Ok(value) => Ok(value),
            Err(failure) => fallback(failure).await,
        }
    }

    fn try_acquire(&self) -> Option<Permit<'_>> {
        if !self.enabled {
            return Some(Permit { breaker: self, probe: false });
        }

        match self.state() {
            CircuitState::Closed => Some(Permit { breaker: self, probe: false }),
            CircuitState::Open => {
                if self.elapsed_since_open() < self.open_duration {
                    return None;
                }
                if self
                    .state
                    .compare_exchange(
                        CircuitState::Open as u8,
                        CircuitState::HalfOpen as u8,
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    )
                    .is_ok()
                {
                    tracing::info!(breaker = %self.name, "Circuit half-open, admitting probe");
                    metrics::record_breaker_state(&self.name, CircuitState::HalfOpen as u8);
                }
                self.try_probe()
            }
            CircuitState::HalfOpen => self.try_probe(),
        }
    }

    fn try_probe(&self) -> Option<Permit<'_>> {
        self.probe_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Permit { breaker: self, probe: true })
    }

    fn elapsed_since_open(&self) -> Duration {
        let now_ms = self.epoch.elapsed().as_millis() as u64;
        Duration::from_millis(now_ms.saturating_sub(self.opened_at_ms.load(Ordering::Acquire)))
    }

    fn on_success(&self, probe: bool) {
        if !probe {
            // A call admitted while closed must not close a circuit that
            // opened while it was in flight.
            if self.state() == CircuitState::Closed {
                self.consecutive_failures.store(0, Ordering::Release);
            }
            return;
        }

        self.consecutive_failures.store(0, Ordering::Release);
        if self
            .state
            .compare_exchange(
                CircuitState::HalfOpen as u8,
                CircuitState::Closed as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
        {
            tracing::info!(breaker = %self.name, "Circuit closed");
            metrics::record_breaker_state(&self.name, CircuitState::Closed as u8);
        }
    }

    fn on_failure(&self, probe: bool) {
        if probe {
            self.trip();
            return;
        }

        let failures = self.consecutive_failures.fetch_add(1, Ordering::AcqRel) + 1;
        if self.enabled && failures >= self.failure_threshold && self.state() == CircuitState::Closed {
            self.trip();
        }
    }

    fn trip(&self) {
        self.opened_at_ms
            .store(self.epoch.elapsed().as_millis() as u64, Ordering::Release);
        let previous = self.state.swap(CircuitState::Open as u8, Ordering::AcqRel);
        if previous != CircuitState::Open as u8 {
            tracing::warn!(
                breaker = %self.name,
                failures = self.consecutive_failures.load(Ordering::Acquire),
                open_for = ?self.open_duration,
                "Circuit opened"
            );
            metrics::record_breaker_state(&self.name, CircuitState::Open as u8);
        }
    }
}

/// Admission ticket for one call. Releases the probe slot on drop, so a
/// cancelled probe leaves the circuit half-open for the next caller.
struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    probe: bool,
}

impl Permit<'_> {
    fn succeed(self) {
        self.breaker.on_success(self.probe);
    }

    fn fail(self) {
        self.breaker.on_failure(self.probe);
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if self.probe {
            self.breaker.probe_in_flight.store(false, Ordering::Release);
        }
    }
}
