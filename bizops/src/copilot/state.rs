//! Per-surface request lifecycle
//!
//! `Idle -> Pending -> {Succeeded | Failed} -> Idle`. One outstanding request
//! per surface; the surface owns its `RequestState` and drives it around each
//! component call.

use std::fmt::Display;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("A request is already in flight")]
    AlreadyPending,

    #[error("No request is in flight")]
    NotPending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState<T> {
    Idle,
    Pending,
    Succeeded(T),
    /// Holds the user-presentable failure message
    Failed(String),
}

// Manual impl: the derive would require `T: Default`
impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> RequestState<T> {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Enter Pending
    ///
    /// A finished result that was never taken is discarded.
    pub fn begin(&mut self) -> Result<(), StateError> {
        if self.is_pending() {
            debug!("RequestState::begin: rejected, already pending");
            return Err(StateError::AlreadyPending);
        }
        *self = Self::Pending;
        Ok(())
    }

    /// Record the outcome of the in-flight request
    pub fn complete<E: Display>(&mut self, outcome: Result<T, E>) -> Result<(), StateError> {
        if !self.is_pending() {
            debug!("RequestState::complete: rejected, not pending");
            return Err(StateError::NotPending);
        }
        *self = match outcome {
            Ok(value) => Self::Succeeded(value),
            Err(e) => Self::Failed(e.to_string()),
        };
        Ok(())
    }

    /// Take a finished outcome and return to Idle
    ///
    /// Returns `None` and leaves the state untouched while Idle or Pending.
    pub fn take(&mut self) -> Option<Result<T, String>> {
        match std::mem::take(self) {
            Self::Succeeded(value) => Some(Ok(value)),
            Self::Failed(message) => Some(Err(message)),
            other => {
                *self = other;
                None
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
