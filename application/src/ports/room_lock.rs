//! Room lock coordinator port
//!
//! Grants exclusive, time-bounded leases per room: at most one active
//! orchestration run per room at any instant, unlimited concurrency across
//! distinct rooms. A lease that expires without renewal (crashed worker)
//! makes the room eligible for another consumer, which resumes from the
//! last checkpoint.

use async_trait::async_trait;
use boardroom_domain::RoomId;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur at the lock boundary
#[derive(Error, Debug)]
pub enum LockError {
    #[error("Lock coordinator unavailable: {0}")]
    Unavailable(String),
}

/// An exclusive claim on a room, valid until its deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLease {
    room: RoomId,
    holder: String,
    token: String,
    ttl: Duration,
}

impl RoomLease {
    pub fn new(
        room: RoomId,
        holder: impl Into<String>,
        token: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            room,
            holder: holder.into(),
            token: token.into(),
            ttl,
        }
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Result of a lease acquisition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The room is now exclusively held by the caller
    Acquired(RoomLease),
    /// Another run holds the room; retry after its visibility timeout
    Busy { holder: Option<String> },
}

impl AcquireOutcome {
    pub fn is_acquired(&self) -> bool {
        matches!(self, AcquireOutcome::Acquired(_))
    }

    /// Unwrap the lease if acquired
    pub fn lease(self) -> Option<RoomLease> {
        match self {
            AcquireOutcome::Acquired(lease) => Some(lease),
            AcquireOutcome::Busy { .. } => None,
        }
    }
}

/// Result of a lease renewal attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewOutcome {
    Renewed,
    /// The lease expired or the room was taken by another holder
    Lost,
    InvalidToken,
}

impl RenewOutcome {
    pub fn is_renewed(&self) -> bool {
        matches!(self, RenewOutcome::Renewed)
    }
}

/// Per-room exclusive lease coordination
#[async_trait]
pub trait RoomLockCoordinator: Send + Sync {
    /// Attempt to claim a room for the named holder
    async fn acquire(&self, room: &RoomId, holder: &str) -> Result<AcquireOutcome, LockError>;

    /// Extend a held lease before it expires
    async fn renew(&self, lease: &RoomLease) -> Result<RenewOutcome, LockError>;

    /// Voluntarily give up a lease; returns false if it was already gone
    async fn release(&self, lease: RoomLease) -> Result<bool, LockError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_outcome_helpers() {
        let lease = RoomLease::new(
            RoomId::new("demo"),
            "worker-1",
            "token",
            Duration::from_secs(30),
        );
        let acquired = AcquireOutcome::Acquired(lease.clone());
        assert!(acquired.is_acquired());
        assert_eq!(acquired.lease(), Some(lease));

        let busy = AcquireOutcome::Busy {
            holder: Some("worker-2".into()),
        };
        assert!(!busy.is_acquired());
        assert_eq!(busy.lease(), None);
    }

    #[test]
    fn test_renew_outcome() {
        assert!(RenewOutcome::Renewed.is_renewed());
        assert!(!RenewOutcome::Lost.is_renewed());
        assert!(!RenewOutcome::InvalidToken.is_renewed());
    }
}
