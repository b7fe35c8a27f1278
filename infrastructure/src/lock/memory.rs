//! In-memory room lock coordinator
//!
//! Grants time-bounded exclusive leases per room. Expired leases are
//! reclaimable by any holder, which is what lets a crashed worker's room
//! resume from its last checkpoint elsewhere.
//!
//! ## Limitations
//!
//! - **Single-process only**: no cross-process coordination
//! - **No persistence**: leases vanish with the process

use async_trait::async_trait;
use boardroom_application::ports::room_lock::{
    AcquireOutcome, LockError, RenewOutcome, RoomLease, RoomLockCoordinator,
};
use boardroom_domain::RoomId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use ulid::Ulid;

/// Lease bookkeeping for one room
#[derive(Debug, Clone)]
struct LeaseEntry {
    holder: String,
    token: String,
    expires_at: DateTime<Utc>,
}

/// Converts a lock poison error to a coordinator error.
fn poison_err<T>(_: PoisonError<T>) -> LockError {
    LockError::Unavailable("lease table lock poisoned".to_string())
}

fn expiry(ttl: Duration) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::seconds(30))
}

/// In-memory per-room lease coordinator
#[derive(Debug)]
pub struct InMemoryRoomLocks {
    leases: RwLock<HashMap<RoomId, LeaseEntry>>,
    lease_ttl: Duration,
}

impl Default for InMemoryRoomLocks {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl InMemoryRoomLocks {
    pub fn new(lease_ttl: Duration) -> Self {
        Self {
            leases: RwLock::new(HashMap::new()),
            lease_ttl,
        }
    }

    fn generate_token() -> String {
        Ulid::new().to_string()
    }
}

#[async_trait]
impl RoomLockCoordinator for InMemoryRoomLocks {
    async fn acquire(&self, room: &RoomId, holder: &str) -> Result<AcquireOutcome, LockError> {
        let mut leases = self.leases.write().map_err(poison_err)?;
        let now = Utc::now();

        if let Some(entry) = leases.get(room)
            && entry.expires_at > now
        {
            if entry.holder != holder {
                let current = entry.holder.clone();
                drop(leases);
                return Ok(AcquireOutcome::Busy {
                    holder: Some(current),
                });
            }
            // Same holder re-acquiring: rotate the token and extend
        }

        let entry = LeaseEntry {
            holder: holder.to_string(),
            token: Self::generate_token(),
            expires_at: expiry(self.lease_ttl),
        };
        let lease = RoomLease::new(room.clone(), holder, entry.token.clone(), self.lease_ttl);
        leases.insert(room.clone(), entry);
        drop(leases);

        Ok(AcquireOutcome::Acquired(lease))
    }

    async fn renew(&self, lease: &RoomLease) -> Result<RenewOutcome, LockError> {
        let mut leases = self.leases.write().map_err(poison_err)?;
        let now = Utc::now();

        let Some(entry) = leases.get_mut(lease.room()) else {
            drop(leases);
            return Ok(RenewOutcome::Lost);
        };
        if entry.token != lease.token() {
            drop(leases);
            return Ok(RenewOutcome::InvalidToken);
        }
        if entry.expires_at <= now {
            drop(leases);
            return Ok(RenewOutcome::Lost);
        }

        entry.expires_at = expiry(self.lease_ttl);
        drop(leases);
        Ok(RenewOutcome::Renewed)
    }

    async fn release(&self, lease: RoomLease) -> Result<bool, LockError> {
        let mut leases = self.leases.write().map_err(poison_err)?;

        let Some(entry) = leases.get(lease.room()) else {
            drop(leases);
            return Ok(false);
        };
        if entry.token != lease.token() {
            drop(leases);
            return Ok(false);
        }

        leases.remove(lease.room());
        drop(leases);
        Ok(true)
    }
}
