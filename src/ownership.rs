//! Drive-base ownership arbitration
//!
//! The drive base is a single logical resource. Contended operations (e.g.
//! anti-defense wheel lock vs. path following) must hold exclusive, named
//! ownership before touching it. At most one owner exists at any instant;
//! acquisition and release are atomic with respect to concurrent requesters.

use parking_lot::Mutex;

/// Exclusive-access arbiter for the drive base.
#[derive(Debug, Default)]
pub struct DriveOwnership {
    holder: Mutex<Option<String>>,
}

impl DriveOwnership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to acquire exclusive access for `owner`.
    ///
    /// Succeeds if the drive base is unowned or already owned by `owner`.
    pub fn acquire(&self, owner: &str) -> bool {
        let mut holder = self.holder.lock();
        match holder.as_deref() {
            None => {
                *holder = Some(owner.to_string());
                log::debug!("Drive base acquired by {owner}");
                true
            }
            Some(current) => current == owner,
        }
    }

    /// Release exclusive access held by `owner`.
    ///
    /// A no-op unless `owner` is the current holder, so a stale caller can
    /// never release someone else's ownership. Returns whether a release
    /// happened.
    pub fn release(&self, owner: &str) -> bool {
        let mut holder = self.holder.lock();
        if holder.as_deref() == Some(owner) {
            *holder = None;
            log::debug!("Drive base released by {owner}");
            true
        } else {
            false
        }
    }

    /// Whether `owner` currently holds exclusive access.
    pub fn owned_by(&self, owner: &str) -> bool {
        self.holder.lock().as_deref() == Some(owner)
    }

    /// Snapshot of the current holder.
    pub fn holder(&self) -> Option<String> {
        self.holder.lock().clone()
    }

    /// Acquire exclusive access scoped to the returned guard.
    ///
    /// Release happens structurally on drop, so all exit paths (including
    /// error paths) give the resource back. Returns None on an ownership
    /// conflict.
    pub fn try_guard(&self, owner: &str) -> Option<OwnershipGuard<'_>> {
        if self.acquire(owner) {
            Some(OwnershipGuard {
                arbiter: self,
                owner: owner.to_string(),
            })
        } else {
            None
        }
    }
}

/// RAII guard for scoped drive-base ownership.
pub struct OwnershipGuard<'a> {
    arbiter: &'a DriveOwnership,
    owner: String,
}

impl Drop for OwnershipGuard<'_> {
    fn drop(&mut self) {
        self.arbiter.release(&self.owner);
    }
}
