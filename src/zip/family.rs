//! # Zip Families
//!
//! A *family* ties together containers whose rows describe the same
//! underlying sequence: row `i` of every member refers to the same logical
//! record. Zipping and selection application are only meaningful between
//! members of one family, so every family-aware operation verifies
//! membership first and reports a typed [`FamilyMismatch`] on disagreement.
//!
//! Identifiers are minted from a process-wide atomic counter. They are
//! never reused or reset, compare by equality only, and deliberately carry
//! no ordering: family ids identify, they do not rank.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use eyre::Result;

static NEXT_FAMILY: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of one row space.
///
/// Minted by [`FamilyId::fresh`]; copied, never re-minted, when containers
/// or selections are cloned or moved. Two values compare equal exactly when
/// they came from the same mint call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FamilyId(u64);

impl FamilyId {
    /// Mints a new process-unique id. Thread-safe; ids start at zero and
    /// increase monotonically.
    pub fn fresh() -> Self {
        FamilyId(NEXT_FAMILY.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw counter value, for diagnostics.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "family#{}", self.0)
    }
}

/// Two operands belong to different families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyMismatch {
    pub left: FamilyId,
    pub right: FamilyId,
    /// Operation that required membership, e.g. `"semantic zip"`.
    pub context: &'static str,
}

impl fmt::Display for FamilyMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "family mismatch in {}: {} vs {}",
            self.context, self.left, self.right
        )
    }
}

impl std::error::Error for FamilyMismatch {}

/// Verifies family membership for a two-operand operation.
///
/// With the `unchecked-zip` feature the check degrades to a
/// `debug_assert!`, trading the guarantee for a branch less on hot paths.
pub(crate) fn check_same_family(
    left: FamilyId,
    right: FamilyId,
    context: &'static str,
) -> Result<()> {
    #[cfg(not(feature = "unchecked-zip"))]
    if left != right {
        eyre::bail!(FamilyMismatch {
            left,
            right,
            context
        });
    }
    #[cfg(feature = "unchecked-zip")]
    debug_assert_eq!(left, right, "family mismatch in {context}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn fresh_ids_are_unique() {
        let a = FamilyId::fresh();
        let b = FamilyId::fresh();
        assert_ne!(a, b);
        assert_eq!(a, a);
    }

    #[test]
    fn copies_preserve_identity() {
        let a = FamilyId::fresh();
        let b = a;
        assert_eq!(a, b);
        assert_eq!(a.as_u64(), b.as_u64());
    }

    #[test]
    fn minting_is_race_free() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| (0..1000).map(|_| FamilyId::fresh()).collect::<Vec<_>>()))
            .collect();
        let mut seen = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(seen.insert(id.as_u64()), "family id {id} minted twice");
            }
        }
        assert_eq!(seen.len(), 8000);
    }

    #[test]
    #[cfg(not(feature = "unchecked-zip"))]
    fn mismatch_reports_both_sides() {
        let a = FamilyId::fresh();
        let b = FamilyId::fresh();
        let err = check_same_family(a, b, "unit test").unwrap_err();
        let detail = err.downcast_ref::<FamilyMismatch>().unwrap();
        assert_eq!(detail.left, a);
        assert_eq!(detail.right, b);
        let msg = err.to_string();
        assert!(msg.contains("unit test"), "unexpected message: {msg}");
    }
}
