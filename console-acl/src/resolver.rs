// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derive grant and revoke sets from a baseline of explicit rights and pending edits.
//!
//! Every function here is pure and recomputes its result from scratch. Rights lists are small and
//! enumerable, so there is no incremental diffing.
use std::collections::BTreeMap;

use crate::{Right, Rights};

/// Rights the user toggled while editing, mapped to the state they should end up in.
///
/// An entry is a delta against the explicit rights of the subject, not an absolute statement.
/// Setting a right to `true` which is already held is a no-op and will not show up in the rights
/// to grant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingChanges(BTreeMap<Right, bool>);

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the desired end state of a right, replacing an earlier toggle of the same right.
    pub fn set(&mut self, right: impl Into<Right>, granted: bool) {
        self.0.insert(right.into(), granted);
    }

    pub fn get(&self, right: &str) -> Option<bool> {
        self.0.get(right).copied()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Right, bool)> {
        self.0.iter().map(|(right, granted)| (right, *granted))
    }
}

impl<R: Into<Right>> FromIterator<(R, bool)> for PendingChanges {
    fn from_iter<T: IntoIterator<Item = (R, bool)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(right, granted)| (right.into(), granted))
                .collect(),
        )
    }
}

/// Everything derived from one baseline and one set of pending changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub rights_to_grant: Vec<Right>,
    pub rights_to_revoke: Vec<Right>,
    pub current_rights_map: BTreeMap<Right, bool>,
}

impl Resolution {
    /// Returns `true` if persisting this resolution would change anything on the backend.
    pub fn has_changes(&self) -> bool {
        !self.rights_to_grant.is_empty() || !self.rights_to_revoke.is_empty()
    }
}

/// Rights which are set to be granted and are not already held explicitly.
pub fn rights_to_grant(explicit_rights: &Rights, pending: &PendingChanges) -> Vec<Right> {
    pending
        .iter()
        .filter(|(right, granted)| *granted && !explicit_rights.contains(*right))
        .map(|(right, _)| right.clone())
        .collect()
}

/// Rights which are set to be revoked and are currently held explicitly.
pub fn rights_to_revoke(explicit_rights: &Rights, pending: &PendingChanges) -> Vec<Right> {
    pending
        .iter()
        .filter(|(right, granted)| !*granted && explicit_rights.contains(*right))
        .map(|(right, _)| right.clone())
        .collect()
}

/// Merged view of the baseline with every pending change applied on top.
pub fn current_rights_map(
    explicit_rights: &Rights,
    pending: &PendingChanges,
) -> BTreeMap<Right, bool> {
    let mut current: BTreeMap<Right, bool> = explicit_rights
        .iter()
        .map(|right| (right.clone(), true))
        .collect();

    for (right, granted) in pending.iter() {
        current.insert(right.clone(), granted);
    }

    current
}

/// Rights held only through inheritance: effective rights minus explicit rights.
pub fn inherited_rights(effective_rights: &Rights, explicit_rights: &Rights) -> Rights {
    effective_rights
        .difference(explicit_rights)
        .cloned()
        .collect()
}

/// Compute grant set, revoke set and the merged rights map in one go.
pub fn resolve(explicit_rights: &Rights, pending: &PendingChanges) -> Resolution {
    Resolution {
        rights_to_grant: rights_to_grant(explicit_rights, pending),
        rights_to_revoke: rights_to_revoke(explicit_rights, pending),
        current_rights_map: current_rights_map(explicit_rights, pending),
    }
}
