//! Mutually exclusive toggle groups
//!
//! Groups hold non-owning [`WidgetId`] handles. A handle whose widget has been
//! removed is detected through the arena's generation check and purged the
//! next time the group is read; removal also leaves the group eagerly.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::widget::WidgetId;

type Members = SmallVec<[WidgetId; 4]>;

/// Outcome of group arbitration for a press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arbitration {
    /// The press may proceed; other down members were released
    Allowed,
    /// The pressed widget is the selected member and the group may not be empty
    Rejected,
}

/// Access to group members' down axis during arbitration
pub trait GroupMembers {
    /// Whether `id` is down, or `None` if the handle is stale
    fn is_down(&self, id: WidgetId) -> Option<bool>;

    /// Move a member to its normal-family state, preserving hover
    fn force_up(&mut self, id: WidgetId);
}

/// Registry of toggle groups keyed by `K`
#[derive(Debug, Clone)]
pub struct ToggleGroups<K> {
    groups: FxHashMap<K, Members>,
}

impl<K: Hash + Eq + Clone> ToggleGroups<K> {
    pub fn new() -> Self {
        Self {
            groups: FxHashMap::default(),
        }
    }

    /// Add `id` under `key`, leaving `previous` first
    ///
    /// Joining the group a widget is already in is a no-op.
    pub fn join(&mut self, id: WidgetId, key: K, previous: Option<&K>) {
        if previous == Some(&key) && self.contains(&key, id) {
            return;
        }
        if let Some(previous) = previous {
            self.leave(id, previous);
        }

        let members = self.groups.entry(key).or_default();
        if !members.contains(&id) {
            members.push(id);
        }
    }

    /// Remove `id` from `key`'s list; empty groups are dropped
    pub fn leave(&mut self, id: WidgetId, key: &K) {
        if let Some(members) = self.groups.get_mut(key) {
            members.retain(|member| *member != id);
            if members.is_empty() {
                self.groups.remove(key);
            }
        }
    }

    pub fn contains(&self, key: &K, id: WidgetId) -> bool {
        self.groups
            .get(key)
            .is_some_and(|members| members.contains(&id))
    }

    /// Snapshot of live members, purging handles `is_live` rejects
    pub fn members(&mut self, key: &K, is_live: impl Fn(WidgetId) -> bool) -> Vec<WidgetId> {
        let Some(members) = self.groups.get_mut(key) else {
            return Vec::new();
        };

        let before = members.len();
        members.retain(|member| is_live(*member));
        if members.len() != before {
            tracing::trace!("purged {} stale group handles", before - members.len());
        }

        let snapshot = members.to_vec();
        if snapshot.is_empty() {
            self.groups.remove(key);
        }
        snapshot
    }

    /// Decide whether `widget` may be pressed and release the other members
    pub fn arbitrate_press(
        &mut self,
        widget: WidgetId,
        key: &K,
        allow_no_selection: bool,
        access: &mut impl GroupMembers,
    ) -> Arbitration {
        if !allow_no_selection && access.is_down(widget) == Some(true) {
            return Arbitration::Rejected;
        }

        self.release_others(widget, key, access);
        Arbitration::Allowed
    }

    /// Force every live member except `widget` to the normal family
    pub fn release_others(&mut self, widget: WidgetId, key: &K, access: &mut impl GroupMembers) {
        let snapshot = self.members(key, |id| access.is_down(id).is_some());
        for member in snapshot {
            if member == widget {
                continue;
            }
            if access.is_down(member) == Some(true) {
                access.force_up(member);
            }
        }
    }

    /// Number of groups with at least one handle
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<K: Hash + Eq + Clone> Default for ToggleGroups<K> {
    fn default() -> Self {
        Self::new()
    }
}
