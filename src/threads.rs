//! Reply-chain reconstruction.
//!
//! The export is a flat list where replies only carry a child → parent
//! back-reference. This module resolves, for every reply, its ultimate
//! thread root, collapsing arbitrarily deep chains into one flat
//! descendant list per root. The walk is cycle-safe: mutual replies and
//! longer loops terminate, and a reply whose chain leads outside the
//! archive is left unthreaded so it can be emitted as a standalone
//! message.

use std::collections::{HashMap, HashSet};

use crate::export::RawMessage;

/// The reply structure of an archive.
///
/// Descendants are stored as indices into the original message list so the
/// archive order inside each thread is preserved for free.
#[derive(Debug, Default)]
pub struct ThreadMap {
    /// root message id → descendant indices, in archive order
    descendants_by_root: HashMap<i64, Vec<usize>>,
    /// indices of all messages placed under some root
    descendant_indices: HashSet<usize>,
}

impl ThreadMap {
    /// Builds the thread map for a full message list.
    ///
    /// A message becomes a descendant of a root only when
    /// - it declares a reply target,
    /// - the resolved root names a message that exists in this archive,
    /// - and the resolved root is not the message itself (a cycle that
    ///   closed back onto it).
    ///
    /// Everything else stays a root, including replies to ids the archive
    /// never assigned (a root without an id cannot receive replies).
    pub fn build(messages: &[RawMessage]) -> Self {
        let mut reply_index: HashMap<i64, i64> = HashMap::new();
        let mut known_ids: HashSet<i64> = HashSet::new();

        for msg in messages {
            if let Some(id) = msg.id {
                known_ids.insert(id);
                if let Some(target) = msg.reply_to_message_id {
                    reply_index.insert(id, target);
                }
            }
        }

        let mut map = ThreadMap::default();
        for (idx, msg) in messages.iter().enumerate() {
            let Some(target) = msg.reply_to_message_id else {
                continue;
            };
            let root = resolve_root(target, &reply_index);
            if !known_ids.contains(&root) {
                // Chain leads to a message that isn't in this archive;
                // the reply is emitted standalone instead.
                continue;
            }
            if msg.id == Some(root) {
                continue;
            }
            map.descendants_by_root.entry(root).or_default().push(idx);
            map.descendant_indices.insert(idx);
        }
        map
    }

    /// Descendant indices for a root, in archive order.
    pub fn descendants_of(&self, root_id: i64) -> &[usize] {
        self.descendants_by_root
            .get(&root_id)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if the message at `idx` belongs to some thread and
    /// must not be emitted at the top level.
    pub fn is_descendant(&self, idx: usize) -> bool {
        self.descendant_indices.contains(&idx)
    }

    /// Number of roots that have at least one descendant.
    pub fn thread_count(&self) -> usize {
        self.descendants_by_root.len()
    }
}

/// Walks the reply index from `start` up to the chain's root.
///
/// Iterative with a visited set: when the next hop is an id we already
/// walked through, the current id is the effective root. This terminates
/// on any finite cycle where the naive recursive parent walk would not.
fn resolve_root(start: i64, reply_index: &HashMap<i64, i64>) -> i64 {
    let mut visited = HashSet::new();
    let mut current = start;
    visited.insert(current);
    while let Some(&parent) = reply_index.get(&current) {
        if visited.contains(&parent) {
            break;
        }
        current = parent;
        visited.insert(current);
    }
    current
}
