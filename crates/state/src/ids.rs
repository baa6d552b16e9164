//! Furniture id generation

use tracing::debug;

/// Monotonic id source producing `"{template_id}-{n}"`.
///
/// The counter only moves forward, so two adds in the same instant still get
/// distinct ids. Ids read back from a scene document are fed through
/// [`IdGenerator::observe`] so later adds skip past them.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next_id: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl IdGenerator {
    /// Generate the next unique id for an item built from `template_id`
    pub fn next(&mut self, template_id: &str) -> String {
        let n = self.next_id;
        // Wrapping can only repeat a suffix after 2^64 ids; the store
        // skips any id still in use.
        self.next_id = n.wrapping_add(1);
        format!("{template_id}-{n}")
    }

    /// Make sure future ids never repeat an existing `id`
    pub fn observe(&mut self, id: &str) {
        let suffix = id.rsplit_once('-').map(|(_, n)| n).unwrap_or(id);
        let Ok(n) = suffix.parse::<u64>() else {
            return;
        };
        match n.checked_add(1) {
            Some(next) => self.next_id = self.next_id.max(next),
            None => debug!("Id {} is past the counter range, not reserving it", id),
        }
    }
}
