//! Ordered layer selection with a primary member.

use crate::layers::LayerId;

/// Selected layer ids in selection order. The first member is the primary
/// selection used by single-target controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    members: Vec<LayerId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(&self) -> Option<LayerId> {
        self.members.first().copied()
    }

    pub fn ids(&self) -> &[LayerId] {
        &self.members
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Make `id` the only selected layer.
    pub fn replace(&mut self, id: LayerId) {
        self.members.clear();
        self.members.push(id);
    }

    /// Replace the selection with `ids`, dropping duplicates.
    pub fn set(&mut self, ids: impl IntoIterator<Item = LayerId>) {
        self.members.clear();
        for id in ids {
            if !self.members.contains(&id) {
                self.members.push(id);
            }
        }
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: LayerId) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.members.push(id);
        }
    }

    pub fn remove(&mut self, id: LayerId) {
        self.members.retain(|&member| member != id);
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_updates_primary() {
        let (a, b) = (LayerId::new_v4(), LayerId::new_v4());
        let mut selection = Selection::new();
        selection.replace(a);
        selection.toggle(b);
        assert_eq!(selection.ids(), &[a, b]);
        assert_eq!(selection.primary(), Some(a));
        selection.toggle(a);
        assert_eq!(selection.primary(), Some(b));
        selection.toggle(b);
        assert_eq!(selection.primary(), None);
    }

    #[test]
    fn test_set_dedups() {
        let a = LayerId::new_v4();
        let mut selection = Selection::new();
        selection.set([a, a]);
        assert_eq!(selection.len(), 1);
    }
}
