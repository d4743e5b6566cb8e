use crate::object::ObjectId;
use crate::render::Highlight;

/// Ordered selection; the last entry is the primary selection and carries manipulation focus.
/// Methods return whether anything changed so the editor can notify observers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    order: Vec<ObjectId>,
}

impl Selection {
    pub fn ids(&self) -> &[ObjectId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.order.contains(&id)
    }

    pub fn primary(&self) -> Option<ObjectId> {
        self.order.last().copied()
    }

    /// Object the transform gizmo should attach to.
    pub fn focus(&self) -> Option<ObjectId> {
        self.primary()
    }

    pub fn highlight(&self) -> Highlight {
        match self.order.len() {
            0 => Highlight::None,
            1 => Highlight::Single,
            _ => Highlight::Multi,
        }
    }

    /// Click semantics. A plain select replaces the selection and never toggles; an additive
    /// select of an already selected object removes it.
    pub fn select(&mut self, id: ObjectId, additive: bool) -> bool {
        if additive {
            if self.contains(id) {
                return self.remove(id);
            }
            return self.add(id);
        }
        if self.order.len() == 1 && self.order[0] == id {
            return false;
        }
        self.order.clear();
        self.order.push(id);
        true
    }

    pub fn add(&mut self, id: ObjectId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    pub fn remove(&mut self, id: ObjectId) -> bool {
        let before = self.order.len();
        self.order.retain(|selected| *selected != id);
        self.order.len() != before
    }

    pub fn clear(&mut self) -> bool {
        if self.order.is_empty() {
            return false;
        }
        self.order.clear();
        true
    }

    /// Replaces the selection with `ids` in the given order.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = ObjectId>) -> bool {
        let previous = std::mem::take(&mut self.order);
        for id in ids {
            self.add(id);
        }
        previous != self.order
    }

    /// Drops entries that no longer name a live object.
    pub fn retain_live(&mut self, is_live: impl Fn(ObjectId) -> bool) -> bool {
        let before = self.order.len();
        self.order.retain(|id| is_live(*id));
        self.order.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ObjectId = ObjectId(1);
    const B: ObjectId = ObjectId(2);
    const C: ObjectId = ObjectId(3);

    #[test]
    fn plain_select_twice_keeps_object() {
        let mut selection = Selection::default();
        assert!(selection.select(A, false));
        assert!(!selection.select(A, false));
        assert_eq!(selection.ids(), &[A]);
    }

    #[test]
    fn additive_select_twice_toggles_off() {
        let mut selection = Selection::default();
        selection.select(A, true);
        selection.select(A, true);
        assert!(selection.is_empty());
    }

    #[test]
    fn primary_follows_latest_addition_and_removal() {
        let mut selection = Selection::default();
        selection.add(A);
        selection.add(B);
        selection.add(C);
        assert_eq!(selection.primary(), Some(C));
        assert_eq!(selection.highlight(), Highlight::Multi);
        selection.remove(C);
        assert_eq!(selection.focus(), Some(B));
        selection.clear();
        assert_eq!(selection.focus(), None);
        assert_eq!(selection.highlight(), Highlight::None);
    }

    #[test]
    fn plain_select_replaces_multi_selection() {
        let mut selection = Selection::default();
        selection.add(A);
        selection.add(B);
        assert!(selection.select(A, false));
        assert_eq!(selection.ids(), &[A]);
    }

    #[test]
    fn add_ignores_duplicates() {
        let mut selection = Selection::default();
        assert!(selection.add(A));
        assert!(!selection.add(A));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn select_all_reports_changes() {
        let mut selection = Selection::default();
        assert!(selection.select_all([A, B]));
        assert!(!selection.select_all([A, B]));
        assert_eq!(selection.primary(), Some(B));
    }
}
