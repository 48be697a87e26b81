use std::collections::BTreeMap;

pub(crate) type VarId = i32;

/// Upgrade bitmask collected by the hero.
pub(crate) const VAR_UPGRADES: VarId = -1;
/// Number of artifacts collected by the hero.
pub(crate) const VAR_ARTIFACTS: VarId = -2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Variable(i32);

impl Variable {
    pub(crate) fn get(&self) -> i32 {
        self.0
    }

    pub(crate) fn set(&mut self, value: i32) {
        self.0 = value;
    }
}

/// Integer slots keyed by id. Unknown ids read as zero and are created on
/// first access; a slot lives until the store is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct VariableStore {
    slots: BTreeMap<VarId, Variable>,
}

impl VariableStore {
    pub(crate) fn slot(&mut self, id: VarId) -> &mut Variable {
        self.slots.entry(id).or_default()
    }

    pub(crate) fn peek(&self, id: VarId) -> i32 {
        self.slots.get(&id).map(Variable::get).unwrap_or(0)
    }

    pub(crate) fn snapshot(&self) -> BTreeMap<VarId, i32> {
        self.slots
            .iter()
            .map(|(id, variable)| (*id, variable.get()))
            .collect()
    }

    /// Replaces every slot with the saved values.
    pub(crate) fn restore(&mut self, saved: &BTreeMap<VarId, i32>) {
        self.slots = saved
            .iter()
            .map(|(id, value)| (*id, Variable(*value)))
            .collect();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (VarId, i32)> + '_ {
        self.slots.iter().map(|(id, variable)| (*id, variable.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_slot_reads_zero_and_is_created() {
        let mut store = VariableStore::default();
        assert_eq!(store.peek(42), 0);
        assert_eq!(store.len(), 0);
        assert_eq!(store.slot(42).get(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn writes_are_visible_to_later_reads() {
        let mut store = VariableStore::default();
        store.slot(VAR_ARTIFACTS).set(3);
        store.slot(1004).set(1);
        assert_eq!(store.slot(VAR_ARTIFACTS).get(), 3);
        assert_eq!(store.peek(1004), 1);
    }

    #[test]
    fn restore_replaces_all_slots() {
        let mut store = VariableStore::default();
        store.slot(1).set(10);
        let saved = store.snapshot();

        store.slot(1).set(99);
        store.slot(2).set(5);
        store.restore(&saved);

        assert_eq!(store.peek(1), 10);
        assert_eq!(store.peek(2), 0);
        assert_eq!(store.len(), 1);
    }
}
