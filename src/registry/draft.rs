//! Draft collection: an editable copy of a persisted collection.
//!
//! Entries carry a local `EntryKey` so two records with identical fields
//! stay distinct. The committed copy is only replaced on load or after the
//! store confirms a save.

use crate::domain::{AirQualityError, AirQualityResult, Record};

/// Identity of one draft entry, stable until the next `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct DraftEntry<T> {
    key: EntryKey,
    value: T,
}

impl<T> DraftEntry<T> {
    pub fn key(&self) -> EntryKey {
        self.key
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

/// A scratch copy being composed in an add or edit form.
#[derive(Debug, Clone)]
pub(crate) struct Selection<T> {
    /// `None` for an add, the edited entry for an edit
    pub target: Option<EntryKey>,
    pub value: T,
}

#[derive(Debug)]
pub(crate) struct DraftList<T> {
    entries: Vec<DraftEntry<T>>,
    committed: Vec<T>,
    next_key: u64,
    unsaved: bool,
}

impl<T: Record> DraftList<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            committed: Vec::new(),
            next_key: 0,
            unsaved: false,
        }
    }

    /// Adopt `committed` as the persisted snapshot and reset the draft to a copy of it.
    pub fn load(&mut self, committed: Vec<T>) {
        self.entries.clear();
        for value in committed.iter().cloned() {
            self.push_entry(value);
        }
        self.committed = committed;
        self.refresh();
    }

    pub fn entries(&self) -> &[DraftEntry<T>] {
        &self.entries
    }

    pub fn committed(&self) -> &[T] {
        &self.committed
    }

    pub fn get(&self, key: EntryKey) -> AirQualityResult<&T> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.value)
            .ok_or_else(|| Self::not_found(key))
    }

    /// Values of every entry except `key`.
    pub fn others(&self, key: Option<EntryKey>) -> impl Iterator<Item = &T> {
        self.entries
            .iter()
            .filter(move |e| Some(e.key) != key)
            .map(|e| &e.value)
    }

    pub fn push(&mut self, value: T) -> EntryKey {
        let key = self.push_entry(value);
        self.refresh();
        key
    }

    /// Apply `update` to the entry identified by `key`.
    pub fn update(&mut self, key: EntryKey, update: impl FnOnce(&mut T)) -> AirQualityResult<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.key == key)
            .ok_or_else(|| Self::not_found(key))?;
        update(&mut entry.value);
        self.refresh();
        Ok(())
    }

    pub fn remove(&mut self, key: EntryKey) -> AirQualityResult<T> {
        let index = self
            .entries
            .iter()
            .position(|e| e.key == key)
            .ok_or_else(|| Self::not_found(key))?;
        let entry = self.entries.remove(index);
        self.refresh();
        Ok(entry.value)
    }

    pub fn unsaved(&self) -> bool {
        self.unsaved
    }

    /// Keys and values to hand to the store, in draft order.
    pub fn snapshot(&self) -> (Vec<EntryKey>, Vec<T>) {
        self.entries
            .iter()
            .map(|e| (e.key, e.value.clone()))
            .unzip()
    }

    /// Record a confirmed save: `stored` becomes the committed copy and any
    /// store-assigned ids are written back onto the entries that were saved.
    pub fn apply_saved(&mut self, keys: &[EntryKey], stored: Vec<T>) {
        for (key, record) in keys.iter().zip(&stored) {
            let Some(id) = record.id() else { continue };
            if let Some(entry) = self.entries.iter_mut().find(|e| e.key == *key) {
                if entry.value.id().is_none() {
                    entry.value.set_id(id);
                }
            }
        }
        self.committed = stored;
        self.refresh();
    }

    fn push_entry(&mut self, value: T) -> EntryKey {
        let key = EntryKey(self.next_key);
        self.next_key += 1;
        self.entries.push(DraftEntry { key, value });
        key
    }

    /// Ordered, value-based comparison; reordering counts as a change.
    fn refresh(&mut self) {
        self.unsaved = !self
            .entries
            .iter()
            .map(|e| &e.value)
            .eq(self.committed.iter());
    }

    fn not_found(key: EntryKey) -> AirQualityError {
        AirQualityError::NotFound(format!("{} entry {} is no longer in the draft", T::KIND, key.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;

    fn location(name: &str) -> Location {
        Location {
            id: None,
            name: name.into(),
        }
    }

    #[test]
    fn load_yields_clean_draft() {
        let mut list = DraftList::new();
        list.load(vec![location("Workshop"), location("Garage")]);
        assert_eq!(list.entries().len(), 2);
        assert!(!list.unsaved());
    }

    #[test]
    fn identical_values_keep_distinct_keys() {
        let mut list = DraftList::new();
        let a = list.push(location("Shed"));
        let b = list.push(location("Shed"));
        assert_ne!(a, b);
        list.remove(a).unwrap();
        assert_eq!(list.entries().len(), 1);
        assert_eq!(list.entries()[0].key(), b);
    }

    #[test]
    fn reordering_counts_as_change() {
        let mut list = DraftList::new();
        list.load(vec![location("A"), location("B")]);
        let first = list.entries()[0].key();
        let moved = list.remove(first).unwrap();
        list.push(moved);
        assert!(list.unsaved());
    }

    #[test]
    fn reverting_an_edit_clears_unsaved() {
        let mut list = DraftList::new();
        list.load(vec![location("A")]);
        let key = list.entries()[0].key();
        list.update(key, |l| l.name = "B".into()).unwrap();
        assert!(list.unsaved());
        list.update(key, |l| l.name = "A".into()).unwrap();
        assert!(!list.unsaved());
    }

    #[test]
    fn missing_key_is_not_found() {
        let mut list: DraftList<Location> = DraftList::new();
        let key = list.push(location("A"));
        list.remove(key).unwrap();
        assert!(matches!(list.remove(key), Err(AirQualityError::NotFound(_))));
        assert!(matches!(
            list.update(key, |_| {}),
            Err(AirQualityError::NotFound(_))
        ));
    }

    #[test]
    fn apply_saved_writes_back_ids() {
        let mut list = DraftList::new();
        list.push(location("A"));
        let (keys, mut values) = list.snapshot();
        values[0].id = Some(7);
        list.apply_saved(&keys, values);
        assert_eq!(list.entries()[0].value().id, Some(7));
        assert!(!list.unsaved());
    }
}
