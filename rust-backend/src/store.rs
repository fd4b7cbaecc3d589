use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Anything a [`Store`] can hold.
pub trait Record: Clone + Send + Sync {
    fn id(&self) -> Uuid;
}

/// The records of one entity type, in insertion order, indexed by id.
#[derive(Debug)]
pub struct Collection<T> {
    next_seq: u64,
    records: BTreeMap<u64, T>,
    index: HashMap<Uuid, u64>,
}

impl<T: Record> Collection<T> {
    fn new() -> Self {
        Self {
            next_seq: 0,
            records: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.index.get(&id).and_then(|seq| self.records.get(seq))
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut T> {
        match self.index.get(&id) {
            Some(seq) => self.records.get_mut(seq),
            None => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.iter().find(|record| predicate(*record))
    }

    pub fn find_mut(&mut self, predicate: impl Fn(&T) -> bool) -> Option<&mut T> {
        self.records.values_mut().find(|record| predicate(&**record))
    }

    pub fn any(&self, predicate: impl Fn(&T) -> bool) -> bool {
        self.iter().any(predicate)
    }

    /// Matching records cloned out, in insertion order.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.iter().filter(|record| predicate(*record)).cloned().collect()
    }

    pub fn all(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Appends a record. Ids are generated per record, so a clash means the
    /// caller reused one; the older record is replaced in that case.
    pub fn insert(&mut self, record: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some(old_seq) = self.index.insert(record.id(), seq) {
            self.records.remove(&old_seq);
        }
        self.records.insert(seq, record);
    }

    pub fn remove(&mut self, id: Uuid) -> Option<T> {
        let seq = self.index.remove(&id)?;
        self.records.remove(&seq)
    }

    pub fn remove_where(&mut self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        let id = self.find(predicate)?.id();
        self.remove(id)
    }
}

/// Sole owner of one entity collection.
///
/// Writers take the lock for the whole check-then-commit sequence, so two
/// mutations of the same collection never interleave. Readers share the lock.
#[derive(Debug)]
pub struct Store<T> {
    inner: RwLock<Collection<T>>,
}

impl<T: Record> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Store<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Collection::new()),
        }
    }

    // A panic while holding the lock cannot leave a half-applied record:
    // every mutation is a single insert, remove or field assignment.
    fn read_guard(&self) -> RwLockReadGuard<'_, Collection<T>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Collection<T>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read<R>(&self, f: impl FnOnce(&Collection<T>) -> R) -> R {
        let guard = self.read_guard();
        f(&*guard)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut Collection<T>) -> R) -> R {
        let mut guard = self.write_guard();
        f(&mut *guard)
    }

    pub fn get(&self, id: Uuid) -> Option<T> {
        self.read(|records| records.get(id).cloned())
    }

    pub fn all(&self) -> Vec<T> {
        self.read(Collection::all)
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.read(|records| records.filter(predicate))
    }

    pub fn len(&self) -> usize {
        self.read(Collection::len)
    }

    pub fn is_empty(&self) -> bool {
        self.read(Collection::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: Uuid,
        tag: &'static str,
    }

    impl Record for Item {
        fn id(&self) -> Uuid {
            self.id
        }
    }

    fn item(tag: &'static str) -> Item {
        Item { id: Uuid::new_v4(), tag }
    }

    #[test]
    fn keeps_insertion_order_across_removals() {
        let store: Store<Item> = Store::new();
        let (a, b, c) = (item("a"), item("b"), item("c"));
        store.write(|items| {
            items.insert(a.clone());
            items.insert(b.clone());
            items.insert(c.clone());
        });

        let removed = store.write(|items| items.remove(b.id));
        assert_eq!(removed, Some(b.clone()));

        let d = item("d");
        store.write(|items| items.insert(d.clone()));
        let tags: Vec<_> = store.all().into_iter().map(|i| i.tag).collect();
        assert_eq!(tags, vec!["a", "c", "d"]);
        assert_eq!(store.get(b.id), None);
        assert_eq!(store.get(c.id), Some(c));
    }

    #[test]
    fn remove_missing_is_none() {
        let store: Store<Item> = Store::new();
        assert!(store.write(|items| items.remove(Uuid::new_v4())).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn get_mut_edits_in_place() {
        let store: Store<Item> = Store::new();
        let a = item("a");
        store.write(|items| items.insert(a.clone()));
        store.write(|items| {
            if let Some(found) = items.get_mut(a.id) {
                found.tag = "changed";
            }
        });
        assert_eq!(store.get(a.id).map(|i| i.tag), Some("changed"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn filter_and_remove_where() {
        let store: Store<Item> = Store::new();
        store.write(|items| {
            items.insert(item("x"));
            items.insert(item("y"));
            items.insert(item("x"));
        });
        assert_eq!(store.filter(|i| i.tag == "x").len(), 2);
        let removed = store.write(|items| items.remove_where(|i| i.tag == "y"));
        assert_eq!(removed.map(|i| i.tag), Some("y"));
        assert_eq!(store.len(), 2);
    }
}
