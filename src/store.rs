// Ordered in-memory stores; every operation runs entirely under one lock

use parking_lot::Mutex;

// The store owns id assignment
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> u64;
    fn assign_id(&mut self, id: u64);
}

pub trait Store<T: Record>: Send + Sync {
    fn create(&self, record: T) -> T;

    // None, with nothing inserted, when an existing record clashes
    fn create_unique(&self, record: T, clashes: &dyn Fn(&T) -> bool) -> Option<T>;

    fn list(&self) -> Vec<T>;

    fn get(&self, id: u64) -> Option<T>;

    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> Option<T>;

    fn update(&self, id: u64, apply: &mut dyn FnMut(&mut T)) -> Option<T>;

    fn delete(&self, id: u64) -> Option<T>;
}

struct Inner<T> {
    records: Vec<T>,
    next_id: u64,
}

impl<T: Record> Inner<T> {
    fn insert(&mut self, mut record: T) -> T {
        record.assign_id(self.next_id);
        self.next_id += 1;
        self.records.push(record.clone());
        record
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }
}

// Ids start at 1 and are never reused, even after a delete
pub struct MemoryStore<T> {
    inner: Mutex<Inner<T>>,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Store<T> for MemoryStore<T> {
    fn create(&self, record: T) -> T {
        self.inner.lock().insert(record)
    }

    fn create_unique(&self, record: T, clashes: &dyn Fn(&T) -> bool) -> Option<T> {
        let mut inner = self.inner.lock();
        if inner.records.iter().any(|existing| clashes(existing)) {
            return None;
        }
        Some(inner.insert(record))
    }

    fn list(&self) -> Vec<T> {
        self.inner.lock().records.clone()
    }

    fn get(&self, id: u64) -> Option<T> {
        let inner = self.inner.lock();
        inner.records.iter().find(|record| record.id() == id).cloned()
    }

    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> Option<T> {
        let inner = self.inner.lock();
        inner.records.iter().find(|record| predicate(record)).cloned()
    }

    fn update(&self, id: u64, apply: &mut dyn FnMut(&mut T)) -> Option<T> {
        let mut inner = self.inner.lock();
        let record = inner.records.iter_mut().find(|record| record.id() == id)?;
        apply(record);
        Some(record.clone())
    }

    fn delete(&self, id: u64) -> Option<T> {
        let mut inner = self.inner.lock();
        let index = inner.position(id)?;
        Some(inner.records.remove(index))
    }
}
