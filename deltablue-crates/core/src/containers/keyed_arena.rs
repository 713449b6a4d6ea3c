use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

/// Structure for storing elements of type `Value` which can only be addressed by keys of type
/// `Key`; elements can be removed, after which their key is no longer valid.
///
/// Slots are never reused. A key which refers to a removed element therefore never aliases an
/// element inserted later, and [`KeyedArena::get`] returns [`None`] for it.
///
/// Almost all features of this structure require that `Key` implements the [StorageKey] trait.
#[derive(Debug, Hash, PartialEq, Eq)]
pub struct KeyedArena<Key, Value> {
    /// [PhantomData] to ensure that the [KeyedArena] is bound to the structure
    key: PhantomData<Key>,
    /// Storage of the elements of type `Value`; vacant slots are [`None`]
    elements: Vec<Option<Value>>,
    /// The number of occupied slots
    num_live: usize,
}

impl<Key, Value: Clone> Clone for KeyedArena<Key, Value> {
    fn clone(&self) -> Self {
        Self {
            key: PhantomData,
            elements: self.elements.clone(),
            num_live: self.num_live,
        }
    }
}

impl<Key, Value> Default for KeyedArena<Key, Value> {
    fn default() -> Self {
        Self {
            key: PhantomData,
            elements: Vec::default(),
            num_live: 0,
        }
    }
}

impl<Key, Value> KeyedArena<Key, Value> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            key: PhantomData,
            elements: Vec::with_capacity(capacity),
            num_live: 0,
        }
    }
}

impl<Key: StorageKey, Value> KeyedArena<Key, Value> {
    /// The number of elements which have not been removed.
    pub fn len(&self) -> usize {
        self.num_live
    }

    pub fn is_empty(&self) -> bool {
        self.num_live == 0
    }

    /// Add a new value to the arena.
    ///
    /// Returns the key for the inserted value.
    pub fn insert(&mut self, value: Value) -> Key {
        self.elements.push(Some(value));
        self.num_live += 1;

        Key::create_from_index(self.elements.len() - 1)
    }

    /// Removes the value stored under `key`, returning it if it was present.
    pub fn remove(&mut self, key: Key) -> Option<Value> {
        let removed = self.elements.get_mut(key.index()).and_then(Option::take);
        if removed.is_some() {
            self.num_live -= 1;
        }
        removed
    }

    pub fn contains(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: Key) -> Option<&Value> {
        self.elements.get(key.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, key: Key) -> Option<&mut Value> {
        self.elements.get_mut(key.index()).and_then(Option::as_mut)
    }

    /// Iterate over the keys of the values which are present, in the order of insertion.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, element)| element.is_some())
            .map(|(index, _)| Key::create_from_index(index))
    }

    /// Iterate over the key-value pairs which are present, in the order of insertion.
    pub fn iter(&self) -> impl Iterator<Item = (Key, &'_ Value)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(index, element)| {
                element
                    .as_ref()
                    .map(|value| (Key::create_from_index(index), value))
            })
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedArena<Key, Value> {
    type Output = Value;

    fn index(&self, index: Key) -> &Self::Output {
        match self.elements[index.index()] {
            Some(ref value) => value,
            None => panic!("accessed a removed element at index {}", index.index()),
        }
    }
}

impl<Key: StorageKey, Value> IndexMut<Key> for KeyedArena<Key, Value> {
    fn index_mut(&mut self, index: Key) -> &mut Self::Output {
        let position = index.index();
        match self.elements[position] {
            Some(ref mut value) => value,
            None => panic!("accessed a removed element at index {position}"),
        }
    }
}

impl StorageKey for usize {
    fn index(&self) -> usize {
        *self
    }

    fn create_from_index(index: usize) -> Self {
        index
    }
}

impl StorageKey for u32 {
    fn index(&self) -> usize {
        *self as usize
    }

    fn create_from_index(index: usize) -> Self {
        index as u32
    }
}

/// A simple trait which requires that the structures implementing this trait can generate an index.
pub trait StorageKey: Clone {
    fn index(&self) -> usize;

    fn create_from_index(index: usize) -> Self;
}
