use std::sync::Arc;

/// Single node in the list
#[derive(Debug)]
struct Node<T> {
    value: T,
    next: Option<Arc<Node<T>>>
}

/// Immutable singly-linked list with structural sharing.
/// Pushing returns a new list that shares its tail with the original, so cloning a list is O(1).
/// Iteration yields the most recently pushed element first.
#[derive(Debug)]
pub struct PersistentList<T> {
    head: Option<Arc<Node<T>>>,
    len: usize
}

impl<T> Clone for PersistentList<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len
        }
    }
}

impl<T> Default for PersistentList<T> {
    fn default() -> Self {
        Self { head: None, len: 0 }
    }
}

impl<T> PersistentList<T> {
    /// Creates an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new list with `value` at the front
    pub fn push(&self, value: T) -> Self {
        Self {
            head: Some(Arc::new(Node { value, next: self.head.clone() })),
            len: self.len + 1
        }
    }

    /// The most recently pushed element
    pub fn first(&self) -> Option<&T> {
        self.head.as_deref().map(|n| &n.value)
    }

    /// Iterates from the most recently pushed element to the oldest
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { next: self.head.as_deref() }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: Clone> PersistentList<T> {
    /// Copies the elements out in insertion order (oldest first)
    pub fn to_vec(&self) -> Vec<T> {
        let mut values: Vec<T> = self.iter().cloned().collect();
        values.reverse();
        values
    }
}

impl<T> Drop for PersistentList<T> {
    // unlink iteratively so long lists do not overflow the stack
    fn drop(&mut self) {
        let mut current = self.head.take();
        while let Some(node) = current {
            match Arc::try_unwrap(node) {
                Ok(mut node) => current = node.next.take(),
                Err(_) => break
            }
        }
    }
}

/// Borrowing iterator over a `PersistentList`
pub struct Iter<'l, T> {
    next: Option<&'l Node<T>>
}

impl<'l, T> Iterator for Iter<'l, T> {
    type Item = &'l T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.value
        })
    }
}
