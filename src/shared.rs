use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Reference-shared mutable cell. Cloning shares the underlying value, so a
/// container bound to two names is mutated through either of them.
pub struct SharedMut<T>(Arc<RwLock<T>>);

impl<T> SharedMut<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.0.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    pub fn write<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Identity of the shared cell, stable for as long as any clone lives.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T: Clone> SharedMut<T> {
    pub fn snapshot(&self) -> T {
        self.read(T::clone)
    }
}

impl<T> Clone for SharedMut<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

thread_local! {
    static DEBUGGING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

impl<T: fmt::Debug> fmt::Debug for SharedMut<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let addr = self.addr();
        if DEBUGGING.with(|active| active.borrow().contains(&addr)) {
            return f.write_str("SharedMut(..)");
        }
        DEBUGGING.with(|active| active.borrow_mut().push(addr));
        let result = self.read(|inner| f.debug_tuple("SharedMut").field(inner).finish());
        DEBUGGING.with(|active| active.borrow_mut().retain(|entry| *entry != addr));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::SharedMut;

    #[test]
    fn clones_share_the_same_value() {
        let list = SharedMut::new(vec![1, 2]);
        let alias = list.clone();
        alias.write(|items| items.push(3));

        assert_eq!(list.snapshot(), vec![1, 2, 3]);
        assert!(list.ptr_eq(&alias));
    }
}
