//! Local list state updated ahead of the store and rolled back on failure

use routebill_types::Result;

/// Copy of a list taken before an optimistic change
#[derive(Debug)]
pub struct Snapshot<T>(Vec<T>);

#[derive(Debug, Clone, Default)]
pub struct OptimisticList<T> {
    items: Vec<T>,
}

impl<T: Clone> OptimisticList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replace contents with a fresh fetch
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Mutate immediately, returning what is needed to undo
    pub fn apply(&mut self, change: impl FnOnce(&mut Vec<T>)) -> Snapshot<T> {
        let snapshot = Snapshot(self.items.clone());
        change(&mut self.items);
        snapshot
    }

    /// Mutate without keeping an undo copy (e.g. swapping in the stored record)
    pub fn settle(&mut self, change: impl FnOnce(&mut Vec<T>)) {
        change(&mut self.items);
    }

    pub fn revert(&mut self, snapshot: Snapshot<T>) {
        self.items = snapshot.0;
    }

    /// Apply `change`, run `remote`, and roll back if it fails
    pub fn run<R>(
        &mut self,
        change: impl FnOnce(&mut Vec<T>),
        remote: impl FnOnce() -> Result<R>,
    ) -> Result<R> {
        let snapshot = self.apply(change);
        match remote() {
            Ok(value) => Ok(value),
            Err(e) => {
                self.revert(snapshot);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routebill_types::{Error, StoreError};

    #[test]
    fn test_run_keeps_change_on_success() {
        let mut list = OptimisticList::new(vec![1, 2]);
        let out = list.run(|v| v.push(3), || Ok("saved"));
        assert_eq!(out.unwrap(), "saved");
        assert_eq!(list.items(), &[1, 2, 3]);
    }

    #[test]
    fn test_run_reverts_on_failure() {
        let mut list = OptimisticList::new(vec![1, 2]);
        let out: Result<()> = list.run(
            |v| v.retain(|x| *x != 1),
            || Err(Error::Store(StoreError::Transport("offline".to_string()))),
        );
        assert!(out.is_err());
        assert_eq!(list.items(), &[1, 2]);
    }
}
