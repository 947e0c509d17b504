//! Local view state: an ordered in-memory copy of one table.
//!
//! A [`LocalView`] is patched from two directions. Change-feed events
//! arrive through [`LocalView::apply`], and the view's own writes are
//! applied ahead of the server through the `*_optimistic` methods, which
//! hand back an [`OptimisticToken`] used to settle, confirm or revert the
//! edit once the remote call finishes.
//!
//! Both paths key on the record id and are idempotent, so an optimistic
//! edit and the feed's echo of the same write converge. Between two feed
//! versions of one record, the later `updated_at` wins. An optimistic
//! version carries a client-side stamp, so it never outranks the row the
//! server returns for it.

use crate::types::{RecordId, Timestamp};

/// A row that can live in a [`LocalView`].
pub trait Record: Clone {
    fn id(&self) -> RecordId;
    fn updated_at(&self) -> Timestamp;
}

/// One decoded change-feed event.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewChange<T> {
    Insert(T),
    Update(T),
    Delete(RecordId),
}

#[derive(Debug)]
enum Undo<T> {
    /// Put the previous version back.
    Restore(T),
    /// Drop a locally inserted record.
    Remove,
    /// Re-insert a locally removed record at its old position.
    Reinsert { record: T, index: usize },
}

/// Handle for one optimistic edit; consumed by `settle`, `confirm` or `revert`.
#[derive(Debug)]
#[must_use = "an optimistic edit must be confirmed or reverted"]
pub struct OptimisticToken<T> {
    id: RecordId,
    /// `updated_at` of the record as the optimistic edit left it.
    applied_stamp: Option<Timestamp>,
    undo: Undo<T>,
}

impl<T> OptimisticToken<T> {
    pub fn id(&self) -> RecordId {
        self.id
    }
}

/// Newest-first list of records.
#[derive(Debug, Clone)]
pub struct LocalView<T> {
    records: Vec<T>,
}

impl<T> Default for LocalView<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: Record> LocalView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a freshly fetched list (already newest first).
    pub fn from_records(records: Vec<T>) -> Self {
        Self { records }
    }

    pub fn replace_all(&mut self, records: Vec<T>) {
        self.records = records;
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Apply one change-feed event. Returns whether the view changed.
    pub fn apply(&mut self, change: ViewChange<T>) -> bool {
        match change {
            ViewChange::Insert(record) => match self.position(record.id()) {
                Some(idx) => self.replace_if_newer(idx, record),
                None => {
                    self.records.insert(0, record);
                    true
                }
            },
            ViewChange::Update(record) => match self.position(record.id()) {
                Some(idx) => self.replace_if_newer(idx, record),
                None => false,
            },
            ViewChange::Delete(id) => match self.position(id) {
                Some(idx) => {
                    self.records.remove(idx);
                    true
                }
                None => false,
            },
        }
    }

    fn replace_if_newer(&mut self, idx: usize, incoming: T) -> bool {
        if incoming.updated_at() >= self.records[idx].updated_at() {
            self.records[idx] = incoming;
            true
        } else {
            false
        }
    }

    /// Mutate a record in place ahead of the server.
    ///
    /// Returns `None` when the record is not in the view.
    pub fn apply_optimistic<F>(&mut self, id: RecordId, mutate: F) -> Option<OptimisticToken<T>>
    where
        F: FnOnce(&mut T),
    {
        let idx = self.position(id)?;
        let prior = self.records[idx].clone();
        mutate(&mut self.records[idx]);
        Some(OptimisticToken {
            id,
            applied_stamp: Some(self.records[idx].updated_at()),
            undo: Undo::Restore(prior),
        })
    }

    /// Prepend a record ahead of the server.
    pub fn insert_optimistic(&mut self, record: T) -> OptimisticToken<T> {
        let id = record.id();
        let applied_stamp = Some(record.updated_at());
        self.apply(ViewChange::Insert(record));
        OptimisticToken {
            id,
            applied_stamp,
            undo: Undo::Remove,
        }
    }

    /// Remove a record ahead of the server.
    pub fn remove_optimistic(&mut self, id: RecordId) -> Option<OptimisticToken<T>> {
        let index = self.position(id)?;
        let record = self.records.remove(index);
        Some(OptimisticToken {
            id,
            applied_stamp: None,
            undo: Undo::Reinsert { record, index },
        })
    }

    /// The remote write succeeded and returned `confirmed`; it replaces the
    /// optimistic version whatever the two stamps say.
    ///
    /// Only a newer version from the feed that already replaced the
    /// optimistic one is kept. A record deleted in the meantime stays
    /// deleted. Returns whether the view changed.
    pub fn settle(&mut self, token: OptimisticToken<T>, confirmed: T) -> bool {
        let Some(idx) = self.position(token.id) else {
            return false;
        };
        let current = self.records[idx].updated_at();
        let superseded = token.applied_stamp.is_some_and(|stamp| current > stamp);
        if superseded && current > confirmed.updated_at() {
            return false;
        }
        self.records[idx] = confirmed;
        true
    }

    /// The remote write succeeded with nothing to reconcile; forget the
    /// undo information.
    pub fn confirm(&mut self, _token: OptimisticToken<T>) {}

    /// The remote write failed; undo the optimistic edit.
    ///
    /// A version newer than the optimistic one (a confirmed write from
    /// the feed) is left in place. Returns whether the view changed.
    pub fn revert(&mut self, token: OptimisticToken<T>) -> bool {
        let superseded = |current: &T| {
            token
                .applied_stamp
                .is_some_and(|stamp| current.updated_at() > stamp)
        };

        match token.undo {
            Undo::Restore(prior) => match self.position(token.id) {
                Some(idx) if !superseded(&self.records[idx]) => {
                    self.records[idx] = prior;
                    true
                }
                _ => false,
            },
            Undo::Remove => match self.position(token.id) {
                Some(idx) if !superseded(&self.records[idx]) => {
                    self.records.remove(idx);
                    true
                }
                _ => false,
            },
            Undo::Reinsert { record, index } => {
                if self.position(token.id).is_some() {
                    return false;
                }
                let index = index.min(self.records.len());
                self.records.insert(index, record);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: RecordId,
        title: String,
        updated_at: Timestamp,
    }

    impl Record for Row {
        fn id(&self) -> RecordId {
            self.id
        }
        fn updated_at(&self) -> Timestamp {
            self.updated_at
        }
    }

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    fn row(title: &str) -> Row {
        Row {
            id: Uuid::now_v7(),
            title: title.to_string(),
            updated_at: t0(),
        }
    }

    fn bumped(r: &Row, title: &str, secs: i64) -> Row {
        Row {
            id: r.id,
            title: title.to_string(),
            updated_at: r.updated_at + Duration::seconds(secs),
        }
    }

    fn titles(view: &LocalView<Row>) -> Vec<&str> {
        view.records().iter().map(|r| r.title.as_str()).collect()
    }

    // -- apply ----------------------------------------------------------------

    #[test]
    fn insert_prepends() {
        let mut view = LocalView::from_records(vec![row("old")]);
        assert!(view.apply(ViewChange::Insert(row("new"))));
        assert_eq!(titles(&view), vec!["new", "old"]);
    }

    #[test]
    fn insert_is_idempotent() {
        let r = row("a");
        let mut view = LocalView::new();
        view.apply(ViewChange::Insert(r.clone()));
        view.apply(ViewChange::Insert(r));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn update_replaces_by_id() {
        let a = row("a");
        let b = row("b");
        let mut view = LocalView::from_records(vec![a.clone(), b]);
        assert!(view.apply(ViewChange::Update(bumped(&a, "a2", 5))));
        assert_eq!(titles(&view), vec!["a2", "b"]);
    }

    #[test]
    fn stale_update_ignored() {
        let a = row("a");
        let mut view = LocalView::from_records(vec![bumped(&a, "fresh", 10)]);
        assert!(!view.apply(ViewChange::Update(bumped(&a, "stale", 5))));
        assert_eq!(titles(&view), vec!["fresh"]);
    }

    #[test]
    fn update_for_unknown_id_ignored() {
        let mut view: LocalView<Row> = LocalView::new();
        assert!(!view.apply(ViewChange::Update(row("ghost"))));
        assert!(view.is_empty());
    }

    #[test]
    fn delete_removes_and_is_idempotent() {
        let a = row("a");
        let mut view = LocalView::from_records(vec![a.clone()]);
        assert!(view.apply(ViewChange::Delete(a.id)));
        assert!(!view.apply(ViewChange::Delete(a.id)));
        assert!(view.is_empty());
    }

    // -- optimistic -----------------------------------------------------------

    #[test]
    fn revert_restores_prior_value() {
        let a = row("a");
        let mut view = LocalView::from_records(vec![a.clone()]);
        let token = view
            .apply_optimistic(a.id, |r| r.title = "edited".into())
            .unwrap();
        assert_eq!(titles(&view), vec!["edited"]);

        assert!(view.revert(token));
        assert_eq!(view.get(a.id), Some(&a));
    }

    #[test]
    fn confirm_keeps_optimistic_value() {
        let a = row("a");
        let mut view = LocalView::from_records(vec![a.clone()]);
        let token = view
            .apply_optimistic(a.id, |r| r.title = "edited".into())
            .unwrap();
        view.confirm(token);
        assert_eq!(titles(&view), vec!["edited"]);
    }

    #[test]
    fn revert_skips_when_newer_write_landed() {
        let a = row("a");
        let mut view = LocalView::from_records(vec![a.clone()]);
        let token = view
            .apply_optimistic(a.id, |r| r.title = "mine".into())
            .unwrap();
        view.apply(ViewChange::Update(bumped(&a, "theirs", 30)));

        assert!(!view.revert(token));
        assert_eq!(titles(&view), vec!["theirs"]);
    }

    #[test]
    fn optimistic_insert_then_echo_converges() {
        let a = row("a");
        let mut view = LocalView::new();
        let token = view.insert_optimistic(a.clone());
        view.apply(ViewChange::Insert(bumped(&a, "a", 1)));
        view.confirm(token);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn settle_replaces_draft_stamped_ahead_of_server() {
        let a = row("a");
        let mut view = LocalView::new();
        let draft = bumped(&a, "draft", 3);
        let token = view.insert_optimistic(draft);

        // The server stamped the row earlier than the client clock did.
        assert!(view.settle(token, bumped(&a, "server title", 0)));
        assert_eq!(titles(&view), vec!["server title"]);
    }

    #[test]
    fn settle_keeps_newer_feed_version() {
        let a = row("a");
        let mut view = LocalView::from_records(vec![a.clone()]);
        let token = view
            .apply_optimistic(a.id, |r| r.title = "mine".into())
            .unwrap();
        view.apply(ViewChange::Update(bumped(&a, "later edit", 30)));

        assert!(!view.settle(token, bumped(&a, "mine", 10)));
        assert_eq!(titles(&view), vec!["later edit"]);
    }

    #[test]
    fn settle_after_feed_delete_does_not_resurrect() {
        let a = row("a");
        let mut view = LocalView::from_records(vec![a.clone()]);
        let token = view
            .apply_optimistic(a.id, |r| r.title = "mine".into())
            .unwrap();
        view.apply(ViewChange::Delete(a.id));

        assert!(!view.settle(token, bumped(&a, "mine", 1)));
        assert!(view.is_empty());
    }

    #[test]
    fn optimistic_insert_reverted_is_removed() {
        let mut view = LocalView::from_records(vec![row("kept")]);
        let token = view.insert_optimistic(row("temp"));
        assert_eq!(view.len(), 2);
        assert!(view.revert(token));
        assert_eq!(titles(&view), vec!["kept"]);
    }

    #[test]
    fn optimistic_remove_reverted_returns_to_position() {
        let (a, b, c) = (row("a"), row("b"), row("c"));
        let mut view = LocalView::from_records(vec![a, b.clone(), c]);
        let token = view.remove_optimistic(b.id).unwrap();
        assert_eq!(titles(&view), vec!["a", "c"]);
        assert!(view.revert(token));
        assert_eq!(titles(&view), vec!["a", "b", "c"]);
    }

    #[test]
    fn optimistic_on_missing_record_returns_none() {
        let mut view: LocalView<Row> = LocalView::new();
        assert!(view.apply_optimistic(Uuid::now_v7(), |_| {}).is_none());
        assert!(view.remove_optimistic(Uuid::now_v7()).is_none());
    }
}
