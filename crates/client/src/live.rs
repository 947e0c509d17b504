//! A [`LocalView`] kept in sync with the server.
//!
//! The collection is filled from a REST fetch, then patched by change-feed
//! events for its table and by the caller's own optimistic writes. A
//! failed remote write reverts its optimistic edit.

use std::future::Future;

use helm_core::realtime::{ChangeOp, ServerMessage};
use helm_core::records::RecordKind;
use helm_core::types::RecordId;
use helm_core::view::{LocalView, Record, ViewChange};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

pub struct LiveCollection<T> {
    kind: RecordKind,
    view: LocalView<T>,
}

impl<T> LiveCollection<T>
where
    T: Record + DeserializeOwned,
{
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            view: LocalView::new(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn records(&self) -> &[T] {
        self.view.records()
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.view.get(id)
    }

    /// Replace the contents with the result of `fetch`.
    ///
    /// On error the previous contents are kept.
    pub async fn mount<F, Fut>(&mut self, fetch: F) -> Result<usize, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, ClientError>>,
    {
        let records = fetch().await?;
        let count = records.len();
        self.view.replace_all(records);
        tracing::debug!(table = %self.kind, count, "Mounted live collection");
        Ok(count)
    }

    /// Apply one feed message. Messages for other tables are ignored.
    ///
    /// Returns whether the view changed.
    pub fn apply_message(&mut self, msg: &ServerMessage) -> Result<bool, ClientError> {
        let ServerMessage::Change {
            table, event, new, ..
        } = msg
        else {
            return Ok(false);
        };
        if *table != self.kind {
            return Ok(false);
        }

        let change = match event {
            ChangeOp::Insert => ViewChange::Insert(decode_row(new.as_ref())?),
            ChangeOp::Update => ViewChange::Update(decode_row(new.as_ref())?),
            ChangeOp::Delete => {
                let id = msg
                    .record_id()
                    .ok_or_else(|| ClientError::Protocol("delete event without id".into()))?;
                ViewChange::Delete(id)
            }
        };
        Ok(self.view.apply(change))
    }

    /// Mutate a record locally, then run `remote`.
    ///
    /// On success the server's row replaces the local edit. On failure the
    /// edit is reverted and the error returned. Returns `Ok(None)` without
    /// calling `remote` when the record is not in the view.
    pub async fn update_optimistic<M, F, Fut>(
        &mut self,
        id: RecordId,
        mutate: M,
        remote: F,
    ) -> Result<Option<T>, ClientError>
    where
        M: FnOnce(&mut T),
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let Some(token) = self.view.apply_optimistic(id, mutate) else {
            return Ok(None);
        };
        match remote().await {
            Ok(row) => {
                self.view.settle(token, row.clone());
                Ok(Some(row))
            }
            Err(e) => {
                tracing::warn!(table = %self.kind, %id, error = %e, "Optimistic update reverted");
                self.view.revert(token);
                Err(e)
            }
        }
    }

    /// Show `record` immediately, then create it remotely.
    ///
    /// The caller mints the id so the feed's echo lands on the same row.
    pub async fn insert_optimistic<F, Fut>(
        &mut self,
        record: T,
        remote: F,
    ) -> Result<T, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let token = self.view.insert_optimistic(record);
        match remote().await {
            Ok(row) => {
                self.view.settle(token, row.clone());
                Ok(row)
            }
            Err(e) => {
                tracing::warn!(table = %self.kind, error = %e, "Optimistic insert reverted");
                self.view.revert(token);
                Err(e)
            }
        }
    }

    /// Hide a record immediately, then delete it remotely.
    pub async fn remove_optimistic<F, Fut>(
        &mut self,
        id: RecordId,
        remote: F,
    ) -> Result<bool, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ClientError>>,
    {
        let Some(token) = self.view.remove_optimistic(id) else {
            return Ok(false);
        };
        match remote().await {
            Ok(()) => {
                self.view.confirm(token);
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(table = %self.kind, %id, error = %e, "Optimistic delete reverted");
                self.view.revert(token);
                Err(e)
            }
        }
    }
}

fn decode_row<T: DeserializeOwned>(row: Option<&Value>) -> Result<T, ClientError> {
    let row = row.ok_or_else(|| ClientError::Protocol("change event without row".into()))?;
    serde_json::from_value(row.clone())
        .map_err(|e| ClientError::Protocol(format!("undecodable row: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};
    use helm_db::models::idea::Idea;
    use uuid::Uuid;

    fn idea(title: &str) -> Idea {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        Idea {
            id: Uuid::now_v7(),
            user_id: Uuid::nil(),
            title: title.to_string(),
            description: None,
            tags: vec![],
            status: "captured".to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    fn change(
        table: RecordKind,
        event: ChangeOp,
        new: Option<&Idea>,
        old: Option<Value>,
    ) -> ServerMessage {
        ServerMessage::Change {
            table,
            event,
            new: new.map(|row| serde_json::to_value(row).unwrap()),
            old,
            commit_timestamp: Utc::now(),
        }
    }

    fn server_error() -> ClientError {
        ClientError::Api {
            status: 500,
            code: "INTERNAL_ERROR".into(),
            message: "boom".into(),
        }
    }

    async fn mounted(rows: Vec<Idea>) -> LiveCollection<Idea> {
        let mut live = LiveCollection::new(RecordKind::Idea);
        live.mount(|| async { Ok(rows) }).await.unwrap();
        live
    }

    // -- feed -----------------------------------------------------------------

    #[tokio::test]
    async fn feed_insert_update_delete() {
        let a = idea("a");
        let mut live = mounted(vec![]).await;

        let insert = change(RecordKind::Idea, ChangeOp::Insert, Some(&a), None);
        assert!(live.apply_message(&insert).unwrap());
        assert_eq!(live.records().len(), 1);

        let mut edited = a.clone();
        edited.title = "a2".into();
        edited.updated_at = a.updated_at + Duration::seconds(1);
        let update = change(RecordKind::Idea, ChangeOp::Update, Some(&edited), None);
        assert!(live.apply_message(&update).unwrap());
        assert_eq!(live.get(a.id).unwrap().title, "a2");

        let old = serde_json::json!({ "id": a.id });
        let delete = change(RecordKind::Idea, ChangeOp::Delete, None, Some(old));
        assert!(live.apply_message(&delete).unwrap());
        assert!(live.records().is_empty());
    }

    #[tokio::test]
    async fn other_tables_and_acks_ignored() {
        let mut live = mounted(vec![]).await;
        let msg = change(RecordKind::Initiative, ChangeOp::Insert, Some(&idea("x")), None);
        assert!(!live.apply_message(&msg).unwrap());
        assert!(!live.apply_message(&ServerMessage::Pong).unwrap());
        assert!(live.records().is_empty());
    }

    #[tokio::test]
    async fn undecodable_row_is_protocol_error() {
        let mut live = mounted(vec![]).await;
        let msg = ServerMessage::Change {
            table: RecordKind::Idea,
            event: ChangeOp::Insert,
            new: Some(serde_json::json!({ "id": "not-a-uuid" })),
            old: None,
            commit_timestamp: Utc::now(),
        };
        assert_matches!(live.apply_message(&msg), Err(ClientError::Protocol(_)));
    }

    // -- mount ----------------------------------------------------------------

    #[tokio::test]
    async fn failed_mount_keeps_previous_rows() {
        let mut live = mounted(vec![idea("kept")]).await;
        let res = live.mount(|| async { Err(server_error()) }).await;
        assert!(res.is_err());
        assert_eq!(live.records()[0].title, "kept");
    }

    // -- optimistic -----------------------------------------------------------

    #[tokio::test]
    async fn update_uses_server_row_on_success() {
        let a = idea("a");
        let mut live = mounted(vec![a.clone()]).await;
        let mut server_row = a.clone();
        server_row.title = "from server".into();
        server_row.updated_at = a.updated_at + Duration::seconds(2);

        let res = live
            .update_optimistic(a.id, |r| r.title = "local".into(), || async { Ok(server_row) })
            .await
            .unwrap();
        assert_eq!(res.unwrap().title, "from server");
        assert_eq!(live.get(a.id).unwrap().title, "from server");
    }

    #[tokio::test]
    async fn server_row_wins_over_draft_from_fast_client_clock() {
        let a = idea("a");
        let mut live = mounted(vec![]).await;
        let mut draft = a.clone();
        draft.title = "draft".into();
        draft.updated_at = a.updated_at + Duration::seconds(3);
        let mut server_row = a.clone();
        server_row.title = "server title".into();

        let echo = server_row.clone();
        live.insert_optimistic(draft, || async { Ok(server_row) })
            .await
            .unwrap();
        assert_eq!(live.get(a.id).unwrap().title, "server title");

        live.apply_message(&change(RecordKind::Idea, ChangeOp::Insert, Some(&echo), None))
            .unwrap();
        assert_eq!(live.records().len(), 1);
        assert_eq!(live.get(a.id).unwrap().updated_at, a.updated_at);
    }

    #[tokio::test]
    async fn update_keeps_server_row_stamped_before_local_edit() {
        let a = idea("a");
        let mut live = mounted(vec![a.clone()]).await;
        let mut server_row = a.clone();
        server_row.title = "from server".into();
        server_row.updated_at = a.updated_at + Duration::seconds(1);

        let local_stamp = a.updated_at + Duration::seconds(5);
        live.update_optimistic(
            a.id,
            |r| {
                r.title = "local".into();
                r.updated_at = local_stamp;
            },
            || async { Ok(server_row) },
        )
        .await
        .unwrap();
        assert_eq!(live.get(a.id).unwrap().title, "from server");
    }

    #[tokio::test]
    async fn update_reverts_on_failure() {
        let a = idea("a");
        let mut live = mounted(vec![a.clone()]).await;
        let res = live
            .update_optimistic(
                a.id,
                |r| r.status = "archived".into(),
                || async { Err(server_error()) },
            )
            .await;
        assert!(res.is_err());
        assert_eq!(live.get(a.id).unwrap().status, "captured");
    }

    #[tokio::test]
    async fn update_of_missing_record_skips_remote() {
        let mut live = mounted(vec![]).await;
        let res = live
            .update_optimistic(Uuid::now_v7(), |_| {}, || async { Err(server_error()) })
            .await
            .unwrap();
        assert!(res.is_none());
    }

    #[tokio::test]
    async fn insert_then_feed_echo_keeps_one_row() {
        let a = idea("a");
        let mut live = mounted(vec![]).await;
        let echo = a.clone();
        live.insert_optimistic(a.clone(), || async { Ok(a.clone()) })
            .await
            .unwrap();
        live.apply_message(&change(RecordKind::Idea, ChangeOp::Insert, Some(&echo), None))
            .unwrap();
        assert_eq!(live.records().len(), 1);
    }

    #[tokio::test]
    async fn failed_insert_is_removed() {
        let mut live = mounted(vec![]).await;
        let res = live
            .insert_optimistic(idea("temp"), || async { Err(server_error()) })
            .await;
        assert!(res.is_err());
        assert!(live.records().is_empty());
    }

    #[tokio::test]
    async fn failed_remove_restores_row() {
        let a = idea("a");
        let mut live = mounted(vec![a.clone()]).await;
        let res = live.remove_optimistic(a.id, || async { Err(server_error()) }).await;
        assert!(res.is_err());
        assert!(live.get(a.id).is_some());

        assert!(live.remove_optimistic(a.id, || async { Ok(()) }).await.unwrap());
        assert!(live.get(a.id).is_none());
    }
}
