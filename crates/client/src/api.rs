//! Typed wrapper over the Helm REST API.
//!
//! Every call sends the bearer token, unwraps the `{ "data": ... }`
//! envelope and turns non-2xx answers into [`ClientError::Api`] with the
//! server's error code.

use helm_core::analytics::{AnalyticsReport, TimeRange};
use helm_core::initiatives::QuadrantBucket;
use helm_core::journal::MonthGroup;
use helm_core::types::{RecordId, Timestamp};
use helm_core::vision::VisionContent;
use helm_db::models::idea::{CreateIdea, Idea, PromoteIdea, UpdateIdea, UpdateIdeaStatus};
use helm_db::models::initiative::{
    CreateInitiative, Initiative, MatrixPoint, UpdateInitiative, UpdateInitiativeStatus,
};
use helm_db::models::log_entry::{CreateLogEntry, LogEntry, UpdateLogEntry};
use helm_db::models::vision::{
    CreateVisionChat, UpsertVisionDocument, VisionChat, VisionDocument,
};
use helm_db::models::work_session::{StartWorkSession, WorkSession};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;
use crate::types::{
    Envelope, ErrorBody, Health, IdeaStatusCounts, Promotion, SessionTimer, StoredObject,
    TodaySummary, VisionChatRequest,
};

/// HTTP client bound to one server and one user token.
#[derive(Clone)]
pub struct HelmApi {
    client: Client,
    /// Server origin, e.g. `http://localhost:3000`.
    base_url: String,
    token: Option<String>,
}

impl HelmApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Build with an existing `reqwest::Client` (e.g. with custom timeouts).
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let request = self.client.get(self.url(path)).query(query);
        let response = self.authorized(request).send().await?;
        Self::parse_response(response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.client.request(method, self.url(path)).json(body);
        let response = self.authorized(request).send().await?;
        Self::parse_response(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.client.post(self.url(path));
        let response = self.authorized(request).send().await?;
        Self::parse_response(response).await
    }

    async fn delete_path(&self, path: &str) -> Result<(), ClientError> {
        let request = self.client.delete(self.url(path));
        let response = self.authorized(request).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    // -- Health ---------------------------------------------------------------

    /// `GET /health` (outside the `/api/v1` prefix).
    pub async fn health(&self) -> Result<Health, ClientError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }

    // -- Ideas ----------------------------------------------------------------

    /// `status` is one of `all`, `captured`, `explored`, `archived`.
    pub async fn list_ideas(&self, status: Option<&str>) -> Result<Vec<Idea>, ClientError> {
        let query: Vec<(&str, String)> = status
            .map(|s| vec![("status", s.to_string())])
            .unwrap_or_default();
        self.get_data("/ideas", &query).await
    }

    pub async fn idea_counts(&self) -> Result<IdeaStatusCounts, ClientError> {
        self.get_data("/ideas/counts", &[]).await
    }

    pub async fn create_idea(&self, input: &CreateIdea) -> Result<Idea, ClientError> {
        self.send_json(reqwest::Method::POST, "/ideas", input).await
    }

    pub async fn get_idea(&self, id: RecordId) -> Result<Idea, ClientError> {
        self.get_data(&format!("/ideas/{id}"), &[]).await
    }

    pub async fn update_idea(&self, id: RecordId, input: &UpdateIdea) -> Result<Idea, ClientError> {
        self.send_json(reqwest::Method::PUT, &format!("/ideas/{id}"), input)
            .await
    }

    pub async fn set_idea_status(&self, id: RecordId, status: &str) -> Result<Idea, ClientError> {
        let body = UpdateIdeaStatus {
            status: status.to_string(),
        };
        self.send_json(reqwest::Method::PATCH, &format!("/ideas/{id}/status"), &body)
            .await
    }

    pub async fn delete_idea(&self, id: RecordId) -> Result<(), ClientError> {
        self.delete_path(&format!("/ideas/{id}")).await
    }

    pub async fn promote_idea(
        &self,
        id: RecordId,
        input: &PromoteIdea,
    ) -> Result<Promotion, ClientError> {
        self.send_json(reqwest::Method::POST, &format!("/ideas/{id}/promote"), input)
            .await
    }

    // -- Vision ---------------------------------------------------------------

    pub async fn get_vision(&self) -> Result<Option<VisionDocument>, ClientError> {
        self.get_data("/vision", &[]).await
    }

    pub async fn save_vision(
        &self,
        content: &VisionContent,
    ) -> Result<VisionDocument, ClientError> {
        let body = UpsertVisionDocument {
            content: content.clone(),
        };
        self.send_json(reqwest::Method::PUT, "/vision", &body).await
    }

    pub async fn list_chats(&self, limit: Option<i64>) -> Result<Vec<VisionChat>, ClientError> {
        let query: Vec<(&str, String)> = limit
            .map(|l| vec![("limit", l.to_string())])
            .unwrap_or_default();
        self.get_data("/vision/chats", &query).await
    }

    pub async fn send_chat(&self, input: &CreateVisionChat) -> Result<VisionChat, ClientError> {
        self.send_json(reqwest::Method::POST, "/vision/chats", input)
            .await
    }

    pub async fn delete_chat(&self, id: RecordId) -> Result<(), ClientError> {
        self.delete_path(&format!("/vision/chats/{id}")).await
    }

    // -- Initiatives ----------------------------------------------------------

    pub async fn list_initiatives(
        &self,
        include_archived: bool,
    ) -> Result<Vec<Initiative>, ClientError> {
        let query = [("include_archived", include_archived.to_string())];
        self.get_data("/initiatives", &query).await
    }

    pub async fn initiative_matrix(&self) -> Result<Vec<QuadrantBucket<MatrixPoint>>, ClientError> {
        self.get_data("/initiatives/matrix", &[]).await
    }

    pub async fn create_initiative(
        &self,
        input: &CreateInitiative,
    ) -> Result<Initiative, ClientError> {
        self.send_json(reqwest::Method::POST, "/initiatives", input)
            .await
    }

    pub async fn get_initiative(&self, id: RecordId) -> Result<Initiative, ClientError> {
        self.get_data(&format!("/initiatives/{id}"), &[]).await
    }

    pub async fn update_initiative(
        &self,
        id: RecordId,
        input: &UpdateInitiative,
    ) -> Result<Initiative, ClientError> {
        self.send_json(reqwest::Method::PUT, &format!("/initiatives/{id}"), input)
            .await
    }

    pub async fn set_initiative_status(
        &self,
        id: RecordId,
        status: &str,
    ) -> Result<Initiative, ClientError> {
        let body = UpdateInitiativeStatus {
            status: status.to_string(),
        };
        self.send_json(
            reqwest::Method::PATCH,
            &format!("/initiatives/{id}/status"),
            &body,
        )
        .await
    }

    pub async fn delete_initiative(&self, id: RecordId) -> Result<(), ClientError> {
        self.delete_path(&format!("/initiatives/{id}")).await
    }

    // -- Work sessions --------------------------------------------------------

    pub async fn list_sessions(
        &self,
        since: Option<Timestamp>,
    ) -> Result<Vec<WorkSession>, ClientError> {
        let query: Vec<(&str, String)> = since
            .map(|s| vec![("since", s.to_rfc3339())])
            .unwrap_or_default();
        self.get_data("/sessions", &query).await
    }

    pub async fn start_session(
        &self,
        input: &StartWorkSession,
    ) -> Result<WorkSession, ClientError> {
        self.send_json(reqwest::Method::POST, "/sessions", input)
            .await
    }

    pub async fn active_session(&self) -> Result<Option<WorkSession>, ClientError> {
        self.get_data("/sessions/active", &[]).await
    }

    pub async fn get_session(&self, id: RecordId) -> Result<WorkSession, ClientError> {
        self.get_data(&format!("/sessions/{id}"), &[]).await
    }

    pub async fn complete_session(&self, id: RecordId) -> Result<WorkSession, ClientError> {
        self.post_empty(&format!("/sessions/{id}/complete")).await
    }

    pub async fn pause_session(&self, id: RecordId) -> Result<WorkSession, ClientError> {
        self.post_empty(&format!("/sessions/{id}/pause")).await
    }

    pub async fn delete_session(&self, id: RecordId) -> Result<(), ClientError> {
        self.delete_path(&format!("/sessions/{id}")).await
    }

    pub async fn session_timer(&self, id: RecordId) -> Result<SessionTimer, ClientError> {
        self.get_data(&format!("/sessions/{id}/timer"), &[]).await
    }

    pub async fn sessions_today(
        &self,
        tz_offset_minutes: i32,
    ) -> Result<TodaySummary, ClientError> {
        let query = [("tz_offset_minutes", tz_offset_minutes.to_string())];
        self.get_data("/sessions/today", &query).await
    }

    // -- Log entries ----------------------------------------------------------

    pub async fn list_log_entries(&self, limit: Option<i64>) -> Result<Vec<LogEntry>, ClientError> {
        let query: Vec<(&str, String)> = limit
            .map(|l| vec![("limit", l.to_string())])
            .unwrap_or_default();
        self.get_data("/log-entries", &query).await
    }

    pub async fn create_log_entry(&self, input: &CreateLogEntry) -> Result<LogEntry, ClientError> {
        self.send_json(reqwest::Method::POST, "/log-entries", input)
            .await
    }

    pub async fn todays_log(
        &self,
        tz_offset_minutes: i32,
    ) -> Result<Option<LogEntry>, ClientError> {
        let query = [("tz_offset_minutes", tz_offset_minutes.to_string())];
        self.get_data("/log-entries/today", &query).await
    }

    pub async fn log_history(
        &self,
        tz_offset_minutes: i32,
    ) -> Result<Vec<MonthGroup<LogEntry>>, ClientError> {
        let query = [("tz_offset_minutes", tz_offset_minutes.to_string())];
        self.get_data("/log-entries/history", &query).await
    }

    pub async fn get_log_entry(&self, id: RecordId) -> Result<LogEntry, ClientError> {
        self.get_data(&format!("/log-entries/{id}"), &[]).await
    }

    pub async fn update_log_entry(
        &self,
        id: RecordId,
        input: &UpdateLogEntry,
    ) -> Result<LogEntry, ClientError> {
        self.send_json(reqwest::Method::PUT, &format!("/log-entries/{id}"), input)
            .await
    }

    pub async fn delete_log_entry(&self, id: RecordId) -> Result<(), ClientError> {
        self.delete_path(&format!("/log-entries/{id}")).await
    }

    // -- Storage --------------------------------------------------------------

    /// Upload one recorded clip as the multipart `file` field.
    pub async fn upload_voice_log(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject, ClientError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_type)?;
        let form = Form::new().part("file", part);
        let request = self
            .client
            .post(self.url("/storage/voice-logs"))
            .multipart(form);
        let response = self.authorized(request).send().await?;
        Self::parse_response(response).await
    }

    // -- Functions ------------------------------------------------------------

    pub async fn ask_vision_assistant(
        &self,
        request: &VisionChatRequest,
    ) -> Result<VisionChat, ClientError> {
        self.send_json(reqwest::Method::POST, "/functions/vision-chat", request)
            .await
    }

    /// Have the server transcribe an uploaded clip into today's log entry.
    pub async fn transcribe_log(&self, audio_url: &str) -> Result<LogEntry, ClientError> {
        let body = serde_json::json!({ "audio_url": audio_url });
        self.send_json(reqwest::Method::POST, "/functions/transcribe-log", &body)
            .await
    }

    // -- Analytics ------------------------------------------------------------

    pub async fn analytics(
        &self,
        range: TimeRange,
        tz_offset_minutes: i32,
    ) -> Result<AnalyticsReport, ClientError> {
        let query = [
            ("range", range.as_str().to_string()),
            ("tz_offset_minutes", tz_offset_minutes.to_string()),
        ];
        self.get_data("/analytics", &query).await
    }

    // -- Response handling ----------------------------------------------------

    /// Return the response untouched on 2xx, else decode the error body.
    async fn ensure_success(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(api_error(status.as_u16(), &body))
    }

    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }
}

/// Decode `{ "error", "code" }`, falling back to the raw body.
fn api_error(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => ClientError::Api {
            status,
            code: parsed.code,
            message: parsed.error,
        },
        Err(_) => ClientError::Api {
            status,
            code: String::new(),
            message: body.to_string(),
        },
    }
}
