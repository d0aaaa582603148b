//! Video-room provisioning backends.
//!
//! [`HttpRoomProvider`] talks to the external conferencing service over
//! its REST API. [`NullRoomProvider`] mints local references and is
//! used when `ROOM_PROVIDER_URL` is unset (local development, demos).

use async_trait::async_trait;
use depo_core::error::{CoreError, CoreResult};
use depo_core::store::RoomProvider;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// Room provider backed by an external HTTP conferencing service.
pub struct HttpRoomProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct CreateRoomResponse {
    room_ref: String,
}

impl HttpRoomProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RoomProvider for HttpRoomProvider {
    async fn create_room(&self, name: &str) -> CoreResult<String> {
        let url = format!("{}/rooms", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "name": name }))
            .send()
            .await
            .map_err(|e| CoreError::Internal(format!("Room provider request failed: {e}")))?
            .error_for_status()
            .map_err(|e| CoreError::Internal(format!("Room provider rejected create: {e}")))?;

        let body: CreateRoomResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("Invalid room provider response: {e}")))?;

        Ok(body.room_ref)
    }

    async fn close_room(&self, room_ref: &str) -> CoreResult<()> {
        let url = format!("{}/rooms/{room_ref}", self.base_url);
        self.client
            .delete(&url)
            .send()
            .await
            .map_err(|e| CoreError::Internal(format!("Room provider request failed: {e}")))?
            .error_for_status()
            .map_err(|e| CoreError::Internal(format!("Room provider rejected close: {e}")))?;
        Ok(())
    }
}

/// Provider that mints local references without any external calls.
pub struct NullRoomProvider;

#[async_trait]
impl RoomProvider for NullRoomProvider {
    async fn create_room(&self, name: &str) -> CoreResult<String> {
        let slug: String = name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '-' })
            .collect::<String>()
            .to_lowercase();
        Ok(format!("local-{slug}-{}", Uuid::new_v4()))
    }

    async fn close_room(&self, room_ref: &str) -> CoreResult<()> {
        tracing::debug!(room_ref, "closing local room (no-op)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_provider_refs_are_unique() {
        let provider = NullRoomProvider;
        let a = provider.create_room("Main Room").await.unwrap();
        let b = provider.create_room("Main Room").await.unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("local-main-room-"));
    }
}
