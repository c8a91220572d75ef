use serde::Serialize;
use tracing::instrument;

use sunulek_core::error::InvalidInputError;
use sunulek_core::models::{Conversation, Count, Message, StartedConversation};
use sunulek_core::{OutboundRequest, Result};

use crate::client::ApiClient;
use crate::endpoints;

#[derive(Debug, Serialize)]
struct StartRequest<'a> {
    ad_id: u64,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    content: &'a str,
}

/// Messaging endpoints. All require a session.
#[derive(Debug, Clone, Copy)]
pub struct Conversations<'a> {
    client: &'a ApiClient,
}

impl<'a> Conversations<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Conversation>> {
        self.client.get_json(endpoints::CONVERSATIONS).await
    }

    /// A conversation with all of its messages.
    pub async fn get(&self, id: u64) -> Result<Conversation> {
        self.client.get_json(&endpoints::conversation(id)).await
    }

    /// Contact a listing's seller. Reuses the existing conversation for the
    /// listing if there is one.
    #[instrument(skip(self, message))]
    pub async fn start(&self, ad_id: u64, message: &str) -> Result<StartedConversation> {
        let message = non_empty(message)?;
        let request = OutboundRequest::post(endpoints::CONVERSATIONS_START)
            .json(&StartRequest { ad_id, message })?;
        self.client.send_json(request).await
    }

    #[instrument(skip(self, content))]
    pub async fn send(&self, id: u64, content: &str) -> Result<Message> {
        let content = non_empty(content)?;
        let request = OutboundRequest::post(endpoints::conversation_send(id))
            .json(&SendRequest { content })?;
        self.client.send_json(request).await
    }

    pub async fn unread_count(&self) -> Result<u64> {
        let count: Count = self.client.get_json(endpoints::CONVERSATIONS_UNREAD).await?;
        Ok(count.count)
    }
}

fn non_empty(text: &str) -> Result<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InvalidInputError::Other {
            message: "message must not be empty".to_string(),
        }
        .into());
    }
    Ok(text)
}
