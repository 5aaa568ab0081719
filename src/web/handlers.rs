use actix_web::{web, HttpResponse, Responder};
use log::{debug, error, info, warn};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fmt::Debug;

use crate::error::RelayError;
use crate::model::{Completion, CompletionProvider};
use crate::relay::{self, ResponseSchema};
use crate::web::models::{Annotations, ChatAnnotations, ChatRequest, ChatResponse, Message};
use crate::AppState;

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Chat API endpoint
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, RelayError> {
    let mut messages = relay::validate(req.into_inner().messages)
        .inspect_err(|e| warn!("Rejected chat request: {}", e))?;

    info!("Chat request with {} messages", messages.len());

    if data.thread_focus && relay::promote_thread_focus(&mut messages) {
        info!("Focusing response on thread starter");
    }

    let messages = relay::normalize(messages);
    debug!("Normalized messages: {:?}", messages);

    let response = match data.response_schema {
        ResponseSchema::WithChatText => {
            relay_completion::<ChatAnnotations>(&data.provider, &messages).await?
        }
        ResponseSchema::CommentsOnly => {
            relay_completion::<Annotations>(&data.provider, &messages).await?
        }
    };

    Ok(HttpResponse::Ok().json(response))
}

async fn relay_completion<T>(
    provider: &CompletionProvider,
    messages: &[Message],
) -> Result<ChatResponse, RelayError>
where
    T: JsonSchema + DeserializeOwned + Debug + Into<ChatResponse>,
{
    match provider.complete::<T>(messages).await {
        Ok(Completion::Refusal(refusal)) => {
            warn!("Completion provider refused: {}", refusal);
            Ok(ChatResponse::Refusal { refusal })
        }
        Ok(Completion::Parsed(parsed)) => {
            debug!("Parsed result: {:?}", parsed);
            Ok(parsed.into())
        }
        Err(e) => {
            error!("Model error: {}", e);
            Err(e.into())
        }
    }
}
