use log::{debug, info};
use reqwest::Client;
use schemars::{generate::SchemaSettings, JsonSchema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::ProviderError;
use crate::web::models::Message;

/// Outcome of a schema-constrained completion.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion<T> {
    Refusal(String),
    Parsed(T),
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    response_format: Value,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
    refusal: Option<String>,
}

// Client for an OpenAI-compatible chat completions API
pub struct CompletionProvider {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl CompletionProvider {
    pub fn new(config: &Config) -> Self {
        info!(
            "Using completion provider at {} with model {}",
            config.base_url, config.model
        );

        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client: Client::new(),
        }
    }

    pub async fn complete<T>(&self, messages: &[Message]) -> Result<Completion<T>, ProviderError>
    where
        T: JsonSchema + DeserializeOwned,
    {
        let url = format!("{}/chat/completions", self.base_url);
        let payload = CompletionRequest {
            model: &self.model,
            messages,
            response_format: response_format::<T>(),
        };

        info!(
            "Sending {} messages to completion provider (schema: {})",
            messages.len(),
            T::schema_name()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ProviderError::Status { status, body });
        }

        let response: CompletionResponse = response.json().await?;
        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(ProviderError::MissingContent)?;

        if let Some(refusal) = message.refusal {
            return Ok(Completion::Refusal(refusal));
        }

        let content = message.content.ok_or(ProviderError::MissingContent)?;
        debug!("Response content: {}", content);

        Ok(Completion::Parsed(serde_json::from_str(&content)?))
    }
}

/// `response_format` body asking for strict output matching `T`.
pub fn response_format<T: JsonSchema>() -> Value {
    let mut settings = SchemaSettings::draft2020_12();
    settings.inline_subschemas = true;
    let mut schema = Value::from(settings.into_generator().into_root_schema_for::<T>());
    make_strict(&mut schema);

    json!({
        "type": "json_schema",
        "json_schema": {
            "name": T::schema_name(),
            "strict": true,
            "schema": schema,
        }
    })
}

// Strict structured outputs require every property listed as required and
// no additional properties on any object.
fn make_strict(schema: &mut Value) {
    match schema {
        Value::Object(obj) => {
            obj.shift_remove("$schema");
            obj.shift_remove("title");
            obj.shift_remove("default");

            let required: Option<Vec<Value>> = obj
                .get("properties")
                .and_then(Value::as_object)
                .map(|props| props.keys().cloned().map(Value::String).collect());
            if let Some(required) = required {
                obj.insert("required".to_string(), Value::Array(required));
                obj.insert("additionalProperties".to_string(), Value::Bool(false));
            }

            for (key, value) in obj.iter_mut() {
                match (key.as_str(), value) {
                    ("properties", Value::Object(props)) => {
                        props.values_mut().for_each(make_strict);
                    }
                    ("required" | "enum", _) => {}
                    (_, value) => make_strict(value),
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(make_strict),
        _ => {}
    }
}
