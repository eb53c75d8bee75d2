//! The streaming bridge to the AI assistant.
//!
//! The assistant is an OpenAI-compatible chat completion endpoint. A
//! question is sent together with a compact plain-text summary of the
//! user's finances, and the answer arrives as a stream of text chunks
//! over a channel. Dropping the receiving end cancels the stream; the
//! background task notices the closed channel and stops reading from
//! the provider.

use std::{env, sync::Arc};

use serde_json::{Value, json};
use tokio::sync::mpsc;

use crate::{
    Error,
    dashboard::total_balance,
    hub::Snapshot,
    models::TransactionKind,
    settings::{Currency, Language, format_currency, translate},
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// How the assistant provider is reached.
#[derive(Debug, Clone)]
struct AssistantConfig {
    base_url: String,
    api_key: String,
    model: String,
}

/// One event on an answer stream.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantEvent {
    /// The next piece of the answer text.
    Chunk(String),
    /// The stream failed. The message is safe to show to the user; the
    /// provider detail has already been logged.
    Error(String),
    /// The stream ended. Sent exactly once, after all other events.
    Done,
}

/// A client for the assistant provider.
///
/// Cloning is cheap; clones share the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    config: Arc<AssistantConfig>,
}

impl AssistantClient {
    /// Build a client from the `AI_API_KEY`, `AI_BASE_URL` and
    /// `AI_MODEL` environment variables.
    ///
    /// Returns `None` when `AI_API_KEY` is unset, in which case the
    /// assistant surface reports itself as unavailable rather than
    /// failing requests one by one.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("AI_API_KEY").ok()?;

        let config = AssistantConfig {
            base_url: env::var("AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
            api_key,
            model: env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned()),
        };

        Some(Self {
            http: reqwest::Client::new(),
            config: Arc::new(config),
        })
    }

    /// Ask the assistant `question` against `context` and stream the
    /// answer.
    ///
    /// The returned channel yields zero or more [AssistantEvent::Chunk]
    /// events, at most one [AssistantEvent::Error], and always ends
    /// with [AssistantEvent::Done]. Drop the receiver to cancel.
    pub fn stream_insight(
        &self,
        question: String,
        context: String,
        language: Language,
    ) -> mpsc::Receiver<AssistantEvent> {
        let (sender, receiver) = mpsc::channel(16);
        let client = self.clone();

        tokio::spawn(async move {
            if let Err(error) = client
                .run_stream(question, context, language, &sender)
                .await
            {
                tracing::error!("assistant stream failed: {error}");
                let _ = sender
                    .send(AssistantEvent::Error(translate(
                        language,
                        "ai.connectionError",
                        &[],
                    )))
                    .await;
            }

            let _ = sender.send(AssistantEvent::Done).await;
        });

        receiver
    }

    async fn run_stream(
        &self,
        question: String,
        context: String,
        language: Language,
        sender: &mpsc::Sender<AssistantEvent>,
    ) -> Result<(), Error> {
        let body = json!({
            "model": self.config.model,
            "stream": true,
            "messages": [
                { "role": "system", "content": system_instruction(language) },
                { "role": "user", "content": format!("{context}\n\n{question}") },
            ],
        });

        let mut response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| Error::AssistantStream(error.to_string()))?;

        let mut buffer = String::new();

        while let Some(bytes) = response
            .chunk()
            .await
            .map_err(|error| Error::AssistantStream(error.to_string()))?
        {
            buffer.push_str(&String::from_utf8_lossy(&bytes));

            while let Some(newline) = buffer.find('\n') {
                let line = buffer[..newline].trim().to_owned();
                buffer.drain(..=newline);

                match parse_stream_line(&line)? {
                    StreamLine::Text(text) => {
                        // A closed channel means the caller went away.
                        if sender.send(AssistantEvent::Chunk(text)).await.is_err() {
                            return Ok(());
                        }
                    }
                    StreamLine::Finished => return Ok(()),
                    StreamLine::Ignored => {}
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum StreamLine {
    Text(String),
    Finished,
    Ignored,
}

/// Interpret one line of the provider's server-sent event stream.
fn parse_stream_line(line: &str) -> Result<StreamLine, Error> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(StreamLine::Ignored);
    };
    let data = data.trim();

    if data == "[DONE]" {
        return Ok(StreamLine::Finished);
    }

    let payload: Value = serde_json::from_str(data)
        .map_err(|error| Error::AssistantStream(format!("malformed stream payload: {error}")))?;

    // Deltas without content (role announcements, finish markers) are
    // part of the protocol and carry no text.
    match payload
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
    {
        Some(text) => Ok(StreamLine::Text(text.to_owned())),
        None => Ok(StreamLine::Ignored),
    }
}

fn system_instruction(language: Language) -> String {
    let language_name = match language {
        Language::En => "English",
        Language::Uk => "Ukrainian",
    };

    format!(
        "You are a helpful personal finance assistant. Use the financial \
         context provided with each question to give specific, practical \
         advice about the user's finances, savings goals, and vehicle \
         costs. Politely decline questions unrelated to personal finance \
         or the user's cars. Respond in {language_name}."
    )
}

/// Render `snapshot` as the plain-text context block sent with every
/// question.
///
/// Amounts are formatted in the user's display currency and the
/// transaction list is capped at the five most recent entries.
pub fn build_financial_context(
    snapshot: &Snapshot,
    language: Language,
    currency: Currency,
) -> String {
    let amount = |value: f64| format_currency(language, currency, value);

    let mut context = String::from("---FINANCIAL CONTEXT---\n");

    context.push_str(&format!(
        "Total balance: {}\n",
        amount(total_balance(&snapshot.accounts))
    ));

    if snapshot.goals.is_empty() {
        context.push_str("Active goals: none\n");
    } else {
        context.push_str("Active goals:\n");
        for goal in &snapshot.goals {
            context.push_str(&format!(
                "- {}: {} of {}\n",
                goal.name,
                amount(goal.current_amount),
                amount(goal.target_amount)
            ));
        }
    }

    if !snapshot.cars.is_empty() {
        context.push_str("Cars:\n");
        for car in &snapshot.cars {
            context.push_str(&format!("- {} {}\n", car.make, car.model));
        }
    }

    let mut recent: Vec<_> = snapshot.transactions.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(5);

    if !recent.is_empty() {
        context.push_str("Recent transactions:\n");
        for transaction in recent {
            let sign = match transaction.kind {
                TransactionKind::Income => "+",
                TransactionKind::Expense => "-",
            };

            context.push_str(&format!(
                "- [{}] {sign}{} ({})\n",
                transaction.date.date(),
                amount(transaction.amount),
                transaction.category
            ));
        }
    }

    context.push_str("---END CONTEXT---");

    context
}
