//! One chat session: state, provider and log store

use crate::responder::{reply_or_fallback, ResponseProvider, DEFAULT_REPLY_TIMEOUT};
use crate::state_machine::{
    accepts, transition, ConversationState, Effect, Event, ExportedMessage, Input, Reply,
    TransitionError,
};
use crate::storage::{encode_chat_csv, ChatLogStore};
use chrono::Local;
use std::time::Duration;

/// Runtime for a single conversation.
///
/// Each operation validates the input, resolves the provider reply if one is
/// needed, applies the pure transition and then runs the resulting effects.
/// Storage failures are logged; the in-memory transition stands.
pub struct ChatSession<P, S>
where
    P: ResponseProvider,
    S: ChatLogStore,
{
    id: String,
    state: ConversationState,
    provider: P,
    store: S,
    reply_timeout: Duration,
}

impl<P, S> ChatSession<P, S>
where
    P: ResponseProvider,
    S: ChatLogStore,
{
    pub fn new(id: impl Into<String>, state: ConversationState, provider: P, store: S) -> Self {
        Self {
            id: id.into(),
            state,
            provider,
            store,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
        }
    }

    /// Start a session from whatever log the store holds
    pub async fn open(id: impl Into<String>, provider: P, store: S) -> Self {
        let id = id.into();
        let history = match store.load().await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(session = %id, error = %e, "Chat log unreadable, starting empty");
                Vec::new()
            }
        };
        tracing::info!(session = %id, restored = history.len(), "Opening chat session");
        Self::new(id, ConversationState::resume(history), provider, store)
    }

    pub fn with_reply_timeout(mut self, reply_timeout: Duration) -> Self {
        self.reply_timeout = reply_timeout;
        self
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub async fn submit_name(&mut self, name: &str) -> Result<&ConversationState, TransitionError> {
        self.apply(Event::NameSubmitted {
            name: name.to_string(),
            at: Local::now(),
        })
        .await?;
        Ok(&self.state)
    }

    pub async fn submit_feeling(&mut self, text: &str) -> Result<&ConversationState, TransitionError> {
        let reply = self.reply_for(Input::Feeling, text).await?;
        self.apply(Event::FeelingShared {
            text: text.to_string(),
            reply,
            at: Local::now(),
        })
        .await?;
        Ok(&self.state)
    }

    pub async fn submit_chat(&mut self, text: &str) -> Result<&ConversationState, TransitionError> {
        let reply = self.reply_for(Input::Chat, text).await?;
        self.apply(Event::ChatSent {
            text: text.to_string(),
            reply,
            at: Local::now(),
        })
        .await?;
        Ok(&self.state)
    }

    pub async fn reset(&mut self) -> &ConversationState {
        if let Err(e) = self.apply(Event::Reset).await {
            // Reset has no preconditions
            tracing::error!(session = %self.id, error = %e, "Reset rejected");
        }
        &self.state
    }

    pub fn export_log(&self) -> Vec<ExportedMessage> {
        self.state.export_log()
    }

    pub fn export_csv(&self) -> String {
        encode_chat_csv(&self.export_log())
    }

    /// Reject early so a turn that will not be accepted never hits the provider
    async fn reply_for(&self, input: Input, text: &str) -> Result<Reply, TransitionError> {
        accepts(&self.state, input, text)?;
        let reply = reply_or_fallback(&self.provider, &self.id, text, self.reply_timeout).await;
        tracing::debug!(
            session = %self.id,
            fallback = reply.is_fallback(),
            reply_len = reply.text().len(),
            "Reply resolved"
        );
        Ok(reply)
    }

    async fn apply(&mut self, event: Event) -> Result<(), TransitionError> {
        let event_name = event.name();
        let result = transition(&self.state, event)?;

        tracing::debug!(
            session = %self.id,
            event = event_name,
            from = %self.state.stage,
            to = %result.new_state.stage,
            "Conversation transition"
        );
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect).await;
        }
        Ok(())
    }

    async fn execute_effect(&self, effect: Effect) {
        let outcome = match effect {
            Effect::PersistLog => self.store.save(&self.state.message_log).await,
            Effect::DeleteLog => self.store.delete().await,
        };
        if let Err(e) = outcome {
            tracing::warn!(session = %self.id, effect = ?effect, error = %e, "Chat log effect failed");
        }
    }
}
