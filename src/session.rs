// src/session.rs
//! Client-side counseling session: participants, topic choice and the
//! message history sent to the relay. Nothing here outlives the process.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, Utc};
use rand::Rng;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::message::{ChatMessage, Role};
use crate::services::relay_client::{RelayClient, RelayError};
use crate::services::topics::{Topic, sample_topics};

pub const CLIENT_SYSTEM_PROMPT: &str = "You are a compassionate couples counselor. Help guide the conversation, provide insights, and maintain a supportive environment. When appropriate, ask questions to deepen understanding.";

pub const MISSING_NAMES_ALERT: &str = "Please enter both names to continue";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Setup,
    TopicSelection,
    Conversation,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please enter both names to continue")]
    MissingParticipants,

    #[error("not available during {0:?}")]
    WrongPhase(Phase),

    #[error("no topic at position {0}")]
    UnknownTopic(usize),

    #[error("a reply is still pending")]
    Busy,

    #[error("nothing to send")]
    EmptyInput,

    #[error("nothing to download yet")]
    EmptySession,

    #[error("request failed: {0}")]
    Relay(#[from] RelayError),

    #[error("could not write transcript: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: Option<String>,
}

impl Message {
    /// Message stamped with the local wall-clock time, e.g. `3:07:12 PM`.
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Some(Local::now().format("%-I:%M:%S %p").to_string()),
        }
    }

    pub fn to_wire(&self) -> ChatMessage {
        ChatMessage::new(self.role, self.content.clone())
    }

    /// `<timestamp> - <role>: <content>` on a single line.
    pub fn transcript_line(&self) -> String {
        let content = self.content.replace("\r\n", " ").replace(['\n', '\r'], " ");
        format!(
            "{} - {}: {}",
            self.timestamp.as_deref().unwrap_or_default(),
            self.role,
            content
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
}

#[derive(Debug, Default)]
pub struct Session {
    first: Participant,
    second: Participant,
    topics: Vec<Topic>,
    messages: Vec<Message>,
    started: bool,
    loading: bool,
    recording: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if !self.started {
            Phase::Setup
        } else if self.messages.is_empty() {
            Phase::TopicSelection
        } else {
            Phase::Conversation
        }
    }

    pub fn participants(&self) -> (&Participant, &Participant) {
        (&self.first, &self.second)
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn set_names(&mut self, first: impl Into<String>, second: impl Into<String>) {
        self.first.name = first.into();
        self.second.name = second.into();
    }

    pub fn start(&mut self) -> Result<&[Topic], SessionError> {
        self.start_with_rng(&mut rand::thread_rng())
    }

    /// Setup -> Topic-Selection. Both names must be non-blank.
    pub fn start_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&[Topic], SessionError> {
        if self.phase() != Phase::Setup {
            return Err(SessionError::WrongPhase(self.phase()));
        }
        if self.first.name.trim().is_empty() || self.second.name.trim().is_empty() {
            warn!("session start blocked: participant name missing");
            return Err(SessionError::MissingParticipants);
        }

        self.topics = sample_topics(rng);
        self.started = true;
        info!(topics = self.topics.len(), "session started");
        Ok(&self.topics)
    }

    /// Topic-Selection -> Conversation, seeding the history with the
    /// counselor's framing for the chosen topic.
    pub fn select_topic(&mut self, index: usize) -> Result<&Message, SessionError> {
        if self.phase() != Phase::TopicSelection {
            return Err(SessionError::WrongPhase(self.phase()));
        }
        let topic = *self.topics.get(index).ok_or(SessionError::UnknownTopic(index))?;

        let content = format!(
            "You are a couples counselor facilitating a discussion between {} and {} about: {}. Current question: {}",
            self.first.name,
            self.second.name,
            topic.category,
            topic.first_question()
        );
        self.messages = vec![Message::now(Role::System, content)];
        info!(category = topic.category, "topic selected");
        Ok(&self.messages[0])
    }

    /// Appends the user's message and returns the payload for the relay.
    /// Sets the loading flag; pair with [`Session::finish_submit`].
    pub fn begin_submit(&mut self, input: &str) -> Result<Vec<ChatMessage>, SessionError> {
        if self.phase() != Phase::Conversation {
            return Err(SessionError::WrongPhase(self.phase()));
        }
        if self.loading {
            return Err(SessionError::Busy);
        }
        if input.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }

        self.messages.push(Message::now(Role::User, input));
        self.loading = true;

        let mut payload = Vec::with_capacity(self.messages.len() + 1);
        payload.push(ChatMessage::system(CLIENT_SYSTEM_PROMPT));
        payload.extend(self.messages.iter().map(Message::to_wire));
        Ok(payload)
    }

    /// Clears the loading flag and, on success, appends the assistant reply.
    /// On failure the user's message stays and nothing else is added.
    pub fn finish_submit(&mut self, reply: Result<String, RelayError>) -> Result<&Message, SessionError> {
        self.loading = false;
        match reply {
            Ok(content) => {
                self.messages.push(Message::now(Role::Assistant, content));
                Ok(&self.messages[self.messages.len() - 1])
            }
            Err(e) => {
                error!(error = %e, "chat request failed");
                Err(SessionError::Relay(e))
            }
        }
    }

    pub async fn submit(&mut self, relay: &RelayClient, input: &str) -> Result<&Message, SessionError> {
        let payload = self.begin_submit(input)?;
        let reply = relay
            .send(payload)
            .await
            .map(|r| r.content.unwrap_or_default());
        self.finish_submit(reply)
    }

    /// UI-only flag; no audio is captured.
    pub fn toggle_recording(&mut self) -> bool {
        self.recording = !self.recording;
        self.recording
    }

    /// Drops everything and returns to Setup.
    pub fn new_session(&mut self) {
        *self = Self::default();
        info!("session reset");
    }

    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(Message::transcript_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn download_filename(date: NaiveDate) -> String {
        format!("counseling-session-{}.txt", date.format("%Y-%m-%d"))
    }

    /// Writes the transcript into `dir` and returns the file's path.
    pub async fn download(&self, dir: &Path) -> Result<PathBuf, SessionError> {
        if self.messages.is_empty() {
            return Err(SessionError::EmptySession);
        }
        let path = dir.join(Self::download_filename(Utc::now().date_naive()));
        tokio::fs::write(&path, self.transcript()).await?;
        info!(path = %path.display(), lines = self.messages.len(), "transcript saved");
        Ok(path)
    }
}
