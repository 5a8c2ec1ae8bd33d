//! Demo chat engine.
//!
//! No AI integration exists: replies come from a hardcoded pool picked
//! uniformly at random after an artificial latency, so the transcript
//! behaves like a chat without an inference backend. Sending is gated on
//! the selected-source count and on no reply being in flight.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
}

/// One message in a notebook's chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }
}

/// Linear transcript of one notebook's chat session.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(Role::User, content));
    }

    pub fn push_ai(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(Role::Ai, content));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Opening message appended when a notebook's chat first activates.
pub const GREETING: &str = "Hello there!\n\n\
    The documents I have consist of excerpts from a curriculum detailing courses \
    offered under the CHOICE BASED CREDIT & SEMESTER SYSTEM - 2019. These documents \
    outline the structure for various degree programs, primarily focusing on common \
    courses.\n\n\
    Would you like me to summarize the key structure, explain specific courses, or \
    help you understand the credit system?";

/// Canned reply pool, selected uniformly at random.
pub const RESPONSE_POOL: [&str; 5] = [
    "Based on your uploaded document... **Main Structure:** The CHOICE BASED CREDIT \
     & SEMESTER SYSTEM organizes each program into semesters with a fixed credit \
     distribution across common, core, and complementary courses.",
    "That's a great question! From what I've analyzed... **Curriculum Overview:** \
     Published in 2019, the curriculum pairs every course with defined credits and \
     contact hours so progress is measured uniformly across programs.",
    "I can help clarify that concept. According to your document... **Credit System \
     Benefits:** Flexibility in course selection, transparent progression rules, \
     and comparable workloads between degree programs.",
    "Excellent question! Let me search... **Common Course Structure:** Code: \
     MAL1A07, Credits: 4 - a representative common course with its credit weight \
     and semester placement listed in the catalog tables.",
    "From the information in your sources... **Key Components:** 1. Course Catalog, \
     2. Learning Objectives, 3. Credit Distribution - each section of the document \
     maps onto one of these.",
];

/// Reply latency floor and random spread (milliseconds).
const REPLY_DELAY_BASE_MS: u64 = 1200;
const REPLY_DELAY_SPREAD_MS: u64 = 1500;

/// Delay before the greeting appears on activation (milliseconds).
pub const GREETING_DELAY: Duration = Duration::from_millis(800);

/// Pick a canned reply uniformly at random.
pub fn pick_response<R: Rng>(rng: &mut R) -> &'static str {
    RESPONSE_POOL[rng.gen_range(0..RESPONSE_POOL.len())]
}

/// Artificial reply latency: 1200–2700 ms.
pub fn response_delay<R: Rng>(rng: &mut R) -> Duration {
    Duration::from_millis(REPLY_DELAY_BASE_MS + rng.gen_range(0..=REPLY_DELAY_SPREAD_MS))
}

/// Whether a message may be sent right now.
pub fn can_send(selected_count: usize, reply_pending: bool) -> bool {
    super::selection::chat_enabled(selected_count) && !reply_pending
}
