//! In-memory test doubles for the ports.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{ChatMessage, DomainError, ModelFailure, User};
use crate::ports::{GenerationConfig, Messenger, ModelGateway, OutgoingMessage, UserRepository};

/// Document-style repository: users are stored as JSON and decoded on load
#[derive(Default)]
pub struct InMemoryUserRepository {
    docs: Mutex<HashMap<i64, serde_json::Value>>,
    saves: AtomicUsize,
    failing_saves: Mutex<HashSet<usize>>,
    fail_loads: AtomicBool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the n-th save (1-based, counted from now on) fail
    pub fn fail_nth_save(&self, n: usize) {
        let base = self.saves.load(Ordering::SeqCst);
        self.failing_saves.lock().unwrap().insert(base + n);
    }

    pub fn fail_loads(&self) {
        self.fail_loads.store(true, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn insert_raw(&self, user_id: i64, doc: serde_json::Value) {
        self.docs.lock().unwrap().insert(user_id, doc);
    }

    pub fn stored(&self, user_id: i64) -> Option<User> {
        let doc = self.docs.lock().unwrap().get(&user_id).cloned()?;
        Some(serde_json::from_value(doc).unwrap())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, DomainError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(DomainError::load(user_id, "connection refused"));
        }
        let doc = self.docs.lock().unwrap().get(&user_id).cloned();
        doc.map(serde_json::from_value)
            .transpose()
            .map_err(|e| DomainError::load(user_id, e))
    }

    async fn save(&self, user: &User) -> Result<(), DomainError> {
        let n = self.saves.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing_saves.lock().unwrap().remove(&n) {
            return Err(DomainError::persist(user.id, "write rejected"));
        }
        let doc = serde_json::to_value(user).map_err(|e| DomainError::persist(user.id, e))?;
        self.docs.lock().unwrap().insert(user.id, doc);
        Ok(())
    }

    async fn append_chat_message(
        &self,
        user_id: i64,
        character_index: usize,
        message: &ChatMessage,
    ) -> Result<(), DomainError> {
        let mut docs = self.docs.lock().unwrap();
        let chat = docs
            .get_mut(&user_id)
            .and_then(|doc| doc["characters"].get_mut(character_index))
            .and_then(|c| c["chat"].as_array_mut())
            .ok_or_else(|| DomainError::persist(user_id, "user or character not found"))?;
        chat.push(serde_json::to_value(message).map_err(|e| DomainError::persist(user_id, e))?);
        Ok(())
    }
}

/// Gateway returning scripted replies and recording every request
#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, ModelFailure>>>,
    calls: Mutex<Vec<(Vec<ChatMessage>, GenerationConfig)>>,
}

impl ScriptedGateway {
    pub fn replying(replies: &[&str]) -> Self {
        let gateway = Self::default();
        for reply in replies {
            gateway.push(Ok(reply.to_string()));
        }
        gateway
    }

    pub fn push(&self, reply: Result<String, ModelFailure>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<(Vec<ChatMessage>, GenerationConfig)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn complete_chat(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<String, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), config.clone()));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ModelFailure::EmptyChoices));
        reply.map_err(DomainError::Model)
    }
}

/// Messenger that records sends and deletes
pub struct RecordingMessenger {
    sent: Mutex<Vec<(i64, OutgoingMessage)>>,
    deleted: Mutex<Vec<(i64, i32)>>,
    next_id: AtomicI32,
    fail_sends: AtomicBool,
}

impl Default for RecordingMessenger {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1000),
            fail_sends: AtomicBool::new(false),
        }
    }
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(i64, OutgoingMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> String {
        self.sent
            .lock()
            .unwrap()
            .last()
            .map(|(_, m)| m.text.clone())
            .unwrap_or_default()
    }

    pub fn deleted(&self) -> Vec<(i64, i32)> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(
        &self,
        chat_id: i64,
        message: &OutgoingMessage,
    ) -> Result<i32, DomainError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(DomainError::ExternalService("send failed".into()));
        }
        self.sent.lock().unwrap().push((chat_id, message.clone()));
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), DomainError> {
        self.deleted.lock().unwrap().push((chat_id, message_id));
        Ok(())
    }
}
