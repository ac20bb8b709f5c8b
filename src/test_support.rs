use std::sync::{Arc, Mutex};

use tokio::{runtime::Handle, sync::Notify};

use crate::{
    context::CoreContext,
    controller::contracts::{RequestEnvelope, Transport, TransportError},
    domain::{
        chat::{Chat, ChatType, NotificationSettings},
        message::{Message, MessageContent, MessageSender},
        request::Request,
        user::{User, UserStatus, UserType},
    },
    infra::config::CoreConfig,
};

/// Transport stub recording every submission. Created rejecting, it turns
/// every submit into an immediate transport failure instead.
pub struct RecordingTransport {
    submissions: Mutex<Vec<RequestEnvelope>>,
    reject_reason: Option<String>,
    notify: Notify,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            submissions: Mutex::new(Vec::new()),
            reject_reason: None,
            notify: Notify::new(),
        })
    }

    pub fn rejecting(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            submissions: Mutex::new(Vec::new()),
            reject_reason: Some(reason.to_owned()),
            notify: Notify::new(),
        })
    }

    pub fn submitted_requests(&self) -> Vec<Request> {
        self.submissions
            .lock()
            .expect("submissions lock")
            .iter()
            .map(|envelope| envelope.request.clone())
            .collect()
    }

    pub fn submitted_ids(&self) -> Vec<u64> {
        self.submissions
            .lock()
            .expect("submissions lock")
            .iter()
            .map(|envelope| envelope.id)
            .collect()
    }

    /// Waits until at least one request has been submitted.
    pub async fn wait_for_submission(&self) {
        loop {
            let notified = self.notify.notified();
            if !self.submitted_requests().is_empty() {
                return;
            }
            notified.await;
        }
    }
}

impl Transport for RecordingTransport {
    fn submit(&self, envelope: RequestEnvelope) -> Result<(), TransportError> {
        if let Some(reason) = &self.reject_reason {
            return Err(TransportError::Rejected {
                reason: reason.clone(),
            });
        }

        self.submissions
            .lock()
            .expect("submissions lock")
            .push(envelope);
        self.notify.notify_waiters();
        Ok(())
    }
}

/// Context wired to a fresh recording transport. Requires a running tokio
/// runtime (scheduled-action timers spawn on the current handle).
pub fn build_core() -> (CoreContext, Arc<RecordingTransport>) {
    let transport = RecordingTransport::new();
    let core = CoreContext::new(
        CoreConfig::default(),
        Arc::clone(&transport) as Arc<dyn Transport>,
        Handle::current(),
    );
    (core, transport)
}

pub fn sample_private_chat(chat_id: i64) -> Chat {
    Chat {
        id: chat_id,
        title: format!("chat-{chat_id}"),
        chat_type: ChatType::Private { user_id: chat_id },
        last_message: None,
        last_read_inbox_message_id: 0,
        last_read_outbox_message_id: 0,
        unread_count: 0,
        is_pinned: false,
        notification_settings: NotificationSettings::default(),
        draft: None,
    }
}

pub fn sample_supergroup_chat(chat_id: i64, supergroup_id: i64) -> Chat {
    Chat {
        chat_type: ChatType::Supergroup { supergroup_id },
        ..sample_private_chat(chat_id)
    }
}

pub fn sample_basic_group_chat(chat_id: i64, basic_group_id: i64) -> Chat {
    Chat {
        chat_type: ChatType::BasicGroup { basic_group_id },
        ..sample_private_chat(chat_id)
    }
}

pub fn sample_text_message(chat_id: i64, id: i64, text: &str) -> Message {
    Message {
        id,
        chat_id,
        sender: MessageSender::User { user_id: 7 },
        content: MessageContent::Text {
            text: text.to_owned(),
        },
        is_outgoing: false,
        date: 1_700_000_000,
        edit_date: 0,
        views: 0,
        reply_to_message_id: 0,
        forward_info: None,
        sending_state: None,
    }
}

pub fn sample_user(user_id: i64) -> User {
    User {
        id: user_id,
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        username: "ada".to_owned(),
        user_type: UserType::Regular,
        status: UserStatus::Offline {
            was_online: 1_700_000_000,
        },
    }
}
