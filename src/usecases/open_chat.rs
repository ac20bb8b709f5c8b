use crate::{
    controller::bridge::Controller,
    domain::{request::Request, update::ClientUpdate},
    store::chats::ChatStore,
};

/// Opens a chat in the UI sense and, when it has unread incoming messages,
/// reports the read position so the server can clear the unread counter.
pub fn open_chat(chats: &ChatStore, controller: &Controller, chat_id: i64) {
    controller.client_update(ClientUpdate::OpenChat {
        chat_id: Some(chat_id),
    });

    let viewed = chats.get(chat_id).and_then(|chat| {
        if chat.unread_count == 0 {
            return None;
        }
        chat.last_message.map(|message| message.id)
    });

    if let Some(message_id) = viewed {
        let _ = controller.send(Request::ViewMessages {
            chat_id,
            message_ids: vec![message_id],
        });
    }
}

pub fn close_chat(controller: &Controller) {
    controller.client_update(ClientUpdate::OpenChat { chat_id: None });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::update::Update,
        test_support::{build_core, sample_private_chat, sample_text_message},
    };

    #[tokio::test]
    async fn opening_a_chat_updates_the_open_chat_id() {
        let (core, _transport) = build_core();

        open_chat(&core.chats, &core.controller, 5);

        assert_eq!(core.app.open_chat_id(), Some(5));
    }

    #[tokio::test]
    async fn opening_a_chat_with_unread_messages_reports_the_view() {
        let (core, transport) = build_core();
        let mut chat = sample_private_chat(1);
        chat.unread_count = 2;
        chat.last_message = Some(sample_text_message(1, 40, "latest"));
        core.ingest_update(Update::NewChat { chat });

        open_chat(&core.chats, &core.controller, 1);

        match &transport.submitted_requests()[0] {
            Request::ViewMessages {
                chat_id,
                message_ids,
            } => {
                assert_eq!(*chat_id, 1);
                assert_eq!(message_ids, &vec![40]);
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[tokio::test]
    async fn opening_a_read_chat_sends_nothing() {
        let (core, transport) = build_core();
        core.ingest_update(Update::NewChat {
            chat: sample_private_chat(1),
        });

        open_chat(&core.chats, &core.controller, 1);

        assert!(transport.submitted_requests().is_empty());
    }

    #[tokio::test]
    async fn closing_clears_the_open_chat_id() {
        let (core, _transport) = build_core();
        open_chat(&core.chats, &core.controller, 5);

        close_chat(&core.controller);

        assert_eq!(core.app.open_chat_id(), None);
    }
}
