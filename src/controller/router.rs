use std::sync::Arc;

use crate::{
    domain::update::{ClientUpdate, Update},
    store::{
        app::AppStore, chats::ChatStore, files::FileStore, groups::BasicGroupStore,
        groups::SupergroupStore, messages::MessageStore, users::UserStore,
    },
};

const UNKNOWN_UPDATE_IGNORED: &str = "DISPATCH_UNKNOWN_UPDATE_IGNORED";

/// One unit of dispatch work: a server update or a locally synthesized one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DispatchItem {
    Server(Update),
    Client(ClientUpdate),
}

/// Routes each update variant to the store that owns it. The exhaustive
/// match is the routing table: adding an update kind means adding one arm
/// calling one store method.
pub(crate) struct UpdateRouter {
    chats: Arc<ChatStore>,
    messages: Arc<MessageStore>,
    users: Arc<UserStore>,
    supergroups: Arc<SupergroupStore>,
    basic_groups: Arc<BasicGroupStore>,
    files: Arc<FileStore>,
    app: Arc<AppStore>,
}

impl UpdateRouter {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        chats: Arc<ChatStore>,
        messages: Arc<MessageStore>,
        users: Arc<UserStore>,
        supergroups: Arc<SupergroupStore>,
        basic_groups: Arc<BasicGroupStore>,
        files: Arc<FileStore>,
        app: Arc<AppStore>,
    ) -> Self {
        Self {
            chats,
            messages,
            users,
            supergroups,
            basic_groups,
            files,
            app,
        }
    }

    pub(crate) fn route(&self, item: DispatchItem) {
        match item {
            DispatchItem::Server(update) => self.route_update(update),
            DispatchItem::Client(update) => self.route_client_update(update),
        }
    }

    fn route_update(&self, update: Update) {
        tracing::trace!(kind = update.kind_name(), "dispatching update");

        match update {
            Update::NewMessage { message } => self.messages.put(message),
            Update::MessageSendSucceeded {
                message,
                old_message_id,
            } => self.messages.apply_send_succeeded(message, old_message_id),
            Update::MessageContent {
                chat_id,
                message_id,
                new_content,
            } => self.messages.apply_content(chat_id, message_id, new_content),
            Update::MessageEdited {
                chat_id,
                message_id,
                edit_date,
            } => self.messages.apply_edited(chat_id, message_id, edit_date),
            Update::MessageViews {
                chat_id,
                message_id,
                views,
            } => self.messages.apply_views(chat_id, message_id, views),
            Update::DeleteMessages {
                chat_id,
                message_ids,
            } => self.messages.apply_delete(chat_id, message_ids),
            Update::NewChat { chat } => self.chats.put(chat),
            Update::ChatTitle { chat_id, title } => self.chats.apply_title(chat_id, title),
            Update::ChatLastMessage {
                chat_id,
                last_message,
            } => self.chats.apply_last_message(chat_id, last_message),
            Update::ChatReadInbox {
                chat_id,
                last_read_inbox_message_id,
                unread_count,
            } => self
                .chats
                .apply_read_inbox(chat_id, last_read_inbox_message_id, unread_count),
            Update::ChatReadOutbox {
                chat_id,
                last_read_outbox_message_id,
            } => self
                .chats
                .apply_read_outbox(chat_id, last_read_outbox_message_id),
            Update::ChatNotificationSettings {
                chat_id,
                notification_settings,
            } => self
                .chats
                .apply_notification_settings(chat_id, notification_settings),
            Update::ChatIsPinned { chat_id, is_pinned } => {
                self.chats.apply_is_pinned(chat_id, is_pinned)
            }
            Update::ChatDraftMessage { chat_id, draft } => self.chats.apply_draft(chat_id, draft),
            Update::ChatOnlineMemberCount {
                chat_id,
                online_member_count,
            } => self
                .chats
                .apply_online_member_count(chat_id, online_member_count),
            Update::User { user } => self.users.put(user),
            Update::UserStatus { user_id, status } => self.users.apply_status(user_id, status),
            Update::Supergroup { supergroup } => self.supergroups.put(supergroup),
            Update::BasicGroup { basic_group } => self.basic_groups.put(basic_group),
            Update::File { file } => self.files.put(file),
            Update::ConnectionState { state } => self.app.set_connection_state(state),
            Update::AuthorizationState { state } => self.app.set_authorization_state(state),
            Update::Unknown { kind } => tracing::debug!(
                code = UNKNOWN_UPDATE_IGNORED,
                kind,
                "ignoring update of an unknown kind"
            ),
        }
    }

    fn route_client_update(&self, update: ClientUpdate) {
        tracing::trace!(kind = update.kind_name(), "dispatching client update");

        match update {
            ClientUpdate::OpenChat { chat_id } => self.app.set_open_chat(chat_id),
            ClientUpdate::ClearHistory {
                chat_id,
                in_progress,
            } => self.app.set_clearing_history(chat_id, in_progress),
            ClientUpdate::LeaveChat {
                chat_id,
                in_progress,
            } => self.app.set_leaving(chat_id, in_progress),
            ClientUpdate::MessageSelected {
                chat_id,
                message_id,
                selected,
            } => self.messages.select(chat_id, message_id, selected),
            ClientUpdate::MessageHighlighted {
                chat_id,
                message_id,
            } => self.messages.highlight(chat_id, message_id),
            ClientUpdate::ClearSelection { chat_id } => self.messages.clear_selection(chat_id),
        }
    }
}
