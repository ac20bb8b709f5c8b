use std::{sync::Arc, time::Duration};

use tokio::{runtime::Handle, sync::mpsc};

use crate::{
    controller::{
        bridge::{Controller, PendingResponse},
        contracts::{Transport, TransportEvent},
        pump::TransportEventPump,
        router::UpdateRouter,
        scheduled::{ActionKey, ActionKind, ScheduledActionRegistry},
    },
    infra::config::CoreConfig,
    store::{
        app::AppStore,
        chats::ChatStore,
        files::FileStore,
        groups::{BasicGroupStore, SupergroupStore},
        messages::MessageStore,
        users::UserStore,
    },
    usecases::{
        self,
        history::HistoryQuery,
        mute::MuteOutcome,
        send_text::{SendTextCommand, SendTextError},
    },
};

/// Owns every store, the controller, and the scheduled-action registry,
/// wired in dependency order: stores first, then the router and controller,
/// then the registry. Nothing here is global; tests build as many contexts
/// as they need and tear them down with [`CoreContext::shutdown`].
pub struct CoreContext {
    pub config: CoreConfig,
    pub chats: Arc<ChatStore>,
    pub messages: Arc<MessageStore>,
    pub users: Arc<UserStore>,
    pub supergroups: Arc<SupergroupStore>,
    pub basic_groups: Arc<BasicGroupStore>,
    pub files: Arc<FileStore>,
    pub app: Arc<AppStore>,
    pub controller: Arc<Controller>,
    pub actions: Arc<ScheduledActionRegistry>,
}

impl CoreContext {
    pub fn new(config: CoreConfig, transport: Arc<dyn Transport>, runtime: Handle) -> Self {
        let chats = Arc::new(ChatStore::new());
        let messages = Arc::new(MessageStore::new());
        let users = Arc::new(UserStore::new());
        let supergroups = Arc::new(SupergroupStore::new());
        let basic_groups = Arc::new(BasicGroupStore::new());
        let files = Arc::new(FileStore::new());
        let app = Arc::new(AppStore::new());

        let router = UpdateRouter::new(
            Arc::clone(&chats),
            Arc::clone(&messages),
            Arc::clone(&users),
            Arc::clone(&supergroups),
            Arc::clone(&basic_groups),
            Arc::clone(&files),
            Arc::clone(&app),
        );
        let controller = Arc::new(Controller::new(transport, router));
        let actions = Arc::new(ScheduledActionRegistry::new(runtime));

        Self {
            config,
            chats,
            messages,
            users,
            supergroups,
            basic_groups,
            files,
            app,
            controller,
            actions,
        }
    }

    /// Spawns the task draining `events` into the controller. The returned
    /// handle stops the pump when dropped.
    pub fn start_pump(
        &self,
        runtime: &Handle,
        events: mpsc::Receiver<TransportEvent>,
    ) -> TransportEventPump {
        TransportEventPump::start(runtime, Arc::clone(&self.controller), events)
    }

    pub fn undo_window(&self) -> Duration {
        Duration::from_millis(self.config.actions.undo_window_ms)
    }

    pub fn set_chat_muted(&self, chat_id: i64, mute: bool) -> MuteOutcome {
        usecases::mute::set_chat_muted(&self.chats, &self.controller, chat_id, mute)
    }

    pub fn clear_chat_history(&self, chat_id: i64) -> bool {
        usecases::destructive::clear_chat_history(
            &self.controller,
            &self.actions,
            chat_id,
            self.undo_window(),
        )
    }

    pub fn undo_clear_history(&self, chat_id: i64) {
        usecases::destructive::undo(
            &self.actions,
            &ActionKey::new(ActionKind::ClearHistory, chat_id),
        );
    }

    pub fn leave_chat(&self, chat_id: i64) -> bool {
        usecases::destructive::leave_chat(
            &self.chats,
            &self.controller,
            &self.actions,
            chat_id,
            self.undo_window(),
        )
    }

    pub fn undo_leave_chat(&self, chat_id: i64) {
        usecases::destructive::undo(
            &self.actions,
            &ActionKey::new(ActionKind::LeaveChat, chat_id),
        );
    }

    pub fn send_text(
        &self,
        chat_id: i64,
        reply_to_message_id: i64,
        text: String,
    ) -> Result<PendingResponse, SendTextError> {
        usecases::send_text::send_text(
            &self.controller,
            SendTextCommand {
                chat_id,
                reply_to_message_id,
                text,
            },
        )
    }

    /// Loads a page of history sized by the configured page size.
    pub fn load_history(&self, chat_id: i64, from_message_id: i64) -> PendingResponse {
        usecases::history::load_history(
            &self.controller,
            HistoryQuery {
                chat_id,
                from_message_id,
                limit: self.config.history.page_size,
            },
        )
    }

    pub fn open_chat(&self, chat_id: i64) {
        usecases::open_chat::open_chat(&self.chats, &self.controller, chat_id);
    }

    pub fn close_chat(&self) {
        usecases::open_chat::close_chat(&self.controller);
    }

    /// Tears the context down for reuse-free disposal: drops every
    /// subscription and cancels pending scheduled actions. In-flight `send`
    /// futures are left to resolve or be dropped by their owners.
    pub fn shutdown(&self) {
        self.chats.clear_subscribers();
        self.messages.clear_subscribers();
        self.users.clear_subscribers();
        self.supergroups.clear_subscribers();
        self.basic_groups.clear_subscribers();
        self.files.clear_subscribers();
        self.app.clear_subscribers();
        self.actions.clear();
    }

    #[cfg(test)]
    pub(crate) fn ingest_update(&self, update: crate::domain::update::Update) {
        self.controller
            .handle_transport_event(TransportEvent::Update(update));
    }

    #[cfg(test)]
    pub(crate) fn respond(
        &self,
        request_id: u64,
        result: Result<crate::domain::request::Response, crate::domain::request::ProtocolError>,
    ) {
        self.controller
            .handle_transport_event(TransportEvent::Response { request_id, result });
    }
}
