use std::{sync::Arc, time::Duration};

use crate::{
    controller::{
        bridge::Controller,
        scheduled::{ActionKey, ActionKind, CancelFn, CommitFn, ScheduledActionRegistry},
    },
    domain::{request::Request, update::ClientUpdate},
    store::chats::ChatStore,
};

const LEAVE_UNKNOWN_CHAT: &str = "LEAVE_UNKNOWN_CHAT";

/// Schedules an undoable history clear for the chat. Returns false when a
/// clear for the same chat is already inside its undo window.
///
/// While the window is open only an in-progress flag is raised; the chat
/// data is untouched until the timer commits. Undoing goes through
/// [`ScheduledActionRegistry::remove`] with the same key. The flag is
/// lowered on every exit path: after the commit request settles (success or
/// failure) and on cancellation.
pub fn clear_chat_history(
    controller: &Arc<Controller>,
    actions: &ScheduledActionRegistry,
    chat_id: i64,
    undo_window: Duration,
) -> bool {
    let request = Request::DeleteChatHistory {
        chat_id,
        remove_from_chat_list: false,
    };

    schedule(
        controller,
        actions,
        ActionKey::new(ActionKind::ClearHistory, chat_id),
        request,
        undo_window,
    )
}

/// Schedules an undoable leave/delete for the chat: private chats delete
/// the conversation, groups and channels are left. Returns false when the
/// chat is not loaded or a leave is already pending.
pub fn leave_chat(
    chats: &ChatStore,
    controller: &Arc<Controller>,
    actions: &ScheduledActionRegistry,
    chat_id: i64,
    undo_window: Duration,
) -> bool {
    let chat = match chats.get(chat_id) {
        Some(chat) => chat,
        None => {
            tracing::debug!(
                code = LEAVE_UNKNOWN_CHAT,
                chat_id,
                "refusing to schedule leave for a chat that is not loaded"
            );
            return false;
        }
    };

    let request = if chat.chat_type.is_private() {
        Request::DeleteChatHistory {
            chat_id,
            remove_from_chat_list: true,
        }
    } else {
        Request::LeaveChat { chat_id }
    };

    schedule(
        controller,
        actions,
        ActionKey::new(ActionKind::LeaveChat, chat_id),
        request,
        undo_window,
    )
}

/// Cancels the pending action, lowering its in-progress flag. Safe to call
/// when nothing is pending.
pub fn undo(actions: &ScheduledActionRegistry, key: &ActionKey) {
    actions.remove(key);
}

fn schedule(
    controller: &Arc<Controller>,
    actions: &ScheduledActionRegistry,
    key: ActionKey,
    request: Request,
    undo_window: Duration,
) -> bool {
    let commit_controller = Arc::clone(controller);
    let commit: CommitFn = Box::new(move || {
        Box::pin(async move {
            let result = commit_controller.send(request).await;
            commit_controller.client_update(in_progress_update(&key, false));
            result.map(|_| ()).map_err(anyhow::Error::from)
        })
    });

    let cancel_controller = Arc::clone(controller);
    let cancel: CancelFn = Box::new(move || {
        cancel_controller.client_update(in_progress_update(&key, false));
    });

    if !actions.add(key, undo_window, commit, cancel) {
        return false;
    }

    controller.client_update(in_progress_update(&key, true));
    true
}

fn in_progress_update(key: &ActionKey, in_progress: bool) -> ClientUpdate {
    match key.kind {
        ActionKind::ClearHistory => ClientUpdate::ClearHistory {
            chat_id: key.chat_id,
            in_progress,
        },
        ActionKind::LeaveChat => ClientUpdate::LeaveChat {
            chat_id: key.chat_id,
            in_progress,
        },
    }
}
