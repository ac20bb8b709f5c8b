use crate::{
    controller::bridge::{Controller, PendingResponse},
    domain::request::Request,
};

const DEFAULT_HISTORY_PAGE_SIZE: usize = 50;
const MAX_HISTORY_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub chat_id: i64,
    /// Load messages older than this id; 0 starts from the latest.
    pub from_message_id: i64,
    pub limit: usize,
}

impl HistoryQuery {
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            from_message_id: 0,
            limit: DEFAULT_HISTORY_PAGE_SIZE,
        }
    }

    fn normalized_limit(&self) -> usize {
        match self.limit {
            0 => DEFAULT_HISTORY_PAGE_SIZE,
            value if value > MAX_HISTORY_PAGE_SIZE => MAX_HISTORY_PAGE_SIZE,
            value => value,
        }
    }
}

/// Requests a page of chat history. The returned messages are folded into
/// the message store when the response arrives; the future is for callers
/// that want the page itself.
pub fn load_history(controller: &Controller, query: HistoryQuery) -> PendingResponse {
    let limit = query.normalized_limit();
    controller.send(Request::GetChatHistory {
        chat_id: query.chat_id,
        from_message_id: query.from_message_id,
        limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::build_core;

    fn submitted_limit(transport: &crate::test_support::RecordingTransport) -> usize {
        match transport.submitted_requests()[0] {
            Request::GetChatHistory { limit, .. } => limit,
            ref other => panic!("unexpected request: {other:?}"),
        }
    }

    #[tokio::test]
    async fn uses_the_default_page_size_when_limit_is_zero() {
        let (core, transport) = build_core();

        let _ = load_history(
            &core.controller,
            HistoryQuery {
                chat_id: 1,
                from_message_id: 0,
                limit: 0,
            },
        );

        assert_eq!(submitted_limit(&transport), 50);
    }

    #[tokio::test]
    async fn caps_the_page_size_at_the_maximum() {
        let (core, transport) = build_core();

        let _ = load_history(
            &core.controller,
            HistoryQuery {
                chat_id: 1,
                from_message_id: 0,
                limit: 999,
            },
        );

        assert_eq!(submitted_limit(&transport), 200);
    }

    #[tokio::test]
    async fn passes_the_paging_cursor_through() {
        let (core, transport) = build_core();

        let _ = load_history(
            &core.controller,
            HistoryQuery {
                chat_id: 7,
                from_message_id: 42,
                limit: 10,
            },
        );

        match transport.submitted_requests()[0] {
            Request::GetChatHistory {
                chat_id,
                from_message_id,
                limit,
            } => {
                assert_eq!(chat_id, 7);
                assert_eq!(from_message_id, 42);
                assert_eq!(limit, 10);
            }
            ref other => panic!("unexpected request: {other:?}"),
        }
    }
}
