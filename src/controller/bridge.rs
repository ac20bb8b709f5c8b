use std::{
    collections::{HashMap, VecDeque},
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    task::{Context, Poll},
};

use tokio::sync::oneshot;

use crate::domain::{
    request::{Request, Response},
    update::{ClientUpdate, Update},
};

use super::{
    contracts::{RequestEnvelope, RequestError, Transport, TransportError, TransportEvent},
    router::{DispatchItem, UpdateRouter},
};

const SUBMIT_FAILED: &str = "CONTROLLER_SUBMIT_FAILED";
const RESPONSE_WITHOUT_WAITER: &str = "CONTROLLER_RESPONSE_WITHOUT_WAITER";

/// The single ingress/egress point between the transport and the stores.
///
/// Outbound, [`Controller::send`] forwards a request and returns a future
/// resolved by correlating the response id; a failed request never mutates
/// store state. Inbound, transport updates are routed to the owning store
/// through a run-to-completion queue: updates are applied strictly in
/// arrival order, one at a time, and an update dispatched from inside a
/// subscriber (via [`Controller::client_update`]) is queued and fully
/// processed after the current one: deferred, but never interleaved.
pub struct Controller {
    transport: Arc<dyn Transport>,
    router: UpdateRouter,
    pending: Mutex<HashMap<u64, oneshot::Sender<Result<Response, RequestError>>>>,
    next_request_id: AtomicU64,
    queue: Mutex<DispatchQueue>,
}

#[derive(Default)]
struct DispatchQueue {
    items: VecDeque<DispatchItem>,
    draining: bool,
}

impl Controller {
    pub(crate) fn new(transport: Arc<dyn Transport>, router: UpdateRouter) -> Self {
        Self {
            transport,
            router,
            pending: Mutex::new(HashMap::new()),
            next_request_id: AtomicU64::new(1),
            queue: Mutex::new(DispatchQueue::default()),
        }
    }

    /// Submits a request and returns a future for its response. Concurrent
    /// sends are independent; there is no queuing, batching, timeout, or
    /// cancellation at this layer.
    pub fn send(&self, request: Request) -> PendingResponse {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = oneshot::channel();

        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(request_id, sender);
        }

        let kind = request.kind_name();
        if let Err(error) = self.transport.submit(RequestEnvelope {
            id: request_id,
            request,
        }) {
            tracing::warn!(
                code = SUBMIT_FAILED,
                request_id,
                kind,
                error = %error,
                "transport rejected request submission"
            );
            self.reject_pending(request_id, error);
        }

        PendingResponse { receiver }
    }

    /// Dispatches a locally synthesized update through the same routing
    /// table as server updates. When called from inside a subscriber the
    /// update is deferred until the in-flight dispatch completes; callers
    /// outside a dispatch observe it fully applied on return.
    pub fn client_update(&self, update: ClientUpdate) {
        self.dispatch(DispatchItem::Client(update));
    }

    /// Entry point for the transport pump: one call per inbound event, in
    /// arrival order.
    pub fn handle_transport_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Update(update) => self.dispatch(DispatchItem::Server(update)),
            TransportEvent::Response { request_id, result } => {
                // Fold entity-bearing payloads into the stores first, so a
                // caller awaiting the response observes them applied.
                if let Ok(response) = &result {
                    for update in response_echoes(response) {
                        self.dispatch(DispatchItem::Server(update));
                    }
                }

                let waiter = self
                    .pending
                    .lock()
                    .ok()
                    .and_then(|mut pending| pending.remove(&request_id));

                match waiter {
                    Some(sender) => {
                        let _ = sender.send(result.map_err(RequestError::Protocol));
                    }
                    None => tracing::debug!(
                        code = RESPONSE_WITHOUT_WAITER,
                        request_id,
                        "dropping response with no pending request"
                    ),
                }
            }
        }
    }

    pub(crate) fn pending_request_count(&self) -> usize {
        self.pending.lock().map(|pending| pending.len()).unwrap_or(0)
    }

    fn reject_pending(&self, request_id: u64, error: TransportError) {
        let waiter = self
            .pending
            .lock()
            .ok()
            .and_then(|mut pending| pending.remove(&request_id));

        if let Some(sender) = waiter {
            let _ = sender.send(Err(RequestError::Transport(error)));
        }
    }

    fn dispatch(&self, item: DispatchItem) {
        {
            let Ok(mut queue) = self.queue.lock() else {
                return;
            };
            queue.items.push_back(item);
            if queue.draining {
                // A dispatch further up the stack owns the drain loop; it
                // will pick this item up in order.
                return;
            }
            queue.draining = true;
        }

        loop {
            let next = {
                let Ok(mut queue) = self.queue.lock() else {
                    return;
                };
                match queue.items.pop_front() {
                    Some(item) => item,
                    None => {
                        queue.draining = false;
                        return;
                    }
                }
            };

            self.router.route(next);
        }
    }
}

/// Future for one in-flight request. Resolves with the protocol response,
/// the structured protocol error, or a transport failure.
pub struct PendingResponse {
    receiver: oneshot::Receiver<Result<Response, RequestError>>,
}

impl Future for PendingResponse {
    type Output = Result<Response, RequestError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(RequestError::TransportClosed)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Responses that carry entities are replayed into the stores as synthetic
/// updates, reusing the exact routing the server-origin variants take.
fn response_echoes(response: &Response) -> Vec<Update> {
    match response {
        Response::Chat { chat } => vec![Update::NewChat { chat: chat.clone() }],
        Response::User { user } => vec![Update::User { user: user.clone() }],
        Response::Message { message } => vec![Update::NewMessage {
            message: message.clone(),
        }],
        Response::Messages { messages } => messages
            .iter()
            .cloned()
            .map(|message| Update::NewMessage { message })
            .collect(),
        Response::File { file } => vec![Update::File { file: file.clone() }],
        Response::Ok => Vec::new(),
    }
}
