use thiserror::Error;

use crate::domain::{
    request::{ProtocolError, Request, Response},
    update::Update,
};

/// A request tagged with the correlation id the transport must echo back in
/// its response event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
    pub id: u64,
    pub request: Request,
}

/// Inbound traffic from the transport: pushed updates and responses to
/// previously submitted requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Update(Update),
    Response {
        request_id: u64,
        result: Result<Response, ProtocolError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,
    #[error("transport rejected the request: {reason}")]
    Rejected { reason: String },
}

/// Failure of a single `send` call. Protocol errors are propagated from the
/// server unchanged; the transport variants cover local submission failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("request could not be submitted: {0}")]
    Transport(TransportError),
    #[error("transport closed before responding")]
    TransportClosed,
}

/// Outbound half of the protocol transport. Implementations own the wire
/// encoding and concurrency; this crate only correlates ids. `submit` must
/// not block.
pub trait Transport: Send + Sync {
    fn submit(&self, envelope: RequestEnvelope) -> Result<(), TransportError>;
}
