use std::sync::mpsc;

use crate::sync::requests::MutationRequest;

/// Sending half of the outbox, handed to views. Cheap to clone.
#[derive(Clone)]
pub struct OutboxSender {
    tx: mpsc::Sender<MutationRequest>,
}

impl OutboxSender {
    /// Fire-and-forget send. If the collaborator side is gone the request is
    /// dropped; the next snapshot simply never reflects it.
    pub fn send(&self, request: MutationRequest) {
        let _ = self.tx.send(request);
    }
}

/// Queue of mutation requests between the engine and the persistence
/// collaborator. The collaborator drains it each tick and answers with
/// fresh snapshots, never with return values.
pub struct RequestOutbox {
    tx: mpsc::Sender<MutationRequest>,
    rx: mpsc::Receiver<MutationRequest>,
}

impl RequestOutbox {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        RequestOutbox { tx, rx }
    }

    /// A sender for the view layer to push requests through.
    pub fn sender(&self) -> OutboxSender {
        OutboxSender {
            tx: self.tx.clone(),
        }
    }

    /// Non-blocking poll for pending requests.
    /// Returns all queued requests in send order (may be empty).
    pub fn poll(&self) -> Vec<MutationRequest> {
        let mut requests = Vec::new();
        while let Ok(request) = self.rx.try_recv() {
            requests.push(request);
        }
        requests
    }
}

impl Default for RequestOutbox {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
