pub mod autosave;
pub mod outbox;
pub mod requests;

pub use autosave::AutosaveBuffer;
pub use outbox::{OutboxSender, RequestOutbox};
pub use requests::{FieldEdit, MutationRequest};
