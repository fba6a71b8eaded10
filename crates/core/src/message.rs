//! Outbound message batches.

use election_messages::Message;

/// Ordered messages a round asks the driver to broadcast.
///
/// The driver handles all transport; order is significant only in that
/// a round's own follow-up messages come after what triggered them.
pub type MessageBatch = Vec<Message>;

/// Build a batch from a base message plus extras.
pub fn make_message_batch(
    base: impl Into<Message>,
    extras: impl IntoIterator<Item = Message>,
) -> MessageBatch {
    let mut batch = vec![base.into()];
    batch.extend(extras);
    batch
}

/// Append extras to an existing batch.
pub fn extend_message_batch(
    mut batch: MessageBatch,
    extras: impl IntoIterator<Item = Message>,
) -> MessageBatch {
    batch.extend(extras);
    batch
}
