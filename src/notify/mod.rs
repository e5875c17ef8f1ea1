//! Human-readable alerts built from decoded events.
//! Delivery to a chat service is left to a `NotificationSink` implementation.

pub mod attachment;
pub mod notifier;

pub use attachment::{Attachment, AttachmentField, HasAttachment};
pub use notifier::{Notification, NotificationSink, Notifier, NotifyArg, partition_args, render};
