//! Builds notification messages from a format string and mixed arguments.

use serde::Serialize;
use tracing::{error, info};

use super::attachment::{Attachment, HasAttachment};

const PLACEHOLDER: &str = "{}";

/// One argument to [`Notifier::notify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyArg {
    /// Substituted into the format string
    Value(String),
    /// Sent as a rich attachment
    Attachment(Attachment),
}

impl NotifyArg {
    pub fn value(value: impl ToString) -> Self {
        NotifyArg::Value(value.to_string())
    }

    pub fn attachment(source: &impl HasAttachment) -> Self {
        NotifyArg::Attachment(source.attachment())
    }
}

/// Splits arguments into format values and attachments.
///
/// Every attachment is collected. Only the values that come before the first
/// attachment are used for formatting; values after it are dropped.
pub fn partition_args(args: Vec<NotifyArg>) -> (Vec<String>, Vec<Attachment>) {
    let mut values = Vec::new();
    let mut attachments = Vec::new();

    for arg in args {
        match arg {
            NotifyArg::Value(value) if attachments.is_empty() => values.push(value),
            NotifyArg::Value(_) => {}
            NotifyArg::Attachment(attachment) => attachments.push(attachment),
        }
    }

    (values, attachments)
}

/// Replaces each `{}` in `format` with the next value, in order.
/// Placeholders left over keep their braces; extra values are ignored.
pub fn render(format: &str, values: &[String]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut rest = format;
    let mut values = values.iter();

    while let Some(pos) = rest.find(PLACEHOLDER) {
        out.push_str(&rest[..pos]);
        match values.next() {
            Some(value) => out.push_str(value),
            None => out.push_str(PLACEHOLDER),
        }
        rest = &rest[pos + PLACEHOLDER.len()..];
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub channel: String,
    pub text: String,
    pub attachments: Vec<Attachment>,
}

/// Delivery end of a notifier, for example a chat service client.
pub trait NotificationSink: Send + Sync {
    fn post(&self, notification: &Notification) -> anyhow::Result<()>;
}

pub struct Notifier<S> {
    sink: S,
}

impl<S: NotificationSink> Notifier<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Formats the text, logs it and hands the notification to the sink.
    /// Sink failures are logged and returned to the caller.
    pub fn notify(&self, channel: &str, format: &str, args: Vec<NotifyArg>) -> anyhow::Result<()> {
        let (values, attachments) = partition_args(args);
        let text = render(format, &values);
        info!(channel, attachments = attachments.len(), "{}", text);

        let notification = Notification {
            channel: channel.to_string(),
            text,
            attachments,
        };

        if let Err(err) = self.sink.post(&notification) {
            error!(channel, error = %err, "notification delivery failed");
            return Err(err);
        }

        Ok(())
    }
}
