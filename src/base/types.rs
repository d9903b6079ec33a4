use tokio::sync::oneshot;

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// An `app_mention` delivery, reduced to what the mention handler needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionEvent {
    pub channel_id: String,
    pub user: String,
    pub text: String,
}

/// A slash command invocation, reduced to what the command handlers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    pub channel_id: String,
    pub user_id: String,
    pub command: String,
    pub text: String,
}

/// A binary file to be uploaded to the chat platform.
///
/// The file type is inferred by the platform from `filename`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub title: String,
    pub initial_comment: String,
}

/// One-shot acknowledgement for a slash command.
///
/// The transport holds the receiving half and only answers the platform once
/// the handler has called [`CommandAck::ack`].
#[derive(Debug)]
pub struct CommandAck {
    sender: oneshot::Sender<()>,
}

impl CommandAck {
    /// Create an acknowledgement together with the receiver the transport waits on.
    pub fn channel() -> (Self, oneshot::Receiver<()>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    /// Acknowledge the command.
    ///
    /// Fails if the transport stopped waiting for the acknowledgement.
    pub fn ack(self) -> Void {
        self.sender.send(()).map_err(|_| anyhow::anyhow!("Command acknowledgement receiver dropped."))
    }
}
