use std::sync::Arc;

use crate::{
    commands::{
        command_error::CommandError,
        get::get,
        put::put,
        read::read,
    },
    statistics::OperationKind,
    tuple_space::TupleSpace,
};

/// A request parsed from a frame payload.
///
/// The payload is `COMMAND KEY [VALUE]`, split on the first two single spaces.
/// Command names are case sensitive.
#[derive(Debug, PartialEq, Clone)]
pub struct CommandHandler {
    pub kind: OperationKind,
    pub arguments: Vec<String>,
}

impl CommandHandler {
    /// Recognizes the command word of a request.
    ///
    /// Arguments are only validated by [`CommandHandler::handle_command`], so a
    /// recognized command always has a kind, even when its key is missing.
    ///
    /// # Returns
    ///
    /// * `Ok(CommandHandler)` - A recognized command
    /// * `Err(CommandError::InvalidCommand)` - If the command is unknown
    ///
    /// # Examples
    ///
    /// ```
    /// use tuple_space::commands::CommandHandler;
    /// use tuple_space::statistics::OperationKind;
    ///
    /// let handler = CommandHandler::new("PUT greeting hello world").unwrap();
    /// assert_eq!(handler.kind, OperationKind::Put);
    /// assert_eq!(handler.arguments, vec!["greeting", "hello world"]);
    /// ```
    pub fn new(input: &str) -> Result<Self, CommandError> {
        let mut parts = input.splitn(3, ' ');

        let kind = match parts.next() {
            Some("READ") => OperationKind::Read,
            Some("GET") => OperationKind::Get,
            Some("PUT") => OperationKind::Put,
            _ => return Err(CommandError::InvalidCommand),
        };

        Ok(Self {
            kind,
            arguments: parts.map(|part| part.to_string()).collect(),
        })
    }

    /// Runs the command against the tuple space and returns the reply text.
    ///
    /// A missing or empty key is rejected with `CommandError::InvalidCommand`.
    pub async fn handle_command(&self, space: Arc<TupleSpace>) -> Result<String, CommandError> {
        match self.kind {
            OperationKind::Read => read(space, self.arguments.clone()).await,
            OperationKind::Get => get(space, self.arguments.clone()).await,
            OperationKind::Put => put(space, self.arguments.clone()).await,
        }
    }
}
