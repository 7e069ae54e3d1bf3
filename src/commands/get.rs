use std::sync::Arc;

use crate::{
    commands::{
        command_error::CommandError,
        reply::{fits_in_frame, ok_reply},
    },
    tuple_space::{TakeOutcome, TupleSpace},
};

/// Represents the parsed arguments for GET command
pub struct GetArguments {
    /// The key of the tuple to remove
    key: String,
}

impl GetArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        match arguments.first() {
            Some(key) if !key.is_empty() => Ok(Self { key: key.clone() }),
            _ => Err(CommandError::InvalidCommand),
        }
    }
}

/// Handles the GET command.
///
/// Removes the tuple stored under the key and returns it. When several
/// clients take the same key at once, exactly one of them receives the tuple
/// and the others are told it does not exist. A tuple too large to send back
/// in one frame is left in place.
///
/// # Returns
///
/// * `Ok(String)` - `OK (<key>, <value>) removed`
/// * `Err(CommandError::KeyNotFound)` - If no tuple is stored under the key
/// * `Err(CommandError::ReplyTooLarge)` - If the reply would not fit in a frame
/// * `Err(CommandError::InvalidCommand)` - If the key is missing
///
/// # Examples
///
/// ```ignore
/// // PUT a 1, then GET a
/// let result = get(space, vec!["a".to_string()]).await;
/// // Returns: Ok("OK (a, 1) removed")
/// ```
pub async fn get(space: Arc<TupleSpace>, arguments: Vec<String>) -> Result<String, CommandError> {
    let get_arguments = GetArguments::parse(arguments)?;

    let key = get_arguments.key;

    match space
        .take_if(&key, |value| fits_in_frame(&key, value, "removed"))
        .await
    {
        TakeOutcome::Taken(value) => Ok(ok_reply(&key, &value, "removed")),
        TakeOutcome::Refused => Err(CommandError::ReplyTooLarge),
        TakeOutcome::Missing => Err(CommandError::KeyNotFound(key)),
    }
}
