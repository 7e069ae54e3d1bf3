use std::sync::Arc;

use crate::{
    commands::{
        command_error::CommandError,
        reply::{fits_in_frame, ok_reply},
    },
    tuple_space::TupleSpace,
};

/// Represents the parsed arguments for READ command
pub struct ReadArguments {
    /// The key to look up
    key: String,
}

impl ReadArguments {
    /// Anything after the key is ignored.
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        match arguments.first() {
            Some(key) if !key.is_empty() => Ok(Self { key: key.clone() }),
            _ => Err(CommandError::InvalidCommand),
        }
    }
}

/// Handles the READ command.
///
/// Returns the tuple stored under the key without removing it.
///
/// # Returns
///
/// * `Ok(String)` - `OK (<key>, <value>) read`
/// * `Err(CommandError::KeyNotFound)` - If no tuple is stored under the key
/// * `Err(CommandError::ReplyTooLarge)` - If the tuple is too large to send back in one frame
/// * `Err(CommandError::InvalidCommand)` - If the key is missing
pub async fn read(space: Arc<TupleSpace>, arguments: Vec<String>) -> Result<String, CommandError> {
    let read_arguments = ReadArguments::parse(arguments)?;

    let Some(value) = space.read(&read_arguments.key).await else {
        return Err(CommandError::KeyNotFound(read_arguments.key));
    };

    if !fits_in_frame(&read_arguments.key, &value, "read") {
        return Err(CommandError::ReplyTooLarge);
    }

    Ok(ok_reply(&read_arguments.key, &value, "read"))
}
