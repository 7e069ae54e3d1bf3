use std::sync::Arc;

use crate::{
    commands::{
        command_error::CommandError,
        reply::{fits_in_frame, ok_reply},
    },
    tuple_space::TupleSpace,
};

/// Represents the parsed arguments for PUT command
pub struct PutArguments {
    /// The key to insert under
    key: String,
    /// The value to be stored, empty when the request carried none
    value: String,
}

impl PutArguments {
    /// Parses `[key]` or `[key, value]`.
    ///
    /// The value is everything after the second space of the request, so it may
    /// itself contain spaces.
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        let mut arguments = arguments.into_iter();

        let key = match arguments.next() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(CommandError::InvalidCommand),
        };
        let value = arguments.next().unwrap_or_default();

        Ok(Self { key, value })
    }
}

/// Handles the PUT command.
///
/// Inserts the tuple only if no tuple is stored under the key yet. An
/// existing tuple is never overwritten.
///
/// # Returns
///
/// * `Ok(String)` - `OK (<key>, <value>) added`
/// * `Err(CommandError::KeyAlreadyExists)` - If a tuple is already stored under the key
/// * `Err(CommandError::ReplyTooLarge)` - If the reply would not fit in a frame; nothing is inserted
/// * `Err(CommandError::InvalidCommand)` - If the key is missing
pub async fn put(space: Arc<TupleSpace>, arguments: Vec<String>) -> Result<String, CommandError> {
    let put_arguments = PutArguments::parse(arguments)?;

    if !fits_in_frame(&put_arguments.key, &put_arguments.value, "added") {
        return Err(CommandError::ReplyTooLarge);
    }

    if !space.insert(&put_arguments.key, &put_arguments.value).await {
        return Err(CommandError::KeyAlreadyExists(put_arguments.key));
    }

    Ok(ok_reply(&put_arguments.key, &put_arguments.value, "added"))
}
