mod command_error;
mod command_handler;
mod get;
mod put;
mod read;
mod reply;

pub use command_error::CommandError;
pub use command_handler::CommandHandler;
