use crate::frame::MAX_PAYLOAD_LEN;

/// Renders `OK (<key>, <value>) <action>`.
pub fn ok_reply(key: &str, value: &str, action: &str) -> String {
    format!("OK ({}, {}) {}", key, value, action)
}

/// Whether `OK (<key>, <value>) <action>` fits in a single frame.
///
/// Checked before the tuple space is touched, so a request whose reply could
/// not be sent never changes the space.
pub fn fits_in_frame(key: &str, value: &str, action: &str) -> bool {
    "OK (".len() + key.len() + ", ".len() + value.len() + ") ".len() + action.len()
        <= MAX_PAYLOAD_LEN
}
