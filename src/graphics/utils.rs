/// Size of the buffer info logs are read into. Anything longer is cut off by the driver.
pub const INFO_LOG_CAPACITY: usize = 512;

/// A zeroed buffer of `len` bytes for the driver to write an info log into.
pub fn create_log_buffer(len: usize) -> Vec<u8> {
    vec![0; len]
}

/// Turns the bytes a driver wrote into an info log buffer into a string of at most
/// `capacity - 1` bytes, dropping the terminator and anything past it.
pub fn info_log_from_bytes(bytes: &[u8], capacity: usize) -> String {
    let end = bytes.iter()
        .position(|&b| b == 0)
        .unwrap_or(bytes.len());

    let text = String::from_utf8_lossy(&bytes[..end]);
    bounded_log(text.trim_end(), capacity)
}

/// Cuts `log` down so it fits a `capacity`-byte buffer with room for the terminator, never
/// splitting a character.
pub fn bounded_log(log: &str, capacity: usize) -> String {
    let limit = capacity.saturating_sub(1);
    if log.len() <= limit {
        return log.to_owned();
    }

    let mut end = limit;
    while !log.is_char_boundary(end) {
        end -= 1;
    }

    log[..end].to_owned()
}
