//! Display helpers for faucet frontends.

/// Format a millisecond remainder as `"4m 30s"`.
///
/// Rounds up to the next whole second so a countdown never shows zero
/// while time remains.
pub fn format_remaining(remaining_ms: u64) -> String {
    let total_secs = (remaining_ms + 999) / 1000;
    format!("{}m {}s", total_secs / 60, total_secs % 60)
}

/// Shorten an address for display: first and last four characters.
///
/// Addresses at most eight characters long are returned unchanged.
pub fn short_address(address: &str) -> String {
    const EDGE: usize = 4;
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= EDGE * 2 {
        return address.to_string();
    }
    let head: String = chars[..EDGE].iter().collect();
    let tail: String = chars[chars.len() - EDGE..].iter().collect();
    format!("{}...{}", head, tail)
}
