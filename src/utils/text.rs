//! Message line formatting.
//!
//! Messages are converted with their whitespace removed and printed in
//! groups of five symbols, the last group possibly shorter.

/// Number of symbols per printed group.
pub const GROUP_SIZE: usize = 5;

/// Removes every whitespace character from `line`.
pub fn strip_whitespace(line: &str) -> String {
    line.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// Splits `msg` into groups of `size` symbols joined by single spaces.
///
/// Whitespace in `msg` is dropped first. A `size` of 0 leaves the stripped
/// message ungrouped.
///
/// # Examples
///
/// ```
/// use enigma::utils::text::group;
///
/// assert_eq!(group("QVPQSOKOILPUBKJ ZPISFXDW", 5), "QVPQS OKOIL PUBKJ ZPISF XDW");
/// ```
pub fn group(msg: &str, size: usize) -> String {
    let chars: Vec<char> = msg.chars().filter(|ch| !ch.is_whitespace()).collect();
    if size == 0 {
        return chars.into_iter().collect();
    }
    let mut out = String::with_capacity(chars.len() + chars.len() / size);
    for (i, chunk) in chars.chunks(size).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.extend(chunk);
    }
    out
}

/// Groups `msg` in fives.
pub fn group_in_fives(msg: &str) -> String {
    group(msg, GROUP_SIZE)
}
