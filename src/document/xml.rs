//! Shared helpers for scanning WordprocessingML event streams

/// Match `w:t` by qualified name so math runs (`m:t`) are not collected.
pub(crate) fn is_text_element(name: &[u8]) -> bool {
    name == b"w:t" || name == b"t"
}

/// Resolve an entity or character reference to the character it stands for.
///
/// quick-xml reports references inside text as their own events instead of
/// decoding them in place, so the scanners feed them through here. Unknown
/// named entities resolve to `None` and contribute no text.
pub(crate) fn resolve_reference(raw: &[u8]) -> Option<char> {
    match raw {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        [b'#', b'x' | b'X', hex @ ..] => {
            let code = u32::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?;
            char::from_u32(code)
        }
        [b'#', dec @ ..] => {
            let code: u32 = std::str::from_utf8(dec).ok()?.parse().ok()?;
            char::from_u32(code)
        }
        _ => None,
    }
}
