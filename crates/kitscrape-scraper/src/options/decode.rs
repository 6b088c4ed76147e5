//! Escape clean-up for strings left half-escaped by the option literal.
//!
//! Both functions are total: input they cannot decode is returned as-is.

/// Turns escaped path separators (`\/`) back into `/`.
pub(crate) fn decode_path_escapes(raw: &str) -> String {
    raw.replace("\\/", "/")
}

/// Decodes `\uXXXX` sequences (including surrogate pairs).
///
/// Any malformed sequence leaves the whole string unchanged.
pub(crate) fn decode_unicode_escapes(raw: &str) -> String {
    if !raw.contains("\\u") {
        return raw.to_string();
    }
    try_decode_unicode(raw).unwrap_or_else(|| raw.to_string())
}

fn try_decode_unicode(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(idx) = rest.find("\\u") {
        out.push_str(&rest[..idx]);
        let (unit, after) = read_unit(&rest[idx + 2..])?;

        if (0xD800..0xDC00).contains(&unit) {
            let low_src = after.strip_prefix("\\u")?;
            let (low, after_low) = read_unit(low_src)?;
            if !(0xDC00..0xE000).contains(&low) {
                return None;
            }
            let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
            out.push(char::from_u32(code)?);
            rest = after_low;
        } else {
            out.push(char::from_u32(unit)?);
            rest = after;
        }
    }

    out.push_str(rest);
    Some(out)
}

/// Reads four hex digits from the start of `s`.
fn read_unit(s: &str) -> Option<(u32, &str)> {
    let hex = s.get(..4)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let unit = u32::from_str_radix(hex, 16).ok()?;
    Some((unit, &s[4..]))
}
