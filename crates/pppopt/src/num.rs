//! C-compatible numeric parsing for directive arguments.
//!
//! Directive values historically went through `strtoul`, and configurations
//! in the field rely on its quirks: leading whitespace, an optional sign
//! that wraps the unsigned result, base auto-detection from `0x`/`0`
//! prefixes, and parsing stopping silently at the first invalid character.
//! The netmask and speed setters check the remainder themselves; plain
//! integer directives do not.

/// Parse an unsigned 32-bit value with `strtoul` semantics.
///
/// `base` may be 0 (auto-detect: `0x` → 16, leading `0` → 8, else 10),
/// 8, 10 or 16; base 16 also accepts an optional `0x` prefix. Returns the
/// value and the unparsed remainder, or `None` when no digits were
/// consumed. A leading `-` wraps the result; overflow wraps as well.
pub fn strtoul(s: &str, base: u32) -> Option<(u32, &str)> {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut i = 0;

    let mut negate = false;
    match bytes.get(i).copied() {
        Some(b'-') => {
            negate = true;
            i += 1;
        }
        Some(b'+') => {
            i += 1;
        }
        _ => {}
    }

    let mut base = base;
    let hex_prefixed = bytes.get(i).copied() == Some(b'0')
        && matches!(bytes.get(i + 1).copied(), Some(b'x' | b'X'))
        && bytes
            .get(i + 2)
            .is_some_and(|b| (*b as char).is_ascii_hexdigit());
    if base == 0 {
        if hex_prefixed {
            base = 16;
            i += 2;
        } else if bytes.get(i).copied() == Some(b'0') {
            base = 8;
        } else {
            base = 10;
        }
    } else if base == 16 && hex_prefixed {
        i += 2;
    }

    let start = i;
    let mut value: u32 = 0;
    while let Some(&b) = bytes.get(i) {
        let Some(d) = (b as char).to_digit(base) else {
            break;
        };
        value = value.wrapping_mul(base).wrapping_add(d);
        i += 1;
    }
    if i == start {
        return None;
    }

    if negate {
        value = value.wrapping_neg();
    }
    Some((value, &t[i..]))
}

/// Parse an entire word as an unsigned value in the given base.
/// Trailing non-numeric text is ignored, as `strtoul` callers expect.
pub fn parse_number(word: &str, base: u32) -> Option<u32> {
    strtoul(word, base).map(|(v, _)| v)
}

/// Parse an entire word as a signed value, base auto-detected.
pub fn parse_int(word: &str) -> Option<i32> {
    parse_number(word, 0).map(|v| v as i32)
}
