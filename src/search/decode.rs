//! Decoding of generator-escaped keys and HTML-escaped labels.

use std::borrow::Cow;

/// Strips the trailing numeric disambiguation suffix from a key.
///
/// `enqueue_177` becomes `enqueue`. Keys without a purely numeric last
/// `_` segment are returned unchanged.
pub(crate) fn strip_suffix(key: &str) -> &str {
    match key.rsplit_once('_') {
        Some((stem, suffix))
            if !stem.is_empty()
                && !suffix.is_empty()
                && suffix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            stem
        }
        _ => key,
    }
}

/// Decodes a stored key into the term it was generated from.
///
/// The generator lowercases names and writes every byte outside `[a-z0-9]` as
/// `_` followed by two hex digits, then appends `_<n>`:
/// - `elf_2eh_161` → `elf.h`
/// - `elf32_5fd_5ftag_163` → `elf32_d_tag`
/// - `extend_5fintegral_5ftype_3c_20int_20_3e_188` → `extend_integral_type< int >`
pub(crate) fn decode_key(key: &str) -> String {
    let stem = strip_suffix(key).as_bytes();
    let mut bytes = Vec::with_capacity(stem.len());
    let mut i = 0;

    while i < stem.len() {
        if stem[i] == b'_'
            && let Some(byte) = stem.get(i + 1..i + 3).and_then(hex_byte)
        {
            bytes.push(byte);
            i += 3;
            continue;
        }
        bytes.push(stem[i]);
        i += 1;
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

fn hex_byte(pair: &[u8]) -> Option<u8> {
    let hi = (pair[0] as char).to_digit(16)?;
    let lo = (pair[1] as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

/// Replaces the HTML entities the generator emits in labels and scopes.
///
/// Returns `Cow::Borrowed` when the text contains no `&`.
pub(crate) fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| entity_char(&tail[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

fn entity_char(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}
