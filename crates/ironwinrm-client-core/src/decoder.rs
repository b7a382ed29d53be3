//! Output Decoder: base64 stream text to normalized text.
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Code page whose streams are UTF-16LE.
pub const UTF16LE_CODEPAGE: u32 = 1200;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decodes one complete `rsp:Stream` text.
///
/// Whitespace is ignored and concatenated padded segments are decoded in turn. Code page
/// 1200 is read as UTF-16LE, anything else as UTF-8 with invalid sequences replaced.
pub fn decode(raw: &str, codepage: Option<u32>) -> Result<String, base64::DecodeError> {
    let bytes = decode_bytes(raw)?;

    if codepage == Some(UTF16LE_CODEPAGE) {
        let units: Vec<u16> = bytes
            .chunks(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair.get(1).copied().unwrap_or_default()]))
            .collect();
        let text = String::from_utf16_lossy(&units);
        return Ok(text.strip_prefix('\u{FEFF}').map(ToOwned::to_owned).unwrap_or(text));
    }

    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

pub fn decode_bytes(raw: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let mut bytes = Vec::new();
    let mut rest = compact.as_str();
    while !rest.is_empty() {
        let end = rest.find('=').map_or(rest.len(), |pad| {
            rest[pad..]
                .find(|c| c != '=')
                .map_or(rest.len(), |offset| pad + offset)
        });
        let (segment, tail) = rest.split_at(end);
        STANDARD.decode_vec(segment, &mut bytes)?;
        rest = tail;
    }
    Ok(bytes)
}
