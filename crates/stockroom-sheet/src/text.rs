//! Text decoding for CSV input.

use encoding_rs::WINDOWS_1252;

/// Decode CSV bytes as UTF-8, falling back to Windows-1252 when the bytes are
/// not valid UTF-8 (spreadsheet exports on Windows commonly are). A leading
/// BOM is dropped.
pub fn decode_text(bytes: &[u8]) -> String {
  let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
  match std::str::from_utf8(bytes) {
    Ok(s) => s.to_owned(),
    Err(e) => {
      tracing::debug!(
        valid_up_to = e.valid_up_to(),
        "input is not UTF-8; decoding as Windows-1252"
      );
      let (text, _, _) = WINDOWS_1252.decode(bytes);
      text.into_owned()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn utf8_passes_through() {
    assert_eq!(decode_text("Muñeca".as_bytes()), "Muñeca");
  }

  #[test]
  fn bom_is_stripped() {
    assert_eq!(decode_text(b"\xEF\xBB\xBFCodigo"), "Codigo");
  }

  #[test]
  fn latin1_range_fallback() {
    // "Muñeca" with ñ as the single byte 0xF1.
    assert_eq!(decode_text(b"Mu\xF1eca"), "Muñeca");
  }

  #[test]
  fn windows_1252_punctuation() {
    assert_eq!(
      decode_text(b"\x93Oferta\x94 \x96 10 \x80"),
      "\u{201C}Oferta\u{201D} \u{2013} 10 \u{20AC}"
    );
  }
}
