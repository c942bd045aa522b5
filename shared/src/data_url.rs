use base64::Engine;
use thiserror::Error;

pub const PNG_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Error)]
pub enum DataUrlError {
    #[error("not a data URL")]
    NotDataUrl,
    #[error("data URL is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub fn encode_png(bytes: &[u8]) -> String {
    let mut url = String::with_capacity(PNG_PREFIX.len() + bytes.len() * 4 / 3 + 4);
    url.push_str(PNG_PREFIX);
    base64::engine::general_purpose::STANDARD.encode_string(bytes, &mut url);
    url
}

/// Extracts the bytes of a `data:<mime>;base64,<payload>` URL.
pub fn decode(text: &str) -> Result<Vec<u8>, DataUrlError> {
    let trimmed = text.trim();
    if !trimmed.starts_with("data:") {
        return Err(DataUrlError::NotDataUrl);
    }
    let (header, payload) = trimmed.split_once(',').ok_or(DataUrlError::NotDataUrl)?;
    if !header.ends_with(";base64") {
        return Err(DataUrlError::NotBase64);
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_png_prefix() {
        let url = encode_png(b"abc");
        assert_eq!(url, "data:image/png;base64,YWJj");
        assert_eq!(decode(&url).unwrap(), b"abc");
    }

    #[test]
    fn rejects_non_data_urls() {
        assert!(matches!(decode("hello"), Err(DataUrlError::NotDataUrl)));
        assert!(matches!(decode("data:image/png"), Err(DataUrlError::NotDataUrl)));
        assert!(matches!(
            decode("data:text/plain,hello"),
            Err(DataUrlError::NotBase64)
        ));
        assert!(matches!(
            decode("data:image/png;base64,@@@"),
            Err(DataUrlError::Base64(_))
        ));
    }
}
