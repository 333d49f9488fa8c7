// Share-link codec
//
// A share token is URL-safe base64 over a small JSON payload:
// `{ "language": <label>, "code": <text>, "timestamp": <RFC 3339> }`.
// Decoding tolerates arbitrary foreign input by failing with a typed
// error; it never panics and never mutates anything.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Query parameter carrying the token in a share link.
pub const SHARE_PARAM: &str = "shared";

#[derive(Debug, Serialize, Deserialize)]
struct SharePayload {
    language: String,
    code: String,
    #[serde(default)]
    timestamp: String,
}

/// Why a token failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// Not valid URL-safe base64.
    Encoding,
    /// Base64 decoded, but the payload is not the expected JSON shape
    /// (including missing `language`/`code` fields).
    Payload,
    /// Payload carried a language label this playground does not know.
    UnknownLanguage(String),
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareError::Encoding => write!(f, "token is not valid base64"),
            ShareError::Payload => write!(f, "token payload is not a valid share object"),
            ShareError::UnknownLanguage(label) => write!(f, "unknown language {:?}", label),
        }
    }
}

impl std::error::Error for ShareError {}

/// Encode a (language, source text) pair into a transport-safe token.
pub fn encode(language: Language, code: &str, timestamp: DateTime<Utc>) -> String {
    let payload = SharePayload {
        language: language.label().to_string(),
        code: code.to_string(),
        timestamp: timestamp.to_rfc3339(),
    };
    // A struct of three strings cannot fail to serialize.
    let json = serde_json::to_vec(&payload).expect("share payload serializes");
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a token back into its (language, source text) pair.
pub fn decode(token: &str) -> Result<(Language, String), ShareError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|_| ShareError::Encoding)?;
    let payload: SharePayload =
        serde_json::from_slice(&bytes).map_err(|_| ShareError::Payload)?;
    let language = Language::parse(&payload.language)
        .ok_or_else(|| ShareError::UnknownLanguage(payload.language.clone()))?;
    Ok((language, payload.code))
}

/// Extract the share token from a full link, `shared=<token>` query
/// fragment, or bare token.
pub fn token_from_link(link: &str) -> &str {
    let link = link.trim();
    let needle = format!("{}=", SHARE_PARAM);
    match link.find(&needle) {
        Some(idx) => {
            let rest = &link[idx + needle.len()..];
            match rest.find(['&', '#']) {
                Some(end) => &rest[..end],
                None => rest,
            }
        }
        None => link,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_plain_source() {
        let token = encode(Language::Lua, "print('hi')", Utc::now());
        let (lang, code) = decode(&token).unwrap();
        assert_eq!(lang, Language::Lua);
        assert_eq!(code, "print('hi')");
    }

    #[test]
    fn round_trips_unicode_newlines_and_quotes() {
        let source = "print(\"héllo \\\"wörld\\\" 你好\")\n-- ünïcode comment\nlocal s = 'a\nb'\n";
        let token = encode(Language::Python, source, Utc::now());
        let (lang, code) = decode(&token).unwrap();
        assert_eq!(lang, Language::Python);
        assert_eq!(code, source);
    }

    #[test]
    fn token_is_url_safe() {
        let source = "x = [i ** 3 for i in range(64)]\nprint(x)";
        let token = encode(Language::Python, source, Utc::now());
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
        assert!(!token.contains('='));
    }

    #[test]
    fn rejects_invalid_base64() {
        assert_eq!(decode("not%%%base64"), Err(ShareError::Encoding));
    }

    #[test]
    fn rejects_base64_that_is_not_json() {
        let token = URL_SAFE_NO_PAD.encode(b"just some text");
        assert_eq!(decode(&token), Err(ShareError::Payload));
    }

    #[test]
    fn rejects_json_missing_required_fields() {
        let token = URL_SAFE_NO_PAD.encode(br#"{"language":"lua"}"#);
        assert_eq!(decode(&token), Err(ShareError::Payload));

        let token = URL_SAFE_NO_PAD.encode(br#"{"code":"print(1)"}"#);
        assert_eq!(decode(&token), Err(ShareError::Payload));
    }

    #[test]
    fn rejects_unknown_language_label() {
        let token = URL_SAFE_NO_PAD.encode(br#"{"language":"cobol","code":"DISPLAY 'HI'"}"#);
        assert_eq!(
            decode(&token),
            Err(ShareError::UnknownLanguage("cobol".to_string()))
        );
    }

    #[test]
    fn missing_timestamp_is_tolerated() {
        let token = URL_SAFE_NO_PAD.encode(br#"{"language":"lua","code":"print(1)"}"#);
        let (lang, code) = decode(&token).unwrap();
        assert_eq!(lang, Language::Lua);
        assert_eq!(code, "print(1)");
    }

    #[test]
    fn extracts_token_from_full_link() {
        let token = encode(Language::Lua, "print(1)", Utc::now());
        let link = format!("https://scriptpad.dev/play?shared={}&utm=x", token);
        assert_eq!(token_from_link(&link), token);
        assert_eq!(token_from_link(&token), token);
    }
}
