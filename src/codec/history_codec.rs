use snafu::ResultExt;

use super::{CodecError, DecodeSnafu, EncodeSnafu};
use crate::session::TranscriptEntry;

pub fn encode_history(entries: &[TranscriptEntry]) -> Result<String, CodecError> {
    serde_json::to_string(entries).context(EncodeSnafu { what: "history" })
}

pub fn decode_history(text: &str) -> Result<Vec<TranscriptEntry>, CodecError> {
    serde_json::from_str(text).context(DecodeSnafu { what: "history" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_uses_raw_result_dir_fields() {
        let entries = vec![TranscriptEntry::new("pwd", "~", "~")];

        let encoded = encode_history(&entries).unwrap();

        assert_eq!(encoded, r#"[{"raw":"pwd","result":"~","dir":"~"}]"#);
    }

    #[test]
    fn test_history_keeps_order() {
        let entries = vec![
            TranscriptEntry::new("mkdir a", "", "~"),
            TranscriptEntry::new("cd a", "", "~"),
            TranscriptEntry::new("pwd", "~/a", "~/a"),
        ];

        let decoded = decode_history(&encode_history(&entries).unwrap()).unwrap();

        assert_eq!(decoded, entries);
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(encode_history(&[]).unwrap(), "[]");
        assert!(decode_history("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        assert!(matches!(
            decode_history(r#"{"raw":"ls"}"#),
            Err(CodecError::DecodeError { .. })
        ));
    }
}
