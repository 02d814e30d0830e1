use crate::error::ViewerError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// A rendered message as seen by the search box.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub timestamp_millis: i64,
    pub text: String,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Message {
    pub fn new(timestamp_millis: i64, text: impl Into<String>) -> Self {
        Self {
            timestamp_millis,
            text: text.into(),
            sender: None,
            visible: true,
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }
}

/// Load an archive export: a JSON array of messages.
pub fn load_messages(path: impl AsRef<Path>) -> Result<Vec<Message>, ViewerError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ViewerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let messages: Vec<Message> =
        serde_json::from_str(&content).map_err(|source| ViewerError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Loaded {} messages from {:?}", messages.len(), path);
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_messages_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"timestamp_millis": 1000, "text": "hello", "sender": "Alice"}},
                {{"timestamp_millis": 2000, "text": "bye", "visible": false}}
            ]"#
        )
        .unwrap();

        let messages = load_messages(file.path()).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender.as_deref(), Some("Alice"));
        assert!(messages[0].visible);
        assert!(!messages[1].visible);
        assert_eq!(messages[1].sender, None);
    }

    #[test]
    fn test_load_messages_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(
            load_messages(file.path()),
            Err(ViewerError::Json { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_messages(&missing),
            Err(ViewerError::Io { .. })
        ));
    }
}
