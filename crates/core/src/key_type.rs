use std::fmt;

/// Value types a new key can be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    String,
    List,
    Hash,
    Set,
    SortedSet,
}

impl KeyType {
    /// Menu order of the add-key chooser.
    pub const ALL: [KeyType; 5] = [
        KeyType::String,
        KeyType::List,
        KeyType::Hash,
        KeyType::Set,
        KeyType::SortedSet,
    ];

    pub fn label(self) -> &'static str {
        match self {
            KeyType::String => "String",
            KeyType::List => "List",
            KeyType::Hash => "Hash",
            KeyType::Set => "Set",
            KeyType::SortedSet => "Sorted Set",
        }
    }

    /// Path token used by the server's `/key/new/<token>` routes (the Redis type name).
    pub fn token(self) -> &'static str {
        match self {
            KeyType::String => "string",
            KeyType::List => "list",
            KeyType::Hash => "hash",
            KeyType::Set => "set",
            KeyType::SortedSet => "zset",
        }
    }

    pub fn from_token(s: &str) -> Option<KeyType> {
        let s = s.trim().to_ascii_lowercase();
        KeyType::ALL.into_iter().find(|t| t.token() == s)
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
