//! Value Object 定義
//!
//! 文字列 ID やメッセージ本文など、生成時に検証される不変の値。
//! 一度生成された値は常に妥当であることが保証されます。

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Declares a validated, non-empty string value object with a length cap.
macro_rules! string_value_object {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Maximum length in characters
            pub const MAX_LEN: usize = $max;

            /// 検証して生成（前後の空白は除去）
            pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ValueObjectError::Empty($field));
                }
                if trimmed.chars().count() > Self::MAX_LEN {
                    return Err(ValueObjectError::TooLong {
                        field: $field,
                        max: Self::MAX_LEN,
                    });
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_value_object!(
    /// 認証済みユーザーの ID
    UserId,
    "user_id",
    64
);

string_value_object!(
    /// 表示名
    Username,
    "username",
    64
);

string_value_object!(
    /// チャットルームの ID
    RoomId,
    "room_id",
    128
);

string_value_object!(
    /// メッセージ本文
    MessageContent,
    "content",
    4000
);

impl UserId {
    /// システム通知の送信者として使う予約 ID
    pub fn system() -> Self {
        Self("system".to_string())
    }
}

impl Username {
    /// システム通知の表示名
    pub fn system() -> Self {
        Self("System".to_string())
    }

    /// 表示名が指定されなかったユーザーの既定名（`User_{id}`）
    pub fn fallback_for(user_id: &UserId) -> Self {
        let name: String = format!("User_{}", user_id.as_str())
            .chars()
            .take(Self::MAX_LEN)
            .collect();
        Self(name)
    }
}

impl MessageContent {
    /// Hub が組み立てる通知文（表示名の上限が本文の上限より十分小さいので検証不要）
    pub(crate) fn system_text(text: String) -> Self {
        Self(text)
    }
}

/// メッセージの一意な ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 1 本のライブ接続を識別する ID
///
/// 同じユーザーが再接続した場合でも、古い接続の切断処理が新しい接続を
/// 巻き込まないようにするために使います。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 書籍 ID（DB の採番値）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(i64);

impl BookId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
