use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::colors::ColorMapping;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextId(Uuid);

impl TextId {
    pub fn new() -> Self {
        TextId(Uuid::new_v4())
    }
}

impl Default for TextId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for TextId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(TextId)
    }
}

impl Display for TextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextData {
    pub body: String,
    pub title: String,
    #[serde(alias = "colorMapping")]
    pub colors: ColorMapping,
}

/// A titled document in the notepad.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub id: TextId,
    #[serde(default)]
    pub data: TextData,
}

impl Text {
    /// A blank document with a fresh id.
    pub fn new() -> Self {
        Text {
            id: TextId::new(),
            data: TextData::default(),
        }
    }

    /// The title, or a placeholder when it is blank.
    pub fn display_title(&self) -> &str {
        match self.data.title.trim() {
            "" => "Untitled",
            title => title,
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}
