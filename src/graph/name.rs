//! Serialized symbol names.
//!
//! The store identifies symbols by a JSON name hierarchy:
//!
//! ```text
//! {"name_delimiter":".","name_elements":[{"prefix":"","name":"X","postfix":""},
//!                                         {"prefix":"X","name":"getIn","postfix":""}]}
//! ```
//!
//! A qualified name is split on `.`; the prefix and postfix decorate its
//! last element.

use serde::{Deserialize, Serialize};

pub const NAME_DELIMITER: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameElement {
    pub prefix: String,
    pub name: String,
    pub postfix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameHierarchy {
    pub name_delimiter: String,
    pub name_elements: Vec<NameElement>,
}

impl NameHierarchy {
    pub fn new(qualified_name: &str) -> Self {
        Self::decorated(qualified_name, "", "")
    }

    pub fn decorated(qualified_name: &str, prefix: &str, postfix: &str) -> Self {
        let mut name_elements: Vec<NameElement> = qualified_name
            .split(NAME_DELIMITER)
            .map(|name| NameElement {
                prefix: String::new(),
                name: name.to_string(),
                postfix: String::new(),
            })
            .collect();
        if let Some(last) = name_elements.last_mut() {
            last.prefix = prefix.to_string();
            last.postfix = postfix.to_string();
        }
        Self {
            name_delimiter: NAME_DELIMITER.to_string(),
            name_elements,
        }
    }

    /// Element names joined by the delimiter, without decorations
    pub fn qualified_name(&self) -> String {
        self.name_elements
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(&self.name_delimiter)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
