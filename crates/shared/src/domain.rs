use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ItemId);

impl ItemId {
    /// Placeholder id carried by drafts until the remote resource assigns one.
    pub const UNASSIGNED: ItemId = ItemId(0);

    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    pub description: String,
}

impl Item {
    /// Builds an item that has not been stored remotely yet.
    pub fn draft(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: ItemId::UNASSIGNED,
            name: name.into(),
            description: description.into(),
        }
    }
}
