use serde::{Deserialize, Serialize};

use crate::domain::{Item, ItemId};

/// Body of `POST /items`. The remote resource assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItemRequest {
    pub name: String,
    pub description: String,
}

impl From<&Item> for NewItemRequest {
    fn from(draft: &Item) -> Self {
        Self {
            name: draft.name.clone(),
            description: draft.description.clone(),
        }
    }
}

/// Body of `PUT /items/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    pub id: ItemId,
    pub name: String,
    pub description: String,
}

impl UpdateItemRequest {
    /// The body always carries the id addressed by the request path.
    pub fn for_path(id: ItemId, patch: &Item) -> Self {
        Self {
            id,
            name: patch.name.clone(),
            description: patch.description.clone(),
        }
    }
}
