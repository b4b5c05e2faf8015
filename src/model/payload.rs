//! Upstream `/pokemon/{id}` response body. Only the fields the mirror keeps are modelled;
//! every nested sprite link is optional because the catalog omits or nulls them freely.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Version group key and game key of the animated sprite set that gets mirrored.
pub const ANIMATED_GENERATION: &str = "generation-v";
pub const ANIMATED_VERSION: &str = "black-white";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogPayload {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub height: i32,
    #[serde(default)]
    pub weight: i32,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatDetail>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
    /// generation key -> game key -> sprite set.
    #[serde(default)]
    pub versions: Option<HashMap<String, HashMap<String, VersionSprites>>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(default, rename = "official-artwork")]
    pub official_artwork: Option<FrontSprite>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FrontSprite {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VersionSprites {
    #[serde(default)]
    pub animated: Option<AnimatedSprites>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnimatedSprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub back_default: Option<String>,
}

/// `{ "name": ..., "url": ... }` reference used for types, abilities and stats.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NamedResource {
    pub fn named(name: impl Into<String>) -> Self {
        NamedResource {
            name: name.into(),
            url: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeSlot {
    pub slot: i32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AbilitySlot {
    #[serde(default)]
    pub is_hidden: bool,
    pub slot: i32,
    pub ability: NamedResource,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatDetail {
    pub base_stat: i32,
    #[serde(default)]
    pub effort: i32,
    pub stat: NamedResource,
}
