//! Wire DTOs for the catalog service payloads.
//!
//! These mirror the catalog JSON exactly and are converted into domain
//! types at the adapter boundary; nothing here leaks out of the module.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::{capitalize, CreatureDetails, CreatureSummary};

/// A `{name, url}` pair, the catalog's universal resource reference.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamedResourceDto {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// One page of the creature index.
#[derive(Debug, Deserialize)]
pub(crate) struct CreaturePageDto {
    pub results: Vec<NamedResourceDto>,
}

impl CreaturePageDto {
    pub(crate) fn into_domain(self) -> Vec<CreatureSummary> {
        self.results
            .into_iter()
            .map(|item| CreatureSummary {
                name: item.name,
                reference_url: item.url,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TypeSlotDto {
    #[serde(rename = "type")]
    pub creature_type: NamedResourceDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatSlotDto {
    pub base_stat: i64,
    pub stat: NamedResourceDto,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ArtworkDto {
    pub front_default: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OtherSpritesDto {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: ArtworkDto,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SpritesDto {
    #[serde(default)]
    pub other: OtherSpritesDto,
}

/// Full creature details payload.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatureDetailsDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sprites: SpritesDto,
    #[serde(default)]
    pub types: Vec<TypeSlotDto>,
    #[serde(default)]
    pub stats: Vec<StatSlotDto>,
}

impl CreatureDetailsDto {
    /// Extract the canonical creature fields, capitalizing the name and
    /// types the way the rest of the system expects them.
    pub(crate) fn into_domain(self) -> Result<CreatureDetails, String> {
        let image_uri = self
            .sprites
            .other
            .official_artwork
            .front_default
            .ok_or_else(|| format!("creature '{}' has no official artwork image", self.name))?;

        let types = self
            .types
            .into_iter()
            .map(|slot| capitalize(&slot.creature_type.name))
            .collect();
        let stats: BTreeMap<String, i64> = self
            .stats
            .into_iter()
            .map(|slot| (slot.stat.name, slot.base_stat))
            .collect();

        Ok(CreatureDetails {
            id: self.id,
            name: capitalize(&self.name),
            image_uri,
            types,
            stats,
        })
    }
}
