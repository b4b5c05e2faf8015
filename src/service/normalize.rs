//! Upstream payload -> relational rows. Pure; never fails.

use crate::model::*;

/// Map one payload into the entity row and its child rows.
///
/// Sprite: official artwork, else default front sprite, else empty.
/// Animated sprites: both empty unless the whole gen-5 path is present.
/// Stats: matched by name; any stat the payload lacks is stored as 0.
pub fn normalize(payload: &CatalogPayload) -> NormalizedEntity {
    let (animated_front, animated_back) = animated_sprites(&payload.sprites);
    let entity = CatalogEntity {
        pokedex_id: payload.id,
        name: payload.name.clone(),
        height: payload.height,
        weight: payload.weight,
        sprite_url: primary_sprite(&payload.sprites),
        animated_front,
        animated_back,
    };
    let types = payload
        .types
        .iter()
        .map(|t| TypeAssignment {
            type_name: t.kind.name.clone(),
            slot: t.slot,
        })
        .collect();
    let abilities = payload
        .abilities
        .iter()
        .map(|a| AbilityAssignment {
            ability_name: a.ability.name.clone(),
            is_hidden: a.is_hidden,
            slot: a.slot,
        })
        .collect();
    NormalizedEntity {
        entity,
        types,
        abilities,
        stats: stat_block(&payload.stats),
    }
}

fn primary_sprite(sprites: &Sprites) -> String {
    sprites
        .other
        .as_ref()
        .and_then(|o| o.official_artwork.as_ref())
        .and_then(|a| non_empty(a.front_default.as_deref()))
        .or_else(|| non_empty(sprites.front_default.as_deref()))
        .unwrap_or_default()
        .to_string()
}

fn animated_sprites(sprites: &Sprites) -> (String, String) {
    let animated = sprites
        .versions
        .as_ref()
        .and_then(|v| v.get(ANIMATED_GENERATION))
        .and_then(|g| g.get(ANIMATED_VERSION))
        .and_then(|s| s.animated.as_ref());
    match animated {
        Some(a) => (
            a.front_default.clone().unwrap_or_default(),
            a.back_default.clone().unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    }
}

fn stat_block(stats: &[StatDetail]) -> StatBlock {
    let value = |name: &str| {
        stats
            .iter()
            .find(|s| s.stat.name == name)
            .map(|s| s.base_stat)
            .unwrap_or(0)
    };
    StatBlock {
        hp: value("hp"),
        attack: value("attack"),
        defense: value("defense"),
        special_attack: value("special-attack"),
        special_defense: value("special-defense"),
        speed: value("speed"),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn payload() -> CatalogPayload {
        CatalogPayload {
            id: 497,
            name: "serperior".into(),
            height: 33,
            weight: 630,
            sprites: Sprites::default(),
            types: vec![TypeSlot {
                slot: 1,
                kind: NamedResource::named("grass"),
            }],
            abilities: vec![
                AbilitySlot {
                    is_hidden: false,
                    slot: 1,
                    ability: NamedResource::named("overgrow"),
                },
                AbilitySlot {
                    is_hidden: true,
                    slot: 3,
                    ability: NamedResource::named("contrary"),
                },
            ],
            stats: ["speed", "hp", "special-defense", "attack", "special-attack", "defense"]
                .iter()
                .zip([113, 75, 95, 75, 75, 95])
                .map(|(name, base_stat)| StatDetail {
                    base_stat,
                    effort: 0,
                    stat: NamedResource::named(*name),
                })
                .collect(),
        }
    }

    fn with_animated(front: Option<&str>, back: Option<&str>) -> Sprites {
        let set = VersionSprites {
            animated: Some(AnimatedSprites {
                front_default: front.map(String::from),
                back_default: back.map(String::from),
            }),
        };
        let mut games = HashMap::new();
        games.insert(ANIMATED_VERSION.to_string(), set);
        let mut versions = HashMap::new();
        versions.insert(ANIMATED_GENERATION.to_string(), games);
        Sprites {
            versions: Some(versions),
            ..Sprites::default()
        }
    }

    #[test]
    fn copies_scalars_and_child_rows() {
        let n = normalize(&payload());
        assert_eq!(n.entity.pokedex_id, 497);
        assert_eq!(n.entity.name, "serperior");
        assert_eq!((n.entity.height, n.entity.weight), (33, 630));
        assert_eq!(n.types, vec![TypeAssignment { type_name: "grass".into(), slot: 1 }]);
        assert_eq!(n.abilities.len(), 2);
        assert!(n.abilities[1].is_hidden);
        assert_eq!(n.abilities[1].slot, 3);
    }

    #[test]
    fn stats_are_mapped_by_name_regardless_of_order() {
        let n = normalize(&payload());
        assert_eq!(
            n.stats,
            StatBlock {
                hp: 75,
                attack: 75,
                defense: 95,
                special_attack: 75,
                special_defense: 95,
                speed: 113,
            }
        );
    }

    #[test]
    fn missing_stat_is_zero() {
        let mut p = payload();
        p.stats.retain(|s| s.stat.name != "special-attack");
        let n = normalize(&p);
        assert_eq!(n.stats.special_attack, 0);
        assert_eq!(n.stats.speed, 113);

        p.stats.clear();
        assert_eq!(normalize(&p).stats, StatBlock::default());
    }

    #[test]
    fn sprite_prefers_official_artwork() {
        let mut p = payload();
        p.sprites.front_default = Some("https://img/front.png".into());
        p.sprites.other = Some(OtherSprites {
            official_artwork: Some(FrontSprite {
                front_default: Some("https://img/art.png".into()),
            }),
        });
        assert_eq!(normalize(&p).entity.sprite_url, "https://img/art.png");
    }

    #[test]
    fn sprite_falls_back_to_front_then_empty() {
        let mut p = payload();
        p.sprites.front_default = Some("https://img/front.png".into());
        p.sprites.other = Some(OtherSprites {
            official_artwork: Some(FrontSprite { front_default: None }),
        });
        assert_eq!(normalize(&p).entity.sprite_url, "https://img/front.png");

        p.sprites.front_default = None;
        assert_eq!(normalize(&p).entity.sprite_url, "");
    }

    #[test]
    fn animated_sprites_resolved_from_full_path() {
        let mut p = payload();
        p.sprites = with_animated(Some("https://img/f.gif"), Some("https://img/b.gif"));
        let n = normalize(&p);
        assert_eq!(n.entity.animated_front, "https://img/f.gif");
        assert_eq!(n.entity.animated_back, "https://img/b.gif");
    }

    #[test]
    fn broken_animated_path_yields_empty_strings() {
        let mut p = payload();
        p.sprites = with_animated(None, None);
        if let Some(versions) = p.sprites.versions.as_mut() {
            versions.clear();
            versions.insert(ANIMATED_GENERATION.to_string(), HashMap::new());
        }
        let n = normalize(&p);
        assert_eq!((n.entity.animated_front.as_str(), n.entity.animated_back.as_str()), ("", ""));

        p.sprites.versions = None;
        let n = normalize(&p);
        assert_eq!((n.entity.animated_front.as_str(), n.entity.animated_back.as_str()), ("", ""));
    }
}
