//! Character profiles
//!
//! Profiles are read-only flavor owned by the selection layer; combat never
//! reads them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Body build, used by renderers to pick a sprite rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildCategory {
    Athletic,
    Muscular,
    Robot,
    Heavy,
    Agile,
    Cybernetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Robot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub id: u32,
    pub name: String,
    pub style: String,
    pub description: String,
    pub build: BuildCategory,
    pub gender: Gender,
    /// Primary color (hex)
    pub color: String,
    /// Secondary color (hex)
    pub secondary_color: String,
}

impl CharacterProfile {
    /// First word of the name, as shown above the health bar
    pub fn short_name(&self) -> &str {
        self.name.split('-').next().unwrap_or(&self.name).trim()
    }
}

#[allow(clippy::too_many_arguments)]
fn profile(
    id: u32,
    name: &str,
    style: &str,
    description: &str,
    build: BuildCategory,
    gender: Gender,
    color: &str,
    secondary_color: &str,
) -> CharacterProfile {
    CharacterProfile {
        id,
        name: name.to_string(),
        style: style.to_string(),
        description: description.to_string(),
        build,
        gender,
        color: color.to_string(),
        secondary_color: secondary_color.to_string(),
    }
}

/// The built-in fighters
pub fn default_roster() -> Vec<CharacterProfile> {
    use BuildCategory::*;

    vec![
        profile(1, "Akira - Muay Thai Master", "Muay Thai", "Young martial artist with devastating elbow strikes", Athletic, Gender::Male, "#FF3366", "#330000"),
        profile(2, "Marcus - The Boxing Legend", "Boxing", "Veteran boxer with unmatched precision", Muscular, Gender::Male, "#2C3E50", "#E74C3C"),
        profile(3, "Sophia - MMA Champion", "MMA", "All-around fighter with ground game mastery", Athletic, Gender::Female, "#34495E", "#95A5A6"),
        profile(4, "Helena - Kickboxing Queen", "Kickboxing", "Experienced fighter with powerful high kicks", Athletic, Gender::Female, "#8E44AD", "#C39BD3"),
        profile(5, "UNIT-X - Combat Robot", "Tech Combat", "Advanced tactical combat robot", Robot, Gender::Robot, "#2C3E50", "#00D9FF"),
        profile(6, "Brutus - Street Brawler", "Street Fighting", "Raw power from the underground circuit", Heavy, Gender::Male, "#95652C", "#34495E"),
        profile(7, "Raven - Elite Assassin", "Assassin Arts", "Silent and deadly with blade expertise", Agile, Gender::Female, "#1C1C1C", "#7D3C98"),
        profile(8, "Titan - Cybernetic Soldier", "Cyber Combat", "Enhanced human with lightning abilities", Cybernetic, Gender::Male, "#D68910", "#273746"),
        profile(9, "Ivan - Grappling Master", "Grappling", "Veteran with unbreakable submissions", Heavy, Gender::Male, "#784212", "#D4AC0D"),
        profile(10, "Sakura - Shadow Ninja", "Ninjutsu", "Agile warrior from ancient traditions", Agile, Gender::Female, "#C0392B", "#000000"),
    ]
}

/// Look up a built-in profile by id
pub fn find(id: u32) -> Option<Arc<CharacterProfile>> {
    default_roster()
        .into_iter()
        .find(|p| p.id == id)
        .map(Arc::new)
}

/// Profile used when none was chosen
pub fn default_profile() -> Arc<CharacterProfile> {
    Arc::new(default_roster().swap_remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_ids_are_unique_and_findable() {
        let roster = default_roster();
        assert_eq!(roster.len(), 10);
        for p in &roster {
            assert_eq!(find(p.id).as_deref(), Some(p));
        }
        assert!(find(0).is_none());
        assert!(find(11).is_none());
    }

    #[test]
    fn short_names() {
        assert_eq!(find(1).unwrap().short_name(), "Akira");
        assert_eq!(find(5).unwrap().short_name(), "UNIT");
        assert_eq!(default_profile().id, 1);
    }
}
