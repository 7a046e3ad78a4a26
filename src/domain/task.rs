use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares a dataset enum whose known variants carry a fixed rank while
/// values missing from the table survive as `Other` and rank last.
macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $id:literal $(| $alias:literal)* : $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $id,)+
                    $name::Other(raw) => raw.as_str(),
                }
            }

            pub fn label(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Other(raw) => raw.as_str(),
                }
            }

            /// Position in the declared order; unknown values sort after every known one.
            pub fn rank(&self) -> usize {
                Self::KNOWN
                    .iter()
                    .position(|known| known == self)
                    .unwrap_or(Self::KNOWN.len())
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }

            pub fn parse(raw: &str) -> Self {
                let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
                match normalized.as_str() {
                    $($id $(| $alias)* => $name::$variant,)+
                    _ => $name::Other(raw.trim().to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum! {
    Difficulty {
        Easy => "easy": "Easy",
        Medium => "medium": "Medium",
        Hard => "hard": "Hard",
        Extreme => "extreme": "Extreme",
    }
}

open_enum! {
    Phase {
        EarlyGame => "early_game" | "early": "Early Game",
        MidGame => "mid_game" | "mid": "Mid Game",
        LateGame => "late_game" | "late": "Late Game",
        PostGame => "post_game" | "post": "Post Game",
        Any => "any": "Any Phase",
    }
}

open_enum! {
    Category {
        Blocks => "blocks": "Blocks",
        Items => "items": "Items",
        Mobs => "mobs": "Mobs",
        Biomes => "biomes": "Biomes",
        Structures => "structures": "Structures",
        Advancements => "advancements": "Advancements",
        Enchantments => "enchantments": "Enchantments",
        Potions => "potions": "Potions",
        MusicDiscs => "music_discs": "Music Discs",
        Paintings => "paintings": "Paintings",
        BannerPatterns => "banner_patterns": "Banner Patterns",
        ArmorTrims => "armor_trims": "Armor Trims",
        PotterySherds => "pottery_sherds": "Pottery Sherds",
        Challenges => "challenges": "Challenges",
        BuildingGoals => "building_goals": "Building Goals",
    }
}

impl Category {
    /// Lexical on the id, known categories first.
    pub fn sort_cmp(&self, other: &Category) -> Ordering {
        self.is_known()
            .cmp(&other.is_known())
            .reverse()
            .then_with(|| self.as_str().cmp(other.as_str()))
    }

    pub fn info(&self) -> Option<&'static CategoryInfo> {
        CATEGORIES.iter().find(|info| info.id == self.as_str())
    }

    pub fn emoji(&self) -> &'static str {
        self.info().map_or(DEFAULT_CATEGORY_EMOJI, |info| info.icon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

pub const DEFAULT_CATEGORY_EMOJI: &str = "📦";

pub const CATEGORIES: [CategoryInfo; 15] = [
    CategoryInfo { id: "blocks", name: "Blocks", description: "Collect and place all block types", icon: "🧱", color: "#8B7355" },
    CategoryInfo { id: "items", name: "Items", description: "Obtain all items and tools", icon: "⚔️", color: "#4A90D9" },
    CategoryInfo { id: "mobs", name: "Mobs", description: "Encounter and defeat all creatures", icon: "🐉", color: "#E74C3C" },
    CategoryInfo { id: "biomes", name: "Biomes", description: "Explore every biome type", icon: "🌍", color: "#27AE60" },
    CategoryInfo { id: "structures", name: "Structures", description: "Discover all generated structures", icon: "🏰", color: "#9B59B6" },
    CategoryInfo { id: "advancements", name: "Advancements", description: "Complete all game advancements", icon: "🏆", color: "#F1C40F" },
    CategoryInfo { id: "enchantments", name: "Enchantments", description: "Apply all enchantment types", icon: "✨", color: "#8E44AD" },
    CategoryInfo { id: "potions", name: "Potions", description: "Brew every potion variant", icon: "🧪", color: "#E91E63" },
    CategoryInfo { id: "music_discs", name: "Music Discs", description: "Collect all music discs", icon: "💿", color: "#1ABC9C" },
    CategoryInfo { id: "paintings", name: "Paintings", description: "Discover all painting variants", icon: "🖼️", color: "#E67E22" },
    CategoryInfo { id: "banner_patterns", name: "Banner Patterns", description: "Unlock all special patterns", icon: "🚩", color: "#C0392B" },
    CategoryInfo { id: "armor_trims", name: "Armor Trims", description: "Find all smithing templates", icon: "🛡️", color: "#3498DB" },
    CategoryInfo { id: "pottery_sherds", name: "Pottery Sherds", description: "Collect all decorated sherds", icon: "🏺", color: "#D35400" },
    CategoryInfo { id: "challenges", name: "Challenges", description: "Complete special long-term goals", icon: "⭐", color: "#F39C12" },
    CategoryInfo { id: "building_goals", name: "Building Goals", description: "Construct farms and contraptions", icon: "🔧", color: "#7F8C8D" },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(alias = "text")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub phase: Phase,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Informational only; nothing gates on prerequisites.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionItem {
    pub id: String,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionCategory {
    pub id: String,
    pub title: String,
    pub icon: String,
    #[serde(default)]
    pub items: Vec<CollectionItem>,
}
