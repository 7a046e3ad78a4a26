//! Maps task and collection identifiers to candidate wiki image URLs and a
//! final emoji fallback.
//!
//! Every lookup table here is an ordered slice evaluated first-match-wins, so
//! more specific keys are listed before the general keys they contain.

use serde::Serialize;

use crate::domain::task::{Category, CollectionItem, Task};

pub const WIKI_IMAGE_BASE: &str = "https://minecraft.wiki/images";
pub const DEFAULT_EMOJI: &str = "📦";

const DEFAULT_BIOME_BLOCK: &str = "grass_block";
const DEFAULT_STRUCTURE_BLOCK: &str = "structure_block";

const KNOWN_PREFIXES: [(&str, Category); 3] = [
    ("mob_", Category::Mobs),
    ("block_", Category::Blocks),
    ("item_", Category::Items),
];

/// Icon hints too vague to name a single asset.
const GENERIC_ICONS: [&str; 8] = [
    "sword", "pickaxe", "axe", "shovel", "hoe", "potion", "book", "armor",
];

/// Assets the wiki only serves animated.
const ANIMATED_ASSETS: [&str; 13] = [
    "nether_star",
    "clock",
    "compass",
    "stonecutter",
    "end_crystal",
    "enchanted_book",
    "sculk",
    "sculk_shrieker",
    "magma_block",
    "prismarine",
    "experience_bottle",
    "crimson_stem",
    "warped_stem",
];

/// Canonical ids whose wiki asset name is not the title-cased id.
const WIKI_NAME_EXCEPTIONS: &[(&str, &str)] = &[
    ("iron_block", "Block_of_Iron"),
    ("gold_block", "Block_of_Gold"),
    ("diamond_block", "Block_of_Diamond"),
    ("emerald_block", "Block_of_Emerald"),
    ("netherite_block", "Block_of_Netherite"),
    ("quartz_block", "Block_of_Quartz"),
    ("coal_block", "Block_of_Coal"),
    ("copper_block", "Block_of_Copper"),
    ("lapis_block", "Block_of_Lapis_Lazuli"),
    ("redstone_block", "Block_of_Redstone"),
    ("beef", "Raw_Beef"),
    ("porkchop", "Raw_Porkchop"),
    ("chicken", "Raw_Chicken"),
    ("cod", "Raw_Cod"),
    ("salmon", "Raw_Salmon"),
    ("rabbit", "Raw_Rabbit"),
    ("mutton", "Raw_Mutton"),
    ("ender_eye", "Eye_of_Ender"),
    ("spawner", "Monster_Spawner"),
    ("tnt", "TNT"),
    ("slime_ball", "Slimeball"),
    ("totem_of_undying", "Totem_of_Undying"),
    ("heart_of_the_sea", "Heart_of_the_Sea"),
    ("hay_block", "Hay_Bale"),
    ("repeater", "Redstone_Repeater"),
    ("comparator", "Redstone_Comparator"),
    ("dragon_breath", "Dragon's_Breath"),
    ("filled_map", "Map"),
    ("writable_book", "Book_and_Quill"),
    ("quartz", "Nether_Quartz"),
    ("rabbit_foot", "Rabbit's_Foot"),
    ("turtle_helmet", "Turtle_Shell"),
    ("axolotl_bucket", "Bucket_of_Axolotl"),
    ("flint_and_steel", "Flint_and_Steel"),
    ("carrot_on_a_stick", "Carrot_on_a_Stick"),
    ("warped_fungus_on_a_stick", "Warped_Fungus_on_a_Stick"),
    ("chest_minecart", "Minecart_with_Chest"),
    ("hopper_minecart", "Minecart_with_Hopper"),
    ("furnace_minecart", "Minecart_with_Furnace"),
    ("tnt_minecart", "Minecart_with_TNT"),
    ("command_block_minecart", "Minecart_with_Command_Block"),
    ("potion", "Potion_of_Healing"),
    ("splash_potion", "Splash_Potion_of_Healing"),
    ("lingering_potion", "Lingering_Potion_of_Healing"),
    ("tipped_arrow", "Arrow_of_Healing"),
    ("experience_bottle", "Bottle_o'_Enchanting"),
    ("netherite_upgrade_smithing_template", "Netherite_Upgrade"),
    ("sentry_armor_trim_smithing_template", "Sentry_Armor_Trim"),
];

const BIOME_BLOCKS: &[(&str, &str)] = &[
    ("birch forest", "birch_log"),
    ("dark forest", "dark_oak_log"),
    ("crimson forest", "crimson_stem"),
    ("warped forest", "warped_stem"),
    ("mangrove swamp", "mangrove_log"),
    ("soul sand valley", "soul_sand"),
    ("basalt deltas", "basalt"),
    ("lush caves", "moss_block"),
    ("dripstone caves", "dripstone_block"),
    ("deep dark", "sculk"),
    ("cherry grove", "cherry_log"),
    ("the end", "end_stone"),
    ("snowy", "snow_block"),
    ("mushroom", "mycelium"),
    ("nether", "netherrack"),
    ("plains", "grass_block"),
    ("forest", "oak_log"),
    ("taiga", "spruce_log"),
    ("desert", "sand"),
    ("badlands", "red_sand"),
    ("jungle", "jungle_log"),
    ("swamp", "lily_pad"),
    ("ocean", "water_bucket"),
    ("beach", "sand"),
    ("meadow", "grass_block"),
    ("mountain", "stone"),
    ("cave", "stone"),
];

const STRUCTURE_BLOCKS: &[(&str, &str)] = &[
    ("pillager outpost", "crossbow"),
    ("jungle temple", "mossy_cobblestone"),
    ("ancient city", "sculk"),
    ("trail ruins", "suspicious_gravel"),
    ("trial chamber", "trial_spawner"),
    ("ruined portal", "crying_obsidian"),
    ("buried treasure", "chest"),
    ("witch hut", "cauldron"),
    ("end city", "purpur_block"),
    ("village", "hay_block"),
    ("mansion", "dark_oak_log"),
    ("monument", "prismarine_shard"),
    ("temple", "sandstone"),
    ("pyramid", "sandstone"),
    ("igloo", "snow_block"),
    ("stronghold", "end_portal_frame"),
    ("fortress", "nether_bricks"),
    ("bastion", "blackstone"),
    ("shipwreck", "oak_planks"),
    ("mineshaft", "rail"),
    ("dungeon", "spawner"),
];

const ADVANCEMENT_ICONS: &[(&str, &str)] = &[
    ("stone age", "wooden_pickaxe"),
    ("getting an upgrade", "stone_pickaxe"),
    ("acquire hardware", "iron_pickaxe"),
    ("cover me with diamonds", "diamond_chestplate"),
    ("diamonds", "diamond"),
    ("ice bucket challenge", "obsidian"),
    ("we need to go deeper", "flint_and_steel"),
    ("enchanter", "enchanting_table"),
    ("zombie doctor", "golden_apple"),
    ("free the end", "dragon_egg"),
    ("the end", "ender_eye"),
    ("monster hunter", "iron_sword"),
    ("adventuring time", "diamond_boots"),
    ("a complete catalogue", "cod"),
    ("two by two", "wheat"),
];

/// Exact canonical ids whose emoji would be misread by substring matching.
const EMOJI_EXCEPTIONS: &[(&str, &str)] = &[
    ("ender_eye", "👁️"),
    ("ender_pearl", "🔮"),
    ("end_crystal", "💠"),
    ("tnt", "💣"),
    ("heart_of_the_sea", "💙"),
    ("totem_of_undying", "🗿"),
    ("nether_star", "⭐"),
    ("experience_bottle", "🧪"),
    ("writable_book", "📖"),
];

const EMOJI_BY_SUBSTRING: &[(&str, &str)] = &[
    ("pickaxe", "⛏️"),
    ("axe", "🪓"),
    ("sword", "🗡️"),
    ("shovel", "🔧"),
    ("hoe", "🌾"),
    ("helmet", "🪖"),
    ("chestplate", "🛡️"),
    ("leggings", "👖"),
    ("boots", "👢"),
    ("crossbow", "🏹"),
    ("bow", "🏹"),
    ("arrow", "➡️"),
    ("shield", "🛡️"),
    ("bed", "🛏️"),
    ("torch", "🔦"),
    ("lantern", "🏮"),
    ("crafting", "🔨"),
    ("furnace", "🔥"),
    ("chest", "📦"),
    ("barrel", "🛢️"),
    ("bucket", "🪣"),
    ("water", "💧"),
    ("lava", "🌋"),
    ("diamond", "💎"),
    ("emerald", "💚"),
    ("gold", "🪙"),
    ("iron", "⚙️"),
    ("coal", "⬛"),
    ("redstone", "🔴"),
    ("lapis", "🔵"),
    ("ender", "🔮"),
    ("pearl", "🔮"),
    ("eye", "👁️"),
    ("nether", "🔥"),
    ("end", "🌌"),
    ("dragon", "🐉"),
    ("wither", "💀"),
    ("skull", "💀"),
    ("zombie", "🧟"),
    ("creeper", "💥"),
    ("bone", "🦴"),
    ("egg", "🥚"),
    ("wheat", "🌾"),
    ("carrot", "🥕"),
    ("potato", "🥔"),
    ("melon", "🍈"),
    ("pumpkin", "🎃"),
    ("apple", "🍎"),
    ("bread", "🍞"),
    ("cake", "🎂"),
    ("cookie", "🍪"),
    ("fish", "🐟"),
    ("cod", "🐟"),
    ("salmon", "🐟"),
    ("beef", "🥩"),
    ("pork", "🥓"),
    ("chicken", "🍗"),
    ("rabbit", "🐰"),
    ("stew", "🍲"),
    ("potion", "🧪"),
    ("bottle", "🧴"),
    ("book", "📖"),
    ("paper", "📄"),
    ("map", "🗺️"),
    ("compass", "🧭"),
    ("clock", "🕐"),
    ("star", "⭐"),
    ("blaze", "🔥"),
    ("ghast", "👻"),
    ("slime", "🟢"),
    ("spider", "🕷️"),
    ("string", "🧵"),
    ("leather", "🟤"),
    ("feather", "🪶"),
    ("wool", "🧶"),
    ("dye", "🎨"),
    ("banner", "🚩"),
    ("flower", "🌸"),
    ("sapling", "🌱"),
    ("seed", "🌱"),
    ("mushroom", "🍄"),
    ("log", "🪵"),
    ("planks", "🪵"),
    ("sandstone", "🏜️"),
    ("stone", "🪨"),
    ("cobble", "🪨"),
    ("brick", "🧱"),
    ("glass", "🪟"),
    ("sand", "🏖️"),
    ("gravel", "⚪"),
    ("dirt", "🟫"),
    ("grass", "🌿"),
    ("snow", "❄️"),
    ("ice", "🧊"),
    ("obsidian", "⬛"),
    ("crying", "😢"),
    ("portal", "🌀"),
    ("shulker", "📦"),
    ("elytra", "🪽"),
    ("firework", "🎆"),
    ("rocket", "🚀"),
    ("minecart", "🚃"),
    ("rail", "🛤️"),
    ("boat", "🚣"),
    ("saddle", "🐴"),
    ("lead", "🪢"),
    ("name_tag", "🏷️"),
    ("totem", "🗿"),
    ("trident", "🔱"),
    ("shell", "🐚"),
    ("coral", "🪸"),
    ("sponge", "🧽"),
    ("prismarine", "🔷"),
    ("honey", "🍯"),
    ("wax", "🕯️"),
    ("candle", "🕯️"),
    ("amethyst", "💜"),
    ("copper", "🟠"),
    ("spyglass", "🔭"),
    ("brush", "🖌️"),
    ("pottery", "🏺"),
    ("sherd", "🏺"),
    ("armor_stand", "🧍"),
    ("item_frame", "🖼️"),
    ("painting", "🖼️"),
    ("sign", "🪧"),
    ("disc", "💿"),
];

/// What the resolver needs to know about a record.
#[derive(Debug, Clone, Copy)]
pub struct IconSubject<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub category: Option<&'a Category>,
    pub icon: Option<&'a str>,
}

impl<'a> IconSubject<'a> {
    pub fn from_task(task: &'a Task) -> Self {
        Self {
            id: &task.id,
            name: &task.name,
            category: Some(&task.category),
            icon: task.icon.as_deref(),
        }
    }

    pub fn from_item(item: &'a CollectionItem) -> Self {
        Self {
            id: &item.id,
            name: &item.name,
            category: None,
            icon: Some(&item.icon),
        }
    }

    #[cfg(test)]
    pub fn bare(id: &'a str) -> Self {
        Self {
            id,
            name: "",
            category: None,
            icon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconResolution {
    /// Most likely first, without duplicates.
    pub sources: Vec<String>,
    /// Shown when every source fails to load; never empty.
    pub emoji: &'static str,
}

pub fn resolve(subject: &IconSubject<'_>) -> IconResolution {
    IconResolution {
        sources: icon_sources(subject),
        emoji: fallback_emoji(subject.icon.unwrap_or(subject.id)),
    }
}

pub fn icon_sources(subject: &IconSubject<'_>) -> Vec<String> {
    let canonical = canonical_name(subject);
    if canonical.is_empty() {
        return Vec::new();
    }

    let is_mob = subject.category == Some(&Category::Mobs);
    let exception = if is_mob {
        None
    } else {
        wiki_exception(&canonical)
    };
    let wiki_name = exception
        .map(str::to_string)
        .unwrap_or_else(|| title_case(&canonical));
    let ext = extension(&canonical);

    let mut sources = Vec::new();
    if exception.is_some() {
        sources.push(wiki_url(&format!("Invicon_{wiki_name}.{ext}")));
    }

    let display_name = subject_display_name(subject).to_lowercase();
    match subject.category {
        Some(Category::Mobs) => {
            sources.push(wiki_url(&format!("Invicon_{wiki_name}_Spawn_Egg.png")));
            sources.push(wiki_url(&format!("{wiki_name}_Face.png")));
        }
        Some(Category::Biomes) => {
            let block = first_match(BIOME_BLOCKS, &display_name).unwrap_or(DEFAULT_BIOME_BLOCK);
            sources.push(block_url(block));
        }
        Some(Category::Structures) => {
            let block =
                first_match(STRUCTURE_BLOCKS, &display_name).unwrap_or(DEFAULT_STRUCTURE_BLOCK);
            sources.push(block_url(block));
        }
        Some(Category::Advancements) => {
            sources.push(wiki_url(&format!("Invicon_{wiki_name}.{ext}")));
            if let Some(item) = first_match(ADVANCEMENT_ICONS, &display_name) {
                sources.push(block_url(item));
            }
        }
        Some(Category::Enchantments) => {
            sources.push(wiki_url("Invicon_Enchanted_Book.gif"));
        }
        Some(Category::Potions) => {
            sources.push(wiki_url("Invicon_Potion_of_Healing.gif"));
            sources.push(wiki_url("Invicon_Potion_of_Regeneration.gif"));
        }
        _ => {
            sources.push(wiki_url(&format!("Invicon_{wiki_name}.{ext}")));
        }
    }

    sources.push(wiki_url(&format!("Invicon_{wiki_name}.png")));
    sources.push(wiki_url(&format!("{wiki_name}.png")));
    sources.push(wiki_url(&format!("Grid_{wiki_name}.png")));

    dedupe(sources)
}

/// Emoji for an identifier: exact exceptions first, then the first
/// substring hit, then [`DEFAULT_EMOJI`].
pub fn fallback_emoji(id: &str) -> &'static str {
    let cleaned = clean_id(id);
    let canonical = strip_known_prefix(&cleaned, None);
    if let Some(emoji) = lookup_exact(EMOJI_EXCEPTIONS, canonical) {
        return emoji;
    }
    EMOJI_BY_SUBSTRING
        .iter()
        .find(|(key, _)| cleaned.contains(key))
        .map_or(DEFAULT_EMOJI, |(_, emoji)| *emoji)
}

/// Snake-case asset name derived from the icon hint, the id, or the name.
pub fn canonical_name(subject: &IconSubject<'_>) -> String {
    if let Some(icon) = subject.icon.map(str::trim).filter(|icon| !icon.is_empty()) {
        if !is_generic_icon(icon) {
            return clean_id(icon);
        }
    }

    let id = clean_id(subject.id);
    let stripped = strip_known_prefix(&id, subject.category);
    if stripped.len() != id.len() && !stripped.is_empty() {
        return stripped.to_string();
    }

    let from_name = snake_case(subject.name);
    if from_name.is_empty() {
        id
    } else {
        from_name
    }
}

pub fn title_case(raw: &str) -> String {
    raw.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("_")
}

fn subject_display_name<'a>(subject: &IconSubject<'a>) -> &'a str {
    if subject.name.trim().is_empty() {
        subject.id
    } else {
        subject.name
    }
}

fn strip_known_prefix<'a>(id: &'a str, category: Option<&Category>) -> &'a str {
    for (prefix, owner) in &KNOWN_PREFIXES {
        if category.is_some_and(|category| category != owner) {
            continue;
        }
        if let Some(rest) = id.strip_prefix(prefix) {
            return rest;
        }
    }
    id
}

fn snake_case(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '_')
        .collect()
}

fn clean_id(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    lowered
        .strip_prefix("minecraft:")
        .map(str::to_string)
        .unwrap_or(lowered)
}

fn is_generic_icon(icon: &str) -> bool {
    GENERIC_ICONS
        .iter()
        .any(|generic| generic.eq_ignore_ascii_case(icon))
}

fn wiki_exception(canonical: &str) -> Option<&'static str> {
    lookup_exact(WIKI_NAME_EXCEPTIONS, canonical)
}

fn lookup_exact(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, value)| *value)
}

fn first_match(table: &[(&str, &'static str)], haystack: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| haystack.contains(key))
        .map(|(_, value)| *value)
}

fn extension(canonical: &str) -> &'static str {
    if ANIMATED_ASSETS.contains(&canonical) {
        "gif"
    } else {
        "png"
    }
}

fn block_url(block: &str) -> String {
    let name = wiki_exception(block)
        .map(str::to_string)
        .unwrap_or_else(|| title_case(block));
    wiki_url(&format!("Invicon_{name}.{}", extension(block)))
}

fn wiki_url(file: &str) -> String {
    format!("{WIKI_IMAGE_BASE}/{file}")
}

fn dedupe(sources: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(sources.len());
    for source in sources {
        if !unique.contains(&source) {
            unique.push(source);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::{
        canonical_name, fallback_emoji, icon_sources, resolve, title_case, IconSubject,
        DEFAULT_EMOJI, WIKI_IMAGE_BASE,
    };
    use crate::domain::task::Category;

    fn subject<'a>(id: &'a str, name: &'a str, category: &'a Category) -> IconSubject<'a> {
        IconSubject {
            id,
            name,
            category: Some(category),
            icon: None,
        }
    }

    fn url(file: &str) -> String {
        format!("{WIKI_IMAGE_BASE}/{file}")
    }

    #[test]
    fn exception_entry_leads_and_replaces_generic_title() {
        let items = Category::Items;
        let sources = icon_sources(&subject("item_ender_eye", "Eye of Ender", &items));
        assert_eq!(sources[0], url("Invicon_Eye_of_Ender.png"));
        assert!(sources.iter().all(|source| !source.contains("Ender_Eye")));
        assert_eq!(fallback_emoji("item_ender_eye"), "👁️");
    }

    #[test]
    fn animated_exception_uses_gif_then_png_fallbacks() {
        let items = Category::Items;
        let sources = icon_sources(&subject("item_experience_bottle", "Bottle", &items));
        assert_eq!(sources[0], url("Invicon_Bottle_o'_Enchanting.gif"));
        assert!(sources.contains(&url("Invicon_Bottle_o'_Enchanting.png")));
    }

    #[test]
    fn plain_block_gets_deduplicated_generic_chain() {
        let blocks = Category::Blocks;
        let sources = icon_sources(&subject("block_oak_log", "Oak Log", &blocks));
        assert_eq!(
            sources,
            vec![
                url("Invicon_Oak_Log.png"),
                url("Oak_Log.png"),
                url("Grid_Oak_Log.png"),
            ]
        );
    }

    #[test]
    fn animated_block_tries_gif_first() {
        let items = Category::Items;
        let sources = icon_sources(&subject("item_clock", "Clock", &items));
        assert_eq!(sources[0], url("Invicon_Clock.gif"));
        assert_eq!(sources[1], url("Invicon_Clock.png"));
    }

    #[test]
    fn mobs_use_spawn_egg_and_skip_item_exceptions() {
        let mobs = Category::Mobs;
        let sources = icon_sources(&subject("mob_chicken", "Chicken", &mobs));
        assert_eq!(sources[0], url("Invicon_Chicken_Spawn_Egg.png"));
        assert_eq!(sources[1], url("Chicken_Face.png"));
        assert!(sources.iter().all(|source| !source.contains("Raw_")));
    }

    #[test]
    fn biomes_use_most_specific_representative_block() {
        let biomes = Category::Biomes;
        let birch = icon_sources(&subject("biome_birch_forest", "Birch Forest", &biomes));
        assert_eq!(birch[0], url("Invicon_Birch_Log.png"));

        let snowy = icon_sources(&subject("biome_snowy_plains", "Snowy Plains", &biomes));
        assert_eq!(snowy[0], url("Invicon_Snow_Block.png"));

        let unknown = icon_sources(&subject("biome_sky", "Sky Islands", &biomes));
        assert_eq!(unknown[0], url("Invicon_Grass_Block.png"));
    }

    #[test]
    fn structures_map_through_exceptions_and_default() {
        let structures = Category::Structures;
        let village = icon_sources(&subject("structure_village", "Village", &structures));
        assert_eq!(village[0], url("Invicon_Hay_Bale.png"));

        let odd = icon_sources(&subject("structure_x", "Floating Tower", &structures));
        assert_eq!(odd[0], url("Invicon_Structure_Block.png"));
    }

    #[test]
    fn advancements_add_representative_item_after_own_name() {
        let advancements = Category::Advancements;
        let sources = icon_sources(&subject("adv_free_the_end", "Free the End", &advancements));
        assert_eq!(sources[0], url("Invicon_Free_The_End.png"));
        assert_eq!(sources[1], url("Invicon_Dragon_Egg.png"));
    }

    #[test]
    fn enchantments_and_potions_use_fixed_images() {
        let enchantments = Category::Enchantments;
        let mending = icon_sources(&subject("ench_mending", "Mending", &enchantments));
        assert_eq!(mending[0], url("Invicon_Enchanted_Book.gif"));

        let potions = Category::Potions;
        let potion = icon_sources(&subject("potion_x", "Potion of Night Vision", &potions));
        assert_eq!(potion[0], url("Invicon_Potion_of_Healing.gif"));
        assert_eq!(potion[1], url("Invicon_Potion_of_Regeneration.gif"));
        assert_eq!(potion[2], url("Invicon_Potion_Of_Night_Vision.png"));
    }

    #[test]
    fn canonical_name_prefers_specific_icon_hint() {
        let items = Category::Items;
        let mut hinted = subject("item_x", "Diamond Sword", &items);
        hinted.icon = Some("minecraft:Diamond_Sword");
        assert_eq!(canonical_name(&hinted), "diamond_sword");

        hinted.icon = Some("sword");
        assert_eq!(canonical_name(&hinted), "x");

        let challenges = Category::Challenges;
        let named = subject("challenge_1", "Diamonds! (Hard)", &challenges);
        assert_eq!(canonical_name(&named), "diamonds_hard");
    }

    #[test]
    fn prefixes_only_strip_for_their_own_category() {
        let blocks = Category::Blocks;
        let named = subject("mob_like", "Mob Like Block", &blocks);
        assert_eq!(canonical_name(&named), "mob_like_block");
        assert_eq!(canonical_name(&IconSubject::bare("block_stone")), "stone");
    }

    #[test]
    fn emoji_table_is_first_match_with_default() {
        assert_eq!(fallback_emoji("iron_pickaxe"), "⛏️");
        assert_eq!(fallback_emoji("minecraft:crossbow"), "🏹");
        assert_eq!(fallback_emoji("block_tnt"), "💣");
        assert_eq!(fallback_emoji("mystery"), DEFAULT_EMOJI);
    }

    #[test]
    fn resolution_always_has_an_emoji() {
        let empty = resolve(&IconSubject::bare(""));
        assert!(empty.sources.is_empty());
        assert_eq!(empty.emoji, DEFAULT_EMOJI);

        let resolved = resolve(&IconSubject::bare("music_disc_cat"));
        assert_eq!(resolved.sources[0], url("Invicon_Music_Disc_Cat.png"));
        assert_eq!(resolved.emoji, "💿");
    }

    #[test]
    fn title_case_handles_digits_and_mixed_case() {
        assert_eq!(title_case("music_disc_13"), "Music_Disc_13");
        assert_eq!(title_case("OAK_log"), "Oak_Log");
    }
}
