//! Material catalog used to resolve config keys.
//!
//! The host knows the real set of materials; the core only needs a way to
//! tell known keys from typos. A built-in set of common blocks and items is
//! provided and hosts can extend or replace it.

use crate::Material;
use once_cell::sync::Lazy;
use std::collections::HashSet;

const NAMESPACE_PREFIX: &str = "MINECRAFT:";

/// Materials recognised out of the box
const BUILTIN_MATERIALS: &[&str] = &[
    // Stone and earth
    "STONE",
    "COBBLESTONE",
    "DEEPSLATE",
    "COBBLED_DEEPSLATE",
    "GRANITE",
    "DIORITE",
    "ANDESITE",
    "TUFF",
    "CALCITE",
    "NETHERRACK",
    "END_STONE",
    "OBSIDIAN",
    "DIRT",
    "GRASS_BLOCK",
    "SAND",
    "RED_SAND",
    "GRAVEL",
    "CLAY",
    // Ores
    "COAL_ORE",
    "DEEPSLATE_COAL_ORE",
    "IRON_ORE",
    "DEEPSLATE_IRON_ORE",
    "COPPER_ORE",
    "DEEPSLATE_COPPER_ORE",
    "GOLD_ORE",
    "DEEPSLATE_GOLD_ORE",
    "REDSTONE_ORE",
    "DEEPSLATE_REDSTONE_ORE",
    "LAPIS_ORE",
    "DEEPSLATE_LAPIS_ORE",
    "DIAMOND_ORE",
    "DEEPSLATE_DIAMOND_ORE",
    "EMERALD_ORE",
    "DEEPSLATE_EMERALD_ORE",
    "NETHER_GOLD_ORE",
    "NETHER_QUARTZ_ORE",
    "ANCIENT_DEBRIS",
    // Wood
    "OAK_LOG",
    "SPRUCE_LOG",
    "BIRCH_LOG",
    "JUNGLE_LOG",
    "ACACIA_LOG",
    "DARK_OAK_LOG",
    "MANGROVE_LOG",
    "CHERRY_LOG",
    "CRIMSON_STEM",
    "WARPED_STEM",
    "OAK_LEAVES",
    "OAK_PLANKS",
    // Crops
    "WHEAT",
    "CARROTS",
    "POTATOES",
    "BEETROOTS",
    "MELON",
    "PUMPKIN",
    "SUGAR_CANE",
    "CACTUS",
    "COCOA",
    "NETHER_WART",
    "SWEET_BERRY_BUSH",
    // Items
    "COAL",
    "CHARCOAL",
    "IRON_INGOT",
    "IRON_NUGGET",
    "COPPER_INGOT",
    "GOLD_INGOT",
    "GOLD_NUGGET",
    "DIAMOND",
    "EMERALD",
    "LAPIS_LAZULI",
    "REDSTONE",
    "QUARTZ",
    "NETHERITE_SCRAP",
    "NETHERITE_INGOT",
    "BREAD",
    "APPLE",
    "GOLDEN_APPLE",
    "EXPERIENCE_BOTTLE",
    "BONE_MEAL",
    "TORCH",
    "IRON_PICKAXE",
    "DIAMOND_PICKAXE",
    "IRON_AXE",
    "DIAMOND_AXE",
    "IRON_HOE",
    "DIAMOND_HOE",
    // More stone and terrain
    "SMOOTH_STONE",
    "STONE_BRICKS",
    "MOSSY_COBBLESTONE",
    "BASALT",
    "POLISHED_BASALT",
    "SMOOTH_BASALT",
    "BLACKSTONE",
    "MAGMA_BLOCK",
    "SOUL_SAND",
    "SOUL_SOIL",
    "GLOWSTONE",
    "SANDSTONE",
    "RED_SANDSTONE",
    "PRISMARINE",
    "DRIPSTONE_BLOCK",
    "POINTED_DRIPSTONE",
    "AMETHYST_BLOCK",
    "BUDDING_AMETHYST",
    "AMETHYST_CLUSTER",
    "MUD",
    "PACKED_MUD",
    "MYCELIUM",
    "PODZOL",
    "COARSE_DIRT",
    "ROOTED_DIRT",
    "MOSS_BLOCK",
    "SNOW",
    "SNOW_BLOCK",
    "ICE",
    "PACKED_ICE",
    "BLUE_ICE",
    "TERRACOTTA",
    "BEDROCK",
    // Raw ore blocks
    "RAW_IRON",
    "RAW_COPPER",
    "RAW_GOLD",
    "RAW_IRON_BLOCK",
    "RAW_COPPER_BLOCK",
    "RAW_GOLD_BLOCK",
    "COAL_BLOCK",
    "IRON_BLOCK",
    "COPPER_BLOCK",
    "GOLD_BLOCK",
    "DIAMOND_BLOCK",
    "EMERALD_BLOCK",
    "LAPIS_BLOCK",
    "REDSTONE_BLOCK",
    "QUARTZ_BLOCK",
    "NETHERITE_BLOCK",
    // More wood
    "STRIPPED_OAK_LOG",
    "STRIPPED_SPRUCE_LOG",
    "STRIPPED_BIRCH_LOG",
    "OAK_WOOD",
    "SPRUCE_WOOD",
    "BIRCH_WOOD",
    "SPRUCE_PLANKS",
    "BIRCH_PLANKS",
    "JUNGLE_PLANKS",
    "ACACIA_PLANKS",
    "DARK_OAK_PLANKS",
    "MANGROVE_PLANKS",
    "CHERRY_PLANKS",
    "CRIMSON_PLANKS",
    "WARPED_PLANKS",
    "BAMBOO",
    "BAMBOO_BLOCK",
    "BAMBOO_PLANKS",
    "SPRUCE_LEAVES",
    "BIRCH_LEAVES",
    "JUNGLE_LEAVES",
    "ACACIA_LEAVES",
    "DARK_OAK_LEAVES",
    "MANGROVE_LEAVES",
    "CHERRY_LEAVES",
    "AZALEA_LEAVES",
    "MANGROVE_ROOTS",
    "OAK_SAPLING",
    "SPRUCE_SAPLING",
    "BIRCH_SAPLING",
    "STICK",
    // Plants and water
    "KELP",
    "KELP_PLANT",
    "DRIED_KELP",
    "SEAGRASS",
    "SEA_PICKLE",
    "LILY_PAD",
    "VINE",
    "SHORT_GRASS",
    "TALL_GRASS",
    "FERN",
    "DEAD_BUSH",
    "DANDELION",
    "POPPY",
    "BROWN_MUSHROOM",
    "RED_MUSHROOM",
    "CRIMSON_FUNGUS",
    "WARPED_FUNGUS",
    "CHORUS_PLANT",
    "CHORUS_FLOWER",
    "GLOW_BERRIES",
    "TORCHFLOWER",
    "PITCHER_PLANT",
    // Food and drops
    "WHEAT_SEEDS",
    "BEETROOT_SEEDS",
    "MELON_SLICE",
    "CARROT",
    "POTATO",
    "BAKED_POTATO",
    "BEETROOT",
    "SWEET_BERRIES",
    "SUGAR",
    "EGG",
    "COD",
    "SALMON",
    "TROPICAL_FISH",
    "PUFFERFISH",
    "BEEF",
    "PORKCHOP",
    "CHICKEN",
    "MUTTON",
    "RABBIT",
    "ROTTEN_FLESH",
    "BONE",
    "STRING",
    "SPIDER_EYE",
    "GUNPOWDER",
    "LEATHER",
    "FEATHER",
    "WOOL",
    "WHITE_WOOL",
    "INK_SAC",
    "SLIME_BALL",
    "ENDER_PEARL",
    "BLAZE_ROD",
    "HONEYCOMB",
    "FLINT",
    // Tools and gear
    "STONE_PICKAXE",
    "GOLDEN_PICKAXE",
    "NETHERITE_PICKAXE",
    "STONE_AXE",
    "NETHERITE_AXE",
    "IRON_SHOVEL",
    "DIAMOND_SHOVEL",
    "IRON_SWORD",
    "DIAMOND_SWORD",
    "FISHING_ROD",
    "BOW",
    "ARROW",
    "SHEARS",
    "BUCKET",
    "WATER_BUCKET",
    "SADDLE",
    "NAME_TAG",
    "ENCHANTED_BOOK",
];

/// Cached built-in catalog - built once and reused
static BUILTIN_CATALOG: Lazy<MaterialCatalog> =
    Lazy::new(|| MaterialCatalog::from_keys(BUILTIN_MATERIALS.iter().copied()));

/// Normalize a material key: trim, upper-case, drop the `minecraft:` namespace
pub fn normalize_key(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match upper.strip_prefix(NAMESPACE_PREFIX) {
        Some(rest) => rest.to_string(),
        None => upper,
    }
}

/// Set of material keys the host recognises
#[derive(Clone, Debug, Default)]
pub struct MaterialCatalog {
    keys: HashSet<String>,
}

impl MaterialCatalog {
    /// Get a reference to the cached built-in catalog
    pub fn builtin() -> &'static MaterialCatalog {
        &BUILTIN_CATALOG
    }

    /// Build a catalog from arbitrary keys (normalized on the way in)
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keys: keys.into_iter().map(|k| normalize_key(k.as_ref())).collect(),
        }
    }

    /// Built-in materials plus host-specific extras
    pub fn builtin_with<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::builtin().clone();
        catalog
            .keys
            .extend(extra.into_iter().map(|k| normalize_key(k.as_ref())));
        catalog
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.keys.contains(&normalize_key(raw))
    }

    /// Resolve a config key into a `Material`
    pub fn resolve(&self, raw: &str) -> Material {
        let key = normalize_key(raw);
        if self.keys.contains(&key) {
            Material::Known(key)
        } else {
            Material::Unknown(raw.to_string())
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
