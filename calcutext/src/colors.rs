use std::{
    collections::{btree_map, BTreeMap},
    fmt::Display,
};

use itertools::Itertools;
use num::FromPrimitive;
use num_derive::FromPrimitive;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
#[repr(usize)]
pub enum Color {
    Red = 0,
    Pink = 1,
    Purple = 2,
    Cyan = 3,
    Green = 4,
    Blue = 5,
}

pub const PALETTE_SIZE: usize = 6;

impl Color {
    pub fn from_index(index: i64) -> Option<Color> {
        usize::try_from(index).ok().and_then(FromPrimitive::from_usize)
    }

    pub const fn hex(&self) -> &'static str {
        match self {
            Color::Red => "#F51720",
            Color::Pink => "#FA26A0",
            Color::Purple => "#BD97CB",
            Color::Cyan => "#2FF3E0",
            Color::Green => "#20f517",
            Color::Blue => "#1720F5",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.hex()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hex())
    }
}

/// Index stored for entries that could not be read back; never a valid color.
const INVALID_INDEX: i64 = -1;

/// Variable name to palette index. Entries are kept after a variable
/// disappears so it gets its old color back when it returns.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColorMapping(BTreeMap<String, i64>);

impl<'de> Deserialize<'de> for ColorMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(ColorMapping(
            raw.into_iter()
                .map(|(name, value)| (name, value.as_i64().unwrap_or(INVALID_INDEX)))
                .collect(),
        ))
    }
}

impl ColorMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.0.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, index: i64) {
        self.0.insert(name.into(), index);
    }

    pub fn color(&self, name: &str) -> Option<Color> {
        self.get(name).and_then(Color::from_index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, i64> {
        self.0.iter()
    }

    /// One CSS rule per mapped variable, e.g. `.variable-x { color: #F51720; }`.
    pub fn stylesheet(&self) -> String {
        self.0
            .iter()
            .filter_map(|(name, index)| {
                Color::from_index(*index)
                    .map(|color| format!(".variable-{} {{ color: {}; }}\n", name, color))
            })
            .join("")
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for ColorMapping {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        ColorMapping(iter.into_iter().map(|(name, index)| (name.into(), index)).collect())
    }
}

/// Gives every variable a palette color, keeping the ones already assigned.
#[derive(Debug)]
pub struct VariableColorAssigner<R> {
    rng: R,
}

impl<R: Rng> VariableColorAssigner<R> {
    pub fn new(rng: R) -> Self {
        VariableColorAssigner { rng }
    }

    pub fn random_index(&mut self) -> i64 {
        self.rng.gen_range(0..PALETTE_SIZE) as i64
    }

    pub fn assign<'a>(
        &mut self,
        mapping: &ColorMapping,
        names: impl IntoIterator<Item = &'a str>,
    ) -> ColorMapping {
        let mut assigned = mapping.clone();
        for name in names {
            if assigned.color(name).is_none() {
                let index = self.random_index();
                log::trace!("assigning color {} to `{}`", index, name);
                assigned.insert(name, index);
            }
        }
        assigned
    }
}

/// Next palette index, wrapping around.
pub fn cycle(index: i64) -> i64 {
    (index + 1).rem_euclid(PALETTE_SIZE as i64)
}
