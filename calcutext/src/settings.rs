use serde::{Deserialize, Deserializer, Serialize};

pub const SETTINGS_WIDTH_MIN: u32 = 100;
pub const SETTINGS_WIDTH_MAX: u32 = 900;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl Settings {
    /// Stored width clamped into bounds, or the minimum when unset.
    pub fn effective_width(&self) -> u32 {
        self.width
            .map_or(SETTINGS_WIDTH_MIN, |w| w.clamp(SETTINGS_WIDTH_MIN, SETTINGS_WIDTH_MAX))
    }
}

// Widths were stored as whatever the input held: a number or a numeric string.
fn lenient_width<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().map(to_width),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok().map(to_width),
        _ => None,
    })
}

fn to_width(n: f64) -> u32 {
    n.round().clamp(0.0, u32::MAX as f64) as u32
}
