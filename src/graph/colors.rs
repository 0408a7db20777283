use std::borrow::Cow;

use crate::git::GraphError;
use crate::graph::lanes::LaneKey;
use crate::models::Rgb;

/// Built-in branch colors, chosen for contrast on light and dark backgrounds.
pub const DEFAULT_PALETTE: [Rgb; 12] = [
    Rgb::new(220, 38, 127), // Vibrant Pink
    Rgb::new(52, 168, 83),  // Green
    Rgb::new(66, 133, 244), // Blue
    Rgb::new(251, 188, 5),  // Yellow
    Rgb::new(156, 39, 176), // Purple
    Rgb::new(255, 87, 34),  // Deep Orange
    Rgb::new(0, 172, 193),  // Cyan
    Rgb::new(139, 195, 74), // Light Green
    Rgb::new(255, 112, 67), // Coral
    Rgb::new(92, 107, 192), // Indigo
    Rgb::new(255, 183, 77), // Amber
    Rgb::new(171, 71, 188), // Deep Purple
];

/// 64-bit FNV-1a. Stable across runs and platforms, unlike `DefaultHasher`.
pub fn stable_hash(value: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    value
        .bytes()
        .fold(OFFSET_BASIS, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

/// Fixed, non-empty set of lane colors
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Cow<'static, [Rgb]>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: Cow::Borrowed(&DEFAULT_PALETTE),
        }
    }
}

impl Palette {
    /// `None` for an empty color list.
    pub fn new(colors: Vec<Rgb>) -> Option<Self> {
        if colors.is_empty() {
            return None;
        }
        Some(Self {
            colors: Cow::Owned(colors),
        })
    }

    /// Build from `#rrggbb` strings; an empty list selects the built-in palette.
    pub fn from_hex<S: AsRef<str>>(values: &[S]) -> Result<Self, GraphError> {
        let colors = values
            .iter()
            .map(|value| {
                let value = value.as_ref();
                Rgb::from_hex(value)
                    .ok_or_else(|| GraphError::configuration("palette", format!("invalid color {:?}", value)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(colors).unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn index_for(&self, key: &LaneKey) -> usize {
        (stable_hash(key.as_str()) % self.colors.len() as u64) as usize
    }

    /// Same key, same color. Distinct keys may share a color.
    pub fn color_for(&self, key: &LaneKey) -> Rgb {
        self.colors[self.index_for(key)]
    }
}
