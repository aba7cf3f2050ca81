use serde::Deserialize;
use serde_json::Value;

pub const KEY_DIMENSION: &str = "dimension";
pub const KEY_X: &str = "x";
pub const KEY_Y: &str = "y";
pub const KEY_Z: &str = "z";

/// Block-granularity position of an actor.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash, Default)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Entity-granularity coordinates, as handed to the host's move primitive.
#[derive(Debug, Clone, Copy, PartialOrd, PartialEq)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A saved waypoint: the region it lives in plus its block position.
///
/// The serialized field names are part of the on-disk format, the region is stored as `dimension`.
#[derive(Debug, Clone, serde::Deserialize, PartialEq, Eq)]
pub struct LocationRecord {
    #[serde(rename = "dimension")]
    region: String,
    x: i32,
    y: i32,
    z: i32,
}

#[derive(Debug, thiserror::Error)]
#[error("Malformed location record: {0}")]
pub struct MalformedRecord(#[from] serde_json::Error);

impl LocationRecord {
    pub fn new(region: impl Into<String>, pos: BlockPos) -> Self {
        Self {
            region: region.into(),
            x: pos.x,
            y: pos.y,
            z: pos.z,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn pos(&self) -> BlockPos {
        BlockPos::new(self.x, self.y, self.z)
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn to_persisted(&self) -> Value {
        serde_json::json!({
            KEY_DIMENSION: self.region,
            KEY_X: self.x,
            KEY_Y: self.y,
            KEY_Z: self.z,
        })
    }

    /// Parse a record previously produced by [LocationRecord::to_persisted].
    ///
    /// # Errors
    ///
    /// If any of the four keys is missing or doesn't hold the expected primitive (string or 32-bit integer).
    pub fn from_persisted(value: &Value) -> Result<Self, MalformedRecord> {
        Ok(LocationRecord::deserialize(value)?)
    }
}
