//! The package's `content.json`: an open key/value document whose card list
//! is the only part this crate rewrites.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::assets::{PNG_MIME, PairAssets};
use crate::error::{GenerateError, GenerateResult};

/// Manifest location relative to the package root.
pub const MANIFEST_PATH: &str = "content/content.json";
/// Key holding the list of pairing cards.
pub const CARDS_KEY: &str = "cards";
/// License written for every generated image. `U` is the H5P license code
/// for "undisclosed", i.e. the license is unknown.
pub const LICENSE_UNKNOWN: &str = "U";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Copyright {
    pub license: String,
}

/// Reference to one image inside the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub path: String,
    pub mime: String,
    pub copyright: Copyright,
}

impl ImageRef {
    pub fn png(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mime: PNG_MIME.to_string(),
            copyright: Copyright {
                license: LICENSE_UNKNOWN.to_string(),
            },
        }
    }
}

/// Manifest record for one pair of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardEntry {
    pub image: ImageRef,
    #[serde(rename = "match")]
    pub matched: ImageRef,
    pub description: String,
}

impl From<&PairAssets> for CardEntry {
    fn from(assets: &PairAssets) -> Self {
        Self {
            image: ImageRef::png(assets.image.path()),
            matched: ImageRef::png(assets.matched.path()),
            description: assets.description.clone(),
        }
    }
}

/// Parsed manifest. Key order and unknown keys are preserved verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

impl Manifest {
    /// Parse manifest JSON. The root must be an object carrying a `cards` array.
    pub fn from_slice(bytes: &[u8]) -> GenerateResult<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        let Value::Object(fields) = value else {
            return Err(GenerateError::manifest_shape("root is not a JSON object"));
        };
        match fields.get(CARDS_KEY) {
            Some(Value::Array(_)) => Ok(Self { fields }),
            Some(_) => Err(GenerateError::manifest_shape(format!(
                "`{CARDS_KEY}` is not an array"
            ))),
            None => Err(GenerateError::manifest_shape(format!(
                "missing `{CARDS_KEY}` field"
            ))),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn card_count(&self) -> usize {
        self.fields
            .get(CARDS_KEY)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Replace the whole card list; every other key is left untouched.
    pub fn replace_cards(&mut self, entries: &[CardEntry]) -> GenerateResult<()> {
        let cards = serde_json::to_value(entries)?;
        self.fields.insert(CARDS_KEY.to_string(), cards);
        Ok(())
    }

    /// Pretty JSON (two-space indent) with non-ASCII text kept literal.
    pub fn to_pretty_json(&self) -> GenerateResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.fields)?)
    }
}
