//! `Serialize`/`Deserialize` for [`Expression`], through the tagged codec.
//!
//! Any serde format can carry the wire layout this way; the decoder's
//! validation still applies, with default [`DecodeOptions`].

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use crate::decode::{DecodeOptions, FromJson};
use crate::encode::Encode;
use crate::expression::Expression;

impl Serialize for Expression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.encode().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Expression::from_json_with_options(&value, &DecodeOptions::default())
            .map_err(de::Error::custom)
    }
}
