use serde::{
    de::Error as _, ser::Error as _, Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::{Map, Value as Json};
use tracing::debug;

/// Builds a known variant from the full JSON object, discriminator included.
pub type Constructor<T> = fn(Json) -> Result<T, serde_json::Error>;

/// An object whose discriminator did not match any entry of its [DispatchTable].
///
/// The raw object is kept intact (tag included) so that it can be inspected or re-encoded
/// without loss.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownObject {
    tag: String,
    raw: Map<String, Json>,
}

impl UnknownObject {
    /// The unrecognised discriminator value.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The object exactly as the service returned it.
    pub fn raw(&self) -> &Map<String, Json> {
        &self.raw
    }

    /// Look up a raw field of the object.
    pub fn get(&self, field: &str) -> Option<&Json> {
        self.raw.get(field)
    }
}

impl Serialize for UnknownObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Mapping from discriminator values to the constructors of the matching variants.
///
/// Tags missing from the table never fail decoding: they are handed to the fallback so new
/// server-side types can appear without breaking existing clients.
#[derive(Debug)]
pub struct DispatchTable<T: 'static> {
    pub tag_field: &'static str,
    pub entries: &'static [(&'static str, Constructor<T>)],
}

impl<T> DispatchTable<T> {
    /// Find the constructor registered for `tag`.
    pub fn lookup(&self, tag: &str) -> Option<Constructor<T>> {
        self.entries
            .iter()
            .find(|(known, _)| *known == tag)
            .map(|(_, constructor)| *constructor)
    }

    /// Whether `tag` has a dedicated variant.
    pub fn is_known(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    /// Decode a JSON object, dispatching on its discriminator.
    ///
    /// # Errors
    /// Fails if the input is not an object, if the discriminator is missing or not a string, or
    /// if a *known* variant cannot be built from the object.
    pub fn deserialize<'de, D>(
        &self,
        deserializer: D,
        fallback: fn(UnknownObject) -> T,
    ) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Map::<String, Json>::deserialize(deserializer)?;

        let tag = match object.get(self.tag_field) {
            Some(Json::String(tag)) => tag.clone(),
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "`{}` must be a string, found {other}",
                    self.tag_field
                )))
            }
            None => return Err(D::Error::missing_field(self.tag_field)),
        };

        match self.lookup(&tag) {
            Some(construct) => construct(Json::Object(object)).map_err(D::Error::custom),
            None => {
                debug!("decoding unrecognised {} '{tag}' as unknown", self.tag_field);
                Ok(fallback(UnknownObject { tag, raw: object }))
            }
        }
    }
}

/// Serialize `payload` as an object carrying `tag_field: tag`.
pub fn serialize_tagged<S, P>(
    serializer: S,
    tag_field: &str,
    tag: &str,
    payload: &P,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    P: Serialize,
{
    let mut value = serde_json::to_value(payload).map_err(S::Error::custom)?;
    match &mut value {
        Json::Object(object) => {
            object.insert(tag_field.to_owned(), Json::String(tag.to_owned()));
        }
        other => {
            return Err(S::Error::custom(format!(
                "tagged payload must serialize to an object, found {other}"
            )))
        }
    }
    value.serialize(serializer)
}
