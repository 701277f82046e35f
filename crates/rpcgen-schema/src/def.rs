//! In-memory shape of a definition file.
//!
//! ```yaml
//! Models:
//!   User: { id: string, tags: "[]string" }
//! Services:
//!   Users:
//!     get: { id: string, return: User }
//! ```
//!
//! Every mapping keeps its document order, which is also the order of
//! emission.

use crate::lexical::RETURN_KEY;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// One parsed definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenDef {
    #[serde(rename = "Models", default, deserialize_with = "nullable")]
    pub models: IndexMap<String, Model>,
    #[serde(rename = "Services", default, deserialize_with = "nullable")]
    pub services: IndexMap<String, Service>,
}

impl GenDef {
    /// Parse one YAML document. An empty document is an empty definition.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let def: Option<Self> = serde_yaml::from_str(content)?;
        Ok(def.unwrap_or_default())
    }
}

/// A YAML `null` (e.g. `Models:` with nothing under it) reads as empty.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Name → raw type string, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(IndexMap<String, String>);

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        nullable(deserializer).map(Fields)
    }
}

impl Fields {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Fields(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A named record of typed fields.
pub type Model = Fields;

/// A named collection of methods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Service(IndexMap<String, Method>);

impl<'de> Deserialize<'de> for Service {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        nullable(deserializer).map(Service)
    }
}

impl Service {
    pub fn methods(&self) -> impl Iterator<Item = (&str, &Method)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Method)> for Service {
    fn from_iter<I: IntoIterator<Item = (K, Method)>>(iter: I) -> Self {
        Service(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A method: parameters plus the optional `return` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Method {
    entries: Fields,
}

impl Method {
    pub fn new(entries: Fields) -> Self {
        Self { entries }
    }

    /// All entries, `return` included.
    pub fn entries(&self) -> &Fields {
        &self.entries
    }

    /// Parameters in declaration order, without `return`.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter(|(name, _)| *name != RETURN_KEY)
    }

    /// The declared return type, if any.
    pub fn returns(&self) -> Option<&str> {
        self.entries.get(RETURN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_models_and_services_in_order() {
        let def = GenDef::from_yaml_str(
            r#"
Models:
  Zeta: { b: int32, a: string }
  Alpha: { x: "[]Zeta" }
Services:
  Greeter:
    hello: { name: string, greeting: string, return: string }
    ping: { return: string }
"#,
        )
        .unwrap();

        let models: Vec<_> = def.models.keys().map(String::as_str).collect();
        assert_eq!(models, ["Zeta", "Alpha"]);
        let zeta: Vec<_> = def.models["Zeta"].names().collect();
        assert_eq!(zeta, ["b", "a"]);
        assert_eq!(def.models["Alpha"].get("x"), Some("[]Zeta"));

        let greeter = &def.services["Greeter"];
        let (name, hello) = greeter.methods().next().unwrap();
        assert_eq!(name, "hello");
        let params: Vec<_> = hello.params().collect();
        assert_eq!(params, [("name", "string"), ("greeting", "string")]);
        assert_eq!(hello.returns(), Some("string"));
        assert_eq!(hello.entries().len(), 3);
    }

    #[test]
    fn missing_and_null_sections_are_empty() {
        assert_eq!(GenDef::from_yaml_str("").unwrap(), GenDef::default());
        assert_eq!(GenDef::from_yaml_str("  \n").unwrap(), GenDef::default());
        assert_eq!(GenDef::from_yaml_str("~").unwrap(), GenDef::default());

        let def = GenDef::from_yaml_str("Models:\nServices:\n").unwrap();
        assert!(def.models.is_empty());
        assert!(def.services.is_empty());

        let def = GenDef::from_yaml_str("Models:\n  Empty:\n").unwrap();
        assert!(def.models["Empty"].is_empty());
    }

    #[test]
    fn method_without_return() {
        let def = GenDef::from_yaml_str("Services: { S: { fire: { event: string } } }").unwrap();
        let (_, fire) = def.services["S"].methods().next().unwrap();
        assert_eq!(fire.returns(), None);
        assert_eq!(fire.params().count(), 1);
    }

    #[test]
    fn non_string_type_is_a_parse_error() {
        assert!(GenDef::from_yaml_str("Models: { M: { x: [1, 2] } }").is_err());
    }
}
