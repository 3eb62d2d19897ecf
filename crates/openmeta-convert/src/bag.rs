//! Working property bags used while building beans.
//!
//! A [`PropertyBag`] is a private copy of an instance's properties. Bean
//! builders take known properties out of it one by one; whatever is left
//! becomes the bean's extended properties. A property whose stored type does
//! not match the requested type stays in the bag, so it is carried as an
//! extended property rather than lost.
//!
//! [`PropertyWriter`] is the inverse: it lays a bean's fields back out as
//! an [`InstanceProperties`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use openmeta_core::property::{EnumValue, InstanceProperties, PropertyValue};
use tracing::debug;

/// A bean enum that is stored in the repository as an enum property.
pub trait PropertyEnum: Sized + Copy {
    /// Name of the open-metadata enum type.
    const TYPE_NAME: &'static str;

    fn ordinal(&self) -> i32;

    fn symbolic_name(&self) -> &'static str;

    fn from_symbolic_name(name: &str) -> Option<Self>;

    /// Accepts a stored value only when both symbolic name and ordinal match.
    fn from_enum_value(value: &EnumValue) -> Option<Self> {
        Self::from_symbolic_name(&value.symbolic_name).filter(|e| e.ordinal() == value.ordinal)
    }

    fn to_enum_value(&self) -> EnumValue {
        EnumValue {
            ordinal: self.ordinal(),
            symbolic_name: self.symbolic_name().to_owned(),
        }
    }
}

/// A private, consumable copy of an instance's property bag.
#[derive(Debug, Clone, Default)]
pub struct PropertyBag {
    entries: BTreeMap<String, PropertyValue>,
    effective_from: Option<DateTime<Utc>>,
    effective_to: Option<DateTime<Utc>>,
}

impl PropertyBag {
    /// Copies `properties`; the source is never modified.
    pub fn from_properties(properties: &InstanceProperties) -> Self {
        Self {
            entries: properties.properties.clone(),
            effective_from: properties.effective_from_time,
            effective_to: properties.effective_to_time,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Takes the effectivity window. It is not part of the property map.
    pub fn take_effectivity(&mut self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (self.effective_from.take(), self.effective_to.take())
    }

    /// Removes `name` if `extract` accepts its value.
    fn take_with<T>(
        &mut self,
        name: &str,
        expected: &'static str,
        extract: impl FnOnce(&PropertyValue) -> Option<T>,
    ) -> Option<T> {
        let value = self.entries.get(name)?;
        match extract(value) {
            Some(v) => {
                self.entries.remove(name);
                Some(v)
            }
            None => {
                debug!(
                    property = name,
                    expected,
                    found = value.kind(),
                    "property type mismatch, leaving it for extended properties"
                );
                None
            }
        }
    }

    pub fn take_string(&mut self, name: &str) -> Option<String> {
        self.take_with(name, "string", |v| match v {
            PropertyValue::String(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn take_int(&mut self, name: &str) -> Option<i32> {
        self.take_with(name, "int", |v| match v {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        })
    }

    pub fn take_long(&mut self, name: &str) -> Option<i64> {
        self.take_with(name, "long", |v| match v {
            PropertyValue::Long(i) => Some(*i),
            _ => None,
        })
    }

    pub fn take_float(&mut self, name: &str) -> Option<f64> {
        self.take_with(name, "float", |v| match v {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        })
    }

    pub fn take_bool(&mut self, name: &str) -> Option<bool> {
        self.take_with(name, "boolean", |v| match v {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        })
    }

    pub fn take_date(&mut self, name: &str) -> Option<DateTime<Utc>> {
        self.take_with(name, "date", |v| match v {
            PropertyValue::Date(d) => Some(*d),
            _ => None,
        })
    }

    pub fn take_enum<E: PropertyEnum>(&mut self, name: &str) -> Option<E> {
        self.take_with(name, E::TYPE_NAME, |v| match v {
            PropertyValue::Enum(e) => E::from_enum_value(e),
            _ => None,
        })
    }

    /// Takes a map property whose values are all strings.
    pub fn take_string_map(&mut self, name: &str) -> Option<BTreeMap<String, String>> {
        self.take_with(name, "map<string,string>", |v| match v {
            PropertyValue::Map(m) => m
                .iter()
                .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_owned())))
                .collect(),
            _ => None,
        })
    }

    /// Takes an array property whose elements are all strings.
    pub fn take_string_array(&mut self, name: &str) -> Option<Vec<String>> {
        self.take_with(name, "array<string>", |v| match v {
            PropertyValue::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect(),
            _ => None,
        })
    }

    /// Everything that was not taken.
    pub fn into_extended(self) -> BTreeMap<String, PropertyValue> {
        self.entries
    }
}

/// Lays typed fields back out as an instance property bag.
#[derive(Debug, Default)]
pub struct PropertyWriter {
    properties: InstanceProperties,
}

impl PropertyWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&mut self, name: &str, value: Option<PropertyValue>) -> &mut Self {
        if let Some(value) = value {
            self.properties.insert(name, value);
        }
        self
    }

    pub fn string(&mut self, name: &str, value: &Option<String>) -> &mut Self {
        self.put(name, value.clone().map(PropertyValue::String))
    }

    pub fn int(&mut self, name: &str, value: Option<i32>) -> &mut Self {
        self.put(name, value.map(PropertyValue::Int))
    }

    pub fn long(&mut self, name: &str, value: Option<i64>) -> &mut Self {
        self.put(name, value.map(PropertyValue::Long))
    }

    pub fn float(&mut self, name: &str, value: Option<f64>) -> &mut Self {
        self.put(name, value.map(PropertyValue::Float))
    }

    pub fn bool(&mut self, name: &str, value: Option<bool>) -> &mut Self {
        self.put(name, value.map(PropertyValue::Boolean))
    }

    pub fn date(&mut self, name: &str, value: Option<DateTime<Utc>>) -> &mut Self {
        self.put(name, value.map(PropertyValue::Date))
    }

    pub fn enumeration<E: PropertyEnum>(&mut self, name: &str, value: Option<E>) -> &mut Self {
        self.put(name, value.map(|e| PropertyValue::Enum(e.to_enum_value())))
    }

    pub fn string_map(&mut self, name: &str, value: &Option<BTreeMap<String, String>>) -> &mut Self {
        self.put(name, value.as_ref().map(|m| PropertyValue::string_map(m.clone())))
    }

    pub fn string_array(&mut self, name: &str, value: &Option<Vec<String>>) -> &mut Self {
        self.put(name, value.as_ref().map(|a| PropertyValue::string_array(a.clone())))
    }

    pub fn effectivity(
        &mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> &mut Self {
        self.properties.effective_from_time = from;
        self.properties.effective_to_time = to;
        self
    }

    pub fn extended(&mut self, extended: &BTreeMap<String, PropertyValue>) -> &mut Self {
        for (name, value) in extended {
            self.properties.insert(name.clone(), value.clone());
        }
        self
    }

    pub fn finish(&mut self) -> InstanceProperties {
        std::mem::take(&mut self.properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Colour {
        Red,
        Blue,
    }

    impl PropertyEnum for Colour {
        const TYPE_NAME: &'static str = "Colour";

        fn ordinal(&self) -> i32 {
            match self {
                Self::Red => 0,
                Self::Blue => 1,
            }
        }

        fn symbolic_name(&self) -> &'static str {
            match self {
                Self::Red => "RED",
                Self::Blue => "BLUE",
            }
        }

        fn from_symbolic_name(name: &str) -> Option<Self> {
            match name {
                "RED" => Some(Self::Red),
                "BLUE" => Some(Self::Blue),
                _ => None,
            }
        }
    }

    fn source() -> InstanceProperties {
        InstanceProperties::new()
            .with("qualifiedName", "x")
            .with("priority", 3i32)
            .with("count", 7i64)
            .with("colour", PropertyValue::enumeration(1, "BLUE"))
            .with("tags", PropertyValue::string_array(["a", "b"]))
            .with("options", PropertyValue::string_map([("k", "v")]))
            .with("customField", "z")
    }

    #[test]
    fn taken_properties_leave_the_bag() {
        let props = source();
        let mut bag = PropertyBag::from_properties(&props);
        assert_eq!(bag.take_string("qualifiedName"), Some("x".into()));
        assert_eq!(bag.take_int("priority"), Some(3));
        assert_eq!(bag.take_long("count"), Some(7));
        assert_eq!(bag.take_enum::<Colour>("colour"), Some(Colour::Blue));
        assert_eq!(bag.take_string_array("tags"), Some(vec!["a".into(), "b".into()]));
        assert_eq!(
            bag.take_string_map("options"),
            Some(BTreeMap::from([("k".to_string(), "v".to_string())]))
        );

        let extended = bag.into_extended();
        assert_eq!(extended.len(), 1);
        assert_eq!(extended["customField"], PropertyValue::from("z"));

        // The source bag is untouched.
        assert_eq!(props.len(), 7);
    }

    #[test]
    fn wrong_type_stays_in_bag() {
        let props = InstanceProperties::new().with("priority", "high");
        let mut bag = PropertyBag::from_properties(&props);
        assert_eq!(bag.take_int("priority"), None);
        assert!(bag.contains("priority"));
    }

    #[test]
    fn enum_with_mismatched_ordinal_stays_in_bag() {
        let props = InstanceProperties::new().with("colour", PropertyValue::enumeration(5, "BLUE"));
        let mut bag = PropertyBag::from_properties(&props);
        assert_eq!(bag.take_enum::<Colour>("colour"), None);
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn mixed_map_is_not_a_string_map() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), PropertyValue::from("x"));
        map.insert("b".to_string(), PropertyValue::Int(1));
        let props = InstanceProperties::new().with("additionalProperties", PropertyValue::Map(map));
        let mut bag = PropertyBag::from_properties(&props);
        assert_eq!(bag.take_string_map("additionalProperties"), None);
        assert!(bag.contains("additionalProperties"));
    }

    #[test]
    fn missing_property_is_none() {
        let mut bag = PropertyBag::default();
        assert_eq!(bag.take_string("qualifiedName"), None);
        assert!(bag.is_empty());
    }

    #[test]
    fn writer_reproduces_taken_properties() {
        let props = source();
        let mut bag = PropertyBag::from_properties(&props);
        let qn = bag.take_string("qualifiedName");
        let priority = bag.take_int("priority");
        let count = bag.take_long("count");
        let colour = bag.take_enum::<Colour>("colour");
        let tags = bag.take_string_array("tags");
        let options = bag.take_string_map("options");
        let extended = bag.into_extended();

        let rebuilt = PropertyWriter::new()
            .string("qualifiedName", &qn)
            .int("priority", priority)
            .long("count", count)
            .enumeration("colour", colour)
            .string_array("tags", &tags)
            .string_map("options", &options)
            .extended(&extended)
            .finish();
        assert_eq!(rebuilt, props);
    }
}
