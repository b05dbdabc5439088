//! Leaf translation values and the per-class property map.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// A translated message and whether it targets a type-level member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationProperty {
    pub message: String,
    pub is_static: bool,
}

impl TranslationProperty {
    #[must_use]
    pub fn new(message: impl Into<String>, is_static: bool) -> Self {
        Self { message: message.into(), is_static }
    }
}

/// Property name → translation, iterated in ordinal order.
///
/// A property name may contain one `.` to address a member of a nested field
/// (`button1.Text`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap(BTreeMap<String, TranslationProperty>);

impl PropertyMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, property_name: &str) -> Option<&TranslationProperty> {
        self.0.get(property_name)
    }

    #[must_use]
    pub fn contains(&self, property_name: &str) -> bool {
        self.0.contains_key(property_name)
    }

    /// Inserts or replaces a property.
    pub fn insert(&mut self, property_name: impl Into<String>, property: TranslationProperty) {
        self.0.insert(property_name.into(), property);
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, TranslationProperty> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if at least one property is static.
    #[must_use]
    pub fn has_static(&self) -> bool {
        self.0.values().any(|property| property.is_static)
    }
}

impl<'a> IntoIterator for &'a PropertyMap {
    type Item = (&'a String, &'a TranslationProperty);
    type IntoIter = btree_map::Iter<'a, String, TranslationProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Class name → properties of one language.
pub type ClassMap = BTreeMap<String, PropertyMap>;
