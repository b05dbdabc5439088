//! JSON description of host types.
//!
//! ```json
//! {
//!   "types": [
//!     {
//!       "name": "FormMain",
//!       "namespace": "Demo",
//!       "module": "Demo.exe",
//!       "members": [
//!         { "name": "Text" },
//!         { "name": "buttonOk", "type": "Button" }
//!       ]
//!     },
//!     { "name": "Button", "members": [{ "name": "Text" }] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use super::types::{
    TypeDescriptor,
    TypeResolver,
};

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read type manifest: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse type manifest: {0}")]
    ParseError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberEntry {
    pub name: String,
    /// Declared type, needed to resolve `member.Nested` paths.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub members: Vec<MemberEntry>,
}

impl TypeEntry {
    /// Matches `Name` or `Namespace.Name`.
    fn is_named(&self, class_name: &str) -> bool {
        self.name == class_name
            || self
                .namespace
                .as_deref()
                .and_then(|namespace| class_name.strip_prefix(namespace))
                .and_then(|rest| rest.strip_prefix('.'))
                .is_some_and(|rest| rest == self.name)
    }

    fn member(&self, name: &str) -> Option<&MemberEntry> {
        self.members.iter().find(|member| member.name == name)
    }
}

/// A [`TypeResolver`] backed by a list of types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeManifest {
    pub types: Vec<TypeEntry>,
}

impl TypeManifest {
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path)?;
        let manifest = Self::from_json(&text)?;
        tracing::debug!("Loaded {} types from {:?}", manifest.types.len(), path);
        Ok(manifest)
    }

    fn entry(&self, class_name: &str) -> Option<&TypeEntry> {
        self.types.iter().find(|entry| entry.is_named(class_name))
    }
}

impl TypeResolver for TypeManifest {
    fn find_type(&self, class_name: &str) -> Option<TypeDescriptor> {
        self.entry(class_name).map(|entry| TypeDescriptor {
            name: entry.name.clone(),
            namespace: entry.namespace.clone(),
            module: entry.module.clone(),
        })
    }

    fn member_exists(&self, member_path: &str, descriptor: &TypeDescriptor) -> bool {
        let Some(entry) = self.entry(&descriptor.name) else {
            return false;
        };

        match member_path.split_once('.') {
            None => entry.member(member_path.trim()).is_some(),
            Some((field, nested)) => entry
                .member(field.trim())
                .and_then(|member| member.type_name.as_deref())
                .and_then(|type_name| self.entry(type_name))
                .is_some_and(|nested_type| nested_type.member(nested.trim()).is_some()),
        }
    }
}
