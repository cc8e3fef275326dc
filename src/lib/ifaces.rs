// SPDX-License-Identifier: Apache-2.0

use serde::{
    Deserialize, Deserializer, Serialize, Serializer, ser::SerializeSeq,
};

use crate::{ErrorKind, Interface, SysnetError};

/// Ordered list of [Interface] with unique names.
///
/// Pushing an interface whose name is already used is rejected with
/// [ErrorKind::Duplicate], the existing entry is kept untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct InterfacesCollection {
    ifaces: Vec<Interface>,
}

impl<'de> Deserialize<'de> for InterfacesCollection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut ret = Self::default();
        for iface in <Vec<Interface> as Deserialize>::deserialize(deserializer)?
        {
            ret.push(iface).map_err(serde::de::Error::custom)?;
        }
        Ok(ret)
    }
}

impl Serialize for InterfacesCollection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.ifaces.len()))?;
        for iface in &self.ifaces {
            seq.serialize_element(iface)?;
        }
        seq.end()
    }
}

impl InterfacesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ifaces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ifaces.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interface> {
        self.ifaces.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Interface> {
        self.ifaces.iter_mut()
    }

    pub fn push(&mut self, iface: Interface) -> Result<(), SysnetError> {
        if self.contains(&iface.name) {
            return Err(SysnetError::new(
                ErrorKind::Duplicate,
                format!("Interface {} already exists", iface.name),
            ));
        }
        self.ifaces.push(iface);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name(name).is_some()
    }

    pub fn by_name(&self, name: &str) -> Option<&Interface> {
        self.ifaces.iter().find(|i| i.name == name)
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Interface> {
        self.ifaces.iter_mut().find(|i| i.name == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Interface> {
        let pos = self.ifaces.iter().position(|i| i.name == name)?;
        Some(self.ifaces.remove(pos))
    }

    pub fn physical(&self) -> Vec<&Interface> {
        self.ifaces.iter().filter(|i| i.is_physical()).collect()
    }

    pub fn virtuals(&self) -> Vec<&Interface> {
        self.ifaces.iter().filter(|i| i.is_virtual()).collect()
    }

    /// Lowest `<prefix><N>` not used by any interface in the collection.
    pub fn free_name(&self, prefix: &str) -> String {
        (0u32..)
            .map(|i| format!("{prefix}{i}"))
            .find(|name| !self.contains(name))
            .unwrap_or_else(|| prefix.to_string())
    }
}

/// Non-numeric prefix of interface name, e.g. `eth` for `eth10`.
pub(crate) fn iface_name_prefix(name: &str) -> &str {
    name.trim_end_matches(|c: char| c.is_ascii_digit())
}
