// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    ErrorKind, Interface, JsonDisplay, RenamingMechanism, SysnetError,
};

pub(crate) const UDEV_MAC_KEY: &str = "ATTR{address}";
pub(crate) const UDEV_BUSID_KEY: &str = "KERNELS";
const UDEV_NAME_KEY: &str = "NAME";
const UDEV_RULES_HEADER: &str = "# This file was automatically generated by \
                                 sysnet.\n# Each network device is pinned to \
                                 its name by MAC address or bus ID.\n";

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// One line of `70-persistent-net.rules` pinning a kernel name
pub struct UdevRule {
    /// Kernel name assigned by the rule.
    pub name: String,
    /// Either `ATTR{address}` or `KERNELS`.
    pub rule: String,
    /// MAC address or bus ID to match.
    pub value: String,
}

impl UdevRule {
    pub fn new(name: &str, mechanism: RenamingMechanism, value: &str) -> Self {
        Self {
            name: name.to_string(),
            rule: match mechanism {
                RenamingMechanism::BusId => UDEV_BUSID_KEY,
                _ => UDEV_MAC_KEY,
            }
            .to_string(),
            value: match mechanism {
                RenamingMechanism::Mac => value.to_lowercase(),
                _ => value.to_string(),
            },
        }
    }

    /// Build rule from interface name, renaming mechanism and hardware.
    /// None when mechanism is [RenamingMechanism::None] or the hardware does
    /// not provide the matching value.
    pub fn for_interface(iface: &Interface) -> Option<Self> {
        let value = match iface.renaming_mechanism {
            RenamingMechanism::None => return None,
            RenamingMechanism::Mac => iface.mac(),
            RenamingMechanism::BusId => iface.busid(),
        };
        match value {
            Some(v) => {
                Some(Self::new(&iface.name, iface.renaming_mechanism, v))
            }
            None => {
                log::warn!(
                    "Interface {} is renamed by {} but hardware does not \
                     provide the value, no udev rule generated",
                    iface.name,
                    iface.renaming_mechanism
                );
                None
            }
        }
    }

    pub fn mechanism(&self) -> RenamingMechanism {
        match self.rule.as_str() {
            UDEV_MAC_KEY => RenamingMechanism::Mac,
            UDEV_BUSID_KEY => RenamingMechanism::BusId,
            _ => RenamingMechanism::None,
        }
    }

    /// Whether this rule matches specified interface hardware.
    pub fn matches(&self, iface: &Interface) -> bool {
        match self.mechanism() {
            RenamingMechanism::Mac => iface
                .mac()
                .map(|m| m.eq_ignore_ascii_case(&self.value))
                .unwrap_or_default(),
            RenamingMechanism::BusId => {
                iface.busid() == Some(self.value.as_str())
            }
            RenamingMechanism::None => false,
        }
    }

    /// Parse a rule line, Ok(None) for comment, blank line or rules not
    /// assigning a network device name.
    pub fn parse_line(line: &str) -> Result<Option<Self>, SysnetError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut name = None;
        let mut matcher = None;
        for item in line.split(',') {
            let item = item.trim();
            if let Some((key, value)) = item.split_once("==") {
                let key = key.trim();
                if key == UDEV_MAC_KEY || key == UDEV_BUSID_KEY {
                    matcher = Some((key, unquote(value)));
                }
            } else if let Some((key, value)) = item.split_once('=')
                && key.trim() == UDEV_NAME_KEY
            {
                name = Some(unquote(value));
            }
        }
        match (name, matcher) {
            (Some(name), Some((key, value))) => Ok(Some(Self {
                name: name.to_string(),
                rule: key.to_string(),
                value: value.to_string(),
            })),
            (Some(name), None) => Err(SysnetError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "Udev rule for {name} matches neither {UDEV_MAC_KEY} \
                     nor {UDEV_BUSID_KEY}: {line}"
                ),
            )),
            _ => Ok(None),
        }
    }

    pub fn to_line(&self) -> String {
        let mut ret = String::from("SUBSYSTEM==\"net\", ACTION==\"add\", ");
        if self.mechanism() == RenamingMechanism::Mac {
            ret.push_str("DRIVERS==\"?*\", ");
        }
        ret.push_str(&format!(
            "{}==\"{}\", NAME=\"{}\"",
            self.rule, self.value, self.name
        ));
        ret
    }
}

fn unquote(s: &str) -> &str {
    s.trim().trim_matches('"')
}

/// Parse content of `70-persistent-net.rules`, collecting invalid lines into
/// the returned error list instead of failing.
pub(crate) fn parse_udev_rules(
    content: &str,
) -> (Vec<UdevRule>, Vec<SysnetError>) {
    let mut rules = Vec::new();
    let mut errors = Vec::new();
    for line in content.lines() {
        match UdevRule::parse_line(line) {
            Ok(Some(rule)) => rules.push(rule),
            Ok(None) => (),
            Err(e) => errors.push(e),
        }
    }
    (rules, errors)
}

pub(crate) fn render_udev_rules(rules: &[UdevRule]) -> String {
    let mut ret = UDEV_RULES_HEADER.to_string();
    for rule in rules {
        ret.push_str(&rule.to_line());
        ret.push('\n');
    }
    ret
}
