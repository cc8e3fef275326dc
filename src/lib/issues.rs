// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::JsonDisplay;

/// Problem found in a single configuration entry.
///
/// Reading keeps going after recording an issue, so one broken file or
/// profile entry never hides the rest of the configuration.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub struct Issue {
    /// Where the problem was found, e.g. `ifcfg-eth0:IPADDR_1` or
    /// `interfaces[2].vlan_id`.
    pub location: String,
    pub message: String,
}

impl Issue {
    pub fn new(
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[non_exhaustive]
pub struct Issues(Vec<Issue>);

impl Issues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        log::warn!("{}: {}", issue.location, issue.message);
        self.0.push(issue);
    }

    pub fn add(
        &mut self,
        location: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Issue::new(location, message))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter()
    }

    pub fn extend(&mut self, other: Issues) {
        self.0.extend(other.0)
    }

    /// Whether any recorded issue was found at a location starting with
    /// `prefix`.
    pub fn has_location(&self, prefix: &str) -> bool {
        self.0.iter().any(|i| i.location.starts_with(prefix))
    }
}
