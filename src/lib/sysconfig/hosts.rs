// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use crate::{SysnetError, error::io_error_with_path};

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostsLine {
    Other(String),
    Entry {
        address: String,
        names: Vec<String>,
        raw: Option<String>,
    },
}

/// `/etc/hosts` keeping comments and unrelated entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct HostsFile {
    lines: Vec<HostsLine>,
}

impl HostsFile {
    pub(crate) fn parse(content: &str) -> Self {
        let lines = content
            .lines()
            .map(|line| {
                let data = line.split('#').next().unwrap_or_default();
                let mut fields = data.split_whitespace();
                match fields.next() {
                    Some(address) => HostsLine::Entry {
                        address: address.to_string(),
                        names: fields.map(|n| n.to_string()).collect(),
                        raw: Some(line.to_string()),
                    },
                    None => HostsLine::Other(line.to_string()),
                }
            })
            .collect();
        Self { lines }
    }

    pub(crate) fn load(path: &Path) -> Result<Self, SysnetError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| io_error_with_path(e, path))?;
        Ok(Self::parse(&content))
    }

    /// Host names of address, canonical name first.
    pub(crate) fn names(&self, address: &str) -> Vec<String> {
        let mut ret = Vec::new();
        for line in &self.lines {
            if let HostsLine::Entry {
                address: a, names, ..
            } = line
                && a == address
            {
                ret.extend(names.iter().cloned());
            }
        }
        ret
    }

    /// Replace host names of address, empty `names` removes the entry.
    pub(crate) fn set(&mut self, address: &str, names: &[String]) {
        if self.names(address) == names {
            return;
        }
        let mut found = false;
        self.lines.retain_mut(|line| match line {
            HostsLine::Entry {
                address: a,
                names: n,
                raw,
            } if a == address => {
                if found || names.is_empty() {
                    false
                } else {
                    found = true;
                    *n = names.to_vec();
                    *raw = None;
                    true
                }
            }
            _ => true,
        });
        if !found && !names.is_empty() {
            self.lines.push(HostsLine::Entry {
                address: address.to_string(),
                names: names.to_vec(),
                raw: None,
            });
        }
    }

    pub(crate) fn render(&self) -> String {
        let mut ret = String::new();
        for line in &self.lines {
            match line {
                HostsLine::Other(s)
                | HostsLine::Entry { raw: Some(s), .. } => ret.push_str(s),
                HostsLine::Entry { address, names, .. } => {
                    ret.push_str(&format!("{address}\t{}", names.join(" ")))
                }
            }
            ret.push('\n');
        }
        ret
    }
}
