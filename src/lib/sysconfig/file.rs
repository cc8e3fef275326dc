// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use crate::{SysnetError, error::io_error_with_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum KeyValueStyle {
    /// `KEY='value'` used by sysconfig files.
    #[default]
    Sysconfig,
    /// `key = value` used by sysctl.d files.
    Sysctl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Comment, blank line or anything not understood, kept verbatim.
    Other(String),
    Pair {
        key: String,
        value: String,
        /// Original text, None once the value changed.
        raw: Option<String>,
    },
}

/// Flat `KEY=value` file keeping comments, unknown lines and the order
/// of keys.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct KeyValueFile {
    style: KeyValueStyle,
    lines: Vec<Line>,
}

impl KeyValueFile {
    pub(crate) fn new(style: KeyValueStyle) -> Self {
        Self {
            style,
            lines: Vec::new(),
        }
    }

    pub(crate) fn parse(content: &str, style: KeyValueStyle) -> Self {
        let lines = content
            .lines()
            .map(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    return Line::Other(line.to_string());
                }
                match trimmed.split_once('=') {
                    Some((key, value)) if is_valid_key(key.trim()) => {
                        Line::Pair {
                            key: key.trim().to_string(),
                            value: unquote(value.trim()),
                            raw: Some(line.to_string()),
                        }
                    }
                    _ => Line::Other(line.to_string()),
                }
            })
            .collect();
        Self { style, lines }
    }

    /// Load file, an absent file is treated as empty.
    pub(crate) fn load(
        path: &Path,
        style: KeyValueStyle,
    ) -> Result<Self, SysnetError> {
        if !path.exists() {
            return Ok(Self::new(style));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| io_error_with_path(e, path))?;
        Ok(Self::parse(&content, style))
    }

    /// Value of key, None if undefined or empty.
    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.get_raw(key).filter(|v| !v.is_empty())
    }

    /// Value of key, last definition wins like shell sourcing does.
    pub(crate) fn get_raw(&self, key: &str) -> Option<&str> {
        self.pairs()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v)
            .last()
    }

    pub(crate) fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|l| match l {
            Line::Pair { key, value, .. } => {
                Some((key.as_str(), value.as_str()))
            }
            Line::Other(_) => None,
        })
    }

    /// Set key in place of its first definition, dropping later ones, or
    /// append it. Untouched when the value is identical.
    pub(crate) fn set(&mut self, key: &str, value: &str) {
        if self.get_raw(key) == Some(value)
            && self.pairs().filter(|(k, _)| *k == key).count() == 1
        {
            return;
        }
        let mut found = false;
        self.lines.retain_mut(|l| match l {
            Line::Pair {
                key: k,
                value: v,
                raw,
            } if k == key => {
                if found {
                    false
                } else {
                    found = true;
                    *v = value.to_string();
                    *raw = None;
                    true
                }
            }
            _ => true,
        });
        if !found {
            self.lines.push(Line::Pair {
                key: key.to_string(),
                value: value.to_string(),
                raw: None,
            });
        }
    }

    pub(crate) fn set_opt(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(v) => self.set(key, v),
            None => self.remove(key),
        }
    }

    pub(crate) fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, if value { "yes" } else { "no" });
    }

    pub(crate) fn remove(&mut self, key: &str) {
        self.lines
            .retain(|l| !matches!(l, Line::Pair { key: k, .. } if k == key));
    }

    /// Drop everything including comments.
    pub(crate) fn clean(&mut self) {
        self.lines.clear();
    }

    /// Values of `<prefix><suffix>` keys in file order, suffix is empty for
    /// the plain `<prefix>` key.
    pub(crate) fn suffixed(&self, prefix: &str) -> Vec<(&str, &str)> {
        let mut ret: Vec<(&str, &str)> = Vec::new();
        for (key, value) in self.pairs() {
            let Some(suffix) = key.strip_prefix(prefix) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            if let Some(existing) = ret.iter_mut().find(|(s, _)| *s == suffix)
            {
                existing.1 = value;
            } else {
                ret.push((suffix, value));
            }
        }
        ret
    }

    pub(crate) fn render(&self) -> String {
        let mut ret = String::new();
        for line in &self.lines {
            match line {
                Line::Other(s) => ret.push_str(s),
                Line::Pair {
                    raw: Some(raw), ..
                } => ret.push_str(raw),
                Line::Pair { key, value, .. } => match self.style {
                    KeyValueStyle::Sysconfig => {
                        ret.push_str(&format!("{key}={}", quote(value)))
                    }
                    KeyValueStyle::Sysctl => {
                        ret.push_str(&format!("{key} = {value}"))
                    }
                },
            }
            ret.push('\n');
        }
        ret
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "true" | "on" | "1" | "y" => Some(true),
        "no" | "false" | "off" | "0" | "n" => Some(false),
        _ => None,
    }
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 {
        if value.starts_with('\'') && value.ends_with('\'') {
            return value[1..value.len() - 1].to_string();
        }
        if value.starts_with('"') && value.ends_with('"') {
            let inner = &value[1..value.len() - 1];
            let mut ret = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                if c == '\\'
                    && let Some(next) = chars.next()
                {
                    ret.push(next);
                } else {
                    ret.push(c);
                }
            }
            return ret;
        }
    }
    value.to_string()
}

fn quote(value: &str) -> String {
    if value.contains('\'') {
        let mut ret = String::from("\"");
        for c in value.chars() {
            if matches!(c, '"' | '\\' | '$' | '`') {
                ret.push('\\');
            }
            ret.push(c);
        }
        ret.push('"');
        ret
    } else {
        format!("'{value}'")
    }
}
