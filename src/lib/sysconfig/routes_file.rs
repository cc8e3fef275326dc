// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use crate::{Issues, Route, SysnetError, error::io_error_with_path};

/// Parse sysconfig `routes` or `ifroute-<iface>` file, an absent file holds
/// no route. Invalid lines are recorded as issues.
pub(crate) fn read_routes_file(
    path: &Path,
    file_iface: Option<&str>,
    issues: &mut Issues,
) -> Result<Vec<Route>, SysnetError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| io_error_with_path(e, path))?;
    Ok(parse_routes(&content, &path.display().to_string(), file_iface, issues))
}

pub(crate) fn parse_routes(
    content: &str,
    location: &str,
    file_iface: Option<&str>,
    issues: &mut Issues,
) -> Vec<Route> {
    let mut ret = Vec::new();
    for (i, line) in content.lines().enumerate() {
        match Route::from_sysconfig_line(line, file_iface) {
            Ok(Some(route)) => ret.push(route),
            Ok(None) => (),
            Err(e) => {
                issues.add(format!("{location}:{}", i + 1), e.msg().to_string())
            }
        }
    }
    ret
}

pub(crate) fn render_routes(routes: &[&Route]) -> String {
    let mut ret = String::new();
    for route in routes {
        ret.push_str(&route.to_sysconfig_line());
        ret.push('\n');
    }
    ret
}
