// SPDX-License-Identifier: Apache-2.0

use sysnet::{ErrorKind, SysnetError};

pub(crate) fn np_error_to_sysnet(np_error: nispor::NisporError) -> SysnetError {
    SysnetError::new(
        ErrorKind::Bug,
        format!("{}: {}", np_error.kind, np_error.msg),
    )
}
