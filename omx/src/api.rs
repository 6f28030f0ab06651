// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Loading of OpenMAX IL core libraries.

use std::{ffi::OsStr, sync::Arc};

use crate::Result;

/// Entry points of a loaded OpenMAX IL core.
pub type OmxApi = omx_sys::OmxCoreLibrary;

/// Shared handle to a loaded core library.
pub type OmxApiHandle = Arc<OmxApi>;

/// Loads the OpenMAX IL core library at `path`.
///
/// Every core entry point must be exported by the library, otherwise
/// [`crate::Error::LibLoading`] is returned.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> Result<(), omx::Error> {
/// let api = omx::load_api("libomxil-bellagio.so.0")?;
/// let core = omx::OmxCore::new(api)?;
/// # Ok(())
/// # }
/// ```
pub fn load_api(path: impl AsRef<OsStr>) -> Result<OmxApiHandle> {
    let path = path.as_ref();
    tracing::debug!(path = %path.to_string_lossy(), "loading OpenMAX IL core");
    let api = unsafe { OmxApi::new(path)? };
    Ok(Arc::new(api))
}
