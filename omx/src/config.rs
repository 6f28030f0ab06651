// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration for locating the OpenMAX IL core library.

/// Environment variable overriding the core library path.
pub const CORE_LIBRARY_ENV: &str = "OMX_CORE_LIBRARY";

/// Core library used when nothing else is configured.
pub const DEFAULT_CORE_LIBRARY: &str = "libomxil-bellagio.so.0";

/// Returns the path of the OpenMAX IL core library to load.
///
/// The `OMX_CORE_LIBRARY` environment variable wins when set and non-empty;
/// otherwise the Bellagio core is used.
///
/// # Examples
///
/// ```no_run
/// use omx::config::default_core_library;
///
/// # fn main() -> Result<(), omx::Error> {
/// let api = omx::load_api(default_core_library())?;
/// # Ok(())
/// # }
/// ```
pub fn default_core_library() -> std::path::PathBuf {
    match std::env::var_os(CORE_LIBRARY_ENV) {
        Some(path) if !path.is_empty() => path.into(),
        _ => DEFAULT_CORE_LIBRARY.into(),
    }
}
