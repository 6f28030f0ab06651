//! Per-element defaults
//!
//! Every element resolves its `component-name`, `library-name` and quirks from
//! a built-in table keyed by element name. A JSON file named by the
//! `GST_OMX_CONFIG` environment variable overrides individual fields:
//!
//! ```json
//! {
//!   "omxadpcmdec": { "component-name": "OMX.vendor.adpcm", "library-name": "libOMX_Core.so" },
//!   "omxmpeg4enc": { "quirks": ["override-buffer-size"] }
//! }
//! ```
//!
//! Properties set on an element win over both.

// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use gstreamer as gst;
use serde::Deserialize;

/// Environment variable naming the JSON configuration file.
pub const CONFIG_ENV: &str = "GST_OMX_CONFIG";

static CAT: LazyLock<gst::DebugCategory> = LazyLock::new(|| {
    gst::DebugCategory::new(
        "omxconfig",
        gst::DebugColorFlags::empty(),
        Some("OpenMAX IL element configuration"),
    )
});

static CONFIG: LazyLock<HashMap<String, ElementConfig>> = LazyLock::new(load);

/// Defaults of one element. Fields left `None` fall through to the next
/// layer (built-in table, then the core library default).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ElementConfig {
    pub component_name: Option<String>,
    pub library_name: Option<String>,
    pub quirks: Option<Vec<String>>,
}

impl ElementConfig {
    fn builtin(component_name: &str, library_name: Option<&str>) -> Self {
        ElementConfig {
            component_name: Some(component_name.to_owned()),
            library_name: library_name.map(str::to_owned),
            quirks: None,
        }
    }

    /// Replaces every field `other` sets.
    fn merge(&mut self, other: ElementConfig) {
        if other.component_name.is_some() {
            self.component_name = other.component_name;
        }
        if other.library_name.is_some() {
            self.library_name = other.library_name;
        }
        if other.quirks.is_some() {
            self.quirks = other.quirks;
        }
    }

    /// The configured quirk set, if any. Unknown quirk names are logged and
    /// skipped.
    pub fn quirks(&self) -> Option<omx::Quirks> {
        let names = self.quirks.as_ref()?;
        Some(
            names
                .iter()
                .filter_map(|name| match name.parse::<omx::Quirk>() {
                    Ok(quirk) => Some(quirk),
                    Err(err) => {
                        gst::warning!(CAT, "Ignoring quirk: {}", err);
                        None
                    }
                })
                .collect(),
        )
    }
}

fn builtin() -> HashMap<String, ElementConfig> {
    [
        (
            "omxadpcmdec",
            ElementConfig::builtin("OMX.st.audio_decoder.adpcm", None),
        ),
        (
            "omxamrwbenc",
            ElementConfig::builtin("OMX.st.audio_encoder.amrwb", None),
        ),
        (
            "omxmpeg4enc",
            ElementConfig::builtin("OMX.st.video_encoder.mpeg4", Some("libOMX_Core.so")),
        ),
        (
            "omxh264enc",
            ElementConfig::builtin("OMX.st.video_encoder.avc", Some("libOMX_Core.so")),
        ),
    ]
    .into_iter()
    .map(|(element, config)| (element.to_owned(), config))
    .collect()
}

/// Parses a configuration document.
pub fn parse(json: &str) -> Result<HashMap<String, ElementConfig>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Layers `overrides` on top of `table`.
fn merge(table: &mut HashMap<String, ElementConfig>, overrides: HashMap<String, ElementConfig>) {
    for (element, config) in overrides {
        table.entry(element).or_default().merge(config);
    }
}

fn read(path: &Path) -> Result<HashMap<String, ElementConfig>, String> {
    let json = std::fs::read_to_string(path).map_err(|err| err.to_string())?;
    parse(&json).map_err(|err| err.to_string())
}

fn load() -> HashMap<String, ElementConfig> {
    let mut table = builtin();
    let Some(path) = std::env::var_os(CONFIG_ENV).filter(|path| !path.is_empty()) else {
        return table;
    };
    let path = Path::new(&path);
    match read(path) {
        Ok(overrides) => {
            gst::info!(CAT, "Loaded element configuration from {}", path.display());
            merge(&mut table, overrides);
        }
        Err(err) => {
            gst::warning!(
                CAT,
                "Ignoring element configuration {}: {}",
                path.display(),
                err
            );
        }
    }
    table
}

/// Resolved defaults of the element called `element`.
pub fn element_config(element: &str) -> ElementConfig {
    CONFIG.get(element).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut table = builtin();
        let overrides = parse(
            r#"{
                "omxadpcmdec": { "library-name": "libOMX_Core.so" },
                "omxmpeg4enc": { "quirks": ["integer-framerate"] },
                "omxnew": { "component-name": "OMX.vendor.new" }
            }"#,
        )
        .unwrap();
        merge(&mut table, overrides);

        let adpcm = &table["omxadpcmdec"];
        assert_eq!(
            adpcm.component_name.as_deref(),
            Some("OMX.st.audio_decoder.adpcm")
        );
        assert_eq!(adpcm.library_name.as_deref(), Some("libOMX_Core.so"));

        let mpeg4 = &table["omxmpeg4enc"];
        let quirks = mpeg4.quirks().unwrap();
        assert!(quirks.contains(omx::Quirk::IntegerFramerate));
        assert!(!quirks.contains(omx::Quirk::OverrideBufferSize));

        assert_eq!(
            table["omxnew"].component_name.as_deref(),
            Some("OMX.vendor.new")
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse(r#"{ "omxadpcmdec": { "component": "x" } }"#).is_err());
    }

    #[test]
    fn builtin_video_encoders_use_the_st_core() {
        let table = builtin();
        assert_eq!(
            table["omxh264enc"].library_name.as_deref(),
            Some("libOMX_Core.so")
        );
        assert_eq!(table["omxamrwbenc"].library_name, None);
        assert_eq!(table["omxamrwbenc"].quirks(), None);
    }
}
