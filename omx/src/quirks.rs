// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Component-specific deviations from OpenMAX IL.
//!
//! Some components need settings the standard does not allow a client to
//! make, or interpret fields differently. Each such deviation is a named
//! [`Quirk`]; [`Quirks::for_component`] looks up which ones apply to a
//! component by name prefix.

use std::{fmt, str::FromStr};

use omx_sys::OMX_COLOR_FORMATTYPE;

use crate::{Component, Error, PortDefinitionParam, Result};

/// A single deviation from the standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quirk {
    /// The component does not compute `nBufferSize` itself. The client
    /// writes it on both video encoder ports after configuring the input:
    /// 2 bytes per pixel for packed 4:2:2 input, 1.5 for planar 4:2:0 input,
    /// and `width * height / 2` on the output, which also receives the input
    /// width, height and framerate.
    OverrideBufferSize,
    /// `xFramerate` holds integer frames per second instead of Q16.
    IntegerFramerate,
}

impl Quirk {
    /// Every known quirk.
    pub const ALL: [Quirk; 2] = [Quirk::OverrideBufferSize, Quirk::IntegerFramerate];

    /// Name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Quirk::OverrideBufferSize => "override-buffer-size",
            Quirk::IntegerFramerate => "integer-framerate",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Quirk::OverrideBufferSize => 1 << 0,
            Quirk::IntegerFramerate => 1 << 1,
        }
    }
}

impl fmt::Display for Quirk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quirk {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Quirk::ALL
            .into_iter()
            .find(|quirk| quirk.name() == s)
            .ok_or_else(|| Error::Other(format!("unknown quirk '{s}'")))
    }
}

/// A set of quirks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Quirks(u8);

/// Component name prefixes with known quirks. Components not listed get
/// [`Quirks::ALL`].
///
/// Broadcom and Qualcomm components size their own buffers and take Q16
/// framerates.
const COMPONENT_QUIRKS: &[(&str, Quirks)] = &[
    ("OMX.st.", Quirks::ALL),
    ("OMX.broadcom.", Quirks::NONE),
    ("OMX.qcom.", Quirks::NONE),
];

impl Quirks {
    pub const NONE: Quirks = Quirks(0);
    pub const ALL: Quirks = Quirks(Quirk::OverrideBufferSize.bit() | Quirk::IntegerFramerate.bit());

    pub fn contains(self, quirk: Quirk) -> bool {
        self.0 & quirk.bit() != 0
    }

    pub fn with(self, quirk: Quirk) -> Self {
        Quirks(self.0 | quirk.bit())
    }

    pub fn iter(self) -> impl Iterator<Item = Quirk> {
        Quirk::ALL
            .into_iter()
            .filter(move |quirk| self.contains(*quirk))
    }

    /// Quirks of the component called `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use omx::{Quirk, Quirks};
    ///
    /// let quirks = Quirks::for_component("OMX.st.video_encoder.mpeg4");
    /// assert!(quirks.contains(Quirk::OverrideBufferSize));
    /// ```
    pub fn for_component(name: &str) -> Self {
        COMPONENT_QUIRKS
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix))
            .map(|(_, quirks)| *quirks)
            .unwrap_or(Quirks::ALL)
    }

    /// Encodes a `numerator / denominator` framerate for `xFramerate`.
    ///
    /// A zero or negative framerate encodes as 0.
    pub fn encode_framerate(self, numerator: i32, denominator: i32) -> u32 {
        if numerator <= 0 || denominator <= 0 {
            return 0;
        }
        let (numerator, denominator) = (numerator as u64, denominator as u64);
        let encoded = if self.contains(Quirk::IntegerFramerate) {
            numerator / denominator
        } else {
            (numerator << 16) / denominator
        };
        u32::try_from(encoded).unwrap_or(u32::MAX)
    }

    /// Applies the buffer size override to a video encoder whose input port
    /// is already configured. Does nothing without
    /// [`Quirk::OverrideBufferSize`].
    pub fn apply_to_video_encoder(
        self,
        component: &Component,
        input_port: u32,
        output_port: u32,
    ) -> Result<()> {
        if !self.contains(Quirk::OverrideBufferSize) {
            return Ok(());
        }

        let mut input = component.get_parameter::<PortDefinitionParam>(input_port)?;
        let (width, height) = (input.frame_width(), input.frame_height());
        if let Some(size) = input_buffer_size(input.color_format(), width, height) {
            input.set_buffer_size(size);
            component.set_parameter(&input)?;
        }

        component.update_parameter::<PortDefinitionParam>(output_port, |output| {
            output.set_buffer_size(output_buffer_size(width, height));
            output.set_frame_width(width);
            output.set_frame_height(height);
            output.set_framerate(input.framerate());
        })?;
        tracing::debug!(
            component = component.name(),
            width,
            height,
            "overrode video encoder buffer sizes"
        );
        Ok(())
    }
}

impl FromIterator<Quirk> for Quirks {
    fn from_iter<I: IntoIterator<Item = Quirk>>(iter: I) -> Self {
        iter.into_iter().fold(Quirks::NONE, Quirks::with)
    }
}

/// Input buffer size for raw video of `color` format, if the format has a
/// known size.
pub fn input_buffer_size(color: OMX_COLOR_FORMATTYPE, width: u32, height: u32) -> Option<u32> {
    let pixels = width.saturating_mul(height);
    match color {
        omx_sys::OMX_COLOR_FormatYCbYCr | omx_sys::OMX_COLOR_FormatCbYCrY => {
            Some(pixels.saturating_mul(2))
        }
        omx_sys::OMX_COLOR_FormatYUV420Planar => Some(pixels.saturating_mul(3) / 2),
        _ => None,
    }
}

/// Output buffer size of a video encoder for `width` x `height` frames.
pub fn output_buffer_size(width: u32, height: u32) -> u32 {
    width.saturating_mul(height) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_the_color_format() {
        assert_eq!(input_buffer_size(omx_sys::OMX_COLOR_FormatYCbYCr, 320, 240), Some(153600));
        assert_eq!(input_buffer_size(omx_sys::OMX_COLOR_FormatCbYCrY, 320, 240), Some(153600));
        assert_eq!(
            input_buffer_size(omx_sys::OMX_COLOR_FormatYUV420Planar, 320, 240),
            Some(115200)
        );
        assert_eq!(input_buffer_size(omx_sys::OMX_COLOR_FormatUnused, 320, 240), None);
        assert_eq!(output_buffer_size(320, 240), 38400);
    }

    #[test]
    fn framerate_encoding() {
        assert_eq!(Quirks::ALL.encode_framerate(30, 1), 30);
        assert_eq!(Quirks::ALL.encode_framerate(30000, 1001), 29);
        assert_eq!(Quirks::NONE.encode_framerate(30, 1), 30 << 16);
        assert_eq!(Quirks::NONE.encode_framerate(15, 2), 491520);
        assert_eq!(Quirks::ALL.encode_framerate(0, 1), 0);
        assert_eq!(Quirks::NONE.encode_framerate(25, 0), 0);
    }

    #[test]
    fn lookup_by_prefix() {
        assert_eq!(Quirks::for_component("OMX.st.video_encoder.avc"), Quirks::ALL);
        assert_eq!(Quirks::for_component("OMX.broadcom.video_encode"), Quirks::NONE);
        assert_eq!(Quirks::for_component("OMX.qcom.video.encoder.avc"), Quirks::NONE);
        assert_eq!(Quirks::for_component("OMX.vendor.unknown"), Quirks::ALL);
    }

    #[test]
    fn names_parse_back() {
        let quirks: Quirks = ["integer-framerate"]
            .into_iter()
            .map(str::parse::<Quirk>)
            .collect::<Result<_>>()
            .unwrap();
        assert!(quirks.contains(Quirk::IntegerFramerate));
        assert!(!quirks.contains(Quirk::OverrideBufferSize));
        assert!("no-such-quirk".parse::<Quirk>().is_err());
        assert_eq!(Quirks::ALL.iter().count(), 2);
    }
}
