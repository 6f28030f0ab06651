// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Lists the components of an OpenMAX IL core, or the port definitions of
//! one component.
//!
//! ```text
//! cargo run --example omx-info -- --library libomxil-bellagio.so.0
//! cargo run --example omx-info -- --component OMX.st.audio_decoder.adpcm
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tracing::level_filters::LevelFilter;
use omx::{BufferHeader, Event, EventHandler, OmxCore, PortDefinitionParam, Quirks};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Opts {
    /// Core library to load.
    #[arg(
        long,
        env = omx::config::CORE_LIBRARY_ENV,
        default_value_os_t = omx::config::default_core_library()
    )]
    library: PathBuf,

    /// Component to describe. Lists all components when omitted.
    #[arg(long)]
    component: Option<String>,

    /// Number of ports to query.
    #[arg(long, default_value_t = 2)]
    ports: u32,

    /// Log component events and wrapper calls.
    #[arg(short, long)]
    verbose: bool,
}

/// Component events go to stderr so the listing on stdout stays clean.
fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();
}

struct LogEvents;

impl EventHandler for LogEvents {
    fn event(&self, event: Event) {
        tracing::info!(?event, "component event");
    }

    fn empty_buffer_done(&self, _header: BufferHeader) {}

    fn fill_buffer_done(&self, _header: BufferHeader) {}
}

fn main() -> Result<(), omx::Error> {
    let opts = Opts::parse();
    setup_logging(opts.verbose);

    let core = OmxCore::open(&opts.library)?;
    let Some(name) = opts.component else {
        for name in core.component_names()? {
            println!("{name}");
        }
        return Ok(());
    };

    let component = core.get_component(&name, Arc::new(LogEvents))?;
    println!("{name}");
    let quirks: Vec<_> = Quirks::for_component(&name)
        .iter()
        .map(|quirk| quirk.name())
        .collect();
    println!("  quirks: {}", quirks.join(", "));

    for port in 0..opts.ports {
        let def = match component.get_parameter::<PortDefinitionParam>(port) {
            Ok(def) => def,
            Err(error) => {
                println!("  port {port}: {error}");
                continue;
            }
        };
        println!(
            "  port {port}: {:?} {:?}, {} x {} bytes (min {}), enabled: {}",
            def.direction(),
            def.domain(),
            def.buffer_count_actual(),
            def.buffer_size(),
            def.buffer_count_min(),
            def.is_enabled(),
        );
        if def.domain() == omx::Domain::Video {
            println!(
                "    {}x{} framerate {:#x} bitrate {} compression {} color {}",
                def.frame_width(),
                def.frame_height(),
                def.framerate(),
                def.bitrate(),
                def.compression_format(),
                def.color_format(),
            );
        }
    }
    Ok(())
}
