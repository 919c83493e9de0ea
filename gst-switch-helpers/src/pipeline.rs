// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! GStreamer pipelines feeding and watching a gst-switch server.
//!
//! Every pipeline is written as a gst-launch description and built by a
//! [`PipelineLauncher`]. [`GstLauncher`] hands descriptions to
//! `gst::parse::launch`; tests substitute a launcher that only records them.
//!
//! | Pipeline | Description                                                                        |
//! |----------|------------------------------------------------------------------------------------|
//! | video    | `videotestsrc ! capsfilter ! [timeoverlay] ! [clockoverlay] ! gdppay ! tcpclientsink` |
//! | audio    | `audiotestsrc ! gdppay ! tcpclientsink`                                            |
//! | preview  | `tcpclientsrc ! gdpdepay ! autovideosink`                                          |

use gst::prelude::*;
use gstreamer as gst;
use gstswitch::{Error, Result};
use tracing::{debug, trace};

/// Host every pipeline connects to; the server always runs locally.
pub const HOST: &str = "127.0.0.1";

/// Font used by the time and clock overlays.
pub const OVERLAY_FONT: &str = "Verdana bold 50";

/// A running (or paused, or disabled) pipeline.
pub trait MediaPipeline {
    /// Sets the pipeline to PLAYING.
    fn play(&mut self) -> Result<()>;

    /// Sets the pipeline to PAUSED.
    fn pause(&mut self) -> Result<()>;

    /// Sets the pipeline to NULL, releasing its sockets.
    fn disable(&mut self) -> Result<()>;

    /// `true` between a successful [`MediaPipeline::play`] and the next
    /// pause or disable.
    fn is_playing(&self) -> bool;
}

/// Builds pipelines from gst-launch descriptions.
pub trait PipelineLauncher {
    fn launch(&self, description: &str) -> Result<Box<dyn MediaPipeline>>;
}

/// Launches real GStreamer pipelines.
#[derive(Debug, Clone, Copy)]
pub struct GstLauncher(());

impl GstLauncher {
    /// Initializes GStreamer (repeated calls are cheap).
    pub fn new() -> Result<Self> {
        gst::init().map_err(|e| Error::Pipeline(format!("Failed to initialize GStreamer: {e}")))?;
        Ok(Self(()))
    }
}

impl PipelineLauncher for GstLauncher {
    fn launch(&self, description: &str) -> Result<Box<dyn MediaPipeline>> {
        debug!("Launching pipeline: {description}");
        let element = gst::parse::launch(description)
            .map_err(|e| Error::Pipeline(format!("Failed to parse '{description}': {e}")))?;
        let pipeline = element
            .downcast::<gst::Pipeline>()
            .map_err(|_| Error::Pipeline(format!("'{description}' is not a pipeline")))?;
        Ok(Box::new(GstPipeline {
            pipeline,
            playing: false,
        }))
    }
}

/// A pipeline built by [`GstLauncher`]. Dropping it sets it to NULL.
struct GstPipeline {
    pipeline: gst::Pipeline,
    playing: bool,
}

impl GstPipeline {
    fn set_state(&self, state: gst::State) -> Result<()> {
        let success = self
            .pipeline
            .set_state(state)
            .map_err(|e| Error::Pipeline(format!("Failed to reach {state:?}: {e}")))?;
        trace!(?state, ?success, "pipeline state change");
        Ok(())
    }
}

impl MediaPipeline for GstPipeline {
    fn play(&mut self) -> Result<()> {
        self.set_state(gst::State::Playing)?;
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.playing = false;
        self.set_state(gst::State::Paused)
    }

    fn disable(&mut self) -> Result<()> {
        self.playing = false;
        self.set_state(gst::State::Null)
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Drop for GstPipeline {
    fn drop(&mut self) {
        let _ = self.pipeline.set_state(gst::State::Null);
    }
}

fn tcp_sink(port: u16) -> String {
    format!("gdppay ! tcpclientsink host={HOST} port={port}")
}

/// Test video sent to the server's video input port.
pub fn video_description(
    port: u16,
    width: u32,
    height: u32,
    pattern: u8,
    timeoverlay: bool,
    clockoverlay: bool,
) -> String {
    let mut stages = vec![
        format!("videotestsrc pattern={pattern}"),
        format!(
            "capsfilter caps=\"video/x-raw, format=(string)I420, width={width}, height={height}\""
        ),
    ];
    if timeoverlay {
        stages.push(format!("timeoverlay font-desc=\"{OVERLAY_FONT}\""));
    }
    if clockoverlay {
        stages.push(format!("clockoverlay font-desc=\"{OVERLAY_FONT}\""));
    }
    stages.push(tcp_sink(port));
    stages.join(" ! ")
}

/// Test tone sent to the server's audio input port.
pub fn audio_description(port: u16, freq: u32, wave: u8) -> String {
    format!("audiotestsrc freq={freq} wave={wave} ! {}", tcp_sink(port))
}

/// Displays the feed served on a preview (or compose) port.
pub fn preview_description(port: u16) -> String {
    format!("tcpclientsrc host={HOST} port={port} ! gdpdepay ! autovideosink")
}
