// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Test sources and preview sink, each one validated settings plus one
//! pipeline.

use gstswitch::{
    Result,
    validate::{self, MAX_PATTERN, MAX_WAVE, Value},
};
use rand::Rng;

use crate::pipeline::{
    MediaPipeline, PipelineLauncher, audio_description, preview_description, video_description,
};

pub const DEFAULT_WIDTH: u32 = 300;
pub const DEFAULT_HEIGHT: u32 = 200;
pub const DEFAULT_FREQUENCY: u32 = 110;

/// `Null` selects a random pattern.
fn pattern_or_random(pattern: Value) -> Result<u8> {
    match pattern {
        Value::Null => Ok(rand::thread_rng().gen_range(0..=MAX_PATTERN as u8)),
        other => validate::pattern(other),
    }
}

/// `Null` selects a random wave.
fn wave_or_random(wave: Value) -> Result<u8> {
    match wave {
        Value::Null => Ok(rand::thread_rng().gen_range(0..=MAX_WAVE as u8)),
        other => validate::wave(other),
    }
}

/// Parameters of a test video stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSettings {
    port: u16,
    width: u32,
    height: u32,
    pattern: u8,
    timeoverlay: bool,
    clockoverlay: bool,
}

impl VideoSettings {
    /// 300x200 video with a random pattern and no overlays, sent to `port`.
    pub fn new(port: impl Into<Value>) -> Result<Self> {
        Ok(Self {
            port: validate::port("Port", port)?,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            pattern: pattern_or_random(Value::Null)?,
            timeoverlay: false,
            clockoverlay: false,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_port(&mut self, port: impl Into<Value>) -> Result<()> {
        self.port = validate::port("Port", port)?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn set_width(&mut self, width: impl Into<Value>) -> Result<()> {
        self.width = validate::dimension("Width", width)?;
        Ok(())
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_height(&mut self, height: impl Into<Value>) -> Result<()> {
        self.height = validate::dimension("Height", height)?;
        Ok(())
    }

    pub fn pattern(&self) -> u8 {
        self.pattern
    }

    /// Sets the `videotestsrc` pattern; `Null` picks one at random.
    pub fn set_pattern(&mut self, pattern: impl Into<Value>) -> Result<()> {
        self.pattern = pattern_or_random(pattern.into())?;
        Ok(())
    }

    pub fn timeoverlay(&self) -> bool {
        self.timeoverlay
    }

    pub fn set_timeoverlay(&mut self, timeoverlay: bool) {
        self.timeoverlay = timeoverlay;
    }

    pub fn clockoverlay(&self) -> bool {
        self.clockoverlay
    }

    pub fn set_clockoverlay(&mut self, clockoverlay: bool) {
        self.clockoverlay = clockoverlay;
    }

    pub fn description(&self) -> String {
        video_description(
            self.port,
            self.width,
            self.height,
            self.pattern,
            self.timeoverlay,
            self.clockoverlay,
        )
    }
}

/// Parameters of a test audio stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSettings {
    port: u16,
    freq: u32,
    wave: u8,
}

impl AudioSettings {
    /// 110 Hz tone with a random wave, sent to `port`.
    pub fn new(port: impl Into<Value>) -> Result<Self> {
        Ok(Self {
            port: validate::port("Port", port)?,
            freq: DEFAULT_FREQUENCY,
            wave: wave_or_random(Value::Null)?,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_port(&mut self, port: impl Into<Value>) -> Result<()> {
        self.port = validate::port("Port", port)?;
        Ok(())
    }

    pub fn freq(&self) -> u32 {
        self.freq
    }

    pub fn set_freq(&mut self, freq: impl Into<Value>) -> Result<()> {
        self.freq = validate::frequency(freq)?;
        Ok(())
    }

    pub fn wave(&self) -> u8 {
        self.wave
    }

    /// Sets the `audiotestsrc` wave; `Null` picks one at random.
    pub fn set_wave(&mut self, wave: impl Into<Value>) -> Result<()> {
        self.wave = wave_or_random(wave.into())?;
        Ok(())
    }

    pub fn description(&self) -> String {
        audio_description(self.port, self.freq, self.wave)
    }
}

macro_rules! pipeline_controls {
    () => {
        /// Starts streaming.
        pub fn run(&mut self) -> Result<()> {
            self.pipeline.play()
        }

        pub fn pause(&mut self) -> Result<()> {
            self.pipeline.pause()
        }

        /// Stops streaming and releases the pipeline's resources.
        pub fn end(&mut self) -> Result<()> {
            self.pipeline.disable()
        }

        pub fn is_playing(&self) -> bool {
            self.pipeline.is_playing()
        }
    };
}

/// A test video source.
pub struct VideoSrc {
    settings: VideoSettings,
    pipeline: Box<dyn MediaPipeline>,
}

impl VideoSrc {
    /// Builds the pipeline for `settings`; it is not started.
    pub fn new(launcher: &impl PipelineLauncher, settings: VideoSettings) -> Result<Self> {
        let pipeline = launcher.launch(&settings.description())?;
        Ok(Self { settings, pipeline })
    }

    pub fn settings(&self) -> &VideoSettings {
        &self.settings
    }

    pub fn pattern(&self) -> u8 {
        self.settings.pattern
    }

    pipeline_controls!();
}

/// A test audio source.
pub struct AudioSrc {
    settings: AudioSettings,
    pipeline: Box<dyn MediaPipeline>,
}

impl AudioSrc {
    /// Builds the pipeline for `settings`; it is not started.
    pub fn new(launcher: &impl PipelineLauncher, settings: AudioSettings) -> Result<Self> {
        let pipeline = launcher.launch(&settings.description())?;
        Ok(Self { settings, pipeline })
    }

    pub fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    pub fn wave(&self) -> u8 {
        self.settings.wave
    }

    pipeline_controls!();
}

/// Window showing the feed of one preview port.
pub struct Preview {
    preview_port: u16,
    pipeline: Box<dyn MediaPipeline>,
}

impl Preview {
    pub fn new(launcher: &impl PipelineLauncher, preview_port: impl Into<Value>) -> Result<Self> {
        let preview_port = validate::port("Preview Port", preview_port)?;
        let pipeline = launcher.launch(&preview_description(preview_port))?;
        Ok(Self {
            preview_port,
            pipeline,
        })
    }

    pub fn preview_port(&self) -> u16 {
        self.preview_port
    }

    pipeline_controls!();
}

impl std::fmt::Debug for VideoSrc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoSrc")
            .field("settings", &self.settings)
            .field("playing", &self.is_playing())
            .finish()
    }
}

impl std::fmt::Debug for AudioSrc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSrc")
            .field("settings", &self.settings)
            .field("playing", &self.is_playing())
            .finish()
    }
}

impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preview")
            .field("preview_port", &self.preview_port)
            .field("playing", &self.is_playing())
            .finish()
    }
}
