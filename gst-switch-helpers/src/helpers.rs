// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Managers for the sources and sinks attached to a running server.

use gstswitch::{
    Error, Result,
    config::DEFAULT_PREVIEW_PORT,
    validate::{self, Value},
};
use tracing::{debug, info};

use crate::{
    pipeline::{GstLauncher, PipelineLauncher},
    testsource::{AudioSettings, AudioSrc, Preview, VideoSettings, VideoSrc},
};

fn optional_port(field: &'static str, port: Value) -> Result<Option<u16>> {
    if port.is_blank() {
        Ok(None)
    } else {
        validate::port(field, port).map(Some)
    }
}

/// Test video and audio sources feeding a gst-switch server.
///
/// Sources are kept in start order; their position in that order is the
/// index used by [`TestSources::terminate_index_video`] and
/// [`TestSources::terminate_index_audio`].
pub struct TestSources<L: PipelineLauncher = GstLauncher> {
    video_port: Option<u16>,
    audio_port: Option<u16>,
    running_tests_video: Vec<VideoSrc>,
    running_tests_audio: Vec<AudioSrc>,
    launcher: L,
}

impl TestSources<GstLauncher> {
    /// Sources sending to the given server input ports. Either port may be
    /// left blank and set later.
    pub fn new(video_port: impl Into<Value>, audio_port: impl Into<Value>) -> Result<Self> {
        Self::with_launcher(GstLauncher::new()?, video_port, audio_port)
    }
}

impl<L: PipelineLauncher> TestSources<L> {
    pub fn with_launcher(
        launcher: L,
        video_port: impl Into<Value>,
        audio_port: impl Into<Value>,
    ) -> Result<Self> {
        Ok(Self {
            video_port: optional_port("Video Port", video_port.into())?,
            audio_port: optional_port("Audio Port", audio_port.into())?,
            running_tests_video: Vec::new(),
            running_tests_audio: Vec::new(),
            launcher,
        })
    }

    pub fn video_port(&self) -> Option<u16> {
        self.video_port
    }

    pub fn set_video_port(&mut self, video_port: impl Into<Value>) -> Result<()> {
        self.video_port = Some(validate::port("Video Port", video_port)?);
        Ok(())
    }

    pub fn audio_port(&self) -> Option<u16> {
        self.audio_port
    }

    pub fn set_audio_port(&mut self, audio_port: impl Into<Value>) -> Result<()> {
        self.audio_port = Some(validate::port("Audio Port", audio_port)?);
        Ok(())
    }

    /// Starts a test video source on the video port.
    ///
    /// `pattern` may be `Null` for a random `videotestsrc` pattern.
    ///
    /// # Errors
    ///
    /// Validation errors for any parameter (including an unset video port),
    /// or [`Error::Pipeline`] if the pipeline cannot be built or started.
    pub fn new_test_video(
        &mut self,
        width: impl Into<Value>,
        height: impl Into<Value>,
        pattern: impl Into<Value>,
        timeoverlay: bool,
        clockoverlay: bool,
    ) -> Result<()> {
        let mut settings = VideoSettings::new(self.video_port)?;
        settings.set_width(width)?;
        settings.set_height(height)?;
        settings.set_pattern(pattern)?;
        settings.set_timeoverlay(timeoverlay);
        settings.set_clockoverlay(clockoverlay);

        let mut source = VideoSrc::new(&self.launcher, settings)?;
        source.run()?;
        debug!(pattern = source.pattern(), "test video started");
        self.running_tests_video.push(source);
        Ok(())
    }

    /// Running video sources, in start order.
    pub fn get_test_video(&self) -> &[VideoSrc] {
        for (index, source) in self.running_tests_video.iter().enumerate() {
            info!("{index} pattern: {}", source.pattern());
        }
        &self.running_tests_video
    }

    /// Ends and removes the video source at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIndex`] if `index` is not an integer or no source has
    /// that index; the collection is then left untouched.
    pub fn terminate_index_video(&mut self, index: impl Into<Value>) -> Result<()> {
        let index = validate::index("video", index, self.running_tests_video.len())?;
        let mut source = self.running_tests_video.remove(index);
        info!("End source with pattern {}", source.pattern());
        source.end()
    }

    /// Ends every video source, always taking the first remaining one.
    pub fn terminate_video(&mut self) -> Result<()> {
        for _ in 0..self.running_tests_video.len() {
            self.terminate_index_video(0)?;
        }
        Ok(())
    }

    /// Starts a test audio source on the audio port.
    ///
    /// `wave` may be `Null` for a random `audiotestsrc` wave.
    pub fn new_test_audio(&mut self, freq: impl Into<Value>, wave: impl Into<Value>) -> Result<()> {
        let mut settings = AudioSettings::new(self.audio_port)?;
        settings.set_freq(freq)?;
        settings.set_wave(wave)?;

        let mut source = AudioSrc::new(&self.launcher, settings)?;
        source.run()?;
        debug!(wave = source.wave(), "test audio started");
        self.running_tests_audio.push(source);
        Ok(())
    }

    /// Running audio sources, in start order.
    pub fn get_test_audio(&self) -> &[AudioSrc] {
        for (index, source) in self.running_tests_audio.iter().enumerate() {
            info!("{index} wave: {}", source.wave());
        }
        &self.running_tests_audio
    }

    /// Ends and removes the audio source at `index`; see
    /// [`TestSources::terminate_index_video`].
    pub fn terminate_index_audio(&mut self, index: impl Into<Value>) -> Result<()> {
        let index = validate::index("audio", index, self.running_tests_audio.len())?;
        let mut source = self.running_tests_audio.remove(index);
        info!("End source with wave {}", source.wave());
        source.end()
    }

    /// Ends every audio source, always taking the first remaining one.
    pub fn terminate_audio(&mut self) -> Result<()> {
        for _ in 0..self.running_tests_audio.len() {
            self.terminate_index_audio(0)?;
        }
        Ok(())
    }
}

/// At most one preview window on a preview port.
pub struct PreviewSinks<L: PipelineLauncher = GstLauncher> {
    preview_port: u16,
    preview: Option<Preview>,
    launcher: L,
}

impl PreviewSinks<GstLauncher> {
    pub fn new(preview_port: impl Into<Value>) -> Result<Self> {
        Self::with_launcher(GstLauncher::new()?, preview_port)
    }
}

impl<L: PipelineLauncher> PreviewSinks<L> {
    pub fn with_launcher(launcher: L, preview_port: impl Into<Value>) -> Result<Self> {
        Ok(Self {
            preview_port: validate::port("Preview Port", preview_port)?,
            preview: None,
            launcher,
        })
    }

    /// A sink on [`DEFAULT_PREVIEW_PORT`].
    pub fn with_default_port(launcher: L) -> Result<Self> {
        Self::with_launcher(launcher, DEFAULT_PREVIEW_PORT)
    }

    pub fn preview_port(&self) -> u16 {
        self.preview_port
    }

    pub fn set_preview_port(&mut self, preview_port: impl Into<Value>) -> Result<()> {
        self.preview_port = validate::port("Preview Port", preview_port)?;
        Ok(())
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Starts a preview of the configured port, replacing any earlier one.
    pub fn run(&mut self) -> Result<()> {
        let mut preview = Preview::new(&self.launcher, self.preview_port)?;
        preview.run()?;
        if let Some(mut previous) = self.preview.replace(preview) {
            previous.end()?;
        }
        info!("start preview");
        Ok(())
    }

    /// Ends the running preview.
    ///
    /// # Errors
    ///
    /// [`Error::NotRunning`] if no preview was started.
    pub fn terminate(&mut self) -> Result<()> {
        let mut preview = self
            .preview
            .take()
            .ok_or_else(|| Error::NotRunning("No preview Sink to terminate".to_string()))?;
        preview.end()?;
        info!("end preview");
        Ok(())
    }
}
