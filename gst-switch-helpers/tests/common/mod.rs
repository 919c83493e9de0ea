// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for the helper tests.

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use gstswitch::{Error, Result};
use gstswitch_helpers::{MediaPipeline, PipelineLauncher};

/// Ensures logging is initialized only once across all tests.
static LOG_ONCE: std::sync::Once = std::sync::Once::new();

/// Initializes logging once (respects RUST_LOG environment variable).
pub fn setup_logging() {
    LOG_ONCE.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::builder()
                    .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .with_test_writer()
            .init();
    });
}

#[derive(Default)]
struct LaunchLog {
    descriptions: Vec<String>,
    /// (pipeline number, state requested)
    events: Vec<(usize, &'static str)>,
    refuse: bool,
}

/// Launcher that records descriptions and state changes instead of running
/// GStreamer.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    log: Rc<RefCell<LaunchLog>>,
}

impl RecordingLauncher {
    /// Makes every launch fail as an unparsable description would.
    pub fn refuse_launches(&self) {
        self.log.borrow_mut().refuse = true;
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.log.borrow().descriptions.clone()
    }

    pub fn events(&self) -> Vec<(usize, &'static str)> {
        self.log.borrow().events.clone()
    }
}

impl PipelineLauncher for RecordingLauncher {
    fn launch(&self, description: &str) -> Result<Box<dyn MediaPipeline>> {
        let mut log = self.log.borrow_mut();
        if log.refuse {
            return Err(Error::Pipeline(format!("no element in '{description}'")));
        }
        log.descriptions.push(description.to_owned());
        Ok(Box::new(RecordedPipeline {
            number: log.descriptions.len() - 1,
            playing: false,
            log: Rc::clone(&self.log),
        }))
    }
}

struct RecordedPipeline {
    number: usize,
    playing: bool,
    log: Rc<RefCell<LaunchLog>>,
}

impl RecordedPipeline {
    fn record(&mut self, event: &'static str, playing: bool) -> Result<()> {
        self.log.borrow_mut().events.push((self.number, event));
        self.playing = playing;
        Ok(())
    }
}

impl MediaPipeline for RecordedPipeline {
    fn play(&mut self) -> Result<()> {
        self.record("play", true)
    }

    fn pause(&mut self) -> Result<()> {
        self.record("pause", false)
    }

    fn disable(&mut self) -> Result<()> {
        self.record("disable", false)
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
