// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! # gst-switch helpers
//!
//! Test sources and preview sinks for exercising a running `gst-switch-srv`.
//!
//! [`TestSources`] streams synthetic video (`videotestsrc`) and audio
//! (`audiotestsrc`) to the server's input ports; [`PreviewSinks`] shows the
//! output of one preview port. Both only share port numbers with the server
//! and the [`gstswitch::Controller`].
//!
//! ```no_run
//! use gstswitch::validate::Value;
//! use gstswitch_helpers::{PreviewSinks, TestSources};
//!
//! # fn main() -> Result<(), gstswitch::Error> {
//! let mut sources = TestSources::new(3000, 4000)?;
//! sources.new_test_video(300, 200, Value::Null, false, true)?;
//! sources.new_test_audio(110, Value::Null)?;
//!
//! let mut preview = PreviewSinks::new(3001)?;
//! preview.run()?;
//!
//! preview.terminate()?;
//! sources.terminate_video()?;
//! sources.terminate_audio()?;
//! # Ok(())
//! # }
//! ```

mod helpers;
pub mod pipeline;
pub mod testsource;

pub use helpers::{PreviewSinks, TestSources};
pub use pipeline::{GstLauncher, MediaPipeline, PipelineLauncher};
pub use testsource::{AudioSettings, AudioSrc, Preview, VideoSettings, VideoSrc};
