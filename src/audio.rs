//! Fire-and-forget sound. Callers log and drop any error these return.

use std::collections::HashMap;
use std::io::{stdout, Write};

use anyhow::{Context, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Clip {
    /// Looping background track.
    Background,
    Eat,
    GameOver,
}

pub trait AudioSink {
    /// Restarts `clip` from the beginning.
    fn play(&mut self, clip: Clip) -> Result<()>;

    fn stop(&mut self, clip: Clip) -> Result<()>;

    /// `level` is in `0.0..=1.0`.
    fn set_volume(&mut self, clip: Clip, level: f32) -> Result<()>;
}

/// Muted output.
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _: Clip) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self, _: Clip) -> Result<()> {
        Ok(())
    }

    fn set_volume(&mut self, _: Clip, _: f32) -> Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell for one-shot clips played at a non-zero volume.
/// A terminal has no way to loop a track, so the background clip is only
/// tracked.
#[derive(Debug, Default)]
pub struct TerminalBell {
    volumes: HashMap<Clip, f32>,
    background_playing: bool,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background_playing(&self) -> bool {
        self.background_playing && self.volume(Clip::Background) > 0.0
    }

    fn volume(&self, clip: Clip) -> f32 {
        self.volumes.get(&clip).copied().unwrap_or(1.0)
    }
}

impl AudioSink for TerminalBell {
    fn play(&mut self, clip: Clip) -> Result<()> {
        if clip == Clip::Background {
            self.background_playing = true;
            return Ok(());
        }
        if self.volume(clip) <= 0.0 {
            return Ok(());
        }

        let mut out = stdout();
        out.write_all(b"\x07").context("ringing terminal bell")?;
        out.flush().context("ringing terminal bell")
    }

    fn stop(&mut self, clip: Clip) -> Result<()> {
        if clip == Clip::Background {
            self.background_playing = false;
        }
        Ok(())
    }

    fn set_volume(&mut self, clip: Clip, level: f32) -> Result<()> {
        self.volumes.insert(clip, level.clamp(0.0, 1.0));
        Ok(())
    }
}
