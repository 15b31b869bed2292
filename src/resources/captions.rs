//! Caption resources and cue parsing.
//!
//! Caption files are plain text made of blank-line separated blocks. Each
//! block has a timing line followed by one or more text lines:
//!
//! ```text
//! WEBVTT
//!
//! 1
//! 00:00:00.000 --> 00:00:02.500
//! Welcome to the aquarium.
//!
//! 00:00:02.500 --> 00:00:05.000 align:middle
//! Mind the glass.
//! ```
//!
//! Headers, `NOTE` blocks and cue identifiers are ignored. Blocks with an
//! unreadable timing line are skipped with a warning.

use bevy_ecs::prelude::Resource;
use log::warn;
use rustc_hash::FxHashMap;
use std::path::PathBuf;

/// A timed subtitle segment, active on `[start, end)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub start: f32,
    pub end: f32,
    pub text: String,
}

impl Cue {
    pub fn new(start: f32, end: f32, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Parse `HH:MM:SS.mmm` (or `MM:SS.mmm`) into seconds.
pub fn parse_timestamp(stamp: &str) -> Option<f32> {
    let parts: Vec<&str> = stamp.trim().split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?, *s),
        [m, s] => (0, m.parse::<u32>().ok()?, *s),
        _ => return None,
    };
    let seconds: f32 = seconds.replace(',', ".").parse().ok()?;
    if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return None;
    }
    Some(hours as f32 * 3600.0 + minutes as f32 * 60.0 + seconds)
}

fn parse_timing(line: &str) -> Option<(f32, f32)> {
    let (start, rest) = line.split_once("-->")?;
    // Cue settings may follow the end stamp.
    let end = rest.split_whitespace().next()?;
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    (end >= start).then_some((start, end))
}

fn parse_block(lines: &[&str], cues: &mut Vec<Cue>) {
    let Some(timing_at) = lines.iter().position(|l| l.contains("-->")) else {
        return;
    };
    let Some((start, end)) = parse_timing(lines[timing_at]) else {
        warn!("skipping caption block with bad timing: '{}'", lines[timing_at]);
        return;
    };
    let body = lines[timing_at + 1..].join("\n");
    if !body.is_empty() {
        cues.push(Cue::new(start, end, body));
    }
}

/// Parse caption text into cues, in file order.
///
/// Blocks end at any line that is blank after trimming. A timing line
/// directly after a cue's text also starts a new block.
pub fn parse_captions(text: &str) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            parse_block(&block, &mut cues);
            block.clear();
            continue;
        }
        let has_text_after_timing = block
            .iter()
            .position(|l| l.contains("-->"))
            .is_some_and(|at| at + 1 < block.len());
        if line.contains("-->") && has_text_after_timing {
            parse_block(&block, &mut cues);
            block.clear();
        }
        block.push(line);
    }
    parse_block(&block, &mut cues);
    cues
}

/// Where caption text comes from.
pub trait CaptionSource: Send + Sync {
    fn fetch(&self, path: &str) -> Result<String, String>;
}

/// Reads caption files below a root directory.
#[derive(Debug, Clone)]
pub struct FsCaptions {
    pub root: PathBuf,
}

impl FsCaptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CaptionSource for FsCaptions {
    fn fetch(&self, path: &str) -> Result<String, String> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full)
            .map_err(|e| format!("Failed to read captions {:?}: {}", full, e))
    }
}

/// In-memory caption texts keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryCaptions {
    texts: FxHashMap<String, String>,
}

impl MemoryCaptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(path.into(), text.into());
        self
    }
}

impl CaptionSource for MemoryCaptions {
    fn fetch(&self, path: &str) -> Result<String, String> {
        self.texts
            .get(path)
            .cloned()
            .ok_or_else(|| format!("no captions named '{}'", path))
    }
}

/// Injected caption source with a parse cache.
#[derive(Resource)]
pub struct CaptionLibrary {
    source: Box<dyn CaptionSource>,
    cache: FxHashMap<String, Vec<Cue>>,
}

impl CaptionLibrary {
    pub fn new(source: impl CaptionSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: FxHashMap::default(),
        }
    }

    /// Fetch and parse `path`, caching the result.
    pub fn cues(&mut self, path: &str) -> Result<Vec<Cue>, String> {
        if let Some(cues) = self.cache.get(path) {
            return Ok(cues.clone());
        }
        let text = self.source.fetch(path)?;
        let cues = parse_captions(&text);
        self.cache.insert(path.to_string(), cues.clone());
        Ok(cues)
    }
}
