//! Animation timing scripts
//!
//! Battle sprite animations are described by small assembly-like scripts
//! (`anim.asm`, `anim_idle.asm`):
//!
//! ```text
//!     frame 1, 10
//!     setrepeat 2
//!     frame 0, 08
//!     frame 2, 08
//!     dorepeat 1
//!     endanim
//! ```
//!
//! `frame i, d` shows frame `i` for `d` ticks (16ms each). After a
//! `setrepeat n`, frame lines are collected into a buffer instead of being
//! emitted, and each `dorepeat` emits the whole buffer `n` times. The buffer
//! is never cleared, so a second `dorepeat` replays everything collected since
//! the first `setrepeat`, and the repeat count stays in effect until another
//! `setrepeat` changes it.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Milliseconds per script tick.
pub const TICK_MS: u32 = 16;

/// Hold time of the frame appended after the idle animation.
pub const FINAL_HOLD_MS: u32 = 800;

/// Script with the main animation, relative to a species directory.
pub const MAIN_SCRIPT: &str = "anim.asm";

/// Script with the idle animation, relative to a species directory.
pub const IDLE_SCRIPT: &str = "anim_idle.asm";

/// Error while reading or interpreting an animation script
#[derive(Debug, Error)]
pub enum AnimationError {
    /// Script file could not be read
    #[error("failed to read animation script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A directive is missing its numeric arguments
    #[error("line {line_no}: malformed '{directive}' directive: '{line}'")]
    InvalidDirective { line_no: usize, directive: &'static str, line: String },
    /// The script never reaches `endanim`
    #[error("script has no 'endanim' directive")]
    MissingEnd,
}

/// One step of an animation: which frame to show and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackEntry {
    /// Index into the sliced frame list
    pub frame: usize,
    /// Display time in milliseconds
    pub duration_ms: u32,
}

impl TrackEntry {
    /// Create a track entry.
    pub fn new(frame: usize, duration_ms: u32) -> Self {
        Self { frame, duration_ms }
    }
}

/// An ordered list of frame/duration pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationTrack {
    entries: Vec<TrackEntry>,
}

impl AnimationTrack {
    /// Create an empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry.
    pub fn push(&mut self, entry: TrackEntry) {
        self.entries.push(entry);
    }

    /// Append all entries of another track.
    pub fn extend(&mut self, other: AnimationTrack) {
        self.entries.extend(other.entries);
    }

    /// The entries in playback order.
    pub fn entries(&self) -> &[TrackEntry] {
        &self.entries
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &TrackEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the track has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest frame index the track refers to.
    pub fn max_frame(&self) -> Option<usize> {
        self.entries.iter().map(|e| e.frame).max()
    }

    /// Total playback time in milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.duration_ms)).sum()
    }
}

impl<'a> IntoIterator for &'a AnimationTrack {
    type Item = &'a TrackEntry;
    type IntoIter = std::slice::Iter<'a, TrackEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Script directive, recognised by the first token of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Frame { frame: usize, ticks: u32 },
    SetRepeat(u32),
    DoRepeat,
    EndAnim,
}

/// Split a line into tokens on whitespace and commas.
fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty())
}

fn parse_directive(line: &str, line_no: usize) -> Result<Option<Directive>, AnimationError> {
    let mut toks = tokens(line);
    let invalid = |directive: &'static str| AnimationError::InvalidDirective {
        line_no,
        directive,
        line: line.trim().to_string(),
    };

    let directive = match toks.next() {
        Some("frame") => {
            let frame = toks.next().and_then(|t| t.parse().ok()).ok_or_else(|| invalid("frame"))?;
            let ticks = toks.next().and_then(|t| t.parse().ok()).ok_or_else(|| invalid("frame"))?;
            Directive::Frame { frame, ticks }
        }
        Some("setrepeat") => {
            let count =
                toks.next().and_then(|t| t.parse().ok()).ok_or_else(|| invalid("setrepeat"))?;
            Directive::SetRepeat(count)
        }
        Some("dorepeat") => Directive::DoRepeat,
        Some("endanim") => Directive::EndAnim,
        _ => return Ok(None),
    };
    Ok(Some(directive))
}

/// Interpret the text of an animation script.
///
/// # Examples
///
/// ```
/// use dexsprite::animation::{parse_script, TrackEntry};
///
/// let track = parse_script("frame 0, 2\nsetrepeat 3\nframe 1, 1\ndorepeat\nendanim\n").unwrap();
/// assert_eq!(
///     track.entries(),
///     &[
///         TrackEntry::new(0, 32),
///         TrackEntry::new(1, 16),
///         TrackEntry::new(1, 16),
///         TrackEntry::new(1, 16),
///     ]
/// );
/// ```
///
/// # Errors
///
/// * `InvalidDirective` for a `frame` or `setrepeat` line without its numbers
/// * `MissingEnd` if the script ends before `endanim`
pub fn parse_script(text: &str) -> Result<AnimationTrack, AnimationError> {
    let mut track = AnimationTrack::new();
    let mut buffer: Vec<TrackEntry> = Vec::new();
    let mut repeat = 0u32;

    for (idx, line) in text.lines().enumerate() {
        let Some(directive) = parse_directive(line, idx + 1)? else {
            continue;
        };

        match directive {
            Directive::SetRepeat(count) => repeat = count,
            Directive::DoRepeat => {
                for _ in 0..repeat {
                    track.entries.extend_from_slice(&buffer);
                }
            }
            Directive::Frame { frame, ticks } => {
                let entry = TrackEntry::new(frame, ticks.saturating_mul(TICK_MS));
                if repeat != 0 {
                    buffer.push(entry);
                } else {
                    track.push(entry);
                }
            }
            Directive::EndAnim => return Ok(track),
        }
    }

    Err(AnimationError::MissingEnd)
}

/// Read and interpret an animation script file.
pub fn load_script(path: &Path) -> Result<AnimationTrack, AnimationError> {
    let text = fs::read_to_string(path)
        .map_err(|source| AnimationError::Io { path: path.to_path_buf(), source })?;
    parse_script(&text)
}

/// Build the full battle animation of a species.
///
/// Plays the main script, then the idle script, then holds frame 0 for
/// [`FINAL_HOLD_MS`]. The track is rebuilt from disk on every call.
pub fn species_track(species_dir: &Path) -> Result<AnimationTrack, AnimationError> {
    let mut track = load_script(&species_dir.join(MAIN_SCRIPT))?;
    track.extend(load_script(&species_dir.join(IDLE_SCRIPT))?);
    track.push(TrackEntry::new(0, FINAL_HOLD_MS));
    Ok(track)
}
