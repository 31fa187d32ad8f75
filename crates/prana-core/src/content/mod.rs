//! The verse pool shown at app and session start.
//!
//! A small fixed set of contemplative lines, each paired with a recording
//! shipped alongside the app. Selection is random and independent of any
//! session state.

use rand::seq::SliceRandom;
use serde::Serialize;

/// One entry of the verse pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verse {
    pub text: &'static str,
    pub audio: &'static str,
}

pub const VERSES: [Verse; 6] = [
    Verse {
        text: "Breathe in peace, breathe out worry.",
        audio: "audio/verse-01.ogg",
    },
    Verse {
        text: "Be still, and know the quiet within.",
        audio: "audio/verse-02.ogg",
    },
    Verse {
        text: "Each breath is a small new beginning.",
        audio: "audio/verse-03.ogg",
    },
    Verse {
        text: "Slow is smooth, and smooth is calm.",
        audio: "audio/verse-04.ogg",
    },
    Verse {
        text: "Let the exhale carry what you no longer need.",
        audio: "audio/verse-05.ogg",
    },
    Verse {
        text: "Rest in this breath; the next will come on its own.",
        audio: "audio/verse-06.ogg",
    },
];

/// A random verse from the pool.
pub fn pick() -> Verse {
    VERSES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(VERSES[0])
}

/// Deterministic access, wrapping around the pool.
pub fn by_index(index: usize) -> Verse {
    VERSES[index % VERSES.len()]
}
