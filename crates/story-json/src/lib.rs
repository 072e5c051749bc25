//! inkbridge story engine adapter for compiled ink JSON.
//!
//! Implements the [`integration::StoryEngine`] trait by checking the structure
//! of compiled stories and saved states: format versions, the top-level shape,
//! and the global variable declarations a state may refer to. It does not
//! execute stories.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** JSON decoding and version compatibility live here. The
//! [`integration`] crate sees only [`integration::StoryEngine`] and
//! [`integration::StoryArtifact`].
//!
//! ## Formats
//!
//! | Artifact | Version key | Supported |
//! |----------|-------------|-----------|
//! | Compiled story | `inkVersion` | [`INK_VERSION_MINIMUM_COMPATIBLE`]..=[`INK_VERSION_CURRENT`] |
//! | Saved state | `inkSaveVersion` | [`SAVE_VERSION_MINIMUM_COMPATIBLE`]..=[`SAVE_VERSION_CURRENT`] |

mod state;
mod story;

pub use story::{JsonStory, JsonStoryEngine};

/// Newest compiled-story format version understood by this engine.
pub const INK_VERSION_CURRENT: i64 = 21;

/// Oldest compiled-story format version still loadable.
pub const INK_VERSION_MINIMUM_COMPATIBLE: i64 = 18;

/// Save-state format version written by [`integration::StoryArtifact::save_state`].
pub const SAVE_VERSION_CURRENT: i64 = 10;

/// Oldest save-state format version still loadable.
pub const SAVE_VERSION_MINIMUM_COMPATIBLE: i64 = 8;
