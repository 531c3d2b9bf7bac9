//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//

//! Setup-time error surface. In-band per-frame failures (out-of-memory widgets,
//! clipped-out layout, numeric parse failures) stay silent as the core engine
//! specifies; only failures a host can reasonably check before the frame loop
//! starts are reported here.

/// Errors returned from constructors/builders that validate their configuration
/// before the frame loop begins.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A [`crate::vertex::VertexLayout`] declared a color attribute without a
    /// supported color format, or omitted a byte range the converter requires.
    #[error("vertex layout is missing a required attribute: {0}")]
    VertexLayoutMissingAttribute(&'static str),

    /// Two attributes in a [`crate::vertex::VertexLayout`] claim overlapping byte ranges.
    #[error("vertex layout attributes overlap at byte offset {0}")]
    VertexLayoutOverlap(u32),

    /// [`crate::atlas::builder::Builder::from_config`] was called with no default font path set.
    #[error("atlas bake requested with no font configs added")]
    AtlasEmptyConfig,

    /// A font config declared an empty codepoint range list.
    #[error("font config '{0}' has no codepoint ranges")]
    AtlasEmptyRanges(String),

    /// The requested atlas dimensions cannot hold the packed glyphs.
    #[error("atlas of size {width}x{height} cannot fit the requested glyphs")]
    AtlasTooSmall {
        /// Attempted atlas width.
        width: i32,
        /// Attempted atlas height.
        height: i32,
    },

    /// An icon, font, or slot asset could not be read from disk.
    #[error("failed to load atlas asset: {0}")]
    AtlasAssetIo(String),

    /// A style stack push was attempted while the stack was at capacity.
    #[error("style stack overflow: at capacity ({0})")]
    StyleStackOverflow(usize),

    /// A style stack pop was attempted on an empty stack.
    #[error("style stack underflow: pop called with no matching push")]
    StyleStackUnderflow,
}

/// Convenience alias for fallible setup-time operations.
pub type Result<T> = core::result::Result<T, Error>;
