#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal renderer
//!
//! Renders the Mandelbrot and Julia sets as explorable color images.
//! A point on the complex plane is repeatedly squared and offset, and
//! we measure how quickly that orbit runs off to infinity.  That
//! "velocity" -- the iteration count at escape -- is what gets
//! rendered: the counts for a rectangle of the plane are normalized
//! into palette range, pushed through a 256-entry color table whose
//! hue, saturation, and brightness channels are each shaped by an
//! easing curve, and converted to an RGB image.
//!
//! The pipeline runs in stages that mirror the modules here: `planes`
//! turns a center/zoom viewport (or a drag-selected zoom box) into a
//! view rectangle; `escape` computes the per-pixel divergence field
//! across a pool of worker threads; `normalize` rescales the field;
//! `palette` builds the color table; `compose` maps field through
//! table into the final image and hands it to the PNG encoder.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
extern crate num;
extern crate serde;
#[macro_use]
extern crate serde_derive;

#[cfg(test)]
extern crate serde_json;
#[cfg(test)]
extern crate tempfile;

pub mod compose;
pub mod easing;
pub mod errors;
pub mod escape;
pub mod normalize;
pub mod palette;
pub mod planes;

pub use compose::{apply, save, RenderedImage};
pub use easing::Easing;
pub use errors::Error;
pub use escape::{compute, compute_cancellable, compute_single, DivergenceField, Escape,
                 FractalKind, RenderParams};
pub use normalize::{Axis, Field};
pub use palette::{Palette, PaletteConfig, DEFAULT_CONFIG};
pub use planes::{ViewRect, Viewport};
