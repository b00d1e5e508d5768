//! Contains the ViewRect and Viewport types, which between them
//! describe the relationship between normalized screen space and a
//! rectangle on the complex plane.  The ViewRect is the rectangle
//! itself; the Viewport is its center/zoom parameterization, the form
//! in which pan and zoom gestures arrive from the surrounding
//! application.
use num::Complex;

use errors::Error;

/// Half the width of the complex-plane window at zoom 1.0.  Zooming
/// divides this extent; the visible rectangle at zoom `z` spans
/// `center ± 1.5/z` on both axes.
pub const BASE_HALF_EXTENT: f64 = 1.5;

/// A rectangle on the complex plane, treating the real axis as x and
/// the imaginary axis as y.  Invariant: `xmin < xmax` and
/// `ymin < ymax`; the constructor refuses anything else, including
/// NaN corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewRect {
    /// Left edge (least real component).
    pub xmin: f64,
    /// Right edge (greatest real component).
    pub xmax: f64,
    /// Bottom edge (least imaginary component).
    pub ymin: f64,
    /// Top edge (greatest imaginary component).
    pub ymax: f64,
}

impl ViewRect {
    /// Constructor.  Takes the two extents along each axis and checks
    /// that each pair is strictly ordered.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<ViewRect, Error> {
        if !(xmin < xmax) {
            return Err(Error::invalid_parameter(
                "view rectangle: xmin must be strictly less than xmax",
            ));
        }
        if !(ymin < ymax) {
            return Err(Error::invalid_parameter(
                "view rectangle: ymin must be strictly less than ymax",
            ));
        }
        Ok(ViewRect {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// Extent of the rectangle along the real axis.
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Extent of the rectangle along the imaginary axis.
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Given normalized screen coordinates `nx, ny` in `[0, 1]`, map
    /// them linearly into this rectangle.  The y axis is inverted:
    /// screen rows run top to bottom while the imaginary axis
    /// increases upward, so `ny = 0` lands on `ymax`.
    pub fn screen_to_complex(&self, nx: f64, ny: f64) -> Complex<f64> {
        Complex::new(
            self.xmin + nx * self.width(),
            self.ymax - ny * self.height(),
        )
    }

    /// Derives a new view center and a zoom multiplier from a
    /// drag-selected square: `nx, ny` is the square's center in
    /// normalized screen coordinates and `box_size` its side as a
    /// fraction of the view.  A zero-size box (a plain click) keeps
    /// the zoom multiplier at exactly 1.0 but still recenters on the
    /// click point.
    pub fn zoom_from_box(&self, nx: f64, ny: f64, box_size: f64) -> (Complex<f64>, f64) {
        let center = self.screen_to_complex(nx, ny);
        let factor = if box_size > 0.0 { 1.0 / box_size } else { 1.0 };
        (center, factor)
    }
}

/// The center/zoom parameterization of a view.  Invariant: `zoom` is
/// strictly positive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// The complex-plane point at the middle of the view.
    pub center: Complex<f64>,
    /// Magnification; 1.0 shows the base `±1.5` window.
    pub zoom: f64,
}

impl Viewport {
    /// Constructor.  Rejects zooms that are zero, negative, or NaN.
    pub fn new(center: Complex<f64>, zoom: f64) -> Result<Viewport, Error> {
        if !(zoom > 0.0) {
            return Err(Error::invalid_parameter("zoom must be strictly positive"));
        }
        Ok(Viewport { center, zoom })
    }

    /// The view rectangle this viewport describes: the base
    /// half-extent scaled by `1/zoom`, centered on `center`.
    pub fn rect(&self) -> ViewRect {
        let half = BASE_HALF_EXTENT / self.zoom;
        ViewRect {
            xmin: self.center.re - half,
            xmax: self.center.re + half,
            ymin: self.center.im - half,
            ymax: self.center.im + half,
        }
    }

    /// Applies a drag-selected square to this viewport, producing the
    /// viewport that the next render should use.
    pub fn zoomed_to_box(&self, nx: f64, ny: f64, box_size: f64) -> Viewport {
        let (center, factor) = self.rect().zoom_from_box(nx, ny, box_size);
        Viewport {
            center,
            zoom: self.zoom * factor,
        }
    }
}
