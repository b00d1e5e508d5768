// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time engine.  Takes a view rectangle and fractal
//! parameters and measures, for every grid point, how quickly the
//! orbit of `z = z*z + c` leaves the disk of radius 2 -- the
//! "velocity" that the rest of the pipeline turns into color.  For
//! the Mandelbrot set the grid point is the constant `c` and the
//! orbit starts at zero; for a Julia set the grid point is the
//! starting `z` and `c` is fixed for the whole image.
//!
//! Points whose orbit never leaves the disk within the iteration
//! limit are reported as bounded, which is not the same thing as
//! escaping on the very first test: the two carry different colors
//! and the field keeps them distinct.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use itertools::iproduct;
use num::Complex;

use errors::Error;
use normalize::Field;
use planes::ViewRect;

/// Escape test: squared magnitude strictly above this ends the orbit.
/// One threshold for both fractal kinds.
const ESCAPE_MAGNITUDE_SQR: f64 = 4.0;

/// How many rows a worker renders between looks at the cancel flag.
const CANCEL_CHECK_INTERVAL_ROWS: usize = 16;

/// Which escape-time fractal to compute.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FractalKind {
    /// The grid point is `c`; the orbit starts at zero.
    Mandelbrot,
    /// The grid point is the starting `z`; `c` is the carried
    /// constant.
    Julia(Complex<f64>),
}

/// Everything the engine needs besides the view rectangle: the
/// fractal kind, the grid resolution, and the iteration limit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderParams {
    /// Which fractal to compute.
    pub kind: FractalKind,
    /// Grid columns.  Must be positive.
    pub width: usize,
    /// Grid rows.  Must be positive.
    pub height: usize,
    /// Maximum orbit length.  Must be positive.
    pub limit: usize,
}

/// The record of one escaping grid point: the iteration index at
/// which the escape test first fired (`0` means the very first test)
/// and the orbit's magnitude at that step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Escape {
    /// Iteration index at escape, in `[0, limit - 1]`.
    pub count: u32,
    /// `|z|` at the escaping step; always at least 2.
    pub magnitude: f64,
}

/// The per-pixel divergence record for a whole grid, row-major with
/// row 0 at the top of the image (greatest imaginary part).  `None`
/// cells are bounded: their orbit survived the full iteration limit.
#[derive(Clone, Debug, PartialEq)]
pub struct DivergenceField {
    width: usize,
    height: usize,
    cells: Vec<Option<Escape>>,
}

impl DivergenceField {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw row-major cells.
    pub fn cells(&self) -> &[Option<Escape>] {
        &self.cells
    }

    /// The cell at a column/row pair.
    pub fn get(&self, column: usize, row: usize) -> Option<Escape> {
        self.cells[row * self.width + column]
    }

    /// Flattens the field into the numeric grid the normalizer and
    /// compositor consume: escaped cells contribute their iteration
    /// count, bounded cells contribute zero (the interior color
    /// convention).  Callers wanting a different interior policy can
    /// walk `cells()` themselves.
    pub fn count_field(&self) -> Field {
        let values = self
            .cells
            .iter()
            .map(|cell| match *cell {
                Some(escape) => f64::from(escape.count),
                None => 0.0,
            })
            .collect();
        Field::new(self.width, self.height, values)
    }
}

/// Runs one orbit to the limit.  This is the only place the escape
/// test lives; every entry point funnels through it.
fn iterate(kind: &FractalKind, point: Complex<f64>, limit: usize) -> Option<Escape> {
    let (mut z, c) = match *kind {
        FractalKind::Mandelbrot => (Complex::new(0.0, 0.0), point),
        FractalKind::Julia(c) => (point, c),
    };
    for i in 0..limit {
        z = z * z + c;
        if z.norm_sqr() > ESCAPE_MAGNITUDE_SQR {
            return Some(Escape {
                count: i as u32,
                magnitude: z.norm(),
            });
        }
    }
    None
}

/// Linear interpolation over an endpoint-inclusive grid axis: index 0
/// sits exactly on `from`, index `steps - 1` exactly on `to`.
fn grid_step(from: f64, to: f64, steps: usize, index: usize) -> f64 {
    if steps < 2 {
        from
    } else {
        from + (to - from) * (index as f64) / ((steps - 1) as f64)
    }
}

fn validate(params: &RenderParams) -> Result<(), Error> {
    if params.width == 0 || params.height == 0 {
        return Err(Error::invalid_parameter(
            "grid dimensions must be positive",
        ));
    }
    if params.limit == 0 {
        return Err(Error::invalid_parameter(
            "iteration limit must be positive",
        ));
    }
    Ok(())
}

/// Fills one row of cells.  `row` is the global row index; row 0
/// carries the top of the view rectangle.
fn render_row(cells: &mut [Option<Escape>], row: usize, view: &ViewRect, params: &RenderParams) {
    let y = grid_step(view.ymax, view.ymin, params.height, row);
    for (column, cell) in cells.iter_mut().enumerate() {
        let x = grid_step(view.xmin, view.xmax, params.width, column);
        *cell = iterate(&params.kind, Complex::new(x, y), params.limit);
    }
}

/// Sequential reference implementation.  The threaded entry points
/// must agree with this bit for bit; the tests hold them to it.
pub fn compute_single(view: &ViewRect, params: &RenderParams) -> Result<DivergenceField, Error> {
    validate(params)?;
    let mut cells = vec![None; params.width * params.height];
    for (row, column) in iproduct!(0..params.height, 0..params.width) {
        let y = grid_step(view.ymax, view.ymin, params.height, row);
        let x = grid_step(view.xmin, view.xmax, params.width, column);
        cells[row * params.width + column] = iterate(&params.kind, Complex::new(x, y), params.limit);
    }
    Ok(DivergenceField {
        width: params.width,
        height: params.height,
        cells,
    })
}

/// Computes the divergence field across a pool of scoped worker
/// threads.  The output vector is allocated up front and split into
/// contiguous row bands, one worker per band; workers share nothing
/// mutable, so the field is identical whatever the thread count.
/// Blocks until the whole field is done.
pub fn compute(
    view: &ViewRect,
    params: &RenderParams,
    threads: usize,
) -> Result<DivergenceField, Error> {
    validate(params)?;
    let mut cells = vec![None; params.width * params.height];
    let band_rows = band_rows(params.height, threads);
    crossbeam::scope(|spawner| {
        for (band, chunk) in cells.chunks_mut(band_rows * params.width).enumerate() {
            spawner.spawn(move |_| {
                for (offset, row_cells) in chunk.chunks_mut(params.width).enumerate() {
                    render_row(row_cells, band * band_rows + offset, view, params);
                }
            });
        }
    })
    .unwrap();
    Ok(DivergenceField {
        width: params.width,
        height: params.height,
        cells,
    })
}

/// Like `compute`, but polls `cancel` between row batches and gives
/// up when it is raised.  A cancelled render returns `Ok(None)`;
/// partially filled fields never escape this function.  Cancellation
/// is cooperative and best-effort: workers notice the flag at the
/// next check, not instantly.
pub fn compute_cancellable(
    view: &ViewRect,
    params: &RenderParams,
    threads: usize,
    cancel: &Arc<AtomicBool>,
) -> Result<Option<DivergenceField>, Error> {
    validate(params)?;
    if cancel.load(Ordering::Relaxed) {
        return Ok(None);
    }
    let mut cells = vec![None; params.width * params.height];
    let band_rows = band_rows(params.height, threads);
    let cancelled = AtomicBool::new(false);
    crossbeam::scope(|spawner| {
        for (band, chunk) in cells.chunks_mut(band_rows * params.width).enumerate() {
            let cancel = cancel.clone();
            let cancelled = &cancelled;
            spawner.spawn(move |_| {
                for (offset, row_cells) in chunk.chunks_mut(params.width).enumerate() {
                    if offset % CANCEL_CHECK_INTERVAL_ROWS == 0 {
                        if cancel.load(Ordering::Relaxed) {
                            cancelled.store(true, Ordering::Relaxed);
                        }
                        if cancelled.load(Ordering::Relaxed) {
                            return;
                        }
                    }
                    render_row(row_cells, band * band_rows + offset, view, params);
                }
            });
        }
    })
    .unwrap();
    if cancelled.load(Ordering::Relaxed) {
        Ok(None)
    } else {
        Ok(Some(DivergenceField {
            width: params.width,
            height: params.height,
            cells,
        }))
    }
}

/// Rows per worker band: the height split as evenly as it divides,
/// never fewer than one row or more workers than rows.
fn band_rows(height: usize, threads: usize) -> usize {
    let threads = threads.max(1).min(height);
    (height + threads - 1) / threads
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_view() -> ViewRect {
        ViewRect::new(-2.0, 2.0, -2.0, 2.0).unwrap()
    }

    fn mandelbrot(width: usize, height: usize, limit: usize) -> RenderParams {
        RenderParams {
            kind: FractalKind::Mandelbrot,
            width,
            height,
            limit,
        }
    }

    #[test]
    fn rejects_zero_dimensions_and_limit() {
        let view = square_view();
        assert!(compute(&view, &mandelbrot(0, 10, 10), 1).is_err());
        assert!(compute(&view, &mandelbrot(10, 0, 10), 1).is_err());
        assert!(compute(&view, &mandelbrot(10, 10, 0), 1).is_err());
    }

    #[test]
    fn counts_stay_within_the_limit() {
        let field = compute(&square_view(), &mandelbrot(40, 40, 30), 4).unwrap();
        for cell in field.cells() {
            if let Some(escape) = *cell {
                assert!(escape.count < 30);
                assert!(escape.magnitude >= 2.0);
            }
        }
    }

    #[test]
    fn the_origin_is_bounded() {
        // 100x100 over (-2,2): columns 49/50 straddle zero; the point
        // nearest the origin is deep inside the main cardioid.
        let field = compute(&square_view(), &mandelbrot(100, 100, 50), 4).unwrap();
        assert_eq!(field.get(50, 50), None);
        assert_eq!(field.get(49, 49), None);
    }

    #[test]
    fn the_far_corner_escapes_on_the_first_test() {
        let field = compute(&square_view(), &mandelbrot(100, 100, 50), 4).unwrap();
        // Column 0, bottom row sits exactly on (-2, -2); |z1|^2 = 8.
        let escape = field.get(0, 99).unwrap();
        assert_eq!(escape.count, 0);
        assert!((escape.magnitude - 8.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn julia_uses_the_grid_point_as_the_orbit_start() {
        let params = RenderParams {
            kind: FractalKind::Julia(Complex::new(0.0, 0.0)),
            width: 3,
            height: 1,
            limit: 20,
        };
        let view = ViewRect::new(0.1, 3.0, -0.1, 0.1).unwrap();
        let field = compute(&view, &params, 1).unwrap();
        // z = 0.1 under z^2 shrinks toward zero; z = 3.0 is out after
        // the first squaring.
        assert_eq!(field.get(0, 0), None);
        assert_eq!(field.get(2, 0).unwrap().count, 0);
    }

    #[test]
    fn thread_count_does_not_change_the_field() {
        let view = square_view();
        let params = RenderParams {
            kind: FractalKind::Julia(Complex::new(-0.3, -0.63)),
            width: 64,
            height: 48,
            limit: 40,
        };
        let reference = compute_single(&view, &params).unwrap();
        for threads in &[1, 2, 3, 7, 64] {
            let threaded = compute(&view, &params, *threads).unwrap();
            assert_eq!(threaded, reference);
        }
    }

    #[test]
    fn more_threads_than_rows_is_fine() {
        let field = compute(&square_view(), &mandelbrot(8, 2, 10), 16).unwrap();
        assert_eq!(field.cells().len(), 16);
    }

    #[test]
    fn a_raised_flag_cancels_the_render() {
        let cancel = Arc::new(AtomicBool::new(true));
        let result =
            compute_cancellable(&square_view(), &mandelbrot(32, 32, 50), 2, &cancel).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn an_unraised_flag_changes_nothing() {
        let cancel = Arc::new(AtomicBool::new(false));
        let params = mandelbrot(32, 32, 50);
        let cancellable = compute_cancellable(&square_view(), &params, 2, &cancel)
            .unwrap()
            .unwrap();
        let plain = compute(&square_view(), &params, 2).unwrap();
        assert_eq!(cancellable, plain);
    }

    #[test]
    fn count_field_maps_bounded_cells_to_zero() {
        let field = compute(&square_view(), &mandelbrot(100, 100, 50), 2).unwrap();
        let counts = field.count_field();
        assert_eq!(counts.get(50, 50), 0.0);
        let corner = field.get(0, 99).unwrap();
        assert_eq!(counts.get(0, 99), f64::from(corner.count));
    }
}
