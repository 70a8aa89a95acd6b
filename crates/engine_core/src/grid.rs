//! Owned dense grid containers.
//!
//! Heightfields and splat-weight fields are dense 2D/3D arrays. Owned
//! containers with bounds-checked accessors keep the indexing in one place
//! instead of scattered `y * width + x` arithmetic.

/// Dense row-major 2D grid. Indexed as `(x, y)` with `x` the fastest axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Grid2D<T> {
    /// Create a grid filled with `fill`.
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the value at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Set the value at `(x, y)`. Out-of-bounds writes are ignored and
    /// return `false` rather than panicking.
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
            true
        } else {
            false
        }
    }

    /// Overwrite every cell in `[min_x, max_x) × [min_y, max_y)` with
    /// `value`. Ranges are clamped to the grid; cells outside are untouched.
    pub fn fill_region(&mut self, min_x: usize, max_x: usize, min_y: usize, max_y: usize, value: T) {
        let max_x = max_x.min(self.width);
        let max_y = max_y.min(self.height);
        for y in min_y..max_y {
            for x in min_x..max_x {
                self.data[y * self.width + x] = value;
            }
        }
    }

    /// Flat row-major view, for handing the field to the surface consumer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

/// Dense 3D grid for per-cell layer weights, indexed `(x, y, layer)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid3D {
    width: usize,
    height: usize,
    layers: usize,
    data: Vec<f32>,
}

impl Grid3D {
    pub fn new(width: usize, height: usize, layers: usize) -> Self {
        Self {
            width,
            height,
            layers,
            data: vec![0.0; width * height * layers],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn get(&self, x: usize, y: usize, layer: usize) -> Option<f32> {
        if x < self.width && y < self.height && layer < self.layers {
            Some(self.data[(y * self.width + x) * self.layers + layer])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, layer: usize, value: f32) -> bool {
        if x < self.width && y < self.height && layer < self.layers {
            self.data[(y * self.width + x) * self.layers + layer] = value;
            true
        } else {
            false
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
