//! Vertex welding.
//!
//! A [`VertexWelder`] owns the vertex array of one mesh while it is being
//! refined. [`VertexWelder::weld`] returns the index of an existing vertex
//! equal to the query point, or appends the point and returns the new index.
//! Lookups go through a hash index instead of scanning the array, so welding
//! `V` points costs `O(V)` overall rather than `O(V²)`.
//!
//! Two equality modes are supported:
//!
//! - **Exact** (`tolerance == 0.0`): points are keyed by the bit patterns of
//!   their coordinates, with `-0.0` folded onto `0.0`.
//! - **Tolerant** (`tolerance > 0.0`): points are bucketed into a uniform grid
//!   of cell size `tolerance`. A query checks its own cell and the 26
//!   neighbouring cells and returns the lowest index within `tolerance`.
//!   On an axis where the coordinate is too large for the grid to resolve
//!   (`|v / tolerance| >= 2^53`), distinct values are already more than
//!   `tolerance` apart, so that axis is keyed by its exact bits instead.
//!
//! # Example
//!
//! ```
//! use sliver::algo::weld::VertexWelder;
//! use nalgebra::Point3;
//!
//! let mut welder = VertexWelder::new(0.0);
//! let a = welder.weld(Point3::new(0.5, 0.0, 0.0));
//! let b = welder.weld(Point3::new(0.5, 0.0, 0.0));
//! assert_eq!(a, b);
//! assert_eq!(welder.len(), 1);
//! ```

use nalgebra::{distance, Point3};
use rustc_hash::FxHashMap;

/// Largest cell index magnitude kept on the grid (2^53).
const MAX_CELL: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Axis {
    Cell(i64),
    Exact(u64),
}

impl Axis {
    fn of(v: f64, cell_size: f64) -> Self {
        let q = (v / cell_size).floor();
        if q.abs() < MAX_CELL {
            Axis::Cell(q as i64)
        } else {
            Axis::Exact(v.to_bits())
        }
    }

    /// This axis key and its grid neighbours.
    fn span(self) -> impl Iterator<Item = Axis> {
        let n = match self {
            Axis::Cell(_) => 3,
            Axis::Exact(_) => 1,
        };
        (0..n).map(move |k| match self {
            Axis::Cell(c) => Axis::Cell(c + k - 1),
            exact => exact,
        })
    }
}

type CellKey = (Axis, Axis, Axis);

#[derive(Debug, Clone)]
enum WeldIndex {
    Exact(FxHashMap<[u64; 3], usize>),
    Grid {
        tolerance: f64,
        cells: FxHashMap<CellKey, Vec<usize>>,
    },
}

/// Deduplicating vertex store scoped to one mesh-subdivision call.
#[derive(Debug, Clone)]
pub struct VertexWelder {
    vertices: Vec<Point3<f64>>,
    index: WeldIndex,
}

#[inline]
fn exact_key(p: &Point3<f64>) -> [u64; 3] {
    // +0.0 and -0.0 compare equal but differ in their bits.
    let bits = |v: f64| if v == 0.0 { 0 } else { v.to_bits() };
    [bits(p.x), bits(p.y), bits(p.z)]
}

#[inline]
fn cell_of(p: &Point3<f64>, cell_size: f64) -> CellKey {
    (
        Axis::of(p.x, cell_size),
        Axis::of(p.y, cell_size),
        Axis::of(p.z, cell_size),
    )
}

impl VertexWelder {
    /// Create an empty welder. A `tolerance` of zero (or any non-positive
    /// value) selects exact equality.
    pub fn new(tolerance: f64) -> Self {
        let index = if tolerance > 0.0 {
            WeldIndex::Grid {
                tolerance,
                cells: FxHashMap::default(),
            }
        } else {
            WeldIndex::Exact(FxHashMap::default())
        };
        Self {
            vertices: Vec::new(),
            index,
        }
    }

    /// Create a welder seeded with existing vertices.
    ///
    /// Seed vertices keep their positions in the array, even if some of them
    /// coincide, so face indices into the source array stay valid. Later
    /// welds resolve to the first matching seed.
    pub fn from_vertices(vertices: Vec<Point3<f64>>, tolerance: f64) -> Self {
        let mut welder = Self::new(tolerance);
        welder.vertices.reserve(vertices.len());
        for p in vertices {
            let i = welder.vertices.len();
            welder.vertices.push(p);
            welder.index_insert(i);
        }
        welder
    }

    fn index_insert(&mut self, i: usize) {
        let p = self.vertices[i];
        match &mut self.index {
            WeldIndex::Exact(map) => {
                map.entry(exact_key(&p)).or_insert(i);
            }
            WeldIndex::Grid { tolerance, cells } => {
                let cell = cell_of(&p, *tolerance);
                cells.entry(cell).or_default().push(i);
            }
        }
    }

    /// Index of a stored vertex equal to `point`, if any.
    pub fn find(&self, point: &Point3<f64>) -> Option<usize> {
        match &self.index {
            WeldIndex::Exact(map) => map.get(&exact_key(point)).copied(),
            WeldIndex::Grid { tolerance, cells } => {
                let (cx, cy, cz) = cell_of(point, *tolerance);
                let mut best: Option<usize> = None;
                for x in cx.span() {
                    for y in cy.span() {
                        for z in cz.span() {
                            let Some(bucket) = cells.get(&(x, y, z)) else {
                                continue;
                            };
                            for &i in bucket {
                                if distance(&self.vertices[i], point) <= *tolerance
                                    && best.map_or(true, |b| i < b)
                                {
                                    best = Some(i);
                                }
                            }
                        }
                    }
                }
                best
            }
        }
    }

    /// Return the index of `point`, appending it if it is new.
    pub fn weld(&mut self, point: Point3<f64>) -> usize {
        if let Some(i) = self.find(&point) {
            return i;
        }
        let i = self.vertices.len();
        self.vertices.push(point);
        self.index_insert(i);
        i
    }

    /// Number of stored vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether no vertices are stored.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The stored vertices.
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Consume the welder, returning the vertex array.
    pub fn into_vertices(self) -> Vec<Point3<f64>> {
        self.vertices
    }
}
