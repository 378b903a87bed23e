//! Connected regions of a classified map, built from horizontal runs.

use field_vision_core::{ClassifiedMap, ColorClass};

/// Horizontal span of matching pixels on one row (`x0..=x1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    pub y: usize,
    pub x0: usize,
    pub x1: usize,
}

impl Run {
    #[inline]
    pub fn width(&self) -> usize {
        self.x1 - self.x0 + 1
    }

    /// Runs on adjacent rows touch, diagonals included.
    #[inline]
    fn touches(&self, other: &Run) -> bool {
        self.x0 <= other.x1 + 1 && other.x0 <= self.x1 + 1
    }

    /// Part of this run inside the columns `x0..=x1`.
    pub fn clip(&self, x0: usize, x1: usize) -> Option<Run> {
        let a = self.x0.max(x0);
        let b = self.x1.min(x1);
        (a <= b).then_some(Run {
            y: self.y,
            x0: a,
            x1: b,
        })
    }
}

/// One connected region: its runs in scan order plus an inclusive bounding box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub runs: Vec<Run>,
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub area: usize,
}

impl Blob {
    fn from_runs(runs: Vec<Run>) -> Option<Self> {
        let first = *runs.first()?;
        let mut blob = Blob {
            runs: Vec::new(),
            left: first.x0,
            top: first.y,
            right: first.x1,
            bottom: first.y,
            area: 0,
        };
        for r in &runs {
            blob.left = blob.left.min(r.x0);
            blob.right = blob.right.max(r.x1);
            blob.top = blob.top.min(r.y);
            blob.bottom = blob.bottom.max(r.y);
            blob.area += r.width();
        }
        blob.runs = runs;
        Some(blob)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    /// Fraction of the bounding box covered by the region.
    pub fn density(&self) -> f32 {
        self.area as f32 / (self.width() * self.height()) as f32
    }

    /// Pixel count per column, indexed from `left`.
    pub fn column_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.width()];
        for r in &self.runs {
            for c in &mut counts[r.x0 - self.left..=r.x1 - self.left] {
                *c += 1;
            }
        }
        counts
    }

    /// Pixel count per row, indexed from `top`.
    pub fn row_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.height()];
        for r in &self.runs {
            counts[r.y - self.top] += r.width();
        }
        counts
    }
}

/// Union-find over run indices.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Keeps the smaller index as root so labels follow scan order.
    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

fn row_runs(
    row: &[ColorClass],
    y: usize,
    accept: &impl Fn(ColorClass) -> bool,
    out: &mut Vec<Run>,
) {
    let mut start = None;
    for (x, &c) in row.iter().enumerate() {
        match (accept(c), start) {
            (true, None) => start = Some(x),
            (false, Some(x0)) => {
                out.push(Run { y, x0, x1: x - 1 });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(x0) = start {
        out.push(Run {
            y,
            x0,
            x1: row.len() - 1,
        });
    }
}

/// All connected regions whose pixels satisfy `accept`, ordered by their
/// first run in raster order.
pub fn find_blobs(map: &ClassifiedMap, accept: impl Fn(ColorClass) -> bool) -> Vec<Blob> {
    let mut runs = Vec::new();
    let mut row_start = Vec::with_capacity(map.height + 1);
    for y in 0..map.height {
        row_start.push(runs.len());
        row_runs(map.row(y), y, &accept, &mut runs);
    }
    row_start.push(runs.len());
    if runs.is_empty() {
        return Vec::new();
    }

    let mut sets = DisjointSet::new(runs.len());
    for y in 1..map.height {
        let prev = row_start[y - 1]..row_start[y];
        let cur = row_start[y]..row_start[y + 1];
        let mut j = prev.start;
        for i in cur {
            // Both rows are sorted by x; skip previous runs that end too far left.
            while j < prev.end && runs[j].x1 + 1 < runs[i].x0 {
                j += 1;
            }
            let mut k = j;
            while k < prev.end && runs[k].x0 <= runs[i].x1 + 1 {
                if runs[k].touches(&runs[i]) {
                    sets.union(k, i);
                }
                k += 1;
            }
        }
    }

    let mut slot_of_root: Vec<Option<usize>> = vec![None; runs.len()];
    let mut groups: Vec<Vec<Run>> = Vec::new();
    for (i, run) in runs.iter().enumerate() {
        let root = sets.find(i);
        let slot = *slot_of_root[root].get_or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(*run);
    }
    groups.into_iter().filter_map(Blob::from_runs).collect()
}
