//! Median cut subdivision of the reduced color space.
//!
//! The quantizer repeatedly splits the occupied color space into boxes
//! until the requested box count is reached, always cutting the current
//! highest-priority box at the population median of its longest axis. The
//! whole procedure is integer arithmetic over histogram buckets, so two
//! runs over the same histogram produce identical boxes in identical order.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use rgb::RGB;

use crate::histogram::Histogram;

/// Cooperative cancellation flag for a quantization run.
///
/// Set from any thread via [`CancelToken::cancel`]; the split loop checks
/// it before each iteration and returns the boxes produced so far. Relaxed
/// ordering is enough: the flag is a latch, not a synchronization edge.
#[derive(Debug, Default)]
pub struct CancelToken {
    flag: AtomicBool,
}

impl CancelToken {
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Ask the current run to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// An axis-aligned box over the reduced color space.
///
/// Ranges are closed `[min, max]` intervals per channel, always shrunk to
/// the occupied bounding range, so a box with zero width on every axis
/// holds exactly one occupied bucket and cannot be split further.
#[derive(Debug, Clone)]
pub struct ColorBox {
    min: [u8; 3],
    max: [u8; 3],
    population: u64,
}

impl ColorBox {
    /// Box over the occupied part of `[lo, hi]`, or `None` when no bucket
    /// falls inside. Population and ranges are recomputed from the histogram.
    fn over_range(hist: &Histogram, lo: [u8; 3], hi: [u8; 3]) -> Option<Self> {
        let mut min = [u8::MAX; 3];
        let mut max = [0u8; 3];
        let mut population = 0u64;

        for (color, count) in hist.iter() {
            let channels = color.channels();
            if (0..3).all(|i| lo[i] <= channels[i] && channels[i] <= hi[i]) {
                for i in 0..3 {
                    min[i] = min[i].min(channels[i]);
                    max[i] = max[i].max(channels[i]);
                }
                population += count;
            }
        }

        (population > 0).then_some(Self {
            min,
            max,
            population,
        })
    }

    /// Pixels whose reduced color falls inside this box.
    pub fn population(&self) -> u64 {
        self.population
    }

    /// Product of the interval widths, each at least 1.
    pub fn volume(&self) -> u64 {
        (0..3)
            .map(|i| (self.max[i] - self.min[i]) as u64 + 1)
            .product()
    }

    /// Closed `(min, max)` interval per channel, in reduced coordinates.
    pub fn ranges(&self) -> [(u8, u8); 3] {
        [
            (self.min[0], self.max[0]),
            (self.min[1], self.max[1]),
            (self.min[2], self.max[2]),
        ]
    }

    /// Split priority: populous boxes spanning a large color range first.
    fn priority(&self) -> u128 {
        self.population as u128 * self.volume() as u128
    }

    /// Range tuple used as the final determinism tie-break.
    fn range_key(&self) -> [u8; 6] {
        [
            self.min[0], self.max[0], self.min[1], self.max[1], self.min[2], self.max[2],
        ]
    }

    fn contains(&self, channels: [u8; 3]) -> bool {
        (0..3).all(|i| self.min[i] <= channels[i] && channels[i] <= self.max[i])
    }

    fn width(&self, axis: usize) -> u8 {
        self.max[axis] - self.min[axis]
    }

    /// Longest axis by interval width; ties prefer R, then G, then B.
    fn longest_axis(&self) -> usize {
        let mut axis = 0;
        for candidate in 1..3 {
            if self.width(candidate) > self.width(axis) {
                axis = candidate;
            }
        }
        axis
    }

    fn splittable(&self) -> bool {
        self.min != self.max
    }

    /// Population-weighted average of the reduced colors inside the box,
    /// expanded back to 8-bit channels and rounded to nearest.
    pub fn mean_color(&self, hist: &Histogram) -> RGB<u8> {
        let mut sums = [0u64; 3];
        let mut population = 0u64;
        for (color, count) in hist.iter() {
            let channels = color.channels();
            if self.contains(channels) {
                for i in 0..3 {
                    sums[i] += channels[i] as u64 * count;
                }
                population += count;
            }
        }
        debug_assert_eq!(population, self.population);
        if population == 0 {
            return RGB { r: 0, g: 0, b: 0 };
        }

        let shift = 8 - hist.bits();
        let mut channels = [0u8; 3];
        for i in 0..3 {
            let expanded = sums[i] << shift;
            channels[i] = ((2 * expanded + population) / (2 * population)) as u8;
        }
        RGB {
            r: channels[0],
            g: channels[1],
            b: channels[2],
        }
    }
}

/// Split the occupied color space into at most `target` boxes.
///
/// Returns fewer boxes when the histogram holds fewer distinct colors than
/// requested, and an empty list for an empty histogram. Box populations
/// always sum to the histogram total.
pub fn quantize(hist: &Histogram, target: usize) -> Vec<ColorBox> {
    quantize_with(hist, target, None)
}

/// Like [`quantize`], checking `cancel` before each split. A cancelled run
/// returns the boxes produced so far, which still partition the occupied
/// color space.
pub fn quantize_with(
    hist: &Histogram,
    target: usize,
    cancel: Option<&CancelToken>,
) -> Vec<ColorBox> {
    if target == 0 {
        return Vec::new();
    }
    let full = ((1u32 << hist.bits()) - 1) as u8;
    let Some(initial) = ColorBox::over_range(hist, [0; 3], [full; 3]) else {
        return Vec::new();
    };

    let mut boxes = vec![initial];
    while boxes.len() < target {
        if cancel.is_some_and(|token| token.is_cancelled()) {
            break;
        }
        let Some(index) = split_candidate(&boxes) else {
            break; // every remaining box holds a single bucket
        };
        let chosen = boxes.remove(index);
        let Some((lower, upper)) = split(&chosen, hist) else {
            boxes.push(chosen);
            break;
        };
        boxes.push(lower);
        boxes.push(upper);
    }
    boxes
}

/// Highest-priority splittable box, fully deterministic: priority, then
/// population, then the lexicographically smallest range tuple.
fn split_candidate(boxes: &[ColorBox]) -> Option<usize> {
    boxes
        .iter()
        .enumerate()
        .filter(|(_, b)| b.splittable())
        .max_by_key(|(_, b)| (b.priority(), b.population, Reverse(b.range_key())))
        .map(|(index, _)| index)
}

/// Cut `chosen` at the population median of its longest axis.
///
/// The cut lands on the smallest coordinate whose cumulative population
/// reaches half the box total, moved one occupied coordinate down when that
/// would leave the upper child empty. Children are partitioned at the cut
/// and recounted from the histogram.
fn split(chosen: &ColorBox, hist: &Histogram) -> Option<(ColorBox, ColorBox)> {
    let axis = chosen.longest_axis();

    let mut marginal: BTreeMap<u8, u64> = BTreeMap::new();
    for (color, count) in hist.iter() {
        let channels = color.channels();
        if chosen.contains(channels) {
            *marginal.entry(channels[axis]).or_insert(0) += count;
        }
    }
    let coords: Vec<(u8, u64)> = marginal.into_iter().collect();
    if coords.len() < 2 {
        return None; // zero spread on the longest axis
    }

    let total = chosen.population;
    let mut cut_index = coords.len() - 2;
    let mut accumulated = 0u64;
    for (i, &(_, count)) in coords.iter().enumerate() {
        accumulated += count;
        if accumulated * 2 >= total {
            cut_index = i;
            break;
        }
    }
    // keep the upper child occupied
    cut_index = cut_index.min(coords.len() - 2);
    let cut = coords[cut_index].0;

    let mut lower_hi = chosen.max;
    lower_hi[axis] = cut;
    let mut upper_lo = chosen.min;
    upper_lo[axis] = cut + 1;

    let lower = ColorBox::over_range(hist, chosen.min, lower_hi)?;
    let upper = ColorBox::over_range(hist, upper_lo, chosen.max)?;
    Some((lower, upper))
}
