//! Reduced-color histogram construction.
//!
//! The first pipeline stage scans the pixel source once and buckets colors
//! into a reduced-precision RGB space, bounding the memory and running time
//! of the median cut that follows regardless of how large the image is.

use std::collections::BTreeMap;

use rgb::RGB;

use crate::error::PickError;
use crate::source::PixelSource;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Bits kept per channel when no explicit precision is requested.
pub const DEFAULT_REDUCTION_BITS: u8 = 5;

/// A color with each channel truncated to the histogram's bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReducedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ReducedColor {
    pub(crate) fn from_pixel(pixel: RGB<u8>, bits: u8) -> Self {
        let shift = 8 - bits;
        Self {
            r: pixel.r >> shift,
            g: pixel.g >> shift,
            b: pixel.b >> shift,
        }
    }

    /// Pack into a single key: r-major, then g, then b. Bucket iteration in
    /// key order is therefore lexicographic over (r, g, b).
    fn key(self, bits: u8) -> u32 {
        ((self.r as u32) << (2 * bits)) | ((self.g as u32) << bits) | self.b as u32
    }

    fn from_key(key: u32, bits: u8) -> Self {
        let mask = (1u32 << bits) - 1;
        Self {
            r: (key >> (2 * bits)) as u8,
            g: ((key >> bits) & mask) as u8,
            b: (key & mask) as u8,
        }
    }

    /// Channel coordinates as an array, indexable by split axis.
    pub(crate) fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Bucket counts over the reduced color space.
///
/// Built once per image and read-only during quantization. The sum of all
/// bucket counts equals the pixel count of the source.
#[derive(Debug, Clone)]
pub struct Histogram {
    buckets: BTreeMap<u32, u64>,
    bits: u8,
    total: u64,
}

impl Histogram {
    /// Scan `source` once and count pixels per reduced-color bucket.
    ///
    /// A zero-area source yields an empty histogram, not an error; the
    /// quantizer turns an empty histogram into an empty palette.
    pub fn build<S: PixelSource + ?Sized>(source: &S, bits: u8) -> Result<Self, PickError> {
        validate_bits(bits)?;

        let mut buckets = BTreeMap::new();
        for y in 0..source.height() {
            for x in 0..source.width() {
                let key = ReducedColor::from_pixel(source.pixel(x, y), bits).key(bits);
                *buckets.entry(key).or_insert(0u64) += 1;
            }
        }

        Ok(Self::from_buckets(buckets, bits))
    }

    /// Row-parallel variant of [`Histogram::build`].
    ///
    /// Each worker counts a band of rows into its own partial map and the
    /// partials are merged by element-wise addition, so the result is
    /// identical to the sequential build.
    #[cfg(feature = "parallel")]
    pub fn build_parallel<S>(source: &S, bits: u8) -> Result<Self, PickError>
    where
        S: PixelSource + Sync,
    {
        validate_bits(bits)?;

        let buckets = (0..source.height())
            .into_par_iter()
            .fold(BTreeMap::new, |mut buckets, y| {
                for x in 0..source.width() {
                    let key = ReducedColor::from_pixel(source.pixel(x, y), bits).key(bits);
                    *buckets.entry(key).or_insert(0u64) += 1;
                }
                buckets
            })
            .reduce(BTreeMap::new, |mut left, right| {
                for (key, count) in right {
                    *left.entry(key).or_insert(0) += count;
                }
                left
            });

        Ok(Self::from_buckets(buckets, bits))
    }

    fn from_buckets(buckets: BTreeMap<u32, u64>, bits: u8) -> Self {
        let total = buckets.values().sum();
        Self {
            buckets,
            bits,
            total,
        }
    }

    /// Bits kept per channel.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Total pixel count across all buckets.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct occupied buckets.
    pub fn distinct_colors(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Iterate occupied buckets in key order (r-major, then g, then b).
    pub fn iter(&self) -> impl Iterator<Item = (ReducedColor, u64)> + '_ {
        let bits = self.bits;
        self.buckets
            .iter()
            .map(move |(&key, &count)| (ReducedColor::from_key(key, bits), count))
    }
}

fn validate_bits(bits: u8) -> Result<(), PickError> {
    if !(1..=8).contains(&bits) {
        return Err(PickError::InvalidReductionBits(bits));
    }
    Ok(())
}
