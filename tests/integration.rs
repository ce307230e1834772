use hueboard::{
    color_under_cursor, extract_palette, extract_palette_cancellable, extract_palette_with,
    CancelToken, ExtractConfig, PixelView, ViewportState,
};

fn noisy_pixels(count: usize) -> Vec<rgb::RGB<u8>> {
    // Pseudo-random noise via Knuth's multiplicative hash
    (0..count)
        .map(|i| {
            let h = (i as u32).wrapping_mul(2654435761) as u8;
            rgb::RGB {
                r: h,
                g: h.wrapping_add(50),
                b: h.wrapping_add(100),
            }
        })
        .collect()
}

#[test]
fn extraction_is_deterministic() {
    let pixels = noisy_pixels(64 * 64);
    let view = PixelView::new(&pixels, 64, 64).unwrap();
    let first = extract_palette(&view, 7).unwrap();
    let second = extract_palette(&view, 7).unwrap();
    assert_eq!(first, second);
}

#[test]
fn solid_color_image_yields_exactly_that_color() {
    // Channels on the 5-bit lattice survive the default reduction exactly
    let color = rgb::RGB {
        r: 64,
        g: 128,
        b: 208,
    };
    let pixels = vec![color; 24 * 24];
    let view = PixelView::new(&pixels, 24, 24).unwrap();

    for count in [1u32, 2, 7, 32] {
        let swatches = extract_palette(&view, count).unwrap();
        assert_eq!(swatches.len(), 1, "count {count}");
        assert_eq!(swatches[0].color, color);
        assert_eq!(swatches[0].population, 24 * 24);
    }
}

#[test]
fn solid_color_is_exact_at_full_precision() {
    let color = rgb::RGB {
        r: 10,
        g: 201,
        b: 33,
    };
    let pixels = vec![color; 9];
    let view = PixelView::new(&pixels, 3, 3).unwrap();
    let config = ExtractConfig::new().color_count(5).reduction_bits(8);
    let swatches = extract_palette_with(&view, &config).unwrap();
    assert_eq!(swatches.len(), 1);
    assert_eq!(swatches[0].color, color);
}

#[test]
fn populations_always_sum_to_pixel_count() {
    let pixels = noisy_pixels(48 * 48);
    let view = PixelView::new(&pixels, 48, 48).unwrap();
    for count in [1u32, 2, 3, 7, 16, 64] {
        let swatches = extract_palette(&view, count).unwrap();
        let covered: u64 = swatches.iter().map(|s| s.population).sum();
        assert_eq!(covered, 48 * 48, "count {count}");
    }
}

#[test]
fn reaches_requested_count_with_enough_distinct_colors() {
    // 16 well-separated colors, one bucket each under 5-bit reduction
    let mut pixels = Vec::new();
    for i in 0..16usize {
        let v = (i * 16) as u8;
        pixels.extend(vec![rgb::RGB { r: v, g: v, b: v }; i + 1]);
    }
    let width = pixels.len();
    let view = PixelView::new(&pixels, width, 1).unwrap();
    let swatches = extract_palette(&view, 16).unwrap();
    assert_eq!(swatches.len(), 16);
}

#[test]
fn cancelled_extraction_returns_coarse_palette() {
    let pixels = noisy_pixels(32 * 32);
    let view = PixelView::new(&pixels, 32, 32).unwrap();
    let config = ExtractConfig::new().color_count(8);

    let token = CancelToken::new();
    token.cancel();
    let swatches = extract_palette_cancellable(&view, &config, &token).unwrap();

    // cancelled before the first split: one box spanning every pixel
    assert_eq!(swatches.len(), 1);
    assert_eq!(swatches[0].population, 32 * 32);

    let fresh = CancelToken::new();
    let full = extract_palette_cancellable(&view, &config, &fresh).unwrap();
    assert_eq!(full, extract_palette(&view, 8).unwrap());
}

#[test]
fn cursor_pick_matches_source_pixel() {
    let pixels = noisy_pixels(20 * 20);
    let view = PixelView::new(&pixels, 20, 20).unwrap();
    let state = ViewportState::fit(20, 20, 300, 200).unwrap();
    let scale = state.effective_scale();

    for (x, y) in [(0usize, 0usize), (7, 3), (19, 19)] {
        let picked = color_under_cursor(&view, &state, (x as f64 + 0.5) * scale, (y as f64 + 0.5) * scale)
            .expect("pointer inside image");
        assert_eq!((picked.x, picked.y), (x, y));
        assert_eq!(picked.color, pixels[y * 20 + x]);
    }

    let (dw, dh) = state.display_size(20, 20);
    assert!(color_under_cursor(&view, &state, dw as f64 + 5.0, dh as f64 + 5.0).is_none());
}

#[cfg(feature = "parallel")]
#[test]
fn staged_parallel_pipeline_matches_entry_point() {
    use hueboard::{assemble, quantize, Histogram};

    let pixels = noisy_pixels(64 * 64);
    let view = PixelView::new(&pixels, 64, 64).unwrap();

    let hist = Histogram::build_parallel(&view, 5).unwrap();
    let staged = assemble(&quantize(&hist, 7), &hist);

    assert_eq!(staged, extract_palette(&view, 7).unwrap());
}
