use hueboard::{extract_palette, extract_palette_with, ExtractConfig, PickError, PixelView};

fn gradient_pixels(width: usize, height: usize) -> Vec<rgb::RGB<u8>> {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width) as u8;
            let g = (y * 255 / height) as u8;
            let b = ((x + y) * 128 / (width + height)) as u8;
            pixels.push(rgb::RGB { r, g, b });
        }
    }
    pixels
}

#[test]
fn smoke_test_gradient() {
    let width = 32;
    let height = 32;
    let pixels = gradient_pixels(width, height);
    let view = PixelView::new(&pixels, width, height).unwrap();

    let swatches = extract_palette(&view, 8).unwrap();

    assert!(!swatches.is_empty());
    assert!(swatches.len() <= 8);

    let covered: u64 = swatches.iter().map(|s| s.population).sum();
    assert_eq!(covered, (width * height) as u64);

    for pair in swatches.windows(2) {
        assert!(
            pair[0].population >= pair[1].population,
            "swatches must be ordered most populous first"
        );
    }
}

#[test]
fn single_swatch_covers_everything() {
    let pixels = gradient_pixels(16, 16);
    let view = PixelView::new(&pixels, 16, 16).unwrap();
    let swatches = extract_palette(&view, 1).unwrap();
    assert_eq!(swatches.len(), 1);
    assert_eq!(swatches[0].population, 256);
}

#[test]
fn fewer_distinct_colors_than_requested() {
    let mut pixels = vec![rgb::RGB { r: 0, g: 0, b: 0 }; 50];
    pixels.extend(vec![
        rgb::RGB {
            r: 255,
            g: 255,
            b: 255
        };
        14
    ]);
    let view = PixelView::new(&pixels, 64, 1).unwrap();
    let swatches = extract_palette(&view, 7).unwrap();
    assert_eq!(swatches.len(), 2);
    assert_eq!(swatches[0].population, 50);
    assert_eq!(swatches[1].population, 14);
}

#[test]
fn swatch_text_is_canonical_hex() {
    let pixels = gradient_pixels(16, 16);
    let view = PixelView::new(&pixels, 16, 16).unwrap();
    for swatch in extract_palette(&view, 5).unwrap() {
        let hex = swatch.hex();
        assert_eq!(hex.len(), 7);
        assert!(hex.starts_with('#'));
        assert!(hex[1..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hex, swatch.to_string());
    }
}

#[test]
fn invalid_inputs_are_rejected() {
    let view = PixelView::new(&[], 0, 0).unwrap();
    assert!(matches!(
        extract_palette(&view, 7),
        Err(PickError::ZeroDimension)
    ));

    let pixels = vec![rgb::RGB { r: 1, g: 2, b: 3 }; 4];
    let view = PixelView::new(&pixels, 2, 2).unwrap();
    assert!(matches!(
        extract_palette(&view, 0),
        Err(PickError::InvalidColorCount(0))
    ));

    let config = ExtractConfig::new().reduction_bits(11);
    assert!(matches!(
        extract_palette_with(&view, &config),
        Err(PickError::InvalidReductionBits(11))
    ));
}

#[test]
fn buffer_length_must_match_dimensions() {
    let pixels = vec![rgb::RGB { r: 0, g: 0, b: 0 }; 5];
    assert!(matches!(
        PixelView::new(&pixels, 2, 2),
        Err(PickError::DimensionMismatch {
            len: 5,
            width: 2,
            height: 2
        })
    ));
}
