use super::*;

fn pixels(g: &mut LinearGradient, rect: TileRect) -> Vec<Argb32> {
    let r = g.raster(rect).unwrap();
    (0..rect.h).flat_map(|y| r.row(y).to_vec()).collect()
}

#[test]
fn samples_at_pixel_centers() {
    let mut g = LinearGradient::new(
        Point::new(0.0, 0.0),
        Point::new(2.0, 0.0),
        0xFF00_0000,
        0xFFFF_FFFF,
    )
    .unwrap();
    assert_eq!(
        pixels(&mut g, TileRect::new(0, 0, 2, 1)),
        vec![argb(0xFF, 64, 64, 64), argb(0xFF, 191, 191, 191)]
    );
}

#[test]
fn pads_beyond_end_points() {
    let mut g = LinearGradient::new(
        Point::new(4.0, 0.0),
        Point::new(8.0, 0.0),
        0xFFFF_0000,
        0x0000_00FF,
    )
    .unwrap();
    let px = pixels(&mut g, TileRect::new(0, 3, 12, 1));
    assert!(px[..4].iter().all(|&p| p == 0xFFFF_0000));
    assert!(px[8..].iter().all(|&p| p == 0x0000_00FF));
    // alpha falls across the ramp
    assert!(px[4..8].windows(2).all(|w| (w[0] >> 24) > (w[1] >> 24)));
}

#[test]
fn vertical_gradient_is_constant_along_rows() {
    let mut g = LinearGradient::new(
        Point::new(0.0, 0.0),
        Point::new(0.0, 10.0),
        0xFF00_0000,
        0xFF00_FF00,
    )
    .unwrap();
    let rect = TileRect::new(3, 2, 4, 3);
    let r = g.raster(rect).unwrap();
    assert_eq!(r.layout(), PixelLayout::IntArgb);
    for y in 0..rect.h {
        let row = r.row(y);
        assert!(row.iter().all(|&p| p == row[0]));
    }
}

#[test]
fn coincident_points_are_rejected() {
    let p = Point::new(1.0, 1.0);
    assert!(matches!(
        LinearGradient::new(p, p, 0, 0),
        Err(GammaError::Validation(_))
    ));
}
