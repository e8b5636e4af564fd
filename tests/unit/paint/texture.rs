use super::*;

fn pixels(t: &mut TexturePaint, rect: TileRect) -> Vec<Argb32> {
    let r = t.raster(rect).unwrap();
    (0..rect.h).flat_map(|y| r.row(y).to_vec()).collect()
}

#[test]
fn repeats_in_both_directions() {
    let mut t = TexturePaint::new(vec![1, 2, 3, 4], 2, 2).unwrap();
    assert_eq!(
        pixels(&mut t, TileRect::new(1, 1, 3, 2)),
        vec![4, 3, 4, 2, 1, 2]
    );
}

#[test]
fn origin_shifts_the_pattern() {
    let mut t = TexturePaint::new(vec![1, 2, 3, 4], 2, 2)
        .unwrap()
        .with_origin(1, -1);
    // device (0, 0) maps to texel (-1, 1) which wraps to (1, 1)
    assert_eq!(pixels(&mut t, TileRect::new(0, 0, 2, 1)), vec![4, 3]);
}

#[test]
fn invalid_dimensions_are_rejected() {
    assert!(TexturePaint::new(vec![], 0, 2).is_err());
    assert!(TexturePaint::new(vec![1, 2, 3], 2, 2).is_err());
}
