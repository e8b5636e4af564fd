use super::*;

const ALL: [PixelLayout; 5] = [
    PixelLayout::IntArgb,
    PixelLayout::IntArgbPre,
    PixelLayout::IntRgb,
    PixelLayout::FourByteAbgr,
    PixelLayout::FourByteAbgrPre,
];

#[test]
fn opaque_pixels_roundtrip_in_every_layout() {
    for layout in ALL {
        let mut s = Surface::new(3, 2, layout).unwrap();
        s.set_pixel(2, 1, 0xFF12_3456);
        assert_eq!(s.pixel(2, 1), 0xFF12_3456, "{layout:?}");
    }
}

#[test]
fn int_rgb_drops_alpha() {
    let mut s = Surface::new(1, 1, PixelLayout::IntRgb).unwrap();
    s.set_pixel(0, 0, 0x0012_3456);
    assert_eq!(s.pixel(0, 0), 0xFF12_3456);
}

#[test]
fn premultiplied_layouts_store_premultiplied() {
    let mut s = Surface::new(1, 1, PixelLayout::IntArgbPre).unwrap();
    s.set_pixel(0, 0, 0x80FF_0000);
    let Storage::Int(words) = &s.storage else {
        panic!("int storage expected");
    };
    assert_eq!(words[0], 0x8080_0000);
    assert_eq!(s.pixel(0, 0), 0x80FF_0000);
}

#[test]
fn byte_layout_is_abgr() {
    let mut s = Surface::new(1, 1, PixelLayout::FourByteAbgr).unwrap();
    s.set_pixel(0, 0, 0x4411_2233);
    let Storage::Byte(bytes) = &s.storage else {
        panic!("byte storage expected");
    };
    assert_eq!(bytes.as_slice(), &[0x44, 0x33, 0x22, 0x11]);
}

#[test]
fn only_int_argb_is_directly_writable() {
    for layout in ALL {
        let mut s = Surface::new(4, 4, layout).unwrap();
        let direct = s.writable_tile(TileRect::new(1, 1, 2, 2)).is_some();
        assert_eq!(direct, layout == PixelLayout::IntArgb, "{layout:?}");
    }
    let mut s = Surface::new(4, 4, PixelLayout::IntArgb).unwrap();
    assert!(s.writable_tile(TileRect::new(3, 3, 2, 1)).is_none());
}

#[test]
fn writable_tile_addresses_the_rect() {
    let mut s = Surface::new(4, 3, PixelLayout::IntArgb).unwrap();
    {
        let mut t = s.writable_tile(TileRect::new(1, 1, 2, 2)).unwrap();
        t.row_mut(0).fill(0xFF00_00FF);
        t.row_mut(1)[1] = 0xFFFF_0000;
    }
    assert_eq!(s.pixel(1, 1), 0xFF00_00FF);
    assert_eq!(s.pixel(2, 1), 0xFF00_00FF);
    assert_eq!(s.pixel(2, 2), 0xFFFF_0000);
    assert_eq!(s.pixel(0, 1), 0);
    assert_eq!(s.pixel(3, 1), 0);
}

#[test]
fn masked_write_leaves_uncovered_pixels() {
    let mut s = Surface::from_argb(2, 2, PixelLayout::FourByteAbgrPre, &[0xFF10_2030; 4]).unwrap();
    let rect = TileRect::new(0, 0, 2, 2);
    s.write_tile(rect, &[0xFFFF_FFFF; 4], Some(&[0xFF, 0, 0, 1]));
    assert_eq!(
        s.to_argb_vec(),
        vec![0xFFFF_FFFF, 0xFF10_2030, 0xFF10_2030, 0xFFFF_FFFF]
    );

    let mut out = [0u32; 2];
    s.read_tile(TileRect::new(0, 1, 2, 1), &mut out);
    assert_eq!(out, [0xFF10_2030, 0xFFFF_FFFF]);
}

#[test]
fn from_argb_checks_length() {
    assert!(Surface::from_argb(2, 2, PixelLayout::IntArgb, &[0; 3]).is_err());
}

#[test]
fn rgba_image_conversion_roundtrips() {
    let pixels = [0xFF11_2233, 0x8044_5566, 0x0000_0000, 0xFFFF_FFFF];
    let s = Surface::from_argb(2, 2, PixelLayout::IntArgb, &pixels).unwrap();
    let img = s.to_rgba_image().unwrap();
    assert_eq!(img.get_pixel(1, 0).0, [0x44, 0x55, 0x66, 0x80]);
    let back = Surface::from_rgba_image(&img, PixelLayout::IntArgb).unwrap();
    assert_eq!(back, s);
}
