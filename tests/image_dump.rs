// Copyright @yucwang 2026

use std::fs;

use lumiere::core::film::Film;
use lumiere::io::save_output;
use lumiere::io::tga::{ read_tga_file, write_tga_file };
use lumiere::math::spectrum::RGBSpectrum;
use lumiere::tonemappers::reinhard::Reinhard;

#[test]
fn tga_round_trip_preserves_rgba_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dump.tga");
    let pixels: Vec<u8> = vec![255, 0, 0, 255, 0, 255, 0, 255,
                               0, 0, 255, 255, 10, 20, 30, 40];

    write_tga_file(&path, 2, 2, 4, &pixels).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), 18 + 16);

    let (header, data) = read_tga_file(&path).unwrap();
    assert_eq!(header.width, 2);
    assert_eq!(header.height, 2);
    assert_eq!(header.pixel_depth, 32);
    assert_eq!(header.descriptor, 8);
    assert_eq!(data, pixels);
}

#[test]
fn film_outputs_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let mut film = Film::new(2, 2);
    for i in 0..4 {
        film.accumulate(i, &RGBSpectrum::new(0.25 * i as f32, 0.5, 1.0));
    }
    film.tonemap_all(1, &Reinhard);

    let tga = dir.path().join("frame.tga");
    save_output(&tga, &film, 1).unwrap();
    let (_, data) = read_tga_file(&tga).unwrap();
    assert_eq!(data.as_slice(), film.ldr_bytes());

    let png = dir.path().join("frame.png");
    save_output(&png, &film, 1).unwrap();
    let decoded = image::open(&png).unwrap().to_rgba8();
    assert_eq!(decoded.as_raw().as_slice(), film.ldr_bytes());

    let exr = dir.path().join("frame.exr");
    save_output(&exr, &film, 1).unwrap();
    assert!(fs::metadata(&exr).unwrap().len() > 0);
}
