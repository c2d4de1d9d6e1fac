//! Hand-tuned arena spawn coordinates

use glam::Vec3;

use super::MapSize;

pub const LARGE: [Vec3; 16] = [
    Vec3::new(154.405, 53.9165, 336.938),
    Vec3::new(-10.8466, 54.1795, 337.3333),
    Vec3::new(74.6446, 52.7551, 289.8891),
    Vec3::new(74.6011, 52.755, 208.2289),
    Vec3::new(1.568, 52.755, 170.449),
    Vec3::new(-78.6697, 54.0691, 215.85),
    Vec3::new(147.9836, 52.755, 171.7271),
    Vec3::new(227.6423, 55.0681, 215.5072),
    Vec3::new(228.5723, 53.9948, 44.2243),
    Vec3::new(145.7533, 52.755, 92.5877),
    Vec3::new(73.8109, 52.755, 50.5495),
    Vec3::new(2.4575, 52.755, 89.7126),
    Vec3::new(-78.8257, 54.0165, 44.2668),
    Vec3::new(-7.5792, 54.3077, -74.9209),
    Vec3::new(76.0913, 52.755, -27.8133),
    Vec3::new(156.3583, 54.1386, -73.316),
];

pub const SMALL: [Vec3; 12] = [
    Vec3::new(74.8029, 56.0144, -39.1491),
    Vec3::new(74.3871, 52.74, 52.3592),
    Vec3::new(3.0559, 52.74, 91.6606),
    Vec3::new(-78.5371, 54.1309, 46.0337),
    Vec3::new(4.1548, 52.7401, 171.8462),
    Vec3::new(-78.5159, 54.4974, 217.7527),
    Vec3::new(74.676, 52.7401, 209.497),
    Vec3::new(73.4692, 54.7709, 303.5255),
    Vec3::new(142.9044, 52.7401, 172.1282),
    Vec3::new(228.8374, 55.1237, 216.3495),
    Vec3::new(144.7876, 52.74, 90.2711),
    Vec3::new(228.4908, 54.1321, 43.9164),
];

pub fn for_map(map_size: MapSize) -> &'static [Vec3] {
    match map_size {
        MapSize::Large => &LARGE,
        MapSize::Small => &SMALL,
    }
}
