use image::Rgb;

use crate::models::LandmarkGroup;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const FACE_BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const OCCLUSION_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const LANDMARKED_REGION_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// Weight of the overlay color when blending a mask layer.
pub const OVERLAY_ALPHA: f64 = 0.3;

pub const SEGMENTATION_LABEL_COUNT: usize = 24;

/// Color per face-parsing label.
pub const SEGMENTATION_PALETTE: [Rgb<u8>; SEGMENTATION_LABEL_COUNT] = [
    Rgb([128, 128, 128]), // background
    Rgb([255, 85, 0]),    // face skin
    Rgb([255, 170, 0]),   // left eyebrow
    Rgb([255, 0, 85]),    // right eyebrow
    Rgb([255, 0, 170]),   // left eye
    Rgb([0, 255, 0]),     // right eye
    Rgb([0, 255, 255]),   // eyeglasses
    Rgb([170, 255, 0]),   // left ear
    Rgb([0, 255, 85]),    // right ear
    Rgb([0, 255, 170]),   // earring
    Rgb([0, 0, 255]),     // nose
    Rgb([85, 0, 255]),    // mouth
    Rgb([170, 0, 255]),   // upper lip
    Rgb([0, 85, 255]),    // lower lip
    Rgb([0, 170, 255]),   // neck
    Rgb([255, 255, 0]),   // necklace
    Rgb([255, 255, 85]),  // clothing
    Rgb([255, 255, 170]), // hair
    Rgb([255, 0, 255]),   // head covering
    Rgb([255, 85, 255]),
    Rgb([255, 170, 255]),
    Rgb([85, 255, 255]),
    Rgb([170, 255, 255]),
    Rgb([85, 255, 0]),
];

/// Labels outside the palette render white.
pub fn segmentation_color(label: u8) -> Rgb<u8> {
    SEGMENTATION_PALETTE
        .get(label as usize)
        .copied()
        .unwrap_or(WHITE)
}

const LANDMARK_COLORS: [(LandmarkGroup, Rgb<u8>); 7] = [
    (LandmarkGroup::FaceContour, Rgb([0, 255, 255])),
    (LandmarkGroup::Eyebrows, Rgb([0, 0, 255])),
    (LandmarkGroup::Nose, Rgb([0, 0, 0])),
    (LandmarkGroup::EyeBoundary, Rgb([128, 0, 128])),
    (LandmarkGroup::OuterLips, Rgb([255, 0, 0])),
    (LandmarkGroup::InnerLips, Rgb([0, 255, 0])),
    (LandmarkGroup::Pupils, Rgb([255, 255, 255])),
];

pub fn landmark_color(group: LandmarkGroup) -> Rgb<u8> {
    LANDMARK_COLORS
        .iter()
        .find(|(g, _)| *g == group)
        .map(|(_, color)| *color)
        .unwrap_or(WHITE)
}
