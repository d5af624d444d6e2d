/// Bounding boxes
pub mod bbox;

/// Appearance feature vectors
pub mod feature;

/// Lines, points and the perpendicular reference axis
pub mod geometry;
