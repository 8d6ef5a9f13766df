/// Per-channel color balance
///
/// Each factor multiplies its channel before clamping. Factors of 1.0 leave
/// the channel unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBalance {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ColorBalance {
    /// Balance that changes nothing
    pub const NEUTRAL: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for ColorBalance {
    fn default() -> Self {
        Self::NEUTRAL
    }
}
