/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Percentage (0.0-100.0) of full scale represented by an 8-bit value
#[inline]
pub fn percent8(value: u8) -> f32 {
    libm::roundf(f32::from(value) * 1000.0 / 255.0) / 10.0
}
