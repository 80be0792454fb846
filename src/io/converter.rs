/// Full-scale `i16` to `[-1.0, 1.0)`.
#[inline]
pub fn sample_to_f32(sample: i16) -> f32 {
    sample as f32 / 32_768.0
}

/// Convert as many samples as both slices hold.
pub fn block_to_f32(block: &[i16], out: &mut [f32]) {
    for (dst, &src) in out.iter_mut().zip(block) {
        *dst = sample_to_f32(src);
    }
}

/// Copy a mono signal to every channel of an interleaved buffer. Returns
/// the number of frames written.
pub fn write_interleaved(mono: &[f32], out: &mut [f32], channels: usize) -> usize {
    if channels == 0 {
        return 0;
    }
    let mut frames = 0;
    for (frame, &sample) in out.chunks_exact_mut(channels).zip(mono) {
        frame.fill(sample);
        frames += 1;
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_maps_to_unit_range() {
        assert_eq!(sample_to_f32(i16::MIN), -1.0);
        assert_eq!(sample_to_f32(0), 0.0);
        assert!(sample_to_f32(i16::MAX) < 1.0);
        assert!(sample_to_f32(i16::MAX) > 0.9999);
    }

    #[test]
    fn block_conversion_stops_at_the_shorter_slice() {
        let mut out = [9.0f32; 3];
        block_to_f32(&[16_384, -16_384], &mut out);
        assert_eq!(out, [0.5, -0.5, 9.0]);
    }

    #[test]
    fn interleaving_duplicates_mono() {
        let mut out = [0.0f32; 7];
        let frames = write_interleaved(&[0.25, -0.25, 0.5, 1.0], &mut out, 2);
        assert_eq!(frames, 3);
        assert_eq!(out, [0.25, 0.25, -0.25, -0.25, 0.5, 0.5, 0.0]);
        assert_eq!(write_interleaved(&[1.0], &mut out, 0), 0);
    }
}
