/// Anything that can fill a block of 16-bit samples.
///
/// Implementors keep their own phase and state between calls; every call
/// continues exactly where the previous one stopped, whatever the block
/// length.
pub trait BlockSource: Send {
    fn update(&mut self, out: &mut [i16]);
}

/// Allow boxed sources to be used as sources (for dynamic dispatch)
impl BlockSource for Box<dyn BlockSource> {
    fn update(&mut self, out: &mut [i16]) {
        (**self).update(out)
    }
}
