/// The largest exponent accepted by [`NumExt::exp2_clamped`]. Leaves enough headroom to scale
/// the result by layout dimensions without reaching infinity.
const MAX_EXP: u32 = 1000;

pub trait NumExt {
    /// Returns `2^self` as a `f64`, clamping the exponent to [`MAX_EXP`].
    fn exp2_clamped(self) -> f64;
}

impl NumExt for u32 {
    #[inline]
    fn exp2_clamped(self) -> f64 {
        2_f64.powi(self.min(MAX_EXP) as i32)
    }
}
