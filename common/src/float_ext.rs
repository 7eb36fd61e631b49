pub trait FloatExt: Copy {
    /// Absolute comparison against [`crate::EPSILON`] (`f64`) or [`crate::EPSILON_F32`].
    fn approximately_eq(self, other: Self) -> bool;

    /// Absolute comparison against a caller-chosen tolerance.
    fn approximately_eq_within(self, other: Self, tolerance: Self) -> bool;

    /// Comparison scaled by the larger magnitude of the two operands.
    /// Falls back to an absolute check near zero.
    fn relatively_eq(self, other: Self, tolerance: Self) -> bool;
}

impl FloatExt for f32 {
    fn approximately_eq(self, other: Self) -> bool {
        self.approximately_eq_within(other, crate::EPSILON_F32)
    }

    fn approximately_eq_within(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() <= tolerance
    }

    fn relatively_eq(self, other: Self, tolerance: Self) -> bool {
        let scale = self.abs().max(other.abs()).max(1.0);
        (self - other).abs() <= tolerance * scale
    }
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        self.approximately_eq_within(other, crate::EPSILON)
    }

    fn approximately_eq_within(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() <= tolerance
    }

    fn relatively_eq(self, other: Self, tolerance: Self) -> bool {
        let scale = self.abs().max(other.abs()).max(1.0);
        (self - other).abs() <= tolerance * scale
    }
}
