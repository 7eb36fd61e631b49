pub mod float_ext;
pub mod log_setup;

/// Absolute tolerance used by [`float_ext::FloatExt::approximately_eq`] for `f64`.
pub const EPSILON: f64 = 1e-9;
/// Absolute tolerance used by [`float_ext::FloatExt::approximately_eq`] for `f32`.
pub const EPSILON_F32: f32 = 1e-6;
