//! Fixed-point sine / cosine for arc rendering.
//!
//! Values are scaled by [`FIXED_POINT_SCALE`] (`1.0 == 1024`). A 72-entry
//! cosine table covers the circle in 5° steps; angles between entries are
//! linearly interpolated, which keeps the error under 3/1024 everywhere.

/// Fixed-point scale: `fxp_cos(0) == FIXED_POINT_SCALE`.
pub const FIXED_POINT_SCALE: i32 = 1024;

/// Degrees between consecutive table entries.
const STEP_DEG: i32 = 5;

/// `cos(i * 5°) * 1024`, rounded, for `i` in `0..72`.
const COS_TABLE: [i16; 72] = [
    1024, 1020, 1008, 989, 962, 928, 887, 839, 784, 724, 658, 587, //   0..55
    512, 433, 350, 265, 178, 89, 0, -89, -178, -265, -350, -433, //  60..115
    -512, -587, -658, -724, -784, -839, -887, -928, -962, -989, -1008, -1020, // 120..175
    -1024, -1020, -1008, -989, -962, -928, -887, -839, -784, -724, -658, -587, // 180..235
    -512, -433, -350, -265, -178, -89, 0, 89, 178, 265, 350, 433, // 240..295
    512, 587, 658, 724, 784, 839, 887, 928, 962, 989, 1008, 1020, // 300..355
];

/// Cosine of `deg` degrees, scaled by 1024. Any integer angle is accepted.
pub fn fxp_cos(deg: i32) -> i32 {
    let deg = deg.rem_euclid(360);
    let index = (deg / STEP_DEG) as usize;
    let frac = deg % STEP_DEG;

    let a = COS_TABLE[index] as i32;
    if frac == 0 {
        return a;
    }
    let b = COS_TABLE[(index + 1) % COS_TABLE.len()] as i32;
    a + (b - a) * frac / STEP_DEG
}

/// Sine of `deg` degrees, scaled by 1024.
pub fn fxp_sin(deg: i32) -> i32 {
    fxp_cos(deg - 90)
}
