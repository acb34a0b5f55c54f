/* Copyright 2020 @Yuchen Wong */

pub type Float = f32;
pub type Int = i32;
pub type UInt = u32;

pub type Vector2f = nalgebra::Vector2<Float>;
pub type Vector3f = nalgebra::Vector3<Float>;
pub type Vector2i = nalgebra::Vector2<Int>;
pub type Vector2u = nalgebra::Vector2<UInt>;
pub type Vector4f = nalgebra::Vector4<Float>;
pub type Matrix4f = nalgebra::Matrix4<Float>;

pub const EPSILON: Float = 1e-4;
pub const PI: Float = 3.14159265359;
pub const INV_PI: Float = 0.31830988618;
pub const SQUARE_2: Float = 1.41421356;
pub const INV_SQUARE_2: Float = 0.70710678;

pub const FLOAT_MAX: Float = std::f32::MAX;
pub const FLOAT_MIN: Float = std::f32::MIN;

/// Largest float strictly below one.
pub const ONE_MINUS_EPSILON: Float = 1.0 - std::f32::EPSILON / 2.0;

pub fn lerp(a: Float, b: Float, t: Float) -> Float {
    a + (b - a) * t
}

pub fn saturate(v: Float) -> Float {
    v.max(0.0).min(1.0)
}

pub fn pow5(v: Float) -> Float {
    let v2 = v * v;
    v2 * v2 * v
}
