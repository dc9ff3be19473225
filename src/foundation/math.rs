use crate::foundation::core::{OPA_COVER, Opa};

#[inline]
pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((x as u32) * (y as u32) + 127) / 255) as u16
}

#[inline]
pub(crate) fn mul_div255_u8(x: u8, y: u8) -> u8 {
    mul_div255_u16(x as u16, y as u16) as u8
}

/// `(fg*a + bg*(255-a) + 127) / 255`.
#[inline]
pub(crate) fn mix_u8(fg: u8, bg: u8, a: u8) -> u8 {
    let a = a as u32;
    (((fg as u32) * a + (bg as u32) * (255 - a) + 127) / 255) as u8
}

/// Product of two opacities, exact when either side is opaque.
#[inline]
pub(crate) fn opa_mul(a: Opa, b: Opa) -> Opa {
    if a == OPA_COVER {
        b
    } else if b == OPA_COVER {
        a
    } else {
        mul_div255_u8(a, b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
