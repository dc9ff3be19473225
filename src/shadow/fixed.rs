use crate::foundation::core::Opa;

/// Opacity carried with `SHIFT` extra fractional bits while a kernel is blurred.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UpsOpa(u16);

impl UpsOpa {
    pub const SHIFT: u32 = 6;
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self((Opa::MAX as u16) << Self::SHIFT);

    pub const fn from_opa(opa: Opa) -> Self {
        Self((opa as u16) << Self::SHIFT)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Back to a plain opacity, truncating the fraction.
    pub fn to_opa(self) -> Opa {
        (self.0 >> Self::SHIFT).min(Opa::MAX as u16) as Opa
    }

    /// Mean of a box window whose samples sum to `sum`.
    ///
    /// Empty and saturated windows map exactly to `ZERO` and `MAX`, so uniform regions keep
    /// their value through any number of passes.
    pub fn from_window_sum(sum: u32, window: u32) -> Self {
        if sum == 0 || window == 0 {
            return Self::ZERO;
        }
        let full = Self::MAX.0 as u32 * window;
        if sum >= full {
            Self::MAX
        } else {
            Self((sum / window) as u16)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shadow/fixed.rs"]
mod tests;
