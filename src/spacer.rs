//! Four-sided non-negative margins.

use crate::error::{Result, SceneError};

/// Top, bottom, left and right space around a component's shape.
///
/// Every side is kept non-negative; setters reject negative input with
/// [`SceneError::NegativeSpace`] and leave the spacer untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spacer {
    top: f64,
    bottom: f64,
    left: f64,
    right: f64,
}

fn check(side: &'static str, value: f64) -> Result<f64> {
    if value < 0.0 || value.is_nan() {
        log::warn!("rejecting {side} space {value}");
        return Err(SceneError::NegativeSpace { side, value });
    }
    Ok(value)
}

impl Spacer {
    /// A spacer with all four sides set to zero.
    pub const EMPTY: Spacer = Spacer {
        top: 0.0,
        bottom: 0.0,
        left: 0.0,
        right: 0.0,
    };

    /// Create a spacer, validating every side before building it.
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Result<Self> {
        Ok(Self {
            top: check("top", top)?,
            bottom: check("bottom", bottom)?,
            left: check("left", left)?,
            right: check("right", right)?,
        })
    }

    /// A spacer with the same space on every side.
    pub fn uniform(space: f64) -> Result<Self> {
        Self::new(space, space, space, space)
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn set_top(&mut self, space: f64) -> Result<()> {
        self.top = check("top", space)?;
        Ok(())
    }

    pub fn set_bottom(&mut self, space: f64) -> Result<()> {
        self.bottom = check("bottom", space)?;
        Ok(())
    }

    pub fn set_left(&mut self, space: f64) -> Result<()> {
        self.left = check("left", space)?;
        Ok(())
    }

    pub fn set_right(&mut self, space: f64) -> Result<()> {
        self.right = check("right", space)?;
        Ok(())
    }

    /// Set all four sides at once. All values are validated before any is applied.
    pub fn set_spaces(&mut self, top: f64, bottom: f64, left: f64, right: f64) -> Result<()> {
        *self = Self::new(top, bottom, left, right)?;
        Ok(())
    }

    /// Copy the spaces of `other` into this spacer.
    pub fn copy_from(&mut self, other: &Spacer) {
        *self = *other;
    }

    /// Total horizontal space (left + right).
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical space (top + bottom).
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0.0 && self.bottom == 0.0 && self.left == 0.0 && self.right == 0.0
    }
}
