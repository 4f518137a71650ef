//! Routing of captures into output buffers.

use std::fmt;

use crate::{
    error::{Error, Result},
    sample::SharedBuffer,
};

/// Inclusive range of reflection orders, `max` of `None` is unbounded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl OrderRange {
    /// Every arrival.
    pub const ALL: Self = Self { min: 0, max: None };
    /// Only the direct sound.
    pub const DIRECT: Self = Self {
        min: 0,
        max: Some(0),
    };
    /// Every reflection.
    pub const INDIRECT: Self = Self { min: 1, max: None };

    pub fn new(min: u32, max: Option<u32>) -> Result<Self> {
        if let Some(max) = max {
            if max < min {
                return Err(Error::InvalidArgument(format!(
                    "Order range max {} is below min {}",
                    max, min
                )));
            }
        }
        Ok(Self { min, max })
    }

    /// Builds a range from bounds where `-1` means "no bound": 0 for `min`,
    /// unbounded for `max`.
    pub fn from_sentinels(min: i32, max: i32) -> Result<Self> {
        let lower = match min {
            -1 => 0,
            m if m >= 0 => m as u32,
            m => {
                return Err(Error::InvalidArgument(format!(
                    "Invalid minimum order {}",
                    m
                )))
            }
        };
        let upper = match max {
            -1 => None,
            m if m >= 0 => Some(m as u32),
            m => {
                return Err(Error::InvalidArgument(format!(
                    "Invalid maximum order {}",
                    m
                )))
            }
        };
        Self::new(lower, upper)
    }

    pub fn contains(&self, order: u32) -> bool {
        order >= self.min && self.max.map_or(true, |max| order <= max)
    }
}

impl fmt::Display for OrderRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "[{}, {}]", self.min, max),
            None => write!(f, "[{}, inf)", self.min),
        }
    }
}

/// Routes the arrivals of a capture whose order is in `range` into `channel`
/// of `buffer`.
#[derive(Clone, Debug)]
pub struct Binding {
    pub capture: usize,
    pub buffer: SharedBuffer,
    pub channel: usize,
    pub range: OrderRange,
}
