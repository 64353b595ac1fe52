//! Ring configuration
//!
//! Runtime ring settings. With the `serde` feature they are stored as
//! postcard binary data so a board can persist its tuned watermarks and
//! overwrite policy.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ring::{RingBuffer, RingError};

/// Magic number to identify valid ring configuration
pub const CONFIG_MAGIC: u32 = 0x5249_4E47; // "RING"

/// Current configuration layout version
pub const CONFIG_VERSION: u8 = 1;

/// Upper bound on the serialized size of [`RingConfig`]
pub const MAX_CONFIG_SIZE: usize = 32;

/// Configuration load/store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Serialization failed (output buffer too small)
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Invalid magic or version
    InvalidFormat,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Serialize => f.write_str("failed to serialize ring config"),
            ConfigError::Deserialize => f.write_str("failed to deserialize ring config"),
            ConfigError::InvalidFormat => f.write_str("ring config has wrong magic or version"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Tunable ring settings
///
/// Thresholds left as `None` keep whatever the ring was initialized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RingConfig {
    /// Must equal [`CONFIG_MAGIC`]
    pub magic: u32,
    /// Must equal [`CONFIG_VERSION`]
    pub version: u8,
    /// High watermark in bytes
    pub high_watermark: Option<u16>,
    /// Low watermark in bytes
    pub low_watermark: Option<u16>,
    /// Discard the oldest byte instead of refusing a push when full
    pub overwrite: bool,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RingConfig {
    /// Configuration that changes nothing but disables overwrite
    pub const fn new() -> Self {
        Self {
            magic: CONFIG_MAGIC,
            version: CONFIG_VERSION,
            high_watermark: None,
            low_watermark: None,
            overwrite: false,
        }
    }

    /// Set both watermark thresholds
    pub const fn with_watermarks(mut self, high: u16, low: u16) -> Self {
        self.high_watermark = Some(high);
        self.low_watermark = Some(low);
        self
    }

    /// Set the overwrite policy
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Check magic and version
    pub const fn is_valid(&self) -> bool {
        self.magic == CONFIG_MAGIC && self.version == CONFIG_VERSION
    }

    /// Serialize into `buffer`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_slice<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buffer).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and validate
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: RingConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        if !config.is_valid() {
            debug!("ring config rejected: magic {=u32:x}", config.magic);
            return Err(ConfigError::InvalidFormat);
        }
        Ok(config)
    }
}

impl RingBuffer<'_> {
    /// Apply a configuration
    ///
    /// Fails with [`RingError::OutOfRange`] if a threshold exceeds the
    /// capacity, in which case nothing is changed.
    pub fn configure(&mut self, config: &RingConfig) -> Result<(), RingError> {
        let high = config
            .high_watermark
            .map_or(self.high_watermark(), usize::from);
        let low = config.low_watermark.map_or(self.low_watermark(), usize::from);
        self.set_watermarks(high, low)?;
        self.set_overwrite(config.overwrite);
        Ok(())
    }

    /// Current settings as a configuration
    ///
    /// Thresholds above `u16::MAX` saturate.
    pub fn config(&self) -> RingConfig {
        let clamp = |v: usize| u16::try_from(v).unwrap_or(u16::MAX);
        RingConfig::new()
            .with_watermarks(clamp(self.high_watermark()), clamp(self.low_watermark()))
            .with_overwrite(self.overwrite_enabled())
    }
}
