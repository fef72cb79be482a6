//! Error types for the eDMA engine
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Channel selection and slave configuration failures
//! - [`DmaError`]: Descriptor allocation, queueing and transfer failures
//!
//! The unified [`Error`] enum wraps both domains and is returned
//! by most engine methods. Interrupt handlers never return errors; they
//! record failures in the channel status instead.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Channel selection and configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Direction is not a peripheral direction, or differs from the
    /// configured one
    InvalidDirection,
    /// Channel index out of range
    InvalidChannel,
    /// Channel has no slave configuration yet
    NotConfigured,
    /// DMAMUX group index out of range
    InvalidMuxGroup,
    /// Every channel of the requested mux group is already allocated
    NoFreeChannel,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidDirection => "invalid transfer direction",
            ConfigError::InvalidChannel => "invalid channel",
            ConfigError::NotConfigured => "channel not configured",
            ConfigError::InvalidMuxGroup => "invalid DMAMUX group",
            ConfigError::NoFreeChannel => "no free channel in DMAMUX group",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// Descriptor and transfer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// The channel's TCD pool ran out of slots
    AllocationExhausted,
    /// The channel's transfer queue is full
    QueueFull,
    /// Zero length, period larger than the buffer, or iteration count
    /// out of range
    InvalidLength,
    /// The controller flagged a transfer error on the channel
    HardwareError,
    /// The transfer was discarded before it completed
    Aborted,
    /// Operation timed out
    Timeout,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::AllocationExhausted => "TCD pool exhausted",
            DmaError::QueueFull => "transfer queue full",
            DmaError::InvalidLength => "invalid transfer length",
            DmaError::HardwareError => "hardware transfer error",
            DmaError::Aborted => "transfer aborted",
            DmaError::Timeout => "operation timed out",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::InvalidDirection)) => { /* ... */ }
///     Err(Error::Dma(DmaError::AllocationExhausted)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// DMA error
    Dma(DmaError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

/// Result type alias for eDMA operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

// =============================================================================
// Unit Tests
// =============================================================================
