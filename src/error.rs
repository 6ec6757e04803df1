//! Error handling for the dskit library
//!
//! A single crate-wide error enum with constructor helpers and a `Result`
//! alias. All container operations report failures synchronously through
//! this type; there is no retry or recovery machinery.

use thiserror::Error;

/// Main error type for the dskit library
#[derive(Error, Debug)]
pub enum DskitError {
    /// An access or removal was attempted on an empty container
    #[error("{container} is empty")]
    ContainerEmpty {
        /// Name of the container kind ("heap", "stack", "queue", ...)
        container: &'static str,
    },

    /// Index out of bounds access
    #[error("Out of bounds: index {index}, size {size}")]
    OutOfBounds {
        /// The invalid index
        index: usize,
        /// The valid size/length
        size: usize,
    },

    /// Memory allocation failures
    #[error("Memory allocation failed: requested {size} bytes")]
    OutOfMemory {
        /// Number of bytes requested
        size: usize,
    },

    /// An element's fallible clone operation signalled failure
    #[error("Element operation failed: {message}")]
    ElementOp {
        /// Message from the failing element operation
        message: String,
    },

    /// Invalid argument or corrupted precondition
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Error message describing the issue
        message: String,
    },
}

impl DskitError {
    /// Create a container-empty error
    pub fn container_empty(container: &'static str) -> Self {
        Self::ContainerEmpty { container }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(index: usize, size: usize) -> Self {
        Self::OutOfBounds { index, size }
    }

    /// Create an out of memory error
    pub fn out_of_memory(size: usize) -> Self {
        Self::OutOfMemory { size }
    }

    /// Create an element-operation error
    pub fn element_op<S: Into<String>>(message: S) -> Self {
        Self::ElementOp {
            message: message.into(),
        }
    }

    /// Create an invalid data error
    pub fn invalid_data<S: Into<String>>(message: S) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::ContainerEmpty { .. } => "empty",
            Self::OutOfBounds { .. } => "bounds",
            Self::OutOfMemory { .. } => "memory",
            Self::ElementOp { .. } => "element",
            Self::InvalidData { .. } => "data",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DskitError>;

/// Assert that an index is within bounds
#[inline]
pub fn check_bounds(index: usize, size: usize) -> Result<()> {
    if index >= size {
        Err(DskitError::out_of_bounds(index, size))
    } else {
        Ok(())
    }
}

/// Assert that an inclusive range is within bounds
#[inline]
pub fn check_range(start: usize, end: usize, size: usize) -> Result<()> {
    if start > end {
        return Err(DskitError::invalid_data(format!(
            "Invalid range: start {} > end {}",
            start, end
        )));
    }
    if end >= size {
        return Err(DskitError::out_of_bounds(end, size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = DskitError::container_empty("heap");
        assert_eq!(err.category(), "empty");

        let err = DskitError::element_op("clone refused");
        assert_eq!(err.category(), "element");
    }

    #[test]
    fn test_error_display() {
        let err = DskitError::container_empty("queue");
        assert_eq!(format!("{}", err), "queue is empty");

        let bounds = DskitError::out_of_bounds(10, 5);
        let display = format!("{}", bounds);
        assert!(display.contains("10"));
        assert!(display.contains("5"));
    }

    #[test]
    fn test_bounds_checking() {
        assert!(check_bounds(5, 10).is_ok());
        assert!(check_bounds(10, 10).is_err());
        assert!(check_bounds(0, 0).is_err());
    }

    #[test]
    fn test_range_checking() {
        assert!(check_range(2, 8, 10).is_ok());
        assert!(check_range(8, 2, 10).is_err()); // start > end
        assert!(check_range(2, 10, 10).is_err()); // end >= size
        assert!(check_range(5, 5, 10).is_ok());
    }
}
