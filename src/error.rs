//! Central error types for the overlay renderer.
//!
//! One typed enum covers the whole failure taxonomy: fatal factory setup,
//! transient resource creation, presentation, device loss, bridge handoff,
//! and the fire-and-forget snapshot path.

use thiserror::Error;

/// Main error type for overlay rendering operations.
#[derive(Error, Debug)]
pub enum OverlayError {
    /// The Direct2D factory could not be created. Fatal and non-recoverable;
    /// the caller should abort or disable the overlay feature.
    #[error("Factory setup failed: {0}")]
    Setup(String),

    /// A device, swapchain, or render-target resource failed to create
    /// mid-chain. The frame resources are discarded and rebuilt on the next
    /// draw call.
    #[error("Resource creation failed: {0}")]
    ResourceCreation(String),

    /// EndDraw or Present failed. Handled identically to a resource failure.
    #[error("Presentation failed: {0}")]
    Presentation(String),

    /// The GPU device was removed or reset. Requires re-creating the device
    /// tier as well as the frame tier.
    #[error("Device lost: {0}")]
    DeviceLost(String),

    /// The overlay bridge rejected the shared texture.
    #[error("Overlay bridge error: {0}")]
    Bridge(String),

    /// Debug snapshot encoding failed.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Snapshot file write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OverlayError {
    /// True when the error indicates the GPU device itself is gone, not just
    /// a single failed resource.
    pub fn is_device_lost(&self) -> bool {
        matches!(self, OverlayError::DeviceLost(_))
    }
}

impl From<image::ImageError> for OverlayError {
    fn from(err: image::ImageError) -> Self {
        OverlayError::Snapshot(err.to_string())
    }
}

#[cfg(windows)]
mod win32 {
    use super::OverlayError;
    use windows::Win32::Graphics::Dxgi::{DXGI_ERROR_DEVICE_REMOVED, DXGI_ERROR_DEVICE_RESET};

    fn device_gone(err: &windows::core::Error) -> bool {
        err.code() == DXGI_ERROR_DEVICE_REMOVED || err.code() == DXGI_ERROR_DEVICE_RESET
    }

    impl OverlayError {
        /// Classify a resource-creation failure, promoting device-removed
        /// HRESULTs to `DeviceLost`.
        pub(crate) fn resource(stage: &str, err: windows::core::Error) -> Self {
            if device_gone(&err) {
                OverlayError::DeviceLost(format!("{stage}: {err}"))
            } else {
                OverlayError::ResourceCreation(format!("{stage}: {err}"))
            }
        }

        /// Classify an EndDraw/Present failure.
        pub(crate) fn present(err: windows::core::Error) -> Self {
            if device_gone(&err) {
                OverlayError::DeviceLost(err.to_string())
            } else {
                OverlayError::Presentation(err.to_string())
            }
        }
    }
}

/// Type alias for Results using OverlayError.
pub type OverlayResult<T> = Result<T, OverlayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OverlayError::Setup("D2D1CreateFactory returned E_FAIL".to_string());
        assert_eq!(
            err.to_string(),
            "Factory setup failed: D2D1CreateFactory returned E_FAIL"
        );

        let err = OverlayError::ResourceCreation("swap chain".to_string());
        assert!(err.to_string().contains("Resource creation"));

        let err = OverlayError::Presentation("Present".to_string());
        assert!(err.to_string().contains("Presentation failed"));
    }

    #[test]
    fn test_device_lost_classification() {
        let lost = OverlayError::DeviceLost("DXGI_ERROR_DEVICE_REMOVED".to_string());
        assert!(lost.is_device_lost());

        let transient = OverlayError::ResourceCreation("text format".to_string());
        assert!(!transient.is_device_lost());

        let present = OverlayError::Presentation("flush".to_string());
        assert!(!present.is_device_lost());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only dir");
        let err: OverlayError = io_err.into();
        assert!(matches!(err, OverlayError::Io(_)));
        assert!(err.to_string().contains("read-only dir"));
    }

    #[test]
    fn test_snapshot_error_display() {
        let err = OverlayError::Snapshot("unsupported texture format".to_string());
        assert!(err.to_string().contains("Snapshot error"));
    }
}
