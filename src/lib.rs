//! Shared-surface overlay renderer.
//!
//! Draws a colored ellipse plus caller-supplied text into a texture that is
//! shared between Direct2D (vector graphics and DirectWrite text) and a
//! Direct3D 11 swapchain, presents the result to an on-screen window, and
//! hands the same texture to an external VR overlay compositor each frame.
//!
//! The rendering core ([`graphics::SurfaceManager`]) is Windows-only; the
//! platform-neutral pieces (ellipse layout, configuration, error types) build
//! everywhere so they can be tested off-target.
//!
//! ```ignore
//! let mut surface = SurfaceManager::new(OverlayConfig::default())?;
//! let mut bridge = NullBridge;
//!
//! // Once per frame:
//! surface.draw(hwnd, &mut bridge, "typed text")?;
//! ```

pub mod config;
pub mod error;
pub mod layout;

#[cfg(windows)]
pub mod bridge;
#[cfg(windows)]
pub mod graphics;

pub use config::OverlayConfig;
pub use error::{OverlayError, OverlayResult};
pub use layout::EllipseLayout;

#[cfg(windows)]
pub use bridge::{NullBridge, OverlayBridge};
#[cfg(windows)]
pub use graphics::SurfaceManager;
