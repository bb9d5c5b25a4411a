//! Seam between the renderer and an external VR overlay compositor.
//!
//! The compositor consumes the swapchain's back-buffer texture by reference.
//! It must treat the texture as read-only from the moment it is handed over
//! until the next frame's draw begins; the renderer never draws and presents
//! concurrently, so no further synchronization is required.

use windows::Win32::Graphics::Direct3D11::ID3D11Texture2D;

use crate::error::OverlayResult;

/// Receiver for the shared overlay texture.
///
/// The renderer does not manage a bridge's lifecycle; it only calls through
/// this trait at the two handoff points.
pub trait OverlayBridge {
    /// Called after every (re)creation of the shared texture. The previous
    /// texture, if any, is invalid once this returns; the bridge must drop
    /// any reference it kept.
    fn init(&mut self, texture: &ID3D11Texture2D) -> OverlayResult<()>;

    /// Called once per frame, after presentation.
    fn set_overlay_texture(&mut self, texture: &ID3D11Texture2D) -> OverlayResult<()>;
}

/// No-op bridge for running without a compositor attached.
pub struct NullBridge;

impl OverlayBridge for NullBridge {
    fn init(&mut self, _texture: &ID3D11Texture2D) -> OverlayResult<()> {
        log::debug!("null bridge received shared texture");
        Ok(())
    }

    fn set_overlay_texture(&mut self, _texture: &ID3D11Texture2D) -> OverlayResult<()> {
        Ok(())
    }
}
