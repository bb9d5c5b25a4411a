//! Surface manager owning the Direct2D/Direct3D 11 resource chain.
//!
//! Resources live in two tiers. The device tier (D3D device and context, D2D
//! device and context) survives for the manager's lifetime unless the GPU is
//! lost. The frame tier (swapchain, shared back-buffer texture, target
//! bitmap, brushes, text format, layout) is created lazily on the first draw
//! and discarded as one unit on any failure or window resize, then rebuilt
//! from scratch on the next draw.
//!
//! Release order is handled by drop order: windows-rs interface wrappers
//! release their COM reference on drop, so clearing a tier's `Option` is the
//! deterministic equivalent of the usual `SafeRelease` ladder.

mod d2d;
mod d3d;
mod snapshot;

pub use d2d::Brushes;

use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct2D::Common::{D2D1_COLOR_F, D2D_POINT_2F, D2D_RECT_F};
use windows::Win32::Graphics::Direct2D::{
    ID2D1Bitmap1, ID2D1Device, ID2D1DeviceContext, ID2D1Factory1, ID2D1Image, D2D1_ELLIPSE,
    D2D1_DRAW_TEXT_OPTIONS_NONE,
};
use windows::Win32::Graphics::Direct3D11::{ID3D11Device, ID3D11DeviceContext, ID3D11Texture2D};
use windows::Win32::Graphics::DirectWrite::{IDWriteTextFormat, DWRITE_MEASURING_MODE_NATURAL};
use windows::Win32::Graphics::Dxgi::{IDXGISwapChain1, DXGI_PRESENT};

use crate::bridge::OverlayBridge;
use crate::config::{parse_color, OverlayConfig};
use crate::error::{OverlayError, OverlayResult};
use crate::layout::EllipseLayout;

/// Device-tier handles, released on shutdown or device loss.
struct DeviceResources {
    device: ID3D11Device,
    context: ID3D11DeviceContext,
    d2d_context: ID2D1DeviceContext,
    // Kept alive for the context's lifetime.
    _d2d_device: ID2D1Device,
}

/// Frame-tier resources, created and discarded as one atomic unit.
struct FrameResources {
    swap_chain: IDXGISwapChain1,
    /// The shared back-buffer texture handed to the overlay bridge. Exactly
    /// one instance exists per swapchain lifetime.
    texture: ID3D11Texture2D,
    // Kept alive while it is the context's draw target.
    _target: ID2D1Bitmap1,
    brushes: Brushes,
    text_format: IDWriteTextFormat,
    layout: EllipseLayout,
    clear_color: D2D1_COLOR_F,
    width: u32,
    height: u32,
}

/// Owns every graphics handle and performs one frame of drawing plus
/// presentation per [`draw`](SurfaceManager::draw) call.
///
/// Two states: *uninitialized* (no frame tier) and *ready*. The transition to
/// ready happens lazily inside `draw`; any failure during drawing or
/// presentation falls back to uninitialized so the next call re-creates
/// everything.
pub struct SurfaceManager {
    factory: ID2D1Factory1,
    config: OverlayConfig,
    device: Option<DeviceResources>,
    frame: Option<FrameResources>,
}

impl SurfaceManager {
    /// Initialize the top-level Direct2D factory.
    ///
    /// A failure here is fatal for the overlay feature; nothing is retried.
    pub fn new(config: OverlayConfig) -> OverlayResult<Self> {
        let factory =
            d2d::create_factory().map_err(|e| OverlayError::Setup(e.to_string()))?;
        log::debug!("Direct2D factory created");

        Ok(Self {
            factory,
            config,
            device: None,
            frame: None,
        })
    }

    /// True when the frame tier exists and the next draw will not allocate.
    pub fn is_ready(&self) -> bool {
        self.frame.is_some()
    }

    /// Draw one frame and present it.
    ///
    /// Ensures graphics resources exist (a no-op when already created),
    /// clears the target, fills the centered ellipse, overlays `text`,
    /// presents the swapchain, hands the texture to `bridge`, and writes the
    /// debug snapshot. On any failure the frame tier is discarded so the next
    /// call rebuilds it; a lost device additionally drops the device tier.
    pub fn draw(
        &mut self,
        hwnd: HWND,
        bridge: &mut dyn OverlayBridge,
        text: &str,
    ) -> OverlayResult<()> {
        match self.draw_frame(hwnd, bridge, text) {
            Ok(()) => Ok(()),
            Err(err) => {
                log::warn!("draw failed, discarding frame resources: {err}");
                self.discard_graphics_resources();
                if err.is_device_lost() {
                    log::warn!("device lost, discarding device resources");
                    self.device = None;
                }
                Err(err)
            }
        }
    }

    /// Recompute the ellipse layout from the current render-target size.
    ///
    /// Invoked automatically whenever the frame tier is (re)created; a no-op
    /// while uninitialized.
    pub fn calculate_layout(&mut self) {
        if let Some(frame) = self.frame.as_mut() {
            frame.layout = EllipseLayout::for_size(frame.width as f32, frame.height as f32);
        }
    }

    /// Discard the frame tier only (the resize hook). The device tier is
    /// kept; the next draw re-creates the swapchain at the window's current
    /// size.
    pub fn discard_graphics_resources(&mut self) {
        if let Some(device) = self.device.as_ref() {
            // Drop the context's reference to the target bitmap so the
            // swapchain buffer is actually released with the tier.
            unsafe { device.d2d_context.SetTarget(None::<&ID2D1Image>) };
        }
        if self.frame.take().is_some() {
            log::debug!("frame resources discarded");
        }
    }

    /// Release both tiers. Also performed on drop.
    pub fn shutdown(&mut self) {
        self.discard_graphics_resources();
        if self.device.take().is_some() {
            log::debug!("device resources released");
        }
    }

    fn draw_frame(
        &mut self,
        hwnd: HWND,
        bridge: &mut dyn OverlayBridge,
        text: &str,
    ) -> OverlayResult<()> {
        self.ensure_frame_resources(hwnd, bridge)?;

        let (Some(device), Some(frame)) = (self.device.as_ref(), self.frame.as_ref()) else {
            return Err(OverlayError::ResourceCreation(
                "graphics resources unavailable".to_string(),
            ));
        };

        let ctx = &device.d2d_context;
        unsafe {
            ctx.BeginDraw();
            ctx.Clear(Some(&frame.clear_color));

            let ellipse = D2D1_ELLIPSE {
                point: D2D_POINT_2F {
                    x: frame.layout.center_x,
                    y: frame.layout.center_y,
                },
                radiusX: frame.layout.radius,
                radiusY: frame.layout.radius,
            };
            ctx.FillEllipse(&ellipse, &frame.brushes.fill);

            let wide: Vec<u16> = text.encode_utf16().collect();
            if !wide.is_empty() {
                let bounds = D2D_RECT_F {
                    left: 0.0,
                    top: 0.0,
                    right: frame.width as f32,
                    bottom: frame.height as f32,
                };
                ctx.DrawText(
                    &wide,
                    &frame.text_format,
                    &bounds,
                    &frame.brushes.text,
                    D2D1_DRAW_TEXT_OPTIONS_NONE,
                    DWRITE_MEASURING_MODE_NATURAL,
                );
            }

            ctx.EndDraw(None, None).map_err(OverlayError::present)?;

            frame
                .swap_chain
                .Present(0, DXGI_PRESENT(0))
                .ok()
                .map_err(OverlayError::present)?;
        }

        bridge.set_overlay_texture(&frame.texture)?;

        if self.config.snapshot_enabled {
            // Fire and forget: a failed snapshot never fails the frame.
            if let Err(err) = snapshot::save_texture(
                &device.device,
                &device.context,
                &frame.texture,
                &self.config.snapshot_path,
            ) {
                log::warn!("frame snapshot failed: {err}");
            }
        }

        Ok(())
    }

    /// Create the frame tier if it does not exist, or re-create it when the
    /// window's client area changed size. Idempotent otherwise: a second call
    /// without an intervening discard allocates nothing.
    fn ensure_frame_resources(
        &mut self,
        hwnd: HWND,
        bridge: &mut dyn OverlayBridge,
    ) -> OverlayResult<()> {
        let (width, height) =
            d3d::window_client_size(hwnd).map_err(|e| OverlayError::resource("client rect", e))?;

        if let Some(frame) = self.frame.as_ref() {
            if frame.width == width && frame.height == height {
                return Ok(());
            }
            log::debug!(
                "client area changed from {}x{} to {width}x{height}",
                frame.width,
                frame.height
            );
            self.discard_graphics_resources();
        }

        if self.device.is_none() {
            let (device, context) =
                d3d::create_device().map_err(|e| OverlayError::resource("d3d11 device", e))?;
            let (d2d_device, d2d_context) = d2d::create_device_context(&self.factory, &device)
                .map_err(|e| OverlayError::resource("d2d device", e))?;
            log::debug!("device resources created");

            self.device = Some(DeviceResources {
                device,
                context,
                d2d_context,
                _d2d_device: d2d_device,
            });
        }
        let Some(device) = self.device.as_ref() else {
            return Err(OverlayError::ResourceCreation(
                "device resources unavailable".to_string(),
            ));
        };

        let swap_chain = d3d::create_swap_chain(&device.device, hwnd, width, height)
            .map_err(|e| OverlayError::resource("swap chain", e))?;
        let texture = d3d::back_buffer_texture(&swap_chain)
            .map_err(|e| OverlayError::resource("back buffer texture", e))?;
        let surface = d3d::back_buffer_surface(&swap_chain)
            .map_err(|e| OverlayError::resource("back buffer surface", e))?;

        let text_format = d2d::create_text_format(&self.config)
            .map_err(|e| OverlayError::resource("text format", e))?;
        let target = d2d::create_target_bitmap(&device.d2d_context, &surface)
            .map_err(|e| OverlayError::resource("target bitmap", e))?;
        let brushes = d2d::create_brushes(&device.d2d_context, &self.config)
            .map_err(|e| OverlayError::resource("brushes", e))?;

        unsafe { device.d2d_context.SetTarget(&target) };

        let layout = EllipseLayout::for_size(width as f32, height as f32);
        let clear_color = d2d::color_f(parse_color(&self.config.background));

        // The texture identity changes with every swapchain, so the bridge
        // re-initializes each time the tier is rebuilt.
        bridge.init(&texture)?;

        log::info!("graphics resources created for {width}x{height} client area");
        self.frame = Some(FrameResources {
            swap_chain,
            texture,
            _target: target,
            brushes,
            text_format,
            layout,
            clear_color,
            width,
            height,
        });

        Ok(())
    }
}

impl Drop for SurfaceManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Device and swapchain creation need a window plus adapter, so the draw
    // path is exercised by the demo binary. The uninitialized state machine
    // has no such requirement.
    #[test]
    fn test_uninitialized_lifecycle_is_safe() {
        let mut surface = SurfaceManager::new(OverlayConfig::default()).unwrap();
        assert!(!surface.is_ready());

        // All frame-tier operations are no-ops before the first draw.
        surface.calculate_layout();
        surface.discard_graphics_resources();
        assert!(!surface.is_ready());

        surface.shutdown();
        assert!(!surface.is_ready());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut surface = SurfaceManager::new(OverlayConfig::default()).unwrap();
        surface.shutdown();
        surface.shutdown();
    }
}
