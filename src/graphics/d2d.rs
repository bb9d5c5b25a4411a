//! Direct2D context, brushes, and text format creation.
//!
//! Direct2D draws into the swapchain's back buffer through a target bitmap
//! wrapped around the DXGI surface, so everything composed here lands in the
//! same texture the overlay compositor consumes.

use std::iter::once;

use windows::core::{Interface, Result, PCWSTR};
use windows::Foundation::Numerics::Matrix3x2;
use windows::Win32::Graphics::Direct2D::Common::{
    D2D1_ALPHA_MODE_PREMULTIPLIED, D2D1_COLOR_F, D2D1_PIXEL_FORMAT,
};
use windows::Win32::Graphics::Direct2D::{
    D2D1CreateFactory, ID2D1Bitmap1, ID2D1Device, ID2D1DeviceContext, ID2D1Factory1,
    ID2D1RenderTarget, ID2D1SolidColorBrush, D2D1_BITMAP_OPTIONS_CANNOT_DRAW,
    D2D1_BITMAP_OPTIONS_TARGET, D2D1_BITMAP_PROPERTIES1, D2D1_BRUSH_PROPERTIES,
    D2D1_DEBUG_LEVEL_INFORMATION, D2D1_DEBUG_LEVEL_NONE, D2D1_DEVICE_CONTEXT_OPTIONS_NONE,
    D2D1_FACTORY_OPTIONS, D2D1_FACTORY_TYPE_SINGLE_THREADED,
};
use windows::Win32::Graphics::Direct3D11::ID3D11Device;
use windows::Win32::Graphics::DirectWrite::{
    DWriteCreateFactory, IDWriteFactory, IDWriteTextFormat, DWRITE_FACTORY_TYPE_SHARED,
    DWRITE_FONT_STRETCH_NORMAL, DWRITE_FONT_STYLE_NORMAL, DWRITE_FONT_WEIGHT_NORMAL,
};
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_R8G8B8A8_UNORM;
use windows::Win32::Graphics::Dxgi::{IDXGIDevice, IDXGISurface};

use crate::config::{parse_color, OverlayConfig};

/// Brushes for the two drawn elements.
pub struct Brushes {
    /// Ellipse fill.
    pub fill: ID2D1SolidColorBrush,
    /// Overlay text.
    pub text: ID2D1SolidColorBrush,
}

pub(crate) fn color_f(rgba: [f32; 4]) -> D2D1_COLOR_F {
    D2D1_COLOR_F {
        r: rgba[0],
        g: rgba[1],
        b: rgba[2],
        a: rgba[3],
    }
}

/// Create the top-level D2D factory (single-threaded, debug info in debug
/// builds).
pub fn create_factory() -> Result<ID2D1Factory1> {
    let options = D2D1_FACTORY_OPTIONS {
        debugLevel: if cfg!(debug_assertions) {
            D2D1_DEBUG_LEVEL_INFORMATION
        } else {
            D2D1_DEBUG_LEVEL_NONE
        },
    };

    unsafe { D2D1CreateFactory(D2D1_FACTORY_TYPE_SINGLE_THREADED, Some(&options)) }
}

/// Create a D2D device and device context from the D3D device.
pub fn create_device_context(
    factory: &ID2D1Factory1,
    d3d_device: &ID3D11Device,
) -> Result<(ID2D1Device, ID2D1DeviceContext)> {
    unsafe {
        let dxgi_device: IDXGIDevice = d3d_device.cast()?;
        let d2d_device: ID2D1Device = factory.CreateDevice(&dxgi_device)?;
        let context = d2d_device.CreateDeviceContext(D2D1_DEVICE_CONTEXT_OPTIONS_NONE)?;

        Ok((d2d_device, context))
    }
}

/// Create the ellipse and text brushes from the configured colors.
pub fn create_brushes(context: &ID2D1DeviceContext, config: &OverlayConfig) -> Result<Brushes> {
    let render_target: ID2D1RenderTarget = context.cast()?;
    let props = D2D1_BRUSH_PROPERTIES {
        opacity: 1.0,
        transform: Matrix3x2::identity(),
    };

    let fill_color = color_f(parse_color(&config.ellipse_color));
    let text_color = color_f(parse_color(&config.text_color));

    unsafe {
        Ok(Brushes {
            fill: render_target.CreateSolidColorBrush(&fill_color, Some(&props))?,
            text: render_target.CreateSolidColorBrush(&text_color, Some(&props))?,
        })
    }
}

/// Create the DirectWrite text format from the configured font.
///
/// Alignment is left unset: text flows from the top-left of the target, over
/// the full client area.
pub fn create_text_format(config: &OverlayConfig) -> Result<IDWriteTextFormat> {
    unsafe {
        let factory: IDWriteFactory = DWriteCreateFactory(DWRITE_FACTORY_TYPE_SHARED)?;

        let font: Vec<u16> = config.font_family.encode_utf16().chain(once(0)).collect();
        let locale = [0u16];

        factory.CreateTextFormat(
            PCWSTR(font.as_ptr()),
            None,
            DWRITE_FONT_WEIGHT_NORMAL,
            DWRITE_FONT_STYLE_NORMAL,
            DWRITE_FONT_STRETCH_NORMAL,
            config.font_size,
            PCWSTR(locale.as_ptr()),
        )
    }
}

/// Wrap the swapchain's DXGI surface in a D2D bitmap usable as the context's
/// draw target. Recreated together with the swapchain.
pub fn create_target_bitmap(
    context: &ID2D1DeviceContext,
    surface: &IDXGISurface,
) -> Result<ID2D1Bitmap1> {
    let bitmap_props = D2D1_BITMAP_PROPERTIES1 {
        pixelFormat: D2D1_PIXEL_FORMAT {
            format: DXGI_FORMAT_R8G8B8A8_UNORM,
            alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
        },
        dpiX: 96.0,
        dpiY: 96.0,
        bitmapOptions: D2D1_BITMAP_OPTIONS_TARGET | D2D1_BITMAP_OPTIONS_CANNOT_DRAW,
        colorContext: std::mem::ManuallyDrop::new(None),
    };

    unsafe { context.CreateBitmapFromDxgiSurface(surface, Some(&bitmap_props)) }
}
