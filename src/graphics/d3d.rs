//! Direct3D 11 device and swap chain creation.
//!
//! The device is the anchor of the resource chain: Direct2D renders through
//! it, the swapchain presents from it, and the back buffer it exposes is the
//! texture shared with the overlay compositor.

use windows::core::{Interface, Result};
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::Graphics::Direct3D::{
    D3D_DRIVER_TYPE_HARDWARE, D3D_FEATURE_LEVEL, D3D_FEATURE_LEVEL_11_1,
};
use windows::Win32::Graphics::Direct3D11::{
    D3D11CreateDevice, ID3D11Device, ID3D11DeviceContext, ID3D11Texture2D,
    D3D11_CREATE_DEVICE_BGRA_SUPPORT, D3D11_CREATE_DEVICE_DEBUG, D3D11_SDK_VERSION,
};
use windows::Win32::Graphics::Dxgi::Common::{
    DXGI_ALPHA_MODE_IGNORE, DXGI_FORMAT_R8G8B8A8_UNORM, DXGI_SAMPLE_DESC,
};
use windows::Win32::Graphics::Dxgi::{
    CreateDXGIFactory2, IDXGIDevice, IDXGIFactory2, IDXGISurface, IDXGISwapChain1,
    DXGI_CREATE_FACTORY_FLAGS, DXGI_SCALING_STRETCH, DXGI_SWAP_CHAIN_DESC1,
    DXGI_SWAP_EFFECT_DISCARD, DXGI_USAGE_RENDER_TARGET_OUTPUT,
};
use windows::Win32::UI::WindowsAndMessaging::GetClientRect;

/// Create a hardware D3D11 device at feature level 11.1.
///
/// BGRA support is required for Direct2D interop; the debug layer is enabled
/// in debug builds only.
pub fn create_device() -> Result<(ID3D11Device, ID3D11DeviceContext)> {
    let mut device: Option<ID3D11Device> = None;
    let mut context: Option<ID3D11DeviceContext> = None;
    let mut level = D3D_FEATURE_LEVEL::default();

    let mut flags = D3D11_CREATE_DEVICE_BGRA_SUPPORT;
    if cfg!(debug_assertions) {
        flags |= D3D11_CREATE_DEVICE_DEBUG;
    }

    unsafe {
        D3D11CreateDevice(
            None,
            D3D_DRIVER_TYPE_HARDWARE,
            None,
            flags,
            Some(&[D3D_FEATURE_LEVEL_11_1]),
            D3D11_SDK_VERSION,
            Some(&mut device),
            Some(&mut level),
            Some(&mut context),
        )?;
    }

    let device = device.ok_or_else(windows::core::Error::from_win32)?;
    let context = context.ok_or_else(windows::core::Error::from_win32)?;
    Ok((device, context))
}

/// Query a window's current client-area size in pixels.
///
/// A minimized window reports 0x0; dimensions are clamped to 1x1 so swapchain
/// creation always receives a valid size.
pub fn window_client_size(hwnd: HWND) -> Result<(u32, u32)> {
    let mut rect = RECT::default();
    unsafe { GetClientRect(hwnd, &mut rect)? };

    let width = (rect.right - rect.left).max(1) as u32;
    let height = (rect.bottom - rect.top).max(1) as u32;
    Ok((width, height))
}

/// Create a windowed swap chain sized to the client area.
///
/// One buffer, blt-model presentation: after `Present` the back buffer keeps
/// its contents, which the overlay compositor reads until the next frame.
pub fn create_swap_chain(
    device: &ID3D11Device,
    hwnd: HWND,
    width: u32,
    height: u32,
) -> Result<IDXGISwapChain1> {
    unsafe {
        let dxgi_device: IDXGIDevice = device.cast()?;
        let dxgi_factory: IDXGIFactory2 = CreateDXGIFactory2(DXGI_CREATE_FACTORY_FLAGS(0))?;

        let desc = DXGI_SWAP_CHAIN_DESC1 {
            Width: width,
            Height: height,
            Format: DXGI_FORMAT_R8G8B8A8_UNORM,
            Stereo: false.into(),
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: 1,
            Scaling: DXGI_SCALING_STRETCH,
            SwapEffect: DXGI_SWAP_EFFECT_DISCARD,
            AlphaMode: DXGI_ALPHA_MODE_IGNORE,
            Flags: 0,
        };

        dxgi_factory.CreateSwapChainForHwnd(&dxgi_device, hwnd, &desc, None, None)
    }
}

/// The swapchain's back buffer as a D3D texture (the shared surface handed to
/// the overlay compositor).
pub fn back_buffer_texture(swap_chain: &IDXGISwapChain1) -> Result<ID3D11Texture2D> {
    unsafe { swap_chain.GetBuffer(0) }
}

/// The same back buffer as a DXGI surface, for binding the Direct2D target.
pub fn back_buffer_surface(swap_chain: &IDXGISwapChain1) -> Result<IDXGISurface> {
    unsafe { swap_chain.GetBuffer(0) }
}
