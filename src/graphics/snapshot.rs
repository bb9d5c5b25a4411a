//! Debug snapshot of the shared texture.
//!
//! After a successful present, the frame is copied through a CPU-readable
//! staging texture and encoded to disk with the `image` crate. The write is a
//! diagnostic side effect, not persisted application state; callers log
//! failures and move on.

use std::path::Path;

use windows::Win32::Graphics::Direct3D11::{
    ID3D11Device, ID3D11DeviceContext, ID3D11Texture2D, D3D11_CPU_ACCESS_READ,
    D3D11_MAPPED_SUBRESOURCE, D3D11_MAP_READ, D3D11_TEXTURE2D_DESC, D3D11_USAGE_STAGING,
};
use windows::Win32::Graphics::Dxgi::Common::{
    DXGI_FORMAT_B8G8R8A8_UNORM, DXGI_FORMAT_R8G8B8A8_UNORM, DXGI_SAMPLE_DESC,
};

use crate::error::{OverlayError, OverlayResult};

/// Copy `texture` into CPU memory and write it to `path`.
///
/// The encoding is chosen from the path's extension (BMP by default). The
/// file is overwritten every frame.
pub fn save_texture(
    device: &ID3D11Device,
    context: &ID3D11DeviceContext,
    texture: &ID3D11Texture2D,
    path: &Path,
) -> OverlayResult<()> {
    let mut desc = D3D11_TEXTURE2D_DESC::default();
    unsafe { texture.GetDesc(&mut desc) };

    let pixels = read_back(device, context, texture, &desc)?;
    image::save_buffer(
        path,
        &pixels,
        desc.Width,
        desc.Height,
        image::ExtendedColorType::Rgba8,
    )?;

    log::trace!("frame snapshot written to {}", path.display());
    Ok(())
}

/// Copy the GPU texture through a staging texture and return tightly packed
/// RGBA rows.
fn read_back(
    device: &ID3D11Device,
    context: &ID3D11DeviceContext,
    texture: &ID3D11Texture2D,
    desc: &D3D11_TEXTURE2D_DESC,
) -> OverlayResult<Vec<u8>> {
    let staging_desc = D3D11_TEXTURE2D_DESC {
        Width: desc.Width,
        Height: desc.Height,
        MipLevels: 1,
        ArraySize: 1,
        Format: desc.Format,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        Usage: D3D11_USAGE_STAGING,
        BindFlags: 0,
        CPUAccessFlags: D3D11_CPU_ACCESS_READ.0 as u32,
        MiscFlags: 0,
    };

    let mut staging: Option<ID3D11Texture2D> = None;
    unsafe { device.CreateTexture2D(&staging_desc, None, Some(&mut staging)) }
        .map_err(|e| OverlayError::resource("staging texture", e))?;
    let staging =
        staging.ok_or_else(|| OverlayError::Snapshot("staging texture unavailable".to_string()))?;

    unsafe { context.CopyResource(&staging, texture) };

    let mut mapped = D3D11_MAPPED_SUBRESOURCE::default();
    unsafe { context.Map(&staging, 0, D3D11_MAP_READ, 0, Some(&mut mapped)) }
        .map_err(|e| OverlayError::resource("staging map", e))?;

    let width = desc.Width as usize;
    let height = desc.Height as usize;
    let mut pixels = vec![0u8; width * height * 4];

    // Rows in the mapped texture are RowPitch apart, which may exceed the
    // tightly packed width.
    for y in 0..height {
        let src = unsafe {
            std::slice::from_raw_parts(
                (mapped.pData as *const u8).add(mapped.RowPitch as usize * y),
                width * 4,
            )
        };
        pixels[y * width * 4..(y + 1) * width * 4].copy_from_slice(src);
    }

    unsafe { context.Unmap(&staging, 0) };

    match desc.Format {
        DXGI_FORMAT_R8G8B8A8_UNORM => {}
        DXGI_FORMAT_B8G8R8A8_UNORM => {
            for chunk in pixels.chunks_exact_mut(4) {
                chunk.swap(0, 2);
            }
        }
        format => {
            return Err(OverlayError::Snapshot(format!(
                "unsupported texture format {:?}",
                format
            )));
        }
    }

    Ok(pixels)
}
