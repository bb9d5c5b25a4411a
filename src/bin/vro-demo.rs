//! Minimal window driving the overlay surface.
//!
//! Opens a plain Win32 window, draws the ellipse-plus-caption overlay into it
//! every frame, and hands the shared texture to a [`NullBridge`] (no headset
//! required). Escape or closing the window exits.

#[cfg(windows)]
fn main() {
    env_logger::init();

    if let Err(err) = demo::run() {
        log::error!("demo failed: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(windows))]
fn main() {
    eprintln!("vro-demo renders through Direct3D and only runs on Windows");
}

#[cfg(windows)]
mod demo {
    use std::time::Duration;

    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::UI::WindowsAndMessaging::{
        CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, LoadCursorW,
        PeekMessageW, PostQuitMessage, RegisterClassW, TranslateMessage, CS_HREDRAW, CS_VREDRAW,
        CW_USEDEFAULT, IDC_ARROW, MSG, PM_REMOVE, WINDOW_EX_STYLE, WM_DESTROY, WM_KEYDOWN,
        WM_QUIT, WNDCLASSW, WS_OVERLAPPEDWINDOW, WS_VISIBLE,
    };

    use vroverlay::{NullBridge, OverlayConfig, OverlayResult, SurfaceManager};

    const CLASS_NAME: &str = "VroDemoWindow";
    const CAPTION: &str = "Hello from the shared surface";

    unsafe extern "system" fn wnd_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match msg {
            WM_KEYDOWN => {
                if wparam.0 as u32 == 0x1B {
                    // ESC
                    let _ = DestroyWindow(hwnd);
                }
                LRESULT(0)
            }
            WM_DESTROY => {
                PostQuitMessage(0);
                LRESULT(0)
            }
            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }

    fn create_window() -> windows::core::Result<HWND> {
        unsafe {
            let hinstance = GetModuleHandleW(None)?;

            let class_name: Vec<u16> = CLASS_NAME
                .encode_utf16()
                .chain(std::iter::once(0))
                .collect();

            let wc = WNDCLASSW {
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(wnd_proc),
                hInstance: hinstance.into(),
                lpszClassName: PCWSTR(class_name.as_ptr()),
                hCursor: LoadCursorW(None, IDC_ARROW)?,
                ..Default::default()
            };

            let atom = RegisterClassW(&wc);
            if atom == 0 {
                return Err(windows::core::Error::from_win32());
            }

            let title: Vec<u16> = "vroverlay demo\0".encode_utf16().collect();
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                PCWSTR(class_name.as_ptr()),
                PCWSTR(title.as_ptr()),
                WS_OVERLAPPEDWINDOW | WS_VISIBLE,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                800,
                600,
                None,
                None,
                hinstance,
                None,
            )
        }
    }

    pub fn run() -> OverlayResult<()> {
        let hwnd = create_window()
            .map_err(|e| vroverlay::OverlayError::Setup(format!("window creation: {e}")))?;

        let mut surface = SurfaceManager::new(OverlayConfig::default())?;
        let mut bridge = NullBridge;

        let mut msg = MSG::default();
        'running: loop {
            unsafe {
                while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                    if msg.message == WM_QUIT {
                        break 'running;
                    }
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }

            // A failed frame discards its resources; the next iteration
            // rebuilds them.
            if let Err(err) = surface.draw(hwnd, &mut bridge, CAPTION) {
                log::warn!("frame skipped: {err}");
            }

            std::thread::sleep(Duration::from_millis(16));
        }

        surface.shutdown();
        Ok(())
    }
}
