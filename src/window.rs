//! Window and context bootstrap.
//!
//! glutin owns the window, the event loop and the OpenGL context. The render loop doesn't see any
//! of that directly; it drives a [`Surface`], which [`GlWindow`] implements by pumping the event
//! loop once per frame.

use std::any::Any;
use std::ffi::c_void;
use std::panic;

use glutin::dpi::LogicalSize;
use glutin::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::platform::desktop::EventLoopExtDesktop;
#[cfg(any(target_os = "linux", target_os = "dragonfly", target_os = "freebsd", target_os = "netbsd", target_os = "openbsd"))]
use glutin::platform::unix::EventLoopExtUnix;
use glutin::window::WindowBuilder;
use glutin::{
    Api, ContextBuilder, ContextError, CreationError, GlProfile, GlRequest, PossiblyCurrent,
    WindowedContext,
};
use thiserror::Error;

use crate::interface::cli::Config;

/// Core profile version requested from the driver. macOS stops at 4.1, and only hands out
/// forward-compatible core contexts.
#[cfg(target_os = "macos")]
pub const CONTEXT_VERSION: (u8, u8) = (4, 1);
#[cfg(not(target_os = "macos"))]
pub const CONTEXT_VERSION: (u8, u8) = (4, 2);

#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to initialize the windowing system: {0}")]
    Windowing(String),
    #[error("failed to make the OpenGL context current: {0}")]
    MakeCurrent(ContextError),
    #[error("failed to create window: {0}")]
    CreateWindow(CreationError),
}

impl InitError {
    pub fn code(&self) -> i32 {
        match self {
            InitError::Windowing(_) => 2,
            InitError::CreateWindow(_) => 3,
            InitError::MakeCurrent(_) => 4,
        }
    }
}

/// Logs a windowing failure. Only ever logs; bootstrap calls this before returning the error.
pub fn on_windowing_error(code: i32, description: &str) {
    log::error!("Windowing error ({}) -> {}", code, description);
}

fn report(err: InitError) -> InitError {
    on_windowing_error(err.code(), &err.to_string());
    err
}

/// What the render loop needs from a window.
pub trait Surface {
    /// Whether a close has been requested, by the OS or by [`set_should_close`](Self::set_should_close).
    fn should_close(&self) -> bool;
    fn set_should_close(&mut self, value: bool);
    fn escape_pressed(&self) -> bool;
    /// Presents the frame. Per-frame, so failures are logged rather than returned.
    fn swap_buffers(&mut self);
    /// Handles pending events without blocking. A framebuffer resize is forwarded to `on_resize`
    /// with the new size in physical pixels.
    fn poll_events(&mut self, on_resize: &mut dyn FnMut(u32, u32));
    /// Current framebuffer size in physical pixels.
    fn framebuffer_size(&self) -> (u32, u32);
    /// Destroys the window and its context.
    fn terminate(self);
}

pub struct GlWindow {
    event_loop: EventLoop<()>,
    context: WindowedContext<PossiblyCurrent>,
    should_close: bool,
    escape_down: bool,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("event loop creation panicked")
    }
}

/// Opens the connection to the display server. X11 reports failure as an error; the other
/// backends only know how to panic, so that is caught and turned into one.
fn create_event_loop() -> Result<EventLoop<()>, InitError> {
    #[cfg(any(target_os = "linux", target_os = "dragonfly", target_os = "freebsd", target_os = "netbsd", target_os = "openbsd"))]
    {
        if std::env::var_os("WAYLAND_DISPLAY").is_none() {
            return EventLoop::new_x11().map_err(|e| InitError::Windowing(e.to_string()));
        }
    }

    panic::catch_unwind(EventLoop::<()>::new)
        .map_err(|payload| InitError::Windowing(panic_message(&*payload)))
}

/// Creates the window, requests a core profile context on it and makes that context current on
/// the calling thread.
pub fn initialize(config: &Config) -> Result<GlWindow, InitError> {
    let event_loop = create_event_loop().map_err(report)?;

    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64));

    let (major, minor) = CONTEXT_VERSION;
    if cfg!(target_os = "macos") {
        log::debug!("Requesting a forward-compatible core context");
    }

    let context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, (major, minor)))
        .with_gl_profile(GlProfile::Core)
        .with_gl_debug_flag(true)
        .with_vsync(config.vsync)
        .build_windowed(window, &event_loop)
        .map_err(|e| report(InitError::CreateWindow(e)))?;

    let context = unsafe { context.make_current() }
        .map_err(|(_, e)| report(InitError::MakeCurrent(e)))?;

    log::debug!(
        "Created {}x{} window \"{}\" with an OpenGL {}.{} core context",
        config.width, config.height, config.title, major, minor
    );

    Ok(GlWindow {
        event_loop,
        context,
        should_close: false,
        escape_down: false,
    })
}

impl GlWindow {
    pub fn get_proc_address(&self, symbol: &str) -> *const c_void {
        self.context.get_proc_address(symbol) as *const c_void
    }
}

impl Surface for GlWindow {
    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, value: bool) {
        self.should_close = value;
    }

    fn escape_pressed(&self) -> bool {
        self.escape_down
    }

    fn swap_buffers(&mut self) {
        if let Err(e) = self.context.swap_buffers() {
            log::error!("Failed to swap buffers: {}", e);
        }
    }

    fn poll_events(&mut self, on_resize: &mut dyn FnMut(u32, u32)) {
        let GlWindow { event_loop, context, should_close, escape_down } = self;
        let mut resized = None;

        event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Poll;

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => *should_close = true,
                    WindowEvent::Resized(size) => resized = Some(size),
                    WindowEvent::KeyboardInput {
                        input: KeyboardInput {
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            state,
                            ..
                        },
                        ..
                    } => *escape_down = state == ElementState::Pressed,
                    _ => {}
                },
                // Everything queued has been handled; hand control back to the render loop
                Event::MainEventsCleared => *control_flow = ControlFlow::Exit,
                _ => {}
            }
        });

        if let Some(size) = resized {
            context.resize(size);
            on_resize(size.width, size.height);
        }
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.context.window().inner_size();
        (size.width, size.height)
    }

    fn terminate(self) {
        let GlWindow { event_loop, context, .. } = self;
        drop(context);
        drop(event_loop);
        log::debug!("Window terminated");
    }
}
