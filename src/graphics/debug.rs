//! The receiving end of `GL_DEBUG_OUTPUT`.
//!
//! The driver calls a plain `extern "system"` function with a user pointer. We hand it a pointer
//! to a boxed [`DebugSink`], so what actually handles messages is an ordinary Rust object. The
//! channel is advisory: messages are logged, never acted upon, and a compile error reported here
//! is reported again by the explicit status checks in the shader builder.

use std::ffi::{c_void, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::slice;

use gl::types::*;

/// How a debug message is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugKind {
    Error,
    Info,
}

impl DebugKind {
    pub fn classify(gltype: GLenum) -> Self {
        if gltype == gl::DEBUG_TYPE_ERROR {
            DebugKind::Error
        } else {
            DebugKind::Info
        }
    }
}

/// One message from the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugMessage<'a> {
    pub source: GLenum,
    pub kind: DebugKind,
    pub id: GLuint,
    pub severity: GLenum,
    pub text: &'a str,
}

/// Something that receives driver debug messages. Implementations may be called from inside
/// arbitrary driver calls, so they must not panic and must not call back into OpenGL.
pub trait DebugSink {
    fn message(&self, message: &DebugMessage<'_>);
}

pub fn source_name(source: GLenum) -> &'static str {
    match source {
        gl::DEBUG_SOURCE_API => "api",
        gl::DEBUG_SOURCE_WINDOW_SYSTEM => "window system",
        gl::DEBUG_SOURCE_SHADER_COMPILER => "shader compiler",
        gl::DEBUG_SOURCE_THIRD_PARTY => "third party",
        gl::DEBUG_SOURCE_APPLICATION => "application",
        _ => "other",
    }
}

pub fn severity_name(severity: GLenum) -> &'static str {
    match severity {
        gl::DEBUG_SEVERITY_HIGH => "high",
        gl::DEBUG_SEVERITY_MEDIUM => "medium",
        gl::DEBUG_SEVERITY_LOW => "low",
        gl::DEBUG_SEVERITY_NOTIFICATION => "notification",
        _ => "unknown",
    }
}

impl DebugMessage<'_> {
    /// `text [source, severity, #id]`
    pub fn describe(&self) -> String {
        format!(
            "{} [{}, {}, #{}]",
            self.text.trim_end(),
            source_name(self.source),
            severity_name(self.severity),
            self.id
        )
    }
}

/// Sends debug messages to the log: driver errors at ERROR, everything else at INFO.
#[derive(Debug, Default)]
pub struct LogSink;

impl DebugSink for LogSink {
    fn message(&self, message: &DebugMessage<'_>) {
        match message.kind {
            DebugKind::Error => log::error!("{}", message.describe()),
            DebugKind::Info => log::info!("{}", message.describe()),
        }
    }
}

/// Decodes the message payload. A negative length means the string is NUL-terminated.
unsafe fn message_text<'a>(message: *const GLchar, length: GLsizei) -> std::borrow::Cow<'a, str> {
    if message.is_null() {
        return "".into();
    }

    if length < 0 {
        CStr::from_ptr(message).to_string_lossy()
    } else {
        String::from_utf8_lossy(slice::from_raw_parts(message as *const u8, length as usize))
    }
}

/// Trampoline registered with `glDebugMessageCallback`. `user_param` must point at a live
/// `Box<dyn DebugSink>`.
pub extern "system" fn debug_callback(
    source: GLenum,
    gltype: GLenum,
    id: GLuint,
    severity: GLenum,
    length: GLsizei,
    message: *const GLchar,
    user_param: *mut c_void,
) {
    if user_param.is_null() {
        return;
    }

    // Unwinding into the driver is undefined behaviour
    let _ = panic::catch_unwind(AssertUnwindSafe(|| {
        let sink = unsafe { &*(user_param as *const Box<dyn DebugSink>) };
        let text = unsafe { message_text(message, length) };

        sink.message(&DebugMessage {
            source,
            kind: DebugKind::classify(gltype),
            id,
            severity,
            text: &text,
        });
    }));
}
