//! Raw sample decoding for joystick device files.

use ::std::fs::File;
use ::std::io::{self, Read};

use crate::input::joystick::JoystickSample;

const JS_EVENT_BUTTON: u8 = 0x01;
const JS_EVENT_AXIS: u8 = 0x02;
const JS_EVENT_INIT: u8 = 0x80;

/// Size of one `struct js_event`.
pub const JS_EVENT_SIZE: usize = 8;

/// Decodes one `struct js_event`: a `u32` timestamp, an `i16` value, the
/// type byte and the button or axis number, in native byte order.
pub fn decode_js_event(raw: &[u8; JS_EVENT_SIZE]) -> Option<JoystickSample> {
    let value = i16::from_ne_bytes([raw[4], raw[5]]);
    let kind = raw[6];
    let number = usize::from(raw[7]);

    let sample = match kind & !JS_EVENT_INIT {
        JS_EVENT_BUTTON => JoystickSample::button(number, i32::from(value)),
        JS_EVENT_AXIS => JoystickSample::axis(number, i32::from(value)),
        _ => return None,
    };
    Some(if kind & JS_EVENT_INIT != 0 {
        sample.init()
    } else {
        sample
    })
}

/// Reads the samples currently queued on a non-blocking device file.
///
/// Returns the samples read before the queue ran dry. An error is only
/// returned if nothing could be read, e.g. once the device is unplugged.
pub fn read_samples(file: &mut File) -> io::Result<Vec<JoystickSample>> {
    let mut samples = Vec::new();
    let mut raw = [0u8; JS_EVENT_SIZE];
    loop {
        match file.read(&mut raw) {
            Ok(JS_EVENT_SIZE) => samples.extend(decode_js_event(&raw)),
            Ok(0) => break,
            Ok(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "truncated joystick event",
                ))
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) if samples.is_empty() => return Err(err),
            Err(_) => break,
        }
    }
    Ok(samples)
}
