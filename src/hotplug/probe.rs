//! Probing device files for joysticks.

use ::std::fs::File;
use ::std::io;
use ::std::path::Path;

/// What a probe found out about a joystick device file.
#[derive(Debug)]
pub struct ProbedJoystick {
    pub name: String,
    /// The filesystem device id of the file. Two paths with the same id are
    /// the same device.
    pub rdev: u64,
    /// Button codes, indexed by the button numbers of the raw samples.
    pub buttons: Vec<u16>,
    /// Axis codes, indexed by the axis numbers of the raw samples.
    pub axes: Vec<u16>,
    /// The opened device, to read raw samples from. Probes which only
    /// describe a device leave this empty.
    pub file: Option<File>,
}

/// Opens and inspects candidate device files.
pub trait Probe {
    /// Fails if the file can't be opened (yet) or isn't a joystick.
    fn probe(&self, path: &Path) -> io::Result<ProbedJoystick>;
}

/// Probes device files of the Linux joystick API (`/dev/input/js<N>`).
#[cfg(target_os = "linux")]
#[derive(Clone, Copy, Debug, Default)]
pub struct JsProbe;

#[cfg(target_os = "linux")]
mod js {
    use ::std::fs::{File, OpenOptions};
    use ::std::io;
    use ::std::os::unix::fs::{MetadataExt, OpenOptionsExt};
    use ::std::os::unix::io::AsRawFd;
    use ::std::path::Path;

    use super::{JsProbe, Probe, ProbedJoystick};

    const IOC_READ: u64 = 2;
    const ABS_CNT: usize = 0x40;
    const BTN_MAP_LEN: usize = 0x2ff - 0x100 + 1;
    const NAME_LEN: usize = 128;

    const fn ior(nr: u64, size: usize) -> u64 {
        (IOC_READ << 30) | ((size as u64) << 16) | ((b'j' as u64) << 8) | nr
    }

    const JSIOCGAXES: u64 = ior(0x11, 1);
    const JSIOCGBUTTONS: u64 = ior(0x12, 1);
    const JSIOCGNAME: u64 = ior(0x13, NAME_LEN);
    const JSIOCGAXMAP: u64 = ior(0x32, ABS_CNT);
    const JSIOCGBTNMAP: u64 = ior(0x34, BTN_MAP_LEN * 2);

    /// Runs a reading ioctl into `out`.
    fn read_ioctl<T>(file: &File, request: u64, out: &mut T) -> io::Result<()> {
        // SAFETY: every request above writes at most `size_of::<T>()` bytes,
        // the size encoded in the request number.
        let res = unsafe { ::libc::ioctl(file.as_raw_fd(), request as _, out as *mut T) };
        if res < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn open(path: &Path) -> io::Result<File> {
        let open = |write| {
            OpenOptions::new()
                .read(true)
                .write(write)
                .custom_flags(::libc::O_NONBLOCK)
                .open(path)
        };
        open(true).or_else(|_| open(false))
    }

    impl Probe for JsProbe {
        fn probe(&self, path: &Path) -> io::Result<ProbedJoystick> {
            let file = open(path)?;
            let rdev = file.metadata()?.rdev();

            let mut name = [0u8; NAME_LEN];
            read_ioctl(&file, JSIOCGNAME, &mut name)?;
            let len = name.iter().position(|b| *b == 0).unwrap_or(NAME_LEN);
            let name = String::from_utf8_lossy(&name[..len]).into_owned();

            let mut axis_count = 0u8;
            let mut button_count = 0u8;
            read_ioctl(&file, JSIOCGAXES, &mut axis_count)?;
            read_ioctl(&file, JSIOCGBUTTONS, &mut button_count)?;
            if axis_count == 0 || button_count == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "joystick without axes or buttons",
                ));
            }

            let mut axis_map = [0u8; ABS_CNT];
            read_ioctl(&file, JSIOCGAXMAP, &mut axis_map)?;
            let mut button_map = [0u16; BTN_MAP_LEN];
            read_ioctl(&file, JSIOCGBTNMAP, &mut button_map)?;

            Ok(ProbedJoystick {
                name,
                rdev,
                buttons: button_map[..usize::from(button_count).min(BTN_MAP_LEN)].to_vec(),
                axes: axis_map[..usize::from(axis_count).min(ABS_CNT)]
                    .iter()
                    .map(|a| u16::from(*a))
                    .collect(),
                file: Some(file),
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        use ::pretty_assertions::assert_eq;

        /// Request numbers as spelled out in `linux/joystick.h`.
        #[test]
        fn test_request_numbers() {
            assert_eq!(JSIOCGAXES, 0x8001_6a11);
            assert_eq!(JSIOCGBUTTONS, 0x8001_6a12);
            assert_eq!(JSIOCGAXMAP, 0x8040_6a32);
            assert_eq!(JSIOCGBTNMAP, 0x8400_6a34);
        }

        #[test]
        fn test_probe_regular_file() {
            let file = ::tempfile::NamedTempFile::new().unwrap();
            assert!(JsProbe.probe(file.path()).is_err());
        }
    }
}
