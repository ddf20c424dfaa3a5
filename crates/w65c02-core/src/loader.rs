//! Memory image loading.

use std::fs;
use std::path::Path;

use crate::config::CoreConfig;
use crate::error::LoadError;
use crate::memory::ADDRESS_SPACE_BYTES;
use crate::MachineState;

/// Copies `bytes` into memory starting at `load_address`.
///
/// Loading is a host action, not a bus cycle: nothing is traced and the
/// dirty flag is left alone. Images may not wrap past `$FFFF`.
///
/// # Errors
///
/// Returns [`LoadError::Empty`] for an empty image and
/// [`LoadError::TooLarge`] when it runs past the top of memory.
pub fn load_image(state: &mut MachineState, bytes: &[u8], load_address: u16) -> Result<(), LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::Empty);
    }

    let start = usize::from(load_address);
    if bytes.len() > ADDRESS_SPACE_BYTES - start {
        return Err(LoadError::TooLarge {
            len: bytes.len(),
            load_address,
        });
    }

    state.memory[start..start + bytes.len()].copy_from_slice(bytes);
    tracing::debug!(len = bytes.len(), load_address, "image loaded");
    Ok(())
}

/// Reads an image file and loads it at `load_address`.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be read, otherwise the
/// errors of [`load_image`].
pub fn load_image_file(
    state: &mut MachineState,
    path: &Path,
    load_address: u16,
) -> Result<(), LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_image(state, &bytes, load_address)
}

/// Builds a reset machine from an image according to `config`.
///
/// The image is loaded first so a reset vector inside it takes effect.
///
/// # Errors
///
/// Propagates [`load_image`] failures.
pub fn boot_image(bytes: &[u8], config: &CoreConfig) -> Result<MachineState, LoadError> {
    let mut state = MachineState::default();
    load_image(&mut state, bytes, config.load_address)?;
    state.reset();
    let pc = config.entry_pc(state.regs.pc());
    state.regs.set_pc(pc);
    state.pc_at_fetch = pc;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{boot_image, load_image, load_image_file};
    use crate::config::{CoreConfig, EntryPoint};
    use crate::error::LoadError;
    use crate::MachineState;

    #[test]
    fn image_lands_at_load_address_without_dirtying() {
        let mut state = MachineState::default();
        load_image(&mut state, &[1, 2, 3], 0x0200).unwrap();
        assert_eq!(&state.memory[0x0200..0x0203], &[1, 2, 3]);
        assert!(!state.is_dirty());
    }

    #[test]
    fn full_size_image_fits_at_zero() {
        let mut state = MachineState::default();
        let image = vec![0xEA; 0x10000];
        load_image(&mut state, &image, 0x0000).unwrap();
        assert_eq!(state.memory[0xFFFF], 0xEA);
    }

    #[rstest]
    #[case(0xFFFF, 2)]
    #[case(0x8000, 0x8001)]
    fn oversized_images_are_rejected(#[case] load_address: u16, #[case] len: usize) {
        let mut state = MachineState::default();
        let err = load_image(&mut state, &vec![0; len], load_address).unwrap_err();
        assert!(matches!(err, LoadError::TooLarge { len: l, load_address: a } if l == len && a == load_address));
    }

    #[test]
    fn empty_image_is_rejected() {
        let mut state = MachineState::default();
        assert!(matches!(
            load_image(&mut state, &[], 0),
            Err(LoadError::Empty)
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let mut state = MachineState::default();
        let err = load_image_file(&mut state, "/nonexistent/image.bin".as_ref(), 0).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/image.bin"));
    }

    #[test]
    fn boot_uses_reset_vector_from_image_unless_overridden() {
        let mut image = vec![0; 0x10000];
        image[0xFFFC] = 0x00;
        image[0xFFFD] = 0xC0;

        let state = boot_image(&image, &CoreConfig::default()).unwrap();
        assert_eq!(state.regs.pc(), 0xC000);
        assert_eq!(state.regs.sp(), 0xFD);

        let config = CoreConfig {
            entry: EntryPoint::Address(0x0400),
            ..CoreConfig::default()
        };
        let state = boot_image(&image, &config).unwrap();
        assert_eq!(state.regs.pc(), 0x0400);
    }
}
