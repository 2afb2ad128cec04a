//! Free-space preflight for the download destination.

use std::path::Path;

use sysinfo::Disks;
use tracing::{debug, warn};

use prowl_core::InstallError;

/// Probe returning the free bytes on the volume holding `path`, or
/// `None` when the volume cannot be identified.
pub type FreeSpaceProbe = Box<dyn Fn(&Path) -> Option<u64> + Send + Sync>;

/// Query the OS for free space on the volume containing `path`.
///
/// Matches the disk whose mount point is the longest prefix of the
/// path, so `/home` wins over `/` for paths under it.
pub fn system_free_space(path: &Path) -> Option<u64> {
    let disks = Disks::new_with_refreshed_list();
    disks
        .list()
        .iter()
        .filter(|disk| path.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(sysinfo::Disk::available_space)
}

/// Verify the volume has room for `required_bytes` more.
///
/// An unidentifiable volume logs a warning and passes: the probe is a
/// guard against a predictable mid-transfer failure, not a gate that
/// should itself block installs on exotic filesystems. A confirmed
/// shortfall fails before any byte is written.
pub fn check_free_space(
    probe: &FreeSpaceProbe,
    dir: &Path,
    required_bytes: u64,
) -> Result<(), InstallError> {
    match probe(dir) {
        Some(available) if available < required_bytes => {
            Err(InstallError::insufficient_disk_space(
                required_bytes,
                available,
            ))
        }
        Some(available) => {
            debug!(
                dir = %dir.display(),
                required_bytes,
                available,
                "disk preflight passed"
            );
            Ok(())
        }
        None => {
            warn!(dir = %dir.display(), "could not determine free space; skipping preflight");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixed_probe(value: Option<u64>) -> FreeSpaceProbe {
        Box::new(move |_| value)
    }

    #[test]
    fn test_sufficient_space_passes() {
        let probe = fixed_probe(Some(10_000));
        assert!(check_free_space(&probe, &PathBuf::from("/tmp"), 5_000).is_ok());
    }

    #[test]
    fn test_insufficient_space_fails_with_code() {
        let probe = fixed_probe(Some(1_000));
        let err = check_free_space(&probe, &PathBuf::from("/tmp"), 5_000_000_000).unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_DISK_SPACE");
    }

    #[test]
    fn test_unknown_volume_skips_check() {
        let probe = fixed_probe(None);
        assert!(check_free_space(&probe, &PathBuf::from("/nowhere"), u64::MAX).is_ok());
    }
}
