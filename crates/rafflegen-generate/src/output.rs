use std::ffi::OsString;
use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::errors::GenerationError;

/// First free path among `out.lua`, `out_1.lua`, `out_2.lua`, ...
///
/// Existing files are never chosen, so generation never overwrites.
pub fn unique_output_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path.file_stem().unwrap_or_default().to_os_string();
    let extension = path.extension().map(|ext| ext.to_os_string());

    let mut counter = 1_u64;
    loop {
        let mut name = OsString::from(&stem);
        name.push(format!("_{counter}"));
        if let Some(extension) = &extension {
            name.push(".");
            name.push(extension);
        }
        let candidate = path.with_file_name(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Write through a fresh sibling temp file and rename it into place.
///
/// The temp name carries a uuid and is opened with `create_new`, so no
/// existing file is touched. It is removed again if any step fails.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<(), GenerationError> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent).map_err(|err| GenerationError::io(parent, err))?;
    }

    let tmp_path = temp_path(path)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|err| GenerationError::io(&tmp_path, err))?;

    let written = file
        .write_all(data)
        .and_then(|()| file.sync_all())
        .map_err(|err| GenerationError::io(&tmp_path, err));
    drop(file);
    let renamed = written
        .and_then(|()| std::fs::rename(&tmp_path, path).map_err(|err| GenerationError::io(path, err)));
    if let Err(err) = renamed {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err);
    }

    if let Some(parent) = parent {
        sync_dir(parent).map_err(|err| GenerationError::io(parent, err))?;
    }
    Ok(())
}

fn temp_path(path: &Path) -> Result<PathBuf, GenerationError> {
    let file_name = path.file_name().ok_or_else(|| {
        GenerationError::InvalidOptions(format!("invalid output path: {}", path.display()))
    })?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(format!(".{}.tmp", uuid::Uuid::new_v4()));
    Ok(path.with_file_name(tmp_name))
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rafflegen_output_{label}_{}",
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn free_path_is_used_as_is() {
        let dir = temp_dir("free");
        let path = dir.join("out.lua");
        assert_eq!(unique_output_path(&path), path);
    }

    #[test]
    fn existing_paths_get_numbered_suffixes() {
        let dir = temp_dir("collide");
        let path = dir.join("out.lua");
        std::fs::write(&path, "first").expect("write out.lua");
        assert_eq!(unique_output_path(&path), dir.join("out_1.lua"));

        std::fs::write(dir.join("out_1.lua"), "second").expect("write out_1.lua");
        assert_eq!(unique_output_path(&path), dir.join("out_2.lua"));

        assert_eq!(std::fs::read_to_string(&path).expect("read"), "first");
    }

    #[test]
    fn suffix_goes_before_last_extension_only() {
        let dir = temp_dir("ext");
        let dotted = dir.join("data.tar.lua");
        std::fs::write(&dotted, "").expect("write");
        assert_eq!(unique_output_path(&dotted), dir.join("data.tar_1.lua"));

        let bare = dir.join("fixture");
        std::fs::write(&bare, "").expect("write");
        assert_eq!(unique_output_path(&bare), dir.join("fixture_1"));
    }

    #[test]
    fn atomic_write_creates_parent_and_leaves_no_temp_file() {
        let dir = temp_dir("atomic");
        let path = dir.join("nested").join("out.lua");
        write_bytes_atomic(&path, b"Saved =\n{}\n").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "Saved =\n{}\n");
        let leftovers: Vec<_> = std::fs::read_dir(dir.join("nested"))
            .expect("list dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    }

    #[test]
    fn atomic_write_leaves_existing_tmp_file_alone() {
        let dir = temp_dir("tmp_kept");
        let path = dir.join("out.lua");
        let user_tmp = dir.join("out.lua.tmp");
        std::fs::write(&user_tmp, "user data").expect("write user tmp");

        write_bytes_atomic(&path, b"generated").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "generated");
        assert_eq!(std::fs::read_to_string(&user_tmp).expect("read tmp"), "user data");
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = temp_dir("rename_fail");
        let target = dir.join("taken");
        std::fs::create_dir_all(target.join("child")).expect("create blocking dir");

        write_bytes_atomic(&target, b"data").expect_err("rename onto non-empty dir");
        let leftovers: Vec<_> = std::fs::read_dir(&dir)
            .expect("list dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    }
}
