//! Source RPM unpacking with `rpm2cpio | cpio`

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::ports::{ToolInvocation, ToolRunner};
use crate::error::ReviewError;

/// Extract a source RPM into `dest`, creating it if needed
pub fn unpack_srpm(tools: &dyn ToolRunner, srpm: &Path, dest: &Path) -> Result<(), ReviewError> {
    fs::create_dir_all(dest)?;
    let invocation = ToolInvocation::new("sh")
        .args(["-c", "rpm2cpio \"$1\" | cpio -imd --quiet", "sh"])
        .path_arg(srpm)
        .current_dir(dest);
    tools.run_checked(&invocation)?;
    Ok(())
}

/// The spec file inside an unpacked source RPM
pub fn find_spec(dir: &Path) -> Result<PathBuf, ReviewError> {
    let mut specs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "spec"))
        .collect();
    specs.sort();
    match specs.len() {
        0 => Err(ReviewError::Source(format!("no spec file in {}", dir.display()))),
        1 => Ok(specs.remove(0)),
        n => Err(ReviewError::Source(format!("{n} spec files in {}", dir.display()))),
    }
}
