use std::path::{Path, PathBuf};

/// First free name in the sequence `base`, `stem1.ext`, `stem2.ext`, ...
///
/// `merged.log` → `merged1.log` → `merged2.log`. Names without an extension
/// get the counter appended: `merged` → `merged1`.
pub fn unique_path(base: &Path) -> PathBuf {
    if !base.exists() {
        return base.to_path_buf();
    }

    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = base.extension().map(|e| e.to_string_lossy().into_owned());

    (1u64..)
        .map(|n| {
            let name = match &ext {
                Some(ext) => format!("{stem}{n}.{ext}"),
                None => format!("{stem}{n}"),
            };
            base.with_file_name(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| base.to_path_buf())
}

/// `<prefix>.log`, made unique.
pub fn output_path(prefix: &str) -> PathBuf {
    unique_path(Path::new(&format!("{prefix}.log")))
}
