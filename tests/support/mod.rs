use std::fs;
use std::path::Path;

/// Write one module directory under `root` with an entry file holding the
/// given header block.
pub fn write_module(root: &Path, dir: &str, header: &str) {
    let module_dir = root.join(dir);
    fs::create_dir_all(&module_dir).expect("create module dir");
    fs::write(module_dir.join(format!("{dir}.mod")), header).expect("write entry file");
}

/// Build a header block in the shape real module entry files use.
pub fn header(name: &str, depends: &[&str], provides: &[&str]) -> String {
    let mut out = format!("# Module Name: {name}\n# Version: 1.0\n");
    if !depends.is_empty() {
        out.push_str(&format!("# Depends: {}\n", depends.join(", ")));
    }
    if !provides.is_empty() {
        out.push_str(&format!("# Provides: {}\n", provides.join(", ")));
    }
    out.push_str("\npayload body, never parsed\n");
    out
}
