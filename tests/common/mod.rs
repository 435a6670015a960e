//! Shared fixture trees for integration tests

use std::fs;
use std::path::Path;

/// Write `contents` to `base/relative`, creating parent directories.
pub fn write(base: &Path, relative: &str, contents: &str) {
    let path = base.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A project with a local testbench directory `tb/` and a shared HDL tree `hdl/`.
///
/// ```text
/// tb/uart_tbc.vhd         entity uart_tbc
/// tb/tbc.vhd              entity tbc
/// tb/fifo/fifo_tbc.vhd    entity fifo_tbc
/// tb/notes.txt
/// hdl/uart.vhd            entity uart
/// hdl/misc/footbcbar.vhd  entity footbcbar
/// hdl/misc/foobar.vhd     entity foobar
/// ```
pub fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "tb/uart_tbc.vhd", "entity uart_tbc is\n  generic (g_reset_enable : boolean);\nend entity;\n");
    write(root, "tb/tbc.vhd", "entity tbc is\nend entity;\n");
    write(root, "tb/fifo/fifo_tbc.vhd", "entity fifo_tbc is\nend entity;\n");
    write(root, "tb/notes.txt", "entity not_vhdl_tbc is\n");
    write(root, "hdl/uart.vhd", "entity uart is\n  port (clk : in std_logic);\nend entity;\n");
    write(root, "hdl/misc/footbcbar.vhd", "entity footbcbar is\nend entity;\n");
    write(root, "hdl/misc/foobar.vhd", "entity foobar is\nend entity;\n");
    dir
}

/// Manifest placed in `tb/`, pointing at the shared tree next to it.
pub const MANIFEST: &str = r#"{
  "roots": [
    { "path": ".", "role": "local" },
    { "path": "../hdl", "role": "shared" }
  ]
}"#;
