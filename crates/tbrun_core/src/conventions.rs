//! Well-known identifiers shared by the driver and engines.

/// Library every discovered source file is registered into.
pub const DEFAULT_LIBRARY: &str = "lib";

/// File extension (without the dot) of VHDL sources.
pub const VHDL_EXTENSION: &str = "vhd";

/// Generic toggled by the reset fan-out.
pub const RESET_GENERIC: &str = "g_reset_enable";

/// Canonical testbench convention: the identifier contains `tbc`.
pub const DEFAULT_TESTBENCH_PATTERN: &str = "*tbc*";

/// String spelling of a VHDL boolean generic value.
pub fn vhdl_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Separator between the parts of a fully qualified test name (`lib.tb.config`).
pub const TEST_NAME_SEPARATOR: char = '.';

/// Build the fully qualified name of one (testbench, configuration) test.
pub fn test_name(library: &str, testbench: &str, config: &str) -> String {
    format!("{library}{TEST_NAME_SEPARATOR}{testbench}{TEST_NAME_SEPARATOR}{config}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vhdl_bool_spelling() {
        assert_eq!(vhdl_bool(true), "true");
        assert_eq!(vhdl_bool(false), "false");
    }

    #[test]
    fn test_test_name_joins_with_dots() {
        assert_eq!(test_name("lib", "uart_tbc", "with_reset"), "lib.uart_tbc.with_reset");
    }
}
