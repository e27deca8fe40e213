// src/core/parser.rs

/// Takes the text after the last `:` in the node's output, trimmed.
///
/// Output without a colon yields an empty string; the caller decides whether
/// that is an error. No check is made that the result looks like an address.
pub fn extract_address(stdout: &str) -> String {
    match stdout.rsplit_once(':') {
        Some((_, tail)) => tail.trim().to_string(),
        None => String::new(),
    }
}

/// Reads a balance from a line such as `Balance of '1Abc': 10`.
///
/// Only the last non-empty line is considered.
pub fn extract_balance(stdout: &str) -> Option<i64> {
    let last_line = stdout.lines().rev().find(|line| !line.trim().is_empty())?;
    let (_, tail) = last_line.rsplit_once(':')?;
    tail.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_address() {
        assert_eq!(extract_address("Wallet address: abc123"), "abc123");
        assert_eq!(extract_address("no-colon-text"), "");
        assert_eq!(extract_address(""), "");
    }

    #[test]
    fn test_extract_address_uses_last_segment() {
        let stdout = "Wallet created\nAddress: 1PzQx9z\n";
        assert_eq!(extract_address(stdout), "1PzQx9z");
        assert_eq!(extract_address("a: b: c "), "c");
        assert_eq!(extract_address("trailing:"), "");
    }

    #[test]
    fn test_extract_balance() {
        assert_eq!(extract_balance("Balance of '1Abc': 10\n"), Some(10));
        assert_eq!(extract_balance("Balance of '1Abc': -3"), Some(-3));
        assert_eq!(extract_balance("Balance of '1Abc': ten"), None);
        assert_eq!(extract_balance("no balance here"), None);
        assert_eq!(extract_balance(""), None);
    }
}
