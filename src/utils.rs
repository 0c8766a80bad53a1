// SPDX-License-Identifier: MIT
// String preprocessing applied by callers before scoring.

/// Lowercases `s`, replaces every non-alphanumeric char with a space and
/// trims the ends. Scorers never call this themselves.
///
/// ```
/// assert_eq!(fuzzratio::utils::default_process("  New-York, NY! "), "new york  ny");
/// ```
pub fn default_process(s: &str) -> String {
    let result: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();

    result.trim().to_string()
}
