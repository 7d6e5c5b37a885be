//! Registry value types and their `.reg` encodings

/// Placeholder expanded in `REG_EXPAND_SZ` payloads
const SYSTEM_ROOT_PLACEHOLDER: &str = "%SystemRoot%";
const SYSTEM_ROOT: &str = "C:\\windows";

/// Placeholder for the component's own system directory
const RUNTIME_SYSTEM32_PLACEHOLDER: &str = "$(runtime.system32)";

/// Name written for a key's default value
const DEFAULT_VALUE_NAME: &str = "@";

/// `valueType` attribute of a `registryValue`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegValueType {
    Binary,
    Dword,
    None,
    ExpandSz,
    Sz,
    /// Anything else; written like `REG_SZ` after a warning
    Unrecognized(String),
}

impl RegValueType {
    pub fn parse(value_type: &str) -> Self {
        match value_type {
            "REG_BINARY" => RegValueType::Binary,
            "REG_DWORD" => RegValueType::Dword,
            "REG_NONE" => RegValueType::None,
            "REG_EXPAND_SZ" => RegValueType::ExpandSz,
            "REG_SZ" => RegValueType::Sz,
            other => RegValueType::Unrecognized(other.to_string()),
        }
    }
}

/// A `registryValue` entry from a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryValue {
    pub name: String,
    pub value: String,
    pub value_type: RegValueType,
}

impl RegistryValue {
    /// Left-hand side of the `name=value` line
    pub fn encoded_name(&self) -> String {
        if self.name.trim().is_empty() {
            DEFAULT_VALUE_NAME.to_string()
        } else {
            format!("\"{}\"", self.name)
        }
    }

    /// Right-hand side of the `name=value` line, `None` for `REG_NONE`
    ///
    /// `system32` is the Windows path `$(runtime.system32)` expands to.
    pub fn encoded_value(&self, system32: &str) -> Option<String> {
        let encoded = match &self.value_type {
            RegValueType::Binary => format!("hex:{}", hex_groups(&self.value)),
            RegValueType::Dword => {
                let digits = self
                    .value
                    .strip_prefix("0x")
                    .or_else(|| self.value.strip_prefix("0X"))
                    .unwrap_or(&self.value);
                format!("dword:{digits}")
            }
            RegValueType::None => return None,
            RegValueType::ExpandSz => format!(
                "\"{}\"",
                self.value.replace(SYSTEM_ROOT_PLACEHOLDER, SYSTEM_ROOT)
            ),
            RegValueType::Sz => format!("\"{}\"", self.value),
            RegValueType::Unrecognized(value_type) => {
                log::warn!("unknown value type {value_type} for '{}', writing as REG_SZ", self.name);
                format!("\"{}\"", self.value)
            }
        };

        Some(
            encoded
                .replace(RUNTIME_SYSTEM32_PLACEHOLDER, system32)
                .replace('\\', "\\\\"),
        )
    }
}

/// `"0102ff"` -> `"01,02,ff"`; a trailing odd digit is dropped
fn hex_groups(payload: &str) -> String {
    let digits: Vec<char> = payload.chars().collect();
    digits
        .chunks_exact(2)
        .map(|pair| pair.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
}
