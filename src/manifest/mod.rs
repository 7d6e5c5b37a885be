//! SxS assembly manifest parsing
//!
//! Only the parts that matter for installation are kept:
//! - the root-level `assemblyIdentity` architecture
//! - the root-level `registryKeys` collection, in document order
//!
//! Elements are matched by local name, so both the default
//! `urn:schemas-microsoft-com:asm.v3` namespace and prefixed forms work.

use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{InstallCabError, Result};

pub mod translate;
pub mod value;

pub use translate::translate;
pub use value::{RegValueType, RegistryValue};

// Depths below count the document root as 1.
const IDENTITY_DEPTH: usize = 2;
const KEY_DEPTH: usize = 3;
const VALUE_DEPTH: usize = 4;

/// A `registryKey` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryKey {
    pub key_name: String,
    pub values: Vec<RegistryValue>,
}

/// The installation-relevant content of one manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Where the manifest came from, for diagnostics
    pub source: String,
    /// `processorArchitecture` of the root `assemblyIdentity`
    pub arch_token: Option<String>,
    /// `None` when the manifest has no `registryKeys` element
    pub registry_keys: Option<Vec<RegistryKey>>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| InstallCabError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&String::from_utf8_lossy(&bytes), &path.display().to_string())
    }

    pub fn parse(xml: &str, source: &str) -> Result<Self> {
        let malformed = |reason: String| InstallCabError::MalformedManifest {
            path: source.to_string(),
            reason,
        };

        let mut reader = Reader::from_str(xml.trim_start_matches('\u{feff}'));
        reader.config_mut().trim_text(true);

        let mut manifest = Manifest {
            source: source.to_string(),
            arch_token: None,
            registry_keys: None,
        };
        let mut identity_seen = false;
        let mut in_keys = false;
        let mut current_key: Option<RegistryKey> = None;
        let mut depth = 0usize;

        loop {
            let event = reader.read_event().map_err(|e| {
                malformed(format!("at position {}: {e}", reader.buffer_position()))
            })?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    let element_depth = depth + 1;
                    if !is_empty {
                        depth = element_depth;
                    }

                    match (element_depth, e.local_name().as_ref()) {
                        (IDENTITY_DEPTH, b"assemblyIdentity") if !identity_seen => {
                            identity_seen = true;
                            manifest.arch_token =
                                attribute(e, b"processorArchitecture").map_err(&malformed)?;
                        }
                        (IDENTITY_DEPTH, b"registryKeys") if manifest.registry_keys.is_none() => {
                            manifest.registry_keys = Some(Vec::new());
                            in_keys = !is_empty;
                        }
                        (KEY_DEPTH, b"registryKey") if in_keys => {
                            let key_name = attribute(e, b"keyName")
                                .map_err(&malformed)?
                                .ok_or_else(|| {
                                    malformed("registryKey without keyName".to_string())
                                })?;
                            let key = RegistryKey {
                                key_name,
                                values: Vec::new(),
                            };
                            if is_empty {
                                push_key(&mut manifest, key);
                            } else {
                                current_key = Some(key);
                            }
                        }
                        (VALUE_DEPTH, b"registryValue") if in_keys => {
                            if let Some(key) = current_key.as_mut() {
                                key.values.push(registry_value(e).map_err(&malformed)?);
                            }
                        }
                        _ => {}
                    }
                }
                Event::End(ref e) => {
                    match (depth, e.local_name().as_ref()) {
                        (KEY_DEPTH, b"registryKey") if in_keys => {
                            if let Some(key) = current_key.take() {
                                push_key(&mut manifest, key);
                            }
                        }
                        (IDENTITY_DEPTH, b"registryKeys") if in_keys => in_keys = false,
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(manifest)
    }
}

fn push_key(manifest: &mut Manifest, key: RegistryKey) {
    if let Some(keys) = manifest.registry_keys.as_mut() {
        keys.push(key);
    }
}

/// Unescaped value of the attribute with local name `name`
fn attribute(element: &BytesStart, name: &[u8]) -> std::result::Result<Option<String>, String> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        if attr.key.local_name().as_ref() == name {
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn registry_value(element: &BytesStart) -> std::result::Result<RegistryValue, String> {
    let value_type = attribute(element, b"valueType")?
        .ok_or_else(|| "registryValue without valueType".to_string())?;

    Ok(RegistryValue {
        name: attribute(element, b"name")?.unwrap_or_default(),
        value: attribute(element, b"value")?.unwrap_or_default(),
        value_type: RegValueType::parse(&value_type),
    })
}
