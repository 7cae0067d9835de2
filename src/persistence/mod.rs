//! Plain-text persistence for the modpack collection.
//!
//! The data file has two sections:
//!
//! ```text
//! MODPACKS:
//! Vanilla+
//! Tech
//! MODPACK_MODS:
//! Vanilla+:
//!   JEI
//!   Sodium
//! Tech:
//!   Create
//! ```
//!
//! The registry section lists modpack names in registry order. The mods section
//! holds one `<name>:` header per mod list followed by its mods, each indented
//! by exactly two spaces. The two sections are not cross-checked when parsing.
//!
//! # Format limitations
//!
//! There is no escaping. A name ending in `:`, containing a line break, or
//! (for mods) parsed from a line that ends in `:` does not survive a round
//! trip. Leading and trailing whitespace of names is trimmed on load.
//!
//! The file must be valid UTF-8. An invalid byte sequence stops the load with
//! [`PersistenceError::Read`]; lines before it stay applied, nothing after it
//! is read.
//!
//! # Components
//!
//! - [`serialize`] / [`deserialize`]: whole-text conversion
//! - [`Decoder`]: the line-by-line parser, usable on streaming input
//! - [`Storage`]: where the text lives; [`FileStorage`] is the file-backed one
//! - [`save`] / [`load`]: codec plus storage, with [`PersistenceError`] on I/O failure

pub mod storage;

pub use storage::{FileStorage, Storage};

use crate::store::ModCollectionStore;
use std::io::{self, BufRead};
use thiserror::Error;

#[cfg(test)]
pub use storage::MockStorage;

pub const MODPACKS_HEADER: &str = "MODPACKS:";
pub const MODPACK_MODS_HEADER: &str = "MODPACK_MODS:";
const MOD_INDENT: &str = "  ";

/// Errors that can occur while reading or writing the data file
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to read modpack data from {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write modpack data to {location}: {source}")]
    Write {
        location: String,
        #[source]
        source: io::Error,
    },
}

/// Result of a successful [`load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The data file was read; `modpacks` registry entries were loaded.
    Loaded { modpacks: usize },
    /// No data file exists; the store was left empty.
    Missing,
}

/// Render the registry and mod map in the data file format.
pub fn serialize(store: &ModCollectionStore) -> String {
    let mut out = String::new();

    out.push_str(MODPACKS_HEADER);
    out.push('\n');
    for modpack in store.modpacks() {
        out.push_str(&modpack);
        out.push('\n');
    }

    out.push_str(MODPACK_MODS_HEADER);
    out.push('\n');
    for (modpack, mods) in store.mod_lists() {
        out.push_str(modpack);
        out.push_str(":\n");
        for name in mods {
            out.push_str(MOD_INDENT);
            out.push_str(name);
            out.push('\n');
        }
    }

    out
}

/// Parse data file text into a fresh store.
pub fn deserialize(text: &str) -> ModCollectionStore {
    let mut store = ModCollectionStore::new();
    let mut decoder = Decoder::new();
    for line in text.lines() {
        decoder.feed(line, &mut store);
    }
    store
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Section {
    #[default]
    None,
    Modpacks,
    ModpackMods,
}

/// Line-by-line parser for the data file format.
///
/// Each fed line is applied to the target store immediately, so a reader that
/// fails part way leaves every earlier line applied.
#[derive(Debug, Default)]
pub struct Decoder {
    section: Section,
    current_modpack: Option<String>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one line (without its line terminator) to `store`.
    pub fn feed(&mut self, line: &str, store: &mut ModCollectionStore) {
        let trimmed = line.trim();

        if trimmed == MODPACKS_HEADER {
            self.section = Section::Modpacks;
            return;
        }
        if trimmed == MODPACK_MODS_HEADER {
            self.section = Section::ModpackMods;
            self.current_modpack = None;
            return;
        }

        match self.section {
            Section::Modpacks if !trimmed.is_empty() => {
                store.push_modpack(trimmed.to_string());
            }
            Section::ModpackMods => {
                if let Some(modpack) = trimmed.strip_suffix(':') {
                    store.start_mod_list(modpack);
                    self.current_modpack = (!modpack.is_empty()).then(|| modpack.to_string());
                } else if let Some(rest) = line.strip_prefix(MOD_INDENT) {
                    if let Some(modpack) = &self.current_modpack {
                        store.push_mod(modpack, rest.trim().to_string());
                    }
                }
            }
            _ => {}
        }
    }

    /// Feed every line from `reader` into `store`, returning the number of lines read.
    ///
    /// On a read error the lines already fed stay applied. A line that is not
    /// valid UTF-8 is reported as an [`io::ErrorKind::InvalidData`] error.
    pub fn read_into<R: BufRead>(
        &mut self,
        reader: R,
        store: &mut ModCollectionStore,
    ) -> io::Result<usize> {
        let mut count = 0;
        for line in reader.lines() {
            self.feed(&line?, store);
            count += 1;
        }
        Ok(count)
    }
}

/// Write the store's registry and mod map to `storage`.
///
/// The store itself is never modified, whether or not the write succeeds.
pub fn save(storage: &dyn Storage, store: &ModCollectionStore) -> Result<(), PersistenceError> {
    let text = serialize(store);

    storage.write(&text).map_err(|source| PersistenceError::Write {
        location: storage.location(),
        source,
    })?;

    tracing::info!(
        "Saved {} modpacks to {}",
        store.modpacks().len(),
        storage.location()
    );
    Ok(())
}

/// Replace the store's registry and mod map with the contents of `storage`.
///
/// The collection is cleared before reading. A missing data file leaves it
/// empty and is not an error. If reading fails part way, the lines parsed so
/// far stay applied and the error is returned. The change log is untouched.
pub fn load(
    storage: &dyn Storage,
    store: &mut ModCollectionStore,
) -> Result<LoadOutcome, PersistenceError> {
    store.clear_collection();

    let read_error = |source| PersistenceError::Read {
        location: storage.location(),
        source,
    };

    let Some(reader) = storage.open().map_err(read_error)? else {
        tracing::warn!(
            "Modpack data not found at {}, starting empty",
            storage.location()
        );
        return Ok(LoadOutcome::Missing);
    };

    let lines = Decoder::new()
        .read_into(reader, store)
        .map_err(read_error)?;

    let modpacks = store.modpacks().len();
    tracing::info!(
        "Loaded {} modpacks ({} lines) from {}",
        modpacks,
        lines,
        storage.location()
    );
    Ok(LoadOutcome::Loaded { modpacks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn sample_store() -> ModCollectionStore {
        let mut store = ModCollectionStore::new();
        store.add_modpack("Vanilla+");
        store.add_modpack("Tech");
        store.add_mod_to_modpack("Vanilla+", "JEI");
        store.add_mod_to_modpack("Vanilla+", "Sodium");
        store.add_mod_to_modpack("Tech", "Create");
        store
    }

    #[test]
    fn test_serialize_layout() {
        let text = serialize(&sample_store());
        assert_eq!(
            text,
            "MODPACKS:\nVanilla+\nTech\nMODPACK_MODS:\nVanilla+:\n  JEI\n  Sodium\nTech:\n  Create\n"
        );
    }

    #[test]
    fn test_serialize_empty_store() {
        assert_eq!(
            serialize(&ModCollectionStore::new()),
            "MODPACKS:\nMODPACK_MODS:\n"
        );
    }

    #[test]
    fn test_deserialize_sample() {
        let store = deserialize(
            "MODPACKS:\nVanilla+\nTech\nMODPACK_MODS:\nVanilla+:\n  JEI\n  Sodium\nTech:\n  Create\n",
        );

        assert_eq!(store.modpacks(), vec!["Vanilla+", "Tech"]);
        assert_eq!(store.modpack_mods("Vanilla+"), vec!["JEI", "Sodium"]);
        assert_eq!(store.modpack_mods("Tech"), vec!["Create"]);
        assert!(!store.tracker().has_changes());
    }

    #[test]
    fn test_round_trip() {
        let original = sample_store();
        let restored = deserialize(&serialize(&original));
        assert_eq!(restored, original);
    }

    #[test]
    fn test_sections_are_not_cross_validated() {
        let store = deserialize("MODPACKS:\nListed\nMODPACK_MODS:\nUnlisted:\n  JEI\n");

        assert_eq!(store.modpacks(), vec!["Listed"]);
        assert!(store.modpack_mods("Listed").is_empty());
        assert_eq!(store.modpack_mods("Unlisted"), vec!["JEI"]);
    }

    #[test]
    fn test_lines_before_any_header_ignored() {
        let store = deserialize("stray\n  also stray\nMODPACKS:\nPack\n");
        assert_eq!(store.modpacks(), vec!["Pack"]);
        assert_eq!(store.mod_lists().count(), 0);
    }

    #[test]
    fn test_blank_registry_lines_skipped_and_names_trimmed() {
        let store = deserialize("MODPACKS:\n\n   \n  Spaced Pack  \n");
        assert_eq!(store.modpacks(), vec!["Spaced Pack"]);
    }

    #[test]
    fn test_mod_lines_need_two_space_indent() {
        let store = deserialize("MODPACK_MODS:\nPack:\n  JEI\n\tTabbed\n Single\n    Deep  \n");
        assert_eq!(store.modpack_mods("Pack"), vec!["JEI", "Deep"]);
    }

    #[test]
    fn test_mod_lines_without_header_ignored() {
        let store = deserialize("MODPACK_MODS:\n  Orphan\nPack:\n  JEI\n");
        assert_eq!(store.mod_lists().count(), 1);
        assert_eq!(store.modpack_mods("Pack"), vec!["JEI"]);
    }

    #[test]
    fn test_repeated_header_overwrites_mod_list() {
        let store = deserialize("MODPACK_MODS:\nPack:\n  A\nPack:\n  B\n");
        assert_eq!(store.modpack_mods("Pack"), vec!["B"]);
    }

    #[test]
    fn test_mod_ending_in_colon_becomes_header() {
        let store = deserialize("MODPACK_MODS:\nPack:\n  Weird:\n  JEI\n");
        assert!(store.modpack_mods("Pack").is_empty());
        assert_eq!(store.modpack_mods("Weird"), vec!["JEI"]);
    }

    #[test]
    fn test_headers_switch_sections_anywhere() {
        let store = deserialize("MODPACK_MODS:\nPack:\n  JEI\nMODPACKS:\nLate\n  MODPACK_MODS:  \n  Other\n");
        assert_eq!(store.modpacks(), vec!["Late"]);
        // the mods header resets the cursor
        assert_eq!(store.modpack_mods("Pack"), vec!["JEI"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let store = deserialize("MODPACKS:\r\nPack\r\nMODPACK_MODS:\r\nPack:\r\n  JEI\r\n");
        assert_eq!(store.modpacks(), vec!["Pack"]);
        assert_eq!(store.modpack_mods("Pack"), vec!["JEI"]);
    }

    #[test]
    fn test_deserialize_empty_text() {
        let store = deserialize("");
        assert!(store.modpacks().is_empty());
        assert_eq!(store.mod_lists().count(), 0);
    }

    /// Yields `data` and then fails.
    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.data.read(buf)?;
            if n == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk went away"));
            }
            Ok(n)
        }
    }

    #[test]
    fn test_read_into_keeps_partial_lines_on_error() {
        let reader = io::BufReader::new(FailingReader {
            data: Cursor::new(b"MODPACKS:\nFirst\nSecond\n".to_vec()),
        });
        let mut store = ModCollectionStore::new();

        let result = Decoder::new().read_into(reader, &mut store);

        assert!(result.is_err());
        assert_eq!(store.modpacks(), vec!["First", "Second"]);
    }

    #[test]
    fn test_invalid_utf8_stops_load_after_earlier_lines() {
        let mut storage = MockStorage::new();
        storage.expect_open().returning(|| {
            Ok(Some(Box::new(Cursor::new(
                b"MODPACKS:\nGood\nBad \xff\xfe\nLater\n".to_vec(),
            )) as Box<dyn BufRead>))
        });
        storage.expect_location().returning(|| "memory".to_string());

        let mut store = ModCollectionStore::new();
        let err = load(&storage, &mut store).unwrap_err();

        let PersistenceError::Read { source, .. } = err else {
            panic!("expected a read error");
        };
        assert_eq!(source.kind(), io::ErrorKind::InvalidData);
        assert_eq!(store.modpacks(), vec!["Good"]);
    }

    #[test]
    fn test_save_writes_serialized_text() {
        let mut storage = MockStorage::new();
        storage
            .expect_write()
            .withf(|text| text.starts_with("MODPACKS:\nVanilla+\nTech\n"))
            .times(1)
            .returning(|_| Ok(()));
        storage
            .expect_location()
            .returning(|| "memory".to_string());

        save(&storage, &sample_store()).unwrap();
    }

    #[test]
    fn test_save_failure_reports_location() {
        let mut storage = MockStorage::new();
        storage.expect_write().returning(|_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        });
        storage
            .expect_location()
            .returning(|| "/readonly/modpack_data.txt".to_string());

        let store = sample_store();
        let err = save(&storage, &store).unwrap_err();

        assert!(matches!(err, PersistenceError::Write { .. }));
        assert!(err.to_string().contains("/readonly/modpack_data.txt"));
        assert_eq!(store, sample_store());
    }

    #[test]
    fn test_load_missing_clears_store() {
        let mut storage = MockStorage::new();
        storage.expect_open().returning(|| Ok(None));
        storage.expect_location().returning(|| "memory".to_string());

        let mut store = sample_store();
        let outcome = load(&storage, &mut store).unwrap();

        assert_eq!(outcome, LoadOutcome::Missing);
        assert!(store.modpacks().is_empty());
        assert_eq!(store.mod_lists().count(), 0);
        // change log is not part of the persisted state
        assert!(store.tracker().has_changes());
    }

    #[test]
    fn test_load_replaces_existing_collection() {
        let mut storage = MockStorage::new();
        storage.expect_open().returning(|| {
            Ok(Some(Box::new(Cursor::new(
                b"MODPACKS:\nFresh\nMODPACK_MODS:\nFresh:\n  Iris\n".to_vec(),
            )) as Box<dyn BufRead>))
        });
        storage.expect_location().returning(|| "memory".to_string());

        let mut store = sample_store();
        let outcome = load(&storage, &mut store).unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded { modpacks: 1 });
        assert_eq!(store.modpacks(), vec!["Fresh"]);
        assert!(store.modpack_mods("Vanilla+").is_empty());
        assert_eq!(store.modpack_mods("Fresh"), vec!["Iris"]);
    }

    #[test]
    fn test_load_partial_on_read_error() {
        let mut storage = MockStorage::new();
        storage.expect_open().returning(|| {
            Ok(Some(Box::new(io::BufReader::new(FailingReader {
                data: Cursor::new(b"MODPACKS:\nSurvivor\n".to_vec()),
            })) as Box<dyn BufRead>))
        });
        storage.expect_location().returning(|| "memory".to_string());

        let mut store = sample_store();
        let err = load(&storage, &mut store).unwrap_err();

        assert!(matches!(err, PersistenceError::Read { .. }));
        assert_eq!(store.modpacks(), vec!["Survivor"]);
    }

    #[test]
    fn test_load_open_error() {
        let mut storage = MockStorage::new();
        storage
            .expect_open()
            .returning(|| Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));
        storage.expect_location().returning(|| "memory".to_string());

        let mut store = sample_store();
        let err = load(&storage, &mut store).unwrap_err();

        assert!(matches!(err, PersistenceError::Read { .. }));
        assert!(store.modpacks().is_empty());
    }
}
