//! Reference color table and the active subset used for quantization.

use std::path::PathBuf;

use serde_json::Value;

use crate::color::ColorEntry;
use crate::error::{Error, LoadError, Result};
use crate::presets::Preset;
use crate::selection::{CustomSelection, SelectionStorage};

/// Bundled MARD bead color table (code -> hex), in catalogue order.
pub const BUNDLED_TABLE: &str = include_str!("../data/mard.json");

/// Where the reference table comes from.
#[derive(Debug, Clone)]
pub enum TableSource {
    Bundled,
    Json(String),
    File(PathBuf),
}

impl TableSource {
    fn read(&self) -> Result<String, LoadError> {
        match self {
            TableSource::Bundled => Ok(BUNDLED_TABLE.to_owned()),
            TableSource::Json(text) => Ok(text.clone()),
            TableSource::File(path) => Ok(std::fs::read_to_string(path)?),
        }
    }
}

/// Parse a flat `{ "code": "#rrggbb", ... }` object, keeping file order.
///
/// Only the top level can fail; a bad entry is degraded to black.
pub fn parse_table(text: &str) -> Result<Vec<ColorEntry>, LoadError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| LoadError::Malformed(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(LoadError::Malformed(
            "expected an object mapping codes to hex strings".into(),
        ));
    };

    Ok(map
        .into_iter()
        .map(|(code, hex)| match hex {
            Value::String(hex) => ColorEntry::from_hex(code, hex),
            other => ColorEntry::from_hex(code, other.to_string()),
        })
        .collect())
}

/// Which palette restriction is currently applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSelection {
    Preset(&'static Preset),
    Custom,
}

/// Owns the full reference table and an optional active subset.
///
/// Starts unloaded; every query fails with [`Error::NotLoaded`] until
/// [`PaletteStore::load`] succeeds.
#[derive(Debug)]
pub struct PaletteStore {
    source: TableSource,
    colors: Option<Vec<ColorEntry>>,
    subset: Option<Vec<ColorEntry>>,
}

impl PaletteStore {
    pub fn new(source: TableSource) -> Self {
        Self {
            source,
            colors: None,
            subset: None,
        }
    }

    pub fn bundled() -> Self {
        Self::new(TableSource::Bundled)
    }

    pub fn is_loaded(&self) -> bool {
        self.colors.is_some()
    }

    /// Read and parse the table. A second call after success is a no-op.
    pub fn load(&mut self) -> Result<&[ColorEntry]> {
        if self.colors.is_none() {
            let text = self.source.read()?;
            let colors = parse_table(&text)?;
            tracing::debug!(count = colors.len(), "loaded bead color table");
            self.colors = Some(colors);
        }
        self.all_colors()
    }

    /// The full table, ignoring any subset.
    pub fn all_colors(&self) -> Result<&[ColorEntry]> {
        self.colors.as_deref().ok_or(Error::NotLoaded)
    }

    /// The subset when it resolved to at least one color, else the full table.
    pub fn active_colors(&self) -> Result<&[ColorEntry]> {
        let all = self.all_colors()?;
        match self.subset.as_deref() {
            Some(subset) if !subset.is_empty() => Ok(subset),
            _ => Ok(all),
        }
    }

    /// Restrict quantization to the given codes. `None` or an empty list
    /// clears the subset; unknown codes are dropped.
    pub fn set_active_subset<S: AsRef<str>>(&mut self, codes: Option<&[S]>) -> Result<()> {
        let codes = match codes {
            Some(codes) if !codes.is_empty() => codes,
            _ => return self.clear_active_subset(),
        };

        let all = self.all_colors()?;
        let subset: Vec<ColorEntry> = all
            .iter()
            .filter(|entry| codes.iter().any(|c| c.as_ref() == entry.code()))
            .cloned()
            .collect();

        for code in codes {
            let code = code.as_ref();
            if !all.iter().any(|entry| entry.code() == code) {
                tracing::warn!(code, "ignoring unknown color code in subset");
            }
        }
        tracing::debug!(requested = codes.len(), resolved = subset.len(), "set color subset");

        self.subset = if subset.is_empty() { None } else { Some(subset) };
        Ok(())
    }

    pub fn clear_active_subset(&mut self) -> Result<()> {
        self.all_colors()?;
        self.subset = None;
        Ok(())
    }

    pub fn has_subset(&self) -> bool {
        self.subset.is_some()
    }

    pub fn apply_preset(&mut self, preset: &Preset) -> Result<()> {
        match preset.colors {
            Some(codes) => self.set_active_subset(Some(codes)),
            None => self.clear_active_subset(),
        }
    }

    /// Startup choice: a saved custom selection wins when at least one of its
    /// codes is in the table, otherwise the default preset is applied.
    pub fn apply_startup(
        &mut self,
        custom: &CustomSelection<impl SelectionStorage>,
        default_preset: &'static Preset,
    ) -> Result<ActiveSelection> {
        if !custom.is_empty() {
            self.set_active_subset(Some(custom.codes()))?;
            if self.has_subset() {
                return Ok(ActiveSelection::Custom);
            }
            tracing::warn!(
                saved = custom.len(),
                "saved custom selection has no known codes, using default preset"
            );
        }
        self.apply_preset(default_preset)?;
        Ok(ActiveSelection::Preset(default_preset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use crate::selection::MemoryStorage;

    const TABLE: &str = r##"{"A": "#000000", "B": "#FFFFFF", "C": "#FF0000"}"##;

    fn loaded() -> PaletteStore {
        let mut store = PaletteStore::new(TableSource::Json(TABLE.into()));
        store.load().unwrap();
        store
    }

    fn codes(colors: &[ColorEntry]) -> Vec<&str> {
        colors.iter().map(|c| c.code()).collect()
    }

    #[test]
    fn test_queries_before_load_fail() {
        let mut store = PaletteStore::new(TableSource::Json(TABLE.into()));
        assert!(matches!(store.all_colors(), Err(Error::NotLoaded)));
        assert!(matches!(store.active_colors(), Err(Error::NotLoaded)));
        assert!(matches!(store.clear_active_subset(), Err(Error::NotLoaded)));
        assert!(matches!(
            store.set_active_subset(Some(&["A"][..])),
            Err(Error::NotLoaded)
        ));
    }

    #[test]
    fn test_load_preserves_table_order() {
        let store = loaded();
        assert_eq!(codes(store.all_colors().unwrap()), ["A", "B", "C"]);
        let white = &store.all_colors().unwrap()[1];
        assert_eq!(white.rgb(), palette::Srgb::new(255, 255, 255));
    }

    #[test]
    fn test_load_is_idempotent() {
        let mut store = loaded();
        store.set_active_subset(Some(&["C"][..])).unwrap();
        assert_eq!(store.load().unwrap().len(), 3);
        // A repeated load does not reset the subset.
        assert_eq!(codes(store.active_colors().unwrap()), ["C"]);
    }

    #[test]
    fn test_load_tolerates_bad_entries() {
        let mut store =
            PaletteStore::new(TableSource::Json(r##"{"A": "#12", "B": 7, "C": "abcdef"}"##.into()));
        let colors = store.load().unwrap();
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0].rgb(), palette::Srgb::new(0, 0, 0));
        assert_eq!(colors[1].rgb(), palette::Srgb::new(0, 0, 0));
        assert_eq!(colors[2].rgb(), palette::Srgb::new(0xab, 0xcd, 0xef));
    }

    #[test]
    fn test_load_rejects_malformed_top_level() {
        let mut store = PaletteStore::new(TableSource::Json("[1, 2]".into()));
        assert!(matches!(store.load(), Err(Error::Load(LoadError::Malformed(_)))));
        assert!(!store.is_loaded());

        let mut store = PaletteStore::new(TableSource::Json("{not json".into()));
        assert!(matches!(store.load(), Err(Error::Load(LoadError::Malformed(_)))));
    }

    #[test]
    fn test_load_unreachable_file() {
        let path = std::env::temp_dir().join("bead-table-that-does-not-exist.json");
        let mut store = PaletteStore::new(TableSource::File(path));
        assert!(matches!(store.load(), Err(Error::Load(LoadError::Unreachable(_)))));
    }

    #[test]
    fn test_unknown_codes_are_dropped() {
        let mut store = loaded();
        store.set_active_subset(Some(&["A", "Z"][..])).unwrap();
        assert_eq!(codes(store.active_colors().unwrap()), ["A"]);
    }

    #[test]
    fn test_subset_follows_table_order() {
        let mut store = loaded();
        store.set_active_subset(Some(&["C", "A"][..])).unwrap();
        assert_eq!(codes(store.active_colors().unwrap()), ["A", "C"]);
    }

    #[test]
    fn test_empty_and_missing_subset_clear() {
        let mut store = loaded();
        store.set_active_subset(Some(&["A"][..])).unwrap();
        store.set_active_subset::<&str>(Some(&[])).unwrap();
        assert_eq!(store.active_colors().unwrap().len(), 3);

        store.set_active_subset(Some(&["A"][..])).unwrap();
        store.set_active_subset::<&str>(None).unwrap();
        assert_eq!(store.active_colors().unwrap().len(), 3);

        store.set_active_subset(Some(&["A"][..])).unwrap();
        store.clear_active_subset().unwrap();
        assert_eq!(store.active_colors().unwrap().len(), 3);
        assert!(!store.has_subset());
    }

    #[test]
    fn test_all_invalid_subset_falls_back_to_full_table() {
        let mut store = loaded();
        store.set_active_subset(Some(&["X", "Y"][..])).unwrap();
        assert_eq!(store.active_colors().unwrap().len(), 3);
        assert!(!store.has_subset());
    }

    #[test]
    fn test_all_colors_ignores_subset() {
        let mut store = loaded();
        store.set_active_subset(Some(&["B"][..])).unwrap();
        assert_eq!(store.all_colors().unwrap().len(), 3);
        assert_eq!(codes(store.active_colors().unwrap()), ["B"]);
    }

    #[test]
    fn test_bundled_table_covers_presets() {
        let mut store = PaletteStore::bundled();
        let all = store.load().unwrap().len();
        assert_eq!(all, 293);

        for preset in presets::PRESETS {
            store.apply_preset(preset).unwrap();
            let expected = preset.colors.map_or(all, |codes| codes.len());
            assert_eq!(store.active_colors().unwrap().len(), expected, "{}", preset.id);
        }
    }

    #[test]
    fn test_startup_prefers_saved_custom_selection() {
        let mut store = loaded();
        let storage = MemoryStorage::with_value(r#"["B", "C"]"#);
        let custom = CustomSelection::load(storage);
        let basic = presets::preset("basic_10").unwrap();

        let active = store.apply_startup(&custom, basic).unwrap();
        assert_eq!(active, ActiveSelection::Custom);
        assert_eq!(codes(store.active_colors().unwrap()), ["B", "C"]);
    }

    #[test]
    fn test_startup_uses_default_preset_without_custom() {
        let mut store = loaded();
        let custom = CustomSelection::load(MemoryStorage::default());
        let all = presets::preset(presets::DEFAULT_PRESET).unwrap();

        let active = store.apply_startup(&custom, all).unwrap();
        assert_eq!(active, ActiveSelection::Preset(all));
        assert_eq!(store.active_colors().unwrap().len(), 3);
    }

    #[test]
    fn test_startup_ignores_custom_selection_of_unknown_codes() {
        let mut store = loaded();
        let custom = CustomSelection::load(MemoryStorage::with_value(r#"["X", "Y"]"#));
        assert!(!custom.is_empty());
        let all = presets::preset(presets::DEFAULT_PRESET).unwrap();

        let active = store.apply_startup(&custom, all).unwrap();
        assert_eq!(active, ActiveSelection::Preset(all));
        assert!(!store.has_subset());
        assert_eq!(store.active_colors().unwrap().len(), 3);
    }
}
