use std::num::NonZeroUsize;

use js_sys::{Array, Object, Reflect, Uint32Array};
use wasm_bindgen::prelude::*;

pub mod color;
pub mod error;
pub mod grid;
pub mod materials;
pub mod presets;
pub mod quantize;
pub mod selection;
pub mod store;

pub use color::{ColorEntry, distance, is_dark, luma};
pub use error::{Error, LoadError, Result};
pub use grid::{Grid, image_to_grid};
pub use materials::{MaterialLine, Materials, column_label, coordinate, materials};
pub use presets::{PRESETS, Preset, preset};
pub use quantize::{Pattern, quantize, quantize_capped};
pub use selection::{CustomSelection, FileStorage, MemoryStorage, SelectionStorage};
pub use store::{ActiveSelection, PaletteStore, TableSource};

/// Convert an encoded image into a bead pattern.
///
/// Steps performed:
/// 1. Decode and resize to `width` x `height` with nearest-neighbour sampling
///    (`height` follows the aspect ratio when omitted).
/// 2. Snapshot the store's active colors.
/// 3. Match every cell to its nearest bead color, optionally capped to the
///    `max_colors` most used beads.
pub fn bead_pattern_bytes(
    input: &[u8],
    width: u32,
    height: Option<u32>,
    store: &PaletteStore,
    max_colors: Option<NonZeroUsize>,
) -> Result<Pattern> {
    let grid = image_to_grid(input, width, height)?;
    let palette = store.active_colors()?;
    quantize_capped(&grid.pixels, grid.width, grid.height, palette, max_colors)
}

/// Bundled table with the startup palette applied.
///
/// `saved_selection` is the raw persisted custom selection (a JSON array of
/// codes); when it is missing, unreadable or names no known code, the preset
/// `default_preset` is used instead.
pub fn startup_store(
    saved_selection: Option<&str>,
    default_preset: &str,
) -> Result<(PaletteStore, ActiveSelection)> {
    let kit = preset(default_preset).ok_or_else(|| Error::UnknownPreset(default_preset.into()))?;
    let storage = match saved_selection {
        Some(value) => MemoryStorage::with_value(value),
        None => MemoryStorage::default(),
    };
    let custom = CustomSelection::load(storage);

    let mut store = PaletteStore::bundled();
    store.load()?;
    let active = store.apply_startup(&custom, kit)?;
    Ok((store, active))
}

// ------------------------------------------------------------
// Browser bindings
// ------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Bundled table restricted to `colors` (all colors when absent or empty).
fn bundled_store(colors: Option<Array>) -> Result<PaletteStore, JsValue> {
    let mut store = PaletteStore::bundled();
    store.load().map_err(js_err)?;

    if let Some(js_codes) = colors {
        let mut codes = Vec::new();
        for val in js_codes.iter() {
            let code = val
                .as_string()
                .ok_or_else(|| JsValue::from_str("Color codes must be strings"))?;
            codes.push(code);
        }
        store.set_active_subset(Some(codes.as_slice())).map_err(js_err)?;
    }

    Ok(store)
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value)?;
    Ok(())
}

fn color_to_js(entry: &ColorEntry) -> Result<Object, JsValue> {
    let obj = Object::new();
    set(&obj, "code", &JsValue::from_str(entry.code()))?;
    set(&obj, "hex", &JsValue::from_str(entry.hex()))?;
    let rgb = Array::of3(
        &JsValue::from(entry.rgb().red),
        &JsValue::from(entry.rgb().green),
        &JsValue::from(entry.rgb().blue),
    );
    set(&obj, "rgb", &rgb)?;
    set(&obj, "dark", &JsValue::from_bool(entry.is_dark()))?;
    Ok(obj)
}

fn pattern_to_js(pattern: &Pattern) -> Result<Object, JsValue> {
    let palette_js = Array::new();
    for entry in pattern.palette_in_use() {
        let obj = color_to_js(entry)?;
        palette_js.push(&obj);
    }

    let cells: Vec<u32> = pattern.cell_indices().iter().map(|&i| i as u32).collect();

    let materials_js = Array::new();
    let list = materials(pattern);
    for line in &list.lines {
        let obj = Object::new();
        set(&obj, "code", &JsValue::from_str(&line.code))?;
        set(&obj, "hex", &JsValue::from_str(&line.hex))?;
        set(&obj, "count", &JsValue::from(line.count as u32))?;
        materials_js.push(&obj);
    }

    let result = Object::new();
    set(&result, "width", &JsValue::from(pattern.width()))?;
    set(&result, "height", &JsValue::from(pattern.height()))?;
    set(&result, "palette", &palette_js)?;
    set(&result, "cells", &Uint32Array::from(cells.as_slice()))?;
    set(&result, "materials", &materials_js)?;
    set(&result, "totalBeads", &JsValue::from(list.total as u32))?;
    Ok(result)
}

fn cap(max_colors: Option<usize>) -> Option<NonZeroUsize> {
    max_colors.and_then(NonZeroUsize::new)
}

/// Decode `input`, resize to the grid and quantize against the bundled table.
///
/// Returns `{ width, height, palette, cells, materials, totalBeads }` where
/// `cells` holds row-major indices into `palette`.
#[wasm_bindgen]
pub fn bead_pattern(
    input: Vec<u8>,
    width: u32,
    height: Option<u32>,
    colors: Option<Array>,
    max_colors: Option<usize>,
) -> Result<Object, JsValue> {
    let store = bundled_store(colors)?;
    let pattern =
        bead_pattern_bytes(&input, width, height, &store, cap(max_colors)).map_err(js_err)?;
    pattern_to_js(&pattern)
}

/// Quantize an already resized RGBA buffer (e.g. canvas `ImageData`).
#[wasm_bindgen]
pub fn quantize_rgba(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    colors: Option<Array>,
    max_colors: Option<usize>,
) -> Result<Object, JsValue> {
    let store = bundled_store(colors)?;
    let palette = store.active_colors().map_err(js_err)?;
    let pattern =
        quantize_capped(&pixels, width, height, palette, cap(max_colors)).map_err(js_err)?;
    pattern_to_js(&pattern)
}

/// Every color of the bundled table, for selection pickers.
#[wasm_bindgen]
pub fn all_colors() -> Result<Array, JsValue> {
    let store = bundled_store(None)?;
    let out = Array::new();
    for entry in store.all_colors().map_err(js_err)? {
        let obj = color_to_js(entry)?;
        out.push(&obj);
    }
    Ok(out)
}

/// Preset kits as `{ id, name, description, colors }`; `colors` is `null`
/// for the full table.
#[wasm_bindgen]
pub fn presets() -> Result<Array, JsValue> {
    let out = Array::new();
    for p in PRESETS {
        let obj = Object::new();
        set(&obj, "id", &JsValue::from_str(p.id))?;
        set(&obj, "name", &JsValue::from_str(p.name))?;
        set(&obj, "description", &JsValue::from_str(p.description))?;
        let colors = match p.colors {
            Some(codes) => codes.iter().map(|c| JsValue::from_str(c)).collect::<Array>().into(),
            None => JsValue::NULL,
        };
        set(&obj, "colors", &colors)?;
        out.push(&obj);
    }
    Ok(out)
}

/// Colors to start with, given the page's saved `customBeadColors` value.
///
/// Returns `{ custom, preset, colors }`; `preset` is the applied preset id,
/// or `null` when the saved selection is in effect.
#[wasm_bindgen]
pub fn startup_colors(
    saved_selection: Option<String>,
    default_preset: Option<String>,
) -> Result<Object, JsValue> {
    let kit = default_preset.as_deref().unwrap_or(presets::DEFAULT_PRESET);
    let (store, active) = startup_store(saved_selection.as_deref(), kit).map_err(js_err)?;

    let colors = Array::new();
    for entry in store.active_colors().map_err(js_err)? {
        let obj = color_to_js(entry)?;
        colors.push(&obj);
    }

    let (custom, preset_id) = match active {
        ActiveSelection::Custom => (true, JsValue::NULL),
        ActiveSelection::Preset(p) => (false, JsValue::from_str(p.id)),
    };
    let result = Object::new();
    set(&result, "custom", &JsValue::from_bool(custom))?;
    set(&result, "preset", &preset_id)?;
    set(&result, "colors", &colors)?;
    Ok(result)
}

/// Printed coordinate of a cell, e.g. `B3` for `(1, 2)`.
#[wasm_bindgen(js_name = cellCoordinate)]
pub fn cell_coordinate(x: u32, y: u32) -> String {
    coordinate(x, y)
}
