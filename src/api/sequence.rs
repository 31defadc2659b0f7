//! WASM bindings over a single loaded `NoteSequence`
//!
//! The sequence lives in a process-wide mutex. Every call locks it, runs one
//! engine operation and maps engine errors to JS strings.

use std::sync::Mutex;

use lazy_static::lazy_static;
use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, js_error, serialize};
use crate::error::SequenceError;
use crate::models::{Duration, EditorSettings, Note, NoteRecord};
use crate::sequence::NoteSequence;
use crate::{wasm_info, wasm_log, wasm_warn};

lazy_static! {
    static ref SEQUENCE: Mutex<Option<NoteSequence>> = Mutex::new(None);
}

/// Run `f` against the loaded sequence
fn with_sequence<T>(
    f: impl FnOnce(&mut NoteSequence) -> Result<T, SequenceError>,
) -> Result<T, JsValue> {
    let mut guard = SEQUENCE
        .lock()
        .map_err(|e| js_error(format!("sequence lock poisoned: {}", e)))?;
    let sequence = guard.as_mut().ok_or_else(|| {
        wasm_warn!("no sequence loaded");
        JsValue::from_str("No sequence loaded")
    })?;
    f(sequence).map_err(js_error)
}

fn settings_from_js(settings_js: JsValue) -> Result<EditorSettings, JsValue> {
    if settings_js.is_undefined() || settings_js.is_null() {
        Ok(EditorSettings::default())
    } else {
        deserialize(settings_js, "Settings deserialization error")
    }
}

fn install(sequence: NoteSequence) -> Result<(), JsValue> {
    let mut guard = SEQUENCE
        .lock()
        .map_err(|e| js_error(format!("sequence lock poisoned: {}", e)))?;
    wasm_info!("installed sequence: {} notes", sequence.len());
    *guard = Some(sequence);
    Ok(())
}

/// Replace the loaded sequence with `records` (`[{name, duration, isNote}]`).
///
/// `settings` may be `undefined` for the defaults.
#[wasm_bindgen(js_name = loadSequence)]
pub fn load_sequence(records_js: JsValue, settings_js: JsValue) -> Result<(), JsValue> {
    wasm_info!("loadSequence called");

    let records: Vec<NoteRecord> = deserialize(records_js, "Note records deserialization error")?;
    let mut sequence = NoteSequence::with_settings(settings_from_js(settings_js)?);
    let notes = records
        .iter()
        .map(Note::from_record)
        .collect::<Result<Vec<_>, _>>()
        .map_err(js_error)?;
    sequence.load(notes);

    install(sequence)
}

/// Replace the loaded sequence with bare pitch names (`["E4", "F4"]`), each
/// lasting the settings' `default_duration`
#[wasm_bindgen(js_name = loadNames)]
pub fn load_names(names_js: JsValue, settings_js: JsValue) -> Result<(), JsValue> {
    wasm_info!("loadNames called");

    let names: Vec<String> = deserialize(names_js, "Note names deserialization error")?;
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut sequence = NoteSequence::with_settings(settings_from_js(settings_js)?);
    sequence.load_names(&names).map_err(js_error)?;

    install(sequence)
}

/// Current notes as exchange records
#[wasm_bindgen(js_name = getNotes)]
pub fn get_notes() -> Result<JsValue, JsValue> {
    let records = with_sequence(|sequence| Ok(sequence.to_records()))?;
    serialize(&records, "Note records serialization error")
}

#[wasm_bindgen(js_name = getNoteNames)]
pub fn get_note_names() -> Result<js_sys::Array, JsValue> {
    let names = with_sequence(|sequence| Ok(sequence.all_note_names()))?;
    Ok(names.iter().map(|name| JsValue::from_str(name)).collect())
}

/// Bars with per-note layout positions
#[wasm_bindgen(js_name = getBars)]
pub fn get_bars() -> Result<JsValue, JsValue> {
    let bars = with_sequence(|sequence| Ok(sequence.bar_views()))?;
    wasm_log!("getBars: {} bars", bars.len());
    serialize(&bars, "Bar serialization error")
}

/// Cursor index, or -1 when nothing is selected
#[wasm_bindgen(js_name = getSelectedIndex)]
pub fn get_selected_index() -> Result<i32, JsValue> {
    with_sequence(|sequence| Ok(sequence.selected_index().map_or(-1, |i| i as i32)))
}

#[wasm_bindgen(js_name = selectNote)]
pub fn select_note(index: usize) -> Result<(), JsValue> {
    with_sequence(|sequence| sequence.select(index))
}

#[wasm_bindgen(js_name = clickNote)]
pub fn click_note(index: usize) -> Result<(), JsValue> {
    with_sequence(|sequence| sequence.click(index))
}

#[wasm_bindgen(js_name = deselectAll)]
pub fn deselect_all() -> Result<(), JsValue> {
    with_sequence(|sequence| {
        sequence.deselect_all();
        Ok(())
    })
}

#[wasm_bindgen(js_name = selectNext)]
pub fn select_next() -> Result<(), JsValue> {
    with_sequence(|sequence| {
        sequence.select_next();
        Ok(())
    })
}

#[wasm_bindgen(js_name = selectPrev)]
pub fn select_prev() -> Result<(), JsValue> {
    with_sequence(|sequence| {
        sequence.select_prev();
        Ok(())
    })
}

#[wasm_bindgen(js_name = selectNextBar)]
pub fn select_next_bar() -> Result<(), JsValue> {
    with_sequence(|sequence| {
        sequence.select_next_bar();
        Ok(())
    })
}

#[wasm_bindgen(js_name = selectPrevBar)]
pub fn select_prev_bar() -> Result<(), JsValue> {
    with_sequence(|sequence| {
        sequence.select_prev_bar();
        Ok(())
    })
}

/// Set the selected note's duration from notation such as `"8n."`
#[wasm_bindgen(js_name = setSelectedDuration)]
pub fn set_selected_duration(duration: &str) -> Result<(), JsValue> {
    wasm_info!("setSelectedDuration: {:?}", duration);
    let duration = Duration::parse(duration).map_err(js_error)?;
    with_sequence(|sequence| sequence.set_selected_to(duration))
}

#[wasm_bindgen(js_name = halveSelected)]
pub fn halve_selected() -> Result<(), JsValue> {
    with_sequence(NoteSequence::halve_selected_duration)
}

#[wasm_bindgen(js_name = doubleSelected)]
pub fn double_selected() -> Result<(), JsValue> {
    with_sequence(NoteSequence::double_selected_duration)
}

#[wasm_bindgen(js_name = toggleDot)]
pub fn toggle_dot() -> Result<(), JsValue> {
    with_sequence(NoteSequence::toggle_dot_for_selected)
}

#[wasm_bindgen(js_name = duplicateNote)]
pub fn duplicate_note() -> Result<(), JsValue> {
    with_sequence(NoteSequence::duplicate_note)
}

#[wasm_bindgen(js_name = deleteSelected)]
pub fn delete_selected() -> Result<(), JsValue> {
    with_sequence(NoteSequence::delete_selected)
}

#[wasm_bindgen(js_name = incrementSelected)]
pub fn increment_selected() -> Result<(), JsValue> {
    with_sequence(NoteSequence::increment_selected)
}

#[wasm_bindgen(js_name = decrementSelected)]
pub fn decrement_selected() -> Result<(), JsValue> {
    with_sequence(NoteSequence::decrement_selected)
}

#[wasm_bindgen(js_name = toggleRest)]
pub fn toggle_rest() -> Result<(), JsValue> {
    with_sequence(NoteSequence::toggle_rest_for_selected)
}

/// Undo the last edit, returning its label
#[wasm_bindgen]
pub fn undo() -> Result<String, JsValue> {
    let command = with_sequence(NoteSequence::undo)?;
    wasm_info!("undo: {}", command.label());
    Ok(command.label().to_string())
}

/// Redo the last undone edit, returning its label
#[wasm_bindgen]
pub fn redo() -> Result<String, JsValue> {
    let command = with_sequence(NoteSequence::redo)?;
    wasm_info!("redo: {}", command.label());
    Ok(command.label().to_string())
}

#[wasm_bindgen(js_name = canUndo)]
pub fn can_undo() -> Result<bool, JsValue> {
    with_sequence(|sequence| Ok(sequence.can_undo()))
}

#[wasm_bindgen(js_name = canRedo)]
pub fn can_redo() -> Result<bool, JsValue> {
    with_sequence(|sequence| Ok(sequence.can_redo()))
}
