use nimbus_core::constants::PRESET_STORAGE_KEY;
use nimbus_core::Preset;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

const PRESET_EXTENSION: &str = ".ron";
const PRESET_MIME: &str = "text/plain";

/// Check if the File System Access API (showSaveFilePicker) is available.
pub fn has_file_system_access() -> bool {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return false,
    };
    js_sys::Reflect::has(&window, &JsValue::from_str("showSaveFilePicker")).unwrap_or(false)
}

/// Save data to a file. Uses File System Access API if available, otherwise Blob URL fallback.
pub fn save_to_file(data: &[u8], filename: &str) {
    if has_file_system_access() {
        save_via_file_system_access(data, filename);
    } else {
        let array = js_sys::Uint8Array::from(data);
        if let Err(e) = save_blob_from_array(&array, filename) {
            log::error!("Preset download failed: {:?}", e);
        }
    }
}

/// `{ types: [{ accept: { 'text/plain': ['.ron'] } }] }` plus an optional suggested name.
fn picker_options(suggested_name: Option<&str>) -> Result<js_sys::Object, JsValue> {
    let accept = js_sys::Object::new();
    let extensions = js_sys::Array::new();
    extensions.push(&JsValue::from_str(PRESET_EXTENSION));
    js_sys::Reflect::set(&accept, &JsValue::from_str(PRESET_MIME), &extensions)?;

    let file_type = js_sys::Object::new();
    js_sys::Reflect::set(&file_type, &JsValue::from_str("accept"), &accept)?;

    let types = js_sys::Array::new();
    types.push(&file_type);

    let options = js_sys::Object::new();
    if let Some(name) = suggested_name {
        js_sys::Reflect::set(
            &options,
            &JsValue::from_str("suggestedName"),
            &JsValue::from_str(name),
        )?;
    }
    js_sys::Reflect::set(&options, &JsValue::from_str("types"), &types)?;
    Ok(options)
}

/// Look up `name` on `target` and call it, awaiting the returned promise.
async fn call_async(
    target: &JsValue,
    name: &str,
    arg: Option<&JsValue>,
) -> Result<JsValue, JsValue> {
    let func: js_sys::Function =
        js_sys::Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    let promise: js_sys::Promise = match arg {
        Some(arg) => func.call1(target, arg)?,
        None => func.call0(target)?,
    }
    .dyn_into()?;
    wasm_bindgen_futures::JsFuture::from(promise).await
}

/// Save using the File System Access API (Chrome/Edge).
fn save_via_file_system_access(data: &[u8], filename: &str) {
    let array = js_sys::Uint8Array::from(data);
    let filename = filename.to_string();

    wasm_bindgen_futures::spawn_local(async move {
        match save_file_picker_inner(&array, &filename).await {
            Ok(()) => log::info!("Preset saved via File System Access API"),
            Err(e) => {
                log::warn!(
                    "File System Access API failed ({:?}), falling back to blob",
                    e
                );
                if let Err(e) = save_blob_from_array(&array, &filename) {
                    log::error!("Preset download failed: {:?}", e);
                }
            }
        }
    });
}

async fn save_file_picker_inner(array: &js_sys::Uint8Array, filename: &str) -> Result<(), JsValue> {
    let window: JsValue = web_sys::window()
        .ok_or_else(|| JsValue::from_str("no global window"))?
        .into();
    let options: JsValue = picker_options(Some(filename))?.into();
    let data: &JsValue = array;

    let handle = call_async(&window, "showSaveFilePicker", Some(&options)).await?;
    let writable = call_async(&handle, "createWritable", None).await?;
    call_async(&writable, "write", Some(data)).await?;
    call_async(&writable, "close", None).await?;
    Ok(())
}

/// Save using a Blob URL + <a download> fallback (Firefox/Safari).
fn save_blob_from_array(array: &js_sys::Uint8Array, filename: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::new();
    parts.push(array);

    let options = web_sys::BlobPropertyBag::new();
    options.set_type(PRESET_MIME);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let document = document()?;
    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.style().set_property("display", "none").ok();

    let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor).ok();

    web_sys::Url::revoke_object_url(&url).ok();
    log::info!("Preset saved via Blob URL download");
    Ok(())
}

/// Trigger a file open dialog and call the callback with the loaded bytes.
/// Uses File System Access API if available, otherwise <input type="file"> fallback.
pub fn load_from_file(callback: impl FnOnce(Vec<u8>) + 'static) {
    if has_file_system_access() {
        load_via_file_system_access(callback);
    } else if let Err(e) = load_via_input_element(callback) {
        log::error!("Preset file dialog failed: {:?}", e);
    }
}

/// Load using the File System Access API (Chrome/Edge).
fn load_via_file_system_access(callback: impl FnOnce(Vec<u8>) + 'static) {
    wasm_bindgen_futures::spawn_local(async move {
        match load_file_picker_inner().await {
            Ok(bytes) => callback(bytes),
            Err(e) => {
                // AbortError: the user closed the picker
                log::info!("No preset loaded via File System Access ({:?})", e);
            }
        }
    });
}

async fn load_file_picker_inner() -> Result<Vec<u8>, JsValue> {
    let window: JsValue = web_sys::window()
        .ok_or_else(|| JsValue::from_str("no global window"))?
        .into();
    let options: JsValue = picker_options(None)?.into();

    let handles: js_sys::Array = call_async(&window, "showOpenFilePicker", Some(&options))
        .await?
        .dyn_into()?;
    if handles.length() == 0 {
        return Err(JsValue::from_str("no file selected"));
    }

    let file = call_async(&handles.get(0), "getFile", None).await?;
    let buffer = call_async(&file, "arrayBuffer", None).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Load using an <input type="file"> element (Firefox/Safari fallback).
fn load_via_input_element(callback: impl FnOnce(Vec<u8>) + 'static) -> Result<(), JsValue> {
    let document = document()?;
    let input: web_sys::HtmlInputElement = document.create_element("input")?.dyn_into()?;

    input.set_type("file");
    input.set_accept(PRESET_EXTENSION);
    input.style().set_property("display", "none").ok();

    let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;
    body.append_child(&input)?;

    let input_clone = input.clone();
    let callback = Rc::new(RefCell::new(Some(callback)));
    let cancel_callback = callback.clone();

    let closure = Closure::<dyn FnMut()>::new(move || {
        if let Some(parent) = input_clone.parent_node() {
            parent.remove_child(&input_clone).ok();
        }
        let Some(file) = input_clone.files().and_then(|files| files.get(0)) else {
            return;
        };
        let Some(cb) = callback.borrow_mut().take() else {
            return;
        };
        if let Err(e) = read_file(&file, cb) {
            log::error!("Failed to read preset file: {:?}", e);
        }
    });

    input.set_onchange(Some(closure.as_ref().unchecked_ref()));
    closure.forget(); // Lives for the click callback's lifetime

    // A cancelled dialog never fires change.
    let cancel_input = input.clone();
    let on_cancel = Closure::once_into_js(move || {
        if let Some(parent) = cancel_input.parent_node() {
            parent.remove_child(&cancel_input).ok();
        }
        cancel_input.set_onchange(None);
        cancel_callback.borrow_mut().take();
    });
    input.add_event_listener_with_callback("cancel", on_cancel.unchecked_ref())?;

    input.click();
    Ok(())
}

fn read_file(
    file: &web_sys::File,
    callback: impl FnOnce(Vec<u8>) + 'static,
) -> Result<(), JsValue> {
    let reader = web_sys::FileReader::new()?;
    let reader_clone = reader.clone();
    let cb = RefCell::new(Some(callback));

    let onload = Closure::<dyn FnMut()>::new(move || {
        let Some(cb) = cb.borrow_mut().take() else {
            return;
        };
        match reader_clone.result() {
            Ok(result) => {
                let buffer = js_sys::ArrayBuffer::from(result);
                cb(js_sys::Uint8Array::new(&buffer).to_vec());
            }
            Err(e) => log::error!("FileReader result missing: {:?}", e),
        }
    });

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget(); // Lives for the callback's lifetime

    reader.read_as_array_buffer(file)
}

fn document() -> Result<web_sys::Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Text of the last applied preset in local storage, if one was saved.
pub fn load_local_preset() -> Option<String> {
    local_storage()?.get_item(PRESET_STORAGE_KEY).ok().flatten()
}

pub fn save_local_preset(preset: &Preset) {
    let Some(storage) = local_storage() else {
        return;
    };
    match preset.to_ron() {
        Ok(text) => {
            if let Err(e) = storage.set_item(PRESET_STORAGE_KEY, &text) {
                log::warn!("Failed to write preset to local storage: {:?}", e);
            }
        }
        Err(e) => log::warn!("{e}"),
    }
}

pub fn clear_local_preset() {
    if let Some(storage) = local_storage() {
        storage.remove_item(PRESET_STORAGE_KEY).ok();
    }
}
