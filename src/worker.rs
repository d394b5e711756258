//! Browser worker entry point.
//!
//! The main thread posts one file per message (ArrayBuffer, typed array,
//! Blob/File or a URL string) and receives `conversion-start` followed by
//! `conversion-complete` or `conversion-error`. The WAV buffer is moved to
//! the main thread through the transfer list instead of being copied.

use js_sys::{Array, ArrayBuffer, Reflect, Uint8Array};
use log::{debug, error, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, DedicatedWorkerGlobalScope, MessageEvent, Response};

use crate::config::WorkerConfig;
use crate::error::ConvertError;
use crate::logging;
use crate::message::{ResponseSink, WorkerResponse, announce_start, handle_file};

/// Posts responses through the worker's `postMessage`.
struct WorkerSink {
    scope: DedicatedWorkerGlobalScope,
}

impl ResponseSink for WorkerSink {
    fn post(&mut self, response: WorkerResponse) -> Result<(), ConvertError> {
        let posted = match to_message(&response)? {
            (message, Some(buffer)) => self
                .scope
                .post_message_with_transfer(&message, &Array::of1(&buffer)),
            (message, None) => self.scope.post_message(&message),
        };
        posted.map_err(host_error)
    }
}

/// Serialize a response for `postMessage`. A completed conversion carries
/// its WAV bytes as a bare `ArrayBuffer`, returned alongside so it can be
/// listed for transfer.
fn to_message(response: &WorkerResponse) -> Result<(JsValue, Option<ArrayBuffer>), ConvertError> {
    let message =
        serde_wasm_bindgen::to_value(response).map_err(|e| ConvertError::Host(e.to_string()))?;
    if !matches!(response, WorkerResponse::ConversionComplete { .. }) {
        return Ok((message, None));
    }

    let key = JsValue::from_str("data");
    let data: Uint8Array = Reflect::get(&message, &key).map_err(host_error)?.unchecked_into();
    let buffer = data.buffer();
    Reflect::set(&message, &key, &buffer).map_err(host_error)?;
    Ok((message, Some(buffer)))
}

/// WASM-exposed: install the message handler on the current worker scope.
///
/// `config` is a [`WorkerConfig`] object, or `undefined` for defaults.
#[wasm_bindgen]
pub fn start_worker(config: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config: WorkerConfig = if config.is_undefined() || config.is_null() {
        WorkerConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };
    logging::init(config.level_filter());

    let scope: DedicatedWorkerGlobalScope = js_sys::global().dyn_into()?;
    let scope_for_callback = scope.clone();

    let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
        let mut sink = WorkerSink {
            scope: scope_for_callback.clone(),
        };
        let data = event.data();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = run_request(&mut sink, data).await {
                error!("could not post response: {e}");
            }
        });
    }) as Box<dyn FnMut(MessageEvent)>);

    scope.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    info!("worker ready (mp3wav {})", crate::VERSION);
    Ok(())
}

async fn run_request(sink: &mut WorkerSink, data: JsValue) -> Result<(), ConvertError> {
    announce_start(sink)?;
    let input = read_input(&sink.scope, data).await;
    handle_file(sink, input)
}

/// Read whatever the main thread sent into a byte vector.
async fn read_input(scope: &DedicatedWorkerGlobalScope, data: JsValue) -> Result<Vec<u8>, ConvertError> {
    if let Some(url) = data.as_string() {
        return fetch_bytes(scope, &url).await;
    }
    if let Some(buffer) = data.dyn_ref::<ArrayBuffer>() {
        return Ok(Uint8Array::new(buffer).to_vec());
    }
    if ArrayBuffer::is_view(&data) {
        return view_bytes(&data);
    }
    if let Some(blob) = data.dyn_ref::<Blob>() {
        debug!("reading blob of {} bytes", blob.size());
        let buffer = JsFuture::from(blob.array_buffer()).await.map_err(host_error)?;
        return Ok(Uint8Array::new(&buffer).to_vec());
    }

    let kind = data.js_typeof().as_string().unwrap_or_default();
    Err(ConvertError::UnsupportedInput(kind))
}

/// Bytes covered by an ArrayBufferView (typed array or DataView), without
/// reinterpreting element types.
fn view_bytes(view: &JsValue) -> Result<Vec<u8>, ConvertError> {
    let get = |key: &str| Reflect::get(view, &JsValue::from_str(key)).map_err(host_error);

    let buffer: ArrayBuffer = get("buffer")?.unchecked_into();
    let offset = get("byteOffset")?.as_f64().unwrap_or(0.0) as u32;
    let length = get("byteLength")?.as_f64().unwrap_or(0.0) as u32;
    Ok(Uint8Array::new_with_byte_offset_and_length(&buffer, offset, length).to_vec())
}

async fn fetch_bytes(scope: &DedicatedWorkerGlobalScope, url: &str) -> Result<Vec<u8>, ConvertError> {
    debug!("fetching {url}");
    let response: Response = JsFuture::from(scope.fetch_with_str(url))
        .await
        .map_err(host_error)?
        .unchecked_into();
    if !response.ok() {
        return Err(ConvertError::Fetch {
            url: url.to_string(),
            status: response.status(),
        });
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(host_error)?)
        .await
        .map_err(host_error)?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

/// Pull a message out of a thrown JS value. An empty message is reported
/// as "Unknown error" further down.
fn host_error(value: JsValue) -> ConvertError {
    let message = Reflect::get(&value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_default();
    ConvertError::Host(message)
}
