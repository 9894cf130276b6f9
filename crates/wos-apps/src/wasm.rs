//! Browser binding for the AI assistant
//!
//! [`JsAiCompletion`] wraps a page function `(prompt, includeContext)`
//! returning a string or a `Promise<string>`. Promises are awaited on the
//! browser's task queue; the terminal prints the answer on its next
//! [`crate::System::tick`].

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::ai::{AiCompletion, AiResponder};
use crate::error::{AppError, AppResult};

fn describe(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

fn text(value: JsValue) -> AppResult<String> {
    value
        .as_string()
        .ok_or_else(|| AppError::AiFailed("answer is not a string".into()))
}

/// Page-provided assistant
pub struct JsAiCompletion {
    function: Function,
}

impl JsAiCompletion {
    pub fn new(function: Function) -> Self {
        Self { function }
    }

    /// Look up a global function such as `getAIResponse`
    pub fn from_global(name: &str) -> Option<Self> {
        let global: JsValue = js_sys::global().into();
        let value = Reflect::get(&global, &JsValue::from_str(name)).ok()?;
        value.dyn_into::<Function>().ok().map(Self::new)
    }
}

impl AiCompletion for JsAiCompletion {
    fn get_response(&self, prompt: &str, include_context: bool, reply: AiResponder) {
        let called = self.function.call2(
            &JsValue::NULL,
            &JsValue::from_str(prompt),
            &JsValue::from_bool(include_context),
        );
        let value = match called {
            Ok(value) => value,
            Err(e) => {
                reply.respond(Err(AppError::AiFailed(describe(e))));
                return;
            }
        };
        match value.dyn_into::<Promise>() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                let result = JsFuture::from(promise)
                    .await
                    .map_err(|e| AppError::AiFailed(describe(e)))
                    .and_then(text);
                reply.respond(result);
            }),
            Err(value) => reply.respond(text(value)),
        }
    }
}
