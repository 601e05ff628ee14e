//! Per-scene configuration
//!
//! Scene entries are loosely typed JSON. They are coerced into
//! [`SceneConfig`] once, at load time; a failed coercion is kept by the
//! registry and surfaces when the scene is selected.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::common::{Error, Result};

/// Entry script used when a scene does not name one
pub const DEFAULT_LUA_ENTRY: &str = "luau/index.luau";
/// Logical width used when a scene does not set one
pub const DEFAULT_WIDTH: u32 = 1280;
/// Logical height used when a scene does not set one
pub const DEFAULT_HEIGHT: u32 = 720;

/// Configuration for a single scene
///
/// Every field is optional; accessors apply the documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    /// Baseline path relative to the repo root
    pub baseline: Option<String>,
    /// Entry script passed to the native runner
    pub lua_entry: Option<String>,
    /// Optional app module passed to the native runner
    pub app_module: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Exact framebuffer width, if the scene pins one
    pub pixel_width: Option<u32>,
    /// Exact framebuffer height, if the scene pins one
    pub pixel_height: Option<u32>,
}

impl SceneConfig {
    /// Coerce a raw JSON scene entry
    ///
    /// String fields of the wrong type, or empty baselines, are treated as
    /// absent. Numeric fields accept integers, floats (truncated) and
    /// integer strings; anything else is rejected.
    ///
    /// Dimensions must fit a `u32`. Negative values, values above
    /// `u32::MAX` and booleans are rejected on purpose rather than passed
    /// through to the runner, even though `true` reads as 1 in loosely
    /// typed callers.
    pub fn from_value(name: &str, value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::invalid_scene(name, "expected a JSON object"))?;

        Ok(Self {
            baseline: string_field(obj, "baseline").filter(|s| !s.is_empty()),
            lua_entry: string_field(obj, "luaEntry"),
            app_module: string_field(obj, "appModule"),
            width: dimension_field(name, obj, "width")?,
            height: dimension_field(name, obj, "height")?,
            pixel_width: dimension_field(name, obj, "pixelWidth")?,
            pixel_height: dimension_field(name, obj, "pixelHeight")?,
        })
    }

    pub fn lua_entry(&self) -> &str {
        self.lua_entry.as_deref().unwrap_or(DEFAULT_LUA_ENTRY)
    }

    pub fn width(&self) -> u32 {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    pub fn height(&self) -> u32 {
        self.height.unwrap_or(DEFAULT_HEIGHT)
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn dimension_field(scene: &str, obj: &Map<String, Value>, key: &str) -> Result<Option<u32>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce_u32(value).map(Some).ok_or_else(|| {
            Error::invalid_scene(scene, format!("'{key}' is not an integer: {value}"))
        }),
    }
}

fn coerce_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).ok()
            } else {
                // Negative integers land here too and fail the range check
                let f = n.as_f64()?.trunc();
                (f.is_finite() && f >= 0.0 && f <= f64::from(u32::MAX)).then_some(f as u32)
            }
        }
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}
