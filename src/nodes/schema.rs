use std::collections::BTreeMap;

use crate::audio::buffer::AudioBuffer;
use crate::foundation::error::{ClipError, ClipResult};
use crate::frame::adapter::VisualClip;
use crate::frame::tensor::ImageBuffer;

/// Declared type and bounds of one node input, as advertised to the host.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type")]
pub enum ParamSpec {
    #[serde(rename = "IMAGE")]
    Image,
    #[serde(rename = "AUDIO")]
    Audio,
    #[serde(rename = "VideoCLIP")]
    Clip,
    #[serde(rename = "BOOLEAN")]
    Bool { default: bool },
    #[serde(rename = "FLOAT")]
    Float {
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    },
    #[serde(rename = "INT")]
    Int { default: i64, min: i64, max: i64 },
    #[serde(rename = "STRING")]
    Str { default: String },
}

/// Named input of a node.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ParamDecl {
    pub name: &'static str,
    #[serde(flatten)]
    pub spec: ParamSpec,
}

impl ParamDecl {
    pub fn new(name: &'static str, spec: ParamSpec) -> Self {
        Self { name, spec }
    }
}

/// Runtime value flowing through node sockets.
#[derive(Clone, Debug)]
pub enum NodeValue {
    Image(ImageBuffer),
    Audio(AudioBuffer),
    Clip(VisualClip),
    Bool(bool),
    Float(f64),
    Int(i64),
    Str(String),
}

impl NodeValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Image(_) => "IMAGE",
            Self::Audio(_) => "AUDIO",
            Self::Clip(_) => "VideoCLIP",
            Self::Bool(_) => "BOOLEAN",
            Self::Float(_) => "FLOAT",
            Self::Int(_) => "INT",
            Self::Str(_) => "STRING",
        }
    }
}

impl ParamSpec {
    /// Default for scalar parameters; tensors and clips have none.
    pub fn default_value(&self) -> Option<NodeValue> {
        match self {
            Self::Image | Self::Audio | Self::Clip => None,
            Self::Bool { default } => Some(NodeValue::Bool(*default)),
            Self::Float { default, .. } => Some(NodeValue::Float(*default)),
            Self::Int { default, .. } => Some(NodeValue::Int(*default)),
            Self::Str { default } => Some(NodeValue::Str(default.clone())),
        }
    }

    /// Check `value` against the declared type, range and step.
    ///
    /// Host-side declarations are advisory; every value is re-checked here.
    /// Integer values are accepted for float parameters.
    pub fn check(&self, name: &str, value: NodeValue) -> ClipResult<NodeValue> {
        let mismatch = |value: &NodeValue| {
            ClipError::invalid_input(format!(
                "input '{name}' expects {}, got {}",
                self.type_name(),
                value.type_name()
            ))
        };

        match (self, value) {
            (Self::Image, v @ NodeValue::Image(_))
            | (Self::Audio, v @ NodeValue::Audio(_))
            | (Self::Clip, v @ NodeValue::Clip(_))
            | (Self::Bool { .. }, v @ NodeValue::Bool(_))
            | (Self::Str { .. }, v @ NodeValue::Str(_)) => Ok(v),
            (Self::Float { min, max, step, .. }, NodeValue::Float(x)) => {
                check_float(name, x, *min, *max, *step).map(NodeValue::Float)
            }
            (Self::Float { min, max, step, .. }, NodeValue::Int(i)) => {
                check_float(name, i as f64, *min, *max, *step).map(NodeValue::Float)
            }
            (Self::Int { min, max, .. }, NodeValue::Int(i)) => {
                if i < *min || i > *max {
                    return Err(ClipError::invalid_input(format!(
                        "input '{name}' must be in {min}..={max}, got {i}"
                    )));
                }
                Ok(NodeValue::Int(i))
            }
            (_, v) => Err(mismatch(&v)),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
            Self::Audio => "AUDIO",
            Self::Clip => "VideoCLIP",
            Self::Bool { .. } => "BOOLEAN",
            Self::Float { .. } => "FLOAT",
            Self::Int { .. } => "INT",
            Self::Str { .. } => "STRING",
        }
    }
}

fn check_float(name: &str, x: f64, min: f64, max: f64, step: f64) -> ClipResult<f64> {
    if !x.is_finite() {
        return Err(ClipError::invalid_input(format!(
            "input '{name}' must be finite, got {x}"
        )));
    }
    // Tolerance absorbs decimal steps that are not exact in binary.
    let eps = step.max(1.0) * 1e-9;
    if x < min - eps || x > max + eps {
        return Err(ClipError::invalid_input(format!(
            "input '{name}' must be in [{min}, {max}], got {x}"
        )));
    }
    if step > 0.0 {
        let steps = (x - min) / step;
        if (steps - steps.round()).abs() > 1e-6 {
            return Err(ClipError::invalid_input(format!(
                "input '{name}' must be a multiple of {step} from {min}, got {x}"
            )));
        }
    }
    Ok(x)
}

/// Named inputs for one node execution.
#[derive(Clone, Debug, Default)]
pub struct NodeInputs(BTreeMap<String, NodeValue>);

impl NodeInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: NodeValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: NodeValue) {
        self.0.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate against `decls`: fill scalar defaults, reject missing
    /// tensors, unknown names and out-of-range values.
    pub fn resolve(mut self, decls: &[ParamDecl]) -> ClipResult<Self> {
        let mut out = BTreeMap::new();
        for decl in decls {
            let value = match self.0.remove(decl.name) {
                Some(v) => v,
                None => decl.spec.default_value().ok_or_else(|| {
                    ClipError::invalid_input(format!("missing required input '{}'", decl.name))
                })?,
            };
            out.insert(decl.name.to_string(), decl.spec.check(decl.name, value)?);
        }
        if let Some(extra) = self.0.keys().next() {
            return Err(ClipError::invalid_input(format!("unknown input '{extra}'")));
        }
        Ok(Self(out))
    }

    fn take(&mut self, name: &str) -> ClipResult<NodeValue> {
        self.0
            .remove(name)
            .ok_or_else(|| ClipError::invalid_input(format!("missing input '{name}'")))
    }

    pub fn take_image(&mut self, name: &str) -> ClipResult<ImageBuffer> {
        match self.take(name)? {
            NodeValue::Image(v) => Ok(v),
            other => Err(wrong_type(name, "IMAGE", &other)),
        }
    }

    pub fn take_audio(&mut self, name: &str) -> ClipResult<AudioBuffer> {
        match self.take(name)? {
            NodeValue::Audio(v) => Ok(v),
            other => Err(wrong_type(name, "AUDIO", &other)),
        }
    }

    pub fn take_clip(&mut self, name: &str) -> ClipResult<VisualClip> {
        match self.take(name)? {
            NodeValue::Clip(v) => Ok(v),
            other => Err(wrong_type(name, "VideoCLIP", &other)),
        }
    }

    pub fn take_bool(&mut self, name: &str) -> ClipResult<bool> {
        match self.take(name)? {
            NodeValue::Bool(v) => Ok(v),
            other => Err(wrong_type(name, "BOOLEAN", &other)),
        }
    }

    pub fn take_float(&mut self, name: &str) -> ClipResult<f64> {
        match self.take(name)? {
            NodeValue::Float(v) => Ok(v),
            other => Err(wrong_type(name, "FLOAT", &other)),
        }
    }

    pub fn take_int(&mut self, name: &str) -> ClipResult<i64> {
        match self.take(name)? {
            NodeValue::Int(v) => Ok(v),
            other => Err(wrong_type(name, "INT", &other)),
        }
    }

    pub fn take_str(&mut self, name: &str) -> ClipResult<String> {
        match self.take(name)? {
            NodeValue::Str(v) => Ok(v),
            other => Err(wrong_type(name, "STRING", &other)),
        }
    }
}

fn wrong_type(name: &str, expected: &str, got: &NodeValue) -> ClipError {
    ClipError::invalid_input(format!(
        "input '{name}' expects {expected}, got {}",
        got.type_name()
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/schema.rs"]
mod tests;
