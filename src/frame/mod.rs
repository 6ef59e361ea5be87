//! Frame Adapter: image tensors in, still-frame [`VisualClip`]s out.

pub(crate) mod adapter;
pub(crate) mod tensor;
