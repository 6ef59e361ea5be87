//! Audio buffers and the Audio Inspector.

pub(crate) mod buffer;
pub(crate) mod inspect;
