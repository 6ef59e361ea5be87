//! Clip Exporter: stage audio, mux with the still frame, write a
//! collision-free file under the output directory.

pub(crate) mod exporter;
pub(crate) mod ffmpeg;
pub(crate) mod naming;
pub(crate) mod request;
pub(crate) mod staging;
pub(crate) mod tool;
