// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cyclone: conversion between a continuous arrangement timeline and the
//! scene-based CKS sequencer file format.

pub mod arrangement;
pub mod cks;
pub mod config;
pub mod convert;
pub mod metadata;
pub mod timing;

pub use arrangement::{PatternInstance, SceneMarker, Timeline, Track};
pub use cks::CksFile;
pub use config::ConverterConfig;
pub use convert::{
    export, export_clean, import, load_file, parse, save_file, serialize, ConvertError, Converter,
    ExportOptions,
};
