//! # Easel
//!
//! A single-image raster scratchpad served over HTTP. A client uploads an
//! image, then edits it with pencil, eraser, crop, and flood-fill tools;
//! every edit decodes the file from disk, applies one raster primitive, and
//! encodes the result back in place.
//!
//! # Architecture
//!
//! ```text
//! client → handler → lock workspace → decode → primitive → encode → JSON
//! ```
//!
//! There is no pipeline and no persistent model beyond the files in one
//! workspace directory. All shared mutable state — which file is active and
//! where the last crop went — lives in a single [`workspace::Workspace`]
//! behind one mutex, so concurrent edits serialize instead of racing on the
//! same file.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`api`] | axum router, the ten handlers, JSON request/response records |
//! | [`workspace`] | workspace directory, active/cut slots, upload cleanup |
//! | [`raster`] | pixel work: drawing primitives, crop extraction, flood fill |
//!
//! # Design Decisions
//!
//! ## One Mutex, Held Across the Whole Edit
//!
//! The original tool this service descends from mutated a shared image file
//! from concurrent requests with no synchronization at all. Here the
//! workspace mutex is held from before the decode until after the encode,
//! so the on-disk file is always a complete, decodable image between
//! requests. Throughput is not a concern for a single-user scratchpad;
//! correctness of the file is.
//!
//! ## Decode → Mutate → Encode, No Caching
//!
//! Every handler independently round-trips the file through memory. Caching
//! the pixel buffer would save a decode per request but add an invalidation
//! story for a tool whose entire state is "the file on disk". The file stays
//! the single source of truth.
//!
//! ## Pure-Rust Imaging
//!
//! Codecs come from the `image` crate, drawing primitives from `imageproc` —
//! both pure Rust, statically linked. The two algorithms neither crate
//! offers (tolerance flood fill, sub-pixel window extraction) are small
//! in-crate functions rather than reasons to grow a native dependency.

pub mod api;
pub mod raster;
pub mod workspace;
