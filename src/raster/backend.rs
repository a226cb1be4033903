//! Raster backend trait and shared types.
//!
//! The [`RasterBackend`] trait defines the pixel operations the service
//! needs: identify, the four in-place drawing primitives, crop extraction,
//! flood fill, and transcode.
//!
//! The production implementation is
//! [`SoftwareRaster`](super::software::SoftwareRaster) — pure Rust via the
//! `image` and `imageproc` crates, statically linked into the binary.

use super::params::{BlockParams, DiscParams, ExtractParams, FloodParams, StrokeParams};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("seed point ({0}, {1}) is outside the image")]
    SeedOutOfBounds(i32, i32),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for raster backends.
///
/// Every operation decodes its source from disk, works on the pixel buffer
/// in memory, and encodes the result in a single write, so the file named by
/// a params struct is always a complete image once the call returns.
pub trait RasterBackend: Send + Sync {
    /// Read image dimensions without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, RasterError>;

    /// Paint a filled circle in place.
    fn disc(&self, params: &DiscParams) -> Result<(), RasterError>;

    /// Paint a stroke between two points in place.
    fn stroke(&self, params: &StrokeParams) -> Result<(), RasterError>;

    /// Paint a filled axis-aligned rectangle in place.
    fn block(&self, params: &BlockParams) -> Result<(), RasterError>;

    /// Extract a crop window into `params.output`.
    fn extract(&self, params: &ExtractParams) -> Result<(), RasterError>;

    /// Flood-fill from a seed point into `params.output`, leaving the source
    /// untouched.
    fn flood(&self, params: &FloodParams) -> Result<(), RasterError>;

    /// Decode `source` and re-encode it at `output` (format from extension).
    fn transcode(&self, source: &Path, output: &Path) -> Result<(), RasterError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that records operations without touching any pixels.
    #[derive(Default)]
    pub struct MockRaster {
        pub identify_results: Mutex<Vec<Dimensions>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(PathBuf),
        Disc(DiscParams),
        Stroke(StrokeParams),
        Block(BlockParams),
        Extract(ExtractParams),
        Flood(FloodParams),
        Transcode { source: PathBuf, output: PathBuf },
    }

    impl MockRaster {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                identify_results: Mutex::new(dims),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn recorded(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }
    }

    impl RasterBackend for MockRaster {
        fn identify(&self, path: &Path) -> Result<Dimensions, RasterError> {
            self.record(RecordedOp::Identify(path.to_path_buf()));
            self.identify_results.lock().unwrap().pop().ok_or_else(|| {
                RasterError::Io(std::io::Error::other("no mock dimensions queued"))
            })
        }

        fn disc(&self, params: &DiscParams) -> Result<(), RasterError> {
            self.record(RecordedOp::Disc(params.clone()));
            Ok(())
        }

        fn stroke(&self, params: &StrokeParams) -> Result<(), RasterError> {
            self.record(RecordedOp::Stroke(params.clone()));
            Ok(())
        }

        fn block(&self, params: &BlockParams) -> Result<(), RasterError> {
            self.record(RecordedOp::Block(params.clone()));
            Ok(())
        }

        fn extract(&self, params: &ExtractParams) -> Result<(), RasterError> {
            self.record(RecordedOp::Extract(params.clone()));
            Ok(())
        }

        fn flood(&self, params: &FloodParams) -> Result<(), RasterError> {
            self.record(RecordedOp::Flood(params.clone()));
            Ok(())
        }

        fn transcode(&self, source: &Path, output: &Path) -> Result<(), RasterError> {
            self.record(RecordedOp::Transcode {
                source: source.to_path_buf(),
                output: output.to_path_buf(),
            });
            Ok(())
        }
    }

    #[test]
    fn mock_records_in_call_order() {
        let mock = MockRaster::with_dimensions(vec![Dimensions {
            width: 64,
            height: 32,
        }]);

        let dims = mock.identify(Path::new("/w/active.png")).unwrap();
        assert_eq!(dims.width, 64);
        mock.transcode(Path::new("/w/cut_image.jpg"), Path::new("/w/active.png"))
            .unwrap();

        let ops = mock.recorded();
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == Path::new("/w/active.png")));
        assert!(matches!(&ops[1], RecordedOp::Transcode { .. }));
    }

    #[test]
    fn mock_identify_fails_when_exhausted() {
        let mock = MockRaster::new();
        assert!(mock.identify(Path::new("/w/active.png")).is_err());
    }
}
