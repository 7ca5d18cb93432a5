//! Session state: the loaded source, the displayed result, and request
//! sequencing.
//!
//! A session holds at most one source image and one displayed result. Every
//! compression request gets a strictly increasing sequence number; a
//! completion is installed only if it belongs to the most recently issued
//! request, so a slow stale run can never overwrite a newer result. Loading a
//! new file invalidates every request issued before it.
//!
//! The loaded source and the displayed result each get their own display
//! handle. Installing a result first releases the previous result handle;
//! loading a file releases both. Release is best-effort: failures are logged
//! and otherwise ignored.

use std::fmt;

use log::{debug, info, warn};

use crate::codec::{Codec, ImageCodec, Raster};
use crate::compress::{CompressionResult, Compressor, SourceImage};
use crate::config::CompressionConfig;
use crate::size::format_file_size;
use crate::{CompressError, Quality};

/// Prefix added to the original file name for downloads.
pub const DOWNLOAD_PREFIX: &str = "compressed_";

/// Something that can show encoded bytes as an image.
///
/// On the web this is an object URL per blob; handles must be released when
/// the result they show is superseded.
pub trait DisplaySurface {
    type Handle;
    type Error: fmt::Display;

    fn create(&mut self, bytes: &[u8], mime: &str) -> Result<Self::Handle, Self::Error>;

    fn release(&mut self, handle: Self::Handle) -> Result<(), Self::Error>;
}

/// One compression request, immutable once issued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionRequest {
    pub sequence: u64,
    pub quality: Quality,
}

/// What happened to a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result is now displayed.
    Installed,
    /// A newer request was issued (or a new file loaded); the result was
    /// discarded.
    Stale,
}

/// A file ready to be saved by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download<'a> {
    pub file_name: String,
    pub mime: &'a str,
    pub bytes: &'a [u8],
}

#[derive(Debug)]
struct LoadedSource {
    image: SourceImage,
    raster: Raster,
}

#[derive(Debug)]
struct Displayed<H> {
    result: CompressionResult,
    handle: Option<H>,
}

/// Explicit state of one compression session.
pub struct Session<S: DisplaySurface, C = ImageCodec> {
    compressor: Compressor<C>,
    surface: S,
    source: Option<LoadedSource>,
    source_handle: Option<S::Handle>,
    displayed: Option<Displayed<S::Handle>>,
    next_sequence: u64,
    latest_issued: Option<u64>,
}

impl<S: DisplaySurface> Session<S, ImageCodec> {
    /// A session using the `image` crate codec.
    pub fn new(surface: S, config: &CompressionConfig) -> Result<Self, CompressError> {
        Ok(Self::with_compressor(
            Compressor::from_config(config)?,
            surface,
        ))
    }
}

impl<S: DisplaySurface, C: Codec> Session<S, C> {
    pub fn with_compressor(compressor: Compressor<C>, surface: S) -> Self {
        Self {
            compressor,
            surface,
            source: None,
            source_handle: None,
            displayed: None,
            next_sequence: 1,
            latest_issued: None,
        }
    }

    /// Load a newly selected file.
    ///
    /// The declared type is checked first and the bytes decoded once. On any
    /// failure the session is left exactly as it was. On success the previous
    /// result and source handles are released, a handle for the new source
    /// is created, and requests issued so far become stale.
    pub fn select_file(
        &mut self,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<(), CompressError> {
        let image = SourceImage::new(file_name, mime, bytes)?;
        let raster = self.compressor.decode(&image)?;

        info!(
            "loaded {} ({}, {})",
            image.file_name(),
            image.mime(),
            format_file_size(image.byte_len() as u64)
        );

        self.release_displayed();
        self.release_source_handle();
        self.source_handle = self.create_handle(image.bytes(), image.mime());
        self.source = Some(LoadedSource { image, raster });
        self.latest_issued = None;
        Ok(())
    }

    /// Issue a request for the current source at `quality`.
    pub fn issue(&mut self, quality: Quality) -> Result<CompressionRequest, CompressError> {
        if self.source.is_none() {
            return Err(CompressError::NoSource);
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.latest_issued = Some(sequence);
        Ok(CompressionRequest { sequence, quality })
    }

    /// Compute the result for `request` without touching displayed state.
    pub fn run(&self, request: &CompressionRequest) -> Result<CompressionResult, CompressError> {
        let source = self.source.as_ref().ok_or(CompressError::NoSource)?;
        self.compressor
            .compress_raster(&source.image, &source.raster, request.quality)
    }

    /// Hand back the outcome of `request`.
    ///
    /// Outcomes of stale requests are dropped, errors included. An error for
    /// the latest request is returned and the displayed result is kept.
    pub fn complete(
        &mut self,
        request: &CompressionRequest,
        outcome: Result<CompressionResult, CompressError>,
    ) -> Result<Completion, CompressError> {
        if self.latest_issued != Some(request.sequence) {
            debug!(
                "discarding stale result for request {} (latest {:?})",
                request.sequence, self.latest_issued
            );
            return Ok(Completion::Stale);
        }

        self.install(outcome?);
        Ok(Completion::Installed)
    }

    /// Issue, run and complete a request in one step.
    pub fn compress(&mut self, quality: Quality) -> Result<&CompressionResult, CompressError> {
        let request = self.issue(quality)?;
        let outcome = self.run(&request);
        self.complete(&request, outcome)?;
        self.current().ok_or(CompressError::NoSource)
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref().map(|loaded| &loaded.image)
    }

    pub fn current(&self) -> Option<&CompressionResult> {
        self.displayed.as_ref().map(|displayed| &displayed.result)
    }

    /// Display handle of the loaded source, if one could be created.
    pub fn source_handle(&self) -> Option<&S::Handle> {
        self.source_handle.as_ref()
    }

    /// Display handle of the current result, if one could be created.
    pub fn handle(&self) -> Option<&S::Handle> {
        self.displayed.as_ref().and_then(|displayed| displayed.handle.as_ref())
    }

    pub fn latest_sequence(&self) -> Option<u64> {
        self.latest_issued
    }

    /// The current result packaged for saving as `compressed_<name>`.
    pub fn download(&self) -> Option<Download<'_>> {
        let source = self.source()?;
        let result = self.current()?;
        Some(Download {
            file_name: format!("{DOWNLOAD_PREFIX}{}", source.file_name()),
            mime: &result.mime,
            bytes: &result.bytes,
        })
    }

    pub fn original_size_label(&self) -> Option<String> {
        self.source()
            .map(|source| format_file_size(source.byte_len() as u64))
    }

    pub fn result_size_label(&self) -> Option<String> {
        self.current()
            .map(|result| format_file_size(result.byte_len() as u64))
    }

    /// Release the displayed result and its handle.
    pub fn clear(&mut self) {
        self.release_displayed();
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn compressor(&self) -> &Compressor<C> {
        &self.compressor
    }

    fn install(&mut self, result: CompressionResult) {
        self.release_displayed();
        let handle = self.create_handle(&result.bytes, &result.mime);
        self.displayed = Some(Displayed { result, handle });
    }

    fn create_handle(&mut self, bytes: &[u8], mime: &str) -> Option<S::Handle> {
        match self.surface.create(bytes, mime) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("failed to create display handle: {e}");
                None
            }
        }
    }
}

impl<S: DisplaySurface, C> Session<S, C> {
    fn release_displayed(&mut self) {
        if let Some(handle) = self.displayed.take().and_then(|displayed| displayed.handle) {
            self.release_handle(handle);
        }
    }

    fn release_source_handle(&mut self) {
        if let Some(handle) = self.source_handle.take() {
            self.release_handle(handle);
        }
    }

    fn release_handle(&mut self, handle: S::Handle) {
        if let Err(e) = self.surface.release(handle) {
            warn!("failed to release display handle: {e}");
        }
    }
}

impl<S: DisplaySurface, C> Drop for Session<S, C> {
    fn drop(&mut self) {
        self.release_displayed();
        self.release_source_handle();
    }
}
