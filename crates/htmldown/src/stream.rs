//! Chunked Markdown output.
//!
//! [`MarkdownStream`] renders the document's top-level nodes one at a time and
//! hands out the accumulated Markdown whenever it reaches the chunk size.
//! Non-streamed conversion drives the same iterator to completion, so the two
//! always agree.

use std::borrow::Cow;
use std::fmt;

use htmldown_core::{ConversionOptions, PreprocessingOptions};
use log::{debug, warn};

use crate::metadata::{extract_metadata, render_metadata};
use crate::node::{Document, NodeId, View};
use crate::rules::Rules;
use crate::service::{root_nodes, trailing_context, Walker};
use crate::Result;

/// Progress callback: `(bytes_done, bytes_total)` of source HTML
pub type ProgressFn = Box<dyn FnMut(usize, usize) + Send>;

pub struct StreamingOptions {
    /// Minimum size of a yielded chunk in bytes (the last one may be shorter)
    pub chunk_size: usize,
    pub progress: Option<ProgressFn>,
}

impl Default for StreamingOptions {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            progress: None,
        }
    }
}

impl fmt::Debug for StreamingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingOptions")
            .field("chunk_size", &self.chunk_size)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl StreamingOptions {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: FnMut(usize, usize) + Send + 'static,
    {
        self.progress = Some(Box::new(progress));
        self
    }
}

/// Iterator over Markdown chunks. Stops after the first error.
pub struct MarkdownStream<'a> {
    doc: Cow<'a, Document>,
    view: View,
    rules: Rules,
    options: ConversionOptions,
    roots: Vec<NodeId>,
    next_root: usize,
    pending: String,
    tail: String,
    chunk_size: usize,
    progress: Option<ProgressFn>,
    bytes_done: usize,
    bytes_total: usize,
    finished: bool,
}

impl<'a> MarkdownStream<'a> {
    pub(crate) fn new(
        doc: Cow<'a, Document>,
        rules: Rules,
        options: ConversionOptions,
        preprocessing: &PreprocessingOptions,
        streaming: StreamingOptions,
    ) -> Self {
        let view = View::structural(&doc, preprocessing);
        let roots = root_nodes(&doc, &view);
        let bytes_total = roots.iter().map(|&id| doc.node(id).source_len()).sum();

        let pending = if options.extract_metadata && !options.convert_as_inline {
            render_metadata(&extract_metadata(&doc))
        } else {
            String::new()
        };

        let chunk_size = if streaming.chunk_size == 0 {
            warn!("chunk size 0 is not usable, streaming one byte at a time");
            1
        } else {
            streaming.chunk_size
        };
        debug!(
            "streaming {} top-level nodes ({bytes_total} bytes) in chunks of {chunk_size}",
            roots.len()
        );

        Self {
            doc,
            view,
            rules,
            options,
            roots,
            next_root: 0,
            pending,
            tail: String::new(),
            chunk_size,
            progress: streaming.progress,
            bytes_done: 0,
            bytes_total,
            finished: false,
        }
    }

    /// Source bytes processed so far and in total
    pub fn progress(&self) -> (usize, usize) {
        (self.bytes_done, self.bytes_total)
    }

    fn render_next_root(&mut self) -> Option<Result<()>> {
        let id = *self.roots.get(self.next_root)?;
        self.next_root += 1;

        let walker = Walker {
            doc: &self.doc,
            view: &self.view,
            rules: &self.rules,
            options: &self.options,
        };
        let output = match walker.process_tag(id, self.options.convert_as_inline, &self.tail) {
            Ok(output) => output,
            Err(err) => return Some(Err(err)),
        };

        self.tail = trailing_context(&self.tail, &output);
        self.pending.push_str(&output);
        self.bytes_done += self.doc.node(id).source_len();
        Some(Ok(()))
    }

    fn report(&mut self) {
        if let Some(progress) = self.progress.as_mut() {
            progress(self.bytes_done, self.bytes_total);
        }
    }
}

impl Iterator for MarkdownStream<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while self.pending.len() < self.chunk_size {
            match self.render_next_root() {
                Some(Ok(())) => {}
                Some(Err(err)) => {
                    self.finished = true;
                    return Some(Err(err));
                }
                None => {
                    self.finished = true;
                    break;
                }
            }
        }

        if self.pending.is_empty() {
            // Nothing left; make sure the caller saw the final position
            self.report();
            return None;
        }

        let chunk = std::mem::take(&mut self.pending);
        self.report();
        if self.finished {
            // Already reported the final position with the last chunk
            self.progress = None;
        }
        Some(Ok(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HtmldownService;
    use std::sync::{Arc, Mutex};

    const PAGE: &str = "<html><head><title>T</title></head><body>\
        <h1>One</h1><p>alpha beta</p><ul><li>x</li><li>y</li></ul>\
        <p>gamma</p></body></html>";

    #[test]
    fn test_chunks_concatenate_to_full_output() {
        let service = HtmldownService::new();
        let full = service.convert(PAGE).unwrap();
        for chunk_size in [1, 7, 64, 4096] {
            let chunks: Vec<String> = service
                .convert_stream(PAGE, StreamingOptions::default().with_chunk_size(chunk_size))
                .unwrap()
                .collect::<Result<_>>()
                .unwrap();
            assert_eq!(chunks.concat(), full, "chunk size {chunk_size}");
        }
        assert!(full.starts_with("<!--\ntitle: T\n-->\n\n"));
    }

    #[test]
    fn test_small_chunks_split_output() {
        let service = HtmldownService::new();
        let stream = service
            .convert_stream(PAGE, StreamingOptions::default().with_chunk_size(1))
            .unwrap();
        assert!(stream.count() > 2);
    }

    #[test]
    fn test_progress_is_monotonic_and_complete() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let streaming = StreamingOptions::default()
            .with_chunk_size(1)
            .with_progress(move |done, total| sink.lock().unwrap().push((done, total)));

        let service = HtmldownService::new();
        let stream = service.convert_stream(PAGE, streaming).unwrap();
        let _: Vec<_> = stream.collect();

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|pair| pair[0].0 <= pair[1].0));
        let &(done, total) = seen.last().unwrap();
        assert_eq!(done, total);
        assert!(total > 0);
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        let service = HtmldownService::new();
        let chunks: Vec<_> = service
            .convert_stream("<p>a</p>", StreamingOptions::default().with_chunk_size(0))
            .unwrap()
            .collect();
        assert!(!chunks.is_empty());
    }
}
