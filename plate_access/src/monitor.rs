//! The capture, recognize and annotate loop.

use log::{debug, error, info, warn};
use opencv::core::Size;
use opencv::imgproc::cvt_color;
use opencv::imgproc::resize;
use opencv::imgproc::COLOR_BGR2RGB;
use opencv::imgproc::INTER_LINEAR;
use opencv::prelude::Mat;

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH, QUIT_KEY};
use crate::error::{Error, Result};
use crate::plate_detection::bounding_box_render::Annotator;
use crate::plate_detection::display::FrameSink;
use crate::plate_detection::ocr_reader::TextRecognizer;
use crate::plate_detection::preprocess::EdgePreprocessor;
use crate::plate_detection::verdict::Verdict;
use crate::plate_detection::video_reader::FrameSource;
use crate::plate_detection::FrameAnalysis;
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    CaptureFailed,
}

/// What happened to one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub analysis: FrameAnalysis,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub authorized: u64,
    pub not_registered: u64,
    pub no_plate: u64,
    pub exit: ExitReason,
}

impl RunSummary {
    fn new() -> Self {
        Self {
            frames: 0,
            authorized: 0,
            not_registered: 0,
            no_plate: 0,
            exit: ExitReason::Quit,
        }
    }

    fn record(&mut self, verdict: &Verdict) {
        self.frames += 1;
        match verdict {
            Verdict::Authorized(_) => self.authorized += 1,
            Verdict::NotRegistered(_) => self.not_registered += 1,
            Verdict::NoPlate => self.no_plate += 1,
        }
    }
}

pub struct Monitor<R: TextRecognizer> {
    registry: Registry,
    recognizer: R,
    annotator: Annotator,
    edges: Option<EdgePreprocessor>,
}

impl<R: TextRecognizer> Monitor<R> {
    pub fn new(registry: Registry, recognizer: R) -> Self {
        Self {
            registry,
            recognizer,
            annotator: Annotator::default(),
            edges: None,
        }
    }

    /// Also compute the edge map of every frame and hand it to the sink.
    pub fn with_edges(mut self) -> Self {
        self.edges = Some(EdgePreprocessor::default());
        self
    }

    /// Recognizes, filters and annotates one BGR frame in place.
    ///
    /// A recognition failure is logged and the frame is treated as having no
    /// text.
    pub fn process_frame(&mut self, frame: &mut Mat) -> Result<FrameReport> {
        let mut rgb = Mat::default();
        cvt_color(&*frame, &mut rgb, COLOR_BGR2RGB, 0)?;

        let lines = match self.recognizer.recognize(&rgb) {
            Ok(lines) => lines,
            Err(e) => {
                warn!("Recognition failed, skipping frame: {}", e);
                Vec::new()
            }
        };

        let analysis = FrameAnalysis::from_lines(&lines);
        for candidate in analysis.candidates() {
            debug!("Registered plates: {:?}", self.registry.plates());
            self.annotator.draw_candidate(frame, candidate)?;
        }

        self.annotator.draw_timestamp(frame)?;

        let verdict = Verdict::judge(analysis.detected(), &self.registry);
        self.annotator.draw_verdict(frame, &verdict)?;

        Ok(FrameReport { analysis, verdict })
    }

    /// Opens the camera, then the window, and runs the loop.
    ///
    /// An unavailable camera is logged and `Ok(None)` is returned without
    /// opening the window or entering the loop.
    pub fn start<S, D, C, W>(
        &mut self,
        open_camera: C,
        open_window: W,
    ) -> Result<Option<RunSummary>>
    where
        S: FrameSource,
        D: FrameSink,
        C: FnOnce() -> Result<S>,
        W: FnOnce() -> Result<D>,
    {
        let source = match open_camera() {
            Ok(source) => source,
            Err(e @ Error::CameraUnavailable(_)) => {
                error!("{}", e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let sink = open_window()?;
        self.run(source, sink).map(Some)
    }

    /// Runs until the quit key is pressed or a frame cannot be captured.
    ///
    /// `source` and `sink` are dropped, and so released, before this returns
    /// on every path.
    pub fn run<S, D>(&mut self, mut source: S, mut sink: D) -> Result<RunSummary>
    where
        S: FrameSource,
        D: FrameSink,
    {
        let mut summary = RunSummary::new();
        let display_size = Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT);
        let mut frame = Mat::default();

        loop {
            match source.read(&mut frame) {
                Ok(true) => {}
                Ok(false) => {
                    error!("Unable to capture a frame, stopping");
                    summary.exit = ExitReason::CaptureFailed;
                    break;
                }
                Err(e) => {
                    error!("Unable to capture a frame, stopping: {}", e);
                    summary.exit = ExitReason::CaptureFailed;
                    break;
                }
            }

            if let Some(edges) = &self.edges {
                let edge_map = edges.process(&frame)?;
                sink.present_edges(&edge_map)?;
            }

            let report = self.process_frame(&mut frame)?;
            summary.record(&report.verdict);

            let mut shown = Mat::default();
            resize(&frame, &mut shown, display_size, 0.0, 0.0, INTER_LINEAR)?;
            sink.present(&shown)?;

            if sink.poll_key()? == Some(QUIT_KEY) {
                info!("Quit key pressed");
                summary.exit = ExitReason::Quit;
                break;
            }
        }

        info!(
            "Stopped after {} frames ({} authorized, {} not registered, {} without plate): {:?}",
            summary.frames,
            summary.authorized,
            summary.not_registered,
            summary.no_plate,
            summary.exit
        );
        Ok(summary)
    }
}
