use log::{info, warn};
use opencv::highgui::destroy_all_windows;
use opencv::highgui::imshow;
use opencv::highgui::named_window;
use opencv::highgui::wait_key;
use opencv::highgui::WINDOW_AUTOSIZE;
use opencv::prelude::Mat;

use crate::config::{EDGES_WINDOW_TITLE, WINDOW_TITLE};
use crate::error::Result;

/// Where annotated frames end up, and where the quit key comes from.
pub trait FrameSink {
    fn present(&mut self, frame: &Mat) -> Result<()>;

    fn present_edges(&mut self, _edges: &Mat) -> Result<()> {
        Ok(())
    }

    /// Key pressed since the last poll, if any.
    fn poll_key(&mut self) -> Result<Option<char>>;
}

pub struct Window {
    title: String,
}

impl Window {
    pub fn open() -> Result<Self> {
        named_window(WINDOW_TITLE, WINDOW_AUTOSIZE)?;
        Ok(Self {
            title: WINDOW_TITLE.to_string(),
        })
    }
}

impl FrameSink for Window {
    fn present(&mut self, frame: &Mat) -> Result<()> {
        imshow(&self.title, frame)?;
        Ok(())
    }

    fn present_edges(&mut self, edges: &Mat) -> Result<()> {
        imshow(EDGES_WINDOW_TITLE, edges)?;
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<char>> {
        let key = wait_key(1)?;
        if key < 0 {
            return Ok(None);
        }
        Ok(Some(char::from((key & 0xFF) as u8)))
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        info!("Closing window '{}'", self.title);
        if let Err(e) = destroy_all_windows() {
            warn!("Failed to close windows: {}", e);
        }
    }
}
