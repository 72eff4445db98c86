use log::{info, warn};
use opencv::prelude::Mat;
use opencv::prelude::MatTraitConst;
use opencv::prelude::VideoCaptureTrait;
use opencv::prelude::VideoCaptureTraitConst;
use opencv::videoio::VideoCapture;
use opencv::videoio::CAP_ANY;
use opencv::videoio::CAP_PROP_FPS;
use opencv::videoio::CAP_PROP_FRAME_HEIGHT;
use opencv::videoio::CAP_PROP_FRAME_WIDTH;

use crate::config::{CAPTURE_FPS, CAPTURE_HEIGHT, CAPTURE_WIDTH};
use crate::error::{Error, Result};

/// Something frames can be pulled from, one at a time.
pub trait FrameSource {
    /// Fills `frame` and returns `false` once no frame could be captured.
    fn read(&mut self, frame: &mut Mat) -> Result<bool>;
}

pub struct Camera {
    capture: VideoCapture,
    index: i32,
}

impl Camera {
    /// Opens a capture device and asks for 1280x720 at 30 fps. The device
    /// may pick something else.
    pub fn open(index: i32) -> Result<Self> {
        let mut capture = VideoCapture::new(index, CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(Error::CameraUnavailable(index));
        }

        for (prop, name, value) in [
            (CAP_PROP_FRAME_WIDTH, "width", CAPTURE_WIDTH),
            (CAP_PROP_FRAME_HEIGHT, "height", CAPTURE_HEIGHT),
            (CAP_PROP_FPS, "fps", CAPTURE_FPS),
        ] {
            if !capture.set(prop, value)? {
                warn!("Camera {} ignored {} = {}", index, name, value);
            }
        }

        info!(
            "Camera {} opened at {}x{} @ {} fps",
            index,
            capture.get(CAP_PROP_FRAME_WIDTH)?,
            capture.get(CAP_PROP_FRAME_HEIGHT)?,
            capture.get(CAP_PROP_FPS)?
        );
        Ok(Self { capture, index })
    }
}

impl FrameSource for Camera {
    fn read(&mut self, frame: &mut Mat) -> Result<bool> {
        let grabbed = self.capture.read(frame)?;
        Ok(grabbed && !frame.empty())
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        info!("Releasing camera {}", self.index);
        if let Err(e) = self.capture.release() {
            warn!("Failed to release camera {}: {}", self.index, e);
        }
    }
}
