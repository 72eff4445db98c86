use opencv::core::Size;
use opencv::core::BORDER_DEFAULT;
use opencv::imgproc::canny;
use opencv::imgproc::cvt_color;
use opencv::imgproc::gaussian_blur;
use opencv::imgproc::COLOR_BGR2GRAY;
use opencv::prelude::Mat;

use crate::error::Result;

/// Grayscale, blur and Canny edges of a BGR frame. Shown in a debug window
/// only; recognition always runs on the color frame.
pub struct EdgePreprocessor {
    kernel: Size,
    low_threshold: f64,
    high_threshold: f64,
}

impl Default for EdgePreprocessor {
    fn default() -> Self {
        Self {
            kernel: Size::new(3, 3),
            low_threshold: 50.0,
            high_threshold: 150.0,
        }
    }
}

impl EdgePreprocessor {
    pub fn process(&self, frame: &Mat) -> Result<Mat> {
        let mut grey = Mat::default();
        cvt_color(frame, &mut grey, COLOR_BGR2GRAY, 0)?;

        let mut blurred = Mat::default();
        gaussian_blur(&grey, &mut blurred, self.kernel, 0.0, 0.0, BORDER_DEFAULT)?;

        let mut edges = Mat::default();
        canny(
            &blurred,
            &mut edges,
            self.low_threshold,
            self.high_threshold,
            3,
            false,
        )?;
        Ok(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Scalar, CV_8UC3};
    use opencv::prelude::MatTraitConst;

    #[test]
    fn edges_are_single_channel_with_frame_size() {
        let frame =
            Mat::new_rows_cols_with_default(48, 64, CV_8UC3, Scalar::all(0.0)).unwrap();
        let edges = EdgePreprocessor::default().process(&frame).unwrap();
        assert_eq!(edges.rows(), 48);
        assert_eq!(edges.cols(), 64);
        assert_eq!(edges.channels(), 1);
    }
}
