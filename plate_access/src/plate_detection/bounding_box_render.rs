use chrono::Local;
use opencv::core::Point;
use opencv::core::Scalar;
use opencv::core::Vector;
use opencv::imgproc::polylines;
use opencv::imgproc::put_text;
use opencv::imgproc::FONT_HERSHEY_SIMPLEX;
use opencv::imgproc::LINE_8;
use opencv::prelude::Mat;

use super::verdict::Verdict;
use super::PlateCandidate;
use crate::error::Result;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Draws plate boxes, the clock and the verdict onto a BGR frame.
pub struct Annotator {
    box_color: Scalar,
    clock_color: Scalar,
    thickness_px: i32,
}

impl Default for Annotator {
    fn default() -> Self {
        Self {
            box_color: Scalar::new(0.0, 255.0, 0.0, 0.0),
            clock_color: Scalar::new(0.0, 255.0, 255.0, 0.0),
            thickness_px: 2,
        }
    }
}

impl Annotator {
    pub fn draw_candidate(&self, image: &mut Mat, candidate: &PlateCandidate) -> Result<()> {
        let mut contours = Vector::<Vector<Point>>::new();
        contours.push(Vector::from_slice(&candidate.polygon));
        polylines(
            image,
            &contours,
            true,
            self.box_color,
            self.thickness_px,
            LINE_8,
            0,
        )?;

        let anchor = candidate.polygon[0];
        put_text(
            image,
            &candidate.text,
            Point::new(anchor.x, anchor.y - 10),
            FONT_HERSHEY_SIMPLEX,
            0.8,
            self.box_color,
            self.thickness_px,
            LINE_8,
            false,
        )?;
        Ok(())
    }

    pub fn draw_timestamp(&self, image: &mut Mat) -> Result<()> {
        let now = Local::now().format(TIMESTAMP_FORMAT).to_string();
        put_text(
            image,
            &now,
            Point::new(10, 30),
            FONT_HERSHEY_SIMPLEX,
            0.7,
            self.clock_color,
            self.thickness_px,
            LINE_8,
            false,
        )?;
        Ok(())
    }

    pub fn draw_verdict(&self, image: &mut Mat, verdict: &Verdict) -> Result<()> {
        put_text(
            image,
            &verdict.message(),
            Point::new(10, 70),
            FONT_HERSHEY_SIMPLEX,
            verdict.font_scale(),
            verdict.color(),
            self.thickness_px,
            LINE_8,
            false,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Vec3b, CV_8UC3};
    use opencv::prelude::MatTraitConst;

    fn blank() -> Mat {
        Mat::new_rows_cols_with_default(240, 320, CV_8UC3, Scalar::all(0.0)).unwrap()
    }

    #[test]
    fn candidate_outline_is_green() {
        let mut image = blank();
        let candidate = PlateCandidate {
            text: "ABC1234".to_string(),
            polygon: [
                Point::new(100, 150),
                Point::new(200, 150),
                Point::new(200, 190),
                Point::new(100, 190),
            ],
        };
        Annotator::default()
            .draw_candidate(&mut image, &candidate)
            .unwrap();

        let edge = image.at_2d::<Vec3b>(170, 200).unwrap();
        assert_eq!(*edge, Vec3b::from([0, 255, 0]));
        let inside = image.at_2d::<Vec3b>(170, 150).unwrap();
        assert_eq!(*inside, Vec3b::from([0, 0, 0]));
    }

    #[test]
    fn verdict_text_is_drawn_in_its_color() {
        let mut image = blank();
        Annotator::default()
            .draw_verdict(&mut image, &Verdict::NoPlate)
            .unwrap();

        let mut red = 0;
        for row in 40..80 {
            for col in 0..320 {
                if *image.at_2d::<Vec3b>(row, col).unwrap() == Vec3b::from([0, 0, 255]) {
                    red += 1;
                }
            }
        }
        assert!(red > 0);
    }
}
