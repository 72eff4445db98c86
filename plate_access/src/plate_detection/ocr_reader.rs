use std::collections::BTreeMap;
use std::ffi::CStr;
use std::ffi::CString;

use leptess::tesseract;
use leptess::tesseract::TessApi;
use log::info;
use opencv::core::Point;
use opencv::prelude::Mat;
use opencv::prelude::MatTraitConst;
use opencv::prelude::MatTraitConstManual;
use tesseract_plumbing::TessBaseApi;

use super::TextLine;
use crate::error::{Error, Result};

const CHAR_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-";
/// Automatic page segmentation with orientation and script detection.
const PSM_AUTO_OSD: &str = "1";
const PSM_AUTO: &str = "3";
const TSV_WORD_LEVEL: u32 = 5;

/// Text detection and recognition over a whole frame.
pub trait TextRecognizer {
    /// `rgb` is an 8-bit, 3-channel frame in RGB order.
    fn recognize(&mut self, rgb: &Mat) -> Result<Vec<TextLine>>;
}

pub struct TesseractReader {
    ocr: TessApi,
}

impl TesseractReader {
    pub fn new(data_path: &str, lang: &str, angle_cls: bool) -> Result<Self> {
        let mut api = tesseract::TessApi::new(Some(data_path), lang)
            .map_err(|e| Error::Ocr(format!("cannot load '{lang}' from {data_path}: {e:?}")))?;

        let page_seg_mode = if angle_cls { PSM_AUTO_OSD } else { PSM_AUTO };
        set_variable(&mut api.raw, "tessedit_char_whitelist", CHAR_WHITELIST)?;
        set_variable(&mut api.raw, "tessedit_pageseg_mode", page_seg_mode)?;

        info!(
            "Tesseract ready (lang {}, page segmentation mode {})",
            lang, page_seg_mode
        );
        Ok(Self { ocr: api })
    }
}

fn set_variable(raw: &mut TessBaseApi, name: &str, value: &str) -> Result<()> {
    let name_cstr = CString::new(name).map_err(|e| Error::Ocr(e.to_string()))?;
    let value_cstr = CString::new(value).map_err(|e| Error::Ocr(e.to_string()))?;
    raw.set_variable(&name_cstr, &value_cstr)
        .map_err(|e| Error::Ocr(format!("cannot set {name}={value}: {e:?}")))
}

impl TextRecognizer for TesseractReader {
    fn recognize(&mut self, rgb: &Mat) -> Result<Vec<TextLine>> {
        let cols = rgb.cols();
        let rows = rgb.rows();
        let channels = rgb.channels();
        let raw: &mut TessBaseApi = &mut self.ocr.raw;
        raw.set_image(rgb.data_bytes()?, cols, rows, channels, cols * channels)
            .map_err(|e| Error::Ocr(format!("{e:?}")))?;

        let text = raw
            .get_tsv_text(0)
            .map_err(|e| Error::Ocr(format!("{e:?}")))?;
        let tsv: &CStr = text.as_ref();
        Ok(parse_tsv(&tsv.to_string_lossy()))
    }
}

#[derive(Default)]
struct LineAccumulator {
    words: Vec<String>,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    confidence_sum: f32,
}

impl LineAccumulator {
    fn push(&mut self, word: &str, left: i32, top: i32, width: i32, height: i32, conf: f32) {
        if self.words.is_empty() {
            self.left = left;
            self.top = top;
            self.right = left + width;
            self.bottom = top + height;
        } else {
            self.left = self.left.min(left);
            self.top = self.top.min(top);
            self.right = self.right.max(left + width);
            self.bottom = self.bottom.max(top + height);
        }
        self.words.push(word.to_string());
        self.confidence_sum += conf;
    }

    fn finish(self) -> TextLine {
        let confidence = self.confidence_sum / self.words.len() as f32 / 100.0;
        TextLine::new(
            self.words.join(" "),
            [
                Point::new(self.left, self.top),
                Point::new(self.right, self.top),
                Point::new(self.right, self.bottom),
                Point::new(self.left, self.bottom),
            ],
            confidence,
        )
    }
}

/// Groups the word rows of Tesseract's TSV output into lines.
///
/// Columns: level, page, block, paragraph, line, word, left, top, width,
/// height, conf, text. Rows that are not words, carry a negative confidence
/// or blank text are skipped, as are rows that fail to parse.
pub fn parse_tsv(tsv: &str) -> Vec<TextLine> {
    let mut lines: BTreeMap<(u32, u32, u32, u32), LineAccumulator> = BTreeMap::new();

    for row in tsv.lines() {
        let fields: Vec<&str> = row.splitn(12, '\t').collect();
        if fields.len() < 12 {
            continue;
        }
        let ids: Option<Vec<u32>> = fields[..5].iter().map(|f| f.parse().ok()).collect();
        let geometry: Option<Vec<i32>> = fields[6..10].iter().map(|f| f.parse().ok()).collect();
        let conf: Option<f32> = fields[10].parse().ok();
        let (Some(ids), Some(geometry), Some(conf)) = (ids, geometry, conf) else {
            continue;
        };

        let word = fields[11].trim();
        if ids[0] != TSV_WORD_LEVEL || conf < 0.0 || word.is_empty() {
            continue;
        }

        lines.entry((ids[1], ids[2], ids[3], ids[4])).or_default().push(
            word,
            geometry[0],
            geometry[1],
            geometry[2],
            geometry[3],
            conf,
        );
    }

    lines.into_values().map(LineAccumulator::finish).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn words_are_grouped_into_lines() {
        let tsv = [
            HEADER,
            "1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t",
            "4\t1\t1\t1\t1\t0\t100\t200\t120\t30\t-1\t",
            "5\t1\t1\t1\t1\t1\t100\t200\t50\t30\t90\tABC",
            "5\t1\t1\t1\t1\t2\t160\t198\t60\t34\t80\t1234",
            "5\t1\t2\t1\t1\t1\t10\t10\t40\t12\t95.5\tSTOP",
        ]
        .join("\n");

        let lines = parse_tsv(&tsv);
        assert_eq!(lines.len(), 2);

        assert_eq!(lines[0].text, "ABC 1234");
        assert_eq!(
            lines[0].polygon,
            [
                Point::new(100, 198),
                Point::new(220, 198),
                Point::new(220, 232),
                Point::new(100, 232),
            ]
        );
        assert!((lines[0].confidence - 0.85).abs() < 1e-6);

        assert_eq!(lines[1].text, "STOP");
        assert!((lines[1].confidence - 0.955).abs() < 1e-6);
    }

    #[test]
    fn blank_and_rejected_words_are_skipped() {
        let tsv = [
            HEADER,
            "5\t1\t1\t1\t1\t1\t0\t0\t10\t10\t-1\tGHOST",
            "5\t1\t1\t1\t2\t1\t0\t0\t10\t10\t50\t  ",
            "garbage row",
        ]
        .join("\n");
        assert!(parse_tsv(&tsv).is_empty());
    }

    #[test]
    fn variables_are_set_on_the_raw_api() {
        let mut raw = TessBaseApi::create();
        assert!(set_variable(&mut raw, "tessedit_char_whitelist", CHAR_WHITELIST).is_ok());
        assert!(set_variable(&mut raw, "tessedit_pageseg_mode", PSM_AUTO).is_ok());
        assert!(matches!(
            set_variable(&mut raw, "no_such_variable", "1"),
            Err(Error::Ocr(_))
        ));
        assert!(matches!(
            set_variable(&mut raw, "bad\0name", "1"),
            Err(Error::Ocr(_))
        ));
    }

    #[test]
    fn empty_output_has_no_lines() {
        assert!(parse_tsv("").is_empty());
    }
}
