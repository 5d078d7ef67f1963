//! Synthetic SIF writer shared by the integration tests.

#![allow(dead_code)]

use std::fmt::Write as _;

pub const MAGIC: &[u8] = b"Andor Technology Multi-Channel File\n";

/// One sub-image record: corners, then binning.
#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub xbin: i32,
    pub ybin: i32,
}

impl Region {
    pub fn full(width: i32, height: i32) -> Self {
        Self {
            x0: 1,
            y0: 1,
            x1: width,
            y1: height,
            xbin: 1,
            ybin: 1,
        }
    }

    pub fn width(&self) -> usize {
        ((1 + self.x1 - self.x0) / self.xbin) as usize
    }

    pub fn height(&self) -> usize {
        ((1 + self.y1 - self.y0) / self.ybin) as usize
    }
}

/// How the line after the timestamps announces the pixel data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataFlag {
    /// `0` line, pixels follow.
    Zero,
    /// `1` line followed by one index line per frame.
    FrameIndex,
    /// No flag line; pixels follow the timestamps directly.
    Absent,
}

#[derive(Debug, Clone)]
pub struct SifFixture {
    pub version: i32,
    pub temperature: f64,
    pub exposure: f64,
    pub detector_type: String,
    pub detector_width: i32,
    pub detector_height: i32,
    pub filename: String,
    pub annotation: Vec<u8>,
    pub marker: i32,
    pub shutter: [&'static str; 2],
    pub spectrograph: String,
    pub calibration_version: i32,
    pub calibration_line: String,
    pub raman: String,
    pub regions: Vec<Region>,
    /// Written after `xbin` on each sub-image record line.
    pub record_tail: &'static str,
    pub frames: usize,
    pub timestamps: Option<Vec<String>>,
    pub data_flag: DataFlag,
    /// Samples per frame, across every sub-image; generated when `None`.
    pub pixels: Option<Vec<Vec<f32>>>,
    pub big_endian: bool,
}

impl Default for SifFixture {
    fn default() -> Self {
        Self {
            version: 65547,
            temperature: -60.0,
            exposure: 0.1,
            detector_type: "DU420_BV".to_string(),
            detector_width: 4,
            detector_height: 2,
            filename: "C:\\data\\spectrum.sif".to_string(),
            annotation: Vec::new(),
            marker: 65538,
            shutter: ["1", "2"],
            spectrograph: "SR303i".to_string(),
            calibration_version: 65540,
            calibration_line: "400 0.5".to_string(),
            raman: "532.0".to_string(),
            regions: vec![Region::full(4, 2)],
            record_tail: " ",
            frames: 3,
            timestamps: None,
            data_flag: DataFlag::Zero,
            pixels: None,
            big_endian: false,
        }
    }
}

impl SifFixture {
    pub fn samples_per_frame(&self) -> usize {
        self.regions.iter().map(|r| r.width() * r.height()).sum()
    }

    /// Default pixel value: `frame * 100 + sample index`.
    pub fn frame_samples(&self) -> Vec<Vec<f32>> {
        self.pixels.clone().unwrap_or_else(|| {
            (0..self.frames)
                .map(|frame| {
                    (0..self.samples_per_frame())
                        .map(|i| (frame * 100 + i) as f32)
                        .collect()
                })
                .collect()
        })
    }

    /// Everything up to and including the data-flag section.
    pub fn header(&self) -> Vec<u8> {
        let mut out = MAGIC.to_vec();
        out.extend_from_slice(b"65538 1\n");

        let mut text = String::new();
        write!(text, "{} 0 0 0 1700000000 {} ", self.version, self.temperature).unwrap();
        out.extend_from_slice(text.as_bytes());
        out.extend_from_slice(b"\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a");
        text.clear();
        write!(text, " 0 {} 0.5 0.75 4", self.exposure).unwrap();
        out.extend_from_slice(text.as_bytes());
        out.extend_from_slice(b" \0");
        text.clear();
        text.push_str(" 0.25 3e-6 0 0 16 0 0 0.002");
        for _ in 0..16 {
            text.push_str(" 0");
        }
        text.push_str(" 500 \n");
        out.extend_from_slice(text.as_bytes());

        text.clear();
        writeln!(text, "{}", self.detector_type).unwrap();
        writeln!(text, "{} {} ", self.detector_width, self.detector_height).unwrap();
        writeln!(text, "{} {}", self.filename.len(), self.filename).unwrap();
        writeln!(text, "65538 {}", self.annotation.len()).unwrap();
        out.extend_from_slice(text.as_bytes());
        out.extend_from_slice(&self.annotation);

        out.extend_from_slice(format!("\n{} ", self.marker).as_bytes());
        out.extend_from_slice(&[1, b' ', 1, b' ', 0, b' ', 0, b' ']);
        out.extend_from_slice(format!("{} {}\n", self.shutter[0], self.shutter[1]).as_bytes());
        out.extend_from_slice(&self.version_lines());

        text.clear();
        if self.calibration_version == 65540 {
            writeln!(text, "65540 ").unwrap();
            writeln!(text, "{}", self.calibration_line).unwrap();
        } else {
            writeln!(text, "{} {}", self.calibration_version, self.calibration_line).unwrap();
        }
        writeln!(text, "stale calibration").unwrap();
        writeln!(text, "0").unwrap();
        writeln!(text, "{}", self.raman).unwrap();
        for line in ["65538 1", "65538 2", "65538 3"] {
            writeln!(text, "{line}").unwrap();
        }

        let first = self.regions.first().copied().unwrap_or(Region::full(1, 1));
        writeln!(text, "Pixel number").unwrap();
        writeln!(text, "Counts").unwrap();
        let image_length = first.width();
        writeln!(
            text,
            "Pixel number65541 {} {} {} {} {} {} {} {}",
            first.x0,
            first.y1,
            first.x1,
            first.y0,
            self.frames,
            self.regions.len(),
            self.samples_per_frame() * self.frames,
            image_length
        )
        .unwrap();
        for r in &self.regions {
            writeln!(
                text,
                "65538 {} {} {} {} {} {}{}",
                r.x0, r.y1, r.x1, r.y0, r.ybin, r.xbin, self.record_tail
            )
            .unwrap();
        }

        match &self.timestamps {
            Some(lines) => lines.iter().for_each(|line| {
                writeln!(text, "{line}").unwrap();
            }),
            None => (0..self.frames).for_each(|frame| {
                writeln!(text, "{}", frame * 1000).unwrap();
            }),
        }

        match self.data_flag {
            DataFlag::Zero => writeln!(text, "0").unwrap(),
            DataFlag::FrameIndex => {
                writeln!(text, "1").unwrap();
                for frame in 0..self.frames {
                    writeln!(text, "index {frame}").unwrap();
                }
            }
            DataFlag::Absent => {}
        }
        out.extend_from_slice(text.as_bytes());
        out
    }

    fn version_lines(&self) -> Vec<u8> {
        let mut text = String::new();
        let skip = |text: &mut String, n: usize| {
            for i in 0..n {
                writeln!(text, "65538 version line {i}").unwrap();
            }
        };
        match self.version {
            65548..=65557 => skip(&mut text, 2),
            65558 => skip(&mut text, 5),
            65559 | 65564 => {
                skip(&mut text, 8);
                writeln!(text, "65539 {} 1200", self.spectrograph).unwrap();
            }
            65565 => skip(&mut text, 15),
            v if v > 65565 => {
                skip(&mut text, 8);
                writeln!(text, "65539 {} 1200", self.spectrograph).unwrap();
                writeln!(text, "65540 gate").unwrap();
                writeln!(text, "0 0 0 4000 0 0 25000 1000000").unwrap();
                skip(&mut text, 8);
            }
            _ => {}
        }
        text.into_bytes()
    }

    /// The complete file: header followed by every frame's samples.
    pub fn build(&self) -> Vec<u8> {
        let mut out = self.header();
        for frame in self.frame_samples() {
            for sample in frame {
                if self.big_endian {
                    out.extend_from_slice(&sample.to_be_bytes());
                } else {
                    out.extend_from_slice(&sample.to_le_bytes());
                }
            }
        }
        out
    }
}
