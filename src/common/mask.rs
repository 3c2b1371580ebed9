use std::ops::Deref;

use tracing::trace;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub const ALL: [MaskPattern; 8] = [
        MaskPattern(0),
        MaskPattern(1),
        MaskPattern(2),
        MaskPattern(3),
        MaskPattern(4),
        MaskPattern(5),
        MaskPattern(6),
        MaskPattern(7),
    ];

    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern < 8 {
            Ok(Self(pattern))
        } else {
            Err(QRError::InvalidMaskingPattern(pattern))
        }
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        let rc = r as i32 * c as i32;
        (rc & 1) + (rc % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        let rc = r as i32 * c as i32;
        ((rc & 1) + (rc % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        let rc = r as i32 * c as i32;
        (((r + c) & 1) as i32 + (rc % 3)) & 1 == 0
    }
}

impl MaskPattern {
    /// Predicate over (row, column) selecting the modules this pattern toggles.
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid mask pattern {}", self.0),
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

/// Tries every pattern on `qr`, keeps the one with the lowest penalty (first wins on
/// ties) and leaves it applied along with its format info.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let mut best = MaskPattern(0);
    let mut best_pen = u32::MAX;
    for pattern in MaskPattern::ALL {
        qr.apply_mask(pattern);
        let pen = compute_total_penalty(qr);
        qr.toggle_mask(pattern);
        trace!(mask = *pattern, penalty = pen, "Scored mask");
        if pen < best_pen {
            best = pattern;
            best_pen = pen;
        }
    }
    qr.apply_mask(best);
    best
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let line_pen = compute_line_penalty(qr, true) + compute_line_penalty(qr, false);
    let blk_pen = compute_block_penalty(qr);
    let bal_pen = compute_balance_penalty(qr);
    line_pen + blk_pen + bal_pen
}

static PENALTY_RUN: u32 = 3;
static PENALTY_BLOCK: u32 = 3;
static PENALTY_FINDER: u32 = 40;
static PENALTY_BALANCE: u32 = 10;

// Same color runs and finder-like patterns along every row or every column
fn compute_line_penalty(qr: &QR, is_hor: bool) -> u32 {
    let w = qr.width() as i16;
    let mut pen = 0;
    for i in 0..w {
        let mut run_clr = Color::Light;
        let mut run_len = 0;
        let mut hist = RunHistory::new(w as usize);
        for j in 0..w {
            let clr = if is_hor { *qr.get(i, j) } else { *qr.get(j, i) };
            if clr == run_clr {
                run_len += 1;
                if run_len == 5 {
                    pen += PENALTY_RUN;
                } else if run_len > 5 {
                    pen += 1;
                }
            } else {
                hist.push(run_len);
                if run_clr == Color::Light {
                    pen += hist.count_patterns() * PENALTY_FINDER;
                }
                run_clr = clr;
                run_len = 1;
            }
        }
        pen += hist.terminate(run_clr, run_len) * PENALTY_FINDER;
    }
    pen
}

fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += PENALTY_BLOCK;
            }
        }
    }
    pen
}

// Steps of 5% deviation from an even dark light split
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark = qr.count_dark_modules();
    let w = qr.width();
    let total = w * w;
    let k = ((dark * 20).abs_diff(total * 10) + total - 1) / total - 1;
    k as u32 * PENALTY_BALANCE
}

// Lengths of the last 7 runs in a line, most recent first. Light border runs are
// implied at both ends.
struct RunHistory {
    runs: [usize; 7],
    w: usize,
}

impl RunHistory {
    fn new(w: usize) -> Self {
        Self { runs: [0; 7], w }
    }

    fn push(&mut self, mut run_len: usize) {
        if self.runs[0] == 0 {
            run_len += self.w;
        }
        self.runs.copy_within(0..6, 1);
        self.runs[0] = run_len;
    }

    // Dark-light-dark-dark-dark-light-dark runs in 1:1:3:1:1 ratio with a light run
    // of at least 4 on either side
    fn count_patterns(&self) -> u32 {
        let h = &self.runs;
        let n = h[1];
        let core = n > 0 && h[2] == n && h[3] == n * 3 && h[4] == n && h[5] == n;
        (core && h[0] >= n * 4 && h[6] >= n) as u32 + (core && h[6] >= n * 4 && h[0] >= n) as u32
    }

    fn terminate(&mut self, run_clr: Color, mut run_len: usize) -> u32 {
        if run_clr == Color::Dark {
            self.push(run_len);
            run_len = 0;
        }
        run_len += self.w;
        self.push(run_len);
        self.count_patterns()
    }
}
