//! Score parsing and the weighted-grade arithmetic shared by the calculator.

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Midterm and endterm below this floor cannot be entered at all.
pub const TERM_FLOOR: f64 = 25.0;

/// Midterm/endterm average below this means a summer course.
pub const PASSING_AVERAGE: f64 = 50.0;

pub const MIDTERM_WEIGHT: f64 = 0.3;
pub const ENDTERM_WEIGHT: f64 = 0.3;
pub const FINAL_WEIGHT: f64 = 0.4;

/// Totals for which the "needed final" guidance is computed.
pub const GUIDANCE_TARGETS: [f64; 3] = [50.0, 70.0, 90.0];

/// Parse user input as a score in `[0, 100]`.
///
/// Surrounding whitespace is ignored. NaN and infinities never pass the range
/// check.
pub fn parse_score(text: &str) -> Option<f64> {
    let value = text.trim().parse::<f64>().ok()?;
    (MIN_SCORE..=MAX_SCORE).contains(&value).then_some(value)
}

pub fn term_average(midterm: f64, endterm: f64) -> f64 {
    (midterm + endterm) / 2.0
}

/// Points already earned before the final exam.
pub fn current_score(midterm: f64, endterm: f64) -> f64 {
    midterm * MIDTERM_WEIGHT + endterm * ENDTERM_WEIGHT
}

pub fn weighted_total(midterm: f64, endterm: f64, final_exam: f64) -> f64 {
    current_score(midterm, endterm) + final_exam * FINAL_WEIGHT
}

/// Final-exam score needed to reach `target`, clamped to `[0, 100]`.
///
/// 0 means the target is already reached; 100 means it is out of reach (or
/// needs a perfect final).
pub fn needed_final(midterm: f64, endterm: f64, target: f64) -> f64 {
    let raw = (target - current_score(midterm, endterm)) / FINAL_WEIGHT;
    raw.clamp(MIN_SCORE, MAX_SCORE)
}

/// Outcome band for a final weighted total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    TopScholarship,
    Scholarship,
    Pass,
    Retake,
}

impl Tier {
    pub fn classify(total: f64) -> Self {
        if total >= 90.0 {
            Tier::TopScholarship
        } else if total >= 70.0 {
            Tier::Scholarship
        } else if total >= 50.0 {
            Tier::Pass
        } else {
            Tier::Retake
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::TopScholarship => "top_scholarship",
            Tier::Scholarship => "scholarship",
            Tier::Pass => "pass",
            Tier::Retake => "retake",
        }
    }
}

/// All scores are shown with exactly two decimals.
pub fn format_score(value: f64) -> String {
    format!("{value:.2}")
}
