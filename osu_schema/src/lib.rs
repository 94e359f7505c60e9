use serde::{Deserialize, Serialize};

pub type Milliseconds = f64;

/// `[General] Mode` value of the standard ruleset, the only one strain is defined for.
pub const STANDARD_MODE: i32 = 0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chart {
    pub meta: Metadata,
    pub difficulty: Difficulty,
    pub hit_objects: Vec<HitObject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    pub name: String,
    pub version_label: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub creator: String,
    pub game_mode: i32,
    pub format_version: u32,
}

/// Difficulty attributes. Absent keys stay at zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Difficulty {
    pub approach_rate: f64,
    pub overall_difficulty: f64,
    pub circle_size: f64,
    pub hp_drain: f64,
    pub slider_multiplier: f64,
    pub slider_tick_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HitObject {
    pub x: f64,
    pub y: f64,
    pub time: Milliseconds,
    pub hitsound: i32,
    #[serde(flatten)]
    pub kind: HitObjectKind,
}

/// Curve anchor in playfield coordinates, same space as `HitObject::x/y`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum HitObjectKind {
    #[serde(rename = "circle")]
    Circle,

    #[serde(rename = "slider")]
    Slider {
        shape: char,
        repeat_count: u32,
        path_length: f64,
        #[serde(default)]
        control_points: Vec<ControlPoint>,
    },

    #[serde(rename = "spinner")]
    Spinner,
}

impl HitObjectKind {
    pub fn label(&self) -> &'static str {
        match self {
            HitObjectKind::Circle => "circle",
            HitObjectKind::Slider { .. } => "slider",
            HitObjectKind::Spinner => "spinner",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub circles: usize,
    pub sliders: usize,
    pub spinners: usize,
}

impl Chart {
    pub fn is_standard_mode(&self) -> bool {
        self.meta.game_mode == STANDARD_MODE
    }

    pub fn kind_counts(&self) -> KindCounts {
        let mut counts = KindCounts::default();
        for obj in &self.hit_objects {
            match obj.kind {
                HitObjectKind::Circle => counts.circles += 1,
                HitObjectKind::Slider { .. } => counts.sliders += 1,
                HitObjectKind::Spinner => counts.spinners += 1,
            }
        }
        counts
    }

    pub fn last_time(&self) -> Option<Milliseconds> {
        self.hit_objects.last().map(|o| o.time)
    }
}

/// Per-object strain, index-aligned with `Chart::hit_objects`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StrainSeries {
    pub aim: Vec<f64>,
    pub speed: Vec<f64>,
}

impl StrainSeries {
    pub fn len(&self) -> usize {
        self.aim.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aim.is_empty()
    }
}

/// Per-window maxima. Window `i` covers `(origin + i*size, origin + (i+1)*size]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WindowedSeries {
    pub origin_ms: Milliseconds,
    pub window_size_ms: Milliseconds,
    pub aim: Vec<f64>,
    pub speed: Vec<f64>,
}

impl WindowedSeries {
    pub fn len(&self) -> usize {
        self.aim.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aim.is_empty()
    }

    pub fn window_end(&self, index: usize) -> Milliseconds {
        self.origin_ms + (index as f64 + 1.0) * self.window_size_ms
    }
}
