//! ffprobe output model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parsed `ffprobe -show_format -show_streams` output for one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaProbeResult {
    #[serde(default)]
    pub format: ProbeFormat,
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

/// Container-level fields.
///
/// ffprobe reports most numbers as strings; they are kept as raw JSON
/// scalars so the report prints exactly what the prober said.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeFormat {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub format_name: Option<String>,
    #[serde(default)]
    pub format_long_name: Option<String>,
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub size: Option<Value>,
    #[serde(default)]
    pub bit_rate: Option<Value>,
}

/// Kind of a stream, from its `codec_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
    Other(String),
}

impl StreamKind {
    fn from_codec_type(codec_type: Option<&str>) -> Self {
        match codec_type {
            Some("video") => Self::Video,
            Some("audio") => Self::Audio,
            Some("subtitle") => Self::Subtitle,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Other(String::new()),
        }
    }
}

/// One stream entry. Fields that only make sense for some kinds are simply
/// absent on the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeStream {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub codec_name: Option<String>,
    #[serde(default)]
    pub codec_long_name: Option<String>,
    #[serde(default)]
    pub profile: Option<Value>,
    #[serde(default)]
    pub level: Option<Value>,
    #[serde(default)]
    pub width: Option<Value>,
    #[serde(default)]
    pub height: Option<Value>,
    #[serde(default)]
    pub avg_frame_rate: Option<String>,
    #[serde(default)]
    pub r_frame_rate: Option<String>,
    #[serde(default)]
    pub pix_fmt: Option<String>,
    #[serde(default)]
    pub bits_per_raw_sample: Option<Value>,
    #[serde(default)]
    pub color_space: Option<String>,
    #[serde(default)]
    pub color_primaries: Option<String>,
    #[serde(default)]
    pub color_transfer: Option<String>,
    #[serde(default)]
    pub color_range: Option<String>,
    #[serde(default)]
    pub bit_rate: Option<Value>,
    #[serde(default)]
    pub channels: Option<Value>,
    #[serde(default)]
    pub sample_rate: Option<Value>,
    #[serde(default)]
    pub channel_layout: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, Value>,
}

impl ProbeStream {
    pub fn kind(&self) -> StreamKind {
        StreamKind::from_codec_type(self.codec_type.as_deref())
    }

    /// The `language` tag, if the stream carries one.
    pub fn language(&self) -> Option<&Value> {
        self.tags.get("language")
    }
}

impl MediaProbeResult {
    /// Parses ffprobe's JSON output.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Streams of the given kind, in prober order.
    pub fn streams_of(&self, kind: StreamKind) -> impl Iterator<Item = &ProbeStream> {
        self.streams.iter().filter(move |s| s.kind() == kind)
    }

    /// Codec names of the first video stream and the first audio stream.
    pub fn primary_codecs(&self) -> (Option<String>, Option<String>) {
        let video = self
            .streams_of(StreamKind::Video)
            .next()
            .and_then(|s| s.codec_name.clone());
        let audio = self
            .streams_of(StreamKind::Audio)
            .next()
            .and_then(|s| s.codec_name.clone());
        (video, audio)
    }
}
