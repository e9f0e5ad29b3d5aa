//! Human-readable media profile report.

use serde_json::Value;
use std::fmt::Write;

use super::types::{MediaProbeResult, ProbeStream, StreamKind};

/// Marker printed for fields the prober did not report.
pub const NULL_MARKER: &str = "None";

/// Marker printed when a frame rate cannot be computed.
pub const UNKNOWN_FRAME_RATE: &str = "unknown";

const RULE_WIDTH: usize = 60;

/// Which flavour of report to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportProfile {
    /// A file that needs converting; shows everything that tends to break playback.
    Source,
    /// A known-good file whose parameters serve as the conversion target.
    Reference,
}

impl ReportProfile {
    fn title(self) -> &'static str {
        match self {
            Self::Source => "MKV MEDIA PROFILE (SOURCE FILE)",
            Self::Reference => "MP4 COMPATIBILITY PROFILE (REFERENCE)",
        }
    }

    fn advisory(self) -> &'static [&'static str] {
        match self {
            Self::Source => &[
                "This output shows WHY the MKV may not play correctly on your LCD.",
                "Common problem indicators:",
                "  - Video codec: hevc / h265",
                "  - Pixel format: yuv420p10le (10-bit)",
                "  - HDR metadata (bt2020 / smpte2084)",
                "  - Audio codec: dts / truehd / eac3",
            ],
            Self::Reference => &[
                "Use these values as your TARGET profile when converting other videos.",
                "Example ffmpeg settings often matching TV-compatible MP4:",
                "  -c:v libx264 -profile:v high -level 4.1 -pix_fmt yuv420p",
                "  -c:a aac -ac 2 -ar 48000 -b:a 160k",
            ],
        }
    }
}

/// Converts an ffprobe rational ("30000/1001") or decimal to a string with
/// three fraction digits. Zero denominators and junk give [`UNKNOWN_FRAME_RATE`].
pub fn format_frame_rate(rate: Option<&str>) -> String {
    parse_frame_rate(rate)
        .map(|fps| format!("{:.3}", fps))
        .unwrap_or_else(|| UNKNOWN_FRAME_RATE.to_string())
}

fn parse_frame_rate(rate: Option<&str>) -> Option<f64> {
    let rate = rate?.trim();
    let fps = match rate.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<i64>().ok()?;
            let den = den.trim().parse::<i64>().ok()?;
            if den == 0 {
                return None;
            }
            num as f64 / den as f64
        }
        None => rate.parse::<f64>().ok()?,
    };
    fps.is_finite().then_some(fps)
}

fn show(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NULL_MARKER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn show_str(value: Option<&str>) -> String {
    value.unwrap_or(NULL_MARKER).to_string()
}

fn field(out: &mut String, label: &str, value: impl AsRef<str>) {
    let _ = writeln!(out, "  {:<18}: {}", label, value.as_ref());
}

fn rule(out: &mut String) {
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
}

/// Renders the report: banner, container block, one block per stream in
/// prober order, advisory footer.
pub fn render_report(probe: &MediaProbeResult, profile: ReportProfile) -> String {
    let mut out = String::new();

    rule(&mut out);
    out.push_str(profile.title());
    out.push('\n');
    rule(&mut out);

    let fmt = &probe.format;
    out.push_str("Container\n");
    field(&mut out, "Format name", show_str(fmt.format_name.as_deref()));
    field(&mut out, "Duration", format!("{} sec", show(fmt.duration.as_ref())));
    field(&mut out, "Bitrate", format!("{} bps", show(fmt.bit_rate.as_ref())));

    for stream in &probe.streams {
        match stream.kind() {
            StreamKind::Video => render_video(&mut out, stream, profile),
            StreamKind::Audio => render_audio(&mut out, stream, profile),
            StreamKind::Subtitle if profile == ReportProfile::Source => {
                out.push_str("\nSubtitle Stream\n");
                field(&mut out, "Codec", show_str(stream.codec_name.as_deref()));
                field(&mut out, "Language", show(stream.language()));
            }
            _ => {}
        }
    }

    out.push('\n');
    rule(&mut out);
    for line in profile.advisory() {
        out.push_str(line);
        out.push('\n');
    }
    rule(&mut out);

    out
}

fn render_video(out: &mut String, stream: &ProbeStream, profile: ReportProfile) {
    let source = profile == ReportProfile::Source;

    out.push_str("\nVideo Stream\n");
    field(out, "Codec", show_str(stream.codec_name.as_deref()));
    if source {
        field(out, "Codec long name", show_str(stream.codec_long_name.as_deref()));
    }
    field(out, "Profile", show(stream.profile.as_ref()));
    field(out, "Level", show(stream.level.as_ref()));
    field(
        out,
        "Resolution",
        format!(
            "{}x{}",
            show(stream.width.as_ref()),
            show(stream.height.as_ref())
        ),
    );
    field(
        out,
        "Frame rate",
        format!("{} fps", format_frame_rate(stream.avg_frame_rate.as_deref())),
    );
    field(out, "Pixel format", show_str(stream.pix_fmt.as_deref()));
    if source {
        field(out, "Bit depth", show(stream.bits_per_raw_sample.as_ref()));
    }
    field(out, "Color space", show_str(stream.color_space.as_deref()));
    if source {
        field(out, "Color primaries", show_str(stream.color_primaries.as_deref()));
        field(out, "Color transfer", show_str(stream.color_transfer.as_deref()));
    }
    field(out, "Color range", show_str(stream.color_range.as_deref()));
    field(out, "Bitrate", format!("{} bps", show(stream.bit_rate.as_ref())));
}

fn render_audio(out: &mut String, stream: &ProbeStream, profile: ReportProfile) {
    out.push_str("\nAudio Stream\n");
    field(out, "Codec", show_str(stream.codec_name.as_deref()));
    if profile == ReportProfile::Source {
        field(out, "Codec long name", show_str(stream.codec_long_name.as_deref()));
    }
    field(out, "Channels", show(stream.channels.as_ref()));
    field(out, "Sample rate", format!("{} Hz", show(stream.sample_rate.as_ref())));
    field(out, "Bitrate", format!("{} bps", show(stream.bit_rate.as_ref())));
    field(out, "Channel layout", show_str(stream.channel_layout.as_deref()));
}
