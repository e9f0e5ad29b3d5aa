//! Shell-script stand-ins for ffmpeg and ffprobe.
//!
//! The fake ffmpeg appends its arguments to `ffmpeg.log`, creates the output
//! file (last argument) and exits 0, except for inputs named `broken.mkv`,
//! which exit 3. The fake ffprobe appends the probed path to `ffprobe.log`
//! and reports h264/aac, or hevc/aac when the name contains `hevc`. Files
//! named `corrupt.mkv` make it fail.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Output;

use tempfile::TempDir;

const FAKE_FFMPEG: &str = r#"#!/bin/sh
for last; do :; done
echo "$*" >> "$(dirname "$0")/ffmpeg.log"
case "$3" in
  *broken.mkv) echo "broken.mkv: Invalid data found when processing input" >&2; exit 3 ;;
esac
: > "$last"
exit 0
"#;

const FAKE_FFPROBE: &str = r#"#!/bin/sh
for last; do :; done
echo "$last" >> "$(dirname "$0")/ffprobe.log"
case "$last" in
  *corrupt.mkv) echo "$last: Invalid data found when processing input" >&2; exit 1 ;;
  *hevc*) vcodec=hevc ;;
  *) vcodec=h264 ;;
esac
cat <<EOF
{
  "format": {"format_name": "matroska,webm", "duration": "1420.5", "bit_rate": "5200000"},
  "streams": [
    {"codec_type": "video", "codec_name": "$vcodec", "profile": "High", "level": 41,
     "width": 1920, "height": 1080, "avg_frame_rate": "30000/1001", "pix_fmt": "yuv420p"},
    {"codec_type": "audio", "codec_name": "aac", "channels": 2, "sample_rate": "48000"}
  ]
}
EOF
"#;

/// A scratch directory holding the fake tools and the media under test.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        write_script(&dir.path().join("bin/ffmpeg"), FAKE_FFMPEG);
        write_script(&dir.path().join("bin/ffprobe"), FAKE_FFPROBE);
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn ffmpeg(&self) -> PathBuf {
        self.path().join("bin/ffmpeg")
    }

    pub fn ffprobe(&self) -> PathBuf {
        self.path().join("bin/ffprobe")
    }

    /// Creates empty media files under `subdir` and returns their paths.
    pub fn media(&self, subdir: &str, names: &[&str]) -> Vec<PathBuf> {
        let dir = self.path().join(subdir);
        std::fs::create_dir_all(&dir).unwrap();
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, b"").unwrap();
                path
            })
            .collect()
    }

    /// Lines the fake ffmpeg logged, one per invocation.
    pub fn ffmpeg_calls(&self) -> Vec<String> {
        read_lines(&self.path().join("bin/ffmpeg.log"))
    }

    /// Paths the fake ffprobe was asked about.
    pub fn ffprobe_calls(&self) -> Vec<String> {
        read_lines(&self.path().join("bin/ffprobe.log"))
    }

    /// Runs a binary with the fake tools configured.
    pub async fn run(&self, bin: &str, args: &[&str]) -> Output {
        tokio::process::Command::new(bin)
            .args(args)
            .current_dir(self.path())
            .env_remove("MKV2MP4_CONFIG")
            .env("MKV2MP4_TOOLS__FFMPEG_PATH", self.ffmpeg())
            .env("MKV2MP4_TOOLS__FFPROBE_PATH", self.ffprobe())
            .env("RUST_LOG", "warn")
            .output()
            .await
            .expect("Failed to run binary")
    }
}

fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|text| text.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
