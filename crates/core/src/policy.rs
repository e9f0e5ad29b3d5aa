//! Remux policy: which codecs may be copied into a target container unchanged.
//!
//! The decision is a static allow-list lookup. A file is remux-safe for a
//! container when its first video codec is allowed and its first audio codec
//! (if any) is allowed too. Anything else gets re-encoded.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Codec identifiers (as reported by ffprobe) allowed in one container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecAllowList {
    #[serde(default)]
    pub video: BTreeSet<String>,
    #[serde(default)]
    pub audio: BTreeSet<String>,
}

impl CodecAllowList {
    /// Builds an allow list, lowercasing every identifier.
    pub fn new<V, A>(video: V, audio: A) -> Self
    where
        V: IntoIterator,
        V::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        Self {
            video: video.into_iter().map(|c| c.as_ref().to_lowercase()).collect(),
            audio: audio.into_iter().map(|c| c.as_ref().to_lowercase()).collect(),
        }
    }

    fn normalized(&self) -> Self {
        Self::new(&self.video, &self.audio)
    }

    /// Applies the remux rule to a pair of codec identifiers.
    pub fn allows(&self, video: Option<&str>, audio: Option<&str>) -> bool {
        let Some(video) = video else {
            return false;
        };
        if !self.video.contains(&video.to_lowercase()) {
            return false;
        }
        self.allows_audio(audio)
    }

    /// Audio half of the rule: no audio stream is fine.
    pub fn allows_audio(&self, audio: Option<&str>) -> bool {
        audio
            .map(|codec| self.audio.contains(&codec.to_lowercase()))
            .unwrap_or(true)
    }
}

/// Policy overrides as they appear in the `[policy]` config section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Container extension -> allowed codecs. Replaces the built-in entry for
    /// the same container.
    #[serde(default)]
    pub containers: BTreeMap<String, CodecAllowList>,
}

/// The table consulted when deciding remux vs. re-encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemuxPolicy {
    containers: BTreeMap<String, CodecAllowList>,
}

// No hevc: many older TVs refuse it inside MP4.
static DEFAULT_POLICY: Lazy<RemuxPolicy> = Lazy::new(|| {
    let mut containers = BTreeMap::new();
    containers.insert(
        "mp4".to_string(),
        CodecAllowList::new(["h264", "mpeg4"], ["aac", "mp3", "ac3"]),
    );
    RemuxPolicy { containers }
});

impl Default for RemuxPolicy {
    fn default() -> Self {
        DEFAULT_POLICY.clone()
    }
}

impl RemuxPolicy {
    /// Built-in policy merged with config overrides.
    pub fn from_config(config: &PolicyConfig) -> Self {
        let mut policy = Self::default();
        for (container, allow) in &config.containers {
            policy
                .containers
                .insert(container.to_lowercase(), allow.normalized());
        }
        policy
    }

    /// Allow list for a container, if the policy knows it.
    pub fn allow_list(&self, container: &str) -> Option<&CodecAllowList> {
        self.containers.get(&container.to_lowercase())
    }

    /// Containers the policy has entries for.
    pub fn containers(&self) -> impl Iterator<Item = &str> {
        self.containers.keys().map(String::as_str)
    }

    /// Whether streams with these codecs can be copied into `container`.
    /// Unknown containers are never remux-safe.
    pub fn is_remux_safe(&self, container: &str, video: Option<&str>, audio: Option<&str>) -> bool {
        self.allow_list(container)
            .map(|allow| allow.allows(video, audio))
            .unwrap_or(false)
    }
}

/// Remux decision against the built-in MP4 policy.
pub fn is_remux_safe(video: Option<&str>, audio: Option<&str>) -> bool {
    DEFAULT_POLICY.is_remux_safe("mp4", video, audio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_video_is_never_safe() {
        assert!(!is_remux_safe(None, Some("aac")));
        assert!(!is_remux_safe(None, None));
    }

    #[test]
    fn test_h264_with_aac_is_safe() {
        assert!(is_remux_safe(Some("h264"), Some("aac")));
    }

    #[test]
    fn test_hevc_is_not_safe() {
        assert!(!is_remux_safe(Some("hevc"), Some("aac")));
    }

    #[test]
    fn test_video_without_audio_is_safe() {
        assert!(is_remux_safe(Some("h264"), None));
        assert!(is_remux_safe(Some("mpeg4"), None));
    }

    #[test]
    fn test_dts_audio_is_not_safe() {
        assert!(!is_remux_safe(Some("h264"), Some("dts")));
        assert!(!is_remux_safe(Some("h264"), Some("truehd")));
    }

    #[test]
    fn test_codec_comparison_is_case_insensitive() {
        assert!(is_remux_safe(Some("H264"), Some("AAC")));
        assert!(is_remux_safe(Some("h264"), Some("Ac3")));
    }

    #[test]
    fn test_allows_audio_alone() {
        let allow = RemuxPolicy::default();
        let mp4 = allow.allow_list("mp4").unwrap();
        assert!(mp4.allows_audio(None));
        assert!(mp4.allows_audio(Some("MP3")));
        assert!(!mp4.allows_audio(Some("flac")));
    }

    #[test]
    fn test_unknown_container_is_not_safe() {
        let policy = RemuxPolicy::default();
        assert!(!policy.is_remux_safe("webm", Some("h264"), Some("aac")));
    }

    #[test]
    fn test_config_override_replaces_container_entry() {
        let mut config = PolicyConfig::default();
        config.containers.insert(
            "MP4".to_string(),
            CodecAllowList::new(["h264", "HEVC"], ["aac"]),
        );
        let policy = RemuxPolicy::from_config(&config);

        assert!(policy.is_remux_safe("mp4", Some("hevc"), Some("aac")));
        // mp3 was only in the built-in entry
        assert!(!policy.is_remux_safe("mp4", Some("h264"), Some("mp3")));
    }

    #[test]
    fn test_config_can_add_containers() {
        let mut config = PolicyConfig::default();
        config
            .containers
            .insert("mov".to_string(), CodecAllowList::new(["prores"], ["pcm_s16le"]));
        let policy = RemuxPolicy::from_config(&config);

        assert!(policy.is_remux_safe("mov", Some("prores"), Some("pcm_s16le")));
        assert!(policy.is_remux_safe("mp4", Some("h264"), Some("aac")));
        assert_eq!(policy.containers().collect::<Vec<_>>(), vec!["mov", "mp4"]);
    }
}
