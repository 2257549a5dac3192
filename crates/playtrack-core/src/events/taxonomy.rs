//! Video player lifecycle event names.
//!
//! These are the names a player may publish. Payload shapes are owned by the
//! plugins that consume them; the framework only checks membership.

use serde_json::{Map, Value};

/// The player object was created.
pub const VIDEO_PLAYER_CREATED: &str = "video_player_created";
/// A video element was created for a source.
pub const VIDEO_ELEMENT_CREATED: &str = "video_element_created";
/// The viewer asked for playback for the first time.
pub const INITIAL_PLAYBACK_REQUESTED: &str = "initial_playback_requested";
/// Main content reached its end.
pub const VIDEO_CONTENT_COMPLETED: &str = "video_content_completed";
/// Playback was requested.
pub const VIDEO_PLAY_REQUESTED: &str = "video_play_requested";
/// Pause was requested.
pub const VIDEO_PAUSE_REQUESTED: &str = "video_pause_requested";
/// The stream is playing.
pub const VIDEO_PLAYING: &str = "video_playing";
/// The stream is paused.
pub const VIDEO_PAUSED: &str = "video_paused";
/// Replay from the start was requested.
pub const VIDEO_REPLAY_REQUESTED: &str = "video_replay_requested";
/// The content source changed.
pub const VIDEO_SOURCE_CHANGED: &str = "video_source_changed";
/// Stream-level metadata (duration, encodings) was updated.
pub const VIDEO_STREAM_METADATA_UPDATED: &str = "video_stream_metadata_updated";
/// Content-level metadata (title, description) was updated.
pub const VIDEO_CONTENT_METADATA_UPDATED: &str = "video_content_metadata_updated";
/// A seek was requested.
pub const VIDEO_SEEK_REQUESTED: &str = "video_seek_requested";
/// A seek finished.
pub const VIDEO_SEEK_COMPLETED: &str = "video_seek_completed";
/// The stream is downloading.
pub const VIDEO_STREAM_DOWNLOADING: &str = "video_stream_downloading";
/// Buffering started.
pub const VIDEO_BUFFERING_STARTED: &str = "video_buffering_started";
/// Buffering ended.
pub const VIDEO_BUFFERING_ENDED: &str = "video_buffering_ended";
/// Available bitrate profiles were reported.
pub const VIDEO_STREAM_BITRATE_PROFILES: &str = "video_stream_bitrate_profiles";
/// The active bitrate changed.
pub const VIDEO_STREAM_BITRATE_CHANGED: &str = "video_stream_bitrate_changed";
/// A target bitrate was requested.
pub const VIDEO_STREAM_TARGET_BITRATE_REQUESTED: &str = "video_stream_target_bitrate_requested";
/// The playhead moved.
pub const VIDEO_STREAM_POSITION_CHANGED: &str = "video_stream_position_changed";
/// An ad break started.
pub const AD_BREAK_STARTED: &str = "ad_break_started";
/// An ad break ended.
pub const AD_BREAK_ENDED: &str = "ad_break_ended";
/// An ad pod started.
pub const AD_POD_STARTED: &str = "ad_pod_started";
/// An ad pod ended.
pub const AD_POD_ENDED: &str = "ad_pod_ended";
/// An ad was requested from the ad server.
pub const AD_REQUEST: &str = "ad_request";
/// The ad server responded.
pub const AD_REQUEST_SUCCESS: &str = "ad_request_success";
/// The ad request failed.
pub const AD_REQUEST_ERROR: &str = "ad_request_error";
/// An individual ad started.
pub const AD_STARTED: &str = "ad_started";
/// An individual ad ended.
pub const AD_ENDED: &str = "ad_ended";
/// The viewer skipped an ad.
pub const AD_SKIPPED: &str = "ad_skipped";
/// The viewer clicked an ad.
pub const AD_CLICKED: &str = "ad_clicked";
/// An ad failed to play.
pub const AD_ERROR: &str = "ad_error";
/// Fullscreen mode changed.
pub const FULLSCREEN_CHANGED: &str = "fullscreen_changed";
/// Volume changed.
pub const VOLUME_CHANGED: &str = "volume_changed";
/// The player is being torn down.
pub const DESTROY: &str = "destroy";

/// Error events, grouped under `ERROR` in the taxonomy.
pub mod error {
    /// Uncategorized player error.
    pub const GENERAL: &str = "general_error";
    /// Metadata could not be loaded.
    pub const METADATA_LOADING: &str = "metadata_loading_error";
    /// Playback failed.
    pub const VIDEO_PLAYBACK: &str = "video_playback_error";
    /// Content authorization failed.
    pub const AUTHORIZATION: &str = "authorization_error";
}

const TOP_LEVEL: &[(&str, &str)] = &[
    ("VIDEO_PLAYER_CREATED", VIDEO_PLAYER_CREATED),
    ("VIDEO_ELEMENT_CREATED", VIDEO_ELEMENT_CREATED),
    ("INITIAL_PLAYBACK_REQUESTED", INITIAL_PLAYBACK_REQUESTED),
    ("VIDEO_CONTENT_COMPLETED", VIDEO_CONTENT_COMPLETED),
    ("VIDEO_PLAY_REQUESTED", VIDEO_PLAY_REQUESTED),
    ("VIDEO_PAUSE_REQUESTED", VIDEO_PAUSE_REQUESTED),
    ("VIDEO_PLAYING", VIDEO_PLAYING),
    ("VIDEO_PAUSED", VIDEO_PAUSED),
    ("VIDEO_REPLAY_REQUESTED", VIDEO_REPLAY_REQUESTED),
    ("VIDEO_SOURCE_CHANGED", VIDEO_SOURCE_CHANGED),
    ("VIDEO_STREAM_METADATA_UPDATED", VIDEO_STREAM_METADATA_UPDATED),
    ("VIDEO_CONTENT_METADATA_UPDATED", VIDEO_CONTENT_METADATA_UPDATED),
    ("VIDEO_SEEK_REQUESTED", VIDEO_SEEK_REQUESTED),
    ("VIDEO_SEEK_COMPLETED", VIDEO_SEEK_COMPLETED),
    ("VIDEO_STREAM_DOWNLOADING", VIDEO_STREAM_DOWNLOADING),
    ("VIDEO_BUFFERING_STARTED", VIDEO_BUFFERING_STARTED),
    ("VIDEO_BUFFERING_ENDED", VIDEO_BUFFERING_ENDED),
    ("VIDEO_STREAM_BITRATE_PROFILES", VIDEO_STREAM_BITRATE_PROFILES),
    ("VIDEO_STREAM_BITRATE_CHANGED", VIDEO_STREAM_BITRATE_CHANGED),
    ("VIDEO_STREAM_TARGET_BITRATE_REQUESTED", VIDEO_STREAM_TARGET_BITRATE_REQUESTED),
    ("VIDEO_STREAM_POSITION_CHANGED", VIDEO_STREAM_POSITION_CHANGED),
    ("AD_BREAK_STARTED", AD_BREAK_STARTED),
    ("AD_BREAK_ENDED", AD_BREAK_ENDED),
    ("AD_POD_STARTED", AD_POD_STARTED),
    ("AD_POD_ENDED", AD_POD_ENDED),
    ("AD_REQUEST", AD_REQUEST),
    ("AD_REQUEST_SUCCESS", AD_REQUEST_SUCCESS),
    ("AD_REQUEST_ERROR", AD_REQUEST_ERROR),
    ("AD_STARTED", AD_STARTED),
    ("AD_ENDED", AD_ENDED),
    ("AD_SKIPPED", AD_SKIPPED),
    ("AD_CLICKED", AD_CLICKED),
    ("AD_ERROR", AD_ERROR),
    ("FULLSCREEN_CHANGED", FULLSCREEN_CHANGED),
    ("VOLUME_CHANGED", VOLUME_CHANGED),
    ("DESTROY", DESTROY),
];

const ERROR_GROUP: &[(&str, &str)] = &[
    ("GENERAL", error::GENERAL),
    ("METADATA_LOADING", error::METADATA_LOADING),
    ("VIDEO_PLAYBACK", error::VIDEO_PLAYBACK),
    ("AUTHORIZATION", error::AUTHORIZATION),
];

/// Build the player taxonomy as a nested JSON object: constant names map to
/// event names, and the `ERROR` key holds one nested group.
pub fn default_taxonomy() -> Value {
    let mut root: Map<String, Value> = TOP_LEVEL
        .iter()
        .map(|(key, name)| (key.to_string(), Value::String(name.to_string())))
        .collect();

    let errors: Map<String, Value> = ERROR_GROUP
        .iter()
        .map(|(key, name)| (key.to_string(), Value::String(name.to_string())))
        .collect();
    root.insert("ERROR".to_string(), Value::Object(errors));

    Value::Object(root)
}
