/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

//! Participant streams as seen by the layout engine.

use serde::{Deserialize, Serialize};

/// Identity and presentation data of the user behind a stream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: String,
    pub username: String,
    /// Opaque avatar reference (URL, asset key, ...). The engine never resolves it.
    pub avatar: Option<String>,
}

impl UserInfo {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioUi {
    pub id: String,
    pub is_enabled: bool,
    pub is_muted_for_you: bool,
    pub is_speaking: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoUi {
    pub id: String,
    pub is_enabled: bool,
    pub is_screen_share: bool,
}

impl VideoUi {
    pub fn camera(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_enabled: true,
            is_screen_share: false,
        }
    }

    pub fn screen_share(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_enabled: true,
            is_screen_share: true,
        }
    }
}

/// A single participant stream.
///
/// Streams are identified by `id`, which must be unique within one stream list.
/// Two streams with the same id but different audio/video state compare unequal,
/// so a layout recomputes whenever any part of a stream changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamUi {
    pub id: String,
    pub user_info: Option<UserInfo>,
    pub audio: Option<AudioUi>,
    pub video: Option<VideoUi>,
    /// `true` for streams published by the local participant.
    pub is_mine: bool,
}

impl StreamUi {
    pub fn new(id: impl Into<String>, user_info: UserInfo) -> Self {
        Self {
            id: id.into(),
            user_info: Some(user_info),
            ..Default::default()
        }
    }

    pub fn mine(mut self) -> Self {
        self.is_mine = true;
        self
    }

    pub fn with_video(mut self, video: VideoUi) -> Self {
        self.video = Some(video);
        self
    }

    pub fn with_audio(mut self, audio: AudioUi) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Display name of the stream owner, empty when unknown.
    pub fn username(&self) -> &str {
        self.user_info
            .as_ref()
            .map(|info| info.username.as_str())
            .unwrap_or_default()
    }

    pub fn avatar(&self) -> Option<&str> {
        self.user_info
            .as_ref()
            .and_then(|info| info.avatar.as_deref())
    }

    fn is_screen_share(&self) -> Option<bool> {
        self.video.as_ref().map(|video| video.is_screen_share)
    }

    pub fn is_remote_screen_share(&self) -> bool {
        !self.is_mine && self.is_screen_share() == Some(true)
    }

    pub fn is_local_screen_share(&self) -> bool {
        self.is_mine && self.is_screen_share() == Some(true)
    }

    pub fn is_my_camera_stream(&self) -> bool {
        self.is_mine && self.is_screen_share() == Some(false)
    }

    pub fn is_remote_camera_stream(&self) -> bool {
        !self.is_mine && self.is_screen_share() == Some(false)
    }
}
