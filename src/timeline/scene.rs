use crate::foundation::error::{StudioError, StudioResult};

/// End of the intro (silhouette) scene.
pub const INTRO_END_MS: f64 = 4000.0;
/// End of the scan scene.
pub const SCAN_END_MS: f64 = 5500.0;
/// Narration starts together with the reveal.
pub const SCRIPT_START_MS: f64 = SCAN_END_MS;
/// Nominal start of the pose gallery.
pub const GALLERY_START_MS: f64 = 7500.0;
/// Length of the closing card scene, counted back from the end.
pub const CARD_DURATION_MS: f64 = 8000.0;

/// Named contiguous time window with its own draw routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Scene {
    /// Bouncing silhouette over a rotating sunburst.
    Intro,
    /// Flash, full-color creature and scanning HUD.
    Scan,
    /// Name header and narration captions over the HUD.
    Reveal,
    /// Evenly time-divided pose gallery.
    Gallery,
    /// Zooming card and call-to-action.
    Card,
}

impl Scene {
    /// All scenes in playback order.
    pub const ALL: [Self; 5] = [
        Self::Intro,
        Self::Scan,
        Self::Reveal,
        Self::Gallery,
        Self::Card,
    ];
}

/// Result of resolving an elapsed time against the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneAt {
    /// Active scene.
    pub scene: Scene,
    /// Milliseconds since the scene started.
    pub local_ms: f64,
    /// Elapsed time the lookup was made for, after clamping into `[0, total)`.
    pub elapsed_ms: f64,
}

/// Position inside the pose gallery.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GallerySlot {
    /// Pose index, always `< pose_count`.
    pub index: usize,
    /// Progress through the current pose in `[0, 1)`.
    pub progress: f64,
}

/// Scene boundaries for one playback, derived from the narration length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    total_ms: f64,
}

impl Timeline {
    /// Build a timeline from the narration length in seconds.
    ///
    /// `total = 5500 + secs * 1000 + 8000`.
    pub fn from_script_secs(script_secs: f64) -> StudioResult<Self> {
        if !script_secs.is_finite() || script_secs < 0.0 {
            return Err(StudioError::validation(
                "script duration must be finite and >= 0",
            ));
        }
        Ok(Self {
            total_ms: SCRIPT_START_MS + script_secs * 1000.0 + CARD_DURATION_MS,
        })
    }

    /// Build a timeline from the narration length in milliseconds.
    pub fn from_script_ms(script_ms: f64) -> StudioResult<Self> {
        Self::from_script_secs(script_ms / 1000.0)
    }

    /// Total playback length in milliseconds.
    pub fn total_ms(&self) -> f64 {
        self.total_ms
    }

    /// Narration length implied by this timeline.
    pub fn script_ms(&self) -> f64 {
        self.total_ms - SCRIPT_START_MS - CARD_DURATION_MS
    }

    /// Start of the closing card scene.
    pub fn card_start_ms(&self) -> f64 {
        self.total_ms - CARD_DURATION_MS
    }

    /// Start of the gallery; pulled in front of 7500 ms when the narration is very short.
    pub fn gallery_start_ms(&self) -> f64 {
        GALLERY_START_MS.min(self.card_start_ms())
    }

    /// Half-open `[start, end)` window of `scene`. Windows may be empty but never overlap.
    pub fn window(&self, scene: Scene) -> (f64, f64) {
        match scene {
            Scene::Intro => (0.0, INTRO_END_MS),
            Scene::Scan => (INTRO_END_MS, SCAN_END_MS),
            Scene::Reveal => (SCAN_END_MS, self.gallery_start_ms()),
            Scene::Gallery => (self.gallery_start_ms(), self.card_start_ms()),
            Scene::Card => (self.card_start_ms(), self.total_ms),
        }
    }

    /// Resolve `elapsed_ms` to its scene. See [`scene_at`].
    pub fn scene_at(&self, elapsed_ms: f64) -> SceneAt {
        scene_at(elapsed_ms, self.total_ms)
    }

    /// Return `true` once the whole timeline has been played.
    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.total_ms
    }

    /// Playback progress in `[0, 1]`.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        (elapsed_ms / self.total_ms).clamp(0.0, 1.0)
    }

    /// Pose shown at `elapsed_ms`, or `None` outside the gallery window.
    ///
    /// The window is split evenly across `pose_count` poses. The sound cue scheduler uses this
    /// same division so that a whoosh always matches the pose on screen.
    pub fn gallery_slot(&self, elapsed_ms: f64, pose_count: usize) -> Option<GallerySlot> {
        let (start, end) = self.window(Scene::Gallery);
        if pose_count == 0 || elapsed_ms < start || elapsed_ms >= end {
            return None;
        }
        let slot_ms = (end - start) / pose_count as f64;
        let g = elapsed_ms - start;
        let index = ((g / slot_ms).floor() as usize).min(pose_count - 1);
        let progress = (g % slot_ms) / slot_ms;
        Some(GallerySlot { index, progress })
    }
}

/// Map an elapsed time to `(scene, local time)` for a timeline of `total_ms`.
///
/// Negative elapsed values clamp to the start of the intro; values at or past `total_ms` clamp to
/// the card scene so that the final frame is held.
pub fn scene_at(elapsed_ms: f64, total_ms: f64) -> SceneAt {
    let card_start = (total_ms - CARD_DURATION_MS).max(0.0);
    let gallery_start = GALLERY_START_MS.min(card_start);
    let last = if total_ms > 0.0 {
        total_ms.next_down()
    } else {
        0.0
    };
    let t = if elapsed_ms.is_nan() {
        0.0
    } else {
        elapsed_ms.clamp(0.0, last)
    };

    let (scene, start) = if t < INTRO_END_MS.min(card_start) {
        (Scene::Intro, 0.0)
    } else if t < SCAN_END_MS.min(card_start) {
        (Scene::Scan, INTRO_END_MS)
    } else if t < gallery_start {
        (Scene::Reveal, SCAN_END_MS)
    } else if t < card_start {
        (Scene::Gallery, gallery_start)
    } else {
        (Scene::Card, card_start)
    };

    SceneAt {
        scene,
        local_ms: t - start,
        elapsed_ms: t,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/scene.rs"]
mod tests;
