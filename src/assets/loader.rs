use std::path::Path;

use anyhow::Context;
use rayon::prelude::*;

use crate::assets::cutout::{make_silhouette, remove_background};
use crate::assets::decode::decode_rgba8;
use crate::assets::image::RasterImage;
use crate::assets::project::Project;
use crate::audio::media::load_audio_file;
use crate::audio::{AudioPcm, MIX_SAMPLE_RATE};
use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::{StudioError, StudioResult};
use crate::render::blur::{blur_rgba8_premul, scale_brightness_premul};
use crate::render::surface::contain_rect;
use crate::timeline::Timeline;

/// Backdrops are blurred at this reduced size; the blur hides the lost detail.
pub const BACKDROP_MAX_SIDE: u32 = 192;
/// Blur strength of gallery backdrops, in stage pixels.
pub const BACKDROP_BLUR_SIGMA_PX: f64 = 20.0;
/// Brightness multiplier applied to gallery backdrops.
pub const BACKDROP_BRIGHTNESS: f32 = 0.4;
/// How far the backdrop bleeds past each canvas edge, in stage pixels.
pub const BACKDROP_BLEED_PX: f64 = 100.0;

/// One gallery pose and its blurred, darkened backdrop.
#[derive(Clone, Debug)]
pub struct GalleryPose {
    /// Background-removed pose.
    pub pose: RasterImage,
    /// Pre-filtered copy drawn full-bleed behind the pose.
    pub backdrop: RasterImage,
}

/// Everything a playback needs, decoded up front and read-only afterwards.
#[derive(Clone, Debug)]
pub struct RenderResources {
    /// Subject name.
    pub name: String,
    /// Narration text.
    pub script: String,
    /// Black silhouette for the intro.
    pub silhouette: RasterImage,
    /// Background-removed creature.
    pub creature: RasterImage,
    /// Gallery poses; never empty.
    pub gallery: Vec<GalleryPose>,
    /// Trading card image.
    pub card: RasterImage,
    /// Intro jingle, if it loaded.
    pub intro_audio: Option<AudioPcm>,
    /// Narration, if it loaded.
    pub script_audio: Option<AudioPcm>,
    /// Outro, if it loaded.
    pub outro_audio: Option<AudioPcm>,
    /// Narration length driving the timeline and captions.
    pub script_duration_ms: f64,
}

impl RenderResources {
    /// Load and prepare every asset named by `project`.
    ///
    /// Images and audio load in parallel. Only the creature image is required; every other asset
    /// falls back with a warning (missing silhouette is derived, missing card uses the creature,
    /// empty gallery shows the creature, missing narration is silence of the fallback length).
    #[tracing::instrument(skip_all, fields(name = %project.name))]
    pub fn load(project: &Project) -> StudioResult<Self> {
        let (images, audio) = rayon::join(
            || load_images(project),
            || {
                rayon::join(
                    || load_optional_audio(project, project.intro_audio.as_deref(), "intro"),
                    || {
                        rayon::join(
                            || {
                                load_optional_audio(
                                    project,
                                    project.script_audio.as_deref(),
                                    "script",
                                )
                            },
                            || {
                                load_optional_audio(
                                    project,
                                    project.outro_audio.as_deref(),
                                    "outro",
                                )
                            },
                        )
                    },
                )
            },
        );
        let (intro_audio, (script_audio, outro_audio)) = audio;
        let images = images?;

        let script_duration_ms = match script_audio.as_ref() {
            Some(a) if a.duration_ms() > 0.0 => a.duration_ms(),
            _ => {
                let secs = project.fallback_script_secs();
                if project.script_audio.is_some() {
                    tracing::warn!(secs, "script audio unusable; assuming fallback duration");
                }
                secs * 1000.0
            }
        };

        tracing::info!(
            poses = images.gallery.len(),
            script_ms = script_duration_ms,
            "resources loaded"
        );

        Ok(Self {
            name: project.name.clone(),
            script: project.script.clone(),
            silhouette: images.silhouette,
            creature: images.creature,
            gallery: images.gallery,
            card: images.card,
            intro_audio,
            script_audio,
            outro_audio,
            script_duration_ms,
        })
    }

    /// Assemble resources from already decoded images, applying the same preparation as
    /// [`RenderResources::load`]. `creature` must still have its light background.
    pub fn from_images(
        name: impl Into<String>,
        script: impl Into<String>,
        creature: image::RgbaImage,
        gallery: Vec<image::RgbaImage>,
        script_duration_ms: f64,
    ) -> StudioResult<Self> {
        let prepared = PreparedCreature::new(creature)?;
        let mut poses = Vec::with_capacity(gallery.len());
        for mut img in gallery {
            remove_background(&mut img);
            poses.push(gallery_pose(img)?);
        }
        if poses.is_empty() {
            poses.push(gallery_pose(prepared.cutout_rgba.clone())?);
        }
        Ok(Self {
            name: name.into(),
            script: script.into(),
            silhouette: prepared.derived_silhouette()?,
            creature: prepared.cutout,
            gallery: poses,
            card: prepared.original,
            intro_audio: None,
            script_audio: None,
            outro_audio: None,
            script_duration_ms,
        })
    }

    /// Timeline for this narration length.
    pub fn timeline(&self) -> StudioResult<Timeline> {
        Timeline::from_script_ms(self.script_duration_ms)
    }
}

struct LoadedImages {
    silhouette: RasterImage,
    creature: RasterImage,
    gallery: Vec<GalleryPose>,
    card: RasterImage,
}

struct PreparedCreature {
    raw: image::RgbaImage,
    original: RasterImage,
    cutout_rgba: image::RgbaImage,
    cutout: RasterImage,
}

impl PreparedCreature {
    fn new(raw: image::RgbaImage) -> StudioResult<Self> {
        let original = RasterImage::from_rgba_image(raw.clone())?;
        let mut cutout_rgba = raw.clone();
        remove_background(&mut cutout_rgba);
        let cutout = RasterImage::from_rgba_image(cutout_rgba.clone())?;
        Ok(Self {
            raw,
            original,
            cutout_rgba,
            cutout,
        })
    }

    fn derived_silhouette(&self) -> StudioResult<RasterImage> {
        let mut s = self.raw.clone();
        make_silhouette(&mut s);
        RasterImage::from_rgba_image(s)
    }
}

fn load_images(project: &Project) -> StudioResult<LoadedImages> {
    let ((creature, silhouette), (gallery, card)) = rayon::join(
        || {
            rayon::join(
                || read_rgba8(project, &project.creature).and_then(PreparedCreature::new),
                || load_optional_image(project, project.silhouette.as_deref(), "silhouette"),
            )
        },
        || {
            rayon::join(
                || load_gallery(project),
                || load_optional_image(project, project.card.as_deref(), "card"),
            )
        },
    );

    let creature = creature.map_err(|e| {
        StudioError::asset(format!("creature image '{}': {e}", project.creature))
    })?;

    let silhouette = match silhouette {
        Some(img) => RasterImage::from_rgba_image(img)?,
        None => creature.derived_silhouette()?,
    };
    let card = match card {
        Some(img) => RasterImage::from_rgba_image(img)?,
        None => creature.original.clone(),
    };
    let gallery = if gallery.is_empty() {
        if !project.gallery.is_empty() {
            tracing::warn!("no gallery pose loaded; showing the creature instead");
        }
        vec![gallery_pose(creature.cutout_rgba.clone())?]
    } else {
        gallery
    };

    Ok(LoadedImages {
        silhouette,
        creature: creature.cutout,
        gallery,
        card,
    })
}

fn load_gallery(project: &Project) -> Vec<GalleryPose> {
    project
        .gallery
        .par_iter()
        .filter_map(|rel| {
            let pose = read_rgba8(project, rel).and_then(|mut img| {
                remove_background(&mut img);
                gallery_pose(img)
            });
            match pose {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!(path = %rel, "skipping gallery pose: {e}");
                    None
                }
            }
        })
        .collect()
}

fn load_optional_image(project: &Project, rel: Option<&str>, what: &str) -> Option<image::RgbaImage> {
    let rel = rel?;
    match read_rgba8(project, rel) {
        Ok(img) => Some(img),
        Err(e) => {
            tracing::warn!(path = %rel, "{what} image unavailable, using fallback: {e}");
            None
        }
    }
}

fn load_optional_audio(project: &Project, rel: Option<&str>, what: &str) -> Option<AudioPcm> {
    let rel = rel?;
    let loaded = project
        .resolve(rel)
        .and_then(|path| load_audio_file(&path, MIX_SAMPLE_RATE));
    match loaded {
        Ok(pcm) if !pcm.is_empty() => Some(pcm),
        Ok(_) => {
            tracing::warn!(path = %rel, "{what} audio is empty");
            None
        }
        Err(e) => {
            tracing::warn!(path = %rel, "{what} audio unavailable: {e}");
            None
        }
    }
}

fn read_rgba8(project: &Project, rel: &str) -> StudioResult<image::RgbaImage> {
    let path = project.resolve(rel)?;
    read_rgba8_path(&path)
}

fn read_rgba8_path(path: &Path) -> StudioResult<image::RgbaImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_rgba8(&bytes)
}

fn gallery_pose(cutout: image::RgbaImage) -> StudioResult<GalleryPose> {
    let backdrop = prepare_backdrop(&cutout)?;
    Ok(GalleryPose {
        pose: RasterImage::from_rgba_image(cutout)?,
        backdrop,
    })
}

/// Downscale, blur and darken a pose for use as a full-bleed gallery backdrop.
///
/// The blur radius is chosen so that, once the backdrop is contained into the canvas grown by
/// [`BACKDROP_BLEED_PX`] on every side, it matches [`BACKDROP_BLUR_SIGMA_PX`] stage pixels.
pub fn prepare_backdrop(pose: &image::RgbaImage) -> StudioResult<RasterImage> {
    let (w, h) = pose.dimensions();
    if w == 0 || h == 0 {
        return Err(StudioError::validation("backdrop source must be non-empty"));
    }
    let scale = (f64::from(BACKDROP_MAX_SIDE) / f64::from(w.max(h))).min(1.0);
    let sw = ((f64::from(w) * scale).round() as u32).max(1);
    let sh = ((f64::from(h) * scale).round() as u32).max(1);
    let small = if (sw, sh) == (w, h) {
        pose.clone()
    } else {
        image::imageops::resize(pose, sw, sh, image::imageops::FilterType::Triangle)
    };

    let stage = Canvas::STAGE;
    let bleed = Rect::new(
        -BACKDROP_BLEED_PX,
        -BACKDROP_BLEED_PX,
        stage.w() + BACKDROP_BLEED_PX,
        stage.h() + BACKDROP_BLEED_PX,
    );
    let drawn = contain_rect(f64::from(sw) / f64::from(sh), bleed);
    let sigma = (BACKDROP_BLUR_SIGMA_PX * f64::from(sw) / drawn.width()).max(0.5);
    let radius = (sigma * 3.0).ceil() as u32;

    let small = RasterImage::from_rgba_image(small)?;
    let mut blurred = blur_rgba8_premul(small.premul_bytes(), sw, sh, radius, sigma as f32)?;
    scale_brightness_premul(&mut blurred, BACKDROP_BRIGHTNESS);
    RasterImage::from_premul(sw, sh, blurred)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
