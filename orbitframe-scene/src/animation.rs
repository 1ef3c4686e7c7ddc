//! Animation clip bookkeeping
//!
//! Sampling and blending keyframes belongs to the renderer. The mixer only
//! tracks which clip actions exist, their local time, whether they play, and
//! the weights of an in-progress crossfade.

use orbitframe_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A named clip exposed by a loaded model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Length in seconds
    pub duration: f64,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Handle to the action bound to a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(usize);

impl ActionId {
    pub fn clip_index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    from: f64,
    to: f64,
    duration: f64,
    elapsed: f64,
}

/// Playback state of one clip
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationAction {
    pub time: f64,
    pub weight: f64,
    pub enabled: bool,
    pub playing: bool,
    fade: Option<Fade>,
}

impl AnimationAction {
    fn new() -> Self {
        Self {
            time: 0.0,
            weight: 1.0,
            enabled: true,
            playing: false,
            fade: None,
        }
    }

    fn start_fade(&mut self, from: f64, to: f64, duration: f64) {
        self.weight = from;
        self.fade = Some(Fade {
            from,
            to,
            duration,
            elapsed: 0.0,
        });
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnimationMixer {
    clips: Vec<AnimationClip>,
    actions: Vec<Option<AnimationAction>>,
}

impl AnimationMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clip set, dropping every cached action
    pub fn set_clips(&mut self, clips: Vec<AnimationClip>) {
        self.actions = vec![None; clips.len()];
        self.clips = clips;
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    /// Drop cached actions and clips
    pub fn uncache(&mut self) {
        self.set_clips(Vec::new());
    }

    /// Get or create the action for a clip. Fails for unknown clips and for
    /// clips whose duration cannot be played.
    pub fn clip_action(&mut self, clip_index: usize) -> Result<ActionId> {
        let clip = self
            .clips
            .get(clip_index)
            .ok_or_else(|| Error::Animation(format!("no clip at index {clip_index}")))?;
        if !clip.duration.is_finite() || clip.duration < 0.0 {
            return Err(Error::Animation(format!(
                "clip '{}' has invalid duration {}",
                clip.name, clip.duration
            )));
        }
        self.actions[clip_index].get_or_insert_with(AnimationAction::new);
        Ok(ActionId(clip_index))
    }

    pub fn action(&self, id: ActionId) -> Option<&AnimationAction> {
        self.actions.get(id.0).and_then(|a| a.as_ref())
    }

    fn action_mut(&mut self, id: ActionId) -> Result<&mut AnimationAction> {
        self.actions
            .get_mut(id.0)
            .and_then(|a| a.as_mut())
            .ok_or_else(|| Error::Animation(format!("action {} is not bound", id.0)))
    }

    pub fn clip(&self, id: ActionId) -> Option<&AnimationClip> {
        self.clips.get(id.0)
    }

    pub fn play(&mut self, id: ActionId) -> Result<()> {
        let action = self.action_mut(id)?;
        action.enabled = true;
        action.playing = true;
        Ok(())
    }

    pub fn stop(&mut self, id: ActionId) {
        if let Ok(action) = self.action_mut(id) {
            *action = AnimationAction::new();
        }
    }

    pub fn stop_all(&mut self) {
        for action in self.actions.iter_mut().flatten() {
            *action = AnimationAction::new();
        }
    }

    /// Fade `to` in while fading `from` out over `duration` seconds
    pub fn cross_fade(&mut self, to: ActionId, from: ActionId, duration: f64) -> Result<()> {
        self.action_mut(to)?;
        self.action_mut(from)?;
        if duration <= 0.0 {
            self.stop(from);
            let action = self.action_mut(to)?;
            action.weight = 1.0;
            action.fade = None;
            return Ok(());
        }
        self.action_mut(from)?.start_fade(1.0, 0.0, duration);
        self.action_mut(to)?.start_fade(0.0, 1.0, duration);
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.actions.iter().flatten().any(|a| a.playing)
    }

    /// Advance every playing action by `delta` seconds, looping clips and
    /// progressing fades. Actions that fade out completely stop.
    pub fn update(&mut self, delta: f64) {
        for (index, slot) in self.actions.iter_mut().enumerate() {
            let Some(action) = slot.as_mut() else {
                continue;
            };
            if !action.playing {
                continue;
            }
            let duration = self.clips[index].duration;
            action.time = if duration > 0.0 {
                (action.time + delta).rem_euclid(duration)
            } else {
                0.0
            };
            if let Some(mut fade) = action.fade {
                fade.elapsed += delta;
                let t = (fade.elapsed / fade.duration).min(1.0);
                action.weight = fade.from + (fade.to - fade.from) * t;
                if t >= 1.0 {
                    action.fade = None;
                    if action.weight <= 0.0 {
                        *action = AnimationAction::new();
                    }
                } else {
                    action.fade = Some(fade);
                }
            }
        }
    }

    /// Set the local time of every bound action
    pub fn set_time(&mut self, time: f64) {
        for (index, slot) in self.actions.iter_mut().enumerate() {
            if let Some(action) = slot.as_mut() {
                let duration = self.clips[index].duration;
                action.time = if duration > 0.0 { time.rem_euclid(duration) } else { 0.0 };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mixer() -> AnimationMixer {
        let mut mixer = AnimationMixer::new();
        mixer.set_clips(vec![AnimationClip::new("walk", 2.0), AnimationClip::new("run", 1.0)]);
        mixer
    }

    #[test]
    fn test_play_loops() {
        let mut mixer = mixer();
        let walk = mixer.clip_action(0).unwrap();
        mixer.play(walk).unwrap();
        mixer.update(2.5);
        assert_relative_eq!(mixer.action(walk).unwrap().time, 0.5);
    }

    #[test]
    fn test_cross_fade_weights() {
        let mut mixer = mixer();
        let walk = mixer.clip_action(0).unwrap();
        let run = mixer.clip_action(1).unwrap();
        mixer.play(walk).unwrap();
        mixer.cross_fade(run, walk, 0.5).unwrap();
        mixer.play(run).unwrap();

        mixer.update(0.25);
        assert_relative_eq!(mixer.action(walk).unwrap().weight, 0.5);
        assert_relative_eq!(mixer.action(run).unwrap().weight, 0.5);

        mixer.update(0.25);
        assert!(!mixer.action(walk).unwrap().playing);
        assert_relative_eq!(mixer.action(run).unwrap().weight, 1.0);
        assert!(!mixer.action(run).unwrap().is_fading());
    }

    #[test]
    fn test_invalid_clip_cannot_bind() {
        let mut mixer = AnimationMixer::new();
        mixer.set_clips(vec![AnimationClip::new("broken", f64::NAN)]);
        assert!(matches!(mixer.clip_action(0), Err(Error::Animation(_))));
        assert!(mixer.clip_action(3).is_err());
    }

    #[test]
    fn test_stop_all_resets_actions() {
        let mut mixer = mixer();
        let walk = mixer.clip_action(0).unwrap();
        mixer.play(walk).unwrap();
        mixer.update(1.0);
        mixer.stop_all();
        assert!(!mixer.is_playing());
        assert_eq!(mixer.action(walk).unwrap().time, 0.0);
    }
}
