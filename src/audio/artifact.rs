//! Scoped ownership of a generated audio clip.
//!
//! [`AudioArtifact`] owns the encoded WAV bytes of one `produce_speech`
//! result.  Calling [`persist`](AudioArtifact::persist) materialises it as a
//! file so players can dereference it like any media resource — the desktop
//! analogue of a browser object URL.
//!
//! The file's lifetime is tied to the artifact: dropping a persisted
//! artifact removes the file, so superseding an artifact (new generation,
//! cleared image, language change) releases the old resource synchronously
//! instead of orphaning it.  When the artifact is the final deliverable,
//! [`keep`](AudioArtifact::keep) detaches the file from that cleanup.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::audio::wav::WAV_HEADER_LEN;

/// Process-wide counter so each persisted clip gets a distinct file name.
static ARTIFACT_SEQ: AtomicU64 = AtomicU64::new(0);

// ---------------------------------------------------------------------------
// AudioArtifact
// ---------------------------------------------------------------------------

/// One generated speech clip, encoded as a complete WAV file.
pub struct AudioArtifact {
    wav: Vec<u8>,
    sample_rate: u32,
    channels: u16,
    /// Set once persisted; the file is removed when the artifact drops.
    path: Option<PathBuf>,
}

impl AudioArtifact {
    /// Wrap encoded WAV bytes.
    pub fn new(wav: Vec<u8>, sample_rate: u32, channels: u16) -> Self {
        Self {
            wav,
            sample_rate,
            channels,
            path: None,
        }
    }

    /// The complete WAV byte stream.
    pub fn wav_bytes(&self) -> &[u8] {
        &self.wav
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Playback length in seconds, derived from the data-chunk size.
    pub fn duration_secs(&self) -> f32 {
        let data_bytes = self.wav.len().saturating_sub(WAV_HEADER_LEN);
        let frames = data_bytes / (2 * self.channels.max(1) as usize);
        frames as f32 / self.sample_rate.max(1) as f32
    }

    /// Write the clip into `dir` and return its path.
    ///
    /// Idempotent — a second call returns the already-written path.  The
    /// file remains owned by the artifact and is removed on drop unless
    /// [`keep`](Self::keep) is called.
    pub fn persist(&mut self, dir: &Path) -> std::io::Result<&Path> {
        if self.path.is_none() {
            let seq = ARTIFACT_SEQ.fetch_add(1, Ordering::Relaxed);
            let path = dir.join(format!("speech-{seq}.wav"));
            std::fs::write(&path, &self.wav)?;
            log::debug!("persisted audio artifact: {}", path.display());
            self.path = Some(path);
        }
        // the branch above guarantees Some
        Ok(self.path.as_deref().unwrap_or_else(|| Path::new("")))
    }

    /// Path of the persisted file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Consume the artifact, detaching the persisted file from drop cleanup.
    ///
    /// Returns the file's path, now owned by the caller, or `None` if the
    /// artifact was never persisted.
    pub fn keep(mut self) -> Option<PathBuf> {
        self.path.take()
    }
}

impl Drop for AudioArtifact {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => log::debug!("released audio artifact: {}", path.display()),
                Err(e) => log::warn!("could not release {}: {e}", path.display()),
            }
        }
    }
}

// WAV bytes are elided from debug output.
impl fmt::Debug for AudioArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioArtifact")
            .field("wav_len", &self.wav.len())
            .field("sample_rate", &self.sample_rate)
            .field("channels", &self.channels)
            .field("path", &self.path)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::wav::encode_wav;

    fn sample_artifact() -> AudioArtifact {
        let wav = encode_wav(&vec![0.1_f32; 24_000], 24_000, 1).unwrap();
        AudioArtifact::new(wav, 24_000, 1)
    }

    #[test]
    fn duration_reflects_frame_count() {
        let artifact = sample_artifact();
        assert!((artifact.duration_secs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn header_only_clip_has_zero_duration() {
        let wav = encode_wav(&[], 24_000, 1).unwrap();
        let artifact = AudioArtifact::new(wav, 24_000, 1);
        assert_eq!(artifact.duration_secs(), 0.0);
    }

    #[test]
    fn persist_writes_the_wav_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let mut artifact = sample_artifact();

        let path = artifact.persist(dir.path()).unwrap().to_path_buf();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), artifact.wav_bytes());
    }

    #[test]
    fn persist_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut artifact = sample_artifact();

        let first = artifact.persist(dir.path()).unwrap().to_path_buf();
        let second = artifact.persist(dir.path()).unwrap().to_path_buf();
        assert_eq!(first, second);
    }

    #[test]
    fn drop_releases_the_persisted_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut artifact = sample_artifact();
        let path = artifact.persist(dir.path()).unwrap().to_path_buf();

        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn keep_detaches_the_file_from_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let mut artifact = sample_artifact();
        artifact.persist(dir.path()).unwrap();

        let kept = artifact.keep().unwrap();
        assert!(kept.exists());
    }

    #[test]
    fn keep_on_unpersisted_artifact_is_none() {
        assert!(sample_artifact().keep().is_none());
    }

    #[test]
    fn drop_without_persist_touches_nothing() {
        // Nothing to observe beyond "does not panic".
        drop(sample_artifact());
    }

    #[test]
    fn persisted_names_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = sample_artifact();
        let mut b = sample_artifact();
        let pa = a.persist(dir.path()).unwrap().to_path_buf();
        let pb = b.persist(dir.path()).unwrap().to_path_buf();
        assert_ne!(pa, pb);
    }
}
