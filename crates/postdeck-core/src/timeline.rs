//! Video timeline builder: ordered clips with optional trims, serialized for
//! the stitching request.

use serde::{Deserialize, Serialize};

/// One uploaded clip and the raw trim fields typed next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineClip {
    pub name: String,
    /// Position of the file in the original file picker selection.
    pub source_index: usize,
    pub start: String,
    pub end: String,
}

/// Timeline entry sent with the upload. `trim` is `[start, end]`, with a
/// `null` end meaning "to the end of the clip".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<(f64, Option<f64>)>,
}

fn seconds(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    clips: Vec<TimelineClip>,
}

impl Timeline {
    /// Start a timeline from picked file names, in picker order, untrimmed.
    pub fn from_files<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let clips = names
            .into_iter()
            .enumerate()
            .map(|(source_index, name)| TimelineClip {
                name: name.into(),
                source_index,
                start: String::new(),
                end: String::new(),
            })
            .collect();
        Self { clips }
    }

    pub fn clips(&self) -> &[TimelineClip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Drop the clip at `from` onto position `to`.
    pub fn move_clip(&mut self, from: usize, to: usize) -> bool {
        if from >= self.clips.len() {
            log::debug!("No clip at {from} to move");
            return false;
        }
        let clip = self.clips.remove(from);
        let to = to.min(self.clips.len());
        self.clips.insert(to, clip);
        true
    }

    pub fn set_start(&mut self, index: usize, raw: impl Into<String>) -> bool {
        match self.clips.get_mut(index) {
            Some(clip) => {
                clip.start = raw.into();
                true
            }
            None => false,
        }
    }

    pub fn set_end(&mut self, index: usize, raw: impl Into<String>) -> bool {
        match self.clips.get_mut(index) {
            Some(clip) => {
                clip.end = raw.into();
                true
            }
            None => false,
        }
    }

    /// One entry per clip in timeline order. Clips with neither a start nor
    /// an end carry no trim; unparseable fields count as zero.
    pub fn entries(&self) -> Vec<TimelineEntry> {
        self.clips
            .iter()
            .enumerate()
            .map(|(index, clip)| {
                let start = seconds(&clip.start);
                let end = seconds(&clip.end);
                let trim = (start != 0.0 || end != 0.0)
                    .then_some((start, (end != 0.0).then_some(end)));
                TimelineEntry { index, trim }
            })
            .collect()
    }

    /// Picker indices in timeline order. Files uploaded in this order line up
    /// with the entry indices.
    pub fn upload_order(&self) -> Vec<usize> {
        self.clips.iter().map(|clip| clip.source_index).collect()
    }

    /// The entries serialized for the hidden form field.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries())
    }
}
