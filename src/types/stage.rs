use serde::Serialize;

/// Progress of a single atomic write. Stages only move forward; `Failed` is
/// reported for a write abandoned before reaching `Renamed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStage {
    Start,
    DirEnsured,
    TempOpen,
    ContentWritten,
    MetadataApplied,
    Renamed,
    Failed,
}

impl WriteStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            WriteStage::Start => "start",
            WriteStage::DirEnsured => "dir_ensured",
            WriteStage::TempOpen => "temp_open",
            WriteStage::ContentWritten => "content_written",
            WriteStage::MetadataApplied => "metadata_applied",
            WriteStage::Renamed => "renamed",
            WriteStage::Failed => "failed",
        }
    }

    /// Whether a staging file exists on disk at this stage.
    #[must_use]
    pub const fn has_temp_file(self) -> bool {
        matches!(
            self,
            WriteStage::TempOpen | WriteStage::ContentWritten | WriteStage::MetadataApplied
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        assert!(WriteStage::Start < WriteStage::DirEnsured);
        assert!(WriteStage::TempOpen < WriteStage::ContentWritten);
        assert!(WriteStage::MetadataApplied < WriteStage::Renamed);
    }

    #[test]
    fn serialized_label_matches_as_str() {
        for stage in [WriteStage::Start, WriteStage::TempOpen, WriteStage::Failed] {
            assert_eq!(serde_json::to_value(stage).ok(), Some(serde_json::json!(stage.as_str())));
        }
    }

    #[test]
    fn temp_file_only_between_open_and_rename() {
        assert!(!WriteStage::DirEnsured.has_temp_file());
        assert!(WriteStage::TempOpen.has_temp_file());
        assert!(WriteStage::MetadataApplied.has_temp_file());
        assert!(!WriteStage::Renamed.has_temp_file());
    }
}
